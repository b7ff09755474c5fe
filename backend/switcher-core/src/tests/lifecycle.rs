use crate::connection::ConnectionPhase;
use crate::connection::lifecycle::Lifecycle;

#[test]
fn given_idle_when_begin_connect_then_phase_is_connecting() {
    let lifecycle = Lifecycle::new();

    let result = lifecycle.begin_connect();

    assert_eq!(result, Ok(()));
    assert_eq!(lifecycle.current(), ConnectionPhase::Connecting);
}

/// **VALUE**: Verifies only one attempt may be in flight.
///
/// **BUG THIS CATCHES**: Two sessions sharing one device and one UI, which used to happen
/// when connect was clicked twice quickly.
#[test]
fn given_active_phase_when_begin_connect_then_rejected_with_current_phase() {
    for phase in [
        ConnectionPhase::Connecting,
        ConnectionPhase::Connected,
        ConnectionPhase::Disconnecting,
        ConnectionPhase::Failed,
    ] {
        // GIVEN
        let lifecycle = Lifecycle::new();
        lifecycle.set(phase);

        // WHEN
        let result = lifecycle.begin_connect();

        // THEN
        assert_eq!(result, Err(phase));
        assert_eq!(lifecycle.current(), phase);
    }
}

#[test]
fn given_racing_threads_when_begin_connect_then_exactly_one_wins() {
    let lifecycle = std::sync::Arc::new(Lifecycle::new());

    let winners: usize = (0..8)
        .map(|_| {
            let lifecycle = lifecycle.clone();
            std::thread::spawn(move || lifecycle.begin_connect().is_ok())
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| usize::from(handle.join().expect("Thread panicked")))
        .sum();

    assert_eq!(winners, 1);
}

#[test]
fn given_phases_when_checked_then_only_connecting_and_connected_are_active() {
    assert!(ConnectionPhase::Connecting.is_active());
    assert!(ConnectionPhase::Connected.is_active());
    assert!(!ConnectionPhase::Idle.is_active());
    assert!(!ConnectionPhase::Disconnecting.is_active());
    assert!(!ConnectionPhase::Failed.is_active());
}
