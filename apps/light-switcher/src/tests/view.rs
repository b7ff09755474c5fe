use crate::view::{ViewState, render_events};

use models::{ConnectionStatus, LightState, UiEvent};

use tokio::sync::mpsc::unbounded_channel;

#[test]
fn given_default_view_when_created_then_shows_light_off_and_down() {
    let view = ViewState::default();

    assert_eq!(view.lights, LightState::Off);
    assert_eq!(view.connection, ConnectionStatus::Down);
    assert!(!view.connected);
}

#[test]
fn given_indicator_events_when_applied_then_view_and_lines_update() {
    // GIVEN
    let mut view = ViewState::default();

    // WHEN / THEN
    assert_eq!(
        view.apply(&UiEvent::Lights(LightState::On)).as_deref(),
        Some("[light] on")
    );
    assert_eq!(
        view.apply(&UiEvent::Connection(ConnectionStatus::Wait))
            .as_deref(),
        Some("[connection] wait")
    );
    assert_eq!(view.apply(&UiEvent::Controls { connected: true }), None);

    assert_eq!(view.lights, LightState::On);
    assert_eq!(view.connection, ConnectionStatus::Wait);
    assert!(view.connected);
}

/// **VALUE**: Verifies the renderer prints every line in arrival order and stops when the
/// engine side is dropped.
///
/// **BUG THIS CATCHES**: A renderer that never returns would hang application shutdown.
#[tokio::test]
async fn given_events_when_rendered_then_lines_written_in_order() {
    // GIVEN
    let (sender, receiver) = unbounded_channel();
    sender
        .send(UiEvent::Log("Network: Sent info".to_string()))
        .expect("Receiver alive");
    sender
        .send(UiEvent::Connection(ConnectionStatus::Up))
        .expect("Receiver alive");
    sender
        .send(UiEvent::Controls { connected: true })
        .expect("Receiver alive");
    drop(sender);

    // WHEN
    let mut out = Vec::new();
    let view = render_events(receiver, &mut out).await;

    // THEN
    assert_eq!(
        String::from_utf8(out).expect("UTF-8 output"),
        "Network: Sent info\n[connection] up\n"
    );
    assert_eq!(view.connection, ConnectionStatus::Up);
    assert!(view.connected);
}
