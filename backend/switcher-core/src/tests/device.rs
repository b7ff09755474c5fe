use super::{drain, ui_channel};

use crate::device::DeviceState;

use models::{LightState, UiEvent};

#[test]
fn given_light_off_when_toggled_then_returns_on_and_notifies_ui() {
    // GIVEN
    let (ui, mut events) = ui_channel(false);
    let device = DeviceState::new(LightState::Off, ui);

    // WHEN
    let state = device.toggle();

    // THEN
    assert_eq!(state, LightState::On);
    assert_eq!(device.get(), LightState::On);
    assert_eq!(drain(&mut events), vec![UiEvent::Lights(LightState::On)]);
}

#[test]
fn given_cloned_device_when_one_clone_toggles_then_both_observe_change() {
    let (ui, _events) = ui_channel(false);
    let device = DeviceState::new(LightState::On, ui);
    let clone = device.clone();

    clone.toggle();

    assert_eq!(device.get(), LightState::Off);
}

#[test]
fn given_device_when_published_then_ui_receives_current_state_unchanged() {
    let (ui, mut events) = ui_channel(false);
    let device = DeviceState::new(LightState::On, ui);

    device.publish();

    assert_eq!(device.get(), LightState::On);
    assert_eq!(drain(&mut events), vec![UiEvent::Lights(LightState::On)]);
}

/// **VALUE**: Verifies concurrent toggles never lose an update.
///
/// **WHY THIS MATTERS**: The UI thread and the receive loop can both toggle at once.
/// An even number of toggles must always land back on the start state.
#[test]
fn given_concurrent_toggles_when_all_finish_then_no_update_is_lost() {
    let (ui, _events) = ui_channel(false);
    let device = DeviceState::new(LightState::Off, ui);

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let device = device.clone();
            std::thread::spawn(move || {
                for _ in 0..250 {
                    device.toggle();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("Worker panicked");
    }

    assert_eq!(device.get(), LightState::Off);
}
