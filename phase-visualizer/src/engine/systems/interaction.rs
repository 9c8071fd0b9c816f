use bevy::prelude::*;

use crate::engine::core::app_state::VisualizerInstance;
use crate::engine::scene::host_now_ms;

/// Action produced by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutedAction {
    /// Zero-based position in the visualizer's registry.
    SelectPhase(usize),
    ToggleAuto,
    Next,
    Previous,
}

/// Map a key to its action. Keys 1-4 on the digit row or numpad select phases.
pub fn route_key(key: KeyCode) -> Option<RoutedAction> {
    match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => Some(RoutedAction::SelectPhase(0)),
        KeyCode::Digit2 | KeyCode::Numpad2 => Some(RoutedAction::SelectPhase(1)),
        KeyCode::Digit3 | KeyCode::Numpad3 => Some(RoutedAction::SelectPhase(2)),
        KeyCode::Digit4 | KeyCode::Numpad4 => Some(RoutedAction::SelectPhase(3)),
        KeyCode::Space => Some(RoutedAction::ToggleAuto),
        KeyCode::ArrowRight => Some(RoutedAction::Next),
        KeyCode::ArrowLeft => Some(RoutedAction::Previous),
        _ => None,
    }
}

/// Forward this frame's key presses to the visualizer.
pub fn route_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time<Real>>,
    mut instance: ResMut<VisualizerInstance>,
) {
    let now = host_now_ms(&time);

    for action in keyboard.get_just_pressed().filter_map(|key| route_key(*key)) {
        let visualizer = &mut instance.0;
        let outcome = match action {
            RoutedAction::SelectPhase(index) => match visualizer.phase_at(index) {
                Some(id) => visualizer.go_to_phase(id, now).map(|_| ()),
                None => Ok(()),
            },
            RoutedAction::ToggleAuto => {
                let running = visualizer.toggle_auto_transition(now);
                info!("Auto-transition {}", if running { "on" } else { "off" });
                Ok(())
            }
            RoutedAction::Next => visualizer.next_phase(now).map(|_| ()),
            RoutedAction::Previous => visualizer.previous_phase(now).map(|_| ()),
        };

        if let Err(err) = outcome {
            warn!("Ignored {:?}: {}", action, err);
        }
    }
}
