use bevy::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use bevy::winit::{UpdateMode, WinitSettings};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::VisualizerInstance;

/// Whether the page or window is currently shown. The frame scheduler parks
/// while this is false.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageVisibility {
    pub visible: bool,
}

impl Default for PageVisibility {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Native: follow window occlusion reported by winit.
#[cfg(not(target_arch = "wasm32"))]
pub fn track_page_visibility(
    mut occlusion: EventReader<bevy::window::WindowOccluded>,
    mut visibility: ResMut<PageVisibility>,
) {
    for event in occlusion.read() {
        let visible = !event.occluded;
        if visibility.visible != visible {
            visibility.visible = visible;
            info!("Window {}", if visible { "visible" } else { "hidden" });
        }
    }
}

/// Native: while hidden, wake the event loop only at the scheduler's
/// re-check interval. Continuous updates resume once the window is shown.
#[cfg(not(target_arch = "wasm32"))]
pub fn throttle_hidden_updates(
    visibility: Res<PageVisibility>,
    instance: Res<VisualizerInstance>,
    mut winit: ResMut<WinitSettings>,
) {
    let mode = if visibility.visible {
        UpdateMode::Continuous
    } else {
        let recheck_ms = instance.0.scheduler().hidden_recheck_ms();
        UpdateMode::reactive_low_power(std::time::Duration::from_millis(recheck_ms as u64))
    };

    if winit.focused_mode != mode || winit.unfocused_mode != mode {
        winit.focused_mode = mode;
        winit.unfocused_mode = mode;
        debug!("Update mode set to {:?}", mode);
    }
}

/// Web: read `document.hidden` each frame.
#[cfg(target_arch = "wasm32")]
pub fn track_page_visibility(mut visibility: ResMut<PageVisibility>) {
    let hidden = web_sys::window()
        .and_then(|window| window.document())
        .map(|document| document.hidden())
        .unwrap_or(false);

    if visibility.visible == hidden {
        visibility.visible = !hidden;
        info!("Page {}", if hidden { "hidden" } else { "visible" });
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::engine::animation::Capabilities;
    use crate::engine::core::config::VisualizerConfig;
    use crate::engine::device::DeviceProbe;
    use crate::engine::scene::SceneGraphQueue;
    use crate::engine::visualizer::PhaseVisualizer;
    use std::time::Duration;

    fn headless_app(hidden_recheck_ms: f64) -> App {
        let config = VisualizerConfig {
            seed: Some(5),
            hidden_recheck_ms,
            ..default()
        };
        let visualizer = PhaseVisualizer::new(
            &config,
            DeviceProbe::default(),
            Capabilities::default(),
            SceneGraphQueue::default(),
            0.0,
        )
        .unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(WinitSettings::game())
            .insert_resource(PageVisibility { visible: false })
            .insert_resource(VisualizerInstance(visualizer))
            .add_systems(Update, throttle_hidden_updates);
        app
    }

    #[test]
    fn hidden_window_wakes_at_the_configured_recheck_rate() {
        let mut app = headless_app(250.0);
        app.update();

        let expected = UpdateMode::reactive_low_power(Duration::from_millis(250));
        let winit = app.world().resource::<WinitSettings>();
        assert_eq!(winit.focused_mode, expected);
        assert_eq!(winit.unfocused_mode, expected);
    }

    #[test]
    fn shown_window_returns_to_continuous_updates() {
        let mut app = headless_app(250.0);
        app.update();
        app.world_mut().resource_mut::<PageVisibility>().visible = true;
        app.update();

        let winit = app.world().resource::<WinitSettings>();
        assert_eq!(winit.focused_mode, UpdateMode::Continuous);
        assert_eq!(winit.unfocused_mode, UpdateMode::Continuous);
    }
}
