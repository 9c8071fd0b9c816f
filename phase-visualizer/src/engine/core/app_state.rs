use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::animation::Capabilities;
use crate::engine::camera::CameraPose;
use crate::engine::core::config::VisualizerConfig;
use crate::engine::device::probe_host;
use crate::engine::scene::{SceneGraphQueue, host_now_ms};
use crate::engine::scene::presentation::spawn_phase_camera;
use crate::engine::visualizer::PhaseVisualizer;
use crate::error::{VisualizerError, VisualizerResult};

/// Path of the optional configuration file, relative to `assets/`.
pub const CONFIG_PATH: &str = "visualizer.json";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    /// Initialisation failed; a static placeholder is shown.
    Fallback,
}

/// The running visualizer, driving the Bevy scene through its command queue.
#[derive(Resource)]
pub struct VisualizerInstance(pub PhaseVisualizer<SceneGraphQueue>);

#[derive(Component)]
pub struct FpsText;

#[derive(Component)]
pub struct FallbackText;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<VisualizerConfig>>,
}

pub fn start_loading(mut loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    loader.handle = Some(asset_server.load(CONFIG_PATH));
}

/// Wait for the config file, then build the visualizer. A missing or
/// malformed file falls back to defaults.
pub fn transition_to_running(
    mut commands: Commands,
    loader: Res<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<VisualizerConfig>>,
    time: Res<Time<Real>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let config = match &loader.handle {
        Some(handle) => {
            if let Some(config) = configs.get(handle) {
                println!("✓ Configuration loaded");
                config.clone()
            } else if matches!(asset_server.load_state(handle.id()), LoadState::Failed(_)) {
                warn!("Could not load {}, using defaults", CONFIG_PATH);
                VisualizerConfig::default()
            } else {
                return;
            }
        }
        None => VisualizerConfig::default(),
    };

    let now = host_now_ms(&time);
    match build_visualizer(&config, now) {
        Ok(visualizer) => {
            let pose = visualizer
                .controller()
                .current_descriptor()
                .map(|phase| CameraPose::from_target(&phase.camera));
            match pose {
                Ok(pose) => spawn_phase_camera(&mut commands, &pose),
                Err(err) => warn!("No camera target: {}", err),
            }

            commands.insert_resource(config);
            commands.insert_resource(VisualizerInstance(visualizer));
            println!("→ Visualizer ready, transitioning to Running state");
            next_state.set(AppState::Running);
        }
        Err(err) => {
            error!("{}", err);
            println!("→ Initialisation failed, transitioning to Fallback state");
            next_state.set(AppState::Fallback);
        }
    }
}

fn build_visualizer(
    config: &VisualizerConfig,
    now: f64,
) -> VisualizerResult<PhaseVisualizer<SceneGraphQueue>> {
    PhaseVisualizer::new(
        config,
        probe_host(),
        Capabilities::default(),
        SceneGraphQueue::default(),
        now,
    )
    .map_err(|err| match err {
        VisualizerError::Initialization(_) => err,
        other => VisualizerError::Initialization(other.to_string()),
    })
}

/// Static stand-in shown when the visualizer could not start.
pub fn spawn_fallback(mut commands: Commands) {
    commands.spawn(Camera2d);
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Visualization unavailable"),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.9)),
                FallbackText,
            ));
        });
}
