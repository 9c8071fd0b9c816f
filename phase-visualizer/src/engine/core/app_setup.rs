use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::core::app_state::{
    AppState, ConfigLoader, spawn_fallback, start_loading, transition_to_running,
};
use crate::engine::core::config::VisualizerConfig;
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::presentation::spawn_lighting;
use crate::engine::scene::{
    PageVisibility, PhaseMaterials, drive_visualizer, sync_render_graph, track_page_visibility,
};
use crate::engine::systems::fps_tracking::stats_notification_system;
use crate::engine::systems::interaction::route_keyboard_input;
use crate::rpc::web_rpc::{WebRpcPlugin, handle_rpc_messages};

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::scene::throttle_hidden_updates;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{fps_text_update_system, spawn_fps_overlay};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers VisualizerConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<VisualizerConfig>::new(&["json"]))
        .add_plugins(WebRpcPlugin);

    app.init_resource::<ConfigLoader>()
        .init_resource::<PageVisibility>()
        .init_resource::<PhaseMaterials>();

    // Starts continuous; `throttle_hidden_updates` slows it while hidden.
    #[cfg(not(target_arch = "wasm32"))]
    app.insert_resource(bevy::winit::WinitSettings::game());

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            transition_to_running.run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Fallback), spawn_fallback);

    // Input and RPC requests land before the frame is driven, so a request
    // made this update is visible in this update's snapshot.
    let runtime_systems = (
        track_page_visibility,
        route_keyboard_input,
        handle_rpc_messages,
        drive_visualizer,
        sync_render_graph,
        stats_notification_system,
    )
        .chain();

    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            throttle_hidden_updates
                .after(track_page_visibility)
                .run_if(in_state(AppState::Running)),
        )
        .add_systems(OnEnter(AppState::Running), spawn_fps_overlay)
            .add_systems(
                Update,
                fps_text_update_system.run_if(in_state(AppState::Running)),
            );
    }

    app
}

fn setup(mut commands: Commands) {
    println!("=== PHASE VISUALIZER ===");
    spawn_lighting(&mut commands);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
