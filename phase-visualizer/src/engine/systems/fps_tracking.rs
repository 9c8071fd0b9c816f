use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::core::app_state::{FpsText, VisualizerInstance};
use crate::rpc::web_rpc::WebRpcInterface;

/// Seconds between `stats_update` notifications.
const STATS_INTERVAL_SECS: f32 = 0.5;

pub fn stats_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    instance: Res<VisualizerInstance>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < STATS_INTERVAL_SECS {
        return;
    }

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0) as f32;

    match serde_json::to_value(instance.0.stats()) {
        Ok(stats) => {
            rpc_interface.send_notification(
                "stats_update",
                serde_json::json!({
                    "fps": fps,
                    "stats": stats
                }),
            );
            *last_send_time = current_time;
        }
        Err(err) => error!("Failed to serialise stats: {}", err),
    }
}

pub fn spawn_fps_overlay(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.8, 1.0)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    instance: Res<VisualizerInstance>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let stats = instance.0.stats();
    for mut text in &mut query {
        if let Some(value) = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|fps| fps.smoothed())
        {
            let phase = match stats.transition_target {
                Some(target) => format!("{} → {}", stats.current_phase_id, target),
                None => stats.current_phase_id.to_string(),
            };
            text.0 = format!(
                "FPS: {value:.1} | {phase}{}",
                if stats.is_auto_transitioning { " (auto)" } else { "" }
            );
        }
    }
}
