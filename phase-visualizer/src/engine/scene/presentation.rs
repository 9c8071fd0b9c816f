use bevy::prelude::*;

use crate::engine::animation::MotionSample;
use crate::engine::camera::CameraPose;
use crate::engine::core::app_state::VisualizerInstance;
use crate::engine::scene::scene_graph::{CONNECTION_ALPHA, PhaseMaterials, PhaseResource};
use crate::engine::scene::visibility::PageVisibility;
use crate::error::VisualizerError;

/// Lux of the key light at level 1.0.
const KEY_ILLUMINANCE: f32 = 6_000.0;
/// Lumens of the rim light at level 1.0.
const RIM_INTENSITY: f32 = 40_000_000.0;
/// Ambient brightness at level 1.0.
const AMBIENT_BRIGHTNESS: f32 = 600.0;

#[derive(Component)]
pub struct PhaseCamera;

#[derive(Component)]
pub struct KeyLight;

#[derive(Component)]
pub struct RimLight;

/// Host clock in milliseconds. Real time keeps running while the app is paused.
pub fn host_now_ms(time: &Time<Real>) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}

pub fn spawn_phase_camera(commands: &mut Commands, pose: &CameraPose) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.01, 0.01, 0.03)),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: pose.fov_degrees.to_radians(),
            far: 5_000.0,
            ..default()
        }),
        Transform::from_translation(pose.position).looking_at(pose.look_at, Vec3::Y),
        PhaseCamera,
    ));
}

pub fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: KEY_ILLUMINANCE,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
        KeyLight,
    ));
    commands.spawn((
        PointLight {
            intensity: RIM_INTENSITY,
            range: 2_000.0,
            color: Color::srgb(0.55, 0.7, 1.0),
            ..default()
        },
        Transform::from_xyz(-120.0, 60.0, -160.0),
        RimLight,
    ));
}

/// Spin, tilt and pulse of the resident phase root.
pub fn phase_root_transform(motion: &MotionSample) -> Transform {
    Transform::from_rotation(Quat::from_euler(
        EulerRot::YXZ,
        motion.rotation_y,
        motion.rotation_x,
        0.0,
    ))
    .with_scale(Vec3::splat(motion.scale))
}

/// Run one scheduler callback and apply the resulting snapshot to the scene.
#[allow(clippy::too_many_arguments)]
pub fn drive_visualizer(
    time: Res<Time<Real>>,
    visibility: Res<PageVisibility>,
    mut instance: ResMut<VisualizerInstance>,
    mut cameras: Query<(&mut Transform, &mut Projection), (With<PhaseCamera>, Without<PhaseResource>)>,
    mut key_lights: Query<&mut DirectionalLight, With<KeyLight>>,
    mut rim_lights: Query<&mut PointLight, With<RimLight>>,
    mut ambient: ResMut<AmbientLight>,
    mut roots: Query<&mut Transform, (With<PhaseResource>, Without<PhaseCamera>)>,
    phase_materials: Res<PhaseMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let now = host_now_ms(&time);

    instance.0.frame_with(now, visibility.visible, |snapshot| {
        if !snapshot.camera.is_finite() {
            return Err(VisualizerError::RenderFrame(format!(
                "non-finite camera pose {:?}",
                snapshot.camera
            )));
        }

        for (mut transform, mut projection) in &mut cameras {
            *transform = Transform::from_translation(snapshot.camera.position)
                .looking_at(snapshot.camera.look_at, Vec3::Y);
            if let Projection::Perspective(perspective) = projection.as_mut() {
                perspective.fov = snapshot.camera.fov_degrees.to_radians();
            }
        }

        for mut light in &mut key_lights {
            light.illuminance = snapshot.lighting.key * KEY_ILLUMINANCE;
        }
        for mut light in &mut rim_lights {
            light.intensity = snapshot.lighting.rim * RIM_INTENSITY;
        }
        ambient.brightness = snapshot.lighting.ambient * AMBIENT_BRIGHTNESS;

        let motion = snapshot.motion;
        for mut transform in &mut roots {
            *transform = phase_root_transform(&motion);
        }

        if let Some(material) = materials.get_mut(&phase_materials.particles) {
            material.base_color.set_alpha(motion.opacity);
        }
        if let Some(material) = materials.get_mut(&phase_materials.connections) {
            material.base_color.set_alpha(motion.opacity * CONNECTION_ALPHA);
        }

        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_transform_carries_tilt_spin_and_pulse() {
        let motion = MotionSample {
            rotation_y: 0.5,
            rotation_x: 0.2,
            scale: 1.05,
            opacity: 1.0,
        };
        let transform = phase_root_transform(&motion);
        assert_eq!(transform.translation, Vec3::ZERO);
        assert_eq!(transform.scale, Vec3::splat(1.05));

        let (y, x, z) = transform.rotation.to_euler(EulerRot::YXZ);
        assert!((y - 0.5).abs() < 1e-5);
        assert!((x - 0.2).abs() < 1e-5);
        assert!(z.abs() < 1e-5);

        assert_eq!(phase_root_transform(&MotionSample::default()), Transform::IDENTITY);
    }
}
