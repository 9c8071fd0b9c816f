use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;

use constants::particle_budget::CURVE_SEGMENTS;

use crate::engine::controller::RenderGraph;
use crate::engine::core::app_state::VisualizerInstance;
use crate::engine::phases::PhaseId;
use crate::engine::resources::{ResourceHandle, ResourceId};
use crate::engine::scene::presentation::phase_root_transform;

/// Root entity of a resident phase. Particles and connections are children.
#[derive(Component, Debug, Clone, Copy)]
pub struct PhaseResource {
    pub resource: ResourceId,
    pub phase: PhaseId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    Spawn(Box<ResourceHandle>),
    Despawn(ResourceId),
}

/// Render graph that queues scene commands for `sync_render_graph`.
#[derive(Debug, Default, Clone)]
pub struct SceneGraphQueue {
    commands: Vec<SceneCommand>,
    resident: Vec<(ResourceId, PhaseId)>,
}

impl SceneGraphQueue {
    pub fn drain(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn pending(&self) -> &[SceneCommand] {
        &self.commands
    }

    pub fn resident_phases(&self) -> Vec<PhaseId> {
        self.resident.iter().map(|(_, phase)| *phase).collect()
    }
}

impl RenderGraph for SceneGraphQueue {
    fn add(&mut self, resource: &ResourceHandle) {
        self.resident.push((resource.id, resource.phase));
        self.commands
            .push(SceneCommand::Spawn(Box::new(resource.clone())));
    }

    fn remove(&mut self, resource: &ResourceHandle) {
        self.resident.retain(|(id, _)| *id != resource.id);
        // A spawn still waiting in the queue is simply dropped.
        let queued = self.commands.len();
        self.commands.retain(
            |command| !matches!(command, SceneCommand::Spawn(handle) if handle.id == resource.id),
        );
        if self.commands.len() == queued {
            self.commands.push(SceneCommand::Despawn(resource.id));
        }
    }
}

/// Shared materials for every phase; opacity is written per frame.
#[derive(Resource)]
pub struct PhaseMaterials {
    pub particles: Handle<StandardMaterial>,
    pub connections: Handle<StandardMaterial>,
}

impl FromWorld for PhaseMaterials {
    fn from_world(world: &mut World) -> Self {
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let particles = materials.add(StandardMaterial {
            base_color: Color::WHITE,
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.6,
            cull_mode: None,
            ..default()
        });
        let connections = materials.add(StandardMaterial {
            base_color: Color::srgba(0.7, 0.85, 1.0, CONNECTION_ALPHA),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        Self {
            particles,
            connections,
        }
    }
}

/// Base alpha of connection lines before the transition fade.
pub const CONNECTION_ALPHA: f32 = 0.35;

/// Apply queued graph commands: despawn removed phases, spawn added ones.
pub fn sync_render_graph(
    mut commands: Commands,
    mut instance: ResMut<VisualizerInstance>,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<PhaseMaterials>,
    roots: Query<(Entity, &PhaseResource)>,
) {
    // New roots start at the latest motion so the first drawn frame is not untransformed.
    let root_transform = instance
        .0
        .last_snapshot()
        .map(|snapshot| phase_root_transform(&snapshot.motion))
        .unwrap_or_default();

    for command in instance.0.graph_mut().drain() {
        match command {
            SceneCommand::Despawn(resource) => {
                for (entity, root) in &roots {
                    if root.resource == resource {
                        commands.entity(entity).despawn();
                        debug!("Despawned '{}' resources", root.phase);
                    }
                }
            }
            SceneCommand::Spawn(handle) => {
                spawn_phase(&mut commands, &mut meshes, &materials, &handle, root_transform);
            }
        }
    }
}

fn spawn_phase(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &PhaseMaterials,
    handle: &ResourceHandle,
    transform: Transform,
) {
    let particles = meshes.add(create_particle_mesh(handle));
    let connections = meshes.add(create_connection_mesh(handle));

    commands
        .spawn((
            PhaseResource {
                resource: handle.id,
                phase: handle.phase,
            },
            transform,
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(particles),
                MeshMaterial3d(materials.particles.clone()),
                NoFrustumCulling,
            ));
            parent.spawn((
                Mesh3d(connections),
                MeshMaterial3d(materials.connections.clone()),
                NoFrustumCulling,
            ));
        });

    info!(
        "Spawned '{}': {} particles, {} connections",
        handle.phase,
        handle.particle_count(),
        handle.connections.len()
    );
}

const OCTAHEDRON_CORNERS: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

const OCTAHEDRON_FACES: [[u32; 3]; 8] = [
    [0, 2, 4],
    [4, 2, 1],
    [1, 2, 5],
    [5, 2, 0],
    [0, 4, 3],
    [4, 1, 3],
    [1, 5, 3],
    [5, 0, 3],
];

/// One small octahedron per particle, scaled by the particle size.
pub fn create_particle_mesh(handle: &ResourceHandle) -> Mesh {
    let count = handle.particle_count();
    let colors = handle.colors_rgba();

    let mut positions = Vec::with_capacity(count * OCTAHEDRON_CORNERS.len());
    let mut normals = Vec::with_capacity(count * OCTAHEDRON_CORNERS.len());
    let mut vertex_colors = Vec::with_capacity(count * OCTAHEDRON_CORNERS.len());
    let mut indices = Vec::with_capacity(count * OCTAHEDRON_FACES.len() * 3);

    for (i, color) in colors.iter().enumerate() {
        let centre = handle.position(i);
        let radius = handle.sizes[i] * 0.5;
        let base = positions.len() as u32;

        for corner in OCTAHEDRON_CORNERS {
            positions.push((centre + corner * radius).to_array());
            normals.push(corner.to_array());
            vertex_colors.push(*color);
        }
        for face in OCTAHEDRON_FACES {
            indices.extend(face.iter().map(|v| base + v));
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, vertex_colors);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Connections as line segments; arcs are tessellated into `CURVE_SEGMENTS` pieces.
pub fn create_connection_mesh(handle: &ResourceHandle) -> Mesh {
    let mut positions: Vec<[f32; 3]> = Vec::new();

    for connection in &handle.connections {
        let points = connection.points(CURVE_SEGMENTS);
        for pair in points.windows(2) {
            positions.push(pair[0].to_array());
            positions.push(pair[1].to_array());
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}
