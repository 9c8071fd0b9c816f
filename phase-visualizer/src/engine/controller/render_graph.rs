use crate::engine::phases::PhaseId;
use crate::engine::resources::{ResourceHandle, ResourceId};

/// Scene collaborator that receives phase resources.
///
/// Only the phase controller calls these methods, always removing the
/// previous resource before adding the next.
pub trait RenderGraph {
    fn add(&mut self, resource: &ResourceHandle);
    fn remove(&mut self, resource: &ResourceHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    Added { resource: ResourceId, phase: PhaseId },
    Removed { resource: ResourceId, phase: PhaseId },
}

/// In-memory render graph tracking what is resident. Used headless and in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingGraph {
    resident: Vec<(ResourceId, PhaseId)>,
    events: Vec<GraphEvent>,
}

impl RecordingGraph {
    pub fn resident_phases(&self) -> Vec<PhaseId> {
        self.resident.iter().map(|(_, phase)| *phase).collect()
    }

    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    pub fn events(&self) -> &[GraphEvent] {
        &self.events
    }
}

impl RenderGraph for RecordingGraph {
    fn add(&mut self, resource: &ResourceHandle) {
        self.resident.push((resource.id, resource.phase));
        self.events.push(GraphEvent::Added {
            resource: resource.id,
            phase: resource.phase,
        });
    }

    fn remove(&mut self, resource: &ResourceHandle) {
        self.resident.retain(|(id, _)| *id != resource.id);
        self.events.push(GraphEvent::Removed {
            resource: resource.id,
            phase: resource.phase,
        });
    }
}
