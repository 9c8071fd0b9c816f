use bevy::log::{debug, info};
use bevy::math::curve::EaseFunction;

use super::render_graph::RenderGraph;
use crate::engine::animation::Tween;
use crate::engine::device::DeviceTier;
use crate::engine::phases::{Phase, PhaseId, PhaseRegistry};
use crate::engine::resources::{ResourceBuilder, ResourceHandle};
use crate::error::VisualizerResult;

/// Controller state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerState {
    Idle(PhaseId),
    Transitioning {
        from: PhaseId,
        to: PhaseId,
        progress: f32,
    },
}

/// Who asked for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOrigin {
    Auto,
    Manual,
}

/// Result of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRequest {
    /// Already showing, or already heading to, the requested phase.
    Ignored,
    Started,
    /// Stored until the in-flight transition completes; replaces any older request.
    Queued,
    /// Switched at once because no easing facility is available.
    Activated,
}

struct ActiveTransition {
    from: PhaseId,
    to: PhaseId,
    tween: Tween<f32>,
    origin: TransitionOrigin,
}

#[derive(Clone, Copy)]
struct PendingTransition {
    to: PhaseId,
    origin: TransitionOrigin,
}

/// Owns the resident phase resources and is the only code that touches the render graph.
pub struct PhaseController<G: RenderGraph> {
    registry: PhaseRegistry,
    builder: ResourceBuilder,
    graph: G,
    tier: DeviceTier,
    easing: Option<EaseFunction>,
    transition_duration_ms: f64,
    current: PhaseId,
    resident: Option<ResourceHandle>,
    transition: Option<ActiveTransition>,
    pending: Option<PendingTransition>,
}

impl<G: RenderGraph> PhaseController<G> {
    /// Build and attach the initial phase.
    pub fn new(
        registry: PhaseRegistry,
        builder: ResourceBuilder,
        graph: G,
        tier: DeviceTier,
        easing: Option<EaseFunction>,
        transition_duration_ms: f64,
        initial: PhaseId,
    ) -> VisualizerResult<Self> {
        registry.get(initial)?;

        let mut controller = Self {
            registry,
            builder,
            graph,
            tier,
            easing,
            transition_duration_ms,
            current: initial,
            resident: None,
            transition: None,
            pending: None,
        };
        controller.activate_phase(initial)?;
        Ok(controller)
    }

    /// Swap the resident resources for `id`'s. The new buffers are built
    /// before the graph is touched, so a failed build leaves the current phase resident.
    pub fn activate_phase(&mut self, id: PhaseId) -> VisualizerResult<&Phase> {
        let phase = self.registry.get(id)?;
        let handle = self.builder.build(phase, self.tier)?;

        if let Some(previous) = self.resident.take() {
            self.graph.remove(&previous);
            debug!(
                "Detached '{}' resources ({} particles)",
                previous.phase,
                previous.particle_count()
            );
        }

        self.graph.add(&handle);
        info!(
            "Phase '{}' active: {} particles, {} connections",
            id,
            handle.particle_count(),
            handle.connections.len()
        );

        self.resident = Some(handle);
        self.current = id;
        Ok(phase)
    }

    pub fn transition_to_phase(
        &mut self,
        id: PhaseId,
        origin: TransitionOrigin,
    ) -> VisualizerResult<TransitionRequest> {
        self.registry.get(id)?;

        if let Some(active) = &self.transition {
            if id == active.to {
                self.pending = None;
                return Ok(TransitionRequest::Ignored);
            }
            debug!("Transition to '{}' in flight, queueing '{}'", active.to, id);
            self.pending = Some(PendingTransition { to: id, origin });
            return Ok(TransitionRequest::Queued);
        }

        if id == self.current {
            return Ok(TransitionRequest::Ignored);
        }

        self.begin(id, origin)
    }

    /// Step the in-flight transition. Returns the phase that became active, if any.
    pub fn advance(&mut self, dt_ms: f64) -> VisualizerResult<Option<PhaseId>> {
        let Some(active) = self.transition.as_mut() else {
            return Ok(None);
        };

        if !active.tween.advance(dt_ms) {
            return Ok(None);
        }

        let to = active.to;
        self.transition = None;
        self.activate_phase(to)?;

        if let Some(pending) = self.pending.take() {
            if pending.to != self.current {
                self.begin(pending.to, pending.origin)?;
            }
        }

        Ok(Some(to))
    }

    fn begin(&mut self, id: PhaseId, origin: TransitionOrigin) -> VisualizerResult<TransitionRequest> {
        match self.easing {
            Some(function) if self.transition_duration_ms > 0.0 => {
                info!("Transition '{}' → '{}' ({:?})", self.current, id, origin);
                self.transition = Some(ActiveTransition {
                    from: self.current,
                    to: id,
                    tween: Tween::new(0.0, 1.0, self.transition_duration_ms, function),
                    origin,
                });
                Ok(TransitionRequest::Started)
            }
            _ => {
                self.activate_phase(id)?;
                Ok(TransitionRequest::Activated)
            }
        }
    }

    /// Detach and drop the resident resources and abandon any transition.
    pub fn release(&mut self) {
        self.transition = None;
        self.pending = None;
        if let Some(resident) = self.resident.take() {
            self.graph.remove(&resident);
            info!("Released '{}' resources", resident.phase);
        }
    }

    pub fn state(&self) -> ControllerState {
        match &self.transition {
            Some(active) => ControllerState::Transitioning {
                from: active.from,
                to: active.to,
                progress: active.tween.eased_progress(),
            },
            None => ControllerState::Idle(self.current),
        }
    }

    pub fn current_phase(&self) -> PhaseId {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition_target(&self) -> Option<PhaseId> {
        self.transition.as_ref().map(|active| active.to)
    }

    pub fn transition_origin(&self) -> Option<TransitionOrigin> {
        self.transition.as_ref().map(|active| active.origin)
    }

    pub fn pending_target(&self) -> Option<PhaseId> {
        self.pending.map(|pending| pending.to)
    }

    /// Most recently requested phase: pending, else in-flight target, else current.
    pub fn latest_requested(&self) -> PhaseId {
        self.pending_target()
            .or_else(|| self.transition_target())
            .unwrap_or(self.current)
    }

    /// Opacity for the resident resources: fades out while a transition runs.
    pub fn fade(&self) -> f32 {
        self.transition
            .as_ref()
            .map_or(1.0, |active| 1.0 - active.tween.eased_progress())
    }

    pub fn resident(&self) -> Option<&ResourceHandle> {
        self.resident.as_ref()
    }

    pub fn registry(&self) -> &PhaseRegistry {
        &self.registry
    }

    pub fn current_descriptor(&self) -> VisualizerResult<&Phase> {
        self.registry.get(self.current)
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }
}
