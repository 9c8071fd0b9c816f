use bevy::log::{error, info};
use serde::Serialize;

use constants::render_settings::MAX_FRAME_DELTA_MS;

use crate::engine::animation::{Capabilities, MotionSample};
use crate::engine::camera::{CameraDirector, CameraPose, IdleOrbit};
use crate::engine::controller::{
    ControllerState, PhaseController, RenderGraph, TransitionOrigin, TransitionRequest,
};
use crate::engine::core::config::VisualizerConfig;
use crate::engine::device::{DeviceProbe, DeviceProfile};
use crate::engine::lighting::{LightLevels, LightingDirector};
use crate::engine::phases::{PhaseId, PhaseRegistry};
use crate::engine::resources::ResourceBuilder;
use crate::engine::systems::auto_transition::AutoTransitionTimer;
use crate::engine::systems::frame_scheduler::{FrameScheduler, FrameTick};
use crate::error::VisualizerResult;

/// Public statistics, serialised for the web RPC bridge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizerStats {
    pub current_phase_id: PhaseId,
    pub frame_count: u64,
    pub is_auto_transitioning: bool,
    pub is_transitioning: bool,
    pub transition_target: Option<PhaseId>,
    pub render_errors: u64,
}

/// Snapshot of the scheduling state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerState {
    pub current_phase_id: PhaseId,
    pub transition_target: Option<PhaseId>,
    pub transition_progress: f32,
    pub is_transitioning: bool,
    pub last_frame_timestamp: f64,
    pub frame_count: u64,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    pub phase: PhaseId,
    pub frame: u64,
    pub clock_ms: f64,
    pub camera: CameraPose,
    pub lighting: LightLevels,
    pub motion: MotionSample,
}

/// One visualization instance: phase controller, directors, scheduler and
/// drivers behind the public API.
pub struct PhaseVisualizer<G: RenderGraph> {
    controller: PhaseController<G>,
    camera: CameraDirector,
    lighting: LightingDirector,
    scheduler: FrameScheduler,
    auto_timer: AutoTransitionTimer,
    profile: DeviceProfile,
    capabilities: Capabilities,
    clock_ms: f64,
    render_errors: u64,
    last_snapshot: Option<FrameSnapshot>,
    destroyed: bool,
}

impl<G: RenderGraph> PhaseVisualizer<G> {
    pub fn new(
        config: &VisualizerConfig,
        probe: DeviceProbe,
        capabilities: Capabilities,
        graph: G,
        now: f64,
    ) -> VisualizerResult<Self> {
        Self::with_registry(
            PhaseRegistry::standard(),
            config,
            probe,
            capabilities,
            graph,
            now,
        )
    }

    pub fn with_registry(
        registry: PhaseRegistry,
        config: &VisualizerConfig,
        probe: DeviceProbe,
        mut capabilities: Capabilities,
        graph: G,
        now: f64,
    ) -> VisualizerResult<Self> {
        config.validate()?;

        let profile = DeviceProfile::from_probe(probe);
        if profile.reduced_motion {
            capabilities.idle_motion = false;
        }
        capabilities.report_unsupported();

        let builder = config
            .seed
            .map_or_else(ResourceBuilder::new, ResourceBuilder::with_seed);

        let controller = PhaseController::new(
            registry,
            builder,
            graph,
            profile.tier,
            capabilities.easing,
            config.transition_duration_ms,
            config.initial_phase,
        )?;

        let (camera_target, lighting_profile) = {
            let phase = controller.current_descriptor()?;
            (phase.camera, phase.lighting)
        };

        let camera = CameraDirector::new(
            CameraPose::from_target(&camera_target),
            capabilities.easing,
            capabilities.idle_motion.then(IdleOrbit::default),
        );
        let lighting = LightingDirector::new(
            LightLevels::from(&lighting_profile),
            capabilities.easing,
            capabilities.idle_motion,
        );

        let target_fps = config
            .target_fps
            .unwrap_or_else(|| profile.default_target_fps());
        let mut scheduler =
            FrameScheduler::new(target_fps, config.hidden_recheck_ms, MAX_FRAME_DELTA_MS);
        scheduler.start(now);

        let mut auto_timer = AutoTransitionTimer::new(config.auto_transition_interval_ms);
        if config.auto_start && !profile.reduced_motion {
            auto_timer.start(now, config.auto_transition_interval_ms);
        }

        info!(
            "Visualizer ready: {:?} tier, {} fps, starting at '{}'",
            profile.tier, target_fps, config.initial_phase
        );

        Ok(Self {
            controller,
            camera,
            lighting,
            scheduler,
            auto_timer,
            profile,
            capabilities,
            clock_ms: 0.0,
            render_errors: 0,
            last_snapshot: None,
            destroyed: false,
        })
    }

    /// Manually request a phase. Suspends auto-transition until the
    /// transition completes.
    pub fn go_to_phase(&mut self, id: PhaseId, now: f64) -> VisualizerResult<TransitionRequest> {
        if self.destroyed {
            return Ok(TransitionRequest::Ignored);
        }

        let request = self.controller.transition_to_phase(id, TransitionOrigin::Manual)?;
        match request {
            TransitionRequest::Started | TransitionRequest::Queued => self.auto_timer.suspend(),
            TransitionRequest::Activated => {
                self.retarget(id)?;
                self.auto_timer.suspend();
                self.auto_timer.resume(now);
            }
            TransitionRequest::Ignored => {}
        }
        Ok(request)
    }

    /// Step from the most recently requested phase to the next one in the cycle.
    pub fn next_phase(&mut self, now: f64) -> VisualizerResult<PhaseId> {
        let next = self
            .controller
            .registry()
            .next(self.controller.latest_requested());
        self.go_to_phase(next, now)?;
        Ok(next)
    }

    pub fn previous_phase(&mut self, now: f64) -> VisualizerResult<PhaseId> {
        let previous = self
            .controller
            .registry()
            .previous(self.controller.latest_requested());
        self.go_to_phase(previous, now)?;
        Ok(previous)
    }

    /// Phase at a 0-based position in this instance's registry.
    pub fn phase_at(&self, index: usize) -> Option<PhaseId> {
        self.controller.registry().at(index)
    }

    /// Returns whether auto-transition is now running. Restarting the timer
    /// mid-transition keeps it suspended until that transition completes.
    pub fn toggle_auto_transition(&mut self, now: f64) -> bool {
        if self.destroyed {
            return false;
        }
        let running = self.auto_timer.toggle(now);
        if running && self.controller.is_transitioning() {
            self.auto_timer.suspend();
        }
        running
    }

    /// Stop the loop and the timer and release the resident resources.
    /// In-flight transitions are abandoned. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.scheduler.stop();
        self.auto_timer.stop();
        self.controller.release();
        self.destroyed = true;
        info!("Visualizer destroyed");
    }

    pub fn frame(&mut self, now: f64, visible: bool) -> FrameTick {
        self.frame_with(now, visible, |_| Ok(()))
    }

    /// Run one scheduler callback. On a rendered frame the snapshot is handed
    /// to `render`; any error is logged and the loop carries on.
    pub fn frame_with<F>(&mut self, now: f64, visible: bool, render: F) -> FrameTick
    where
        F: FnOnce(&FrameSnapshot) -> VisualizerResult<()>,
    {
        if self.destroyed {
            return FrameTick::Stopped;
        }

        let tick = self.scheduler.tick(now, visible);
        if let FrameTick::Render { delta_ms } = tick {
            if let Err(err) = self.render_frame(now, delta_ms, render) {
                self.render_errors += 1;
                error!("Frame {} failed: {}", self.scheduler.frame_count(), err);
            }
        }
        tick
    }

    fn render_frame<F>(&mut self, now: f64, delta_ms: f64, render: F) -> VisualizerResult<()>
    where
        F: FnOnce(&FrameSnapshot) -> VisualizerResult<()>,
    {
        self.clock_ms += delta_ms;

        if let Some(activated) = self.controller.advance(delta_ms)? {
            self.retarget(activated)?;
        }
        if !self.controller.is_transitioning() {
            self.auto_timer.resume(now);
        }

        if self.auto_timer.poll(now) {
            let next = self
                .controller
                .registry()
                .next(self.controller.latest_requested());
            if self.controller.transition_to_phase(next, TransitionOrigin::Auto)?
                == TransitionRequest::Activated
            {
                self.retarget(next)?;
            }
        }

        self.camera.advance(delta_ms);
        self.lighting.advance(delta_ms);

        let motion = self.controller.current_descriptor()?.motion.sample(
            self.clock_ms,
            self.profile.reduced_motion,
            self.controller.fade(),
        );

        let snapshot = FrameSnapshot {
            phase: self.controller.current_phase(),
            frame: self.scheduler.frame_count(),
            clock_ms: self.clock_ms,
            camera: self.camera.sample(self.clock_ms),
            lighting: self.lighting.sample(self.clock_ms),
            motion,
        };
        self.last_snapshot = Some(snapshot);
        render(&snapshot)
    }

    fn retarget(&mut self, id: PhaseId) -> VisualizerResult<()> {
        let phase = self.controller.registry().get(id)?;
        self.camera.animate_to(&phase.camera);
        self.lighting
            .animate_to(&phase.lighting, phase.camera.duration_ms);
        Ok(())
    }

    pub fn stats(&self) -> VisualizerStats {
        VisualizerStats {
            current_phase_id: self.controller.current_phase(),
            frame_count: self.scheduler.frame_count(),
            is_auto_transitioning: self.auto_timer.is_running(),
            is_transitioning: self.controller.is_transitioning(),
            transition_target: self.controller.transition_target(),
            render_errors: self.render_errors,
        }
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        let transition_progress = match self.controller.state() {
            ControllerState::Transitioning { progress, .. } => progress,
            ControllerState::Idle(_) => 0.0,
        };
        SchedulerState {
            current_phase_id: self.controller.current_phase(),
            transition_target: self.controller.transition_target(),
            transition_progress,
            is_transitioning: self.controller.is_transitioning(),
            last_frame_timestamp: self.scheduler.last_frame_timestamp(),
            frame_count: self.scheduler.frame_count(),
        }
    }

    pub fn last_snapshot(&self) -> Option<&FrameSnapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn controller(&self) -> &PhaseController<G> {
        &self.controller
    }

    pub fn graph(&self) -> &G {
        self.controller.graph()
    }

    pub fn graph_mut(&mut self) -> &mut G {
        self.controller.graph_mut()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn auto_timer(&self) -> &AutoTransitionTimer {
        &self.auto_timer
    }

    pub fn profile(&self) -> DeviceProfile {
        self.profile
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::controller::RecordingGraph;
    use crate::error::VisualizerError;

    fn config() -> VisualizerConfig {
        VisualizerConfig {
            seed: Some(17),
            target_fps: Some(60),
            ..Default::default()
        }
    }

    fn visualizer(capabilities: Capabilities) -> PhaseVisualizer<RecordingGraph> {
        PhaseVisualizer::new(
            &config(),
            DeviceProbe::default(),
            capabilities,
            RecordingGraph::default(),
            0.0,
        )
        .unwrap()
    }

    /// Drive the loop at ~60 Hz from `from` to `to` ms.
    fn run(visualizer: &mut PhaseVisualizer<RecordingGraph>, from: u64, to: u64) {
        let mut now = from;
        while now <= to {
            visualizer.frame(now as f64, true);
            now += 16;
        }
    }

    #[test]
    fn self_transition_leaves_scheduler_state_unchanged() {
        let mut visualizer = visualizer(Capabilities::default());
        run(&mut visualizer, 0, 200);
        let before = visualizer.scheduler_state();
        visualizer.go_to_phase(PhaseId::Neuron, 210.0).unwrap();
        assert_eq!(visualizer.scheduler_state(), before);
    }

    #[test]
    fn manual_transition_suspends_the_auto_timer_until_complete() {
        let mut visualizer = visualizer(Capabilities::default());
        visualizer.go_to_phase(PhaseId::Network, 0.0).unwrap();
        assert!(visualizer.auto_timer().is_suspended());
        assert!(visualizer.stats().is_auto_transitioning);

        run(&mut visualizer, 0, 2500);
        assert_eq!(visualizer.stats().current_phase_id, PhaseId::Network);
        assert!(!visualizer.auto_timer().is_suspended());
    }

    #[test]
    fn auto_timer_cycles_phases() {
        let config = VisualizerConfig {
            auto_transition_interval_ms: 500.0,
            ..config()
        };
        let mut visualizer = PhaseVisualizer::new(
            &config,
            DeviceProbe::default(),
            Capabilities::immediate(),
            RecordingGraph::default(),
            0.0,
        )
        .unwrap();

        run(&mut visualizer, 0, 520);
        assert_eq!(visualizer.stats().current_phase_id, PhaseId::Brain);
        assert_eq!(visualizer.graph().resident_phases(), vec![PhaseId::Brain]);
    }

    #[test]
    fn snapshots_fade_out_during_transitions() {
        let mut visualizer = visualizer(Capabilities::default());
        run(&mut visualizer, 0, 16);
        visualizer.go_to_phase(PhaseId::Cosmos, 20.0).unwrap();
        run(&mut visualizer, 32, 1100);
        let snapshot = *visualizer.last_snapshot().unwrap();
        assert_eq!(snapshot.phase, PhaseId::Neuron);
        assert!(snapshot.motion.opacity < 1.0);

        run(&mut visualizer, 1116, 2300);
        let snapshot = *visualizer.last_snapshot().unwrap();
        assert_eq!(snapshot.phase, PhaseId::Cosmos);
        assert_eq!(snapshot.motion.opacity, 1.0);
    }

    #[test]
    fn render_errors_are_logged_and_the_loop_continues() {
        let mut visualizer = visualizer(Capabilities::default());
        let tick = visualizer.frame_with(0.0, true, |_| {
            Err(VisualizerError::RenderFrame("lost context".into()))
        });
        assert!(matches!(tick, FrameTick::Render { .. }));
        assert_eq!(visualizer.stats().render_errors, 1);

        run(&mut visualizer, 20, 500);
        assert!(visualizer.stats().frame_count > 1);
        assert_eq!(visualizer.stats().render_errors, 1);
    }

    #[test]
    fn reduced_motion_disables_idle_motion_and_auto_start() {
        let visualizer = PhaseVisualizer::new(
            &config(),
            DeviceProbe {
                is_mobile: true,
                reduced_motion: true,
            },
            Capabilities::default(),
            RecordingGraph::default(),
            0.0,
        )
        .unwrap();
        assert!(!visualizer.capabilities().idle_motion);
        assert!(!visualizer.stats().is_auto_transitioning);
    }

    #[test]
    fn invalid_config_fails_initialisation() {
        let config = VisualizerConfig {
            target_fps: Some(0),
            ..config()
        };
        assert!(
            PhaseVisualizer::new(
                &config,
                DeviceProbe::default(),
                Capabilities::default(),
                RecordingGraph::default(),
                0.0,
            )
            .is_err()
        );
    }
}
