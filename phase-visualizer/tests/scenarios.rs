use phase_visualizer::engine::animation::Capabilities;
use phase_visualizer::engine::controller::{GraphEvent, RecordingGraph, TransitionRequest};
use phase_visualizer::engine::core::config::VisualizerConfig;
use phase_visualizer::engine::device::{DeviceProbe, DeviceTier};
use phase_visualizer::engine::phases::{PhaseId, PhaseRegistry};
use phase_visualizer::engine::resources::ResourceBuilder;
use phase_visualizer::engine::systems::frame_scheduler::FrameTick;
use phase_visualizer::{PhaseVisualizer, VisualizerError};

const FRAME_MS: f64 = 1000.0 / 120.0;

fn config() -> VisualizerConfig {
    VisualizerConfig {
        seed: Some(42),
        target_fps: Some(60),
        ..Default::default()
    }
}

fn visualizer_with(
    config: &VisualizerConfig,
    capabilities: Capabilities,
) -> PhaseVisualizer<RecordingGraph> {
    PhaseVisualizer::new(
        config,
        DeviceProbe::default(),
        capabilities,
        RecordingGraph::default(),
        0.0,
    )
    .unwrap()
}

/// Call `frame` at a 120 Hz host rate over `[from, to)` and return the end time.
fn run(visualizer: &mut PhaseVisualizer<RecordingGraph>, from: f64, to: f64, visible: bool) -> f64 {
    let mut now = from;
    while now < to {
        visualizer.frame(now, visible);
        now += FRAME_MS;
    }
    now
}

#[test]
fn particle_counts_follow_device_tier() {
    let registry = PhaseRegistry::standard();
    let neuron = registry.get(PhaseId::Neuron).unwrap();
    let mut builder = ResourceBuilder::with_seed(1);

    let mobile = builder.build(neuron, DeviceTier::Mobile).unwrap();
    let desktop = builder.build(neuron, DeviceTier::Desktop).unwrap();
    assert_eq!(mobile.particle_count(), 40);
    assert_eq!(desktop.particle_count(), 120);
}

#[test]
fn four_next_phase_calls_return_to_the_start() {
    let mut visualizer = visualizer_with(&config(), Capabilities::immediate());
    for _ in 0..4 {
        visualizer.next_phase(0.0).unwrap();
    }
    assert_eq!(visualizer.stats().current_phase_id, PhaseId::Neuron);

    let mut visualizer = visualizer_with(&config(), Capabilities::default());
    let mut now = 0.0;
    for _ in 0..4 {
        visualizer.next_phase(now).unwrap();
        now = run(&mut visualizer, now, now + 50.0, true);
    }
    run(&mut visualizer, now, now + 10_000.0, true);
    assert_eq!(visualizer.stats().current_phase_id, PhaseId::Neuron);
    assert!(!visualizer.stats().is_transitioning);
}

#[test]
fn frames_resume_after_the_page_is_hidden() {
    let mut visualizer = visualizer_with(&config(), Capabilities::default());
    let now = run(&mut visualizer, 0.0, 1000.0, true);
    let before_hidden = visualizer.stats().frame_count;

    let now = run(&mut visualizer, now, now + 3000.0, false);
    assert_eq!(visualizer.stats().frame_count, before_hidden);
    assert!(visualizer.scheduler().is_parked());

    run(&mut visualizer, now, now + 500.0, true);
    assert!(visualizer.stats().frame_count > before_hidden);
}

#[test]
fn destroy_stops_frames_and_auto_transition() {
    let mut visualizer = visualizer_with(&config(), Capabilities::default());
    let now = run(&mut visualizer, 0.0, 500.0, true);
    visualizer.destroy();

    let stats = visualizer.stats();
    assert!(!stats.is_auto_transitioning);

    let mut now = now;
    for _ in 0..100 {
        assert_eq!(visualizer.frame(now, true), FrameTick::Stopped);
        now += FRAME_MS;
    }
    assert_eq!(visualizer.stats().frame_count, stats.frame_count);
    assert_eq!(visualizer.graph().resident_count(), 0);

    // Second destroy and later calls are no-ops.
    visualizer.destroy();
    assert_eq!(
        visualizer.go_to_phase(PhaseId::Cosmos, now).unwrap(),
        TransitionRequest::Ignored
    );
    assert!(!visualizer.toggle_auto_transition(now));
}

#[test]
fn rendered_frames_stay_within_the_budget() {
    let mut visualizer = visualizer_with(&config(), Capabilities::default());
    let mut now = 0.0;
    while now < 1000.0 {
        visualizer.frame(now, true);
        now += 1.0;
    }
    assert!(visualizer.stats().frame_count <= 61);
}

#[test]
fn latest_request_wins_while_a_transition_is_in_flight() {
    let mut visualizer = visualizer_with(&config(), Capabilities::default());
    assert_eq!(
        visualizer.go_to_phase(PhaseId::Brain, 0.0).unwrap(),
        TransitionRequest::Started
    );
    assert_eq!(
        visualizer.go_to_phase(PhaseId::Network, 10.0).unwrap(),
        TransitionRequest::Queued
    );
    assert_eq!(
        visualizer.go_to_phase(PhaseId::Cosmos, 20.0).unwrap(),
        TransitionRequest::Queued
    );

    run(&mut visualizer, 0.0, 2100.0, true);
    assert_eq!(visualizer.stats().current_phase_id, PhaseId::Brain);
    assert_eq!(visualizer.stats().transition_target, Some(PhaseId::Cosmos));

    run(&mut visualizer, 2100.0, 4500.0, true);
    assert_eq!(visualizer.stats().current_phase_id, PhaseId::Cosmos);
    let visited: Vec<PhaseId> = visualizer
        .graph()
        .events()
        .iter()
        .filter_map(|event| match event {
            GraphEvent::Added { phase, .. } => Some(*phase),
            GraphEvent::Removed { .. } => None,
        })
        .collect();
    assert_eq!(visited, vec![PhaseId::Neuron, PhaseId::Brain, PhaseId::Cosmos]);
}

#[test]
fn requesting_the_in_flight_target_drops_the_queue() {
    let mut visualizer = visualizer_with(&config(), Capabilities::default());
    visualizer.go_to_phase(PhaseId::Brain, 0.0).unwrap();
    visualizer.go_to_phase(PhaseId::Cosmos, 0.0).unwrap();
    assert_eq!(
        visualizer.go_to_phase(PhaseId::Brain, 0.0).unwrap(),
        TransitionRequest::Ignored
    );

    run(&mut visualizer, 0.0, 5000.0, true);
    assert_eq!(visualizer.stats().current_phase_id, PhaseId::Brain);
}

#[test]
fn auto_timer_waits_for_manual_transitions() {
    let config = VisualizerConfig {
        auto_transition_interval_ms: 1000.0,
        ..config()
    };
    let mut visualizer = visualizer_with(&config, Capabilities::default());
    visualizer.go_to_phase(PhaseId::Network, 900.0).unwrap();

    // Unpaused, the timer would fire at 1000 ms and queue another phase behind Network.
    run(&mut visualizer, 0.0, 2800.0, true);
    assert_eq!(visualizer.stats().current_phase_id, PhaseId::Network);
    assert!(!visualizer.stats().is_transitioning);
    assert!(visualizer.stats().is_auto_transitioning);
}

#[test]
fn restarting_auto_transition_keeps_a_manual_transition_in_charge() {
    let config = VisualizerConfig {
        auto_transition_interval_ms: 1000.0,
        ..config()
    };
    let mut visualizer = visualizer_with(&config, Capabilities::default());
    visualizer.go_to_phase(PhaseId::Network, 0.0).unwrap();
    assert!(!visualizer.toggle_auto_transition(10.0));
    assert!(visualizer.toggle_auto_transition(20.0));
    assert!(visualizer.auto_timer().is_suspended());

    // The restarted interval elapses at 1020 ms while Network is still fading in.
    let now = run(&mut visualizer, 0.0, 1500.0, true);
    assert_eq!(visualizer.stats().transition_target, Some(PhaseId::Network));
    assert_eq!(visualizer.controller().pending_target(), None);

    run(&mut visualizer, now, 2800.0, true);
    assert_eq!(visualizer.stats().current_phase_id, PhaseId::Network);
    assert!(!visualizer.stats().is_transitioning);
    assert!(visualizer.stats().is_auto_transitioning);
}

#[test]
fn a_failing_render_does_not_stop_the_loop() {
    let mut visualizer = visualizer_with(&config(), Capabilities::default());
    let mut now = 0.0;
    let mut calls = 0;
    while now < 1000.0 {
        visualizer.frame_with(now, true, |snapshot| {
            calls += 1;
            if snapshot.frame % 2 == 0 {
                Err(VisualizerError::RenderFrame("dropped".into()))
            } else {
                Ok(())
            }
        });
        now += FRAME_MS;
    }

    let stats = visualizer.stats();
    assert_eq!(stats.frame_count, calls);
    assert_eq!(stats.render_errors, calls / 2);
    assert!(stats.frame_count > 50);
}

#[test]
fn exactly_one_phase_is_resident_throughout() {
    let config = VisualizerConfig {
        auto_transition_interval_ms: 700.0,
        ..config()
    };
    let mut visualizer = visualizer_with(&config, Capabilities::default());
    let mut now = 0.0;
    while now < 20_000.0 {
        visualizer.frame(now, true);
        assert_eq!(visualizer.graph().resident_count(), 1);
        assert_eq!(
            visualizer.graph().resident_phases(),
            vec![visualizer.stats().current_phase_id]
        );
        now += FRAME_MS;
    }
}

#[test]
fn self_transition_is_a_no_op() {
    let mut visualizer = visualizer_with(&config(), Capabilities::default());
    let events_before = visualizer.graph().events().len();
    assert_eq!(
        visualizer.go_to_phase(PhaseId::Neuron, 0.0).unwrap(),
        TransitionRequest::Ignored
    );
    assert!(!visualizer.stats().is_transitioning);
    assert_eq!(visualizer.graph().events().len(), events_before);
}
