//! Integration tests for drape-telemetry.

use drape_telemetry::bus::EventBus;
use drape_telemetry::events::{EventKind, SimulationEvent};
use drape_telemetry::sinks::{EventSink, JsonLinesSink, TracingSink, VecSink};

// ─── Bus Tests ────────────────────────────────────────────────

#[test]
fn emit_and_flush_reaches_sink() {
    let sink = VecSink::new();
    let recorded = sink.events();
    let mut bus = EventBus::new().with_sink(Box::new(sink));

    bus.emit(SimulationEvent::new(0, EventKind::TimestepBegin { sim_time: 0.0 }));
    bus.emit_kind(
        0,
        EventKind::TimestepEnd {
            iterations: 10,
            wall_time: 0.001,
        },
    );

    assert_eq!(bus.flush(), 2);
    let events = recorded.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EventKind::TimestepBegin { sim_time: 0.0 });
}

#[test]
fn disabled_bus_drops_events() {
    let sink = VecSink::new();
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(sink.clone()));
    bus.set_enabled(false);
    assert!(!bus.is_enabled());

    bus.emit_kind(0, EventKind::Skipped);
    assert_eq!(bus.flush(), 0);
    assert!(sink.snapshot().is_empty());
}

#[test]
fn multiple_sinks_each_see_every_event() {
    let a = VecSink::new();
    let b = VecSink::new();
    let mut bus = EventBus::new()
        .with_sink(Box::new(a.clone()))
        .with_sink(Box::new(b.clone()))
        .with_sink(Box::new(TracingSink::new(tracing::Level::DEBUG)));
    assert_eq!(bus.sink_count(), 3);
    assert_eq!(bus.sink_names(), vec!["vec_sink", "vec_sink", "tracing_sink"]);

    bus.emit_kind(3, EventKind::ProjectionPass { iteration: 1 });
    bus.flush();
    assert_eq!(a.snapshot().len(), 1);
    assert_eq!(b.snapshot().len(), 1);
}

// ─── Event Tests ──────────────────────────────────────────────

#[test]
fn event_serialization() {
    let event = SimulationEvent::new(5, EventKind::Energy { kinetic: 1.5 });
    let json = serde_json::to_string(&event).unwrap();
    let recovered: SimulationEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, event);
}

#[test]
fn coloring_event_fields() {
    let event = SimulationEvent::new(
        0,
        EventKind::Coloring {
            body: "cloth".into(),
            classes: 6,
            constraints: 56,
            largest_class: 12,
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("largest_class"));
}

// ─── JSON Lines Tests ─────────────────────────────────────────

#[test]
fn json_lines_one_event_per_line() {
    let mut sink = JsonLinesSink::new(Vec::<u8>::new());
    sink.handle(&SimulationEvent::new(0, EventKind::Skipped));
    sink.handle(&SimulationEvent::new(1, EventKind::Energy { kinetic: 0.25 }));
    sink.finalize();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let second: SimulationEvent = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second.timestep, 1);
}

#[test]
fn finish_flushes_pending_events() {
    let sink = VecSink::new();
    let mut bus = EventBus::new().with_sink(Box::new(sink.clone()));
    bus.emit_kind(7, EventKind::Skipped);
    bus.finish();
    assert_eq!(sink.snapshot()[0].timestep, 7);
}
