//! Integration tests for drape-types.

use drape_types::{ColorId, DrapeError, ParticleId};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn particle_id_index() {
    let id = ParticleId(42);
    assert_eq!(id.index(), 42);
}

#[test]
fn color_ids_order_by_value() {
    let mut ids = vec![ColorId(3), ColorId(0), ColorId(2)];
    ids.sort();
    assert_eq!(ids, vec![ColorId(0), ColorId(2), ColorId(3)]);
}

#[test]
fn particle_id_from_u32() {
    let id: ParticleId = 7u32.into();
    assert_eq!(id, ParticleId(7));
}

#[test]
fn ids_are_serializable() {
    let id = ParticleId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: ParticleId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let err = DrapeError::InvalidMesh("index 12 out of range".into());
    assert!(err.to_string().contains("index 12 out of range"));
}

#[test]
fn not_initialized_display() {
    let err = DrapeError::NotInitialized("simulation");
    assert_eq!(err.to_string(), "Not initialized: simulation");
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
    let err: DrapeError = io.into();
    assert!(matches!(err, DrapeError::Io(_)));
}
