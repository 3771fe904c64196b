//! Integration tests for drape-gpu.

use drape_gpu::batch::ColorBatch;
use drape_gpu::buffers::ComputeBuffer;
use drape_gpu::dispatcher::{ColorDispatcher, SequentialDispatcher};
use drape_gpu::parallel::RayonDispatcher;
use drape_types::{ColorId, DrapeError};

fn distance(positions: &[f32], a: usize, b: usize) -> f32 {
    let dx = positions[a * 3] - positions[b * 3];
    let dy = positions[a * 3 + 1] - positions[b * 3 + 1];
    let dz = positions[a * 3 + 2] - positions[b * 3 + 2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// `n` disjoint stretched pairs along X: particle 2k at the origin row,
/// particle 2k+1 two units away, rest length one.
fn stretched_pairs(n: usize) -> (Vec<f32>, ColorBatch) {
    let mut positions = Vec::with_capacity(n * 6);
    let mut batch = ColorBatch::new(ColorId(0));
    for k in 0..n {
        let y = k as f32 * 0.1;
        positions.extend_from_slice(&[0.0, y, 0.0, 2.0, y, 0.3 * k as f32]);
        batch.push(2 * k as u32, 2 * k as u32 + 1, 1.0, 1.0, 1.0);
    }
    (positions, batch)
}

// ─── Buffer Tests ─────────────────────────────────────────────

#[test]
fn buffer_zeros() {
    let buf = ComputeBuffer::zeros(100);
    assert_eq!(buf.len(), 100);
    assert!(buf.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn buffer_copy_checks_length() {
    let mut buf = ComputeBuffer::zeros(3);
    buf.copy_from_slice(&[7.0, 8.0, 9.0]).unwrap();
    assert_eq!(buf.as_slice(), &[7.0, 8.0, 9.0]);
    assert!(buf.copy_from_slice(&[1.0]).is_err());
}

#[test]
fn buffer_assign_axpy() {
    let mut out = ComputeBuffer::zeros(3);
    out.assign_axpy(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], 2.0).unwrap();
    assert_eq!(out.as_slice(), &[9.0, 12.0, 15.0]);
    assert!(out.assign_axpy(&[1.0], &[1.0, 2.0, 3.0], 1.0).is_err());
}

#[test]
fn buffer_add_scaled_product() {
    let mut v = ComputeBuffer::from_data(vec![1.0, 1.0]);
    v.add_scaled_product(&[0.5, 0.0], &[-9.8, -9.8], 0.1).unwrap();
    assert!((v.as_slice()[0] - (1.0 - 0.49)).abs() < 1e-6);
    assert_eq!(v.as_slice()[1], 1.0);
}

#[test]
fn buffer_fill() {
    let mut buf = ComputeBuffer::zeros(5);
    buf.fill(3.5);
    assert!(buf.as_slice().iter().all(|&x| x == 3.5));
}

// ─── Batch Tests ──────────────────────────────────────────────

#[test]
fn batch_layout() {
    let mut batch = ColorBatch::with_capacity(ColorId(2), 2);
    batch.push(0, 1, 0.5, 1.0, 0.0);
    batch.push(4, 7, 0.25, 2.0, 3.0);

    assert_eq!(batch.count(), 2);
    assert_eq!(batch.indices, vec![0, 1, 4, 7]);
    assert_eq!(batch.pair(1), [4, 7]);
    assert_eq!(batch.params(1), [0.25, 2.0, 3.0]);
    assert!(batch.is_conflict_free());
}

#[test]
fn batch_conflict_detection() {
    let mut batch = ColorBatch::new(ColorId(0));
    batch.push(0, 1, 1.0, 1.0, 1.0);
    batch.push(1, 2, 1.0, 1.0, 1.0);
    assert!(!batch.is_conflict_free());
}

#[test]
fn batch_validate_catches_out_of_range_particle() {
    let mut batch = ColorBatch::new(ColorId(0));
    batch.push(0, 5, 1.0, 1.0, 1.0);
    assert!(batch.validate(6).is_ok());
    assert!(matches!(batch.validate(5), Err(DrapeError::Dispatch(_))));
}

#[test]
fn batch_validate_catches_ragged_data() {
    let mut batch = ColorBatch::new(ColorId(0));
    batch.push(0, 1, 1.0, 1.0, 1.0);
    batch.data.pop();
    assert!(batch.validate(2).is_err());
}

// ─── SequentialDispatcher Tests ───────────────────────────────

#[test]
fn sequential_init() {
    let mut dispatcher = SequentialDispatcher::new();
    assert!(!dispatcher.is_initialized());
    dispatcher.init().unwrap();
    assert!(dispatcher.is_initialized());
    assert_eq!(dispatcher.name(), "sequential");
    assert!(!dispatcher.is_parallel());
}

#[test]
fn sequential_restores_rest_lengths() {
    let (mut positions, batch) = stretched_pairs(4);
    SequentialDispatcher::new().dispatch(&mut positions, &batch).unwrap();
    for k in 0..4 {
        assert!((distance(&positions, 2 * k, 2 * k + 1) - 1.0).abs() < 1e-5);
    }
}

#[test]
fn sequential_respects_fixed_particle() {
    let mut positions = vec![0.0, 0.0, 0.0, 3.0, 0.0, 0.0];
    let mut batch = ColorBatch::new(ColorId(0));
    batch.push(0, 1, 1.0, 0.0, 1.0);

    SequentialDispatcher::new().dispatch(&mut positions, &batch).unwrap();
    assert_eq!(&positions[0..3], &[0.0, 0.0, 0.0]);
    assert!((positions[3] - 1.0).abs() < 1e-6);
}

#[test]
fn dispatch_rejects_out_of_range_batch() {
    let mut positions = vec![0.0; 6];
    let mut batch = ColorBatch::new(ColorId(0));
    batch.push(0, 2, 1.0, 1.0, 1.0);

    let result = SequentialDispatcher::new().dispatch(&mut positions, &batch);
    assert!(matches!(result, Err(DrapeError::Dispatch(_))));
    assert!(positions.iter().all(|&x| x == 0.0));
}

#[test]
fn dispatch_rejects_ragged_positions() {
    let mut positions = vec![0.0; 7];
    let batch = ColorBatch::new(ColorId(0));
    assert!(SequentialDispatcher::new().dispatch(&mut positions, &batch).is_err());
}

// ─── RayonDispatcher Tests ────────────────────────────────────

#[test]
fn rayon_matches_sequential_bitwise() {
    let (mut seq, batch) = stretched_pairs(1000);
    let mut par = seq.clone();

    SequentialDispatcher::new().dispatch(&mut seq, &batch).unwrap();

    let mut rayon = RayonDispatcher::new().with_min_parallel_batch(0);
    rayon.init().unwrap();
    rayon.dispatch(&mut par, &batch).unwrap();

    assert_eq!(seq, par);
}

#[test]
fn rayon_dedicated_pool() {
    let (mut positions, batch) = stretched_pairs(300);
    let mut rayon = RayonDispatcher::with_threads(2);
    rayon.init().unwrap();
    assert_eq!(rayon.thread_count(), 2);
    assert!(rayon.is_parallel());

    rayon.dispatch(&mut positions, &batch).unwrap();
    for k in 0..300 {
        assert!((distance(&positions, 2 * k, 2 * k + 1) - 1.0).abs() < 1e-5);
    }
}

#[test]
fn rayon_small_batch_falls_back() {
    let (mut seq, batch) = stretched_pairs(3);
    let mut par = seq.clone();

    SequentialDispatcher::new().dispatch(&mut seq, &batch).unwrap();
    RayonDispatcher::new().dispatch(&mut par, &batch).unwrap();
    assert_eq!(seq, par);
}

#[test]
fn rayon_validates_before_projecting() {
    let mut positions = vec![0.0; 6];
    let mut batch = ColorBatch::new(ColorId(0));
    batch.push(0, 9, 1.0, 1.0, 1.0);
    let result = RayonDispatcher::new().dispatch(&mut positions, &batch);
    assert!(matches!(result, Err(DrapeError::Dispatch(_))));
}
