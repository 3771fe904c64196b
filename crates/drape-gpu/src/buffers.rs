//! Dense state vectors shared by the solver and dispatchers.
//!
//! One buffer holds three scalars per particle for every body in the
//! simulation, addressed by DOF offset.

use drape_types::{DrapeError, DrapeResult};

/// A dense `f32` vector sized to the total DOF count.
///
/// In the CPU executors this is simply a `Vec<f32>`. A device backend
/// would mirror it into a storage buffer of the same layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeBuffer {
    data: Vec<f32>,
}

impl ComputeBuffer {
    /// Creates a new buffer filled with zeros.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    /// Creates a buffer from existing data.
    pub fn from_data(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Overwrites the whole buffer with `src`.
    pub fn copy_from_slice(&mut self, src: &[f32]) -> DrapeResult<()> {
        if src.len() != self.data.len() {
            return Err(DrapeError::Dispatch(format!(
                "buffer copy length mismatch: {} into {}",
                src.len(),
                self.data.len()
            )));
        }
        self.data.copy_from_slice(src);
        Ok(())
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// `self[i] = a[i] + scale * b[i]`.
    pub fn assign_axpy(&mut self, a: &[f32], b: &[f32], scale: f32) -> DrapeResult<()> {
        if a.len() != self.data.len() || b.len() != self.data.len() {
            return Err(DrapeError::Dispatch("AXPY buffer length mismatch".into()));
        }
        for ((out, &ai), &bi) in self.data.iter_mut().zip(a).zip(b) {
            *out = ai + scale * bi;
        }
        Ok(())
    }

    /// `self[i] += scale * a[i] * b[i]`, the element-wise update used for
    /// `v += dt * w * f`.
    pub fn add_scaled_product(&mut self, a: &[f32], b: &[f32], scale: f32) -> DrapeResult<()> {
        if a.len() != self.data.len() || b.len() != self.data.len() {
            return Err(DrapeError::Dispatch(
                "scaled product buffer length mismatch".into(),
            ));
        }
        for ((out, &ai), &bi) in self.data.iter_mut().zip(a).zip(b) {
            *out += scale * ai * bi;
        }
        Ok(())
    }
}
