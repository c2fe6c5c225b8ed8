//! CPU-side sampler types.
//!
//! Provides [`CpuSampler`] for describing texture sampling parameters,
//! along with [`FilterMode`] and [`AddressMode`] enums shared between
//! CPU and GPU code.

mod types;

pub use types::{AddressMode, CpuSampler, FilterMode};
