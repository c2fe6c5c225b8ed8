//! CPU-side material definitions.
//!
//! Provides [`CpuMaterial`], the GPU-agnostic description of a surface as
//! loaded from an asset: PBR factors, pipeline-facing flags, and an
//! optional base color texture with its resolved sampler
//! ([`MaterialTexture`]).

mod types;

pub use types::{CpuMaterial, MaterialTexture};
