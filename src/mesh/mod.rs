//! CPU-side mesh types.
//!
//! This module provides GPU-agnostic mesh data structures:
//!
//! - [`VertexStream`] - One vertex buffer with its format and attribute names
//! - [`CpuMesh`] - CPU-side mesh data (vertex streams, index stream, bounds)
//! - [`PrimitiveTopology`] / [`IndexFormat`] - Draw configuration enums
//! - [`Aabb`] - Axis-aligned bounding box

mod data;

pub use data::{Aabb, CpuMesh, IndexFormat, PrimitiveTopology, VertexStream};
