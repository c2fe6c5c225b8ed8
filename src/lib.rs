//! # Nocturne Engine Core
//!
//! CPU-side asset and scene types for the Nocturne demo engine, plus the
//! glTF 2.0 scene loader that produces them.

pub mod gltf;
pub mod material;
pub mod math;
pub mod mesh;
pub mod sampler;
pub mod scene;
pub mod texture;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder for future engine bring-up
pub fn init() {
    log::info!("Nocturne Core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
