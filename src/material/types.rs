//! Material data types for CPU-side material definitions.

use std::sync::Arc;

use crate::sampler::CpuSampler;
use crate::texture::CpuTexture;

/// A base color texture paired with its resolved sampler.
///
/// Textures are shared via `Arc` because several materials may reference
/// the same decoded image.
#[derive(Debug, Clone)]
pub struct MaterialTexture {
    /// Decoded pixel data.
    pub texture: Arc<CpuTexture>,
    /// Sampler configuration, if the asset specified one.
    pub sampler: Option<Arc<CpuSampler>>,
}

/// CPU-side material definition.
///
/// Holds the PBR metallic-roughness factors consumed by the renderer plus
/// the double-sided pipeline flag and an optional base color texture.
#[derive(Debug, Clone)]
pub struct CpuMaterial {
    /// Material name.
    pub name: Option<String>,
    /// Base color factor (linear RGBA).
    pub base_color_factor: [f32; 4],
    /// Metallic factor.
    pub metallic_factor: f32,
    /// Emissive factor (linear RGB).
    pub emissive_factor: [f32; 3],
    /// Whether back faces are rendered.
    pub double_sided: bool,
    /// Base color texture with its sampler.
    pub base_color_texture: Option<MaterialTexture>,
}

impl CpuMaterial {
    /// Creates a new material with opaque white base color and no texture.
    pub fn new() -> Self {
        Self {
            name: None,
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            emissive_factor: [0.0, 0.0, 0.0],
            double_sided: true,
            base_color_texture: None,
        }
    }

    /// Set the material name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the base color factor.
    #[must_use]
    pub fn with_base_color(mut self, factor: [f32; 4]) -> Self {
        self.base_color_factor = factor;
        self
    }

    /// Set the metallic factor.
    #[must_use]
    pub fn with_metallic(mut self, factor: f32) -> Self {
        self.metallic_factor = factor;
        self
    }

    /// Set the emissive factor.
    #[must_use]
    pub fn with_emissive(mut self, factor: [f32; 3]) -> Self {
        self.emissive_factor = factor;
        self
    }

    /// Set the double-sided flag.
    #[must_use]
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// Set the base color texture.
    #[must_use]
    pub fn with_base_color_texture(mut self, texture: MaterialTexture) -> Self {
        self.base_color_texture = Some(texture);
        self
    }
}

impl Default for CpuMaterial {
    fn default() -> Self {
        Self::new()
    }
}
