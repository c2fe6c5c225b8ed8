//! CPU-side sampler types and filter/address mode definitions.

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Nearest neighbor filtering.
    #[default]
    Nearest,
    /// Linear filtering.
    Linear,
}

/// Texture address mode (wrapping behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Clamp to edge.
    #[default]
    ClampToEdge,
    /// Repeat.
    Repeat,
    /// Mirrored repeat.
    MirrorRepeat,
}

/// CPU-side sampler configuration.
///
/// Describes how a texture is sampled: filtering, per-axis address modes,
/// and anisotropic filtering level. This is a format-agnostic descriptor
/// separate from any GPU resource.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuSampler {
    /// Sampler name.
    pub name: Option<String>,
    /// Address mode for the U coordinate.
    pub wrap_u: AddressMode,
    /// Address mode for the V coordinate.
    pub wrap_v: AddressMode,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Minification filter.
    pub min_filter: FilterMode,
    /// Maximum anisotropy level.
    pub anisotropy: f32,
}

impl CpuSampler {
    /// Create a linear filtering sampler.
    pub fn linear() -> Self {
        Self {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..Default::default()
        }
    }

    /// Create a nearest neighbor filtering sampler.
    pub fn nearest() -> Self {
        Self::default()
    }

    /// Set the sampler name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the address mode for both coordinates.
    pub fn with_wrap(mut self, mode: AddressMode) -> Self {
        self.wrap_u = mode;
        self.wrap_v = mode;
        self
    }

    /// Set the anisotropic filtering level.
    pub fn with_anisotropy(mut self, level: f32) -> Self {
        self.anisotropy = level;
        self
    }
}

impl Default for CpuSampler {
    fn default() -> Self {
        Self {
            name: None,
            wrap_u: AddressMode::ClampToEdge,
            wrap_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            anisotropy: 1.0,
        }
    }
}
