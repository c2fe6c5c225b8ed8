//! CPU-side texture data.

/// Pixel format of a [`CpuTexture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    /// 8-bit per channel RGBA, linear.
    #[default]
    Rgba8Unorm,
    /// 8-bit per channel RGBA, sRGB.
    Rgba8UnormSrgb,
}

impl TextureFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgba8Unorm | Self::Rgba8UnormSrgb => 4,
        }
    }
}

/// A CPU-side texture holding decoded pixel data.
///
/// This is the GPU-agnostic representation of an image: raw pixels plus
/// dimensions and format. Upload to the GPU happens elsewhere.
#[derive(Debug, Clone)]
pub struct CpuTexture {
    /// Texture name.
    pub name: Option<String>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: TextureFormat,
    /// Raw pixel bytes (`width * height * bytes_per_pixel`).
    pub data: Vec<u8>,
}

impl CpuTexture {
    /// Create a new RGBA8 texture from raw pixel data.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            name: None,
            width,
            height,
            format: TextureFormat::Rgba8Unorm,
            data,
        }
    }

    /// Set the texture name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_size() {
        let t = CpuTexture::new_rgba8(2, 2, vec![0u8; 16]);
        assert_eq!(
            t.data.len(),
            (t.width * t.height) as usize * t.format.bytes_per_pixel()
        );
    }
}
