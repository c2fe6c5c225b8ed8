//! Error types for glTF loading.

use std::path::PathBuf;

/// Errors that can occur during glTF loading.
///
/// Any of these aborts the whole load; there is no per-primitive or
/// per-node recovery.
#[derive(Debug)]
pub enum GltfError {
    /// I/O failure reading the asset or a referenced file.
    Io(std::io::Error),
    /// Failed to parse the JSON metadata.
    Json(serde_json::Error),
    /// Malformed container: bad magic, bad chunk tag, truncated data.
    Format(String),
    /// `asset.version` is not the supported `"2.0"`.
    UnsupportedVersion(String),
    /// A required or used extension is not in the supported allow-list.
    UnsupportedExtension(String),
    /// A referenced external buffer file does not exist.
    MissingBufferFile(PathBuf),
    /// A referenced external image file does not exist.
    MissingImageFile(PathBuf),
    /// An accessor's byte range exceeds its buffer view.
    AccessorRange {
        /// Accessor index in the document.
        accessor: usize,
        /// Bytes the accessor needs.
        needed: usize,
        /// Bytes the buffer view provides past the accessor offset.
        available: usize,
    },
    /// A primitive draw mode outside the supported set.
    DrawMode(u32),
    /// An accessor component type outside the supported set.
    UnsupportedComponentType(u32),
    /// A primitive is missing position data.
    MissingPositions {
        /// Mesh index in the document.
        mesh: usize,
        /// Primitive index within the mesh.
        primitive: usize,
    },
    /// A dangling or absent cross-reference between document records.
    Accessor(String),
    /// Buffer-level inconsistency (missing blob, view overrun, short data).
    Buffer(String),
    /// Failed to decode an image.
    ImageDecode(String),
}

impl std::fmt::Display for GltfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Json(e) => write!(f, "metadata parse error: {e}"),
            Self::Format(msg) => write!(f, "container format error: {msg}"),
            Self::UnsupportedVersion(v) => {
                write!(f, "unsupported glTF version {v:?} (expected \"2.0\")")
            }
            Self::UnsupportedExtension(name) => {
                write!(f, "unsupported glTF extension: {name}")
            }
            Self::MissingBufferFile(path) => {
                write!(f, "buffer file not found: {}", path.display())
            }
            Self::MissingImageFile(path) => {
                write!(f, "image file not found: {}", path.display())
            }
            Self::AccessorRange {
                accessor,
                needed,
                available,
            } => write!(
                f,
                "accessor {accessor} needs {needed} bytes but its view has {available}"
            ),
            Self::DrawMode(mode) => write!(f, "unsupported draw mode: {mode}"),
            Self::UnsupportedComponentType(ty) => {
                write!(f, "unsupported component type: {ty}")
            }
            Self::MissingPositions { mesh, primitive } => {
                write!(
                    f,
                    "mesh {mesh} primitive {primitive} has no POSITION attribute"
                )
            }
            Self::Accessor(msg) => write!(f, "accessor error: {msg}"),
            Self::Buffer(msg) => write!(f, "buffer error: {msg}"),
            Self::ImageDecode(msg) => write!(f, "image decode error: {msg}"),
        }
    }
}

impl std::error::Error for GltfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GltfError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for GltfError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
