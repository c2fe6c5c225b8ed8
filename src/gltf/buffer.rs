//! Buffer resolution and typed accessor reading.
//!
//! Each glTF buffer is held in an explicit `Unopened | Opened` slot:
//! bytes are produced on first access (file read, data-URI decode, or the
//! embedded `.glb` chunk) and cached for the rest of the load. Accessor
//! reads validate their byte range against the owning view before any
//! slicing happens.

use std::path::{Path, PathBuf};

use super::document::Document;
use super::error::GltfError;

/// Typed component of an accessor element, with its byte width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComponentType {
    /// 5120: signed byte.
    I8,
    /// 5121: unsigned byte.
    U8,
    /// 5122: signed short.
    I16,
    /// 5123: unsigned short.
    U16,
    /// 5125: unsigned int.
    U32,
    /// 5126: float.
    F32,
}

impl ComponentType {
    /// Map a raw glTF component type constant, failing loudly on
    /// anything outside the supported set.
    pub fn from_gltf(raw: u32) -> Result<Self, GltfError> {
        match raw {
            5120 => Ok(Self::I8),
            5121 => Ok(Self::U8),
            5122 => Ok(Self::I16),
            5123 => Ok(Self::U16),
            5125 => Ok(Self::U32),
            5126 => Ok(Self::F32),
            other => Err(GltfError::UnsupportedComponentType(other)),
        }
    }

    /// Byte width of one component.
    pub fn size(&self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }
}

/// Where a buffer's bytes come from.
enum BufferSource {
    /// External file, resolved relative to the asset directory.
    File(PathBuf),
    /// base64 `data:` URI payload.
    DataUri(String),
    /// Embedded `.glb` binary chunk, available at construction.
    Embedded,
}

/// Lazy-open state of one buffer.
enum BufferData {
    Unopened,
    Opened(Vec<u8>),
}

struct BufferSlot {
    source: BufferSource,
    data: BufferData,
    declared_length: usize,
}

/// All buffers of a document, opened on first read and cached.
///
/// The store lives exactly as long as the load; it is dropped once every
/// accessor has been read.
pub(crate) struct BufferStore {
    slots: Vec<BufferSlot>,
}

impl BufferStore {
    /// Build slots for every document buffer.
    ///
    /// A binary chunk, when present, becomes buffer 0's data and
    /// overrides any URI on that buffer.
    pub fn new(document: &Document, base_dir: &Path, blob: Option<Vec<u8>>) -> Self {
        let mut slots = Vec::with_capacity(document.buffers.len());
        let mut blob = blob;

        for (index, buffer) in document.buffers.iter().enumerate() {
            let declared_length = buffer.byte_length;
            let slot = if index == 0 && blob.is_some() {
                BufferSlot {
                    source: BufferSource::Embedded,
                    data: BufferData::Opened(blob.take().unwrap()),
                    declared_length,
                }
            } else {
                let source = match &buffer.uri {
                    Some(uri) if is_data_uri(uri) => BufferSource::DataUri(uri.clone()),
                    Some(uri) => BufferSource::File(base_dir.join(uri)),
                    // validate() has already rejected uri-less buffers
                    // with no embedded chunk.
                    None => BufferSource::Embedded,
                };
                BufferSlot {
                    source,
                    data: BufferData::Unopened,
                    declared_length,
                }
            };
            slots.push(slot);
        }

        Self { slots }
    }

    /// Bytes of buffer `index`, opening it on first access.
    pub fn bytes(&mut self, index: usize) -> Result<&[u8], GltfError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| GltfError::Buffer(format!("buffer index {index} out of range")))?;

        if let BufferData::Unopened = slot.data {
            let bytes = match &slot.source {
                BufferSource::File(path) => {
                    log::debug!("opening buffer {index} from {}", path.display());
                    std::fs::read(path)?
                }
                BufferSource::DataUri(uri) => parse_data_uri(uri).ok_or_else(|| {
                    GltfError::Buffer(format!("buffer {index} has a malformed data URI"))
                })?,
                BufferSource::Embedded => {
                    return Err(GltfError::Buffer(format!(
                        "buffer {index} expects an embedded chunk but none was supplied"
                    )));
                }
            };
            if bytes.len() < slot.declared_length {
                return Err(GltfError::Buffer(format!(
                    "buffer {index} holds {} bytes but declares {}",
                    bytes.len(),
                    slot.declared_length
                )));
            }
            slot.data = BufferData::Opened(bytes);
        }

        match &slot.data {
            BufferData::Opened(bytes) => Ok(bytes),
            BufferData::Unopened => unreachable!("buffer opened above"),
        }
    }
}

/// Contiguous, tightly packed bytes of one accessor.
pub(crate) struct AccessorData {
    /// Components per element (SCALAR=1 .. VEC4=4).
    pub components: usize,
    /// Typed component kind.
    pub component_type: ComponentType,
    /// `count * components * component size` little-endian bytes.
    pub data: Vec<u8>,
}

/// Layout of an accessor over its view, computed once per read.
pub(crate) struct AccessorLayout {
    pub view: usize,
    pub components: usize,
    pub component_type: ComponentType,
    pub element_size: usize,
}

/// Resolve an accessor's layout and check its byte range against the
/// owning view. This must run before any slicing; violating data raises
/// [`GltfError::AccessorRange`] instead of reading out of bounds.
pub(crate) fn check_accessor_range(
    document: &Document,
    index: usize,
) -> Result<AccessorLayout, GltfError> {
    let accessor = document
        .accessors
        .get(index)
        .ok_or_else(|| GltfError::Accessor(format!("accessor index {index} out of range")))?;
    let view_index = accessor
        .buffer_view
        .ok_or_else(|| GltfError::Accessor(format!("accessor {index} has no buffer view")))?;
    let view = &document.buffer_views[view_index];

    let component_type = ComponentType::from_gltf(accessor.component_type)?;
    let components = accessor.element_type.components();
    let element_size = components * component_type.size();

    let available = view.byte_length.saturating_sub(accessor.byte_offset);
    let needed = match view.byte_stride {
        Some(stride) if stride != element_size && accessor.count > 0 => {
            (accessor.count - 1) * stride + element_size
        }
        _ => accessor.count * element_size,
    };
    if needed > available {
        return Err(GltfError::AccessorRange {
            accessor: index,
            needed,
            available,
        });
    }

    Ok(AccessorLayout {
        view: view_index,
        components,
        component_type,
        element_size,
    })
}

/// Read accessor `index` into tightly packed bytes.
///
/// The accessor's byte range is checked against its view before slicing;
/// a strided view is gathered through the stride into contiguous output.
pub(crate) fn read_accessor(
    document: &Document,
    store: &mut BufferStore,
    index: usize,
) -> Result<AccessorData, GltfError> {
    let layout = check_accessor_range(document, index)?;
    let accessor = &document.accessors[index];
    let view_index = layout.view;
    let view = &document.buffer_views[view_index];
    let components = layout.components;
    let component_type = layout.component_type;
    let element_size = layout.element_size;

    let slice = view_slice(document, store, view_index)?;
    let slice = &slice[accessor.byte_offset..];

    let data = match view.byte_stride {
        Some(stride) if stride != element_size => {
            let mut out = Vec::with_capacity(accessor.count * element_size);
            for i in 0..accessor.count {
                let start = i * stride;
                out.extend_from_slice(&slice[start..start + element_size]);
            }
            out
        }
        _ => slice[..accessor.count * element_size].to_vec(),
    };

    Ok(AccessorData {
        components,
        component_type,
        data,
    })
}

/// Raw bytes of a strided block inside a view: `count * stride` bytes
/// starting at `offset` within the view. Used for interleaved vertex
/// groups, which hand the whole stride block to the GPU unchanged.
pub(crate) fn read_view_block(
    document: &Document,
    store: &mut BufferStore,
    view_index: usize,
    offset: usize,
    count: usize,
    stride: usize,
) -> Result<Vec<u8>, GltfError> {
    let view = &document.buffer_views[view_index];
    let needed = count * stride;
    let available = view.byte_length.saturating_sub(offset);
    if needed > available {
        return Err(GltfError::Buffer(format!(
            "interleaved block needs {needed} bytes at offset {offset} but view \
             {view_index} has {available}"
        )));
    }
    let slice = view_slice(document, store, view_index)?;
    Ok(slice[offset..offset + needed].to_vec())
}

/// Owned copy of a whole view's bytes (used for embedded images).
pub(crate) fn read_view_bytes(
    document: &Document,
    store: &mut BufferStore,
    view_index: usize,
) -> Result<Vec<u8>, GltfError> {
    Ok(view_slice(document, store, view_index)?.to_vec())
}

/// Bytes of a whole view, validated against the underlying buffer.
fn view_slice<'a>(
    document: &Document,
    store: &'a mut BufferStore,
    view_index: usize,
) -> Result<&'a [u8], GltfError> {
    let view = &document.buffer_views[view_index];
    let buffer = store.bytes(view.buffer)?;
    let end = view.byte_offset + view.byte_length;
    if end > buffer.len() {
        return Err(GltfError::Buffer(format!(
            "buffer view {view_index} spans {}..{end} but buffer {} has {} bytes",
            view.byte_offset,
            view.buffer,
            buffer.len()
        )));
    }
    Ok(&buffer[view.byte_offset..end])
}

/// Whether a URI embeds its payload inline.
pub(crate) fn is_data_uri(uri: &str) -> bool {
    uri.starts_with("data:")
}

/// Parse a data URI (e.g., `data:application/octet-stream;base64,...`)
/// and return the decoded bytes.
pub(crate) fn parse_data_uri(uri: &str) -> Option<Vec<u8>> {
    if !is_data_uri(uri) {
        return None;
    }
    let rest = &uri["data:".len()..];
    let base64_start = rest.find(";base64,")?;
    let encoded = &rest[base64_start + 8..];
    base64_decode(encoded)
}

/// Simple base64 decoder (avoids adding a dependency).
fn base64_decode(input: &str) -> Option<Vec<u8>> {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    fn decode_char(c: u8) -> Option<u8> {
        TABLE.iter().position(|&b| b == c).map(|p| p as u8)
    }

    let input: Vec<u8> = input
        .bytes()
        .filter(|&b| b != b'\n' && b != b'\r' && b != b' ')
        .collect();
    let mut result = Vec::with_capacity(input.len() * 3 / 4);

    for chunk in input.chunks(4) {
        let mut buf = [0u8; 4];
        let mut pad = 0;

        for (i, &byte) in chunk.iter().enumerate() {
            if byte == b'=' {
                pad += 1;
                buf[i] = 0;
            } else {
                buf[i] = decode_char(byte)?;
            }
        }

        result.push((buf[0] << 2) | (buf[1] >> 4));
        if pad < 2 {
            result.push((buf[1] << 4) | (buf[2] >> 2));
        }
        if pad < 1 {
            result.push((buf[2] << 6) | buf[3]);
        }
    }

    Some(result)
}
