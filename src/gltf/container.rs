//! glTF container parsing.
//!
//! Dispatches on the file extension: `.gltf` is plain UTF-8 JSON, `.glb`
//! is the binary container (12-byte header followed by exactly two
//! chunks, JSON metadata then the embedded binary buffer). Any structural
//! mismatch is fatal; the JSON text is never parsed from a container that
//! fails these checks.

use std::path::Path;

use super::error::GltfError;

/// Magic bytes at the start of every binary glTF file.
const GLB_MAGIC: &[u8; 4] = b"glTF";
/// Container version this loader understands.
const GLB_VERSION: u32 = 2;
/// Chunk type tag for the JSON metadata chunk.
const CHUNK_JSON: &[u8; 4] = b"JSON";
/// Chunk type tag for the binary buffer chunk.
const CHUNK_BIN: &[u8; 4] = b"BIN\0";

/// Raw content of a glTF asset before metadata parsing.
#[derive(Debug)]
pub(crate) struct RawAsset {
    /// UTF-8 JSON metadata text.
    pub json: String,
    /// Embedded binary chunk (`.glb` only).
    pub blob: Option<Vec<u8>>,
}

/// Read a `.gltf` or `.glb` file, dispatching on its extension.
pub(crate) fn read_asset(path: &Path) -> Result<RawAsset, GltfError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("glb") => {
            let bytes = std::fs::read(path)?;
            parse_glb(&bytes)
        }
        Some("gltf") => {
            let json = std::fs::read_to_string(path)?;
            Ok(RawAsset { json, blob: None })
        }
        other => Err(GltfError::Format(format!(
            "unrecognized asset extension: {other:?}"
        ))),
    }
}

/// Parse a binary glTF container from raw bytes.
///
/// Layout (all integers little-endian u32): magic `glTF`, version (must
/// be 2), total length, then chunk 0 (`JSON`) and chunk 1 (`BIN\0`),
/// each as length + type tag + data.
pub(crate) fn parse_glb(bytes: &[u8]) -> Result<RawAsset, GltfError> {
    if bytes.len() < 12 {
        return Err(GltfError::Format(format!(
            "container header truncated: {} bytes",
            bytes.len()
        )));
    }

    if &bytes[0..4] != GLB_MAGIC {
        return Err(GltfError::Format(format!(
            "bad magic: {:?}",
            &bytes[0..4]
        )));
    }

    let version = read_u32(bytes, 4);
    if version != GLB_VERSION {
        return Err(GltfError::Format(format!(
            "unsupported container version {version} (expected {GLB_VERSION})"
        )));
    }

    let total_length = read_u32(bytes, 8) as usize;
    if total_length > bytes.len() {
        return Err(GltfError::Format(format!(
            "declared length {total_length} exceeds file size {}",
            bytes.len()
        )));
    }

    let (json_data, next) = read_chunk(bytes, 12, CHUNK_JSON)?;
    let (bin_data, _) = read_chunk(bytes, next, CHUNK_BIN)?;

    let json = String::from_utf8(json_data.to_vec())
        .map_err(|e| GltfError::Format(format!("metadata chunk is not UTF-8: {e}")))?;

    Ok(RawAsset {
        json,
        blob: Some(bin_data.to_vec()),
    })
}

/// Read one chunk at `offset`, checking its type tag.
///
/// Returns the chunk data and the offset of the next chunk.
fn read_chunk<'a>(
    bytes: &'a [u8],
    offset: usize,
    expected_tag: &[u8; 4],
) -> Result<(&'a [u8], usize), GltfError> {
    if offset + 8 > bytes.len() {
        return Err(GltfError::Format(format!(
            "chunk header truncated at offset {offset}"
        )));
    }

    let length = read_u32(bytes, offset) as usize;
    let tag = &bytes[offset + 4..offset + 8];
    if tag != expected_tag {
        return Err(GltfError::Format(format!(
            "bad chunk type tag {:?} (expected {:?})",
            tag, expected_tag
        )));
    }

    let start = offset + 8;
    let end = start + length;
    if end > bytes.len() {
        return Err(GltfError::Format(format!(
            "chunk data truncated: {length} bytes declared at offset {start}"
        )));
    }

    Ok((&bytes[start..end], end))
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_glb(magic: &[u8; 4], version: u32, json: &[u8], bin: &[u8]) -> Vec<u8> {
        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(magic);
        out.extend_from_slice(&version.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(json);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(bin);
        out
    }

    #[test]
    fn test_parse_valid_glb() {
        let glb = build_glb(b"glTF", 2, b"{}", &[1, 2, 3, 4]);
        let raw = parse_glb(&glb).unwrap();
        assert_eq!(raw.json, "{}");
        assert_eq!(raw.blob.as_deref(), Some(&[1u8, 2, 3, 4][..]));
    }

    #[test]
    fn test_bad_magic() {
        let glb = build_glb(b"XXXX", 2, b"{}", &[]);
        match parse_glb(&glb) {
            Err(GltfError::Format(msg)) => assert!(msg.contains("magic")),
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_version() {
        let glb = build_glb(b"glTF", 1, b"{}", &[]);
        assert!(matches!(parse_glb(&glb), Err(GltfError::Format(_))));
    }

    #[test]
    fn test_bad_chunk_tag() {
        let mut glb = build_glb(b"glTF", 2, b"{}", &[]);
        // Corrupt the JSON chunk tag
        glb[16] = b'X';
        assert!(matches!(parse_glb(&glb), Err(GltfError::Format(_))));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            parse_glb(b"glTF"),
            Err(GltfError::Format(_))
        ));
    }

    #[test]
    fn test_missing_bin_chunk() {
        let mut glb = Vec::new();
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        let json = b"{}";
        let total = 12 + 8 + json.len();
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(json);
        assert!(matches!(parse_glb(&glb), Err(GltfError::Format(_))));
    }
}
