//! Integration tests for the glTF loader.
//!
//! Assets are assembled in memory (JSON text plus hand-packed binary
//! chunks) and written to unique temp files, since the loader's public
//! surface is path-based.

use std::path::PathBuf;

mod load_test;

/// Assemble a binary glTF container from metadata text and a binary chunk.
fn glb_bytes(json: &str, bin: &[u8]) -> Vec<u8> {
    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(json.as_bytes());
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(bin);
    out
}

/// Write an asset to a per-process temp directory and return its path.
///
/// Names must be unique per test; files are left for the OS to clean up.
fn write_temp(name: &str, bytes: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nocturne-core-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

// A unit quad in the XY plane: the shared payload for mesh tests.

const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
];

const QUAD_NORMALS: [[f32; 3]; 4] = [
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
];

const QUAD_UVS: [[f32; 2]; 4] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Quad vertices interleaved as [pos | normal | uv], stride 32.
fn interleaved_quad_bytes() -> Vec<u8> {
    let mut out = Vec::with_capacity(4 * 32);
    for i in 0..4 {
        for f in QUAD_POSITIONS[i] {
            out.extend_from_slice(&f.to_le_bytes());
        }
        for f in QUAD_NORMALS[i] {
            out.extend_from_slice(&f.to_le_bytes());
        }
        for f in QUAD_UVS[i] {
            out.extend_from_slice(&f.to_le_bytes());
        }
    }
    out
}

/// Quad vertices as planar arrays: positions, then normals, then uvs.
fn planar_quad_bytes() -> Vec<u8> {
    let mut out = Vec::with_capacity(4 * 32);
    for p in QUAD_POSITIONS {
        for f in p {
            out.extend_from_slice(&f.to_le_bytes());
        }
    }
    for n in QUAD_NORMALS {
        for f in n {
            out.extend_from_slice(&f.to_le_bytes());
        }
    }
    for uv in QUAD_UVS {
        for f in uv {
            out.extend_from_slice(&f.to_le_bytes());
        }
    }
    out
}

fn quad_index_bytes() -> Vec<u8> {
    QUAD_INDICES
        .iter()
        .flat_map(|i| i.to_le_bytes())
        .collect()
}

/// Metadata for the interleaved quad: one view with stride 32 shared by
/// POSITION, NORMAL and TEXCOORD_0, plus a tightly packed index view.
///
/// `buffer_field` is spliced into the buffer record so the same document
/// serves `.glb` (no uri) and `.gltf` (external uri) tests.
fn interleaved_quad_json(buffer_field: &str) -> String {
    format!(
        r#"{{
            "asset": {{"version": "2.0"}},
            "buffers": [{{"byteLength": 140{buffer_field}}}],
            "bufferViews": [
                {{"buffer": 0, "byteOffset": 0, "byteLength": 128, "byteStride": 32}},
                {{"buffer": 0, "byteOffset": 128, "byteLength": 12}}
            ],
            "accessors": [
                {{"bufferView": 0, "byteOffset": 0, "componentType": 5126, "count": 4,
                  "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]}},
                {{"bufferView": 0, "byteOffset": 12, "componentType": 5126, "count": 4, "type": "VEC3"}},
                {{"bufferView": 0, "byteOffset": 24, "componentType": 5126, "count": 4, "type": "VEC2"}},
                {{"bufferView": 1, "componentType": 5123, "count": 6, "type": "SCALAR"}}
            ],
            "meshes": [{{
                "name": "quad",
                "primitives": [{{
                    "attributes": {{"POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2}},
                    "indices": 3
                }}]
            }}],
            "nodes": [{{"mesh": 0}}],
            "scenes": [{{"nodes": [0]}}]
        }}"#
    )
}

/// Interleaved quad buffer: 128 vertex bytes plus 12 index bytes.
fn interleaved_quad_bin() -> Vec<u8> {
    let mut bin = interleaved_quad_bytes();
    bin.extend_from_slice(&quad_index_bytes());
    bin
}
