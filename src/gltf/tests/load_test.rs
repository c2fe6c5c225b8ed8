//! Mesh loading tests: interleaving, format equivalence, error taxonomy.

use super::*;
use crate::gltf::{load_gltf, GltfError};
use crate::mesh::IndexFormat;

#[test]
fn test_interleaved_quad_single_stream() {
    let glb = glb_bytes(&interleaved_quad_json(""), &interleaved_quad_bin());
    let path = write_temp("quad_interleaved.glb", &glb);

    let scene = load_gltf(&path).unwrap();
    assert_eq!(scene.meshes.len(), 1);

    let mesh = &scene.meshes[0];
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.label(), Some("quad"));

    // All three attributes merge into one stream, not three buffers.
    assert_eq!(mesh.streams().len(), 1);
    let stream = &mesh.streams()[0];
    assert_eq!(stream.format, "3f 3f 2f");
    assert_eq!(
        stream.attributes,
        vec!["in_position", "in_normal", "in_uv"]
    );
    assert_eq!(stream.data, interleaved_quad_bytes());

    assert_eq!(mesh.index_format(), Some(IndexFormat::Uint16));
    assert_eq!(mesh.index_count(), 6);
    assert_eq!(mesh.index_data().unwrap(), quad_index_bytes().as_slice());

    let bounds = mesh.bounds().expect("bounds from POSITION min/max");
    assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
    assert_eq!(bounds.max, [1.0, 1.0, 0.0]);
}

#[test]
fn test_glb_and_gltf_with_external_bin_are_equivalent() {
    let glb = glb_bytes(&interleaved_quad_json(""), &interleaved_quad_bin());
    let glb_path = write_temp("quad_eq.glb", &glb);

    write_temp("quad_eq.bin", &interleaved_quad_bin());
    let gltf_json = interleaved_quad_json(r#", "uri": "quad_eq.bin""#);
    let gltf_path = write_temp("quad_eq.gltf", gltf_json.as_bytes());

    let from_glb = load_gltf(&glb_path).unwrap();
    let from_gltf = load_gltf(&gltf_path).unwrap();

    assert_eq!(from_glb.meshes.len(), from_gltf.meshes.len());
    let (a, b) = (&from_glb.meshes[0], &from_gltf.meshes[0]);
    assert_eq!(a.streams().len(), b.streams().len());
    for (sa, sb) in a.streams().iter().zip(b.streams()) {
        assert_eq!(sa.format, sb.format);
        assert_eq!(sa.attributes, sb.attributes);
        assert_eq!(sa.data, sb.data);
    }
    assert_eq!(a.index_data(), b.index_data());
    assert_eq!(a.index_format(), b.index_format());
}

#[test]
fn test_planar_streams_zip_to_interleaved_bytes() {
    // The same quad with planar (non-interleaved) attribute views.
    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 140}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 48},
            {"buffer": 0, "byteOffset": 48, "byteLength": 48},
            {"buffer": 0, "byteOffset": 96, "byteLength": 32},
            {"buffer": 0, "byteOffset": 128, "byteLength": 12}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5126, "count": 4, "type": "VEC3"},
            {"bufferView": 2, "componentType": 5126, "count": 4, "type": "VEC2"},
            {"bufferView": 3, "componentType": 5123, "count": 6, "type": "SCALAR"}
        ],
        "meshes": [{
            "primitives": [{
                "attributes": {"POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2},
                "indices": 3
            }]
        }],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    }"#;
    let mut bin = planar_quad_bytes();
    bin.extend_from_slice(&quad_index_bytes());
    let path = write_temp("quad_planar.glb", &glb_bytes(json, &bin));

    let scene = load_gltf(&path).unwrap();
    let mesh = &scene.meshes[0];
    assert_eq!(mesh.streams().len(), 3);

    // Zipping the planar streams per vertex reproduces the interleaved
    // layout byte for byte.
    let mut zipped = Vec::new();
    for v in 0..4 {
        zipped.extend_from_slice(&mesh.streams()[0].data[v * 12..v * 12 + 12]);
        zipped.extend_from_slice(&mesh.streams()[1].data[v * 12..v * 12 + 12]);
        zipped.extend_from_slice(&mesh.streams()[2].data[v * 8..v * 8 + 8]);
    }
    assert_eq!(zipped, interleaved_quad_bytes());
}

#[test]
fn test_three_primitives_three_meshes() {
    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 108}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 36},
            {"buffer": 0, "byteOffset": 72, "byteLength": 36}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
             "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 1.0]},
            {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3",
             "min": [2.0, 0.0, 0.0], "max": [3.0, 1.0, 1.0]},
            {"bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC3",
             "min": [4.0, 0.0, 0.0], "max": [5.0, 1.0, 1.0]}
        ],
        "materials": [
            {"name": "a"}, {"name": "b"}, {"name": "c"}
        ],
        "meshes": [{
            "name": "tri3",
            "primitives": [
                {"attributes": {"POSITION": 0}, "material": 0},
                {"attributes": {"POSITION": 1}, "material": 1},
                {"attributes": {"POSITION": 2}, "material": 2}
            ]
        }],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    }"#;
    let bin = vec![0u8; 108];
    let path = write_temp("three_prims.glb", &glb_bytes(json, &bin));

    let scene = load_gltf(&path).unwrap();
    assert_eq!(scene.meshes.len(), 3);
    assert_eq!(scene.materials.len(), 3);

    let bounds: Vec<_> = scene
        .meshes
        .iter()
        .map(|m| *m.bounds().expect("per-primitive bounds"))
        .collect();
    assert_eq!(bounds[0].min, [0.0, 0.0, 0.0]);
    assert_eq!(bounds[1].min, [2.0, 0.0, 0.0]);
    assert_eq!(bounds[2].min, [4.0, 0.0, 0.0]);
    assert_ne!(bounds[0], bounds[1]);
    assert_ne!(bounds[1], bounds[2]);

    for (i, mesh) in scene.meshes.iter().enumerate() {
        assert_eq!(mesh.material(), Some(i));
        assert_eq!(mesh.label(), Some(format!("tri3_prim{i}").as_str()));
    }
}

#[test]
fn test_u8_indices_keep_their_width() {
    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 39}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 3}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5121, "count": 3, "type": "SCALAR"}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    }"#;
    let mut bin = vec![0u8; 36];
    bin.extend_from_slice(&[0, 1, 2]);
    let path = write_temp("u8_indices.glb", &glb_bytes(json, &bin));

    let scene = load_gltf(&path).unwrap();
    let mesh = &scene.meshes[0];
    assert_eq!(mesh.index_format(), Some(IndexFormat::Uint8));
    assert_eq!(mesh.index_count(), 3);
    assert_eq!(mesh.index_data().unwrap(), &[0u8, 1, 2][..]);
}

#[test]
fn test_bad_magic_is_format_error() {
    let mut glb = glb_bytes(&interleaved_quad_json(""), &interleaved_quad_bin());
    glb[0..4].copy_from_slice(b"XXXX");
    let path = write_temp("bad_magic.glb", &glb);

    match load_gltf(&path) {
        Err(GltfError::Format(_)) => {}
        other => panic!("expected Format error, got {:?}", other.err()),
    }
}

#[test]
fn test_version_checked_before_buffers() {
    // The buffer file does not exist; the version check must fire first.
    let json = r#"{
        "asset": {"version": "1.0"},
        "buffers": [{"byteLength": 4, "uri": "never_written.bin"}]
    }"#;
    let path = write_temp("old_version.gltf", json.as_bytes());

    match load_gltf(&path) {
        Err(GltfError::UnsupportedVersion(v)) => assert_eq!(v, "1.0"),
        other => panic!("expected UnsupportedVersion, got {:?}", other.err()),
    }
}

#[test]
fn test_required_extension_checked_before_buffers() {
    let json = r#"{
        "asset": {"version": "2.0"},
        "extensionsRequired": ["KHR_draco_mesh_compression"],
        "buffers": [{"byteLength": 4, "uri": "never_written.bin"}]
    }"#;
    let path = write_temp("draco.gltf", json.as_bytes());

    match load_gltf(&path) {
        Err(GltfError::UnsupportedExtension(name)) => {
            assert_eq!(name, "KHR_draco_mesh_compression");
        }
        other => panic!("expected UnsupportedExtension, got {:?}", other.err()),
    }
}

#[test]
fn test_missing_buffer_file() {
    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 4, "uri": "missing_data.bin"}]
    }"#;
    let path = write_temp("missing_buffer.gltf", json.as_bytes());

    assert!(matches!(
        load_gltf(&path),
        Err(GltfError::MissingBufferFile(_))
    ));
}

#[test]
fn test_accessor_range_violation() {
    // The POSITION accessor claims 100 vertices in a 128-byte view.
    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 128}],
        "bufferViews": [{"buffer": 0, "byteLength": 128}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 100, "type": "VEC3"}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    }"#;
    let path = write_temp("range.glb", &glb_bytes(json, &[0u8; 128]));

    match load_gltf(&path) {
        Err(GltfError::AccessorRange {
            accessor,
            needed,
            available,
        }) => {
            assert_eq!(accessor, 0);
            assert_eq!(needed, 1200);
            assert_eq!(available, 128);
        }
        other => panic!("expected AccessorRange, got {:?}", other.err()),
    }
}

#[test]
fn test_unsupported_draw_mode() {
    // Mode 6 is TRIANGLE_FAN, outside the renderer's topology set.
    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 36}],
        "bufferViews": [{"buffer": 0, "byteLength": 36}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "mode": 6}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    }"#;
    let path = write_temp("fan.glb", &glb_bytes(json, &[0u8; 36]));

    assert!(matches!(load_gltf(&path), Err(GltfError::DrawMode(6))));
}

#[test]
fn test_unsupported_component_type() {
    // 5124 (signed int) is not in the supported component set.
    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 36}],
        "bufferViews": [{"buffer": 0, "byteLength": 36}],
        "accessors": [
            {"bufferView": 0, "componentType": 5124, "count": 3, "type": "VEC3"}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    }"#;
    let path = write_temp("int_positions.glb", &glb_bytes(json, &[0u8; 36]));

    assert!(matches!(
        load_gltf(&path),
        Err(GltfError::UnsupportedComponentType(5124))
    ));
}

#[test]
fn test_missing_positions_is_fatal() {
    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 48}],
        "bufferViews": [{"buffer": 0, "byteLength": 48}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3"}
        ],
        "meshes": [{"primitives": [{"attributes": {"NORMAL": 0}}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    }"#;
    let path = write_temp("no_positions.glb", &glb_bytes(json, &[0u8; 48]));

    assert!(matches!(
        load_gltf(&path),
        Err(GltfError::MissingPositions {
            mesh: 0,
            primitive: 0
        })
    ));
}

#[test]
fn test_accessor_without_view_is_fatal() {
    let json = r#"{
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 48}],
        "accessors": [
            {"componentType": 5126, "count": 4, "type": "VEC3"}
        ]
    }"#;
    let path = write_temp("sparse.glb", &glb_bytes(json, &[0u8; 48]));

    assert!(matches!(load_gltf(&path), Err(GltfError::Accessor(_))));
}
