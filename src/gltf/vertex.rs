//! Vertex stream assembly for glTF primitives.
//!
//! Maps glTF attribute semantics to engine attribute names, detects
//! interleaved attributes sharing one buffer view, and reads index and
//! vertex data into [`CpuMesh`] streams.

use crate::mesh::{Aabb, CpuMesh, IndexFormat, PrimitiveTopology, VertexStream};

use super::buffer::{
    check_accessor_range, read_accessor, read_view_block, BufferStore, ComponentType,
};
use super::document::{Document, Primitive};
use super::error::GltfError;

/// Attribute semantics understood by the renderer, in the order streams
/// are emitted.
const SEMANTIC_ORDER: [&str; 7] = [
    "POSITION",
    "NORMAL",
    "TEXCOORD_0",
    "TANGENT",
    "JOINTS_0",
    "WEIGHTS_0",
    "COLOR_0",
];

/// Map a glTF attribute semantic to the engine's shader input name.
fn attribute_name(semantic: &str) -> Option<&'static str> {
    match semantic {
        "POSITION" => Some("in_position"),
        "NORMAL" => Some("in_normal"),
        "TEXCOORD_0" => Some("in_uv"),
        "TANGENT" => Some("in_tangent"),
        "JOINTS_0" => Some("in_joints"),
        "WEIGHTS_0" => Some("in_heights"),
        "COLOR_0" => Some("in_color0"),
        _ => None,
    }
}

/// Format token for one attribute element (`"3f"`, `"2f"`, `"4u1"`, ...).
fn format_token(components: usize, component_type: ComponentType) -> String {
    let suffix = match component_type {
        ComponentType::F32 => "f",
        ComponentType::U32 => "u",
        ComponentType::U16 => "u2",
        ComponentType::U8 => "u1",
        ComponentType::I16 => "i2",
        ComponentType::I8 => "i1",
    };
    format!("{components}{suffix}")
}

/// One attribute of a primitive, resolved and range-checked.
pub(crate) struct AttributeInfo {
    /// Engine attribute name (`in_position`, ...).
    name: &'static str,
    /// Accessor index in the document.
    accessor: usize,
    /// Buffer view the accessor reads from.
    view: usize,
    /// Accessor byte offset within the view.
    byte_offset: usize,
    /// Components per element.
    components: usize,
    /// Component kind.
    component_type: ComponentType,
    /// Bytes per element.
    element_size: usize,
}

/// Collect a primitive's attributes in canonical order, resolving each
/// accessor and checking its byte range.
///
/// Unknown semantics (second UV sets, custom attributes) are logged and
/// skipped. A primitive without POSITION is fatal.
pub(crate) fn collect_attributes(
    document: &Document,
    primitive: &Primitive,
    mesh: usize,
    prim: usize,
) -> Result<Vec<AttributeInfo>, GltfError> {
    if !primitive.attributes.contains_key("POSITION") {
        return Err(GltfError::MissingPositions {
            mesh,
            primitive: prim,
        });
    }

    let mut attrs = Vec::new();

    for semantic in SEMANTIC_ORDER {
        let Some(&accessor_index) = primitive.attributes.get(semantic) else {
            continue;
        };
        let name = attribute_name(semantic).expect("ordered semantics all have names");
        let layout = check_accessor_range(document, accessor_index)?;
        let accessor = &document.accessors[accessor_index];
        attrs.push(AttributeInfo {
            name,
            accessor: accessor_index,
            view: layout.view,
            byte_offset: accessor.byte_offset,
            components: layout.components,
            component_type: layout.component_type,
            element_size: layout.element_size,
        });
    }

    for semantic in primitive.attributes.keys() {
        if attribute_name(semantic).is_none() {
            log::warn!("skipping unsupported attribute semantic {semantic}");
        }
    }

    Ok(attrs)
}

/// Group attributes that are interleaved within one buffer view.
///
/// An attribute joins the current group only when it references the same
/// view and its byte offset equals the previous attribute's offset plus
/// the previous element size, i.e. the attributes sit back-to-back within
/// one stride block. The check is byte-exact: failing to merge costs an extra
/// buffer, a wrong merge would corrupt vertex data. A candidate group is
/// additionally kept only if the view's stride equals the summed element
/// sizes; otherwise its members fall back to separate streams.
pub(crate) fn group_attributes(
    document: &Document,
    attrs: Vec<AttributeInfo>,
) -> Vec<Vec<AttributeInfo>> {
    let mut groups: Vec<Vec<AttributeInfo>> = Vec::new();

    for attr in attrs {
        if let Some(group) = groups.last_mut() {
            let first = &group[0];
            let expected: usize =
                first.byte_offset + group.iter().map(|a| a.element_size).sum::<usize>();
            if attr.view == first.view && attr.byte_offset == expected {
                group.push(attr);
                continue;
            }
        }
        groups.push(vec![attr]);
    }

    // A merged group must exactly fill the view's stride.
    let mut result = Vec::new();
    for group in groups {
        if group.len() > 1 {
            let total: usize = group.iter().map(|a| a.element_size).sum();
            let stride = document.buffer_views[group[0].view].byte_stride;
            if stride != Some(total) {
                for attr in group {
                    result.push(vec![attr]);
                }
                continue;
            }
        }
        result.push(group);
    }
    result
}

/// Map a glTF primitive mode to the renderer's topology.
///
/// An absent mode means triangle list.
pub(crate) fn map_topology(mode: Option<u32>) -> Result<PrimitiveTopology, GltfError> {
    match mode {
        None | Some(4) => Ok(PrimitiveTopology::TriangleList),
        Some(0) => Ok(PrimitiveTopology::PointList),
        Some(1) => Ok(PrimitiveTopology::LineList),
        Some(3) => Ok(PrimitiveTopology::LineStrip),
        Some(5) => Ok(PrimitiveTopology::TriangleStrip),
        Some(other) => Err(GltfError::DrawMode(other)),
    }
}

/// Read an index accessor into a raw index stream.
///
/// The stream keeps its source width: 1, 2, or 4 bytes per index.
pub(crate) fn read_indices(
    document: &Document,
    store: &mut BufferStore,
    accessor_index: usize,
) -> Result<(Vec<u8>, IndexFormat, u32), GltfError> {
    let data = read_accessor(document, store, accessor_index)?;
    if data.components != 1 {
        return Err(GltfError::Accessor(format!(
            "index accessor {accessor_index} is not scalar"
        )));
    }
    let format = match data.component_type {
        ComponentType::U8 => IndexFormat::Uint8,
        ComponentType::U16 => IndexFormat::Uint16,
        ComponentType::U32 => IndexFormat::Uint32,
        ComponentType::I8 => return Err(GltfError::UnsupportedComponentType(5120)),
        ComponentType::I16 => return Err(GltfError::UnsupportedComponentType(5122)),
        ComponentType::F32 => return Err(GltfError::UnsupportedComponentType(5126)),
    };
    let count = (data.data.len() / format.size()) as u32;
    Ok((data.data, format, count))
}

/// Bounding box straight from the POSITION accessor's min/max fields.
///
/// No scan over vertex data happens; absent bounds stay absent.
fn position_bounds(document: &Document, accessor_index: usize) -> Option<Aabb> {
    let accessor = &document.accessors[accessor_index];
    let min = accessor.min.as_ref()?;
    let max = accessor.max.as_ref()?;
    if min.len() < 3 || max.len() < 3 {
        return None;
    }
    Some(Aabb {
        min: [min[0], min[1], min[2]],
        max: [max[0], max[1], max[2]],
    })
}

/// Build one renderable mesh from one primitive.
pub(crate) fn build_primitive_mesh(
    document: &Document,
    store: &mut BufferStore,
    mesh_index: usize,
    prim_index: usize,
    label: Option<String>,
) -> Result<CpuMesh, GltfError> {
    let primitive = &document.meshes[mesh_index].primitives[prim_index];
    let topology = map_topology(primitive.mode)?;

    let attrs = collect_attributes(document, primitive, mesh_index, prim_index)?;
    let position_accessor = primitive.attributes["POSITION"];
    let vertex_count = document.accessors[position_accessor].count;

    let mut mesh = CpuMesh::new()
        .with_topology(topology)
        .with_vertex_count(vertex_count as u32);
    if let Some(label) = label {
        mesh = mesh.with_label(label);
    }

    for group in group_attributes(document, attrs) {
        let stream = if group.len() == 1 {
            let attr = &group[0];
            let data = read_accessor(document, store, attr.accessor)?;
            VertexStream::new(
                format_token(data.components, data.component_type),
                vec![attr.name.to_string()],
                data.data,
            )
        } else {
            let stride: usize = group.iter().map(|a| a.element_size).sum();
            let count = document.accessors[group[0].accessor].count;
            let data = read_view_block(
                document,
                store,
                group[0].view,
                group[0].byte_offset,
                count,
                stride,
            )?;
            let format = group
                .iter()
                .map(|a| format_token(a.components, a.component_type))
                .collect::<Vec<_>>()
                .join(" ");
            let names = group.iter().map(|a| a.name.to_string()).collect();
            VertexStream::new(format, names, data)
        };
        mesh = mesh.with_stream(stream);
    }

    if let Some(indices) = primitive.indices {
        let (data, format, count) = read_indices(document, store, indices)?;
        mesh = mesh.with_index_data(data, format, count);
    }

    if let Some(material) = primitive.material {
        mesh = mesh.with_material(material);
    }

    if let Some(bounds) = position_bounds(document, position_accessor) {
        mesh = mesh.with_bounds(bounds);
    }

    Ok(mesh)
}
