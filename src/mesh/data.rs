//! CPU-side mesh data structures.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - [`IndexFormat`] - Index data width (u8, u16 or u32)
//! - [`VertexStream`] - One vertex buffer with format and attribute names
//! - [`CpuMesh`] - CPU-side mesh holding raw vertex and index data
//! - [`Aabb`] - Axis-aligned bounding box

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive (for non-strip topologies).
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            Self::PointList => Some(1),
            Self::LineList => Some(2),
            Self::TriangleList => Some(3),
            Self::LineStrip | Self::TriangleStrip => None, // Variable
        }
    }
}

/// Index data width for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 8-bit unsigned integers.
    Uint8,
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers (max ~4 billion vertices).
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint8 => 1,
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

/// One vertex buffer together with its layout description.
///
/// The `format` string lists the per-attribute element shapes in order,
/// space separated (`"3f 3f 2f"` = three floats, three floats, two
/// floats per vertex). `attributes` names the shader inputs each element
/// feeds, in the same order (`["in_position", "in_normal", "in_uv"]`).
/// A stream with more than one attribute holds interleaved data.
#[derive(Debug, Clone)]
pub struct VertexStream {
    /// Per-attribute format tokens, space separated.
    pub format: String,
    /// Shader attribute names matching `format`, in order.
    pub attributes: Vec<String>,
    /// Raw vertex bytes.
    pub data: Vec<u8>,
}

impl VertexStream {
    /// Create a stream from format tokens, attribute names, and raw bytes.
    pub fn new(
        format: impl Into<String>,
        attributes: Vec<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            format: format.into(),
            attributes,
            data,
        }
    }
}

/// A CPU-side mesh holding raw vertex and index data.
///
/// This is the GPU-agnostic representation of one drawable batch. It is
/// produced by asset loaders and later uploaded to the GPU by the
/// graphics device.
///
/// Vertex data is organized as one or more [`VertexStream`]s; a single
/// stream may carry several interleaved attributes. The optional index
/// stream keeps its source byte width.
#[derive(Clone)]
pub struct CpuMesh {
    topology: PrimitiveTopology,
    streams: Vec<VertexStream>,
    vertex_count: u32,
    index_data: Option<Vec<u8>>,
    index_format: Option<IndexFormat>,
    index_count: u32,
    material: Option<usize>,
    bounds: Option<Aabb>,
    label: Option<String>,
}

impl CpuMesh {
    /// Create a new empty CpuMesh.
    pub fn new() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            streams: Vec::new(),
            vertex_count: 0,
            index_data: None,
            index_format: None,
            index_count: 0,
            material: None,
            bounds: None,
            label: None,
        }
    }

    /// Append a vertex stream.
    pub fn with_stream(mut self, stream: VertexStream) -> Self {
        self.streams.push(stream);
        self
    }

    /// Set the vertex count.
    pub fn with_vertex_count(mut self, count: u32) -> Self {
        self.vertex_count = count;
        self
    }

    /// Set raw index data bytes with their width and count.
    pub fn with_index_data(mut self, data: Vec<u8>, format: IndexFormat, count: u32) -> Self {
        self.index_data = Some(data);
        self.index_format = Some(format);
        self.index_count = count;
        self
    }

    /// Set index data as u16 indices.
    pub fn with_indices_u16(self, indices: &[u16]) -> Self {
        let count = indices.len() as u32;
        self.with_index_data(
            bytemuck::cast_slice(indices).to_vec(),
            IndexFormat::Uint16,
            count,
        )
    }

    /// Set index data as u32 indices.
    pub fn with_indices_u32(self, indices: &[u32]) -> Self {
        let count = indices.len() as u32;
        self.with_index_data(
            bytemuck::cast_slice(indices).to_vec(),
            IndexFormat::Uint32,
            count,
        )
    }

    /// Set the primitive topology.
    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Set the material index (into the owning scene's material list).
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the bounding box.
    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Get the vertex streams.
    pub fn streams(&self) -> &[VertexStream] {
        &self.streams
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Get the raw index data.
    pub fn index_data(&self) -> Option<&[u8]> {
        self.index_data.as_deref()
    }

    /// Get the index format.
    pub fn index_format(&self) -> Option<IndexFormat> {
        self.index_format
    }

    /// Get the number of indices.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Check if this mesh uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        self.index_data.is_some()
    }

    /// Get the material index, if set.
    pub fn material(&self) -> Option<usize> {
        self.material
    }

    /// Get the bounding box, if known.
    pub fn bounds(&self) -> Option<&Aabb> {
        self.bounds.as_ref()
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Default for CpuMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CpuMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuMesh")
            .field("label", &self.label)
            .field("topology", &self.topology)
            .field("vertex_count", &self.vertex_count)
            .field("stream_count", &self.streams.len())
            .field("index_count", &self.index_count)
            .field("material", &self.material)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_topology_vertices() {
        assert_eq!(
            PrimitiveTopology::PointList.vertices_per_primitive(),
            Some(1)
        );
        assert_eq!(
            PrimitiveTopology::LineList.vertices_per_primitive(),
            Some(2)
        );
        assert_eq!(
            PrimitiveTopology::TriangleList.vertices_per_primitive(),
            Some(3)
        );
        assert_eq!(
            PrimitiveTopology::TriangleStrip.vertices_per_primitive(),
            None
        );
    }

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint8.size(), 1);
        assert_eq!(IndexFormat::Uint16.size(), 2);
        assert_eq!(IndexFormat::Uint32.size(), 4);
    }

    #[test]
    fn test_cpu_mesh_basic() {
        let stream = VertexStream::new("3f", vec!["in_position".into()], vec![0u8; 36]);
        let mesh = CpuMesh::new()
            .with_stream(stream)
            .with_vertex_count(3)
            .with_label("test");

        assert_eq!(mesh.vertex_count(), 3);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.streams().len(), 1);
        assert_eq!(mesh.label(), Some("test"));
    }

    #[test]
    fn test_cpu_mesh_indexed() {
        let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];
        let mesh = CpuMesh::new()
            .with_stream(VertexStream::new(
                "3f",
                vec!["in_position".into()],
                vec![0u8; 48],
            ))
            .with_vertex_count(4)
            .with_indices_u16(&indices);

        assert!(mesh.is_indexed());
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.index_format(), Some(IndexFormat::Uint16));
        assert_eq!(mesh.index_data().unwrap().len(), 12);
    }

    #[test]
    fn test_cpu_mesh_indices_u32() {
        let indices: [u32; 3] = [0, 1, 2];
        let mesh = CpuMesh::new().with_indices_u32(&indices);
        assert_eq!(mesh.index_format(), Some(IndexFormat::Uint32));
        assert_eq!(mesh.index_data().unwrap().len(), 12);
    }

    #[test]
    fn test_interleaved_stream_description() {
        let stream = VertexStream::new(
            "3f 3f 2f",
            vec!["in_position".into(), "in_normal".into(), "in_uv".into()],
            vec![0u8; 32 * 4],
        );
        let mesh = CpuMesh::new().with_stream(stream).with_vertex_count(4);
        assert_eq!(mesh.streams()[0].format, "3f 3f 2f");
        assert_eq!(mesh.streams()[0].attributes.len(), 3);
    }
}
