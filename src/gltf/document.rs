//! Typed in-memory model of the glTF JSON metadata.
//!
//! Every top-level array parses into its own record list; absent arrays
//! become empty lists, and per-field glTF defaults are applied here, at
//! parse time, so consumers never re-derive them. After parsing, the
//! document is validated and its cross-references are linked (checked)
//! before any buffer byte is touched.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::buffer::is_data_uri;
use super::error::GltfError;
use super::LoaderOptions;

/// glTF version accepted by this loader.
const SUPPORTED_VERSION: &str = "2.0";

/// `asset` header record.
#[derive(Debug, Deserialize)]
pub(crate) struct Asset {
    pub version: String,
    #[allow(dead_code)]
    pub generator: Option<String>,
}

/// `buffers[]` record: a raw byte source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Buffer {
    pub byte_length: usize,
    pub uri: Option<String>,
}

/// `bufferViews[]` record: a window into a buffer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BufferView {
    pub buffer: usize,
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    /// Distance between vertices for interleaved data; absent means
    /// tightly packed.
    pub byte_stride: Option<usize>,
}

/// Element arity of an accessor (`type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) enum ElementType {
    #[serde(rename = "SCALAR")]
    Scalar,
    #[serde(rename = "VEC2")]
    Vec2,
    #[serde(rename = "VEC3")]
    Vec3,
    #[serde(rename = "VEC4")]
    Vec4,
}

impl ElementType {
    /// Number of components per element.
    pub fn components(&self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
        }
    }
}

/// `accessors[]` record: typed view over a buffer view.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Accessor {
    pub buffer_view: Option<usize>,
    #[serde(default)]
    pub byte_offset: usize,
    /// Raw glTF component type constant (5120..5126); mapped to a typed
    /// enum at read time so unknown values fail loudly.
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub min: Option<Vec<f32>>,
    pub max: Option<Vec<f32>>,
}

/// `images[]` record: a pixel source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Image {
    pub uri: Option<String>,
    pub buffer_view: Option<usize>,
    #[allow(dead_code)]
    pub mime_type: Option<String>,
    pub name: Option<String>,
}

/// `samplers[]` record, raw glTF filter/wrap constants.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Sampler {
    pub mag_filter: Option<u32>,
    pub min_filter: Option<u32>,
    pub wrap_s: Option<u32>,
    pub wrap_t: Option<u32>,
    pub name: Option<String>,
}

/// `textures[]` record: pairs an image with a sampler.
#[derive(Debug, Deserialize)]
pub(crate) struct Texture {
    pub sampler: Option<usize>,
    pub source: Option<usize>,
    #[allow(dead_code)]
    pub name: Option<String>,
}

/// `materials[].pbrMetallicRoughness.baseColorTexture` reference.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TextureInfo {
    pub index: usize,
    #[allow(dead_code)]
    #[serde(default)]
    pub tex_coord: u32,
}

/// `materials[].pbrMetallicRoughness` sub-record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PbrMetallicRoughness {
    pub base_color_factor: Option<[f32; 4]>,
    pub base_color_texture: Option<TextureInfo>,
    pub metallic_factor: Option<f32>,
}

/// `materials[]` record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Material {
    pub name: Option<String>,
    pub double_sided: Option<bool>,
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    pub emissive_factor: Option<[f32; 3]>,
}

/// `meshes[].primitives[]` record: one drawable batch.
#[derive(Debug, Deserialize)]
pub(crate) struct Primitive {
    /// Semantic name → accessor index. Ordered map so iteration is
    /// deterministic.
    pub attributes: BTreeMap<String, usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
    pub mode: Option<u32>,
}

/// `meshes[]` record.
#[derive(Debug, Deserialize)]
pub(crate) struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

/// `nodes[]` record.
#[derive(Debug, Deserialize)]
pub(crate) struct Node {
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<usize>,
    pub matrix: Option<[f32; 16]>,
    pub translation: Option<[f32; 3]>,
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    pub mesh: Option<usize>,
    pub camera: Option<usize>,
}

/// `scenes[]` record.
#[derive(Debug, Deserialize)]
pub(crate) struct SceneRecord {
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<usize>,
}

/// The parsed glTF document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document {
    pub asset: Asset,
    #[serde(default)]
    pub extensions_used: Vec<String>,
    #[serde(default)]
    pub extensions_required: Vec<String>,
    #[serde(default)]
    pub buffers: Vec<Buffer>,
    #[serde(default)]
    pub buffer_views: Vec<BufferView>,
    #[serde(default)]
    pub accessors: Vec<Accessor>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub samplers: Vec<Sampler>,
    #[serde(default)]
    pub textures: Vec<Texture>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub scenes: Vec<SceneRecord>,
    /// Camera records are carried through uninterpreted.
    #[serde(default)]
    pub cameras: Vec<serde_json::Value>,
}

impl Document {
    /// Parse the metadata JSON into a typed document.
    pub fn parse(json: &str) -> Result<Self, GltfError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the document against loader capabilities and the
    /// filesystem, then check all cross-references.
    ///
    /// `blob_present` marks buffer 0 as backed by the embedded binary
    /// chunk, exempting it from the external-file check.
    pub fn validate(
        &self,
        base_dir: &Path,
        options: &LoaderOptions,
        blob_present: bool,
    ) -> Result<(), GltfError> {
        if self.asset.version != SUPPORTED_VERSION {
            return Err(GltfError::UnsupportedVersion(self.asset.version.clone()));
        }

        for ext in self.extensions_required.iter().chain(&self.extensions_used) {
            if !options.supported_extensions.iter().any(|s| s == ext) {
                return Err(GltfError::UnsupportedExtension(ext.clone()));
            }
        }

        for (index, buffer) in self.buffers.iter().enumerate() {
            if index == 0 && blob_present {
                continue;
            }
            match &buffer.uri {
                Some(uri) if !is_data_uri(uri) => {
                    let path = base_dir.join(uri);
                    if !path.is_file() {
                        return Err(GltfError::MissingBufferFile(path));
                    }
                }
                Some(_) => {}
                None => {
                    return Err(GltfError::Buffer(format!(
                        "buffer {index} has no uri and no embedded chunk"
                    )));
                }
            }
        }

        self.link()
    }

    /// Check every cross-reference between record categories.
    ///
    /// Pass order matters: accessors resolve views, views resolve
    /// buffers, then primitives and images resolve accessors/views.
    fn link(&self) -> Result<(), GltfError> {
        for (index, accessor) in self.accessors.iter().enumerate() {
            match accessor.buffer_view {
                // Sparse accessors (no backing view) are not supported;
                // silently borrowing view 0 would corrupt data.
                None => {
                    return Err(GltfError::Accessor(format!(
                        "accessor {index} has no buffer view"
                    )));
                }
                Some(view) if view >= self.buffer_views.len() => {
                    return Err(GltfError::Accessor(format!(
                        "accessor {index} references buffer view {view} of {}",
                        self.buffer_views.len()
                    )));
                }
                Some(_) => {}
            }
        }

        for (index, view) in self.buffer_views.iter().enumerate() {
            if view.buffer >= self.buffers.len() {
                return Err(GltfError::Buffer(format!(
                    "buffer view {index} references buffer {} of {}",
                    view.buffer,
                    self.buffers.len()
                )));
            }
        }

        for (mesh_index, mesh) in self.meshes.iter().enumerate() {
            for (prim_index, primitive) in mesh.primitives.iter().enumerate() {
                for (semantic, &accessor) in &primitive.attributes {
                    if accessor >= self.accessors.len() {
                        return Err(GltfError::Accessor(format!(
                            "mesh {mesh_index} primitive {prim_index} attribute \
                             {semantic} references accessor {accessor} of {}",
                            self.accessors.len()
                        )));
                    }
                }
                if let Some(indices) = primitive.indices {
                    if indices >= self.accessors.len() {
                        return Err(GltfError::Accessor(format!(
                            "mesh {mesh_index} primitive {prim_index} indices \
                             reference accessor {indices} of {}",
                            self.accessors.len()
                        )));
                    }
                }
                if let Some(material) = primitive.material {
                    if material >= self.materials.len() {
                        return Err(GltfError::Accessor(format!(
                            "mesh {mesh_index} primitive {prim_index} references \
                             material {material} of {}",
                            self.materials.len()
                        )));
                    }
                }
            }
        }

        for (index, image) in self.images.iter().enumerate() {
            if let Some(view) = image.buffer_view {
                if view >= self.buffer_views.len() {
                    return Err(GltfError::Accessor(format!(
                        "image {index} references buffer view {view} of {}",
                        self.buffer_views.len()
                    )));
                }
            }
        }

        for (index, texture) in self.textures.iter().enumerate() {
            if let Some(source) = texture.source {
                if source >= self.images.len() {
                    return Err(GltfError::Accessor(format!(
                        "texture {index} references image {source} of {}",
                        self.images.len()
                    )));
                }
            }
            if let Some(sampler) = texture.sampler {
                if sampler >= self.samplers.len() {
                    return Err(GltfError::Accessor(format!(
                        "texture {index} references sampler {sampler} of {}",
                        self.samplers.len()
                    )));
                }
            }
        }

        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if child >= self.nodes.len() {
                    return Err(GltfError::Accessor(format!(
                        "node {index} references child {child} of {}",
                        self.nodes.len()
                    )));
                }
            }
            if let Some(mesh) = node.mesh {
                if mesh >= self.meshes.len() {
                    return Err(GltfError::Accessor(format!(
                        "node {index} references mesh {mesh} of {}",
                        self.meshes.len()
                    )));
                }
            }
            if let Some(camera) = node.camera {
                if camera >= self.cameras.len() {
                    return Err(GltfError::Accessor(format!(
                        "node {index} references camera {camera} of {}",
                        self.cameras.len()
                    )));
                }
            }
        }

        for (index, scene) in self.scenes.iter().enumerate() {
            for &root in &scene.nodes {
                if root >= self.nodes.len() {
                    return Err(GltfError::Accessor(format!(
                        "scene {index} references node {root} of {}",
                        self.nodes.len()
                    )));
                }
            }
        }

        Ok(())
    }
}
