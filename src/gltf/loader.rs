//! Internal glTF loading logic.
//!
//! The [`LoadContext`] holds all state needed during loading: the parsed
//! document, the buffer store, the image decode cache, and the mapping
//! from glTF mesh indices to flat mesh indices.

use std::path::PathBuf;
use std::sync::Arc;

use crate::material::{CpuMaterial, MaterialTexture};
use crate::math::{self, Mat4, Vec3};
use crate::mesh::CpuMesh;
use crate::sampler::{AddressMode, CpuSampler, FilterMode};
use crate::scene::{Scene, SceneNode};
use crate::texture::CpuTexture;

use super::buffer::{is_data_uri, parse_data_uri, read_view_bytes, BufferStore};
use super::document::{Document, Node};
use super::error::GltfError;
use super::vertex;
use super::LoaderOptions;

/// Internal loading context that holds resolved data during loading.
pub(crate) struct LoadContext {
    /// The parsed glTF document.
    document: Document,
    /// Buffer slots, opened lazily as accessors are read.
    store: BufferStore,
    /// Directory of the asset, for external image resolution.
    base_dir: PathBuf,
    /// Sampler anisotropy applied to every loaded sampler.
    anisotropy: f32,

    /// Engine samplers, one per glTF sampler.
    samplers: Vec<Arc<CpuSampler>>,
    /// Decoded images, cached by glTF image index.
    images: Vec<Option<Arc<CpuTexture>>>,
    /// Mapping from glTF mesh index → flat CpuMesh indices.
    /// Populated by `load_meshes`, used by `build_scene`.
    mesh_index_map: Vec<Vec<usize>>,
}

impl LoadContext {
    /// Create a new LoadContext from a validated document.
    pub fn new(
        document: Document,
        store: BufferStore,
        base_dir: PathBuf,
        options: &LoaderOptions,
    ) -> Self {
        let image_count = document.images.len();
        Self {
            document,
            store,
            base_dir,
            anisotropy: options.anisotropy,
            samplers: Vec::new(),
            images: vec![None; image_count],
            mesh_index_map: Vec::new(),
        }
    }

    /// Build engine samplers from the document's sampler records.
    pub fn load_samplers(&mut self) -> Result<(), GltfError> {
        let mut samplers = Vec::with_capacity(self.document.samplers.len());
        for record in &self.document.samplers {
            let sampler = CpuSampler {
                name: record.name.clone(),
                wrap_u: map_wrap(record.wrap_s)?,
                wrap_v: map_wrap(record.wrap_t)?,
                mag_filter: map_filter(record.mag_filter),
                min_filter: map_filter(record.min_filter),
                anisotropy: self.anisotropy,
            };
            samplers.push(Arc::new(sampler));
        }
        self.samplers = samplers;
        Ok(())
    }

    /// Build engine materials, decoding referenced images on demand.
    pub fn load_materials(&mut self) -> Result<Vec<CpuMaterial>, GltfError> {
        let mut result = Vec::with_capacity(self.document.materials.len());

        for index in 0..self.document.materials.len() {
            let record = &self.document.materials[index];
            let mut material = CpuMaterial::new()
                .with_double_sided(record.double_sided.unwrap_or(true));
            material.name = record.name.clone();

            if let Some(emissive) = record.emissive_factor {
                material = material.with_emissive(emissive);
            }

            let texture_ref = if let Some(pbr) = &record.pbr_metallic_roughness {
                if let Some(factor) = pbr.base_color_factor {
                    material = material.with_base_color(factor);
                }
                if let Some(factor) = pbr.metallic_factor {
                    material = material.with_metallic(factor);
                }
                pbr.base_color_texture.as_ref().map(|t| t.index)
            } else {
                None
            };

            if let Some(texture_index) = texture_ref {
                if let Some(resolved) = self.resolve_texture(texture_index)? {
                    material = material.with_base_color_texture(resolved);
                }
            }

            result.push(material);
        }

        Ok(result)
    }

    /// Pair a texture record's image with its sampler.
    ///
    /// A texture without a source image resolves to nothing (the
    /// material keeps its base color factor only).
    fn resolve_texture(&mut self, index: usize) -> Result<Option<MaterialTexture>, GltfError> {
        let record = self.document.textures.get(index).ok_or_else(|| {
            GltfError::Accessor(format!(
                "material references texture {index} of {}",
                self.document.textures.len()
            ))
        })?;
        let sampler = record.sampler.map(|s| Arc::clone(&self.samplers[s]));
        let Some(source) = record.source else {
            log::warn!("texture {index} has no source image");
            return Ok(None);
        };
        let texture = self.decode_image(source)?;
        Ok(Some(MaterialTexture { texture, sampler }))
    }

    /// Decode image `index`, caching the result.
    fn decode_image(&mut self, index: usize) -> Result<Arc<CpuTexture>, GltfError> {
        if let Some(cached) = &self.images[index] {
            return Ok(Arc::clone(cached));
        }

        let record = &self.document.images[index];
        let name = record.name.clone();
        let bytes = if let Some(view) = record.buffer_view {
            read_view_bytes(&self.document, &mut self.store, view)?
        } else if let Some(uri) = &record.uri {
            if is_data_uri(uri) {
                parse_data_uri(uri).ok_or_else(|| {
                    GltfError::ImageDecode(format!("image {index} has a malformed data URI"))
                })?
            } else {
                let path = self.base_dir.join(uri);
                if !path.is_file() {
                    return Err(GltfError::MissingImageFile(path));
                }
                std::fs::read(path)?
            }
        } else {
            return Err(GltfError::ImageDecode(format!(
                "image {index} has neither uri nor buffer view"
            )));
        };

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| GltfError::ImageDecode(format!("{e}")))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut texture = CpuTexture::new_rgba8(width, height, rgba.into_raw());
        texture.name = name;
        let texture = Arc::new(texture);
        self.images[index] = Some(Arc::clone(&texture));
        Ok(texture)
    }

    /// Load all meshes, one [`CpuMesh`] per glTF primitive.
    ///
    /// Primitives are never merged: they may differ in material and
    /// vertex layout. Also populates `mesh_index_map` so `build_scene`
    /// can map glTF mesh indices to flat mesh indices.
    pub fn load_meshes(&mut self) -> Result<Vec<CpuMesh>, GltfError> {
        let mut result = Vec::new();
        let mut index_map = Vec::new();

        for mesh_index in 0..self.document.meshes.len() {
            let primitive_count = self.document.meshes[mesh_index].primitives.len();
            let mesh_name = self.document.meshes[mesh_index].name.clone();
            let mut flat_indices = Vec::with_capacity(primitive_count);

            for prim_index in 0..primitive_count {
                let label = mesh_name.as_ref().map(|name| {
                    if primitive_count > 1 {
                        format!("{name}_prim{prim_index}")
                    } else {
                        name.clone()
                    }
                });

                let mesh = vertex::build_primitive_mesh(
                    &self.document,
                    &mut self.store,
                    mesh_index,
                    prim_index,
                    label,
                )?;

                flat_indices.push(result.len());
                result.push(mesh);
            }

            index_map.push(flat_indices);
        }

        log::debug!("loaded {} meshes", result.len());
        self.mesh_index_map = index_map;
        Ok(result)
    }

    /// Build the scene from the document's first scene record.
    ///
    /// Multi-scene documents are not supported; only `scenes[0]` is
    /// walked. Must be called after `load_meshes`.
    pub fn build_scene(self, meshes: Vec<CpuMesh>, materials: Vec<CpuMaterial>) -> Scene {
        let mut scene = Scene::new();
        scene.meshes = meshes;
        scene.materials = materials;
        scene.cameras = self.document.cameras.clone();

        let Some(record) = self.document.scenes.first() else {
            log::warn!("document has no scenes");
            return scene;
        };
        scene.name = record.name.clone();

        for &root in &record.nodes {
            let index = self.add_node(&mut scene, root);
            scene.roots.push(index);
        }

        scene
    }

    /// Recursively add a document node and its children to the arena.
    ///
    /// A glTF mesh that expanded into several primitive meshes attaches
    /// the first to this node and one synthetic child per extra mesh,
    /// since a node holds at most one mesh.
    fn add_node(&self, scene: &mut Scene, node_index: usize) -> usize {
        let record = &self.document.nodes[node_index];

        let mesh_indices: &[usize] = record
            .mesh
            .map(|m| self.mesh_index_map[m].as_slice())
            .unwrap_or(&[]);

        let mut node = SceneNode::new().with_matrix(local_matrix(record));
        node.name = record.name.clone();
        node.camera = record.camera;
        node.mesh = mesh_indices.first().copied();

        let index = scene.add_node(node);

        for &extra in mesh_indices.iter().skip(1) {
            let child = scene.add_node(SceneNode::new().with_mesh(extra));
            scene.nodes[index].children.push(child);
        }

        for &child_record in &record.children {
            let child = self.add_node(scene, child_record);
            scene.nodes[index].children.push(child);
        }

        index
    }
}

/// Compute a node's local transform matrix.
///
/// The explicit matrix wins when present. Otherwise scale, rotation, and
/// translation compose in that order, each left-multiplying the
/// accumulated matrix (`T * R * S`).
fn local_matrix(node: &Node) -> Mat4 {
    if let Some(m) = &node.matrix {
        return math::mat4_from_cols_array(m);
    }

    let scale = node.scale.unwrap_or([1.0, 1.0, 1.0]);
    let rotation = node.rotation.unwrap_or([0.0, 0.0, 0.0, 1.0]);
    let translation = node.translation.unwrap_or([0.0, 0.0, 0.0]);

    math::mat4_from_scale_rotation_translation(
        Vec3::new(scale[0], scale[1], scale[2]),
        math::quat_from_array(rotation),
        Vec3::new(translation[0], translation[1], translation[2]),
    )
}

/// Map a glTF wrap mode constant, failing loudly on unknown values.
///
/// An absent wrap mode defaults to repeat (glTF default).
fn map_wrap(raw: Option<u32>) -> Result<AddressMode, GltfError> {
    match raw {
        None | Some(10497) => Ok(AddressMode::Repeat),
        Some(33648) => Ok(AddressMode::MirrorRepeat),
        Some(33071) => Ok(AddressMode::ClampToEdge),
        Some(other) => Err(GltfError::Format(format!("unsupported wrap mode {other}"))),
    }
}

/// Map a glTF filter constant (mipmap variants collapse to their base
/// filter; the mipmap policy belongs to the texture collaborator).
fn map_filter(raw: Option<u32>) -> FilterMode {
    match raw {
        Some(9728) | Some(9984) | Some(9986) => FilterMode::Nearest,
        Some(9729) | Some(9985) | Some(9987) | None => FilterMode::Linear,
        Some(other) => {
            log::warn!("unknown filter constant {other}, using linear");
            FilterMode::Linear
        }
    }
}
