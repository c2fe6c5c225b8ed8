//! glTF 2.0 scene loader.
//!
//! Loads `.gltf`/`.glb` files into CPU-side data structures: meshes with
//! typed vertex streams, materials with decoded textures, and a scene
//! graph with composed local transforms.
//!
//! # Supported subset
//!
//! Binary containers (`.glb`) and JSON assets (`.gltf`) with external or
//! base64-embedded buffers and images. Only the first scene of a document
//! is loaded. Animations, skins, morph targets, and sparse accessors are
//! not supported; assets requiring extensions outside the configured
//! allow-list are rejected up front.
//!
//! # Interleaving
//!
//! Attributes that share one buffer view and sit back-to-back within its
//! stride are merged into a single multi-attribute vertex stream instead
//! of separate buffers. The detection is byte-exact; layouts that do not
//! match exactly load as separate streams, which renders identically.
//!
//! # Errors
//!
//! Every failure aborts the whole load ([`GltfError`]): a corrupt mesh
//! fails the asset rather than producing a partial scene, since assets
//! for a demo pipeline are curated offline.
//!
//! # Example
//!
//! ```ignore
//! use nocturne_core::gltf::load_gltf;
//!
//! let scene = load_gltf("models/helmet.glb").unwrap();
//! println!("meshes: {}", scene.meshes.len());
//! for &root in &scene.roots {
//!     println!("root node: {:?}", scene.nodes[root].name);
//! }
//! ```

mod buffer;
mod container;
mod document;
mod error;
mod loader;
#[cfg(test)]
mod tests;
mod vertex;

pub use error::GltfError;

use std::path::Path;

use crate::scene::Scene;

/// Configuration for [`load_gltf_with`].
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// glTF extensions the caller can handle. Any `extensionsRequired`
    /// or `extensionsUsed` entry outside this list fails the load.
    pub supported_extensions: Vec<String>,
    /// Anisotropy level applied to every loaded sampler.
    pub anisotropy: f32,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            supported_extensions: Vec::new(),
            anisotropy: 16.0,
        }
    }
}

/// Load a glTF asset with default options.
///
/// See [`load_gltf_with`].
pub fn load_gltf(path: impl AsRef<Path>) -> Result<Scene, GltfError> {
    load_gltf_with(path, &LoaderOptions::default())
}

/// Load a glTF asset from a `.gltf` or `.glb` file.
///
/// The format is detected from the file extension. External buffers and
/// images resolve relative to the asset's directory. The call is
/// synchronous and blocking; it returns a fully populated [`Scene`] or
/// the first error encountered.
///
/// # Returns
///
/// A [`Scene`] owning the node arena (flat list plus root indices), the
/// flat mesh and material lists, and the document's camera records
/// passed through uninterpreted. All intermediate state (the metadata
/// document and the buffer cache) is dropped before returning.
pub fn load_gltf_with(path: impl AsRef<Path>, options: &LoaderOptions) -> Result<Scene, GltfError> {
    let path = path.as_ref();
    let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();

    let raw = container::read_asset(path)?;
    let blob_present = raw.blob.is_some();

    let document = document::Document::parse(&raw.json)?;
    document.validate(&base_dir, options, blob_present)?;

    let store = buffer::BufferStore::new(&document, &base_dir, raw.blob);
    let mut ctx = loader::LoadContext::new(document, store, base_dir, options);

    ctx.load_samplers()?;
    let materials = ctx.load_materials()?;
    let meshes = ctx.load_meshes()?;
    let scene = ctx.build_scene(meshes, materials);

    log::debug!(
        "loaded scene {:?}: {} nodes, {} meshes, {} materials",
        scene.name,
        scene.nodes.len(),
        scene.meshes.len(),
        scene.materials.len()
    );
    Ok(scene)
}
