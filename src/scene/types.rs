//! Scene graph data types.
//!
//! Nodes live in a flat arena owned by the [`Scene`]; tree structure is
//! expressed through child indices. This gives traversal passes both the
//! tree (via [`Scene::roots`]) and the flat node list without duplicating
//! ownership.

use crate::material::CpuMaterial;
use crate::math::Mat4;
use crate::mesh::CpuMesh;

/// A node in a scene graph.
///
/// Each node has a local transform, at most one mesh, an optional camera
/// reference, and child node indices into the owning [`Scene::nodes`]
/// arena.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name, if any.
    pub name: Option<String>,
    /// Local transform relative to the parent.
    ///
    /// Downstream scene code may compose further transforms into this
    /// matrix during rendering.
    pub matrix: Mat4,
    /// Index into [`Scene::meshes`], if this node carries a mesh.
    pub mesh: Option<usize>,
    /// Index into [`Scene::cameras`], if this node carries a camera.
    pub camera: Option<usize>,
    /// Indices of child nodes in [`Scene::nodes`].
    pub children: Vec<usize>,
}

impl SceneNode {
    /// Creates a new node with identity transform and no attachments.
    pub fn new() -> Self {
        Self {
            name: None,
            matrix: Mat4::identity(),
            mesh: None,
            camera: None,
            children: Vec::new(),
        }
    }

    /// Set the node name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the local transform matrix.
    #[must_use]
    pub fn with_matrix(mut self, matrix: Mat4) -> Self {
        self.matrix = matrix;
        self
    }

    /// Set the mesh index.
    #[must_use]
    pub fn with_mesh(mut self, mesh: usize) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Set the camera index.
    #[must_use]
    pub fn with_camera(mut self, camera: usize) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Set the child node indices.
    #[must_use]
    pub fn with_children(mut self, children: Vec<usize>) -> Self {
        self.children = children;
        self
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded scene: the node arena plus all resources nodes reference.
///
/// `roots` lists the indices of the top-level nodes; `nodes` holds every
/// node in the scene, including synthetic ones introduced by loaders.
/// Resource lists (meshes, materials, cameras) are owned by the scene so
/// that node indices resolve locally.
#[derive(Debug)]
pub struct Scene {
    /// Scene name, if any.
    pub name: Option<String>,
    /// Indices of root nodes in [`Scene::nodes`].
    pub roots: Vec<usize>,
    /// All nodes of the scene, in creation order.
    pub nodes: Vec<SceneNode>,
    /// All meshes referenced by nodes in this scene.
    pub meshes: Vec<CpuMesh>,
    /// All materials referenced by meshes in this scene.
    pub materials: Vec<CpuMaterial>,
    /// Raw camera records, passed through uninterpreted.
    pub cameras: Vec<serde_json::Value>,
}

impl Scene {
    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self {
            name: None,
            roots: Vec::new(),
            nodes: Vec::new(),
            meshes: Vec::new(),
            materials: Vec::new(),
            cameras: Vec::new(),
        }
    }

    /// Set the scene name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a node to the arena and return its index.
    pub fn add_node(&mut self, node: SceneNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Visit every node reachable from the roots, depth first, with its
    /// parent index (`None` for roots).
    pub fn visit(&self, mut f: impl FnMut(usize, Option<usize>, &SceneNode)) {
        fn walk(
            scene: &Scene,
            index: usize,
            parent: Option<usize>,
            f: &mut impl FnMut(usize, Option<usize>, &SceneNode),
        ) {
            let node = &scene.nodes[index];
            f(index, parent, node);
            for &child in &node.children {
                walk(scene, child, Some(index), f);
            }
        }
        for &root in &self.roots {
            walk(self, root, None, &mut f);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
