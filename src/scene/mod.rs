//! Scene graph types for representing loaded scenes.
//!
//! These types are format-agnostic and can be produced by any loader
//! (glTF, OBJ, custom formats) or built programmatically.
//!
//! - [`Scene`] — A scene owning its node arena and resource lists
//! - [`SceneNode`] — A node in the scene tree

mod types;

pub use types::{Scene, SceneNode};
