pub mod math;
pub mod error;
pub mod mesh;
pub mod orient;
pub mod components;
pub mod scene;

// Re-exports
pub use error::{MeshError, MeshResult, OrientError, OrientResult};
pub use mesh::{Mesh, Vertex};
pub use orient::{compute_alignment_rotation, UP};
pub use components::{EulerOrder, Name, Rotation, Transform};
pub use scene::{DisplayType, Image, ImageId, InteractionMode, Material, MaterialId, ObjectId, Scene, SceneObject};
