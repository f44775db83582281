//! Math re-exports
//!
//! Every crate in the workspace goes through this module so a single glam
//! version is in use.

pub use glam;
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
