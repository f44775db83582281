//! Photogrammetry cleanup operators.
//!
//! Each operator works on a [`Scene`](scanprep_core::Scene) and delegates
//! heavy geometry (boolean, decimation, UV projection, baking) to a
//! [`GeometryEngine`]. [`CpuEngine`] is the built-in reference engine.

pub mod config;
pub mod cpu;
pub mod engine;
pub mod error;
pub mod operators;

pub use config::{BakeSettings, CutSettings, LowPolyParams, UvSettings, WorkflowConfig};
pub use cpu::CpuEngine;
pub use engine::{BakePass, BakeRequest, BooleanSolver, EngineError, EngineResult, GeometryEngine};
pub use error::{OpError, OpResult};
pub use operators::{
    add_cut_bounds, bake_diffuse, center_origin, create_low_poly, cut_object, orient_by_normals,
    uv_project, CenterMode, UvOutcome,
};
