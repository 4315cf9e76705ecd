//! # rack_core - Warehouse Pallet-Rack Estimating Engine
//!
//! `rack_core` turns a building envelope and storage requirements into a
//! selective pallet-rack layout, a bill of materials for that layout, and a
//! preliminary code-compliance assessment. All inputs and outputs are
//! JSON-serializable, so the same types back the CLI, saved project files and
//! any service wrapped around the crate.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions from request to result; the same request
//!   always yields the same result
//! - **JSON-First**: camelCase wire names, unknown fields rejected
//! - **Rich Errors**: structured [`CalcError`] values with stable codes
//! - **Warnings, not failures**: an infeasible or short layout is still a
//!   result, with the shortfall spelled out in `warnings`
//!
//! ## Quick Start
//!
//! ```rust
//! use rack_core::layout::{design_layout, BuildingEnvelope, RackRequirements};
//!
//! let building = BuildingEnvelope::new(600.0, 300.0, 32.0);
//! let layout = design_layout(&building, &RackRequirements::default()).unwrap();
//!
//! assert_eq!(layout.frame_height_in, 336);
//! assert_eq!(layout.total_pallet_positions, 21_600);
//! ```
//!
//! ## Modules
//!
//! - [`layout`] - layout synthesis (frame height, beams, aisles, rows, tunnels)
//! - [`bom`] - bill of materials from bay types, plus the quick estimate path
//! - [`compliance`] - high-pile, seismic, permit and used-rack rules
//! - [`estimate`] - the layout → BOM → compliance pipeline
//! - [`site`] - site data contract and cached lookups
//! - [`racking`] - rack style, forklift class, pallet size vocabulary
//! - [`config`] - layout constants, loadable from TOML
//! - [`project`] / [`file_io`] - saved estimates and `.rkp` files
//! - [`units`] / [`errors`] - conversions and structured errors

pub mod bom;
pub mod compliance;
pub mod config;
pub mod errors;
pub mod estimate;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod layout;
pub mod project;
pub mod racking;
pub mod site;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use bom::{compute_bom, BomRequest, BomResult};
pub use compliance::{assess, ComplianceAssessment, ComplianceRequest};
pub use config::LayoutConfig;
pub use errors::{CalcError, CalcResult};
pub use estimate::{run_estimate, Estimate, EstimateRequest};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use layout::{design_layout, BuildingEnvelope, LayoutResult, RackRequirements};
pub use project::{Project, ProjectMetadata, ProjectSettings};
