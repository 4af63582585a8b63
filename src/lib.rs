//! # drape - spring-damper cloth simulation
//!
//! A square grid of point masses joined by damped springs, pulled by
//! gravity, pushed by the wind and stopped by the ground, advanced with a
//! Störmer–Verlet integrator.
//!
//! drape only does the physics. Rendering is left to you: after each step,
//! [`ClothGrid::export_geometry`] hands back an owned copy of the vertex
//! positions and normals together with a triangulation that never changes.
//!
//! ## Quick Start
//!
//! ```
//! use drape::prelude::*;
//!
//! let mut cloth = ClothBuilder::new(20)
//!     .with_mass(0.02)
//!     .with_spacing(0.05)
//!     .with_initial_height(2.0)
//!     .with_params(ClothParams {
//!         spring_constant: 150.0,
//!         damping_constant: 0.5,
//!         ..Default::default()
//!     })
//!     .with_pins(PinPolicy::TopEdge)
//!     .build()
//!     .expect("valid cloth");
//!
//! let wind = Vec3::new(1.5, 0.0, 0.3);
//! for _ in 0..100 {
//!     cloth.step(1.0 / 600.0, wind);
//! }
//!
//! let geometry = cloth.export_geometry();
//! assert_eq!(geometry.vertices.len(), 400);
//! assert_eq!(geometry.triangle_count(), 2 * 19 * 19);
//! ```
//!
//! ## Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Particle`] | Point mass; fixed particles never move on their own |
//! | [`SpringDamper`] | Structural (axis) or shear (diagonal) spring |
//! | [`Triangle`] | Face used for normals and aerodynamic drag |
//! | [`ClothGrid`] | Owns all of the above and runs the step |
//! | [`ClothParams`] | Gravity, stiffness, damping, air, ground response |
//! | [`PinPolicy`] | Which particles are fixed |
//!
//! ## Anchors
//!
//! Fixed particles can be moved as a group with
//! [`ClothGrid::translate_fixed_particles`]; the rest of the cloth follows
//! through its springs on the next steps.

mod cloth;
pub mod collision;
pub mod config;
mod error;
pub mod geometry;
pub mod particle;
pub mod spring;
pub mod time;
pub mod triangle;

pub use bytemuck;
pub use cloth::{ClothBuilder, ClothGrid};
pub use config::{ClothParams, PinPolicy};
pub use error::ClothError;
pub use geometry::{ClothVertex, Geometry};
pub use glam::Vec3;
pub use particle::Particle;
pub use spring::{SpringDamper, SpringKind};
pub use time::SimClock;
pub use triangle::Triangle;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use drape::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cloth::{ClothBuilder, ClothGrid};
    pub use crate::config::{ClothParams, PinPolicy};
    pub use crate::error::ClothError;
    pub use crate::geometry::{ClothVertex, Geometry};
    pub use crate::time::SimClock;
    pub use crate::Vec3;
}
