//! Physical parameters and pinning policies.
//!
//! Everything that tunes a cloth lives in [`ClothParams`] rather than in
//! constants, so each grid can be configured on its own. Both types here
//! serialize with serde; missing fields fall back to their defaults.
//!
//! # Example
//!
//! ```
//! use drape::{ClothParams, PinPolicy};
//! use glam::Vec3;
//!
//! let params = ClothParams {
//!     spring_constant: 400.0,
//!     damping_constant: 2.0,
//!     gravity: Vec3::new(0.0, -9.8, 0.0),
//!     ..Default::default()
//! };
//! assert!(params.validate().is_ok());
//! assert!(PinPolicy::TwoCorners.is_pinned(0, 9, 10));
//! ```

use crate::error::ClothError;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Distance between adjacent particles when none is given.
pub const DEFAULT_SPACING: f32 = 0.1;
/// Height at which a new cloth is laid out.
pub const DEFAULT_INITIAL_HEIGHT: f32 = 5.0;
/// Mass of each particle when none is given.
pub const DEFAULT_MASS: f32 = 1.0;

/// Physical constants for a single cloth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothParams {
    /// Gravitational acceleration.
    pub gravity: Vec3,
    /// Spring stiffness `k`, shared by structural and shear springs.
    pub spring_constant: f32,
    /// Spring damping `c`.
    pub damping_constant: f32,
    /// Air density `ρ` used by the drag model. Zero disables drag.
    pub air_density: f32,
    /// Drag coefficient `C_d`.
    pub drag_coefficient: f32,
    /// Fraction of normal velocity kept on ground impact, in `[0, 1]`.
    pub restitution: f32,
    /// Coulomb friction coefficient `μ` against the ground.
    pub friction_coefficient: f32,
    /// Whether particles collide with the `y = 0` plane.
    pub ground_collision: bool,
}

impl Default for ClothParams {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            spring_constant: 1.0,
            damping_constant: 1.0,
            air_density: 1.225,
            drag_coefficient: 1.0,
            restitution: 0.2,
            friction_coefficient: 0.5,
            ground_collision: true,
        }
    }
}

impl ClothParams {
    /// Check every parameter is finite and in range.
    pub fn validate(&self) -> Result<(), ClothError> {
        if !self.gravity.is_finite() {
            return Err(ClothError::invalid("gravity must be finite"));
        }

        let non_negative = [
            ("spring_constant", self.spring_constant),
            ("damping_constant", self.damping_constant),
            ("air_density", self.air_density),
            ("drag_coefficient", self.drag_coefficient),
            ("friction_coefficient", self.friction_coefficient),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ClothError::invalid(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ClothError::invalid(format!(
                "restitution must be in [0, 1], got {}",
                self.restitution
            )));
        }
        Ok(())
    }

    /// Parameters with gravity, drag and damping switched off.
    ///
    /// Leaves only the elastic springs, which is handy for checking the
    /// integrator in isolation.
    pub fn conservative(spring_constant: f32) -> Self {
        Self {
            gravity: Vec3::ZERO,
            spring_constant,
            damping_constant: 0.0,
            air_density: 0.0,
            ..Default::default()
        }
    }
}

/// Which particles are held in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum PinPolicy {
    /// Every particle is free.
    None,
    /// The whole first row, like a curtain on a rail.
    #[default]
    TopEdge,
    /// The two ends of the first row, like a flag on a line.
    TwoCorners,
    /// All four corners of the grid.
    FourCorners,
    /// Every particle in the listed rows.
    Rows(Vec<usize>),
    /// Exactly the listed `(row, col)` cells.
    Indices(Vec<(usize, usize)>),
}

impl PinPolicy {
    /// Whether `(row, col)` is fixed in a `size × size` grid.
    pub fn is_pinned(&self, row: usize, col: usize, size: usize) -> bool {
        let last = size.saturating_sub(1);
        match self {
            PinPolicy::None => false,
            PinPolicy::TopEdge => row == 0,
            PinPolicy::TwoCorners => row == 0 && (col == 0 || col == last),
            PinPolicy::FourCorners => (row == 0 || row == last) && (col == 0 || col == last),
            PinPolicy::Rows(rows) => rows.contains(&row),
            PinPolicy::Indices(cells) => cells.contains(&(row, col)),
        }
    }
}
