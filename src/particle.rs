//! Point masses making up the cloth.

use glam::Vec3;

/// Shading normal a particle carries before its first step.
pub const DEFAULT_NORMAL: Vec3 = Vec3::Y;

/// A point mass in the cloth grid.
///
/// Particles live in the grid's arena and are addressed by their stable
/// row-major `index`. Springs and triangles refer to them by that index,
/// never by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Current position.
    pub position: Vec3,
    /// Position one step ago, used by the Verlet update.
    pub previous_position: Vec3,
    /// Explicitly tracked velocity, used by damping, drag and collision.
    pub velocity: Vec3,
    /// Force accumulated during the current step.
    pub force: Vec3,
    /// Smoothed vertex normal for shading.
    pub normal: Vec3,
    /// Mass, always positive.
    pub mass: f32,
    /// Fixed particles ignore integration and collision.
    pub fixed: bool,
    /// Row-major index in the grid.
    pub index: u32,
}

impl Particle {
    /// Create a particle at rest.
    pub fn new(position: Vec3, mass: f32, fixed: bool, index: u32) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            normal: DEFAULT_NORMAL,
            mass,
            fixed,
            index,
        }
    }

    #[inline]
    pub fn acceleration(&self) -> Vec3 {
        self.force / self.mass
    }

    #[inline]
    pub fn momentum(&self) -> Vec3 {
        self.mass * self.velocity
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Advance one Störmer–Verlet step and return the acceleration used.
    ///
    /// Velocity is left untouched; the caller either adds `a * dt` or hands
    /// the particle to the collision response.
    pub fn verlet_step(&mut self, dt: f32) -> Vec3 {
        let acceleration = self.acceleration();
        let next = 2.0 * self.position - self.previous_position + acceleration * dt * dt;
        self.previous_position = self.position;
        self.position = next;
        acceleration
    }

    /// Move the particle without giving it any velocity.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.previous_position += delta;
    }
}
