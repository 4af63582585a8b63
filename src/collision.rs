//! Ground-plane collision response.
//!
//! The ground is the plane `y = 0` with normal `+Y`. A particle that ends a
//! Verlet step below it is pushed back in a single pass: an impulse with
//! restitution and Coulomb friction fixes the velocity, and the position is
//! moved to where the step crossed the plane plus half a step of the new
//! velocity. Nothing is iterated, so a particle that was already below the
//! ground before the step is not corrected further.

use crate::particle::Particle;
use glam::Vec3;

/// Outward normal of the ground.
pub const GROUND_NORMAL: Vec3 = Vec3::Y;

/// Tangential speeds below this produce no friction.
const MIN_SLIP_SPEED: f32 = 1e-6;

/// Surface response parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundContact {
    pub restitution: f32,
    pub friction_coefficient: f32,
}

impl GroundContact {
    /// Whether a just-integrated particle has crossed below the ground.
    #[inline]
    pub fn penetrates(particle: &Particle) -> bool {
        particle.position.y < 0.0
    }

    /// Impulse turning `velocity` into the post-impact velocity.
    ///
    /// Zero when the particle is already separating from the ground.
    pub fn impulse(&self, mass: f32, velocity: Vec3) -> Vec3 {
        let v_close = velocity.dot(GROUND_NORMAL);
        if v_close >= 0.0 {
            return Vec3::ZERO;
        }

        let normal_impulse = -(1.0 + self.restitution) * mass * v_close * GROUND_NORMAL;

        let tangential = velocity - v_close * GROUND_NORMAL;
        let slip = tangential.length();
        if slip < MIN_SLIP_SPEED {
            return normal_impulse;
        }

        // Kinetic friction never reverses the slide
        let friction = (self.friction_coefficient * normal_impulse.length()).min(mass * slip);
        normal_impulse - friction * (tangential / slip)
    }

    /// Resolve a particle that ended the step below the ground.
    ///
    /// `acceleration` is the one used for the step just taken; it brings
    /// the stored velocity up to the moment of impact before the impulse.
    pub fn resolve(&self, particle: &mut Particle, acceleration: Vec3, dt: f32) {
        let velocity = particle.velocity + acceleration * dt;
        particle.velocity = velocity + self.impulse(particle.mass, velocity) / particle.mass;

        let contact = contact_point(particle.previous_position, particle.position);
        particle.position = contact + particle.velocity * (0.5 * dt);
        particle.previous_position = particle.position - particle.velocity * dt;
    }
}

/// Where the segment `from → to` crosses `y = 0`, clamped to the segment.
///
/// When the segment is parallel to the plane (or already started below it)
/// there is no usable crossing and the start point is projected instead.
pub fn contact_point(from: Vec3, to: Vec3) -> Vec3 {
    let drop = from.y - to.y;
    let t = if drop.abs() > f32::EPSILON {
        (from.y / drop).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut contact = from.lerp(to, t);
    contact.y = 0.0;
    contact
}
