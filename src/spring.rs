//! Spring-damper constraints between pairs of particles.
//!
//! Each grid particle is wired to its already-created neighbours with one
//! of two kinds of spring:
//!
//! | Kind | Neighbours | Rest length |
//! |------|------------|-------------|
//! | [`SpringKind::Structural`] | left, up | `spacing` |
//! | [`SpringKind::Shear`] | up-left, up-right | `√2 · spacing` |
//!
//! The force along the spring is
//! `f = -k·(rest - L) - c·v_close`, applied as `+f·ê` on the first endpoint
//! and `-f·ê` on the second.

use crate::particle::Particle;
use glam::Vec3;

/// Which neighbour relation a spring encodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpringKind {
    /// Axis-adjacent neighbours.
    Structural,
    /// Diagonally adjacent neighbours.
    Shear,
}

impl SpringKind {
    /// Rest length for this kind at the given grid spacing.
    pub fn rest_length(self, spacing: f32) -> f32 {
        match self {
            SpringKind::Structural => spacing,
            SpringKind::Shear => std::f32::consts::SQRT_2 * spacing,
        }
    }
}

/// A damped linear spring between two particles.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringDamper {
    p1: u32,
    p2: u32,
    kind: SpringKind,
    rest_length: f32,
    /// Stiffness `k`.
    pub spring_constant: f32,
    /// Damping `c`.
    pub damping_constant: f32,
}

impl SpringDamper {
    pub fn new(
        p1: u32,
        p2: u32,
        kind: SpringKind,
        spacing: f32,
        spring_constant: f32,
        damping_constant: f32,
    ) -> Self {
        Self {
            p1,
            p2,
            kind,
            rest_length: kind.rest_length(spacing),
            spring_constant,
            damping_constant,
        }
    }

    /// Endpoint indices `(p1, p2)`.
    #[inline]
    pub fn endpoints(&self) -> (u32, u32) {
        (self.p1, self.p2)
    }

    #[inline]
    pub fn kind(&self) -> SpringKind {
        self.kind
    }

    #[inline]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Force on `p1` given the two endpoint states, or `None` when the
    /// endpoints coincide and no direction exists.
    ///
    /// `p2` receives the negation.
    pub fn force_on_first(&self, a: &Particle, b: &Particle) -> Option<Vec3> {
        let e = b.position - a.position;
        let length = e.length();
        if length < f32::EPSILON {
            return None;
        }
        let dir = e / length;

        let v_close = (a.velocity - b.velocity).dot(dir);
        let magnitude =
            -self.spring_constant * (self.rest_length - length) - self.damping_constant * v_close;

        Some(magnitude * dir)
    }

    /// Accumulate this spring's force into its endpoints.
    ///
    /// Returns `false` when the spring was skipped as degenerate.
    pub fn apply(&self, particles: &mut [Particle]) -> bool {
        let (i, j) = (self.p1 as usize, self.p2 as usize);
        let Some(force) = self.force_on_first(&particles[i], &particles[j]) else {
            return false;
        };
        particles[i].force += force;
        particles[j].force -= force;
        true
    }

    /// Elastic energy stored at the current separation.
    pub fn potential_energy(&self, particles: &[Particle]) -> f32 {
        let length = particles[self.p1 as usize]
            .position
            .distance(particles[self.p2 as usize].position);
        let stretch = length - self.rest_length;
        0.5 * self.spring_constant * stretch * stretch
    }
}
