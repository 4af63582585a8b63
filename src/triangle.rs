//! Cloth faces: surface normals and aerodynamic drag.

use crate::particle::Particle;
use glam::Vec3;

/// Below this relative wind speed a face feels no drag.
const MIN_WIND_SPEED: f32 = 1e-6;

/// A triangular face over three particles.
///
/// Winding order decides which way [`Triangle::normal`] points. The normal
/// and relative wind velocity are scratch values refreshed every step.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    vertices: [u32; 3],
    /// Unit face normal from the last recomputation.
    pub normal: Vec3,
    /// Average vertex velocity minus wind, from the last drag pass.
    pub velocity: Vec3,
}

/// Air properties used by the drag model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aerodynamics {
    pub air_density: f32,
    pub drag_coefficient: f32,
    pub wind: Vec3,
}

impl Triangle {
    pub fn new(p1: u32, p2: u32, p3: u32) -> Self {
        Self {
            vertices: [p1, p2, p3],
            normal: Vec3::Y,
            velocity: Vec3::ZERO,
        }
    }

    #[inline]
    pub fn vertices(&self) -> [u32; 3] {
        self.vertices
    }

    fn corners<'a>(&self, particles: &'a [Particle]) -> [&'a Particle; 3] {
        self.vertices.map(|i| &particles[i as usize])
    }

    /// Unnormalized `(p2 - p1) × (p3 - p1)`; its length is twice the area.
    fn edge_cross(&self, particles: &[Particle]) -> Vec3 {
        let [a, b, c] = self.corners(particles);
        (b.position - a.position).cross(c.position - a.position)
    }

    /// Recompute the unit normal. A collapsed face keeps its previous normal.
    pub fn update_normal(&mut self, particles: &[Particle]) -> Vec3 {
        if let Some(n) = self.edge_cross(particles).try_normalize() {
            self.normal = n;
        }
        self.normal
    }

    /// Recompute the velocity of the face relative to the surrounding air.
    pub fn update_velocity(&mut self, particles: &[Particle], wind: Vec3) -> Vec3 {
        let [a, b, c] = self.corners(particles);
        self.velocity = (a.velocity + b.velocity + c.velocity) / 3.0 - wind;
        self.velocity
    }

    /// Area exposed to the relative wind, signed by which face it hits.
    ///
    /// Negative when the wind arrives from behind the normal.
    pub fn cross_sectional_area(&self, particles: &[Particle]) -> f32 {
        let area = 0.5 * self.edge_cross(particles).length();
        area * self.velocity.normalize_or_zero().dot(self.normal)
    }

    /// Accumulate drag into the three vertices, a third each.
    ///
    /// Returns `false` when skipped because the face is collapsed or has no
    /// relative wind.
    pub fn apply_drag(&mut self, particles: &mut [Particle], air: &Aerodynamics) -> bool {
        let cross = self.edge_cross(particles);
        let Some(normal) = cross.try_normalize() else {
            return false;
        };
        self.normal = normal;

        let velocity = self.update_velocity(particles, air.wind);
        let speed_sq = velocity.length_squared();
        if speed_sq < MIN_WIND_SPEED * MIN_WIND_SPEED {
            return false;
        }

        let area = 0.5 * cross.length() * (velocity / speed_sq.sqrt()).dot(normal);
        let drag = -0.5 * air.air_density * air.drag_coefficient * speed_sq * area * normal;

        let share = drag / 3.0;
        for i in self.vertices {
            particles[i as usize].force += share;
        }
        true
    }
}
