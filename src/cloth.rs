//! The cloth grid: construction, stepping and export.
//!
//! A [`ClothGrid`] owns a square `size × size` arena of [`Particle`]s, the
//! [`SpringDamper`]s wiring them together and the [`Triangle`]s covering
//! them. Topology is built once; each [`ClothGrid::step`] only moves
//! particles:
//!
//! 1. zero forces
//! 2. gravity, springs, drag
//! 3. Verlet integration, with ground collision for particles that dip
//!    below `y = 0`
//! 4. smooth vertex normals
//!
//! # Example
//!
//! ```
//! use drape::{ClothBuilder, ClothParams, PinPolicy};
//! use glam::Vec3;
//!
//! let mut cloth = ClothBuilder::new(16)
//!     .with_mass(0.05)
//!     .with_spacing(0.1)
//!     .with_params(ClothParams { spring_constant: 200.0, ..Default::default() })
//!     .with_pins(PinPolicy::TwoCorners)
//!     .build()
//!     .unwrap();
//!
//! for _ in 0..10 {
//!     cloth.step(1.0 / 240.0, Vec3::new(2.0, 0.0, 0.0));
//! }
//! let geometry = cloth.export_geometry();
//! assert_eq!(geometry.vertices.len(), 16 * 16);
//! ```

use crate::collision::GroundContact;
use crate::config::{ClothParams, PinPolicy, DEFAULT_INITIAL_HEIGHT, DEFAULT_MASS, DEFAULT_SPACING};
use crate::error::ClothError;
use crate::geometry::{ClothVertex, Geometry};
use crate::particle::Particle;
use crate::spring::{SpringDamper, SpringKind};
use crate::triangle::{Aerodynamics, Triangle};
use glam::Vec3;

/// Predicate choosing which `(row, col)` cells are fixed.
type PinFn = Box<dyn Fn(usize, usize) -> bool>;

/// A cloth builder.
///
/// Use method chaining to configure, then call `.build()`.
pub struct ClothBuilder {
    size: usize,
    mass: f32,
    spacing: f32,
    initial_height: f32,
    params: ClothParams,
    pins: PinFn,
}

impl ClothBuilder {
    /// Start a `size × size` cloth with default settings, top row pinned.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            mass: DEFAULT_MASS,
            spacing: DEFAULT_SPACING,
            initial_height: DEFAULT_INITIAL_HEIGHT,
            params: ClothParams::default(),
            pins: Box::new(|row, _| row == 0),
        }
    }

    /// Set the mass of every particle.
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the rest distance between axis-adjacent particles.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the height the flat cloth starts at.
    pub fn with_initial_height(mut self, height: f32) -> Self {
        self.initial_height = height;
        self
    }

    /// Set the physical parameters.
    pub fn with_params(mut self, params: ClothParams) -> Self {
        self.params = params;
        self
    }

    /// Pin particles according to a preset policy.
    pub fn with_pins(mut self, policy: PinPolicy) -> Self {
        let size = self.size;
        self.pins = Box::new(move |row, col| policy.is_pinned(row, col, size));
        self
    }

    /// Pin particles for which `predicate(row, col)` holds.
    pub fn with_pin_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(usize, usize) -> bool + 'static,
    {
        self.pins = Box::new(predicate);
        self
    }

    /// Validate the configuration and build the grid.
    pub fn build(self) -> Result<ClothGrid, ClothError> {
        if self.size < 2 {
            return Err(ClothError::invalid(format!(
                "size must be at least 2, got {}",
                self.size
            )));
        }
        let count = self
            .size
            .checked_mul(self.size)
            .and_then(|n| u32::try_from(n).ok());
        if count.is_none() {
            return Err(ClothError::invalid(format!(
                "size {} has too many particles to index",
                self.size
            )));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ClothError::invalid(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(ClothError::invalid(format!(
                "spacing must be positive, got {}",
                self.spacing
            )));
        }
        if !self.initial_height.is_finite() {
            return Err(ClothError::invalid("initial height must be finite"));
        }
        self.params.validate()?;

        Ok(ClothGrid::assemble(self))
    }
}

/// A square cloth of spring-connected particles.
#[derive(Clone, Debug)]
pub struct ClothGrid {
    size: usize,
    spacing: f32,
    params: ClothParams,
    particles: Vec<Particle>,
    springs: Vec<SpringDamper>,
    triangles: Vec<Triangle>,
    indices: Vec<u32>,
}

impl ClothGrid {
    /// Build a cloth with default physical parameters.
    ///
    /// `is_fixed(row, col)` selects the pinned particles.
    pub fn new<F>(
        size: usize,
        mass: f32,
        spacing: f32,
        initial_height: f32,
        is_fixed: F,
    ) -> Result<Self, ClothError>
    where
        F: Fn(usize, usize) -> bool + 'static,
    {
        ClothBuilder::new(size)
            .with_mass(mass)
            .with_spacing(spacing)
            .with_initial_height(initial_height)
            .with_pin_predicate(is_fixed)
            .build()
    }

    /// Lay out particles, springs and triangles from a validated builder.
    fn assemble(builder: ClothBuilder) -> Self {
        let ClothBuilder {
            size,
            mass,
            spacing,
            initial_height,
            params,
            pins,
        } = builder;

        let cells = size - 1;
        let mut particles = Vec::with_capacity(size * size);
        let mut springs = Vec::with_capacity(cells * (4 * size - 2));
        let mut triangles = Vec::with_capacity(2 * cells * cells);

        let id = |i: usize, j: usize| (i * size + j) as u32;
        let spring = |a: u32, b: u32, kind: SpringKind| {
            SpringDamper::new(
                a,
                b,
                kind,
                spacing,
                params.spring_constant,
                params.damping_constant,
            )
        };

        for i in 0..size {
            for j in 0..size {
                let position = Vec3::new(j as f32 * spacing, initial_height, i as f32 * spacing);
                particles.push(Particle::new(position, mass, pins(i, j), id(i, j)));

                let me = id(i, j);
                if j > 0 {
                    springs.push(spring(id(i, j - 1), me, SpringKind::Structural));
                }
                if i > 0 {
                    springs.push(spring(id(i - 1, j), me, SpringKind::Structural));
                    if j > 0 {
                        springs.push(spring(id(i - 1, j - 1), me, SpringKind::Shear));
                    }
                    if j + 1 < size {
                        springs.push(spring(id(i - 1, j + 1), me, SpringKind::Shear));
                    }
                }

                // Wound so a flat, freshly built cloth faces +Y
                if i > 0 && j > 0 {
                    triangles.push(Triangle::new(me, id(i - 1, j - 1), id(i, j - 1)));
                    triangles.push(Triangle::new(me, id(i - 1, j), id(i - 1, j - 1)));
                }
            }
        }

        let indices = triangles.iter().flat_map(Triangle::vertices).collect();

        let grid = Self {
            size,
            spacing,
            params,
            particles,
            springs,
            triangles,
            indices,
        };

        tracing::debug!(
            size,
            particles = grid.particles.len(),
            springs = grid.springs.len(),
            triangles = grid.triangles.len(),
            fixed = grid.fixed_count(),
            "built cloth grid"
        );
        grid
    }

    /// Advance the simulation by `dt` seconds in the given ambient wind.
    ///
    /// A non-positive or non-finite `dt` leaves the cloth untouched.
    pub fn step(&mut self, dt: f32, wind: Vec3) {
        if !(dt.is_finite() && dt > 0.0) {
            tracing::warn!(dt, "ignoring cloth step with non-positive timestep");
            return;
        }

        self.accumulate_forces(wind);
        self.integrate(dt);
        self.recompute_normals();
    }

    fn accumulate_forces(&mut self, wind: Vec3) {
        let gravity = self.params.gravity;
        for p in &mut self.particles {
            p.force = p.mass * gravity;
        }

        let mut skipped = 0usize;
        for spring in &self.springs {
            if !spring.apply(&mut self.particles) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            tracing::trace!(skipped, "skipped zero-length springs");
        }

        if self.params.air_density > 0.0 && self.params.drag_coefficient > 0.0 {
            let air = Aerodynamics {
                air_density: self.params.air_density,
                drag_coefficient: self.params.drag_coefficient,
                wind,
            };
            let mut calm = 0usize;
            for triangle in &mut self.triangles {
                if !triangle.apply_drag(&mut self.particles, &air) {
                    calm += 1;
                }
            }
            if calm > 0 {
                tracing::trace!(calm, "skipped faces without relative wind");
            }
        }
    }

    fn integrate(&mut self, dt: f32) {
        let ground = self.params.ground_collision.then_some(GroundContact {
            restitution: self.params.restitution,
            friction_coefficient: self.params.friction_coefficient,
        });

        for p in self.particles.iter_mut().filter(|p| !p.fixed) {
            let acceleration = p.verlet_step(dt);
            match ground {
                Some(ground) if GroundContact::penetrates(p) => {
                    ground.resolve(p, acceleration, dt)
                }
                _ => p.velocity += acceleration * dt,
            }
        }
    }

    fn recompute_normals(&mut self) {
        for p in self.particles.iter_mut().filter(|p| !p.fixed) {
            p.normal = Vec3::ZERO;
        }

        for triangle in &mut self.triangles {
            let n = triangle.update_normal(&self.particles);
            for i in triangle.vertices() {
                self.particles[i as usize].normal += n;
            }
        }

        for p in &mut self.particles {
            p.normal = p.normal.try_normalize().unwrap_or(Vec3::Y);
        }
    }

    /// Copy positions, normals and the triangulation out for rendering.
    pub fn export_geometry(&self) -> Geometry {
        Geometry {
            vertices: self
                .particles
                .iter()
                .map(|p| ClothVertex::new(p.position, p.normal))
                .collect(),
            indices: self.indices.clone(),
        }
    }

    /// Rigidly move every fixed particle, e.g. to animate the anchors.
    ///
    /// Free particles follow through the springs on later steps.
    pub fn translate_fixed_particles(&mut self, delta: Vec3) {
        for p in self.particles.iter_mut().filter(|p| p.fixed) {
            p.translate(delta);
        }
    }

    /// Move one particle without giving it velocity.
    pub fn displace_particle(&mut self, row: usize, col: usize, delta: Vec3) -> Result<(), ClothError> {
        let index = self.index_of(row, col)?;
        self.particles[index].translate(delta);
        Ok(())
    }

    /// Arena index of `(row, col)`.
    pub fn index_of(&self, row: usize, col: usize) -> Result<usize, ClothError> {
        if row >= self.size || col >= self.size {
            return Err(ClothError::InvalidParticle {
                row,
                col,
                size: self.size,
            });
        }
        Ok(row * self.size + col)
    }

    /// Grid dimension.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    #[inline]
    pub fn params(&self) -> &ClothParams {
        &self.params
    }

    pub fn particle(&self, row: usize, col: usize) -> Option<&Particle> {
        self.index_of(row, col).ok().map(|i| &self.particles[i])
    }

    /// All particles in row-major order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn springs(&self) -> &[SpringDamper] {
        &self.springs
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Triangulation fixed at construction, three indices per face.
    ///
    /// Faces are wound counter-clockwise seen from `+Y`, so a flat cloth's
    /// front face points up.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn fixed_count(&self) -> usize {
        self.particles.iter().filter(|p| p.fixed).count()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.particles
            .iter()
            .filter(|p| !p.fixed)
            .map(Particle::kinetic_energy)
            .sum()
    }

    pub fn spring_potential_energy(&self) -> f32 {
        self.springs
            .iter()
            .map(|s| s.potential_energy(&self.particles))
            .sum()
    }

    /// Gravitational potential relative to the origin.
    pub fn gravitational_potential_energy(&self) -> f32 {
        let g = self.params.gravity;
        self.particles
            .iter()
            .filter(|p| !p.fixed)
            .map(|p| -p.mass * g.dot(p.position))
            .sum()
    }

    pub fn total_energy(&self) -> f32 {
        self.kinetic_energy() + self.spring_potential_energy() + self.gravitational_potential_energy()
    }

    /// Axis-aligned bounds of all particle positions as `(min, max)`.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        self.particles.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(p.position), hi.max(p.position)),
        )
    }
}
