//! Scene configuration for the runner.
//!
//! A scene describes one cloth and how to drive it. It is stored as JSON and
//! every field is optional; anything missing takes its default.

use drape::{ClothBuilder, ClothError, ClothGrid, ClothParams, PinPolicy, SimClock};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A cloth scene: construction inputs plus driving parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Grid dimension (particles per side).
    pub size: usize,
    /// Mass of each particle.
    pub mass: f32,
    /// Rest distance between neighbours.
    pub spacing: f32,
    /// Starting height of the flat cloth.
    pub initial_height: f32,
    /// Which particles are fixed.
    pub pins: PinPolicy,
    /// Physical constants.
    pub params: ClothParams,
    /// Fixed timestep in seconds.
    pub dt: f32,
    /// Number of steps to run.
    pub steps: u32,
    /// Ambient wind velocity.
    pub wind: Vec3,
    /// Velocity at which the fixed particles are carried.
    pub anchor_velocity: Vec3,
    /// Log a progress line every this many steps (0 = never).
    pub report_every: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            size: 24,
            mass: 0.02,
            spacing: drape::config::DEFAULT_SPACING,
            initial_height: drape::config::DEFAULT_INITIAL_HEIGHT,
            pins: PinPolicy::TopEdge,
            params: ClothParams {
                spring_constant: 150.0,
                damping_constant: 0.2,
                ..Default::default()
            },
            dt: 1.0 / 600.0,
            steps: 6000,
            wind: Vec3::new(0.0, 0.0, 3.0),
            anchor_velocity: Vec3::ZERO,
            report_every: 600,
        }
    }
}

impl SceneConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Build the cloth this scene describes.
    pub fn build_cloth(&self) -> Result<ClothGrid, ClothError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ClothError::InvalidConfiguration {
                reason: format!("timestep must be positive, got {}", self.dt),
            });
        }
        ClothBuilder::new(self.size)
            .with_mass(self.mass)
            .with_spacing(self.spacing)
            .with_initial_height(self.initial_height)
            .with_params(self.params.clone())
            .with_pins(self.pins.clone())
            .build()
    }

    /// Run `cloth` for `steps` fixed steps of `dt`, carrying the anchors
    /// along at `anchor_velocity`.
    ///
    /// `report` is called every `report_every` steps and once more at the
    /// end unless the last step was already reported.
    pub fn drive<F>(&self, cloth: &mut ClothGrid, mut report: F) -> Result<(), ClothError>
    where
        F: FnMut(&ClothGrid, &SimClock),
    {
        let mut clock = SimClock::new(self.dt)?;
        let anchor_step = self.anchor_velocity * self.dt;
        let total = u64::from(self.steps);
        let report_every = u64::from(self.report_every);

        while clock.steps() < total {
            // Headless, so every frame is exactly one fixed step
            let due = clock.advance(self.dt);
            if due == 0 {
                return Err(ClothError::InvalidConfiguration {
                    reason: format!("clock stalled at step {}", clock.steps()),
                });
            }
            for _ in 0..due {
                if anchor_step != Vec3::ZERO {
                    cloth.translate_fixed_particles(anchor_step);
                }
                cloth.step(self.dt, self.wind);
            }

            if report_every > 0 && clock.steps() % report_every == 0 {
                report(cloth, &clock);
            }
        }

        if report_every == 0 || total % report_every != 0 {
            report(cloth, &clock);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_builds() {
        let scene = SceneConfig::default();
        let cloth = scene.build_cloth().unwrap();
        assert_eq!(cloth.size(), scene.size);
        assert_eq!(cloth.fixed_count(), scene.size);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let scene: SceneConfig = serde_json::from_str(
            r#"{ "size": 4, "pins": { "kind": "TwoCorners" }, "params": { "restitution": 0.5 } }"#,
        )
        .unwrap();
        assert_eq!(scene.size, 4);
        assert_eq!(scene.pins, PinPolicy::TwoCorners);
        assert_eq!(scene.params.restitution, 0.5);
        assert_eq!(scene.dt, SceneConfig::default().dt);
    }

    #[test]
    fn test_rejects_bad_timestep() {
        let scene = SceneConfig {
            dt: 0.0,
            ..Default::default()
        };
        assert!(scene.build_cloth().is_err());
    }

    fn reported_steps(steps: u32, report_every: u32) -> Vec<u64> {
        let scene = SceneConfig {
            size: 3,
            steps,
            report_every,
            ..Default::default()
        };
        let mut cloth = scene.build_cloth().unwrap();
        let mut seen = Vec::new();
        scene
            .drive(&mut cloth, |_, clock| seen.push(clock.steps()))
            .unwrap();
        seen
    }

    #[test]
    fn test_drive_reports_each_step_once() {
        assert_eq!(reported_steps(10, 5), vec![5, 10]);
        assert_eq!(reported_steps(12, 5), vec![5, 10, 12]);
        assert_eq!(reported_steps(7, 0), vec![7]);
    }

    #[test]
    fn test_drive_advances_clock_and_anchors() {
        let scene = SceneConfig {
            size: 3,
            steps: 60,
            anchor_velocity: Vec3::new(1.0, 0.0, 0.0),
            report_every: 0,
            ..Default::default()
        };
        let mut cloth = scene.build_cloth().unwrap();
        let anchor = cloth.particle(0, 0).unwrap().position;

        let mut elapsed = 0.0;
        scene
            .drive(&mut cloth, |_, clock| elapsed = clock.elapsed())
            .unwrap();

        let expected = 60.0 * f64::from(scene.dt);
        assert!((elapsed - expected).abs() < 1e-6);
        let moved = cloth.particle(0, 0).unwrap().position - anchor;
        assert!((moved.x - 60.0 * scene.dt).abs() < 1e-4);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("drape-scene-{}.json", std::process::id()));
        let scene = SceneConfig {
            size: 5,
            wind: Vec3::new(1.0, 2.0, 3.0),
            pins: PinPolicy::Indices(vec![(0, 0), (0, 4)]),
            ..Default::default()
        };
        scene.save(&path).unwrap();
        let loaded = SceneConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(loaded, scene);
    }
}
