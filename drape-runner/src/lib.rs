//! drape runner
//!
//! Loads a cloth scene from JSON and runs it headless.

pub mod config;

pub use config::SceneConfig;
