//! Laddoo Catch - a single-screen catch-the-falling-sweets arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, game state)
//! - `fx`: Decorative end-screen animations
//! - `renderer`: WebGPU rendering pipeline
//! - `assets`: Sprite table and load tracking
//! - `tuning`: Data-driven game balance
//! - `ui`: Screen chrome derived from game state

pub mod assets;
pub mod fx;
pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use assets::{AssetError, AssetRegistry, SpriteKey};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate entity speeds are tuned for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta fed into the accumulator (tab switches, stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical playfield size; the canvas scales this, game coords never change
    pub const BASE_WIDTH: f32 = 375.0;
    pub const BASE_HEIGHT: f32 = 667.0;
}
