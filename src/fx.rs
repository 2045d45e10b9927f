//! Decorative end-screen drops
//!
//! Trophies rain down on the win screen, tears on the lose screen, and the
//! win screen also gets a steady shower of confetti. Purely cosmetic: the
//! session starts and stops the effect, nothing reads it back except the
//! renderer.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which end screen is decorating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FxStyle {
    Trophies,
    Tears,
}

impl FxStyle {
    /// Seconds between new drops
    fn spawn_interval(&self) -> f32 {
        match self {
            FxStyle::Trophies => 0.6,
            FxStyle::Tears => 0.5,
        }
    }

    fn sizes(&self) -> &'static [f32] {
        match self {
            FxStyle::Trophies => &[25.0, 35.0, 45.0, 55.0],
            FxStyle::Tears => &[20.0, 30.0, 40.0, 50.0],
        }
    }

    /// (min, max) fall speed in pixels per tick
    fn speed_range(&self) -> (f32, f32) {
        match self {
            FxStyle::Trophies => (1.5, 3.5),
            FxStyle::Tears => (1.0, 3.0),
        }
    }

    /// Max spin in degrees per tick, either direction
    fn max_spin(&self) -> f32 {
        match self {
            FxStyle::Trophies => 1.5,
            FxStyle::Tears => 2.0,
        }
    }
}

/// One spinning drop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxDrop {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// Degrees
    pub rotation: f32,
    pub spin: f32,
}

/// Seconds between confetti pieces on the win screen
const CONFETTI_INTERVAL: f32 = 0.05;
/// Number of entries in the renderer's confetti palette
pub const CONFETTI_COLORS: u8 = 5;

/// One fluttering confetti piece
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfettiPiece {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per tick, x is sideways drift
    pub velocity: Vec2,
    /// Degrees
    pub rotation: f32,
    pub spin: f32,
    /// Palette index, below [`CONFETTI_COLORS`]
    pub color: u8,
}

/// Drop emitter for the active end screen
#[derive(Debug, Clone, Default)]
pub struct EndScreenFx {
    style: Option<FxStyle>,
    drops: Vec<FxDrop>,
    confetti: Vec<ConfettiPiece>,
    since_spawn: f32,
    since_confetti: f32,
}

impl EndScreenFx {
    pub fn start(&mut self, style: FxStyle) {
        log::debug!("Starting {:?} end-screen effect", style);
        self.style = Some(style);
        self.drops.clear();
        self.confetti.clear();
        self.since_spawn = 0.0;
        self.since_confetti = 0.0;
    }

    pub fn stop(&mut self) {
        if self.style.take().is_some() {
            log::debug!("Stopped end-screen effect");
        }
        self.drops.clear();
        self.confetti.clear();
        self.since_spawn = 0.0;
        self.since_confetti = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.style.is_some()
    }

    pub fn style(&self) -> Option<FxStyle> {
        self.style
    }

    pub fn drops(&self) -> &[FxDrop] {
        &self.drops
    }

    pub fn confetti(&self) -> &[ConfettiPiece] {
        &self.confetti
    }

    /// Spawn on the interval, fall, spin, and forget drops below the screen
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R, width: f32, height: f32) {
        let Some(style) = self.style else {
            return;
        };

        self.since_spawn += dt;
        while self.since_spawn >= style.spawn_interval() {
            self.since_spawn -= style.spawn_interval();
            let sizes = style.sizes();
            let size = sizes[rng.random_range(0..sizes.len())];
            let (min_speed, max_speed) = style.speed_range();
            let spin = style.max_spin();
            self.drops.push(FxDrop {
                pos: Vec2::new(rng.random_range(0.0..width), -size),
                size,
                speed: rng.random_range(min_speed..max_speed),
                rotation: rng.random_range(0.0..360.0),
                spin: rng.random_range(-spin..spin),
            });
        }

        for drop in &mut self.drops {
            drop.pos.y += drop.speed;
            drop.rotation = (drop.rotation + drop.spin).rem_euclid(360.0);
        }
        self.drops.retain(|d| d.pos.y <= height + d.size);

        if style == FxStyle::Trophies {
            self.update_confetti(dt, rng, width, height);
        }
    }

    fn update_confetti<R: Rng>(&mut self, dt: f32, rng: &mut R, width: f32, height: f32) {
        self.since_confetti += dt;
        while self.since_confetti >= CONFETTI_INTERVAL {
            self.since_confetti -= CONFETTI_INTERVAL;
            let size = rng.random_range(6.0..10.0);
            self.confetti.push(ConfettiPiece {
                pos: Vec2::new(rng.random_range(0.0..width), -size),
                size,
                velocity: Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(2.0..4.0)),
                rotation: rng.random_range(0.0..360.0),
                spin: rng.random_range(-8.0..8.0),
                color: rng.random_range(0..CONFETTI_COLORS),
            });
        }

        for piece in &mut self.confetti {
            piece.pos += piece.velocity;
            piece.rotation = (piece.rotation + piece.spin).rem_euclid(360.0);
        }
        self.confetti.retain(|c| c.pos.y <= height + c.size);
    }
}
