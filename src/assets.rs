//! Sprite table and load tracking
//!
//! Every picture the game draws has a [`SpriteKey`]. The browser shell
//! preloads each path and reports back; a failed image is logged and drawn
//! with a fallback color, it never stops the game.

use std::collections::HashMap;

use thiserror::Error;

use crate::sim::{CatcherVariant, EntityKind, HazardKind};

/// Sprite failed to load
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("failed to load sprite {key:?} from {path}")]
    LoadFailed { key: SpriteKey, path: &'static str },
}

/// Every sprite the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Collectible,
    Hazard(HazardKind),
    CatcherOpen,
    CatcherChomp,
    MinusOne,
    Tear,
    Trophy,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 10] = [
        SpriteKey::Collectible,
        SpriteKey::Hazard(HazardKind::Ball),
        SpriteKey::Hazard(HazardKind::Poop),
        SpriteKey::Hazard(HazardKind::Hanger),
        SpriteKey::Hazard(HazardKind::Boots),
        SpriteKey::CatcherOpen,
        SpriteKey::CatcherChomp,
        SpriteKey::MinusOne,
        SpriteKey::Tear,
        SpriteKey::Trophy,
    ];

    /// Image path relative to the page
    pub fn path(&self) -> &'static str {
        match self {
            SpriteKey::Collectible => "assets/laddoo.png",
            SpriteKey::Hazard(HazardKind::Ball) => "assets/ball.png",
            SpriteKey::Hazard(HazardKind::Poop) => "assets/poop.png",
            SpriteKey::Hazard(HazardKind::Hanger) => "assets/hanger.png",
            SpriteKey::Hazard(HazardKind::Boots) => "assets/boots.png",
            SpriteKey::CatcherOpen => "assets/character-open.png",
            SpriteKey::CatcherChomp => "assets/character-neutral.png",
            SpriteKey::MinusOne => "assets/-1.png",
            SpriteKey::Tear => "assets/cry.png",
            SpriteKey::Trophy => "assets/trophy.png",
        }
    }

    pub fn for_entity(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Collectible => SpriteKey::Collectible,
            EntityKind::Hazard(h) => SpriteKey::Hazard(h),
        }
    }

    pub fn for_catcher(variant: CatcherVariant) -> Self {
        match variant {
            CatcherVariant::Open => SpriteKey::CatcherOpen,
            CatcherVariant::Chomp => SpriteKey::CatcherChomp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Loaded,
    Failed,
}

/// Tracks which sprites made it
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    states: HashMap<SpriteKey, LoadState>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_loaded(&mut self, key: SpriteKey) {
        log::debug!("Loaded sprite {}", key.path());
        self.states.insert(key, LoadState::Loaded);
    }

    /// Record a failure. Logged, never fatal.
    pub fn mark_failed(&mut self, key: SpriteKey) -> AssetError {
        let err = AssetError::LoadFailed {
            key,
            path: key.path(),
        };
        log::error!("{err}");
        self.states.insert(key, LoadState::Failed);
        err
    }

    /// Every sprite has either loaded or failed
    pub fn is_settled(&self) -> bool {
        SpriteKey::ALL.iter().all(|k| self.states.contains_key(k))
    }

    /// Whether the real image can be drawn
    pub fn is_available(&self, key: SpriteKey) -> bool {
        self.states.get(&key) == Some(&LoadState::Loaded)
    }

    pub fn failures(&self) -> Vec<SpriteKey> {
        SpriteKey::ALL
            .into_iter()
            .filter(|k| self.states.get(k) == Some(&LoadState::Failed))
            .collect()
    }
}
