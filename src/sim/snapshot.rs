//! Read-only view of a session for the renderer and the DOM shell

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::cues::MinusOneVisual;
use super::entity::EntityKind;
use super::state::{CatcherVariant, GamePhase, GameState};
use crate::fx::{ConfettiPiece, FxDrop, FxStyle};

/// One falling entity as drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub rect: Rect,
    pub kind: EntityKind,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub width: f32,
    pub height: f32,
    pub catcher: Rect,
    pub catcher_variant: CatcherVariant,
    /// Collectibles first, then hazards
    pub entities: Vec<EntityView>,
    pub score: u32,
    pub target_score: u32,
    pub time_left: u32,
    pub timer_fill_percent: f32,
    pub countdown: u8,
    pub minus_one: Option<MinusOneVisual>,
    pub fx_style: Option<FxStyle>,
    pub fx_drops: Vec<FxDrop>,
    pub confetti: Vec<ConfettiPiece>,
}

impl Snapshot {
    /// Playfield items only matter while a round is on screen
    pub fn shows_playfield(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let entities = self
            .collectibles
            .iter()
            .chain(self.hazards.iter())
            .map(|e| EntityView {
                rect: e.bounds(),
                kind: e.kind,
            })
            .collect();

        Snapshot {
            phase: self.phase,
            width: self.tuning.game_width,
            height: self.tuning.game_height,
            catcher: self.catcher.bounds(),
            catcher_variant: self.catcher_variant(),
            entities,
            score: self.score,
            target_score: self.tuning.target_score,
            time_left: self.time_left,
            timer_fill_percent: self.timer_fill_percent(),
            countdown: self.countdown,
            minus_one: self.cues.minus_one_visual(),
            fx_style: self.fx.style(),
            fx_drops: self.fx.drops().to_vec(),
            confetti: self.fx.confetti().to_vec(),
        }
    }
}
