//! Short-lived feedback cues shown after a catch

use serde::{Deserialize, Serialize};

use super::schedule::TaskId;

/// Alpha gained per tick while the "-1" pops in
const MINUS_ONE_FADE_IN: f32 = 0.2;
/// Scale gained per tick while the "-1" pops in
const MINUS_ONE_GROW: f32 = 0.1;
/// Alpha lost per tick once the "-1" starts fading out
const MINUS_ONE_FADE_OUT: f32 = 0.15;
const MINUS_ONE_START_SCALE: f32 = 0.5;

/// Catcher chomps for a moment after catching anything
#[derive(Debug, Clone, Default)]
pub struct MouthCue {
    pub active: bool,
    pub(crate) expiry: Option<TaskId>,
}

/// The "-1" popup after a penalized hazard
#[derive(Debug, Clone, Default)]
pub struct MinusOneCue {
    pub active: bool,
    pub alpha: f32,
    pub scale: f32,
    /// Seconds since the cue was (re)triggered
    pub elapsed: f32,
    pub(crate) expiry: Option<TaskId>,
}

impl MinusOneCue {
    pub(crate) fn restart(&mut self) {
        self.active = true;
        self.alpha = 0.0;
        self.scale = MINUS_ONE_START_SCALE;
        self.elapsed = 0.0;
    }

    /// Per-tick animation: pop in, then fade once `fade_out_after` has passed
    pub fn update(&mut self, dt: f32, fade_out_after: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        if self.elapsed < fade_out_after {
            self.alpha = (self.alpha + MINUS_ONE_FADE_IN).min(1.0);
        } else {
            self.alpha = (self.alpha - MINUS_ONE_FADE_OUT).max(0.0);
        }
        self.scale = (self.scale + MINUS_ONE_GROW).min(1.0);
    }

    pub(crate) fn hide(&mut self) {
        self.active = false;
        self.alpha = 0.0;
        self.scale = MINUS_ONE_START_SCALE;
        self.elapsed = 0.0;
    }
}

/// Both cues, as the renderer sees them
#[derive(Debug, Clone, Default)]
pub struct Cues {
    pub mouth: MouthCue,
    pub minus_one: MinusOneCue,
}

/// What the renderer needs to draw the "-1"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinusOneVisual {
    pub alpha: f32,
    pub scale: f32,
}

impl Cues {
    /// Turn both cues off. Expiry handles must already be cancelled.
    pub(crate) fn clear(&mut self) {
        self.mouth.active = false;
        self.mouth.expiry = None;
        self.minus_one.hide();
        self.minus_one.expiry = None;
    }

    pub fn minus_one_visual(&self) -> Option<MinusOneVisual> {
        self.minus_one.active.then_some(MinusOneVisual {
            alpha: self.minus_one.alpha,
            scale: self.minus_one.scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_minus_one_pops_in() {
        let mut cue = MinusOneCue::default();
        cue.restart();
        assert_eq!(cue.scale, 0.5);
        for _ in 0..5 {
            cue.update(DT, 0.3);
        }
        assert!((cue.alpha - 1.0).abs() < 1e-5);
        assert!((cue.scale - 1.0).abs() < 1e-5);
        // Stays capped
        cue.update(DT, 0.3);
        assert!(cue.alpha <= 1.0 && cue.scale <= 1.0);
    }

    #[test]
    fn test_minus_one_fades_after_threshold() {
        let mut cue = MinusOneCue::default();
        cue.restart();
        // ~0.33 s of ticks
        for _ in 0..20 {
            cue.update(DT, 0.3);
        }
        assert!(cue.alpha < 1.0);
        for _ in 0..20 {
            cue.update(DT, 0.3);
        }
        assert_eq!(cue.alpha, 0.0);
        assert!(cue.active, "expiry is the scheduler's job, not the animation's");
    }

    #[test]
    fn test_inactive_cue_does_not_animate() {
        let mut cue = MinusOneCue::default();
        cue.update(DT, 0.3);
        assert_eq!(cue.alpha, 0.0);
        assert_eq!(cue.elapsed, 0.0);
    }

    #[test]
    fn test_visual_only_while_active() {
        let mut cues = Cues::default();
        assert!(cues.minus_one_visual().is_none());
        cues.minus_one.restart();
        assert!(cues.minus_one_visual().is_some());
        cues.clear();
        assert!(cues.minus_one_visual().is_none());
        assert!(!cues.mouth.active);
    }
}
