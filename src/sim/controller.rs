//! Catcher steering
//!
//! Keys, drag gestures and the on-screen buttons all reduce to one signed
//! horizontal displacement per tick. Their effects simply add up.

use std::collections::HashSet;

use super::entity::FallingEntity;
use super::state::{Catcher, GameState};
use crate::tuning::Tuning;

/// Horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// A left key is held
    pub key_left: bool,
    /// A right key is held
    pub key_right: bool,
    /// On-screen left button is held
    pub button_left: bool,
    /// On-screen right button is held
    pub button_right: bool,
    /// Pointer x in playfield units while a drag is in progress
    pub pointer_x: Option<f32>,
    /// Where a drag started since the last tick; re-anchors the drag
    pub pointer_anchor: Option<f32>,
    /// Idle/demo mode - autopilot steers the catcher
    pub idle_mode: bool,
}

/// Accumulates raw platform events into the per-tick [`TickInput`]
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held_keys: HashSet<String>,
    pointer_x: Option<f32>,
    /// Latched on pointer start, handed out once by `tick_input`
    pointer_anchor: Option<f32>,
    button_left: bool,
    button_right: bool,
    pub idle_mode: bool,
}

impl InputState {
    pub fn key_down(&mut self, key: &str) {
        self.held_keys.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held_keys.remove(key);
    }

    pub fn pointer_start(&mut self, x: f32) {
        self.pointer_x = Some(x);
        self.pointer_anchor = Some(x);
    }

    pub fn pointer_move(&mut self, x: f32) {
        if self.pointer_x.is_some() {
            self.pointer_x = Some(x);
        }
    }

    /// Pointer lifted or cancelled; also releases the on-screen buttons
    pub fn pointer_end(&mut self) {
        self.pointer_x = None;
        self.pointer_anchor = None;
        self.button_left = false;
        self.button_right = false;
    }

    pub fn button(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Left => self.button_left = pressed,
            Direction::Right => self.button_right = pressed,
        }
    }

    /// Forget everything held (focus loss, screen change)
    pub fn release_all(&mut self) {
        self.held_keys.clear();
        self.pointer_end();
    }

    fn key_held(&self, direction: Direction) -> bool {
        self.held_keys
            .iter()
            .any(|k| Direction::from_key(k) == Some(direction))
    }

    /// Input for the next tick. A pending drag start is consumed here.
    pub fn tick_input(&mut self) -> TickInput {
        TickInput {
            key_left: self.key_held(Direction::Left),
            key_right: self.key_held(Direction::Right),
            button_left: self.button_left,
            button_right: self.button_right,
            pointer_x: self.pointer_x,
            pointer_anchor: self.pointer_anchor.take(),
            idle_mode: self.idle_mode,
        }
    }
}

/// Smoothed drag follow.
///
/// Each tick the catcher moves by a fraction of the distance between the
/// pointer and an anchor, and the anchor then chases the pointer by half of
/// that movement. Holding the pointer still lets the catcher glide to a stop
/// instead of jumping to the finger. A new touch always re-anchors at the
/// point where it started.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    anchor: Option<f32>,
}

impl DragTracker {
    pub fn anchor(&self) -> Option<f32> {
        self.anchor
    }

    pub fn displacement(
        &mut self,
        pointer_x: Option<f32>,
        started_at: Option<f32>,
        tuning: &Tuning,
    ) -> f32 {
        let Some(x) = pointer_x else {
            self.anchor = None;
            return 0.0;
        };
        if started_at.is_some() {
            self.anchor = started_at;
        }
        let anchor = *self.anchor.get_or_insert(x);

        let delta = x - anchor;
        if delta.abs() <= tuning.drag_deadzone {
            return 0.0;
        }
        let movement = delta * tuning.drag_sensitivity;
        self.anchor = Some(anchor + movement * tuning.drag_anchor_follow);
        movement
    }

    pub fn reset(&mut self) {
        self.anchor = None;
    }
}

/// Turns a [`TickInput`] into catcher motion
#[derive(Debug, Clone, Default)]
pub struct Controller {
    pub drag: DragTracker,
}

impl Controller {
    /// Signed displacement for this tick
    pub fn displacement(&mut self, input: &TickInput, tuning: &Tuning) -> f32 {
        let step = tuning.catcher_step;
        let mut dx = 0.0;

        if input.key_left {
            dx -= step;
        }
        if input.key_right {
            dx += step;
        }

        dx += self
            .drag
            .displacement(input.pointer_x, input.pointer_anchor, tuning);

        if input.button_left {
            dx -= step;
        }
        if input.button_right {
            dx += step;
        }
        dx
    }

    /// Move and clamp the catcher
    pub fn apply(&mut self, catcher: &mut Catcher, input: &TickInput, tuning: &Tuning) {
        let dx = self.displacement(input, tuning);
        catcher.x = (catcher.x + dx).clamp(0.0, tuning.game_width - catcher.width);
    }

    pub fn reset(&mut self) {
        self.drag.reset();
    }
}

/// How far above the catcher a hazard counts as incoming
const DANGER_ZONE: f32 = 140.0;

/// Demo steering: chase the lowest sweet that can still be reached, and step
/// aside when junk is about to land on the catcher.
pub fn autopilot_input(state: &GameState) -> TickInput {
    let catcher = state.catcher.bounds();
    let catcher_mid = catcher.center().x;
    let step = state.tuning.catcher_step;

    let overlaps_x = |e: &FallingEntity, margin: f32| {
        e.pos.x - margin < catcher.max().x && e.pos.x + e.size.x + margin > catcher.min.x
    };

    let threat = state.hazards.iter().find(|h| {
        let gap = catcher.min.y - (h.pos.y + h.size.y);
        (0.0..DANGER_ZONE).contains(&gap) && overlaps_x(h, step)
    });

    let target_x = if let Some(h) = threat {
        // Dodge toward whichever side has more room
        let hazard_mid = h.pos.x + h.size.x / 2.0;
        if hazard_mid > catcher_mid || catcher.max().x + h.size.x >= state.tuning.game_width {
            hazard_mid - h.size.x - catcher.size.x
        } else {
            hazard_mid + h.size.x + catcher.size.x
        }
    } else {
        let reachable = state.collectibles.iter().filter(|c| {
            let ticks_left = (catcher.min.y - c.pos.y) / c.speed.max(0.1);
            let distance = (c.pos.x + c.size.x / 2.0 - catcher_mid).abs();
            ticks_left > 0.0 && distance <= ticks_left * step + c.size.x
        });
        match reachable.max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)) {
            Some(c) => c.pos.x + c.size.x / 2.0,
            None => return TickInput::default(),
        }
    };

    let offset = target_x - catcher_mid;
    TickInput {
        key_left: offset < -step / 2.0,
        key_right: offset > step / 2.0,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn catcher_at(x: f32) -> Catcher {
        let mut c = Catcher::new(&Tuning::default());
        c.x = x;
        c
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("A"), Some(Direction::Left));
        assert_eq!(Direction::from_key("d"), Some(Direction::Right));
        assert_eq!(Direction::from_key("w"), None);
    }

    #[test]
    fn test_keys_and_buttons_add_up() {
        let tuning = Tuning::default();
        let mut controller = Controller::default();
        let input = TickInput {
            key_right: true,
            button_right: true,
            ..Default::default()
        };
        assert_eq!(controller.displacement(&input, &tuning), 10.0);

        let opposed = TickInput {
            key_left: true,
            button_right: true,
            ..Default::default()
        };
        assert_eq!(controller.displacement(&opposed, &tuning), 0.0);
    }

    #[test]
    fn test_drag_smoothing() {
        let tuning = Tuning::default();
        let mut drag = DragTracker::default();

        // Pointer down sets the anchor; no movement yet
        assert_eq!(drag.displacement(Some(100.0), Some(100.0), &tuning), 0.0);
        assert_eq!(drag.anchor(), Some(100.0));

        // 20 px drag: move 16, anchor follows by 8
        let moved = drag.displacement(Some(120.0), None, &tuning);
        assert!((moved - 16.0).abs() < 1e-5);
        assert_eq!(drag.anchor(), Some(108.0));

        // Holding still keeps gliding, shrinking each tick
        let second = drag.displacement(Some(120.0), None, &tuning);
        assert!(second > 0.0 && second < moved);
    }

    #[test]
    fn test_drag_deadzone_and_release() {
        let tuning = Tuning::default();
        let mut drag = DragTracker::default();
        drag.displacement(Some(100.0), Some(100.0), &tuning);
        assert_eq!(drag.displacement(Some(101.5), None, &tuning), 0.0);
        assert_eq!(drag.displacement(None, None, &tuning), 0.0);
        assert_eq!(drag.anchor(), None);
    }

    #[test]
    fn test_new_touch_between_ticks_does_not_jump() {
        let tuning = Tuning::default();
        let mut controller = Controller::default();
        let mut input = InputState::default();
        let mut catcher = catcher_at(157.5);

        input.pointer_start(100.0);
        controller.apply(&mut catcher, &input.tick_input(), &tuning);
        assert_eq!(catcher.x, 157.5);

        // Lift and touch down far away before the next tick runs
        input.pointer_end();
        input.pointer_start(300.0);
        controller.apply(&mut catcher, &input.tick_input(), &tuning);
        assert_eq!(catcher.x, 157.5);
        assert_eq!(controller.drag.anchor(), Some(300.0));
    }

    #[test]
    fn test_drag_within_first_tick_counts() {
        let tuning = Tuning::default();
        let mut controller = Controller::default();
        let mut input = InputState::default();
        let mut catcher = catcher_at(100.0);

        // Start and move land in the same tick: the move is measured from
        // where the touch began
        input.pointer_start(100.0);
        input.pointer_move(120.0);
        let tick = input.tick_input();
        assert_eq!(tick.pointer_anchor, Some(100.0));
        controller.apply(&mut catcher, &tick, &tuning);
        assert!((catcher.x - 116.0).abs() < 1e-4);

        // The start edge is handed out once
        assert_eq!(input.tick_input().pointer_anchor, None);
    }

    #[test]
    fn test_input_state_tracks_events() {
        let mut input = InputState::default();
        input.key_down("ArrowLeft");
        input.key_down("x");
        assert!(input.tick_input().key_left);
        input.key_up("ArrowLeft");
        assert!(!input.tick_input().key_left);

        // Moves without a pointer down are ignored
        input.pointer_move(50.0);
        assert_eq!(input.tick_input().pointer_x, None);
        input.pointer_start(40.0);
        input.pointer_move(55.0);
        assert_eq!(input.tick_input().pointer_x, Some(55.0));

        input.button(Direction::Right, true);
        assert!(input.tick_input().button_right);
        input.pointer_end();
        let tick = input.tick_input();
        assert_eq!(tick.pointer_x, None);
        assert!(!tick.button_right);
    }

    #[test]
    fn test_clamp_at_edges() {
        let tuning = Tuning::default();
        let mut controller = Controller::default();
        let mut catcher = catcher_at(2.0);
        let left = TickInput {
            key_left: true,
            ..Default::default()
        };
        controller.apply(&mut catcher, &left, &tuning);
        assert_eq!(catcher.x, 0.0);

        let mut catcher = catcher_at(tuning.game_width - catcher.width - 1.0);
        let right = TickInput {
            key_right: true,
            button_right: true,
            ..Default::default()
        };
        controller.apply(&mut catcher, &right, &tuning);
        assert_eq!(catcher.x, tuning.game_width - catcher.width);
    }

    proptest! {
        #[test]
        fn prop_catcher_stays_in_bounds(
            start in 0.0f32..315.0,
            steps in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(),
                 proptest::option::of(-400.0f32..800.0)),
                1..60,
            ),
        ) {
            let tuning = Tuning::default();
            let mut controller = Controller::default();
            let mut catcher = catcher_at(start);
            for (kl, kr, bl, br, pointer_x) in steps {
                let input = TickInput {
                    key_left: kl,
                    key_right: kr,
                    button_left: bl,
                    button_right: br,
                    pointer_x,
                    pointer_anchor: None,
                    idle_mode: false,
                };
                controller.apply(&mut catcher, &input, &tuning);
                prop_assert!(catcher.x >= 0.0);
                prop_assert!(catcher.x <= tuning.game_width - catcher.width);
            }
        }
    }
}
