//! Game session state and phase transitions
//!
//! One `GameState` is one play session. It owns the timer table, so every
//! transition out of a phase can cancel whatever that phase scheduled.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::controller::Controller;
use super::cues::Cues;
use super::entity::{FallingEntity, HazardKind};
use super::schedule::{Scheduler, Task};
use crate::fx::{EndScreenFx, FxStyle};
use crate::tuning::Tuning;

/// Length of one countdown step and one round-timer tick
pub const SECOND_MS: u64 = 1_000;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen
    Idle,
    /// 3-2-1 before the round, input ignored
    CountingDown,
    /// Active gameplay
    Running,
    /// Target reached
    Won,
    /// Time ran out short of the target
    Lost,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Which catcher picture to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatcherVariant {
    /// Waiting with mouth open
    Open,
    /// Just caught something
    Chomp,
}

/// The player's catcher. Only x moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catcher {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Catcher {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.catcher_center_x(),
            y: tuning.game_height - tuning.catcher_bottom_offset,
            width: tuning.catcher_width,
            height: tuning.catcher_height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Things the platform shell reacts to (screens, HUD, sounds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    CountdownStep { remaining: u8 },
    TimerUpdated { time_left: u32, fill_percent: f32 },
    CollectibleCaught { score: u32 },
    HazardCaught { kind: HazardKind, penalized: bool, score: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    pub score: u32,
    /// Whole seconds left in the round
    pub time_left: u32,
    /// Countdown number currently showing (0 outside the countdown)
    pub countdown: u8,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub catcher: Catcher,
    pub collectibles: Vec<FallingEntity>,
    pub hazards: Vec<FallingEntity>,
    pub cues: Cues,
    pub controller: Controller,
    /// Decorative end-screen drops
    pub fx: EndScreenFx,
    pub(crate) scheduler: Scheduler,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            score: 0,
            time_left: tuning.round_secs,
            countdown: 0,
            time_ticks: 0,
            catcher: Catcher::new(&tuning),
            collectibles: Vec::new(),
            hazards: Vec::new(),
            cues: Cues::default(),
            controller: Controller::default(),
            fx: EndScreenFx::default(),
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            tuning,
        }
    }

    // ------------------------------------------------------------------
    // Commands from the screen chrome
    // ------------------------------------------------------------------

    /// Start button / try again: begin the countdown.
    /// Ignored unless on the start screen or an end screen.
    pub fn start(&mut self) -> bool {
        if !matches!(
            self.phase,
            GamePhase::Idle | GamePhase::Won | GamePhase::Lost
        ) {
            log::debug!("Ignoring start in {:?}", self.phase);
            return false;
        }

        self.leave_phase();
        self.countdown = self.tuning.countdown_steps;
        self.set_phase(GamePhase::CountingDown);

        if self.countdown == 0 {
            self.enter_running();
        } else {
            self.events.push(GameEvent::CountdownStep {
                remaining: self.countdown,
            });
            self.scheduler.every(Task::CountdownStep, SECOND_MS);
        }
        true
    }

    /// Play again: straight into a fresh round from an end screen
    pub fn play_again(&mut self) -> bool {
        if !self.phase.is_over() {
            log::debug!("Ignoring play again in {:?}", self.phase);
            return false;
        }
        self.leave_phase();
        self.recenter();
        self.enter_running();
        true
    }

    /// Close button: back to the start screen with everything cleared
    pub fn reset(&mut self) {
        self.leave_phase();
        self.score = 0;
        self.time_left = self.tuning.round_secs;
        self.countdown = 0;
        self.collectibles.clear();
        self.hazards.clear();
        self.recenter();
        self.set_phase(GamePhase::Idle);
        self.publish_timer();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Timer bar fill, 0% at round start to 100% when time is up
    pub fn timer_fill_percent(&self) -> f32 {
        let total = self.tuning.round_secs as f32;
        (total - self.time_left as f32) / total * 100.0
    }

    pub fn catcher_variant(&self) -> CatcherVariant {
        if self.cues.mouth.active {
            CatcherVariant::Chomp
        } else {
            CatcherVariant::Open
        }
    }

    /// Outstanding timers (round, countdown, cues)
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?} (score {})", from, to, self.score);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Tear down everything the current phase scheduled or started
    fn leave_phase(&mut self) {
        self.scheduler.cancel_all();
        self.cues.clear();
        self.fx.stop();
        self.controller.reset();
    }

    fn recenter(&mut self) {
        self.catcher.x = self.tuning.catcher_center_x();
    }

    fn publish_timer(&mut self) {
        self.events.push(GameEvent::TimerUpdated {
            time_left: self.time_left,
            fill_percent: self.timer_fill_percent(),
        });
    }

    pub(crate) fn enter_running(&mut self) {
        self.leave_phase();
        self.score = 0;
        self.time_left = self.tuning.round_secs;
        self.countdown = 0;
        self.collectibles.clear();
        self.hazards.clear();
        self.set_phase(GamePhase::Running);
        self.publish_timer();
        self.scheduler.every(Task::RoundSecond, SECOND_MS);
    }

    /// Decide the round from the current score
    pub(crate) fn end_round(&mut self) {
        let (outcome, style) = if self.score >= self.tuning.target_score {
            (GamePhase::Won, FxStyle::Trophies)
        } else {
            (GamePhase::Lost, FxStyle::Tears)
        };
        self.leave_phase();
        self.set_phase(outcome);
        self.fx.start(style);
    }

    fn countdown_step(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.enter_running();
        } else {
            self.events.push(GameEvent::CountdownStep {
                remaining: self.countdown,
            });
        }
    }

    fn round_second(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
        self.publish_timer();
        if self.time_left == 0 {
            self.end_round();
        }
    }

    /// Run one due timer
    pub(crate) fn run_task(&mut self, task: Task) {
        match task {
            Task::CountdownStep => self.countdown_step(),
            Task::RoundSecond => self.round_second(),
            Task::CloseMouth => {
                self.cues.mouth.active = false;
                self.cues.mouth.expiry = None;
            }
            Task::HideMinusOne => {
                self.cues.minus_one.hide();
                self.cues.minus_one.expiry = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Scoring
    // ------------------------------------------------------------------

    fn trigger_mouth(&mut self) {
        self.scheduler.cancel_slot(&mut self.cues.mouth.expiry);
        self.cues.mouth.active = true;
        self.cues.mouth.expiry = Some(
            self.scheduler
                .once(Task::CloseMouth, self.tuning.mouth_cue_ms),
        );
    }

    fn trigger_minus_one(&mut self) {
        self.scheduler.cancel_slot(&mut self.cues.minus_one.expiry);
        self.cues.minus_one.restart();
        self.cues.minus_one.expiry = Some(
            self.scheduler
                .once(Task::HideMinusOne, self.tuning.minus_one_cue_ms),
        );
    }

    /// Score a caught collectible. Returns true if that won the round.
    pub(crate) fn catch_collectible(&mut self) -> bool {
        self.score += 1;
        self.trigger_mouth();
        self.events
            .push(GameEvent::CollectibleCaught { score: self.score });

        if self.score >= self.tuning.target_score {
            self.end_round();
            return true;
        }
        false
    }

    /// Apply a caught hazard. Nothing is taken away at zero.
    pub(crate) fn catch_hazard(&mut self, kind: HazardKind) {
        let penalized = self.score > 0;
        if penalized {
            self.score -= 1;
            self.trigger_mouth();
            self.trigger_minus_one();
        }
        self.events.push(GameEvent::HazardCaught {
            kind,
            penalized,
            score: self.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_tasks(state: &mut GameState, dt: f32) {
        state.scheduler.advance(dt);
        while let Some((_, task)) = state.scheduler.pop_due() {
            state.run_task(task);
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.time_left, 15);
        assert_eq!(state.catcher.x, 157.5);
        assert_eq!(state.catcher.y, 587.0);
        assert_eq!(state.pending_tasks(), 0);
        assert_eq!(state.timer_fill_percent(), 0.0);
    }

    #[test]
    fn test_countdown_then_running() {
        let mut state = GameState::new(1);
        assert!(state.start());
        assert_eq!(state.phase, GamePhase::CountingDown);
        assert_eq!(state.countdown, 3);

        run_tasks(&mut state, 1.0);
        assert_eq!(state.countdown, 2);
        run_tasks(&mut state, 1.0);
        assert_eq!(state.countdown, 1);
        run_tasks(&mut state, 1.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_left, 15);
        // Only the round timer remains
        assert_eq!(state.pending_tasks(), 1);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::CountdownStep { remaining: 3 }));
        assert!(events.contains(&GameEvent::CountdownStep { remaining: 1 }));
        assert!(events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::CountingDown,
            to: GamePhase::Running,
        }));
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut state = GameState::new(1);
        state.enter_running();
        assert!(!state.start());
        assert!(!state.play_again());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_timer_fill_and_expiry() {
        let mut state = GameState::new(1);
        state.enter_running();
        run_tasks(&mut state, 3.0);
        assert_eq!(state.time_left, 12);
        assert!((state.timer_fill_percent() - 20.0).abs() < 1e-4);

        run_tasks(&mut state, 12.0);
        assert_eq!(state.time_left, 0);
        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.pending_tasks(), 0);
        assert!(state.fx.is_running());

        // Timer never goes below zero
        run_tasks(&mut state, 5.0);
        assert_eq!(state.time_left, 0);
    }

    #[test]
    fn test_hazard_at_zero_has_no_penalty() {
        let mut state = GameState::new(1);
        state.enter_running();
        state.catch_hazard(HazardKind::Poop);
        assert_eq!(state.score, 0);
        assert!(!state.cues.minus_one.active);
        assert!(!state.cues.mouth.active);
    }

    #[test]
    fn test_retriggered_cue_replaces_expiry() {
        let mut state = GameState::new(1);
        state.enter_running();
        state.catch_collectible();
        run_tasks(&mut state, 0.05);
        state.catch_collectible();
        // One round timer + one mouth expiry, not two
        assert_eq!(state.pending_tasks(), 2);
        run_tasks(&mut state, 0.06);
        assert!(state.cues.mouth.active, "second catch restarted the 100 ms");
        run_tasks(&mut state, 0.05);
        assert!(!state.cues.mouth.active);
    }

    #[test]
    fn test_play_again_skips_countdown() {
        let mut state = GameState::new(1);
        state.enter_running();
        state.catcher.x = 10.0;
        state.score = 4;
        state.end_round();
        assert_eq!(state.phase, GamePhase::Lost);

        assert!(state.play_again());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.catcher.x, 157.5);
        assert!(!state.fx.is_running());
    }

    #[test]
    fn test_decor_only_on_end_screens() {
        let mut state = GameState::new(1);
        state.enter_running();
        assert!(!state.fx.is_running());
        state.score = 10;
        state.end_round();
        assert_eq!(state.fx.style(), Some(FxStyle::Trophies));

        assert!(state.start());
        assert!(!state.fx.is_running());
        state.enter_running();
        state.end_round();
        assert_eq!(state.fx.style(), Some(FxStyle::Tears));
        state.reset();
        assert!(!state.fx.is_running());
    }

    #[test]
    fn test_reset_restores_timer_display() {
        let mut state = GameState::new(1);
        state.enter_running();
        run_tasks(&mut state, 4.0);
        assert_eq!(state.time_left, 11);
        state.drain_events();

        state.reset();
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::TimerUpdated {
            time_left: 15,
            fill_percent: 0.0,
        }));
    }

    #[test]
    fn test_reset_idempotent() {
        let mut state = GameState::new(1);
        state.enter_running();
        state.score = 3;
        state.catch_hazard(HazardKind::Boots);
        state.catcher.x = 0.0;

        state.reset();
        let once = (
            state.phase,
            state.score,
            state.time_left,
            state.catcher.clone(),
            state.collectibles.len(),
            state.hazards.len(),
            state.pending_tasks(),
        );
        state.reset();
        let twice = (
            state.phase,
            state.score,
            state.time_left,
            state.catcher.clone(),
            state.collectibles.len(),
            state.hazards.len(),
            state.pending_tasks(),
        );
        assert_eq!(once, twice);
        assert_eq!(once.0, GamePhase::Idle);
        assert_eq!(once.1, 0);
        assert_eq!(once.2, 15);
        assert_eq!(once.3.x, 157.5);
        assert_eq!(once.6, 0);
        assert!(!state.cues.minus_one.active);
    }
}
