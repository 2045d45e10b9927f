//! Screen chrome derived from game state
//!
//! Pure functions only; the browser shell applies the results to the DOM.

use crate::sim::GamePhase;

/// DOM element ids the shell drives
pub mod ids {
    pub const CONTAINER: &str = "gameContainer";
    pub const CANVAS: &str = "gameCanvas";
    pub const START_SCREEN: &str = "startScreen";
    pub const COUNTDOWN_SCREEN: &str = "countdownScreen";
    pub const GAME_SCREEN: &str = "gameScreen";
    pub const WIN_SCREEN: &str = "winScreen";
    pub const LOSE_SCREEN: &str = "loseScreen";
    pub const COUNTDOWN_NUMBER: &str = "countdownNumber";
    pub const TIMER_FILL: &str = "timerFill";
    pub const TIMER_TEXT: &str = "timerText";
    pub const SCORE_TEXT: &str = "scoreText";
    pub const START_BTN: &str = "startBtn";
    pub const PLAY_AGAIN_BTN: &str = "playAgainBtn";
    pub const TRY_AGAIN_BTN: &str = "tryAgainBtn";
    pub const LEFT_BTN: &str = "leftBtn";
    pub const RIGHT_BTN: &str = "rightBtn";
    /// Class selector, one per screen
    pub const CLOSE_BTN_SELECTOR: &str = ".close-btn";
}

/// Top-level screens; exactly one is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Countdown,
    Game,
    Win,
    Lose,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Start,
        Screen::Countdown,
        Screen::Game,
        Screen::Win,
        Screen::Lose,
    ];

    pub fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Idle => Screen::Start,
            GamePhase::CountingDown => Screen::Countdown,
            GamePhase::Running => Screen::Game,
            GamePhase::Won => Screen::Win,
            GamePhase::Lost => Screen::Lose,
        }
    }

    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::Start => ids::START_SCREEN,
            Screen::Countdown => ids::COUNTDOWN_SCREEN,
            Screen::Game => ids::GAME_SCREEN,
            Screen::Win => ids::WIN_SCREEN,
            Screen::Lose => ids::LOSE_SCREEN,
        }
    }
}

pub fn timer_text(time_left: u32) -> String {
    format!("{time_left} seconds")
}

/// CSS width for the timer bar fill
pub fn timer_fill_css(percent: f32) -> String {
    format!("{}%", percent.clamp(0.0, 100.0))
}

pub fn score_text(score: u32, target: u32) -> String {
    format!("{score}/{target}")
}

pub fn countdown_text(remaining: u8) -> String {
    remaining.to_string()
}

/// CSS size of the canvas: fill the container width, but shrink to fit the
/// height if that would overflow. Aspect ratio of the base size is kept.
pub fn fit_canvas(container_w: f32, container_h: f32, base_w: f32, base_h: f32) -> (u32, u32) {
    let mut scale = container_w / base_w;
    if (base_h * scale).floor() > container_h {
        scale = container_h / base_h;
    }
    ((base_w * scale).floor() as u32, (base_h * scale).floor() as u32)
}

/// Map a client-space x (relative to the canvas left edge) to game units
pub fn client_to_game_x(client_x: f32, css_width: f32, base_w: f32) -> f32 {
    if css_width <= 0.0 {
        return client_x;
    }
    client_x * base_w / css_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_screen_per_phase() {
        assert_eq!(Screen::for_phase(GamePhase::Idle), Screen::Start);
        assert_eq!(Screen::for_phase(GamePhase::CountingDown), Screen::Countdown);
        assert_eq!(Screen::for_phase(GamePhase::Running), Screen::Game);
        assert_eq!(Screen::for_phase(GamePhase::Won).element_id(), "winScreen");
        assert_eq!(Screen::for_phase(GamePhase::Lost).element_id(), "loseScreen");
    }

    #[test]
    fn test_hud_text() {
        assert_eq!(timer_text(15), "15 seconds");
        assert_eq!(timer_text(0), "0 seconds");
        assert_eq!(score_text(7, 10), "7/10");
        assert_eq!(countdown_text(3), "3");
        assert_eq!(timer_fill_css(20.0), "20%");
        assert_eq!(timer_fill_css(140.0), "100%");
    }

    #[test]
    fn test_fit_by_width() {
        // Narrow phone: width is the limit
        assert_eq!(fit_canvas(375.0, 900.0, 375.0, 667.0), (375, 667));
        assert_eq!(fit_canvas(750.0, 2000.0, 375.0, 667.0), (750, 1334));
    }

    #[test]
    fn test_fit_capped_by_height() {
        // Desktop: height is the limit
        let (w, h) = fit_canvas(1920.0, 667.0, 375.0, 667.0);
        assert_eq!((w, h), (375, 667));
        let (w, h) = fit_canvas(1920.0, 1000.0, 375.0, 667.0);
        assert!(h <= 1000);
        assert_eq!(w, (375.0f32 * 1000.0 / 667.0).floor() as u32);
    }

    #[test]
    fn test_client_to_game_x() {
        assert_eq!(client_to_game_x(375.0, 750.0, 375.0), 187.5);
        assert_eq!(client_to_game_x(10.0, 0.0, 375.0), 10.0);
    }
}
