//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use super::collision::intersects;
use super::controller::{TickInput, autopilot_input};
use super::entity::{EntityKind, SpawnPolicy, Stream, advance_and_prune};
use super::state::{GamePhase, GameState};

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Timers first: a round that ends this tick does no frame work
    state.scheduler.advance(dt);
    while let Some((_, task)) = state.scheduler.pop_due() {
        state.run_task(task);
    }

    // End-screen decoration animates whether or not a round is on
    let (width, height) = (state.tuning.game_width, state.tuning.game_height);
    state.fx.update(dt, &mut state.rng, width, height);

    if state.phase != GamePhase::Running {
        return;
    }

    let fade_out_after = state.tuning.minus_one_fade_out_ms as f32 / 1000.0;
    state.cues.minus_one.update(dt, fade_out_after);

    // Idle/demo mode - autopilot plays
    let input = if input.idle_mode {
        autopilot_input(state)
    } else {
        input.clone()
    };
    state
        .controller
        .apply(&mut state.catcher, &input, &state.tuning);

    spawn(state);

    advance_and_prune(&mut state.collectibles, height);
    advance_and_prune(&mut state.hazards, height);

    resolve_collisions(state);
}

/// One Bernoulli roll per stream
fn spawn(state: &mut GameState) {
    let padding = state.tuning.spawn_padding;
    let width = state.tuning.game_width;

    SpawnPolicy::new(Stream::Collectibles, state.tuning.collectible, padding).spawn_into(
        &mut state.rng,
        width,
        &mut state.collectibles,
    );
    SpawnPolicy::new(Stream::Hazards, state.tuning.hazard, padding).spawn_into(
        &mut state.rng,
        width,
        &mut state.hazards,
    );
}

/// Catch everything the catcher overlaps. Every overlap counts; the only
/// early exit is a catch that wins the round.
fn resolve_collisions(state: &mut GameState) {
    let catcher = state.catcher.bounds();

    let mut i = state.collectibles.len();
    while i > 0 {
        i -= 1;
        if intersects(&catcher, &state.collectibles[i].bounds()) {
            state.collectibles.swap_remove(i);
            if state.catch_collectible() {
                return;
            }
        }
    }

    let mut i = state.hazards.len();
    while i > 0 {
        i -= 1;
        if intersects(&catcher, &state.hazards[i].bounds()) {
            let caught = state.hazards.swap_remove(i);
            if let EntityKind::Hazard(kind) = caught.kind {
                state.catch_hazard(kind);
            }
        }
    }
}
