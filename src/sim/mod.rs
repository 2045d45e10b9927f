//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers run on simulated time, never the wall clock
//! - No rendering or platform dependencies

pub mod collision;
pub mod controller;
pub mod cues;
pub mod entity;
pub mod schedule;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Rect, intersects};
pub use controller::{Controller, Direction, DragTracker, InputState, TickInput, autopilot_input};
pub use cues::{Cues, MinusOneVisual};
pub use entity::{EntityKind, FallingEntity, HazardKind, SpawnPolicy, Stream};
pub use schedule::{Scheduler, Task, TaskId};
pub use snapshot::{EntityView, Snapshot};
pub use state::{Catcher, CatcherVariant, GameEvent, GamePhase, GameState, SECOND_MS};
pub use tick::tick;
