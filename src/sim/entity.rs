//! Falling entities: spawn policy, motion and pruning
//!
//! Collectibles and hazards share one shape and one set of rules; only the
//! kind tag and the spawn tuning differ.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::SpawnTuning;

/// Visual flavor of a hazard. Behavior is identical for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    Ball,
    Poop,
    Hanger,
    Boots,
}

impl HazardKind {
    pub const ALL: [HazardKind; 4] = [
        HazardKind::Ball,
        HazardKind::Poop,
        HazardKind::Hanger,
        HazardKind::Boots,
    ];
}

/// What a falling entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Collectible,
    Hazard(HazardKind),
}

/// A sweet or a piece of junk on its way down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingEntity {
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick
    pub speed: f32,
    pub kind: EntityKind,
}

impl FallingEntity {
    pub fn bounds(&self) -> Rect {
        Rect {
            min: self.pos,
            size: self.size,
        }
    }
}

/// Which stream a spawn policy feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Collectibles,
    Hazards,
}

/// Per-tick Bernoulli spawner for one stream
#[derive(Debug, Clone, Copy)]
pub struct SpawnPolicy {
    pub stream: Stream,
    pub tuning: SpawnTuning,
    pub padding: f32,
}

impl SpawnPolicy {
    pub fn new(stream: Stream, tuning: SpawnTuning, padding: f32) -> Self {
        Self {
            stream,
            tuning,
            padding,
        }
    }

    /// Roll once for this tick; on success build the new entity just above
    /// the visible area.
    pub fn roll<R: Rng>(&self, rng: &mut R, game_width: f32) -> Option<FallingEntity> {
        if !rng.random_bool(self.tuning.probability) {
            return None;
        }

        let min_x = -self.padding;
        let max_x = game_width - self.tuning.width + self.padding;
        let x = rng.random_range(min_x..=max_x);
        let speed = rng.random_range(
            self.tuning.base_speed..=self.tuning.base_speed + self.tuning.speed_jitter,
        );
        let kind = match self.stream {
            Stream::Collectibles => EntityKind::Collectible,
            Stream::Hazards => {
                EntityKind::Hazard(HazardKind::ALL[rng.random_range(0..HazardKind::ALL.len())])
            }
        };

        log::trace!("Spawned {:?} at x={:.1} speed={:.2}", kind, x, speed);

        Some(FallingEntity {
            pos: Vec2::new(x, -self.tuning.height),
            size: Vec2::new(self.tuning.width, self.tuning.height),
            speed,
            kind,
        })
    }

    /// Roll and append to the stream's collection
    pub fn spawn_into<R: Rng>(
        &self,
        rng: &mut R,
        game_width: f32,
        entities: &mut Vec<FallingEntity>,
    ) {
        if let Some(entity) = self.roll(rng, game_width) {
            entities.push(entity);
        }
    }
}

/// Move every entity down by its own speed, then drop the ones that fell
/// past the bottom edge.
pub fn advance_and_prune(entities: &mut Vec<FallingEntity>, game_height: f32) {
    for entity in entities.iter_mut() {
        entity.pos.y += entity.speed;
    }
    entities.retain(|e| e.pos.y <= game_height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn always(stream: Stream) -> SpawnPolicy {
        SpawnPolicy::new(
            stream,
            SpawnTuning {
                probability: 1.0,
                width: 50.0,
                height: 50.0,
                base_speed: 2.5,
                speed_jitter: 2.0,
            },
            60.0,
        )
    }

    fn entity_at(y: f32, speed: f32) -> FallingEntity {
        FallingEntity {
            pos: Vec2::new(100.0, y),
            size: Vec2::new(50.0, 50.0),
            speed,
            kind: EntityKind::Collectible,
        }
    }

    #[test]
    fn test_spawn_within_band() {
        let mut rng = Pcg32::seed_from_u64(7);
        let policy = always(Stream::Collectibles);
        for _ in 0..500 {
            let e = policy.roll(&mut rng, 375.0).unwrap();
            assert!(e.pos.x >= -60.0 && e.pos.x <= 375.0 - 50.0 + 60.0);
            assert_eq!(e.pos.y, -50.0);
            assert!(e.speed >= 2.5 && e.speed <= 4.5);
            assert_eq!(e.kind, EntityKind::Collectible);
        }
    }

    #[test]
    fn test_never_spawns_at_zero_probability() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut policy = always(Stream::Hazards);
        policy.tuning.probability = 0.0;
        let mut entities = Vec::new();
        for _ in 0..1000 {
            policy.spawn_into(&mut rng, 375.0, &mut entities);
        }
        assert!(entities.is_empty());
    }

    #[test]
    fn test_hazards_draw_every_kind() {
        let mut rng = Pcg32::seed_from_u64(42);
        let policy = always(Stream::Hazards);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            if let EntityKind::Hazard(kind) = policy.roll(&mut rng, 375.0).unwrap().kind {
                seen.insert(kind);
            } else {
                panic!("hazard stream produced a collectible");
            }
        }
        assert_eq!(seen.len(), HazardKind::ALL.len());
    }

    #[test]
    fn test_spawn_rate_roughly_matches_probability() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut policy = always(Stream::Collectibles);
        policy.tuning.probability = 0.015;
        let mut entities = Vec::new();
        for _ in 0..100_000 {
            policy.spawn_into(&mut rng, 375.0, &mut entities);
        }
        // Expect ~1500
        assert!(entities.len() > 1200 && entities.len() < 1800, "{}", entities.len());
    }

    #[test]
    fn test_motion_uses_per_entity_speed() {
        let mut entities = vec![entity_at(0.0, 2.0), entity_at(0.0, 4.0)];
        advance_and_prune(&mut entities, 667.0);
        assert_eq!(entities[0].pos.y, 2.0);
        assert_eq!(entities[1].pos.y, 4.0);
    }

    #[test]
    fn test_prune_removes_all_fallen_without_skipping() {
        // Adjacent entries that all leave the field in the same tick
        let mut entities = vec![
            entity_at(666.0, 3.0),
            entity_at(666.0, 3.0),
            entity_at(100.0, 3.0),
            entity_at(700.0, 3.0),
            entity_at(665.0, 2.0),
        ];
        advance_and_prune(&mut entities, 667.0);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].pos.y, 103.0);
        // Exactly on the edge stays for one more tick
        assert_eq!(entities[1].pos.y, 667.0);
    }
}
