//! Shape generation for 2D primitives
//!
//! Everything is built in game units (origin top-left, y down); the pipeline
//! maps to clip space.

use glam::Vec2;

use super::vertex::{Vertex, colors, confetti_color, sprite_color, with_alpha};
use crate::assets::{AssetRegistry, SpriteKey};
use crate::fx::FxStyle;
use crate::sim::{Rect, Snapshot};

/// Size of the "-1" popup at full scale
const MINUS_ONE_SIZE: f32 = 25.0;
/// Top of the "-1" popup
const MINUS_ONE_Y: f32 = 220.0;
/// Score bar under the top edge
const SCORE_BAR_Y: f32 = 16.0;
const SCORE_BAR_HEIGHT: f32 = 10.0;
const SCORE_BAR_MARGIN: f32 = 40.0;

/// Axis-aligned filled rectangle
pub fn quad(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let min = rect.min;
    let max = rect.max();
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Square of side `size` centered on `center`, turned by `degrees`
pub fn rotated_quad(center: Vec2, size: f32, degrees: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = size / 2.0;
    let rot = Vec2::from_angle(degrees.to_radians());
    let corner = |x: f32, y: f32| {
        let p = center + rot.rotate(Vec2::new(x, y));
        Vertex::new(p.x, p.y, color)
    };
    let (a, b, c, d) = (
        corner(-half, -half),
        corner(half, -half),
        corner(-half, half),
        corner(half, half),
    );
    vec![a, b, c, c, b, d]
}

/// Sprite color, or the fallback if its image never loaded
fn resolve(key: SpriteKey, assets: &AssetRegistry) -> [f32; 4] {
    if assets.is_available(key) {
        sprite_color(key)
    } else {
        colors::FALLBACK
    }
}

/// Build the full frame for a snapshot
pub fn scene_vertices(snap: &Snapshot, assets: &AssetRegistry) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    // End-screen drops sit behind everything and draw whatever the phase
    if let Some(style) = snap.fx_style {
        let key = match style {
            FxStyle::Trophies => SpriteKey::Trophy,
            FxStyle::Tears => SpriteKey::Tear,
        };
        let color = resolve(key, assets);
        for drop in &snap.fx_drops {
            let center = drop.pos + Vec2::splat(drop.size / 2.0);
            vertices.extend(rotated_quad(center, drop.size, drop.rotation, color));
        }
    }
    for piece in &snap.confetti {
        let center = piece.pos + Vec2::splat(piece.size / 2.0);
        let color = confetti_color(piece.color);
        vertices.extend(rotated_quad(center, piece.size, piece.rotation, color));
    }

    if !snap.shows_playfield() {
        return vertices;
    }

    for entity in &snap.entities {
        let key = SpriteKey::for_entity(entity.kind);
        vertices.extend(quad(&entity.rect, resolve(key, assets)));
    }

    let catcher_key = SpriteKey::for_catcher(snap.catcher_variant);
    vertices.extend(quad(&snap.catcher, resolve(catcher_key, assets)));

    // Score bar
    let track_width = snap.width - SCORE_BAR_MARGIN * 2.0;
    vertices.extend(quad(
        &Rect::new(SCORE_BAR_MARGIN, SCORE_BAR_Y, track_width, SCORE_BAR_HEIGHT),
        colors::SCORE_TRACK,
    ));
    let progress = if snap.target_score == 0 {
        1.0
    } else {
        (snap.score as f32 / snap.target_score as f32).min(1.0)
    };
    if progress > 0.0 {
        vertices.extend(quad(
            &Rect::new(
                SCORE_BAR_MARGIN,
                SCORE_BAR_Y,
                track_width * progress,
                SCORE_BAR_HEIGHT,
            ),
            colors::SCORE_FILL,
        ));
    }

    if let Some(cue) = snap.minus_one {
        let size = MINUS_ONE_SIZE * cue.scale;
        let rect = Rect::new(snap.width / 2.0 - size / 2.0, MINUS_ONE_Y, size, size);
        let color = with_alpha(resolve(SpriteKey::MinusOne, assets), cue.alpha);
        vertices.extend(quad(&rect, color));
    }

    vertices
}
