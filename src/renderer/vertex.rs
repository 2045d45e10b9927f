//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::assets::SpriteKey;
use crate::sim::HazardKind;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [1.0, 0.95, 0.85, 1.0];
    pub const LADDOO: [f32; 4] = [1.0, 0.65, 0.1, 1.0];
    pub const BALL: [f32; 4] = [0.2, 0.5, 0.95, 1.0];
    pub const POOP: [f32; 4] = [0.45, 0.3, 0.15, 1.0];
    pub const HANGER: [f32; 4] = [0.6, 0.6, 0.65, 1.0];
    pub const BOOTS: [f32; 4] = [0.25, 0.2, 0.2, 1.0];
    pub const CATCHER_OPEN: [f32; 4] = [0.95, 0.75, 0.6, 1.0];
    pub const CATCHER_CHOMP: [f32; 4] = [0.9, 0.55, 0.45, 1.0];
    pub const MINUS_ONE: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
    pub const TEAR: [f32; 4] = [0.45, 0.75, 1.0, 0.9];
    pub const TROPHY: [f32; 4] = [0.95, 0.8, 0.2, 1.0];
    pub const SCORE_TRACK: [f32; 4] = [0.0, 0.0, 0.0, 0.25];
    pub const SCORE_FILL: [f32; 4] = [1.0, 0.55, 0.0, 1.0];
    /// Win-screen confetti, indexed by piece color
    pub const CONFETTI: [[f32; 4]; 5] = [
        [0.95, 0.25, 0.35, 1.0],
        [0.2, 0.7, 0.95, 1.0],
        [0.3, 0.85, 0.4, 1.0],
        [1.0, 0.85, 0.2, 1.0],
        [0.7, 0.4, 0.95, 1.0],
    ];
    /// Stand-in for a sprite whose image failed to load
    pub const FALLBACK: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
}

/// Base color for a sprite
pub fn sprite_color(key: SpriteKey) -> [f32; 4] {
    match key {
        SpriteKey::Collectible => colors::LADDOO,
        SpriteKey::Hazard(HazardKind::Ball) => colors::BALL,
        SpriteKey::Hazard(HazardKind::Poop) => colors::POOP,
        SpriteKey::Hazard(HazardKind::Hanger) => colors::HANGER,
        SpriteKey::Hazard(HazardKind::Boots) => colors::BOOTS,
        SpriteKey::CatcherOpen => colors::CATCHER_OPEN,
        SpriteKey::CatcherChomp => colors::CATCHER_CHOMP,
        SpriteKey::MinusOne => colors::MINUS_ONE,
        SpriteKey::Tear => colors::TEAR,
        SpriteKey::Trophy => colors::TROPHY,
    }
}

pub fn confetti_color(index: u8) -> [f32; 4] {
    colors::CONFETTI[index as usize % colors::CONFETTI.len()]
}

/// Scale a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}
