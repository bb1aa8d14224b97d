//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

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
    pub const BACKGROUND: [f32; 4] = [0.039, 0.039, 0.039, 1.0]; // #0a0a0a
    pub const GRID: [f32; 4] = [0.102, 0.102, 0.102, 1.0]; // #1a1a1a
    pub const WORLD_BORDER: [f32; 4] = [0.3, 0.3, 0.35, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.16, 0.16, 0.2, 1.0];
    pub const OBSTACLE_EDGE: [f32; 4] = [0.28, 0.28, 0.34, 1.0];

    pub const PLAYER: [f32; 4] = [0.545, 0.361, 0.965, 1.0]; // #8b5cf6
    pub const PLAYER_EDGE: [f32; 4] = [0.427, 0.157, 0.851, 1.0]; // #6d28d9
    pub const ENEMY: [f32; 4] = [0.937, 0.267, 0.267, 1.0]; // #ef4444
    pub const ENEMY_EDGE: [f32; 4] = [0.498, 0.114, 0.114, 1.0]; // #7f1d1d
    pub const BOSS: [f32; 4] = [0.976, 0.451, 0.086, 1.0];
    pub const BOSS_EDGE: [f32; 4] = [0.6, 0.2, 0.05, 1.0];

    pub const PROJECTILE: [f32; 4] = [0.659, 0.333, 0.969, 1.0]; // #a855f7
    pub const LASER: [f32; 4] = [0.2, 0.9, 1.0, 1.0];
    pub const PULSE_RING: [f32; 4] = [0.659, 0.333, 0.969, 0.45];
    pub const AIM: [f32; 4] = [1.0, 1.0, 1.0, 0.5];

    pub const ITEM_SHOTGUN: [f32; 4] = [0.98, 0.8, 0.08, 1.0];
    pub const ITEM_LASER: [f32; 4] = [0.2, 0.9, 1.0, 1.0];
    pub const ITEM_PULSE: [f32; 4] = [0.93, 0.29, 0.6, 1.0];

    pub const BAR_BACK: [f32; 4] = [0.15, 0.15, 0.15, 0.9];
    pub const HEALTH: [f32; 4] = [0.133, 0.773, 0.369, 1.0];
    pub const EXPERIENCE: [f32; 4] = [0.231, 0.51, 0.965, 1.0];
    pub const ENEMY_HEALTH: [f32; 4] = [0.863, 0.149, 0.149, 1.0];

    pub const OVERLAY_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
}
