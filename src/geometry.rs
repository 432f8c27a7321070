use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};

pub const DEFAULT_SEGMENTS: usize = 45;
pub const FLOATS_PER_VERTEX: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }
}

/// Points evenly spaced on a circle around the origin, starting at angle zero
/// and going counter-clockwise.
pub fn circle_points(count: usize, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let theta = TAU * i as f32 / count as f32;
            Vec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

/// Vertex data for a filled circle drawn as a single triangle fan.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleGeometry {
    points: Vec<Vec2>,
    radius: f32,
}

impl CircleGeometry {
    pub fn new(count: usize, radius: f32) -> Result<CircleGeometry> {
        if count < 3 {
            return Err(Error::InvalidGeometry(count));
        }
        Ok(CircleGeometry {
            points: circle_points(count, radius),
            radius,
        })
    }

    pub fn unit() -> CircleGeometry {
        CircleGeometry {
            points: circle_points(DEFAULT_SEGMENTS, 1.0),
            radius: 1.0,
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Interleaved `x, y` floats, `FLOATS_PER_VERTEX * vertex_count()` long.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.points)
    }
}
