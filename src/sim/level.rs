//! Level geometry: platforms, slopes, and cake spawn points
//!
//! Geometry is immutable per level. The simulation never mutates it;
//! restarts only rebuild the cake set from the spawn list.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned platform rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal center of the platform surface
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// A single linear slope segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slope {
    pub start: Vec2,
    pub end: Vec2,
}

impl Slope {
    /// Surface height at a given x, clamped to the segment's span
    pub fn height_at(&self, x: f32) -> f32 {
        let x = x.clamp(self.start.x.min(self.end.x), self.start.x.max(self.end.x));
        let run = self.end.x - self.start.x;
        if run.abs() < f32::EPSILON {
            return self.start.y.min(self.end.y);
        }
        let t = (x - self.start.x) / run;
        self.start.y + (self.end.y - self.start.y) * t
    }
}

/// Failure to provide level geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelError {
    /// No level exists at the requested index
    UnknownIndex(usize),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::UnknownIndex(i) => write!(f, "no level at index {i}"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Immutable geometry and spawn data for one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub platforms: Vec<Platform>,
    pub slopes: Vec<Slope>,
    /// Cake logical origins; each cake is 30x30
    pub cake_spawns: Vec<Vec2>,
    /// Index into `platforms` where the player respawns
    pub spawn_platform: usize,
}

/// Cake pickup size in pixels
pub const CAKE_SIZE: f32 = 30.0;

impl Level {
    /// Load the level at the given index.
    ///
    /// An out-of-range index is a caller bug, not a recoverable state;
    /// the simulation refuses to start without geometry.
    pub fn load(index: usize) -> Result<Self, LevelError> {
        match index {
            0 => Ok(Self::entrance()),
            _ => Err(LevelError::UnknownIndex(index)),
        }
    }

    pub fn total_cakes(&self) -> u32 {
        self.cake_spawns.len() as u32
    }

    /// The entrance level: 13 floating logs in five rows, one cake above each
    fn entrance() -> Self {
        let platforms = vec![
            // Top row
            Platform::new(200.0, 250.0, 200.0, 20.0),
            Platform::new(800.0, 300.0, 200.0, 20.0),
            Platform::new(1400.0, 250.0, 200.0, 20.0),
            // Upper middle row
            Platform::new(400.0, 400.0, 200.0, 20.0),
            Platform::new(1200.0, 450.0, 200.0, 20.0),
            // Middle row
            Platform::new(200.0, 550.0, 200.0, 20.0),
            Platform::new(800.0, 600.0, 200.0, 20.0),
            Platform::new(1400.0, 550.0, 200.0, 20.0),
            // Lower middle row
            Platform::new(400.0, 750.0, 200.0, 20.0),
            Platform::new(1200.0, 700.0, 200.0, 20.0),
            // Bottom row
            Platform::new(200.0, 900.0, 200.0, 20.0),
            Platform::new(800.0, 950.0, 200.0, 20.0),
            Platform::new(1400.0, 900.0, 200.0, 20.0),
        ];

        let cake_spawns = vec![
            Vec2::new(250.0, 200.0),
            Vec2::new(850.0, 250.0),
            Vec2::new(1450.0, 200.0),
            Vec2::new(450.0, 350.0),
            Vec2::new(1250.0, 400.0),
            Vec2::new(250.0, 500.0),
            Vec2::new(970.0, 550.0),
            Vec2::new(1450.0, 500.0),
            Vec2::new(450.0, 700.0),
            Vec2::new(1250.0, 650.0),
            Vec2::new(250.0, 850.0),
            Vec2::new(850.0, 900.0),
            Vec2::new(1450.0, 850.0),
        ];

        Self {
            name: "entrance".to_string(),
            platforms,
            slopes: Vec::new(),
            cake_spawns,
            // Center platform of the middle row
            spawn_platform: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrance_has_matching_platform_and_cake_counts() {
        let level = Level::load(0).unwrap();
        assert_eq!(level.platforms.len(), 13);
        assert_eq!(level.total_cakes(), 13);
        assert!(level.spawn_platform < level.platforms.len());
    }

    #[test]
    fn unknown_level_index_is_an_error() {
        assert_eq!(Level::load(7).unwrap_err(), LevelError::UnknownIndex(7));
    }

    #[test]
    fn slope_height_interpolates_linearly() {
        let slope = Slope {
            start: Vec2::new(100.0, 500.0),
            end: Vec2::new(300.0, 400.0),
        };
        assert_eq!(slope.height_at(100.0), 500.0);
        assert_eq!(slope.height_at(200.0), 450.0);
        assert_eq!(slope.height_at(300.0), 400.0);
        // Clamped outside the span
        assert_eq!(slope.height_at(0.0), 500.0);
        assert_eq!(slope.height_at(400.0), 400.0);
    }
}
