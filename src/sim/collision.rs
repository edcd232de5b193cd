//! Support resolution against platforms and slopes
//!
//! The contact test is a single feet point (box bottom-center adjusted by
//! the collision offset) against each surface, with an edge margin so the
//! player must be substantially over a platform rather than clipping its
//! corner. Slopes are checked before platforms; the first matching surface
//! in iteration order wins, so level geometry must not overlap.

use super::level::Level;
use crate::consts::{
    PLATFORM_EDGE_MARGIN, PLATFORM_TOLERANCE, STAND_EDGE_MARGIN, STAND_TOLERANCE,
};

/// Inputs for one support query, all in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportQuery {
    /// Player box left edge
    pub left: f32,
    /// Player box width
    pub width: f32,
    /// Feet point height (box bottom minus collision offset)
    pub feet_y: f32,
    /// Current vertical velocity, for the crossing test
    pub vel_y: f32,
}

impl SupportQuery {
    pub fn feet_x(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// Resolve the player's support state against level geometry.
///
/// Returns the surface height the feet should rest on, or None when the
/// player is unsupported and gravity applies. Two cases per surface:
/// resting within tolerance of the surface, or downward motion that would
/// cross the surface this tick. Pure function of its inputs; resolving
/// twice with the same query yields the same answer.
pub fn resolve_support(query: &SupportQuery, level: &Level) -> Option<f32> {
    let feet_x = query.feet_x();
    let right = query.left + query.width;

    for slope in &level.slopes {
        let span_lo = slope.start.x.min(slope.end.x);
        let span_hi = slope.start.x.max(slope.end.x);
        if right < span_lo || query.left > span_hi {
            continue;
        }
        // Highest surface point under the player's span
        let left_y = slope.height_at(query.left.max(span_lo));
        let right_y = slope.height_at(right.min(span_hi));
        let surface_y = left_y.min(right_y);

        if (query.feet_y - surface_y).abs() <= PLATFORM_TOLERANCE {
            return Some(surface_y);
        }
        if crosses_surface(query.feet_y, query.vel_y, surface_y) {
            return Some(surface_y);
        }
    }

    for platform in &level.platforms {
        let lo = platform.x + PLATFORM_EDGE_MARGIN;
        let hi = platform.x + platform.width - PLATFORM_EDGE_MARGIN;
        if feet_x < lo || feet_x > hi {
            continue;
        }
        if (query.feet_y - platform.y).abs() <= PLATFORM_TOLERANCE {
            return Some(platform.y);
        }
        if crosses_surface(query.feet_y, query.vel_y, platform.y) {
            return Some(platform.y);
        }
    }

    None
}

/// Downward motion this tick would carry the feet through the surface
fn crosses_surface(feet_y: f32, vel_y: f32, surface_y: f32) -> bool {
    vel_y > 0.0 && feet_y < surface_y && feet_y + vel_y >= surface_y
}

/// Quick stand check used by input handling before committing to a move.
///
/// Tighter than the full resolver: 2px vertical tolerance, 5px edge
/// margin, platforms only. Exactly-on-the-margin counts as off the edge.
pub fn can_stand_at(feet_x: f32, feet_y: f32, level: &Level) -> bool {
    level.platforms.iter().any(|p| {
        (feet_y - p.y).abs() <= STAND_TOLERANCE
            && feet_x > p.x + STAND_EDGE_MARGIN
            && feet_x < p.x + p.width - STAND_EDGE_MARGIN
    })
}
