//! Geometric features over landmark sets.
//!
//! Everything here is a pure function of its inputs. Both points passed to a
//! function must come from the same coordinate space.

use crate::{constants::FINGER_EXTENSION_RATIO, landmarks::Landmark};

/// Euclidean distance in the image plane
#[must_use]
pub fn distance(a: &Landmark, b: &Landmark) -> f32 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Point halfway between two landmarks, carrying the lower score
#[must_use]
pub fn midpoint(a: &Landmark, b: &Landmark) -> Landmark {
    Landmark::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, a.score.min(b.score))
}

/// A finger is extended when its tip is meaningfully farther from the wrist
/// than its PIP joint. Scale-free since both distances share a frame.
#[must_use]
pub fn is_finger_extended(tip: &Landmark, pip: &Landmark, wrist: &Landmark) -> bool {
    distance(tip, wrist) > distance(pip, wrist) * FINGER_EXTENSION_RATIO
}

/// Thumb tip above both its MCP joint and the wrist
#[must_use]
pub fn is_thumb_up(tip: &Landmark, mcp: &Landmark, wrist: &Landmark) -> bool {
    tip.y < mcp.y && tip.y < wrist.y
}

/// Thumb tip below both its MCP joint and the wrist
#[must_use]
pub fn is_thumb_down(tip: &Landmark, mcp: &Landmark, wrist: &Landmark) -> bool {
    tip.y > mcp.y && tip.y > wrist.y
}

/// Every point lies inside the normalized `[0, 1]` frame
#[must_use]
pub fn within_unit_range(points: &[Landmark]) -> bool {
    points
        .iter()
        .all(|p| (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y))
}
