//! Collision primitives and reflection
//!
//! Circle-vs-AABB overlap tests, the axis-dominance rule for brick
//! bounces, and the paddle bounce-angle mapping.

use glam::Vec2;

use crate::consts::PADDLE_MAX_BOUNCE;

/// Which axis a contact is dominated by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAxis {
    /// Entering from left/right; reflect dx
    Horizontal,
    /// Entering from top/bottom; reflect dy
    Vertical,
}

/// Circle vs axis-aligned rect overlap (closest point test)
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_min: Vec2, rect_size: Vec2) -> bool {
    let rect_max = rect_min + rect_size;
    let closest = center.clamp(rect_min, rect_max);
    (center - closest).length_squared() <= radius * radius
}

/// Decide whether a circle/rect contact is primarily vertical or
/// horizontal, from the circle center's offset normalized by the rect's
/// half-extents. Ties go vertical (the common case for a falling ball
/// clipping a brick face).
pub fn contact_axis(center: Vec2, rect_min: Vec2, rect_size: Vec2) -> ContactAxis {
    let half = rect_size / 2.0;
    let rect_center = rect_min + half;
    let rel = (center - rect_center) / half.max(Vec2::splat(f32::EPSILON));
    if rel.y.abs() >= rel.x.abs() {
        ContactAxis::Vertical
    } else {
        ContactAxis::Horizontal
    }
}

/// Outgoing velocity for a paddle hit.
///
/// `hit_offset` is the normalized contact position across the paddle width
/// (-1 left edge, 0 center, +1 right edge), mapped to up to ~54 degrees
/// from vertical. Speed magnitude is preserved and the vertical component
/// always points upward, so a ball can never leave the paddle downward.
pub fn paddle_bounce_velocity(hit_offset: f32, speed: f32) -> Vec2 {
    let speed = if speed.is_finite() && speed > f32::EPSILON {
        speed
    } else {
        crate::consts::MIN_BALL_SPEED
    };
    let angle = hit_offset.clamp(-1.0, 1.0) * PADDLE_MAX_BOUNCE;
    // +y is down; upward means negative y
    Vec2::new(angle.sin(), -angle.cos()) * speed
}
