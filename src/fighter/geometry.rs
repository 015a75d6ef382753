//! Hurtbox and hitbox geometry
//!
//! All functions here are pure. Rectangles come back in world units relative
//! to the fighter's position (bottom-left of its frame); the caller
//! translates them. Authored frame boxes win over the heuristics.

use crate::core::config::AttackConfig;
use crate::core::types::{Facing, Rect};

/// Scale an authored frame box into frame pixels
///
/// Boxes whose components all fit in 0..1 are normalised to the frame;
/// anything larger is already in pixels.
pub fn normalize_meta_box(raw: Rect, frame_w: f32, frame_h: f32) -> Rect {
    let largest = raw.x.abs().max(raw.y.abs()).max(raw.w).max(raw.h);
    if largest <= 1.0 {
        Rect::new(raw.x * frame_w, raw.y * frame_h, raw.w * frame_w, raw.h * frame_h)
    } else {
        raw
    }
}

/// Authored box (frame pixels) to fighter-relative world units
///
/// Boxes are authored facing right and mirrored around the frame when the
/// fighter faces left.
pub fn meta_box_to_local(raw: Rect, frame_w: f32, frame_h: f32, facing: Facing, render_scale: f32) -> Rect {
    let px = normalize_meta_box(raw, frame_w, frame_h);
    let px = match facing {
        Facing::Right => px,
        Facing::Left => px.mirrored_within(frame_w),
    };
    px.scaled(render_scale)
}

/// Body-centred hurtbox derived from the frame size (world units)
pub fn heuristic_hurtbox(frame_w: f32, frame_h: f32) -> Rect {
    let w = frame_w * 0.68;
    let h = frame_h * 0.9;
    Rect::new((frame_w - w) / 2.0, frame_h * 0.02, w, h)
}

/// Fist/foot hitbox derived from the frame size (world units)
///
/// `progress` is how far the attack clip has played (0..1), or `None` when
/// the attack clip is not showing. Reach and width grow with progress.
pub fn heuristic_hitbox(frame_w: f32, frame_h: f32, progress: Option<f32>, facing: Facing) -> Rect {
    let (hit_w, hit_h, forward) = match progress {
        Some(p) => {
            let p = p.clamp(0.0, 1.0);
            (frame_w * (0.32 + 0.18 * p), frame_h * 0.34, 0.18 + 0.18 * p)
        }
        None => (frame_w * 0.32, frame_h * 0.30, 0.12),
    };
    let center_x = frame_w * 0.5 + facing.sign() * frame_w * forward;
    Rect::new(center_x - hit_w * 0.5, frame_h * 0.30, hit_w, hit_h)
}

/// Hitbox from the attack config, for frames with no usable size
///
/// Starts at the body's centre line and extends forward.
pub fn configured_hitbox(body_size: f32, attack: &AttackConfig, facing: Facing) -> Rect {
    let center = body_size * 0.5;
    let x = match facing {
        Facing::Right => center,
        Facing::Left => center - attack.hitbox_w,
    };
    Rect::new(x, body_size * 0.30, attack.hitbox_w, attack.hitbox_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Rect, b: Rect) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3 && (a.w - b.w).abs() < 1e-3 && (a.h - b.h).abs() < 1e-3
    }

    #[test]
    fn test_normalized_box_scaled_to_frame() {
        let raw = Rect::new(0.5, 0.25, 0.5, 0.5);
        assert!(approx(normalize_meta_box(raw, 80.0, 100.0), Rect::new(40.0, 25.0, 40.0, 50.0)));
    }

    #[test]
    fn test_pixel_box_untouched() {
        let raw = Rect::new(5.0, 0.0, 40.0, 80.0);
        assert_eq!(normalize_meta_box(raw, 80.0, 100.0), raw);
    }

    #[test]
    fn test_meta_box_mirrored_when_facing_left() {
        let raw = Rect::new(60.0, 10.0, 20.0, 30.0);
        let right = meta_box_to_local(raw, 100.0, 100.0, Facing::Right, 2.0);
        let left = meta_box_to_local(raw, 100.0, 100.0, Facing::Left, 2.0);
        assert!(approx(right, Rect::new(120.0, 20.0, 40.0, 60.0)));
        assert!(approx(left, Rect::new(40.0, 20.0, 40.0, 60.0)));
    }

    #[test]
    fn test_hurtbox_centered() {
        let hb = heuristic_hurtbox(200.0, 200.0);
        assert!((hb.x + hb.w / 2.0 - 100.0).abs() < 1e-3);
        assert!(hb.top() < 200.0);
    }

    #[test]
    fn test_hitbox_reach_grows_with_progress() {
        let early = heuristic_hitbox(200.0, 200.0, Some(0.0), Facing::Right);
        let late = heuristic_hitbox(200.0, 200.0, Some(1.0), Facing::Right);
        assert!(late.right() > early.right());
        assert!(late.w > early.w);
    }

    #[test]
    fn test_hitbox_mirrors_with_facing() {
        let right = heuristic_hitbox(200.0, 200.0, Some(0.5), Facing::Right);
        let left = heuristic_hitbox(200.0, 200.0, Some(0.5), Facing::Left);
        // Mirror images around the frame centre
        assert!(((right.x + right.w / 2.0) - 100.0 + (left.x + left.w / 2.0) - 100.0).abs() < 1e-3);
        assert!(left.x < 100.0 && right.right() > 100.0);
    }

    #[test]
    fn test_configured_hitbox_in_front() {
        let attack = AttackConfig::default();
        let right = configured_hitbox(192.0, &attack, Facing::Right);
        let left = configured_hitbox(192.0, &attack, Facing::Left);
        assert_eq!(right.x, 96.0);
        assert_eq!(left.right(), 96.0);
        assert_eq!(right.w, attack.hitbox_w);
    }
}
