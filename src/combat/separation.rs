//! Body separation: keeps the two hurtboxes from interpenetrating

use crate::fighter::Combatant;

/// Push overlapping fighters apart symmetrically along x
///
/// Returns the horizontal overlap that was resolved, or `None` when the
/// hurtboxes were already apart. Both fighters are re-clamped to the stage,
/// so a fighter pinned at the edge may still overlap slightly.
pub fn separate(a: &mut Combatant, b: &mut Combatant) -> Option<f32> {
    let box_a = a.hurtbox();
    let box_b = b.hurtbox();
    if !box_a.overlaps_vertically(&box_b) {
        return None;
    }

    let overlap = box_a.right().min(box_b.right()) - box_a.x.max(box_b.x);
    if overlap <= 0.0 {
        return None;
    }

    let push = overlap / 2.0 + 1.0;
    if a.x() <= b.x() {
        a.position.x -= push;
        b.position.x += push;
    } else {
        a.position.x += push;
        b.position.x -= push;
    }
    a.clamp_x();
    b.clamp_x();

    tracing::trace!("separated fighters by {:.1}", overlap);
    Some(overlap)
}
