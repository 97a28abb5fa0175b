//! Position bonuses on top of a base stat modifier set

use crate::combat::modifiers::{AdditiveCombine, CombineModifiers, StatModifiers};
use crate::core::config::catalog;
use crate::formation::catalog::FormationCatalog;
use crate::formation::types::{FormationPosition, FormationType};

/// Merge a formation's bonus for `position` onto `base`
///
/// Returns `base` unchanged when the formation is unlisted or the position
/// has no bonus entry.
pub fn apply_position_bonuses<C: CombineModifiers + ?Sized>(
    formations: &FormationCatalog,
    formation_type: FormationType,
    position: FormationPosition,
    base: &StatModifiers,
    combiner: &C,
) -> StatModifiers {
    let bonus = formations
        .get(formation_type)
        .and_then(|spec| spec.position_bonuses.get(position))
        .and_then(|entry| entry.as_ref());

    match bonus {
        Some(delta) => combiner.combine(base, delta),
        None => *base,
    }
}

/// Additive merge against the global catalog
pub fn apply_bonuses(
    formation_type: FormationType,
    position: FormationPosition,
    base: &StatModifiers,
) -> StatModifiers {
    apply_position_bonuses(&catalog().formations, formation_type, position, base, &AdditiveCombine)
}
