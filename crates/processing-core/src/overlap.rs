//! Exclusivity checks between index sets that paint conflicting values.

use vace_common::{EditError, EditResult};
use vace_frame_model::FrameIndexSet;

/// Reject any pair of `roles` whose index sets intersect.
///
/// Every pair is checked, in the order given. The first intersecting pair is
/// reported with its complete, ascending list of shared frames.
pub fn check_disjoint(roles: &[(&str, &FrameIndexSet)]) -> EditResult<()> {
    for (i, (first, first_set)) in roles.iter().enumerate() {
        for (second, second_set) in &roles[i + 1..] {
            let frames = first_set.intersection(second_set);
            if !frames.is_empty() {
                tracing::debug!(
                    first = *first,
                    second = *second,
                    conflicts = frames.len(),
                    "Exclusive ranges overlap"
                );
                return Err(EditError::Overlap {
                    first: first.to_string(),
                    second: second.to_string(),
                    frames,
                });
            }
        }
    }
    Ok(())
}
