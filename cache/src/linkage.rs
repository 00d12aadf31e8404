//! Parent-linkage rules for appending to the window.
//!
//! The cache holds a single linear chain. A fork is applied by reverting the
//! losing branch and adding the winning one, never by overwriting a slot.

use tipcache_types::TipSet;

use crate::CacheError;

/// Check that `candidate` may be appended on top of `head`.
///
/// Any candidate is accepted on an empty window. Otherwise its height must
/// be above the head and its parents must be exactly the head's key. Height
/// is checked first.
pub fn validate_linkage(head: Option<&TipSet>, candidate: &TipSet) -> Result<(), CacheError> {
    let Some(head) = head else {
        return Ok(());
    };

    if candidate.height() <= head.height() {
        return Err(CacheError::NonMonotonic {
            head: head.height(),
            height: candidate.height(),
        });
    }

    if !head.is_parent_of(candidate) {
        return Err(CacheError::ParentMismatch {
            expected: head.key().clone(),
            got: candidate.parents().clone(),
        });
    }

    Ok(())
}
