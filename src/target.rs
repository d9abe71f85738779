//! Target-set calculation
//!
//! The target set is the set of pages that must be mounted and kept current
//! right now: the visible pages, a buffer of pages on each side of every
//! visible page, the current page's neighborhood, and a non-empty fallback.
//! It is derived on every scheduling trigger and never stored.

use std::collections::BTreeSet;

/// Compute the pages that should be mounted, clamped to `[1, page_count]`.
///
/// `current_page` of 0 means no current page is known yet. Idempotent: the
/// same inputs always produce the same set. Non-empty whenever
/// `page_count ≥ 1` — when nothing is visible and no current page exists the
/// first two pages are targeted so the initial screen has content.
#[must_use]
pub fn target_set(
    visible: &BTreeSet<u32>,
    current_page: u32,
    buffer_radius: u32,
    page_count: u32,
) -> BTreeSet<u32> {
    let mut targets = BTreeSet::new();
    if page_count == 0 {
        return targets;
    }

    let mut add_neighborhood = |center: u32| {
        let low = center.saturating_sub(buffer_radius).max(1);
        let high = center.saturating_add(buffer_radius).min(page_count);
        for page in low..=high {
            targets.insert(page);
        }
    };

    for &page in visible {
        if (1..=page_count).contains(&page) {
            add_neighborhood(page);
        }
    }

    if (1..=page_count).contains(&current_page) {
        add_neighborhood(current_page);
    }

    if targets.is_empty() {
        targets.insert(1);
        if page_count >= 2 {
            targets.insert(2);
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pages: &[u32]) -> BTreeSet<u32> {
        pages.iter().copied().collect()
    }

    #[test]
    fn buffers_around_visible_and_current() {
        let targets = target_set(&set(&[4, 5]), 5, 2, 10);
        assert_eq!(targets, set(&[2, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn clamps_to_document_bounds() {
        let targets = target_set(&set(&[1]), 1, 2, 10);
        assert_eq!(targets, set(&[1, 2, 3]));

        let tail = target_set(&set(&[10]), 10, 2, 10);
        assert_eq!(tail, set(&[8, 9, 10]));
    }

    #[test]
    fn current_page_alone_keeps_its_neighborhood_mounted() {
        // Visibility signals may lag a jump; the current page still renders.
        let targets = target_set(&BTreeSet::new(), 6, 2, 10);
        assert_eq!(targets, set(&[4, 5, 6, 7, 8]));
    }

    #[test]
    fn falls_back_to_first_pages_when_nothing_known() {
        assert_eq!(target_set(&BTreeSet::new(), 0, 2, 10), set(&[1, 2]));
        assert_eq!(target_set(&BTreeSet::new(), 0, 2, 1), set(&[1]));
    }

    #[test]
    fn never_empty_for_nonempty_document() {
        for count in 1..=5 {
            assert!(!target_set(&BTreeSet::new(), 0, 2, count).is_empty());
        }
    }

    #[test]
    fn empty_document_yields_empty_set() {
        assert!(target_set(&set(&[1, 2]), 1, 2, 0).is_empty());
    }

    #[test]
    fn ignores_out_of_range_visibility() {
        let targets = target_set(&set(&[99]), 0, 2, 10);
        assert_eq!(targets, set(&[1, 2]));
    }

    #[test]
    fn idempotent_for_same_inputs() {
        let visible = set(&[3, 4]);
        let first = target_set(&visible, 4, 2, 20);
        let second = target_set(&visible, 4, 2, 20);
        assert_eq!(first, second);
    }
}
