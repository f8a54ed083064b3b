use super::{compact_ranges, join_ranges, parse_selection, Mode, PageSet, RangeToken};
use crate::error::{Error, Result};

/// Decide which pages must be physically removed.
///
/// In `remove` mode that is the selection itself; in `keep` mode it is every
/// page of the document not in the selection.
pub fn resolve_removal(selected: &PageSet, total_pages: u32, mode: Mode) -> PageSet {
    match mode {
        Mode::Remove => selected.clone(),
        Mode::Keep => (1..=total_pages)
            .filter(|page| !selected.contains(*page))
            .collect(),
    }
}

/// Reject removal sets that would leave the document unchanged or empty.
pub fn validate_removal(removal: &PageSet, total_pages: u32) -> Result<()> {
    if removal.is_empty() {
        return Err(Error::NoPagesSelected);
    }
    if removal.len() >= total_pages as usize {
        return Err(Error::CannotRemoveAllPages { total: total_pages });
    }
    Ok(())
}

/// A validated removal: which pages go, and how to tell the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalPlan {
    pub mode: Mode,
    pub original_pages: u32,
    pub removal: PageSet,
    pub ranges: Vec<RangeToken>,
}

impl RemovalPlan {
    /// Parse, resolve, validate and compact in one step.
    pub fn build(selection: &str, total_pages: u32, mode: Mode) -> Result<Self> {
        let selected = parse_selection(selection, total_pages)?;
        let removal = resolve_removal(&selected, total_pages, mode);
        validate_removal(&removal, total_pages)?;
        let ranges = compact_ranges(removal.iter());

        Ok(Self {
            mode,
            original_pages: total_pages,
            removal,
            ranges,
        })
    }

    pub fn removed_count(&self) -> u32 {
        self.removal.len() as u32
    }

    pub fn remaining_pages(&self) -> u32 {
        self.original_pages - self.removed_count()
    }

    /// Removed page numbers, ascending
    pub fn removed_pages(&self) -> Vec<u32> {
        self.removal.to_vec()
    }

    /// Compact selection string handed to the engine, e.g. `"1-3,5"`
    pub fn ranges_string(&self) -> String {
        join_ranges(&self.ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_remove_mode_real_world() {
        let plan = RemovalPlan::build("7-10,61-66,77,80", 100, Mode::Remove).unwrap();
        assert_eq!(plan.removed_count(), 12);
        assert_eq!(plan.remaining_pages(), 88);
        assert_eq!(plan.ranges_string(), "7-10,61-66,77,80");
    }

    #[test]
    fn test_keep_mode_complement() {
        let plan = RemovalPlan::build("1-3", 10, Mode::Keep).unwrap();
        assert_eq!(plan.removed_pages(), vec![4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(plan.ranges_string(), "4-10");
        assert_eq!(plan.removed_count(), 7);
        assert_eq!(plan.remaining_pages(), 3);
    }

    #[test]
    fn test_keep_scattered_pages() {
        let plan = RemovalPlan::build("2,5,9", 10, Mode::Keep).unwrap();
        assert_eq!(plan.ranges_string(), "1,3-4,6-8,10");
        assert_eq!(plan.remaining_pages(), 3);
    }

    #[rstest]
    #[case::remove_everything("1-5", 5, Mode::Remove)]
    #[case::remove_everything_piecewise("1,2,3-5", 5, Mode::Remove)]
    #[case::single_page_document("1", 1, Mode::Remove)]
    fn test_cannot_remove_all(#[case] selection: &str, #[case] total: u32, #[case] mode: Mode) {
        let err = RemovalPlan::build(selection, total, mode).unwrap_err();
        assert!(matches!(err, Error::CannotRemoveAllPages { total: t } if t == total));
    }

    #[rstest]
    #[case::keep_everything("1-5", 5)]
    #[case::keep_everything_unordered("5,4,1-3", 5)]
    #[case::keep_only_page("1", 1)]
    fn test_keep_all_selects_nothing(#[case] selection: &str, #[case] total: u32) {
        let err = RemovalPlan::build(selection, total, Mode::Keep).unwrap_err();
        assert!(matches!(err, Error::NoPagesSelected));
    }

    #[test]
    fn test_parse_errors_propagate() {
        assert!(matches!(
            RemovalPlan::build("11", 10, Mode::Keep),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            RemovalPlan::build("", 10, Mode::Remove),
            Err(Error::EmptySelection)
        ));
    }

    #[test]
    fn test_validate_removal() {
        let removal: PageSet = [1, 2].into_iter().collect();
        assert!(validate_removal(&removal, 3).is_ok());
        assert!(validate_removal(&removal, 2).is_err());
        assert!(matches!(
            validate_removal(&PageSet::new(), 3),
            Err(Error::NoPagesSelected)
        ));
    }

    proptest! {
        #[test]
        fn keep_and_remove_partition_the_document(
            total in 1u32..=200,
            raw in proptest::collection::btree_set(1u32..=200, 1..40)
        ) {
            let selected: PageSet = raw.into_iter().filter(|p| *p <= total).collect();
            prop_assume!(!selected.is_empty());

            let removed = resolve_removal(&selected, total, Mode::Remove);
            let kept_out = resolve_removal(&selected, total, Mode::Keep);

            prop_assert_eq!(removed.len() + kept_out.len(), total as usize);
            prop_assert!(kept_out.iter().all(|p| !removed.contains(p)));
            prop_assert!(kept_out.iter().all(|p| (1..=total).contains(&p)));
        }

        #[test]
        fn plan_counts_are_consistent(
            total in 2u32..=200,
            raw in proptest::collection::btree_set(1u32..=200, 1..40),
            keep in any::<bool>()
        ) {
            let selected: Vec<u32> = raw.into_iter().filter(|p| *p <= total).collect();
            prop_assume!(!selected.is_empty());
            let mode = if keep { Mode::Keep } else { Mode::Remove };
            let selection = selected
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");

            if let Ok(plan) = RemovalPlan::build(&selection, total, mode) {
                prop_assert_eq!(plan.removed_count() + plan.remaining_pages(), total);
                prop_assert!(plan.removed_count() >= 1);
                prop_assert!(plan.remaining_pages() >= 1);
                let covered: usize = plan.ranges.iter().map(RangeToken::len).sum();
                prop_assert_eq!(covered, plan.removal.len());
            }
        }
    }
}
