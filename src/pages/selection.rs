use super::PageSet;
use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// Parse a selection like `"2,5-8,11"` into a set of pages within
/// `[1, total_pages]`.
///
/// Tokens are comma-separated single pages or inclusive `start-end` ranges.
/// Whitespace around tokens and around the hyphen is ignored, empty tokens
/// (trailing or doubled commas) are skipped and duplicates collapse. The
/// first invalid token aborts the whole parse.
pub fn parse_selection(selection: &str, total_pages: u32) -> Result<PageSet> {
    let selection = selection.trim();
    if selection.is_empty() {
        return Err(Error::EmptySelection);
    }

    let mut pages = PageSet::new();

    for token in selection.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        pages.extend(parse_token(token, total_pages)?);
    }

    if pages.is_empty() {
        return Err(Error::EmptySelection);
    }

    Ok(pages)
}

fn parse_token(token: &str, total_pages: u32) -> Result<RangeInclusive<u32>> {
    // "-3" is a negative page, not a range with a missing start
    if let Some(rest) = token.strip_prefix('-') {
        if let Ok(n) = rest.trim().parse::<u64>() {
            return Err(Error::OutOfBounds {
                what: format!("page -{}", n),
                total: total_pages,
            });
        }
    }

    if let Some((start, end)) = token.split_once('-') {
        let start = parse_bound(start, token)?;
        let end = parse_bound(end, token)?;

        if start > end {
            return Err(Error::InvertedRange { start, end });
        }
        if start < 1 || end > i64::from(total_pages) {
            return Err(Error::OutOfBounds {
                what: format!("range {}-{}", start, end),
                total: total_pages,
            });
        }

        // Bounds checked above, both fit in u32
        Ok(start as u32..=end as u32)
    } else {
        let page: i64 = token.parse().map_err(|_| Error::MalformedNumber {
            token: token.to_string(),
        })?;

        if page < 1 || page > i64::from(total_pages) {
            return Err(Error::OutOfBounds {
                what: format!("page {}", page),
                total: total_pages,
            });
        }

        Ok(page as u32..=page as u32)
    }
}

fn parse_bound(bound: &str, token: &str) -> Result<i64> {
    bound.trim().parse().map_err(|_| Error::MalformedRange {
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::BTreeSet;

    #[rstest]
    #[case::single_page("5", 10, vec![5])]
    #[case::multiple_single_pages("1,3,5", 10, vec![1, 3, 5])]
    #[case::range("2-5", 10, vec![2, 3, 4, 5])]
    #[case::mixed("2,5-8,11", 15, vec![2, 5, 6, 7, 8, 11])]
    #[case::real_world("7-10,61-66,77,80", 100, vec![7, 8, 9, 10, 61, 62, 63, 64, 65, 66, 77, 80])]
    #[case::whitespace(" 2 , 5 - 8 , 11 ", 15, vec![2, 5, 6, 7, 8, 11])]
    #[case::first_page("1", 5, vec![1])]
    #[case::last_page("10", 10, vec![10])]
    #[case::all_pages("1-5", 5, vec![1, 2, 3, 4, 5])]
    #[case::duplicates("1,1,2,2-3", 5, vec![1, 2, 3])]
    #[case::degenerate_range("4-4", 5, vec![4])]
    #[case::trailing_comma("1,2,", 5, vec![1, 2])]
    #[case::doubled_comma("1,,3", 5, vec![1, 3])]
    #[case::unordered("9,2,5-6", 10, vec![2, 5, 6, 9])]
    fn test_parse_valid(#[case] selection: &str, #[case] total: u32, #[case] want: Vec<u32>) {
        let pages = parse_selection(selection, total).unwrap();
        assert_eq!(pages.to_vec(), want);
    }

    #[rstest]
    #[case::empty("", 10)]
    #[case::blank("   ", 10)]
    #[case::only_commas(",,", 10)]
    #[case::commas_and_spaces(" , , ", 10)]
    fn test_parse_empty(#[case] selection: &str, #[case] total: u32) {
        assert!(matches!(
            parse_selection(selection, total),
            Err(Error::EmptySelection)
        ));
    }

    #[rstest]
    #[case::page_zero("0", 10)]
    #[case::negative_page("-1", 10)]
    #[case::negative_page_spaced("- 4", 10)]
    #[case::page_exceeds_total("11", 10)]
    #[case::range_exceeds_total("5-15", 10)]
    #[case::range_starts_at_zero("0-3", 10)]
    #[case::valid_then_invalid("1,2,99", 10)]
    fn test_parse_out_of_bounds(#[case] selection: &str, #[case] total: u32) {
        assert!(matches!(
            parse_selection(selection, total),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[rstest]
    #[case::reversed("8-5", 10)]
    #[case::reversed_spaced(" 5 - 3 ", 10)]
    #[case::reversed_into_negative("5--3", 10)]
    fn test_parse_inverted(#[case] selection: &str, #[case] total: u32) {
        assert!(matches!(
            parse_selection(selection, total),
            Err(Error::InvertedRange { .. })
        ));
    }

    #[rstest]
    #[case::missing_end("5-", 10)]
    #[case::non_numeric_bound("a-3", 10)]
    #[case::three_parts("1-2-3", 10)]
    #[case::open_both("-", 10)]
    fn test_parse_malformed_range(#[case] selection: &str, #[case] total: u32) {
        assert!(matches!(
            parse_selection(selection, total),
            Err(Error::MalformedRange { .. })
        ));
    }

    #[rstest]
    #[case::letters("abc", 10)]
    #[case::inner_space("1 2", 10)]
    #[case::decimal("1.5", 10)]
    #[case::overflow("99999999999999999999", 10)]
    fn test_parse_malformed_number(#[case] selection: &str, #[case] total: u32) {
        assert!(matches!(
            parse_selection(selection, total),
            Err(Error::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = parse_selection("5-15", 10).unwrap_err();
        assert_eq!(err.to_string(), "range 5-15 out of bounds (PDF has 10 pages)");

        let err = parse_selection("0", 10).unwrap_err();
        assert_eq!(err.to_string(), "page 0 out of bounds (PDF has 10 pages)");

        let err = parse_selection("x", 10).unwrap_err();
        assert_eq!(err.to_string(), "invalid page number \"x\"");
    }

    /// One valid token with random padding, plus the pages it names.
    fn token(total: u32) -> impl Strategy<Value = (String, Vec<u32>)> {
        (1..=total, 1..=total, any::<bool>(), 0usize..3, 0usize..3).prop_map(
            |(a, b, single, left, right)| {
                let (l, r) = (" ".repeat(left), " ".repeat(right));
                if single {
                    (format!("{l}{a}{r}"), vec![a])
                } else {
                    let (lo, hi) = (a.min(b), a.max(b));
                    (format!("{l}{lo}{r}-{l}{hi}{r}"), (lo..=hi).collect())
                }
            },
        )
    }

    /// A total page count, a selection over it with the first token
    /// repeated, and the pages the selection names.
    fn selection() -> impl Strategy<Value = (u32, String, BTreeSet<u32>)> {
        (1u32..=200)
            .prop_flat_map(|total| (Just(total), proptest::collection::vec(token(total), 1..12)))
            .prop_map(|(total, tokens)| {
                let expected = tokens.iter().flat_map(|(_, pages)| pages.clone()).collect();
                let mut parts: Vec<String> = tokens.into_iter().map(|(text, _)| text).collect();
                parts.push(parts[0].clone());
                (total, parts.join(","), expected)
            })
    }

    proptest! {
        #[test]
        fn valid_selection_is_sorted_unique_and_in_bounds(
            (total, input, expected) in selection()
        ) {
            let pages = parse_selection(&input, total).unwrap().to_vec();

            prop_assert!(!pages.is_empty());
            prop_assert!(pages.iter().all(|&p| (1..=total).contains(&p)));
            prop_assert!(pages.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(pages, expected.into_iter().collect::<Vec<_>>());
        }
    }
}
