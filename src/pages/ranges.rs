use std::fmt;
use std::ops::RangeInclusive;

/// One maximal run of consecutive pages, rendered `"n"` or `"a-b"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RangeToken {
    start: u32,
    end: u32,
}

impl RangeToken {
    /// Create a token covering `start..=end`; the bounds are swapped if given
    /// in reverse.
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn single(page: u32) -> Self {
        Self::new(page, page)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of pages covered by this token
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Expand the token back into its page numbers
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Collapse page numbers into the minimal ascending list of range tokens.
///
/// e.g. `[1,2,3,5,7,8,9]` -> `["1-3", "5", "7-9"]`. Input order and
/// duplicates do not matter; empty input yields no tokens.
pub fn compact_ranges<I>(pages: I) -> Vec<RangeToken>
where
    I: IntoIterator<Item = u32>,
{
    let mut pages: Vec<u32> = pages.into_iter().collect();
    pages.sort_unstable();
    pages.dedup();

    let mut tokens = Vec::new();
    let mut iter = pages.into_iter();

    let Some(first) = iter.next() else {
        return tokens;
    };

    let mut start = first;
    let mut end = first;

    for page in iter {
        if page == end + 1 {
            end = page;
        } else {
            tokens.push(RangeToken::new(start, end));
            start = page;
            end = page;
        }
    }
    tokens.push(RangeToken::new(start, end));

    tokens
}

/// Render tokens as a comma-separated selection string
pub fn join_ranges(tokens: &[RangeToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
