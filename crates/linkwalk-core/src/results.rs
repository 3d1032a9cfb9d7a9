//! Solution mappings collected during an execution, with page navigation.

use std::collections::BTreeMap;

use linkwalk_sparql::model::strip_var_sigil;

/// One solution mapping: variable (as sent by the endpoint) → value.
pub type Solution = BTreeMap<String, String>;

/// Internal bookkeeping variable attached by the endpoint; never displayed.
pub const IMPRINT_VARIABLE: &str = "imprint";

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Default, Clone)]
pub struct ResultCollector {
    rows: Vec<Solution>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, solution: Solution) {
        self.rows.push(solution);
    }

    pub fn extend(&mut self, solutions: impl IntoIterator<Item = Solution>) {
        self.rows.extend(solutions);
    }

    pub fn rows(&self) -> &[Solution] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Displayable variables, taken from the first solution.
    pub fn variables(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).filter(|v| is_visible(v)).collect())
            .unwrap_or_default()
    }

    /// Displayable values of one solution, in variable order.
    pub fn mappings(solution: &Solution) -> Vec<&str> {
        solution
            .iter()
            .filter(|(var, _)| is_visible(var))
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

fn is_visible(variable: &str) -> bool {
    strip_var_sigil(variable) != IMPRINT_VARIABLE
}

/// Cursor over fixed-size pages of a result set.
///
/// The page count is recomputed from the current number of rows on every
/// call, since rows keep arriving while the user pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultPager {
    current: usize,
    page_size: usize,
}

impl Default for ResultPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ResultPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the last non-empty page (0 when there is less than a page).
    pub fn last_page(&self, total: usize) -> usize {
        if total < self.page_size {
            0
        } else if total % self.page_size == 0 {
            total / self.page_size - 1
        } else {
            total / self.page_size
        }
    }

    pub fn first(&mut self) {
        self.current = 0;
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn next(&mut self, total: usize) {
        if self.current < self.last_page(total) {
            self.current += 1;
        }
    }

    pub fn last(&mut self, total: usize) {
        self.current = self.last_page(total);
    }

    pub fn page<'a>(&self, rows: &'a [Solution]) -> &'a [Solution] {
        let start = (self.current * self.page_size).min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(i: usize) -> Solution {
        let mut s = Solution::new();
        s.insert("?x".into(), format!("http://ex/{i}"));
        s.insert("?imprint".into(), "opaque".into());
        s
    }

    #[test]
    fn last_page_boundaries() {
        let pager = ResultPager::new(10);
        assert_eq!(pager.last_page(0), 0);
        assert_eq!(pager.last_page(9), 0);
        assert_eq!(pager.last_page(10), 0);
        assert_eq!(pager.last_page(11), 1);
        assert_eq!(pager.last_page(20), 1);
        assert_eq!(pager.last_page(21), 2);
    }

    #[test]
    fn navigation_is_clamped() {
        let rows: Vec<_> = (0..25).map(row).collect();
        let mut pager = ResultPager::new(10);
        pager.previous();
        assert_eq!(pager.current(), 0);
        pager.next(rows.len());
        pager.next(rows.len());
        pager.next(rows.len());
        assert_eq!(pager.current(), 2);
        assert_eq!(pager.page(&rows).len(), 5);
        pager.first();
        assert_eq!(pager.page(&rows).len(), 10);
        pager.last(rows.len());
        assert_eq!(pager.current(), 2);
    }

    #[test]
    fn imprint_is_hidden() {
        let mut results = ResultCollector::new();
        results.push(row(1));
        assert_eq!(results.variables(), vec!["?x"]);
        assert_eq!(ResultCollector::mappings(&results.rows()[0]), vec!["http://ex/1"]);
    }
}
