//! # Page Layout
//!
//! Packs sections into fixed-height pages of side-by-side columns, then
//! balances each page's sections over its columns.
//!
//! ## Height Estimate
//! A section's height is estimated from its line count alone:
//! `lines * line_height + card_padding` (18 and 48 units by default). This is
//! a cheap proxy, not a measurement of rendered text.
//!
//! ## Packing
//! Sections are taken in order. Each goes into the shortest column when it
//! still fits under the viewport height there, otherwise into the first column
//! that fits. When no column fits, the page is closed and the section starts a
//! new page in its first column, even if it is taller than the viewport, so
//! every section is placed exactly once and packing always finishes after at
//! most `sections * columns` column probes.
//!
//! Columns within a page are assigned by the same shortest-column rule with
//! no height limit. Nothing is ever moved once placed.
//!
//! ## Example
//! ```rust
//! use chartbook::{pack, LayoutConfig};
//!
//! let sections = ["[A]\n1\n2", "[B]\n1", "[C]\n1\n2\n3"];
//! let config = LayoutConfig::default();
//! let pages = pack(&sections, 700.0, 800.0, &config);
//! assert_eq!(pages.len(), 1);
//! // heights 102, 84 and 120: the third goes under the second, the lower column
//! assert_eq!(pages[0].columns(700.0, &config), vec![vec![0], vec![1, 2]]);
//! ```

use crate::config::LayoutConfig;
use serde::Serialize;

/// Number of columns that fit in a viewport width, between 1 and `max_columns`.
pub fn column_count(viewport_width: f64, config: &LayoutConfig) -> usize {
    let fit = (viewport_width / config.min_card_width).floor();
    let fit = if fit.is_finite() && fit > 0.0 { fit as usize } else { 0 };
    fit.clamp(1, config.max_columns.max(1))
}

/// Estimated rendered height of a section's text.
pub fn estimate_height(text: &str, config: &LayoutConfig) -> f64 {
    text.split('\n').count() as f64 * config.line_height + config.card_padding
}

/// Index of the first lowest column
fn shortest_column(heights: &[f64]) -> usize {
    let mut min_idx = 0;
    for (i, &h) in heights.iter().enumerate().skip(1) {
        if h < heights[min_idx] {
            min_idx = i;
        }
    }
    min_idx
}

/// Spread items over columns, each going to the currently shortest column.
///
/// Returns item positions per column, in placement order.
pub fn distribute(heights: &[f64], columns: usize) -> Vec<Vec<usize>> {
    let columns = columns.max(1);
    let mut assigned = vec![Vec::new(); columns];
    let mut column_heights = vec![0.0; columns];
    for (i, &h) in heights.iter().enumerate() {
        let col = shortest_column(&column_heights);
        assigned[col].push(i);
        column_heights[col] += h;
    }
    assigned
}

/// One page of a layout pass
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Page {
    /// Indices of the sections on this page, in source order
    pub items: Vec<usize>,
    #[serde(skip)]
    heights: Vec<f64>,
}

impl Page {
    fn push(&mut self, item: usize, height: f64) {
        self.items.push(item);
        self.heights.push(height);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Section indices per column for a page of the given width.
    pub fn columns(&self, page_width: f64, config: &LayoutConfig) -> Vec<Vec<usize>> {
        distribute(&self.heights, column_count(page_width, config))
            .into_iter()
            .map(|column| column.into_iter().map(|pos| self.items[pos]).collect())
            .collect()
    }
}

/// Pack pre-computed section heights into pages of `columns` columns.
///
/// Always returns at least one page; an empty input gives one empty page.
pub fn pack_heights(heights: &[f64], columns: usize, max_height: f64) -> Vec<Page> {
    let columns = columns.max(1);
    let mut pages = Vec::new();
    let mut page = Page::default();
    let mut column_heights = vec![0.0; columns];

    for (i, &h) in heights.iter().enumerate() {
        let shortest = shortest_column(&column_heights);
        let target = if column_heights[shortest] + h <= max_height {
            Some(shortest)
        } else {
            column_heights.iter().position(|&c| c + h <= max_height)
        };

        match target {
            Some(col) => {
                page.push(i, h);
                column_heights[col] += h;
            }
            None => {
                if !page.is_empty() {
                    pages.push(std::mem::take(&mut page));
                }
                column_heights.iter_mut().for_each(|c| *c = 0.0);
                page.push(i, h);
                column_heights[0] += h;
            }
        }
    }

    if !page.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    log::trace!("packed {} sections into {} pages", heights.len(), pages.len());
    pages
}

/// Pack section texts into pages for a viewport.
pub fn pack<S: AsRef<str>>(
    sections: &[S],
    viewport_width: f64,
    viewport_height: f64,
    config: &LayoutConfig,
) -> Vec<Page> {
    let heights: Vec<f64> = sections
        .iter()
        .map(|s| estimate_height(s.as_ref(), config))
        .collect();
    pack_heights(&heights, column_count(viewport_width, config), viewport_height)
}

/// Page navigation: a current page index kept inside `0..page_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    index: usize,
    page_count: usize,
}

impl Pager {
    pub fn new(page_count: usize) -> Self {
        Self { index: 0, page_count }
    }

    pub fn current(&self) -> usize {
        self.index
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    fn last(&self) -> usize {
        self.page_count.saturating_sub(1)
    }

    /// Update the page count after a new layout pass, clamping the current page.
    pub fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
        self.index = self.index.min(self.last());
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.index = page.min(self.last());
        self.index
    }

    pub fn next(&mut self) -> usize {
        self.go_to_page(self.index + 1)
    }

    pub fn previous(&mut self) -> usize {
        self.go_to_page(self.index.saturating_sub(1))
    }

    pub fn has_next(&self) -> bool {
        self.index < self.last()
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// One-based position for display, e.g. `"2 / 5"`.
    pub fn indicator(&self) -> String {
        format!("{} / {}", self.index + 1, self.page_count.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_items(pages: &[Page]) -> Vec<usize> {
        pages.iter().flat_map(|p| p.items.iter().copied()).collect()
    }

    #[test]
    fn test_column_count() {
        let config = LayoutConfig::default();
        assert_eq!(column_count(0.0, &config), 1);
        assert_eq!(column_count(319.0, &config), 1);
        assert_eq!(column_count(640.0, &config), 2);
        assert_eq!(column_count(1000.0, &config), 3);
        assert_eq!(column_count(5000.0, &config), 4);
        assert_eq!(column_count(f64::NAN, &config), 1);
    }

    #[test]
    fn test_estimate_height() {
        let config = LayoutConfig::default();
        assert_eq!(estimate_height("", &config), 66.0);
        assert_eq!(estimate_height("a\nb\nc", &config), 3.0 * 18.0 + 48.0);
    }

    #[test]
    fn test_pack_prefers_shortest_column() {
        let pages = pack_heights(&[100.0, 50.0, 30.0, 30.0], 2, 200.0);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].items, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_pack_breaks_page_when_nothing_fits() {
        let pages = pack_heights(&[150.0, 150.0, 100.0, 40.0], 2, 200.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].items, vec![0, 1]);
        assert_eq!(pages[1].items, vec![2, 3]);
    }

    #[test]
    fn test_oversized_sections_each_get_a_page() {
        let pages = pack_heights(&[500.0, 900.0, 10.0], 3, 200.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].items, vec![0]);
        assert_eq!(pages[1].items, vec![1, 2]);
    }

    #[test]
    fn test_pack_empty_gives_one_empty_page() {
        let pages = pack_heights(&[], 3, 500.0);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_pack_completeness_over_viewports() {
        let heights: Vec<f64> = (0..37).map(|i| 40.0 + ((i * 53) % 400) as f64).collect();
        for columns in 1..=4 {
            for max_height in [10.0, 120.0, 300.0, 800.0, 5000.0] {
                let pages = pack_heights(&heights, columns, max_height);
                assert_eq!(all_items(&pages), (0..heights.len()).collect::<Vec<_>>());
                assert!(pages.iter().all(|p| !p.is_empty()));
            }
        }
    }

    #[test]
    fn test_columns_cover_page_items() {
        let config = LayoutConfig::default();
        let texts: Vec<String> = (0..9).map(|i| "line\n".repeat(i + 1)).collect();
        for width in [200.0, 700.0, 1300.0, 2000.0] {
            for page in pack(&texts, width, 600.0, &config) {
                let columns = page.columns(width, &config);
                assert_eq!(columns.len(), column_count(width, &config));
                let mut placed: Vec<usize> = columns.concat();
                placed.sort_unstable();
                assert_eq!(placed, page.items);
            }
        }
    }

    #[test]
    fn test_distribute_balances() {
        let columns = distribute(&[100.0, 10.0, 10.0, 10.0], 2);
        assert_eq!(columns, vec![vec![0], vec![1, 2, 3]]);
        assert_eq!(distribute(&[1.0, 1.0], 0), vec![vec![0, 1]]);
    }

    #[test]
    fn test_pager_navigation() {
        let mut pager = Pager::new(3);
        assert_eq!(pager.previous(), 0);
        assert_eq!(pager.next(), 1);
        assert_eq!(pager.next(), 2);
        assert_eq!(pager.next(), 2);
        assert!(!pager.has_next());
        assert_eq!(pager.indicator(), "3 / 3");
        assert_eq!(pager.go_to_page(10), 2);
        assert_eq!(pager.go_to_page(1), 1);
        assert!(pager.has_previous());
    }

    #[test]
    fn test_pager_clamps_on_relayout() {
        let mut pager = Pager::new(5);
        pager.go_to_page(4);
        pager.set_page_count(2);
        assert_eq!(pager.current(), 1);
        pager.set_page_count(0);
        assert_eq!(pager.current(), 0);
        assert_eq!(pager.indicator(), "1 / 1");
    }
}
