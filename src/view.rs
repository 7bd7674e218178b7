//! Chart view: segmentation, packing and rendering in one layout pass.
//!
//! The presentation layer calls [`layout_chart`] whenever the body, the
//! transposition, the view options or the viewport size change, and draws
//! the result. Each call recomputes everything from its inputs.

use crate::config::{LayoutMode, ViewOptions};
use crate::layout::{column_count, pack};
use crate::render::{render, RenderItem};
use crate::sections::segment;
use serde::Serialize;

/// A rendered section card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    /// Position of the section in the chart
    pub index: usize,
    pub items: Vec<RenderItem>,
}

/// One page of cards, column by column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub columns: Vec<Vec<SectionView>>,
}

/// Result of a layout pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLayout {
    pub pages: Vec<PageView>,
    pub column_count: usize,
    pub section_count: usize,
}

/// Lay out a chart body for a viewport.
///
/// In paging mode sections are packed into pages of balanced columns; in
/// scrolling mode every section goes, in order, into a single full-width
/// column of a single page.
pub fn layout_chart(
    body: &str,
    transpose_offset: i32,
    options: &ViewOptions,
    viewport_width: f64,
    viewport_height: f64,
) -> ChartLayout {
    let sections = segment(body);
    let card = |index: usize| SectionView {
        index,
        items: render(&sections[index], transpose_offset, options.display),
    };

    let (pages, columns) = match options.layout {
        LayoutMode::Scrolling => {
            let column: Vec<SectionView> = (0..sections.len()).map(&card).collect();
            (vec![PageView { columns: vec![column] }], 1)
        }
        LayoutMode::Paging => {
            let packed = pack(&sections, viewport_width, viewport_height, &options.packing);
            let pages: Vec<PageView> = packed
                .iter()
                .map(|page| PageView {
                    columns: page
                        .columns(viewport_width, &options.packing)
                        .into_iter()
                        .map(|column| column.into_iter().map(&card).collect())
                        .collect(),
                })
                .collect();
            (pages, column_count(viewport_width, &options.packing))
        }
    };

    ChartLayout {
        pages,
        column_count: columns,
        section_count: sections.len(),
    }
}
