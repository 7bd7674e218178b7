pub mod chart;
pub mod chord;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod key;
pub mod layout;
pub mod lexer;
pub mod pitch;
pub mod render;
pub mod sections;
pub mod view;

pub use chart::*;
pub use chord::{transpose_chord, ChordSymbol};
pub use config::{DisplayMode, LayoutConfig, LayoutMode, ViewOptions};
pub use error::*;
pub use export::{export_filename, export_region, ExportPage, PageFormat, RasterImage, RegionCapture};
pub use import::{import_pages, is_chord_line, ImportDraft, Importer, PageText, TextExtractor, TextFragment};
pub use key::{format_offset, key_distance, offset_to_key, resolve_source_key, KEY_CHOICES};
pub use layout::{pack, Page, Pager};
pub use lexer::{tokenize, Token};
pub use render::{render, RenderItem};
pub use sections::{detect_section, overview, sections, Section, SectionOverview};
pub use view::{layout_chart, ChartLayout};

/// Lay out a chart for display in `target_key`.
/// This is the main entry point for the presentation layer.
pub fn view_chart(
    chart: &Chart,
    target_key: &str,
    options: &ViewOptions,
    viewport_width: f64,
    viewport_height: f64,
) -> ChartLayout {
    let offset = offset_to_key(&chart.key, &chart.body, target_key);
    layout_chart(&chart.body, i32::from(offset), options, viewport_width, viewport_height)
}

/// Overview of a chart's sections in `target_key`
pub fn chart_overview(chart: &Chart, target_key: &str, display: DisplayMode) -> Vec<SectionOverview> {
    let offset = offset_to_key(&chart.key, &chart.body, target_key);
    overview(&chart.body, i32::from(offset), display)
}
