use chartbook::{ChartError, DisplayMode, Importer, PageText, RasterImage, ViewOptions};
use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static IMPORTER: RefCell<Importer> = RefCell::new(Importer::new());
}

#[derive(Serialize)]
struct JsError {
    message: String,
    kind: String,
}

fn error_to_js(e: ChartError) -> JsValue {
    let error = JsError {
        message: e.to_string(),
        kind: e.kind().to_string(),
    };
    match serde_json::to_string(&error) {
        Ok(json) => JsValue::from_str(&json),
        Err(_) => JsValue::from_str(&error.message),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn display_mode(display: &str) -> DisplayMode {
    DisplayMode::from_str(display).unwrap_or_else(|| {
        log::debug!("unknown display mode {:?}, showing both", display);
        DisplayMode::default()
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // a second init (hot reload) keeps the existing logger
    console_log::init_with_level(log::Level::Debug).ok();
    log::info!("chartbook wasm module initialized");
}

/// Transpose one chord symbol by a number of semitones
#[wasm_bindgen]
pub fn transpose_chord(symbol: &str, semitones: i32) -> String {
    chartbook::transpose_chord(symbol, semitones)
}

/// Shortest signed offset from one key to another, 0 when either is unknown
#[wasm_bindgen]
pub fn key_distance(from: &str, to: &str) -> i8 {
    chartbook::key_distance(from, to)
}

/// Offset that shows a chart in the target key, resolving a blank chart key from its body
#[wasm_bindgen]
pub fn offset_to_key(chart_key: &str, body: &str, target: &str) -> i8 {
    chartbook::offset_to_key(chart_key, body, target)
}

#[wasm_bindgen]
pub fn format_offset(offset: i32) -> String {
    chartbook::format_offset(offset)
}

/// The twelve selectable keys as a JSON array
#[wasm_bindgen]
pub fn key_choices() -> Result<String, JsValue> {
    to_json(&chartbook::KEY_CHOICES)
}

/// Render a chart body to a JSON array of `{ type, text }` items
#[wasm_bindgen]
pub fn render(body: &str, transpose_offset: i32, display: &str) -> Result<String, JsValue> {
    to_json(&chartbook::render(body, transpose_offset, display_mode(display)))
}

/// Split a chart body into `{ title, body }` sections
#[wasm_bindgen]
pub fn sections(body: &str) -> Result<String, JsValue> {
    to_json(&chartbook::sections(body))
}

/// Section overview cards with badges and chord/lyric pairs
#[wasm_bindgen]
pub fn overview(body: &str, transpose_offset: i32, display: &str) -> Result<String, JsValue> {
    to_json(&chartbook::overview(body, transpose_offset, display_mode(display)))
}

/// Lay out a chart for a viewport.
/// `options` is a YAML document of view options; missing keys take their defaults.
#[wasm_bindgen]
pub fn layout(
    body: &str,
    transpose_offset: i32,
    options: Option<String>,
    viewport_width: f64,
    viewport_height: f64,
) -> Result<String, JsValue> {
    let options = ViewOptions::from_yaml(options.as_deref().unwrap_or("")).map_err(error_to_js)?;
    let layout = chartbook::layout_chart(body, transpose_offset, &options, viewport_width, viewport_height);
    to_json(&layout)
}

#[wasm_bindgen]
pub fn is_importing() -> bool {
    IMPORTER.with(|importer| importer.borrow().is_busy())
}

/// Mark a PDF import as started; rejects while another one is running
#[wasm_bindgen]
pub fn begin_import() -> Result<(), JsValue> {
    IMPORTER.with(|importer| importer.borrow_mut().begin().map_err(error_to_js))
}

/// Finish the running import with the text fragments extracted by the host.
/// Returns the import draft as JSON.
#[wasm_bindgen]
pub fn finish_import(pages: JsValue) -> Result<String, JsValue> {
    let pages: Vec<PageText> = match serde_wasm_bindgen::from_value(pages) {
        Ok(pages) => pages,
        Err(e) => return Err(fail_import(&e.to_string())),
    };
    let draft = IMPORTER.with(|importer| importer.borrow_mut().finish(&pages));
    to_json(&draft.map_err(error_to_js)?)
}

/// Abort the running import after the host failed to extract text
#[wasm_bindgen]
pub fn fail_import(reason: &str) -> JsValue {
    error_to_js(IMPORTER.with(|importer| importer.borrow_mut().fail(reason)))
}

/// Largest integer a JS number holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Chart id from a JS number; only whole, non-negative, exactly representable values
fn chart_id(id: f64) -> Result<u64, ChartError> {
    if id.is_finite() && id >= 0.0 && id.fract() == 0.0 && id <= MAX_SAFE_INTEGER {
        Ok(id as u64)
    } else {
        Err(ChartError::Validation(format!("invalid chart id {}", id)))
    }
}

/// Parse a chart document (YAML frontmatter and markup body) into JSON
#[wasm_bindgen]
pub fn parse_chart(id: f64, source: &str) -> Result<String, JsValue> {
    let id = chart_id(id).map_err(error_to_js)?;
    let chart = chartbook::Chart::from_document(id, source).map_err(error_to_js)?;
    to_json(&chart)
}

#[wasm_bindgen]
pub fn export_filename(title: &str) -> String {
    chartbook::export_filename(title)
}

/// Placement of a captured image of the given pixel size on an A4 page
#[wasm_bindgen]
pub fn export_placement(image_width: u32, image_height: u32) -> Result<String, JsValue> {
    let image = RasterImage {
        width: image_width,
        height: image_height,
        data: Vec::new(),
    };
    to_json(&chartbook::export::fit_image(&image, chartbook::PageFormat::A4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_id_accepts_whole_numbers() {
        assert_eq!(chart_id(0.0), Ok(0));
        assert_eq!(chart_id(1_700_000_000_123.0), Ok(1_700_000_000_123));
        assert_eq!(chart_id(MAX_SAFE_INTEGER), Ok(9_007_199_254_740_991));
    }

    #[test]
    fn test_chart_id_rejects_lossy_numbers() {
        for id in [-1.0, 2.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300] {
            assert!(matches!(chart_id(id), Err(ChartError::Validation(_))), "{}", id);
        }
    }
}
