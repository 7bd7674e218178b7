//! PDF export of a rendered chart region.
//!
//! The host captures the on-screen region as a raster image through a
//! [`RegionCapture`]; this module names the file and scales the image onto
//! a single portrait A4 page, keeping its aspect ratio. Output taller than
//! the page is not split.

use crate::error::ChartError;
use serde::{Deserialize, Serialize};

/// Host capability that rasterizes a region of the rendered view
pub trait RegionCapture {
    type Error: std::fmt::Display;

    fn capture(&self, region: &str) -> Result<RasterImage, Self::Error>;
}

/// An encoded image with its pixel size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Encoded bytes, PNG as delivered by the host
    #[serde(default)]
    pub data: Vec<u8>,
}

/// Page size in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageFormat {
    pub width: f64,
    pub height: f64,
}

impl PageFormat {
    pub const A4: PageFormat = PageFormat {
        width: 595.28,
        height: 841.89,
    };
}

/// Where the image lands on the page, in points from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A single-page document ready for the host to write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPage {
    pub filename: String,
    pub format: PageFormat,
    pub placement: Placement,
    pub image: RasterImage,
}

/// File name for an exported chart: the title, or `chart.pdf` without one.
pub fn export_filename(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        "chart.pdf".to_string()
    } else {
        format!("{}.pdf", title)
    }
}

/// Fit an image to the page width at the origin.
pub fn fit_image(image: &RasterImage, format: PageFormat) -> Placement {
    let height = if image.width == 0 {
        0.0
    } else {
        f64::from(image.height) * format.width / f64::from(image.width)
    };
    Placement {
        x: 0.0,
        y: 0.0,
        width: format.width,
        height,
    }
}

/// Capture `region` and lay it out as an A4 page named after `title`.
///
/// # Errors
/// [`ChartError::Capture`] when the host fails to rasterize the region.
pub fn export_region<C: RegionCapture>(
    capture: &C,
    region: &str,
    title: &str,
) -> Result<ExportPage, ChartError> {
    let image = capture
        .capture(region)
        .map_err(|e| ChartError::Capture(e.to_string()))?;
    let format = PageFormat::A4;
    let placement = fit_image(&image, format);
    if placement.height > format.height {
        log::debug!(
            "export of {:?} overflows the page ({:.1}pt > {:.1}pt)",
            region,
            placement.height,
            format.height
        );
    }
    Ok(ExportPage {
        filename: export_filename(title),
        format,
        placement,
        image,
    })
}
