//! PNG export of the current chart.

use std::fs;
use std::path::Path;

use crate::chart::Plot;
use crate::error::{Result, SurveyError};
use crate::render::RasterRenderer;

/// Render a static chart to PNG bytes; animated charts are a render error.
pub fn png_bytes(plot: &Plot, renderer: &RasterRenderer) -> Result<Vec<u8>> {
    renderer.render_png(plot)
}

/// Render a static chart into a PNG file.
pub fn write_png(plot: &Plot, renderer: &RasterRenderer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = png_bytes(plot, renderer)?;
    fs::write(path, bytes).map_err(|source| SurveyError::Io {
        path: path.to_path_buf(),
        source,
    })
}
