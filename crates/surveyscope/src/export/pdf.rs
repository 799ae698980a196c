//! PDF report export.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use printpdf::image_crate::ImageDecoder;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument};
use tracing::{debug, warn};

use super::{ANIMATED_CHART_NOTE, ExportMetadata, NO_DATA_NOTE};
use crate::chart::{ChartOutcome, Plot};
use crate::error::{Result, SurveyError};
use crate::font::FontResolution;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 20.0;
const LINE_HEIGHT: f32 = 7.0;
const IMAGE_DPI: f32 = 150.0;

/// What goes where the chart would be.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSection {
    /// PNG bytes of a static chart.
    Image(Vec<u8>),
    /// Text written instead of an image.
    Note(String),
}

/// Content of a PDF report, decided before any encoding happens.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub title: String,
    pub lines: Vec<String>,
    pub chart: ChartSection,
}

impl DocumentSummary {
    /// Decide the report content for a chart outcome.
    ///
    /// Animated charts and empty selections get a note; `render` is only
    /// called for static charts.
    pub fn build<F>(
        title: impl Into<String>,
        metadata: &ExportMetadata,
        outcome: &ChartOutcome,
        render: F,
    ) -> Result<Self>
    where
        F: FnOnce(&Plot) -> Result<Vec<u8>>,
    {
        let chart = match outcome.plot() {
            None => ChartSection::Note(NO_DATA_NOTE.to_string()),
            Some(plot) if !plot.kind().is_static() => {
                ChartSection::Note(ANIMATED_CHART_NOTE.to_string())
            }
            Some(plot) => ChartSection::Image(render(plot)?),
        };

        Ok(Self {
            title: title.into(),
            lines: metadata.lines(),
            chart,
        })
    }

    /// Whether a chart image is embedded.
    pub fn has_image(&self) -> bool {
        matches!(self.chart, ChartSection::Image(_))
    }

    /// Note written in place of the chart, if any.
    pub fn note(&self) -> Option<&str> {
        match &self.chart {
            ChartSection::Note(note) => Some(note.as_str()),
            ChartSection::Image(_) => None,
        }
    }
}

/// Encode a report as PDF bytes.
///
/// Text uses the session font when one is available. Without it the
/// built-in Helvetica is used and characters it cannot show become `?`.
pub fn pdf_bytes(summary: &DocumentSummary, font: &FontResolution) -> Result<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new(&summary.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
    let layer = doc.get_page(page).get_layer(layer);

    let external = match font.load_bytes() {
        Ok(Some(bytes)) => match doc.add_external_font(Cursor::new(bytes)) {
            Ok(f) => Some(f),
            Err(e) => {
                warn!(error = ?e, "font rejected by PDF writer, using Helvetica");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "font unreadable, using Helvetica");
            None
        }
    };
    let unicode = external.is_some();
    let text_font: IndirectFontRef = match external {
        Some(f) => f,
        None => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| SurveyError::Export(format!("PDF font error: {:?}", e)))?,
    };
    let text = |s: &str| if unicode { s.to_string() } else { latin1_lossy(s) };

    let mut y = PAGE_HEIGHT - 20.0;
    layer.use_text(text(summary.title.as_str()), 18.0, Mm(LEFT), Mm(y), &text_font);
    y -= LINE_HEIGHT * 2.0;

    for line in &summary.lines {
        layer.use_text(text(line.as_str()), 11.0, Mm(LEFT), Mm(y), &text_font);
        y -= LINE_HEIGHT;
    }
    y -= LINE_HEIGHT;

    match &summary.chart {
        ChartSection::Note(note) => {
            layer.use_text(text(note.as_str()), 11.0, Mm(LEFT), Mm(y), &text_font);
        }
        ChartSection::Image(png) => {
            let decoder = PngDecoder::new(Cursor::new(png.as_slice()))
                .map_err(|e| SurveyError::Export(format!("chart image unreadable: {}", e)))?;
            let (_, height_px) = decoder.dimensions();
            let image = Image::try_from(decoder)
                .map_err(|e| SurveyError::Export(format!("chart image unreadable: {}", e)))?;

            let height_mm = height_px as f32 / IMAGE_DPI * 25.4;
            image.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(LEFT)),
                    translate_y: Some(Mm((y - height_mm).max(10.0))),
                    dpi: Some(IMAGE_DPI),
                    ..Default::default()
                },
            );
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| SurveyError::Export(format!("PDF encoding failed: {:?}", e)))?;
    debug!(bytes = bytes.len(), image = summary.has_image(), "encoded PDF");
    Ok(bytes)
}

/// Write a report to a PDF file.
pub fn write_pdf(
    summary: &DocumentSummary,
    font: &FontResolution,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = pdf_bytes(summary, font)?;
    fs::write(path, bytes).map_err(|source| SurveyError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn latin1_lossy(s: &str) -> String {
    s.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}
