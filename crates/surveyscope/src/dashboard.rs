//! Dashboard session: one loaded survey plus the settings every view shares.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::chart::{ChartKind, ChartOutcome, ChartSelector};
use crate::config::SurveyConfig;
use crate::error::{Result, SurveyError};
use crate::export::{
    DocumentSummary, ExportFormat, ExportMetadata, pdf_bytes, png_bytes, xlsx_bytes,
};
use crate::filter::filter_affirmative;
use crate::font::FontResolution;
use crate::input::{Parser, SourceMetadata, SurveyTable};
use crate::opinion::{WordCloudRequest, extract_corpus};
use crate::render::{RasterRenderer, plotly};
use crate::schema::{ColumnSummary, FieldReport};

/// Chart selection made by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    /// Chart family.
    pub kind: ChartKind,
    /// Score column; the first configured score when absent.
    #[serde(default)]
    pub metric: Option<String>,
    /// Second grouping for bar charts.
    #[serde(default)]
    pub group: Option<String>,
}

impl ChartRequest {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            metric: None,
            group: None,
        }
    }

    /// Plot a specific metric.
    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Split bars by a second category.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// A loaded survey.
///
/// The uploaded table is kept as loaded; every view recomputes the filtered
/// rows, aggregates and corpus from it, so nothing goes stale.
pub struct Dashboard {
    config: SurveyConfig,
    font: FontResolution,
    table: SurveyTable,
    source: SourceMetadata,
}

impl Dashboard {
    /// Load a survey file.
    pub fn load(
        path: impl AsRef<Path>,
        config: SurveyConfig,
        font: FontResolution,
    ) -> Result<Self> {
        let (table, source) = Parser::new().parse_file(path)?;
        Ok(Self::from_table(table, source, config, font))
    }

    /// Load a survey from uploaded bytes.
    pub fn from_upload(
        name: impl Into<PathBuf>,
        bytes: &[u8],
        config: SurveyConfig,
        font: FontResolution,
    ) -> Result<Self> {
        let (table, source) = Parser::new().parse_upload(name, bytes)?;
        Ok(Self::from_table(table, source, config, font))
    }

    /// Wrap an already-parsed table.
    pub fn from_table(
        table: SurveyTable,
        source: SourceMetadata,
        config: SurveyConfig,
        font: FontResolution,
    ) -> Self {
        info!(
            file = %source.file,
            rows = table.row_count(),
            columns = table.column_count(),
            "survey loaded"
        );
        Self {
            config,
            font,
            table,
            source,
        }
    }

    pub fn table(&self) -> &SurveyTable {
        &self.table
    }

    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    pub fn font(&self) -> &FontResolution {
        &self.font
    }

    /// Which configured fields the table provides.
    pub fn field_report(&self) -> FieldReport {
        self.config.fields.check(&self.table)
    }

    /// Per-column summaries of the uploaded table.
    pub fn summaries(&self) -> Vec<ColumnSummary> {
        ColumnSummary::compute_all(&self.table)
    }

    /// Score columns present in the table.
    pub fn metrics(&self) -> Vec<&str> {
        self.config.fields.available_metrics(&self.table)
    }

    /// Rows of respondents who used the tool.
    pub fn filtered(&self) -> Result<SurveyTable> {
        let fields = &self.config.fields;
        filter_affirmative(&self.table, &fields.usage_flag, &fields.affirmative)
    }

    /// Select and prepare a chart from the filtered rows.
    pub fn chart(&self, request: &ChartRequest) -> Result<ChartOutcome> {
        let filtered = self.filtered()?;
        self.chart_for(request, &filtered)
    }

    fn chart_for(&self, request: &ChartRequest, filtered: &SurveyTable) -> Result<ChartOutcome> {
        let fields = &self.config.fields;
        let metric = fields.metric(request.metric.as_deref())?;
        let mut selector = ChartSelector::new(fields).with_layout(self.config.layout.clone());
        if let Some(group) = &request.group {
            selector = selector.with_bar_group(group.as_str());
        }
        selector.select(request.kind, filtered, metric)
    }

    /// Plotly figure for a chart; `None` when there is no data to plot.
    pub fn figure(&self, request: &ChartRequest) -> Result<Option<Value>> {
        match self.chart(request)?.plot() {
            Some(plot) => plotly::figure(plot).map(Some),
            None => Ok(None),
        }
    }

    /// Opinion corpus of the filtered rows.
    ///
    /// `None` when the survey has no opinion column; an empty string when
    /// the column exists but no respondent wrote anything.
    pub fn opinion_corpus(&self) -> Result<Option<String>> {
        let Some(field) = self.config.fields.opinion.as_deref() else {
            return Ok(None);
        };
        if !self.table.has_column(field) {
            debug!(field, "no opinion column, skipping corpus");
            return Ok(None);
        }
        extract_corpus(&self.filtered()?, field).map(Some)
    }

    /// Word-cloud request for the opinion corpus, with the session font.
    pub fn word_cloud(&self) -> Result<Option<WordCloudRequest>> {
        let Some(corpus) = self.opinion_corpus()? else {
            return Ok(None);
        };

        let mut config = self.config.wordcloud.clone();
        if config.font_path.is_none() {
            config.font_path = self.font.path.clone();
        }
        Ok(WordCloudRequest::from_corpus(&corpus, &config))
    }

    /// Raster renderer bound to the session font.
    pub fn renderer(&self) -> RasterRenderer {
        RasterRenderer::new(&self.font)
    }

    /// Export the current view.
    ///
    /// Excel exports the filtered rows. PDF describes the chart and embeds
    /// it unless it is animated. PNG is the chart alone.
    pub fn export(&self, format: ExportFormat, request: &ChartRequest) -> Result<Vec<u8>> {
        let filtered = self.filtered()?;
        debug!(%format, chart = %request.kind, "exporting");

        match format {
            ExportFormat::Xlsx => xlsx_bytes(&filtered),
            ExportFormat::Png => {
                let outcome = self.chart_for(request, &filtered)?;
                let plot = outcome.plot().ok_or_else(|| {
                    SurveyError::EmptyData("no respondents to plot".to_string())
                })?;
                png_bytes(plot, &self.renderer())
            }
            ExportFormat::Pdf => {
                let outcome = self.chart_for(request, &filtered)?;
                let metric = self.config.fields.metric(request.metric.as_deref())?;
                let metadata = ExportMetadata::new(
                    metric,
                    request.kind,
                    self.table.row_count(),
                    filtered.row_count(),
                );
                let renderer = self.renderer();
                let summary = DocumentSummary::build(
                    self.config.export.title.as_str(),
                    &metadata,
                    &outcome,
                    |plot| renderer.render_png(plot),
                )?;
                pdf_bytes(&summary, &self.font)
            }
        }
    }

    /// Export the current view into a file.
    pub fn export_to(
        &self,
        format: ExportFormat,
        request: &ChartRequest,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.export(format, request)?;
        std::fs::write(path, bytes).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), %format, "export written");
        Ok(())
    }
}
