//! Static PNG rendering with plotters.
//!
//! Text needs a registered font. When the session has no font file the
//! renderer still draws every shape but skips captions, axis labels and
//! legends.

use std::error::Error;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::PathBuf;
use std::sync::Mutex;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use once_cell::sync::Lazy;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, register_font};
use tracing::{debug, warn};

use super::palette;
use crate::aggregate::{
    AggregationResult, HierarchyNode, Histogram, PivotTable, values_by_category,
};
use crate::chart::{ChartData, ChartSpec, Layout, Plot};
use crate::error::{Result, SurveyError};
use crate::font::FontResolution;
use crate::input::SurveyTable;
use crate::schema::NumericStatistics;

/// Family name the session font is registered under.
const FONT_FAMILY: &str = "sans-serif";

const HISTOGRAM_BINS: usize = 10;

static REGISTERED_FONT: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = std::result::Result<(), Box<dyn Error>>;

/// Renders static charts to PNG.
pub struct RasterRenderer {
    text: bool,
}

impl RasterRenderer {
    /// Create a renderer using the session font.
    pub fn new(font: &FontResolution) -> Self {
        Self {
            text: register(font),
        }
    }

    /// Create a renderer that draws shapes only.
    pub fn without_text() -> Self {
        Self { text: false }
    }

    /// Whether captions and labels are drawn.
    pub fn draws_text(&self) -> bool {
        self.text
    }

    /// Render a static chart to PNG bytes.
    ///
    /// Animated charts have no static form and are rejected.
    pub fn render_png(&self, plot: &Plot) -> Result<Vec<u8>> {
        if !plot.kind().is_static() {
            return Err(SurveyError::Render(format!(
                "'{}' charts cannot be rendered as a static image",
                plot.kind()
            )));
        }

        let (width, height) = (plot.layout.width, plot.layout.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root, plot)
                .map_err(|e| SurveyError::Render(e.to_string()))?;
            root.present()
                .map_err(|e| SurveyError::Render(e.to_string()))?;
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(&buffer, width, height, ColorType::Rgb8)
            .map_err(|e| SurveyError::Render(format!("PNG encoding failed: {}", e)))?;

        debug!(chart = %plot.kind(), bytes = png.len(), "rendered chart");
        Ok(png)
    }

    fn draw(&self, root: &Area<'_>, plot: &Plot) -> DrawResult {
        root.fill(&WHITE)?;

        match (&plot.spec, &plot.data) {
            (ChartSpec::GroupedBar { value, .. }, ChartData::Means(means)) => {
                self.draw_means(root, plot, means, value)
            }
            (ChartSpec::GroupedBar { value, .. }, ChartData::GroupedMeans(pivot)) => {
                let series = pivot
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(j, name)| {
                        let values: Vec<Option<f64>> = pivot.cells.iter().map(|r| r[j]).collect();
                        (name.clone(), values)
                    })
                    .collect::<Vec<_>>();
                self.draw_bars(root, plot, &pivot.rows, &series, value)
            }
            (ChartSpec::Pie { .. }, ChartData::Counts(counts)) => self.draw_pie(root, plot, counts),
            (ChartSpec::Box { category, value }, ChartData::Rows(rows)) => {
                self.draw_box(root, plot, rows, category, value)
            }
            (ChartSpec::Histogram { value, color }, ChartData::Rows(rows)) => {
                self.draw_histogram(root, plot, rows, value, color.as_deref())
            }
            (ChartSpec::Heatmap { .. }, ChartData::Pivot(pivot)) => {
                self.draw_heatmap(root, plot, pivot)
            }
            (ChartSpec::Treemap { .. }, ChartData::Hierarchy(nodes)) => {
                self.draw_treemap(root, plot, nodes)
            }
            (spec, _) => Err(format!("no raster mapping for '{}'", spec.kind()).into()),
        }
    }

    fn font(&self, layout: &Layout) -> TextStyle<'static> {
        (FONT_FAMILY, layout.axis_font_size as f64).into_font().into()
    }

    fn builder<'a, 'b>(
        &self,
        root: &'a Area<'b>,
        plot: &Plot,
    ) -> ChartBuilder<'a, 'static, BitMapBackend<'b>> {
        let margin = plot.layout.margin;
        let mut builder = ChartBuilder::on(root);
        builder
            .margin_top(margin.t)
            .margin_bottom(margin.b)
            .margin_left(margin.l)
            .margin_right(margin.r);
        if self.text {
            builder
                .caption(&plot.title, (FONT_FAMILY, 20.0))
                .x_label_area_size(40)
                .y_label_area_size(50);
        }
        builder
    }

    fn draw_means(
        &self,
        root: &Area<'_>,
        plot: &Plot,
        means: &AggregationResult,
        value: &str,
    ) -> DrawResult {
        let labels: Vec<String> = means.labels().map(str::to_string).collect();
        let series: Vec<(String, Vec<Option<f64>>)> = vec![(
            value.to_string(),
            means.values.values().map(|v| Some(*v)).collect(),
        )];
        self.draw_bars(root, plot, &labels, &series, value)
    }

    /// Bars per category; several series sit side by side within a category.
    fn draw_bars(
        &self,
        root: &Area<'_>,
        plot: &Plot,
        labels: &[String],
        series: &[(String, Vec<Option<f64>>)],
        value: &str,
    ) -> DrawResult {
        let n = labels.len().max(1) as f64;
        let values = series.iter().flat_map(|(_, v)| v.iter().flatten().copied());
        let (lo, hi) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let hi = if hi <= lo { lo + 1.0 } else { hi * 1.1 };

        let mut chart = self.builder(root, plot).build_cartesian_2d(0f64..n, lo..hi)?;

        if self.text {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_label_formatter(&|_: &f64| String::new())
                .label_style(self.font(&plot.layout))
                .y_desc(value)
                .draw()?;
        }

        let width = 0.8 / series.len().max(1) as f64;
        for (j, (name, values)) in series.iter().enumerate() {
            let color = palette::color(if series.len() == 1 { 0 } else { j });
            let bars = values.iter().enumerate().filter_map(|(i, v)| {
                v.map(|v| {
                    let x0 = i as f64 + 0.1 + j as f64 * width;
                    Rectangle::new([(x0, 0.0), (x0 + width, v)], color.filled())
                })
            });
            let anno = chart.draw_series(bars)?;
            if series.len() > 1 {
                anno.label(name.as_str()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
            }
        }

        if self.text {
            if series.len() > 1 {
                chart
                    .configure_series_labels()
                    .background_style(&WHITE.mix(0.8))
                    .border_style(&BLACK)
                    .label_font(self.font(&plot.layout))
                    .draw()?;
            }
            let style = self.font(&plot.layout).pos(Pos::new(HPos::Center, VPos::Top));
            for (i, label) in labels.iter().enumerate() {
                let (x, y) = chart.backend_coord(&(i as f64 + 0.5, lo));
                root.draw(&Text::new(label.clone(), (x, y + 6), style.clone()))?;
            }
        }

        Ok(())
    }

    fn draw_box(
        &self,
        root: &Area<'_>,
        plot: &Plot,
        rows: &SurveyTable,
        category: &str,
        value: &str,
    ) -> DrawResult {
        let groups = values_by_category(rows, category, value)?;
        let stats: Vec<(&String, &Vec<f64>, NumericStatistics)> = groups
            .iter()
            .filter_map(|(label, values)| {
                NumericStatistics::from_values(values).map(|s| (label, values, s))
            })
            .collect();

        let (lo, hi) = stats.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.2.min), hi.max(s.2.max))
        });
        let (lo, hi) = if lo.is_finite() { (lo, hi) } else { (0.0, 1.0) };
        let pad = ((hi - lo) * 0.1).max(0.5);
        let n = stats.len().max(1) as f64;

        let mut chart = self
            .builder(root, plot)
            .build_cartesian_2d(0f64..n, (lo - pad)..(hi + pad))?;

        if self.text {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_label_formatter(&|_: &f64| String::new())
                .label_style(self.font(&plot.layout))
                .y_desc(value)
                .draw()?;
        }

        for (i, (_, values, s)) in stats.iter().enumerate() {
            let x = i as f64;
            let mid = x + 0.5;
            let color = palette::color(i);
            let (low, high) = s.whiskers();

            chart.draw_series(std::iter::once(Rectangle::new(
                [(x + 0.25, s.q1), (x + 0.75, s.q3)],
                color.filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x + 0.25, s.q1), (x + 0.75, s.q3)],
                BLACK.stroke_width(1),
            )))?;
            chart.draw_series([
                PathElement::new(vec![(x + 0.25, s.median), (x + 0.75, s.median)], BLACK.stroke_width(2)),
                PathElement::new(vec![(mid, low), (mid, s.q1)], BLACK.stroke_width(1)),
                PathElement::new(vec![(mid, s.q3), (mid, high)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x + 0.4, low), (x + 0.6, low)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x + 0.4, high), (x + 0.6, high)], BLACK.stroke_width(1)),
            ])?;
            chart.draw_series(
                values
                    .iter()
                    .filter(|v| **v < low || **v > high)
                    .map(|v| Circle::new((mid, *v), 3, BLACK.filled())),
            )?;
        }

        if self.text {
            let style = self.font(&plot.layout).pos(Pos::new(HPos::Center, VPos::Top));
            for (i, (label, _, _)) in stats.iter().enumerate() {
                let (x, y) = chart.backend_coord(&(i as f64 + 0.5, lo - pad));
                root.draw(&Text::new(label.to_string(), (x, y + 6), style.clone()))?;
            }
        }

        Ok(())
    }

    fn draw_histogram(
        &self,
        root: &Area<'_>,
        plot: &Plot,
        rows: &SurveyTable,
        value: &str,
        color: Option<&str>,
    ) -> DrawResult {
        let groups = match color {
            Some(color) => values_by_category(rows, color, value)?,
            None => {
                let idx = rows.require_column(value)?;
                let values: Vec<f64> =
                    (0..rows.row_count()).filter_map(|r| rows.number(r, idx)).collect();
                [(value.to_string(), values)].into_iter().collect()
            }
        };
        let hist = Histogram::from_groups(&groups, HISTOGRAM_BINS);
        let (x0, x1) = match (hist.edges.first(), hist.edges.last()) {
            (Some(a), Some(b)) => (*a, *b),
            _ => (0.0, 1.0),
        };
        let top = (hist.max_stacked().max(1) as f64) * 1.1;

        let mut chart = self.builder(root, plot).build_cartesian_2d(x0..x1, 0f64..top)?;

        if self.text {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .label_style(self.font(&plot.layout))
                .x_desc(value)
                .y_desc("count")
                .draw()?;
        }

        let mut base = vec![0usize; hist.bin_count()];
        for (j, (name, counts)) in hist.series.iter().enumerate() {
            let color = palette::color(j);
            let bars: Vec<_> = counts
                .iter()
                .enumerate()
                .filter(|(_, c)| **c > 0)
                .map(|(i, c)| {
                    let (y0, y1) = (base[i] as f64, (base[i] + c) as f64);
                    Rectangle::new([(hist.edges[i], y0), (hist.edges[i + 1], y1)], color.filled())
                })
                .collect();
            for (b, c) in base.iter_mut().zip(counts) {
                *b += c;
            }
            chart.draw_series(bars)?.label(name.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
        }

        if self.text && hist.series.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(self.font(&plot.layout))
                .draw()?;
        }

        Ok(())
    }

    /// Cells colored by mean; pairs without observations are hatched.
    fn draw_heatmap(&self, root: &Area<'_>, plot: &Plot, pivot: &PivotTable) -> DrawResult {
        let (cols, rows) = (pivot.columns.len().max(1) as f64, pivot.rows.len().max(1) as f64);
        let mut builder = self.builder(root, plot);
        if self.text {
            builder.y_label_area_size(90);
        }
        let mut chart = builder.build_cartesian_2d(0f64..cols, 0f64..rows)?;

        let (lo, hi) = pivot.value_range().unwrap_or((0.0, 1.0));
        let span = if hi > lo { hi - lo } else { 1.0 };
        let gap = RGBColor(190, 190, 190);
        let value_style = self.font(&plot.layout).pos(Pos::new(HPos::Center, VPos::Center));

        for (i, row) in pivot.cells.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                let (x, y) = (j as f64, i as f64);
                match cell {
                    Some(v) => {
                        let t = (v - lo) / span;
                        chart.draw_series(std::iter::once(Rectangle::new(
                            [(x, y), (x + 1.0, y + 1.0)],
                            palette::sequential(t).filled(),
                        )))?;
                        if self.text {
                            let (px, py) = chart.backend_coord(&(x + 0.5, y + 0.5));
                            let style = if t > 0.5 {
                                value_style.clone().color(&WHITE)
                            } else {
                                value_style.clone()
                            };
                            root.draw(&Text::new(format!("{:.2}", v), (px, py), style))?;
                        }
                    }
                    None => {
                        chart.draw_series([
                            PathElement::new(vec![(x, y), (x + 1.0, y + 1.0)], gap.stroke_width(1)),
                            PathElement::new(vec![(x, y + 0.5), (x + 0.5, y + 1.0)], gap.stroke_width(1)),
                            PathElement::new(vec![(x + 0.5, y), (x + 1.0, y + 0.5)], gap.stroke_width(1)),
                        ])?;
                    }
                }
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + 1.0, y + 1.0)],
                    WHITE.stroke_width(1),
                )))?;
            }
        }

        if self.text {
            let font = self.font(&plot.layout);
            let below = font.pos(Pos::new(HPos::Center, VPos::Top));
            for (j, label) in pivot.columns.iter().enumerate() {
                let (x, y) = chart.backend_coord(&(j as f64 + 0.5, 0.0));
                root.draw(&Text::new(label.clone(), (x, y + 6), below.clone()))?;
            }
            let left = font.pos(Pos::new(HPos::Right, VPos::Center));
            for (i, label) in pivot.rows.iter().enumerate() {
                let (x, y) = chart.backend_coord(&(0.0, i as f64 + 0.5));
                root.draw(&Text::new(label.clone(), (x - 6, y), left.clone()))?;
            }
        }

        Ok(())
    }

    fn draw_pie(&self, root: &Area<'_>, plot: &Plot, counts: &AggregationResult) -> DrawResult {
        let area = self.titled(root, plot)?;
        let (w, h) = area.dim_in_pixel();
        let margin = plot.layout.margin;
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = ((w.min(h) as f64) / 2.0 - margin.l.max(margin.t) as f64).max(10.0);

        let total: f64 = counts.values.values().sum();
        if total <= 0.0 {
            return Ok(());
        }

        let mut start = -FRAC_PI_2;
        let label_style = self.font(&plot.layout).pos(Pos::new(HPos::Center, VPos::Center));
        for (i, (label, count)) in counts.iter().enumerate() {
            let sweep = count / total * TAU;
            let steps = ((sweep.to_degrees()).ceil() as usize).max(2);
            let mut points = vec![center];
            points.extend((0..=steps).map(|k| {
                let a = start + sweep * k as f64 / steps as f64;
                polar(center, radius, a)
            }));
            area.draw(&Polygon::new(points, palette::color(i).filled()))?;

            if self.text {
                let mid = start + sweep / 2.0;
                let text = format!("{} {:.1}%", label, count / total * 100.0);
                area.draw(&Text::new(text, polar(center, radius * 0.65, mid), label_style.clone()))?;
            }
            start += sweep;
        }

        Ok(())
    }

    /// Slice-and-dice layout: top level split horizontally, children vertically.
    fn draw_treemap(&self, root: &Area<'_>, plot: &Plot, nodes: &[HierarchyNode]) -> DrawResult {
        let area = self.titled(root, plot)?;
        let (w, h) = area.dim_in_pixel();
        let margin = plot.layout.margin;
        let (left, right) = (margin.l as i32, w as i32 - margin.r as i32);
        let (top, bottom) = (margin.b as i32 / 2, h as i32 - margin.b as i32);

        let roots: Vec<&HierarchyNode> = nodes.iter().filter(|n| n.parent.is_empty()).collect();
        let total: usize = roots.iter().map(|n| n.count).sum();
        if total == 0 || right <= left || bottom <= top {
            return Ok(());
        }

        let style = self.font(&plot.layout).pos(Pos::new(HPos::Left, VPos::Top));
        let mut x = left;
        for (i, node) in roots.iter().enumerate() {
            let width = ((right - left) as f64 * node.count as f64 / total as f64).round() as i32;
            let x1 = if i + 1 == roots.len() { right } else { x + width };
            let color = palette::color(i);

            let children: Vec<&HierarchyNode> =
                nodes.iter().filter(|n| n.parent == node.id).collect();
            if children.is_empty() {
                area.draw(&Rectangle::new([(x, top), (x1, bottom)], color.filled()))?;
            } else {
                let mut y = top;
                for (k, child) in children.iter().enumerate() {
                    let height =
                        ((bottom - top) as f64 * child.count as f64 / node.count as f64).round() as i32;
                    let y1 = if k + 1 == children.len() { bottom } else { y + height };
                    let shade = if k % 2 == 0 { 1.0 } else { 0.75 };
                    area.draw(&Rectangle::new([(x, y), (x1, y1)], color.mix(shade).filled()))?;
                    area.draw(&Rectangle::new([(x, y), (x1, y1)], WHITE.stroke_width(1)))?;
                    if self.text {
                        let text = format!("{} ({})", child.label, child.count);
                        area.draw(&Text::new(text, (x + 4, y + 22), style.clone()))?;
                    }
                    y = y1;
                }
            }
            area.draw(&Rectangle::new([(x, top), (x1, bottom)], WHITE.stroke_width(3)))?;
            if self.text {
                let text = format!("{} ({})", node.label, node.count);
                area.draw(&Text::new(text, (x + 4, top + 4), style.clone()))?;
            }
            x = x1;
        }

        Ok(())
    }

    fn titled<'a>(&self, root: &Area<'a>, plot: &Plot) -> std::result::Result<Area<'a>, Box<dyn Error>> {
        if self.text {
            Ok(root.titled(&plot.title, (FONT_FAMILY, 20.0))?)
        } else {
            Ok(root.clone())
        }
    }
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 + (radius * angle.sin()).round() as i32,
    )
}

/// Register the session font with plotters once per font file.
fn register(font: &FontResolution) -> bool {
    let Some(path) = font.path() else {
        return false;
    };

    let mut registered = REGISTERED_FONT
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registered.as_deref() == Some(path) {
        return true;
    }

    let bytes = match font.load_bytes() {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return false,
        Err(e) => {
            warn!(error = %e, "font unreadable, charts will have no text");
            return false;
        }
    };

    // plotters keeps registered fonts for the life of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    match register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
        Ok(()) => {
            *registered = Some(path.to_path_buf());
            true
        }
        Err(_) => {
            warn!(path = %path.display(), "font rejected, charts will have no text");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, ChartSelector};
    use crate::schema::SurveyFields;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

    fn table() -> SurveyTable {
        let headers = ["사용 여부", "사용자 유형", "감정", "사용 빈도", "유용성 점수", "신뢰도 점수"];
        let rows = [
            ["예", "학생", "기쁨", "매일", "4", "3"],
            ["예", "교사", "불안", "가끔", "5", "4"],
            ["예", "학생", "불안", "매일", "2", "5"],
            ["예", "학생", "기쁨", "가끔", "1", "2"],
        ];
        SurveyTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn plot(kind: ChartKind) -> Plot {
        let fields = SurveyFields::default();
        ChartSelector::new(&fields)
            .select(kind, &table(), "유용성 점수")
            .unwrap()
            .into_plot()
            .unwrap()
    }

    #[test]
    fn test_static_kinds_render_png() {
        let renderer = RasterRenderer::without_text();
        for kind in ChartKind::ALL.into_iter().filter(ChartKind::is_static) {
            let png = renderer.render_png(&plot(kind)).unwrap();
            assert!(png.starts_with(PNG_SIGNATURE), "{kind}");
        }
    }

    #[test]
    fn test_grouped_bar_renders() {
        let fields = SurveyFields::default();
        let plot = ChartSelector::new(&fields)
            .with_bar_group("감정")
            .select(ChartKind::GroupedBar, &table(), "유용성 점수")
            .unwrap()
            .into_plot()
            .unwrap();
        let png = RasterRenderer::without_text().render_png(&plot).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_animated_chart_rejected() {
        let err = RasterRenderer::without_text()
            .render_png(&plot(ChartKind::AnimatedBar))
            .unwrap_err();
        assert!(matches!(err, SurveyError::Render(_)));
    }

    #[test]
    fn test_no_font_means_no_text() {
        assert!(!RasterRenderer::new(&FontResolution::builtin()).draws_text());
    }

    #[test]
    fn test_rejected_font_falls_back_to_shapes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not a font").unwrap();
        let font = FontResolution {
            path: Some(file.path().to_path_buf()),
            source: crate::font::FontSource::Platform,
        };

        let renderer = RasterRenderer::new(&font);
        assert!(!renderer.draws_text());
        let png = renderer.render_png(&plot(ChartKind::Pie)).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }
}
