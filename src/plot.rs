//! Per-event diagnostic figures
//!
//! One SVG per shock: a vertical stack of panels, one per variable, sharing
//! the time axis. Each panel shows the raw trace, the gap-reconstruction
//! overlay and a vertical marker at the shock instant.

use std::{fs, io::ErrorKind, path::PathBuf};

use chrono::Duration;
use plotters::prelude::*;

use crate::{helios::DataSet, series::TimeSeries, shocks::Shock, variable::Variable};

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("variable {0} is missing from the dataset")]
    MissingVariable(Variable),
    #[error("failed to draw the figure: {0}")]
    Draw(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Draw(error.to_string())
    }
}
type Result<T> = std::result::Result<T, PlotError>;

/// Default panel variables, top to bottom
pub const DEFAULT_VARIABLES: [Variable; 7] = [
    Variable::Np1,
    Variable::Vp1,
    Variable::Tp1,
    Variable::Bx,
    Variable::By,
    Variable::Bz,
    Variable::Btotal,
];

/// Shock event figure renderer, in the builder style
pub struct EventPlotter {
    outdir: PathBuf,
    variables: Vec<Variable>,
    half_window: Duration,
    panel_size: (u32, u32),
}
impl Default for EventPlotter {
    fn default() -> Self {
        Self {
            outdir: PathBuf::from("Graphs"),
            variables: DEFAULT_VARIABLES.to_vec(),
            half_window: Duration::days(3),
            panel_size: (760, 190),
        }
    }
}
impl EventPlotter {
    pub fn outdir<P: Into<PathBuf>>(self, outdir: P) -> Self {
        Self {
            outdir: outdir.into(),
            ..self
        }
    }
    pub fn variables(self, variables: Vec<Variable>) -> Self {
        Self { variables, ..self }
    }
    pub fn half_window(self, half_window: Duration) -> Self {
        Self {
            half_window,
            ..self
        }
    }
    pub fn variable_list(&self) -> &[Variable] {
        &self.variables
    }
    /// Creates the output directory; an already existing directory is fine
    pub fn create_outdir(&self) -> Result<()> {
        match fs::create_dir(&self.outdir) {
            Ok(()) => {
                log::info!("created output directory {:?}", self.outdir);
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::AlreadyExists => {
                log::info!("output directory {:?} already exists", self.outdir);
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }
    /// Renders the figure of the `index`th shock to `<outdir>/<index>.svg`
    pub fn plot(&self, index: usize, shock: &Shock, data: &DataSet) -> Result<()> {
        let start = shock.time - self.half_window;
        let end = shock.time + self.half_window;
        let window = data.window(start, end, shock.spacecraft);

        let n_panels = self.variables.len();
        let path = self.outdir.join(format!("{}.svg", index));
        let size = (self.panel_size.0, self.panel_size.1 * n_panels as u32);
        let figure = SVGBackend::new(&path, size).into_drawing_area();
        figure.fill(&WHITE)?;
        let panels = figure.split_evenly((n_panels, 1));

        let raw_color = palette(0);
        let gap_color = palette(1);

        for (k, (panel, &variable)) in panels.iter().zip(&self.variables).enumerate() {
            let series = window
                .series(variable)
                .ok_or(PlotError::MissingVariable(variable))?;
            let reconstruction = series.reconstruct_gaps();
            let (lo, hi) = value_range(&series, &reconstruction);

            let mut chart = ChartBuilder::on(panel)
                .set_label_area_size(LabelAreaPosition::Left, 60)
                .set_label_area_size(LabelAreaPosition::Bottom, 25)
                .margin(5)
                .build_cartesian_2d(RangedDateTime::from(start..end), lo..hi)?;
            chart
                .configure_mesh()
                .y_desc(format!("{} ({})", variable, variable.unit()))
                .draw()?;

            for (s, segment) in series.segments().into_iter().enumerate() {
                let trace = chart.draw_series(LineSeries::new(segment, &raw_color))?;
                if k == 0 && s == 0 {
                    trace
                        .label(format!("Helios {}", shock.spacecraft))
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], raw_color)
                        });
                }
            }
            for (s, segment) in reconstruction.segments().into_iter().enumerate() {
                let trace = chart.draw_series(LineSeries::new(segment, &gap_color))?;
                if k == 0 && s == 0 {
                    trace.label("reconstruction").legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], gap_color)
                    });
                }
            }
            let marker = chart.draw_series(LineSeries::new(
                [(shock.time, lo), (shock.time, hi)],
                BLACK.stroke_width(2),
            ))?;
            if k == 0 {
                marker.label("shock").legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2))
                });
                chart
                    .configure_series_labels()
                    .border_style(BLACK)
                    .background_style(WHITE.mix(0.8))
                    .position(SeriesLabelPosition::UpperLeft)
                    .draw()?;
            }
        }
        figure.present()?;
        Ok(())
    }
}

fn palette(k: usize) -> RGBColor {
    let color = colorous::TABLEAU10[k % colorous::TABLEAU10.len()];
    RGBColor(color.r, color.g, color.b)
}

/// Value range over the raw and reconstructed traces, padded, with a
/// fallback when the window holds no valid sample
fn value_range(series: &TimeSeries, reconstruction: &TimeSeries) -> (f64, f64) {
    let max_value = |x: &[f64]| {
        x.iter()
            .cloned()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max)
    };
    let min_value = |x: &[f64]| {
        x.iter()
            .cloned()
            .filter(|v| v.is_finite())
            .fold(f64::INFINITY, f64::min)
    };
    let lo = min_value(&series.values).min(min_value(&reconstruction.values));
    let hi = max_value(&series.values).max(max_value(&reconstruction.values));
    if !(lo.is_finite() && hi.is_finite()) {
        return (0., 1.);
    }
    let pad = if hi > lo { (hi - lo) * 5e-2 } else { 5e-1 };
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn range_of_empty_window() {
        let series = TimeSeries::new("np1");
        assert_eq!(value_range(&series, &series.reconstruct_gaps()), (0., 1.));
    }
    #[test]
    fn range_covers_the_reconstruction() {
        let t0 = NaiveDate::from_ymd_opt(1975, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut series = TimeSeries::new("np1");
        for (secs, value) in [(0, 5.), (60, f64::NAN), (120, 7.)] {
            series.push(t0 + Duration::seconds(secs), value);
        }
        let (lo, hi) = value_range(&series, &series.reconstruct_gaps());
        assert!(lo < 5. && hi > 7.);
    }
    #[test]
    fn flat_series_still_has_a_range() {
        let t0 = NaiveDate::from_ymd_opt(1975, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut series = TimeSeries::new("np1");
        series.push(t0, 3.);
        let (lo, hi) = value_range(&series, &series.reconstruct_gaps());
        assert!(lo < 3. && hi > 3.);
    }
}
