//! Reporting sink for recorded data series
//!
//! Stages hand every distribution they want to show (stalk lengths after
//! harvest, bast widths after splicing, sheet thickness over length, ...) to a
//! [`Recorder`]. The core never decides how a series is persisted or drawn.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::error::SimError;

/// How a series is meant to be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Values binned into a frequency histogram (`y` is always 1)
    Histogram,
    /// `y` plotted over `x`
    Line,
}

/// A named set of data points with plot labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Short file-friendly name (e.g., "stalk_len_cut")
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: SeriesKind,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// Frequency histogram over raw values
    pub fn histogram(
        name: &str,
        title: &str,
        x_label: &str,
        y_label: &str,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind: SeriesKind::Histogram,
            points: values.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    /// Line plot over `(x, y)` points
    pub fn line(
        name: &str,
        title: &str,
        x_label: &str,
        y_label: &str,
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind: SeriesKind::Line,
            points,
        }
    }

    /// The `x` values (the raw values for a histogram)
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(x, _)| *x).collect()
    }
}

/// Sink for recorded series
pub trait Recorder {
    fn record(&mut self, series: Series) -> Result<(), SimError>;
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn record(&mut self, _series: Series) -> Result<(), SimError> {
        Ok(())
    }
}

/// Keeps series in memory, in recording order
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    series: Vec<Series>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Most recent series recorded under `name`
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().rev().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }
}

impl Recorder for MemoryRecorder {
    fn record(&mut self, series: Series) -> Result<(), SimError> {
        self.series.push(series);
        Ok(())
    }
}

/// Writes each series as `NN_name.csv` into a directory
///
/// Files are numbered in recording order so a directory listing follows the
/// production line.
#[derive(Debug)]
pub struct DataDirRecorder {
    dir: PathBuf,
    next: usize,
    written: Vec<PathBuf>,
}

impl DataDirRecorder {
    /// Create the directory if needed
    pub fn create(dir: &Path) -> Result<Self, SimError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            next: 0,
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Recorder for DataDirRecorder {
    fn record(&mut self, series: Series) -> Result<(), SimError> {
        let path = self
            .dir
            .join(format!("{:02}_{}.csv", self.next, series.name));
        self.next += 1;

        let mut writer = csv::Writer::from_path(&path)?;
        match series.kind {
            SeriesKind::Histogram => {
                writer.write_record([series.x_label.as_str()])?;
                for (x, _) in &series.points {
                    writer.write_record([format!("{:.2}", x)])?;
                }
            }
            SeriesKind::Line => {
                writer.write_record([series.x_label.as_str(), series.y_label.as_str()])?;
                for (x, y) in &series.points {
                    writer.write_record([format!("{:.2}", x), format!("{:.1}", y)])?;
                }
            }
        }
        writer.flush()?;

        tracing::debug!(path = %path.display(), points = series.points.len(), "wrote series");
        self.written.push(path);
        Ok(())
    }
}
