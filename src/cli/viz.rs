//! Terminal visualization using braille graphics
//!
//! Sheet thickness is drawn as a braille line plot; sampled values are shown
//! as a horizontal bar histogram.

use console::style;
use drawille::Canvas;

use crate::entities::sheet::Sheet;

/// Default canvas size for the thickness plot (in braille pixels)
pub const PLOT_WIDTH: u32 = 120;
pub const PLOT_HEIGHT: u32 = 32;

/// Longest histogram bar, in characters
const BAR_MAX_WIDTH: usize = 50;

/// Render the number of layers over the sheet length
///
/// Long sheets are compressed horizontally; each pixel column shows the
/// deepest layering of the sections that fall on it.
///
/// # Example Output
/// ```text
/// layers (max 4) over 12.34 m:
/// ⣿⣿⣷⣶⣶⣿⣿⣿⣶⣤⣤⣶⣿⣿
/// ```
pub fn render_thickness(sheet: &Sheet, width: u32, height: u32) -> String {
    let samples = sheet.samples();
    if samples.is_empty() || width == 0 || height == 0 {
        return "empty sheet".to_string();
    }

    let max_layers = samples.iter().map(|s| s.pieces).max().unwrap_or(0).max(1);

    let used = samples.len().min(width as usize);
    let mut columns = vec![0usize; used];
    for (i, sample) in samples.iter().enumerate() {
        let col = i * used / samples.len();
        columns[col] = columns[col].max(sample.pieces);
    }

    let mut canvas = Canvas::new(width, height);
    let y_of = |layers: usize| -> u32 {
        let scaled = layers as f64 / max_layers as f64 * (height - 1) as f64;
        height - 1 - scaled.round() as u32
    };

    let mut prev: Option<(u32, u32)> = None;
    for (x, layers) in columns.iter().enumerate() {
        let point = (x as u32, y_of(*layers));
        match prev {
            Some((px, py)) => canvas.line(px, py, point.0, point.1),
            None => canvas.set(point.0, point.1),
        }
        prev = Some(point);
    }

    // baseline
    for x in 0..used as u32 {
        canvas.set(x, height - 1);
    }

    let mut output = format!(
        "layers (max {}) over {:.2} m:\n",
        max_layers,
        sheet.length() / 1000.0
    );
    output.push_str(&canvas.frame());
    output
}

/// Bucket `values` into `bins` equal-width bins over their range
pub fn bin_counts(values: &[f64], bins: usize) -> Vec<(f64, usize)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= 0.0 {
        return vec![(min, values.len())];
    }

    let bin_width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for &value in values {
        let bin = (((value - min) / bin_width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (min + (i as f64 + 0.5) * bin_width, count))
        .collect()
}

/// Render a horizontal bar histogram of `values`
pub fn render_histogram(values: &[f64], bins: usize) -> String {
    let counts = bin_counts(values, bins);
    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);

    let mut output = format!(
        "   {} ({} samples, {} bins):\n\n",
        style("Histogram").bold(),
        values.len(),
        counts.len()
    );
    for (center, count) in counts {
        let bar_width = count * BAR_MAX_WIDTH / max_count;
        output.push_str(&format!(
            "   {:>10.2} │{} {}\n",
            center,
            "█".repeat(bar_width),
            count
        ));
    }
    output
}
