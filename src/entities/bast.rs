//! Bast entity - a strip of fiber peeled from a stalk
//!
//! A bast strip tapers along its length: its width is interpolated linearly
//! between the start width and the end width. Strips are cut into segments of
//! a working length and spliced into narrower strips before stitching.

use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::core::distribution::BetaParams;
use crate::core::error::SimError;
use crate::core::lifecycle::{Lifecycle, Machine};

/// Variance of the sampled end width, in mm
const END_WIDTH_VARIANCE: f64 = 0.7;

/// Beta parameters of the end width of a strip starting at `start` mm
pub fn end_width_params(start: f64) -> BetaParams {
    BetaParams::new(0.0, start, start * 2.0 / 3.0, END_WIDTH_VARIANCE)
}

/// Width of a bast strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Width {
    /// Nominal start width; the end width is sampled
    Scalar(f64),
    /// Explicit `(start, end)` widths, no sampling
    TaperPair(f64, f64),
}

impl TryFrom<&[f64]> for Width {
    type Error = SimError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match values {
            [width] => Ok(Width::Scalar(*width)),
            [start, end] => Ok(Width::TaperPair(*start, *end)),
            other => Err(SimError::InvalidWidthType { count: other.len() }),
        }
    }
}

/// Bast lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BastState {
    Fresh,
    Cut,
    Spliced,
    Sewn,
}

/// Operations on a bast strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BastOp {
    Cut,
    Splice,
    Sew,
}

impl fmt::Display for BastState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BastState::Fresh => write!(f, "fresh"),
            BastState::Cut => write!(f, "cut"),
            BastState::Spliced => write!(f, "spliced"),
            BastState::Sewn => write!(f, "sewn"),
        }
    }
}

impl fmt::Display for BastOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BastOp::Cut => write!(f, "cut"),
            BastOp::Splice => write!(f, "splice"),
            BastOp::Sew => write!(f, "sew"),
        }
    }
}

impl Lifecycle for BastState {
    type Op = BastOp;
    const ENTITY: &'static str = "bast";
    const INITIAL: Self = BastState::Fresh;
    const TRANSITIONS: &'static [(Self, BastOp, Self)] = &[
        (BastState::Fresh, BastOp::Cut, BastState::Cut),
        (BastState::Cut, BastOp::Splice, BastState::Spliced),
        (BastState::Spliced, BastOp::Sew, BastState::Sewn),
    ];
}

/// A strip of bast fiber (all dimensions in mm)
#[derive(Debug, Clone, PartialEq)]
pub struct Bast {
    length: f64,
    width: (f64, f64),
    machine: Machine<BastState>,
}

impl Bast {
    /// Create a fresh strip
    ///
    /// A scalar width tapers to an end width drawn from a beta distribution on
    /// `[0, width]` with mean `2/3 * width`.
    pub fn new<R: Rng + ?Sized>(length: f64, width: Width, rng: &mut R) -> Result<Self, SimError> {
        let width = match width {
            Width::TaperPair(start, end) => (start, end),
            Width::Scalar(start) => {
                let end = end_width_params(start).sample(1, rng)?;
                (start, end[0])
            }
        };
        Ok(Self::with_state(length, width, BastState::Fresh))
    }

    /// Create a strip with explicit widths directly in `state`
    pub fn with_state(length: f64, width: (f64, f64), state: BastState) -> Self {
        Self {
            length,
            width,
            machine: Machine::starting_at(state),
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// `(start, end)` width
    pub fn width(&self) -> (f64, f64) {
        self.width
    }

    pub fn start_width(&self) -> f64 {
        self.width.0
    }

    pub fn end_width(&self) -> f64 {
        self.width.1
    }

    pub fn state(&self) -> BastState {
        self.machine.state()
    }

    fn gradient(&self) -> f64 {
        if self.length > 0.0 {
            (self.width.0 - self.width.1) / self.length
        } else {
            0.0
        }
    }

    /// Width at `position` along the strip; 0 beyond its end
    pub fn width_at(&self, position: f64) -> f64 {
        if position > self.length {
            0.0
        } else {
            self.width.0 - self.gradient() * position
        }
    }

    /// Position at which the strip has `width`
    pub fn length_at(&self, width: f64) -> Result<f64, SimError> {
        let (start, end) = self.width;
        if !(end <= width && width <= start) {
            return Err(SimError::OutOfRange { width, start, end });
        }
        if start == end {
            return Ok(0.0);
        }
        Ok((start - width) / (start - end) * self.length)
    }

    /// Cut into consecutive segments of `length`
    ///
    /// The last segment keeps whatever remains. This strip is reset to the
    /// first segment's geometry and moves to CUT along with all segments.
    pub fn cut(&mut self, length: f64) -> Result<Vec<Bast>, SimError> {
        self.machine.check(BastOp::Cut)?;
        if length.is_nan() || length <= 0.0 {
            return Err(SimError::invalid(format!(
                "segment length must be positive (got {})",
                length
            )));
        }

        let count = ((self.length / length).ceil() as usize).max(1);
        let segments: Vec<Bast> = (0..count)
            .map(|n| {
                let start = n as f64 * length;
                let end = ((n + 1) as f64 * length).min(self.length);
                Bast::with_state(
                    end - start,
                    (self.width_at(start), self.width_at(end)),
                    BastState::Cut,
                )
            })
            .collect();

        self.length = segments[0].length;
        self.width = segments[0].width;
        self.machine.apply(BastOp::Cut)?;

        Ok(segments)
    }

    /// Split into `ceil(start_width / width)` equally narrow strips
    ///
    /// The strips keep this strip's length and come out FRESH; only this strip
    /// moves on to SPLICED.
    pub fn splice(&mut self, width: f64) -> Result<Vec<Bast>, SimError> {
        self.machine.check(BastOp::Splice)?;
        if width.is_nan() || width <= 0.0 {
            return Err(SimError::invalid(format!(
                "splice width must be positive (got {})",
                width
            )));
        }

        let count = (self.width.0 / width).ceil() as usize;
        let strip = (self.width.0 / count as f64, self.width.1 / count as f64);
        let strips = (0..count)
            .map(|_| Bast::with_state(self.length, strip, BastState::Fresh))
            .collect();

        self.machine.apply(BastOp::Splice)?;
        Ok(strips)
    }

    /// Mark as sewn into a sheet
    pub fn sew(&mut self) -> Result<(), SimError> {
        self.machine.apply(BastOp::Sew)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn taper(length: f64, start: f64, end: f64) -> Bast {
        Bast::with_state(length, (start, end), BastState::Fresh)
    }

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_scalar_width_samples_end_width() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let bast = Bast::new(1500.0, Width::Scalar(12.5), &mut rng).unwrap();
            assert_eq!(bast.start_width(), 12.5);
            assert!(bast.end_width() >= 0.0 && bast.end_width() <= 12.5);
            assert_eq!(bast.state(), BastState::Fresh);
        }
    }

    #[test]
    fn test_taper_pair_is_not_sampled() {
        let mut rng = StdRng::seed_from_u64(5);
        let bast = Bast::new(100.0, Width::TaperPair(9.0, 6.0), &mut rng).unwrap();
        assert_eq!(bast.width(), (9.0, 6.0));
    }

    #[test]
    fn test_width_from_slice() {
        assert_eq!(Width::try_from(&[4.0][..]).unwrap(), Width::Scalar(4.0));
        assert_eq!(
            Width::try_from(&[4.0, 2.0][..]).unwrap(),
            Width::TaperPair(4.0, 2.0)
        );
        for bad in [&[][..], &[1.0, 2.0, 3.0][..]] {
            let err = Width::try_from(bad).unwrap_err();
            assert!(matches!(err, SimError::InvalidWidthType { .. }));
        }
    }

    #[test]
    fn test_width_at_endpoints() {
        let mut rng = StdRng::seed_from_u64(9);
        let bast = Bast::new(3000.0, Width::Scalar(20.0), &mut rng).unwrap();
        assert_eq!(bast.width_at(0.0), bast.start_width());
        assert!((bast.width_at(3000.0) - bast.end_width()).abs() < 1e-9);
        assert_eq!(bast.width_at(3000.1), 0.0);
    }

    #[test]
    fn test_width_at_interpolates() {
        let bast = taper(100.0, 10.0, 6.0);
        assert!((bast.width_at(50.0) - 8.0).abs() < 1e-12);
        assert!((bast.width_at(25.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_at_inverts_width_at() {
        let bast = taper(100.0, 10.0, 6.0);
        assert!((bast.length_at(8.0).unwrap() - 50.0).abs() < 1e-12);
        assert_eq!(bast.length_at(10.0).unwrap(), 0.0);
        assert!((bast.length_at(6.0).unwrap() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_at_out_of_range() {
        let bast = taper(100.0, 10.0, 6.0);
        for width in [5.9, 10.1] {
            assert!(matches!(
                bast.length_at(width).unwrap_err(),
                SimError::OutOfRange { .. }
            ));
        }
    }

    #[test]
    fn test_cut_segments() {
        let mut bast = taper(3000.0, 20.0, 11.0);
        let segments = bast.cut(1000.0).unwrap();

        assert_eq!(segments.len(), 3);
        let total: f64 = segments.iter().map(|s| s.length()).sum();
        assert_eq!(total, 3000.0);
        assert!(segments.iter().all(|s| s.state() == BastState::Cut));

        assert_close(segments[0].width(), (20.0, 17.0));
        assert_close(segments[1].width(), (17.0, 14.0));
        assert_close(segments[2].width(), (14.0, 11.0));

        // the parent now stands for the first segment
        assert_eq!(bast.length(), 1000.0);
        assert_eq!(bast.width(), segments[0].width());
        assert_eq!(bast.state(), BastState::Cut);
    }

    #[test]
    fn test_cut_clips_last_segment() {
        let mut bast = taper(2500.0, 10.0, 5.0);
        let segments = bast.cut(1000.0).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].length(), 500.0);
        let total: f64 = segments.iter().map(|s| s.length()).sum();
        assert!((total - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_cut_shorter_than_segment() {
        let mut bast = taper(400.0, 10.0, 5.0);
        let segments = bast.cut(1000.0).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].length(), 400.0);
        assert_close(segments[0].width(), (10.0, 5.0));
    }

    #[test]
    fn test_cut_rejects_non_positive_length() {
        let mut bast = taper(400.0, 10.0, 5.0);
        assert!(bast.cut(0.0).is_err());
        assert_eq!(bast.state(), BastState::Fresh);
    }

    #[test]
    fn test_splice_divides_width() {
        let mut bast = Bast::with_state(1000.0, (20.0, 14.0), BastState::Cut);
        let strips = bast.splice(7.0).unwrap();

        assert_eq!(strips.len(), 3);
        let total: f64 = strips.iter().map(|s| s.start_width()).sum();
        assert!((total - 20.0).abs() < 1e-9);
        for strip in &strips {
            assert_eq!(strip.length(), 1000.0);
            assert!((strip.end_width() - 14.0 / 3.0).abs() < 1e-12);
            assert_eq!(strip.state(), BastState::Fresh);
        }
        assert_eq!(bast.state(), BastState::Spliced);
    }

    #[test]
    fn test_splice_narrow_strip_is_kept_whole() {
        let mut bast = Bast::with_state(1000.0, (6.5, 4.0), BastState::Cut);
        let strips = bast.splice(7.0).unwrap();
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].width(), (6.5, 4.0));
    }

    #[test]
    fn test_lifecycle_illegal_pairs() {
        let all_ops = [BastOp::Cut, BastOp::Splice, BastOp::Sew];
        let states = [
            BastState::Fresh,
            BastState::Cut,
            BastState::Spliced,
            BastState::Sewn,
        ];

        for state in states {
            for op in all_ops {
                let mut bast = Bast::with_state(1000.0, (10.0, 5.0), state);
                let result = match op {
                    BastOp::Cut => bast.cut(500.0).map(|_| ()),
                    BastOp::Splice => bast.splice(7.0).map(|_| ()),
                    BastOp::Sew => bast.sew(),
                };
                let legal = state.next(op).is_some();
                assert_eq!(result.is_ok(), legal, "{} in state {}", op, state);
                if !legal {
                    assert!(result.unwrap_err().is_illegal_transition());
                    assert_eq!(bast.state(), state);
                }
            }
        }
    }

    #[test]
    fn test_full_lifecycle() {
        let mut bast = taper(2000.0, 12.0, 8.0);
        let mut segments = bast.cut(1000.0).unwrap();
        let strips = segments[0].splice(7.0).unwrap();
        assert_eq!(strips.len(), 2);
        segments[0].sew().unwrap();
        assert_eq!(segments[0].state(), BastState::Sewn);
    }
}
