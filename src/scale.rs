//! Axis scales with outlier-robust domains.
//!
//! Decides linear vs logarithmic mapping, clips domains to percentile or
//! IQR bounds so a single extreme value cannot collapse the view, rounds
//! domains to friendly tick boundaries, and clamps out-of-domain inputs to
//! the range edges. Also provides the square-root size scale that keeps
//! rendered area, not radius, proportional to value.

/// Ratio of max/min above which a positive-valued sample gets a log axis.
pub const LOG_RATIO_THRESHOLD: f64 = 100.0;

/// Smallest admissible lower bound for a log domain.
const LOG_DOMAIN_FLOOR: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlierMethod {
    /// Clip the domain to the 1st/99th percentile of the sample.
    #[default]
    Percentile,
    /// Clip to [Q1 - 1.5 IQR, Q3 + 1.5 IQR], intersected with the extent.
    Iqr,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleConfig {
    pub force_linear: bool,
    pub force_log: bool,
    pub outlier_method: OutlierMethod,
}

impl ScaleConfig {
    pub fn forced_log() -> Self {
        Self {
            force_log: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    Log,
}

/// A monotonic, clamped mapping from a data domain to an output range.
#[derive(Debug, Clone, Copy)]
pub struct AxisScale {
    pub kind: ScaleKind,
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

/// Interpolated quantile of an ascending-sorted sample (R-7, the same
/// definition d3 uses). `p` in [0, 1].
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let i = h.floor() as usize;
    let frac = h - i as f64;
    if i + 1 < sorted.len() {
        sorted[i] + (sorted[i + 1] - sorted[i]) * frac
    } else {
        sorted[i]
    }
}

fn finite_sorted(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap());
    v
}

fn should_use_log(sorted: &[f64]) -> bool {
    match (sorted.first(), sorted.last()) {
        (Some(&min), Some(&max)) => min > 0.0 && max / min > LOG_RATIO_THRESHOLD,
        _ => false,
    }
}

fn robust_bounds(sorted: &[f64], method: OutlierMethod) -> (f64, f64) {
    let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
    match method {
        OutlierMethod::Percentile => (quantile(sorted, 0.01), quantile(sorted, 0.99)),
        OutlierMethod::Iqr => {
            let q1 = quantile(sorted, 0.25);
            let q3 = quantile(sorted, 0.75);
            let iqr = q3 - q1;
            (min.max(q1 - 1.5 * iqr), max.min(q3 + 1.5 * iqr))
        }
    }
}

/// Step size producing roughly `count` ticks over [start, stop]:
/// a power of ten times 1, 2 or 5.
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if span == 0.0 || count == 0 {
        return 1.0;
    }
    let raw = span / count as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let err = raw / base;
    let factor = if err >= 7.07 {
        10.0
    } else if err >= 3.16 {
        5.0
    } else if err >= 1.41 {
        2.0
    } else {
        1.0
    };
    base * factor
}

impl AxisScale {
    /// Build a scale over `values` mapped onto `range`. Empty or
    /// all-non-finite samples get the unit domain.
    pub fn fit(values: &[f64], range: [f64; 2], cfg: &ScaleConfig) -> Self {
        let sorted = finite_sorted(values);
        if sorted.is_empty() {
            return Self {
                kind: ScaleKind::Linear,
                domain: [0.0, 1.0],
                range,
            };
        }

        let log = cfg.force_log || (!cfg.force_linear && should_use_log(&sorted));
        let (lo, hi) = robust_bounds(&sorted, cfg.outlier_method);

        let mut scale = if log {
            Self {
                kind: ScaleKind::Log,
                domain: [lo.max(LOG_DOMAIN_FLOOR), hi.max(LOG_DOMAIN_FLOOR * 2.0)],
                range,
            }
        } else {
            Self {
                kind: ScaleKind::Linear,
                domain: [lo, hi],
                range,
            }
        };
        scale.nice();
        scale
    }

    /// Round the domain outward to friendly boundaries: tick multiples for
    /// linear scales, powers of ten for log scales.
    pub fn nice(&mut self) {
        let [mut lo, mut hi] = self.domain;
        if !(hi > lo) {
            // degenerate domain; widen slightly so the mapping stays defined
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
            self.domain = [lo - pad, lo + pad];
            if self.kind == ScaleKind::Log {
                self.domain[0] = self.domain[0].max(LOG_DOMAIN_FLOOR);
            }
            return;
        }
        match self.kind {
            ScaleKind::Linear => {
                // two passes, matching the usual nice() fixpoint behavior
                for _ in 0..2 {
                    let step = tick_step(lo, hi, 10);
                    lo = (self.domain[0] / step).floor() * step;
                    hi = (self.domain[1] / step).ceil() * step;
                }
                self.domain = [lo, hi];
            }
            ScaleKind::Log => {
                self.domain = [
                    10f64.powf(lo.log10().floor()).max(LOG_DOMAIN_FLOOR),
                    10f64.powf(hi.log10().ceil()),
                ];
            }
        }
    }

    /// Normalized position of `v` in the domain, clamped to [0, 1].
    fn normalize(&self, v: f64) -> f64 {
        let [lo, hi] = self.domain;
        let t = match self.kind {
            ScaleKind::Linear => (v - lo) / (hi - lo),
            ScaleKind::Log => {
                if v <= 0.0 {
                    return 0.0;
                }
                (v.ln() - lo.ln()) / (hi.ln() - lo.ln())
            }
        };
        if t.is_finite() {
            t.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Map a data value into the range; inputs outside the domain pin to
    /// the range edges (no extrapolation).
    pub fn apply(&self, v: f64) -> f64 {
        let t = self.normalize(v);
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    /// Inverse mapping from a range position back to a data value, clamped
    /// to the domain.
    pub fn invert(&self, r: f64) -> f64 {
        let span = self.range[1] - self.range[0];
        let t = if span == 0.0 {
            0.0
        } else {
            ((r - self.range[0]) / span).clamp(0.0, 1.0)
        };
        let [lo, hi] = self.domain;
        match self.kind {
            ScaleKind::Linear => lo + t * (hi - lo),
            ScaleKind::Log => (lo.ln() + t * (hi.ln() - lo.ln())).exp(),
        }
    }

    /// Tick values inside [lo, hi] (defaults to the domain when callers pass
    /// the domain itself): round multiples for linear scales, decades with
    /// 2x/5x mantissas for sparse log spans.
    pub fn ticks_in(&self, lo: f64, hi: f64, target: usize) -> Vec<f64> {
        if !(hi > lo) {
            return vec![lo];
        }
        match self.kind {
            ScaleKind::Linear => {
                let step = tick_step(lo, hi, target.max(1));
                let mut v = (lo / step).ceil() * step;
                let mut out = Vec::new();
                while v <= hi + step * 1e-9 {
                    // snap away float dust so labels format cleanly
                    out.push((v / step).round() * step);
                    v += step;
                }
                out
            }
            ScaleKind::Log => {
                let lo = lo.max(f64::MIN_POSITIVE);
                let d0 = lo.log10().floor() as i32;
                let d1 = hi.log10().ceil() as i32;
                let mantissas: &[f64] = if (d1 - d0) as usize <= target / 3 {
                    &[1.0, 2.0, 5.0]
                } else {
                    &[1.0]
                };
                let mut out = Vec::new();
                for d in d0..=d1 {
                    for m in mantissas {
                        let v = m * 10f64.powi(d);
                        if v >= lo * (1.0 - 1e-9) && v <= hi * (1.0 + 1e-9) {
                            out.push(v);
                        }
                    }
                }
                out
            }
        }
    }

    pub fn ticks(&self, target: usize) -> Vec<f64> {
        self.ticks_in(self.domain[0], self.domain[1], target)
    }
}

/// Square-root radius scale: rendered area grows linearly with value, so
/// large measurements do not visually drown small ones.
#[derive(Debug, Clone, Copy)]
pub struct SizeScale {
    sqrt_domain: [f64; 2],
    radius_range: [f64; 2],
}

impl SizeScale {
    pub fn new(domain: [f64; 2], radius_range: [f64; 2]) -> Self {
        Self {
            sqrt_domain: [domain[0].max(0.0).sqrt(), domain[1].max(0.0).sqrt()],
            radius_range,
        }
    }

    /// Fit over the positive values of a sample. With no positive values the
    /// scale degenerates to the constant minimum radius.
    pub fn fit(values: impl IntoIterator<Item = f64>, min_radius: f64, max_radius: f64) -> Self {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in values {
            if v.is_finite() && v > 0.0 {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        if !lo.is_finite() {
            return Self {
                sqrt_domain: [0.0, 0.0],
                radius_range: [min_radius, min_radius],
            };
        }
        Self::new([lo, hi], [min_radius, max_radius])
    }

    pub fn radius(&self, v: f64) -> f64 {
        let [s0, s1] = self.sqrt_domain;
        if s1 <= s0 {
            return self.radius_range[0];
        }
        let t = ((v.max(0.0).sqrt() - s0) / (s1 - s0)).clamp(0.0, 1.0);
        self.radius_range[0] + t * (self.radius_range[1] - self.radius_range[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} !~ {b} (tol {tol})");
    }

    #[test]
    fn empty_sample_gets_unit_domain() {
        let s = AxisScale::fit(&[], [0.0, 100.0], &ScaleConfig::default());
        assert_eq!(s.kind, ScaleKind::Linear);
        assert_eq!(s.domain, [0.0, 1.0]);
    }

    #[test]
    fn log_decision_follows_ratio_rule() {
        let wide: Vec<f64> = vec![0.5, 3.0, 700.0];
        let s = AxisScale::fit(&wide, [0.0, 1.0], &ScaleConfig::default());
        assert_eq!(s.kind, ScaleKind::Log);

        let narrow: Vec<f64> = vec![1.0, 50.0, 99.0];
        let s = AxisScale::fit(&narrow, [0.0, 1.0], &ScaleConfig::default());
        assert_eq!(s.kind, ScaleKind::Linear);

        // a non-positive minimum disqualifies log even with a huge ratio
        let mixed: Vec<f64> = vec![-1.0, 3.0, 5000.0];
        let s = AxisScale::fit(&mixed, [0.0, 1.0], &ScaleConfig::default());
        assert_eq!(s.kind, ScaleKind::Linear);

        let forced = ScaleConfig {
            force_linear: true,
            ..Default::default()
        };
        let s = AxisScale::fit(&wide, [0.0, 1.0], &forced);
        assert_eq!(s.kind, ScaleKind::Linear);

        let s = AxisScale::fit(&narrow, [0.0, 1.0], &ScaleConfig::forced_log());
        assert_eq!(s.kind, ScaleKind::Log);
    }

    #[test]
    fn mapping_is_monotonic_and_clamped() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        let s = AxisScale::fit(&values, [0.0, 500.0], &ScaleConfig::default());

        let mut prev = f64::NEG_INFINITY;
        for v in [1.0, 2.0, 10.0, 33.0, 50.0, 99.0] {
            let r = s.apply(v);
            assert!(r >= prev);
            prev = r;
        }
        // no extrapolation past the range edges
        assert_eq!(s.apply(-1e9), 0.0);
        assert_eq!(s.apply(1e9), 500.0);
    }

    #[test]
    fn percentile_clipping_excludes_extreme_outlier() {
        let mut values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        values.push(100_000.0);
        let s = AxisScale::fit(&values, [0.0, 1.0], &ScaleConfig::default());
        assert!(
            s.domain[1] <= 200.0,
            "outlier leaked into domain: {:?}",
            s.domain
        );
    }

    #[test]
    fn iqr_clipping_stays_within_extent() {
        let mut values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        values.push(100_000.0);
        let cfg = ScaleConfig {
            force_linear: true,
            outlier_method: OutlierMethod::Iqr,
            ..Default::default()
        };
        let s = AxisScale::fit(&values, [0.0, 1.0], &cfg);
        assert!(s.domain[0] >= 0.0 && s.domain[1] <= 200.0, "{:?}", s.domain);
    }

    #[test]
    fn quantile_interpolates() {
        let sorted: Vec<f64> = (1..=4).map(|v| v as f64).collect();
        assert_close(quantile(&sorted, 0.5), 2.5, 1e-12);
        assert_close(quantile(&sorted, 0.0), 1.0, 1e-12);
        assert_close(quantile(&sorted, 1.0), 4.0, 1e-12);
    }

    #[test]
    fn invert_round_trips_inside_domain() {
        let values: Vec<f64> = vec![2.0, 15.0, 80.0];
        for cfg in [ScaleConfig::default(), ScaleConfig::forced_log()] {
            let s = AxisScale::fit(&values, [0.0, 640.0], &cfg);
            for v in [3.0, 10.0, 50.0] {
                assert_close(s.invert(s.apply(v)), v, v * 1e-6 + 1e-9);
            }
        }
    }

    #[test]
    fn linear_ticks_are_round_and_inside() {
        let values: Vec<f64> = vec![0.3, 9.7];
        let s = AxisScale::fit(&values, [0.0, 1.0], &ScaleConfig::default());
        let ticks = s.ticks(8);
        assert!(ticks.len() >= 4);
        for w in ticks.windows(2) {
            assert!(w[1] > w[0]);
        }
        assert!(ticks[0] >= s.domain[0] && *ticks.last().unwrap() <= s.domain[1]);
    }

    #[test]
    fn log_ticks_cover_decades() {
        let s = AxisScale {
            kind: ScaleKind::Log,
            domain: [0.1, 1000.0],
            range: [0.0, 1.0],
        };
        let ticks = s.ticks(6);
        for d in [0.1, 1.0, 10.0, 100.0, 1000.0] {
            assert!(
                ticks.iter().any(|t| (t / d - 1.0).abs() < 1e-9),
                "missing decade {d} in {ticks:?}"
            );
        }
    }

    #[test]
    fn size_scale_keeps_area_proportional() {
        let s = SizeScale::new([0.0, 100.0], [0.0, 10.0]);
        assert_close(s.radius(25.0), 5.0, 1e-12);
        assert_close(s.radius(4.0), 2.0, 1e-12);
        // area ratio equals value ratio
        let a1 = s.radius(4.0).powi(2);
        let a2 = s.radius(16.0).powi(2);
        assert_close(a2 / a1, 4.0, 1e-9);
        // monotone
        assert!(s.radius(1.0) < s.radius(2.0));
    }

    #[test]
    fn size_scale_degenerates_to_min_radius() {
        let s = SizeScale::fit([-3.0, 0.0].into_iter(), 2.0, 12.0);
        assert_eq!(s.radius(5.0), 2.0);
        assert_eq!(s.radius(0.0), 2.0);
    }
}
