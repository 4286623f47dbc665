//! Generic two-phase root finder.
//!
//! Phase 1 steps through the window at a fixed stride until two
//! consecutive samples change sign (a bracket). Phase 2 bisects the
//! bracket, keeping the half whose ends still differ in sign from the
//! low end. Discovery is bounded by the window end only, so a function
//! that never changes sign is scanned once and reported as absent.

use tracing::debug;

use crate::error::SearchError;

/// Hard ceiling on bisection steps for tolerance-terminated refinement.
pub const MAX_BISECTIONS: u32 = 64;

// ---------------------------------------------------------------------------
// Search parameters
// ---------------------------------------------------------------------------

/// Direction of a coarse scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// How the scalar's consecutive samples are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Continuous real function (speeds).
    Linear,
    /// Angle wrapped to (−180, +180]; a jump across the wrap point is not a
    /// crossing.
    Angular,
}

/// When bisection stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// Exactly this many halvings (fewer only if the bracket can no longer
    /// be split in floating point).
    Iterations(u32),
    /// Until the bracket is narrower than this many days.
    Tolerance(f64),
}

impl Termination {
    pub fn validate(&self) -> Result<(), &'static str> {
        match *self {
            Self::Iterations(0) => Err("iterations must be > 0"),
            Self::Tolerance(days) if !days.is_finite() || days <= 0.0 => {
                Err("tolerance must be positive")
            }
            _ => Ok(()),
        }
    }
}

/// Range and stride of a coarse scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    pub start_jd: f64,
    /// Scan stops here. After `start_jd` when scanning forward, before it
    /// when scanning backward.
    pub end_jd: f64,
    pub step_days: f64,
    pub direction: SearchDirection,
}

impl SearchWindow {
    /// Forward window of `span_days` from `start_jd`.
    pub fn forward(start_jd: f64, span_days: f64, step_days: f64) -> Self {
        Self {
            start_jd,
            end_jd: start_jd + span_days,
            step_days,
            direction: SearchDirection::Forward,
        }
    }

    /// Backward window of `span_days` ending at `start_jd`.
    pub fn backward(start_jd: f64, span_days: f64, step_days: f64) -> Self {
        Self {
            start_jd,
            end_jd: start_jd - span_days,
            step_days,
            direction: SearchDirection::Backward,
        }
    }

    pub fn span_days(&self) -> f64 {
        (self.end_jd - self.start_jd).abs()
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.start_jd.is_finite() || !self.end_jd.is_finite() {
            return Err("window bounds must be finite");
        }
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        let ordered = match self.direction {
            SearchDirection::Forward => self.end_jd > self.start_jd,
            SearchDirection::Backward => self.end_jd < self.start_jd,
        };
        if !ordered {
            return Err("window end must lie in the search direction");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Crossing detection
// ---------------------------------------------------------------------------

/// Refined root of a scalar function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingResult {
    /// Midpoint of the final bracket.
    pub jd: f64,
    /// Half-width of the final bracket in days.
    pub achieved_tolerance_days: f64,
    /// Coarse bracket `(earlier, later)` the root was refined from.
    pub bracket: (f64, f64),
    /// Function values at the coarse bracket ends, same order.
    pub bracket_values: (f64, f64),
}

/// Strict sign change from `a` to `b`. A start exactly on zero does not count.
fn is_sign_change(a: f64, b: f64) -> bool {
    (a < 0.0 && b >= 0.0) || (a > 0.0 && b <= 0.0)
}

fn is_crossing(kind: ScalarKind, a: f64, b: f64) -> bool {
    match kind {
        ScalarKind::Linear => is_sign_change(a, b),
        ScalarKind::Angular => is_sign_change(a, b) && (a - b).abs() < 180.0,
    }
}

// ---------------------------------------------------------------------------
// Bisection
// ---------------------------------------------------------------------------

/// Bisect `[t_lo, t_hi]` where `f_lo` is the value at `t_lo`.
///
/// Returns `(root, half_width)`.
pub fn refine<F>(
    mut t_lo: f64,
    mut f_lo: f64,
    mut t_hi: f64,
    termination: Termination,
    f: &mut F,
) -> Result<(f64, f64), SearchError>
where
    F: FnMut(f64) -> Result<f64, SearchError>,
{
    termination.validate().map_err(SearchError::InvalidConfig)?;
    let limit = match termination {
        Termination::Iterations(n) => n,
        Termination::Tolerance(_) => MAX_BISECTIONS,
    };

    for _ in 0..limit {
        if let Termination::Tolerance(days) = termination {
            if t_hi - t_lo <= days {
                break;
            }
        }
        let t_mid = 0.5 * (t_lo + t_hi);
        if t_mid <= t_lo || t_mid >= t_hi {
            break;
        }
        let f_mid = f(t_mid)?;
        if f_mid == 0.0 {
            return Ok((t_mid, 0.0));
        }
        if (f_mid < 0.0) == (f_lo < 0.0) {
            t_lo = t_mid;
            f_lo = f_mid;
        } else {
            t_hi = t_mid;
        }
    }

    Ok((0.5 * (t_lo + t_hi), 0.5 * (t_hi - t_lo)))
}

// ---------------------------------------------------------------------------
// Coarse scan
// ---------------------------------------------------------------------------

/// Scan state shared by the single and collecting finders.
struct Scan {
    t_prev: f64,
    f_prev: f64,
    step: f64,
}

/// Next bracket after `scan`'s position, or `None` at the window end.
fn next_bracket<F>(
    window: &SearchWindow,
    kind: ScalarKind,
    scan: &mut Scan,
    f: &mut F,
) -> Result<Option<(f64, f64, f64, f64)>, SearchError>
where
    F: FnMut(f64) -> Result<f64, SearchError>,
{
    let forward = window.direction == SearchDirection::Forward;
    loop {
        let reached_end = if forward {
            scan.t_prev >= window.end_jd
        } else {
            scan.t_prev <= window.end_jd
        };
        if reached_end {
            return Ok(None);
        }
        let t_curr = if forward {
            (scan.t_prev + scan.step).min(window.end_jd)
        } else {
            (scan.t_prev + scan.step).max(window.end_jd)
        };
        let f_curr = f(t_curr)?;
        let (t_prev, f_prev) = (scan.t_prev, scan.f_prev);
        scan.t_prev = t_curr;
        scan.f_prev = f_curr;

        if is_crossing(kind, f_prev, f_curr) {
            debug!(t_prev, t_curr, f_prev, f_curr, "bracket found");
            return Ok(Some(if t_prev < t_curr {
                (t_prev, f_prev, t_curr, f_curr)
            } else {
                (t_curr, f_curr, t_prev, f_prev)
            }));
        }
    }
}

fn start_scan<F>(window: &SearchWindow, f: &mut F) -> Result<Scan, SearchError>
where
    F: FnMut(f64) -> Result<f64, SearchError>,
{
    let step = match window.direction {
        SearchDirection::Forward => window.step_days,
        SearchDirection::Backward => -window.step_days,
    };
    Ok(Scan {
        t_prev: window.start_jd,
        f_prev: f(window.start_jd)?,
        step,
    })
}

// ---------------------------------------------------------------------------
// Finders
// ---------------------------------------------------------------------------

/// First crossing of `f` through zero in scan order, refined.
///
/// Configuration is validated before `f` is evaluated. `Ok(None)` when the
/// window is exhausted without a bracket.
pub fn find_crossing<F>(
    window: &SearchWindow,
    kind: ScalarKind,
    termination: Termination,
    mut f: F,
) -> Result<Option<CrossingResult>, SearchError>
where
    F: FnMut(f64) -> Result<f64, SearchError>,
{
    window.validate().map_err(SearchError::InvalidConfig)?;
    termination.validate().map_err(SearchError::InvalidConfig)?;

    let mut scan = start_scan(window, &mut f)?;
    let Some((t_a, f_a, t_b, f_b)) = next_bracket(window, kind, &mut scan, &mut f)? else {
        return Ok(None);
    };
    let (jd, half_width) = refine(t_a, f_a, t_b, termination, &mut f)?;
    Ok(Some(CrossingResult {
        jd,
        achieved_tolerance_days: half_width,
        bracket: (t_a, t_b),
        bracket_values: (f_a, f_b),
    }))
}

/// Every crossing of `f` in the window, in scan order.
pub fn find_all_crossings<F>(
    window: &SearchWindow,
    kind: ScalarKind,
    termination: Termination,
    mut f: F,
) -> Result<Vec<CrossingResult>, SearchError>
where
    F: FnMut(f64) -> Result<f64, SearchError>,
{
    window.validate().map_err(SearchError::InvalidConfig)?;
    termination.validate().map_err(SearchError::InvalidConfig)?;

    let mut scan = start_scan(window, &mut f)?;
    let mut results = Vec::new();
    while let Some((t_a, f_a, t_b, f_b)) = next_bracket(window, kind, &mut scan, &mut f)? {
        let (jd, half_width) = refine(t_a, f_a, t_b, termination, &mut f)?;
        results.push(CrossingResult {
            jd,
            achieved_tolerance_days: half_width,
            bracket: (t_a, t_b),
            bracket_values: (f_a, f_b),
        });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counted<'a>(
        calls: &'a Cell<usize>,
        g: impl Fn(f64) -> f64 + 'a,
    ) -> impl FnMut(f64) -> Result<f64, SearchError> + 'a {
        move |t| {
            calls.set(calls.get() + 1);
            Ok(g(t))
        }
    }

    #[test]
    fn linear_root_by_iterations() {
        let w = SearchWindow::forward(0.0, 10.0, 1.0);
        let r = find_crossing(&w, ScalarKind::Linear, Termination::Iterations(40), |t| Ok(t - 3.3))
            .unwrap()
            .unwrap();
        assert!((r.jd - 3.3).abs() < 1e-10);
        assert_eq!(r.bracket, (3.0, 4.0));
    }

    #[test]
    fn iteration_count_is_exact() {
        let calls = Cell::new(0);
        let w = SearchWindow::forward(0.0, 10.0, 1.0);
        let r = find_crossing(
            &w,
            ScalarKind::Linear,
            Termination::Iterations(20),
            counted(&calls, |t| t - 3.3),
        )
        .unwrap()
        .unwrap();
        // start + 4 scan steps + 20 bisections
        assert_eq!(calls.get(), 1 + 4 + 20);
        assert!((r.achieved_tolerance_days - 0.5f64.powi(21)).abs() < 1e-15);
    }

    #[test]
    fn tolerance_termination() {
        let w = SearchWindow::forward(0.0, 10.0, 1.0);
        let tol = 1.0 / 86_400.0;
        let r = find_crossing(&w, ScalarKind::Linear, Termination::Tolerance(tol), |t| Ok(t - 7.77))
            .unwrap()
            .unwrap();
        assert!(2.0 * r.achieved_tolerance_days <= tol);
        assert!((r.jd - 7.77).abs() <= tol);
    }

    #[test]
    fn backward_scan_finds_latest_root_first() {
        let w = SearchWindow::backward(10.0, 10.0, 0.5);
        let r = find_crossing(&w, ScalarKind::Linear, Termination::Iterations(40), |t: f64| {
            Ok((t * std::f64::consts::PI / 4.0).sin())
        })
        .unwrap()
        .unwrap();
        // sin(πt/4) vanishes at 0, 4, 8; scanning back from 10 meets 8 first
        assert!((r.jd - 8.0).abs() < 1e-9, "jd = {}", r.jd);
    }

    #[test]
    fn angular_wrap_is_not_a_crossing() {
        // Offset running 170 → 179 → -172 (wrap) → -163 ...
        let w = SearchWindow::forward(0.0, 5.0, 1.0);
        let offset = |t: f64| Ok(((170.0 + 9.0 * t + 180.0f64).rem_euclid(360.0)) - 180.0);
        let r = find_crossing(&w, ScalarKind::Angular, Termination::Iterations(30), offset).unwrap();
        assert_eq!(r, None);
        // The same samples read as a plain number do change sign.
        let r = find_crossing(&w, ScalarKind::Linear, Termination::Iterations(30), offset).unwrap();
        assert!(r.is_some());
    }

    #[test]
    fn no_motion_exhausts_window() {
        let calls = Cell::new(0);
        let w = SearchWindow::forward(0.0, 10.0, 0.5);
        let r = find_crossing(&w, ScalarKind::Angular, Termination::Iterations(30), counted(&calls, |_| 0.0))
            .unwrap();
        assert_eq!(r, None);
        assert_eq!(calls.get(), 21);
    }

    #[test]
    fn last_step_clamped_to_window_end() {
        let w = SearchWindow::forward(0.0, 2.5, 1.0);
        let r = find_crossing(&w, ScalarKind::Linear, Termination::Iterations(40), |t| Ok(t - 2.4))
            .unwrap()
            .unwrap();
        assert_eq!(r.bracket, (2.0, 2.5));
    }

    #[test]
    fn all_crossings_in_order() {
        let w = SearchWindow::forward(0.5, 10.0, 0.5);
        let rs = find_all_crossings(&w, ScalarKind::Linear, Termination::Iterations(40), |t: f64| {
            Ok((t * std::f64::consts::PI / 3.0).sin())
        })
        .unwrap();
        let roots: Vec<f64> = rs.iter().map(|r| r.jd).collect();
        assert_eq!(roots.len(), 3);
        for (got, want) in roots.iter().zip([3.0, 6.0, 9.0]) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn invalid_config_rejected_before_sampling() {
        let calls = Cell::new(0);
        let bad_step = SearchWindow::forward(0.0, 10.0, 0.0);
        let err = find_crossing(&bad_step, ScalarKind::Linear, Termination::Iterations(10), counted(&calls, |t| t))
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));

        let w = SearchWindow::forward(0.0, 10.0, 1.0);
        let err = find_crossing(&w, ScalarKind::Linear, Termination::Tolerance(-1.0), counted(&calls, |t| t))
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));

        let reversed = SearchWindow {
            direction: SearchDirection::Backward,
            ..SearchWindow::forward(0.0, 10.0, 1.0)
        };
        assert!(reversed.validate().is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn errors_abort_the_scan() {
        let w = SearchWindow::forward(0.0, 10.0, 1.0);
        let err = find_crossing(&w, ScalarKind::Linear, Termination::Iterations(10), |t| {
            if t > 2.0 {
                Err(SearchError::InvalidConfig("boom"))
            } else {
                Ok(1.0)
            }
        })
        .unwrap_err();
        assert_eq!(err, SearchError::InvalidConfig("boom"));
    }
}
