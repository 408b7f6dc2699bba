//! Parks-McClellan equiripple FIR design (Remez exchange).
//!
//! # Algorithm
//!
//! 1. Build two or three bands with fixed weights for the pass type and
//!    lay a dense grid over them (16 points per unique coefficient).
//! 2. Starting from evenly spaced extremal frequencies, alternate between
//!    solving for the ripple deviation at the current extremal set and
//!    searching the grid for a better set, until the deviation stops
//!    growing or no extremal point moves.
//! 3. Evaluate the optimal response on an evenly spaced grid by barycentric
//!    Lagrange interpolation and inverse-DFT it into the impulse response.
//!
//! All working arrays live in a [`RemezWorkspace`], so concurrent designs
//! only need one workspace each. Frequencies inside the workspace are in
//! cycles per sample (0.0 to 0.5).

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::{PI, TAU};

use crate::config::{
    MAX_PARKS_TAPS, MIN_FIR_TAPS, PARKS_GRID_DENSITY, PARKS_LONG_FILTER_TAPS, PARKS_MAX_ITERATIONS,
    PARKS_MAX_TRANSITION_WIDTH, PARKS_MIN_TEST_VAL, PARKS_SUSPECT_ITERATIONS,
};
use crate::error::DesignError;
use crate::fir::FirCoefficients;
use crate::types::{BandSpec, PassType};
#[cfg(not(feature = "std"))]
use num_traits::Float;

/// How the exchange loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemezExit {
    /// A full sweep moved no extremal point
    Settled,
    /// The deviation stopped growing (usually rounding near the optimum)
    DeviationStalled,
    /// Iteration cap reached (`PARKS_MAX_ITERATIONS` unless overridden)
    IterationCap,
}

/// Result of a Remez exchange run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RemezOutcome {
    /// Raw iteration count (starts at 1)
    pub iterations: usize,
    /// False if the iteration cap was hit
    pub converged: bool,
    /// Exit path taken by the exchange loop
    pub exit: RemezExit,
    /// Final weighted ripple deviation
    pub deviation: f64,
    /// Tap count actually designed (high-pass/notch are forced odd)
    pub num_taps: usize,
    /// Transition width actually used (may have been clamped)
    pub transition_width: f64,
}

impl RemezOutcome {
    /// Whether the run looks unreliable by the classic "fewer than 3
    /// iterations" rule.
    ///
    /// The rule has both false positives and false negatives; prefer
    /// checking the realized response.
    #[must_use]
    pub fn is_suspect(&self) -> bool {
        !self.converged || self.iterations < PARKS_SUSPECT_ITERATIONS
    }
}

/// One band of the approximation problem.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Band {
    lower: f64,
    upper: f64,
    magnitude: f64,
    weight: f64,
}

const fn band(lower: f64, upper: f64, magnitude: f64, weight: f64) -> Band {
    Band {
        lower,
        upper,
        magnitude,
        weight,
    }
}

/// Band layout for a pass type, with edges in `0.0..=1.0` (1.0 = Nyquist).
fn band_layout(pass_type: PassType, spec: BandSpec, width: f64) -> Result<heapless::Vec<Band, 3>, DesignError> {
    let mut bands = heapless::Vec::new();
    let push = |bands: &mut heapless::Vec<Band, 3>, b: Band| {
        if b.lower > b.upper {
            return Err(DesignError::InvalidFrequency);
        }
        bands.push(b).map_err(|_| DesignError::InvalidFrequency)
    };

    match pass_type {
        PassType::LowPass => {
            let pass = spec.omega_c.clamp(0.01, 0.98);
            let stop = (pass + width).min(0.99);
            push(&mut bands, band(0.0, pass, 1.0, 1.0))?;
            push(&mut bands, band(stop, 1.0, 0.0, 10.0))?;
        }
        PassType::HighPass => {
            let pass = spec.omega_c.clamp(0.02, 0.99);
            let stop = (pass - width).max(0.01);
            push(&mut bands, band(0.0, stop, 0.0, 10.0))?;
            push(&mut bands, band(pass, 1.0, 1.0, 1.0))?;
        }
        PassType::BandPass | PassType::Notch => {
            let inner_low = spec.lower_edge().max(0.02);
            let outer_low = (inner_low - width).max(0.01);
            let inner_high = spec.upper_edge().min(0.98);
            let outer_high = (inner_high + width).min(0.99);
            let (outer, inner, outer_weight, inner_weight) = if pass_type == PassType::BandPass {
                (0.0, 1.0, 10.0, 1.0)
            } else {
                (1.0, 0.0, 1.0, 10.0)
            };
            push(&mut bands, band(0.0, outer_low, outer, outer_weight))?;
            push(&mut bands, band(inner_low, inner_high, inner, inner_weight))?;
            push(&mut bands, band(outer_high, 1.0, outer, outer_weight))?;
        }
        PassType::AllPass => return Err(DesignError::UnsupportedPassType),
    }
    Ok(bands)
}

/// Labels of the exchange loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Solve for the deviation at the current extremal set.
    Initialize,
    /// Compare against the previous deviation and start a sweep.
    TestConvergence,
    /// Next extremal point, or end of sweep.
    SearchExtremal,
    /// Climb upward while the error keeps growing.
    Ascend,
    /// Step downward looking for a larger error below the old point.
    Descend,
    /// Climb downward while the error keeps growing.
    DescendRecord,
    /// Look past the first and last extremal points.
    SweepEnds,
    /// Rotate the extremal set and start another iteration.
    ShiftWindow,
    /// Exchange finished.
    Done,
}

/// Mutable registers of the exchange loop.
#[derive(Debug)]
struct Sweep {
    /// Extremal index being refined
    j: usize,
    /// Grid index under test
    k: isize,
    k_up: isize,
    k_low: isize,
    k1: isize,
    knz: isize,
    nu: f64,
    nut: f64,
    nut1: f64,
    comp: f64,
    err: f64,
    y1: f64,
    ynz: f64,
    dev_last: f64,
    changes: usize,
    luck: u8,
    iterations: usize,
    max_iterations: usize,
}

impl Sweep {
    fn new(max_iterations: usize) -> Self {
        Self {
            j: 0,
            k: 0,
            k_up: 0,
            k_low: -1,
            k1: 0,
            knz: 0,
            nu: 1.0,
            nut: 1.0,
            nut1: 0.0,
            comp: 0.0,
            err: 0.0,
            y1: 0.0,
            ynz: 0.0,
            dev_last: -1.0,
            changes: 0,
            luck: 0,
            iterations: 1,
            max_iterations,
        }
    }

    /// Post-increment the iteration count; true while under the cap.
    fn next_iteration(&mut self) -> bool {
        let more = self.iterations < self.max_iterations;
        self.iterations += 1;
        more
    }
}

fn floor_magnitude(v: f64) -> f64 {
    if v.abs() < PARKS_MIN_TEST_VAL {
        if v < 0.0 {
            -PARKS_MIN_TEST_VAL
        } else {
            PARKS_MIN_TEST_VAL
        }
    } else {
        v
    }
}

/// Per-call working storage for the Parks-McClellan designer.
///
/// A workspace can be reused across designs to avoid reallocating; nothing
/// carries over between calls.
#[derive(Clone, Debug)]
pub struct RemezWorkspace {
    /// Exchange iteration cap
    max_iterations: usize,
    /// Unique coefficients (`(N + 1) / 2`)
    half_taps: usize,
    grid: Vec<f64>,
    desired: Vec<f64>,
    weight: Vec<f64>,
    /// `half_taps + 2` grid indices; the last one is a sentinel
    extremal: Vec<usize>,
    cos_extremal: Vec<f64>,
    lagrange_d: Vec<f64>,
    des_plus: Vec<f64>,
    alpha: Vec<f64>,
    deviation: f64,
}

impl Default for RemezWorkspace {
    fn default() -> Self {
        Self {
            max_iterations: PARKS_MAX_ITERATIONS,
            half_taps: 0,
            grid: Vec::new(),
            desired: Vec::new(),
            weight: Vec::new(),
            extremal: Vec::new(),
            cos_extremal: Vec::new(),
            lagrange_d: Vec::new(),
            des_plus: Vec::new(),
            alpha: Vec::new(),
            deviation: 0.0,
        }
    }
}

impl RemezWorkspace {
    /// Empty workspace with the default iteration cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty workspace that gives up after `max_iterations` exchange
    /// iterations (at least 1).
    #[must_use]
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            ..Self::default()
        }
    }

    /// Iteration cap in use.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Design an equiripple filter using this workspace.
    ///
    /// High-pass and notch tap counts are forced odd. The transition width is
    /// limited to 0.15 for band-pass/notch designs and for designs longer
    /// than 70 taps. Band edges are clamped into `0.01..=0.99`.
    ///
    /// Non-convergence is not an error; check [`RemezOutcome::converged`].
    ///
    /// # Errors
    /// Returns [`DesignError`] for tap counts outside
    /// `MIN_FIR_TAPS..=MAX_PARKS_TAPS`, all-pass designs, out-of-range band
    /// values or a transition width outside `(0.0, 1.0]`.
    pub fn design(
        &mut self,
        num_taps: usize,
        pass_type: PassType,
        spec: BandSpec,
        transition_width: f64,
    ) -> Result<(FirCoefficients, RemezOutcome), DesignError> {
        if num_taps < MIN_FIR_TAPS {
            return Err(DesignError::TooFewTaps(num_taps));
        }
        if num_taps > MAX_PARKS_TAPS {
            return Err(DesignError::TooManyTaps(num_taps));
        }
        if !(transition_width > 0.0 && transition_width <= 1.0) {
            return Err(DesignError::InvalidFrequency);
        }
        let spec = BandSpec::new(spec.omega_c, spec.bw)?;

        let mut width = transition_width;
        if (pass_type.is_band() || num_taps > PARKS_LONG_FILTER_TAPS) && width > PARKS_MAX_TRANSITION_WIDTH {
            debug!("remez: transition width {} clamped", width);
            width = PARKS_MAX_TRANSITION_WIDTH;
        }
        let mut num_taps = num_taps;
        if pass_type.requires_odd_taps() && num_taps % 2 == 0 {
            num_taps += 1;
            debug!("remez: taps forced odd ({})", num_taps);
        }
        let num_taps = num_taps.min(MAX_PARKS_TAPS);

        let bands = band_layout(pass_type, spec, width)?;
        let odd = num_taps % 2 == 1;
        self.half_taps = num_taps.div_ceil(2);
        self.build_grid(&bands, odd);
        self.initial_extremals();

        let (iterations, exit) = self.exchange();
        self.calc_alpha();
        let coeffs = self.impulse_response(num_taps, odd)?;

        debug!(
            "remez: {} taps, {} iterations, deviation {}",
            num_taps, iterations, self.deviation
        );
        if exit == RemezExit::IterationCap {
            warn!("remez: iteration cap reached ({})", iterations);
        }

        Ok((
            coeffs,
            RemezOutcome {
                iterations,
                converged: exit != RemezExit::IterationCap,
                exit,
                deviation: self.deviation,
                num_taps,
                transition_width: width,
            },
        ))
    }

    /// Dense grid over the bands, in cycles per sample.
    fn build_grid(&mut self, bands: &[Band], odd: bool) {
        let spacing = 0.5 / (PARKS_GRID_DENSITY * self.half_taps) as f64;
        self.grid.clear();
        self.desired.clear();
        self.weight.clear();

        for b in bands {
            let upper = b.upper / 2.0;
            let mut f = b.lower / 2.0;
            while f <= upper {
                self.grid.push(f);
                self.desired.push(b.magnitude);
                self.weight.push(b.weight);
                f += spacing;
            }
            // Band always ends exactly on its upper edge
            if let Some(last) = self.grid.last_mut() {
                *last = upper;
            }
        }

        if !odd {
            // Even lengths have a forced zero at Nyquist
            if self.grid.last().is_some_and(|&f| f > 0.5 - spacing) {
                self.grid.pop();
                self.desired.pop();
                self.weight.pop();
            }
            for ((f, d), w) in self.grid.iter().zip(&mut self.desired).zip(&mut self.weight) {
                let change = (PI * f).cos();
                *d /= change;
                *w *= change;
            }
        }
    }

    fn initial_extremals(&mut self) {
        let h = self.half_taps;
        let last = self.grid.len() - 1;
        let step = last as f64 / h as f64;
        self.extremal.clear();
        self.extremal.extend((0..h).map(|j| (j as f64 * step) as usize));
        self.extremal.push(last);
        // Sentinel, reset at the start of every iteration
        self.extremal.push(self.grid.len());

        self.cos_extremal = vec![0.0; h + 2];
        self.lagrange_d = vec![0.0; h + 1];
        self.des_plus = vec![0.0; h + 1];
    }

    /// Inverse of the barycentric weight for extremal point `kk`.
    fn lagrange_interp(&self, kk: usize, n: usize, m: usize) -> f64 {
        let q = self.cos_extremal[kk];
        let mut dee = 1.0;
        for k in 0..m {
            for j in (k..n).step_by(m) {
                if j != kk {
                    dee = 2.0 * dee * (q - self.cos_extremal[j]);
                }
            }
        }
        1.0 / floor_magnitude(dee)
    }

    /// Interpolated response at `x = cos(2 pi f)`.
    fn gee_at(&self, x: f64) -> f64 {
        let mut p = 0.0;
        let mut dee = 0.0;
        for j in 0..=self.half_taps {
            let c = self.lagrange_d[j] / floor_magnitude(x - self.cos_extremal[j]);
            dee += c;
            p += c * self.des_plus[j];
        }
        p / floor_magnitude(dee)
    }

    /// Weighted error at grid point `s.k`; true if it does not beat `s.comp`.
    fn err_test(&self, s: &mut Sweep) -> bool {
        debug_assert!(s.k >= 0 && (s.k as usize) < self.grid.len(), "grid index {}", s.k);
        let k = s.k as usize;
        let gee = self.gee_at((TAU * self.grid[k]).cos());
        s.err = (gee - self.desired[k]) * self.weight[k];
        s.nut * s.err - s.comp <= 0.0
    }

    /// Deviation and interpolation data for the current extremal set.
    fn solve_deviation(&mut self, s: &mut Sweep) {
        let h = self.half_taps;
        self.extremal[h + 1] = self.grid.len();
        for j in 0..=h {
            self.cos_extremal[j] = (TAU * self.grid[self.extremal[j]]).cos();
        }

        let jet = (h - 1) / 15 + 1;
        for j in 0..=h {
            self.lagrange_d[j] = self.lagrange_interp(j, h + 1, jet);
        }

        let (mut num, mut den) = (0.0, 0.0);
        let mut sign = 1.0;
        for j in 0..=h {
            let k = self.extremal[j];
            num += self.lagrange_d[j] * self.desired[k];
            den += sign * self.lagrange_d[j] / self.weight[k];
            sign = -sign;
        }
        let dev = num / den;
        s.nu = if dev > 0.0 { -1.0 } else { 1.0 };
        self.deviation = -s.nu * dev;

        let mut sign = s.nu;
        for j in 0..=h {
            let k = self.extremal[j];
            self.des_plus[j] = self.desired[k] + sign * self.deviation / self.weight[k];
            sign = -sign;
        }
    }

    /// Remez exchange. Returns the raw iteration count and the exit taken.
    fn exchange(&mut self) -> (usize, RemezExit) {
        let h = self.half_taps;
        let last = self.grid.len() as isize - 1;
        let mut s = Sweep::new(self.max_iterations);
        let mut exit = RemezExit::Settled;
        let mut state = State::Initialize;

        while state != State::Done {
            state = match state {
                State::Initialize => {
                    self.solve_deviation(&mut s);
                    State::TestConvergence
                }
                State::TestConvergence => {
                    if self.deviation <= s.dev_last {
                        exit = RemezExit::DeviationStalled;
                        State::Done
                    } else {
                        s.dev_last = self.deviation;
                        s.changes = 0;
                        s.k1 = self.extremal[0] as isize;
                        s.knz = self.extremal[h] as isize;
                        s.k_low = -1;
                        s.nut = -s.nu;
                        s.j = 0;
                        State::SearchExtremal
                    }
                }
                State::SearchExtremal => {
                    if s.j < h + 1 {
                        s.k_up = self.extremal[s.j + 1] as isize;
                        s.k = self.extremal[s.j] as isize + 1;
                        s.nut = -s.nut;
                        if s.j == 1 {
                            s.y1 = s.comp;
                        }
                        s.comp = self.deviation;
                        if s.k < s.k_up && !self.err_test(&mut s) {
                            State::Ascend
                        } else {
                            s.k -= 1;
                            State::Descend
                        }
                    } else {
                        State::SweepEnds
                    }
                }
                State::Ascend => {
                    s.comp = s.nut * s.err;
                    s.k += 1;
                    while s.k < s.k_up {
                        if self.err_test(&mut s) {
                            break;
                        }
                        s.comp = s.nut * s.err;
                        s.k += 1;
                    }
                    let k = s.k - 1;
                    self.record_extremal(&mut s, k);
                    s.k_low = k;
                    State::SearchExtremal
                }
                State::Descend => {
                    s.k -= 1;
                    if s.k <= s.k_low {
                        s.k = self.extremal[s.j] as isize + 1;
                        if s.changes > 0 {
                            let k = s.k - 1;
                            self.record_extremal(&mut s, k);
                            s.k_low = k;
                            State::SearchExtremal
                        } else {
                            s.k += 1;
                            let mut found = false;
                            while s.k < s.k_up {
                                if !self.err_test(&mut s) {
                                    found = true;
                                    break;
                                }
                                s.k += 1;
                            }
                            if found {
                                State::Ascend
                            } else {
                                s.k_low = self.extremal[s.j] as isize;
                                s.j += 1;
                                State::SearchExtremal
                            }
                        }
                    } else if self.err_test(&mut s) {
                        if s.changes == 0 {
                            State::Descend
                        } else {
                            s.k_low = self.extremal[s.j] as isize;
                            s.j += 1;
                            State::SearchExtremal
                        }
                    } else {
                        s.comp = s.nut * s.err;
                        State::DescendRecord
                    }
                }
                State::DescendRecord => {
                    s.k -= 1;
                    while s.k > s.k_low {
                        if self.err_test(&mut s) {
                            break;
                        }
                        s.comp = s.nut * s.err;
                        s.k -= 1;
                    }
                    s.k_low = self.extremal[s.j] as isize;
                    let k = s.k + 1;
                    self.record_extremal(&mut s, k);
                    State::SearchExtremal
                }
                State::SweepEnds => self.sweep_ends(&mut s, last, &mut exit),
                State::ShiftWindow => {
                    let kn = self.extremal[h + 1];
                    self.extremal.copy_within(1..=h, 0);
                    self.extremal[h] = kn;
                    if s.next_iteration() {
                        State::Initialize
                    } else {
                        exit = RemezExit::IterationCap;
                        State::Done
                    }
                }
                State::Done => State::Done,
            };
        }
        (s.iterations, exit)
    }

    /// Store a new extremal point at `s.j` and move to the next one.
    fn record_extremal(&mut self, s: &mut Sweep, k: isize) {
        debug_assert!(k >= 0 && s.j < self.extremal.len(), "extremal {} <- {}", s.j, k);
        self.extremal[s.j] = k as usize;
        s.j += 1;
        s.changes += 1;
    }

    /// Search below the first and above the last extremal point.
    fn sweep_ends(&mut self, s: &mut Sweep, last: isize, exit: &mut RemezExit) -> State {
        let h = self.half_taps;

        if s.j == h + 1 {
            s.ynz = s.comp;
            s.k1 = s.k1.min(self.extremal[0] as isize);
            s.knz = s.knz.max(self.extremal[h] as isize);
            s.nut1 = s.nut;
            s.nut = -s.nu;
            s.k_up = s.k1;
            s.comp = s.ynz * 1.00001;
            s.luck = 1;
            s.k = 0;
            while s.k < s.k_up {
                if !self.err_test(s) {
                    s.j = h + 1;
                    return State::Ascend;
                }
                s.k += 1;
            }
            s.luck = 2;
        }

        if s.luck != 1 && s.luck != 2 {
            return State::ShiftWindow;
        }

        if s.luck == 1 {
            if s.comp > s.y1 {
                s.y1 = s.comp;
            }
            s.k1 = self.extremal[h + 1] as isize;
        }

        s.k = last;
        s.k_low = s.knz;
        s.nut = -s.nut1;
        s.comp = s.y1 * 1.00001;
        while s.k > s.k_low {
            if !self.err_test(s) {
                s.j = h + 1;
                s.comp = s.nut * s.err;
                s.luck = 3;
                return State::DescendRecord;
            }
            s.k -= 1;
        }

        if s.luck == 2 {
            return if s.changes > 0 && s.next_iteration() {
                State::Initialize
            } else {
                if s.changes > 0 {
                    *exit = RemezExit::IterationCap;
                }
                State::Done
            };
        }

        self.extremal.copy_within(0..h, 1);
        self.extremal[0] = s.k1 as usize;
        if s.next_iteration() {
            State::Initialize
        } else {
            State::ShiftWindow
        }
    }

    /// Cosine-series coefficients of the optimal response.
    fn calc_alpha(&mut self) {
        let h = self.half_taps;
        self.cos_extremal[h + 1] = -2.0;
        let inv = 1.0 / (2 * h - 1) as f64;

        let mut samples = vec![0.0; h];
        let mut k = 0;
        for (j, sample) in samples.iter_mut().enumerate() {
            let x = (TAU * j as f64 * inv).cos();
            let mut gc = self.cos_extremal[k];
            while x <= gc && gc - x >= PARKS_MIN_TEST_VAL {
                k += 1;
                gc = self.cos_extremal[k];
            }
            *sample = if x <= gc || x - gc < PARKS_MIN_TEST_VAL {
                self.des_plus[k]
            } else {
                self.gee_at(x)
            };
            k = k.saturating_sub(1);
        }

        self.alpha.clear();
        self.alpha.extend((0..h).map(|j| {
            let omega = j as f64 * TAU * inv;
            let sum: f64 = (1..h).map(|n| samples[n] * (omega * n as f64).cos()).sum();
            2.0 * sum + samples[0]
        }));
        self.alpha[0] *= inv;
        for a in &mut self.alpha[1..] {
            *a *= 2.0 * inv;
        }
    }

    /// Symmetric impulse response from the cosine series.
    fn impulse_response(&self, num_taps: usize, odd: bool) -> Result<FirCoefficients, DesignError> {
        let h = self.half_taps;
        let a = &self.alpha;
        let mut half = vec![0.0; h];
        if odd {
            for (i, c) in half.iter_mut().enumerate().take(h - 1) {
                *c = 0.5 * a[h - 1 - i];
            }
            half[h - 1] = a[0];
        } else {
            half[0] = 0.25 * a[h - 1];
            for i in 1..h - 1 {
                half[i] = 0.25 * (a[h - 1 - i] + a[h - i]);
            }
            half[h - 1] = 0.5 * a[0] + 0.25 * a[1];
        }

        let mut coeffs = FirCoefficients::zeros(num_taps)?;
        coeffs[..h].copy_from_slice(&half);
        let mirror = if odd { &half[..h - 1] } else { &half[..] };
        for (dst, src) in coeffs[h..].iter_mut().zip(mirror.iter().rev()) {
            *dst = *src;
        }
        Ok(coeffs)
    }
}

/// Design an equiripple FIR filter with a fresh [`RemezWorkspace`].
///
/// `band.omega_c` is the pass-band edge (low/high-pass) or band centre
/// (band-pass/notch); `transition_width` is the distance to the stop-band
/// edge. All frequencies are normalized so 1.0 is Nyquist.
///
/// # Errors
/// See [`RemezWorkspace::design`].
pub fn parks_mcclellan(
    num_taps: usize,
    pass_type: PassType,
    band: BandSpec,
    transition_width: f64,
) -> Result<(FirCoefficients, RemezOutcome), DesignError> {
    RemezWorkspace::new().design(num_taps, pass_type, band, transition_width)
}
