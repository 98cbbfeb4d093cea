//! Pure budget arithmetic for a Hyperband run
//!
//! Everything here is a deterministic function of `max_iter`; nothing is
//! persisted, so resumed runs re-derive identical values.

/// Downsampling rate applied to both population sizes and iteration
/// budgets. Fixed at Euler's number; not configurable.
pub const ETA: f64 = std::f64::consts::E;

/// Bracket and round budgets derived from the maximum iteration count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    max_iter: usize,
}

impl Schedule {
    pub fn new(max_iter: usize) -> Self {
        Self { max_iter }
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Largest bracket index: `floor(log_eta(max_iter))`.
    pub fn s_max(&self) -> usize {
        (self.max_iter as f64).log(ETA).floor() as usize
    }

    /// Total budget `B = (s_max + 1) * max_iter`.
    pub fn budget(&self) -> usize {
        (self.s_max() + 1) * self.max_iter
    }

    /// Descriptor for bracket `s`.
    pub fn bracket(&self, s: usize) -> BracketDescriptor {
        let b = self.budget() as f64;
        let max_iter = self.max_iter as f64;
        let n = (b / max_iter / (s as f64 + 1.0) * ETA.powi(s as i32)).ceil() as usize;
        let r = max_iter * ETA.powi(-(s as i32));
        BracketDescriptor { s, n, r }
    }

    /// Brackets in sweep order: `s_max` down to 0.
    pub fn brackets(self) -> impl Iterator<Item = BracketDescriptor> {
        (0..=self.s_max()).rev().map(move |s| self.bracket(s))
    }
}

/// Derived description of one bracket; never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketDescriptor {
    pub s: usize,
    /// Initial population size `n(s) = ceil(B / max_iter / (s+1) * eta^s)`.
    pub n: usize,
    /// Initial per-configuration iteration budget `r(s) = max_iter * eta^(-s)`.
    pub r: f64,
}

impl BracketDescriptor {
    /// Rounds in this bracket (`s + 1`).
    pub fn rounds(&self) -> usize {
        self.s + 1
    }

    /// Budget for round `i`, sized from the bracket's actual starting
    /// population `n` (which may differ from `n(s)` on resume).
    pub fn round(&self, i: usize, n: usize) -> RoundBudget {
        let n_configs = n as f64 * ETA.powi(-(i as i32));
        let n_iters = (self.r * ETA.powi(i as i32)).round() as usize;
        RoundBudget { i, n_configs, n_iters }
    }
}

/// Budget for one elimination round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundBudget {
    pub i: usize,
    /// Population size before this round's elimination.
    pub n_configs: f64,
    /// Additional training iterations for every surviving configuration.
    pub n_iters: usize,
}

impl RoundBudget {
    /// Number of configurations retained after this round:
    /// `floor(n_configs / eta)`.
    pub fn survivors(&self) -> usize {
        (self.n_configs / ETA).floor() as usize
    }
}
