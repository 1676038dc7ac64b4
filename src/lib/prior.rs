use crate::error::{Result, SamplingError, check_open_unit, check_positive};
use statrs::distribution::{Beta, Continuous, ContinuousCDF};
use statrs::function::gamma::ln_gamma;

/// Largest number of points a density curve may hold.
pub const MAX_DENSITY_POINTS: usize = 1_000_000;

/// A conjugate Beta prior over the population misstatement rate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PriorSpecification {
    alpha: f64,
    beta: f64,
}

impl PriorSpecification {
    /// Create a prior with shape parameters `alpha` and `beta`, both > 0.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        let alpha = check_positive("alpha", alpha)?;
        let beta = check_positive("beta", beta)?;
        Ok(Self { alpha, beta })
    }

    /// The uniform prior, beta(1, 1).
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn is_uniform(&self) -> bool {
        self.alpha == 1.0 && self.beta == 1.0
    }

    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    pub fn variance(&self) -> f64 {
        let numerator = self.alpha * self.beta;
        let denominator = (self.alpha + self.beta).powf(2.0) * (self.alpha + self.beta + 1.0);
        numerator / denominator
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn log_beta(&self) -> f64 {
        ln_gamma(self.alpha) + ln_gamma(self.beta) - ln_gamma(self.alpha + self.beta)
    }

    /// Density at `x`; zero outside [0, 1].
    pub fn pdf(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        self.distribution().pdf(x)
    }

    /// Probability that the misstatement rate is at most `x`, the area under
    /// the density on [0, x].
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        self.distribution().cdf(x)
    }

    /// Quantile at `confidence`, e.g. the 95 percent upper bound.
    pub fn credible_bound(&self, confidence: f64) -> Result<f64> {
        let confidence = check_open_unit("confidence", confidence)?;
        Ok(self.distribution().inverse_cdf(confidence))
    }

    /// Samples the density on `[lower, upper]` every `step`, inclusive of
    /// both ends. Fails when that takes more than [`MAX_DENSITY_POINTS`].
    pub fn density_curve(&self, lower: f64, upper: f64, step: f64) -> Result<Vec<(f64, f64)>> {
        let step = check_positive("step", step)?;
        if !(0.0..=1.0).contains(&lower) || !(0.0..=1.0).contains(&upper) || lower > upper {
            return Err(SamplingError::invalid(
                "lower",
                lower,
                "density range must satisfy 0 <= lower <= upper <= 1",
            ));
        }
        let n_points = ((upper - lower) / step + 1e-9).floor() + 1.0;
        if n_points > MAX_DENSITY_POINTS as f64 {
            return Err(SamplingError::invalid(
                "step",
                step,
                "too small for the density range, more than 1000000 points",
            ));
        }
        let n_points = n_points as usize;
        Ok((0..n_points)
            .map(|i| {
                let x = (lower + i as f64 * step).min(upper);
                (x, self.pdf(x))
            })
            .collect())
    }

    pub(crate) fn distribution(&self) -> Beta {
        // Both parameters are validated as finite and positive on construction.
        Beta::new(self.alpha, self.beta).unwrap_or_else(|_| unreachable!("validated beta parameters"))
    }
}

impl Default for PriorSpecification {
    fn default() -> Self {
        Self::uniform()
    }
}

impl std::fmt::Display for PriorSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "beta(α = {}, β = {})", self.alpha, self.beta)
    }
}

impl std::str::FromStr for PriorSpecification {
    type Err = anyhow::Error;

    /// Parses `"alpha,beta"`, e.g. `"2,35"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (alpha, beta) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Prior must be given as ALPHA,BETA, got: {}", s))?;
        let alpha = alpha.trim().parse::<f64>()?;
        let beta = beta.trim().parse::<f64>()?;
        Ok(PriorSpecification::new(alpha, beta)?)
    }
}
