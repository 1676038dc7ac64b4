use crate::error::{Result, SamplingError, check_open_unit};
use crate::observation::SampleObservation;
use crate::prior::PriorSpecification;
use log::debug;
use rayon::prelude::*;

/// Posterior over the misstatement rate after observing a sample.
///
/// Always constructed fresh from a prior and the cumulative evidence; a
/// state is never updated in place.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PosteriorState {
    prior: PriorSpecification,
    observation: SampleObservation,
    posterior: PriorSpecification,
}

/// Conjugate beta-binomial update: `alpha + k`, `beta + n - k`.
pub fn update(prior: &PriorSpecification, obs: &SampleObservation) -> Result<PosteriorState> {
    if obs.misstatements() > obs.sample_size() {
        return Err(SamplingError::InvalidObservation {
            sample_size: obs.sample_size(),
            misstatements: obs.misstatements(),
        });
    }
    let posterior = PriorSpecification::new(
        prior.alpha() + obs.misstatements() as f64,
        prior.beta() + obs.correct_items() as f64,
    )?;
    Ok(PosteriorState {
        prior: *prior,
        observation: *obs,
        posterior,
    })
}

/// Folds per-item outcomes into a posterior. The counts are accumulated and
/// applied to `prior` once, so the result is bit-identical to a batch
/// `update` with the same totals.
pub fn update_sequential<I>(prior: &PriorSpecification, outcomes: I) -> Result<PosteriorState>
where
    I: IntoIterator<Item = bool>,
{
    update(prior, &SampleObservation::from_outcomes(outcomes))
}

impl PosteriorState {
    pub fn prior(&self) -> &PriorSpecification {
        &self.prior
    }

    pub fn observation(&self) -> &SampleObservation {
        &self.observation
    }

    pub fn posterior_alpha(&self) -> f64 {
        self.posterior.alpha()
    }

    pub fn posterior_beta(&self) -> f64 {
        self.posterior.beta()
    }

    /// The posterior reused as the prior for the next unit of evidence.
    pub fn as_prior(&self) -> PriorSpecification {
        self.posterior
    }

    /// Value θ* with P(θ <= θ* | data) = `confidence`.
    pub fn credible_bound(&self, confidence: f64) -> Result<f64> {
        check_open_unit("confidence", confidence)?;
        self.posterior.credible_bound(confidence)
    }

    /// Most likely misstatement rate given the data, k / n.
    pub fn mode(&self) -> Result<f64> {
        if self.observation.is_empty() {
            return Err(SamplingError::UndefinedMode);
        }
        Ok(self.observation.misstatements() as f64 / self.observation.sample_size() as f64)
    }

    pub fn mean(&self) -> f64 {
        self.posterior.mean()
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.posterior.pdf(x)
    }

    /// Posterior probability that the misstatement rate is at most `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        self.posterior.cdf(x)
    }

    /// Posterior probability that the misstatement rate exceeds `x`.
    pub fn exceedance_probability(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    pub fn density_curve(&self, lower: f64, upper: f64, step: f64) -> Result<Vec<(f64, f64)>> {
        self.posterior.density_curve(lower, upper, step)
    }
}

/// One frame of the Bayesian learning cycle.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LearningStep {
    pub sample_size: u64,
    pub misstatements: u64,
    pub posterior_alpha: f64,
    pub posterior_beta: f64,
    pub mean: f64,
    pub credible_bound: f64,
    pub below_materiality: Option<bool>,
}

impl LearningStep {
    fn from_state(
        state: &PosteriorState,
        confidence: f64,
        materiality: Option<f64>,
    ) -> Result<Self> {
        let credible_bound = state.credible_bound(confidence)?;
        Ok(Self {
            sample_size: state.observation().sample_size(),
            misstatements: state.observation().misstatements(),
            posterior_alpha: state.posterior_alpha(),
            posterior_beta: state.posterior_beta(),
            mean: state.mean(),
            credible_bound,
            below_materiality: materiality.map(|m| credible_bound < m),
        })
    }
}

/// Runs the learning cycle over `outcomes`, one step per audited item,
/// starting with the prior itself at n = 0.
pub fn learning_trajectory(
    prior: &PriorSpecification,
    outcomes: &[bool],
    confidence: f64,
    materiality: Option<f64>,
) -> Result<Vec<LearningStep>> {
    check_open_unit("confidence", confidence)?;
    if let Some(m) = materiality {
        check_open_unit("materiality", m)?;
    }
    debug!(
        "Learning trajectory for {} over {} items",
        prior,
        outcomes.len()
    );
    let mut steps = Vec::with_capacity(outcomes.len() + 1);
    let mut obs = SampleObservation::empty();
    steps.push(LearningStep::from_state(&update(prior, &obs)?, confidence, materiality)?);
    for &is_misstatement in outcomes {
        obs = obs.record(is_misstatement);
        let state = update(prior, &obs)?;
        steps.push(LearningStep::from_state(&state, confidence, materiality)?);
    }
    Ok(steps)
}

/// Trajectories for several priors over the same evidence, computed in
/// parallel. Output order follows `priors`.
pub fn compare_priors(
    priors: &[PriorSpecification],
    outcomes: &[bool],
    confidence: f64,
    materiality: Option<f64>,
) -> Result<Vec<(PriorSpecification, Vec<LearningStep>)>> {
    priors
        .par_iter()
        .map(|prior| {
            learning_trajectory(prior, outcomes, confidence, materiality)
                .map(|steps| (*prior, steps))
        })
        .collect()
}
