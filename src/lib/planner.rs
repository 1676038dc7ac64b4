use crate::distribution::{DistributionFamily, MisstatementModel};
use crate::error::{Result, SamplingError};
use crate::observation::SampleObservation;
use crate::posterior::update;
use crate::risk::{BayesianCriterion, RiskCriterion};
use log::debug;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumString};

/// Stopping criterion for the sample-size search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Criterion {
    /// P(X <= m | n, θ) < α under a frequentist family.
    Frequentist {
        family: DistributionFamily,
        risk: RiskCriterion,
    },
    /// Credible bound of the posterior below the performance materiality.
    Bayesian(BayesianCriterion),
}

impl Criterion {
    fn family(&self) -> DistributionFamily {
        match self {
            Criterion::Frequentist { family, .. } => *family,
            Criterion::Bayesian(_) => DistributionFamily::Beta,
        }
    }

    fn tolerable_misstatements(&self) -> u64 {
        match self {
            Criterion::Frequentist { risk, .. } => risk.tolerable_misstatements(),
            Criterion::Bayesian(b) => b.tolerable_misstatements(),
        }
    }

    fn risk_level(&self) -> f64 {
        match self {
            Criterion::Frequentist { risk, .. } => risk.risk_level(),
            Criterion::Bayesian(b) => b.risk_level(),
        }
    }

    /// Rate the naive search bound is derived from.
    fn rate(&self) -> f64 {
        match self {
            Criterion::Frequentist { risk, .. } => risk.assumed_misstatement_rate(),
            Criterion::Bayesian(b) => b.performance_materiality(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SearchStrategy {
    /// Try every sample size in increasing order.
    #[default]
    Linear,
    /// Halve the search interval; relies on the risk being monotone in n.
    Bisection,
}

/// Minimal sufficient sample size and the statistics supporting it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PlanningResult {
    pub minimum_sample_size: u64,
    /// P(X <= m) at the planned size; for the beta family the posterior
    /// probability that the misstatement rate exceeds the materiality.
    pub cumulative_risk: f64,
    pub distribution_family: DistributionFamily,
    pub tolerable_misstatements: u64,
    pub risk_level: f64,
    pub credible_bound: Option<f64>,
}

/// Risk at a candidate sample size. The criterion holds when it is below
/// the risk level.
enum RiskEvaluator {
    Frequentist {
        model: Box<dyn MisstatementModel>,
        tolerable: u64,
    },
    Bayesian(BayesianCriterion),
}

impl RiskEvaluator {
    fn new(criterion: &Criterion) -> Result<Self> {
        match criterion {
            Criterion::Frequentist { family, risk } => Ok(RiskEvaluator::Frequentist {
                model: risk.model(*family)?,
                tolerable: risk.tolerable_misstatements(),
            }),
            Criterion::Bayesian(b) => Ok(RiskEvaluator::Bayesian(*b)),
        }
    }

    fn risk(&self, sample_size: u64) -> Result<f64> {
        match self {
            RiskEvaluator::Frequentist { model, tolerable } => model.cdf(*tolerable, sample_size),
            RiskEvaluator::Bayesian(b) => {
                let obs = SampleObservation::new(sample_size, b.tolerable_misstatements())?;
                let state = update(b.prior(), &obs)?;
                Ok(state.exceedance_probability(b.performance_materiality()))
            }
        }
    }

    fn max_sample_size(&self) -> Option<u64> {
        match self {
            RiskEvaluator::Frequentist { model, .. } => model.max_sample_size(),
            RiskEvaluator::Bayesian(_) => None,
        }
    }
}

/// Searches for the smallest sample size satisfying a [`Criterion`].
///
/// Both strategies start at the tolerable misstatement count, since no
/// smaller sample can satisfy either criterion, and return the same answer.
#[derive(Debug, Clone, Default)]
pub struct SampleSizePlanner {
    strategy: SearchStrategy,
    max_sample_size: Option<u64>,
}

impl SampleSizePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Caps the search; defaults to ten times a naive estimate.
    pub fn with_max_sample_size(mut self, max_sample_size: u64) -> Self {
        self.max_sample_size = Some(max_sample_size);
        self
    }

    pub fn plan_frequentist(
        &self,
        family: DistributionFamily,
        risk: &RiskCriterion,
    ) -> Result<PlanningResult> {
        self.plan(&Criterion::Frequentist {
            family,
            risk: *risk,
        })
    }

    pub fn plan_bayesian(&self, criterion: &BayesianCriterion) -> Result<PlanningResult> {
        self.plan(&Criterion::Bayesian(*criterion))
    }

    /// Plans with every frequentist family the criterion supports; the
    /// hypergeometric family is included only when a population is set.
    pub fn compare_families(&self, risk: &RiskCriterion) -> Result<Vec<PlanningResult>> {
        DistributionFamily::iter()
            .filter(|f| f.is_frequentist())
            .filter(|f| *f != DistributionFamily::Hypergeometric || risk.population_size().is_some())
            .map(|family| self.plan_frequentist(family, risk))
            .collect()
    }

    pub fn plan(&self, criterion: &Criterion) -> Result<PlanningResult> {
        let evaluator = RiskEvaluator::new(criterion)?;
        let alpha = criterion.risk_level();
        let start = criterion.tolerable_misstatements();
        let bound = self.search_bound(criterion, &evaluator)?;
        debug!(
            "Planning with {} criterion: m = {}, α = {}, {} search over n in [{}, {}]",
            criterion.family(),
            start,
            alpha,
            self.strategy,
            start,
            bound
        );
        let infeasible = || SamplingError::InfeasibleParameter {
            criterion: criterion.family().to_string(),
            search_bound: bound,
        };
        if start > bound {
            return Err(infeasible());
        }

        let (n, risk) = match self.strategy {
            SearchStrategy::Linear => {
                let mut found = None;
                for n in start..=bound {
                    let risk = evaluator.risk(n)?;
                    if risk < alpha {
                        found = Some((n, risk));
                        break;
                    }
                }
                found.ok_or_else(infeasible)?
            }
            SearchStrategy::Bisection => {
                let risk_at_bound = evaluator.risk(bound)?;
                if risk_at_bound >= alpha {
                    return Err(infeasible());
                }
                let (mut lo, mut hi, mut risk_at_hi) = (start, bound, risk_at_bound);
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    let risk = evaluator.risk(mid)?;
                    if risk < alpha {
                        hi = mid;
                        risk_at_hi = risk;
                    } else {
                        lo = mid + 1;
                    }
                }
                (hi, risk_at_hi)
            }
        };
        debug!(
            "Minimum sample size under {} criterion: {} (risk {:.6})",
            criterion.family(),
            n,
            risk
        );

        let credible_bound = match criterion {
            Criterion::Bayesian(b) => {
                let obs = SampleObservation::new(n, b.tolerable_misstatements())?;
                Some(update(b.prior(), &obs)?.credible_bound(b.confidence())?)
            }
            Criterion::Frequentist { .. } => None,
        };
        Ok(PlanningResult {
            minimum_sample_size: n,
            cumulative_risk: risk,
            distribution_family: criterion.family(),
            tolerable_misstatements: start,
            risk_level: alpha,
            credible_bound,
        })
    }

    fn search_bound(&self, criterion: &Criterion, evaluator: &RiskEvaluator) -> Result<u64> {
        let bound = match self.max_sample_size {
            Some(max) => max,
            None => {
                let m = criterion.tolerable_misstatements();
                let slots = m.checked_add(1).ok_or_else(|| {
                    SamplingError::invalid(
                        "tolerable_misstatements",
                        m as f64,
                        "too large to bound the sample size search",
                    )
                })?;
                // Saturates at u64::MAX for very small rates
                let per_misstatement = (-criterion.risk_level().ln() / criterion.rate()).ceil() as u64;
                10u64
                    .saturating_mul(slots)
                    .saturating_mul(per_misstatement)
                    .max(100)
            }
        };
        Ok(match evaluator.max_sample_size() {
            Some(max) => bound.min(max),
            None => bound,
        })
    }
}

/// P(X <= m) for a sample of `sample_size` items under `family`.
pub fn cumulative_risk(
    family: DistributionFamily,
    risk: &RiskCriterion,
    sample_size: u64,
) -> Result<f64> {
    risk.model(family)?
        .cdf(risk.tolerable_misstatements(), sample_size)
}
