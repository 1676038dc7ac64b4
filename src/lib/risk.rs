use crate::distribution::{
    BinomialModel, DistributionFamily, HypergeometricModel, MisstatementModel, PoissonModel,
};
use crate::error::{Result, SamplingError, check_open_unit};
use crate::prior::PriorSpecification;

/// Tolerance and risk configuration for frequentist sample-size planning.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RiskCriterion {
    tolerable_misstatements: u64,
    risk_level: f64,
    assumed_misstatement_rate: f64,
    population_size: Option<u64>,
    population_misstatements: Option<u64>,
}

impl RiskCriterion {
    pub fn new(
        assumed_misstatement_rate: f64,
        tolerable_misstatements: u64,
        risk_level: f64,
    ) -> Result<Self> {
        Ok(Self {
            tolerable_misstatements,
            risk_level: check_open_unit("risk_level", risk_level)?,
            assumed_misstatement_rate: check_open_unit(
                "assumed_misstatement_rate",
                assumed_misstatement_rate,
            )?,
            population_size: None,
            population_misstatements: None,
        })
    }

    /// Finite population for the hypergeometric family.
    pub fn with_population(mut self, population_size: u64) -> Result<Self> {
        if population_size == 0 {
            return Err(SamplingError::invalid(
                "population_size",
                0.0,
                "must contain at least one item",
            ));
        }
        if let Some(d) = self.population_misstatements {
            if d > population_size {
                return Err(SamplingError::invalid(
                    "population_misstatements",
                    d as f64,
                    "cannot exceed the population size",
                ));
            }
        }
        self.population_size = Some(population_size);
        Ok(self)
    }

    /// Overrides the population misstatement count, round(θ·N) by default.
    pub fn with_population_misstatements(mut self, misstatements: u64) -> Result<Self> {
        if let Some(n) = self.population_size {
            if misstatements > n {
                return Err(SamplingError::invalid(
                    "population_misstatements",
                    misstatements as f64,
                    "cannot exceed the population size",
                ));
            }
        }
        self.population_misstatements = Some(misstatements);
        Ok(self)
    }

    pub fn tolerable_misstatements(&self) -> u64 {
        self.tolerable_misstatements
    }

    pub fn risk_level(&self) -> f64 {
        self.risk_level
    }

    pub fn assumed_misstatement_rate(&self) -> f64 {
        self.assumed_misstatement_rate
    }

    pub fn population_size(&self) -> Option<u64> {
        self.population_size
    }

    /// Misstatements assumed in the population, when a population is set.
    pub fn population_misstatements(&self) -> Option<u64> {
        self.population_size.map(|n| {
            self.population_misstatements
                .unwrap_or_else(|| (self.assumed_misstatement_rate * n as f64).round() as u64)
        })
    }

    /// Sampling model for `family` under this criterion.
    pub fn model(&self, family: DistributionFamily) -> Result<Box<dyn MisstatementModel>> {
        match family {
            DistributionFamily::Binomial => {
                Ok(Box::new(BinomialModel::new(self.assumed_misstatement_rate)?))
            }
            DistributionFamily::Poisson => {
                Ok(Box::new(PoissonModel::new(self.assumed_misstatement_rate)?))
            }
            DistributionFamily::Hypergeometric => {
                match (self.population_size, self.population_misstatements()) {
                    (Some(n), Some(_)) if self.tolerable_misstatements >= n => {
                        Err(SamplingError::invalid(
                            "tolerable_misstatements",
                            self.tolerable_misstatements as f64,
                            "must be below the population size",
                        ))
                    }
                    (Some(n), Some(d)) => Ok(Box::new(HypergeometricModel::new(n, d)?)),
                    _ => Err(SamplingError::invalid(
                        "population_size",
                        f64::NAN,
                        "required for the hypergeometric family",
                    )),
                }
            }
            DistributionFamily::Beta => Err(SamplingError::invalid(
                "distribution_family",
                f64::NAN,
                "beta is not a sampling model for misstatement counts",
            )),
        }
    }
}

/// Bayesian planning: the posterior after a hypothetical sample of n items
/// with `tolerable_misstatements` errors must have its `1 - risk_level`
/// credible bound below `performance_materiality`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BayesianCriterion {
    prior: PriorSpecification,
    performance_materiality: f64,
    tolerable_misstatements: u64,
    risk_level: f64,
}

impl BayesianCriterion {
    pub fn new(
        performance_materiality: f64,
        tolerable_misstatements: u64,
        risk_level: f64,
    ) -> Result<Self> {
        Ok(Self {
            prior: PriorSpecification::uniform(),
            performance_materiality: check_open_unit(
                "performance_materiality",
                performance_materiality,
            )?,
            tolerable_misstatements,
            risk_level: check_open_unit("risk_level", risk_level)?,
        })
    }

    pub fn with_prior(mut self, prior: PriorSpecification) -> Self {
        self.prior = prior;
        self
    }

    pub fn prior(&self) -> &PriorSpecification {
        &self.prior
    }

    pub fn performance_materiality(&self) -> f64 {
        self.performance_materiality
    }

    pub fn tolerable_misstatements(&self) -> u64 {
        self.tolerable_misstatements
    }

    pub fn risk_level(&self) -> f64 {
        self.risk_level
    }

    /// Confidence of the credible bound, 1 - risk level.
    pub fn confidence(&self) -> f64 {
        1.0 - self.risk_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let criterion = RiskCriterion::new(0.03, 0, 0.05).unwrap();
        assert_eq!(criterion.assumed_misstatement_rate(), 0.03);
        assert_eq!(criterion.tolerable_misstatements(), 0);
        assert_eq!(criterion.risk_level(), 0.05);
        assert_eq!(criterion.population_size(), None);
        assert_eq!(criterion.population_misstatements(), None);
        assert!(RiskCriterion::new(1.0, 0, 0.05).is_err());
        assert!(RiskCriterion::new(0.03, 0, 1.0).is_err());
        assert!(RiskCriterion::new(0.03, 0, 0.0).is_err());
        assert!(matches!(
            RiskCriterion::new(-0.1, 0, 0.05),
            Err(SamplingError::InvalidParameter {
                name: "assumed_misstatement_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_population() {
        let criterion = RiskCriterion::new(0.05, 0, 0.05)
            .unwrap()
            .with_population(500)
            .unwrap();
        assert_eq!(criterion.population_misstatements(), Some(25));
        let criterion = criterion.with_population_misstatements(30).unwrap();
        assert_eq!(criterion.population_misstatements(), Some(30));
        assert!(criterion.with_population_misstatements(501).is_err());
        assert!(RiskCriterion::new(0.05, 0, 0.05).unwrap().with_population(0).is_err());
        // Misstatement override set before the population is checked on attach
        let early = RiskCriterion::new(0.05, 0, 0.05)
            .unwrap()
            .with_population_misstatements(30)
            .unwrap();
        assert!(early.with_population(20).is_err());
    }

    #[test]
    fn test_model() {
        let criterion = RiskCriterion::new(0.05, 0, 0.05).unwrap();
        assert_eq!(
            criterion.model(DistributionFamily::Binomial).unwrap().family(),
            DistributionFamily::Binomial
        );
        assert_eq!(
            criterion.model(DistributionFamily::Poisson).unwrap().family(),
            DistributionFamily::Poisson
        );
        assert!(criterion.model(DistributionFamily::Hypergeometric).is_err());
        assert!(criterion.model(DistributionFamily::Beta).is_err());
        let model = criterion
            .with_population(500)
            .unwrap()
            .model(DistributionFamily::Hypergeometric)
            .unwrap();
        assert_eq!(model.max_sample_size(), Some(500));
    }

    #[test]
    fn test_hypergeometric_tolerable_count() {
        let criterion = RiskCriterion::new(0.05, 20, 0.05)
            .unwrap()
            .with_population(10)
            .unwrap();
        assert!(matches!(
            criterion.model(DistributionFamily::Hypergeometric),
            Err(SamplingError::InvalidParameter {
                name: "tolerable_misstatements",
                ..
            })
        ));
        assert!(criterion.model(DistributionFamily::Binomial).is_ok());
        let at_population = RiskCriterion::new(0.05, 10, 0.05)
            .unwrap()
            .with_population(10)
            .unwrap();
        assert!(at_population.model(DistributionFamily::Hypergeometric).is_err());
        let below = RiskCriterion::new(0.05, 9, 0.05)
            .unwrap()
            .with_population(10)
            .unwrap();
        assert!(below.model(DistributionFamily::Hypergeometric).is_ok());
    }

    #[test]
    fn test_bayesian_criterion() {
        let criterion = BayesianCriterion::new(0.05, 1, 0.05).unwrap();
        assert!(criterion.prior().is_uniform());
        assert!((criterion.confidence() - 0.95).abs() < 1e-15);
        let prior = PriorSpecification::new(2.0, 35.0).unwrap();
        assert_eq!(criterion.with_prior(prior).prior(), &prior);
        assert!(BayesianCriterion::new(0.0, 0, 0.05).is_err());
        assert!(BayesianCriterion::new(0.05, 0, 1.0).is_err());
    }
}
