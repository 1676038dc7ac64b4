use crate::error::{Result, SamplingError, check_open_unit};
use statrs::distribution::{Binomial, Discrete, DiscreteCDF, Hypergeometric, Poisson};
use strum_macros::{Display, EnumIter, EnumString};

/// Probability family behind a planning result. `Beta` tags the Bayesian
/// credible-bound criterion; the others are frequentist sampling models.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DistributionFamily {
    Binomial,
    Poisson,
    Hypergeometric,
    Beta,
}

impl DistributionFamily {
    pub fn is_frequentist(&self) -> bool {
        !matches!(self, DistributionFamily::Beta)
    }
}

/// Distribution of the number of misstatements X in a sample of n items.
pub trait MisstatementModel {
    fn family(&self) -> DistributionFamily;

    /// P(X = k) in a sample of `sample_size` items.
    fn pmf(&self, k: u64, sample_size: u64) -> Result<f64>;

    /// P(X <= m) in a sample of `sample_size` items.
    fn cdf(&self, m: u64, sample_size: u64) -> Result<f64>;

    /// Largest sample the model can describe, if bounded.
    fn max_sample_size(&self) -> Option<u64> {
        None
    }
}

/// Sampling with replacement: X ~ Binomial(n, θ).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialModel {
    rate: f64,
}

impl BinomialModel {
    pub fn new(rate: f64) -> Result<Self> {
        Ok(Self {
            rate: check_open_unit("rate", rate)?,
        })
    }

    fn distribution(&self, sample_size: u64) -> Result<Binomial> {
        Binomial::new(self.rate, sample_size)
            .map_err(|_| SamplingError::invalid("rate", self.rate, "rejected by the binomial distribution"))
    }
}

impl MisstatementModel for BinomialModel {
    fn family(&self) -> DistributionFamily {
        DistributionFamily::Binomial
    }

    fn pmf(&self, k: u64, sample_size: u64) -> Result<f64> {
        Ok(self.distribution(sample_size)?.pmf(k))
    }

    fn cdf(&self, m: u64, sample_size: u64) -> Result<f64> {
        Ok(self.distribution(sample_size)?.cdf(m))
    }
}

/// Poisson approximation with mean n·θ, recomputed for every sample size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonModel {
    rate: f64,
}

impl PoissonModel {
    pub fn new(rate: f64) -> Result<Self> {
        Ok(Self {
            rate: check_open_unit("rate", rate)?,
        })
    }

    /// `None` for an empty sample, where all mass sits at zero.
    fn distribution(&self, sample_size: u64) -> Result<Option<Poisson>> {
        if sample_size == 0 {
            return Ok(None);
        }
        let mean = sample_size as f64 * self.rate;
        Poisson::new(mean)
            .map(Some)
            .map_err(|_| SamplingError::invalid("mean", mean, "rejected by the Poisson distribution"))
    }
}

impl MisstatementModel for PoissonModel {
    fn family(&self) -> DistributionFamily {
        DistributionFamily::Poisson
    }

    fn pmf(&self, k: u64, sample_size: u64) -> Result<f64> {
        Ok(match self.distribution(sample_size)? {
            Some(dist) => dist.pmf(k),
            None if k == 0 => 1.0,
            None => 0.0,
        })
    }

    fn cdf(&self, m: u64, sample_size: u64) -> Result<f64> {
        Ok(match self.distribution(sample_size)? {
            Some(dist) => dist.cdf(m),
            None => 1.0,
        })
    }
}

/// Sampling without replacement from a finite population of `population`
/// items, `misstatements` of which are in error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HypergeometricModel {
    population: u64,
    misstatements: u64,
}

impl HypergeometricModel {
    pub fn new(population: u64, misstatements: u64) -> Result<Self> {
        if population == 0 {
            return Err(SamplingError::invalid(
                "population_size",
                0.0,
                "must contain at least one item",
            ));
        }
        if misstatements > population {
            return Err(SamplingError::invalid(
                "population_misstatements",
                misstatements as f64,
                "cannot exceed the population size",
            ));
        }
        Ok(Self {
            population,
            misstatements,
        })
    }

    /// Population misstatements implied by a rate, round(θ·N).
    pub fn from_rate(population: u64, rate: f64) -> Result<Self> {
        let rate = check_open_unit("rate", rate)?;
        Self::new(population, (rate * population as f64).round() as u64)
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn misstatements(&self) -> u64 {
        self.misstatements
    }

    fn distribution(&self, sample_size: u64) -> Result<Hypergeometric> {
        if sample_size > self.population {
            return Err(SamplingError::invalid(
                "sample_size",
                sample_size as f64,
                "cannot exceed the population size",
            ));
        }
        Hypergeometric::new(self.population, self.misstatements, sample_size).map_err(|_| {
            SamplingError::invalid(
                "sample_size",
                sample_size as f64,
                "rejected by the hypergeometric distribution",
            )
        })
    }
}

impl MisstatementModel for HypergeometricModel {
    fn family(&self) -> DistributionFamily {
        DistributionFamily::Hypergeometric
    }

    fn pmf(&self, k: u64, sample_size: u64) -> Result<f64> {
        Ok(self.distribution(sample_size)?.pmf(k))
    }

    fn cdf(&self, m: u64, sample_size: u64) -> Result<f64> {
        Ok(self.distribution(sample_size)?.cdf(m))
    }

    fn max_sample_size(&self) -> Option<u64> {
        Some(self.population)
    }
}

/// P(X = k) for k = 0..=max_k, the bars of a probability chart.
pub fn probability_table(
    model: &dyn MisstatementModel,
    sample_size: u64,
    max_k: u64,
) -> Result<Vec<f64>> {
    (0..=max_k).map(|k| model.pmf(k, sample_size)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_family_strings() {
        for (family, s) in [
            (DistributionFamily::Binomial, "binomial"),
            (DistributionFamily::Poisson, "poisson"),
            (DistributionFamily::Hypergeometric, "hypergeometric"),
            (DistributionFamily::Beta, "beta"),
        ] {
            assert_eq!(family.to_string(), s);
            assert_eq!(s.parse::<DistributionFamily>().unwrap(), family);
        }
        assert!("normal".parse::<DistributionFamily>().is_err());
        let frequentist = DistributionFamily::iter()
            .filter(|f| f.is_frequentist())
            .count();
        assert_eq!(frequentist, 3);
    }

    #[test]
    fn test_binomial() {
        let model = BinomialModel::new(0.03).unwrap();
        // 0.97^60
        assert!(close(model.pmf(0, 60).unwrap(), 0.97_f64.powi(60), 1e-12));
        assert!(close(model.cdf(0, 99).unwrap(), 0.0490232, 1e-6));
        assert!(close(model.cdf(0, 98).unwrap(), 0.0505394, 1e-6));
        assert!(close(model.cdf(1, 157).unwrap(), 0.0490613, 1e-6));
        assert_eq!(model.cdf(0, 0).unwrap(), 1.0);
        assert!(BinomialModel::new(0.0).is_err());
        assert!(BinomialModel::new(1.0).is_err());
    }

    #[test]
    fn test_poisson() {
        let model = PoissonModel::new(0.05).unwrap();
        assert!(close(model.pmf(0, 59).unwrap(), (-2.95_f64).exp(), 1e-12));
        assert!(close(model.cdf(0, 60).unwrap(), (-3.0_f64).exp(), 1e-12));
        assert!(close(model.cdf(1, 59).unwrap(), (-2.95_f64).exp() * 3.95, 1e-12));
        assert_eq!(model.pmf(0, 0).unwrap(), 1.0);
        assert_eq!(model.pmf(1, 0).unwrap(), 0.0);
        assert_eq!(model.cdf(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_hypergeometric() {
        let model = HypergeometricModel::new(500, 25).unwrap();
        assert!(close(model.cdf(0, 59).unwrap(), 0.0398647, 1e-6));
        assert!(close(model.cdf(0, 55).unwrap(), 0.0502784, 1e-6));
        assert!(close(model.cdf(1, 59).unwrap(), 0.1808728, 1e-6));
        assert_eq!(model.max_sample_size(), Some(500));
        assert!(model.cdf(0, 501).is_err());
        assert_eq!(model.cdf(0, 0).unwrap(), 1.0);
        assert!(HypergeometricModel::new(10, 11).is_err());
        assert!(HypergeometricModel::new(0, 0).is_err());
    }

    #[test]
    fn test_hypergeometric_from_rate() {
        let model = HypergeometricModel::from_rate(500, 0.05).unwrap();
        assert_eq!(model.misstatements(), 25);
        assert_eq!(model.population(), 500);
        let model = HypergeometricModel::from_rate(400, 0.03).unwrap();
        assert_eq!(model.misstatements(), 12);
        assert!(HypergeometricModel::from_rate(400, 1.0).is_err());
    }

    #[test]
    fn test_family_ordering() {
        let binomial = BinomialModel::new(0.05).unwrap();
        let poisson = PoissonModel::new(0.05).unwrap();
        let hyper = HypergeometricModel::new(500, 25).unwrap();
        for m in 0..3 {
            let h = hyper.cdf(m, 59).unwrap();
            let b = binomial.cdf(m, 59).unwrap();
            let p = poisson.cdf(m, 59).unwrap();
            assert!(h <= b && b <= p, "m = {}: {} {} {}", m, h, b, p);
        }
    }

    #[test]
    fn test_probability_table() {
        let model = BinomialModel::new(0.03).unwrap();
        let table = probability_table(&model, 60, 4).unwrap();
        assert_eq!(table.len(), 5);
        assert!(close(table[0], 0.97_f64.powi(60), 1e-12));
        assert!(close(table[1], 60.0 * 0.03 * 0.97_f64.powi(59), 1e-12));
        assert!(table.iter().sum::<f64>() < 1.0);
        let hyper = HypergeometricModel::new(500, 25).unwrap();
        let table = probability_table(&hyper, 59, 4).unwrap();
        assert!(close(table[0], 0.0398647, 1e-6));
    }
}
