use crate::cli::{Cli, CriterionKind};
use crate::io::PlanReport;
use anyhow::{Result, anyhow};
use auditsampling_utils::{
    distribution::{DistributionFamily, probability_table},
    planner::{PlanningResult, SampleSizePlanner},
    prior::PriorSpecification,
    risk::{BayesianCriterion, RiskCriterion},
};
use log::{debug, info};

impl CriterionKind {
    fn family(&self) -> DistributionFamily {
        match self {
            CriterionKind::Binomial => DistributionFamily::Binomial,
            CriterionKind::Poisson => DistributionFamily::Poisson,
            CriterionKind::Hypergeometric => DistributionFamily::Hypergeometric,
            CriterionKind::Bayesian => DistributionFamily::Beta,
        }
    }
}

fn risk_criterion(args: &Cli) -> Result<RiskCriterion> {
    let mut risk = RiskCriterion::new(args.rate, args.tolerable, args.risk)?;
    if let Some(d) = args.population_misstatements {
        risk = risk.with_population_misstatements(d)?;
    }
    if let Some(n) = args.population {
        risk = risk.with_population(n)?;
    }
    Ok(risk)
}

fn planner(args: &Cli) -> SampleSizePlanner {
    let planner = SampleSizePlanner::new().with_strategy(args.search.into());
    match args.max_sample_size {
        Some(max) => planner.with_max_sample_size(max),
        None => planner,
    }
}

fn with_table(
    result: PlanningResult,
    risk: &RiskCriterion,
    max_k: Option<u64>,
) -> Result<PlanReport> {
    let probability_table = match max_k {
        Some(max_k) if result.distribution_family.is_frequentist() => {
            let model = risk.model(result.distribution_family)?;
            Some(probability_table(
                model.as_ref(),
                result.minimum_sample_size,
                max_k,
            )?)
        }
        _ => None,
    };
    Ok(PlanReport {
        result,
        probability_table,
    })
}

/// Runs the planner as configured on the command line.
pub fn sample_size(args: &Cli) -> Result<Vec<PlanReport>> {
    let planner = planner(args);
    let mut reports = Vec::new();

    if args.criterion == CriterionKind::Bayesian {
        if args.compare {
            return Err(anyhow!("--compare applies to the frequentist criteria only"));
        }
        let prior = PriorSpecification::new(args.prior_alpha, args.prior_beta)?;
        let criterion =
            BayesianCriterion::new(args.materiality, args.tolerable, args.risk)?.with_prior(prior);
        info!(
            "Planning with prior {} and performance materiality {}",
            prior, args.materiality
        );
        reports.push(PlanReport {
            result: planner.plan_bayesian(&criterion)?,
            probability_table: None,
        });
    } else {
        let risk = risk_criterion(args)?;
        let results = if args.compare {
            info!("Planning with every frequentist distribution");
            planner.compare_families(&risk)?
        } else {
            vec![planner.plan_frequentist(args.criterion.family(), &risk)?]
        };
        for result in results {
            reports.push(with_table(result, &risk, args.table)?);
        }
    }

    for report in reports.iter() {
        let result = &report.result;
        info!(
            "{}: minimum sample size {} (risk {:.4} < {})",
            result.distribution_family,
            result.minimum_sample_size,
            result.cumulative_risk,
            result.risk_level
        );
        if let Some(bound) = result.credible_bound {
            debug!("Credible bound at planned size: {:.4}", bound);
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run(args: &[&str]) -> Result<Vec<PlanReport>> {
        let mut argv = vec!["sample_size"];
        argv.extend_from_slice(args);
        sample_size(&Cli::parse_from(argv))
    }

    #[test]
    fn test_default_binomial() {
        let reports = run(&[]).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].result.minimum_sample_size, 99);
        assert!(reports[0].probability_table.is_none());
    }

    #[test]
    fn test_compare_with_table() {
        let reports = run(&[
            "--rate", "0.05", "--population", "500", "--compare", "--table", "4",
        ])
        .unwrap();
        let sizes = reports
            .iter()
            .map(|r| r.result.minimum_sample_size)
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![59, 60, 56]);
        for report in reports.iter() {
            assert_eq!(report.probability_table.as_ref().unwrap().len(), 5);
        }
    }

    #[test]
    fn test_bayesian() {
        let reports = run(&["--criterion", "bayesian", "--tolerable", "1"]).unwrap();
        assert_eq!(reports[0].result.minimum_sample_size, 92);
        assert!(reports[0].result.credible_bound.is_some());
        assert!(run(&["--criterion", "bayesian", "--compare"]).is_err());
        assert!(run(&["--criterion", "bayesian", "--prior-alpha", "0"]).is_err());
    }

    #[test]
    fn test_invalid_input() {
        assert!(run(&["--rate", "1.5"]).is_err());
        assert!(run(&["--criterion", "hypergeometric"]).is_err());
        assert!(run(&["--max-sample-size", "10"]).is_err());
        assert!(run(&["--population", "10", "--population-misstatements", "11"]).is_err());
        assert!(run(&["--tolerable", "18446744073709551615"]).is_err());
        assert!(
            run(&["--criterion", "hypergeometric", "--population", "10", "--tolerable", "10"])
                .is_err()
        );
    }
}
