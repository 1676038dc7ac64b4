use crate::cli::Cli;
use anyhow::Result;
use auditsampling_utils::{
    observation::OutcomeSequence,
    posterior::{LearningStep, compare_priors},
    prior::PriorSpecification,
};
use itertools::Itertools;
use log::info;

pub type Trajectories = Vec<(PriorSpecification, Vec<LearningStep>)>;

/// Outcomes from the command line; without `--outcomes` the misstatements
/// are placed at the end of the sample.
fn outcomes(args: &Cli) -> Result<OutcomeSequence> {
    match &args.outcomes {
        Some(outcomes) => Ok(outcomes.clone()),
        None => Ok(OutcomeSequence::misstatements_last(
            args.sample_size,
            args.misstatements,
        )?),
    }
}

pub fn bayesian_learning(args: &Cli) -> Result<Trajectories> {
    let outcomes = outcomes(args)?;
    let priors = if args.priors.is_empty() {
        vec![PriorSpecification::uniform()]
    } else {
        args.priors.clone()
    };
    let observation = outcomes.observation();
    info!(
        "Learning from {} items with {} misstatements under: {}",
        observation.sample_size(),
        observation.misstatements(),
        priors.iter().join(", ")
    );

    let trajectories = compare_priors(
        &priors,
        &outcomes.0,
        args.confidence,
        Some(args.materiality),
    )?;
    for (prior, steps) in trajectories.iter() {
        let first_below = steps.iter().find(|s| s.below_materiality == Some(true));
        match first_below {
            Some(step) => info!(
                "{}: upper bound {:.3} below materiality {} after {} items ({} misstatements)",
                prior, step.credible_bound, args.materiality, step.sample_size, step.misstatements
            ),
            None => info!(
                "{}: upper bound never below materiality {}",
                prior, args.materiality
            ),
        }
    }
    Ok(trajectories)
}
