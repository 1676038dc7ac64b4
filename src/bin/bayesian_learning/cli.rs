use auditsampling_utils::{observation::OutcomeSequence, prior::PriorSpecification};
use clap::{Parser, ValueEnum};

/// Follows the posterior through an audit sample, one item at a time.
#[derive(Parser, Debug)]
#[command(name = "bayesian_learning", version, about = "Bayesian learning cycle for audit samples")]
pub struct Cli {
    #[arg(
        long,
        value_name = "OUTCOMES",
        help = "Audited items in order, 0 or . for correct and 1 or x for a misstatement"
    )]
    pub outcomes: Option<OutcomeSequence>,

    #[arg(
        long,
        short = 'n',
        default_value = "92",
        conflicts_with = "outcomes",
        help = "Sample size when no outcomes are given"
    )]
    pub sample_size: u64,

    #[arg(
        long,
        short = 'k',
        default_value = "1",
        conflicts_with = "outcomes",
        help = "Misstatements when no outcomes are given, found at the end of the sample"
    )]
    pub misstatements: u64,

    #[arg(
        long = "prior",
        value_name = "ALPHA,BETA",
        help = "Prior distribution, repeat to compare several (default 1,1)"
    )]
    pub priors: Vec<PriorSpecification>,

    #[arg(long, default_value = "0.95", help = "Confidence of the upper bound")]
    pub confidence: f64,

    #[arg(long, default_value = "0.05", help = "Performance materiality")]
    pub materiality: f64,

    #[arg(long, short, value_name = "OUT", help = "Output TSV file, stdout if omitted")]
    pub out: Option<String>,

    #[arg(
        value_enum,
        long,
        default_value = "normal",
        value_name = "VERBOSITY",
        help = "Verbosity level"
    )]
    pub verbosity: LogLevel,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Normal,
    Silent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["bayesian_learning"]);
        assert!(cli.outcomes.is_none());
        assert_eq!((cli.sample_size, cli.misstatements), (92, 1));
        assert!(cli.priors.is_empty());
        assert_eq!(cli.confidence, 0.95);
        assert_eq!(cli.verbosity, LogLevel::Normal);
    }

    #[test]
    fn test_priors_and_outcomes() {
        let cli = Cli::parse_from([
            "bayesian_learning",
            "--outcomes",
            "0001",
            "--prior",
            "1,1",
            "--prior",
            "2,35",
        ]);
        assert_eq!(cli.outcomes.unwrap().len(), 4);
        assert_eq!(cli.priors.len(), 2);
        assert_eq!(cli.priors[1], PriorSpecification::new(2.0, 35.0).unwrap());
        assert!(Cli::try_parse_from(["bayesian_learning", "--prior", "0,1"]).is_err());
        assert!(Cli::try_parse_from(["bayesian_learning", "--outcomes", "01a"]).is_err());
        assert!(
            Cli::try_parse_from(["bayesian_learning", "--outcomes", "01", "-n", "3"]).is_err()
        );
    }
}
