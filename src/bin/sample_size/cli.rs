use auditsampling_utils::planner::SearchStrategy;
use clap::{Parser, ValueEnum};

/// Plans the minimum audit sample size for a frequentist or Bayesian criterion.
#[derive(Parser, Debug)]
#[command(name = "sample_size", version, about = "Minimum sample size for audit sampling")]
pub struct Cli {
    #[arg(
        value_enum,
        long,
        short,
        default_value = "binomial",
        value_name = "CRITERION",
        help = "Probability model used to evaluate the sampling risk"
    )]
    pub criterion: CriterionKind,

    #[arg(
        long,
        default_value = "0.03",
        help = "Assumed population misstatement rate (frequentist criteria)"
    )]
    pub rate: f64,

    #[arg(
        long,
        short,
        default_value = "0",
        help = "Number of misstatements tolerated in the sample"
    )]
    pub tolerable: u64,

    #[arg(long, short, default_value = "0.05", help = "Sampling risk")]
    pub risk: f64,

    #[arg(long, help = "Population size (required for the hypergeometric criterion)")]
    pub population: Option<u64>,

    #[arg(
        long,
        help = "Misstatements in the population, defaults to rate x population"
    )]
    pub population_misstatements: Option<u64>,

    #[arg(
        long,
        default_value = "0.05",
        help = "Performance materiality (Bayesian criterion)"
    )]
    pub materiality: f64,

    #[arg(long, default_value = "1.0", help = "Prior alpha (Bayesian criterion)")]
    pub prior_alpha: f64,

    #[arg(long, default_value = "1.0", help = "Prior beta (Bayesian criterion)")]
    pub prior_beta: f64,

    #[arg(long, help = "Largest sample size to consider")]
    pub max_sample_size: Option<u64>,

    #[arg(value_enum, long, default_value = "linear", help = "Search strategy")]
    pub search: SearchKind,

    #[arg(
        long,
        default_value_t = false,
        help = "Plan with every frequentist distribution"
    )]
    pub compare: bool,

    #[arg(
        long,
        value_name = "MAX_K",
        help = "Include P(X = k) for k = 0..=MAX_K at the planned sample size"
    )]
    pub table: Option<u64>,

    #[arg(long, short, value_name = "OUT", help = "Output JSON file, stdout if omitted")]
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
pub enum CriterionKind {
    Binomial,
    Poisson,
    Hypergeometric,
    Bayesian,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Linear,
    Bisection,
}

impl From<SearchKind> for SearchStrategy {
    fn from(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Linear => SearchStrategy::Linear,
            SearchKind::Bisection => SearchStrategy::Bisection,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Normal,
    Silent,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Verbose => write!(f, "verbose"),
            LogLevel::Normal => write!(f, "normal"),
            LogLevel::Silent => write!(f, "silent"),
        }
    }
}
