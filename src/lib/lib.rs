//! Statistics kernel for audit sampling: conjugate beta priors and
//! posteriors, credible upper bounds, and minimal sample sizes under the
//! binomial, Poisson, hypergeometric and Bayesian criteria.

pub mod distribution;
pub mod error;
pub mod observation;
pub mod planner;
pub mod posterior;
pub mod prior;
pub mod risk;
