use anyhow::Result;
use auditsampling_utils::{posterior::LearningStep, prior::PriorSpecification};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One row of the trajectory table.
#[derive(Debug, Serialize)]
struct TrajectoryRecord {
    prior_alpha: f64,
    prior_beta: f64,
    sample_size: u64,
    misstatements: u64,
    posterior_alpha: f64,
    posterior_beta: f64,
    mean: f64,
    credible_bound: f64,
    below_materiality: Option<bool>,
}

pub struct TrajectoryWriter<W: Write> {
    writer: Writer<W>,
}

impl TrajectoryWriter<File> {
    pub fn from_path(file_path: &Path) -> Result<Self> {
        let file = File::create(file_path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(writer: W) -> Self {
        let writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(writer);
        Self { writer }
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.writer.write_record([
            "prior_alpha",
            "prior_beta",
            "sample_size",
            "misstatements",
            "posterior_alpha",
            "posterior_beta",
            "mean",
            "credible_bound",
            "below_materiality",
        ])?;
        Ok(())
    }

    pub fn write_trajectory(
        &mut self,
        prior: &PriorSpecification,
        steps: &[LearningStep],
    ) -> Result<()> {
        for step in steps {
            self.writer.serialize(TrajectoryRecord {
                prior_alpha: prior.alpha(),
                prior_beta: prior.beta(),
                sample_size: step.sample_size,
                misstatements: step.misstatements,
                posterior_alpha: step.posterior_alpha,
                posterior_beta: step.posterior_beta,
                mean: step.mean,
                credible_bound: step.credible_bound,
                below_materiality: step.below_materiality,
            })?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
