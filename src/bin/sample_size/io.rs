use anyhow::Result;
use auditsampling_utils::planner::PlanningResult;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    #[serde(flatten)]
    pub result: PlanningResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_table: Option<Vec<f64>>,
}

pub fn write_reports<W: Write>(writer: W, reports: &[PlanReport]) -> Result<()> {
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, reports)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes to `out`, or stdout when no path is given.
pub fn write_reports_to(out: Option<&Path>, reports: &[PlanReport]) -> Result<()> {
    match out {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| anyhow::anyhow!("Could not create output file: {} ({})", path.display(), e))?;
            write_reports(BufWriter::new(file), reports)
        }
        None => write_reports(io::stdout().lock(), reports),
    }
}
