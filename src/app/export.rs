use std::path::Path;

use serde_json::Value;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::batch::TrialResult;

use super::report::{summary_json, tagged, trial_json};
use crate::metrics::BatchSummary;

/// Writes the run document, pretty-printed.
pub(crate) async fn export_json(path: &Path, document: &Value) -> Result<(), std::io::Error> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    let json = serde_json::to_vec_pretty(document).map_err(std::io::Error::other)?;
    writer.write_all(&json).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// One summary line, then one line per trial in index order.
pub(crate) async fn export_jsonl(
    path: &Path,
    summary: &BatchSummary,
    results: &[TrialResult],
) -> Result<(), std::io::Error> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);

    let summary_line =
        serde_json::to_vec(&tagged("summary", summary_json(summary))).map_err(std::io::Error::other)?;
    writer.write_all(&summary_line).await?;
    writer.write_all(b"\n").await?;

    for result in results {
        let line =
            serde_json::to_vec(&tagged("trial", trial_json(result))).map_err(std::io::Error::other)?;
        writer.write_all(&line).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;
    Ok(())
}
