//! Plain-text export of weekly summaries

use crate::domain::WeeklySummary;
use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::info;

/// Render summaries as `label\nsummary\n\n` blocks, in the given order
pub fn render_export(summaries: &[WeeklySummary]) -> String {
    let mut output = String::new();
    for week in summaries {
        output.push_str(&week.label);
        output.push('\n');
        output.push_str(&week.summary);
        output.push_str("\n\n");
    }
    output
}

/// Write summaries to `path`, replacing whatever is there
pub fn export_summaries(path: &Path, summaries: &[WeeklySummary]) -> Result<()> {
    fs::write(path, render_export(summaries))?;
    info!(path = %path.display(), weeks = summaries.len(), "exported summaries");
    Ok(())
}
