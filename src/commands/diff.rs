//! diff subcommand - run a comparison and render the result stream

use crate::client;
use crate::config::{Aliases, OutputConfig};
use crate::diff::{self, DiffOptions};
use crate::ui::{render, ScanSpinner};
use anyhow::bail;

/// Compare two locations and print one line per difference.
///
/// Differences go to stdout, failure records to stderr. The command fails if
/// any failure was streamed; differences alone exit cleanly so scripts can
/// tell "trees differ" from "comparison broke".
pub async fn run(
    first: &str,
    second: &str,
    recursive: bool,
    aliases: &Aliases,
    output: &OutputConfig,
) -> anyhow::Result<()> {
    let first = client::connect(&aliases.expand(first))?;
    let second = client::connect(&aliases.expand(second))?;

    let mut options = DiffOptions {
        recursive,
        progress: None,
    };
    if recursive && output.progress_enabled() {
        options.progress = Some(ScanSpinner::new());
    }

    let mut stream = diff::diff(first, second, options);
    let mut failures = 0usize;
    while let Some(record) = stream.recv().await {
        let line = render(&record, output.json);
        if record.is_failure() {
            failures += 1;
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    if failures > 0 {
        bail!("{} error(s) during comparison", failures);
    }
    Ok(())
}
