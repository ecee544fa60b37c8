//! mb subcommand - make a bucket or folder at each target

use crate::client;
use crate::config::{Aliases, OutputConfig};
use anyhow::Context;
use serde_json::json;

pub async fn run(
    targets: &[String],
    aliases: &Aliases,
    output: &OutputConfig,
) -> anyhow::Result<()> {
    for target in targets {
        let client = client::connect(&aliases.expand(target))?;
        client
            .make_bucket()
            .await
            .with_context(|| format!("unable to create bucket at '{}'", client.url()))?;

        if output.json {
            println!(
                "{}",
                json!({ "status": "created", "url": client.url().to_string() })
            );
        } else if !output.quiet {
            println!("Bucket created successfully: {}", client.url());
        }
    }
    Ok(())
}
