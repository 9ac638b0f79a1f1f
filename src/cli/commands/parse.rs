//! Parse command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::loader::{LoaderOptions, VttLoader};
use anyhow::Result;

/// Run the parse command.
pub async fn run_parse(
    file: &str,
    combine: bool,
    chunk_size: Option<usize>,
    format: &str,
    settings: Settings,
) -> Result<()> {
    let mut options: LoaderOptions = settings.loader.to_options();
    if combine {
        options.combine_segments = true;
    }
    if let Some(size) = chunk_size {
        options.segments_per_chunk = size;
    }

    let loader = VttLoader::new(Settings::expand_path(file), options)?;
    let records = loader.load().await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        "table" => {
            Output::header(&format!("{} ({} records)", file, records.len()));
            for record in &records {
                Output::record_summary(
                    record.metadata["segmentId"].as_str().unwrap_or("?"),
                    record.metadata["startTime"].as_str().unwrap_or("?"),
                    record.metadata["endTime"].as_str().unwrap_or("?"),
                    &record.content,
                );
            }
        }
        other => {
            anyhow::bail!("Unknown format: {}. Use json or table.", other);
        }
    }

    Ok(())
}
