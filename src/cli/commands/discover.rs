//! Discover command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::loader::discover_files;
use anyhow::Result;

/// Run the discover command.
pub async fn run_discover(dir: &str, no_recurse: bool, _settings: Settings) -> Result<()> {
    let root = Settings::expand_path(dir);
    let files = discover_files(&root, !no_recurse).await?;

    if files.is_empty() {
        Output::info(&format!("No subtitle files found under {}", root.display()));
        return Ok(());
    }

    Output::header(&format!("Subtitle files ({})", files.len()));
    for file in &files {
        Output::list_item(&file.display().to_string());
    }

    Ok(())
}
