use std::io::Write;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::{GlobalOpts, finish, with_library};
use crate::CliError;

/// Write the list to a JSON file. Without `path`, ask for one; an empty
/// answer cancels.
pub(crate) fn run_export(opts: &GlobalOpts, path: Option<PathBuf>) -> Result<(), CliError> {
    let destination = match path {
        Some(path) => Some(path),
        None => prompt_destination()?,
    };

    let resp = with_library(opts, |lib| async move { Ok(lib.export_json(destination).await) })?;
    if let Some(path) = finish(opts, resp)? {
        log::info!(
            "{} list to {}",
            "Exported".if_supports_color(Stdout, |t| t.green()),
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    Ok(())
}

fn prompt_destination() -> Result<Option<PathBuf>, CliError> {
    eprint!("Export to (leave empty to cancel): ");
    std::io::stderr().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();
    Ok((!trimmed.is_empty()).then(|| PathBuf::from(trimmed)))
}
