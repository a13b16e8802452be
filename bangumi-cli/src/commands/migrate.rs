use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bangumi_import::MigrationOutcome;

use super::{GlobalOpts, finish, with_library};
use crate::CliError;

/// Import the legacy JSON snapshot into an empty database.
pub(crate) fn run_migrate(opts: &GlobalOpts, from: Option<PathBuf>) -> Result<(), CliError> {
    let resp = with_library(opts, |lib| async move { Ok(lib.migrate_legacy(from).await) })?;

    match finish(opts, resp)? {
        Some(MigrationOutcome::Imported { rows }) => log::info!(
            "{} {} item(s) from the legacy snapshot",
            "Imported".if_supports_color(Stdout, |t| t.green()),
            rows,
        ),
        Some(MigrationOutcome::AlreadyPopulated { rows }) => log::info!(
            "Database already holds {} item(s); nothing to migrate",
            rows
        ),
        Some(MigrationOutcome::NoSnapshot) => log::info!("No legacy snapshot found"),
        None => {}
    }
    Ok(())
}
