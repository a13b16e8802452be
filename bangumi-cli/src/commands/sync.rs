use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::{GlobalOpts, finish, with_library};
use crate::CliError;
use crate::progress::BarProgress;

/// Replace the local list with the remote collection.
pub(crate) fn run_sync(opts: &GlobalOpts) -> Result<(), CliError> {
    let quiet = opts.quiet || opts.json;
    let resp = with_library(opts, |lib| async move {
        let progress = BarProgress::new(quiet);
        let resp = lib.sync_from_remote(&progress).await;
        progress.finish();
        Ok(resp)
    })?;

    if let Some(report) = finish(opts, resp)? {
        log::info!(
            "{} {} item(s), replaced {} local row(s)",
            "Synced".if_supports_color(Stdout, |t| t.green()),
            report.inserted,
            report.removed,
        );
    }
    Ok(())
}
