pub(crate) mod config;
pub(crate) mod edit;
pub(crate) mod export;
pub(crate) mod list;
pub(crate) mod migrate;
pub(crate) mod sync;

use std::path::PathBuf;

use serde::Serialize;

use bangumi_core::ApiResponse;
use bangumi_fetch::Settings;
use bangumi_import::Library;

use crate::CliError;

/// Options shared by every command.
pub(crate) struct GlobalOpts {
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOpts {
    /// Settings file in effect: `--config`, else the platform default.
    pub(crate) fn settings_path(&self) -> Result<PathBuf, CliError> {
        self.config
            .clone()
            .or_else(bangumi_fetch::settings_path)
            .ok_or_else(|| CliError::config("could not determine the settings directory"))
    }

    pub(crate) fn load_settings(&self) -> Result<Settings, CliError> {
        let path = self.settings_path()?;
        let mut settings = Settings::load(&path).map_err(|e| CliError::config(e.to_string()))?;
        if let Some(db) = &self.db {
            settings.db_path = Some(db.clone());
        }
        Ok(settings)
    }
}

/// Load settings and run `f` against a [`Library`] on a fresh runtime.
pub(crate) fn with_library<T, F, Fut>(opts: &GlobalOpts, f: F) -> Result<T, CliError>
where
    F: FnOnce(Library) -> Fut,
    Fut: std::future::Future<Output = Result<T, CliError>>,
{
    let settings = opts.load_settings()?;
    log::debug!("Using database {}", settings.db_path().display());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))?;
    rt.block_on(f(Library::from_settings(settings)))
}

/// Print `resp` as JSON when requested, and turn a failure into an error.
///
/// Returns the payload of a successful response, `None` when the operation
/// was cancelled or carried no data.
pub(crate) fn finish<T: Serialize>(
    opts: &GlobalOpts,
    resp: ApiResponse<T>,
) -> Result<Option<T>, CliError> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
    }
    if resp.is_cancelled() {
        log::info!("Cancelled.");
        return Ok(None);
    }
    if !resp.success {
        return Err(CliError::Failed {
            kind: resp.error_kind,
            message: resp.error.unwrap_or_else(|| "operation failed".to_string()),
        });
    }
    Ok(if opts.json { None } else { resp.data })
}
