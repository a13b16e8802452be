use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bangumi_fetch::{SettingSource, Settings};

use super::GlobalOpts;
use crate::CliError;

/// Show current settings and their sources.
pub(crate) fn run_config_show(opts: &GlobalOpts) -> Result<(), CliError> {
    let path = opts.settings_path()?;
    let (settings, sources) = Settings::load_with(&path, |var| std::env::var(var).ok())
        .map_err(|e| CliError::config(e.to_string()))?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    log::info!(
        "{}",
        "Bangumi Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    let status = if path.exists() {
        "(exists)"
    } else {
        "(not found)"
    };
    log::info!(
        "  Settings file: {} {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        status.if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("");

    let page_size = settings.page_size.to_string();
    let subject_type = settings.subject_type.to_string();
    let collection_type = settings.collection_type.to_string();
    let fields: [(&str, Option<&str>, &SettingSource); 5] = [
        ("apiUrl", settings.api_url.as_deref(), &sources.api_url),
        ("userId", settings.user_id.as_deref(), &sources.user_id),
        ("pageSize", Some(page_size.as_str()), &sources.page_size),
        ("subjectType", Some(subject_type.as_str()), &sources.subject_type),
        ("collectionType", Some(collection_type.as_str()), &sources.collection_type),
    ];

    for (name, value, source) in fields {
        let source_str = format!("({})", source);
        log::info!(
            "  {} {} {}",
            format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
            match value {
                Some(v) => v.to_string(),
                None => "not set".if_supports_color(Stdout, |t| t.yellow()).to_string(),
            },
            source_str.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    log::info!("");
    let db_path = opts.db.clone().unwrap_or_else(|| settings.db_path());
    log::info!("  Database:        {}", db_path.display());
    log::info!("  Legacy snapshot: {}", settings.legacy_snapshot_path().display());
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path(opts: &GlobalOpts) -> Result<(), CliError> {
    let path = opts.settings_path()?;
    log::info!("{}", path.display());
    Ok(())
}

/// Values for `config set`; `None` keeps the current value.
#[derive(Default)]
pub(crate) struct SettingUpdates {
    pub api_url: Option<String>,
    pub user_id: Option<String>,
    pub page_size: Option<u32>,
    pub subject_type: Option<u32>,
    pub collection_type: Option<u32>,
}

impl SettingUpdates {
    fn apply(self, settings: &mut Settings) {
        if let Some(url) = self.api_url {
            settings.api_url = Some(url);
        }
        if let Some(id) = self.user_id {
            settings.user_id = Some(id);
        }
        if let Some(n) = self.page_size {
            settings.page_size = n;
        }
        if let Some(n) = self.subject_type {
            settings.subject_type = n;
        }
        if let Some(n) = self.collection_type {
            settings.collection_type = n;
        }
    }
}

/// Merge `updates` into the settings file.
///
/// Only the file is read here, so values coming from the environment are
/// not written back.
pub(crate) fn run_config_set(opts: &GlobalOpts, updates: SettingUpdates) -> Result<(), CliError> {
    let path = opts.settings_path()?;
    let (mut settings, _) =
        Settings::load_with(&path, |_| None).map_err(|e| CliError::config(e.to_string()))?;
    updates.apply(&mut settings);
    if settings.page_size == 0 {
        return Err(CliError::config("pageSize must be at least 1"));
    }
    settings
        .save(&path)
        .map_err(|e| CliError::config(e.to_string()))?;

    log::info!(
        "{} settings to {}",
        "Saved".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
