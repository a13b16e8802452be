//! `add`, `save` and `order`.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bangumi_core::{ApiResponse, BangumiItem};

use super::{GlobalOpts, finish, with_library};
use crate::CliError;
use crate::cli_types::ItemArgs;

impl ItemArgs {
    /// Overwrite the fields of `item` that were given on the command line.
    pub(crate) fn apply(self, item: &mut BangumiItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(name_cn) = self.name_cn {
            item.name_cn = name_cn;
        }
        if let Some(summary) = self.summary {
            item.summary = summary;
        }
        if let Some(cover) = self.cover {
            item.cover = cover;
        }
        if let Some(url) = self.url {
            item.url = url;
        }
        if self.clear_labels {
            item.labels.clear();
        } else if !self.labels.is_empty() {
            item.labels = self.labels;
        }
    }
}

/// Add an entry.
pub(crate) fn run_add(opts: &GlobalOpts, id: Option<i64>, args: ItemArgs) -> Result<(), CliError> {
    let mut item = BangumiItem {
        id,
        ..BangumiItem::default()
    };
    args.apply(&mut item);
    if item.name.trim().is_empty() {
        return Err(CliError::config("--name is required when adding an entry"));
    }

    let name = item.name.clone();
    let resp = with_library(opts, |lib| async move { Ok(lib.add_item(item).await) })?;
    if let Some(id) = finish(opts, resp)? {
        log::info!(
            "{} {} as #{}",
            "Added".if_supports_color(Stdout, |t| t.green()),
            name.if_supports_color(Stdout, |t| t.bold()),
            id,
        );
    }
    Ok(())
}

/// Edit an existing entry, keeping the fields that were not given.
pub(crate) fn run_save(opts: &GlobalOpts, id: i64, args: ItemArgs) -> Result<(), CliError> {
    let resp = with_library(opts, |lib| async move {
        let current = lib.find_item(id).await;
        if !current.success {
            return Ok(ApiResponse {
                success: false,
                data: None,
                error: current.error,
                error_kind: current.error_kind,
                cancelled: current.cancelled,
            });
        }
        let mut item = current
            .data
            .flatten()
            .unwrap_or_else(|| BangumiItem::default().with_id(id));
        args.apply(&mut item);
        Ok(lib.save_item(item).await)
    })?;

    finish(opts, resp)?;
    if !opts.json {
        log::info!(
            "{} #{}",
            "Saved".if_supports_color(Stdout, |t| t.green()),
            id
        );
    }
    Ok(())
}

/// Set the display order.
pub(crate) fn run_order(opts: &GlobalOpts, ids: Vec<i64>) -> Result<(), CliError> {
    let resp = with_library(opts, |lib| async move { Ok(lib.update_order(ids).await) })?;
    if let Some(outcome) = finish(opts, resp)? {
        for id in &outcome.skipped {
            log::warn!("No entry with id {}; skipped", id);
        }
        log::info!(
            "{} {} item(s)",
            "Reordered".if_supports_color(Stdout, |t| t.green()),
            outcome.updated,
        );
    }
    Ok(())
}
