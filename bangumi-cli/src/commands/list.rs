use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bangumi_core::BangumiItem;

use super::{GlobalOpts, finish, with_library};
use crate::CliError;

/// Show the list in display order. With `fallback`, an unreadable database
/// falls back to the legacy snapshot.
pub(crate) fn run_list(opts: &GlobalOpts, fallback: bool) -> Result<(), CliError> {
    let resp = with_library(opts, |lib| async move {
        Ok(if fallback {
            lib.load_items().await
        } else {
            lib.get_items().await
        })
    })?;
    let Some(items) = finish(opts, resp)? else {
        return Ok(());
    };

    if items.is_empty() {
        log::info!("The list is empty. Run `bangumi sync` or `bangumi add` to fill it.");
        return Ok(());
    }

    for (position, item) in items.iter().enumerate() {
        print_item(position + 1, item);
    }
    log::info!("");
    log::info!("{} item(s)", items.len());
    Ok(())
}

fn print_item(position: usize, item: &BangumiItem) {
    let id = item
        .id
        .map(|id| format!("#{}", id))
        .unwrap_or_else(|| "#?".to_string());
    let title = item.display_name();
    let subtitle = if title != item.name && !item.name.is_empty() {
        format!(" ({})", item.name)
    } else {
        String::new()
    };

    log::info!(
        "{:>4}. {} {}{}",
        position,
        id.if_supports_color(Stdout, |t| t.dimmed()),
        title.if_supports_color(Stdout, |t| t.bold()),
        subtitle.if_supports_color(Stdout, |t| t.cyan()),
    );

    if !item.labels.is_empty() {
        let labels: Vec<String> = item
            .labels
            .iter()
            .map(|l| format!("{}: {}", l.label, l.value))
            .collect();
        log::info!("        {}", labels.join(", "));
    }
    if !item.url.is_empty() {
        log::info!("        {}", item.url.if_supports_color(Stdout, |t| t.dimmed()));
    }
}
