//! bangumi CLI
//!
//! Command-line front end for the local anime list: sync it from the remote
//! collection, edit and reorder entries, export them as JSON.

mod cli_types;
mod commands;
mod error;
mod progress;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;

use cli_types::{Cli, Commands, ConfigAction};
use commands::GlobalOpts;
use commands::config::SettingUpdates;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let opts = GlobalOpts {
        db: cli.db,
        config: cli.config,
        json: cli.json,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::List { fallback } => commands::list::run_list(&opts, fallback),
        Commands::Sync => commands::sync::run_sync(&opts),
        Commands::Add { id, item } => commands::edit::run_add(&opts, id, item),
        Commands::Save { id, item } => commands::edit::run_save(&opts, id, item),
        Commands::Order { ids } => commands::edit::run_order(&opts, ids),
        Commands::Export { path } => commands::export::run_export(&opts, path),
        Commands::Migrate { from } => commands::migrate::run_migrate(&opts, from),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&opts),
            ConfigAction::Path => commands::config::run_config_path(&opts),
            ConfigAction::Set {
                api_url,
                user_id,
                page_size,
                subject_type,
                collection_type,
            } => commands::config::run_config_set(
                &opts,
                SettingUpdates {
                    api_url,
                    user_id,
                    page_size,
                    subject_type,
                    collection_type,
                },
            ),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Route `log` output to the terminal.
///
/// Info lines are user-facing output and print bare; warnings and errors
/// get a level prefix. `--verbose` adds debug output with timestamps and
/// `RUST_LOG` overrides both flags.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    // Library info logs only show with --verbose.
    if !verbose {
        for krate in ["bangumi_db", "bangumi_fetch", "bangumi_import"] {
            builder.filter_module(krate, LevelFilter::Warn);
        }
        builder.filter_module("reqwest", LevelFilter::Warn);
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        });
    }
    builder.parse_default_env();
    builder.init();
}
