//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bangumi_core::Label;

#[derive(Parser)]
#[command(name = "bangumi")]
#[command(about = "Keep a local, ordered list of your anime collection", long_about = None)]
pub(crate) struct Cli {
    /// Database file (overrides dbPath from the settings file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the raw response object as JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,

    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Editable fields of an entry. Unset fields are left as they are.
#[derive(Args, Clone, Default)]
pub(crate) struct ItemArgs {
    /// Original title
    #[arg(long)]
    pub name: Option<String>,

    /// Localized title
    #[arg(long = "name-cn")]
    pub name_cn: Option<String>,

    #[arg(long)]
    pub summary: Option<String>,

    /// Cover image URL or path
    #[arg(long)]
    pub cover: Option<String>,

    /// Reference URL
    #[arg(long)]
    pub url: Option<String>,

    /// Tag as label=value; repeat for several. Replaces existing labels.
    #[arg(long = "label", value_parser = parse_label)]
    pub labels: Vec<Label>,

    /// Remove all labels
    #[arg(long, conflicts_with = "labels")]
    pub clear_labels: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the list in display order
    List {
        /// Show the legacy snapshot if the database can't be read
        #[arg(long)]
        fallback: bool,
    },

    /// Replace the local list with the remote collection
    Sync,

    /// Add an entry
    Add {
        /// Keep this id instead of letting the store assign one
        #[arg(long)]
        id: Option<i64>,

        #[command(flatten)]
        item: ItemArgs,
    },

    /// Edit an existing entry
    Save {
        id: i64,

        #[command(flatten)]
        item: ItemArgs,
    },

    /// Set the display order (e.g. `order 3,1,2`)
    Order {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },

    /// Write the list to a JSON file (prompts for a path if none is given)
    Export { path: Option<PathBuf> },

    /// Import the legacy JSON snapshot into an empty database
    Migrate {
        /// Snapshot to read (defaults to legacySnapshotPath)
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Inspect or edit the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the settings file path
    Path,

    /// Write values to the settings file
    Set {
        #[arg(long)]
        api_url: Option<String>,

        #[arg(long)]
        user_id: Option<String>,

        #[arg(long)]
        page_size: Option<u32>,

        #[arg(long)]
        subject_type: Option<u32>,

        #[arg(long)]
        collection_type: Option<u32>,
    },
}

fn parse_label(s: &str) -> Result<Label, String> {
    let (label, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected label=value, got '{}'", s))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("empty label in '{}'", s));
    }
    Ok(Label::new(label, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_labels() {
        assert_eq!(parse_label("studio=Bones").unwrap(), Label::new("studio", "Bones"));
        assert_eq!(parse_label(" year = 2003 ").unwrap(), Label::new("year", "2003"));
        assert!(parse_label("no-separator").is_err());
        assert!(parse_label("=value").is_err());
    }

    #[test]
    fn parses_order_list() {
        let cli = Cli::try_parse_from(["bangumi", "order", "3,1,2"]).unwrap();
        match cli.command {
            Commands::Order { ids } => assert_eq!(ids, vec![3, 1, 2]),
            _ => panic!("expected order"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bangumi", "list", "--json", "--db", "x.db"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert!(matches!(cli.command, Commands::List { fallback: false }));
    }

    #[test]
    fn list_accepts_fallback() {
        let cli = Cli::try_parse_from(["bangumi", "list", "--fallback"]).unwrap();
        assert!(matches!(cli.command, Commands::List { fallback: true }));
    }
}
