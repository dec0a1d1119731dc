//! Tilestore CLI - document database maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Replace the unique `slug` index on categories with `(slug, parent)`
//! tilestore-cli migrate category-index
//!
//! # Show what the migration would change
//! tilestore-cli migrate category-index --dry-run
//!
//! # List index names on the categories collection
//! tilestore-cli indexes --database tiles
//! ```
//!
//! # Commands
//!
//! - `migrate category-index` - Category index migration
//! - `indexes` - List indexes

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;
mod settings;

use settings::{MongoArgs, MongoSettings};

#[derive(Parser)]
#[command(name = "tilestore-cli")]
#[command(author, version, about = "Tilestore CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run document database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// List index names on the categories collection
    Indexes {
        #[command(flatten)]
        mongo: MongoArgs,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Make category slugs unique per parent instead of globally
    CategoryIndex {
        /// Report planned changes without applying them
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        mongo: MongoArgs,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tilestore_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::CategoryIndex { dry_run, mongo } => {
                let settings = MongoSettings::resolve(mongo)?;
                commands::migrate::category_index(&settings, dry_run).await?;
            }
        },
        Commands::Indexes { mongo } => {
            let settings = MongoSettings::resolve(mongo)?;
            let names = commands::migrate::list_indexes(&settings).await?;
            #[allow(clippy::print_stdout)]
            for name in names {
                println!("{name}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dry_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "tilestore-cli",
            "migrate",
            "category-index",
            "--dry-run",
            "--database",
            "tiles",
        ])
        .ok();
        let Some(Cli {
            command:
                Commands::Migrate {
                    target: MigrateTarget::CategoryIndex { dry_run, mongo },
                },
        }) = cli
        else {
            panic!("expected migrate category-index");
        };
        assert!(dry_run);
        assert_eq!(mongo.database.as_deref(), Some("tiles"));
        assert!(mongo.url.is_none());
    }
}
