//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use globedash_core::config;
use globedash_core::logging::{self, LogTarget};
use globedash_core::pipeline::{SortColumn, SortDirection};
use tokio::runtime::Runtime;

use crate::modes;

mod commands;

#[derive(Parser)]
#[command(name = "globedash")]
#[command(version)]
#[command(about = "Browse the countries of the world from your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start a mock session (any credentials are accepted)
    Login {
        /// Email shown as the session identity
        #[arg(long)]
        email: String,
        /// Password (not checked)
        #[arg(long, default_value = "")]
        password: String,
    },

    /// End the current session
    Logout,

    /// Print the identity of the current session
    Whoami,

    /// List countries as a paged table
    Countries {
        /// Case-insensitive substring of the common name
        #[arg(short, long, default_value = "")]
        search: String,

        /// Column to sort by
        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Page to show (1-based, clamped to the last page)
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Show every detail of one country
    Show {
        /// Common or official name (case-insensitive)
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SortArg {
    Name,
    Population,
    Region,
    Capital,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortColumn::Name,
            SortArg::Population => SortColumn::Population,
            SortArg::Region => SortColumn::Region,
            SortArg::Capital => SortColumn::Capital,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let rt = Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    // default to the dashboard; it installs its own file logger
    let Some(command) = cli.command else {
        return modes::run_dashboard(&config);
    };

    let _log_guard = logging::init(LogTarget::Stderr, &config.log_level)?;

    match command {
        Commands::Login { email, password } => commands::auth::login(&config, &email, &password),
        Commands::Logout => {
            commands::auth::logout(&config);
            Ok(())
        }
        Commands::Whoami => {
            commands::auth::whoami(&config);
            Ok(())
        }

        Commands::Countries {
            search,
            sort,
            desc,
            page,
        } => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            commands::countries::list(
                &config,
                commands::countries::ListOptions {
                    search,
                    column: sort.into(),
                    direction,
                    page,
                },
            )
            .await
        }
        Commands::Show { name } => commands::countries::show(&config, &name).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
