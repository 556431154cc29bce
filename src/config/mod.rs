pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::Category;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "safepath")]
#[command(about = "Find nearby emergency services and manage your SafePath account")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Search emergency places around a location
    Search {
        /// hospital, pharmacy, police or fire
        category: Category,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        #[arg(long, help = "Search radius in meters")]
        radius: Option<f64>,

        #[arg(long, help = "Open the dialer for the nth result (1-based)")]
        call: Option<usize>,
    },
    /// List the searchable categories
    Categories,
    /// Show which marker a place name would get on the map
    Classify { name: String },
    /// Create an account and send the verification email
    SignUp {
        email: String,
        password: String,
    },
    /// Sign in and report the verification state
    SignIn {
        email: String,
        password: String,
    },
    /// Show or edit the local profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum ProfileAction {
    Show,
    Set { field: String, value: String },
    Toggle { key: String },
}
