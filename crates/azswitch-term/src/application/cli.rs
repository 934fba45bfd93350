use std::io;

use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "azswitch",
    version,
    about = "Switch Azure tenants, directories, and subscriptions",
    long_about = "Switch Azure tenants, directories, and subscriptions.\n\nRun without flags to enter interactive mode."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// List all subscriptions
    #[arg(short, long)]
    pub list: bool,

    /// Show current account
    #[arg(short, long)]
    pub current: bool,

    /// Switch to subscription by ID or name
    #[arg(short, long, value_name = "ID|NAME")]
    pub subscription: Option<String>,

    /// Switch to tenant by ID
    #[arg(short, long, value_name = "ID")]
    pub tenant: Option<String>,

    /// Path to the config file
    #[arg(long, env = "AZSWITCH_CONFIG_FILE", global = true)]
    pub config_file: Option<String>,

    /// Azure CLI binary to run
    #[arg(long, env = "AZSWITCH_AZ_PATH")]
    pub az_path: Option<String>,

    /// Seconds to wait for Azure CLI commands
    #[arg(long, env = "AZSWITCH_COMMAND_TIMEOUT")]
    pub command_timeout: Option<u64>,

    /// Seconds to wait for an interactive directory login
    #[arg(long, env = "AZSWITCH_LOGIN_TIMEOUT")]
    pub login_timeout: Option<u64>,

    /// Milliseconds between busy indicator frames
    #[arg(long, env = "AZSWITCH_TICK_RATE")]
    pub tick_rate: Option<u64>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Log filter, for example "debug" or "azswitch_term=trace"
    #[arg(long, env = "AZSWITCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// File the logs are written to
    #[arg(long, env = "AZSWITCH_LOG_FILE")]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generates shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Prints a config file holding every default
    Default,
    /// Prints the config file path in use
    Path,
}

/// What a run without subcommand does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Current,
    List,
    Subscription(String),
    Tenant(String),
    Interactive,
}

impl Cli {
    /// Flags are checked in a fixed order. The first one present wins.
    pub fn mode(&self) -> Mode {
        if self.current {
            return Mode::Current;
        }
        if self.list {
            return Mode::List;
        }
        if let Some(subscription) = self.subscription.as_ref().filter(|e| !e.is_empty()) {
            return Mode::Subscription(subscription.to_string());
        }
        if let Some(tenant) = self.tenant.as_ref().filter(|e| !e.is_empty()) {
            return Mode::Tenant(tenant.to_string());
        }

        return Mode::Interactive;
    }
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}
