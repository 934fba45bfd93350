use std::io::{self, IsTerminal};

use anyhow::Result;
use azswitch_term::application::cli::{print_completions, Cli, Commands, ConfigCommands, Mode};
use azswitch_term::application::{commands, logging};
use azswitch_term::configuration::Config;
use azswitch_term::infrastructure::clients::AccountServiceManager;
use clap::{CommandFactory, FromArgMatches};
use yansi::Paint;

mod interactive;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            print_completions(*shell);
            return Ok(());
        }
        Some(Commands::Config {
            command: ConfigCommands::Default,
        }) => {
            println!("{}", Config::serialize_default(&Cli::command()));
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load(&matches).await?;
    if let Some(Commands::Config {
        command: ConfigCommands::Path,
    }) = &cli.command
    {
        println!("{}", config.config_file.display());
        return Ok(());
    }

    let _log_guard = logging::init(&config)?;

    if config.no_color || !io::stdout().is_terminal() {
        Paint::disable();
    }

    let service = AccountServiceManager::get(&config);
    commands::ensure_ready(service.as_ref()).await?;

    let mode = cli.mode();
    tracing::info!(?mode, "starting");

    let mut stdout = io::stdout();
    match mode {
        Mode::Current => commands::show_current(service.as_ref(), &mut stdout).await,
        Mode::List => commands::list_subscriptions(service.as_ref(), &mut stdout).await,
        Mode::Subscription(subscription) => {
            commands::switch_subscription(service.as_ref(), &subscription, &mut stdout).await
        }
        Mode::Tenant(tenant) => {
            commands::switch_tenant(service.as_ref(), &tenant, &mut stdout).await
        }
        Mode::Interactive => interactive::run_interactive(service, &config).await,
    }
}
