//! Terminal front-end for switching Azure subscriptions and directories.
//!
//! The crate keeps a pure state machine at its core. Terminal input,
//! completions from the Azure CLI and a timer tick are fed to it as events,
//! and the actions it returns run on a background service.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use application::cli::{Cli, Commands, ConfigCommands, Mode};
pub use application::ui::{destruct_terminal_for_panic, start_loop, CrosstermSession};
pub use configuration::{Config, ConfigKey};
pub use domain::models::{AccountError, AccountService, AccountServiceBox, Action, Event};
pub use domain::services::{ActionsService, AppState, EventsService, Theme};
pub use infrastructure::clients::{AccountServiceManager, AzureCli};
