mod azure_cli;

use std::sync::Arc;

pub use azure_cli::AzureCli;

use crate::configuration::Config;
use crate::domain::models::AccountServiceBox;

pub struct AccountServiceManager {}

impl AccountServiceManager {
    pub fn get(config: &Config) -> AccountServiceBox {
        return Arc::new(AzureCli::new(config.az_path.to_string()));
    }
}
