use std::sync::Arc;

use async_trait::async_trait;

use super::Account;
use super::AccountError;
use super::Subscription;
use super::Tenant;

/// Request/response access to the external account tool. Implementations keep
/// no state the core can observe and do no caching.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Verifies the external tool can be found.
    async fn check_installed(&self) -> Result<(), AccountError>;
    async fn current_account(&self) -> Result<Account, AccountError>;
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, AccountError>;
    async fn list_tenants(&self) -> Result<Vec<Tenant>, AccountError>;
    async fn set_subscription(&self, id_or_name: &str) -> Result<(), AccountError>;
    /// Runs the interactive login flow for a tenant. May take over the
    /// terminal while it runs.
    async fn login_to_tenant(&self, tenant_id: &str) -> Result<(), AccountError>;
}

pub type AccountServiceBox = Arc<dyn AccountService>;
