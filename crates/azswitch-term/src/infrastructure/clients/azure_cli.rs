use std::io;
use std::process::ExitStatus;
use std::process::Stdio;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::process::Command;

use crate::domain::models::Account;
use crate::domain::models::AccountError;
use crate::domain::models::AccountService;
use crate::domain::models::Subscription;
use crate::domain::models::Tenant;

const COMMAND_FAILED: &str = "azure CLI command failed";
const LOGIN_HINTS: [&str; 2] = ["Please run 'az login'", "not logged in"];

/// Account service backed by the `az` binary.
pub struct AzureCli {
    az_path: String,
}

impl Default for AzureCli {
    fn default() -> AzureCli {
        return AzureCli::new("az");
    }
}

impl AzureCli {
    pub fn new(az_path: impl Into<String>) -> AzureCli {
        return AzureCli {
            az_path: az_path.into(),
        };
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, AccountError> {
        tracing::debug!(az_path = %self.az_path, args = ?args, "running azure CLI");

        let output = Command::new(&self.az_path)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(args = ?args, status = %output.status, stderr = %stderr.trim(), "azure CLI failed");
            return Err(classify_failure(&stderr, output.status));
        }

        return Ok(output.stdout);
    }
}

#[async_trait]
impl AccountService for AzureCli {
    async fn check_installed(&self) -> Result<(), AccountError> {
        if let Err(err) = which::which(&self.az_path) {
            tracing::warn!(az_path = %self.az_path, error = %err, "azure CLI not found");
            return Err(AccountError::ServiceUnavailable);
        }

        return Ok(());
    }

    async fn current_account(&self) -> Result<Account, AccountError> {
        let stdout = self.run(&["account", "show", "--output", "json"]).await?;
        return parse_json("account", &stdout);
    }

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, AccountError> {
        let stdout = self.run(&["account", "list", "--output", "json"]).await?;
        return parse_json("subscriptions", &stdout);
    }

    async fn list_tenants(&self) -> Result<Vec<Tenant>, AccountError> {
        let stdout = self
            .run(&["account", "tenant", "list", "--output", "json"])
            .await?;
        return parse_json("tenants", &stdout);
    }

    async fn set_subscription(&self, id_or_name: &str) -> Result<(), AccountError> {
        self.run(&["account", "set", "--subscription", id_or_name])
            .await?;
        return Ok(());
    }

    async fn login_to_tenant(&self, tenant_id: &str) -> Result<(), AccountError> {
        tracing::info!(tenant_id = %tenant_id, "starting interactive login");

        // The login flow talks to the user directly, so stdio is inherited.
        let status = Command::new(&self.az_path)
            .args(["login", "--tenant", tenant_id, "--output", "none"])
            .kill_on_drop(true)
            .status()
            .await
            .map_err(spawn_error)?;

        if !status.success() {
            return Err(classify_failure("", status));
        }

        return Ok(());
    }
}

fn spawn_error(err: io::Error) -> AccountError {
    if err.kind() == io::ErrorKind::NotFound {
        return AccountError::ServiceUnavailable;
    }

    return AccountError::operation_failed(format!("{COMMAND_FAILED}: {err}"));
}

fn classify_failure(stderr: &str, status: ExitStatus) -> AccountError {
    return classify_message(stderr, &status.to_string());
}

fn classify_message(stderr: &str, status: &str) -> AccountError {
    if LOGIN_HINTS.iter().any(|hint| stderr.contains(hint)) {
        return AccountError::Unauthenticated;
    }

    let detail = match stderr.trim() {
        "" => status.trim(),
        trimmed => trimmed,
    };

    return AccountError::operation_failed(format!("{COMMAND_FAILED}: {detail}"));
}

fn parse_json<T: DeserializeOwned>(what: &str, stdout: &[u8]) -> Result<T, AccountError> {
    return serde_json::from_slice(stdout)
        .map_err(|err| AccountError::operation_failed(format!("failed to parse {what}: {err}")));
}
