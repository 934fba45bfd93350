use std::io::Write;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use yansi::Paint;

use crate::domain::models::AccountError;
use crate::domain::models::AccountService;

pub const INSTALL_MESSAGE: &str =
    "Azure CLI is not installed. Install from: https://docs.microsoft.com/en-us/cli/azure/install-azure-cli";
pub const LOGIN_MESSAGE: &str = "not logged in to Azure CLI. Run: az login";

/// Fails with an actionable message when the tool is missing or nobody is
/// logged in.
pub async fn ensure_ready(service: &dyn AccountService) -> Result<()> {
    if service.check_installed().await.is_err() {
        bail!(INSTALL_MESSAGE);
    }

    match service.current_account().await {
        Ok(_) => return Ok(()),
        Err(AccountError::Unauthenticated) => bail!(LOGIN_MESSAGE),
        Err(AccountError::ServiceUnavailable) => bail!(INSTALL_MESSAGE),
        Err(err) => return Err(err.into()),
    }
}

pub async fn show_current(service: &dyn AccountService, out: &mut impl Write) -> Result<()> {
    let account = service.current_account().await?;

    writeln!(out, "{}", Paint::new("Current Azure Account:").bold())?;
    writeln!(out, "  User:         {}", account.user.name)?;
    writeln!(
        out,
        "  Tenant:       {} ({})",
        account.tenant_display_name, account.tenant_id
    )?;
    writeln!(out, "  Subscription: {}", Paint::green(&account.name).bold())?;
    writeln!(out, "  ID:           {}", account.id)?;
    writeln!(out, "  State:        {}", account.state)?;

    return Ok(());
}

pub async fn list_subscriptions(service: &dyn AccountService, out: &mut impl Write) -> Result<()> {
    let subscriptions = service.list_subscriptions().await?;

    writeln!(out, "{}", Paint::new("Available Subscriptions:").bold())?;
    for sub in &subscriptions {
        if sub.is_default {
            writeln!(out, "* {}", Paint::green(sub.title()).bold())?;
        } else {
            writeln!(out, "  {}", sub.title())?;
        }
        writeln!(out, "    ID:    {}", sub.id)?;
        writeln!(out, "    State: {}", sub.state)?;
    }

    return Ok(());
}

pub async fn switch_subscription(
    service: &dyn AccountService,
    subscription: &str,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Switching to subscription: {subscription}")?;

    service
        .set_subscription(subscription)
        .await
        .context("failed to switch subscription")?;

    writeln!(out, "{}", Paint::green("Successfully switched subscription"))?;
    return show_current(service, out).await;
}

pub async fn switch_tenant(
    service: &dyn AccountService,
    tenant: &str,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Switching to tenant: {tenant}")?;
    writeln!(
        out,
        "{}",
        Paint::yellow("This will open a browser for authentication...")
    )?;
    out.flush()?;

    service
        .login_to_tenant(tenant)
        .await
        .context("failed to switch tenant")?;

    writeln!(out, "{}", Paint::green("Successfully switched tenant"))?;
    return show_current(service, out).await;
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
