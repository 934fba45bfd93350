use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub user_type: String,
}

/// The account the external tool is currently pointed at, as reported by
/// `az account show`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub environment_name: String,
    #[serde(default)]
    pub home_tenant_id: String,
    /// Subscription id.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub is_default: bool,
    /// Subscription display name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub tenant_display_name: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub user: User,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub home_tenant_id: String,
    pub id: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub tenant_display_name: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub user: User,
}

impl Subscription {
    pub fn title(&self) -> &str {
        return &self.name;
    }
}

/// An Entra ID tenant (directory).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(default)]
    pub default_domain: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub tenant_category: Option<String>,
    #[serde(default)]
    pub tenant_type: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

impl Tenant {
    /// Display name, falling back to the default domain when the tenant has
    /// no display name.
    pub fn title(&self) -> &str {
        if let Some(name) = self.display_name.as_deref().filter(|e| !e.is_empty()) {
            return name;
        }

        return self.default_domain.as_deref().unwrap_or_default();
    }
}

/// Everything a single load fetches. Replaced as a whole, never patched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub account: Account,
    pub subscriptions: Vec<Subscription>,
    pub tenants: Vec<Tenant>,
}

impl Snapshot {
    /// Index of the first default subscription, or 0.
    pub fn default_subscription_index(&self) -> usize {
        return self
            .subscriptions
            .iter()
            .position(|e| e.is_default)
            .unwrap_or(0);
    }
}
