use strum_macros::Display;

/// Which list is on screen and receives navigation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
pub enum View {
    #[default]
    Subscriptions,
    #[strum(serialize = "Directories")]
    Tenants,
}

impl View {
    pub fn toggle(self) -> View {
        return match self {
            View::Subscriptions => View::Tenants,
            View::Tenants => View::Subscriptions,
        };
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    #[default]
    Loading,
    Ready,
    Error,
    Switching,
    Success,
}

impl Phase {
    /// Phases waiting on an in-flight action. Only quit is handled.
    pub fn is_busy(self) -> bool {
        return matches!(self, Phase::Loading | Phase::Switching | Phase::Success);
    }

    pub fn accepts_input(self) -> bool {
        return matches!(self, Phase::Ready | Phase::Error);
    }
}

/// Logical keys. Physical bindings live in the events service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Select,
    ToggleView,
    Help,
    Refresh,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchTarget {
    Subscription(String),
    Tenant(String),
}
