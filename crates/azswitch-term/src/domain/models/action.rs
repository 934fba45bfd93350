/// Work the reducer asks the dispatcher to perform. Each action completes
/// with exactly one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadAll,
    SwitchSubscription(String),
    SwitchTenant(String),
}

impl Action {
    /// Interactive actions need the terminal released while they run.
    pub fn is_interactive(&self) -> bool {
        return matches!(self, Action::SwitchTenant(_));
    }
}
