use crate::domain::models::Account;
use crate::domain::models::AccountError;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Key;
use crate::domain::models::Phase;
use crate::domain::models::Snapshot;
use crate::domain::models::Subscription;
use crate::domain::models::SwitchTarget;
use crate::domain::models::Tenant;
use crate::domain::models::View;

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

pub const SUBSCRIPTION_SWITCHED: &str = "Subscription switched successfully";
pub const DIRECTORY_SWITCHED: &str = "Directory switched successfully";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub phase: Phase,
    pub view: View,
    pub snapshot: Option<Snapshot>,
    pub subscription_cursor: usize,
    pub tenant_cursor: usize,
    pub last_error: Option<AccountError>,
    pub message: Option<String>,
    pub show_help: bool,
    pub last_known_width: u16,
    pub last_known_height: u16,
    pub spinner_frame: usize,
    pub quitting: bool,
}

/// Folds one event into the state and returns the actions to dispatch.
pub fn reduce(mut state: AppState, event: Event) -> (AppState, Vec<Action>) {
    let actions = state.handle_event(event);
    return (state, actions);
}

impl AppState {
    /// The starting state along with the load that brings it out of
    /// `Loading`.
    pub fn init() -> (AppState, Vec<Action>) {
        return (AppState::default(), vec![Action::LoadAll]);
    }

    pub fn account(&self) -> Option<&Account> {
        return self.snapshot.as_ref().map(|e| &e.account);
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        return self
            .snapshot
            .as_ref()
            .map(|e| e.subscriptions.as_slice())
            .unwrap_or_default();
    }

    pub fn tenants(&self) -> &[Tenant] {
        return self
            .snapshot
            .as_ref()
            .map(|e| e.tenants.as_slice())
            .unwrap_or_default();
    }

    pub fn selected_subscription(&self) -> Option<&Subscription> {
        return self.subscriptions().get(self.subscription_cursor);
    }

    pub fn selected_tenant(&self) -> Option<&Tenant> {
        return self.tenants().get(self.tenant_cursor);
    }

    pub fn is_current_tenant(&self, tenant: &Tenant) -> bool {
        return self
            .account()
            .map(|e| e.tenant_id == tenant.tenant_id)
            .unwrap_or(false);
    }

    pub fn handle_event(&mut self, event: Event) -> Vec<Action> {
        if self.quitting {
            tracing::debug!(?event, "discarding event after quit");
            return vec![];
        }

        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::Resize(width, height) => {
                self.last_known_width = width;
                self.last_known_height = height;
            }
            Event::Tick => {
                if self.phase.is_busy() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
            }
            Event::DataLoaded(snapshot) => {
                if self.phase != Phase::Loading {
                    tracing::debug!(phase = %self.phase, "ignoring stale load result");
                    return vec![];
                }

                self.subscription_cursor = snapshot.default_subscription_index();
                self.tenant_cursor = 0;
                self.snapshot = Some(snapshot);
                self.last_error = None;
                self.set_phase(Phase::Ready);
            }
            Event::LoadFailed(err) => {
                if self.phase != Phase::Loading {
                    tracing::debug!(phase = %self.phase, "ignoring stale load failure");
                    return vec![];
                }

                tracing::warn!(error = %err, "load failed");
                self.last_error = Some(err);
                self.message = None;
                self.set_phase(Phase::Error);
            }
            Event::SwitchRequested(target) => return self.request_switch(target),
            Event::SwitchSucceeded(message) => {
                if self.phase != Phase::Switching {
                    tracing::debug!(phase = %self.phase, "ignoring stale switch result");
                    return vec![];
                }

                self.message = Some(message);
                self.set_phase(Phase::Success);

                // Success is transient. The reload starts immediately.
                return self.reload();
            }
            Event::SwitchFailed(err) => {
                if self.phase != Phase::Switching {
                    tracing::debug!(phase = %self.phase, "ignoring stale switch failure");
                    return vec![];
                }

                tracing::warn!(error = %err, "switch failed");
                self.last_error = Some(err);
                self.set_phase(Phase::Error);
            }
            Event::RefreshRequested => {
                if !self.phase.accepts_input() {
                    return vec![];
                }

                self.message = None;
                return self.reload();
            }
            Event::QuitRequested => {
                self.quitting = true;
            }
        }

        return vec![];
    }

    fn handle_key(&mut self, key: Key) -> Vec<Action> {
        match key {
            Key::Quit => return self.handle_event(Event::QuitRequested),
            _ if !self.phase.accepts_input() => return vec![],
            Key::Help => self.show_help = !self.show_help,
            Key::ToggleView => self.view = self.view.toggle(),
            Key::Up => self.move_cursor(-1),
            Key::Down => self.move_cursor(1),
            Key::Select => {
                if let Some(target) = self.select_target() {
                    return self.handle_event(Event::SwitchRequested(target));
                }
            }
            Key::Refresh => return self.handle_event(Event::RefreshRequested),
        }

        return vec![];
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = match self.view {
            View::Subscriptions => self.subscriptions().len(),
            View::Tenants => self.tenants().len(),
        };
        let cursor = match self.view {
            View::Subscriptions => &mut self.subscription_cursor,
            View::Tenants => &mut self.tenant_cursor,
        };

        if len == 0 {
            *cursor = 0;
            return;
        }

        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    fn select_target(&self) -> Option<SwitchTarget> {
        match self.view {
            View::Subscriptions => {
                let sub = self.selected_subscription()?;
                if sub.is_default {
                    return None;
                }
                return Some(SwitchTarget::Subscription(sub.id.to_string()));
            }
            // Tenants are always re-authenticated, current or not.
            View::Tenants => {
                let tenant = self.selected_tenant()?;
                return Some(SwitchTarget::Tenant(tenant.tenant_id.to_string()));
            }
        }
    }

    fn request_switch(&mut self, target: SwitchTarget) -> Vec<Action> {
        if self.phase != Phase::Ready {
            tracing::debug!(phase = %self.phase, ?target, "switch rejected outside ready");
            return vec![];
        }

        let action = match target {
            SwitchTarget::Subscription(id) => {
                let is_valid = self
                    .subscriptions()
                    .iter()
                    .any(|e| e.id == id && !e.is_default);
                if !is_valid {
                    tracing::debug!(id = %id, "switch rejected for unknown or default subscription");
                    return vec![];
                }
                Action::SwitchSubscription(id)
            }
            SwitchTarget::Tenant(id) => {
                if !self.tenants().iter().any(|e| e.tenant_id == id) {
                    tracing::debug!(id = %id, "switch rejected for unknown tenant");
                    return vec![];
                }
                Action::SwitchTenant(id)
            }
        };

        self.message = None;
        self.last_error = None;
        self.set_phase(Phase::Switching);

        return vec![action];
    }

    fn reload(&mut self) -> Vec<Action> {
        self.last_error = None;
        self.set_phase(Phase::Loading);

        return vec![Action::LoadAll];
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }
}
