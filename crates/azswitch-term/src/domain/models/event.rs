use super::AccountError;
use super::Key;
use super::Snapshot;
use super::SwitchTarget;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(Key),
    Resize(u16, u16),
    Tick,
    DataLoaded(Snapshot),
    LoadFailed(AccountError),
    SwitchRequested(SwitchTarget),
    SwitchSucceeded(String),
    SwitchFailed(AccountError),
    RefreshRequested,
    QuitRequested,
}
