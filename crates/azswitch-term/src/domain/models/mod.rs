mod account;
mod account_service;
mod action;
mod error;
mod event;
mod ui;

pub use account::*;
pub use account_service::*;
pub use action::*;
pub use error::*;
pub use event::*;
pub use ui::*;
