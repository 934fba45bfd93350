//! Core domain logic for the account switcher.
//!
//! The models and the state machine know nothing about the terminal or the
//! external tool. Both are reached through the services and the
//! `AccountService` seam.

pub mod models;
pub mod services;
