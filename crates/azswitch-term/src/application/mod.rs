//! Application layer: command line parsing, the one-shot commands and the
//! interactive UI loop.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod ui;
