//! Integrations with external systems. Currently only the Azure CLI.

pub mod clients;
