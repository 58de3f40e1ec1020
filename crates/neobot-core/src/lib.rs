//! Core domain + application logic for the NASA near-Earth-object bot.
//!
//! This crate is framework-agnostic. Telegram and the NASA HTTP API live
//! behind ports (traits) implemented in adapter crates.

pub mod chart;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod filter;
pub mod formatting;
pub mod i18n;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod size;
pub mod sniff;

pub use errors::{Error, Result};
