#![forbid(unsafe_code)]

//! # AOP Console
//!
//! Terminal client for the AOP budget backend.
//!
//! The UI follows The Elm Architecture: [`app::App`] owns every page model,
//! key presses and fetch results arrive as [`messages::Msg`] values, and
//! backend calls run as commands off the event loop. The same client also
//! backs a set of headless subcommands.
//!
//! ## Public Modules
//!
//! - [`app`] - Shell: routing, global keys, nav bar
//! - [`pages`] - Dashboard, AOP management and placeholder pages
//! - [`runtime`] - Event loop, commands and the headless simulator
//! - [`config`] - Validated runtime configuration
//! - [`test_support`] - In-memory backend for tests

pub mod app;
pub mod cli;
pub mod config;
pub mod format;
pub mod headless;
pub mod keys;
pub mod logging;
pub mod messages;
pub mod pages;
pub mod runtime;
pub mod test_support;
pub mod theme;
