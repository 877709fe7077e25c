//! Core types and services for moodify
//!
//! This crate provides the error taxonomy, configuration, logging setup,
//! conversation sessions and the upstream keep-alive probe shared by the
//! chat front-end and the completion relay.

pub mod config;
pub mod error;
pub mod keepalive;
pub mod logging;
pub mod session;

pub use error::{Error, Result};
