//! # appqos-core
//!
//! Core types and utilities for talking to an AppQoS service.
//!
//! This crate provides the error taxonomy, client configuration and the shared
//! HTTP transport used by the typed resource client in `appqos-api`.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status classification
//! - [`config`] - Credentials, TLS trust policy and timeouts
//! - [`client`] - The reusable HTTP transport

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use client::{HttpTransport, RawResponse};
pub use config::{AppQosConfig, Credentials, TlsPolicy};
pub use error::{Error, Result};
