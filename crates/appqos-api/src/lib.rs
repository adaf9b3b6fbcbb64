//! AppQoS client and data models.
//!
//! Provides typed structures and an asynchronous client for the AppQoS REST
//! API: pools, power profiles and apps.
//!
//! ```no_run
//! use appqos_api::{AppQosClient, Pool};
//! use appqos_core::AppQosConfig;
//!
//! # async fn run() -> appqos_api::Result<()> {
//! let client = AppQosClient::new(&AppQosConfig::from_env()?)?;
//! let pool = Pool::default().with_cores(vec![0, 1, 2, 3]).with_cbm(2047);
//! let confirmation = client.create_pool("https://127.0.0.1:5000", &pool).await?;
//! println!("{confirmation}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{AppQosClient, Confirmation};
pub use models::{App, Pool, PowerProfile, Resource};

/// Convenient result alias that reuses the shared AppQoS error type.
pub type Result<T> = appqos_core::Result<T>;
