//! Typed Rust client for the Yandex.Direct JSON APIs.
//!
//! The crate covers two API generations with separate client types:
//! - Live v4: Wordstat report lifecycle ([`ReportClient`]) and account queries
//!   ([`AccountInfoClient`]),
//! - v5: credential checks ([`CredentialValidator`]).
//!
//! The layout is a domain layer of strong types, a transport layer for
//! wire-format quirks, and a small client layer orchestrating requests.
//! Input is checked locally with [`InputValidator`] against a
//! [`RegionCodeCache`] before any report is created.
//!
//! ```rust,no_run
//! use serde_json::json;
//! use yadirect::{Config, GeoId, InputValidator, RegionCodeCache};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let regions = RegionCodeCache::bundled();
//!     let request = InputValidator::new(&regions)
//!         .validate(&[json!("купить слона")], &[GeoId::new(213)])?;
//!
//!     let client = config
//!         .client_builder()
//!         .build_report_client(config.credentials().clone())?;
//!     let id = client.create(&request).await?;
//!     client.wait_until_done(id, &config.poll_options()).await?;
//!     let _items = client.fetch(id).await?;
//!     client.delete(id).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod regions;
mod transport;
pub mod validator;

pub use client::{
    AccountInfoClient, ClientBuilder, CredentialValidator, DEFAULT_V4_ENDPOINT,
    DEFAULT_V5_ENDPOINT, DirectError, ReportClient,
};
pub use config::{Config, ConfigError};
pub use domain::{
    AccountStanding, Credentials, GeoId, Login, Phrase, PhraseShows, PollOptions, ReportId,
    ReportInfo, ReportRequest, ReportStatus, Token, ValidationError, WordstatItem,
};
pub use regions::{
    BUNDLED_REGIONS, DatasetError, EmbeddedRegionSource, FileRegionSource, RegionCatalog,
    RegionCodeCache, RegionSource,
};
pub use validator::InputValidator;
