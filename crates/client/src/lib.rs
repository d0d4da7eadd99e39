//! # ERPNext Client
//!
//! Async client for the ERPNext / Frappe REST API: documents, listings,
//! query reports and doctype discovery.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use erpnext_client::{DocListQuery, ErpNextApi, ErpNextClient, ErpNextResult};
//!
//! #[tokio::main]
//! async fn main() -> ErpNextResult<()> {
//!     let client = ErpNextClient::builder()
//!         .base_url("https://erp.example.com")
//!         .api_key("key")
//!         .api_secret("secret")
//!         .build()?;
//!
//!     let customers = client
//!         .get_doc_list("Customer", &DocListQuery::new().fields(["name"]).limit(20))
//!         .await?;
//!     println!("Found {} customers", customers.len());
//!
//!     let item = client.get_document("Item", "ITEM-001").await?;
//!     println!("{}", item);
//!
//!     Ok(())
//! }
//! ```
//!
//! Every failed call is reported as an [`ErpNextError`] naming the action
//! and target; the client never retries.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use api::{DocListQuery, DocTypeSource, ErpNextApi, FallbackChain, FALLBACK_DOCTYPES};
pub use client::{ErpNextClient, ErpNextClientBuilder};
pub use config::{ClientConfig, Credentials};
pub use error::{ErpNextError, ErpNextResult, TransportError};
