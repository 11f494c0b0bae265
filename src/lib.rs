//! # esign Rust SDK
//!
//! Rust SDK for the e-signature open platform REST API.
//!
//! The SDK covers accounts, files and document templates, seal templates,
//! sign flows and identity verification. Access tokens are exchanged from
//! your app id and secret on first use and cached until they expire.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use esign::{Client, types::{CreatePersonalAccount, CreateSignFlow, ExecuteUrlQuery,
//!     FlowDocument, HandSignField, PosBean}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("app-id", "secret")?;
//!
//!     // Create a signer
//!     let account = client.account().create_personal_account(
//!         &CreatePersonalAccount::new("user-1001", "Alice", "CRED_PSN_CH_IDCARD", "110101199001011234"),
//!     ).await?;
//!     let account_id = account.get_str("accountId").unwrap_or_default().to_string();
//!
//!     // Build and start a flow
//!     let flows = client.sign_flow();
//!     let flow = flows.create_sign_flow(&CreateSignFlow::new("Lease agreement")).await?;
//!     let flow_id = flow.get_str("flowId").unwrap_or_default().to_string();
//!     flows.add_documents(&flow_id, &[FlowDocument::new("file-id")]).await?;
//!     flows.add_hand_sign(
//!         &flow_id,
//!         &HandSignField::new("file-id", &account_id, PosBean::new(1, 120.0, 300.0)),
//!     ).await?;
//!     flows.start_sign_flow(&flow_id).await?;
//!
//!     // Hand the signer their URL
//!     let url = flows.get_execute_url(&flow_id, &ExecuteUrlQuery::new(&account_id)).await?;
//!     println!("Sign at {:?}", url.get_str("url"));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, EsignError>`:
//!
//! ```rust,no_run
//! use esign::{Client, EsignError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::new("app-id", "secret").unwrap();
//!
//!     match client.account().query_personal_account_by_third_id("user-1001").await {
//!         Ok(account) => println!("Found {:?}", account.get_str("accountId")),
//!         Err(EsignError::Business { code, message, .. }) => println!("Rejected [{}]: {}", code, message),
//!         Err(e) if e.is_retryable() => println!("Temporary failure, retry later: {}", e),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

pub mod access;
pub mod account;
pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod identity;
pub mod request;
pub mod sign_flow;
pub mod template;
pub mod token;
pub mod types;

// Re-export main types at the crate root
pub use client::{Client, Resource, ResourceClient};
pub use config::{ClientConfig, Envelope, LogConfig};
pub use error::{EsignError, Result};
pub use request::RequestSpec;
pub use token::{AccessTokenProvider, Credential, StaticToken, TokenProvider};
pub use types::ApiResult;
