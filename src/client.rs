//! esign API client.
//!
//! The main entry point for interacting with the e-signature open platform.

use crate::access::AccessLayer;
use crate::account::AccountClient;
use crate::config::{ClientConfig, DEFAULT_TIMEOUT_SECS};
use crate::error::{EsignError, Result};
use crate::file::FileClient;
use crate::identity::IdentityClient;
use crate::sign_flow::SignFlowClient;
use crate::template::TemplateClient;
use crate::token::{AccessTokenProvider, TokenProvider};
use reqwest::Client as HttpClient;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// esign API client.
///
/// Holds one HTTP connection pool, one token cache and at most one instance
/// of each resource client, built on first use. Share it across tasks with
/// an `Arc`.
///
/// # Example
///
/// ```rust,no_run
/// use esign::{Client, ClientConfig};
/// use esign::types::{CreateSignFlow, FlowDocument};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::with_config(ClientConfig::from_env()?)?;
///
///     let flow = client.sign_flow().create_sign_flow(&CreateSignFlow::new("Lease")).await?;
///     let flow_id = flow.get_str("flowId").unwrap_or_default();
///     client.sign_flow().add_documents(flow_id, &[FlowDocument::new("D1")]).await?;
///     Ok(())
/// }
/// ```
pub struct Client {
    access: Arc<AccessLayer>,
    account: OnceLock<AccountClient>,
    file: OnceLock<FileClient>,
    template: OnceLock<TemplateClient>,
    sign_flow: OnceLock<SignFlowClient>,
    identity: OnceLock<IdentityClient>,
}

impl Client {
    /// Create a sandbox client with default configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::Client;
    ///
    /// let client = Client::new("app-id", "secret").unwrap();
    /// ```
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(app_id, secret))
    }

    /// Create a client with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, ClientConfig};
    /// use std::time::Duration;
    ///
    /// let mut config = ClientConfig::new("app-id", "secret");
    /// config.production = true;
    /// config.timeout = Some(Duration::from_secs(60));
    ///
    /// let client = Client::with_config(config).unwrap();
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = build_http(&config)?;
        let tokens = Arc::new(TokenProvider::new(&config, http.clone()));
        Ok(Self::assemble(&config, http, tokens))
    }

    /// Create a client whose credentials come from `tokens` instead of the
    /// built-in app id / secret exchange.
    pub fn with_token_provider(
        config: ClientConfig,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self> {
        let http = build_http(&config)?;
        Ok(Self::assemble(&config, http, tokens))
    }

    fn assemble(
        config: &ClientConfig,
        http: HttpClient,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            access: Arc::new(AccessLayer::new(config, http, tokens)),
            account: OnceLock::new(),
            file: OnceLock::new(),
            template: OnceLock::new(),
            sign_flow: OnceLock::new(),
            identity: OnceLock::new(),
        }
    }

    /// Get the base URL for the API.
    pub fn base_url(&self) -> &str {
        self.access.base_url()
    }

    /// The shared request pipeline, for endpoints without a dedicated method.
    pub fn access(&self) -> &AccessLayer {
        &self.access
    }

    /// Get the account client.
    pub fn account(&self) -> &AccountClient {
        self.account
            .get_or_init(|| AccountClient::new(Arc::clone(&self.access)))
    }

    /// Get the file client.
    pub fn file(&self) -> &FileClient {
        self.file
            .get_or_init(|| FileClient::new(Arc::clone(&self.access)))
    }

    /// Get the seal template client.
    pub fn template(&self) -> &TemplateClient {
        self.template
            .get_or_init(|| TemplateClient::new(Arc::clone(&self.access)))
    }

    /// Get the sign flow client.
    pub fn sign_flow(&self) -> &SignFlowClient {
        self.sign_flow
            .get_or_init(|| SignFlowClient::new(Arc::clone(&self.access)))
    }

    /// Get the identity client.
    pub fn identity(&self) -> &IdentityClient {
        self.identity
            .get_or_init(|| IdentityClient::new(Arc::clone(&self.access)))
    }

    /// Get a resource client by name.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, ResourceClient};
    ///
    /// let client = Client::new("app-id", "secret").unwrap();
    /// match client.get("sign_flow".parse().unwrap()) {
    ///     ResourceClient::SignFlow(flows) => { let _ = flows; }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn get(&self, resource: Resource) -> ResourceClient<'_> {
        match resource {
            Resource::Account => ResourceClient::Account(self.account()),
            Resource::File => ResourceClient::File(self.file()),
            Resource::Template => ResourceClient::Template(self.template()),
            Resource::SignFlow => ResourceClient::SignFlow(self.sign_flow()),
            Resource::Identity => ResourceClient::Identity(self.identity()),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}

fn build_http(config: &ClientConfig) -> Result<HttpClient> {
    let timeout = config
        .timeout
        .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("esign-rust/{}", env!("CARGO_PKG_VERSION")));

    HttpClient::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| EsignError::Config(format!("failed to create HTTP client: {}", e)))
}

/// Names of the resource groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Account,
    File,
    Template,
    SignFlow,
    Identity,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Account => "account",
            Resource::File => "file",
            Resource::Template => "template",
            Resource::SignFlow => "sign_flow",
            Resource::Identity => "identity",
        }
    }
}

impl FromStr for Resource {
    type Err = EsignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "account" => Ok(Resource::Account),
            "file" => Ok(Resource::File),
            "template" => Ok(Resource::Template),
            "sign_flow" | "signflow" => Ok(Resource::SignFlow),
            "identity" => Ok(Resource::Identity),
            other => Err(EsignError::Validation(format!("unknown resource: {}", other))),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource client borrowed from a [`Client`].
pub enum ResourceClient<'a> {
    Account(&'a AccountClient),
    File(&'a FileClient),
    Template(&'a TemplateClient),
    SignFlow(&'a SignFlowClient),
    Identity(&'a IdentityClient),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PRODUCTION_BASE_URL, SANDBOX_BASE_URL};

    #[test]
    fn test_client_new() {
        let client = Client::new("app", "secret").unwrap();
        assert_eq!(client.base_url(), SANDBOX_BASE_URL);
    }

    #[test]
    fn test_client_with_config() {
        let mut config = ClientConfig::new("app", "secret");
        config.production = true;
        config.timeout = Some(Duration::from_secs(60));
        let client = Client::with_config(config).unwrap();
        assert_eq!(client.base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_resource_clients_are_cached() {
        let client = Client::new("app", "secret").unwrap();
        assert!(std::ptr::eq(client.account(), client.account()));
        assert!(std::ptr::eq(client.sign_flow(), client.sign_flow()));

        match client.get(Resource::File) {
            ResourceClient::File(file) => assert!(std::ptr::eq(file, client.file())),
            _ => panic!("Expected file client"),
        }
    }

    #[test]
    fn test_resource_names() {
        assert_eq!("signflow".parse::<Resource>().unwrap(), Resource::SignFlow);
        assert_eq!("Sign-Flow".parse::<Resource>().unwrap(), Resource::SignFlow);
        assert_eq!(Resource::Identity.to_string(), "identity");
        assert!(matches!(
            "billing".parse::<Resource>(),
            Err(EsignError::Validation(_))
        ));
    }

    #[test]
    fn test_client_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
