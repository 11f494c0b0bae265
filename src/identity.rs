//! Identity verification operations.

use crate::access::AccessLayer;
use crate::error::{Result, require};
use crate::request::{RequestSpec, path_segment};
use crate::types::{ApiResult, OrgIdentityBody, OrgIdentityRequest};
use std::sync::Arc;

/// Client for identity verification.
///
/// Access via `client.identity()`.
pub struct IdentityClient {
    access: Arc<AccessLayer>,
}

impl IdentityClient {
    pub(crate) fn new(access: Arc<AccessLayer>) -> Self {
        Self { access }
    }

    /// Get the web URL where an agent verifies an organization's identity.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, types::OrgIdentityRequest};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("app-id", "secret")?;
    ///
    ///     let mut request = OrgIdentityRequest::new("A1");
    ///     request.redirect_url = Some("https://example.com/done".to_string());
    ///
    ///     let result = client.identity().get_org_identity_url("O1", &request).await?;
    ///     println!("Verify at {:?}", result.get_str("url"));
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_org_identity_url(
        &self,
        org_id: &str,
        request: &OrgIdentityRequest,
    ) -> Result<ApiResult> {
        let org_id = path_segment("orgId", org_id)?;
        require("agentAccountId", &request.agent_account_id)?;

        let spec = RequestSpec::post(format!("/v2/identity/auth/web/{}/orgIdentityUrl", org_id))
            .params(&OrgIdentityBody::from(request))?;
        self.access.execute(spec).await
    }
}
