//! Seal template operations.
//!
//! This module provides the TemplateClient for creating, listing and deleting
//! the seals of personal and organization accounts.

use crate::access::AccessLayer;
use crate::error::{EsignError, Result};
use crate::request::{RequestSpec, path_segment};
use crate::types::{ApiResult, ImageSeal, OfficialSealTemplate, PersonalSealTemplate};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Serialize;
use std::sync::Arc;

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Client for seal template operations.
///
/// Access via `client.template()`.
pub struct TemplateClient {
    access: Arc<AccessLayer>,
}

#[derive(Serialize)]
struct Page {
    offset: u32,
    size: u32,
}

impl TemplateClient {
    pub(crate) fn new(access: Arc<AccessLayer>) -> Self {
        Self { access }
    }

    /// Create a template seal for a personal account.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, types::PersonalSealTemplate};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("app-id", "secret")?;
    ///
    ///     let seal = client.template().create_personal_template("A1", &PersonalSealTemplate {
    ///         alias: "daily".to_string(),
    ///         ..Default::default()
    ///     }).await?;
    ///
    ///     println!("Seal id: {:?}", seal.get_str("sealId"));
    ///     Ok(())
    /// }
    /// ```
    pub async fn create_personal_template(
        &self,
        account_id: &str,
        template: &PersonalSealTemplate,
    ) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;

        let spec = RequestSpec::post(format!(
            "/v1/accounts/{}/seals/personaltemplate",
            account_id
        ))
        .params(template)?;
        self.access.execute(spec).await
    }

    /// Create a template seal for an organization.
    pub async fn create_official_template(
        &self,
        org_id: &str,
        template: &OfficialSealTemplate,
    ) -> Result<ApiResult> {
        let org_id = path_segment("orgId", org_id)?;

        let spec = RequestSpec::post(format!(
            "/v1/organizations/{}/seals/officialtemplate",
            org_id
        ))
        .params(template)?;
        self.access.execute(spec).await
    }

    /// Create a seal from an image for a personal or organization account.
    ///
    /// The image bytes are sent base64-encoded.
    pub async fn create_image_template(&self, account_id: &str, seal: &ImageSeal) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;
        if seal.data.is_empty() {
            return Err(EsignError::Validation("seal image data is required".to_string()));
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Params<'a> {
            alias: &'a str,
            height: u32,
            width: u32,
            #[serde(rename = "type")]
            data_type: &'static str,
            data: String,
            transparent_flag: bool,
        }

        let params = Params {
            alias: &seal.alias,
            height: seal.height,
            width: seal.width,
            data_type: "BASE64",
            data: BASE64.encode(&seal.data),
            transparent_flag: seal.transparent_flag,
        };

        let spec =
            RequestSpec::post(format!("/v1/accounts/{}/seals/image", account_id)).params(&params)?;
        self.access.execute(spec).await
    }

    /// List the seals of a personal account.
    pub async fn query_personal_templates(
        &self,
        account_id: &str,
        offset: u32,
        size: Option<u32>,
    ) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;

        let spec = RequestSpec::get(format!("/v1/accounts/{}/seals", account_id))
            .params(&Page {
                offset,
                size: size.unwrap_or(DEFAULT_PAGE_SIZE),
            })?;
        self.access.execute(spec).await
    }

    /// List the seals of an organization.
    pub async fn query_official_templates(
        &self,
        org_id: &str,
        offset: u32,
        size: Option<u32>,
    ) -> Result<ApiResult> {
        let org_id = path_segment("orgId", org_id)?;

        let spec = RequestSpec::get(format!("/v1/organizations/{}/seals", org_id))
            .params(&Page {
                offset,
                size: size.unwrap_or(DEFAULT_PAGE_SIZE),
            })?;
        self.access.execute(spec).await
    }

    /// Delete a personal seal.
    pub async fn delete_personal_template(&self, account_id: &str, seal_id: &str) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;
        let seal_id = path_segment("sealId", seal_id)?;

        self.access
            .execute(RequestSpec::delete(format!(
                "/v1/accounts/{}/seals/{}",
                account_id, seal_id
            )))
            .await
    }

    /// Delete an organization seal.
    pub async fn delete_official_template(&self, org_id: &str, seal_id: &str) -> Result<ApiResult> {
        let org_id = path_segment("orgId", org_id)?;
        let seal_id = path_segment("sealId", seal_id)?;

        self.access
            .execute(RequestSpec::delete(format!(
                "/v1/organizations/{}/seals/{}",
                org_id, seal_id
            )))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::types::ImageSeal;
    use crate::{Client, EsignError};

    #[tokio::test]
    async fn test_image_seal_requires_data() {
        let client = Client::new("app", "secret").unwrap();
        let err = client
            .template()
            .create_image_template("A1", &ImageSeal::new(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, EsignError::Validation(_)));
    }
}
