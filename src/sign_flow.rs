//! Sign flow operations.
//!
//! This module provides the SignFlowClient for orchestrating a signing
//! process: create the flow, attach documents, place sign fields, start it,
//! hand out signing URLs and archive it.

use crate::access::AccessLayer;
use crate::error::{EsignError, Result, require};
use crate::request::{RequestSpec, path_segment};
use crate::types::{
    ApiResult, CreateFlowOneStep, CreateSignFlow, CreateSignFlowBody, ExecuteUrlQuery,
    FlowDocument, HandSignField, PlatformSignField, SignFields,
};
use serde::Serialize;
use std::sync::Arc;

/// Notify signers by SMS.
pub const NOTICE_TYPE_SMS: &str = "1";
/// Notify signers by email.
pub const NOTICE_TYPE_EMAIL: &str = "2";
/// Do not notify signers.
pub const NOTICE_TYPE_NONE: &str = "";

/// Client for sign flow operations.
///
/// Access via `client.sign_flow()`.
pub struct SignFlowClient {
    access: Arc<AccessLayer>,
}

impl SignFlowClient {
    pub(crate) fn new(access: Arc<AccessLayer>) -> Self {
        Self { access }
    }

    /// Create and start a flow with documents and signers in one call.
    pub async fn create_flow_one_step(&self, request: &CreateFlowOneStep) -> Result<ApiResult> {
        if request.docs.is_empty() {
            return Err(EsignError::Validation("docs is required".to_string()));
        }
        if request.signers.is_empty() {
            return Err(EsignError::Validation("signers is required".to_string()));
        }

        let spec = RequestSpec::post("/api/v2/signflows/createFlowOneStep").params(request)?;
        self.access.execute(spec).await
    }

    /// Create an empty sign flow.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, types::{CreateSignFlow, FlowDocument, PlatformSignField, PosBean}};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("app-id", "secret")?;
    ///     let flows = client.sign_flow();
    ///
    ///     let flow = flows.create_sign_flow(&CreateSignFlow::new("Lease agreement")).await?;
    ///     let flow_id = flow.get_str("flowId").unwrap_or_default().to_string();
    ///
    ///     flows.add_documents(&flow_id, &[FlowDocument::new("D1")]).await?;
    ///     flows.add_platform_sign(
    ///         &flow_id,
    ///         &PlatformSignField::new("D1", "S1", PosBean::new(1, 10.0, 20.0)),
    ///     ).await?;
    ///     flows.start_sign_flow(&flow_id).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn create_sign_flow(&self, request: &CreateSignFlow) -> Result<ApiResult> {
        require("businessScene", &request.business_scene)?;

        let spec = RequestSpec::post("/v1/signflows").params(&CreateSignFlowBody::from(request))?;
        self.access.execute(spec).await
    }

    /// Attach documents to a flow.
    pub async fn add_documents(&self, flow_id: &str, docs: &[FlowDocument]) -> Result<ApiResult> {
        let flow_id = path_segment("flowId", flow_id)?;
        if docs.is_empty() {
            return Err(EsignError::Validation("docs is required".to_string()));
        }
        for doc in docs {
            require("fileId", &doc.file_id)?;
        }

        #[derive(Serialize)]
        struct Params<'a> {
            docs: &'a [FlowDocument],
        }

        let spec = RequestSpec::post(format!("/v1/signflows/{}/documents", flow_id))
            .params(&Params { docs })?;
        self.access.execute(spec).await
    }

    /// Add a sign field stamped automatically with a platform seal.
    pub async fn add_platform_sign(
        &self,
        flow_id: &str,
        field: &PlatformSignField,
    ) -> Result<ApiResult> {
        let flow_id = path_segment("flowId", flow_id)?;
        require("fileId", &field.file_id)?;
        require("sealId", &field.seal_id)?;

        let spec = RequestSpec::post(format!("/v1/signflows/{}/signfields/platformSign", flow_id))
            .params(&SignFields { signfields: [field] })?;
        self.access.execute(spec).await
    }

    /// Add a sign field the signer stamps by hand.
    pub async fn add_hand_sign(&self, flow_id: &str, field: &HandSignField) -> Result<ApiResult> {
        let flow_id = path_segment("flowId", flow_id)?;
        require("fileId", &field.file_id)?;
        require("signerAccountId", &field.signer_account_id)?;

        let spec = RequestSpec::post(format!("/v1/signflows/{}/signfields/handSign", flow_id))
            .params(&SignFields { signfields: [field] })?;
        self.access.execute(spec).await
    }

    /// Start a flow.
    pub async fn start_sign_flow(&self, flow_id: &str) -> Result<ApiResult> {
        let flow_id = path_segment("flowId", flow_id)?;

        self.access
            .execute(RequestSpec::put(format!("/v1/signflows/{}/start", flow_id)))
            .await
    }

    /// Get the signing (or preview) URL for a signer.
    pub async fn get_execute_url(&self, flow_id: &str, query: &ExecuteUrlQuery) -> Result<ApiResult> {
        let flow_id = path_segment("flowId", flow_id)?;
        require("accountId", &query.account_id)?;

        let spec =
            RequestSpec::get(format!("/v1/signflows/{}/executeUrl", flow_id)).params(query)?;
        self.access.execute(spec).await
    }

    /// Archive a finished flow.
    pub async fn archive_sign(&self, flow_id: &str) -> Result<ApiResult> {
        let flow_id = path_segment("flowId", flow_id)?;

        self.access
            .execute(RequestSpec::put(format!("/v1/signflows/{}/archive", flow_id)))
            .await
    }

    /// Get download URLs for a flow's signed documents.
    pub async fn download_document(&self, flow_id: &str) -> Result<ApiResult> {
        let flow_id = path_segment("flowId", flow_id)?;

        self.access
            .execute(RequestSpec::get(format!("/v1/signflows/{}/documents", flow_id)))
            .await
    }
}
