//! File and document template operations.
//!
//! This module provides the FileClient for upload URLs, document templates
//! and their input components, template-based files and watermarking.

use crate::access::AccessLayer;
use crate::error::{EsignError, Result, require};
use crate::request::{RequestSpec, path_segment};
use crate::types::{
    ApiResult, BatchWatermarkRequest, CreateFileByTemplate, InputComponent, StructComponentBody,
    UploadFileRequest, UploadTemplateRequest,
};
use std::sync::Arc;

/// Client for file operations.
///
/// Access via `client.file()`.
pub struct FileClient {
    access: Arc<AccessLayer>,
}

impl FileClient {
    pub(crate) fn new(access: Arc<AccessLayer>) -> Self {
        Self { access }
    }

    /// Request an upload URL for a new file.
    ///
    /// The result carries `fileId` and `uploadUrl`; the file content is then
    /// PUT to `uploadUrl` directly.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, types::UploadFileRequest};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("app-id", "secret")?;
    ///
    ///     let upload = client.file().get_upload_file_url(&UploadFileRequest {
    ///         content_md5: "2G9tIW1HIeQYrbNqdYGoJA==".to_string(),
    ///         content_type: "application/pdf".to_string(),
    ///         file_name: "contract.pdf".to_string(),
    ///         file_size: 48_213,
    ///         ..Default::default()
    ///     }).await?;
    ///
    ///     println!("Upload to {:?}", upload.get_str("uploadUrl"));
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_upload_file_url(&self, request: &UploadFileRequest) -> Result<ApiResult> {
        require("contentMd5", &request.content_md5)?;
        require("contentType", &request.content_type)?;
        require("fileName", &request.file_name)?;

        let spec = RequestSpec::post("/v1/files/getUploadUrl").params(request)?;
        self.access.execute(spec).await
    }

    /// Create a document template through an upload URL.
    pub async fn create_template_by_upload_url(
        &self,
        request: &UploadTemplateRequest,
    ) -> Result<ApiResult> {
        require("contentMd5", &request.content_md5)?;
        require("contentType", &request.content_type)?;
        require("fileName", &request.file_name)?;

        let spec = RequestSpec::post("/v1/docTemplates/createByUploadUrl").params(request)?;
        self.access.execute(spec).await
    }

    /// Add an input component to a document template, or update it when
    /// `component.id` is set.
    pub async fn create_input_option(
        &self,
        template_id: &str,
        component: &InputComponent,
    ) -> Result<ApiResult> {
        let template_id = path_segment("templateId", template_id)?;
        require("label", &component.label)?;

        let spec = RequestSpec::post(format!("/v1/docTemplates/{}/components", template_id))
            .params(&StructComponentBody::from(component))?;
        self.access.execute(spec).await
    }

    /// Delete input components from a document template.
    pub async fn delete_input_options(
        &self,
        template_id: &str,
        component_ids: &[&str],
    ) -> Result<ApiResult> {
        let template_id = path_segment("templateId", template_id)?;
        if component_ids.is_empty() {
            return Err(EsignError::Validation(
                "at least one component id is required".to_string(),
            ));
        }
        let mut ids = Vec::with_capacity(component_ids.len());
        for id in component_ids {
            if id.contains(',') {
                return Err(EsignError::Validation(format!(
                    "component id must not contain ',': {}",
                    id
                )));
            }
            ids.push(path_segment("component id", id)?);
        }

        let path = format!(
            "/v1/docTemplates/{}/components/{}",
            template_id,
            ids.join(",")
        );
        self.access.execute(RequestSpec::delete(path)).await
    }

    /// Get a document template's details and download URL.
    pub async fn download_doc_template(&self, template_id: &str) -> Result<ApiResult> {
        let template_id = path_segment("templateId", template_id)?;

        self.access
            .execute(RequestSpec::get(format!("/v1/docTemplates/{}", template_id)))
            .await
    }

    /// Create a file by filling a document template.
    pub async fn create_by_template(&self, request: &CreateFileByTemplate) -> Result<ApiResult> {
        require("templateId", &request.template_id)?;
        require("name", &request.name)?;

        let spec = RequestSpec::post("/v1/files/createByTemplate").params(request)?;
        self.access.execute(spec).await
    }

    /// Get a file's details and download URL.
    pub async fn download_file(&self, file_id: &str) -> Result<ApiResult> {
        let file_id = path_segment("fileId", file_id)?;

        self.access
            .execute(RequestSpec::get(format!("/v1/files/{}", file_id)))
            .await
    }

    /// Add watermarks to a batch of files.
    pub async fn batch_add_watermark(&self, request: &BatchWatermarkRequest) -> Result<ApiResult> {
        if request.files.is_empty() {
            return Err(EsignError::Validation("files is required".to_string()));
        }
        if request.notify_url.is_some() {
            require("thirdOrderNo", request.third_order_no.as_deref().unwrap_or(""))?;
        }

        let spec = RequestSpec::post("/v1/files/batchAddWatermark").params(request)?;
        self.access.execute(spec).await
    }
}
