//! Type definitions for the esign SDK.
//!
//! This module contains the parsed result type and the parameter structs for
//! every endpoint. Field names serialize to the provider's camelCase wire
//! names; `None` fields are never sent.

use crate::error::{EsignError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Read-only view over a parsed response payload.
///
/// Holds the envelope's data field, or the whole body when the response had
/// no envelope. Empty when the provider returned nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResult(Option<Value>);

impl ApiResult {
    pub(crate) fn new(value: Value) -> Self {
        match value {
            Value::Null => Self(None),
            value => Self(Some(value)),
        }
    }

    pub(crate) fn empty() -> Self {
        Self(None)
    }

    /// True when the response carried no payload.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The raw payload.
    pub fn value(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    /// Top-level field lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_ref().and_then(|v| v.get(key))
    }

    /// Top-level string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Lookup by JSON pointer, e.g. `"/signfieldBeans/0/signfieldId"`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.0.as_ref().and_then(|v| v.pointer(pointer))
    }

    /// Deserializes the payload into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let value = self.0.clone().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| EsignError::Decode(e.to_string()))
    }

    pub fn into_value(self) -> Option<Value> {
        self.0
    }
}

/// Request to create a personal account bound to a third-party user id.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonalAccount {
    /// Caller-side unique user id.
    pub third_party_user_id: String,
    pub name: String,
    /// Credential type, usually `CRED_PSN_CH_IDCARD`.
    pub id_type: String,
    pub id_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CreatePersonalAccount {
    pub fn new(
        third_party_user_id: impl Into<String>,
        name: impl Into<String>,
        id_type: impl Into<String>,
        id_number: impl Into<String>,
    ) -> Self {
        Self {
            third_party_user_id: third_party_user_id.into(),
            name: name.into(),
            id_type: id_type.into(),
            id_number: id_number.into(),
            mobile: None,
            email: None,
        }
    }
}

/// Changes to a personal account. Omitted fields stay unchanged.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonalAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    /// Only accepted while the account has no id number yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
}

/// Request to create an organization account.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizeAccount {
    /// Caller-side unique organization id, e.g. the social credit code.
    pub third_party_user_id: String,
    /// Account id of the personal account creating the organization.
    #[serde(rename = "creator")]
    pub creator_account_id: String,
    pub name: String,
    /// Credential type, usually `CRED_ORG_USCC`.
    pub id_type: String,
    pub id_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_legal_id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_legal_name: Option<String>,
}

/// Changes to an organization account. Omitted fields stay unchanged.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizeAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_legal_id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_legal_name: Option<String>,
}

/// Request for a file upload URL.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequest {
    /// Base64 of the file's binary MD5 digest.
    pub content_md5: String,
    /// `application/pdf` or `application/octet-stream`.
    pub content_type: String,
    #[serde(rename = "convert2Pdf")]
    pub convert_to_pdf: bool,
    /// File name including its extension, e.g. `contract.pdf`.
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Owning personal or organization account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

/// Request to create a document template through an upload URL.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UploadTemplateRequest {
    pub content_md5: String,
    pub content_type: String,
    #[serde(rename = "convert2Pdf")]
    pub convert_to_pdf: bool,
    pub file_name: String,
}

/// Input component kinds of a document template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Text,
    Number,
    Date,
    SignArea,
}

impl ComponentType {
    pub fn code(self) -> u8 {
        match self {
            ComponentType::Text => 1,
            ComponentType::Number => 2,
            ComponentType::Date => 3,
            ComponentType::SignArea => 6,
        }
    }
}

impl Serialize for ComponentType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// An input component placed on a document template.
///
/// Built with [`InputComponent::new`], which fills in the provider defaults
/// (font 1, size 12, black text, required).
#[derive(Debug, Clone, PartialEq)]
pub struct InputComponent {
    /// Set to update an existing component, unset to add one.
    pub id: Option<String>,
    /// Template-unique key usable when filling the template.
    pub key: Option<String>,
    pub component_type: ComponentType,
    pub label: String,
    pub required: bool,
    /// Format rule for number and date components, e.g. `#00.0#` or `yyyy-MM-dd`.
    pub limit: Option<String>,
    pub width: f64,
    pub height: f64,
    /// 1 SimSun, 2 NSimSun, 3 Microsoft YaHei, 4 SimHei, 5 KaiTi.
    pub font: u8,
    pub font_size: u32,
    pub text_color: String,
    pub page: u32,
    /// Coordinates from the bottom-left corner.
    pub x: f64,
    pub y: f64,
}

impl InputComponent {
    pub fn new(
        component_type: ComponentType,
        label: impl Into<String>,
        width: f64,
        height: f64,
        page: u32,
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            id: None,
            key: None,
            component_type,
            label: label.into(),
            required: true,
            limit: None,
            width,
            height,
            font: 1,
            font_size: 12,
            text_color: "#000000".to_string(),
            page,
            x,
            y,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructComponentBody<'a> {
    struct_component: StructComponent<'a>,
}

#[derive(Serialize)]
pub(crate) struct StructComponent<'a> {
    id: Option<&'a str>,
    key: Option<&'a str>,
    #[serde(rename = "type")]
    component_type: ComponentType,
    context: ComponentContext<'a>,
}

#[derive(Serialize)]
struct ComponentContext<'a> {
    label: &'a str,
    required: bool,
    limit: Option<&'a str>,
    style: ComponentStyle<'a>,
    pos: ComponentPos,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComponentStyle<'a> {
    width: f64,
    height: f64,
    font: u8,
    font_size: u32,
    text_color: &'a str,
}

#[derive(Serialize)]
struct ComponentPos {
    page: u32,
    x: f64,
    y: f64,
}

impl<'a> From<&'a InputComponent> for StructComponentBody<'a> {
    fn from(c: &'a InputComponent) -> Self {
        Self {
            struct_component: StructComponent {
                id: c.id.as_deref(),
                key: c.key.as_deref(),
                component_type: c.component_type,
                context: ComponentContext {
                    label: &c.label,
                    required: c.required,
                    limit: c.limit.as_deref(),
                    style: ComponentStyle {
                        width: c.width,
                        height: c.height,
                        font: c.font,
                        font_size: c.font_size,
                        text_color: &c.text_color,
                    },
                    pos: ComponentPos {
                        page: c.page,
                        x: c.x,
                        y: c.y,
                    },
                },
            },
        }
    }
}

/// Request to create a file from a document template.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileByTemplate {
    /// File name including its extension.
    pub name: String,
    pub template_id: String,
    /// Component key to fill value.
    pub simple_form_fields: Map<String, Value>,
}

/// Request to watermark a batch of files.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchWatermarkRequest {
    /// Per-file watermark descriptions, passed through as given.
    pub files: Vec<Value>,
    /// Called once every watermark has been applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    /// Caller-side unique serial number, required with `notify_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_order_no: Option<String>,
}

/// Template seal for a personal account.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PersonalSealTemplate {
    pub alias: String,
    pub color: String,
    pub height: u32,
    pub width: u32,
    #[serde(rename = "type")]
    pub template_type: String,
}

impl Default for PersonalSealTemplate {
    fn default() -> Self {
        Self {
            alias: String::new(),
            color: "RED".to_string(),
            height: 95,
            width: 95,
            template_type: "SQUARE".to_string(),
        }
    }
}

/// Template seal for an organization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OfficialSealTemplate {
    pub alias: String,
    pub color: String,
    pub height: u32,
    pub width: u32,
    /// Horizontal text.
    pub htext: String,
    /// Bottom arc text.
    pub qtext: String,
    #[serde(rename = "type")]
    pub template_type: String,
    /// Central pattern.
    pub central: String,
}

impl Default for OfficialSealTemplate {
    fn default() -> Self {
        Self {
            alias: String::new(),
            color: "RED".to_string(),
            height: 159,
            width: 159,
            htext: String::new(),
            qtext: String::new(),
            template_type: "TEMPLATE_ROUND".to_string(),
            central: "STAR".to_string(),
        }
    }
}

/// Seal made from an image. `data` holds the raw image bytes and is sent
/// base64-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSeal {
    pub data: Vec<u8>,
    pub alias: String,
    pub height: u32,
    pub width: u32,
    /// Make the image background transparent.
    pub transparent_flag: bool,
}

impl ImageSeal {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            alias: String::new(),
            height: 95,
            width: 95,
            transparent_flag: false,
        }
    }
}

/// Request to create and start a flow in one call.
///
/// `docs`, `flow_info` and `signers` follow the provider's one-step schema
/// and are passed through as given.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlowOneStep {
    pub docs: Vec<Value>,
    pub flow_info: Value,
    pub signers: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub copiers: Vec<Value>,
}

/// Request to create an empty sign flow.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSignFlow {
    /// Subject shown to signers.
    pub business_scene: String,
    /// Callback for flow status notifications.
    pub notice_developer_url: Option<String>,
    /// Archive automatically once every signer is done.
    pub auto_archive: bool,
}

impl CreateSignFlow {
    pub fn new(business_scene: impl Into<String>) -> Self {
        Self {
            business_scene: business_scene.into(),
            notice_developer_url: None,
            auto_archive: true,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSignFlowBody<'a> {
    auto_archive: bool,
    business_scene: &'a str,
    config_info: ConfigInfo<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigInfo<'a> {
    notice_developer_url: Option<&'a str>,
}

impl<'a> From<&'a CreateSignFlow> for CreateSignFlowBody<'a> {
    fn from(r: &'a CreateSignFlow) -> Self {
        Self {
            auto_archive: r.auto_archive,
            business_scene: &r.business_scene,
            config_info: ConfigInfo {
                notice_developer_url: r.notice_developer_url.as_deref(),
            },
        }
    }
}

/// A document attached to a sign flow.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlowDocument {
    pub file_id: String,
    /// 1 when the file is password protected.
    pub encryption: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_password: Option<String>,
}

impl FlowDocument {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            ..Default::default()
        }
    }
}

/// Position of a sign field.
#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PosBean {
    pub pos_page: u32,
    pub pos_x: f64,
    pub pos_y: f64,
}

impl PosBean {
    pub fn new(pos_page: u32, pos_x: f64, pos_y: f64) -> Self {
        Self {
            pos_page,
            pos_x,
            pos_y,
        }
    }
}

/// Sign field stamped automatically with a platform seal.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSignField {
    pub file_id: String,
    pub seal_id: String,
    pub pos_bean: PosBean,
    /// 1 to add a signing date next to the seal.
    pub sign_date_bean_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_date_bean: Option<Value>,
}

impl PlatformSignField {
    pub fn new(file_id: impl Into<String>, seal_id: impl Into<String>, pos_bean: PosBean) -> Self {
        Self {
            file_id: file_id.into(),
            seal_id: seal_id.into(),
            pos_bean,
            sign_date_bean_type: 0,
            sign_date_bean: None,
        }
    }
}

/// Sign field the signer stamps by hand.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HandSignField {
    pub file_id: String,
    pub signer_account_id: String,
    pub pos_bean: PosBean,
    pub sign_date_bean_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_date_bean: Option<Value>,
}

impl HandSignField {
    pub fn new(
        file_id: impl Into<String>,
        signer_account_id: impl Into<String>,
        pos_bean: PosBean,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            signer_account_id: signer_account_id.into(),
            pos_bean,
            sign_date_bean_type: 0,
            sign_date_bean: None,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct SignFields<'a, T> {
    pub signfields: [&'a T; 1],
}

/// Query for a signing or preview URL.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteUrlQuery {
    pub account_id: String,
    /// Sign on behalf of this organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organize_id: Option<String>,
    /// 0 signing link, 1 preview link.
    pub url_type: u8,
    /// Required when embedding in an app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_scheme: Option<String>,
}

impl ExecuteUrlQuery {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }
}

/// Request for an organization identity verification URL.
///
/// `auth_type`, `context_id`, `notify_url` and `redirect_url` are left out of
/// the request body when `None`, rather than sent as empty strings; the
/// platform treats both the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgIdentityRequest {
    /// Account id of the person carrying out the verification.
    pub agent_account_id: String,
    /// Default verification method.
    pub auth_type: Option<String>,
    pub repeat_identity: bool,
    /// Caller-side business context id.
    pub context_id: Option<String>,
    /// Receives verification status changes.
    pub notify_url: Option<String>,
    /// Page opened when verification finishes.
    pub redirect_url: Option<String>,
    pub show_result_page: bool,
}

impl OrgIdentityRequest {
    pub fn new(agent_account_id: impl Into<String>) -> Self {
        Self {
            agent_account_id: agent_account_id.into(),
            auth_type: None,
            repeat_identity: true,
            context_id: None,
            notify_url: None,
            redirect_url: None,
            show_result_page: true,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrgIdentityBody<'a> {
    auth_type: Option<&'a str>,
    repeat_identity: bool,
    agent_account_id: &'a str,
    context_info: ContextInfo<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContextInfo<'a> {
    context_id: Option<&'a str>,
    notify_url: Option<&'a str>,
    redirect_url: Option<&'a str>,
    show_result_page: bool,
}

impl<'a> From<&'a OrgIdentityRequest> for OrgIdentityBody<'a> {
    fn from(r: &'a OrgIdentityRequest) -> Self {
        Self {
            auth_type: r.auth_type.as_deref(),
            repeat_identity: r.repeat_identity,
            agent_account_id: &r.agent_account_id,
            context_info: ContextInfo {
                context_id: r.context_id.as_deref(),
                notify_url: r.notify_url.as_deref(),
                redirect_url: r.redirect_url.as_deref(),
                show_result_page: r.show_result_page,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::compact;
    use serde_json::json;

    #[test]
    fn test_create_personal_account_serialization() {
        let req = CreatePersonalAccount::new("u1", "Alice", "CRED_PSN_CH_IDCARD", "110101199001011234");

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            json!({
                "thirdPartyUserId": "u1",
                "name": "Alice",
                "idType": "CRED_PSN_CH_IDCARD",
                "idNumber": "110101199001011234"
            })
        );
    }

    #[test]
    fn test_creator_rename() {
        let req = CreateOrganizeAccount {
            third_party_user_id: "org-1".to_string(),
            creator_account_id: "A1".to_string(),
            name: "Acme".to_string(),
            id_type: "CRED_ORG_USCC".to_string(),
            id_number: "91110000000000000X".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["creator"], "A1");
        assert!(json.get("orgLegalName").is_none());
    }

    #[test]
    fn test_struct_component_defaults() {
        let component = InputComponent::new(ComponentType::Date, "Signed on", 120.0, 20.0, 2, 100.0, 200.0);
        let body = compact(serde_json::to_value(StructComponentBody::from(&component)).unwrap());

        assert_eq!(
            body,
            json!({
                "structComponent": {
                    "type": 3,
                    "context": {
                        "label": "Signed on",
                        "required": true,
                        "style": {
                            "width": 120.0,
                            "height": 20.0,
                            "font": 1,
                            "fontSize": 12,
                            "textColor": "#000000"
                        },
                        "pos": {"page": 2, "x": 100.0, "y": 200.0}
                    }
                }
            })
        );
    }

    #[test]
    fn test_upload_request_wire_names() {
        let req = UploadFileRequest {
            content_md5: "md5==".to_string(),
            content_type: "application/pdf".to_string(),
            file_name: "contract.pdf".to_string(),
            file_size: 2048,
            ..Default::default()
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["convert2Pdf"], false);
        assert_eq!(json["contentMd5"], "md5==");
        assert!(json.get("accountId").is_none());
    }

    #[test]
    fn test_one_step_skips_empty_lists() {
        let req = CreateFlowOneStep {
            docs: vec![json!({"fileId": "D1"})],
            flow_info: json!({"businessScene": "lease"}),
            signers: vec![json!({"signerAccount": {"signerAccountId": "A1"}})],
            ..Default::default()
        };

        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("attachments").is_none());
        assert!(json.get("copiers").is_none());
        assert_eq!(json["flowInfo"]["businessScene"], "lease");
    }

    #[test]
    fn test_api_result_access() {
        let result = ApiResult::new(json!({"flowId": "F1", "docs": [{"fileId": "D1"}]}));
        assert!(!result.is_empty());
        assert_eq!(result.get_str("flowId"), Some("F1"));
        assert_eq!(result.pointer("/docs/0/fileId"), Some(&json!("D1")));

        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Flow {
            flow_id: String,
        }
        let flow: Flow = result.deserialize().unwrap();
        assert_eq!(flow.flow_id, "F1");
    }

    #[test]
    fn test_api_result_empty() {
        assert!(ApiResult::new(Value::Null).is_empty());
        assert!(ApiResult::empty().get("anything").is_none());
        assert!(ApiResult::empty().deserialize::<String>().is_err());
    }
}
