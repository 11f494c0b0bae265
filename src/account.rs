//! Account operations.
//!
//! This module provides the AccountClient for personal and organization
//! accounts. Each account can be addressed by the provider's account id or by
//! the third-party id it was created with.

use crate::access::AccessLayer;
use crate::error::{Result, require};
use crate::request::{RequestSpec, path_segment};
use crate::types::{
    ApiResult, CreateOrganizeAccount, CreatePersonalAccount, UpdateOrganizeAccount,
    UpdatePersonalAccount,
};
use serde::Serialize;
use std::sync::Arc;

const THIRD_PARTY_USER_ID: &str = "thirdPartyUserId";

/// Client for account operations.
///
/// Access via `client.account()`.
pub struct AccountClient {
    access: Arc<AccessLayer>,
}

impl AccountClient {
    pub(crate) fn new(access: Arc<AccessLayer>) -> Self {
        Self { access }
    }

    /// Create a personal account.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign::{Client, types::CreatePersonalAccount};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("app-id", "secret")?;
    ///
    ///     let mut request = CreatePersonalAccount::new(
    ///         "user-1001",
    ///         "Alice",
    ///         "CRED_PSN_CH_IDCARD",
    ///         "110101199001011234",
    ///     );
    ///     request.mobile = Some("13800000000".to_string());
    ///
    ///     let account = client.account().create_personal_account(&request).await?;
    ///     println!("Account id: {:?}", account.get_str("accountId"));
    ///     Ok(())
    /// }
    /// ```
    pub async fn create_personal_account(
        &self,
        request: &CreatePersonalAccount,
    ) -> Result<ApiResult> {
        require("thirdPartyUserId", &request.third_party_user_id)?;
        require("name", &request.name)?;
        require("idType", &request.id_type)?;
        require("idNumber", &request.id_number)?;

        let spec = RequestSpec::post("/v1/accounts/createByThirdPartyUserId").params(request)?;
        self.access.execute(spec).await
    }

    /// Update a personal account by account id.
    pub async fn update_personal_account_by_id(
        &self,
        account_id: &str,
        update: &UpdatePersonalAccount,
    ) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;

        let spec = RequestSpec::post(format!("/v1/accounts/{}", account_id)).params(update)?;
        self.access.execute(spec).await
    }

    /// Update a personal account by third-party user id.
    pub async fn update_personal_account_by_third_id(
        &self,
        third_party_user_id: &str,
        update: &UpdatePersonalAccount,
    ) -> Result<ApiResult> {
        require("thirdPartyUserId", third_party_user_id)?;

        let spec = RequestSpec::post("/v1/accounts/updateByThirdId")
            .query(THIRD_PARTY_USER_ID, third_party_user_id)
            .params(update)?;
        self.access.execute(spec).await
    }

    /// Query a personal account by account id.
    ///
    /// An unknown id surfaces as [`EsignError::Http`](crate::EsignError::Http)
    /// or a business error, never as an empty result.
    pub async fn query_personal_account_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;

        self.access
            .execute(RequestSpec::get(format!("/v1/accounts/{}", account_id)))
            .await
    }

    /// Query a personal account by third-party user id.
    pub async fn query_personal_account_by_third_id(
        &self,
        third_party_user_id: &str,
    ) -> Result<ApiResult> {
        require("thirdPartyUserId", third_party_user_id)?;

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Params<'a> {
            third_party_user_id: &'a str,
        }

        let spec = RequestSpec::get("/v1/accounts/getByThirdId").params(&Params {
            third_party_user_id,
        })?;
        self.access.execute(spec).await
    }

    /// Delete a personal account by account id.
    pub async fn delete_personal_account_by_id(&self, account_id: &str) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;

        self.access
            .execute(RequestSpec::delete(format!("/v1/accounts/{}", account_id)))
            .await
    }

    /// Delete a personal account by third-party user id.
    pub async fn delete_personal_account_by_third_id(
        &self,
        third_party_user_id: &str,
    ) -> Result<ApiResult> {
        require("thirdPartyUserId", third_party_user_id)?;

        let spec = RequestSpec::delete("/v1/accounts/deleteByThirdId")
            .query(THIRD_PARTY_USER_ID, third_party_user_id);
        self.access.execute(spec).await
    }

    /// Set the signing password of an account.
    ///
    /// # Arguments
    ///
    /// * `account_id` - The personal account id
    /// * `password` - MD5 digest of the password, hex encoded
    pub async fn set_sign_pwd(&self, account_id: &str, password: &str) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;
        require("password", password)?;

        #[derive(Serialize)]
        struct Params<'a> {
            password: &'a str,
        }

        let spec = RequestSpec::post(format!("/v1/accounts/{}/setSignPwd", account_id))
            .params(&Params { password })?;
        self.access.execute(spec).await
    }

    /// Create an organization account.
    pub async fn create_organize_account(
        &self,
        request: &CreateOrganizeAccount,
    ) -> Result<ApiResult> {
        require("thirdPartyUserId", &request.third_party_user_id)?;
        require("creator", &request.creator_account_id)?;
        require("name", &request.name)?;
        require("idType", &request.id_type)?;
        require("idNumber", &request.id_number)?;

        let spec =
            RequestSpec::post("/v1/organizations/createByThirdPartyUserId").params(request)?;
        self.access.execute(spec).await
    }

    /// Update an organization account by org id.
    pub async fn update_organize_account_by_id(
        &self,
        org_id: &str,
        update: &UpdateOrganizeAccount,
    ) -> Result<ApiResult> {
        let org_id = path_segment("orgId", org_id)?;

        let spec = RequestSpec::put(format!("/v1/organizations/{}", org_id)).params(update)?;
        self.access.execute(spec).await
    }

    /// Update an organization account by third-party id.
    pub async fn update_organize_account_by_third_id(
        &self,
        third_party_user_id: &str,
        update: &UpdateOrganizeAccount,
    ) -> Result<ApiResult> {
        require("thirdPartyUserId", third_party_user_id)?;

        let spec = RequestSpec::put("/v1/organizations/updateByThirdId")
            .query(THIRD_PARTY_USER_ID, third_party_user_id)
            .params(update)?;
        self.access.execute(spec).await
    }

    /// Query an organization account by org id.
    pub async fn query_organize_account_by_org_id(&self, org_id: &str) -> Result<ApiResult> {
        let org_id = path_segment("orgId", org_id)?;

        self.access
            .execute(RequestSpec::get(format!("/v1/organizations/{}", org_id)))
            .await
    }

    /// Query an organization account by third-party id.
    pub async fn query_organize_account_by_third_id(
        &self,
        third_party_user_id: &str,
    ) -> Result<ApiResult> {
        require("thirdPartyUserId", third_party_user_id)?;

        let spec = RequestSpec::get("/v1/organizations/getByThirdId")
            .query(THIRD_PARTY_USER_ID, third_party_user_id);
        self.access.execute(spec).await
    }

    /// Delete an organization account by org id.
    pub async fn delete_organize_account_by_org_id(&self, org_id: &str) -> Result<ApiResult> {
        let org_id = path_segment("orgId", org_id)?;

        self.access
            .execute(RequestSpec::delete(format!("/v1/organizations/{}", org_id)))
            .await
    }

    /// Delete an organization account by third-party id.
    pub async fn delete_organize_account_by_third_id(
        &self,
        third_party_user_id: &str,
    ) -> Result<ApiResult> {
        require("thirdPartyUserId", third_party_user_id)?;

        let spec = RequestSpec::delete("/v1/organizations/deleteByThirdId")
            .query(THIRD_PARTY_USER_ID, third_party_user_id);
        self.access.execute(spec).await
    }

    /// Allow the platform to sign silently on behalf of an account.
    ///
    /// # Arguments
    ///
    /// * `account_id` - Personal or organization account id
    /// * `deadline` - Authorization end, `yyyy-MM-dd HH:mm:ss`; open-ended when `None`
    pub async fn set_sign_auth(&self, account_id: &str, deadline: Option<&str>) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;

        #[derive(Serialize)]
        struct Params<'a> {
            deadline: Option<&'a str>,
        }

        let spec = RequestSpec::post(format!("/v1/signAuth/{}", account_id))
            .params(&Params { deadline })?;
        self.access.execute(spec).await
    }

    /// Revoke silent signing for an account.
    pub async fn delete_sign_auth(&self, account_id: &str) -> Result<ApiResult> {
        let account_id = path_segment("accountId", account_id)?;

        self.access
            .execute(RequestSpec::delete(format!("/v1/signAuth/{}", account_id)))
            .await
    }
}
