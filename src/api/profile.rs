use reqwest::Method;
use serde_json::Value;

use crate::api::{ApiClient, ApiResult};
use crate::model::ApiResponse;
use crate::model::entity::{PasswordChangeInput, ProfileUpdateInput, User};

impl ApiClient {
    pub async fn update_profile(&self, input: &ProfileUpdateInput) -> ApiResult<User> {
        let request = self.request(Method::PUT, &["profile"])?.json(input);
        let response: ApiResponse<User> = self.send_json(request).await?;
        Ok(response.data)
    }

    pub async fn change_password(&self, input: &PasswordChangeInput) -> ApiResult<()> {
        let request = self.request(Method::PUT, &["profile", "password"])?.json(input);
        let _: Value = self.send_json(request).await?;
        Ok(())
    }
}
