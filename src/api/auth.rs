use reqwest::Method;

use crate::api::{ApiClient, ApiResult};
use crate::model::entity::{LoginInput, RegisterInput, User};
use crate::model::{ApiResponse, AuthResponse};

impl ApiClient {
    #[tracing::instrument(skip_all, fields(email = %input.email))]
    pub async fn login(&self, input: &LoginInput) -> ApiResult<AuthResponse> {
        let request = self.request(Method::POST, &["auth", "login"])?.json(input);
        self.send_json(request).await
    }

    #[tracing::instrument(skip_all, fields(email = %input.email, role = %input.role))]
    pub async fn register(&self, input: &RegisterInput) -> ApiResult<AuthResponse> {
        let request = self.request(Method::POST, &["auth", "register"])?.json(input);
        self.send_json(request).await
    }

    pub async fn me(&self) -> ApiResult<User> {
        let request = self.request(Method::GET, &["auth", "me"])?;
        let response: ApiResponse<User> = self.send_json(request).await?;
        Ok(response.data)
    }
}
