use reqwest::Method;

use crate::api::{ApiClient, ApiResult};
use crate::model::entity::{Certificate, CertificateVerification, GeneratedCertificate};
use crate::model::{ApiListResponse, ApiResponse};

impl ApiClient {
    pub async fn generate_certificate(&self, course_id: &str) -> ApiResult<GeneratedCertificate> {
        let request = self.request(Method::POST, &["certificates", "generate", course_id])?;
        self.send_json(request).await
    }

    /// Raw PDF bytes.
    pub async fn download_certificate(&self, certificate_id: &str) -> ApiResult<Vec<u8>> {
        let request = self.request(Method::GET, &["certificates", "download", certificate_id])?;
        self.send_bytes(request).await
    }

    pub async fn verify_certificate(
        &self,
        certificate_id: &str,
    ) -> ApiResult<ApiResponse<CertificateVerification>> {
        let request = self.request(Method::GET, &["certificates", "verify", certificate_id])?;
        self.send_json(request).await
    }

    pub async fn my_certificates(&self) -> ApiResult<Vec<Certificate>> {
        let request = self.request(Method::GET, &["certificates", "my-certificates"])?;
        let response: ApiListResponse<Certificate> = self.send_json(request).await?;
        Ok(response.data)
    }

    pub async fn all_certificates(&self) -> ApiResult<Vec<Certificate>> {
        let request = self.request(Method::GET, &["certificates"])?;
        let response: ApiListResponse<Certificate> = self.send_json(request).await?;
        Ok(response.data)
    }
}
