use std::path::{Path, PathBuf};

use crate::api::ApiError;
use crate::cache::{Cached, QueryKey};
use crate::context::{AppContext, ContextError, ContextResult};
use crate::model::entity::{Certificate, CertificateVerification, GeneratedCertificate};
use crate::model::validate_certificate_id;

/// Outcome of a public certificate check. An unknown id is a normal outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Valid(CertificateVerification),
    Invalid { certificate_id: String },
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// `certificate-{id}.pdf`, with anything outside `[A-Za-z0-9_-]` replaced.
pub(crate) fn certificate_file_name(certificate_id: &str) -> String {
    let safe: String = certificate_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("certificate-{safe}.pdf")
}

impl AppContext {
    /// Requests a certificate for a course the user has fully completed.
    ///
    /// A second call for the same course while the first is outstanding fails
    /// with [`ContextError::GenerationInFlight`]. Failures leave progress and
    /// eligibility untouched.
    #[tracing::instrument(skip(self))]
    pub async fn generate_certificate(&self, course_id: &str) -> ContextResult<GeneratedCertificate> {
        let api = self.authed_client().await?;
        let _permit = self.gate.try_acquire(course_id).ok_or_else(|| {
            ContextError::GenerationInFlight {
                course_id: course_id.to_string(),
            }
        })?;

        let overview = self.course_overview(course_id).await?;
        if !overview.eligible() {
            return Err(ContextError::NotEligible {
                course_id: course_id.to_string(),
            });
        }

        let generated = self.checked(&api, api.generate_certificate(course_id).await).await?;
        self.invalidate(&[QueryKey::Certificates]).await;

        tracing::info!(certificate_id = %generated.certificate_id, "certificate generated");
        Ok(generated)
    }

    /// Saves the certificate PDF as `certificate-{id}.pdf` in `dir`, or in the
    /// configured downloads directory.
    #[tracing::instrument(skip(self))]
    pub async fn download_certificate(
        &self,
        certificate_id: &str,
        dir: Option<&Path>,
    ) -> ContextResult<PathBuf> {
        validate_certificate_id(certificate_id)?;

        let api = self.client().await;
        let bytes = self
            .checked(&api, api.download_certificate(certificate_id).await)
            .await?;

        let dir = dir.unwrap_or(self.config.downloads().dir());
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(certificate_file_name(certificate_id));
        tokio::fs::write(&path, bytes).await?;

        tracing::info!("certificate saved to {}", path.display());
        Ok(path)
    }

    /// Public check of a certificate id. Works without a session.
    #[tracing::instrument(skip(self))]
    pub async fn verify_certificate(&self, certificate_id: &str) -> ContextResult<Verification> {
        validate_certificate_id(certificate_id)?;

        let invalid = || Verification::Invalid {
            certificate_id: certificate_id.to_string(),
        };

        let api = self.client().await;
        match api.verify_certificate(certificate_id).await {
            Ok(response) if response.success => Ok(Verification::Valid(response.data)),
            Ok(_) => Ok(invalid()),
            Err(ApiError::NotFound { .. } | ApiError::Rejected { .. } | ApiError::Decode(_)) => {
                Ok(invalid())
            }
            Err(e) => self.checked(&api, Err(e)).await,
        }
    }

    pub async fn my_certificates(&self) -> ContextResult<Vec<Certificate>> {
        let api = self.authed_client().await?;
        self.fetch_cached(
            &api,
            QueryKey::Certificates,
            |cache| cache.certificates(),
            Cached::Certificates,
            api.my_certificates(),
        )
        .await
    }

    /// Every certificate the backend lets this session see; an unavailable
    /// listing reads as empty.
    pub async fn all_certificates(&self) -> ContextResult<Vec<Certificate>> {
        let api = self.authed_client().await?;
        match self.checked(&api, api.all_certificates().await).await {
            Ok(certificates) => Ok(certificates),
            Err(e @ ContextError::Api(ApiError::Unauthorized { .. })) => Err(e),
            Err(e) => {
                tracing::warn!("certificate listing unavailable: {e}");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn file_name_is_sanitized() {
        assert_eq!(certificate_file_name("CERT-123_a"), "certificate-CERT-123_a.pdf");
        assert_eq!(certificate_file_name("../etc/passwd"), "certificate-___etc_passwd.pdf");
    }

    #[test]
    fn verification_validity() {
        let invalid = Verification::Invalid {
            certificate_id: "x".into(),
        };
        assert!(!invalid.is_valid());
    }
}
