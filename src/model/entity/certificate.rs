use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{RecordId, entity::CourseRef};

/// An issued certificate. `certificate_id` is the public identifier used in
/// verification links, distinct from the storage id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(flatten)]
    key: RecordId,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    course: Option<CourseRef>,
    certificate_id: String,
    #[serde(default)]
    issued_at: Option<DateTime<Utc>>,
}

impl Certificate {
    pub fn id(&self) -> &str {
        self.key.as_str()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn course(&self) -> Option<&CourseRef> {
        self.course.as_ref()
    }

    pub fn course_id(&self) -> &str {
        self.course.as_ref().map(CourseRef::id).unwrap_or_default()
    }

    pub fn certificate_id(&self) -> &str {
        &self.certificate_id
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }
}

/// Answer of `POST /certificates/generate/{courseId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCertificate {
    #[serde(default)]
    pub success: bool,
    pub certificate_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl GeneratedCertificate {
    /// Relative page paths for download and public verification.
    pub fn download_path(&self) -> String {
        format!("/certificates/download/{}", self.certificate_id)
    }

    pub fn verify_path(&self) -> String {
        format!("/certificates/verify/{}", self.certificate_id)
    }
}

/// Public verification payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateVerification {
    pub certificate_id: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn certificate_course_reference_resolves() {
        let raw = r#"{
            "_id": "db1",
            "user": "u1",
            "course": "c1",
            "certificateId": "CERT-001",
            "issuedAt": "2024-05-02T08:30:00Z"
        }"#;
        let cert: Certificate = serde_json::from_str(raw).unwrap();
        assert_eq!(cert.id(), "db1");
        assert_eq!(cert.course_id(), "c1");
        assert_eq!(cert.certificate_id(), "CERT-001");
    }

    #[test]
    fn generated_certificate_links() {
        let generated: GeneratedCertificate =
            serde_json::from_str(r#"{"success":true,"certificateId":"CERT-9","message":"ok"}"#)
                .unwrap();
        assert_eq!(generated.download_path(), "/certificates/download/CERT-9");
        assert_eq!(generated.verify_path(), "/certificates/verify/CERT-9");
    }
}
