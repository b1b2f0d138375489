mod course;
pub use course::{Course, CourseInput, Video, VideoInput};

mod course_ref;
pub use course_ref::{CourseRef, CourseSummary};

mod progress;
pub use progress::ProgressRecord;

mod certificate;
pub use certificate::{Certificate, CertificateVerification, GeneratedCertificate};

mod user;
pub use user::{
    LoginInput, PasswordChangeInput, ProfileUpdateInput, RegisterInput, User, UserRole,
};
