//! In-process stand-in for the platform backend, served over real HTTP so the
//! client is exercised end to end.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ataasil::session::{MemorySessionStore, Session, SessionStore};
use ataasil::{AppContext, Config};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const STUDENT_EMAIL: &str = "amina@example.com";
pub const ADMIN_EMAIL: &str = "root@example.com";
pub const PASSWORD: &str = "secret123";

#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl MockUser {
    fn token(&self) -> String {
        format!("token-{}", self.id)
    }

    fn json(&self) -> Value {
        json!({
            "_id": self.id,
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "role": self.role,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MockCourse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub videos: Vec<String>,
}

impl MockCourse {
    fn json(&self) -> Value {
        let videos: Vec<Value> = self
            .videos
            .iter()
            .map(|v| {
                json!({
                    "_id": v,
                    "id": v,
                    "title": format!("Video {v}"),
                    "url": format!("https://youtu.be/{v}"),
                })
            })
            .collect();

        json!({
            "_id": self.id,
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "videos": videos,
            "createdAt": "2024-01-01T00:00:00.000Z",
        })
    }
}

#[derive(Debug, Clone)]
pub struct MockProgress {
    pub user_id: String,
    pub course_id: String,
    pub completed: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MockCertificate {
    pub certificate_id: String,
    pub user_id: String,
    pub course_id: String,
}

#[derive(Debug, Default)]
pub struct Backend {
    pub users: Vec<MockUser>,
    pub courses: Vec<MockCourse>,
    pub progress: Vec<MockProgress>,
    pub certificates: Vec<MockCertificate>,
    /// Send progress course references as embedded objects.
    pub embed_course_refs: bool,
    /// Answer `/progress/my-progress` with a bare object when there is one record.
    pub single_progress_object: bool,
    pub generate_delay: Option<Duration>,
    /// Applied to `/auth/me` before the token is checked.
    pub me_delay: Option<Duration>,
    /// Tokens answered with 401.
    pub revoked: Vec<String>,
    pub generate_calls: usize,
    pub progress_fetches: usize,
}

pub type Shared = Arc<Mutex<Backend>>;

type Rejection = (StatusCode, Json<Value>);

fn fail(status: StatusCode, message: &str) -> Rejection {
    (status, Json(json!({ "success": false, "error": message })))
}

fn ok(data: Value) -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "data": data }))).into_response()
}

fn ok_list(data: Vec<Value>) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "count": data.len(), "data": data })),
    )
        .into_response()
}

impl Backend {
    /// Course `c1` with videos `v1`, `v2`; a student who completed `v1`; an admin.
    pub fn seeded() -> Self {
        Self {
            users: vec![
                MockUser {
                    id: "u1".into(),
                    name: "Amina".into(),
                    email: STUDENT_EMAIL.into(),
                    password: PASSWORD.into(),
                    role: "student".into(),
                },
                MockUser {
                    id: "u2".into(),
                    name: "Root".into(),
                    email: ADMIN_EMAIL.into(),
                    password: PASSWORD.into(),
                    role: "admin".into(),
                },
            ],
            courses: vec![
                MockCourse {
                    id: "c1".into(),
                    title: "Rust from scratch".into(),
                    description: "Ownership, borrowing and lifetimes".into(),
                    videos: vec!["v1".into(), "v2".into()],
                },
                MockCourse {
                    id: "c2".into(),
                    title: "Async Rust".into(),
                    description: "Futures, tasks and runtimes".into(),
                    videos: vec!["a1".into(), "a2".into(), "a3".into()],
                },
            ],
            progress: vec![MockProgress {
                user_id: "u1".into(),
                course_id: "c1".into(),
                completed: vec!["v1".into()],
            }],
            ..Default::default()
        }
    }

    fn user_by_token(&self, headers: &HeaderMap) -> Result<MockUser, Rejection> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        token
            .filter(|token| !self.revoked.iter().any(|r| r == token))
            .and_then(|token| self.users.iter().find(|u| u.token() == token))
            .cloned()
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authorized to access this route"))
    }

    fn admin(&self, headers: &HeaderMap) -> Result<MockUser, Rejection> {
        let user = self.user_by_token(headers)?;
        if user.role != "admin" {
            return Err(fail(StatusCode::FORBIDDEN, "Admin access required"));
        }
        Ok(user)
    }

    fn course(&self, course_id: &str) -> Option<&MockCourse> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    fn progress_json(&self, progress: &MockProgress) -> Value {
        let course = if self.embed_course_refs {
            let title = self
                .course(&progress.course_id)
                .map(|c| c.title.clone())
                .unwrap_or_default();
            json!({ "_id": progress.course_id, "id": progress.course_id, "title": title })
        } else {
            json!(progress.course_id)
        };

        let done = self
            .course(&progress.course_id)
            .is_some_and(|c| c.videos.iter().all(|v| progress.completed.contains(v)));

        json!({
            "_id": format!("p-{}-{}", progress.user_id, progress.course_id),
            "user": progress.user_id,
            "course": course,
            "completedVideos": progress.completed,
            "completed": done,
            "completedAt": null,
        })
    }

    fn certificate_json(&self, cert: &MockCertificate) -> Value {
        let title = self
            .course(&cert.course_id)
            .map(|c| c.title.clone())
            .unwrap_or_default();
        json!({
            "_id": format!("db-{}", cert.certificate_id),
            "user": cert.user_id,
            "course": { "_id": cert.course_id, "title": title },
            "certificateId": cert.certificate_id,
            "issuedAt": "2024-06-01T12:00:00.000Z",
        })
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Result<Response, Rejection> {
    let backend = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let user = backend
        .users
        .iter()
        .find(|u| u.email == email && u.password == password)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;

    Ok(Json(json!({ "success": true, "token": user.token(), "user": user.json() })).into_response())
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Result<Response, Rejection> {
    let mut backend = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if backend.users.iter().any(|u| u.email == email) {
        return Err(fail(StatusCode::BAD_REQUEST, "User already exists"));
    }

    let user = MockUser {
        id: format!("u{}", backend.users.len() + 1),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email,
        password: body["password"].as_str().unwrap_or_default().to_string(),
        role: body["role"].as_str().unwrap_or("student").to_string(),
    };
    backend.users.push(user.clone());

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "token": user.token(), "user": user.json() })),
    )
        .into_response())
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Result<Response, Rejection> {
    let delay = state.lock().unwrap().me_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let backend = state.lock().unwrap();
    let user = backend.user_by_token(&headers)?;
    Ok(ok(user.json()))
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, Rejection> {
    let mut backend = state.lock().unwrap();
    let id = backend.user_by_token(&headers)?.id;
    let user = backend
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;

    user.name = body["name"].as_str().unwrap_or_default().to_string();
    user.email = body["email"].as_str().unwrap_or_default().to_string();
    Ok(ok(user.json()))
}

async fn change_password(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, Rejection> {
    let mut backend = state.lock().unwrap();
    let id = backend.user_by_token(&headers)?.id;
    let user = backend
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;

    if body["currentPassword"].as_str() != Some(user.password.as_str()) {
        return Err(fail(StatusCode::BAD_REQUEST, "Current password is incorrect"));
    }
    user.password = body["newPassword"].as_str().unwrap_or_default().to_string();
    Ok(ok(json!({})))
}

async fn list_courses(State(state): State<Shared>) -> Response {
    let backend = state.lock().unwrap();
    ok_list(backend.courses.iter().map(MockCourse::json).collect())
}

async fn get_course(State(state): State<Shared>, Path(id): Path<String>) -> Result<Response, Rejection> {
    let backend = state.lock().unwrap();
    let course = backend
        .course(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Course not found"))?;
    Ok(ok(course.json()))
}

fn course_from_body(id: String, body: &Value) -> MockCourse {
    let videos = body["videos"]
        .as_array()
        .map(|videos| {
            videos
                .iter()
                .enumerate()
                .map(|(i, _)| format!("{id}-v{}", i + 1))
                .collect()
        })
        .unwrap_or_default();

    MockCourse {
        title: body["title"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().unwrap_or_default().to_string(),
        videos,
        id,
    }
}

async fn create_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, Rejection> {
    let mut backend = state.lock().unwrap();
    backend.admin(&headers)?;
    let course = course_from_body(format!("c{}", backend.courses.len() + 1), &body);
    let json = course.json();
    backend.courses.push(course);
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": json }))).into_response())
}

async fn update_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, Rejection> {
    let mut backend = state.lock().unwrap();
    backend.admin(&headers)?;
    let course = backend
        .courses
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Course not found"))?;
    *course = course_from_body(id, &body);
    Ok(ok(course.json()))
}

async fn delete_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, Rejection> {
    let mut backend = state.lock().unwrap();
    backend.admin(&headers)?;
    let before = backend.courses.len();
    backend.courses.retain(|c| c.id != id);
    if backend.courses.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Course not found"));
    }
    Ok(ok(json!({})))
}

async fn my_progress(State(state): State<Shared>, headers: HeaderMap) -> Result<Response, Rejection> {
    let mut backend = state.lock().unwrap();
    let user = backend.user_by_token(&headers)?;
    backend.progress_fetches += 1;

    let records: Vec<Value> = backend
        .progress
        .iter()
        .filter(|p| p.user_id == user.id)
        .map(|p| backend.progress_json(p))
        .collect();

    if backend.single_progress_object && records.len() == 1 {
        return Ok(ok(records[0].clone()));
    }
    Ok(ok(json!(records)))
}

async fn mark_completed(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((course_id, video_id)): Path<(String, String)>,
) -> Result<Response, Rejection> {
    let mut backend = state.lock().unwrap();
    let user = backend.user_by_token(&headers)?;
    let course = backend
        .course(&course_id)
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Course not found"))?;
    if !course.videos.contains(&video_id) {
        return Err(fail(StatusCode::NOT_FOUND, "Video not found in this course"));
    }

    let index = match backend
        .progress
        .iter()
        .position(|p| p.user_id == user.id && p.course_id == course_id)
    {
        Some(index) => index,
        None => {
            backend.progress.push(MockProgress {
                user_id: user.id.clone(),
                course_id: course_id.clone(),
                completed: Vec::new(),
            });
            backend.progress.len() - 1
        }
    };

    if !backend.progress[index].completed.contains(&video_id) {
        backend.progress[index].completed.push(video_id);
    }
    let json = backend.progress_json(&backend.progress[index]);
    Ok(ok(json))
}

async fn all_progress(State(state): State<Shared>, headers: HeaderMap) -> Result<Response, Rejection> {
    let backend = state.lock().unwrap();
    backend.admin(&headers)?;
    Ok(ok_list(backend.progress.iter().map(|p| backend.progress_json(p)).collect()))
}

async fn course_progress(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(course_id): Path<String>,
) -> Result<Response, Rejection> {
    let backend = state.lock().unwrap();
    backend.admin(&headers)?;
    Ok(ok_list(
        backend
            .progress
            .iter()
            .filter(|p| p.course_id == course_id)
            .map(|p| backend.progress_json(p))
            .collect(),
    ))
}

async fn generate_certificate(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(course_id): Path<String>,
) -> Result<Response, Rejection> {
    let delay = {
        let mut backend = state.lock().unwrap();
        backend.user_by_token(&headers)?;
        backend.generate_calls += 1;
        backend.generate_delay
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut backend = state.lock().unwrap();
    let user = backend.user_by_token(&headers)?;
    let course = backend
        .course(&course_id)
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Course not found"))?;
    let done = backend
        .progress
        .iter()
        .find(|p| p.user_id == user.id && p.course_id == course_id)
        .is_some_and(|p| course.videos.iter().all(|v| p.completed.contains(v)));
    if !done {
        return Err(fail(StatusCode::BAD_REQUEST, "Course not completed"));
    }

    let certificate_id = format!("CERT-{}", backend.certificates.len() + 1);
    backend.certificates.push(MockCertificate {
        certificate_id: certificate_id.clone(),
        user_id: user.id,
        course_id,
    });

    Ok(Json(json!({
        "success": true,
        "certificateId": certificate_id,
        "message": "Certificate generated successfully",
    }))
    .into_response())
}

async fn download_certificate(State(state): State<Shared>, Path(id): Path<String>) -> Result<Response, Rejection> {
    let backend = state.lock().unwrap();
    if !backend.certificates.iter().any(|c| c.certificate_id == id) {
        return Err(fail(StatusCode::NOT_FOUND, "Certificate not found"));
    }

    let body = format!("%PDF-1.4 certificate {id}").into_bytes();
    Ok(([(header::CONTENT_TYPE, "application/pdf")], body).into_response())
}

async fn verify_certificate(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let backend = state.lock().unwrap();
    let Some(cert) = backend.certificates.iter().find(|c| c.certificate_id == id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Certificate not found" })),
        )
            .into_response();
    };

    let student = backend
        .users
        .iter()
        .find(|u| u.id == cert.user_id)
        .map(|u| u.name.clone())
        .unwrap_or_default();
    let course = backend
        .course(&cert.course_id)
        .map(|c| c.title.clone())
        .unwrap_or_default();

    ok(json!({
        "certificateId": cert.certificate_id,
        "studentName": student,
        "courseName": course,
        "issuedAt": "2024-06-01T12:00:00.000Z",
    }))
}

async fn my_certificates(State(state): State<Shared>, headers: HeaderMap) -> Result<Response, Rejection> {
    let backend = state.lock().unwrap();
    let user = backend.user_by_token(&headers)?;
    Ok(ok_list(
        backend
            .certificates
            .iter()
            .filter(|c| c.user_id == user.id)
            .map(|c| backend.certificate_json(c))
            .collect(),
    ))
}

async fn all_certificates(State(state): State<Shared>, headers: HeaderMap) -> Result<Response, Rejection> {
    let backend = state.lock().unwrap();
    backend.admin(&headers)?;
    Ok(ok_list(
        backend.certificates.iter().map(|c| backend.certificate_json(c)).collect(),
    ))
}

pub fn build_router(state: Shared) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/profile", put(update_profile))
        .route("/profile/password", put(change_password))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/progress/my-progress", get(my_progress))
        .route(
            "/progress/courses/{course_id}/videos/{video_id}/complete",
            post(mark_completed),
        )
        .route("/progress/all", get(all_progress))
        .route("/progress/courses/{course_id}", get(course_progress))
        .route("/certificates", get(all_certificates))
        .route("/certificates/my-certificates", get(my_certificates))
        .route("/certificates/generate/{course_id}", post(generate_certificate))
        .route("/certificates/download/{id}", get(download_certificate))
        .route("/certificates/verify/{id}", get(verify_certificate))
        .with_state(state);

    Router::new().nest("/api/v1", api)
}

/// Serves `backend` on an ephemeral port. Returns the API base URL.
pub async fn spawn_backend(backend: Backend) -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(backend));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api/v1"), state)
}

pub async fn setup_context(base_url: &str, session: Option<Session>) -> (AppContext, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new(session));
    let config = Config::default().with_api_base_url(base_url);
    let ctx = AppContext::init(config, store.clone() as Arc<dyn SessionStore>)
        .await
        .unwrap();
    (ctx, store)
}

/// Seeded backend plus a context logged in as the student.
pub async fn setup_student() -> (AppContext, Shared) {
    let (url, state) = spawn_backend(Backend::seeded()).await;
    let (ctx, _) = setup_context(&url, None).await;
    ctx.login(ataasil::model::entity::LoginInput {
        email: STUDENT_EMAIL.into(),
        password: PASSWORD.into(),
    })
    .await
    .unwrap();
    (ctx, state)
}

pub async fn setup_admin() -> (AppContext, Shared) {
    let (url, state) = spawn_backend(Backend::seeded()).await;
    let (ctx, _) = setup_context(&url, None).await;
    ctx.login(ataasil::model::entity::LoginInput {
        email: ADMIN_EMAIL.into(),
        password: PASSWORD.into(),
    })
    .await
    .unwrap();
    (ctx, state)
}
