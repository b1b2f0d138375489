//! Application context: the one owner of session, query cache and API
//! client. Constructed at start, handed to whoever needs it, torn down on
//! logout. Session changes are announced on a broadcast channel instead of
//! being poked into other components.

mod error;
pub use error::{ContextError, ContextResult};

mod auth;
mod certificates;
pub use certificates::Verification;
mod courses;
mod progress;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, broadcast};
use tokio_util::sync::CancellationToken;

use crate::Config;
use crate::api::{ApiClient, ApiResult};
use crate::cache::{Cached, QueryCache, QueryKey};
use crate::error::log_error;
use crate::model::entity::{User, UserRole};
use crate::routing::{NavigationDecision, RoleDecision, RoleGuard, RouteTable};
use crate::session::{Session, SessionEvent, SessionStore};
use crate::tracker::GenerationGate;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug)]
pub struct AppContext {
    config: Config,
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<Session>>,
    cache: Mutex<QueryCache>,
    events: broadcast::Sender<SessionEvent>,
    gate: GenerationGate,
    routes: RouteTable,
    shutdown: CancellationToken,
}

impl AppContext {
    /// Builds the context and hydrates the session from `store`.
    #[tracing::instrument(skip_all)]
    pub async fn init(config: Config, store: Arc<dyn SessionStore>) -> ContextResult<Self> {
        let api = ApiClient::from_config(&config)?;
        let session = store.load().await?;
        tracing::debug!(has_session = session.is_some(), "session hydrated");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shutdown = CancellationToken::new();

        Ok(Self {
            config,
            api,
            store,
            session: RwLock::new(session),
            cache: Mutex::new(QueryCache::new(shutdown.clone())),
            events,
            gate: GenerationGate::new(),
            routes: RouteTable::default(),
            shutdown,
        })
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Cancelling this token aborts every outstanding fetch.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn generation_gate(&self) -> &GenerationGate {
        &self.gate
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Locally cached user, no network.
    pub async fn user(&self) -> Option<User> {
        self.session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.user().cloned())
    }

    pub async fn has_token(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Path classification guard. Runs before any page logic.
    pub async fn navigate(&self, path: &str) -> NavigationDecision {
        self.routes.decide(path, self.has_token().await)
    }

    /// Role guard, run after [`AppContext::navigate`] allowed the path.
    pub async fn check_role(&self, path: &str) -> RoleDecision {
        match RoleGuard::for_path(path) {
            Some(guard) => guard.check(self.user().await.as_ref()),
            None => RoleDecision::Allow,
        }
    }

    async fn client(&self) -> ApiClient {
        let token = self
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.token().to_string());
        self.api.with_token(token)
    }

    async fn authed_client(&self) -> ContextResult<ApiClient> {
        let session = self.session.read().await;
        let session = session.as_ref().ok_or(ContextError::NotAuthenticated)?;
        Ok(self.api.with_token(Some(session.token().to_string())))
    }

    async fn require_role(&self, role: UserRole) -> ContextResult<ApiClient> {
        let session = self.session.read().await;
        let session = session.as_ref().ok_or(ContextError::NotAuthenticated)?;

        match RoleGuard::new(role).check(session.user()) {
            RoleDecision::Allow => Ok(self.api.with_token(Some(session.token().to_string()))),
            RoleDecision::RedirectToLogin => Err(ContextError::RoleRequired { role }),
        }
    }

    fn emit(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Drops the session after the backend refused `refused`. A refusal of a
    /// token that is no longer current is ignored.
    async fn expire(&self, refused: Option<&str>) {
        let had_session = {
            let mut session = self.session.write().await;
            let is_current = match (session.as_ref(), refused) {
                (Some(current), Some(refused)) => current.token() == refused,
                _ => false,
            };
            if session.is_some() && !is_current {
                tracing::debug!("401 for a superseded token, session kept");
                return;
            }
            session.take().is_some()
        };

        if let Err(e) = self.store.clear().await {
            log_error(&e);
        }
        self.cache.lock().await.clear();

        if had_session {
            tracing::warn!("session expired, cleared local session");
            self.emit(SessionEvent::Expired);
        }
    }

    /// Every backend result passes through here so that a 401 clears the
    /// session `api` was built from.
    async fn checked<T>(&self, api: &ApiClient, result: ApiResult<T>) -> ContextResult<T> {
        match result {
            Err(e) if e.is_unauthorized() => {
                self.expire(api.token()).await;
                Err(e.into())
            }
            other => Ok(other?),
        }
    }

    async fn invalidate(&self, keys: &[QueryKey]) {
        let mut cache = self.cache.lock().await;
        for key in keys {
            cache.invalidate(key);
        }
    }

    /// Serves `key` from cache or runs `fetch`. The result is only cached if
    /// nothing invalidated the key meanwhile; a cancelled fetch yields
    /// [`ContextError::Cancelled`].
    async fn fetch_cached<T, R, W, F>(
        &self,
        api: &ApiClient,
        key: QueryKey,
        read: R,
        wrap: W,
        fetch: F,
    ) -> ContextResult<T>
    where
        T: Clone,
        R: FnOnce(&QueryCache) -> Option<T>,
        W: FnOnce(T) -> Cached,
        F: Future<Output = ApiResult<T>>,
    {
        let ticket = {
            let mut cache = self.cache.lock().await;
            if let Some(hit) = read(&cache) {
                tracing::trace!(?key, "cache hit");
                return Ok(hit);
            }
            cache.begin(key)
        };

        let result = tokio::select! {
            biased;
            _ = ticket.token().cancelled() => return Err(ContextError::Cancelled),
            result = fetch => result,
        };

        let value = self.checked(api, result).await?;
        self.cache.lock().await.store(&ticket, wrap(value.clone()));
        Ok(value)
    }
}
