use crate::context::{AppContext, ContextError, ContextResult};
use crate::model::Validate;
use crate::model::entity::{
    LoginInput, PasswordChangeInput, ProfileUpdateInput, RegisterInput, User,
};
use crate::session::{Session, SessionEvent};

impl AppContext {
    #[tracing::instrument(skip_all, fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> ContextResult<User> {
        input.validate()?;

        // credentials only, a refused login must not touch the current session
        let api = self.api.with_token(None);
        let response = self.checked(&api, api.login(&input).await).await?;
        let session = Session::new(response.token, Some(response.user.clone()));

        self.store.save(&session).await?;
        self.cache.lock().await.clear();
        *self.session.write().await = Some(session);

        tracing::info!(user_id = response.user.id(), "logged in");
        self.emit(SessionEvent::LoggedIn(response.user.clone()));
        Ok(response.user)
    }

    /// Creates the account without logging in.
    #[tracing::instrument(skip_all, fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> ContextResult<User> {
        input.validate()?;

        let api = self.api.with_token(None);
        let response = self.checked(&api, api.register(&input).await).await?;
        tracing::info!(user_id = response.user.id(), "registered");
        Ok(response.user)
    }

    /// Tears the session down: persisted token, cached user, query cache.
    /// The persisted token goes first: if it cannot be removed the session
    /// stays intact and the error is returned.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self) -> ContextResult<()> {
        self.store.clear().await?;
        self.session.write().await.take();
        self.cache.lock().await.clear();

        tracing::info!("logged out");
        self.emit(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Refreshes the cached user from `/auth/me`.
    pub async fn refresh_user(&self) -> ContextResult<User> {
        let api = self.authed_client().await?;
        let user = self.checked(&api, api.me().await).await?;
        self.replace_user(user.clone()).await?;
        Ok(user)
    }

    pub async fn update_profile(&self, input: ProfileUpdateInput) -> ContextResult<User> {
        input.validate()?;

        let api = self.authed_client().await?;
        let user = self.checked(&api, api.update_profile(&input).await).await?;
        self.replace_user(user.clone()).await?;
        Ok(user)
    }

    pub async fn change_password(&self, input: PasswordChangeInput) -> ContextResult<()> {
        input.validate()?;

        let api = self.authed_client().await?;
        self.checked(&api, api.change_password(&input).await).await
    }

    async fn replace_user(&self, user: User) -> ContextResult<()> {
        {
            let mut session = self.session.write().await;
            let session = session.as_mut().ok_or(ContextError::NotAuthenticated)?;
            session.set_user(user.clone());
            self.store.save(session).await?;
        }

        self.emit(SessionEvent::UserUpdated(user));
        Ok(())
    }
}
