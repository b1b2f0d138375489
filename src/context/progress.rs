use crate::cache::{Cached, QueryKey};
use crate::context::{AppContext, ContextResult};
use crate::model::entity::{ProgressRecord, UserRole};
use crate::tracker::CourseOverview;

impl AppContext {
    pub async fn my_progress(&self) -> ContextResult<Vec<ProgressRecord>> {
        let api = self.authed_client().await?;
        self.fetch_cached(
            &api,
            QueryKey::Progress,
            |cache| cache.progress(),
            Cached::Progress,
            api.my_progress(),
        )
        .await
    }

    // visitors without a session simply have no progress
    async fn progress_or_empty(&self) -> ContextResult<Vec<ProgressRecord>> {
        if !self.has_token().await {
            return Ok(Vec::new());
        }
        self.my_progress().await
    }

    /// Course, its progress and whether a certificate may be generated.
    /// Recomputed from the cached data on every call.
    pub async fn course_overview(&self, course_id: &str) -> ContextResult<CourseOverview> {
        let (course, records) = tokio::try_join!(self.course(course_id), self.progress_or_empty())?;
        Ok(CourseOverview::new(course, &records))
    }

    /// One overview per course.
    pub async fn dashboard(&self) -> ContextResult<Vec<CourseOverview>> {
        let (courses, records) = tokio::try_join!(self.courses(), self.progress_or_empty())?;
        Ok(courses
            .into_iter()
            .map(|course| CourseOverview::new(course, &records))
            .collect())
    }

    /// Marks a video completed and returns the overview rebuilt from a fresh
    /// progress fetch, never from the pre-update cache.
    #[tracing::instrument(skip(self))]
    pub async fn mark_video_completed(
        &self,
        course_id: &str,
        video_id: &str,
    ) -> ContextResult<CourseOverview> {
        let api = self.authed_client().await?;
        self.checked(&api, api.mark_video_completed(course_id, video_id).await)
            .await?;

        self.invalidate(&[QueryKey::Progress]).await;
        self.course_overview(course_id).await
    }

    pub async fn all_progress(&self) -> ContextResult<Vec<ProgressRecord>> {
        let api = self.require_role(UserRole::Admin).await?;
        self.checked(&api, api.all_progress().await).await
    }

    pub async fn course_progress(&self, course_id: &str) -> ContextResult<Vec<ProgressRecord>> {
        let api = self.require_role(UserRole::Admin).await?;
        self.checked(&api, api.course_progress(course_id).await).await
    }
}
