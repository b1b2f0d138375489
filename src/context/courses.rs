use crate::cache::{Cached, QueryKey};
use crate::context::{AppContext, ContextResult};
use crate::model::Validate;
use crate::model::entity::{Course, CourseInput, UserRole};

impl AppContext {
    pub async fn courses(&self) -> ContextResult<Vec<Course>> {
        let api = self.client().await;
        self.fetch_cached(
            &api,
            QueryKey::Courses,
            |cache| cache.courses(),
            Cached::Courses,
            api.list_courses(),
        )
        .await
    }

    /// A missing course surfaces as a not-found error, see
    /// [`ContextError::is_not_found`](crate::context::ContextError::is_not_found).
    pub async fn course(&self, course_id: &str) -> ContextResult<Course> {
        let api = self.client().await;
        self.fetch_cached(
            &api,
            QueryKey::Course(course_id.to_string()),
            |cache| cache.course(course_id),
            Cached::Course,
            api.get_course(course_id),
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(title = %input.title))]
    pub async fn create_course(&self, input: CourseInput) -> ContextResult<Course> {
        let api = self.require_role(UserRole::Admin).await?;
        input.validate()?;

        let course = self.checked(&api, api.create_course(&input).await).await?;
        self.invalidate(&[QueryKey::Courses]).await;
        Ok(course)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update_course(&self, course_id: &str, input: CourseInput) -> ContextResult<Course> {
        let api = self.require_role(UserRole::Admin).await?;
        input.validate()?;

        let course = self.checked(&api, api.update_course(course_id, &input).await).await?;
        self.invalidate(&[QueryKey::Courses, QueryKey::Course(course_id.to_string())])
            .await;
        Ok(course)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_course(&self, course_id: &str) -> ContextResult<()> {
        let api = self.require_role(UserRole::Admin).await?;

        self.checked(&api, api.delete_course(course_id).await).await?;
        self.invalidate(&[QueryKey::Courses, QueryKey::Course(course_id.to_string())])
            .await;
        Ok(())
    }
}
