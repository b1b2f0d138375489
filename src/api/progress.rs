use reqwest::Method;

use crate::api::{ApiClient, ApiResult};
use crate::model::entity::ProgressRecord;
use crate::model::{ApiListResponse, ApiResponse, OneOrMany};

impl ApiClient {
    /// The backend answers with a single record or a list depending on how
    /// many courses the user has touched; both come back as a list.
    pub async fn my_progress(&self) -> ApiResult<Vec<ProgressRecord>> {
        let request = self.request(Method::GET, &["progress", "my-progress"])?;
        let response: ApiResponse<Option<OneOrMany<ProgressRecord>>> =
            self.send_json(request).await?;
        Ok(response.data.map(OneOrMany::into_vec).unwrap_or_default())
    }

    pub async fn mark_video_completed(
        &self,
        course_id: &str,
        video_id: &str,
    ) -> ApiResult<ProgressRecord> {
        let request = self.request(
            Method::POST,
            &["progress", "courses", course_id, "videos", video_id, "complete"],
        )?;
        let response: ApiResponse<ProgressRecord> = self.send_json(request).await?;
        Ok(response.data)
    }

    pub async fn all_progress(&self) -> ApiResult<Vec<ProgressRecord>> {
        let request = self.request(Method::GET, &["progress", "all"])?;
        let response: ApiListResponse<ProgressRecord> = self.send_json(request).await?;
        Ok(response.data)
    }

    pub async fn course_progress(&self, course_id: &str) -> ApiResult<Vec<ProgressRecord>> {
        let request = self.request(Method::GET, &["progress", "courses", course_id])?;
        let response: ApiListResponse<ProgressRecord> = self.send_json(request).await?;
        Ok(response.data)
    }
}
