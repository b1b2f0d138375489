use reqwest::Method;
use serde_json::Value;

use crate::api::{ApiClient, ApiResult};
use crate::model::entity::{Course, CourseInput};
use crate::model::{ApiListResponse, ApiResponse};

impl ApiClient {
    pub async fn list_courses(&self) -> ApiResult<Vec<Course>> {
        let request = self.request(Method::GET, &["courses"])?;
        let response: ApiListResponse<Course> = self.send_json(request).await?;
        Ok(response.data)
    }

    pub async fn get_course(&self, course_id: &str) -> ApiResult<Course> {
        let request = self.request(Method::GET, &["courses", course_id])?;
        let response: ApiResponse<Course> = self.send_json(request).await?;
        Ok(response.data)
    }

    pub async fn create_course(&self, input: &CourseInput) -> ApiResult<Course> {
        let request = self.request(Method::POST, &["courses"])?.json(input);
        let response: ApiResponse<Course> = self.send_json(request).await?;
        Ok(response.data)
    }

    pub async fn update_course(&self, course_id: &str, input: &CourseInput) -> ApiResult<Course> {
        let request = self.request(Method::PUT, &["courses", course_id])?.json(input);
        let response: ApiResponse<Course> = self.send_json(request).await?;
        Ok(response.data)
    }

    pub async fn delete_course(&self, course_id: &str) -> ApiResult<()> {
        let request = self.request(Method::DELETE, &["courses", course_id])?;
        let _: Value = self.send_json(request).await?;
        Ok(())
    }
}
