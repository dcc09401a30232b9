use tracing::info;

use quiz_core::model::{ContentUpload, JobId, UploadFile, UploadedContent};
use storage::LocalState;

use super::bearer_token;
use crate::api::ApiClient;
use crate::error::AdminError;

/// Course content uploads for staff.
#[derive(Clone)]
pub struct ContentService {
    api: ApiClient,
    state: LocalState,
}

impl ContentService {
    #[must_use]
    pub fn new(api: ApiClient, state: LocalState) -> Self {
        Self { api, state }
    }

    /// Uploads made by the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` (including `MissingToken`) or `AdminError::Storage`.
    pub async fn list_uploads(&self) -> Result<Vec<UploadedContent>, AdminError> {
        let token = bearer_token(&self.state).await?;
        Ok(self.api.list_uploads(&token).await?)
    }

    /// Upload a batch of files for one course week.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::MissingField` or `AdminError::NoFiles` for an
    /// incomplete form, otherwise `AdminError::Api` or `AdminError::Storage`.
    pub async fn upload(&self, upload: ContentUpload) -> Result<UploadedContent, AdminError> {
        let upload = validate_upload(upload)?;
        let token = bearer_token(&self.state).await?;
        let created = self.api.upload_content(&token, &upload).await?;
        info!(job_id = %created.job_id, files = created.files.len(), "content uploaded");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` or `AdminError::Storage`.
    pub async fn delete_upload(&self, job_id: &JobId) -> Result<(), AdminError> {
        let token = bearer_token(&self.state).await?;
        self.api.delete_upload(&token, job_id).await?;
        info!(%job_id, "deleted upload");
        Ok(())
    }
}

fn validate_upload(upload: ContentUpload) -> Result<ContentUpload, AdminError> {
    let course_code = upload.course_code.trim().to_string();
    let week = upload.week.trim().to_string();
    if course_code.is_empty() {
        return Err(AdminError::MissingField("course code"));
    }
    if week.is_empty() {
        return Err(AdminError::MissingField("week"));
    }
    let files: Vec<UploadFile> = upload
        .files
        .into_iter()
        .filter(|file| !file.name.trim().is_empty())
        .collect();
    if files.is_empty() {
        return Err(AdminError::NoFiles);
    }
    Ok(ContentUpload {
        course_code,
        week,
        files,
    })
}
