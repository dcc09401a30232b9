use quiz_core::model::{ContentUpload, JobId, UploadedContent};
use reqwest::multipart::{Form, Part};
use tracing::info;

use super::ApiClient;
use super::wire::UploadWire;
use crate::error::ApiError;

// Shown as the uploader when the server does not name one.
const SELF_UPLOADER: &str = "Me";

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the token is rejected.
    pub async fn list_uploads(&self, token: &str) -> Result<Vec<UploadedContent>, ApiError> {
        let request = self.client.get(self.url("user_uploads")).bearer_auth(token);
        let uploads: Vec<UploadWire> = self.send_json(request).await?;
        let files_base = self.files_base();
        Ok(uploads
            .into_iter()
            .map(|wire| wire.into_content(&files_base, None, ""))
            .collect())
    }

    /// Upload course material as a multipart form.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if a file part cannot be built, the request fails,
    /// or the server rejects the upload.
    pub async fn upload_content(
        &self,
        token: &str,
        upload: &ContentUpload,
    ) -> Result<UploadedContent, ApiError> {
        let mut form = Form::new()
            .text("course_code", upload.course_code.clone())
            .text("week", upload.week.clone());
        for file in &upload.files {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime)?;
            }
            form = form.part("files", part);
        }

        info!(
            course_code = %upload.course_code,
            week = %upload.week,
            files = upload.files.len(),
            "uploading course content"
        );
        let request = self
            .client
            .post(self.url("uploads"))
            .bearer_auth(token)
            .multipart(form);
        let created: UploadWire = self.send_json(request).await?;
        Ok(created.into_content(
            &self.files_base(),
            Some((upload.course_code.as_str(), upload.week.as_str())),
            SELF_UPLOADER,
        ))
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the token is rejected.
    pub async fn delete_upload(&self, token: &str, job_id: &JobId) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("uploaded_files/{job_id}")))
            .bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }
}
