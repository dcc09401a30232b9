use serde::{Deserialize, Serialize};

use crate::model::ids::JobId;

/// One file inside an uploaded content batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// `"{job_id}-{index}"`, stable within a batch.
    pub id: String,
    pub name: String,
    pub url: String,
}

/// A batch of course material uploaded for quiz generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedContent {
    pub job_id: JobId,
    pub course_code: String,
    pub week: String,
    pub uploaded_by: String,
    pub files: Vec<UploadedFile>,
}

impl UploadedContent {
    /// Build the file list for a batch from the server's bare file names.
    ///
    /// `files_base` is the public prefix the server serves uploads from,
    /// e.g. `http://host/uploads`.
    #[must_use]
    pub fn files_from_names(job_id: &JobId, files_base: &str, names: &[String]) -> Vec<UploadedFile> {
        let base = files_base.trim_end_matches('/');
        names
            .iter()
            .enumerate()
            .map(|(i, name)| UploadedFile {
                id: format!("{job_id}-{i}"),
                name: name.clone(),
                url: format!("{base}/{job_id}/{name}"),
            })
            .collect()
    }
}

/// A file to send with a content upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

/// Form fields for a content upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpload {
    pub course_code: String,
    pub week: String,
    pub files: Vec<UploadFile>,
}
