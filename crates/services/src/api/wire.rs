//! Server-side JSON shapes and their mapping into domain types.

use quiz_core::auth::Role;
use quiz_core::model::{JobId, UploadedContent, User, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct UserWire {
    pub id: UserId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<UserWire> for User {
    fn from(wire: UserWire) -> Self {
        Self {
            id: wire.id,
            first_name: wire.first_name.unwrap_or_default(),
            last_name: wire.last_name.unwrap_or_default(),
            email: wire.email.unwrap_or_default(),
            role: wire
                .role
                .as_deref()
                .map_or(Role::User, Role::parse_lenient),
            is_active: wire.is_active.unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginWire {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<UserWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobIdWire {
    pub job_id: JobId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadWire {
    pub job_id: JobId,
    #[serde(default)]
    pub course_code: Option<Value>,
    #[serde(default)]
    pub week: Option<Value>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub filenames: Option<Vec<String>>,
}

impl UploadWire {
    /// Map into `UploadedContent`, taking course code and week from
    /// `fallback` when the server leaves them out.
    pub fn into_content(
        self,
        files_base: &str,
        fallback: Option<(&str, &str)>,
        default_uploader: &str,
    ) -> UploadedContent {
        let files = UploadedContent::files_from_names(
            &self.job_id,
            files_base,
            self.filenames.as_deref().unwrap_or_default(),
        );

        UploadedContent {
            course_code: text_or(self.course_code, fallback.map(|f| f.0)),
            week: text_or(self.week, fallback.map(|f| f.1)),
            uploaded_by: self
                .user_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| default_uploader.to_string()),
            job_id: self.job_id,
            files,
        }
    }
}

fn text_or(value: Option<Value>, fallback: Option<&str>) -> String {
    value
        .as_ref()
        .and_then(value_text)
        .or_else(|| fallback.map(str::to_string))
        .unwrap_or_default()
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateUserBody<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailBody<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyCodeBody<'a> {
    pub email: &'a str,
    pub code: &'a str,
}
