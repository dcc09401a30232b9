//! Staff-only operations: user management and course content.
//!
//! Both services read the bearer token from `LocalState` on every call, so a
//! logout takes effect immediately.

mod content;
mod users;

pub use content::ContentService;
pub use users::UserAdminService;

use storage::LocalState;

use crate::error::{AdminError, ApiError};

async fn bearer_token(state: &LocalState) -> Result<String, AdminError> {
    state
        .access_token()
        .await?
        .ok_or(AdminError::Api(ApiError::MissingToken))
}
