pub mod auth;
pub mod request_id;

pub use auth::{bearer_token, AdminAuth};
pub use request_id::{RequestId, RequestIdValue, REQUEST_ID_HEADER};
