//! Building blocks shared by every HTTP module

pub mod error;
pub mod params;
pub mod validated_json;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use params::{page_request, parse_id, parse_optional, PageParams, PageResponse};
pub use validated_json::{JsonBody, ValidatedJson};
