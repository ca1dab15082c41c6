pub mod auth;
pub mod component;
pub mod extract;
pub mod project;
pub mod value;

use crate::error::SwatchError;
use axum_extra::TypedHeader;
use headers::ETag;
use swatchbook_schema::Revision;

/// Strong `ETag` for a project revision: `"<revision>"`.
pub(crate) fn revision_etag(revision: Revision) -> Result<TypedHeader<ETag>, SwatchError> {
    format!("\"{revision}\"")
        .parse::<ETag>()
        .map(TypedHeader)
        .map_err(|e| SwatchError::UnexpectedError(format!("invalid etag for {revision}: {e:?}")))
}
