//! Errors that can occur while binding a request body to a form.
use http::StatusCode;

use crate::encoder::errors::DecodeError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`PreSubmitListener::pre_submit`](super::PreSubmitListener::pre_submit)
/// and [`PreSubmitListeners::submit`](super::PreSubmitListeners::submit).
pub enum BindRequestError {
    #[error(transparent)]
    /// See [`DecodeError`] for details.
    Decode(#[from] DecodeError),
    #[error(transparent)]
    /// See [`UnsupportedContentType`] for details.
    UnsupportedContentType(#[from] UnsupportedContentType),
    #[error("Something went wrong while binding the request body")]
    /// A failure raised by a custom listener.
    Other(#[source] anyhow::Error),
}

impl BindRequestError {
    /// The status code that should be returned to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BindRequestError::Decode(DecodeError::NoCodecFound(_))
            | BindRequestError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            BindRequestError::Decode(_) => StatusCode::BAD_REQUEST,
            BindRequestError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error(
    "No listener could bind a request body with `Content-Type` set to `{actual}`. Supported formats: JSON (`application/json`, or another `application/*+json` MIME type) and XML (`application/xml`, `text/xml`, or another `application/*+xml` MIME type)"
)]
#[non_exhaustive]
/// The request reached the end of the listener chain without being bound.
pub struct UnsupportedContentType {
    /// The value of the `Content-Type` header, or `<missing>` if there was none.
    pub actual: String,
}
