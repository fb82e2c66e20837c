use std::borrow::Cow;

use http::HeaderMap;

use crate::encoder::format;

/// Determine the format of a request body from its `Content-Type` header.
///
/// - `application/json`, `application/x-json` and `application/*+json` map to `json`;
/// - `text/xml`, `application/xml`, `application/x-xml` and `application/*+xml` map to `xml`;
/// - any other `application/*` or `text/*` type maps to its structured syntax
///   suffix, if it has one, or to its subtype without the `x-` prefix
///   (e.g. `text/csv` maps to `csv`).
///
/// Whether a codec can decode the format is up to the
/// [`EncoderRegistry`](crate::encoder::EncoderRegistry).
/// Returns `None` if the header is missing or malformed, or if the type is
/// neither `application` nor `text`.
pub fn request_format(headers: &HeaderMap) -> Option<Cow<'static, str>> {
    let content_type = headers.get(http::header::CONTENT_TYPE)?.to_str().ok()?;
    let mime = content_type.parse::<mime::Mime>().ok()?;
    let suffix = mime.suffix().map(|s| s.as_str());
    let format = match (mime.type_().as_str(), mime.subtype().as_str(), suffix) {
        ("application", "json" | "x-json", _) | ("application", _, Some("json")) => {
            Cow::Borrowed(format::JSON)
        }
        ("text", "xml", _)
        | ("application", "xml" | "x-xml", _)
        | ("application", _, Some("xml")) => Cow::Borrowed(format::XML),
        ("application" | "text", _, Some(suffix)) => Cow::Owned(suffix.to_owned()),
        ("application" | "text", subtype, None) => {
            let subtype = subtype.strip_prefix("x-").unwrap_or(subtype);
            Cow::Owned(subtype.to_owned())
        }
        _ => return None,
    };
    Some(format)
}
