//! Intercept incoming requests before their data is assigned to a form.
//!
//! A [`PreSubmitListener`] receives the [`SubmittedData`] for a form and can
//! replace it. [`BindRequestListener`] is the built-in one: it decodes request
//! bodies with whichever registered codec handles their `Content-Type`, and
//! reconciles them against the form tree, so that the result can be assigned
//! with [`Field::submit`].
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde_json::Value;
use tracing_log_error::log_error;

use crate::{
    config::SerializerOptions,
    encoder::{EncoderRegistry, format},
    envelope::RootEnvelope,
    field::Field,
    tree,
};
use errors::{BindRequestError, UnsupportedContentType};

pub use content_type::request_format;

mod content_type;
pub mod errors;

#[derive(Debug, Clone)]
/// The parts of an HTTP request that matter when binding its body to a form.
pub struct IncomingRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IncomingRequest {
    pub fn new(method: Method, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            headers,
            body: body.into(),
        }
    }
}

impl From<http::Request<Bytes>> for IncomingRequest {
    fn from(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            headers: parts.headers,
            body,
        }
    }
}

#[derive(Debug, Clone)]
/// The payload handed over to a form for submission.
pub enum SubmittedData {
    /// A request that no listener has processed yet.
    Request(IncomingRequest),
    /// Data ready to be assigned to the form.
    Data(Value),
}

/// A hook that runs before data is assigned to a form.
pub trait PreSubmitListener: Send + Sync {
    /// Listeners with a higher priority run first.
    fn priority(&self) -> i32 {
        0
    }

    /// Inspect, and possibly replace, the data submitted to `form`.
    fn pre_submit(&self, form: &Field, data: &mut SubmittedData) -> Result<(), BindRequestError>;
}

#[derive(Default, Clone)]
/// An ordered chain of [`PreSubmitListener`]s.
pub struct PreSubmitListeners {
    listeners: Vec<Arc<dyn PreSubmitListener>>,
}

impl std::fmt::Debug for PreSubmitListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let priorities: Vec<_> = self.listeners.iter().map(|l| l.priority()).collect();
        f.debug_struct("PreSubmitListeners")
            .field("priorities", &priorities)
            .finish()
    }
}

impl PreSubmitListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener to the chain.
    ///
    /// Listeners run by descending priority. Listeners with the same priority
    /// run in registration order.
    pub fn register<L>(&mut self, listener: L) -> &mut Self
    where
        L: PreSubmitListener + 'static,
    {
        let priority = listener.priority();
        let position = self
            .listeners
            .partition_point(|existing| existing.priority() >= priority);
        self.listeners.insert(position, Arc::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Run every listener, in order, against `data`.
    pub fn dispatch(
        &self,
        form: &Field,
        mut data: SubmittedData,
    ) -> Result<SubmittedData, BindRequestError> {
        for listener in &self.listeners {
            listener.pre_submit(form, &mut data)?;
        }
        Ok(data)
    }

    /// Run the listeners, then assign the outcome to `form`.
    ///
    /// Fields missing from a `PATCH` request keep their current value;
    /// for any other request, they are reset.
    /// It fails if no listener turned the request into data.
    pub fn submit(&self, form: &mut Field, data: SubmittedData) -> Result<(), BindRequestError> {
        let clear_missing = match &data {
            SubmittedData::Request(request) => request.method != Method::PATCH,
            SubmittedData::Data(_) => true,
        };
        match self.dispatch(form, data)? {
            SubmittedData::Data(data) => {
                form.submit(&data, clear_missing);
                Ok(())
            }
            SubmittedData::Request(request) => {
                let actual = request
                    .headers
                    .get(http::header::CONTENT_TYPE)
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                    .unwrap_or_else(|| "<missing>".to_owned());
                Err(UnsupportedContentType { actual }.into())
            }
        }
    }
}

#[derive(Debug, Clone)]
/// Decode request bodies and bind them to the form.
///
/// The format is derived from the `Content-Type` header (see [`request_format`]).
/// Requests in a format that no registered codec can decode, as well as data
/// that isn't a request, are left untouched.
pub struct BindRequestListener {
    registry: Arc<EncoderRegistry>,
    options: Arc<SerializerOptions>,
}

impl BindRequestListener {
    /// Runs ahead of listeners with the default priority.
    pub const PRIORITY: i32 = 129;

    pub fn new(registry: Arc<EncoderRegistry>, options: Arc<SerializerOptions>) -> Self {
        Self { registry, options }
    }
}

impl PreSubmitListener for BindRequestListener {
    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn pre_submit(&self, form: &Field, data: &mut SubmittedData) -> Result<(), BindRequestError> {
        let SubmittedData::Request(request) = data else {
            return Ok(());
        };
        let Some(format) = request_format(&request.headers) else {
            tracing::debug!(
                form.name = form.name(),
                "The request has no usable `Content-Type`, skipping"
            );
            return Ok(());
        };
        let format = &*format;
        if !self.registry.supports_decoding(format) {
            tracing::debug!(
                form.name = form.name(),
                request.format = format,
                "No codec can decode the request body, skipping"
            );
            return Ok(());
        }

        let span = tracing::debug_span!(
            "Bind request body",
            form.name = form.name(),
            request.format = format,
            request.method = %request.method,
        );
        let _guard = span.enter();
        let decoded = match self.registry.decode(&request.body, format) {
            Ok(decoded) => decoded,
            Err(e) => {
                log_error!(
                    e,
                    level: tracing::Level::WARN,
                    "Failed to decode the request body"
                );
                return Err(e.into());
            }
        };
        let envelope = RootEnvelope::for_form(form, format, &self.options);
        let bound = tree::bind(
            &envelope.unwrap_inbound(decoded),
            form,
            format == format::XML,
            request.method == Method::PATCH,
            self.options.naming_strategy(),
        );
        *data = SubmittedData::Data(bound);
        Ok(())
    }
}
