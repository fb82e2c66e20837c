//! Bind JSON and XML request bodies onto form trees, and serialize form trees
//! (or their validation errors) back into JSON and XML.
//!
//! # Overview
//!
//! - A form is a tree of [`Field`]s, each with its own [`FieldOptions`].
//! - Outbound, [`FormSerializer`] walks the tree with [`tree::serialize`],
//!   applies the [root policy](envelope::RootEnvelope) and encodes the result
//!   through an [`EncoderRegistry`].
//! - Inbound, [`BindRequestListener`] decodes the request body, walks the tree
//!   with [`tree::bind`] and hands the reconciled data over to [`Field::submit`].
//!
//! Both directions agree on naming: whatever is serialized can be bound back.
//!
//! # Configuration
//!
//! The process-wide settings live in [`SerializerOptions`], which can be built
//! from a [`SerializerConfig`] loaded from YAML and environment variables.
pub use config::{SerializerConfig, SerializerOptions};
pub use encoder::EncoderRegistry;
pub use field::{Field, FieldOptions};
pub use listener::{BindRequestListener, PreSubmitListeners, SubmittedData};
pub use serializer::FormSerializer;

pub mod config;
pub mod encoder;
pub mod envelope;
pub mod field;
pub mod listener;
pub mod naming;
pub mod representation;
pub mod serializer;
pub mod tree;
