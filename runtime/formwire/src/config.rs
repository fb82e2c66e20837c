//! Process-wide serializer configuration.
//!
//! [`SerializerConfig`] is the serializable form, meant to be loaded from
//! configuration files and environment variables via [`SerializerConfig::load`].
//! [`SerializerOptions`] is what the serializer and the request listener
//! work with at runtime.
use std::{path::Path, sync::Arc};

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

use crate::naming::{NamingConvention, NamingStrategy};

static ENV_PREFIX: &str = "FORMWIRE_";

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "snake_case")]
#[non_exhaustive]
/// Configure how forms are mapped to and from their serialized representation.
///
/// # Example
///
/// ```yaml
/// include_root_in_json: true
/// application_xml_root_name: response
/// naming_strategy: camel_case
/// ```
pub struct SerializerConfig {
    /// Nest JSON payloads under the root name of the form.
    ///
    /// Defaults to `false`.
    pub include_root_in_json: bool,
    /// The name of the document element for all XML payloads.
    ///
    /// When set, the payload is nested under the root name of the form,
    /// unless the two names match.
    /// When unset, the root name of the form is used as the document element.
    pub application_xml_root_name: Option<String>,
    /// How external names are derived from the internal names of fields.
    ///
    /// Defaults to [`NamingConvention::SnakeCase`].
    pub naming_strategy: NamingConvention,
}

impl SerializerConfig {
    /// Load the configuration by merging together two sources:
    ///
    /// 1. Environment variables (`FORMWIRE_*`)
    /// 2. A YAML file, if a path is provided
    ///
    /// The list above is ordered by precedence: environment variables take precedence
    /// over the file. Fields missing from both sources take their default value.
    pub fn load(path: Option<&Path>) -> Result<Self, errors::ConfigLoadError> {
        let span = tracing::info_span!(
            "Loading serializer configuration",
            configuration.file = ?path,
        );
        let _guard = span.enter();
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extract the configuration from a custom set of sources.
    pub fn from_figment(figment: Figment) -> Result<Self, errors::ConfigLoadError> {
        figment
            .extract()
            .context("Failed to load the serializer configuration")
            .map_err(errors::ConfigLoadError)
    }
}

#[derive(Debug, Clone)]
/// The runtime counterpart of [`SerializerConfig`].
///
/// It is immutable once built and cheap to clone.
pub struct SerializerOptions {
    include_root_in_json: bool,
    application_xml_root_name: Option<String>,
    naming_strategy: Arc<dyn NamingStrategy>,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        SerializerConfig::default().into()
    }
}

impl From<SerializerConfig> for SerializerOptions {
    fn from(config: SerializerConfig) -> Self {
        Self {
            include_root_in_json: config.include_root_in_json,
            // An empty name is the same as no name.
            application_xml_root_name: config.application_xml_root_name.filter(|n| !n.is_empty()),
            naming_strategy: config.naming_strategy.strategy(),
        }
    }
}

impl SerializerOptions {
    pub fn with_include_root_in_json(mut self, include: bool) -> Self {
        self.include_root_in_json = include;
        self
    }

    pub fn with_application_xml_root_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.application_xml_root_name = (!name.is_empty()).then_some(name);
        self
    }

    /// Use a custom naming strategy, rather than one of the built-in ones.
    pub fn with_naming_strategy(mut self, strategy: Arc<dyn NamingStrategy>) -> Self {
        self.naming_strategy = strategy;
        self
    }

    pub fn include_root_in_json(&self) -> bool {
        self.include_root_in_json
    }

    pub fn application_xml_root_name(&self) -> Option<&str> {
        self.application_xml_root_name.as_deref()
    }

    pub fn naming_strategy(&self) -> &dyn NamingStrategy {
        self.naming_strategy.as_ref()
    }
}

/// Errors that can occur when loading the serializer configuration.
pub mod errors {
    #[derive(Debug, thiserror::Error)]
    #[error("Failed to load the serializer configuration")]
    /// The error returned by [`SerializerConfig::load`](super::SerializerConfig::load).
    pub struct ConfigLoadError(#[source] pub(super) anyhow::Error);
}
