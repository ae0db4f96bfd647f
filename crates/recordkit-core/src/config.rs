//! Declarative record types, read from TOML.

use crate::{
    Error,
    decl::{FieldDecl, FieldEntry},
    default::DefaultArg,
    model::{RecordType, RecordTypeBuilder, StorageMode},
    value::Value,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("invalid record type config: {0}")]
    Parse(String),
}

///
/// RecordOptions
/// Build options shared by the builder, the config file and the facade.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct RecordOptions {
    /// Replace rejected field names with `_{index}` instead of failing.
    pub rename: bool,
    pub storage: StorageMode,
}

///
/// FieldsConfig
///
/// "x y z"              → delimited names
/// ["x", ["y", 10]]     → names and (name, default) pairs
/// { x = 0, y = 1 }     → name → default table
///

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum FieldsConfig {
    Delimited(String),
    Entries(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

impl From<FieldsConfig> for FieldDecl {
    fn from(fields: FieldsConfig) -> Self {
        match fields {
            FieldsConfig::Delimited(s) => Self::Delimited(s),
            FieldsConfig::Entries(entries) => {
                entries.into_iter().map(FieldEntry::Untyped).collect()
            }
            FieldsConfig::Mapping(map) => {
                Self::mapping(map.into_iter().map(|(k, v)| (k, DefaultArg::Value(v))))
            }
        }
    }
}

///
/// RecordTypeConfig
///

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordTypeConfig {
    pub name: String,
    pub fields: FieldsConfig,

    /// Global static default.
    #[serde(default)]
    pub default: Option<Value>,

    #[serde(default)]
    pub rename: bool,

    #[serde(default = "RecordTypeConfig::default_fixed_storage")]
    pub fixed_storage: bool,
}

impl RecordTypeConfig {
    const fn default_fixed_storage() -> bool {
        true
    }

    /// Parse a single record type declaration.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    #[must_use]
    pub const fn options(&self) -> RecordOptions {
        RecordOptions {
            rename: self.rename,
            storage: StorageMode::from_fixed(self.fixed_storage),
        }
    }

    #[must_use]
    pub fn into_builder(self) -> RecordTypeBuilder {
        let options = self.options();
        let builder = RecordTypeBuilder::new(self.name, self.fields).options(&options);

        match self.default {
            Some(value) => builder.default_value(value),
            None => builder,
        }
    }

    /// Build the declared record type through the normal factory path.
    pub fn build(self) -> Result<RecordType, Error> {
        self.into_builder().build()
    }
}
