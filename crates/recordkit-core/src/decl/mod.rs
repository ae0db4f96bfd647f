//! Field declarations: every accepted input shape, normalized into one
//! ordered list of names with optional explicit defaults.

#[cfg(test)]
mod tests;

use crate::{
    default::{DefaultArg, Factory},
    value::Value,
};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error as ThisError;

///
/// DeclError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DeclError {
    #[error("field entry {index} must be a name or a (name, default) pair: {element}")]
    MalformedFieldSpec { index: usize, element: String },

    #[error("field declaration must be a string or a list, found {found}")]
    UnsupportedShape { found: &'static str },
}

///
/// FieldEntry
/// One element of a sequence declaration.
///

#[derive(Clone, Debug)]
pub enum FieldEntry {
    /// Bare name; no explicit default.
    Name(String),

    /// Name with an explicit default (which may be the `NoDefault` sentinel).
    Pair(String, DefaultArg),

    /// Loosely-typed element, e.g. from a parsed document.
    /// `Text` is a bare name; `List([Text, v])` is a pair.
    Untyped(Value),
}

impl FieldEntry {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn with_default(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Pair(name.into(), DefaultArg::Value(value.into()))
    }

    pub fn with_factory(name: impl Into<String>, factory: Factory) -> Self {
        Self::Pair(name.into(), DefaultArg::Factory(factory))
    }

    /// Pair carrying the sentinel: defer to the global default.
    pub fn no_default(name: impl Into<String>) -> Self {
        Self::Pair(name.into(), DefaultArg::NoDefault)
    }
}

impl From<&str> for FieldEntry {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for FieldEntry {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl<S: Into<String>> From<(S, DefaultArg)> for FieldEntry {
    fn from((name, default): (S, DefaultArg)) -> Self {
        Self::Pair(name.into(), default)
    }
}

impl From<Value> for FieldEntry {
    fn from(value: Value) -> Self {
        Self::Untyped(value)
    }
}

///
/// FieldDecl
/// Raw, caller-supplied description of a record type's fields.
///

#[derive(Clone, Debug)]
pub enum FieldDecl {
    /// Names separated by commas and/or whitespace.
    Delimited(String),

    /// Ordered names and pairs.
    Entries(Vec<FieldEntry>),

    /// Name → default association, in the association's iteration order.
    Mapping(Vec<(String, DefaultArg)>),
}

impl FieldDecl {
    /// Interpret a loosely-typed value as a declaration.
    /// `Text` is a delimited string; `List` is a sequence of untyped entries.
    pub fn from_value(value: Value) -> Result<Self, DeclError> {
        match value {
            Value::Text(s) => Ok(Self::Delimited(s)),
            Value::List(list) => Ok(Self::Entries(
                list.to_vec().into_iter().map(FieldEntry::Untyped).collect(),
            )),
            other => Err(DeclError::UnsupportedShape {
                found: other.kind_label(),
            }),
        }
    }

    /// Build a mapping declaration from any ordered association.
    pub fn mapping<I, K, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: Into<DefaultArg>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, d)| (k.into(), d.into()))
                .collect(),
        )
    }
}

impl From<&str> for FieldDecl {
    fn from(s: &str) -> Self {
        Self::Delimited(s.to_string())
    }
}

impl From<String> for FieldDecl {
    fn from(s: String) -> Self {
        Self::Delimited(s)
    }
}

impl From<Vec<FieldEntry>> for FieldDecl {
    fn from(entries: Vec<FieldEntry>) -> Self {
        Self::Entries(entries)
    }
}

impl From<Vec<&str>> for FieldDecl {
    fn from(names: Vec<&str>) -> Self {
        names.into_iter().map(FieldEntry::from).collect()
    }
}

impl From<Vec<String>> for FieldDecl {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().map(FieldEntry::from).collect()
    }
}

impl<const N: usize> From<[&str; N]> for FieldDecl {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().map(FieldEntry::from).collect()
    }
}

impl From<&[&str]> for FieldDecl {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().map(FieldEntry::from).collect()
    }
}

impl<K: Into<String>> From<IndexMap<K, DefaultArg>> for FieldDecl {
    fn from(map: IndexMap<K, DefaultArg>) -> Self {
        Self::mapping(map)
    }
}

impl<K: Into<String>> From<BTreeMap<K, DefaultArg>> for FieldDecl {
    fn from(map: BTreeMap<K, DefaultArg>) -> Self {
        Self::mapping(map)
    }
}

impl<K: Into<String>, S> From<HashMap<K, DefaultArg, S>> for FieldDecl {
    fn from(map: HashMap<K, DefaultArg, S>) -> Self {
        Self::mapping(map)
    }
}

// Lazy sequences are consumed fully, preserving yield order.
impl<E: Into<FieldEntry>> FromIterator<E> for FieldDecl {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::Entries(iter.into_iter().map(Into::into).collect())
    }
}

///
/// NormalizedField
///
/// `default` is `None` for bare names and `Some` for pairs and mapping
/// entries, including the explicit `NoDefault` sentinel.
///

#[derive(Clone, Debug)]
pub struct NormalizedField {
    pub name: String,
    pub default: Option<DefaultArg>,
}

/// Normalize any declaration shape into the canonical ordered list.
/// Names are not validated here.
pub fn normalize(decl: FieldDecl) -> Result<Vec<NormalizedField>, DeclError> {
    match decl {
        FieldDecl::Delimited(s) => Ok(s
            .replace(',', " ")
            .split_whitespace()
            .map(|name| NormalizedField {
                name: name.to_string(),
                default: None,
            })
            .collect()),

        FieldDecl::Entries(entries) => entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| normalize_entry(index, entry))
            .collect(),

        FieldDecl::Mapping(entries) => Ok(entries
            .into_iter()
            .map(|(name, default)| NormalizedField {
                name,
                default: Some(default),
            })
            .collect()),
    }
}

fn normalize_entry(index: usize, entry: FieldEntry) -> Result<NormalizedField, DeclError> {
    match entry {
        FieldEntry::Name(name) => Ok(NormalizedField {
            name,
            default: None,
        }),
        FieldEntry::Pair(name, default) => Ok(NormalizedField {
            name,
            default: Some(default),
        }),
        FieldEntry::Untyped(value) => normalize_untyped(index, value),
    }
}

fn normalize_untyped(index: usize, value: Value) -> Result<NormalizedField, DeclError> {
    let malformed = |value: &Value| DeclError::MalformedFieldSpec {
        index,
        element: value.to_string(),
    };

    match value {
        Value::Text(name) => Ok(NormalizedField {
            name,
            default: None,
        }),
        Value::List(ref list) => {
            let items = list.to_vec();
            let [Value::Text(name), default] = items.as_slice() else {
                return Err(malformed(&value));
            };

            Ok(NormalizedField {
                name: name.clone(),
                default: Some(DefaultArg::Value(default.clone())),
            })
        }
        other => Err(malformed(&other)),
    }
}
