//! Identifier checks for record type names and field names.

mod reserved;

use std::{collections::BTreeSet, fmt};
use thiserror::Error as ThisError;
use unicode_ident::{is_xid_continue, is_xid_start};

pub(crate) use reserved::is_reserved_word;

///
/// NameRole
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameRole {
    Type,
    Field,
}

impl fmt::Display for NameRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => f.write_str("type"),
            Self::Field => f.write_str("field"),
        }
    }
}

///
/// IdentDefect
/// Which identifier rule a name broke.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IdentDefect {
    Empty,
    InvalidStart(char),
    InvalidChar(char),
    LoneUnderscore,
    Keyword,
}

impl fmt::Display for IdentDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("name is empty"),
            Self::InvalidStart(c) => write!(f, "cannot start with {c:?}"),
            Self::InvalidChar(c) => write!(f, "contains invalid character {c:?}"),
            Self::LoneUnderscore => f.write_str("'_' alone is not an identifier"),
            Self::Keyword => f.write_str("is a reserved keyword"),
        }
    }
}

///
/// NameError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum NameError {
    #[error("{role} name {name:?} is not a valid identifier: {defect}")]
    InvalidIdentifier {
        role: NameRole,
        name: String,
        defect: IdentDefect,
    },

    #[error("encountered duplicate field name: {name:?}")]
    DuplicateField { name: String },

    #[error("field names cannot start with an underscore: {name:?}")]
    ReservedFieldName { name: String },
}

/// Ensure `name` is a non-empty identifier that is not a keyword.
pub fn validate_ident(name: &str, role: NameRole) -> Result<(), NameError> {
    ident_defect(name).map_or(Ok(()), |defect| {
        Err(NameError::InvalidIdentifier {
            role,
            name: name.to_string(),
            defect,
        })
    })
}

// First rule broken by `name`, if any. Characters follow Unicode
// XID_Start / XID_Continue, with `_` allowed first.
fn ident_defect(name: &str) -> Option<IdentDefect> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Some(IdentDefect::Empty);
    };

    if !(is_xid_start(first) || first == '_') {
        return Some(IdentDefect::InvalidStart(first));
    }
    if let Some(bad) = chars.find(|c| !is_xid_continue(*c)) {
        return Some(IdentDefect::InvalidChar(bad));
    }
    if name == "_" {
        return Some(IdentDefect::LoneUnderscore);
    }
    if is_reserved_word(name) {
        return Some(IdentDefect::Keyword);
    }

    None
}

/// Positional name substituted for a rejected field in rename mode.
#[must_use]
pub fn placeholder_name(index: usize) -> String {
    format!("_{index}")
}

///
/// NameChecker
///
/// Validates the type name once, then each field name in declaration order,
/// remembering accepted names so duplicates can be detected.
///

#[derive(Debug)]
pub struct NameChecker {
    seen: BTreeSet<String>,
}

impl NameChecker {
    /// Validate `type_name`; type names are never renamed.
    pub fn new(type_name: &str) -> Result<Self, NameError> {
        validate_ident(type_name, NameRole::Type)?;

        Ok(Self {
            seen: BTreeSet::new(),
        })
    }

    /// Validate the field at `index`.
    ///
    /// With `rename` set, any rejected name is replaced by its positional
    /// placeholder instead of failing. The accepted name is remembered.
    pub fn check_field(
        &mut self,
        name: &str,
        rename: bool,
        index: usize,
    ) -> Result<String, NameError> {
        let accepted = match self.field_error(name) {
            None => name.to_string(),
            Some(_) if rename => {
                let placeholder = placeholder_name(index);
                tracing::debug!(field = name, placeholder = %placeholder, "renamed field");

                placeholder
            }
            Some(err) => return Err(err),
        };

        self.seen.insert(accepted.clone());

        Ok(accepted)
    }

    #[must_use]
    pub fn is_seen(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    fn field_error(&self, name: &str) -> Option<NameError> {
        if let Err(err) = validate_ident(name, NameRole::Field) {
            return Some(err);
        }
        if self.seen.contains(name) {
            return Some(NameError::DuplicateField {
                name: name.to_string(),
            });
        }
        if name.starts_with('_') {
            return Some(NameError::ReservedFieldName {
                name: name.to_string(),
            });
        }

        None
    }
}
