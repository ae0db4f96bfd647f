use crate::{
    config::ConfigError, decl::DeclError, naming::NameError, record::RecordError,
    resolve::DefaultError, serialize::SerializeError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decl(#[from] DeclError),

    #[error(transparent)]
    Default(#[from] DefaultError),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

impl Error {
    /// Return a stable error kind independent of message text.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Decl(_) => ErrorKind::MalformedFieldSpec,
            Self::Default(DefaultError::DefaultOrderViolation { .. }) => {
                ErrorKind::DefaultOrderViolation
            }
            Self::Name(err) => match err {
                NameError::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
                NameError::DuplicateField { .. } => ErrorKind::DuplicateField,
                NameError::ReservedFieldName { .. } => ErrorKind::ReservedFieldName,
            },
            Self::Record(err) => err.kind(),
            Self::Serialize(_) => ErrorKind::Serialize,
        }
    }
}

///
/// ErrorKind
///
/// Stable error-kind taxonomy across every module.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ErrorKind {
    /// Constructor call or state tuple does not match the field list.
    Arity,
    Config,
    DefaultOrderViolation,
    DuplicateField,
    IndexError,
    InvalidIdentifier,
    MalformedFieldSpec,
    NotHashable,
    ReservedFieldName,
    Serialize,
    UnknownField,
    ValueNotFound,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arity => "arity",
            Self::Config => "config",
            Self::DefaultOrderViolation => "default_order_violation",
            Self::DuplicateField => "duplicate_field",
            Self::IndexError => "index_error",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::MalformedFieldSpec => "malformed_field_spec",
            Self::NotHashable => "not_hashable",
            Self::ReservedFieldName => "reserved_field_name",
            Self::Serialize => "serialize",
            Self::UnknownField => "unknown_field",
            Self::ValueNotFound => "value_not_found",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
