use derive_more::Display;
use recordkit_core::{
    Error as CoreError, ErrorKind as CoreErrorKind, config::ConfigError, record::RecordError,
    serialize::SerializeError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        let origin = match &err {
            CoreError::Config(_) => ErrorOrigin::Config,
            CoreError::Decl(_) => ErrorOrigin::Declaration,
            CoreError::Default(_) => ErrorOrigin::Defaults,
            CoreError::Name(_) => ErrorOrigin::Naming,
            CoreError::Record(_) => ErrorOrigin::Record,
            CoreError::Serialize(_) => ErrorOrigin::Serialize,
        };

        Self::new(err.kind().into(), origin, err.to_string())
    }
}

impl From<RecordError> for Error {
    fn from(err: RecordError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<SerializeError> for Error {
    fn from(err: SerializeError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        CoreError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Type or field name is not a usable identifier.
    InvalidIdentifier,
    DuplicateField,
    ReservedFieldName,
    MalformedFieldSpec,
    DefaultOrderViolation,

    /// Constructor arguments or a state tuple do not fit the field list.
    ArityError,
    UnknownField,
    IndexError,
    ValueNotFound,
    NotHashable,

    Serialize,
    Config,
}

impl From<CoreErrorKind> for ErrorKind {
    fn from(kind: CoreErrorKind) -> Self {
        match kind {
            CoreErrorKind::Arity => Self::ArityError,
            CoreErrorKind::Config => Self::Config,
            CoreErrorKind::DefaultOrderViolation => Self::DefaultOrderViolation,
            CoreErrorKind::DuplicateField => Self::DuplicateField,
            CoreErrorKind::IndexError => Self::IndexError,
            CoreErrorKind::InvalidIdentifier => Self::InvalidIdentifier,
            CoreErrorKind::MalformedFieldSpec => Self::MalformedFieldSpec,
            CoreErrorKind::NotHashable => Self::NotHashable,
            CoreErrorKind::ReservedFieldName => Self::ReservedFieldName,
            CoreErrorKind::Serialize => Self::Serialize,
            CoreErrorKind::UnknownField => Self::UnknownField,
            CoreErrorKind::ValueNotFound => Self::ValueNotFound,
        }
    }
}

///
/// ErrorOrigin
/// Which stage produced the error.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Declaration,
    Defaults,
    Naming,
    Record,
    Serialize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_errors_keep_kind_and_message() {
        let err = Error::from(RecordError::IndexOutOfRange {
            type_name: "Point".to_string(),
            index: 2,
            len: 2,
        });

        assert_eq!(err.kind, ErrorKind::IndexError);
        assert_eq!(err.origin, ErrorOrigin::Record);
        assert_eq!(err.message, "Point index 2 out of range (len 2)");
    }

    #[test]
    fn public_error_is_serializable() {
        let err = Error::from(ConfigError::Parse("bad".to_string()));
        let json = serde_json::to_string(&err).unwrap();

        assert_eq!(
            json,
            r#"{"kind":"Config","origin":"Config","message":"invalid record type config: bad"}"#
        );
        assert_eq!(serde_json::from_str::<Error>(&json).unwrap(), err);
    }

    #[test]
    fn size_limit_reaches_the_public_message() {
        let err = Error::from(SerializeError::TooLarge {
            len: 10,
            max_bytes: 4,
        });

        assert_eq!(err.kind, ErrorKind::Serialize);
        assert_eq!(err.origin, ErrorOrigin::Serialize);
        assert_eq!(err.message, "encoded state is 10 bytes, over the 4 byte limit");
    }

    #[test]
    fn kinds_display_their_names() {
        assert_eq!(ErrorKind::ArityError.to_string(), "ArityError");
        assert_eq!(ErrorOrigin::Defaults.to_string(), "Defaults");
    }
}
