//! Core runtime for recordkit: dynamic values, name validation, field
//! declarations, default resolution, record types, and record instances.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod decl;
pub mod default;
pub mod error;
pub mod model;
pub mod naming;
pub mod obs;
pub mod record;
pub mod resolve;
pub mod serialize;
pub mod value;

pub use error::{Error, ErrorKind};

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or serializers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        decl::{FieldDecl, FieldEntry},
        default::{DefaultArg, DefaultKind, Factory},
        model::{FieldModel, RecordType, RecordTypeBuilder, StorageMode},
        record::{Args, Record, RecordState},
        value::{SharedList, Value},
    };
}
