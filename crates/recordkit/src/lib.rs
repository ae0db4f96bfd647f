//! Mutable, order-preserving named records with defaults, built at runtime.
//!
//! ## Crate layout
//! - `core`: values, declarations, default resolution, record types and
//!   instances, the CBOR state codec, TOML declarations and metrics.
//! - `error`: the stable public error.
//!
//! Most callers only need [`make_record_type`] (or [`record_type`]) and the
//! `prelude`.

pub use recordkit_core as core;

pub mod error;

use recordkit_core::{
    config::RecordTypeConfig,
    decl::FieldDecl,
    default::DefaultArg,
    model::{RecordType, RecordTypeBuilder, StorageMode},
};

pub use error::{Error, ErrorKind, ErrorOrigin};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Options
///
/// default        → global default for fields without an explicit one
/// rename         → replace rejected field names with `_{index}`
/// fixed_storage  → reject undeclared fields (otherwise keep them as extras)
///

#[derive(Clone, Debug)]
pub struct Options {
    pub default: DefaultArg,
    pub rename: bool,
    pub fixed_storage: bool,
}

impl Options {
    #[must_use]
    pub fn with_default(mut self, default: impl Into<DefaultArg>) -> Self {
        self.default = default.into();
        self
    }

    #[must_use]
    pub const fn with_rename(mut self, rename: bool) -> Self {
        self.rename = rename;
        self
    }

    #[must_use]
    pub const fn with_fixed_storage(mut self, fixed_storage: bool) -> Self {
        self.fixed_storage = fixed_storage;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default: DefaultArg::NoDefault,
            rename: false,
            fixed_storage: true,
        }
    }
}

/// Build a record type named `type_name` from any accepted field declaration.
///
/// Returns the type without instantiating it; nothing is built on failure.
pub fn make_record_type(
    type_name: &str,
    decl: impl Into<FieldDecl>,
    options: Options,
) -> Result<RecordType, Error> {
    let Options {
        default,
        rename,
        fixed_storage,
    } = options;

    RecordTypeBuilder::new(type_name, decl)
        .default_arg(default)
        .rename(rename)
        .storage(StorageMode::from_fixed(fixed_storage))
        .build()
        .map_err(Error::from)
}

/// [`make_record_type`] with default options.
pub fn record_type(type_name: &str, decl: impl Into<FieldDecl>) -> Result<RecordType, Error> {
    make_record_type(type_name, decl, Options::default())
}

/// Build a record type declared in TOML.
pub fn record_type_from_toml(content: &str) -> Result<RecordType, Error> {
    let config = RecordTypeConfig::from_toml_str(content)?;

    config.build().map_err(Error::from)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Error, Options, make_record_type, record_type};
    pub use recordkit_core::prelude::*;
}
