use crate::{
    Error,
    config::RecordOptions,
    decl::{FieldDecl, normalize},
    default::{DefaultArg, Factory},
    model::{RecordType, StorageMode},
    naming::{NameChecker, NameError},
    obs::sink::{MetricsEvent, record},
    resolve::resolve,
    value::Value,
};

///
/// RecordTypeBuilder
///
/// Collects a type name, a field declaration and the build options, then
/// runs the pipeline in order:
/// - type name check
/// - declaration normalization
/// - field name checks (with optional positional renaming)
/// - default resolution and the ordering rule
///
/// Nothing is built unless every step succeeds.
///

#[derive(Clone, Debug)]
pub struct RecordTypeBuilder {
    type_name: String,
    decl: FieldDecl,
    default: DefaultArg,
    rename: bool,
    storage: StorageMode,
}

impl RecordTypeBuilder {
    pub fn new(type_name: impl Into<String>, decl: impl Into<FieldDecl>) -> Self {
        Self {
            type_name: type_name.into(),
            decl: decl.into(),
            default: DefaultArg::NoDefault,
            rename: false,
            storage: StorageMode::Fixed,
        }
    }

    /// Global default for every field without an explicit one.
    #[must_use]
    pub fn default_arg(mut self, default: DefaultArg) -> Self {
        self.default = default;
        self
    }

    /// Global static default, shared by every record that takes it.
    #[must_use]
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.default_arg(DefaultArg::Value(value.into()))
    }

    /// Global factory default, invoked once per omitted field per construction.
    #[must_use]
    pub fn default_factory<F>(self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default_arg(DefaultArg::Factory(Factory::new(f)))
    }

    #[must_use]
    pub const fn rename(mut self, rename: bool) -> Self {
        self.rename = rename;
        self
    }

    #[must_use]
    pub const fn storage(mut self, storage: StorageMode) -> Self {
        self.storage = storage;
        self
    }

    /// Apply a reusable option set.
    #[must_use]
    pub const fn options(self, options: &RecordOptions) -> Self {
        self.rename(options.rename).storage(options.storage)
    }

    /// Build the record type.
    pub fn build(self) -> Result<RecordType, Error> {
        let type_name = self.type_name.clone();

        match self.try_build() {
            Ok(ty) => {
                tracing::debug!(
                    type_name = ty.name(),
                    fields = ty.len(),
                    storage = ?ty.storage(),
                    "record type built"
                );
                record(MetricsEvent::TypeBuilt {
                    type_name: ty.name(),
                    fields: ty.len(),
                });

                Ok(ty)
            }
            Err(err) => {
                let kind = err.kind();
                tracing::debug!(type_name = %type_name, %kind, "record type rejected");
                record(MetricsEvent::TypeRejected {
                    type_name: &type_name,
                    kind,
                });

                Err(err)
            }
        }
    }

    fn try_build(self) -> Result<RecordType, Error> {
        let Self {
            type_name,
            decl,
            default,
            rename,
            storage,
        } = self;

        let mut names = NameChecker::new(&type_name)?;
        let fields = normalize(decl)?
            .into_iter()
            .enumerate()
            .map(|(index, mut field)| {
                field.name = names.check_field(&field.name, rename, index)?;
                Ok(field)
            })
            .collect::<Result<Vec<_>, NameError>>()?;
        let fields = resolve(fields, &default)?;

        Ok(RecordType::new(type_name, fields, storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ErrorKind,
        decl::FieldEntry,
        obs::{MetricsSink, with_metrics_sink},
    };
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default)]
    struct EventLog(RefCell<Vec<String>>);

    impl MetricsSink for EventLog {
        fn record(&self, event: MetricsEvent<'_>) {
            self.0.borrow_mut().push(format!("{event:?}"));
        }
    }

    fn kind_of(result: Result<RecordType, Error>) -> ErrorKind {
        result.unwrap_err().kind()
    }

    #[test]
    fn builds_in_declared_order() {
        let ty = RecordTypeBuilder::new("Point", "x y z").build().unwrap();

        assert_eq!(ty.field_names(), ["x", "y", "z"]);
        assert_eq!(ty.storage(), StorageMode::Fixed);
    }

    #[test]
    fn type_name_is_checked_before_fields() {
        let result = RecordTypeBuilder::new("for", vec![FieldEntry::from(Value::Int(1))]).build();

        assert_eq!(kind_of(result), ErrorKind::InvalidIdentifier);
    }

    #[test]
    fn each_failure_maps_to_its_kind() {
        assert_eq!(
            kind_of(RecordTypeBuilder::new("Point", "x x").build()),
            ErrorKind::DuplicateField
        );
        assert_eq!(
            kind_of(RecordTypeBuilder::new("Point", "x _y").build()),
            ErrorKind::ReservedFieldName
        );
        assert_eq!(
            kind_of(RecordTypeBuilder::new("Point", "x fn").build()),
            ErrorKind::InvalidIdentifier
        );
        assert_eq!(
            kind_of(
                RecordTypeBuilder::new(
                    "Point",
                    vec![FieldEntry::with_default("x", 1), FieldEntry::name("y")]
                )
                .build()
            ),
            ErrorKind::DefaultOrderViolation
        );
    }

    #[test]
    fn rename_applies_before_default_resolution() {
        let ty = RecordTypeBuilder::new("Point", "a a _b")
            .rename(true)
            .default_value(0)
            .build()
            .unwrap();

        assert_eq!(ty.field_names(), ["a", "_1", "_2"]);
        assert_eq!(ty.required_count(), 0);
    }

    #[test]
    fn options_set_rename_and_storage() {
        let options = RecordOptions {
            rename: true,
            storage: StorageMode::Open,
        };
        let ty = RecordTypeBuilder::new("Point", "x x")
            .options(&options)
            .build()
            .unwrap();

        assert_eq!(ty.field_names(), ["x", "_1"]);
        assert!(ty.storage().is_open());
    }

    #[test]
    fn build_outcomes_are_reported_to_the_sink() {
        let log = Rc::new(EventLog::default());

        with_metrics_sink(log.clone(), || {
            RecordTypeBuilder::new("Point", "x").build().unwrap();
            RecordTypeBuilder::new("Point", "x x").build().unwrap_err();
        });

        let events = log.0.borrow();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("TypeBuilt"));
        assert!(events[1].contains("DuplicateField"));
    }
}
