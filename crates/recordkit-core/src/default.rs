use crate::value::Value;
use std::{fmt, sync::Arc};

///
/// Factory
///
/// Zero-argument producer invoked once per construction.
/// Use a factory instead of a static default whenever each record needs
/// its own mutable value.
///

#[derive(Clone)]
pub struct Factory(Arc<dyn Fn() -> Value + Send + Sync>);

impl Factory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Factory producing a fresh empty list on every call.
    #[must_use]
    pub fn empty_list() -> Self {
        Self::new(Value::empty_list)
    }

    #[must_use]
    pub fn produce(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Factory(..)")
    }
}

///
/// DefaultArg
///
/// Default as supplied by a caller, either per field or globally.
/// `NoDefault` is the explicit sentinel: per field it defers to the global
/// default; as the global default it means "fields are required".
///

#[derive(Clone, Debug, Default)]
pub enum DefaultArg {
    Value(Value),
    Factory(Factory),
    #[default]
    NoDefault,
}

impl DefaultArg {
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn factory<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::Factory(Factory::new(f))
    }

    #[must_use]
    pub const fn is_no_default(&self) -> bool {
        matches!(self, Self::NoDefault)
    }

    /// Resolved form; `None` when this is the sentinel.
    #[must_use]
    pub fn to_kind(&self) -> Option<DefaultKind> {
        match self {
            Self::Value(v) => Some(DefaultKind::Value(v.clone())),
            Self::Factory(f) => Some(DefaultKind::Factory(f.clone())),
            Self::NoDefault => None,
        }
    }
}

impl From<Value> for DefaultArg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Factory> for DefaultArg {
    fn from(factory: Factory) -> Self {
        Self::Factory(factory)
    }
}

///
/// DefaultKind
///
/// Resolved default of a single field.
///

#[derive(Clone, Debug, Default)]
pub enum DefaultKind {
    /// The constructor argument is required.
    #[default]
    None,
    /// Shared by every record that takes the default.
    Value(Value),
    Factory(Factory),
}

impl DefaultKind {
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub const fn is_factory(&self) -> bool {
        matches!(self, Self::Factory(_))
    }

    /// Produce the value a record receives when the argument is omitted.
    /// Static values are cloned (lists stay aliased); factories are invoked.
    #[must_use]
    pub fn materialize(&self) -> Option<Value> {
        match self {
            Self::None => None,
            Self::Value(v) => Some(v.clone()),
            Self::Factory(f) => Some(f.produce()),
        }
    }

    /// Short label used in logs and introspection.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Value(_) => "value",
            Self::Factory(_) => "factory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn factory_is_invoked_on_every_materialize() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let kind = DefaultKind::Factory(Factory::new(|| {
            Value::Int(i64::try_from(CALLS.fetch_add(1, Ordering::SeqCst)).unwrap())
        }));

        assert_eq!(kind.materialize(), Some(Value::Int(0)));
        assert_eq!(kind.materialize(), Some(Value::Int(1)));
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn static_default_materializes_an_alias() {
        let list = Value::empty_list();
        let kind = DefaultKind::Value(list.clone());

        let Some(Value::List(produced)) = kind.materialize() else {
            panic!("expected a list default");
        };
        assert!(produced.ptr_eq(list.as_list().unwrap()));
    }

    #[test]
    fn sentinel_has_no_resolved_kind() {
        assert!(DefaultArg::NoDefault.to_kind().is_none());
        assert!(DefaultArg::default().is_no_default());
        assert!(matches!(
            DefaultArg::value(3).to_kind(),
            Some(DefaultKind::Value(Value::Int(3)))
        ));
    }
}
