//! Built record types: the immutable descriptor shared by every instance.

mod builder;

use crate::default::DefaultKind;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, sync::Arc};

// re-exports
pub use builder::RecordTypeBuilder;

///
/// StorageMode
///
/// Fixed → only declared fields can ever be set.
/// Open  → undeclared names are kept in a side map on each instance.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    #[default]
    Fixed,
    Open,
}

impl StorageMode {
    /// Map the `fixed_storage` flag onto a mode.
    #[must_use]
    pub const fn from_fixed(fixed: bool) -> Self {
        if fixed { Self::Fixed } else { Self::Open }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

///
/// FieldModel
/// One declared field with its resolved default.
///

#[derive(Clone, Debug)]
pub struct FieldModel {
    name: String,
    default: DefaultKind,
}

impl FieldModel {
    pub fn new(name: impl Into<String>, default: DefaultKind) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn default(&self) -> &DefaultKind {
        &self.default
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_required()
    }
}

///
/// RecordType
///
/// Cheaply cloneable handle to a built descriptor. Two handles describe the
/// same type only if they come from the same build; names are irrelevant.
///

#[derive(Clone)]
pub struct RecordType {
    inner: Arc<RecordTypeInner>,
}

struct RecordTypeInner {
    name: String,
    fields: Vec<FieldModel>,
    positions: BTreeMap<String, usize>,
    storage: StorageMode,
    required: usize,
}

impl RecordType {
    pub(crate) fn new(name: String, fields: Vec<FieldModel>, storage: StorageMode) -> Self {
        let positions = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        let required = fields.iter().take_while(|f| f.is_required()).count();

        Self {
            inner: Arc::new(RecordTypeInner {
                name,
                fields,
                positions,
                storage,
                required,
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldModel] {
        &self.inner.fields
    }

    /// Declared field names, in order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.inner.fields.iter().map(FieldModel::name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    #[must_use]
    pub fn storage(&self) -> StorageMode {
        self.inner.storage
    }

    /// Position of a declared field.
    #[must_use]
    pub fn position(&self, field: &str) -> Option<usize> {
        self.inner.positions.get(field).copied()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.position(name).map(|i| &self.inner.fields[i])
    }

    /// Number of leading fields a constructor call must supply.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.inner.required
    }

    /// Descriptor identity.
    #[must_use]
    pub fn same_type(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.same_type(other)
    }
}

impl Eq for RecordType {}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.inner.name)
            .field("fields", &self.field_names())
            .field("storage", &self.inner.storage)
            .finish()
    }
}

// Signature form, e.g. `Point(x, y=10, z=<factory>)`.
impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.inner.name)?;
        for (i, field) in self.inner.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match field.default() {
                DefaultKind::None => f.write_str(field.name())?,
                DefaultKind::Value(v) => write!(f, "{}={v}", field.name())?,
                DefaultKind::Factory(_) => write!(f, "{}=<factory>", field.name())?,
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default::Factory;

    fn point() -> RecordType {
        RecordType::new(
            "Point".to_string(),
            vec![
                FieldModel::new("x", DefaultKind::None),
                FieldModel::new("y", DefaultKind::Value(10.into())),
                FieldModel::new("z", DefaultKind::Factory(Factory::empty_list())),
            ],
            StorageMode::Fixed,
        )
    }

    #[test]
    fn introspection_follows_declared_order() {
        let ty = point();

        assert_eq!(ty.name(), "Point");
        assert_eq!(ty.field_names(), ["x", "y", "z"]);
        assert_eq!(ty.position("z"), Some(2));
        assert_eq!(ty.position("w"), None);
        assert_eq!(ty.required_count(), 1);
        assert_eq!(ty.len(), 3);
    }

    #[test]
    fn identity_is_per_build_not_per_name() {
        let a = point();
        let b = point();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn display_shows_the_signature() {
        assert_eq!(point().to_string(), "Point(x, y=10, z=<factory>)");
    }

    #[test]
    fn storage_mode_from_fixed_flag() {
        assert_eq!(StorageMode::from_fixed(true), StorageMode::Fixed);
        assert!(StorageMode::from_fixed(false).is_open());
    }
}
