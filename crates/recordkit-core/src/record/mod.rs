//! Record instances and the generated constructor.


use crate::{
    Error, ErrorKind,
    model::RecordType,
    obs::sink::{MetricsEvent, record},
    serialize::{SerializeError, decode_bounded, encode},
    value::Value,
};
use derive_more::{Deref, IntoIterator};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    any::Any,
    collections::BTreeMap,
    fmt,
    ops::{Bound, RangeBounds},
};
use thiserror::Error as ThisError;

/// Largest encoded state tuple `RecordType::decode` will read.
pub const MAX_STATE_BYTES: usize = 4 * 1024 * 1024;

///
/// RecordError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RecordError {
    #[error("{type_name}() takes at most {max} positional arguments ({given} given)")]
    TooManyArguments {
        type_name: String,
        max: usize,
        given: usize,
    },

    #[error("{type_name}() missing required argument {field:?}")]
    MissingArgument { type_name: String, field: String },

    #[error("{type_name}() got an unexpected argument {name:?}")]
    UnexpectedArgument { type_name: String, name: String },

    #[error("{type_name}() got multiple values for argument {field:?}")]
    DuplicateArgument { type_name: String, field: String },

    #[error("{type_name} state has {given} values, expected {expected}")]
    StateLength {
        type_name: String,
        expected: usize,
        given: usize,
    },

    #[error("{type_name} has no field {name:?}")]
    UnknownField { type_name: String, name: String },

    #[error("{type_name} index {index} out of range (len {len})")]
    IndexOutOfRange {
        type_name: String,
        index: usize,
        len: usize,
    },

    #[error("{value} is not in {type_name}")]
    ValueNotFound { type_name: String, value: String },

    #[error("unhashable type: {type_name:?}")]
    NotHashable { type_name: String },
}

impl RecordError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TooManyArguments { .. }
            | Self::MissingArgument { .. }
            | Self::UnexpectedArgument { .. }
            | Self::DuplicateArgument { .. }
            | Self::StateLength { .. } => ErrorKind::Arity,
            Self::UnknownField { .. } => ErrorKind::UnknownField,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexError,
            Self::ValueNotFound { .. } => ErrorKind::ValueNotFound,
            Self::NotHashable { .. } => ErrorKind::NotHashable,
        }
    }
}

///
/// Args
/// Constructor arguments: positional values, then named ones.
///

#[derive(Clone, Debug, Default)]
pub struct Args {
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl Args {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a named argument.
    #[must_use]
    pub fn named(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((field.into(), value.into()));
        self
    }
}

impl<V: Into<Value>> FromIterator<V> for Args {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().map(Into::into).collect(),
            named: Vec::new(),
        }
    }
}

///
/// RecordState
///
/// Exported field values in declared order; no names, no type.
/// Serializes identically to a sequence of values.
///

#[derive(Clone, Debug, Default, Deref, Deserialize, IntoIterator, PartialEq, Serialize)]
#[into_iterator(owned, ref)]
#[serde(transparent)]
pub struct RecordState(Vec<Value>);

impl RecordState {
    #[must_use]
    pub const fn from_vec(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for RecordState {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl<V: Into<Value>> FromIterator<V> for RecordState {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

///
/// RecordType: constructor and state import
///

impl RecordType {
    /// Build an instance from positional and named arguments.
    ///
    /// Every argument is checked before any factory default runs, so a
    /// rejected call has no side effects.
    pub fn construct(&self, args: Args) -> Result<Record, RecordError> {
        let result = self.bind(args).map(|slots| self.fill(slots));

        if let Err(err) = &result {
            tracing::trace!(type_name = self.name(), %err, "construction rejected");
            record(MetricsEvent::ConstructRejected {
                type_name: self.name(),
            });
        }

        result
    }

    /// Shorthand for a purely positional construction.
    pub fn call<I, V>(&self, values: I) -> Result<Record, RecordError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.construct(values.into_iter().collect())
    }

    /// Materialize an instance from an exported tuple without running
    /// any default or factory. The tuple must match the field count.
    pub fn from_state(&self, state: impl Into<RecordState>) -> Result<Record, RecordError> {
        let state = state.into();
        if state.len() != self.len() {
            return Err(RecordError::StateLength {
                type_name: self.name().to_string(),
                expected: self.len(),
                given: state.len(),
            });
        }

        Ok(Record::new(self.clone(), state.into_vec()))
    }

    /// Decode a tuple written by [`Record::encode`].
    pub fn decode(&self, bytes: &[u8]) -> Result<Record, Error> {
        let state: RecordState = decode_bounded(bytes, MAX_STATE_BYTES)?;

        Ok(self.from_state(state)?)
    }

    // Map arguments onto slots; `None` marks a slot still needing its default.
    fn bind(&self, args: Args) -> Result<Vec<Option<Value>>, RecordError> {
        let Args { positional, named } = args;
        let type_name = || self.name().to_string();

        if positional.len() > self.len() {
            return Err(RecordError::TooManyArguments {
                type_name: type_name(),
                max: self.len(),
                given: positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = positional.into_iter().map(Some).collect();
        slots.resize(self.len(), None);

        for (name, value) in named {
            let Some(index) = self.position(&name) else {
                return Err(RecordError::UnexpectedArgument {
                    type_name: type_name(),
                    name,
                });
            };
            if slots[index].is_some() {
                return Err(RecordError::DuplicateArgument {
                    type_name: type_name(),
                    field: name,
                });
            }
            slots[index] = Some(value);
        }

        if let Some(missing) = self
            .fields()
            .iter()
            .zip(&slots)
            .find(|(field, slot)| slot.is_none() && field.is_required())
        {
            return Err(RecordError::MissingArgument {
                type_name: type_name(),
                field: missing.0.name().to_string(),
            });
        }

        Ok(slots)
    }

    // Fill unsupplied slots from defaults. Only called once binding succeeded,
    // so every empty slot has a default.
    fn fill(&self, slots: Vec<Option<Value>>) -> Record {
        let mut defaults_applied = 0u64;

        let values = slots
            .into_iter()
            .zip(self.fields())
            .map(|(slot, field)| {
                slot.unwrap_or_else(|| {
                    defaults_applied += 1;
                    if field.default().is_factory() {
                        record(MetricsEvent::FactoryInvoked {
                            type_name: self.name(),
                        });
                    }
                    field.default().materialize().unwrap_or_default()
                })
            })
            .collect();

        tracing::trace!(type_name = self.name(), defaults_applied, "record constructed");
        record(MetricsEvent::RecordConstructed {
            type_name: self.name(),
            defaults_applied,
        });

        Record::new(self.clone(), values)
    }
}

///
/// Record
///
/// One slot per declared field, in declared order. Open-storage types keep
/// undeclared fields in a side map that is invisible to length, iteration,
/// equality, display and export.
///
/// `Clone` is shallow: cloned list values alias the original's lists.
///

#[derive(Clone)]
pub struct Record {
    ty: RecordType,
    slots: Vec<Value>,
    extra: BTreeMap<String, Value>,
}

impl Record {
    const fn new(ty: RecordType, slots: Vec<Value>) -> Self {
        Self {
            ty,
            slots,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn record_type(&self) -> &RecordType {
        &self.ty
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    // ---------------------------------------------------------------------
    // Positional access
    // ---------------------------------------------------------------------

    pub fn get(&self, index: usize) -> Result<&Value, RecordError> {
        self.slots.get(index).ok_or_else(|| self.out_of_range(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Value, RecordError> {
        if index >= self.slots.len() {
            return Err(self.out_of_range(index));
        }

        Ok(&mut self.slots[index])
    }

    /// Replace the value at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<Value, RecordError> {
        let slot = self.get_mut(index)?;

        Ok(std::mem::replace(slot, value.into()))
    }

    // ---------------------------------------------------------------------
    // Named access
    // ---------------------------------------------------------------------

    /// Read a declared field, or an extra field on open storage.
    pub fn field(&self, name: &str) -> Result<&Value, RecordError> {
        match self.ty.position(name) {
            Some(index) => Ok(&self.slots[index]),
            None => self.extra.get(name).ok_or_else(|| self.unknown(name)),
        }
    }

    /// Write a field by name.
    ///
    /// Undeclared names are stored as extras on open storage and rejected
    /// on fixed storage.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        if let Some(index) = self.ty.position(name) {
            self.slots[index] = value.into();
            return Ok(());
        }
        if !self.ty.storage().is_open() {
            return Err(self.unknown(name));
        }
        self.extra.insert(name.to_string(), value.into());

        Ok(())
    }

    /// Extra fields set on an open-storage instance.
    #[must_use]
    pub const fn extra_fields(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    // ---------------------------------------------------------------------
    // Sequence operations
    // ---------------------------------------------------------------------

    /// Field values in declared order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.slots.iter()
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.slots
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.slots.contains(value)
    }

    #[must_use]
    pub fn count(&self, value: &Value) -> usize {
        self.slots.iter().filter(|v| *v == value).count()
    }

    /// Position of the first field equal to `value`.
    pub fn index_of(&self, value: &Value) -> Result<usize, RecordError> {
        self.index_of_in(value, ..)
    }

    /// Like [`index_of`](Self::index_of), searching only `range`.
    /// Bounds past the end are clamped; an empty window finds nothing.
    pub fn index_of_in(
        &self,
        value: &Value,
        range: impl RangeBounds<usize>,
    ) -> Result<usize, RecordError> {
        let len = self.slots.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);

        self.slots
            .get(start..end.max(start))
            .and_then(|window| window.iter().position(|v| v == value))
            .map(|offset| start + offset)
            .ok_or_else(|| RecordError::ValueNotFound {
                type_name: self.ty.name().to_string(),
                value: value.to_string(),
            })
    }

    // ---------------------------------------------------------------------
    // Export / import
    // ---------------------------------------------------------------------

    /// Export the ordered field values.
    #[must_use]
    pub fn state(&self) -> RecordState {
        RecordState(self.slots.clone())
    }

    /// Restore values by position without running defaults.
    /// Extra or missing entries are ignored.
    pub fn set_state(&mut self, state: impl IntoIterator<Item = Value>) {
        for (slot, value) in self.slots.iter_mut().zip(state) {
            *slot = value;
        }
    }

    /// Ordered field name → value mapping.
    #[must_use]
    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.ty
            .field_names()
            .into_iter()
            .map(str::to_string)
            .zip(self.slots.iter().cloned())
            .collect()
    }

    /// Encode the exported tuple as CBOR.
    pub fn encode(&self) -> Result<Vec<u8>, SerializeError> {
        encode(&self.slots)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.slots
    }

    // ---------------------------------------------------------------------
    // Dynamic protocol
    // ---------------------------------------------------------------------

    /// Records are mutable and never hashable.
    pub fn try_hash(&self) -> Result<u64, RecordError> {
        Err(RecordError::NotHashable {
            type_name: self.ty.name().to_string(),
        })
    }

    /// Equality against an arbitrary value; anything that is not a record
    /// of the same built type compares unequal.
    #[must_use]
    pub fn eq_dyn(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<Self>().is_some_and(|o| self == o)
    }

    // ---------------------------------------------------------------------
    // Errors
    // ---------------------------------------------------------------------

    fn out_of_range(&self, index: usize) -> RecordError {
        RecordError::IndexOutOfRange {
            type_name: self.ty.name().to_string(),
            index,
            len: self.slots.len(),
        }
    }

    fn unknown(&self, name: &str) -> RecordError {
        RecordError::UnknownField {
            type_name: self.ty.name().to_string(),
            name: name.to_string(),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.ty.same_type(&other.ty) && self.slots == other.slots
    }
}

// `Point(x=1, y="a")`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ty.name())?;
        for (i, (field, value)) in self.ty.fields().iter().zip(&self.slots).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={value}", field.name())?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.ty.name());
        for (field, value) in self.ty.fields().iter().zip(&self.slots) {
            s.field(field.name(), value);
        }
        s.finish()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

impl IntoIterator for Record {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}
