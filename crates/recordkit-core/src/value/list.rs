use crate::value::Value;
use parking_lot::RwLock;
use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    sync::Arc,
};

///
/// SharedList
///
/// Reference-counted, interior-mutable list of values.
/// Cloning the handle aliases the same buffer; use `deep_clone` for an
/// independent copy. Mutation through any handle is visible through all.
///
/// A list may contain itself (directly or through nested lists). Display,
/// equality, serialization and `deep_clone` all terminate on such lists.
///

#[derive(Clone, Default)]
pub struct SharedList(Arc<RwLock<Vec<Value>>>);

impl SharedList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from an existing vector.
    #[must_use]
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    /// Returns `true` if both handles point at the same buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Return a clone of the item at `index`, if it exists.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Append an item to the list.
    pub fn push(&self, value: impl Into<Value>) {
        let value = value.into();
        self.0.write().push(value);
    }

    /// Remove and return the last item, if any.
    pub fn pop(&self) -> Option<Value> {
        self.0.write().pop()
    }

    /// Replace the item at `index`, returning the previous one.
    /// Returns `None` (and changes nothing) when `index` is out of range.
    pub fn replace(&self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        let mut items = self.0.write();
        let slot = items.get_mut(index)?;

        Some(std::mem::replace(slot, value))
    }

    /// Clear all items from the list.
    pub fn clear(&self) {
        self.0.write().clear();
    }

    /// Snapshot the current contents.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Copy into a new, unaliased list. Nested lists are copied too; lists
    /// reached more than once (including the list itself) are copied once,
    /// so the copy has the same sharing shape as the original.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        self.deep_clone_into(&mut BTreeMap::new())
    }

    fn deep_clone_into(&self, copies: &mut BTreeMap<usize, Self>) -> Self {
        if let Some(copy) = copies.get(&self.id()) {
            return copy.clone();
        }

        let copy = Self::new();
        copies.insert(self.id(), copy.clone());

        let items = self
            .to_vec()
            .into_iter()
            .map(|item| match item {
                Value::List(inner) => Value::List(inner.deep_clone_into(copies)),
                other => other,
            })
            .collect();
        *copy.0.write() = items;

        copy
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.0).addr()
    }
}

///
/// Walk
///
/// Recursive traversals in progress on this thread, keyed by the list (or
/// pair of lists) being walked. Re-entering a key means the lists are cyclic.
/// Locks are never held across a nested walk; each level works on a snapshot.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Walk {
    Display,
    Debug,
    Eq,
    Serialize,
}

thread_local! {
    static WALKING: RefCell<Vec<(Walk, usize, usize)>> = const { RefCell::new(Vec::new()) };
}

pub(super) struct WalkGuard;

impl WalkGuard {
    /// Mark `list` (paired with `other` for comparisons) as being walked.
    /// `None` if it already is, i.e. the walk has come back around a cycle.
    pub(super) fn enter(walk: Walk, list: &SharedList, other: Option<&SharedList>) -> Option<Self> {
        let key = (walk, list.id(), other.map_or(0, SharedList::id));

        WALKING.with(|cell| {
            let mut walking = cell.borrow_mut();
            if walking.contains(&key) {
                return None;
            }
            walking.push(key);

            Some(Self)
        })
    }
}

impl Drop for WalkGuard {
    fn drop(&mut self) {
        WALKING.with(|cell| {
            cell.borrow_mut().pop();
        });
    }
}

// Two lists already being compared further up the stack are assumed equal;
// any real difference is found by the outer comparison.
impl PartialEq for SharedList {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let Some(_guard) = WalkGuard::enter(Walk::Eq, self, Some(other)) else {
            return true;
        };

        self.to_vec() == other.to_vec()
    }
}

// `[1, [...]]` for a list that contains itself.
impl fmt::Display for SharedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_guard) = WalkGuard::enter(Walk::Display, self, None) else {
            return f.write_str("[...]");
        };

        f.write_str("[")?;
        for (i, item) in self.to_vec().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for SharedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_guard) = WalkGuard::enter(Walk::Debug, self, None) else {
            return f.write_str("[...]");
        };

        f.debug_list().entries(self.to_vec()).finish()
    }
}

impl From<Vec<Value>> for SharedList {
    fn from(items: Vec<Value>) -> Self {
        Self::from_vec(items)
    }
}

impl FromIterator<Value> for SharedList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
