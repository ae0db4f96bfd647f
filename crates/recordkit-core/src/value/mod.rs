mod list;
mod wire;


use std::fmt;

// re-exports
pub use list::SharedList;

///
/// Value
/// Dynamic field payload stored in record slots.
///
/// Null        → the absence of a value (still a value; fields are never unset).
/// List        → shared, mutable list; clones alias the same buffer.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    Bool(bool),
    Float64(f64),
    Int(i64),
    /// Ordered list of values behind a shared handle.
    /// Equality compares contents; `SharedList::ptr_eq` compares identity.
    List(SharedList),
    #[default]
    Null,
    Text(String),
}

impl Value {
    /// Build a fresh list value that shares nothing with any other value.
    #[must_use]
    pub fn list(items: Vec<Self>) -> Self {
        Self::List(SharedList::from_vec(items))
    }

    /// Build an empty list value.
    #[must_use]
    pub fn empty_list() -> Self {
        Self::List(SharedList::new())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&SharedList> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Stable, human-readable variant label used in diagnostics.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Float64(_) => "float",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::Text(_) => "text",
        }
    }
}

// Canonical representation; record display is built from this.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Float64(x) => write!(f, "{x:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::List(list) => fmt::Display::fmt(list, f),
            Self::Null => f.write_str("null"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

///
/// From impls
///

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float64(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<SharedList> for Value {
    fn from(list: SharedList) -> Self {
        Self::List(list)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
