use crate::value::{
    SharedList, Value,
    list::{Walk, WalkGuard},
};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    ser::{Error as _, SerializeSeq},
};

///
/// Value serializes in its natural form (null, bool, integer, float,
/// string, sequence) so persisted state tuples stay readable by any serde
/// format. List contents are snapshotted; decoded lists are never aliased.
/// A list that contains itself cannot be encoded.
///

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Float64(x) => serializer.serialize_f64(*x),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::List(list) => list.serialize(serializer),
            Self::Null => serializer.serialize_unit(),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for SharedList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let Some(_guard) = WalkGuard::enter(Walk::Serialize, self, None) else {
            return Err(S::Error::custom("list contains itself"));
        };

        let items = self.to_vec();
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in &items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

///
/// ValueWire
/// Serde decode shape for the natural form; order matters for untagged
/// matching (integers must be tried before floats).
///

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueWire {
    Null,
    Bool(bool),
    Int(i64),
    Float64(f64),
    Text(String),
    List(Vec<Self>),
}

impl ValueWire {
    fn into_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Int(i) => Value::Int(i),
            Self::Float64(x) => Value::Float64(x),
            Self::Text(s) => Value::Text(s),
            Self::List(items) => Value::list(items.into_iter().map(Self::into_value).collect()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ValueWire::deserialize(deserializer).map(ValueWire::into_value)
    }
}

impl<'de> Deserialize<'de> for SharedList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Value>::deserialize(deserializer).map(Self::from_vec)
    }
}
