use std::fmt::Display;
use std::ops::Index;

use float_cmp::approx_eq;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::MapAccess;
use serde::de::SeqAccess;
use serde::de::Visitor;

/// A decoded metadata value.
///
/// This is the closed variant shared by all three formats: whatever the
/// decoder produces is folded into one of these shapes, so downstream
/// consumers can match exhaustively instead of reaching through an
/// open-ended dynamic type.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Value {
	/// An explicit null / absent value.
	Null,
	/// `true` or `false`.
	Bool(bool),
	/// An integer, e.g. `42`.
	Int(i64),
	/// A floating point number, e.g. `3.14`.
	Float(f64),
	/// A string value.
	String(String),
	/// An ordered sequence of values.
	Sequence(Vec<Value>),
	/// A nested mapping.
	Mapping(Mapping),
}

impl Value {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(value) => Some(*value),
			Self::Int(value) => Some(*value as f64),
			_ => None,
		}
	}

	pub fn as_sequence(&self) -> Option<&[Value]> {
		match self {
			Self::Sequence(values) => Some(values),
			_ => None,
		}
	}

	pub fn as_mapping(&self) -> Option<&Mapping> {
		match self {
			Self::Mapping(mapping) => Some(mapping),
			_ => None,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}

impl Eq for Value {}
impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(value), Value::Bool(other_value)) => value == other_value,
			(Value::Int(value), Value::Int(other_value)) => value == other_value,
			(Value::Float(value), Value::Float(other_value)) => {
				approx_eq!(f64, *value, *other_value, ulps = 2)
			}
			(Value::String(value), Value::String(other_value)) => value == other_value,
			(Value::Sequence(values), Value::Sequence(other_values)) => values == other_values,
			(Value::Mapping(mapping), Value::Mapping(other_mapping)) => mapping == other_mapping,
			_ => false,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => write!(f, "null"),
			Value::Bool(value) => write!(f, "{value}"),
			Value::Int(value) => write!(f, "{value}"),
			Value::Float(value) => write!(f, "{value}"),
			Value::String(value) => write!(f, "{value}"),
			Value::Sequence(values) => {
				write!(f, "[")?;
				for (index, value) in values.iter().enumerate() {
					if index > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{value}")?;
				}
				write!(f, "]")
			}
			Value::Mapping(mapping) => {
				write!(f, "{{")?;
				for (index, (key, value)) in mapping.iter().enumerate() {
					if index > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{key}: {value}")?;
				}
				write!(f, "}}")
			}
		}
	}
}

/// A key-unique, insertion-order-preserving mapping from string keys to
/// [`Value`]s.
///
/// Order preservation is canonical here: some consumers care about the order
/// keys were written in the source block, and a plain hash map would lose it.
/// Inserting an existing key overwrites the value in place without moving the
/// key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
	entries: Vec<(String, Value)>,
}

impl Mapping {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a key/value pair, overwriting in place when the key already
	/// exists. Returns the previous value for an overwritten key.
	pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
		let key = key.into();

		if let Some((_, existing)) = self.entries.iter_mut().find(|(name, _)| *name == key) {
			return Some(std::mem::replace(existing, value));
		}

		self.entries.push((key, value));
		None
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries
			.iter()
			.find(|(name, _)| name == key)
			.map(|(_, value)| value)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate over entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.entries.iter().map(|(key, value)| (key, value))
	}

	/// Iterate over keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &String> {
		self.entries.iter().map(|(key, _)| key)
	}
}

impl Index<&str> for Mapping {
	type Output = Value;

	/// Panics when the key is absent; use [`Mapping::get`] for a fallible
	/// lookup.
	fn index(&self, key: &str) -> &Self::Output {
		self.get(key)
			.unwrap_or_else(|| panic!("no metadata entry for key `{key}`"))
	}
}

impl<'a> IntoIterator for &'a Mapping {
	type IntoIter = std::slice::Iter<'a, (String, Value)>;
	type Item = &'a (String, Value);

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl FromIterator<(String, Value)> for Mapping {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		let mut mapping = Self::new();
		for (key, value) in iter {
			mapping.insert(key, value);
		}
		mapping
	}
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
	type Value = Value;

	fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		formatter.write_str("a metadata value")
	}

	fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
		Ok(Value::Bool(value))
	}

	fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Self::Value, E> {
		Ok(Value::Int(value))
	}

	fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Self::Value, E> {
		if let Ok(value) = i64::try_from(value) {
			Ok(Value::Int(value))
		} else {
			Ok(Value::Float(value as f64))
		}
	}

	fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<Self::Value, E> {
		Ok(Value::Float(value))
	}

	fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
		Ok(Value::String(value.to_owned()))
	}

	fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Self::Value, E> {
		Ok(Value::String(value))
	}

	fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
		Ok(Value::Null)
	}

	fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
		Ok(Value::Null)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
		Value::deserialize(deserializer)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
		let mut values = Vec::new();

		while let Some(value) = access.next_element()? {
			values.push(value);
		}

		Ok(Value::Sequence(values))
	}

	fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Self::Value, A::Error> {
		MappingVisitor.visit_map(access).map(Value::Mapping)
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(ValueVisitor)
	}
}

struct MappingVisitor;

impl<'de> Visitor<'de> for MappingVisitor {
	type Value = Mapping;

	fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		formatter.write_str("a mapping with string keys")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
		let mut mapping = Mapping::new();

		// Later duplicates overwrite earlier ones, keeping keys unique.
		while let Some((key, value)) = access.next_entry::<String, Value>()? {
			mapping.insert(key, value);
		}

		Ok(mapping)
	}
}

impl<'de> Deserialize<'de> for Mapping {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(MappingVisitor)
	}
}
