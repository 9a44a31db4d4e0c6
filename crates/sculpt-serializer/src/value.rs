//! Attribute values
//!
//! [`FieldValue`] is what an entity hands to the serializer for one attribute.
//! It is a closed set of built-in kinds plus two open ends: nested entities and
//! [`FieldValue::Opaque`] payloads that only a custom converter knows how to render.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::entity::Serializable;
use crate::error::BoxError;

/// Kind of a [`FieldValue`], used for converter matching and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	Null,
	Bool,
	Int,
	UInt,
	Float,
	Str,
	Bytes,
	Uuid,
	Time,
	DateTime,
	NaiveDateTime,
	Date,
	Decimal,
	Enum,
	Map,
	Seq,
	Entity,
	Deferred,
	Opaque,
}

impl ValueKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ValueKind::Null => "null",
			ValueKind::Bool => "bool",
			ValueKind::Int => "int",
			ValueKind::UInt => "uint",
			ValueKind::Float => "float",
			ValueKind::Str => "str",
			ValueKind::Bytes => "bytes",
			ValueKind::Uuid => "uuid",
			ValueKind::Time => "time",
			ValueKind::DateTime => "datetime",
			ValueKind::NaiveDateTime => "naive_datetime",
			ValueKind::Date => "date",
			ValueKind::Decimal => "decimal",
			ValueKind::Enum => "enum",
			ValueKind::Map => "map",
			ValueKind::Seq => "seq",
			ValueKind::Entity => "entity",
			ValueKind::Deferred => "deferred",
			ValueKind::Opaque => "opaque",
		}
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Member of an enumeration together with its underlying value
#[derive(Debug, Clone)]
pub struct EnumMember {
	type_name: &'static str,
	name: &'static str,
	value: Box<FieldValue>,
}

impl EnumMember {
	pub fn new(type_name: &'static str, name: &'static str, value: FieldValue) -> Self {
		Self {
			type_name,
			name,
			value: Box::new(value),
		}
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Member name, e.g. `Active`
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Underlying value the member stands for
	pub fn value(&self) -> &FieldValue {
		&self.value
	}

	pub fn into_value(self) -> FieldValue {
		*self.value
	}
}

/// Enumerations that serialize as their underlying value
///
/// # Examples
///
/// ```
/// use sculpt_serializer::{FieldValue, SerializableEnum};
///
/// enum Status {
///     Active,
///     Banned,
/// }
///
/// impl SerializableEnum for Status {
///     fn member_name(&self) -> &'static str {
///         match self {
///             Status::Active => "Active",
///             Status::Banned => "Banned",
///         }
///     }
///
///     fn member_value(&self) -> FieldValue {
///         match self {
///             Status::Active => FieldValue::from(1),
///             Status::Banned => FieldValue::from(2),
///         }
///     }
/// }
///
/// let value = FieldValue::from_enum(&Status::Banned);
/// assert_eq!(value.kind().as_str(), "enum");
/// ```
pub trait SerializableEnum {
	fn member_name(&self) -> &'static str;

	fn member_value(&self) -> FieldValue;
}

type AccessorFn = dyn Fn() -> Result<FieldValue, BoxError> + Send + Sync;

/// Computed attribute evaluated only when the serializer reaches it
#[derive(Clone)]
pub struct Accessor(Arc<AccessorFn>);

impl Accessor {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn() -> Result<FieldValue, BoxError> + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn call(&self) -> Result<FieldValue, BoxError> {
		(self.0)()
	}
}

impl fmt::Debug for Accessor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Accessor(..)")
	}
}

/// Arbitrary Rust value rendered by a custom type converter
#[derive(Clone)]
pub struct OpaqueValue {
	type_id: TypeId,
	type_name: &'static str,
	value: Arc<dyn Any + Send + Sync>,
}

impl OpaqueValue {
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			type_name: std::any::type_name::<T>(),
			value: Arc::new(value),
		}
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.value.downcast_ref::<T>()
	}
}

impl fmt::Debug for OpaqueValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Opaque({})", self.type_name)
	}
}

/// A raw attribute value
#[derive(Clone)]
pub enum FieldValue {
	Null,
	Bool(bool),
	Int(i64),
	UInt(u64),
	Float(f64),
	Str(String),
	Bytes(Vec<u8>),
	Uuid(Uuid),
	Time(NaiveTime),
	DateTime(DateTime<FixedOffset>),
	NaiveDateTime(NaiveDateTime),
	Date(NaiveDate),
	Decimal(Decimal),
	Enum(EnumMember),
	Map(BTreeMap<String, FieldValue>),
	Seq(Vec<FieldValue>),
	Entity(Arc<dyn Serializable>),
	Deferred(Accessor),
	Opaque(OpaqueValue),
}

impl FieldValue {
	/// Wrap a nested entity
	pub fn entity<E: Serializable>(entity: E) -> Self {
		FieldValue::Entity(Arc::new(entity))
	}

	/// Wrap a computed accessor invoked lazily during serialization
	pub fn deferred<F>(f: F) -> Self
	where
		F: Fn() -> Result<FieldValue, BoxError> + Send + Sync + 'static,
	{
		FieldValue::Deferred(Accessor::new(f))
	}

	/// Wrap a value only a custom converter can render
	pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
		FieldValue::Opaque(OpaqueValue::new(value))
	}

	pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
		FieldValue::Bytes(bytes.into())
	}

	pub fn from_enum<E: SerializableEnum>(member: &E) -> Self {
		FieldValue::Enum(EnumMember::new(
			std::any::type_name::<E>(),
			member.member_name(),
			member.member_value(),
		))
	}

	pub fn kind(&self) -> ValueKind {
		match self {
			FieldValue::Null => ValueKind::Null,
			FieldValue::Bool(_) => ValueKind::Bool,
			FieldValue::Int(_) => ValueKind::Int,
			FieldValue::UInt(_) => ValueKind::UInt,
			FieldValue::Float(_) => ValueKind::Float,
			FieldValue::Str(_) => ValueKind::Str,
			FieldValue::Bytes(_) => ValueKind::Bytes,
			FieldValue::Uuid(_) => ValueKind::Uuid,
			FieldValue::Time(_) => ValueKind::Time,
			FieldValue::DateTime(_) => ValueKind::DateTime,
			FieldValue::NaiveDateTime(_) => ValueKind::NaiveDateTime,
			FieldValue::Date(_) => ValueKind::Date,
			FieldValue::Decimal(_) => ValueKind::Decimal,
			FieldValue::Enum(_) => ValueKind::Enum,
			FieldValue::Map(_) => ValueKind::Map,
			FieldValue::Seq(_) => ValueKind::Seq,
			FieldValue::Entity(_) => ValueKind::Entity,
			FieldValue::Deferred(_) => ValueKind::Deferred,
			FieldValue::Opaque(_) => ValueKind::Opaque,
		}
	}

	/// Name of the runtime type, as reported in diagnostics
	pub fn type_name(&self) -> &'static str {
		match self {
			FieldValue::Entity(entity) => entity.entity_type_name(),
			FieldValue::Enum(member) => member.type_name(),
			FieldValue::Opaque(opaque) => opaque.type_name(),
			other => other.kind().as_str(),
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, FieldValue::Null)
	}

	/// Whether the value nests a scope of its own when serialized
	pub fn is_nested(&self) -> bool {
		matches!(
			self,
			FieldValue::Map(_) | FieldValue::Seq(_) | FieldValue::Entity(_)
		)
	}

	/// Whether serializing the value can reach an entity
	///
	/// Deferred values nested in a mapping or sequence are counted as reaching one,
	/// since only invoking them would tell.
	pub fn reaches_entity(&self) -> bool {
		match self {
			FieldValue::Entity(_) | FieldValue::Deferred(_) => true,
			FieldValue::Map(map) => map.values().any(FieldValue::reaches_entity),
			FieldValue::Seq(items) => items.iter().any(FieldValue::reaches_entity),
			_ => false,
		}
	}
}

impl fmt::Debug for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldValue::Null => f.write_str("Null"),
			FieldValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
			FieldValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
			FieldValue::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
			FieldValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
			FieldValue::Str(v) => f.debug_tuple("Str").field(v).finish(),
			FieldValue::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
			FieldValue::Uuid(v) => f.debug_tuple("Uuid").field(v).finish(),
			FieldValue::Time(v) => f.debug_tuple("Time").field(v).finish(),
			FieldValue::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
			FieldValue::NaiveDateTime(v) => f.debug_tuple("NaiveDateTime").field(v).finish(),
			FieldValue::Date(v) => f.debug_tuple("Date").field(v).finish(),
			FieldValue::Decimal(v) => f.debug_tuple("Decimal").field(v).finish(),
			FieldValue::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
			FieldValue::Map(v) => f.debug_tuple("Map").field(v).finish(),
			FieldValue::Seq(v) => f.debug_tuple("Seq").field(v).finish(),
			FieldValue::Entity(v) => write!(f, "Entity({})", v.entity_type_name()),
			FieldValue::Deferred(v) => v.fmt(f),
			FieldValue::Opaque(v) => v.fmt(f),
		}
	}
}

macro_rules! impl_from {
	($variant:ident: $($ty:ty),+) => {
		$(
			impl From<$ty> for FieldValue {
				fn from(value: $ty) -> Self {
					FieldValue::$variant(value.into())
				}
			}
		)+
	};
}

impl_from!(Bool: bool);
impl_from!(Int: i8, i16, i32, i64);
impl_from!(UInt: u8, u16, u32, u64);
impl_from!(Float: f32, f64);
impl_from!(Str: String, &str);
impl_from!(Uuid: Uuid);
impl_from!(Time: NaiveTime);
impl_from!(NaiveDateTime: NaiveDateTime);
impl_from!(Date: NaiveDate);
impl_from!(Decimal: Decimal);

impl From<&[u8]> for FieldValue {
	fn from(value: &[u8]) -> Self {
		FieldValue::Bytes(value.to_vec())
	}
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FieldValue {
	fn from(value: DateTime<Tz>) -> Self {
		FieldValue::DateTime(value.fixed_offset())
	}
}

impl From<EnumMember> for FieldValue {
	fn from(value: EnumMember) -> Self {
		FieldValue::Enum(value)
	}
}

impl From<Arc<dyn Serializable>> for FieldValue {
	fn from(value: Arc<dyn Serializable>) -> Self {
		FieldValue::Entity(value)
	}
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(FieldValue::Null, Into::into)
	}
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
	fn from(value: Vec<T>) -> Self {
		FieldValue::Seq(value.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<FieldValue>> From<BTreeMap<String, T>> for FieldValue {
	fn from(value: BTreeMap<String, T>) -> Self {
		FieldValue::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
	}
}

impl<T: Into<FieldValue>> From<HashMap<String, T>> for FieldValue {
	fn from(value: HashMap<String, T>) -> Self {
		FieldValue::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
	}
}

impl<T: Into<FieldValue>> FromIterator<T> for FieldValue {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		FieldValue::Seq(iter.into_iter().map(Into::into).collect())
	}
}
