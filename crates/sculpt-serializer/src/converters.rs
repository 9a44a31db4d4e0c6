//! Converter chain
//!
//! Scalars are rendered by the first converter that accepts them. Caller-supplied
//! converters come first: a per-attribute [`AttributeConverter`], then the
//! [`TypeConverter`]s in registration order. The built-in converters follow in a
//! fixed order (see [`convert_builtin`]); nested values are handled by the
//! serializer itself.

pub mod binary;
pub mod decimal;
pub mod enumeration;
pub mod identifier;
pub mod temporal;

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{BoxError, Result, SerializeError};
use crate::options::Options;
use crate::value::{FieldValue, ValueKind};

type ConvertFn = dyn Fn(&FieldValue) -> std::result::Result<Value, BoxError> + Send + Sync;

/// Which values a [`TypeConverter`] accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMatcher {
	/// Every value of a built-in kind
	Kind(ValueKind),
	/// [`FieldValue::Opaque`] payloads of one Rust type
	Type(TypeId),
}

impl TypeMatcher {
	pub fn matches(&self, value: &FieldValue) -> bool {
		match (self, value) {
			(TypeMatcher::Kind(kind), value) => value.kind() == *kind,
			(TypeMatcher::Type(type_id), FieldValue::Opaque(opaque)) => opaque.type_id() == *type_id,
			(TypeMatcher::Type(_), _) => false,
		}
	}
}

/// A custom converter for one kind or one Rust type
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use sculpt_serializer::{FieldValue, TypeConverter, ValueKind};
/// use serde_json::json;
///
/// let seconds = TypeConverter::for_type::<Duration, _>(|d| Ok(json!(d.as_secs())));
/// assert_eq!(seconds.convert(&FieldValue::opaque(Duration::from_secs(90))).unwrap(), json!(90));
///
/// let yes_no = TypeConverter::for_kind(ValueKind::Bool, |v| {
///     Ok(json!(if matches!(v, FieldValue::Bool(true)) { "yes" } else { "no" }))
/// });
/// assert!(yes_no.matches(&FieldValue::Bool(false)));
/// ```
#[derive(Clone)]
pub struct TypeConverter {
	matcher: TypeMatcher,
	type_name: &'static str,
	convert: Arc<ConvertFn>,
}

impl TypeConverter {
	/// Converter for every value of a built-in kind, nested kinds included
	pub fn for_kind<F>(kind: ValueKind, f: F) -> Self
	where
		F: Fn(&FieldValue) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
	{
		Self {
			matcher: TypeMatcher::Kind(kind),
			type_name: kind.as_str(),
			convert: Arc::new(f),
		}
	}

	/// Converter for opaque values carrying a `T`
	pub fn for_type<T, F>(f: F) -> Self
	where
		T: Any,
		F: Fn(&T) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
	{
		let type_name = std::any::type_name::<T>();
		Self {
			matcher: TypeMatcher::Type(TypeId::of::<T>()),
			type_name,
			convert: Arc::new(move |value| match value {
				FieldValue::Opaque(opaque) => match opaque.downcast_ref::<T>() {
					Some(payload) => f(payload),
					None => Err(format!("expected a value of type '{type_name}'").into()),
				},
				other => Err(format!(
					"expected a value of type '{type_name}', got '{}'",
					other.type_name()
				)
				.into()),
			}),
		}
	}

	pub fn matcher(&self) -> TypeMatcher {
		self.matcher
	}

	pub fn matches(&self, value: &FieldValue) -> bool {
		self.matcher.matches(value)
	}

	pub fn convert(&self, value: &FieldValue) -> std::result::Result<Value, BoxError> {
		(self.convert)(value)
	}
}

impl fmt::Debug for TypeConverter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeConverter({})", self.type_name)
	}
}

/// A converter bound to an attribute name, bypassing the rest of the chain
#[derive(Clone)]
pub struct AttributeConverter(Arc<ConvertFn>);

impl AttributeConverter {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&FieldValue) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn convert(&self, value: &FieldValue) -> std::result::Result<Value, BoxError> {
		(self.0)(value)
	}
}

impl fmt::Debug for AttributeConverter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("AttributeConverter(..)")
	}
}

/// Render a scalar with the built-in converters
///
/// Order: pass-through kinds, bytes, uuid, time, date-time, date, decimal, enum.
/// Time is checked before date-time and date-time before date. Returns `None` for
/// nested and opaque values. Non-finite floats have no JSON form and are
/// unserializable.
pub fn convert_builtin(value: &FieldValue, options: &Options) -> Option<Result<Value>> {
	let formats = options.formats_ref();
	let converted = match value {
		FieldValue::Null => Ok(Value::Null),
		FieldValue::Bool(v) => Ok(Value::Bool(*v)),
		FieldValue::Int(v) => Ok(Value::from(*v)),
		FieldValue::UInt(v) => Ok(Value::from(*v)),
		FieldValue::Float(v) => serde_json::Number::from_f64(*v)
			.map(Value::Number)
			.ok_or_else(|| SerializeError::unserializable("f64 (non-finite)")),
		FieldValue::Str(v) => Ok(Value::String(v.clone())),
		FieldValue::Bytes(v) => Ok(Value::String(binary::encode(v))),
		FieldValue::Uuid(v) => Ok(Value::String(identifier::encode(v))),
		FieldValue::Time(v) => temporal::format_time(v, formats.time_format()).map(Value::String),
		FieldValue::DateTime(v) => {
			temporal::format_datetime(v, formats.datetime_format(), options.time_zone_ref())
				.map(Value::String)
		}
		FieldValue::NaiveDateTime(v) => temporal::format_naive_datetime(
			v,
			formats.datetime_format(),
			options.time_zone_ref(),
		)
		.map(Value::String),
		FieldValue::Date(v) => temporal::format_date(v, formats.date_format()).map(Value::String),
		FieldValue::Decimal(v) => decimal::format(v, formats.decimal_format()).map(Value::String),
		FieldValue::Enum(member) => return enumeration::convert(member, options),
		FieldValue::Map(_)
		| FieldValue::Seq(_)
		| FieldValue::Entity(_)
		| FieldValue::Deferred(_)
		| FieldValue::Opaque(_) => return None,
	};
	Some(converted)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
	use chrono_tz::Tz;
	use rstest::rstest;
	use rust_decimal::Decimal;
	use serde_json::json;
	use std::str::FromStr;

	fn builtin(value: FieldValue, options: &Options) -> Value {
		convert_builtin(&value, options).unwrap().unwrap()
	}

	#[rstest]
	#[case(FieldValue::Null, json!(null))]
	#[case(FieldValue::from(true), json!(true))]
	#[case(FieldValue::from(-7), json!(-7))]
	#[case(FieldValue::from(u64::MAX), json!(u64::MAX))]
	#[case(FieldValue::from(2.5), json!(2.5))]
	#[case(FieldValue::from("text"), json!("text"))]
	#[case(FieldValue::bytes(b"hello".to_vec()), json!("aGVsbG8="))]
	#[case(FieldValue::from(NaiveTime::from_hms_opt(9, 5, 0).unwrap()), json!("09:05:00"))]
	#[case(FieldValue::from(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()), json!("2024-02-29"))]
	#[case(FieldValue::from(Decimal::from_str("12.50").unwrap()), json!("12.50"))]
	fn test_builtin_defaults(#[case] value: FieldValue, #[case] expected: Value) {
		assert_eq!(builtin(value, &Options::new()), expected);
	}

	#[rstest]
	#[case(f64::NAN)]
	#[case(f64::INFINITY)]
	#[case(f64::NEG_INFINITY)]
	fn test_non_finite_float_is_unserializable(#[case] value: f64) {
		let err = convert_builtin(&FieldValue::from(value), &Options::new())
			.unwrap()
			.unwrap_err();
		assert!(err.is_unserializable());
		assert_eq!(err.to_string(), "Value of type 'f64 (non-finite)' is not serializable");
	}

	#[rstest]
	fn test_datetime_uses_time_zone() {
		let value = FieldValue::from(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
		let options = Options::new().time_zone(Tz::Asia__Tokyo);

		assert_eq!(builtin(value.clone(), &Options::new()), json!("2024-01-15 12:00:00"));
		assert_eq!(builtin(value, &options), json!("2024-01-15 21:00:00"));
	}

	#[rstest]
	fn test_nested_values_are_not_builtin() {
		let options = Options::new();
		assert!(convert_builtin(&FieldValue::Seq(vec![]), &options).is_none());
		assert!(convert_builtin(&FieldValue::opaque(1u8), &options).is_none());
	}

	#[rstest]
	fn test_type_matcher() {
		let by_type = TypeMatcher::Type(TypeId::of::<u8>());
		assert!(by_type.matches(&FieldValue::opaque(1u8)));
		assert!(!by_type.matches(&FieldValue::opaque(1u16)));
		assert!(!by_type.matches(&FieldValue::from(1u8)));

		let by_kind = TypeMatcher::Kind(ValueKind::UInt);
		assert!(by_kind.matches(&FieldValue::from(1u8)));
		assert!(!by_kind.matches(&FieldValue::opaque(1u8)));
	}

	#[rstest]
	fn test_typed_converter_rejects_other_values() {
		let converter = TypeConverter::for_type::<u8, _>(|v| Ok(json!(*v)));

		assert_eq!(converter.convert(&FieldValue::opaque(3u8)).unwrap(), json!(3));
		assert!(converter.convert(&FieldValue::from(3u8)).is_err());
	}
}
