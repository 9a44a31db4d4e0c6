//! Enumeration members rendered as their underlying value

use serde_json::Value;

use super::convert_builtin;
use crate::error::Result;
use crate::options::Options;
use crate::value::EnumMember;

/// Convert the underlying value of `member` with the built-in converters
pub fn convert(member: &EnumMember, options: &Options) -> Option<Result<Value>> {
	convert_builtin(member.value(), options)
}
