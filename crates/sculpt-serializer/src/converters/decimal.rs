//! Arbitrary-precision decimals rendered with a numeric format string
//!
//! The format holds exactly one replacement field, `{}` or
//! `{:[[fill]align][sign][z][#][0][width][grouping][.precision][type]}`, and may be
//! surrounded by literal text (`{{` and `}}` escape braces).
//!
//! - align: `<`, `>` (default), `^`, or `=` (padding after the sign)
//! - sign: `-` (default), `+`, or a space
//! - grouping: `,` or `_` every three integer digits
//! - type: `f`/`F` fixed point (precision = fractional digits), `e`/`E` scientific,
//!   `%` percentage, `g`/`G` or none for general format (precision = significant
//!   digits, exponent notation only for very small or rounded-up values)
//!
//! Rounding is half-to-even.

use rust_decimal::Decimal;

use crate::error::{Result, SerializeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
	Left,
	Right,
	Center,
	AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
	Fixed,
	Exponent { upper: bool },
	Percent,
	General { upper: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldSpec {
	fill: char,
	align: Align,
	sign: char,
	no_negative_zero: bool,
	alternate: bool,
	zero_pad: bool,
	width: usize,
	separator: Option<char>,
	precision: Option<usize>,
	kind: Kind,
}

impl Default for FieldSpec {
	fn default() -> Self {
		Self {
			fill: ' ',
			align: Align::Right,
			sign: '-',
			no_negative_zero: false,
			alternate: false,
			zero_pad: false,
			width: 0,
			separator: None,
			precision: None,
			kind: Kind::General { upper: false },
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DecimalFormat {
	prefix: String,
	spec: FieldSpec,
	suffix: String,
}

/// A decimal as sign, coefficient digits and exponent: `coefficient * 10^exponent`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits {
	negative: bool,
	coefficient: String,
	exponent: i64,
}

pub fn format(value: &Decimal, format: &str) -> Result<String> {
	let parsed = parse(format).ok_or_else(|| SerializeError::invalid_format("decimal", format))?;

	let mut out = parsed.prefix;
	out.push_str(&render(value, &parsed.spec));
	out.push_str(&parsed.suffix);
	Ok(out)
}

fn parse(format: &str) -> Option<DecimalFormat> {
	let mut prefix = String::new();
	let mut suffix = String::new();
	let mut spec = None;
	let mut chars = format.chars().peekable();

	while let Some(c) = chars.next() {
		let target = if spec.is_some() { &mut suffix } else { &mut prefix };
		match c {
			'{' if chars.peek() == Some(&'{') => {
				chars.next();
				target.push('{');
			}
			'}' if chars.peek() == Some(&'}') => {
				chars.next();
				target.push('}');
			}
			'{' => {
				if spec.is_some() {
					return None;
				}
				let mut field = String::new();
				loop {
					match chars.next()? {
						'}' => break,
						c => field.push(c),
					}
				}
				spec = Some(parse_field(&field)?);
			}
			'}' => return None,
			c => target.push(c),
		}
	}

	Some(DecimalFormat {
		prefix,
		spec: spec?,
		suffix,
	})
}

fn parse_field(field: &str) -> Option<FieldSpec> {
	if field.is_empty() {
		return Some(FieldSpec::default());
	}
	let body: Vec<char> = field.strip_prefix(':')?.chars().collect();
	let mut spec = FieldSpec::default();
	let mut i = 0;

	let mut aligned = false;
	if let Some(align) = body.get(1).copied().and_then(align_of) {
		spec.fill = body[0];
		spec.align = align;
		aligned = true;
		i = 2;
	} else if let Some(align) = body.first().copied().and_then(align_of) {
		spec.align = align;
		aligned = true;
		i = 1;
	}

	if let Some(&sign) = body.get(i).filter(|c| matches!(c, '+' | '-' | ' ')) {
		spec.sign = sign;
		i += 1;
	}
	if body.get(i) == Some(&'z') {
		spec.no_negative_zero = true;
		i += 1;
	}
	if body.get(i) == Some(&'#') {
		spec.alternate = true;
		i += 1;
	}
	if body.get(i) == Some(&'0') {
		// Zero padding already implies a fill and an alignment
		if aligned {
			return None;
		}
		spec.zero_pad = true;
		spec.fill = '0';
		spec.align = Align::AfterSign;
		i += 1;
	}

	let (width, next) = digits_at(&body, i);
	if let Some(width) = width {
		spec.width = width;
	}
	i = next;

	if let Some(&separator) = body.get(i).filter(|c| matches!(c, ',' | '_')) {
		spec.separator = Some(separator);
		i += 1;
	}

	if body.get(i) == Some(&'.') {
		let (precision, next) = digits_at(&body, i + 1);
		spec.precision = Some(precision?);
		i = next;
	}

	if let Some(&kind) = body.get(i) {
		spec.kind = match kind {
			'f' | 'F' => Kind::Fixed,
			'e' => Kind::Exponent { upper: false },
			'E' => Kind::Exponent { upper: true },
			'%' => Kind::Percent,
			'g' => Kind::General { upper: false },
			'G' => Kind::General { upper: true },
			_ => return None,
		};
		i += 1;
	}

	// A general format cannot show zero significant digits
	if spec.precision == Some(0) && matches!(spec.kind, Kind::General { .. }) {
		spec.precision = Some(1);
	}

	(i == body.len()).then_some(spec)
}

/// Parse a run of ASCII digits starting at `start`
fn digits_at(body: &[char], start: usize) -> (Option<usize>, usize) {
	let mut end = start;
	while body.get(end).is_some_and(char::is_ascii_digit) {
		end += 1;
	}
	if end == start {
		return (None, start);
	}
	(body[start..end].iter().collect::<String>().parse().ok(), end)
}

fn align_of(c: char) -> Option<Align> {
	match c {
		'<' => Some(Align::Left),
		'>' => Some(Align::Right),
		'^' => Some(Align::Center),
		'=' => Some(Align::AfterSign),
		_ => None,
	}
}

impl Digits {
	fn from_decimal(value: &Decimal) -> Self {
		let coefficient = value.mantissa().unsigned_abs().to_string();
		Self {
			negative: value.is_sign_negative(),
			coefficient,
			exponent: -i64::from(value.scale()),
		}
	}

	fn is_zero(&self) -> bool {
		self.coefficient.bytes().all(|b| b == b'0')
	}

	/// Exponent of the most significant digit
	fn adjusted(&self) -> i64 {
		self.exponent + self.coefficient.len() as i64 - 1
	}

	/// Round (or pad) so that the last kept digit has exponent `exponent`
	fn rescale(&self, exponent: i64) -> Self {
		if self.is_zero() {
			return Self {
				negative: self.negative,
				coefficient: "0".to_string(),
				exponent,
			};
		}
		if self.exponent >= exponent {
			let mut coefficient = self.coefficient.clone();
			coefficient.extend(std::iter::repeat_n('0', (self.exponent - exponent) as usize));
			return Self {
				negative: self.negative,
				coefficient,
				exponent,
			};
		}

		let kept = self.coefficient.len() as i64 + self.exponent - exponent;
		let (digits, kept) = if kept < 0 {
			// Every digit is dropped; a single digit below the cut decides rounding
			("1".to_string(), 0usize)
		} else {
			(self.coefficient.clone(), kept as usize)
		};

		let mut coefficient = match &digits[..kept] {
			"" => "0".to_string(),
			head => head.to_string(),
		};
		if rounds_up(digits.as_bytes(), kept) {
			coefficient = increment(&coefficient);
		}
		Self {
			negative: self.negative,
			coefficient,
			exponent,
		}
	}

	/// Round to `places` significant digits
	fn round_significant(&self, places: usize) -> Self {
		if self.is_zero() {
			return self.clone();
		}
		let adjusted = self.adjusted();
		let rounded = self.rescale(adjusted + 1 - places as i64);
		if rounded.adjusted() != adjusted {
			return rounded.rescale(rounded.adjusted() + 1 - places as i64);
		}
		rounded
	}
}

/// Half-to-even decision for truncating `digits` after `kept` digits
fn rounds_up(digits: &[u8], kept: usize) -> bool {
	let Some(&first) = digits.get(kept) else {
		return false;
	};
	let rest_zero = digits[kept + 1..].iter().all(|&d| d == b'0');
	match first {
		b'6'..=b'9' => true,
		b'5' if !rest_zero => true,
		b'5' => kept > 0 && (digits[kept - 1] - b'0') % 2 == 1,
		_ => false,
	}
}

fn increment(digits: &str) -> String {
	let mut bytes = digits.as_bytes().to_vec();
	for byte in bytes.iter_mut().rev() {
		if *byte == b'9' {
			*byte = b'0';
		} else {
			*byte += 1;
			return String::from_utf8_lossy(&bytes).into_owned();
		}
	}
	let mut out = String::with_capacity(bytes.len() + 1);
	out.push('1');
	out.push_str(&String::from_utf8_lossy(&bytes));
	out
}

fn render(value: &Decimal, spec: &FieldSpec) -> String {
	let mut digits = Digits::from_decimal(value);
	if spec.kind == Kind::Percent {
		digits.exponent += 2;
	}

	if let Some(precision) = spec.precision {
		digits = match spec.kind {
			Kind::Exponent { .. } => digits.round_significant(precision + 1),
			Kind::Fixed | Kind::Percent => digits.rescale(-(precision as i64)),
			Kind::General { .. } if digits.coefficient.len() > precision => {
				digits.round_significant(precision)
			}
			Kind::General { .. } => digits,
		};
	}
	if digits.is_zero() && digits.exponent > 0 && matches!(spec.kind, Kind::Fixed | Kind::Percent) {
		digits = digits.rescale(0);
	}
	let negative = digits.negative && !(digits.is_zero() && spec.no_negative_zero);

	let left_digits = digits.exponent + digits.coefficient.len() as i64;
	let dot = match spec.kind {
		Kind::Exponent { .. } => match spec.precision {
			Some(precision) if digits.is_zero() => 1 - precision as i64,
			_ => 1,
		},
		Kind::Fixed | Kind::Percent => left_digits,
		Kind::General { .. } if digits.exponent <= 0 && left_digits > -6 => left_digits,
		Kind::General { .. } => 1,
	};

	let coefficient = digits.coefficient.as_str();
	let (int_part, frac_part) = if dot < 0 {
		("0".to_string(), format!("{}{coefficient}", "0".repeat((-dot) as usize)))
	} else if dot as usize > coefficient.len() {
		let zeros = "0".repeat(dot as usize - coefficient.len());
		(format!("{coefficient}{zeros}"), String::new())
	} else {
		let (head, tail) = coefficient.split_at(dot as usize);
		let head = if head.is_empty() { "0" } else { head };
		(head.to_string(), tail.to_string())
	};
	let exponent = left_digits - dot;

	let sign = match (negative, spec.sign) {
		(true, _) => "-",
		(false, '+') => "+",
		(false, ' ') => " ",
		_ => "",
	};

	let mut tail = String::new();
	if !frac_part.is_empty() || spec.alternate {
		tail.push('.');
		tail.push_str(&frac_part);
	}
	match spec.kind {
		Kind::Exponent { upper } => tail.push_str(&exponent_suffix(upper, exponent)),
		Kind::General { upper } if exponent != 0 => tail.push_str(&exponent_suffix(upper, exponent)),
		Kind::Percent => tail.push('%'),
		_ => {}
	}

	let min_width = if spec.zero_pad {
		spec.width.saturating_sub(tail.chars().count() + sign.len())
	} else {
		0
	};
	let int_part = group(&int_part, spec.separator, min_width);

	align(sign, &format!("{int_part}{tail}"), spec)
}

fn exponent_suffix(upper: bool, exponent: i64) -> String {
	format!("{}{exponent:+}", if upper { 'E' } else { 'e' })
}

/// Insert separators every three digits, zero padding up to `min_width`
fn group(digits: &str, separator: Option<char>, min_width: usize) -> String {
	let Some(separator) = separator else {
		let width = digits.len().max(min_width).max(1);
		return format!("{}{digits}", "0".repeat(width - digits.len()));
	};

	let mut remaining = digits;
	let mut min_width = min_width as i64;
	let mut groups = Vec::new();
	loop {
		let len = remaining.len().max(min_width.max(1) as usize).min(3);
		let take = len.min(remaining.len());
		let (head, tail) = remaining.split_at(remaining.len() - take);
		groups.push(format!("{}{tail}", "0".repeat(len - take)));
		remaining = head;
		min_width -= len as i64;
		if remaining.is_empty() && min_width <= 0 {
			break;
		}
		min_width -= 1;
	}
	groups.reverse();
	groups.join(&separator.to_string())
}

fn align(sign: &str, body: &str, spec: &FieldSpec) -> String {
	let len = sign.len() + body.chars().count();
	let pad = spec.width.saturating_sub(len);
	let fill = |n: usize| std::iter::repeat_n(spec.fill, n).collect::<String>();

	match spec.align {
		Align::Left => format!("{sign}{body}{}", fill(pad)),
		Align::Right => format!("{}{sign}{body}", fill(pad)),
		Align::Center => {
			let left = pad / 2;
			format!("{}{sign}{body}{}", fill(left), fill(pad - left))
		}
		Align::AfterSign => format!("{sign}{}{body}", fill(pad)),
	}
}
