//! Unique identifiers in canonical hyphenated form

use uuid::Uuid;

pub fn encode(id: &Uuid) -> String {
	id.as_hyphenated().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_encode_is_lowercase_hyphenated() {
		let id = Uuid::parse_str("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
		assert_eq!(encode(&id), "67e55044-10b1-426f-9247-bb680e5fe0c8");
	}
}
