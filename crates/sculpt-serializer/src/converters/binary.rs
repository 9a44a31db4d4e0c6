//! Binary data as standard base64 text

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub fn encode(bytes: &[u8]) -> String {
	STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(b"", "")]
	#[case(b"f", "Zg==")]
	#[case(b"\x00\xff", "AP8=")]
	fn test_encode(#[case] bytes: &[u8], #[case] expected: &str) {
		assert_eq!(encode(bytes), expected);
	}
}
