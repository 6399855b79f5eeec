//! Short code generation.
//!
//! Codes are seven ASCII letters drawn uniformly from `[a-zA-Z]`.

use rand::Rng;

/// Length of generated short codes.
pub const CODE_LENGTH: usize = 7;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a random short code.
///
/// Uses the thread-local CSPRNG.
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `code` has the shape of a generated code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        assert_eq!(generate_code().len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_letters_only() {
        for _ in 0..200 {
            let code = generate_code();
            assert!(is_valid_code(&code), "unexpected code {code}");
        }
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<_> = (0..1000).map(|_| generate_code()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("aBcDeFg"));
        assert!(!is_valid_code("abc"));
        assert!(!is_valid_code("abc1234"));
        assert!(!is_valid_code("abcdefgh"));
    }
}
