//! Chain-code generation for data that arrives without chain identifiers.

use std::collections::BTreeSet;

use super::error::Error;

/// Separator between chain codes in user-supplied lists (`A.B.C`).
pub const CHAIN_SEPARATOR: char = '.';

/// Lazy stream of chain codes.
///
/// Yields the user codes in order, then the unused letters `A` to `Z`,
/// skipping anything excluded or already yielded. Once the alphabet is
/// consumed the stream ends; it never invents multi-letter codes.
#[derive(Debug, Clone)]
pub struct ChainCodes {
    user: std::vec::IntoIter<String>,
    next_letter: u8,
    used: BTreeSet<String>,
}

impl Iterator for ChainCodes {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for code in self.user.by_ref() {
            if self.used.insert(code.clone()) {
                return Some(code);
            }
        }
        while self.next_letter <= b'Z' {
            let code = (self.next_letter as char).to_string();
            self.next_letter += 1;
            if self.used.insert(code.clone()) {
                return Some(code);
            }
        }
        None
    }
}

impl ChainCodes {
    /// Like [`Iterator::next`] but reports exhaustion as an error.
    pub fn next_chain_code(&mut self) -> Result<String, Error> {
        self.next().ok_or(Error::ChainCodesExhausted)
    }
}

/// Creates a [`ChainCodes`] stream.
///
/// `user_codes` and `exclude` are `.`- or `,`-separated lists; empty items
/// are ignored.
pub fn chain_code_iter(user_codes: Option<&str>, exclude: Option<&str>) -> ChainCodes {
    let used: BTreeSet<String> = exclude.map(split_codes).unwrap_or_default().into_iter().collect();
    let user = user_codes.map(split_codes).unwrap_or_default();
    ChainCodes {
        user: user.into_iter(),
        next_letter: b'A',
        used,
    }
}

fn split_codes(codes: &str) -> Vec<String> {
    codes
        .split([CHAIN_SEPARATOR, ','])
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_codes_come_first() {
        let codes: Vec<String> = chain_code_iter(Some("X.A"), None).take(4).collect();
        assert_eq!(codes, vec!["X", "A", "B", "C"]);
    }

    #[test]
    fn excluded_codes_are_skipped_everywhere() {
        let codes: Vec<String> = chain_code_iter(Some("A.Q"), Some("A,B")).take(3).collect();
        assert_eq!(codes, vec!["Q", "C", "D"]);
    }

    #[test]
    fn alphabet_is_a_hard_cap() {
        assert_eq!(chain_code_iter(None, None).count(), 26);
    }

    #[test]
    fn fully_excluded_alphabet_yields_nothing() {
        let all: Vec<String> = (b'A'..=b'Z').map(|b| (b as char).to_string()).collect();
        let mut codes = chain_code_iter(None, Some(&all.join(",")));
        assert_eq!(codes.next(), None);
        assert!(matches!(
            codes.next_chain_code(),
            Err(Error::ChainCodesExhausted)
        ));
    }
}
