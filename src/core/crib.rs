// src/core/crib.rs
use crate::core::types::ALPHABET_LEN;
use crate::error::{CipherError, Result};

/// Recovers the key that turns `plain` into `cipher`, one letter per position.
///
/// Letters are numbered from 1 (A=1 .. Z=26) here, unlike the 0-based shift
/// codec. A shift of zero comes back as 26, i.e. 'z'. Feeding the result to
/// [`encrypt`](crate::core::shift::encrypt) with `OffsetConvention::One`
/// reproduces `cipher`.
///
/// Both words must consist of ASCII letters. That is the caller's job to
/// check; other characters still produce a letter, just not a meaningful one.
pub fn solve(plain: &str, cipher: &str) -> Result<String> {
    let plain_len = plain.chars().count();
    let cipher_len = cipher.chars().count();
    if plain_len != cipher_len {
        return Err(CipherError::LengthMismatch {
            plain: plain_len,
            cipher: cipher_len,
        });
    }

    Ok(plain
        .chars()
        .zip(cipher.chars())
        .map(|(p, c)| key_letter(p, c))
        .collect())
}

fn key_letter(plain: char, cipher: char) -> char {
    let plain_num = one_based(plain);
    let cipher_num = one_based(cipher);
    let mut shift = (cipher_num - plain_num).rem_euclid(ALPHABET_LEN as i64);
    if shift == 0 {
        shift = ALPHABET_LEN as i64;
    }
    (b'a' + (shift - 1) as u8) as char
}

fn one_based(c: char) -> i64 {
    c.to_ascii_uppercase() as i64 - 'A' as i64 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cat_to_fdw_is_ccc() {
        assert_eq!(solve("cat", "fdw").unwrap(), "ccc");
    }

    #[test]
    fn identical_letters_give_z() {
        assert_eq!(solve("abc", "abc").unwrap(), "zzz");
    }

    #[test]
    fn case_does_not_matter() {
        assert_eq!(solve("HeLLo", "ifmmp").unwrap(), solve("hello", "IFMMP").unwrap());
        assert_eq!(solve("hello", "ifmmp").unwrap(), "aaaaa");
    }

    #[test]
    fn wraps_backwards() {
        // z(26) -> a(1): (1 - 26) mod 26 = 1 -> 'a'
        assert_eq!(solve("z", "a").unwrap(), "a");
        // b(2) -> a(1): (1 - 2) mod 26 = 25 -> 'y'
        assert_eq!(solve("b", "a").unwrap(), "y");
    }

    #[test]
    fn rejects_length_mismatch() {
        assert_eq!(
            solve("cat", "fdwx"),
            Err(CipherError::LengthMismatch { plain: 3, cipher: 4 })
        );
    }

    #[test]
    fn empty_words_give_empty_key() {
        assert_eq!(solve("", "").unwrap(), "");
    }

    #[test]
    fn non_letters_still_yield_lowercase_key() {
        for (plain, cipher) in [("c-t", "f1w"), ("é ", "\u{10FFFF}!")] {
            let key = solve(plain, cipher).unwrap();
            assert_eq!(key.chars().count(), plain.chars().count());
            assert!(key.chars().all(|c| c.is_ascii_lowercase()), "{key}");
        }
    }
}
