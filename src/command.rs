// src/command.rs
//! Parsing of raw command lines into typed commands.
//!
//! Substitution mode accepts `A->B`, `A->B?`, `remove A`, `rm A` and `q`.
//! Polyalphabetic mode accepts `key <slot> <letter|_>`, `crib <plain> <cipher>`
//! and `q`; its interactive screen builds the same commands from keystrokes.

use crate::core::types::Letter;
use crate::error::{CipherError, Result};
use lazy_static::lazy_static;
use regex::Regex;

const SUBSTITUTION_USAGE: &str = "Use 'A->B', 'A->B?', 'remove A', or 'rm A'.";
const POLY_USAGE: &str = "Use 'key <slot> <letter|_>', 'crib <plain> <cipher>', or 'q'.";

/// A command for the substitution (monoalphabetic) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionCommand {
    Map {
        source: Letter,
        target: Letter,
        certain: bool,
    },
    Unmap(Letter),
    Quit,
}

/// A command for the polyalphabetic session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolyCommand {
    /// `index` is 0-based; `None` clears the slot.
    EditKeySlot {
        index: usize,
        letter: Option<Letter>,
    },
    SolveCrib {
        plain: String,
        cipher: String,
    },
    Quit,
}

lazy_static! {
    // Valid literals.
    static ref MAP_PATTERN: Regex =
        Regex::new(r"^([A-Za-z])->([A-Za-z])(\?)?$").expect("valid literal");
    static ref UNMAP_PATTERN: Regex =
        Regex::new(r"(?i)^(?:remove|rm)\s+([A-Z])$").expect("valid literal");
}

fn single_letter(captured: &str) -> Result<Letter> {
    captured
        .chars()
        .next()
        .and_then(Letter::from_char)
        .ok_or_else(|| CipherError::InvalidCommandFormat(SUBSTITUTION_USAGE.to_string()))
}

/// Parses one line of substitution-mode input.
pub fn parse_substitution_command(input: &str) -> Result<SubstitutionCommand> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Ok(SubstitutionCommand::Quit);
    }

    if let Some(caps) = UNMAP_PATTERN.captures(input) {
        return Ok(SubstitutionCommand::Unmap(single_letter(&caps[1])?));
    }

    if let Some(caps) = MAP_PATTERN.captures(input) {
        return Ok(SubstitutionCommand::Map {
            source: single_letter(&caps[1])?,
            target: single_letter(&caps[2])?,
            certain: caps.get(3).is_none(),
        });
    }

    Err(CipherError::InvalidCommandFormat(
        SUBSTITUTION_USAGE.to_string(),
    ))
}

/// Parses one line of polyalphabetic-mode input.
pub fn parse_poly_command(input: &str) -> Result<PolyCommand> {
    let invalid = || CipherError::InvalidCommandFormat(POLY_USAGE.to_string());
    let parts: Vec<&str> = input.split_whitespace().collect();

    match parts.as_slice() {
        [q] if q.eq_ignore_ascii_case("q") => Ok(PolyCommand::Quit),
        [cmd, slot, value] if cmd.eq_ignore_ascii_case("key") => {
            let slot: usize = slot.parse().map_err(|_| invalid())?;
            let index = slot.checked_sub(1).ok_or_else(invalid)?;
            let mut chars = value.chars();
            let letter = match (chars.next(), chars.next()) {
                (Some('_'), None) => None,
                (Some(c), None) => Some(Letter::from_char(c).ok_or_else(invalid)?),
                _ => return Err(invalid()),
            };
            Ok(PolyCommand::EditKeySlot { index, letter })
        }
        [cmd, plain, cipher] if cmd.eq_ignore_ascii_case("crib") => Ok(PolyCommand::SolveCrib {
            plain: plain.to_string(),
            cipher: cipher.to_string(),
        }),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    #[rstest]
    #[case("A->B", 'A', 'B', true)]
    #[case("e->t", 'E', 'T', true)]
    #[case("x->Q?", 'X', 'Q', false)]
    #[case("  k->m?  ", 'K', 'M', false)]
    fn parses_mapping(
        #[case] input: &str,
        #[case] source: char,
        #[case] target: char,
        #[case] certain: bool,
    ) {
        assert_eq!(
            parse_substitution_command(input),
            Ok(SubstitutionCommand::Map {
                source: letter(source),
                target: letter(target),
                certain,
            })
        );
    }

    #[rstest]
    #[case("remove A", 'A')]
    #[case("rm b", 'B')]
    #[case("RM   c", 'C')]
    #[case("Remove z", 'Z')]
    fn parses_removal(#[case] input: &str, #[case] source: char) {
        assert_eq!(
            parse_substitution_command(input),
            Ok(SubstitutionCommand::Unmap(letter(source)))
        );
    }

    #[rstest]
    #[case("q")]
    #[case("Q")]
    fn parses_quit(#[case] input: &str) {
        assert_eq!(
            parse_substitution_command(input),
            Ok(SubstitutionCommand::Quit)
        );
    }

    #[rstest]
    #[case("")]
    #[case("A->")]
    #[case("AB->C")]
    #[case("A -> B")]
    #[case("A->B??")]
    #[case("1->2")]
    #[case("remove")]
    #[case("rm AB")]
    #[case("delete A")]
    #[case("quit")]
    fn rejects_malformed_substitution_input(#[case] input: &str) {
        assert!(matches!(
            parse_substitution_command(input),
            Err(CipherError::InvalidCommandFormat(_))
        ));
    }

    #[test]
    fn grammar_patterns_compile() {
        lazy_static::initialize(&MAP_PATTERN);
        lazy_static::initialize(&UNMAP_PATTERN);
        assert!(MAP_PATTERN.is_match("a->b?"));
        assert!(UNMAP_PATTERN.is_match("RM x"));
    }

    #[test]
    fn parses_key_edits() {
        assert_eq!(
            parse_poly_command("key 1 K"),
            Ok(PolyCommand::EditKeySlot {
                index: 0,
                letter: Some(letter('k')),
            })
        );
        assert_eq!(
            parse_poly_command("KEY 3 _"),
            Ok(PolyCommand::EditKeySlot {
                index: 2,
                letter: None,
            })
        );
    }

    #[test]
    fn parses_crib() {
        assert_eq!(
            parse_poly_command("crib cat fdw"),
            Ok(PolyCommand::SolveCrib {
                plain: "cat".into(),
                cipher: "fdw".into(),
            })
        );
        assert_eq!(parse_poly_command(" q "), Ok(PolyCommand::Quit));
    }

    #[rstest]
    #[case("key 0 a")]
    #[case("key x a")]
    #[case("key 1 ab")]
    #[case("key 1 7")]
    #[case("crib cat")]
    #[case("A->B")]
    fn rejects_malformed_poly_input(#[case] input: &str) {
        assert!(matches!(
            parse_poly_command(input),
            Err(CipherError::InvalidCommandFormat(_))
        ));
    }
}
