// src/core/engine.rs
use crate::command::{parse_poly_command, parse_substitution_command, PolyCommand, SubstitutionCommand};
use crate::config::PolyConfig;
use crate::core::key::{CursorStep, PolyKey};
use crate::core::mapping::{MappingEntry, SetOutcome, SubstitutionMappingStore};
use crate::core::types::{FrequencyTable, Letter, OffsetConvention, PatternEvidence};
use crate::core::{crib, frequency, periodicity, shift};
use crate::error::Result;
use std::fmt;
use tracing::{debug, info, warn};

/// What a successfully executed command did, for the feedback line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Mapped {
        entry: MappingEntry,
        outcome: SetOutcome,
    },
    Unmapped(Letter),
    KeySlotEdited {
        index: usize,
        letter: Option<Letter>,
    },
    CribSolved {
        plain: String,
        cipher: String,
        key: String,
    },
    Quit,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Mapped {
                entry,
                outcome: SetOutcome::Added,
            } => write!(f, "Mapping added: {entry}"),
            Feedback::Mapped {
                entry,
                outcome: SetOutcome::Updated,
            } => write!(f, "Mapping updated: {entry}"),
            Feedback::Unmapped(letter) => write!(f, "Mapping for '{letter}' removed."),
            Feedback::KeySlotEdited {
                index,
                letter: Some(letter),
            } => write!(f, "Key slot {} set to '{}'.", index + 1, letter.lower()),
            Feedback::KeySlotEdited { index, letter: None } => {
                write!(f, "Key slot {} cleared.", index + 1)
            }
            Feedback::CribSolved { plain, cipher, key } => {
                write!(f, "Suggested key to transform '{plain}' to '{cipher}': {key}")
            }
            Feedback::Quit => write!(f, "Goodbye!"),
        }
    }
}

/// A monoalphabetic solving session: the fixed ciphertext plus the
/// substitution hypothesis built on top of it.
#[derive(Debug, Clone)]
pub struct SubstitutionSession {
    ciphertext: String,
    frequencies: FrequencyTable,
    store: SubstitutionMappingStore,
}

impl SubstitutionSession {
    pub fn new(ciphertext: impl Into<String>) -> Self {
        let ciphertext = ciphertext.into();
        let frequencies = frequency::analyze(&ciphertext);
        Self {
            ciphertext,
            frequencies,
            store: SubstitutionMappingStore::new(),
        }
    }

    /// Runs one command. On error the mapping is unchanged.
    pub fn execute(&mut self, command: SubstitutionCommand) -> Result<Feedback> {
        let result = match command {
            SubstitutionCommand::Map {
                source,
                target,
                certain,
            } => self.map(source, target, certain),
            SubstitutionCommand::Unmap(source) => self.unmap(source),
            SubstitutionCommand::Quit => Ok(Feedback::Quit),
        };
        if let Err(err) = &result {
            warn!(error = %err, "substitution command rejected");
        }
        result
    }

    /// Parses and runs one line of user input.
    pub fn execute_line(&mut self, line: &str) -> Result<Feedback> {
        match parse_substitution_command(line) {
            Ok(command) => self.execute(command),
            Err(err) => {
                warn!(error = %err, input = line.trim(), "substitution command rejected");
                Err(err)
            }
        }
    }

    pub fn map(&mut self, source: Letter, target: Letter, certain: bool) -> Result<Feedback> {
        let outcome = self.store.set(source, target, certain)?;
        let entry = MappingEntry {
            source,
            target,
            certain,
        };
        debug!(%entry, ?outcome, "mapping stored");
        Ok(Feedback::Mapped { entry, outcome })
    }

    pub fn unmap(&mut self, source: Letter) -> Result<Feedback> {
        let removed = self.store.remove(source)?;
        debug!(entry = %removed, "mapping removed");
        Ok(Feedback::Unmapped(source))
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    pub fn store(&self) -> &SubstitutionMappingStore {
        &self.store
    }

    pub fn current_mapping(&self) -> Vec<MappingEntry> {
        self.store.entries()
    }

    pub fn current_decryption(&self) -> String {
        self.store.apply(&self.ciphertext)
    }

    /// Statistics of the ciphertext, not of the working decryption.
    pub fn current_frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }
}

/// A polyalphabetic solving session: the ciphertext, the key being
/// assembled and the offset convention chosen at start-up.
#[derive(Debug, Clone)]
pub struct PolySession {
    ciphertext: String,
    key: PolyKey,
    offset: OffsetConvention,
    patterns: Vec<PatternEvidence>,
}

impl PolySession {
    pub fn new(ciphertext: impl Into<String>, config: PolyConfig) -> Self {
        let ciphertext = ciphertext.into();
        let patterns = periodicity::find_patterns(&ciphertext, config.key_length);
        debug!(
            key_length = config.key_length.get(),
            groups = patterns.len(),
            "periodicity report ready"
        );
        Self {
            ciphertext,
            key: PolyKey::new(config.key_length),
            offset: config.offset,
            patterns,
        }
    }

    /// Runs one command. On error the key is unchanged.
    pub fn execute(&mut self, command: PolyCommand) -> Result<Feedback> {
        let result = match command {
            PolyCommand::EditKeySlot { index, letter } => self.edit_key_slot(index, letter),
            PolyCommand::SolveCrib { plain, cipher } => self.solve_crib(&plain, &cipher),
            PolyCommand::Quit => Ok(Feedback::Quit),
        };
        if let Err(err) = &result {
            warn!(error = %err, "poly command rejected");
        }
        result
    }

    /// Parses and runs one line of user input.
    pub fn execute_line(&mut self, line: &str) -> Result<Feedback> {
        match parse_poly_command(line) {
            Ok(command) => self.execute(command),
            Err(err) => {
                warn!(error = %err, input = line.trim(), "poly command rejected");
                Err(err)
            }
        }
    }

    pub fn edit_key_slot(&mut self, index: usize, letter: Option<Letter>) -> Result<Feedback> {
        self.key.set_slot(index, letter)?;
        debug!(index, key = %self.key, "key slot edited");
        Ok(Feedback::KeySlotEdited { index, letter })
    }

    /// Derives a key from a crib. Does not touch the session key.
    pub fn solve_crib(&self, plain: &str, cipher: &str) -> Result<Feedback> {
        let key = crib::solve(plain, cipher)?;
        info!(plain, cipher, %key, "crib solved");
        Ok(Feedback::CribSolved {
            plain: plain.to_string(),
            cipher: cipher.to_string(),
            key,
        })
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    pub fn key(&self) -> &PolyKey {
        &self.key
    }

    /// Moves the key cursor. The slots themselves only change through
    /// [`execute`](Self::execute).
    pub fn step_cursor(&mut self, step: CursorStep) {
        self.key.step_cursor(step);
        debug!(cursor = self.key.cursor(), "key cursor moved");
    }

    pub fn offset(&self) -> OffsetConvention {
        self.offset
    }

    pub fn key_length(&self) -> usize {
        self.key.len()
    }

    pub fn current_decryption(&self) -> String {
        shift::decrypt(&self.ciphertext, &self.key, self.offset)
    }

    /// The ciphertext never changes, so the report is computed once.
    pub fn current_patterns(&self) -> &[PatternEvidence] {
        &self.patterns
    }

    pub fn ciphertext_blocks(&self) -> Vec<String> {
        shift::blocks(&self.ciphertext, self.key.len())
    }

    pub fn decryption_blocks(&self) -> Vec<String> {
        shift::blocks(&self.current_decryption(), self.key.len())
    }

    pub fn separated_decryption(&self) -> String {
        shift::with_separators(&self.current_decryption(), self.key.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CipherError;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let value = tracing::subscriber::with_default(subscriber, f);
        (value, logs.contents())
    }

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    #[test]
    fn substitution_feedback_messages() {
        let mut session = SubstitutionSession::new("Wkh");
        let added = session.map(letter('W'), letter('T'), true).unwrap();
        assert_eq!(added.to_string(), "Mapping added: W -> T");
        let updated = session.map(letter('W'), letter('S'), false).unwrap();
        assert_eq!(updated.to_string(), "Mapping updated: W -> S?");
        assert_eq!(session.current_decryption(), "Skh");
        assert_eq!(
            session.unmap(letter('w')).unwrap().to_string(),
            "Mapping for 'W' removed."
        );
    }

    #[test]
    fn rejected_command_leaves_state() {
        let mut session = SubstitutionSession::new("abc");
        session.map(letter('A'), letter('B'), true).unwrap();
        let before = session.store().clone();
        let err = session
            .execute(SubstitutionCommand::Map {
                source: letter('C'),
                target: letter('B'),
                certain: false,
            })
            .unwrap_err();
        assert!(matches!(err, CipherError::TargetCollision { .. }));
        assert_eq!(session.store(), &before);
    }

    #[test]
    fn frequencies_track_ciphertext() {
        let mut session = SubstitutionSession::new("aab");
        session.map(letter('A'), letter('Z'), true).unwrap();
        let table = session.current_frequencies();
        assert_eq!(table.get(letter('A')).unwrap().count, 2);
        assert!(table.get(letter('Z')).is_none());
    }

    #[test]
    fn poly_session_decrypts_with_key_edits() {
        let config = PolyConfig::new(5, 0).unwrap();
        let mut session = PolySession::new("LXFOPVEFRNHR", config);
        assert_eq!(session.current_decryption(), "LXFOPVEFRNHR");
        for (i, c) in "lemon".chars().enumerate() {
            session.edit_key_slot(i, Some(letter(c))).unwrap();
        }
        assert_eq!(session.current_decryption(), "ATTACKATDAWN");
        assert_eq!(session.separated_decryption(), "ATTAC | KATDA | WN");
        assert_eq!(session.ciphertext_blocks(), vec!["LXFOP", "VEFRN", "HR"]);
    }

    #[test]
    fn poly_session_rejects_out_of_range_slot() {
        let config = PolyConfig::new(2, 0).unwrap();
        let mut session = PolySession::new("abc", config);
        assert_eq!(
            session.execute(PolyCommand::EditKeySlot {
                index: 2,
                letter: None,
            }),
            Err(CipherError::SlotOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(session.key().to_string(), "__");
    }

    #[test]
    fn crib_feedback() {
        let session = PolySession::new("fdw", PolyConfig::default());
        let feedback = session
            .clone()
            .execute(PolyCommand::SolveCrib {
                plain: "cat".into(),
                cipher: "fdw".into(),
            })
            .unwrap();
        assert_eq!(
            feedback.to_string(),
            "Suggested key to transform 'cat' to 'fdw': ccc"
        );
        assert_eq!(session.key().to_string(), "_");
    }

    #[test]
    fn malformed_line_is_logged_as_rejected() {
        let mut session = SubstitutionSession::new("abc");
        let (result, logs) = capture_logs(|| session.execute_line("A => B"));
        assert!(matches!(result, Err(CipherError::InvalidCommandFormat(_))));
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("substitution command rejected"), "{logs}");
        assert!(session.current_mapping().is_empty());
    }

    #[test]
    fn line_input_drives_substitution_session() {
        let mut session = SubstitutionSession::new("Wkh");
        assert_eq!(
            session.execute_line("w->t\n").unwrap().to_string(),
            "Mapping added: W -> T"
        );
        assert_eq!(session.execute_line("q").unwrap(), Feedback::Quit);
        assert_eq!(session.current_decryption(), "Tkh");
    }

    #[test]
    fn poly_line_input_and_cursor() {
        let mut session = PolySession::new("abc", PolyConfig::new(3, 0).unwrap());
        let (result, logs) = capture_logs(|| session.execute_line("key 0 a"));
        assert!(matches!(result, Err(CipherError::InvalidCommandFormat(_))));
        assert!(logs.contains("poly command rejected"), "{logs}");

        session.execute_line("key 2 b").unwrap();
        assert_eq!(session.key().to_string(), "_b_");
        session.step_cursor(CursorStep::Left);
        assert_eq!(session.key().cursor(), 2);
        assert_eq!(session.key().to_string(), "_b_");
    }

    #[test]
    fn huge_slot_index_is_an_error_not_a_panic() {
        let mut session = PolySession::new("abc", PolyConfig::new(2, 0).unwrap());
        assert_eq!(
            session.edit_key_slot(usize::MAX, None),
            Err(CipherError::SlotOutOfRange { index: usize::MAX, len: 2 })
        );
        assert_eq!(session.key().to_string(), "__");
    }
}
