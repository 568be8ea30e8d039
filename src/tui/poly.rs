// src/tui/poly.rs
//! Raw-mode screen for the polyalphabetic solver.
//!
//! Letters fill the key slot under the cursor, `_` clears it, arrows move,
//! Backspace clears and steps back, F1 asks for a crib, Ctrl+Q quits.
//! Keystrokes become the same commands the line grammar produces.

use crate::command::PolyCommand;
use crate::core::engine::{Feedback, PolySession};
use crate::core::key::CursorStep;
use crate::core::types::{Letter, PatternEvidence};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};

/// Rows reserved below the three upper panels.
const FOOTER_ROWS: u16 = 14;
const MIN_PANEL_WIDTH: usize = 30;
const WRAPPED_LINES: usize = 3;

#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    /// Run a command, then step the cursor if it succeeded.
    Command(PolyCommand, Option<CursorStep>),
    Move(CursorStep),
    PromptCrib,
    Ignore,
}

/// Takes over the terminal until the user quits.
pub fn run(session: &mut PolySession) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = event_loop(session, &mut stdout);

    execute!(stdout, Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

fn event_loop<W: Write>(session: &mut PolySession, out: &mut W) -> anyhow::Result<()> {
    let mut status = String::new();
    loop {
        let (width, height) = terminal::size()?;
        draw(out, session, &status, width, height)?;

        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(session.key().cursor(), key_event) {
            KeyAction::Command(command, step) => match session.execute(command) {
                Ok(Feedback::Quit) => return Ok(()),
                Ok(feedback) => {
                    status = feedback.to_string();
                    if let Some(step) = step {
                        session.step_cursor(step);
                    }
                }
                Err(err) => status = err.to_string(),
            },
            KeyAction::Move(step) => session.step_cursor(step),
            KeyAction::PromptCrib => {
                let command = prompt_crib(out, height)?;
                status = match session.execute(command) {
                    Ok(feedback) => feedback.to_string(),
                    Err(err) => err.to_string(),
                };
            }
            KeyAction::Ignore => {}
        }
    }
}

fn handle_key(cursor: usize, event: KeyEvent) -> KeyAction {
    let edit = |letter: Option<Letter>, step: CursorStep| {
        KeyAction::Command(PolyCommand::EditKeySlot { index: cursor, letter }, Some(step))
    };
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => KeyAction::Command(PolyCommand::Quit, None),
        _ if ctrl => KeyAction::Ignore,
        KeyCode::F(1) => KeyAction::PromptCrib,
        KeyCode::Right => KeyAction::Move(CursorStep::Right),
        KeyCode::Left => KeyAction::Move(CursorStep::Left),
        KeyCode::Backspace => edit(None, CursorStep::Left),
        KeyCode::Char('_') => edit(None, CursorStep::Right),
        KeyCode::Char(c) => match Letter::from_char(c) {
            Some(letter) => edit(Some(letter), CursorStep::Right),
            None => KeyAction::Ignore,
        },
        _ => KeyAction::Ignore,
    }
}

/// Reads the two crib words in cooked mode.
fn prompt_crib<W: Write>(out: &mut W, height: u16) -> anyhow::Result<PolyCommand> {
    disable_raw_mode()?;
    execute!(out, Show)?;
    let plain = read_word(out, height.saturating_sub(2), "Enter guessed plaintext word: ")?;
    let cipher = read_word(out, height.saturating_sub(1), "Enter encrypted word: ")?;
    execute!(out, Hide)?;
    enable_raw_mode()?;

    Ok(PolyCommand::SolveCrib { plain, cipher })
}

fn read_word<W: Write>(out: &mut W, row: u16, prompt: &str) -> io::Result<String> {
    queue!(out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
    queue!(out, PrintStyledContent(prompt.green()))?;
    out.flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn draw<W: Write>(
    out: &mut W,
    session: &PolySession,
    status: &str,
    width: u16,
    height: u16,
) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    if height <= FOOTER_ROWS {
        queue!(
            out,
            MoveTo(0, 0),
            Print("Terminal window too small. Please resize and try again.")
        )?;
        return out.flush();
    }

    let max_lines = (height - FOOTER_ROWS) as usize;
    let panel_width = (session.key_length() + 4).max(MIN_PANEL_WIDTH) as u16;

    queue!(out, MoveTo(0, 0), PrintStyledContent("Ciphertext (truncated):".cyan().bold()))?;
    for (row, block) in session.ciphertext_blocks().iter().take(max_lines).enumerate() {
        queue!(out, MoveTo(0, row as u16 + 1), PrintStyledContent(block.as_str().cyan()))?;
    }

    queue!(
        out,
        MoveTo(panel_width, 0),
        PrintStyledContent("Decrypted Text (truncated):".yellow().bold())
    )?;
    for (row, block) in session.decryption_blocks().iter().take(max_lines).enumerate() {
        queue!(
            out,
            MoveTo(panel_width, row as u16 + 1),
            PrintStyledContent(block.as_str().yellow())
        )?;
    }

    queue!(
        out,
        MoveTo(panel_width * 2, 0),
        PrintStyledContent("Common Patterns:".magenta().bold())
    )?;
    for (row, line) in pattern_lines(session.current_patterns(), max_lines.saturating_sub(1))
        .iter()
        .enumerate()
    {
        queue!(
            out,
            MoveTo(panel_width * 2, row as u16 + 1),
            PrintStyledContent(line.as_str().magenta())
        )?;
    }

    queue!(
        out,
        MoveTo(0, height - 10),
        PrintStyledContent("Full Decrypted Message (with separators):".green().bold())
    )?;
    let wrap_width = (width as usize).saturating_sub(1).max(1);
    for (i, line) in wrap(&session.separated_decryption(), wrap_width)
        .iter()
        .take(WRAPPED_LINES)
        .enumerate()
    {
        queue!(out, MoveTo(0, height - 9 + i as u16), PrintStyledContent(line.as_str().green()))?;
    }

    queue!(
        out,
        MoveTo(0, height - 6),
        Print("Press Ctrl + Q to quit, F1 to guess a key for two words"),
        MoveTo(0, height - 4),
        Print("Enter key shifts (letters for shifts, _ for no shift):"),
        MoveTo(0, height - 3),
        PrintStyledContent(session.key().display_with_cursor().yellow().bold()),
        MoveTo(0, height - 2),
        PrintStyledContent(status.green())
    )?;
    out.flush()
}

/// Header and repeat lines for the patterns panel, at most `max` lines.
fn pattern_lines(evidence: &[PatternEvidence], max: usize) -> Vec<String> {
    evidence
        .iter()
        .flat_map(|group| {
            let header = format!(
                "{}-letter patterns (position {}):",
                group.length,
                group.position + 1
            );
            std::iter::once(header).chain(
                group
                    .repeats
                    .iter()
                    .map(|repeat| format!("  {}: {}", repeat.pattern, repeat.count)),
            )
        })
        .take(max)
        .collect()
}

/// Hard-wraps `text` into lines of at most `width` characters.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolyConfig;
    use crate::core::types::PatternCount;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    /// Applies keystrokes the way the event loop does.
    fn type_keys(session: &mut PolySession, codes: &[KeyCode]) {
        for &code in codes {
            match handle_key(session.key().cursor(), press(code)) {
                KeyAction::Command(command, step) => {
                    if session.execute(command).is_ok() {
                        if let Some(step) = step {
                            session.step_cursor(step);
                        }
                    }
                }
                KeyAction::Move(step) => session.step_cursor(step),
                KeyAction::PromptCrib | KeyAction::Ignore => {}
            }
        }
    }

    #[test]
    fn letters_become_slot_edits_at_the_cursor() {
        assert_eq!(
            handle_key(2, press(KeyCode::Char('K'))),
            KeyAction::Command(
                PolyCommand::EditKeySlot { index: 2, letter: Some(letter('k')) },
                Some(CursorStep::Right)
            )
        );
        assert_eq!(
            handle_key(0, press(KeyCode::Backspace)),
            KeyAction::Command(
                PolyCommand::EditKeySlot { index: 0, letter: None },
                Some(CursorStep::Left)
            )
        );
        assert_eq!(handle_key(0, press(KeyCode::Char('7'))), KeyAction::Ignore);
    }

    #[test]
    fn keystrokes_edit_the_session_key() {
        let mut session = PolySession::new("abc", PolyConfig::new(3, 0).unwrap());
        type_keys(
            &mut session,
            &[KeyCode::Char('K'), KeyCode::Char('e'), KeyCode::Char('7')],
        );
        assert_eq!(session.key().to_string(), "ke_");
        assert_eq!(session.key().cursor(), 2);

        type_keys(&mut session, &[KeyCode::Left, KeyCode::Backspace]);
        assert_eq!(session.key().to_string(), "k__");
        assert_eq!(session.key().cursor(), 0);

        type_keys(&mut session, &[KeyCode::Char('_')]);
        assert_eq!(session.key().to_string(), "___");
        assert_eq!(session.key().cursor(), 1);
    }

    #[test]
    fn control_keys_do_not_type() {
        assert_eq!(handle_key(0, ctrl('q')), KeyAction::Command(PolyCommand::Quit, None));
        assert_eq!(handle_key(0, ctrl('c')), KeyAction::Command(PolyCommand::Quit, None));
        assert_eq!(handle_key(0, ctrl('a')), KeyAction::Ignore);
        assert_eq!(handle_key(0, press(KeyCode::F(1))), KeyAction::PromptCrib);
    }

    #[test]
    fn pattern_lines_are_capped() {
        let evidence = vec![PatternEvidence {
            length: 3,
            position: 0,
            repeats: vec![
                PatternCount { pattern: "ABC".into(), count: 2 },
                PatternCount { pattern: "XYZ".into(), count: 2 },
            ],
        }];
        assert_eq!(
            pattern_lines(&evidence, 10),
            vec!["3-letter patterns (position 1):", "  ABC: 2", "  XYZ: 2"]
        );
        assert_eq!(pattern_lines(&evidence, 2).len(), 2);
    }

    #[test]
    fn wrap_splits_on_width() {
        assert_eq!(wrap("abcdefg", 3), vec!["abc", "def", "g"]);
    }
}
