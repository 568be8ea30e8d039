// src/tui/mono.rs
//! Line-driven screen for the substitution solver.
//!
//! Each round clears the terminal, shows the working decryption coloured by
//! certainty, the ciphertext letter statistics and the mapping list, then
//! reads one command line.

use crate::core::engine::{Feedback, SubstitutionSession};
use crate::core::mapping::MappingEntry;
use crate::core::types::{FrequencyTable, Letter};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, BufRead, Write};

const INSTRUCTIONS: &str =
    "Type 'A->B' to add/update mappings, 'remove A' or 'rm A' to remove mappings, or 'q' to quit.";
const FREQUENCY_CELL_WIDTH: usize = 15;
const COLUMN_GAP: &str = "    ";

/// Runs the screen on the real terminal until the user quits or stdin closes.
pub fn run(session: &mut SubstitutionSession) -> io::Result<()> {
    let width = terminal::size().map_or(80, |(w, _)| w as usize);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_with(session, stdin.lock(), &mut stdout, width)
}

/// The command loop over any input/output pair.
pub fn run_with<R: BufRead, W: Write>(
    session: &mut SubstitutionSession,
    mut input: R,
    out: &mut W,
    width: usize,
) -> io::Result<()> {
    let mut feedback = String::new();
    loop {
        draw(out, session, &feedback, width)?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match session.execute_line(&line) {
            Ok(Feedback::Quit) => break,
            Ok(done) => feedback = done.to_string(),
            Err(err) => feedback = err.to_string(),
        }
    }

    queue!(out, Print("\n"), PrintStyledContent(Feedback::Quit.to_string().bold()), Print("\n"))?;
    out.flush()
}

fn draw<W: Write>(
    out: &mut W,
    session: &SubstitutionSession,
    feedback: &str,
    width: usize,
) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    queue!(out, PrintStyledContent("Cipher Text:".bold()), Print("\n\n"))?;
    let store = session.store();
    let decryption = session.current_decryption();
    for (original, shown) in session.ciphertext().chars().zip(decryption.chars()) {
        let styled = match Letter::from_char(original).and_then(|letter| store.get(letter)) {
            Some(mapped) if mapped.certain => shown.green(),
            Some(_) => shown.yellow(),
            None => shown.white(),
        };
        queue!(out, PrintStyledContent(styled))?;
    }
    queue!(out, Print("\n\n"))?;

    queue!(out, PrintStyledContent("Letter Counts and Percentages:".bold()), Print("\n\n"))?;
    for line in frequency_lines(session.current_frequencies()) {
        queue!(out, Print(line), Print("\n"))?;
    }
    queue!(out, Print("\n"))?;

    queue!(out, PrintStyledContent("Current Mappings:".bold()), Print("\n\n"))?;
    let mapping = session.current_mapping();
    if mapping.is_empty() {
        queue!(out, Print("(No mappings yet)\n"))?;
    }
    for row in mapping_rows(&mapping, width) {
        for (entry, cell) in row {
            let styled = if entry.certain { cell.green() } else { cell.yellow() };
            queue!(out, PrintStyledContent(styled))?;
        }
        queue!(out, Print("\n"))?;
    }
    queue!(out, Print("\n"))?;

    queue!(out, PrintStyledContent(INSTRUCTIONS.bold()), Print("\n"))?;
    if !feedback.is_empty() {
        queue!(out, PrintStyledContent(feedback.bold()), Print("\n"))?;
    }
    queue!(out, Print("Input: "))?;
    out.flush()
}

/// Letter statistics split into two alphabetical columns.
fn frequency_lines(table: &FrequencyTable) -> Vec<String> {
    let cells: Vec<String> = table
        .iter()
        .map(|(letter, freq)| format!("{}: {} ({:.2}%)", letter, freq.count, freq.percentage))
        .collect();
    let half = (cells.len() + 1) / 2;
    let (left, right) = cells.split_at(half);

    left.iter()
        .enumerate()
        .map(|(i, first)| match right.get(i) {
            Some(second) => format!("{first:<FREQUENCY_CELL_WIDTH$}{COLUMN_GAP}{second}"),
            None => first.clone(),
        })
        .collect()
}

/// Mapping entries laid out column-major in as many padded columns as fit
/// in half of `width`.
fn mapping_rows(mapping: &[MappingEntry], width: usize) -> Vec<Vec<(MappingEntry, String)>> {
    if mapping.is_empty() {
        return Vec::new();
    }
    let cells: Vec<String> = mapping.iter().map(ToString::to_string).collect();
    let column_width = cells.iter().map(String::len).max().unwrap_or(0) + COLUMN_GAP.len();
    let columns = (width / 2 / column_width).max(1);
    let rows = (cells.len() + columns - 1) / columns;

    (0..rows)
        .map(|row| {
            (0..columns)
                .filter_map(|col| {
                    let index = col * rows + row;
                    mapping
                        .get(index)
                        .map(|entry| (*entry, format!("{:<column_width$}", cells[index])))
                })
                .collect()
        })
        .collect()
}
