//! Terminal screen for the runner binary.
//!
//! Drawing is deliberately plain: the snapshot is turned into text lines by
//! [`render_lines`] (pure, so it can be tested) and flushed with crossterm.

use std::borrow::Cow;
use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor, event,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::core::GameSnapshot;
use crate::types::{Cell, PieceKind, BOARD_WIDTH, CELL_PX};

const NEXT_ROW: usize = 4;
const BANNER_ROW: usize = 10;

/// A run of text drawn in the colour of `cell` (0 draws in the default colour)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: Cow<'static, str>,
    pub cell: Cell,
}

impl Span {
    fn plain(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            text: text.into(),
            cell: 0,
        }
    }

    fn cell(cell: Cell) -> Self {
        Self {
            text: Cow::Borrowed("[]"),
            cell,
        }
    }
}

/// Styled rows of the playfield plus a status column
pub fn render_rows(snapshot: &GameSnapshot) -> Vec<Vec<Span>> {
    let grid = snapshot.composed_board();
    let mut rows = Vec::with_capacity(grid.len() + 2);

    let border = format!("+{}+", "--".repeat(BOARD_WIDTH));
    rows.push(vec![Span::plain(border.clone())]);
    for (y, row) in grid.iter().enumerate() {
        let mut spans = Vec::with_capacity(BOARD_WIDTH + 8);
        spans.push(Span::plain("|"));
        for (x, &cell) in row.iter().enumerate() {
            spans.push(if cell != 0 {
                Span::cell(cell)
            } else if has_particle(snapshot, x, y) {
                Span::plain(" *")
            } else {
                Span::plain(" .")
            });
        }
        spans.push(Span::plain("|"));
        let status = status_spans(snapshot, y);
        if !status.is_empty() {
            spans.push(Span::plain("  "));
            spans.extend(status);
        }
        rows.push(spans);
    }
    rows.push(vec![Span::plain(border)]);
    rows
}

/// Plain text of [`render_rows`]
pub fn render_lines(snapshot: &GameSnapshot) -> Vec<String> {
    render_rows(snapshot)
        .iter()
        .map(|spans| spans.iter().map(|span| span.text.as_ref()).collect::<String>())
        .collect()
}

fn has_particle(snapshot: &GameSnapshot, x: usize, y: usize) -> bool {
    snapshot.particles.iter().any(|p| {
        p.x >= 0.0
            && p.y >= 0.0
            && (p.x / CELL_PX) as usize == x
            && (p.y / CELL_PX) as usize == y
    })
}

fn banner(snapshot: &GameSnapshot) -> Option<&'static str> {
    if snapshot.playable() {
        return snapshot.is_fast_drop.then_some("fast drop");
    }
    Some(if snapshot.game_over {
        "GAME OVER - Enter to restart"
    } else if snapshot.is_paused {
        "PAUSED - p to resume"
    } else {
        "Press Enter to start"
    })
}

fn status_spans(snapshot: &GameSnapshot, row: usize) -> Vec<Span> {
    let text = match row {
        0 => format!("Score: {}", snapshot.score),
        1 => format!("Lines: {}", snapshot.lines),
        2 => format!("Level: {}", snapshot.level),
        NEXT_ROW => format!(
            "Next:  {}",
            snapshot.next.map_or("-", |next| next.kind.as_str())
        ),
        BANNER_ROW => return banner(snapshot).map(Span::plain).into_iter().collect(),
        12 => "arrows: move  up/space: rotate".to_string(),
        13 => "p: pause  q: quit".to_string(),
        _ => return next_preview(snapshot, row),
    };
    vec![Span::plain(text)]
}

/// One row of the next-piece shape, drawn under the "Next:" label
fn next_preview(snapshot: &GameSnapshot, row: usize) -> Vec<Span> {
    let Some(next) = snapshot.next else {
        return Vec::new();
    };
    let Some(cells) = row
        .checked_sub(NEXT_ROW + 1)
        .and_then(|r| next.shape.rows().get(r))
    else {
        return Vec::new();
    };
    cells
        .iter()
        .map(|&v| if v != 0 { Span::cell(v) } else { Span::plain("  ") })
        .collect()
}

fn cell_color(cell: Cell) -> Color {
    match PieceKind::from_cell(cell) {
        Some(PieceKind::I) => Color::Cyan,
        Some(PieceKind::O) => Color::Yellow,
        Some(PieceKind::T) => Color::Magenta,
        Some(PieceKind::S) => Color::Green,
        Some(PieceKind::Z) => Color::Red,
        Some(PieceKind::J) => Color::Blue,
        Some(PieceKind::L) => Color::DarkYellow,
        None => Color::Reset,
    }
}

pub struct TerminalScreen {
    stdout: io::Stdout,
    buf: Vec<u8>,
    key_release_events: bool,
}

impl TerminalScreen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
            key_release_events: false,
        }
    }

    /// Whether the terminal reports key-release events
    pub fn key_release_events(&self) -> bool {
        self.key_release_events
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.key_release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        if self.key_release_events {
            self.buf.queue(event::PushKeyboardEnhancementFlags(
                event::KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        if self.key_release_events {
            self.buf.queue(event::PopKeyboardEnhancementFlags)?;
        }
        self.buf.queue(ResetColor)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn draw(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        self.buf.clear();
        for (y, spans) in render_rows(snapshot).iter().enumerate() {
            self.buf.queue(cursor::MoveTo(0, y as u16))?;
            self.buf.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
            for span in spans {
                self.buf.queue(SetForegroundColor(cell_color(span.cell)))?;
                self.buf.queue(Print(span.text.as_ref()))?;
            }
        }
        self.buf.queue(ResetColor)?;
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{get_spawn_shape, NextSnapshot};
    use crate::types::BOARD_HEIGHT;

    #[test]
    fn test_idle_screen() {
        let snap = GameSnapshot::default();
        let lines = render_lines(&snap);

        assert_eq!(lines.len(), BOARD_HEIGHT + 2);
        assert!(lines[BANNER_ROW + 1].ends_with("Press Enter to start"));
        assert!(lines[NEXT_ROW + 1].ends_with("Next:  -"));
    }

    #[test]
    fn test_locked_cells_are_drawn() {
        let mut snap = GameSnapshot::default();
        snap.board[19][0] = 3;
        let lines = render_lines(&snap);
        assert!(lines[20].starts_with("|[] ."));
    }

    #[test]
    fn test_game_over_banner() {
        let snap = GameSnapshot {
            game_over: true,
            score: 1200,
            ..GameSnapshot::default()
        };
        let lines = render_lines(&snap);
        assert!(lines[1].ends_with("Score: 1200"));
        assert!(lines[BANNER_ROW + 1].contains("GAME OVER"));
    }

    #[test]
    fn test_running_game_has_no_banner_until_fast_drop() {
        let mut snap = GameSnapshot {
            game_started: true,
            ..GameSnapshot::default()
        };
        assert!(render_lines(&snap)[BANNER_ROW + 1].ends_with('|'));

        snap.is_fast_drop = true;
        assert!(render_lines(&snap)[BANNER_ROW + 1].ends_with("fast drop"));
    }

    #[test]
    fn test_next_piece_preview_shape() {
        let snap = GameSnapshot {
            next: Some(NextSnapshot {
                kind: PieceKind::T,
                shape: get_spawn_shape(PieceKind::T),
            }),
            ..GameSnapshot::default()
        };
        let rows = render_rows(&snap);
        // Border, ten board cells, border, gap, then the preview.
        let preview = &rows[NEXT_ROW + 2][BOARD_WIDTH + 3..];
        let cells: Vec<Cell> = preview.iter().map(|span| span.cell).collect();
        let t = PieceKind::T.cell_value();
        assert_eq!(cells, vec![0, t, 0]);
    }

    #[test]
    fn test_cells_keep_their_own_colour() {
        let mut snap = GameSnapshot::default();
        snap.board[19][0] = PieceKind::I.cell_value();
        snap.board[19][1] = PieceKind::Z.cell_value();
        let rows = render_rows(&snap);

        assert_eq!(rows[20][1], Span::cell(PieceKind::I.cell_value()));
        assert_eq!(rows[20][2], Span::cell(PieceKind::Z.cell_value()));
        assert_eq!(cell_color(rows[20][2].cell), Color::Red);
    }
}
