use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::Duration;

use termion::{clear, cursor};

use super::engine::Engine;
use super::game::Game;

pub trait GameRenderer<G: Game> {
    fn render(&mut self, engine: &Engine<G>, prompt: bool) -> io::Result<()>;

    /// Queues a line shown under the next rendered position.
    fn notify(&mut self, message: String);

    fn frame_delay(&self) -> Option<Duration>;
}

/// Renders the position as text, followed by the side to move, the last move and the
/// statistics of the last engine search.
pub struct TextRenderer<W: Write> {
    out: W,
    buffer: String,
    notices: Vec<String>,
    clear_screen: bool,
    delay_between_moves: Option<Duration>,
}

impl TextRenderer<io::Stdout> {
    /// Redraws in place on the terminal.
    pub fn terminal(delay_between_moves: Option<Duration>) -> Self {
        let mut renderer = Self::new(io::stdout());
        renderer.clear_screen = true;
        renderer.delay_between_moves = delay_between_moves;
        renderer
    }
}

impl<W: Write> TextRenderer<W> {
    /// Appends every frame to `out` without clearing.
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffer: String::with_capacity(1024),
            notices: Vec::new(),
            clear_screen: false,
            delay_between_moves: None,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn clear(&mut self) {
        self.buffer.clear();
        if self.clear_screen {
            self.buffer
                .push_str(&format!("{}{}", cursor::Goto(1, 1), clear::All));
        }
    }
}

impl<G: Game, W: Write> GameRenderer<G> for TextRenderer<W> {
    fn render(&mut self, engine: &Engine<G>, prompt: bool) -> io::Result<()> {
        self.clear();

        let game = engine.game();
        let side = game.side_name(engine.side_to_move());
        let stats = engine.search_stats();

        // formatting into a String cannot fail
        let _ = writeln!(self.buffer, "{}\n", engine.position());
        if let Some(last_move) = engine.last_move() {
            let _ = writeln!(self.buffer, "Last move: {}", last_move);
        }
        let _ = writeln!(
            self.buffer,
            "* Score: {}\n* Positions searched: {} (depth: {})\n* Move took: {}",
            stats.last_score.map_or("-".to_string(), |s| s.to_string()),
            stats.positions_searched,
            stats.depth,
            stats
                .last_search_duration
                .map_or("-".to_string(), |d| format!("{:?}", d))
        );
        for notice in self.notices.drain(..) {
            let _ = writeln!(self.buffer, "{}", notice);
        }
        if prompt {
            let _ = writeln!(self.buffer, "{} to move. Enter your move:", side);
        } else {
            let _ = writeln!(self.buffer, "{} to move.", side);
        }

        self.out.write_all(self.buffer.as_bytes())?;
        self.out.flush()
    }

    fn notify(&mut self, message: String) {
        self.notices.push(message);
    }

    fn frame_delay(&self) -> Option<Duration> {
        self.delay_between_moves
    }
}
