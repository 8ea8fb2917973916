use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::disc::Disc;
use super::error::BoardError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// A run of four cells, as `(row, col)` pairs.
pub type Window = [(usize, usize); 4];

/// Every horizontal, vertical and diagonal run of four cells on the grid (69 in total).
pub static WINDOWS: Lazy<Vec<Window>> = Lazy::new(|| {
    let directions: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
    let mut windows = Vec::new();

    for row in 0..ROWS as isize {
        for col in 0..COLS as isize {
            for &(dr, dc) in directions.iter() {
                let end_row = row + 3 * dr;
                let end_col = col + 3 * dc;
                if end_row < 0 || end_row >= ROWS as isize || end_col < 0 || end_col >= COLS as isize
                {
                    continue;
                }
                let mut window = [(0, 0); 4];
                for (i, cell) in window.iter_mut().enumerate() {
                    let i = i as isize;
                    *cell = ((row + i * dr) as usize, (col + i * dc) as usize);
                }
                windows.push(window);
            }
        }
    }

    windows
});

static GRID_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[.XOxo]{7}$").unwrap());
static TURN_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[XOxo]$").unwrap());

/// A connect-four grid. Row 0 is the bottom row; discs stack upwards from it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    cells: [[Option<Disc>; COLS]; ROWS],
    heights: [u8; COLS],
    turn: Disc,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
            heights: [0; COLS],
            turn: Disc::Red,
        }
    }
}

impl Board {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn turn(&self) -> Disc {
        self.turn
    }

    pub fn toggle_turn(&mut self) -> Disc {
        self.turn = self.turn.opposite();
        self.turn
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Disc> {
        self.cells[row][col]
    }

    pub fn height(&self, col: usize) -> usize {
        self.heights[col] as usize
    }

    pub fn is_column_open(&self, col: usize) -> bool {
        col < COLS && self.height(col) < ROWS
    }

    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| !self.is_column_open(col))
    }

    pub fn disc_count(&self, disc: Disc) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| **cell == Some(disc))
            .count()
    }

    /// Places `disc` in the lowest empty cell of `col` without passing the turn.
    /// Returns the row the disc landed on.
    pub fn drop_disc(&mut self, col: usize, disc: Disc) -> Result<usize, BoardError> {
        if col >= COLS {
            return Err(BoardError::ColumnOutOfRange { column: col });
        }
        let row = self.height(col);
        if row >= ROWS {
            return Err(BoardError::ColumnFull { column: col });
        }
        self.cells[row][col] = Some(disc);
        self.heights[col] += 1;
        Ok(row)
    }

    /// Removes and returns the topmost disc of `col` without passing the turn.
    pub fn lift_disc(&mut self, col: usize) -> Result<Disc, BoardError> {
        if col >= COLS {
            return Err(BoardError::ColumnOutOfRange { column: col });
        }
        let height = self.height(col);
        if height == 0 {
            return Err(BoardError::ColumnEmpty { column: col });
        }
        let row = height - 1;
        let disc = self.cells[row][col].ok_or(BoardError::ColumnEmpty { column: col })?;
        self.cells[row][col] = None;
        self.heights[col] -= 1;
        Ok(disc)
    }

    /// Returns the side that has connected four, if any.
    pub fn winner(&self) -> Option<Disc> {
        WINDOWS.iter().find_map(|window| self.window_owner(window))
    }

    /// Returns the side owning all four cells of `window`, if any.
    pub fn window_owner(&self, window: &Window) -> Option<Disc> {
        let (first_row, first_col) = window[0];
        let disc = self.cells[first_row][first_col]?;
        window
            .iter()
            .all(|&(row, col)| self.cells[row][col] == Some(disc))
            .then(|| disc)
    }

    /// Returns true if the disc at `(row, col)` is part of a run of four.
    pub fn connects_four(&self, row: usize, col: usize) -> bool {
        let disc = match self.cells[row][col] {
            Some(disc) => disc,
            None => return false,
        };

        let directions: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        directions.iter().any(|&(dr, dc)| {
            let run = 1
                + self.run_length(row, col, dr, dc, disc)
                + self.run_length(row, col, -dr, -dc, disc);
            run >= 4
        })
    }

    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, disc: Disc) -> usize {
        let mut length = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0
            && r < ROWS as isize
            && c >= 0
            && c < COLS as isize
            && self.cells[r as usize][c as usize] == Some(disc)
        {
            length += 1;
            r += dr;
            c += dc;
        }
        length
    }

    /// The same position with every disc swapped to the other side, and the other side
    /// to move. The disc counts no longer match the side to move, so the result is only
    /// meaningful to the evaluator.
    pub fn color_flipped(&self) -> Self {
        let mut flipped = self.clone();
        for row in flipped.cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = cell.map(|disc| disc.opposite());
            }
        }
        flipped.turn = self.turn.opposite();
        flipped
    }

    /// The same position reflected left to right.
    pub fn mirrored(&self) -> Self {
        let mut mirrored = self.clone();
        for row in mirrored.cells.iter_mut() {
            row.reverse();
        }
        mirrored.heights.reverse();
        mirrored
    }

    /// Parses a grid of 6 lines of 7 characters (`.` empty, `X` red, `O` yellow), top row
    /// first. An optional trailing `X`/`O` line names the side to move; it must agree with
    /// the disc counts.
    pub fn from_grid(grid: &str) -> Result<Self, BoardError> {
        let lines: Vec<&str> = grid
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();

        let (rows, turn_line) = match lines.len() {
            ROWS => (&lines[..], None),
            n if n == ROWS + 1 => (&lines[..ROWS], Some(lines[ROWS])),
            n => {
                return Err(malformed(format!(
                    "expected {} rows of {} cells, found {} lines",
                    ROWS, COLS, n
                )))
            }
        };

        let mut board = Self::new();
        for (i, line) in rows.iter().enumerate() {
            if !GRID_ROW.is_match(line) {
                return Err(malformed(format!("invalid row `{}`", line)));
            }
            let row = ROWS - 1 - i;
            for (col, c) in line.chars().enumerate() {
                board.cells[row][col] = Disc::from_char(c);
            }
        }

        for col in 0..COLS {
            let height = (0..ROWS)
                .take_while(|&row| board.cells[row][col].is_some())
                .count();
            if (height..ROWS).any(|row| board.cells[row][col].is_some()) {
                return Err(malformed(format!("floating disc in column {}", col + 1)));
            }
            board.heights[col] = height as u8;
        }

        let red = board.disc_count(Disc::Red);
        let yellow = board.disc_count(Disc::Yellow);
        board.turn = match red.checked_sub(yellow) {
            Some(0) => Disc::Red,
            Some(1) => Disc::Yellow,
            _ => {
                return Err(malformed(format!(
                    "impossible disc counts: {} red, {} yellow",
                    red, yellow
                )))
            }
        };

        if let Some(turn_line) = turn_line {
            let declared = if TURN_LINE.is_match(turn_line) {
                turn_line.chars().next().and_then(Disc::from_char)
            } else {
                None
            };
            if declared != Some(board.turn) {
                return Err(malformed(format!(
                    "side to move `{}` does not match disc counts",
                    turn_line
                )));
            }
        }

        board.validate_outcome()?;
        Ok(board)
    }

    /// A decided grid must have been won by the side that just moved, and only one side
    /// can have connected four.
    fn validate_outcome(&self) -> Result<(), BoardError> {
        let mut winners = WINDOWS.iter().filter_map(|window| self.window_owner(window));

        match winners.next() {
            None => Ok(()),
            Some(winner) => {
                if winners.any(|other| other != winner) {
                    return Err(malformed("both sides have connected four".to_string()));
                }
                if winner == self.turn {
                    return Err(malformed(format!(
                        "{} has connected four but is also to move",
                        winner
                    )));
                }
                Ok(())
            }
        }
    }
}

impl Board {
    /// Serializes the grid in the format accepted by [`Board::from_grid`], including the
    /// side to move.
    pub fn to_grid(&self) -> String {
        let mut grid = self.grid_rows().join("\n");
        grid.push('\n');
        grid.push(self.turn.to_char());
        grid
    }

    fn grid_rows(&self) -> Vec<String> {
        (0..ROWS)
            .rev()
            .map(|row| {
                self.cells[row]
                    .iter()
                    .map(|cell| cell.map_or('.', |disc| disc.to_char()))
                    .collect()
            })
            .collect()
    }
}

fn malformed(reason: String) -> BoardError {
    BoardError::MalformedGrid { reason }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(grid: &str) -> Result<Self, Self::Err> {
        Board::from_grid(grid)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.grid_rows() {
            writeln!(f, "{}", line)?;
        }
        write!(f, "1234567")
    }
}
