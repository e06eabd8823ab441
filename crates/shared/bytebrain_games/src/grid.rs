use serde::{Deserialize, Serialize};

pub const GRID_ROWS: usize = 10;
pub const GRID_COLS: usize = 15;

/// Environment byte codes used by [`GridWorld::encode_environment`].
pub const CODE_OUTSIDE: u8 = 0;
pub const CODE_WALL: u8 = 128;
pub const CODE_PLAYER_ONE: u8 = 192;
pub const CODE_PLAYER_TWO: u8 = 128;
pub const CODE_EMPTY: u8 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    fn slot(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    Player(PlayerId),
}

impl Cell {
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Player(PlayerId::One) => '1',
            Cell::Player(PlayerId::Two) => '2',
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => CODE_EMPTY,
            Cell::Wall => CODE_WALL,
            Cell::Player(PlayerId::One) => CODE_PLAYER_ONE,
            Cell::Player(PlayerId::Two) => CODE_PLAYER_TWO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
    Stay,
}

impl Direction {
    /// Keyboard mapping: `w`/`a`/`s`/`d` move, `5` stays. Case-insensitive.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            '5' => Some(Direction::Stay),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Direction::Up => 'w',
            Direction::Left => 'a',
            Direction::Down => 's',
            Direction::Right => 'd',
            Direction::Stay => '5',
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
            Direction::Stay => (0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Moved,
    Blocked,
}

impl MoveOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            MoveOutcome::Moved => "moved",
            MoveOutcome::Blocked => "blocked",
        }
    }
}

/// Two-player obstacle grid. Positions are `(row, col)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridWorld {
    cells: [[Cell; GRID_COLS]; GRID_ROWS],
    players: [(usize, usize); 2],
    current: PlayerId,
}

impl GridWorld {
    /// Fixed obstacle layout with player 1 at (2, 2) and player 2 at (8, 8).
    pub fn new() -> Self {
        let mut cells = [[Cell::Empty; GRID_COLS]; GRID_ROWS];
        for i in 0..5 {
            for (r, c) in [
                (4, i),
                (6, i + 5),
                (i + 1, 10),
                (8, i + 3),
                (i + 3, 12),
                (i, 7),
                (1, i + 1),
            ] {
                if r < GRID_ROWS && c < GRID_COLS {
                    cells[r][c] = Cell::Wall;
                }
            }
        }

        let players = [(2, 2), (8, 8)];
        cells[players[0].0][players[0].1] = Cell::Player(PlayerId::One);
        cells[players[1].0][players[1].1] = Cell::Player(PlayerId::Two);

        Self {
            cells,
            players,
            current: PlayerId::One,
        }
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn switch_player(&mut self) -> PlayerId {
        self.current = self.current.other();
        self.current
    }

    pub fn position(&self, player: PlayerId) -> (usize, usize) {
        self.players[player.slot()]
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Move the current player one step.
    ///
    /// Blocked when the target leaves the grid, is a wall, or holds any player.
    /// `Stay` targets the player's own cell and is therefore always blocked.
    pub fn try_move(&mut self, dir: Direction) -> MoveOutcome {
        let player = self.current;
        let (row, col) = self.position(player);
        let (dr, dc) = dir.delta();

        let target = match (row.checked_add_signed(dr), col.checked_add_signed(dc)) {
            (Some(r), Some(c)) if r < GRID_ROWS && c < GRID_COLS => (r, c),
            _ => return MoveOutcome::Blocked,
        };
        if self.cells[target.0][target.1] != Cell::Empty {
            return MoveOutcome::Blocked;
        }

        self.cells[row][col] = Cell::Empty;
        self.cells[target.0][target.1] = Cell::Player(player);
        self.players[player.slot()] = target;
        MoveOutcome::Moved
    }

    /// Row-major 3x3 neighbourhood of `player` as environment codes.
    pub fn encode_environment(&self, player: PlayerId) -> [u8; 9] {
        let (row, col) = self.position(player);
        let mut out = [CODE_OUTSIDE; 9];
        let mut k = 0;
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                out[k] = match (row.checked_add_signed(dr), col.checked_add_signed(dc)) {
                    (Some(r), Some(c)) => self.cell(r, c).map_or(CODE_OUTSIDE, Cell::code),
                    _ => CODE_OUTSIDE,
                };
                k += 1;
            }
        }
        out
    }

    /// One line per row, each cell glyph followed by a space.
    pub fn render(&self) -> String {
        let mut s = String::with_capacity(GRID_ROWS * (GRID_COLS * 2 + 1));
        for row in &self.cells {
            for cell in row {
                s.push(cell.glyph());
                s.push(' ');
            }
            s.push('\n');
        }
        s
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_fixed_map() {
        let w = GridWorld::new();
        let rows: Vec<String> = w.render().lines().map(|l| l.replace(' ', "")).collect();
        assert_eq!(
            rows,
            vec![
                ".......#.......",
                ".#####.#..#....",
                "..1....#..#....",
                ".......#..#.#..",
                "#####..#..#.#..",
                "..........#.#..",
                ".....#####..#..",
                "............#..",
                "...#####2......",
                "...............",
            ]
        );
    }

    #[test]
    fn players_alternate() {
        let mut w = GridWorld::new();
        assert_eq!(w.current_player(), PlayerId::One);
        assert_eq!(w.switch_player(), PlayerId::Two);
        assert_eq!(w.switch_player(), PlayerId::One);
    }

    #[test]
    fn walls_edges_and_players_block() {
        let mut w = GridWorld::new();
        // (1, 2) above player 1 is a wall.
        assert_eq!(w.try_move(Direction::Up), MoveOutcome::Blocked);
        assert_eq!(w.position(PlayerId::One), (2, 2));
        assert_eq!(w.try_move(Direction::Stay), MoveOutcome::Blocked);

        assert_eq!(w.try_move(Direction::Left), MoveOutcome::Moved);
        assert_eq!(w.try_move(Direction::Left), MoveOutcome::Moved);
        assert_eq!(w.position(PlayerId::One), (2, 0));
        assert_eq!(w.try_move(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(w.cell(2, 0), Some(Cell::Player(PlayerId::One)));
        assert_eq!(w.cell(2, 2), Some(Cell::Empty));

        w.switch_player();
        // (8, 7) left of player 2 is a wall; (9, 8) below is free.
        assert_eq!(w.try_move(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(w.try_move(Direction::Down), MoveOutcome::Moved);
        assert_eq!(w.try_move(Direction::Down), MoveOutcome::Blocked);
    }

    #[test]
    fn environment_encoding_around_player_one() {
        let w = GridWorld::new();
        // Rows 1..=3, cols 1..=3 around (2, 2).
        assert_eq!(
            w.encode_environment(PlayerId::One),
            [128, 128, 128, 64, 192, 64, 64, 64, 64]
        );
    }

    #[test]
    fn environment_encoding_pads_outside_with_zero() {
        let mut w = GridWorld::new();
        w.switch_player();
        assert_eq!(w.try_move(Direction::Down), MoveOutcome::Moved);
        // Player 2 at (9, 8): bottom row of the window is outside.
        let env = w.encode_environment(PlayerId::Two);
        assert_eq!(env[4], CODE_PLAYER_TWO);
        assert_eq!(&env[6..], &[0, 0, 0]);
        assert_eq!(&env[..3], &[CODE_WALL, CODE_EMPTY, CODE_EMPTY]);
    }

    #[test]
    fn keys_round_trip() {
        for d in [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
            Direction::Stay,
        ] {
            assert_eq!(Direction::from_key(d.key()), Some(d));
        }
        assert_eq!(Direction::from_key('W'), Some(Direction::Up));
        assert_eq!(Direction::from_key('x'), None);
    }
}
