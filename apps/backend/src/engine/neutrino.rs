//! Reference Neutrino rule engine.
//!
//! 5x5 board. Seat one starts with five pieces on row 0, seat two on row 4,
//! the neutrino sits in the centre. Every relocation slides in one of eight
//! directions and must stop only at the edge or in front of another token.
//!
//! Packed layout (before the XOR with the initial position):
//! - bits 0..50: 25 cells, two bits each, row-major (`y * 5 + x`)
//! - bits 50..53: status code (four turn sub-phases, then the four win kinds)
//!
//! XOR-ing with the initial layout makes `PackedState::default()` the
//! starting position, which is what freshly created sessions store.

use super::{GameEngine, IllegalMove};
use crate::domain::{
    Outcome, PackedState, PlayerSlot, Relocation, Square, SubPhase, Turn, TurnPhase,
    WinningCondition,
};

pub const BOARD_SIZE: u8 = 5;

const CELL_BITS: u32 = 2;
const STATUS_SHIFT: u32 = 50;
const STATUS_MASK: u64 = 0b111;
const CELL_MASK: u64 = 0b11;

const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Piece(PlayerSlot),
    Neutrino,
}

impl Cell {
    fn code(self) -> u64 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(PlayerSlot::One) => 1,
            Cell::Piece(PlayerSlot::Two) => 2,
            Cell::Neutrino => 3,
        }
    }

    fn from_code(code: u64) -> Self {
        match code & CELL_MASK {
            1 => Cell::Piece(PlayerSlot::One),
            2 => Cell::Piece(PlayerSlot::Two),
            3 => Cell::Neutrino,
            _ => Cell::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Status {
    Turn(Turn),
    Won(PlayerSlot, WinningCondition),
}

impl Status {
    fn code(self) -> u64 {
        match self {
            Status::Turn(Turn { owner: PlayerSlot::One, step: SubPhase::Neutrino }) => 0,
            Status::Turn(Turn { owner: PlayerSlot::One, step: SubPhase::Piece }) => 1,
            Status::Turn(Turn { owner: PlayerSlot::Two, step: SubPhase::Neutrino }) => 2,
            Status::Turn(Turn { owner: PlayerSlot::Two, step: SubPhase::Piece }) => 3,
            Status::Won(PlayerSlot::One, WinningCondition::Trap) => 5,
            Status::Won(PlayerSlot::One, _) => 4,
            Status::Won(PlayerSlot::Two, WinningCondition::Trap) => 7,
            Status::Won(PlayerSlot::Two, _) => 6,
        }
    }

    fn from_code(code: u64) -> Self {
        match code & STATUS_MASK {
            0 => Status::Turn(Turn::new(PlayerSlot::One, SubPhase::Neutrino)),
            1 => Status::Turn(Turn::new(PlayerSlot::One, SubPhase::Piece)),
            2 => Status::Turn(Turn::new(PlayerSlot::Two, SubPhase::Neutrino)),
            3 => Status::Turn(Turn::new(PlayerSlot::Two, SubPhase::Piece)),
            4 => Status::Won(PlayerSlot::One, WinningCondition::BackLine),
            5 => Status::Won(PlayerSlot::One, WinningCondition::Trap),
            6 => Status::Won(PlayerSlot::Two, WinningCondition::BackLine),
            _ => Status::Won(PlayerSlot::Two, WinningCondition::Trap),
        }
    }
}

/// In-progress engine view of one game.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NeutrinoSession {
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    status: Status,
}

impl NeutrinoSession {
    pub fn initial() -> Self {
        let mut cells = [[Cell::Empty; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        cells[0] = [Cell::Piece(PlayerSlot::One); BOARD_SIZE as usize];
        cells[BOARD_SIZE as usize - 1] = [Cell::Piece(PlayerSlot::Two); BOARD_SIZE as usize];
        cells[2][2] = Cell::Neutrino;
        Self {
            cells,
            status: Status::Turn(Turn::new(PlayerSlot::One, SubPhase::Neutrino)),
        }
    }

    /// Position from five row strings (`y = 0` first) using `1`, `2`, `N`
    /// and `.`, with `turn` to move. `None` unless every row has five cells
    /// and exactly one neutrino is placed.
    pub fn from_rows(rows: [&str; 5], turn: Turn) -> Option<Self> {
        let mut cells = [[Cell::Empty; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        let mut neutrinos = 0;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != BOARD_SIZE as usize {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                cells[y][x] = match ch {
                    '1' => Cell::Piece(PlayerSlot::One),
                    '2' => Cell::Piece(PlayerSlot::Two),
                    'N' => {
                        neutrinos += 1;
                        Cell::Neutrino
                    }
                    '.' => Cell::Empty,
                    _ => return None,
                };
            }
        }
        (neutrinos == 1).then_some(Self {
            cells,
            status: Status::Turn(turn),
        })
    }

    pub fn cell(&self, square: Square) -> Option<Cell> {
        in_bounds(square).then(|| self.cells[square.y as usize][square.x as usize])
    }

    pub fn turn_phase(&self) -> TurnPhase {
        match self.status {
            Status::Turn(turn) => TurnPhase::Turn(turn),
            Status::Won(winner, condition) => TurnPhase::Finished(Outcome {
                winner: Some(winner),
                condition,
            }),
        }
    }

    /// Every relocation the current sub-phase owner may make.
    pub fn legal_relocations(&self) -> Vec<Relocation> {
        match self.status {
            Status::Turn(turn) => self.relocations_for(token_for(turn)),
            Status::Won(..) => Vec::new(),
        }
    }

    fn relocations_for(&self, token: Cell) -> Vec<Relocation> {
        let mut out = Vec::new();
        for from in all_squares() {
            if self.cells[from.y as usize][from.x as usize] != token {
                continue;
            }
            for dir in DIRECTIONS {
                let stop = self.slide_stop(from, dir);
                if stop != from {
                    out.push(Relocation::new(from, stop));
                }
            }
        }
        out
    }

    fn has_relocation(&self, token: Cell) -> bool {
        !self.relocations_for(token).is_empty()
    }

    fn neutrino_square(&self) -> Option<Square> {
        all_squares().find(|sq| self.cells[sq.y as usize][sq.x as usize] == Cell::Neutrino)
    }

    fn slide_stop(&self, from: Square, (dx, dy): (i8, i8)) -> Square {
        let mut at = from;
        while let Some(next) = step(at, dx, dy) {
            if self.cells[next.y as usize][next.x as usize] != Cell::Empty {
                break;
            }
            at = next;
        }
        at
    }

    fn raw(&self) -> u64 {
        let mut raw = 0u64;
        for (index, square) in all_squares().enumerate() {
            let cell = self.cells[square.y as usize][square.x as usize];
            raw |= cell.code() << (index as u32 * CELL_BITS);
        }
        raw | (self.status.code() << STATUS_SHIFT)
    }

    fn from_raw(raw: u64) -> Self {
        let mut cells = [[Cell::Empty; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for (index, square) in all_squares().enumerate() {
            cells[square.y as usize][square.x as usize] =
                Cell::from_code(raw >> (index as u32 * CELL_BITS));
        }
        Self {
            cells,
            status: Status::from_code(raw >> STATUS_SHIFT),
        }
    }

    fn relocate(mut self, relocation: Relocation) -> Result<Self, IllegalMove> {
        let turn = match self.status {
            Status::Turn(turn) => turn,
            Status::Won(..) => return Err(IllegalMove::GameOver),
        };
        let Relocation { from, to } = relocation;
        for square in [from, to] {
            if !in_bounds(square) {
                return Err(IllegalMove::OutOfBounds(square));
            }
        }

        let token = token_for(turn);
        if self.cells[from.y as usize][from.x as usize] != token {
            return Err(IllegalMove::WrongToken {
                square: from,
                expected: turn.step,
            });
        }

        let dir = direction(from, to).ok_or(IllegalMove::NotStraight)?;
        let stop = self.slide_stop(from, dir);
        if stop != to {
            return Err(IllegalMove::MustSlideFully { stop });
        }

        self.cells[from.y as usize][from.x as usize] = Cell::Empty;
        self.cells[to.y as usize][to.x as usize] = token;
        self.status = self.status_after(turn);
        Ok(self)
    }

    fn status_after(&self, turn: Turn) -> Status {
        match turn.step {
            SubPhase::Neutrino => {
                if let Some(sq) = self.neutrino_square() {
                    if sq.y == 0 {
                        return Status::Won(PlayerSlot::One, WinningCondition::BackLine);
                    }
                    if sq.y == BOARD_SIZE - 1 {
                        return Status::Won(PlayerSlot::Two, WinningCondition::BackLine);
                    }
                }
                if !self.has_relocation(Cell::Piece(turn.owner)) {
                    return Status::Won(turn.owner.opponent(), WinningCondition::Trap);
                }
                Status::Turn(turn.next())
            }
            SubPhase::Piece => {
                if !self.has_relocation(Cell::Neutrino) {
                    return Status::Won(turn.owner, WinningCondition::Trap);
                }
                Status::Turn(turn.next())
            }
        }
    }
}

fn token_for(turn: Turn) -> Cell {
    match turn.step {
        SubPhase::Neutrino => Cell::Neutrino,
        SubPhase::Piece => Cell::Piece(turn.owner),
    }
}

fn in_bounds(square: Square) -> bool {
    square.x < BOARD_SIZE && square.y < BOARD_SIZE
}

fn all_squares() -> impl Iterator<Item = Square> {
    (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Square::new(x, y)))
}

fn step(at: Square, dx: i8, dy: i8) -> Option<Square> {
    let x = at.x as i8 + dx;
    let y = at.y as i8 + dy;
    let next = Square::new(u8::try_from(x).ok()?, u8::try_from(y).ok()?);
    in_bounds(next).then_some(next)
}

fn direction(from: Square, to: Square) -> Option<(i8, i8)> {
    let dx = to.x as i16 - from.x as i16;
    let dy = to.y as i16 - from.y as i16;
    if (dx == 0 && dy == 0) || (dx != 0 && dy != 0 && dx.abs() != dy.abs()) {
        return None;
    }
    Some((dx.signum() as i8, dy.signum() as i8))
}

/// Stateless engine over `NeutrinoSession`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutrinoEngine;

impl NeutrinoEngine {
    pub fn new() -> Self {
        Self
    }
}

impl GameEngine for NeutrinoEngine {
    type Session = NeutrinoSession;

    fn decode(&self, packed: PackedState) -> NeutrinoSession {
        NeutrinoSession::from_raw(packed.0 ^ NeutrinoSession::initial().raw())
    }

    fn encode(&self, session: &NeutrinoSession) -> PackedState {
        PackedState(session.raw() ^ NeutrinoSession::initial().raw())
    }

    fn current_turn_phase(&self, session: &NeutrinoSession) -> TurnPhase {
        session.turn_phase()
    }

    fn apply_move(
        &self,
        session: NeutrinoSession,
        relocation: Relocation,
    ) -> Result<NeutrinoSession, IllegalMove> {
        session.relocate(relocation)
    }
}
