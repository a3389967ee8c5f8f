use crate::castling::CastlingRights;
use crate::r#move::Move;
use crate::square::Square;

/// State that can't be recovered from a move alone, as it stands after a ply
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub castling_rights: CastlingRights,
    pub ep_target: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// `None` only for the entry describing the starting position
    pub move_played: Option<Move>,
    pub snapshot: Snapshot,
}

/// Append only during play, pop only during undo.
/// Moves and snapshots share one sequence so they can never drift apart:
/// there is always one more entry than moves played.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new(initial: Snapshot) -> History {
        let mut entries = Vec::with_capacity(128);
        entries.push(HistoryEntry {
            move_played: None,
            snapshot: initial,
        });
        History { entries }
    }

    /// Snapshot of the current position
    pub fn current(&self) -> &Snapshot {
        // entry 0 is never popped
        &self.entries[self.entries.len() - 1].snapshot
    }

    pub fn push(&mut self, mv: Move, snapshot: Snapshot) {
        self.entries.push(HistoryEntry {
            move_played: Some(mv),
            snapshot,
        })
    }

    /// Drops the last ply, returning its move. The starting entry stays
    pub fn pop(&mut self) -> Option<Move> {
        if self.entries.len() == 1 {
            return None;
        }
        self.entries.pop().and_then(|e| e.move_played)
    }

    pub fn last_move(&self) -> Option<Move> {
        self.entries.last().and_then(|e| e.move_played)
    }

    /// Number of moves played
    pub fn plies(&self) -> usize {
        self.entries.len() - 1
    }

    /// Moves played, oldest first
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.entries.iter().filter_map(|e| e.move_played)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Color, Piece, PieceType};

    fn snapshot(halfmove_clock: u32) -> Snapshot {
        Snapshot {
            castling_rights: CastlingRights::new(),
            ep_target: None,
            halfmove_clock,
            fullmove_number: 1,
        }
    }

    #[test]
    fn keeps_moves_and_snapshots_in_lockstep() {
        let mut history = History::new(snapshot(0));
        assert_eq!(history.pop(), None);
        assert_eq!(history.entries().len(), 1);

        let knight = Piece::new(PieceType::Knight, Color::White);
        let mv = Move::new("g1".parse().unwrap(), "f3".parse().unwrap(), knight, None);
        history.push(mv, snapshot(1));
        assert_eq!(history.plies(), 1);
        assert_eq!(history.current().halfmove_clock, 1);
        assert_eq!(history.last_move(), Some(mv));

        assert_eq!(history.pop(), Some(mv));
        assert_eq!(history.current(), &snapshot(0));
        assert_eq!(history.moves().count(), 0);
        assert_eq!(history.pop(), None);
        assert_eq!(history.entries().len(), 1);
    }
}
