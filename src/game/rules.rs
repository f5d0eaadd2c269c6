//! The Ataxx rules engine: move table, transitions, and terminal scoring.

use std::cmp::Ordering;

use thiserror::Error;

use super::board::{Board, Player, Square, JUMP_LIMIT, SIDE};

/// Strictly nonzero score for a drawn position.
///
/// Callers use `value != 0` to detect game over, so a draw must read as a
/// tiny but nonzero value. Must stay well below any decisive score.
pub const EPS: f32 = 1e-8;

/// A single entry in the move table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    /// The distinguished no-op action at index 0.
    Pass,
    /// Move a piece from `from` to `to` (Chebyshev distance 1 or 2).
    Step { from: Square, to: Square },
}

impl Move {
    /// Chebyshev distance covered by this move; 0 for Pass.
    #[must_use]
    pub fn distance(&self) -> u8 {
        match self {
            Move::Pass => 0,
            Move::Step { from, to } => from.chebyshev(*to),
        }
    }
}

/// Errors for malformed or illegal actions. These are caller bugs and fail
/// the transition rather than being tolerated.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("action index {index} out of range for move table of {table_size} actions")]
    UnknownAction { index: usize, table_size: usize },

    #[error("no piece of the moving player on source square ({col}, {row})", col = .from.col, row = .from.row)]
    SourceNotOwned { from: Square },

    #[error("destination square ({col}, {row}) is occupied", col = .to.col, row = .to.row)]
    DestinationOccupied { to: Square },

    #[error("jump counter already at limit {JUMP_LIMIT}; the position is scored, not playable")]
    JumpLimitReached,
}

/// Pure-function rules engine for Ataxx.
///
/// Construction enumerates the full move table once: index 0 is Pass, and
/// every further index is an ordered `(source, destination)` pair within
/// Chebyshev distance 2, in a fixed deterministic order. Indices are stable
/// for the engine's lifetime and shared with the search and the estimator.
#[derive(Clone, Debug)]
pub struct AtaxxRules {
    moves: Vec<Move>,
}

impl AtaxxRules {
    /// Build the engine and its move table.
    #[must_use]
    pub fn new() -> Self {
        let mut moves = vec![Move::Pass];
        for r0 in 0..SIDE as i32 {
            for c0 in 0..SIDE as i32 {
                for dr in -2..=2i32 {
                    for dc in -2..=2i32 {
                        let c1 = c0 + dc;
                        let r1 = r0 + dr;
                        let in_range = (0..SIDE as i32).contains(&c1) && (0..SIDE as i32).contains(&r1);
                        if (c1 != c0 || r1 != r0) && in_range {
                            moves.push(Move::Step {
                                from: Square::new(c0 as u8, r0 as u8),
                                to: Square::new(c1 as u8, r1 as u8),
                            });
                        }
                    }
                }
            }
        }
        Self { moves }
    }

    /// Size of the move table (Pass plus all in-range square pairs).
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.moves.len()
    }

    /// Look up a move by action index.
    #[must_use]
    pub fn action(&self, index: usize) -> Option<Move> {
        self.moves.get(index).copied()
    }

    /// The fixed starting position: opposing pieces on the two corner
    /// diagonals, jump counter zero.
    #[must_use]
    pub fn initial(&self) -> Board {
        let end = (SIDE - 1) as u8;
        let mut board = Board::empty();
        board.set(Square::new(0, 0), Player::Blue.sign());
        board.set(Square::new(0, end), Player::Red.sign());
        board.set(Square::new(end, 0), Player::Red.sign());
        board.set(Square::new(end, end), Player::Blue.sign());
        board
    }

    /// Terminal-outcome signal relative to `player`.
    ///
    /// Returns +1 if the opponent has no pieces, -1 if `player` has none,
    /// 0 while the game is ongoing. When neither side can move or the jump
    /// counter has reached its limit, the side with more pieces scores
    /// +1/-1; an exact tie scores [`EPS`] for both players.
    #[must_use]
    pub fn value(&self, board: &Board, player: Player) -> f32 {
        let (red, blue) = board.piece_counts();
        let red_view = if red == 0 {
            -1.0
        } else if blue == 0 {
            1.0
        } else if board.jumps() >= JUMP_LIMIT
            || (!self.can_move(board, Player::Red) && !self.can_move(board, Player::Blue))
        {
            match red.cmp(&blue) {
                Ordering::Greater => 1.0,
                Ordering::Less => -1.0,
                // A draw reads the same from both sides; the epsilon only
                // distinguishes "finished" from "ongoing".
                Ordering::Equal => return EPS,
            }
        } else {
            return 0.0;
        };
        red_view * f32::from(player.sign())
    }

    /// Apply `action` for `player`, producing a new board.
    ///
    /// Pass returns an unchanged copy. A clone move (distance 1) adds a
    /// piece and resets the jump counter; a jump (distance 2) relocates the
    /// piece and increments it. Either way, every opposing piece in the
    /// destination's 8-neighborhood flips to the mover's color.
    pub fn apply(&self, board: &Board, player: Player, action: usize) -> Result<Board, RulesError> {
        let mv = self
            .action(action)
            .ok_or(RulesError::UnknownAction {
                index: action,
                table_size: self.moves.len(),
            })?;

        let (from, to) = match mv {
            Move::Pass => return Ok(*board),
            Move::Step { from, to } => (from, to),
        };

        if board.get(from) != player.sign() {
            return Err(RulesError::SourceNotOwned { from });
        }
        if board.get(to) != 0 {
            return Err(RulesError::DestinationOccupied { to });
        }
        let is_jump = mv.distance() > 1;
        if is_jump && board.jumps() >= JUMP_LIMIT {
            return Err(RulesError::JumpLimitReached);
        }

        let mut next = *board;
        next.set(to, player.sign());
        if is_jump {
            next.set(from, 0);
            next.bump_jumps();
        } else {
            next.reset_jumps();
        }
        Self::flip_adjacent(&mut next, to, player);
        Ok(next)
    }

    /// Legal-action mask for `player`, indexed by the move table.
    ///
    /// On a terminal board the mask is all false, including Pass; callers
    /// must check for terminal positions instead of expecting Pass to be
    /// available. When `player` has no piece near an empty cell, Pass is
    /// the only legal action.
    #[must_use]
    pub fn legal_actions(&self, board: &Board, player: Player) -> Vec<bool> {
        let mut mask = vec![false; self.moves.len()];
        if self.value(board, player) != 0.0 {
            return mask;
        }
        if !self.can_move(board, player) {
            mask[0] = true;
            return mask;
        }
        for (index, mv) in self.moves.iter().enumerate().skip(1) {
            if let Move::Step { from, to } = mv {
                mask[index] = board.get(*from) == player.sign() && board.get(*to) == 0;
            }
        }
        mask
    }

    /// The board as seen by `player` as mover: occupancy multiplied by the
    /// player's sign, jump counter unchanged.
    #[must_use]
    pub fn canonical(&self, board: &Board, player: Player) -> Board {
        match player {
            Player::Red => *board,
            Player::Blue => board.negated(),
        }
    }

    /// Whether `player` has any piece within jump range of an empty cell.
    fn can_move(&self, board: &Board, player: Player) -> bool {
        for row in 0..SIDE as u8 {
            for col in 0..SIDE as u8 {
                let sq = Square::new(col, row);
                if board.get(sq) == player.sign() && Self::near_empty(board, sq) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether any cell within Chebyshev distance 2 of `sq` is empty.
    ///
    /// Scans the full board, first row and column included.
    fn near_empty(board: &Board, sq: Square) -> bool {
        for dr in -2..=2i32 {
            for dc in -2..=2i32 {
                let c = sq.col as i32 + dc;
                let r = sq.row as i32 + dr;
                if (dc != 0 || dr != 0)
                    && (0..SIDE as i32).contains(&c)
                    && (0..SIDE as i32).contains(&r)
                    && board.get(Square::new(c as u8, r as u8)) == 0
                {
                    return true;
                }
            }
        }
        false
    }

    /// Flip every opposing piece in the 8-neighborhood of `to` to the
    /// mover's color. Scans the full board, first row and column included.
    fn flip_adjacent(board: &mut Board, to: Square, player: Player) {
        for dr in -1..=1i32 {
            for dc in -1..=1i32 {
                let c = to.col as i32 + dc;
                let r = to.row as i32 + dr;
                if (dc != 0 || dr != 0)
                    && (0..SIDE as i32).contains(&c)
                    && (0..SIDE as i32).contains(&r)
                {
                    let sq = Square::new(c as u8, r as u8);
                    if board.get(sq) == player.opponent().sign() {
                        board.set(sq, player.sign());
                    }
                }
            }
        }
    }
}

impl Default for AtaxxRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CELLS;

    fn rules() -> AtaxxRules {
        AtaxxRules::new()
    }

    #[test]
    fn test_move_table_size() {
        // Per-coordinate window widths for radius 2 on a 7-wide axis are
        // [3,4,5,5,5,4,3]; squaring the sum and removing the 49 self-pairs
        // gives the step count, plus one Pass.
        assert_eq!(rules().action_count(), 29 * 29 - CELLS + 1);
    }

    #[test]
    fn test_move_table_order() {
        let rules = rules();
        assert_eq!(rules.action(0), Some(Move::Pass));
        // First enumerated step from (0,0) is (dr=0, dc=1).
        assert_eq!(
            rules.action(1),
            Some(Move::Step {
                from: Square::new(0, 0),
                to: Square::new(1, 0),
            })
        );
        assert_eq!(
            rules.action(2),
            Some(Move::Step {
                from: Square::new(0, 0),
                to: Square::new(2, 0),
            })
        );
        assert_eq!(rules.action(usize::MAX), None);
    }

    #[test]
    fn test_move_distance_classifies_clones_and_jumps() {
        let rules = rules();
        assert_eq!(Move::Pass.distance(), 0);

        // Action 1 is the (0,0) -> (1,0) clone, action 2 the (0,0) -> (2,0) jump.
        assert_eq!(rules.action(1).unwrap().distance(), 1);
        assert_eq!(rules.action(2).unwrap().distance(), 2);
    }

    #[test]
    fn test_initial_position() {
        let board = rules().initial();
        assert_eq!(board.piece_counts(), (2, 2));
        assert_eq!(board.jumps(), 0);
        assert_eq!(board.get(Square::new(0, 0)), -1);
        assert_eq!(board.get(Square::new(6, 6)), -1);
        assert_eq!(board.get(Square::new(0, 6)), 1);
        assert_eq!(board.get(Square::new(6, 0)), 1);
    }

    #[test]
    fn test_initial_value_is_ongoing() {
        let rules = rules();
        let board = rules.initial();
        assert_eq!(rules.value(&board, Player::Red), 0.0);
        assert_eq!(rules.value(&board, Player::Blue), 0.0);
    }

    #[test]
    fn test_value_win_and_loss() {
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[0] = 1;
        cells[1] = 1;
        let board = Board::from_parts(cells, 0);

        assert_eq!(rules.value(&board, Player::Red), 1.0);
        assert_eq!(rules.value(&board, Player::Blue), -1.0);
    }

    #[test]
    fn test_value_counter_limit_scores_pieces() {
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[0] = 1;
        cells[1] = 1;
        cells[2] = -1;
        let board = Board::from_parts(cells, JUMP_LIMIT);

        assert_eq!(rules.value(&board, Player::Red), 1.0);
        assert_eq!(rules.value(&board, Player::Blue), -1.0);
    }

    #[test]
    fn test_value_draw_epsilon_symmetric() {
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[0] = 1;
        cells[8] = -1;
        let board = Board::from_parts(cells, JUMP_LIMIT);

        assert_eq!(rules.value(&board, Player::Red), EPS);
        assert_eq!(rules.value(&board, Player::Blue), EPS);
        assert_ne!(rules.value(&board, Player::Red), 0.0);
    }

    #[test]
    fn test_clone_move_adds_piece_and_resets_counter() {
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[Square::new(3, 3).index()] = 1;
        cells[Square::new(0, 0).index()] = -1;
        let board = Board::from_parts(cells, 5);

        let action = rules
            .moves
            .iter()
            .position(|m| {
                matches!(m, Move::Step { from, to }
                    if *from == Square::new(3, 3) && *to == Square::new(4, 3))
            })
            .unwrap();
        let next = rules.apply(&board, Player::Red, action).unwrap();

        assert_eq!(next.get(Square::new(3, 3)), 1);
        assert_eq!(next.get(Square::new(4, 3)), 1);
        assert_eq!(next.jumps(), 0);
        assert_eq!(next.occupancy(), board.occupancy() + 1);
    }

    #[test]
    fn test_jump_move_relocates_and_increments_counter() {
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[Square::new(3, 3).index()] = 1;
        cells[Square::new(0, 0).index()] = -1;
        let board = Board::from_parts(cells, 5);

        let action = rules
            .moves
            .iter()
            .position(|m| {
                matches!(m, Move::Step { from, to }
                    if *from == Square::new(3, 3) && *to == Square::new(5, 5))
            })
            .unwrap();
        let next = rules.apply(&board, Player::Red, action).unwrap();

        assert_eq!(next.get(Square::new(3, 3)), 0);
        assert_eq!(next.get(Square::new(5, 5)), 1);
        assert_eq!(next.jumps(), 6);
        assert_eq!(next.occupancy(), board.occupancy());
    }

    #[test]
    fn test_contagion_flips_neighbors() {
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[Square::new(3, 3).index()] = 1;
        cells[Square::new(4, 4).index()] = -1;
        cells[Square::new(2, 4).index()] = -1;
        cells[Square::new(6, 6).index()] = -1; // out of reach
        let board = Board::from_parts(cells, 0);

        let action = rules
            .moves
            .iter()
            .position(|m| {
                matches!(m, Move::Step { from, to }
                    if *from == Square::new(3, 3) && *to == Square::new(3, 4))
            })
            .unwrap();
        let next = rules.apply(&board, Player::Red, action).unwrap();

        assert_eq!(next.get(Square::new(4, 4)), 1);
        assert_eq!(next.get(Square::new(2, 4)), 1);
        assert_eq!(next.get(Square::new(6, 6)), -1);
    }

    #[test]
    fn test_contagion_reaches_first_row_and_column() {
        // Neighbor scans must cover column 0 and row 0 like any other
        // cells; an off-by-one here silently warps the whole game.
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[Square::new(1, 1).index()] = 1;
        cells[Square::new(0, 0).index()] = -1;
        cells[Square::new(0, 1).index()] = -1;
        cells[Square::new(1, 0).index()] = -1;
        let board = Board::from_parts(cells, 0);

        let action = rules
            .moves
            .iter()
            .position(|m| {
                matches!(m, Move::Step { from, to }
                    if *from == Square::new(1, 1) && *to == Square::new(1, 2))
            })
            .unwrap();
        let next = rules.apply(&board, Player::Red, action).unwrap();

        // Destination (1,2) is adjacent to (0,1) but not to (0,0)/(1,0).
        assert_eq!(next.get(Square::new(0, 1)), 1);
        assert_eq!(next.get(Square::new(0, 0)), -1);
        assert_eq!(next.get(Square::new(1, 0)), -1);
    }

    #[test]
    fn test_apply_pass_is_identity() {
        let rules = rules();
        let board = rules.initial();
        let next = rules.apply(&board, Player::Red, 0).unwrap();
        assert_eq!(next, board);
    }

    #[test]
    fn test_apply_rejects_bad_actions() {
        let rules = rules();
        let board = rules.initial();

        assert!(matches!(
            rules.apply(&board, Player::Red, 100_000),
            Err(RulesError::UnknownAction { .. })
        ));

        // Action 1 moves from (0,0), which Blue owns at the start.
        assert!(matches!(
            rules.apply(&board, Player::Red, 1),
            Err(RulesError::SourceNotOwned { .. })
        ));
        assert!(rules.apply(&board, Player::Blue, 1).is_ok());
    }

    #[test]
    fn test_apply_rejects_occupied_destination() {
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[Square::new(0, 0).index()] = 1;
        cells[Square::new(1, 0).index()] = -1;
        let board = Board::from_parts(cells, 0);

        let action = rules
            .moves
            .iter()
            .position(|m| {
                matches!(m, Move::Step { from, to }
                    if *from == Square::new(0, 0) && *to == Square::new(1, 0))
            })
            .unwrap();
        assert!(matches!(
            rules.apply(&board, Player::Red, action),
            Err(RulesError::DestinationOccupied { .. })
        ));
    }

    #[test]
    fn test_legal_actions_initial() {
        let rules = rules();
        let board = rules.initial();
        let mask = rules.legal_actions(&board, Player::Red);

        assert!(!mask[0], "Pass is not legal while moves exist");
        let legal: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|(_, &l)| l)
            .map(|(i, _)| i)
            .collect();
        assert!(!legal.is_empty());

        for index in legal {
            let Some(Move::Step { from, to }) = rules.action(index) else {
                panic!("legal index {index} is not a step");
            };
            assert_eq!(board.get(from), 1);
            assert_eq!(board.get(to), 0);
            assert!(from.chebyshev(to) <= 2);
        }
    }

    #[test]
    fn test_legal_actions_terminal_is_all_false() {
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[0] = 1;
        let board = Board::from_parts(cells, 0);

        assert!(rules.legal_actions(&board, Player::Red).iter().all(|&l| !l));
        assert!(rules.legal_actions(&board, Player::Blue).iter().all(|&l| !l));
    }

    #[test]
    fn test_pass_is_only_action_when_boxed_in() {
        let rules = rules();
        // Red's lone piece at (0,0) is walled in by Blue out to distance 2;
        // Blue still has pieces near empties, so the game is ongoing.
        let mut cells = [0i8; CELLS];
        for row in 0..3u8 {
            for col in 0..3u8 {
                cells[Square::new(col, row).index()] = -1;
            }
        }
        cells[Square::new(0, 0).index()] = 1;
        let board = Board::from_parts(cells, 0);

        assert_eq!(rules.value(&board, Player::Red), 0.0);
        let mask = rules.legal_actions(&board, Player::Red);
        assert!(mask[0]);
        assert_eq!(mask.iter().filter(|&&l| l).count(), 1);
    }

    #[test]
    fn test_canonical_flips_for_blue_only() {
        let rules = rules();
        let mut board = rules.initial();
        board.bump_jumps();

        let red_view = rules.canonical(&board, Player::Red);
        assert_eq!(red_view, board);

        let blue_view = rules.canonical(&board, Player::Blue);
        assert_eq!(blue_view.get(Square::new(0, 0)), 1);
        assert_eq!(blue_view.get(Square::new(0, 6)), -1);
        assert_eq!(blue_view.jumps(), board.jumps());
    }

    #[test]
    fn test_canonical_involution() {
        let rules = rules();
        let board = rules.initial();
        let twice = rules.canonical(&rules.canonical(&board, Player::Blue), Player::Blue);
        assert_eq!(twice, board);
    }

    #[test]
    fn test_value_antisymmetry_on_decisive_boards() {
        let rules = rules();
        let mut cells = [0i8; CELLS];
        cells[0] = 1;
        cells[1] = 1;
        cells[2] = -1;
        let board = Board::from_parts(cells, JUMP_LIMIT);

        let red = rules.value(&board, Player::Red);
        let blue = rules.value(&board, Player::Blue);
        assert_eq!(red, -blue);
    }
}
