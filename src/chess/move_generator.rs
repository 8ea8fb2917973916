//! Legal move generation on the mailbox board.
//!
//! Moves are generated pseudo-legally (square a1 through h8, a fixed direction order per
//! piece) and then filtered by applying each one and checking the mover's king is not
//! attacked. Generation never leaves the board changed.

use smallvec::SmallVec;

use super::board::Board;
use super::castle_rights::CastleRights;
use super::chess_move::ChessMove;
use super::color::Color;
use super::error::BoardError;
use super::piece::{Piece, PieceKind, PROMOTION_KINDS};
use super::square::Square;

pub type ChessMoveList = SmallVec<[ChessMove; 64]>;

type Offsets = [(i8, i8)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Returns true if any piece of `attacker` attacks `square`.
pub fn is_square_attacked(board: &Board, square: Square, attacker: Color) -> bool {
    let pawn = Piece::new(PieceKind::Pawn, attacker);
    let pawn_rank_delta = -attacker.pawn_direction();
    if [-1, 1].iter().any(|&file_delta| {
        square
            .offset(file_delta, pawn_rank_delta)
            .map_or(false, |origin| board.get(origin) == Some(pawn))
    }) {
        return true;
    }

    let knight = Piece::new(PieceKind::Knight, attacker);
    let king = Piece::new(PieceKind::King, attacker);
    let attacked_by_step = |offsets: &Offsets, piece: Piece| {
        offsets.iter().any(|&(df, dr)| {
            square
                .offset(df, dr)
                .map_or(false, |origin| board.get(origin) == Some(piece))
        })
    };
    if attacked_by_step(&KNIGHT_OFFSETS, knight) || attacked_by_step(&KING_OFFSETS, king) {
        return true;
    }

    let attacked_by_slider = |directions: &Offsets, slider: PieceKind| {
        directions.iter().any(|&(df, dr)| {
            let mut current = square;
            while let Some(next) = current.offset(df, dr) {
                if let Some(piece) = board.get(next) {
                    return piece.color == attacker
                        && (piece.kind == slider || piece.kind == PieceKind::Queen);
                }
                current = next;
            }
            false
        })
    };
    attacked_by_slider(&ROOK_DIRECTIONS, PieceKind::Rook)
        || attacked_by_slider(&BISHOP_DIRECTIONS, PieceKind::Bishop)
}

/// Returns true if `color`'s king is attacked. A side without a king is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king) => is_square_attacked(board, king, color.opposite()),
        None => false,
    }
}

/// Moves that follow piece movement rules but may leave the mover's king in check.
pub fn pseudo_legal_moves(board: &Board) -> ChessMoveList {
    let mover = board.turn();
    let mut moves = ChessMoveList::new();

    for (square, piece) in board.pieces() {
        if piece.color != mover {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => pawn_moves(board, square, mover, &mut moves),
            PieceKind::Knight => step_moves(board, square, piece, &KNIGHT_OFFSETS, &mut moves),
            PieceKind::Bishop => slide_moves(board, square, piece, &BISHOP_DIRECTIONS, &mut moves),
            PieceKind::Rook => slide_moves(board, square, piece, &ROOK_DIRECTIONS, &mut moves),
            PieceKind::Queen => {
                slide_moves(board, square, piece, &ROOK_DIRECTIONS, &mut moves);
                slide_moves(board, square, piece, &BISHOP_DIRECTIONS, &mut moves);
            }
            PieceKind::King => {
                step_moves(board, square, piece, &KING_OFFSETS, &mut moves);
                castle_moves(board, square, mover, &mut moves);
            }
        }
    }

    moves
}

/// All legal moves for the side to move. Fails if a generated move cannot be applied
/// and undone, which means the board no longer matches its own history.
pub fn try_generate_moves(board: &mut Board) -> Result<ChessMoveList, BoardError> {
    let mover = board.turn();
    let mut moves = ChessMoveList::new();
    for chess_move in pseudo_legal_moves(board) {
        if leaves_king_safe(board, &chess_move, mover)? {
            moves.push(chess_move);
        }
    }
    Ok(moves)
}

/// All legal moves for the side to move.
pub fn generate_moves(board: &mut Board) -> ChessMoveList {
    try_generate_moves(board).expect("generated moves should apply and undo cleanly")
}

/// Returns true as soon as one legal move is found.
pub fn has_legal_move(board: &mut Board) -> bool {
    let mover = board.turn();
    for chess_move in pseudo_legal_moves(board) {
        let safe = leaves_king_safe(board, &chess_move, mover)
            .expect("generated moves should apply and undo cleanly");
        if safe {
            return true;
        }
    }
    false
}

/// Counts the leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(board: &mut Board, depth: u8) -> Result<u64, BoardError> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = try_generate_moves(board)?;
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut count = 0;
    for chess_move in moves.iter() {
        chess_move.apply(board)?;
        let subtree = perft(board, depth - 1);
        chess_move.undo(board)?;
        count += subtree?;
    }
    Ok(count)
}

/// Plays `chess_move` and takes it back, reporting whether `mover`'s king was safe.
pub(super) fn leaves_king_safe(
    board: &mut Board,
    chess_move: &ChessMove,
    mover: Color,
) -> Result<bool, BoardError> {
    chess_move.apply(board)?;
    let safe = !is_in_check(board, mover);
    chess_move.undo(board)?;
    Ok(safe)
}

fn push_pawn_move(
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    promotion_rank: u8,
    moves: &mut ChessMoveList,
) {
    if to.rank() == promotion_rank {
        for &promote_to in PROMOTION_KINDS.iter() {
            moves.push(ChessMove::Promotion {
                from,
                to,
                promote_to,
                captured,
            });
        }
    } else {
        moves.push(ChessMove::standard(from, to, PieceKind::Pawn, captured));
    }
}

fn pawn_moves(board: &Board, from: Square, mover: Color, moves: &mut ChessMoveList) {
    let direction = mover.pawn_direction();
    let promotion_rank = mover.opposite().back_rank();
    let start_rank = match mover {
        Color::White => 1,
        Color::Black => 6,
    };

    if let Some(single) = from.offset(0, direction) {
        if !board.is_occupied(single) {
            push_pawn_move(from, single, None, promotion_rank, moves);

            if from.rank() == start_rank {
                if let Some(double) = from.offset(0, 2 * direction) {
                    if !board.is_occupied(double) {
                        moves.push(ChessMove::standard(from, double, PieceKind::Pawn, None));
                    }
                }
            }
        }
    }

    for &file_delta in [-1, 1].iter() {
        let target = match from.offset(file_delta, direction) {
            Some(target) => target,
            None => continue,
        };
        match board.get(target) {
            Some(piece) if piece.color != mover => {
                push_pawn_move(from, target, Some(piece.kind), promotion_rank, moves)
            }
            None if board.en_passant_target() == Some(target) => {
                moves.push(ChessMove::EnPassant { from, to: target })
            }
            _ => {}
        }
    }
}

fn step_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    offsets: &Offsets,
    moves: &mut ChessMoveList,
) {
    for &(df, dr) in offsets.iter() {
        let to = match from.offset(df, dr) {
            Some(to) => to,
            None => continue,
        };
        match board.get(to) {
            None => moves.push(ChessMove::standard(from, to, piece.kind, None)),
            Some(other) if other.color != piece.color => {
                moves.push(ChessMove::standard(from, to, piece.kind, Some(other.kind)))
            }
            Some(_) => {}
        }
    }
}

fn slide_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    directions: &Offsets,
    moves: &mut ChessMoveList,
) {
    for &(df, dr) in directions.iter() {
        let mut current = from;
        while let Some(to) = current.offset(df, dr) {
            match board.get(to) {
                None => moves.push(ChessMove::standard(from, to, piece.kind, None)),
                Some(other) => {
                    if other.color != piece.color {
                        moves.push(ChessMove::standard(from, to, piece.kind, Some(other.kind)));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

/// Castling needs the right intact, the squares between king and rook empty, and the
/// king neither in check nor passing through or landing on an attacked square.
fn castle_moves(board: &Board, from: Square, mover: Color, moves: &mut ChessMoveList) {
    let rank = mover.back_rank();
    if from != Square::from_file_rank(4, rank) {
        return;
    }
    let rights = board.castle_rights();
    let opponent = mover.opposite();
    let rook = Piece::new(PieceKind::Rook, mover);
    let at = |file: u8| Square::from_file_rank(file, rank);
    let empty = |files: &[u8]| files.iter().all(|&file| !board.is_occupied(at(file)));
    let safe = |files: &[u8]| {
        files
            .iter()
            .all(|&file| !is_square_attacked(board, at(file), opponent))
    };

    if rights.contains(CastleRights::kingside(mover))
        && board.get(at(7)) == Some(rook)
        && empty(&[5, 6])
        && safe(&[4, 5, 6])
    {
        moves.push(ChessMove::Castle { from, to: at(6) });
    }

    if rights.contains(CastleRights::queenside(mover))
        && board.get(at(0)) == Some(rook)
        && empty(&[1, 2, 3])
        && safe(&[4, 3, 2])
    {
        moves.push(ChessMove::Castle { from, to: at(2) });
    }
}
