//! The runtime evaluation path: sum four 32-bit `DECK` entries (or more),
//! probe `is_flush_table` once to decide flush vs. non-flush, then a single
//! table lookup for the final ordinal. This is the only evaluator callers
//! outside this crate's table-build machinery should use.

use crate::encoding::{card_bit, DECK, RANK_MASK, SUIT_SHIFT};
use crate::seed_tables::{FAIL, IS_FLUSH_TABLE};
use crate::tables::TABLES;

const CARD_MASK: u64 = 0x1fff;

/// Board state hoisted once per street so every opposing hand's showdown
/// value is a handful of additions plus one table probe.
pub struct BoardPartial<'a> {
    val: u32,
    board: &'a [u8],
}

/// Precompute the board's contribution so `evaluate_hand` doesn't re-sum it
/// for every candidate hole-card pair.
pub fn hoist_board(board: &[u8]) -> BoardPartial<'_> {
    let val = board.iter().map(|&c| DECK[c as usize]).sum();
    BoardPartial { val, board }
}

/// Score a hole-card pair against a hoisted board.
pub fn evaluate_hand(partial: &BoardPartial, c1: u8, c2: u8) -> u16 {
    let val = partial.val + DECK[c1 as usize] + DECK[c2 as usize];
    let flush_shift = IS_FLUSH_TABLE[(val >> SUIT_SHIFT) as usize];

    if flush_shift != FAIL {
        let mut flush = card_bit(c1) | card_bit(c2);
        for &b in partial.board {
            flush |= card_bit(b);
        }
        flush >>= flush_shift as u32;
        flush &= CARD_MASK;
        TABLES.flush_table[flush as usize]
    } else {
        TABLES.rank_table[(val & RANK_MASK) as usize]
    }
}

/// Score any 7 cards at once, with no board hoisting. Used by the full
/// enumeration and Monte Carlo drivers where no two hands share a board
/// evaluation in the inner loop.
pub fn evaluate7(cards: &[u8; 7]) -> u16 {
    let val: u32 = cards.iter().map(|&c| DECK[c as usize]).sum();
    let flush_shift = IS_FLUSH_TABLE[(val >> SUIT_SHIFT) as usize];

    if flush_shift != FAIL {
        let flush_bits: u64 = cards.iter().map(|&c| card_bit(c)).fold(0, |a, b| a | b);
        let flush = (flush_bits >> flush_shift as u32) & CARD_MASK;
        TABLES.flush_table[flush as usize]
    } else {
        TABLES.rank_table[(val & RANK_MASK) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_encoding::card_to_index;
    use crate::cards::Card;

    fn idx(n: &str) -> u8 {
        card_to_index(&Card::parse(n).unwrap())
    }

    #[test]
    fn royal_flush_beats_quads() {
        let rf = [idx("As"), idx("Ks"), idx("Qs"), idx("Js"), idx("Ts"), idx("2d"), idx("3d")];
        let quads = [idx("Ah"), idx("Ad"), idx("Ac"), idx("As"), idx("Kd"), idx("2d"), idx("3d")];
        assert!(evaluate7(&rf) > evaluate7(&quads));
    }

    #[test]
    fn evaluate7_matches_board_hoisted_path() {
        let board = [idx("2d"), idx("7h"), idx("9c"), idx("Ks"), idx("4s")];
        let h1 = (idx("As"), idx("Ah"));
        let seven = [board[0], board[1], board[2], board[3], board[4], h1.0, h1.1];

        let partial = hoist_board(&board);
        let hoisted = evaluate_hand(&partial, h1.0, h1.1);
        assert_eq!(hoisted, evaluate7(&seven));
    }

    #[test]
    fn higher_hand_always_outranks_lower_across_categories() {
        let pair = [idx("As"), idx("Ah"), idx("Kd"), idx("Qs"), idx("Jh"), idx("2d"), idx("3h")];
        let two_pair = [idx("As"), idx("Ad"), idx("Kh"), idx("Ks"), idx("Qc"), idx("2d"), idx("3d")];
        assert!(evaluate7(&two_pair) > evaluate7(&pair));
    }
}
