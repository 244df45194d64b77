//! Closed-form 64-bit category-ordinal evaluator, used exclusively by the
//! table builder. Never called on the hot path.
//!
//! The 64-bit value places the hand category in bits 52+ and an
//! intra-category tiebreak (built from ace-high rank bitmaps) in the low
//! bits, so two values compare correctly with a plain `>`.

use once_cell::sync::Lazy;

use crate::encoding::{card_bit, rank_bit13, suit_offset, IS_FLUSH_TABLE_SIZE};
use crate::seed_tables::{FAIL, FLUSH_SEED_TABLE, IS_FLUSH_TABLE, STRAIGHT_TABLE};

const RANK_SHIFT: u32 = 52;
const CARD_MASK: u64 = 0x1fff;

const SF: u64 = 8 << RANK_SHIFT;
const QUADS: u64 = 7 << RANK_SHIFT;
const FULL: u64 = 6 << RANK_SHIFT;
const FLUSH: u64 = 5 << RANK_SHIFT;
const STRAIGHT: u64 = 4 << RANK_SHIFT;
const TRIPS: u64 = 3 << RANK_SHIFT;
const TWO_PAIR: u64 = 2 << RANK_SHIFT;
const PAIR: u64 = 1 << RANK_SHIFT;

pub const FULL_THRESHOLD: u64 = FULL;

const MIN_PAIR: u64 = 1 << 13;
const MIN_TRIPS: u64 = 1 << 26;
const MIN_QUADS: u64 = 1 << 39;

/// Maps a 13-bit bitmap to its single lowest set bit (`x & x.wrapping_neg()`
/// for `x` in [0, 8192)), tabulated rather than computed inline to keep
/// `phase2` a pure sequence of table probes and XORs, as in the reference
/// evaluator.
static LOWBITS: Lazy<Vec<u16>> = Lazy::new(|| {
    (0u16..8192)
        .map(|x| x & x.wrapping_neg())
        .collect()
});

/// Score a 7-card hand (packed u8 indices) into a 64-bit category ordinal.
/// Table-build use only; see `fast_evaluator` for the runtime path.
pub fn evaluate_64(cards: &[u8; 7]) -> u64 {
    let mut suit_sum: u32 = 0;
    for &c in cards {
        suit_sum += suit_offset(c);
    }

    debug_assert!((suit_sum as usize) < IS_FLUSH_TABLE_SIZE);
    let flush_shift = IS_FLUSH_TABLE[suit_sum as usize];
    if flush_shift != FAIL {
        let mut bitmap: u64 = 0;
        for &c in cards {
            bitmap |= card_bit(c);
        }
        let b = ((bitmap >> flush_shift) & CARD_MASK) as usize;
        return if STRAIGHT_TABLE[b] != 0 {
            SF | FLUSH_SEED_TABLE[b] as u64
        } else {
            FLUSH | FLUSH_SEED_TABLE[b] as u64
        };
    }

    let mut rank_union: u16 = 0;
    for &c in cards {
        rank_union |= rank_bit13(c);
    }
    if STRAIGHT_TABLE[rank_union as usize] != 0 {
        return STRAIGHT | STRAIGHT_TABLE[rank_union as usize] as u64;
    }

    let mut val: u64 = 0;
    for &c in cards {
        let mut rank = rank_bit13(c) as u64;
        while rank & val != 0 {
            rank <<= 13;
        }
        val |= rank;
    }

    phase2(val ^ (val >> 13))
}

fn single_rank(field: u64) -> bool {
    field == LOWBITS[field as usize] as u64
}

/// Reduces the 4-column (singles/pairs/trips/quads) 52-bit multiset value
/// to a category tag plus intra-category tiebreak.
fn phase2(mut val: u64) -> u64 {
    if val < MIN_PAIR {
        val ^= LOWBITS[val as usize] as u64;
        val ^= LOWBITS[val as usize] as u64;
        return val;
    }

    if val < MIN_TRIPS {
        let pairs = val >> 13;
        if single_rank(pairs) {
            // exactly one pair
            let mut kickers = val & CARD_MASK;
            val ^= LOWBITS[kickers as usize] as u64;
            kickers ^= LOWBITS[kickers as usize] as u64;
            val ^= LOWBITS[kickers as usize] as u64;
            return PAIR | val;
        }
        if single_rank(pairs ^ LOWBITS[pairs as usize] as u64) {
            // exactly two pair
            let mut kickers = val & CARD_MASK;
            val ^= LOWBITS[kickers as usize] as u64;
            kickers ^= LOWBITS[kickers as usize] as u64;
            val ^= LOWBITS[kickers as usize] as u64;
            return TWO_PAIR | val;
        }
        // three pair: demote the lowest pair to a single, keep the top two.
        let worst_pair = LOWBITS[pairs as usize] as u64;
        val ^= worst_pair << 13;
        val |= worst_pair;
        let mut kickers = val & CARD_MASK;
        val ^= LOWBITS[kickers as usize] as u64;
        return TWO_PAIR | val;
    }

    if val < MIN_QUADS {
        let trips = val >> 26;
        if !single_rank(trips) {
            // two sets of trips: demote the lower one to a pair, fold the
            // rest into a full house.
            let worst_trips = LOWBITS[trips as usize] as u64;
            val |= worst_trips << 13;
            val ^= worst_trips << 26;
            let mut kickers = val & CARD_MASK;
            val ^= LOWBITS[kickers as usize] as u64;
            return FULL | val;
        }
        let pairs = (val >> 13) & CARD_MASK;
        if single_rank(pairs) {
            // trips + exactly one pair
            let mut kickers = val & CARD_MASK;
            val ^= LOWBITS[kickers as usize] as u64;
            kickers ^= LOWBITS[kickers as usize] as u64;
            val ^= LOWBITS[kickers as usize] as u64;
            return FULL | val;
        }
        if pairs != 0 {
            // trips + two pair: keep the better pair
            val ^= (LOWBITS[pairs as usize] as u64) << 13;
            return FULL | val;
        }
        // trips alone
        let mut kickers = val & CARD_MASK;
        val ^= LOWBITS[kickers as usize] as u64;
        kickers ^= LOWBITS[kickers as usize] as u64;
        val ^= LOWBITS[kickers as usize] as u64;
        return TRIPS | val;
    }

    // quads: find the single best remaining card as kicker.
    let mut kickers = (val & CARD_MASK) | ((val >> 13) & CARD_MASK) | ((val >> 26) & CARD_MASK);
    while LOWBITS[kickers as usize] as u64 != kickers {
        kickers ^= LOWBITS[kickers as usize] as u64;
    }
    val &= CARD_MASK << 39;
    val |= kickers;
    QUADS | val
}

pub fn category_tag(val: u64) -> u64 {
    val >> RANK_SHIFT
}

// Re-exported for callers that want the category name without importing
// the hand_evaluator module (kept in sync with it manually: this module
// deliberately has no dependency on the public-facing enum).
pub mod category {
    pub const HIGH_CARD: u64 = 0;
    pub const PAIR: u64 = 1;
    pub const TWO_PAIR: u64 = 2;
    pub const TRIPS: u64 = 3;
    pub const STRAIGHT: u64 = 4;
    pub const FLUSH: u64 = 5;
    pub const FULL_HOUSE: u64 = 6;
    pub const QUADS: u64 = 7;
    pub const STRAIGHT_FLUSH: u64 = 8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card_encoding::card_to_index;
    use crate::cards::Card;

    fn hand(notations: &[&str]) -> [u8; 7] {
        let mut cards = [0u8; 7];
        for (i, n) in notations.iter().enumerate() {
            cards[i] = card_to_index(&Card::parse(n).unwrap());
        }
        cards
    }

    #[test]
    fn royal_flush_category() {
        let h = hand(&["As", "Ks", "Qs", "Js", "Ts", "2d", "3d"]);
        assert_eq!(category_tag(evaluate_64(&h)), category::STRAIGHT_FLUSH);
    }

    #[test]
    fn quads_category() {
        let h = hand(&["Ks", "Kh", "Kd", "Kc", "As", "2d", "3d"]);
        assert_eq!(category_tag(evaluate_64(&h)), category::QUADS);
    }

    #[test]
    fn full_house_category() {
        let h = hand(&["As", "Ah", "Ad", "Ks", "Kh", "2d", "3d"]);
        assert_eq!(category_tag(evaluate_64(&h)), category::FULL_HOUSE);
    }

    #[test]
    fn two_sets_of_trips_collapse_to_full_house() {
        let h = hand(&["As", "Ah", "Ad", "Ks", "Kh", "Kd", "3d"]);
        assert_eq!(category_tag(evaluate_64(&h)), category::FULL_HOUSE);
    }

    #[test]
    fn trips_plus_two_pair_collapse_to_full_house() {
        let h = hand(&["As", "Ah", "Ad", "Ks", "Kh", "Qs", "Qh"]);
        assert_eq!(category_tag(evaluate_64(&h)), category::FULL_HOUSE);
    }

    #[test]
    fn three_pair_collapses_to_best_two() {
        let h = hand(&["As", "Ah", "Ks", "Kh", "Qs", "Qh", "2d"]);
        assert_eq!(category_tag(evaluate_64(&h)), category::TWO_PAIR);
        // should be equivalent to AAKKQ two pair, not AAKK2 or AAQQ2
        let equivalent = hand(&["As", "Ah", "Ks", "Kh", "Qs", "7d", "3d"]);
        assert_eq!(evaluate_64(&h), evaluate_64(&equivalent));
    }

    #[test]
    fn wheel_is_a_straight() {
        let h = hand(&["As", "2d", "3h", "4s", "5c", "Kd", "Qd"]);
        assert_eq!(category_tag(evaluate_64(&h)), category::STRAIGHT);
    }

    #[test]
    fn category_ordering_is_monotone() {
        let hands = [
            (hand(&["As", "Ks", "Qs", "Js", "Ts", "2d", "3d"]), category::STRAIGHT_FLUSH),
            (hand(&["Ks", "Kh", "Kd", "Kc", "As", "2d", "3d"]), category::QUADS),
            (hand(&["As", "Ah", "Ad", "Ks", "Kh", "2d", "3d"]), category::FULL_HOUSE),
            (hand(&["As", "Ts", "8s", "5s", "2s", "7d", "8d"]), category::FLUSH),
            (hand(&["9s", "8h", "7d", "6c", "5s", "2d", "3d"]), category::STRAIGHT),
            (hand(&["Qs", "Qh", "Qd", "Ks", "7h", "2d", "3d"]), category::TRIPS),
            (hand(&["As", "Ad", "Kh", "Ks", "Qc", "2d", "3d"]), category::TWO_PAIR),
            (hand(&["As", "Ah", "Kd", "Qs", "Jh", "2d", "3d"]), category::PAIR),
            (hand(&["As", "Kh", "Qd", "Js", "9c", "2d", "3h"]), category::HIGH_CARD),
        ];
        let mut prev = u64::MAX;
        for (h, expected_cat) in hands {
            let v = evaluate_64(&h);
            assert_eq!(category_tag(v), expected_cat);
            assert!(v < prev);
            prev = v;
        }
    }

    #[test]
    fn suit_symmetry() {
        let h1 = hand(&["As", "Kh", "Qd", "Js", "9c", "2d", "3h"]);
        let h2 = hand(&["Ah", "Ks", "Qc", "Jh", "9d", "2c", "3s"]);
        assert_eq!(evaluate_64(&h1), evaluate_64(&h2));
    }
}
