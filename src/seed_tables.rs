//! The three small lookup tables that seed table construction:
//! `straight_table`, `flush_table` (seed ordinals, later overwritten in
//! place by the table builder) and `is_flush_table`.
//!
//! All three are built once and memoized behind `once_cell::sync::Lazy`
//! rather than hand-transcribed as literal arrays: the generation rules are
//! short and exact, and writing them out as code is both the more honest
//! artifact and the only way to get them right without running a table
//! dumper offline.

use once_cell::sync::Lazy;

use crate::encoding::{IS_FLUSH_TABLE_SIZE, SUIT_OFFSET};

/// Size of `straight_table`/`flush_table`: one more than the largest 13-bit
/// value achievable by a bitmap of popcount <= 7 (the top 7 bits set).
pub const SEED_TABLE_SIZE: usize = 8129;

pub const FAIL: i8 = -1;

/// `straight_table[b]`: for a 13-bit ace-high rank bitmap `b` (bit `i`
/// means rank value `i + 2` is present), the ordinal 1..=10 of the best
/// 5-in-a-row it contains (10 = ace-high broadway, 1 = the wheel), or 0 if
/// `b` contains no straight.
pub static STRAIGHT_TABLE: Lazy<Vec<u16>> = Lazy::new(build_straight_table);

/// `flush_table[b]` (seed form): for a 13-bit bitmap `b` of popcount >= 5,
/// the ace-high ordinal (1..=1287) of the best 5 ranks present. Meaningless
/// (left 0) for popcount < 5. The table builder overwrites these seed
/// values in place with the final dense category ordinal.
pub static FLUSH_SEED_TABLE: Lazy<Vec<u16>> = Lazy::new(build_flush_seed_table);

/// `is_flush_table[s]`: given the sum over 7 cards of `SUIT_OFFSET[suit]`,
/// the bit-shift amount that extracts the >=5-card suit's 13-bit lane from
/// the 52-bit card bitmap, or `FAIL` if no suit has 5 or more cards.
pub static IS_FLUSH_TABLE: Lazy<Vec<i8>> = Lazy::new(build_is_flush_table);

fn build_straight_table() -> Vec<u16> {
    let mut table = vec![0u16; SEED_TABLE_SIZE];
    for mask in 0u16..(SEED_TABLE_SIZE as u16) {
        let mut best_high_rank_value = 0u8; // 5..=14, 0 = none

        for high_bit in 4..=12u8 {
            let pattern = 0x1Fu16 << (high_bit - 4);
            if mask & pattern == pattern {
                best_high_rank_value = high_bit + 2;
            }
        }

        // Ace-low wheel: A-2-3-4-5 = bits {12, 0, 1, 2, 3}.
        let wheel: u16 = (1 << 12) | 0b1111;
        if best_high_rank_value == 0 && mask & wheel == wheel {
            best_high_rank_value = 5;
        }

        if best_high_rank_value > 0 {
            table[mask as usize] = (best_high_rank_value - 4) as u16; // dense 1..=10
        }
    }
    table
}

fn build_flush_seed_table() -> Vec<u16> {
    // Dense-rank every 5-bit subset of a 13-bit field by its numeric value;
    // a higher 5-bit pattern is always the better 5-card flush (ace-high,
    // i.e. bit 12 = ace is the most significant bit).
    let mut five_bit_patterns: Vec<u16> = Vec::with_capacity(1287);
    for mask in 1u16..(1 << 13) {
        if mask.count_ones() == 5 {
            five_bit_patterns.push(mask);
        }
    }
    five_bit_patterns.sort_unstable();
    debug_assert_eq!(five_bit_patterns.len(), 1287);

    let mut ordinal_of = [0u16; 1 << 13];
    for (i, &pattern) in five_bit_patterns.iter().enumerate() {
        ordinal_of[pattern as usize] = (i + 1) as u16;
    }

    let mut table = vec![0u16; SEED_TABLE_SIZE];
    for mask in 0u16..(SEED_TABLE_SIZE as u16) {
        if mask.count_ones() >= 5 {
            table[mask as usize] = ordinal_of[top_n_bits(mask, 5) as usize];
        }
    }
    table
}

/// Keep only the `n` highest set bits of `mask`.
fn top_n_bits(mask: u16, n: u32) -> u16 {
    let mut remaining = mask;
    let mut kept = 0u16;
    let mut count = 0;
    for bit in (0..13u16).rev() {
        let b = 1u16 << bit;
        if remaining & b != 0 {
            kept |= b;
            count += 1;
            if count == n {
                break;
            }
        }
    }
    kept
}

fn build_is_flush_table() -> Vec<i8> {
    let mut table = vec![FAIL; IS_FLUSH_TABLE_SIZE];
    // Enumerate every composition (c0, c1, c2, c3) of 7 cards across the 4
    // suits; the offsets {0, 1, 8, 57} are chosen so each composition sums
    // to a unique index.
    for c0 in 0..=7u32 {
        for c1 in 0..=(7 - c0) {
            for c2 in 0..=(7 - c0 - c1) {
                let c3 = 7 - c0 - c1 - c2;
                let counts = [c0, c1, c2, c3];
                let sum: u32 = counts
                    .iter()
                    .zip(SUIT_OFFSET.iter())
                    .map(|(&count, &offset)| count * offset)
                    .sum();
                if let Some(flush_suit) = counts.iter().position(|&count| count >= 5) {
                    table[sum as usize] = (flush_suit as i8) * 13;
                }
            }
        }
    }
    table
}
