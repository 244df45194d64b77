//! Builds `rank_table` and `flush_table`: the two dense lookup tables the
//! runtime evaluator probes directly. Runs once, behind the `tables`
//! module's `Lazy` singleton.
//!
//! The approach: score one canonical (suit-assigned) representative of
//! every reachable non-flush rank multiset with the closed-form
//! `base_evaluator`, sort those representatives by hand strength, dense-rank
//! them into consecutive ordinals, then splice in a separately-built flush
//! bucket and straight-flush bucket at the category boundaries where they
//! belong.

use itertools::Itertools;

use crate::base_evaluator::{evaluate_64, FULL_THRESHOLD};
use crate::encoding::SPECIALK;
use crate::seed_tables::{FLUSH_SEED_TABLE, SEED_TABLE_SIZE, STRAIGHT_TABLE};

pub const RANK_TABLE_SIZE: usize = 7_825_760;
pub const NUM_RANK_COMBOS: usize = 49_205;
pub const NUM_FLUSHES: usize = 4_421;
pub const NUM_SFS: usize = 298;

struct Entry {
    key: u32,
    val: u64,
}

/// One representative 7-card non-flush rank multiset, offsuit-assigned by
/// round-robin so no suit ever accumulates five cards, keyed by the sum of
/// `SPECIALK` over its ranks.
fn rank_entries() -> Vec<Entry> {
    let mut entries = Vec::with_capacity(NUM_RANK_COMBOS);

    for ranks in (0..13u8).combinations_with_replacement(7) {
        if has_run_of_five(&ranks) {
            continue;
        }

        let mut key: u32 = 0;
        let mut cards = [0u8; 7];
        for (i, &r) in ranks.iter().enumerate() {
            key += SPECIALK[r as usize];
            cards[i] = r * 4 + (i as u8 % 4);
        }
        entries.push(Entry {
            key,
            val: evaluate_64(&cards),
        });
    }

    debug_assert_eq!(entries.len(), NUM_RANK_COMBOS);
    entries
}

/// True if some rank occupies 5 or more of the 7 (sorted, non-decreasing)
/// slots -- impossible to deal with only 4 suits.
fn has_run_of_five(ranks: &[u8]) -> bool {
    ranks.windows(5).any(|w| w.iter().all(|&r| r == w[0]))
}

/// Splits the seed flush table into its flush and straight-flush buckets,
/// keyed by the 13-bit rank bitmap.
fn flush_entries() -> (Vec<Entry>, Vec<Entry>) {
    let mut flushes = Vec::with_capacity(NUM_FLUSHES);
    let mut straight_flushes = Vec::with_capacity(NUM_SFS);

    for mask in 0..SEED_TABLE_SIZE {
        let ordinal = FLUSH_SEED_TABLE[mask];
        if ordinal == 0 {
            continue;
        }
        let entry = Entry {
            key: mask as u32,
            val: ordinal as u64,
        };
        if STRAIGHT_TABLE[mask] != 0 {
            straight_flushes.push(entry);
        } else {
            flushes.push(entry);
        }
    }

    debug_assert_eq!(flushes.len(), NUM_FLUSHES);
    debug_assert_eq!(straight_flushes.len(), NUM_SFS);

    flushes.sort_unstable_by(|a, b| a.val.cmp(&b.val).then(a.key.cmp(&b.key)));
    straight_flushes.sort_unstable_by(|a, b| a.val.cmp(&b.val).then(a.key.cmp(&b.key)));
    (flushes, straight_flushes)
}

/// Dense-ranks `items` in order, starting the very first distinct value at
/// ordinal 1 (never 0, so every reachable table slot is nonzero -- the
/// reference table builder starts at 0, which this deliberately departs
/// from).
struct DenseRank {
    previous: Option<u64>,
    current: u16,
}

impl DenseRank {
    fn new() -> Self {
        DenseRank { previous: None, current: 0 }
    }

    fn next_ordinal(&mut self, val: u64) -> u16 {
        if self.previous != Some(val) {
            self.current += 1;
            self.previous = Some(val);
        }
        self.current
    }
}

pub struct BuiltTables {
    pub rank_table: Vec<u16>,
    pub flush_table: Vec<u16>,
}

pub fn build_tables() -> BuiltTables {
    let rank_items = {
        let mut items = rank_entries();
        items.sort_unstable_by(|a, b| a.val.cmp(&b.val).then(a.key.cmp(&b.key)));
        items
    };
    let (flush_items, sf_items) = flush_entries();

    debug_assert_eq!(
        rank_items.len() + flush_items.len() + sf_items.len(),
        NUM_RANK_COMBOS + NUM_FLUSHES + NUM_SFS
    );

    let mut rank_table = vec![0u16; RANK_TABLE_SIZE];
    let mut flush_table = vec![0u16; SEED_TABLE_SIZE];
    let mut rank_ord = DenseRank::new();
    let mut spliced_flushes = false;

    for item in &rank_items {
        if !spliced_flushes && item.val > FULL_THRESHOLD {
            for f in &flush_items {
                flush_table[f.key as usize] = rank_ord.next_ordinal(f.val);
            }
            spliced_flushes = true;
        }
        rank_table[item.key as usize] = rank_ord.next_ordinal(item.val);
    }

    // Every rank entry is below FULL_THRESHOLD's quads cutoff in the worst
    // case only if no quads exist, which never happens; guard anyway so a
    // future constant change fails loudly instead of silently dropping
    // flushes from the table.
    debug_assert!(spliced_flushes);

    for f in &sf_items {
        flush_table[f.key as usize] = rank_ord.next_ordinal(f.val);
    }

    BuiltTables { rank_table, flush_table }
}
