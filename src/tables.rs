//! Process-wide handle onto the built evaluation tables.
//!
//! Construction runs once, lazily, on first use, and is serialized by
//! `once_cell`: concurrent callers block on the same build rather than
//! racing duplicate copies into memory.

use once_cell::sync::Lazy;

use crate::table_builder::{build_tables, RANK_TABLE_SIZE};

pub struct Tables {
    pub rank_table: Vec<u16>,
    pub flush_table: Vec<u16>,
}

pub static TABLES: Lazy<Tables> = Lazy::new(|| {
    let built = build_tables();
    Tables {
        rank_table: built.rank_table,
        flush_table: built.flush_table,
    }
});

impl Tables {
    #[inline]
    pub fn rank_table_size(&self) -> usize {
        RANK_TABLE_SIZE
    }
}
