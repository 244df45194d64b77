//! Maps between `Card` structs and the packed u8 index (0-51) the kernel
//! operates on.
//!
//! Encoding: `index = rank_offset * 4 + suit_offset`
//!   rank_offset: 0 = Ace, 1 = King, ..., 12 = Two (ace-high, per the kernel's
//!     rank-key and bitmap layout)
//!   suit_offset: 0 = Spades, 1 = Hearts, 2 = Diamonds, 3 = Clubs

use crate::cards::{Card, Rank, Suit, ALL_RANKS, ALL_SUITS};

pub fn card_to_index(card: &Card) -> u8 {
    let rank_idx = 14 - (card.rank as u8); // Ace(14) -> 0, Two(2) -> 12
    let suit_idx = match card.suit {
        Suit::Spades => 0,
        Suit::Hearts => 1,
        Suit::Diamonds => 2,
        Suit::Clubs => 3,
    };
    rank_idx * 4 + suit_idx
}

pub fn index_to_card(index: u8) -> Card {
    let rank_idx = index / 4;
    let rank = ALL_RANKS[(12 - rank_idx) as usize];
    Card::new(rank, ALL_SUITS[(index % 4) as usize])
}

pub fn cards_to_indices(cards: &[Card]) -> Vec<u8> {
    cards.iter().map(card_to_index).collect()
}

/// Build the remaining deck (0-51) excluding the given dead cards.
pub fn remaining_deck(dead: &[u8]) -> Vec<u8> {
    let mut dead_set = [false; 52];
    for &d in dead {
        dead_set[d as usize] = true;
    }
    (0..52u8).filter(|&c| !dead_set[c as usize]).collect()
}
