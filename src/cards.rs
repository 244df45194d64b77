//! Card, rank and suit value types, plus starting-hand range notation.
//!
//! This module is the friendly surface callers build hands and boards out
//! of. The evaluator itself never touches these types directly — see
//! `card_encoding` for the conversion to the packed `u8` index the kernel
//! operates on.

use std::fmt;

use crate::error::{GtoError, GtoResult};

/// A card's rank, carrying its conventional poker value (Two = 2 .. Ace = 14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

impl Rank {
    pub fn from_char(c: char) -> Option<Rank> {
        Some(match c.to_ascii_uppercase() {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return None,
        })
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A card's suit. The discriminants fix the suit index (0..4) the kernel
/// uses for suit-offset and bitmap-lane lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades = 0,
    Hearts = 1,
    Diamonds = 2,
    Clubs = 3,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

impl Suit {
    pub fn from_char(c: char) -> Option<Suit> {
        Some(match c.to_ascii_lowercase() {
            's' => Suit::Spades,
            'h' => Suit::Hearts,
            'd' => Suit::Diamonds,
            'c' => Suit::Clubs,
            _ => return None,
        })
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A single playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// Parse two-character notation such as "As" or "Td".
    pub fn parse(notation: &str) -> GtoResult<Card> {
        let chars: Vec<char> = notation.chars().collect();
        if chars.len() != 2 {
            return Err(GtoError::BadCardNotation(notation.to_string()));
        }
        let rank = Rank::from_char(chars[0])
            .ok_or_else(|| GtoError::BadCardNotation(notation.to_string()))?;
        let suit = Suit::from_char(chars[1])
            .ok_or_else(|| GtoError::BadCardNotation(notation.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// The 52-card deck, in a fixed but otherwise unremarkable order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for &rank in ALL_RANKS.iter() {
        for &suit in ALL_SUITS.iter() {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

/// Expand one starting-hand range token ("AKs", "AKo", "AA", "AhKs") into
/// concrete (Card, Card) combos. "s" restricts to suited combos, "o" to
/// offsuit combos; a bare two-rank token with no suffix (e.g. "AK") expands
/// to all combos (suited and offsuit); a pair token ("77") expands to all
/// six combos of that rank; an explicit two-card token ("AhKs") expands to
/// exactly that combo.
pub fn hand_combos(notation: &str) -> GtoResult<Vec<(Card, Card)>> {
    let token = notation.trim();
    let chars: Vec<char> = token.chars().collect();

    // Explicit combo: four characters, rank+suit twice.
    if chars.len() == 4 {
        if let (Some(r1), Some(s1), Some(r2), Some(s2)) = (
            Rank::from_char(chars[0]),
            Suit::from_char(chars[1]),
            Rank::from_char(chars[2]),
            Suit::from_char(chars[3]),
        ) {
            let c1 = Card::new(r1, s1);
            let c2 = Card::new(r2, s2);
            if c1 == c2 {
                return Err(GtoError::BadRangeToken(token.to_string()));
            }
            return Ok(vec![(c1, c2)]);
        }
    }

    if chars.len() < 2 || chars.len() > 3 {
        return Err(GtoError::BadRangeToken(token.to_string()));
    }

    let r1 = Rank::from_char(chars[0]).ok_or_else(|| GtoError::BadRangeToken(token.to_string()))?;
    let r2 = Rank::from_char(chars[1]).ok_or_else(|| GtoError::BadRangeToken(token.to_string()))?;
    let suited_only = chars.get(2) == Some(&'s');
    let offsuit_only = chars.get(2) == Some(&'o');
    if chars.len() == 3 && !suited_only && !offsuit_only {
        return Err(GtoError::BadRangeToken(token.to_string()));
    }

    let mut combos = Vec::new();
    if r1 == r2 {
        // Pocket pair: all C(4,2) = 6 combos, "s"/"o" suffixes are meaningless.
        for i in 0..ALL_SUITS.len() {
            for j in (i + 1)..ALL_SUITS.len() {
                combos.push((Card::new(r1, ALL_SUITS[i]), Card::new(r2, ALL_SUITS[j])));
            }
        }
        return Ok(combos);
    }

    for &s1 in ALL_SUITS.iter() {
        for &s2 in ALL_SUITS.iter() {
            let suited = s1 == s2;
            if suited_only && !suited {
                continue;
            }
            if offsuit_only && suited {
                continue;
            }
            combos.push((Card::new(r1, s1), Card::new(r2, s2)));
        }
    }
    Ok(combos)
}
