//! Equity drivers: thin, allocation-light loops over the Fast Evaluator.
//! None of these functions touch the table-construction machinery directly;
//! they only ever call through `fast_evaluator`.

use std::collections::HashMap;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rayon::prelude::*;

use crate::card_encoding::{card_to_index, remaining_deck};
use crate::cards::{hand_combos, Card};
use crate::error::{GtoError, GtoResult};
use crate::fast_evaluator::{evaluate7, evaluate_hand, hoist_board};

pub const MAX_HANDS: usize = 22;
pub const NUM_STARTING_HANDS: usize = 1326;
const MAX_GROUP_ID: u8 = 32;

/// Fails if any card appears more than once across the flattened inputs.
fn check_no_duplicates(cards: &[u8]) -> GtoResult<()> {
    let mut seen = [false; 52];
    for &c in cards {
        if c as usize >= 52 {
            return Err(GtoError::InvalidCard(c));
        }
        if seen[c as usize] {
            return Err(GtoError::DuplicateCards);
        }
        seen[c as usize] = true;
    }
    Ok(())
}

/// `C(n, k)`, used only to sanity-check runout enumeration coverage.
fn n_choose_k(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

fn seven_card_hand(hole: [u8; 2], board: &[u8]) -> [u8; 7] {
    let mut cards = [0u8; 7];
    cards[0] = hole[0];
    cards[1] = hole[1];
    cards[2..2 + board.len()].copy_from_slice(board);
    cards
}

/// Maps `0 <= a < b < 52` to its position in canonical starting-hand order,
/// `[0, 1326)`.
pub fn canonical_index(a: u8, b: u8) -> usize {
    debug_assert!(a < b && b < 52);
    let a = a as usize;
    let b = b as usize;
    a * 52 - a * (a + 1) / 2 + b - a - 1
}

/// Heads-up showdown: 0 if h1 wins, 1 if h2 wins, 2 on a tie.
pub fn evaluate_showdown(h1: [u8; 2], h2: [u8; 2], board: [u8; 5]) -> GtoResult<u8> {
    check_no_duplicates(&[h1[0], h1[1], h2[0], h2[1], board[0], board[1], board[2], board[3], board[4]])?;

    let v1 = evaluate7(&seven_card_hand(h1, &board));
    let v2 = evaluate7(&seven_card_hand(h2, &board));
    Ok(match v1.cmp(&v2) {
        std::cmp::Ordering::Greater => 0,
        std::cmp::Ordering::Less => 1,
        std::cmp::Ordering::Equal => 2,
    })
}

/// Multi-way showdown: indices of every hand tied for the maximum value.
pub fn evaluate_multi(hands: &[[u8; 2]], board: [u8; 5]) -> GtoResult<Vec<usize>> {
    if hands.len() > MAX_HANDS {
        return Err(GtoError::TooManyHands(hands.len(), MAX_HANDS));
    }

    let mut all_cards: Vec<u8> = hands.iter().flatten().copied().collect();
    all_cards.extend_from_slice(&board);
    check_no_duplicates(&all_cards)?;

    let values: Vec<u16> = hands.iter().map(|&h| evaluate7(&seven_card_hand(h, &board))).collect();
    let best = *values.iter().max().unwrap_or(&0);
    Ok(values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == best)
        .map(|(i, _)| i)
        .collect())
}

/// Wins/ties for `hand` against every possible opposing 2-card combo, given
/// a complete 5-card board. Always enumerates exactly C(45, 2) = 990 combos.
pub fn river_value(hand: [u8; 2], board: [u8; 5]) -> GtoResult<(u32, u32)> {
    let mut dead = vec![hand[0], hand[1]];
    dead.extend_from_slice(&board);
    check_no_duplicates(&dead)?;

    let remaining = remaining_deck(&dead);
    debug_assert_eq!(remaining.len(), 45);

    let partial = hoist_board(&board);
    let my_rank = evaluate_hand(&partial, hand[0], hand[1]);

    let (wins, ties) = remaining
        .iter()
        .enumerate()
        .flat_map(|(i, &c1)| remaining[i + 1..].iter().map(move |&c2| (c1, c2)))
        .fold((0u32, 0u32), |(wins, ties), (c1, c2)| {
            let his_rank = evaluate_hand(&partial, c1, c2);
            match my_rank.cmp(&his_rank) {
                std::cmp::Ordering::Greater => (wins + 1, ties),
                std::cmp::Ordering::Equal => (wins, ties + 1),
                std::cmp::Ordering::Less => (wins, ties),
            }
        });

    Ok((wins, ties))
}

fn equity_shares(hands: &[[u8; 2]], board: [u8; 5]) -> GtoResult<Vec<f64>> {
    let winners = evaluate_multi(hands, board)?;
    let mut shares = vec![0.0; hands.len()];
    let share = 1.0 / winners.len() as f64;
    for w in winners {
        shares[w] = share;
    }
    Ok(shares)
}

/// Enumerates every remaining runout for the board (0..=4 cards given,
/// filled out to 5) and every hand's equity share of each, normalized by
/// runout count. Covers the remaining cards uniformly regardless of how
/// many board cards are already fixed.
pub fn full_enumerate(hands: &[[u8; 2]], board_prefix: &[u8]) -> GtoResult<Vec<f64>> {
    if hands.len() > MAX_HANDS {
        return Err(GtoError::TooManyHands(hands.len(), MAX_HANDS));
    }
    debug_assert!(board_prefix.len() <= 4, "board prefix must have at most 4 cards");

    let mut dead: Vec<u8> = hands.iter().flatten().copied().collect();
    dead.extend_from_slice(board_prefix);
    check_no_duplicates(&dead)?;

    let remaining = remaining_deck(&dead);
    let cards_needed = 5 - board_prefix.len();

    let runouts: Vec<Vec<u8>> = remaining
        .iter()
        .copied()
        .combinations(cards_needed)
        .collect();
    debug_assert_eq!(runouts.len(), n_choose_k(remaining.len(), cards_needed));

    let totals = runouts
        .par_iter()
        .map(|draw| {
            let mut board = [0u8; 5];
            board[..board_prefix.len()].copy_from_slice(board_prefix);
            board[board_prefix.len()..].copy_from_slice(draw);
            equity_shares(hands, board)
        })
        .collect::<GtoResult<Vec<Vec<f64>>>>()?;

    let n = totals.len() as f64;
    let mut equities = vec![0.0; hands.len()];
    for shares in &totals {
        for (eq, &s) in equities.iter_mut().zip(shares.iter()) {
            *eq += s;
        }
    }
    for eq in &mut equities {
        *eq /= n;
    }
    Ok(equities)
}

/// Deals a single random runout from `remaining`, filling `cards_needed`
/// board slots. The default collaborator (`ThreadRngDealer`) backs
/// `monte_carlo`; callers needing a seeded or deterministic RNG implement
/// this trait themselves.
pub trait Dealer {
    fn init_deck(&mut self, dead: &[u8]);
    fn deal(&mut self, n: usize) -> Vec<u8>;
}

#[derive(Default)]
pub struct ThreadRngDealer {
    deck: Vec<u8>,
}

impl Dealer for ThreadRngDealer {
    fn init_deck(&mut self, dead: &[u8]) {
        self.deck = remaining_deck(dead);
    }

    fn deal(&mut self, n: usize) -> Vec<u8> {
        let mut rng = rand::thread_rng();
        self.deck.shuffle(&mut rng);
        self.deck[..n].to_vec()
    }
}

/// Samples `nruns` random runouts instead of enumerating them exhaustively,
/// using the default `rand`-backed dealer. Trials run in parallel via
/// `rayon`; results are invariant to the degree of parallelism.
pub fn monte_carlo(hands: &[[u8; 2]], board_prefix: &[u8], nruns: usize) -> GtoResult<Vec<f64>> {
    monte_carlo_with(hands, board_prefix, nruns, ThreadRngDealer::default)
}

/// Same as [`monte_carlo`] but with a caller-supplied dealer factory, so a
/// test or a caller that needs reproducibility can substitute a seeded RNG.
pub fn monte_carlo_with<D, F>(
    hands: &[[u8; 2]],
    board_prefix: &[u8],
    nruns: usize,
    make_dealer: F,
) -> GtoResult<Vec<f64>>
where
    D: Dealer,
    F: Fn() -> D + Sync,
{
    if hands.len() > MAX_HANDS {
        return Err(GtoError::TooManyHands(hands.len(), MAX_HANDS));
    }
    debug_assert!(board_prefix.len() <= 4, "board prefix must have at most 4 cards");

    let mut dead: Vec<u8> = hands.iter().flatten().copied().collect();
    dead.extend_from_slice(board_prefix);
    check_no_duplicates(&dead)?;

    let cards_needed = 5 - board_prefix.len();

    let totals = (0..nruns)
        .into_par_iter()
        .map(|_| {
            let mut dealer = make_dealer();
            dealer.init_deck(&dead);
            let draw = dealer.deal(cards_needed);

            let mut board = [0u8; 5];
            board[..board_prefix.len()].copy_from_slice(board_prefix);
            board[board_prefix.len()..].copy_from_slice(&draw);
            equity_shares(hands, board)
        })
        .collect::<GtoResult<Vec<Vec<f64>>>>()?;

    let n = nruns as f64;
    let mut equities = vec![0.0; hands.len()];
    for shares in &totals {
        for (eq, &s) in equities.iter_mut().zip(shares.iter()) {
            *eq += s;
        }
    }
    for eq in &mut equities {
        *eq /= n;
    }
    Ok(equities)
}

/// Caller-supplied mapping of each of the 1,326 canonical starting hands to
/// a group id in [0, 32], bound and validated once then passed by value.
/// Never cached by identity: rebinding simply produces a new value.
pub struct PreflopGroups {
    groups: Vec<u8>,
}

impl PreflopGroups {
    pub fn from_list(groups: &[u8]) -> GtoResult<Self> {
        if groups.len() != NUM_STARTING_HANDS {
            return Err(GtoError::BadGroupTable("group list must have exactly 1326 entries"));
        }
        if groups.iter().any(|&g| g > MAX_GROUP_ID) {
            return Err(GtoError::BadGroupTable("group id exceeds the maximum of 32"));
        }
        Ok(PreflopGroups { groups: groups.to_vec() })
    }

    pub fn from_map(map: &HashMap<(u8, u8), u8>) -> GtoResult<Self> {
        let mut groups = vec![None; NUM_STARTING_HANDS];
        for (&(c1, c2), &g) in map {
            if c1 as usize >= 52 || c2 as usize >= 52 || c1 == c2 {
                return Err(GtoError::BadGroupTable("starting-hand key contains an invalid card"));
            }
            if g > MAX_GROUP_ID {
                return Err(GtoError::BadGroupTable("group id exceeds the maximum of 32"));
            }
            let (a, b) = if c1 < c2 { (c1, c2) } else { (c2, c1) };
            groups[canonical_index(a, b)] = Some(g);
        }
        if groups.iter().any(Option::is_none) {
            return Err(GtoError::BadGroupTable("group map is missing one or more starting hands"));
        }
        Ok(PreflopGroups {
            groups: groups.into_iter().map(Option::unwrap).collect(),
        })
    }

    fn group_of(&self, a: u8, b: u8) -> u8 {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.groups[canonical_index(lo, hi)]
    }
}

/// For a fixed hand and complete board, bucket every possible opposing
/// 2-card combo by its preflop group and accumulate `2*wins + ties`. The
/// output has one slot per group id actually used, up to 33.
pub fn river_distribution(hand: [u8; 2], board: [u8; 5], groups: &PreflopGroups) -> GtoResult<Vec<u32>> {
    let mut dead = vec![hand[0], hand[1]];
    dead.extend_from_slice(&board);
    check_no_duplicates(&dead)?;

    let partial = hoist_board(&board);
    let my_rank = evaluate_hand(&partial, hand[0], hand[1]);
    let mut chart = vec![0u32; (MAX_GROUP_ID as usize) + 1];

    let dead_set: [bool; 52] = {
        let mut set = [false; 52];
        for &c in &dead {
            set[c as usize] = true;
        }
        set
    };

    for a in 0u8..52 {
        if dead_set[a as usize] {
            continue;
        }
        for b in (a + 1)..52 {
            if dead_set[b as usize] {
                continue;
            }
            let his_rank = evaluate_hand(&partial, a, b);
            let group = groups.group_of(a, b) as usize;
            match my_rank.cmp(&his_rank) {
                std::cmp::Ordering::Greater => chart[group] += 2,
                std::cmp::Ordering::Equal => chart[group] += 1,
                std::cmp::Ordering::Less => {}
            }
        }
    }
    Ok(chart)
}

/// Aggregate win/tie/lose equity of a hero hand against an entire range,
/// as sampled by Monte Carlo. Ambient convenience over `monte_carlo` and
/// the card model's range parser; not a new evaluation algorithm.
pub struct RangeEquity {
    pub win: f64,
    pub tie: f64,
    pub lose: f64,
    pub simulations: usize,
}

/// Expands `villain_range` (a list of range tokens such as `"AKs"`, `"77"`,
/// `"AQo"`, or exact combos), excludes any combo sharing a card with
/// `hero`/`board`, and reports aggregate equity against the remaining
/// combos via Monte Carlo sampling of the board runout, one random villain
/// combo per trial.
pub fn range_equity(
    hero: [Card; 2],
    board: &[Card],
    villain_range: &[String],
    nruns: usize,
) -> GtoResult<RangeEquity> {
    let hero_idx = [card_to_index(&hero[0]), card_to_index(&hero[1])];
    let board_idx: Vec<u8> = board.iter().map(card_to_index).collect();

    let dead_set: std::collections::HashSet<Card> =
        hero.iter().chain(board.iter()).copied().collect();

    let mut villain_combos: Vec<[u8; 2]> = Vec::new();
    for token in villain_range {
        for (c1, c2) in hand_combos(token)? {
            if !dead_set.contains(&c1) && !dead_set.contains(&c2) {
                villain_combos.push([card_to_index(&c1), card_to_index(&c2)]);
            }
        }
    }
    if villain_combos.is_empty() {
        return Err(GtoError::NoValidCombos);
    }

    let cards_needed = 5 - board_idx.len();

    let (wins, ties, losses) = (0..nruns)
        .into_par_iter()
        .map(|i| {
            let villain = villain_combos[i % villain_combos.len()];
            let mut dead = hero_idx.to_vec();
            dead.extend_from_slice(&board_idx);
            dead.extend_from_slice(&villain);

            let mut dealer = ThreadRngDealer::default();
            dealer.init_deck(&dead);
            let draw = dealer.deal(cards_needed);

            let mut board5 = [0u8; 5];
            board5[..board_idx.len()].copy_from_slice(&board_idx);
            board5[board_idx.len()..].copy_from_slice(&draw);

            let my_rank = evaluate7(&seven_card_hand(hero_idx, &board5));
            let his_rank = evaluate7(&seven_card_hand(villain, &board5));
            match my_rank.cmp(&his_rank) {
                std::cmp::Ordering::Greater => (1u64, 0u64, 0u64),
                std::cmp::Ordering::Equal => (0, 1, 0),
                std::cmp::Ordering::Less => (0, 0, 1),
            }
        })
        .reduce(|| (0, 0, 0), |(w1, t1, l1), (w2, t2, l2)| (w1 + w2, t1 + t2, l1 + l2));

    let total = (wins + ties + losses) as f64;
    Ok(RangeEquity {
        win: wins as f64 / total,
        tie: ties as f64 / total,
        lose: losses as f64 / total,
        simulations: nruns,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn c(rank_idx: u8, suit_idx: u8) -> u8 {
        rank_idx * 4 + suit_idx
    }

    #[test]
    fn canonical_index_spans_full_range() {
        let first = canonical_index(0, 1);
        let last = canonical_index(50, 51);
        assert_eq!(first, 0);
        assert_eq!(last, NUM_STARTING_HANDS - 1);
    }

    #[test]
    fn showdown_detects_duplicate_cards() {
        let h1 = [c(0, 0), c(1, 0)];
        let h2 = [c(0, 0), c(2, 0)];
        let board = [c(3, 0), c(4, 0), c(5, 0), c(6, 0), c(7, 0)];
        assert_eq!(evaluate_showdown(h1, h2, board), Err(GtoError::DuplicateCards));
    }

    #[test]
    fn showdown_tie_on_shared_board_straight_flush() {
        // Ac Ad vs Kc Kd on a 2s3s4s5s6s board: both play the board.
        let h1 = [c(0, 0), c(0, 1)];
        let h2 = [c(1, 0), c(1, 1)];
        let board = [c(12, 3), c(11, 3), c(10, 3), c(9, 3), c(8, 3)];
        assert_eq!(evaluate_showdown(h1, h2, board), Ok(2));
    }

    #[test]
    fn showdown_rejects_out_of_range_card() {
        let h1 = [52, c(1, 0)];
        let h2 = [c(2, 0), c(3, 0)];
        let board = [c(4, 0), c(5, 0), c(6, 0), c(7, 0), c(8, 0)];
        assert_eq!(evaluate_showdown(h1, h2, board), Err(GtoError::InvalidCard(52)));
    }

    #[test]
    fn evaluate_multi_rejects_too_many_hands() {
        let hands: Vec<[u8; 2]> = (0..23u8).map(|i| [c(0, 0), c((i % 12) + 1, i % 4)]).collect();
        let board = [c(0, 1), c(0, 2), c(0, 3), c(1, 1), c(1, 2)];
        assert_eq!(evaluate_multi(&hands, board), Err(GtoError::TooManyHands(23, MAX_HANDS)));
    }

    #[test]
    fn river_value_counts_990_outcomes() {
        let hand = [c(0, 0), c(0, 1)];
        let board = [c(1, 2), c(1, 3), c(2, 0), c(3, 0), c(4, 0)];
        let (wins, ties) = river_value(hand, board).unwrap();
        assert!(wins + ties <= 990);
    }

    #[test]
    fn full_enumeration_equities_sum_to_one() {
        let hands = vec![[c(0, 0), c(0, 1)], [c(1, 0), c(1, 1)]];
        let equities = full_enumerate(&hands, &[]).unwrap();
        let sum: f64 = equities.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn preflop_groups_rejects_wrong_size() {
        let groups = vec![0u8; 10];
        assert!(PreflopGroups::from_list(&groups).is_err());
    }

    #[test]
    fn river_distribution_matches_river_value_for_constant_group() {
        let hand = [c(0, 0), c(0, 1)];
        let board = [c(1, 2), c(1, 3), c(2, 0), c(3, 0), c(4, 0)];
        let groups = PreflopGroups::from_list(&vec![0u8; NUM_STARTING_HANDS]).unwrap();

        let chart = river_distribution(hand, board, &groups).unwrap();
        let (wins, ties) = river_value(hand, board).unwrap();
        assert_eq!(chart[0], 2 * wins + ties);
    }

    #[test]
    fn monte_carlo_equities_sum_to_one() {
        let hands = vec![[c(0, 0), c(0, 1)], [c(1, 0), c(1, 1)]];
        let equities = monte_carlo(&hands, &[], 200).unwrap();
        let sum: f64 = equities.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn range_equity_rejects_fully_blocked_range() {
        use crate::cards::{Card, Rank, Suit};
        let hero = [Card::new(Rank::Ace, Suit::Spades), Card::new(Rank::Ace, Suit::Hearts)];
        let villain_range = vec!["AA".to_string()];
        let result = range_equity(hero, &[], &villain_range, 100);
        assert_eq!(result.err(), Some(GtoError::NoValidCombos));
    }

    #[test]
    fn range_equity_fractions_sum_to_one() {
        use crate::cards::{Card, Rank, Suit};
        let hero = [Card::new(Rank::Ace, Suit::Spades), Card::new(Rank::Ace, Suit::Hearts)];
        let villain_range = vec!["KK".to_string()];
        let result = range_equity(hero, &[], &villain_range, 200).unwrap();
        assert_relative_eq!(result.win + result.tie + result.lose, 1.0, epsilon = 1e-9);
    }
}
