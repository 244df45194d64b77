//! End-to-end scenarios named directly in the equity driver contract.

use approx::assert_relative_eq;
use holdem_equity::card_encoding::card_to_index;
use holdem_equity::cards::Card;
use holdem_equity::equity::{evaluate_showdown, full_enumerate, river_distribution, river_value, PreflopGroups};

fn idx(notation: &str) -> u8 {
    card_to_index(&Card::parse(notation).unwrap())
}

#[test]
fn heads_up_showdown_ties_on_shared_board_straight_flush() {
    let h1 = [idx("Ac"), idx("Ad")];
    let h2 = [idx("Kc"), idx("Kd")];
    let board = [idx("2s"), idx("3s"), idx("4s"), idx("5s"), idx("6s")];
    assert_eq!(evaluate_showdown(h1, h2, board).unwrap(), 2);
}

#[test]
fn river_value_enumerates_all_990_opponents() {
    // Aces full of kings: loses only to the single KK combo that completes
    // quad kings (Kh+Ks, the board already holds Kc+Kd), ties with nothing.
    let hand = [idx("Ac"), idx("Ad")];
    let board = [idx("Ah"), idx("Kc"), idx("Kd"), idx("2s"), idx("3s")];
    let (wins, ties) = river_value(hand, board).unwrap();
    assert_eq!((wins, ties), (989, 0));
    assert_eq!(wins + ties, 989);
}

#[test]
fn river_distribution_with_constant_group_matches_river_value() {
    let hand = [idx("Ac"), idx("Ad")];
    let board = [idx("Ah"), idx("Kc"), idx("Kd"), idx("2s"), idx("3s")];

    let groups = PreflopGroups::from_list(&vec![0u8; 1326]).unwrap();
    let chart = river_distribution(hand, board, &groups).unwrap();
    let (wins, ties) = river_value(hand, board).unwrap();

    assert_eq!(chart[0], 2 * wins + ties);
    assert_eq!(chart[1..].iter().sum::<u32>(), 0);
}

#[test]
fn full_enumeration_with_two_hands_and_empty_board_sums_to_one() {
    let hands = vec![[idx("Ac"), idx("Ad")], [idx("Kc"), idx("Kd")]];
    let equities = full_enumerate(&hands, &[]).unwrap();
    let sum: f64 = equities.iter().sum();
    assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
    // pocket aces should dominate pocket kings heads-up preflop
    assert!(equities[0] > equities[1]);
}

#[test]
fn full_enumeration_with_turn_board_given_sums_to_one() {
    let hands = vec![[idx("Ac"), idx("Ad")], [idx("Kc"), idx("Kd")]];
    let board_prefix = [idx("2s"), idx("7h"), idx("9c"), idx("Jd")];
    let equities = full_enumerate(&hands, &board_prefix).unwrap();
    let sum: f64 = equities.iter().sum();
    assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
}
