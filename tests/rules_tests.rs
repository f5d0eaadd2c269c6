//! Property tests for the rules engine over random playouts.

use proptest::prelude::*;

use ataxx_zero::{AtaxxRules, Board, GameRng, Player, EPS};

/// Play up to `plies` random legal moves from the start, collecting every
/// board reached. Stops early at a terminal position.
fn random_playout(rules: &AtaxxRules, seed: u64, plies: u32) -> Vec<(Board, Player)> {
    let mut rng = GameRng::new(seed);
    let mut board = rules.initial();
    let mut player = Player::Red;
    let mut visited = vec![(board, player)];

    for _ in 0..plies {
        if rules.value(&board, player) != 0.0 {
            break;
        }
        let mask = rules.legal_actions(&board, player);
        let legal: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|(_, &l)| l)
            .map(|(i, _)| i)
            .collect();
        let action = legal[rng.gen_range_usize(0..legal.len())];
        board = rules.apply(&board, player, action).unwrap();
        player = player.opponent();
        visited.push((board, player));
    }
    visited
}

proptest! {
    #[test]
    fn occupancy_never_drops_and_grows_by_at_most_one(seed in any::<u64>()) {
        let rules = AtaxxRules::new();
        let states = random_playout(&rules, seed, 60);
        for pair in states.windows(2) {
            let before = pair[0].0.occupancy();
            let after = pair[1].0.occupancy();
            prop_assert!(after == before || after == before + 1);
        }
    }

    #[test]
    fn every_legal_action_applies_cleanly(seed in any::<u64>()) {
        let rules = AtaxxRules::new();
        for (board, player) in random_playout(&rules, seed, 40) {
            for (action, &legal) in rules.legal_actions(&board, player).iter().enumerate() {
                if legal {
                    prop_assert!(rules.apply(&board, player, action).is_ok());
                }
            }
        }
    }

    #[test]
    fn canonicalization_is_an_involution(seed in any::<u64>()) {
        let rules = AtaxxRules::new();
        for (board, _) in random_playout(&rules, seed, 40) {
            for player in [Player::Red, Player::Blue] {
                let twice = rules.canonical(&rules.canonical(&board, player), player);
                prop_assert_eq!(twice, board);
            }
        }
    }

    #[test]
    fn canonical_mover_is_always_positive(seed in any::<u64>()) {
        let rules = AtaxxRules::new();
        for (board, player) in random_playout(&rules, seed, 40) {
            let canonical = rules.canonical(&board, player);
            let mask = rules.legal_actions(&canonical, Player::Red);
            let original = rules.legal_actions(&board, player);
            prop_assert_eq!(mask, original);
        }
    }

    #[test]
    fn value_is_antisymmetric_except_draws(seed in any::<u64>()) {
        let rules = AtaxxRules::new();
        for (board, _) in random_playout(&rules, seed, 80) {
            let red = rules.value(&board, Player::Red);
            let blue = rules.value(&board, Player::Blue);
            if red == EPS || blue == EPS {
                prop_assert_eq!(red, blue);
            } else {
                prop_assert_eq!(red, -blue);
            }
        }
    }

    #[test]
    fn pass_leaves_the_board_unchanged(seed in any::<u64>()) {
        let rules = AtaxxRules::new();
        for (board, player) in random_playout(&rules, seed, 20) {
            let next = rules.apply(&board, player, 0).unwrap();
            prop_assert_eq!(next, board);
        }
    }
}

#[test]
fn playouts_terminate_within_the_jump_budget() {
    // Random play must eventually end: the board fills up or the jump
    // counter reaches its limit.
    let rules = AtaxxRules::new();
    for seed in 0..5 {
        let states = random_playout(&rules, seed, 10_000);
        let (board, player) = states.last().copied().unwrap();
        assert_ne!(rules.value(&board, player), 0.0);
    }
}
