//! Head-to-head evaluation of two estimators.

use rayon::prelude::*;
use tracing::debug;

use crate::game::{AtaxxRules, Player};
use crate::mcts::MctsSearch;
use crate::nn::Evaluator;
use crate::rng::GameRng;

use super::self_play::{capped_outcome, choose_action, SelfPlayConfig};
use super::TrainingError;

/// Tallied arena results from the challenger's perspective.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArenaOutcome {
    pub challenger_wins: u32,
    pub incumbent_wins: u32,
    pub draws: u32,
}

impl ArenaOutcome {
    fn absorb(&mut self, result: f32) {
        if result > 0.5 {
            self.challenger_wins += 1;
        } else if result < -0.5 {
            self.incumbent_wins += 1;
        } else {
            self.draws += 1;
        }
    }
}

/// Promotion gate: the challenger must take at least `threshold` of the
/// decisive games. An all-draw arena never promotes.
#[must_use]
pub fn should_promote(incumbent_wins: u32, challenger_wins: u32, threshold: f32) -> bool {
    let decisive = incumbent_wins + challenger_wins;
    if decisive == 0 {
        return false;
    }
    challenger_wins as f32 / decisive as f32 >= threshold
}

/// Play one arena game at temperature 0 and return the outcome from the
/// first mover's perspective (`+1` win, `-1` loss, epsilon-scale draw).
/// Games that hit the ply cap are scored by piece count, exactly as in
/// self-play.
///
/// Each side owns a fresh search table; nothing persists across games.
pub fn play_game<A: Evaluator, B: Evaluator>(
    rules: &AtaxxRules,
    first: &A,
    second: &B,
    config: &SelfPlayConfig,
    mut rng: GameRng,
) -> Result<f32, TrainingError> {
    let mut first_search = MctsSearch::new(rules, first, config.mcts.clone(), rng.fork());
    let mut second_search = MctsSearch::new(rules, second, config.mcts.clone(), rng.fork());

    let mut board = rules.initial();
    let mut player = Player::Red;
    let mut plies = 0u32;

    loop {
        let terminal = rules.value(&board, player);
        if terminal != 0.0 {
            // `terminal` is relative to the side left to move; the first
            // mover is Red, so flip for Blue.
            return Ok(terminal * f32::from(player.sign()));
        }
        if plies >= config.max_plies {
            // Capped games are scored by piece count, same as self-play.
            return Ok(capped_outcome(&board, player) * f32::from(player.sign()));
        }

        let canonical = rules.canonical(&board, player);
        let policy = match player {
            Player::Red => first_search.policy(&canonical, 0.0)?,
            Player::Blue => second_search.policy(&canonical, 0.0)?,
        };
        let action = choose_action(&policy, &mut rng);

        board = rules.apply(&board, player, action)?;
        player = player.opponent();
        plies += 1;
    }
}

/// Play the configured arena schedule, challenger and incumbent each
/// starting half the games, in parallel. Results are tallied from the
/// challenger's perspective; draws count toward neither side.
pub fn compare<A, B>(
    rules: &AtaxxRules,
    incumbent: &A,
    challenger: &B,
    config: &SelfPlayConfig,
    rng: &mut GameRng,
) -> Result<ArenaOutcome, TrainingError>
where
    A: Evaluator + Sync,
    B: Evaluator + Sync,
{
    let games = config.arena_games;
    let seeds: Vec<(u32, GameRng)> = (0..games).map(|i| (i, rng.fork())).collect();

    let results: Vec<f32> = seeds
        .into_par_iter()
        .map(|(index, game_rng)| {
            let challenger_first = index < games / 2;
            let result = if challenger_first {
                play_game(rules, challenger, incumbent, config, game_rng)?
            } else {
                -play_game(rules, incumbent, challenger, config, game_rng)?
            };
            Ok(result)
        })
        .collect::<Result<_, TrainingError>>()?;

    let mut outcome = ArenaOutcome::default();
    for result in results {
        outcome.absorb(result);
    }
    debug!(
        challenger_wins = outcome.challenger_wins,
        incumbent_wins = outcome.incumbent_wins,
        draws = outcome.draws,
        "arena complete"
    );
    Ok(outcome)
}
