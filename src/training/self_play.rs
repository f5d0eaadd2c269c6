//! Self-play game generation and action sampling.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::game::{AtaxxRules, Board, Player, EPS};
use crate::mcts::{MctsConfig, MctsSearch};
use crate::nn::Evaluator;
use crate::rng::GameRng;

use super::example::Example;
use super::TrainingError;

/// Knobs for the whole training loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    /// Learning iterations (generate / train / evaluate cycles).
    pub learning_iterations: u32,

    /// Self-play games generated per learning iteration.
    pub games_per_iteration: u32,

    /// Plies played at temperature 1 before switching to temperature 0.
    pub temperature_threshold: u32,

    /// Safety cap on plies per game; games at the cap are scored by
    /// piece count.
    pub max_plies: u32,

    /// Arena games per evaluation, split evenly between first movers.
    pub arena_games: u32,

    /// Minimum share of decisive arena wins required to promote.
    pub promotion_threshold: f32,

    /// Iteration batches retained in the rolling example history.
    pub history_batches: usize,

    /// Directory holding the `temp-model` / `best-model` snapshots.
    pub snapshot_dir: PathBuf,

    /// Search settings shared by self-play and arena games.
    pub mcts: MctsConfig,

    /// Root seed; every game forks its own stream from it.
    pub seed: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            learning_iterations: 100,
            games_per_iteration: 10,
            temperature_threshold: 100,
            max_plies: 500,
            arena_games: 40,
            promotion_threshold: 0.6,
            history_batches: 20,
            snapshot_dir: PathBuf::from("checkpoints"),
            mcts: MctsConfig::default(),
            seed: 0,
        }
    }
}

impl SelfPlayConfig {
    pub fn with_learning_iterations(mut self, n: u32) -> Self {
        self.learning_iterations = n;
        self
    }

    pub fn with_games_per_iteration(mut self, n: u32) -> Self {
        self.games_per_iteration = n;
        self
    }

    pub fn with_arena_games(mut self, n: u32) -> Self {
        self.arena_games = n;
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn with_mcts(mut self, mcts: MctsConfig) -> Self {
        self.mcts = mcts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Sample an action index from a distribution by cumulative sum against
/// a uniform draw: the first index whose cumulative mass exceeds the
/// draw wins. If rounding leaves the total just below the draw, the
/// fallback is the last index carrying mass, never a zero-mass action.
pub fn choose_action(policy: &[f32], rng: &mut GameRng) -> usize {
    let draw = rng.gen_f32();
    let mut cumulative = 0.0;
    let mut last_with_mass = 0;
    for (index, &p) in policy.iter().enumerate() {
        if p > 0.0 {
            last_with_mass = index;
        }
        cumulative += p;
        if cumulative > draw {
            return index;
        }
    }
    last_with_mass
}

struct PlyRecord {
    board: Board,
    policy: Vec<f32>,
    mover: Player,
}

/// Score a capped game by piece count from `player`'s perspective.
pub(crate) fn capped_outcome(board: &Board, player: Player) -> f32 {
    let (red, blue) = board.piece_counts();
    let lead = i32::from(player.sign()) * (red as i32 - blue as i32);
    if lead > 0 {
        1.0
    } else if lead < 0 {
        -1.0
    } else {
        EPS
    }
}

/// Play one self-play game to the terminal condition (or the ply cap)
/// and convert the recorded plies into training examples.
///
/// The search table is fresh for this game and persists across its
/// plies. Example values are the terminal outcome sign-flipped to each
/// recorded mover's perspective.
pub fn play_training_game<E: Evaluator>(
    rules: &AtaxxRules,
    evaluator: &E,
    config: &SelfPlayConfig,
    mut rng: GameRng,
) -> Result<Vec<Example>, TrainingError> {
    let mut search = MctsSearch::new(rules, evaluator, config.mcts.clone(), rng.fork());

    let mut board = rules.initial();
    let mut player = Player::Red;
    let mut plies = 0u32;
    let mut records = Vec::new();

    let outcome = loop {
        let terminal = rules.value(&board, player);
        if terminal != 0.0 {
            break terminal;
        }
        if plies >= config.max_plies {
            break capped_outcome(&board, player);
        }

        let canonical = rules.canonical(&board, player);
        let temperature = if plies < config.temperature_threshold {
            1.0
        } else {
            0.0
        };
        let policy = search.policy(&canonical, temperature)?;
        let action = choose_action(&policy, &mut rng);

        records.push(PlyRecord {
            board: canonical,
            policy,
            mover: player,
        });

        board = rules.apply(&board, player, action)?;
        player = player.opponent();
        plies += 1;
    };

    // `outcome` is relative to the player left to move; flip it for the
    // other side's recorded plies.
    Ok(records
        .into_iter()
        .map(|record| Example {
            board: record.board,
            policy: record.policy,
            value: if record.mover == player {
                outcome
            } else {
                -outcome
            },
        })
        .collect())
}
