#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded stand-in battle resolver for binaries and integration tests.
//!
//! The engine treats combat as an external collaborator behind the
//! [`BattleSimulator`] trait. This adapter provides a deterministic,
//! coarse-grained implementation of that contract: it weighs the two rosters
//! against each other and samples an outcome from a seed-derived stream. It
//! is NOT a combat engine; it never reads ability magnitudes, targeting
//! rules or cooldowns, and a real turn-by-turn resolver can replace it
//! without touching the engine.

use gauntlet_core::{
    BattleFighter, BattleOptions, BattleReport, BattleSide, BattleSimulator, BattleStats,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const MIN_ROUNDS: u32 = 2;
const MAX_ROUNDS: u32 = 5;

/// Deterministic roster-weighing battle resolver.
///
/// Identical construction seeds and identical call sequences reproduce
/// identical reports, which keeps full campaign runs replayable.
#[derive(Clone, Debug)]
pub struct SkirmishSimulator {
    seed: u64,
    battle_index: u64,
}

impl SkirmishSimulator {
    /// Creates a simulator whose outcome stream derives from `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            battle_index: 0,
        }
    }
}

impl BattleSimulator for SkirmishSimulator {
    fn simulate(
        &mut self,
        side_a: &[BattleFighter],
        side_b: &[BattleFighter],
        options: BattleOptions,
    ) -> BattleReport {
        let battle_seed = derive_battle_seed(self.seed, self.battle_index, side_a, side_b);
        self.battle_index += 1;
        let mut rng = ChaCha8Rng::seed_from_u64(battle_seed);

        let power_a = side_power(side_a);
        let power_b = side_power(side_b);
        let winner = if rng.gen_ratio(power_a, power_a.saturating_add(power_b)) {
            BattleSide::A
        } else {
            BattleSide::B
        };

        let rounds = rng.gen_range(MIN_ROUNDS..=MAX_ROUNDS);
        let combatants = (side_a.len() + side_b.len()) as u32;
        let turns = rounds * combatants;

        let log = if options.log {
            render_log(side_a, side_b, rounds, winner, &mut rng)
        } else {
            String::new()
        };

        let stats = options.track_stats.then(|| BattleStats {
            rounds,
            turns,
            damage_by_fighter: side_a
                .iter()
                .chain(side_b.iter())
                .map(|fighter| (fighter.id.clone(), sample_damage(fighter, rounds, &mut rng)))
                .collect(),
        });

        BattleReport {
            winner,
            log,
            stats,
        }
    }
}

/// Derives the seed for one battle from the simulator seed, the battle's
/// position in the run, and both roster compositions.
fn derive_battle_seed(
    seed: u64,
    battle_index: u64,
    side_a: &[BattleFighter],
    side_b: &[BattleFighter],
) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(battle_index.to_le_bytes());
    for fighter in side_a.iter().chain(side_b.iter()) {
        hasher.update(fighter.id.as_str().as_bytes());
        hasher.update([0]);
    }
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Coarse strength score for one roster. Always at least 1 so the winner
/// ratio stays well defined for empty or crippled sides.
fn side_power(side: &[BattleFighter]) -> u32 {
    let total: i64 = side
        .iter()
        .map(|fighter| {
            i64::from(fighter.max_hp / 4)
                + i64::from(fighter.attack_bonus) * 3
                + i64::from(fighter.defense_bonus) * 2
                + i64::from(fighter.speed)
                + i64::from(fighter.accuracy)
                + i64::from(fighter.evasion)
                + i64::from(fighter.luck)
        })
        .sum();
    u32::try_from(total.max(1)).unwrap_or(1)
}

fn sample_damage(fighter: &BattleFighter, rounds: u32, rng: &mut ChaCha8Rng) -> u32 {
    let base = u32::try_from(fighter.attack_bonus.max(0)).unwrap_or(0) + 2;
    base * rounds + rng.gen_range(0..4)
}

fn render_log(
    side_a: &[BattleFighter],
    side_b: &[BattleFighter],
    rounds: u32,
    winner: BattleSide,
    rng: &mut ChaCha8Rng,
) -> String {
    let mut log = String::new();
    log.push_str(&format!(
        "{} take the field against {}.\n",
        roster_names(side_a),
        roster_names(side_b)
    ));

    for round in 1..=rounds {
        let attacker = pick_name(side_a, rng);
        let defender = pick_name(side_b, rng);
        log.push_str(&format!(
            "Round {round}: {attacker} presses the attack on {defender}.\n"
        ));
    }

    let closing = match winner {
        BattleSide::A => "The party holds the ground.",
        BattleSide::B => "The party is driven back.",
    };
    log.push_str(closing);
    log
}

fn roster_names(side: &[BattleFighter]) -> String {
    if side.is_empty() {
        return "Nobody".to_owned();
    }
    side.iter()
        .map(|fighter| fighter.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn pick_name(side: &[BattleFighter], rng: &mut ChaCha8Rng) -> String {
    if side.is_empty() {
        return "nobody".to_owned();
    }
    let index = rng.gen_range(0..side.len());
    side[index].name.clone()
}
