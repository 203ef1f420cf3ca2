//! Batch win-rate exploration over every three-fighter party.
//!
//! A consumer of the public engine API: each party runs the standard
//! campaign several times through reset-and-start cycles on one run context,
//! and the best performers are reported as JSON.

use gauntlet_core::{
    BattleOptions, Command, FighterDefinition, FighterId, LoadoutMap, RunOptions, RunStatus,
    StageOutcome,
};
use gauntlet_run::{apply, query, Run};
use gauntlet_skirmish::SkirmishSimulator;
use gauntlet_system_progression::start_run;
use serde::Serialize;
use tracing::{debug, info};

use crate::roster::default_loadout;

const TOP_PARTIES: usize = 10;
const PROGRESS_INTERVAL: usize = 200;

/// Parameters for one exploration sweep.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Exploration {
    /// Campaign attempts per party.
    pub runs: u32,
    /// Optional cap on the number of parties evaluated.
    pub limit: Option<usize>,
    /// Base seed for the simulator streams.
    pub seed: u64,
}

/// Aggregate outcome of an exploration sweep.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExplorationReport {
    /// Campaign attempts per party.
    pub runs: u32,
    /// Number of parties evaluated.
    pub evaluated: usize,
    /// Best-performing parties, strongest first.
    pub top: Vec<PartySummary>,
}

/// Win-rate summary for one evaluated party.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartySummary {
    /// Fighter ids composing the party.
    pub party: Vec<FighterId>,
    /// Completed campaigns out of `runs` attempts.
    pub wins: u32,
    /// Fraction of attempts that completed the campaign.
    pub win_rate: f64,
    /// Average number of stages cleared per attempt.
    pub avg_cleared: f64,
}

/// Evaluates every three-fighter combination of the non-boss roster.
pub(crate) fn run_exploration(
    fighters: Vec<FighterDefinition>,
    options: &Exploration,
) -> ExplorationReport {
    let mut run = Run::new(fighters);
    let candidates: Vec<FighterId> = query::fighter_table(&run)
        .ids()
        .filter(|id| !id.as_str().contains("_boss"))
        .cloned()
        .collect();

    let mut summaries = Vec::new();
    let mut evaluated = 0_usize;

    'combos: for first in 0..candidates.len() {
        for second in (first + 1)..candidates.len() {
            for third in (second + 1)..candidates.len() {
                if let Some(limit) = options.limit {
                    if evaluated >= limit {
                        break 'combos;
                    }
                }

                let party = vec![
                    candidates[first].clone(),
                    candidates[second].clone(),
                    candidates[third].clone(),
                ];
                summaries.push(evaluate_party(&mut run, party, options));
                evaluated += 1;

                if evaluated % PROGRESS_INTERVAL == 0 {
                    info!(evaluated, "exploration progress");
                }
            }
        }
    }

    summaries.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then(b.avg_cleared.total_cmp(&a.avg_cleared))
    });
    summaries.truncate(TOP_PARTIES);

    ExplorationReport {
        runs: options.runs,
        evaluated,
        top: summaries,
    }
}

fn evaluate_party(run: &mut Run, party: Vec<FighterId>, options: &Exploration) -> PartySummary {
    let mut events = Vec::new();
    let mut wins = 0_u32;
    let mut cleared_total = 0_u32;

    for attempt in 0..options.runs {
        apply(run, Command::Reset, &mut events);

        let loadouts = staged_loadouts(run, &party);
        apply(run, Command::SetLoadouts { loadouts }, &mut events);

        let mut simulator = SkirmishSimulator::new(options.seed.wrapping_add(u64::from(attempt)));
        let run_options = RunOptions {
            auto: true,
            battle: BattleOptions {
                log: false,
                track_stats: false,
            },
        };
        if start_run(run, &mut simulator, party.clone(), &run_options, &mut events).is_err() {
            debug!("skipping malformed party");
            continue;
        }

        if query::status(run) == RunStatus::Completed {
            wins += 1;
        }
        cleared_total += query::results(run)
            .iter()
            .filter(|result| result.outcome == StageOutcome::Cleared)
            .count() as u32;

        events.clear();
    }

    let attempts = f64::from(options.runs.max(1));
    PartySummary {
        party,
        wins,
        win_rate: f64::from(wins) / attempts,
        avg_cleared: f64::from(cleared_total) / attempts,
    }
}

/// Default loadouts for every party member, staged before each attempt the
/// same way an interactive front-end would.
fn staged_loadouts(run: &Run, party: &[FighterId]) -> LoadoutMap {
    let view = query::fighter_table(run);
    party
        .iter()
        .map(|id| (id.clone(), default_loadout(&view.resolve(id))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster;

    #[test]
    fn limited_explorations_evaluate_the_requested_count() {
        let fighters = roster::load(None).expect("demo roster loads");
        let report = run_exploration(
            fighters,
            &Exploration {
                runs: 2,
                limit: Some(3),
                seed: 11,
            },
        );

        assert_eq!(report.evaluated, 3);
        assert_eq!(report.runs, 2);
        assert!(report.top.len() <= 3);
        for summary in &report.top {
            assert_eq!(summary.party.len(), 3);
            assert!(summary.win_rate >= 0.0 && summary.win_rate <= 1.0);
        }
    }

    #[test]
    fn rankings_are_sorted_strongest_first() {
        let fighters = roster::load(None).expect("demo roster loads");
        let report = run_exploration(
            fighters,
            &Exploration {
                runs: 3,
                limit: Some(6),
                seed: 5,
            },
        );

        for pair in report.top.windows(2) {
            assert!(
                pair[0].win_rate >= pair[1].win_rate,
                "rankings must be non-increasing"
            );
        }
    }
}
