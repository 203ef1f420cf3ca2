use std::collections::{BTreeMap, VecDeque};

use gauntlet_core::{
    BattleFighter, BattleOptions, BattleReport, BattleSide, BattleSimulator, BattleStats,
    Campaign, Command, EnemyTeam, Event, FighterId, PartyError, RunOptions, RunStatus, Stage,
    StageOutcome, TeamId,
};
use gauntlet_run::{apply, query, Run};
use gauntlet_system_progression::{advance_stage, auto_run, start_run, StageAdvance};

/// Simulator stub that replays a scripted sequence of winners.
///
/// Once the script runs dry every battle goes to side B, and the optional
/// stats template is attached whenever tracking is enabled.
struct Scripted {
    winners: VecDeque<BattleSide>,
    stats: Option<BattleStats>,
}

impl Scripted {
    fn wins(count: usize) -> Self {
        Self {
            winners: std::iter::repeat(BattleSide::A).take(count).collect(),
            stats: None,
        }
    }

    fn losing() -> Self {
        Self {
            winners: VecDeque::new(),
            stats: None,
        }
    }

    fn with_stats(mut self, stats: BattleStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

impl BattleSimulator for Scripted {
    fn simulate(
        &mut self,
        _side_a: &[BattleFighter],
        _side_b: &[BattleFighter],
        options: BattleOptions,
    ) -> BattleReport {
        let winner = self.winners.pop_front().unwrap_or(BattleSide::B);
        BattleReport {
            winner,
            log: if options.log {
                "scripted battle".to_owned()
            } else {
                String::new()
            },
            stats: if options.track_stats {
                self.stats.clone()
            } else {
                None
            },
        }
    }
}

fn party(members: [&str; 3]) -> Vec<FighterId> {
    members.iter().map(|m| FighterId::new(*m)).collect()
}

fn one_stage_run() -> Run {
    let campaign = Campaign::new(
        vec![Stage::team("only", "K9PD")],
        vec![EnemyTeam {
            id: TeamId::new("K9PD"),
            members: vec![
                FighterId::new("thunder_pup"),
                FighterId::new("brass_bunny"),
                FighterId::new("shadow_fox"),
            ],
        }],
        Vec::new(),
    );
    Run::with_campaign(Vec::new(), campaign)
}

fn step_options() -> RunOptions {
    RunOptions {
        auto: false,
        battle: BattleOptions::default(),
    }
}

#[test]
fn undersized_parties_are_rejected_before_any_state_changes() {
    let mut run = one_stage_run();
    let mut simulator = Scripted::losing();
    let mut events = Vec::new();

    let result = start_run(
        &mut run,
        &mut simulator,
        party(["a", "b", "c"])[..2].to_vec(),
        &RunOptions::default(),
        &mut events,
    );

    assert_eq!(result, Err(PartyError::WrongSize { found: 2 }));
    assert_eq!(query::status(&run), RunStatus::NotStarted);
    assert!(events.is_empty());
}

#[test]
fn a_lost_stage_fails_the_run_with_one_recorded_result() {
    let mut run = one_stage_run();
    let mut simulator = Scripted::losing();
    let mut events = Vec::new();

    start_run(
        &mut run,
        &mut simulator,
        party(["A", "B", "C"]),
        &step_options(),
        &mut events,
    )
    .expect("valid party");
    let advance = advance_stage(
        &mut run,
        &mut simulator,
        BattleOptions::default(),
        &mut events,
    );

    assert!(matches!(advance, StageAdvance::Resolved(_)));
    assert_eq!(query::status(&run), RunStatus::Failed);
    let results = query::results(&run);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].outcome, StageOutcome::Failed);
}

#[test]
fn a_won_final_stage_completes_the_run_and_folds_in_stats() {
    let mut run = one_stage_run();
    let mut damage = BTreeMap::new();
    let _ = damage.insert(FighterId::new("A"), 10);
    let _ = damage.insert(FighterId::new("B"), 5);
    let mut simulator = Scripted::wins(1).with_stats(BattleStats {
        rounds: 3,
        turns: 9,
        damage_by_fighter: damage,
    });
    let mut events = Vec::new();

    start_run(
        &mut run,
        &mut simulator,
        party(["A", "B", "C"]),
        &RunOptions::default(),
        &mut events,
    )
    .expect("valid party");

    assert_eq!(query::status(&run), RunStatus::Completed);
    let stats = query::stats(&run);
    assert_eq!(stats.total_rounds, 3);
    assert_eq!(stats.total_turns, 9);
    assert_eq!(stats.damage_by_member[&FighterId::new("A")], 10);
    assert_eq!(stats.damage_by_member[&FighterId::new("B")], 5);
}

#[test]
fn consecutive_clears_advance_the_pointer_and_bank_points() {
    let mut run = Run::new(Vec::new());
    let mut simulator = Scripted::wins(3);
    let mut events = Vec::new();

    start_run(
        &mut run,
        &mut simulator,
        party(["A", "B", "C"]),
        &step_options(),
        &mut events,
    )
    .expect("valid party");
    for _ in 0..3 {
        let _ = advance_stage(
            &mut run,
            &mut simulator,
            BattleOptions::default(),
            &mut events,
        );
    }

    assert_eq!(query::status(&run), RunStatus::InProgress);
    assert_eq!(query::stage_index(&run), 3);
    assert_eq!(query::rank_points(&run), 3);
}

#[test]
fn auto_runs_drive_the_whole_campaign_and_skip_the_final_point() {
    let mut run = Run::new(Vec::new());
    let stage_count = query::campaign(&run).stage_count();
    let mut simulator = Scripted::wins(stage_count);
    let mut events = Vec::new();

    start_run(
        &mut run,
        &mut simulator,
        party(["A", "B", "C"]),
        &RunOptions::default(),
        &mut events,
    )
    .expect("valid party");

    assert_eq!(query::status(&run), RunStatus::Completed);
    assert_eq!(query::stage_index(&run), stage_count);
    assert_eq!(query::results(&run).len(), stage_count);
    assert_eq!(
        query::rank_points(&run),
        (stage_count - 1) as u32,
        "the final clear must not add a point"
    );
    assert!(events.contains(&Event::RunCompleted));
}

#[test]
fn advancing_after_the_run_ends_reports_finished() {
    let mut run = one_stage_run();
    let mut simulator = Scripted::wins(1);
    let mut events = Vec::new();

    start_run(
        &mut run,
        &mut simulator,
        party(["A", "B", "C"]),
        &RunOptions::default(),
        &mut events,
    )
    .expect("valid party");
    let advance = advance_stage(
        &mut run,
        &mut simulator,
        BattleOptions::default(),
        &mut events,
    );

    assert_eq!(advance, StageAdvance::Finished);
    assert_eq!(query::results(&run).len(), 1);
}

#[test]
fn repeated_reset_and_start_cycles_never_leak_state() {
    let mut run = Run::new(Vec::new());
    let mut events = Vec::new();

    for cycle in 0..3 {
        apply(&mut run, Command::Reset, &mut events);
        let stage_count = query::campaign(&run).stage_count();
        let mut simulator = Scripted::wins(stage_count);
        start_run(
            &mut run,
            &mut simulator,
            party(["A", "B", "C"]),
            &RunOptions::default(),
            &mut events,
        )
        .expect("valid party");

        assert_eq!(
            query::results(&run).len(),
            stage_count,
            "cycle {cycle} must start from a clean slate"
        );
        assert_eq!(query::stats(&run).total_rounds, 0);
        assert_eq!(query::rank_points(&run), (stage_count - 1) as u32);
    }
}

#[test]
fn auto_run_returns_the_ordered_stage_outcomes() {
    let mut run = Run::new(Vec::new());
    let mut simulator = Scripted::wins(2);
    let mut events = Vec::new();

    start_run(
        &mut run,
        &mut simulator,
        party(["A", "B", "C"]),
        &step_options(),
        &mut events,
    )
    .expect("valid party");
    let outcomes = auto_run(
        &mut run,
        &mut simulator,
        BattleOptions::default(),
        &mut events,
    );

    assert_eq!(outcomes.len(), 3, "two wins and the terminating loss");
    assert_eq!(outcomes[0].outcome, StageOutcome::Cleared);
    assert_eq!(outcomes[1].outcome, StageOutcome::Cleared);
    assert_eq!(outcomes[2].outcome, StageOutcome::Failed);
    assert_eq!(query::status(&run), RunStatus::Failed);
}

#[test]
fn disabled_battle_logging_leaves_results_without_narrative() {
    let mut run = one_stage_run();
    let mut simulator = Scripted::wins(1);
    let mut events = Vec::new();

    start_run(
        &mut run,
        &mut simulator,
        party(["A", "B", "C"]),
        &RunOptions {
            auto: true,
            battle: BattleOptions {
                log: false,
                track_stats: false,
            },
        },
        &mut events,
    )
    .expect("valid party");

    let results = query::results(&run);
    assert_eq!(results.len(), 1);
    assert!(results[0].log.is_empty());
    assert_eq!(results[0].rounds, 0);
}
