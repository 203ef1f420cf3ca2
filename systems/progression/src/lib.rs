#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run controller that drives a campaign stage by stage.
//!
//! The controller is the only place where the three collaborators meet: it
//! queries the authoritative run, asks the roster system for both sides,
//! hands the finished rosters to the external [`BattleSimulator`], and
//! submits the resulting report back to the run as a single
//! [`Command::ResolveStage`]. A simulator panic therefore propagates before
//! any state changes hands.
//!
//! Loadout, rank, point and reset operations need no orchestration; callers
//! submit those commands directly to [`gauntlet_run::apply`].

use gauntlet_core::{
    BattleOptions, BattleSimulator, Command, Event, FighterId, PartyError, PartyRoster,
    RunOptions, RunStatus, StageResult,
};
use gauntlet_run::{apply, query, Run};
use gauntlet_system_roster::{build_enemy_roster, build_player_roster};

/// Outcome of one stage-advancement request.
#[derive(Clone, Debug, PartialEq)]
pub enum StageAdvance {
    /// The run is not in progress; nothing was attempted.
    Finished,
    /// A stage was fought and recorded.
    Resolved(StageResult),
}

/// Starts a fresh run with the provided party.
///
/// The party is validated before any state changes; a selection that is not
/// exactly three fighters is rejected and the run is left untouched. Unless
/// `options.auto` is disabled the run is immediately driven to completion or
/// failure.
pub fn start_run<S: BattleSimulator>(
    run: &mut Run,
    simulator: &mut S,
    party: Vec<FighterId>,
    options: &RunOptions,
    out_events: &mut Vec<Event>,
) -> Result<(), PartyError> {
    let party = PartyRoster::new(party)?;
    apply(run, Command::StartRun { party }, out_events);

    if options.auto {
        let _ = auto_run(run, simulator, options.battle, out_events);
    }

    Ok(())
}

/// Fights the next stage of an in-progress run.
///
/// Returns [`StageAdvance::Finished`] without touching anything when the run
/// is not in progress. Otherwise both rosters are built from the current
/// state, the simulator resolves the battle, and the report is applied as
/// one atomic transition.
pub fn advance_stage<S: BattleSimulator>(
    run: &mut Run,
    simulator: &mut S,
    options: BattleOptions,
    out_events: &mut Vec<Event>,
) -> StageAdvance {
    if query::status(run) != RunStatus::InProgress {
        return StageAdvance::Finished;
    }
    let Some(stage) = query::current_stage(run).cloned() else {
        return StageAdvance::Finished;
    };
    let Some(party) = query::party(run).cloned() else {
        return StageAdvance::Finished;
    };

    let fighters = query::fighter_table(run);
    let players = build_player_roster(
        &party,
        fighters,
        query::modifiers(run),
        query::loadouts(run),
        query::ability_ranks(run),
    );
    let enemies = build_enemy_roster(&stage, fighters, query::campaign(run));

    let report = simulator.simulate(&players, &enemies, options);
    apply(run, Command::ResolveStage { report }, out_events);

    match query::results(run).last() {
        Some(result) => StageAdvance::Resolved(result.clone()),
        None => StageAdvance::Finished,
    }
}

/// Drives an in-progress run until it completes or fails.
///
/// The loop is bounded by the campaign length: every iteration either
/// resolves one stage or observes that the run left the in-progress state.
/// Returns the ordered outcomes of the stages fought by this call.
pub fn auto_run<S: BattleSimulator>(
    run: &mut Run,
    simulator: &mut S,
    options: BattleOptions,
    out_events: &mut Vec<Event>,
) -> Vec<StageResult> {
    let mut outcomes = Vec::new();
    while query::status(run) == RunStatus::InProgress {
        match advance_stage(run, simulator, options, out_events) {
            StageAdvance::Resolved(result) => outcomes.push(result),
            StageAdvance::Finished => break,
        }
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::{BattleFighter, BattleReport, BattleSide};

    struct AlwaysLoses;

    impl BattleSimulator for AlwaysLoses {
        fn simulate(
            &mut self,
            _side_a: &[BattleFighter],
            _side_b: &[BattleFighter],
            _options: BattleOptions,
        ) -> BattleReport {
            BattleReport {
                winner: BattleSide::B,
                log: String::new(),
                stats: None,
            }
        }
    }

    #[test]
    fn advancing_an_unstarted_run_is_a_no_op() {
        let mut run = Run::new(Vec::new());
        let mut simulator = AlwaysLoses;
        let mut events = Vec::new();

        let advance = advance_stage(
            &mut run,
            &mut simulator,
            BattleOptions::default(),
            &mut events,
        );

        assert_eq!(advance, StageAdvance::Finished);
        assert!(events.is_empty());
        assert!(query::results(&run).is_empty());
    }
}
