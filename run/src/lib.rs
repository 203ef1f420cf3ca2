#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative run state management for the Gauntlet.
//!
//! A [`Run`] is an explicit context object: it owns the loaded fighter
//! definitions, the immutable campaign catalog, and every mutable field of
//! the active run. All mutation flows through [`apply`], which executes one
//! [`Command`] and broadcasts [`Event`] confirmations. Independent runs are
//! independent `Run` values; nothing in this crate is global.

pub mod campaign;

use std::collections::BTreeMap;

use gauntlet_core::{
    BattleSide, Campaign, Command, Event, FighterDefinition, FighterId, FighterTableView,
    LoadoutMap, PartyRoster, RankMap, RunStats, RunStatus, StageOutcome, StageResult,
    StatModifiers,
};

/// Represents the authoritative state of one campaign run.
#[derive(Debug)]
pub struct Run {
    fighters: Vec<FighterDefinition>,
    campaign: Campaign,
    status: RunStatus,
    stage_index: usize,
    party: Option<PartyRoster>,
    party_hp: BTreeMap<FighterId, u32>,
    modifiers: StatModifiers,
    loadouts: LoadoutMap,
    ability_ranks: RankMap,
    rank_points: u32,
    results: Vec<StageResult>,
    stats: RunStats,
}

impl Run {
    /// Creates a run over the standard campaign with the provided fighter
    /// definitions. The definitions must be fully loaded beforehand; the run
    /// never mutates them.
    #[must_use]
    pub fn new(fighters: Vec<FighterDefinition>) -> Self {
        Self::with_campaign(fighters, campaign::standard())
    }

    /// Creates a run over a custom campaign.
    #[must_use]
    pub fn with_campaign(fighters: Vec<FighterDefinition>, campaign: Campaign) -> Self {
        Self {
            fighters,
            campaign,
            status: RunStatus::NotStarted,
            stage_index: 0,
            party: None,
            party_hp: BTreeMap::new(),
            modifiers: StatModifiers::default(),
            loadouts: LoadoutMap::new(),
            ability_ranks: RankMap::new(),
            rank_points: 0,
            results: Vec::new(),
            stats: RunStats::default(),
        }
    }

    /// Resets run progress: status, stage pointer, party, HP snapshot,
    /// results, statistics and earned points. Customization (loadouts, rank
    /// overrides, modifiers) survives so it can be staged between a reset
    /// and the next start.
    fn reset_progress(&mut self) {
        self.status = RunStatus::NotStarted;
        self.stage_index = 0;
        self.party = None;
        self.party_hp.clear();
        self.rank_points = 0;
        self.results.clear();
        self.stats = RunStats::default();
    }

    /// Discards everything, customization included.
    fn reset_all(&mut self) {
        self.reset_progress();
        self.modifiers = StatModifiers::default();
        self.loadouts.clear();
        self.ability_ranks.clear();
    }

    /// Refreshes the last-known-good HP snapshot from resolved max HP.
    fn refresh_party_hp(&mut self) {
        self.party_hp.clear();
        let Some(party) = self.party.clone() else {
            return;
        };
        let view = FighterTableView::new(&self.fighters);
        for id in party.iter() {
            let max_hp = view.resolve(id).max_hp;
            let _ = self.party_hp.insert(id.clone(), max_hp);
        }
    }

    /// Descriptor shown for the opposition of the provided stage.
    fn enemy_descriptor(&self, index: usize) -> String {
        match self.campaign.stage(index).map(|stage| &stage.force) {
            Some(gauntlet_core::EnemyForce::Boss { boss }) => self
                .campaign
                .boss(boss)
                .map(|definition| definition.name.clone())
                .unwrap_or_else(|| boss.as_str().to_owned()),
            Some(gauntlet_core::EnemyForce::Team { team }) => team.as_str().to_owned(),
            None => String::new(),
        }
    }
}

/// Applies the provided command to the run, mutating state deterministically.
///
/// Stage resolution is atomic: [`Command::ResolveStage`] performs the whole
/// win/loss, point, snapshot and statistics update in one pass, or none of it
/// when the run is not in progress.
pub fn apply(run: &mut Run, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartRun { party } => {
            run.reset_progress();
            run.party = Some(party.clone());
            run.refresh_party_hp();
            run.status = RunStatus::InProgress;
            run.stage_index = 0;
            out_events.push(Event::RunStarted { party });
        }
        Command::ResolveStage { report } => {
            if run.status != RunStatus::InProgress {
                return;
            }
            let Some(stage) = run.campaign.stage(run.stage_index) else {
                run.status = RunStatus::Completed;
                return;
            };

            let stage_id = stage.id.clone();
            let enemy = run.enemy_descriptor(run.stage_index);
            let victory = report.winner == BattleSide::A;
            let outcome = if victory {
                StageOutcome::Cleared
            } else {
                StageOutcome::Failed
            };

            let (rounds, turns, damage_by_member) = match (&report.stats, &run.party) {
                (Some(stats), Some(party)) => {
                    let damage: BTreeMap<FighterId, u32> = stats
                        .damage_by_fighter
                        .iter()
                        .filter(|(id, _)| party.contains(id))
                        .map(|(id, dealt)| (id.clone(), *dealt))
                        .collect();
                    (stats.rounds, stats.turns, damage)
                }
                _ => (0, 0, BTreeMap::new()),
            };

            run.stats.total_rounds += rounds;
            run.stats.total_turns += turns;
            for (id, dealt) in &damage_by_member {
                *run.stats.damage_by_member.entry(id.clone()).or_insert(0) += dealt;
            }

            run.results.push(StageResult {
                stage: stage_id.clone(),
                enemy,
                outcome,
                rounds,
                turns,
                damage_by_member,
                log: report.log,
            });

            if victory {
                run.stage_index += 1;
                run.refresh_party_hp();
                out_events.push(Event::StageCleared { stage: stage_id });
                if run.stage_index >= run.campaign.stage_count() {
                    run.status = RunStatus::Completed;
                    out_events.push(Event::RunCompleted);
                } else {
                    run.rank_points += 1;
                    out_events.push(Event::RankPointsAdjusted {
                        balance: run.rank_points,
                    });
                }
            } else {
                run.status = RunStatus::Failed;
                out_events.push(Event::StageFailed { stage: stage_id });
            }
        }
        Command::SetLoadouts { loadouts } => {
            run.loadouts = loadouts;
            out_events.push(Event::LoadoutsReplaced);
        }
        Command::SetAbilityRanks { ranks } => {
            run.ability_ranks = ranks;
            out_events.push(Event::AbilityRanksReplaced);
        }
        Command::SetModifiers { modifiers } => {
            run.modifiers = modifiers;
            out_events.push(Event::ModifiersReplaced);
        }
        Command::AdjustRankPoints { delta } => {
            run.rank_points = if delta >= 0 {
                run.rank_points.saturating_add(delta.unsigned_abs())
            } else {
                run.rank_points.saturating_sub(delta.unsigned_abs())
            };
            out_events.push(Event::RankPointsAdjusted {
                balance: run.rank_points,
            });
        }
        Command::Reset => {
            run.reset_all();
            out_events.push(Event::RunReset);
        }
    }
}

/// Query functions that provide read-only access to the run state.
pub mod query {
    use std::collections::BTreeMap;

    use gauntlet_core::{
        Campaign, FighterId, FighterTableView, LoadoutMap, PartyRoster, RankMap, RunStats,
        RunStatus, Stage, StageResult, StatModifiers,
    };
    use serde::Serialize;

    use super::Run;

    /// Current lifecycle status of the run.
    #[must_use]
    pub fn status(run: &Run) -> RunStatus {
        run.status
    }

    /// Index of the next stage to attempt.
    #[must_use]
    pub fn stage_index(run: &Run) -> usize {
        run.stage_index
    }

    /// Stage the run will attempt next, if any remain.
    #[must_use]
    pub fn current_stage(run: &Run) -> Option<&Stage> {
        run.campaign.stage(run.stage_index)
    }

    /// Provides read-only access to the campaign catalog.
    #[must_use]
    pub fn campaign(run: &Run) -> &Campaign {
        &run.campaign
    }

    /// Captures a read-only view over the loaded fighter definitions.
    #[must_use]
    pub fn fighter_table(run: &Run) -> FighterTableView<'_> {
        FighterTableView::new(&run.fighters)
    }

    /// Party locked in for the run, once started.
    #[must_use]
    pub fn party(run: &Run) -> Option<&PartyRoster> {
        run.party.as_ref()
    }

    /// Last-known-good HP snapshot per party member.
    #[must_use]
    pub fn party_hp(run: &Run) -> &BTreeMap<FighterId, u32> {
        &run.party_hp
    }

    /// Party-wide stat modifiers.
    #[must_use]
    pub fn modifiers(run: &Run) -> StatModifiers {
        run.modifiers
    }

    /// Current loadout selection per fighter.
    #[must_use]
    pub fn loadouts(run: &Run) -> &LoadoutMap {
        &run.loadouts
    }

    /// Current rank overrides per fighter and ability.
    #[must_use]
    pub fn ability_ranks(run: &Run) -> &RankMap {
        &run.ability_ranks
    }

    /// Rank-up points currently banked.
    #[must_use]
    pub fn rank_points(run: &Run) -> u32 {
        run.rank_points
    }

    /// Outcome log of every attempted stage, in order.
    #[must_use]
    pub fn results(run: &Run) -> &[StageResult] {
        &run.results
    }

    /// Cumulative statistics for the run so far.
    #[must_use]
    pub fn stats(run: &Run) -> &RunStats {
        &run.stats
    }

    /// Captures a deep, independent snapshot of the run.
    ///
    /// Every mutable container is cloned, so callers may hold or mutate the
    /// view freely without touching the authoritative state.
    #[must_use]
    pub fn run_view(run: &Run) -> RunView {
        RunView {
            status: run.status,
            stage_index: run.stage_index,
            stage_count: run.campaign.stage_count(),
            party: run
                .party
                .as_ref()
                .map(|party| party.members().to_vec())
                .unwrap_or_default(),
            party_hp: run.party_hp.clone(),
            modifiers: run.modifiers,
            loadouts: run.loadouts.clone(),
            ability_ranks: run.ability_ranks.clone(),
            rank_points: run.rank_points,
            results: run.results.clone(),
            stats: run.stats.clone(),
        }
    }

    /// Immutable snapshot of a run used for presentation and tooling.
    #[derive(Clone, Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RunView {
        /// Lifecycle status at capture time.
        pub status: RunStatus,
        /// Index of the next stage to attempt.
        pub stage_index: usize,
        /// Total number of stages in the campaign.
        pub stage_count: usize,
        /// Party members in order; empty before a run starts.
        pub party: Vec<FighterId>,
        /// Last-known-good HP per party member.
        pub party_hp: BTreeMap<FighterId, u32>,
        /// Party-wide stat modifiers.
        pub modifiers: StatModifiers,
        /// Loadout selection per fighter.
        pub loadouts: LoadoutMap,
        /// Rank overrides per fighter and ability.
        pub ability_ranks: RankMap,
        /// Rank-up points currently banked.
        pub rank_points: u32,
        /// Outcome log of every attempted stage.
        pub results: Vec<StageResult>,
        /// Cumulative run statistics.
        pub stats: RunStats,
    }
}
