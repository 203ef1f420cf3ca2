#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gauntlet engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative run state, and pure systems. Adapters and the progression
//! controller submit [`Command`] values describing desired mutations, the run
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing what actually happened. Systems consume
//! immutable views and respond with finished rosters or new command batches.
//!
//! Turn-by-turn combat never happens here: the [`BattleSimulator`] trait is
//! the seam behind which an external resolver turns two finished rosters into
//! a [`BattleReport`].

use std::collections::BTreeMap;
use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Gauntlet.";

/// Number of fighters in a player party.
pub const PARTY_SIZE: usize = 3;

/// Lowest rank an ability can hold.
pub const MIN_ABILITY_RANK: u8 = 1;

/// Highest rank an ability can be raised to.
pub const MAX_ABILITY_RANK: u8 = 3;

/// Loadout capacity assumed when a fighter does not declare one.
pub const DEFAULT_LOADOUT_SIZE: usize = 4;

/// Per-fighter selection of usable ability ids, replaced as a whole map.
pub type LoadoutMap = BTreeMap<FighterId, Vec<AbilityId>>;

/// Per-fighter, per-ability rank overrides. Values are clamped to
/// [`MIN_ABILITY_RANK`]..=[`MAX_ABILITY_RANK`] when a roster is built.
pub type RankMap = BTreeMap<FighterId, BTreeMap<AbilityId, u8>>;

/// Unique identifier assigned to a fighter definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FighterId(String);

impl FighterId {
    /// Creates a new fighter identifier from the provided value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier assigned to an ability.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbilityId(String);

impl AbilityId {
    /// Creates a new ability identifier from the provided value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier assigned to a campaign stage.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StageId(String);

impl StageId {
    /// Creates a new stage identifier from the provided value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier assigned to an enemy team.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(String);

impl TeamId {
    /// Creates a new team identifier from the provided value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Battlefield row a fighter occupies within its roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// First row, closest to the opposing roster.
    Front,
    /// Middle row.
    Mid,
    /// Rear row, furthest from the opposing roster.
    Back,
}

impl Position {
    /// Derives the default position for a party slot: the first three slots
    /// map to front, mid and back, and any extras default to front.
    #[must_use]
    pub const fn from_slot(slot: usize) -> Self {
        match slot {
            0 => Self::Front,
            1 => Self::Mid,
            2 => Self::Back,
            _ => Self::Front,
        }
    }
}

/// Broad effect category of an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityKind {
    /// Weapon-driven effect mitigated by defense.
    Physical,
    /// Spell-driven effect.
    Magic,
    /// Non-damaging effect aimed at allies.
    Support,
}

/// Rule an ability uses to select its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Targeting {
    /// May strike any living enemy.
    AnyEnemy,
    /// Prefers the enemy front row while it stands.
    FrontPreferred,
}

/// Rank held by an ability, always within
/// [`MIN_ABILITY_RANK`]..=[`MAX_ABILITY_RANK`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbilityRank(u8);

impl AbilityRank {
    /// Creates a rank from the provided value, clamped into the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value < MIN_ABILITY_RANK {
            Self(MIN_ABILITY_RANK)
        } else if value > MAX_ABILITY_RANK {
            Self(MAX_ABILITY_RANK)
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric rank.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl Default for AbilityRank {
    fn default() -> Self {
        Self(MIN_ABILITY_RANK)
    }
}

/// Declarative description of one ability in a fighter's pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    /// Identifier of the ability, unique within a fighter's pool.
    pub id: AbilityId,
    /// Human-readable name.
    pub name: String,
    /// Broad effect category.
    pub kind: AbilityKind,
    /// Target selection rule.
    pub targeting: Targeting,
    /// Dice-notation magnitudes indexed by rank, starting at rank 1.
    pub damage_by_rank: Vec<String>,
    /// Rank the ability holds before any override is applied.
    #[serde(default)]
    pub rank: AbilityRank,
    /// Rounds the ability rests between uses, if any.
    #[serde(default)]
    pub cooldown: Option<u32>,
}

impl Ability {
    /// Magnitude the ability deals at the provided rank.
    ///
    /// Ranks beyond the declared table clamp to the last entry; an empty
    /// table yields `None`.
    #[must_use]
    pub fn damage_for_rank(&self, rank: AbilityRank) -> Option<&str> {
        if self.damage_by_rank.is_empty() {
            return None;
        }
        let index = usize::from(rank.get().saturating_sub(1)).min(self.damage_by_rank.len() - 1);
        self.damage_by_rank.get(index).map(String::as_str)
    }
}

/// Party-wide or stage-wide additive stat adjustments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatModifiers {
    /// Added to each fighter's attack bonus.
    pub attack_bonus: i32,
    /// Added to each fighter's defense bonus.
    pub defense_bonus: i32,
}

/// Declarative, read-only description of a fighter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FighterDefinition {
    /// Identifier the fighter is resolved by.
    pub id: FighterId,
    /// Human-readable name.
    pub name: String,
    /// Hit points the fighter enters battle with.
    pub max_hp: u32,
    /// Bonus applied to attack rolls.
    pub attack_bonus: i32,
    /// Bonus applied to defense.
    pub defense_bonus: i32,
    /// Initiative weighting.
    pub speed: i32,
    /// Bonus applied to hit rolls.
    pub accuracy: i32,
    /// Bonus applied to dodge rolls.
    pub evasion: i32,
    /// Bonus applied to critical and fortune rolls.
    pub luck: i32,
    /// Preferred battlefield row; when absent the party slot decides.
    #[serde(default)]
    pub position: Option<Position>,
    /// Abilities the fighter can draw its loadout from.
    pub abilities: Vec<Ability>,
    /// Ability ids that must remain in any loadout.
    #[serde(default)]
    pub locked_abilities: Vec<AbilityId>,
    /// Ability ids pre-selected when no loadout was chosen yet.
    #[serde(default)]
    pub default_active_abilities: Vec<AbilityId>,
    /// Maximum loadout size; [`DEFAULT_LOADOUT_SIZE`] when absent.
    #[serde(default)]
    pub loadout_size: Option<usize>,
}

impl FighterDefinition {
    /// Number of abilities a loadout for this fighter may hold.
    #[must_use]
    pub fn loadout_limit(&self) -> usize {
        self.loadout_size.unwrap_or(DEFAULT_LOADOUT_SIZE)
    }
}

/// Battle-ready projection of a [`FighterDefinition`] for one roster.
///
/// A battle fighter owns every container it carries. Building one never
/// aliases the originating definition, so a simulator may mutate rosters
/// freely without corrupting the canonical data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleFighter {
    /// Identifier of the originating definition (or synthesized fallback).
    pub id: FighterId,
    /// Human-readable name.
    pub name: String,
    /// Resolved battlefield row.
    pub position: Position,
    /// Current hit points, equal to `max_hp` at build time.
    pub hp: u32,
    /// Hit point ceiling.
    pub max_hp: u32,
    /// Attack bonus after modifiers.
    pub attack_bonus: i32,
    /// Defense bonus after modifiers.
    pub defense_bonus: i32,
    /// Initiative weighting.
    pub speed: i32,
    /// Hit-roll bonus.
    pub accuracy: i32,
    /// Dodge-roll bonus.
    pub evasion: i32,
    /// Fortune-roll bonus.
    pub luck: i32,
    /// Loadout-filtered abilities with effective ranks applied.
    pub abilities: Vec<Ability>,
}

/// Read-only view over the loaded fighter definitions.
///
/// Slice order is the canonical fighter ordering, so the view doubles as the
/// ordered id list the data source provides.
#[derive(Clone, Copy, Debug)]
pub struct FighterTableView<'a> {
    definitions: &'a [FighterDefinition],
}

impl<'a> FighterTableView<'a> {
    /// Creates a view over the provided definitions.
    #[must_use]
    pub const fn new(definitions: &'a [FighterDefinition]) -> Self {
        Self { definitions }
    }

    /// Looks up a definition by id.
    #[must_use]
    pub fn get(&self, id: &FighterId) -> Option<&'a FighterDefinition> {
        self.definitions
            .iter()
            .find(|definition| definition.id == *id)
    }

    /// Iterator over the definitions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &'a FighterDefinition> {
        self.definitions.iter()
    }

    /// Iterator over the fighter ids in canonical order.
    pub fn ids(&self) -> impl Iterator<Item = &'a FighterId> {
        self.definitions.iter().map(|definition| &definition.id)
    }

    /// Number of definitions behind the view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Resolves an id into an owned, fully independent definition.
    ///
    /// Unknown ids synthesize a fallback fighter instead of failing, so a
    /// roster can always be fielded regardless of content gaps. The returned
    /// value shares no containers with the view.
    #[must_use]
    pub fn resolve(&self, id: &FighterId) -> FighterDefinition {
        match self.get(id) {
            Some(definition) => definition.clone(),
            None => fallback_fighter(id),
        }
    }
}

const FALLBACK_MAX_HP: u32 = 30;
const FALLBACK_ATTACK: i32 = 2;
const FALLBACK_DEFENSE: i32 = 1;
const FALLBACK_SPEED: i32 = 3;
const FALLBACK_ACCURACY: i32 = 1;

fn fallback_fighter(id: &FighterId) -> FighterDefinition {
    FighterDefinition {
        id: id.clone(),
        name: id.as_str().to_owned(),
        max_hp: FALLBACK_MAX_HP,
        attack_bonus: FALLBACK_ATTACK,
        defense_bonus: FALLBACK_DEFENSE,
        speed: FALLBACK_SPEED,
        accuracy: FALLBACK_ACCURACY,
        evasion: 0,
        luck: 0,
        position: Some(Position::Front),
        abilities: vec![Ability {
            id: AbilityId::new(format!("{}_strike", id.as_str())),
            name: "Wild Strike".to_owned(),
            kind: AbilityKind::Physical,
            targeting: Targeting::AnyEnemy,
            damage_by_rank: vec!["1d8+2".to_owned()],
            rank: AbilityRank::default(),
            cooldown: None,
        }],
        locked_abilities: Vec::new(),
        default_active_abilities: Vec::new(),
        loadout_size: None,
    }
}

/// Kind of encounter a stage hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Three-a-side fight against a configured enemy team.
    Team,
    /// Single-opponent fight against a boss.
    Boss,
}

/// Opposition a stage fields, referencing campaign content by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyForce {
    /// A configured enemy team.
    Team {
        /// Identifier of the team whose roster fills the stage.
        team: TeamId,
    },
    /// A single boss.
    Boss {
        /// Identifier of the boss definition.
        boss: FighterId,
    },
}

impl EnemyForce {
    /// Kind of encounter this force produces.
    #[must_use]
    pub const fn kind(&self) -> StageKind {
        match self {
            Self::Team { .. } => StageKind::Team,
            Self::Boss { .. } => StageKind::Boss,
        }
    }

    /// Identifier of the referenced team or boss.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Team { team } => team.as_str(),
            Self::Boss { boss } => boss.as_str(),
        }
    }
}

/// One discrete encounter in the fixed campaign sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Identifier the stage is reported under.
    pub id: StageId,
    /// Opposition the stage fields.
    pub force: EnemyForce,
    /// Explicit display label; derived from the force when absent.
    #[serde(default)]
    pub label: Option<String>,
    /// Modifiers applied uniformly to the enemy roster; absent means none.
    #[serde(default)]
    pub enemy_modifiers: Option<StatModifiers>,
}

impl Stage {
    /// Creates a team stage.
    #[must_use]
    pub fn team(id: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            id: StageId::new(id),
            force: EnemyForce::Team {
                team: TeamId::new(team),
            },
            label: None,
            enemy_modifiers: None,
        }
    }

    /// Creates a boss stage.
    #[must_use]
    pub fn boss(id: impl Into<String>, boss: impl Into<String>) -> Self {
        Self {
            id: StageId::new(id),
            force: EnemyForce::Boss {
                boss: FighterId::new(boss),
            },
            label: None,
            enemy_modifiers: None,
        }
    }

    /// Attaches an explicit display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attaches enemy-side modifiers.
    #[must_use]
    pub fn with_enemy_modifiers(mut self, modifiers: StatModifiers) -> Self {
        self.enemy_modifiers = Some(modifiers);
        self
    }

    /// Kind of encounter the stage hosts.
    #[must_use]
    pub const fn kind(&self) -> StageKind {
        self.force.kind()
    }
}

/// Derives the display label for a stage at the provided campaign index.
#[must_use]
pub fn describe_stage(stage: &Stage, index: usize) -> String {
    match &stage.label {
        Some(label) => label.clone(),
        None => format!("Stage {}: {}", index + 1, stage.force.identifier()),
    }
}

/// Roster configured for one enemy team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyTeam {
    /// Identifier stages reference the team by.
    pub id: TeamId,
    /// Fighter ids fielded by the team, in roster order.
    pub members: Vec<FighterId>,
}

/// Immutable campaign catalog: ordered stages plus the enemy content they
/// reference. Pure lookup, no mutable state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Campaign {
    stages: Vec<Stage>,
    teams: Vec<EnemyTeam>,
    bosses: Vec<FighterDefinition>,
}

impl Campaign {
    /// Creates a campaign from its content tables.
    #[must_use]
    pub fn new(stages: Vec<Stage>, teams: Vec<EnemyTeam>, bosses: Vec<FighterDefinition>) -> Self {
        Self {
            stages,
            teams,
            bosses,
        }
    }

    /// Ordered stage list.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Looks up a stage by campaign index.
    #[must_use]
    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Number of stages in the campaign.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Roster configured for the provided team, if any.
    #[must_use]
    pub fn team_roster(&self, id: &TeamId) -> Option<&[FighterId]> {
        self.teams
            .iter()
            .find(|team| team.id == *id)
            .map(|team| team.members.as_slice())
    }

    /// Boss definition for the provided id, if any.
    #[must_use]
    pub fn boss(&self, id: &FighterId) -> Option<&FighterDefinition> {
        self.bosses.iter().find(|boss| boss.id == *id)
    }
}

/// Player party locked in for one run: exactly [`PARTY_SIZE`] fighters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartyRoster {
    members: [FighterId; PARTY_SIZE],
}

impl PartyRoster {
    /// Validates and captures a party selection.
    ///
    /// Fails fast when the selection does not contain exactly
    /// [`PARTY_SIZE`] fighters.
    pub fn new(members: Vec<FighterId>) -> Result<Self, PartyError> {
        let found = members.len();
        let members: [FighterId; PARTY_SIZE] = members
            .try_into()
            .map_err(|_| PartyError::WrongSize { found })?;
        Ok(Self { members })
    }

    /// Members in party order.
    #[must_use]
    pub fn members(&self) -> &[FighterId] {
        &self.members
    }

    /// Iterator over the members in party order.
    pub fn iter(&self) -> impl Iterator<Item = &FighterId> {
        self.members.iter()
    }

    /// Reports whether the provided fighter belongs to the party.
    #[must_use]
    pub fn contains(&self, id: &FighterId) -> bool {
        self.members.iter().any(|member| member == id)
    }
}

/// Reasons a party selection may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartyError {
    /// The selection did not contain exactly [`PARTY_SIZE`] fighters.
    WrongSize {
        /// Number of fighters that were provided.
        found: usize,
    },
}

impl fmt::Display for PartyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongSize { found } => write!(
                f,
                "a party must contain exactly {PARTY_SIZE} fighters, found {found}"
            ),
        }
    }
}

impl Error for PartyError {}

/// Lifecycle state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No run has been started since construction or the last reset.
    NotStarted,
    /// A run is underway and stages remain.
    InProgress,
    /// Every stage was cleared.
    Completed,
    /// A stage was lost.
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Outcome recorded for one attempted stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    /// The player party won.
    Cleared,
    /// The player party lost.
    Failed,
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cleared => "cleared",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Immutable record of one attempted stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResult {
    /// Stage the record belongs to.
    pub stage: StageId,
    /// Descriptor of the opposition (boss name or team id).
    pub enemy: String,
    /// Whether the stage was cleared.
    pub outcome: StageOutcome,
    /// Rounds the battle lasted.
    pub rounds: u32,
    /// Individual turns taken across the battle.
    pub turns: u32,
    /// Damage dealt by each current party member.
    pub damage_by_member: BTreeMap<FighterId, u32>,
    /// Narrative battle log, empty when logging was disabled.
    pub log: String,
}

/// Cumulative statistics aggregated across a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Rounds fought across all attempted stages.
    pub total_rounds: u32,
    /// Individual turns taken across all attempted stages.
    pub total_turns: u32,
    /// Damage dealt by each party member across all attempted stages.
    pub damage_by_member: BTreeMap<FighterId, u32>,
}

/// Side marker used by battle reports. Side A is always the player party.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleSide {
    /// The player party.
    A,
    /// The enemy roster.
    B,
}

/// Options forwarded to the battle simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleOptions {
    /// Capture a narrative battle log.
    pub log: bool,
    /// Populate aggregate statistics.
    pub track_stats: bool,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            log: true,
            track_stats: true,
        }
    }
}

/// Aggregate statistics a simulator may attach to its report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleStats {
    /// Rounds the battle lasted.
    pub rounds: u32,
    /// Individual turns taken across the battle.
    pub turns: u32,
    /// Damage dealt by each fighter on either side, keyed by fighter id.
    pub damage_by_fighter: BTreeMap<FighterId, u32>,
}

/// Result of one simulated battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleReport {
    /// Winning side.
    pub winner: BattleSide,
    /// Narrative battle log, empty when logging was disabled.
    pub log: String,
    /// Aggregate statistics, when tracking was enabled.
    pub stats: Option<BattleStats>,
}

/// External team-battle resolver the engine delegates combat to.
///
/// Implementations receive finished rosters and must not retain references
/// to them. The contract is infallible by signature: a panicking
/// implementation propagates to the caller before any run state changes.
pub trait BattleSimulator {
    /// Resolves one battle between side A (the player party) and side B.
    fn simulate(
        &mut self,
        side_a: &[BattleFighter],
        side_b: &[BattleFighter],
        options: BattleOptions,
    ) -> BattleReport;
}

/// Options accepted when starting a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Drive the run to completion or failure immediately after starting.
    pub auto: bool,
    /// Options forwarded to the battle simulator for every stage.
    pub battle: BattleOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            auto: true,
            battle: BattleOptions::default(),
        }
    }
}

/// Commands that express all permissible run mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards any previous run and starts a fresh one with the party.
    StartRun {
        /// Validated party selection for the run.
        party: PartyRoster,
    },
    /// Applies a finished battle report to the current stage.
    ResolveStage {
        /// Report produced by the external battle simulator.
        report: BattleReport,
    },
    /// Replaces every fighter loadout at once.
    SetLoadouts {
        /// New loadout selection per fighter.
        loadouts: LoadoutMap,
    },
    /// Replaces every ability rank override at once.
    SetAbilityRanks {
        /// New rank overrides per fighter and ability.
        ranks: RankMap,
    },
    /// Replaces the party-wide stat modifiers.
    SetModifiers {
        /// Modifiers applied to every party member on the next roster build.
        modifiers: StatModifiers,
    },
    /// Adjusts the rank-up point balance by a signed delta, floored at zero.
    AdjustRankPoints {
        /// Points to add (positive) or spend (negative).
        delta: i32,
    },
    /// Unconditionally discards the current run state.
    Reset,
}

/// Events broadcast by the run after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a fresh run started with the provided party.
    RunStarted {
        /// Party locked in for the run.
        party: PartyRoster,
    },
    /// Confirms that the current stage was cleared.
    StageCleared {
        /// Identifier of the cleared stage.
        stage: StageId,
    },
    /// Reports that the current stage was lost and the run failed.
    StageFailed {
        /// Identifier of the lost stage.
        stage: StageId,
    },
    /// Announces that the final stage was cleared and the run completed.
    RunCompleted,
    /// Confirms a change to the rank-up point balance.
    RankPointsAdjusted {
        /// Balance after the adjustment.
        balance: u32,
    },
    /// Confirms that the loadout selection was replaced.
    LoadoutsReplaced,
    /// Confirms that the ability rank overrides were replaced.
    AbilityRanksReplaced,
    /// Confirms that the party-wide modifiers were replaced.
    ModifiersReplaced,
    /// Confirms that the run state was discarded.
    RunReset,
}
