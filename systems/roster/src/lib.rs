#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure roster construction for both sides of a stage battle.
//!
//! Every function here is deterministic and side-effect free: definitions go
//! in through read-only views, battle-ready fighters come out as owned
//! values. No roster ever shares an ability list with another roster or with
//! the canonical definitions.

use std::collections::BTreeMap;

use gauntlet_core::{
    Ability, AbilityId, AbilityRank, BattleFighter, Campaign, EnemyForce, FighterDefinition,
    FighterId, FighterTableView, LoadoutMap, PartyRoster, Position, RankMap, Stage, StatModifiers,
};

/// Number of combatants a team stage always fields.
const TEAM_STAGE_SIZE: usize = 3;

/// Builds the player roster in party order.
///
/// Each member runs through the full pipeline: resolution, position
/// assignment (explicit preference wins, otherwise the party slot decides),
/// loadout filtering, party-wide modifiers, and rank overrides clamped into
/// the valid range. Every fighter enters battle at full HP.
#[must_use]
pub fn build_player_roster(
    party: &PartyRoster,
    fighters: FighterTableView<'_>,
    modifiers: StatModifiers,
    loadouts: &LoadoutMap,
    ranks: &RankMap,
) -> Vec<BattleFighter> {
    party
        .iter()
        .enumerate()
        .map(|(slot, id)| {
            build_member(
                fighters.resolve(id),
                slot,
                loadouts.get(id),
                ranks.get(id),
                modifiers,
            )
        })
        .collect()
}

/// Builds the enemy roster for the provided stage.
///
/// Boss stages field the single boss definition at its declared position
/// (front when it has none). Team stages field the configured roster and pad
/// it with synthesized filler fighters until at least three combatants stand.
/// Stage-declared enemy modifiers apply uniformly to the whole roster; an
/// absent declaration applies nothing.
#[must_use]
pub fn build_enemy_roster(
    stage: &Stage,
    fighters: FighterTableView<'_>,
    campaign: &Campaign,
) -> Vec<BattleFighter> {
    match &stage.force {
        EnemyForce::Boss { boss } => {
            let definition = campaign
                .boss(boss)
                .cloned()
                .unwrap_or_else(|| fighters.resolve(boss));
            let position = definition.position.unwrap_or(Position::Front);
            let abilities = definition.abilities.clone();
            vec![to_battle_fighter(
                definition,
                position,
                stage.enemy_modifiers,
                abilities,
            )]
        }
        EnemyForce::Team { team } => {
            let mut members: Vec<FighterId> = campaign
                .team_roster(team)
                .map(|members| members.to_vec())
                .unwrap_or_default();
            while members.len() < TEAM_STAGE_SIZE {
                members.push(FighterId::new(format!(
                    "{}_filler_{}",
                    team.as_str(),
                    members.len() + 1
                )));
            }

            members
                .iter()
                .enumerate()
                .map(|(slot, id)| {
                    let definition = fighters.resolve(id);
                    let position = definition.position.unwrap_or(Position::from_slot(slot));
                    let abilities = definition.abilities.clone();
                    to_battle_fighter(definition, position, stage.enemy_modifiers, abilities)
                })
                .collect()
        }
    }
}

fn build_member(
    definition: FighterDefinition,
    slot: usize,
    selection: Option<&Vec<AbilityId>>,
    overrides: Option<&BTreeMap<AbilityId, u8>>,
    modifiers: StatModifiers,
) -> BattleFighter {
    let position = definition.position.unwrap_or(Position::from_slot(slot));

    let selection = match selection {
        Some(ids) => Some(ids.clone()),
        None if !definition.default_active_abilities.is_empty() => {
            Some(definition.default_active_abilities.clone())
        }
        None => None,
    };

    let mut abilities = match selection {
        Some(ids) => {
            let sanitized = sanitize_loadout(&definition, &ids);
            let retained: Vec<Ability> = definition
                .abilities
                .iter()
                .filter(|ability| sanitized.contains(&ability.id))
                .cloned()
                .collect();
            // An empty filter result keeps the full pool rather than
            // fielding a fighter with no abilities.
            if retained.is_empty() {
                definition.abilities.clone()
            } else {
                retained
            }
        }
        None => definition.abilities.clone(),
    };

    if let Some(overrides) = overrides {
        for ability in &mut abilities {
            if let Some(rank) = overrides.get(&ability.id) {
                ability.rank = AbilityRank::clamped(*rank);
            }
        }
    }

    to_battle_fighter(definition, position, Some(modifiers), abilities)
}

/// Normalizes a loadout selection against a fighter's declared constraints.
///
/// Locked abilities are always present, duplicates collapse in first-seen
/// order, and the selection is truncated to the declared loadout size without
/// ever dropping a locked ability.
#[must_use]
pub fn sanitize_loadout(definition: &FighterDefinition, selection: &[AbilityId]) -> Vec<AbilityId> {
    let limit = definition.loadout_limit();
    let mut sanitized: Vec<AbilityId> = Vec::with_capacity(limit);

    for id in definition.locked_abilities.iter().chain(selection.iter()) {
        if !sanitized.contains(id) {
            sanitized.push(id.clone());
        }
    }

    while sanitized.len() > limit {
        let Some(index) = sanitized
            .iter()
            .position(|id| !definition.locked_abilities.contains(id))
        else {
            break;
        };
        let _ = sanitized.remove(index);
    }

    sanitized
}

fn to_battle_fighter(
    definition: FighterDefinition,
    position: Position,
    modifiers: Option<StatModifiers>,
    abilities: Vec<Ability>,
) -> BattleFighter {
    let modifiers = modifiers.unwrap_or_default();
    BattleFighter {
        id: definition.id,
        name: definition.name,
        position,
        hp: definition.max_hp,
        max_hp: definition.max_hp,
        attack_bonus: definition.attack_bonus + modifiers.attack_bonus,
        defense_bonus: definition.defense_bonus + modifiers.defense_bonus,
        speed: definition.speed,
        accuracy: definition.accuracy,
        evasion: definition.evasion,
        luck: definition.luck,
        abilities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::{AbilityKind, Targeting};

    fn ability(id: &str) -> Ability {
        Ability {
            id: AbilityId::new(id),
            name: id.to_owned(),
            kind: AbilityKind::Physical,
            targeting: Targeting::AnyEnemy,
            damage_by_rank: vec!["1d6".to_owned()],
            rank: AbilityRank::default(),
            cooldown: None,
        }
    }

    fn fighter(id: &str, abilities: &[&str]) -> FighterDefinition {
        FighterDefinition {
            id: FighterId::new(id),
            name: id.to_owned(),
            max_hp: 40,
            attack_bonus: 3,
            defense_bonus: 2,
            speed: 4,
            accuracy: 2,
            evasion: 1,
            luck: 1,
            position: None,
            abilities: abilities.iter().copied().map(ability).collect(),
            locked_abilities: Vec::new(),
            default_active_abilities: Vec::new(),
            loadout_size: None,
        }
    }

    #[test]
    fn sanitized_loadouts_never_drop_locked_abilities() {
        let mut definition = fighter("vex", &["claw", "howl", "dash", "bite", "guard"]);
        definition.locked_abilities = vec![AbilityId::new("guard")];

        let selection = vec![
            AbilityId::new("claw"),
            AbilityId::new("howl"),
            AbilityId::new("dash"),
            AbilityId::new("bite"),
        ];
        let sanitized = sanitize_loadout(&definition, &selection);

        assert_eq!(sanitized.len(), definition.loadout_limit());
        assert!(sanitized.contains(&AbilityId::new("guard")));
    }

    #[test]
    fn sanitization_collapses_duplicates_in_first_seen_order() {
        let definition = fighter("vex", &["claw", "howl"]);
        let selection = vec![
            AbilityId::new("howl"),
            AbilityId::new("claw"),
            AbilityId::new("howl"),
        ];

        let sanitized = sanitize_loadout(&definition, &selection);

        assert_eq!(sanitized, vec![AbilityId::new("howl"), AbilityId::new("claw")]);
    }

    #[test]
    fn unfilterable_loadouts_keep_the_full_pool() {
        let definitions = vec![fighter("vex", &["claw", "howl"])];
        let view = FighterTableView::new(&definitions);
        let party = PartyRoster::new(vec![
            FighterId::new("vex"),
            FighterId::new("b"),
            FighterId::new("c"),
        ])
        .expect("valid party");

        let mut loadouts = LoadoutMap::new();
        let _ = loadouts.insert(
            FighterId::new("vex"),
            vec![AbilityId::new("nonexistent_ability")],
        );

        let roster = build_player_roster(
            &party,
            view,
            StatModifiers::default(),
            &loadouts,
            &RankMap::new(),
        );

        assert_eq!(roster[0].abilities.len(), 2, "full pool survives");
    }

    #[test]
    fn rank_overrides_clamp_to_the_maximum() {
        let definitions = vec![fighter("vex", &["claw"])];
        let view = FighterTableView::new(&definitions);
        let party = PartyRoster::new(vec![
            FighterId::new("vex"),
            FighterId::new("b"),
            FighterId::new("c"),
        ])
        .expect("valid party");

        let mut ranks = RankMap::new();
        let mut overrides = BTreeMap::new();
        let _ = overrides.insert(AbilityId::new("claw"), 5);
        let _ = ranks.insert(FighterId::new("vex"), overrides);

        let roster = build_player_roster(
            &party,
            view,
            StatModifiers::default(),
            &LoadoutMap::new(),
            &ranks,
        );

        assert_eq!(roster[0].abilities[0].rank.get(), 3);
    }

    #[test]
    fn party_modifiers_shift_bonuses_for_every_member() {
        let definitions = vec![fighter("vex", &["claw"])];
        let view = FighterTableView::new(&definitions);
        let party = PartyRoster::new(vec![
            FighterId::new("vex"),
            FighterId::new("b"),
            FighterId::new("c"),
        ])
        .expect("valid party");

        let roster = build_player_roster(
            &party,
            view,
            StatModifiers {
                attack_bonus: 2,
                defense_bonus: 1,
            },
            &LoadoutMap::new(),
            &RankMap::new(),
        );

        assert_eq!(roster[0].attack_bonus, 5);
        assert_eq!(roster[0].defense_bonus, 3);
        // Fallback members start from the generic +2/+1 baseline.
        assert_eq!(roster[1].attack_bonus, 4);
        assert_eq!(roster[1].defense_bonus, 2);
    }

    #[test]
    fn slots_decide_positions_unless_a_preference_exists() {
        let mut preferring = fighter("anchor", &["claw"]);
        preferring.position = Some(Position::Back);
        let definitions = vec![preferring, fighter("second", &["howl"])];
        let view = FighterTableView::new(&definitions);
        let party = PartyRoster::new(vec![
            FighterId::new("anchor"),
            FighterId::new("second"),
            FighterId::new("third"),
        ])
        .expect("valid party");

        let roster = build_player_roster(
            &party,
            view,
            StatModifiers::default(),
            &LoadoutMap::new(),
            &RankMap::new(),
        );

        assert_eq!(roster[0].position, Position::Back);
        assert_eq!(roster[1].position, Position::Mid);
    }

    #[test]
    fn default_active_abilities_stand_in_for_missing_loadouts() {
        let mut definition = fighter("vex", &["claw", "howl", "dash"]);
        definition.default_active_abilities = vec![AbilityId::new("dash")];
        let definitions = vec![definition];
        let view = FighterTableView::new(&definitions);
        let party = PartyRoster::new(vec![
            FighterId::new("vex"),
            FighterId::new("b"),
            FighterId::new("c"),
        ])
        .expect("valid party");

        let roster = build_player_roster(
            &party,
            view,
            StatModifiers::default(),
            &LoadoutMap::new(),
            &RankMap::new(),
        );

        assert_eq!(roster[0].abilities.len(), 1);
        assert_eq!(roster[0].abilities[0].id, AbilityId::new("dash"));
    }

    #[test]
    fn rosters_never_share_ability_lists() {
        let definitions = vec![fighter("vex", &["claw"])];
        let view = FighterTableView::new(&definitions);
        let party = PartyRoster::new(vec![
            FighterId::new("vex"),
            FighterId::new("b"),
            FighterId::new("c"),
        ])
        .expect("valid party");

        let mut first = build_player_roster(
            &party,
            view,
            StatModifiers::default(),
            &LoadoutMap::new(),
            &RankMap::new(),
        );
        let second = build_player_roster(
            &party,
            view,
            StatModifiers::default(),
            &LoadoutMap::new(),
            &RankMap::new(),
        );

        first[0].abilities.clear();

        assert_eq!(second[0].abilities.len(), 1);
        assert_eq!(definitions[0].abilities.len(), 1);
    }
}
