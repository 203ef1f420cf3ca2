//! Fighter definitions available to the command line: a built-in demo
//! roster, or a JSON file supplied by the player.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gauntlet_core::{
    Ability, AbilityId, AbilityKind, AbilityRank, FighterDefinition, FighterId, Position,
    Targeting,
};
use gauntlet_system_roster::sanitize_loadout;

/// Loads fighter definitions from the provided file, or falls back to the
/// built-in demo roster. A broken file propagates as an error rather than
/// silently degrading to the demo content.
pub(crate) fn load(path: Option<&Path>) -> Result<Vec<FighterDefinition>> {
    match path {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("could not read fighter file {}", path.display()))?;
            let fighters: Vec<FighterDefinition> = serde_json::from_str(&data)
                .with_context(|| format!("could not parse fighter file {}", path.display()))?;
            Ok(fighters)
        }
        None => Ok(demo_roster()),
    }
}

/// Loadout a fighter starts with before the player customizes anything:
/// the declared default selection when one exists, otherwise the full pool,
/// sanitized against the fighter's loadout constraints.
pub(crate) fn default_loadout(definition: &FighterDefinition) -> Vec<AbilityId> {
    let preferred: Vec<AbilityId> = if definition.default_active_abilities.is_empty() {
        definition
            .abilities
            .iter()
            .map(|ability| ability.id.clone())
            .collect()
    } else {
        definition.default_active_abilities.clone()
    };
    sanitize_loadout(definition, &preferred)
}

fn ability(
    id: &str,
    name: &str,
    kind: AbilityKind,
    targeting: Targeting,
    damage: &[&str],
    cooldown: Option<u32>,
) -> Ability {
    Ability {
        id: AbilityId::new(id),
        name: name.to_owned(),
        kind,
        targeting,
        damage_by_rank: damage.iter().map(|entry| (*entry).to_owned()).collect(),
        rank: AbilityRank::default(),
        cooldown,
    }
}

fn demo_roster() -> Vec<FighterDefinition> {
    vec![
        FighterDefinition {
            id: FighterId::new("thunder_pup"),
            name: "Thunder Pup".to_owned(),
            max_hp: 38,
            attack_bonus: 4,
            defense_bonus: 2,
            speed: 5,
            accuracy: 3,
            evasion: 2,
            luck: 2,
            position: None,
            abilities: vec![
                ability(
                    "static_bite",
                    "Static Bite",
                    AbilityKind::Physical,
                    Targeting::AnyEnemy,
                    &["1d8+3", "1d8+5", "1d10+6"],
                    None,
                ),
                ability(
                    "thunder_howl",
                    "Thunder Howl",
                    AbilityKind::Magic,
                    Targeting::AnyEnemy,
                    &["1d10+2", "2d6+3", "2d8+4"],
                    Some(2),
                ),
            ],
            locked_abilities: vec![AbilityId::new("static_bite")],
            default_active_abilities: Vec::new(),
            loadout_size: None,
        },
        FighterDefinition {
            id: FighterId::new("brass_bunny"),
            name: "Brass Bunny".to_owned(),
            max_hp: 34,
            attack_bonus: 3,
            defense_bonus: 4,
            speed: 4,
            accuracy: 2,
            evasion: 3,
            luck: 1,
            position: Some(Position::Front),
            abilities: vec![
                ability(
                    "brass_kick",
                    "Brass Kick",
                    AbilityKind::Physical,
                    Targeting::FrontPreferred,
                    &["1d8+2", "1d10+3", "1d10+5"],
                    None,
                ),
                ability(
                    "burrow_guard",
                    "Burrow Guard",
                    AbilityKind::Support,
                    Targeting::FrontPreferred,
                    &["0", "0", "0"],
                    Some(3),
                ),
                ability(
                    "lucky_thump",
                    "Lucky Thump",
                    AbilityKind::Physical,
                    Targeting::AnyEnemy,
                    &["1d12+1", "1d12+3", "2d8+2"],
                    Some(2),
                ),
            ],
            locked_abilities: Vec::new(),
            default_active_abilities: Vec::new(),
            loadout_size: None,
        },
        FighterDefinition {
            id: FighterId::new("shadow_fox"),
            name: "Shadow Fox".to_owned(),
            max_hp: 30,
            attack_bonus: 5,
            defense_bonus: 1,
            speed: 6,
            accuracy: 4,
            evasion: 4,
            luck: 3,
            position: Some(Position::Back),
            abilities: vec![
                ability(
                    "shadow_slash",
                    "Shadow Slash",
                    AbilityKind::Physical,
                    Targeting::AnyEnemy,
                    &["1d10+3", "1d10+5", "1d12+6"],
                    None,
                ),
                ability(
                    "night_veil",
                    "Night Veil",
                    AbilityKind::Support,
                    Targeting::AnyEnemy,
                    &["0", "0", "0"],
                    Some(3),
                ),
                ability(
                    "trick_step",
                    "Trick Step",
                    AbilityKind::Physical,
                    Targeting::FrontPreferred,
                    &["1d6+4", "1d8+4", "1d8+6"],
                    None,
                ),
            ],
            locked_abilities: vec![AbilityId::new("shadow_slash")],
            default_active_abilities: Vec::new(),
            loadout_size: None,
        },
        FighterDefinition {
            id: FighterId::new("crystal_wolf"),
            name: "Crystal Wolf".to_owned(),
            max_hp: 42,
            attack_bonus: 4,
            defense_bonus: 3,
            speed: 4,
            accuracy: 3,
            evasion: 1,
            luck: 2,
            position: None,
            abilities: vec![
                ability(
                    "crystal_fang",
                    "Crystal Fang",
                    AbilityKind::Physical,
                    Targeting::AnyEnemy,
                    &["1d8+4", "1d10+4", "1d10+6"],
                    None,
                ),
                ability(
                    "prism_howl",
                    "Prism Howl",
                    AbilityKind::Magic,
                    Targeting::AnyEnemy,
                    &["1d12+2", "2d6+4", "2d8+5"],
                    Some(2),
                ),
            ],
            locked_abilities: Vec::new(),
            default_active_abilities: Vec::new(),
            loadout_size: Some(3),
        },
        FighterDefinition {
            id: FighterId::new("ember_hawk"),
            name: "Ember Hawk".to_owned(),
            max_hp: 32,
            attack_bonus: 5,
            defense_bonus: 2,
            speed: 6,
            accuracy: 4,
            evasion: 3,
            luck: 1,
            position: Some(Position::Back),
            abilities: vec![
                ability(
                    "ember_dive",
                    "Ember Dive",
                    AbilityKind::Physical,
                    Targeting::FrontPreferred,
                    &["1d10+2", "1d10+4", "1d12+5"],
                    None,
                ),
                ability(
                    "cinder_storm",
                    "Cinder Storm",
                    AbilityKind::Magic,
                    Targeting::AnyEnemy,
                    &["2d6+2", "2d8+2", "2d10+3"],
                    Some(2),
                ),
            ],
            locked_abilities: Vec::new(),
            default_active_abilities: Vec::new(),
            loadout_size: None,
        },
        FighterDefinition {
            id: FighterId::new("arcane_otter"),
            name: "Arcane Otter".to_owned(),
            max_hp: 33,
            attack_bonus: 3,
            defense_bonus: 2,
            speed: 5,
            accuracy: 3,
            evasion: 2,
            luck: 4,
            position: Some(Position::Mid),
            abilities: vec![
                ability(
                    "arcane_splash",
                    "Arcane Splash",
                    AbilityKind::Magic,
                    Targeting::AnyEnemy,
                    &["1d8+2", "1d10+3", "2d6+4"],
                    None,
                ),
                ability(
                    "tide_ward",
                    "Tide Ward",
                    AbilityKind::Support,
                    Targeting::AnyEnemy,
                    &["0", "0", "0"],
                    Some(3),
                ),
                ability(
                    "bubble_jet",
                    "Bubble Jet",
                    AbilityKind::Magic,
                    Targeting::FrontPreferred,
                    &["1d6+3", "1d8+3", "1d8+5"],
                    None,
                ),
            ],
            locked_abilities: Vec::new(),
            default_active_abilities: vec![
                AbilityId::new("arcane_splash"),
                AbilityId::new("bubble_jet"),
            ],
            loadout_size: None,
        },
        FighterDefinition {
            id: FighterId::new("grove_guardian"),
            name: "Grove Guardian".to_owned(),
            max_hp: 45,
            attack_bonus: 3,
            defense_bonus: 4,
            speed: 3,
            accuracy: 2,
            evasion: 1,
            luck: 1,
            position: Some(Position::Front),
            abilities: vec![
                ability(
                    "root_slam",
                    "Root Slam",
                    AbilityKind::Physical,
                    Targeting::FrontPreferred,
                    &["1d10+3", "1d12+3", "1d12+5"],
                    None,
                ),
                ability(
                    "bark_armor",
                    "Bark Armor",
                    AbilityKind::Support,
                    Targeting::FrontPreferred,
                    &["0", "0", "0"],
                    Some(3),
                ),
                ability(
                    "verdant_pulse",
                    "Verdant Pulse",
                    AbilityKind::Magic,
                    Targeting::AnyEnemy,
                    &["1d8+3", "2d6+3", "2d6+5"],
                    Some(2),
                ),
            ],
            locked_abilities: vec![AbilityId::new("root_slam")],
            default_active_abilities: Vec::new(),
            loadout_size: None,
        },
        FighterDefinition {
            id: FighterId::new("tidecaller"),
            name: "Tidecaller".to_owned(),
            max_hp: 36,
            attack_bonus: 4,
            defense_bonus: 2,
            speed: 4,
            accuracy: 3,
            evasion: 2,
            luck: 3,
            position: Some(Position::Back),
            abilities: vec![
                ability(
                    "tide_surge",
                    "Tide Surge",
                    AbilityKind::Magic,
                    Targeting::AnyEnemy,
                    &["1d10+3", "2d6+3", "2d8+4"],
                    None,
                ),
                ability(
                    "undertow",
                    "Undertow",
                    AbilityKind::Magic,
                    Targeting::FrontPreferred,
                    &["1d8+2", "1d8+4", "1d10+5"],
                    Some(2),
                ),
                ability(
                    "brine_shield",
                    "Brine Shield",
                    AbilityKind::Support,
                    Targeting::AnyEnemy,
                    &["0", "0", "0"],
                    Some(3),
                ),
            ],
            locked_abilities: Vec::new(),
            default_active_abilities: Vec::new(),
            loadout_size: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_roster_ids_are_unique() {
        let roster = demo_roster();
        for (index, fighter) in roster.iter().enumerate() {
            assert!(
                roster[index + 1..].iter().all(|other| other.id != fighter.id),
                "duplicate id {}",
                fighter.id
            );
        }
    }

    #[test]
    fn default_loadouts_respect_declared_limits() {
        for fighter in demo_roster() {
            let loadout = default_loadout(&fighter);
            assert!(!loadout.is_empty());
            assert!(loadout.len() <= fighter.loadout_limit());
            for locked in &fighter.locked_abilities {
                assert!(loadout.contains(locked));
            }
        }
    }

    #[test]
    fn default_active_selections_are_honored() {
        let roster = demo_roster();
        let otter = roster
            .iter()
            .find(|fighter| fighter.id == FighterId::new("arcane_otter"))
            .expect("otter is in the demo roster");

        let loadout = default_loadout(otter);
        assert_eq!(
            loadout,
            vec![AbilityId::new("arcane_splash"), AbilityId::new("bubble_jet")]
        );
    }
}
