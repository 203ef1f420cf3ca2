//! Standard campaign content: the seven-stage gauntlet.

use gauntlet_core::{
    Ability, AbilityId, AbilityKind, AbilityRank, Campaign, EnemyTeam, FighterDefinition,
    FighterId, Position, Stage, Targeting, TeamId,
};

/// Builds the standard seven-stage campaign.
///
/// Three team fights open the gauntlet, a boss guards the middle, one more
/// team fight follows, and two bosses close it out.
#[must_use]
pub fn standard() -> Campaign {
    Campaign::new(standard_stages(), standard_teams(), standard_bosses())
}

fn standard_stages() -> Vec<Stage> {
    vec![
        Stage::team("stage1", "K9PD"),
        Stage::team("stage2", "BabylonKnights"),
        Stage::team("stage3", "ForestFerals_ELITE"),
        Stage::boss("stage4", "jata_boss"),
        Stage::team("stage5", "AncientGuardians"),
        Stage::boss("stage6", "spirit_dragon"),
        Stage::boss("stage7", "great_kitsune"),
    ]
}

fn standard_teams() -> Vec<EnemyTeam> {
    vec![
        team("K9PD", &["thunder_pup", "brass_bunny", "shadow_fox"]),
        team("BabylonKnights", &["crystal_wolf", "ember_hawk", "arcane_otter"]),
        team("ForestFerals_ELITE", &["grove_guardian", "shadow_fox", "crystal_wolf"]),
        team("AncientGuardians", &["tidecaller", "grove_guardian", "ember_hawk"]),
    ]
}

fn team(id: &str, members: &[&str]) -> EnemyTeam {
    EnemyTeam {
        id: TeamId::new(id),
        members: members.iter().map(|m| FighterId::new(*m)).collect(),
    }
}

fn standard_bosses() -> Vec<FighterDefinition> {
    vec![jata_thunderheart(), spirit_dragon(), great_kitsune()]
}

fn jata_thunderheart() -> FighterDefinition {
    FighterDefinition {
        id: FighterId::new("jata_boss"),
        name: "Jata, Thunderheart".to_owned(),
        max_hp: 90,
        attack_bonus: 5,
        defense_bonus: 3,
        speed: 5,
        accuracy: 3,
        evasion: 2,
        luck: 2,
        position: Some(Position::Front),
        abilities: vec![Ability {
            id: AbilityId::new("storm_breaker"),
            name: "Storm Breaker".to_owned(),
            kind: AbilityKind::Physical,
            targeting: Targeting::FrontPreferred,
            damage_by_rank: vec!["2d10+6".to_owned()],
            rank: AbilityRank::default(),
            cooldown: Some(2),
        }],
        locked_abilities: Vec::new(),
        default_active_abilities: Vec::new(),
        loadout_size: None,
    }
}

fn spirit_dragon() -> FighterDefinition {
    FighterDefinition {
        id: FighterId::new("spirit_dragon"),
        name: "Spirit Dragon".to_owned(),
        max_hp: 105,
        attack_bonus: 4,
        defense_bonus: 4,
        speed: 6,
        accuracy: 4,
        evasion: 2,
        luck: 3,
        position: Some(Position::Mid),
        abilities: vec![Ability {
            id: AbilityId::new("astral_breath"),
            name: "Astral Breath".to_owned(),
            kind: AbilityKind::Magic,
            targeting: Targeting::AnyEnemy,
            damage_by_rank: vec!["2d12+4".to_owned()],
            rank: AbilityRank::default(),
            cooldown: Some(2),
        }],
        locked_abilities: Vec::new(),
        default_active_abilities: Vec::new(),
        loadout_size: None,
    }
}

fn great_kitsune() -> FighterDefinition {
    FighterDefinition {
        id: FighterId::new("great_kitsune"),
        name: "Great Kitsune".to_owned(),
        max_hp: 95,
        attack_bonus: 4,
        defense_bonus: 3,
        speed: 7,
        accuracy: 4,
        evasion: 3,
        luck: 4,
        position: Some(Position::Back),
        abilities: vec![Ability {
            id: AbilityId::new("foxfire_barrage"),
            name: "Foxfire Barrage".to_owned(),
            kind: AbilityKind::Magic,
            targeting: Targeting::AnyEnemy,
            damage_by_rank: vec!["2d8+6".to_owned()],
            rank: AbilityRank::default(),
            cooldown: Some(1),
        }],
        locked_abilities: Vec::new(),
        default_active_abilities: Vec::new(),
        loadout_size: None,
    }
}
