use gauntlet_core::{
    Campaign, EnemyTeam, FighterDefinition, FighterId, FighterTableView, Position, Stage,
    StatModifiers, TeamId,
};
use gauntlet_system_roster::build_enemy_roster;

fn no_fighters() -> Vec<FighterDefinition> {
    Vec::new()
}

#[test]
fn boss_stages_field_the_single_boss_at_its_declared_position() {
    let campaign = gauntlet_run::campaign::standard();
    let definitions = no_fighters();
    let view = FighterTableView::new(&definitions);

    let stage = &campaign.stages()[3];
    let roster = build_enemy_roster(stage, view, &campaign);

    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, FighterId::new("jata_boss"));
    assert_eq!(roster[0].name, "Jata, Thunderheart");
    assert_eq!(roster[0].position, Position::Front);
    assert_eq!(roster[0].hp, roster[0].max_hp);
}

#[test]
fn unknown_bosses_fall_back_instead_of_failing() {
    let campaign = Campaign::new(
        vec![Stage::boss("mystery", "unlisted_horror")],
        Vec::new(),
        Vec::new(),
    );
    let definitions = no_fighters();
    let view = FighterTableView::new(&definitions);

    let roster = build_enemy_roster(&campaign.stages()[0], view, &campaign);

    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, FighterId::new("unlisted_horror"));
    assert_eq!(roster[0].max_hp, 30);
}

#[test]
fn short_handed_teams_are_padded_with_filler_fighters() {
    let campaign = Campaign::new(
        vec![Stage::team("skirmish", "Raiders")],
        vec![EnemyTeam {
            id: TeamId::new("Raiders"),
            members: vec![FighterId::new("lone_wolf")],
        }],
        Vec::new(),
    );
    let definitions = no_fighters();
    let view = FighterTableView::new(&definitions);

    let roster = build_enemy_roster(&campaign.stages()[0], view, &campaign);

    assert_eq!(roster.len(), 3);
    assert_eq!(roster[0].id, FighterId::new("lone_wolf"));
    assert_eq!(roster[1].id, FighterId::new("Raiders_filler_2"));
    assert_eq!(roster[2].id, FighterId::new("Raiders_filler_3"));
}

#[test]
fn unconfigured_teams_still_field_three_fillers() {
    let campaign = Campaign::new(
        vec![Stage::team("skirmish", "Ghosts")],
        Vec::new(),
        Vec::new(),
    );
    let definitions = no_fighters();
    let view = FighterTableView::new(&definitions);

    let roster = build_enemy_roster(&campaign.stages()[0], view, &campaign);

    assert_eq!(roster.len(), 3);
    assert_eq!(roster[0].id, FighterId::new("Ghosts_filler_1"));
}

#[test]
fn stage_modifiers_shift_every_enemy_uniformly() {
    let campaign = Campaign::new(
        vec![Stage::team("hardened", "Veterans").with_enemy_modifiers(StatModifiers {
            attack_bonus: 3,
            defense_bonus: 2,
        })],
        Vec::new(),
        Vec::new(),
    );
    let definitions = no_fighters();
    let view = FighterTableView::new(&definitions);

    let roster = build_enemy_roster(&campaign.stages()[0], view, &campaign);

    for enemy in &roster {
        // Fallback fighters start at +2 attack and +1 defense.
        assert_eq!(enemy.attack_bonus, 5);
        assert_eq!(enemy.defense_bonus, 3);
    }
}
