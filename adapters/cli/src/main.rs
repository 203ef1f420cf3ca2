#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives Gauntlet campaign runs.

mod explore;
mod roster;
mod transfer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gauntlet_core::{
    describe_stage, BattleOptions, Command, Event, FighterId, FighterTableView, LoadoutMap,
    PartyRoster, RankMap, RunOptions, StageOutcome, WELCOME_BANNER,
};
use gauntlet_run::{apply, query, Run};
use gauntlet_skirmish::SkirmishSimulator;
use gauntlet_system_progression::start_run;
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::explore::Exploration;
use crate::transfer::PartyBuildSnapshot;

/// Command-line interface for the Gauntlet campaign engine.
#[derive(Parser)]
#[command(
    name = "gauntlet",
    version,
    about = "Runs the Gauntlet campaign from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Runs the campaign with the provided party.
    Run(RunArgs),
    /// Evaluates win rates across three-fighter parties.
    Explore(ExploreArgs),
    /// Prints a shareable build code for a party selection.
    Share(ShareArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Comma-separated fighter ids (exactly three).
    #[arg(
        long,
        value_delimiter = ',',
        conflicts_with = "build_code",
        required_unless_present = "build_code"
    )]
    party: Vec<String>,
    /// Build code to restore the party, loadouts and ranks from.
    #[arg(long)]
    build_code: Option<String>,
    /// Seed for the battle resolver; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Path to a JSON fighter definition file.
    #[arg(long)]
    fighters: Option<PathBuf>,
    /// Skip narrative battle logs.
    #[arg(long)]
    no_log: bool,
    /// Print the final run snapshot as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExploreArgs {
    /// Campaign attempts per party.
    #[arg(long, default_value_t = 10)]
    runs: u32,
    /// Cap on the number of parties evaluated.
    #[arg(long)]
    limit: Option<usize>,
    /// Base seed for the simulator streams; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Path to a JSON fighter definition file.
    #[arg(long)]
    fighters: Option<PathBuf>,
}

#[derive(Args)]
struct ShareArgs {
    /// Comma-separated fighter ids (exactly three).
    #[arg(long, value_delimiter = ',')]
    party: Vec<String>,
    /// Path to a JSON fighter definition file.
    #[arg(long)]
    fighters: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        CliCommand::Run(args) => run_campaign(args),
        CliCommand::Explore(args) => explore_parties(args),
        CliCommand::Share(args) => share_build(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_campaign(args: RunArgs) -> Result<()> {
    let fighters = roster::load(args.fighters.as_deref())?;
    let mut run = Run::new(fighters);
    let mut events: Vec<Event> = Vec::new();

    let party: Vec<FighterId> = match &args.build_code {
        Some(code) => {
            let snapshot = PartyBuildSnapshot::decode(code).context("invalid build code")?;
            apply(
                &mut run,
                Command::SetLoadouts {
                    loadouts: snapshot.loadouts,
                },
                &mut events,
            );
            apply(
                &mut run,
                Command::SetAbilityRanks {
                    ranks: snapshot.ability_ranks,
                },
                &mut events,
            );
            snapshot.party
        }
        None => args.party.iter().map(FighterId::new).collect(),
    };

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "starting campaign run");
    let mut simulator = SkirmishSimulator::new(seed);

    let options = RunOptions {
        auto: true,
        battle: BattleOptions {
            log: !args.no_log,
            track_stats: true,
        },
    };
    start_run(&mut run, &mut simulator, party, &options, &mut events)
        .context("party selection rejected")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&query::run_view(&run))?);
        return Ok(());
    }

    println!("{WELCOME_BANNER}");
    for (index, result) in query::results(&run).iter().enumerate() {
        let label = query::campaign(&run)
            .stage(index)
            .map(|stage| describe_stage(stage, index))
            .unwrap_or_else(|| result.stage.as_str().to_owned());
        println!("{label} vs {}: {}", result.enemy, result.outcome);
        if !args.no_log && !result.log.is_empty() {
            for line in result.log.lines() {
                println!("    {line}");
            }
        }
    }

    let view = query::run_view(&run);
    let cleared = view
        .results
        .iter()
        .filter(|result| result.outcome == StageOutcome::Cleared)
        .count();
    println!();
    println!("Status: {}", view.status);
    println!("Stages cleared: {cleared} / {}", view.stage_count);
    println!("Rank-up points: {}", view.rank_points);
    println!(
        "Rounds fought: {}, turns taken: {}",
        view.stats.total_rounds, view.stats.total_turns
    );
    for (id, damage) in &view.stats.damage_by_member {
        println!("  {id}: {damage} damage dealt");
    }

    Ok(())
}

fn explore_parties(args: ExploreArgs) -> Result<()> {
    let fighters = roster::load(args.fighters.as_deref())?;
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, runs = args.runs, "starting exploration sweep");

    let report = explore::run_exploration(
        fighters,
        &Exploration {
            runs: args.runs.max(1),
            limit: args.limit,
            seed,
        },
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn share_build(args: ShareArgs) -> Result<()> {
    let fighters = roster::load(args.fighters.as_deref())?;
    let party: Vec<FighterId> = args.party.iter().map(FighterId::new).collect();
    let _ = PartyRoster::new(party.clone()).context("party selection rejected")?;

    let view = FighterTableView::new(&fighters);
    let loadouts: LoadoutMap = party
        .iter()
        .map(|id| (id.clone(), roster::default_loadout(&view.resolve(id))))
        .collect();

    let snapshot = PartyBuildSnapshot {
        party,
        loadouts,
        ability_ranks: RankMap::new(),
    };
    println!("{}", snapshot.encode());

    Ok(())
}
