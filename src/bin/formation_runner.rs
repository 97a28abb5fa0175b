//! Headless Formation Runner
//!
//! Arranges a stack into a formation, resolves one attack against it and
//! prints the formation plus the damage report.

use clap::Parser;
use fleet_tactics::combat::{counter_adjusted_damage, resolve_incoming, DamageReport};
use fleet_tactics::formation::{
    assign_formation, AttackDirection, DamageDistributor, Formation, FormationType,
};
use fleet_tactics::{catalog, set_catalog, HpBucket, ShipStack, ShipType, TacticsCatalog};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Headless Formation Runner - slot assignment and damage split
#[derive(Parser, Debug)]
#[command(name = "formation_runner")]
#[command(about = "Arrange a stack into a formation and resolve an attack against it")]
struct Args {
    /// Defending formation type
    #[arg(long, default_value = "Line")]
    formation: String,

    /// Attack direction: Frontal, Flanking, Rear or Envelopment
    #[arg(long, default_value = "Frontal")]
    direction: String,

    /// Raw incoming damage
    #[arg(long, default_value_t = 1000)]
    damage: u64,

    /// Attacking formation type (applies the counter multiplier)
    #[arg(long)]
    attacker: Option<String>,

    /// JSON stack file ({"Fighter": [{"perShipHP": 20, "count": 5}], ...})
    #[arg(long)]
    stack: Option<PathBuf>,

    /// Random seed for generated stacks
    #[arg(long)]
    seed: Option<u64>,

    /// TOML catalog overrides
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Number of independent random battles to run
    #[arg(long, default_value_t = 1)]
    battles: usize,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct BattleResult {
    seed: u64,
    formation: Formation,
    unplaced_buckets: usize,
    effective_speed: f32,
    damage: u64,
    report: DamageReport,
}

fn main() -> fleet_tactics::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fleet_tactics=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(path) = &args.catalog {
        match TacticsCatalog::load(path) {
            Ok(custom) => {
                if set_catalog(custom).is_err() {
                    tracing::warn!("Catalog already initialized; ignoring {:?}", path);
                }
            }
            Err(e) => tracing::warn!("Failed to load catalog {:?}: {} - using defaults", path, e),
        }
    }

    let formation_type = FormationType::from_name(&args.formation);
    if formation_type == FormationType::Unknown {
        tracing::warn!("Unknown formation '{}' - nothing will be placed", args.formation);
    }
    let direction = AttackDirection::from_name(&args.direction);
    let attacker = args.attacker.as_deref().map(FormationType::from_name);

    let seed = args.seed.unwrap_or_else(|| rand::random());

    let fixed_stack = match &args.stack {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            Some(serde_json::from_str::<ShipStack>(&content)?)
        }
        None => None,
    };

    let results: Vec<BattleResult> = (0..args.battles.max(1) as u64)
        .into_par_iter()
        .map(|i| {
            let battle_seed = seed.wrapping_add(i);
            let stack = fixed_stack
                .clone()
                .unwrap_or_else(|| random_stack(battle_seed));
            run_battle(&stack, battle_seed, formation_type, direction, attacker, args.damage)
        })
        .collect();

    match args.format.as_str() {
        "text" => {
            for result in &results {
                print_text(result);
            }
        }
        _ => {
            if results.len() == 1 {
                println!("{}", serde_json::to_string_pretty(&results[0])?);
            } else {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
    }

    Ok(())
}

fn run_battle(
    stack: &ShipStack,
    seed: u64,
    formation_type: FormationType,
    direction: AttackDirection,
    attacker: Option<FormationType>,
    raw_damage: u64,
) -> BattleResult {
    let catalog = catalog();
    let formation = assign_formation(stack, formation_type);

    let damage = match attacker {
        Some(attacker) => {
            counter_adjusted_damage(&catalog.counters, raw_damage, attacker, formation_type)
        }
        None => raw_damage,
    };

    let distributor = DamageDistributor::new(&catalog.weights);
    let report = resolve_incoming(&distributor, &formation, damage, direction);

    BattleResult {
        seed,
        unplaced_buckets: formation.unplaced_buckets(stack),
        effective_speed: catalog.formations.effective_speed(formation_type, stack),
        formation,
        damage,
        report,
    }
}

/// Generate a plausible stack: a few hull classes, a few buckets each
fn random_stack(seed: u64) -> ShipStack {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut stack = ShipStack::new();

    let hull_classes = rng.gen_range(2..=6);
    for _ in 0..hull_classes {
        let ship_type = ShipType::ALL[rng.gen_range(0..ShipType::ALL.len())];
        let buckets = rng.gen_range(1..=3);
        for _ in 0..buckets {
            let bucket = HpBucket::new(rng.gen_range(10..=400), rng.gen_range(1..=20));
            stack.push_bucket(ship_type, bucket);
        }
    }

    stack
}

fn print_text(result: &BattleResult) {
    let formation = &result.formation;
    println!(
        "=== seed {} | {} | speed {:.2} | {} unplaced ===",
        result.seed, formation.formation_type, result.effective_speed, result.unplaced_buckets
    );
    for (index, assignment) in formation.assignments.iter().enumerate() {
        println!(
            "  [{:>2}] {:<8} {:<10} bucket {} x{:<3} hp {:>6} -> -{}",
            index,
            assignment.position,
            assignment.ship_type,
            assignment.bucket_index,
            assignment.count,
            assignment.assigned_hp,
            result.report.damage_to(index)
        );
    }
    println!(
        "  incoming {} | distributed {} | lost {}",
        result.report.incoming, result.report.distributed, result.report.lost_to_rounding
    );
}
