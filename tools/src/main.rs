//! week-runner: headless weekly planning runner.
//!
//! Usage:
//!   week-runner --input facts.json --week-start 2024-04-01
//!   week-runner --seed 12345 --agents 40 --week-start 2024-04-01 --json

mod roster;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use shiftdesk_core::{
    config::PlannerConfig,
    engine::{PlannerEngine, PlanningFacts},
    snapshot::WeeklySnapshot,
    weekly_metrics::WeeklyMetrics,
    weekly_plan::WeeklyPlan,
};
use std::env;

/// Monday used when `--week-start` is omitted, so default runs repeat.
const DEFAULT_WEEK_START: &str = "2024-04-01";

#[derive(serde::Serialize)]
struct RunReport<'a> {
    plan: &'a WeeklyPlan,
    metrics: &'a WeeklyMetrics,
    snapshot: &'a WeeklySnapshot,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let agents = parse_arg(&args, "--agents", 12usize);
    let json_mode = args.iter().any(|a| a == "--json");
    let input = string_arg(&args, "--input");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");
    let week_start = week_start_arg(&args)?;

    let config = PlannerConfig::load(data_dir).unwrap_or_else(|e| {
        log::warn!("Using default planner config: {e}");
        PlannerConfig::default()
    });
    let engine = PlannerEngine::build(config);

    let facts = match input {
        Some(path) => load_facts(path)?,
        None => roster::synthetic_facts(seed, agents, week_start),
    };

    if !json_mode {
        println!("Shift Desk - week-runner");
        println!("  week_start:  {week_start}");
        match input {
            Some(path) => println!("  input:       {path}"),
            None => println!("  synthetic:   seed {seed}, {agents} agents"),
        }
        println!("  data_dir:    {data_dir}");
        println!();
    }

    let plan = engine.build_weekly_plan(&facts, week_start)?;
    let metrics = engine.weekly_metrics(&plan);
    let snapshot = engine.weekly_snapshot(&facts, &plan);

    if json_mode {
        let report = RunReport { plan: &plan, metrics: &metrics, snapshot: &snapshot };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&facts, &metrics, &snapshot);
    }

    Ok(())
}

fn load_facts(path: &str) -> Result<PlanningFacts> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?;
    let facts = serde_json::from_str(&content).with_context(|| format!("Cannot parse {path}"))?;
    Ok(facts)
}

fn print_summary(facts: &PlanningFacts, metrics: &WeeklyMetrics, snapshot: &WeeklySnapshot) {
    let t = &snapshot.totals;

    println!("=== WEEK {} ({} .. {}) ===", snapshot.iso_week, snapshot.week_start, snapshot.week_end);
    println!("  snapshot id:    {}", snapshot.id);
    println!("  agents:         {}", metrics.by_representative.len());
    println!("  incidents:      {}", facts.incidents.len());
    println!("  coverages:      {}", facts.coverages.len());
    println!("  worked days:    {}", metrics.total_worked_days);
    println!("  absence days:   {}", metrics.total_absence_days);
    println!("  eligible:       {}", metrics.incentive_eligible_count);

    println!();
    println!("=== SLOT LEDGER ===");
    println!("  planned:        {}", t.planned_slots);
    println!("  executed:       {}", t.executed_slots);
    println!("  absences:       {}", t.absence_slots);
    println!("  covered:        {}", t.covered_slots);
    println!("  covering:       {}", t.covering_slots);
    println!("  uncovered:      {}", t.uncovered_slots);
    if t.invariant_violations > 0 {
        println!("  VIOLATIONS:     {}", t.invariant_violations);
    }

    println!();
    println!("=== AGENTS ===");
    for (attendance, slots) in metrics.by_representative.iter().zip(&snapshot.by_representative) {
        let name = facts
            .representatives
            .iter()
            .find(|r| r.id == attendance.representative_id)
            .map(|r| r.name.as_str())
            .unwrap_or("?");
        println!(
            "  {:<8} {:<22} | worked {} | absent {} | slots {}/{} | {}",
            attendance.representative_id,
            name,
            attendance.worked_days,
            attendance.absence_days,
            slots.executed_slots,
            slots.planned_slots,
            if attendance.incentive_eligible { "eligible" } else { "-" }
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn week_start_arg(args: &[String]) -> Result<NaiveDate> {
    let raw = string_arg(args, "--week-start").unwrap_or(DEFAULT_WEEK_START);
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("--week-start must be YYYY-MM-DD, got {raw}"))
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}
