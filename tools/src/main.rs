//! konto-runner: headless demo runner for the kontosim engine.
//!
//! Usage:
//!   konto-runner --seed 42 --rounds 10 --db konto.db
//!
//! Seeds three demo accounts (one referred), runs a few rounds of
//! quick-random generation, fires a custom preset, performs a transfer
//! and a threshold-crossing top-up, then prints a summary.

use anyhow::Result;
use kontosim_core::{
    engine::BankEngine,
    factory::Direction,
    preset::{Category, Preset},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let rounds = parse_arg(&args, "--rounds", 10u64);
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");

    println!("kontosim — konto-runner");
    println!("  seed:   {seed}");
    println!("  rounds: {rounds}");
    println!("  db:     {db}");
    println!();

    let mut engine = if db == ":memory:" {
        BankEngine::in_memory(seed)?
    } else {
        BankEngine::open(db, seed)?
    };

    // Demo population: carol was referred by alice.
    for (id, name, referred_by) in [
        ("alice", "Alice", None),
        ("bob", "Bob", None),
        ("carol", "Carol", Some("alice".to_string())),
    ] {
        if engine.store().get_account(id)?.is_none() {
            engine.create_account(id, name, referred_by)?;
        }
    }

    // Fund the senders with real money.
    engine.top_up("alice", 500.0)?;
    engine.top_up("bob", 250.0)?;

    // A custom income preset alice can replay her top-ups through.
    engine.define_preset(Preset::new(
        "salary-replay",
        "Monthly salary",
        Direction::Income,
        Category::Salary,
        40.0,
        60.0,
        None,
        true,
    )?)?;

    // Move real money to bob first: spending certified funds is what
    // opens alice's recharge margin for the income preset below.
    engine.transfer("alice", "bob", 75.0)?;
    match engine.trigger_preset("alice", "salary-replay") {
        Ok(outcome) => println!(
            "preset fired: {} +{}",
            outcome.entry.description,
            outcome.entry.amount_string()
        ),
        Err(e) => println!("preset rejected: {e}"),
    }

    // Quick-random noise on each funded account.
    for _ in 0..rounds {
        for id in ["alice", "bob"] {
            if let Some(outcome) = engine.apply_quick_random_expense(id, &[])? {
                log::info!(
                    "{id}: {} -{} (display {:.2})",
                    outcome.entry.description,
                    outcome.entry.amount_string(),
                    outcome.new_display_balance
                );
            }
        }
    }

    // Carol's top-up crosses the referral threshold; alice gets paid.
    let outcome = engine.top_up("carol", 3.0)?;
    if outcome.referral_bonus_awarded {
        println!(
            "referral bonus awarded to {}",
            outcome.referrer_name.as_deref().unwrap_or("?")
        );
    }

    print_summary(&engine)?;
    Ok(())
}

fn print_summary(engine: &BankEngine) -> Result<()> {
    println!();
    println!("=== summary ({} accounts) ===", engine.store().account_count()?);
    for account in engine.store().all_accounts()? {
        let txns = engine.store().transaction_count(&account.account_id)?;
        println!(
            "{:8} display={:9.2} tracked={:9.2} certified={:9.2} recharged={:8.2} txns={txns}",
            account.account_id,
            account.balances.display,
            account.balances.tracked,
            account.balances.certified,
            account.total_recharged,
        );
    }
    println!(
        "referral activations: {}",
        engine.store().activation_count()?
    );

    if let Some(last) = engine.store().list_transactions("alice")?.first() {
        println!("last alice entry: {}", serde_json::to_string_pretty(last)?);
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
