//! Materialise the current week's roster in PostgreSQL, optionally seeding
//! resident accounts first. Intended for cron jobs and deploy hooks.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::sync::Arc;

use chore_roster::domain::ports::RosterCommand;
use chore_roster::domain::{AccountSeeder, RosterService};
use chore_roster::outbound::persistence::{
    DbPool, DieselRosterRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use chore_roster::outbound::security::Argon2PasswordHasher;
use chrono::FixedOffset;
use clap::Parser;
use mockable::DefaultClock;
use tokio::runtime::Builder;

const DATABASE_URL_VARS: [&str; 2] = ["ROSTER_DATABASE_URL", "DATABASE_URL"];

/// `ensure-roster` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ensure-roster",
    about = "Create this week's chore roster if it does not exist yet",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `ROSTER_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Offset from UTC, in minutes, used to decide which week is current.
    #[arg(
        long = "utc-offset-minutes",
        value_name = "minutes",
        default_value_t = 0,
        allow_hyphen_values = true
    )]
    utc_offset_minutes: i32,
    /// Create missing resident accounts before touching the roster.
    #[arg(long = "seed-accounts")]
    seed_accounts: bool,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let offset = parse_offset(args.utc_offset_minutes)?;
    let database_url = resolve_database_url(args.database_url, |name| env::var(name).ok())?;

    let migrate_url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&migrate_url))
        .await
        .map_err(|error| io::Error::other(format!("migration task failed: {error}")))?
        .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
    println!("migrations_applied={applied}");

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    if args.seed_accounts {
        let seeder = AccountSeeder::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(Argon2PasswordHasher),
        );
        let outcome = seeder
            .seed_household()
            .await
            .map_err(|error| io::Error::other(format!("seed accounts: {error}")))?;
        println!("accounts_created={}", outcome.created);
        println!("accounts_existing={}", outcome.existing);
    }

    let service = RosterService::new(
        Arc::new(DieselRosterRepository::new(pool)),
        Arc::new(DefaultClock),
    )
    .with_offset(offset);
    let roster = service
        .ensure_current_week()
        .await
        .map_err(|error| io::Error::other(format!("ensure current week: {error}")))?;

    println!("roster_id={}", roster.id);
    println!("week_start={}", roster.week.start());
    println!("week_number={}", roster.week.week_number());
    println!("year={}", roster.week.year());
    Ok(())
}

fn parse_offset(minutes: i32) -> io::Result<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("UTC offset of {minutes} minutes is out of range"),
            )
        })
}

fn resolve_database_url(
    explicit: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    DATABASE_URL_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url, ROSTER_DATABASE_URL or DATABASE_URL",
            )
        })
}
