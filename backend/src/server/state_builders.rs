//! Builders wiring outbound adapters into the HTTP port bundle.
//!
//! PostgreSQL adapters are used when a pool is available; otherwise rosters
//! and accounts live in memory for the life of the process.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{error, info, warn};

use chore_roster::domain::ports::{
    CompletionNotifier, NoOpCompletionNotifier, PhotoStore, RosterCommand, RosterRepository,
    UserRepository,
};
use chore_roster::domain::{AccountLoginService, AccountSeeder, ChoreService, RosterService};
use chore_roster::inbound::http::state::HttpState;
use chore_roster::outbound::memory::{InMemoryRosterRepository, InMemoryUserRepository};
use chore_roster::outbound::notify::GreenApiNotifier;
use chore_roster::outbound::persistence::{DbPool, DieselRosterRepository, DieselUserRepository};
use chore_roster::outbound::photos::FsPhotoStore;
use chore_roster::outbound::security::Argon2PasswordHasher;

use super::RosterSettings;

/// Adapters shared by every storage backend.
struct SharedAdapters {
    clock: Arc<dyn Clock>,
    photos: Arc<dyn PhotoStore>,
    notifier: Arc<dyn CompletionNotifier>,
    hasher: Arc<Argon2PasswordHasher>,
}

fn build_notifier(settings: &RosterSettings) -> Arc<dyn CompletionNotifier> {
    let Some(config) = settings.green_api() else {
        info!("chat notifications disabled");
        return Arc::new(NoOpCompletionNotifier);
    };
    match GreenApiNotifier::new(&config, settings.notify_timeout()) {
        Ok(notifier) => Arc::new(notifier),
        Err(err) => {
            warn!(error = %err, "chat notifier unavailable; notifications disabled");
            Arc::new(NoOpCompletionNotifier)
        }
    }
}

fn build_shared(settings: &RosterSettings) -> io::Result<SharedAdapters> {
    let photo_dir = settings.photo_dir();
    let photos = FsPhotoStore::open(&photo_dir).map_err(|err| {
        io::Error::other(format!(
            "open photo directory {}: {err}",
            photo_dir.display()
        ))
    })?;
    Ok(SharedAdapters {
        clock: Arc::new(DefaultClock),
        photos: Arc::new(photos),
        notifier: build_notifier(settings),
        hasher: Arc::new(Argon2PasswordHasher),
    })
}

async fn assemble<R, U>(
    roster_repo: Arc<R>,
    users: Arc<U>,
    seed_accounts: bool,
    settings: &RosterSettings,
    shared: SharedAdapters,
) -> io::Result<HttpState>
where
    R: RosterRepository + 'static,
    U: UserRepository + 'static,
{
    if seed_accounts {
        let seeder = AccountSeeder::new(Arc::clone(&users), Arc::clone(&shared.hasher));
        if let Err(err) = seeder.seed_household().await {
            error!(error = %err, "resident account seeding failed");
        }
    }

    let offset = settings
        .utc_offset()
        .map_err(|err| io::Error::other(err.to_string()))?;
    let roster_service = Arc::new(
        RosterService::new(Arc::clone(&roster_repo), Arc::clone(&shared.clock))
            .with_offset(offset),
    );
    let roster: Arc<dyn RosterCommand> = roster_service.clone();
    let chores = Arc::new(
        ChoreService::new(roster_repo, Arc::clone(&roster), shared.photos, shared.clock)
            .with_notifier(shared.notifier)
            .with_photo_base_url(settings.photo_base_url()),
    );
    let login = Arc::new(
        AccountLoginService::new(users, shared.hasher)
            .with_admin_override(settings.admin_password.clone()),
    );

    Ok(HttpState {
        login: login.clone(),
        users: login,
        roster,
        roster_query: roster_service,
        chores: chores.clone(),
        chores_query: chores,
    })
}

/// Build the HTTP port bundle, seeding accounts when configured.
///
/// Without a pool the in-memory account store starts empty, so it is always
/// seeded.
///
/// # Errors
///
/// Returns [`io::Error`] when the photo directory cannot be opened or the
/// configured UTC offset is out of range.
pub async fn build_http_state(
    settings: &RosterSettings,
    db_pool: Option<DbPool>,
) -> io::Result<HttpState> {
    let shared = build_shared(settings)?;
    match db_pool {
        Some(pool) => {
            assemble(
                Arc::new(DieselRosterRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool)),
                settings.seed_accounts,
                settings,
                shared,
            )
            .await
        }
        None => {
            warn!("no database configured; rosters are kept in memory");
            assemble(
                Arc::new(InMemoryRosterRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
                true,
                settings,
                shared,
            )
            .await
        }
    }
}
