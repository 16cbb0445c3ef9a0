use garage_desk::application::context::{AppContext, ContextOptions};
use garage_desk::application::services::change_watcher::ChangeWatcher;
use garage_desk::config;
use garage_desk::domain::services::job_lifecycle::JobLifecycle;
use garage_desk::domain::value_objects::ids::ScopeId;
use garage_desk::infrastructure::db::postgres::PostgresDatabase;
use garage_desk::infrastructure::db::postgres::change_feed_postgres::ChangeFeedPostgres;
use garage_desk::infrastructure::db::repositories::Repositories;
use garage_desk::infrastructure::local::{FileKeyValueStore, LocalStore};
use garage_desk::infrastructure::observability::{TracingConfig, init_tracing};
use garage_desk::interface::http;
use garage_desk::interface::http::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    // Step 1: Load configuration and start tracing.
    let settings = config::load().expect("load config");
    init_tracing(&TracingConfig::from_settings(&settings));

    // Step 2: Connect to the database.
    let db = Arc::new(
        PostgresDatabase::connect(&settings.db.url, settings.db.max_connections)
            .await
            .expect("connect database"),
    );

    // Step 3: Build repositories, the local store and domain services.
    let repos = Repositories::postgres(db.clone());
    let local = LocalStore::new(Arc::new(FileKeyValueStore::new(&settings.local_store.dir)));
    let ctx = Arc::new(AppContext::new(
        repos,
        Arc::new(JobLifecycle),
        local,
        ContextOptions {
            scope_id: ScopeId(settings.scope.id),
            currency_symbol: settings.display.currency_symbol.clone(),
            vehicle_cache_key: settings.local_store.vehicle_cache_key.clone(),
        },
    ));

    // Step 4: Prime the board and follow remote changes.
    let loaded = ctx.board.load_all().await;
    info!(count = loaded.len(), scope_id = %ctx.board.scope_id(), "job_board_primed");
    match ChangeFeedPostgres::connect(&db).await {
        Ok(feed) => {
            ChangeWatcher::spawn(feed, ctx.board.clone(), ctx.vehicles.clone());
        }
        Err(err) => warn!(error = %err, "change_feed_unavailable"),
    }

    // Step 5: Build the HTTP app.
    let state = AppState { ctx };
    let app = http::app(state);
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Step 6: Bind and serve.
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("bind server");
    info!(addr = %bind_addr, "listening");

    axum::serve(listener, app).await.expect("serve");
}
