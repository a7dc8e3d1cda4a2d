use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gazette::api::{self, AppState};
use gazette::config::Config;
use gazette::db::repositories::{
    SqlxCommentRepository, SqlxPostRepository, SqlxTagRepository,
};
use gazette::db::{self, migrations};
use gazette::services::{PageService, TemplateEngine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazette=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load_with_env(std::path::Path::new("config.yml"))?;

    let pool = db::create_pool(&config.database).await?;
    migrations::run_migrations(&pool).await?;

    let pages = Arc::new(PageService::new(
        SqlxPostRepository::boxed(pool.clone()),
        SqlxTagRepository::boxed(pool.clone()),
        SqlxCommentRepository::boxed(pool),
    ));
    let templates = Arc::new(TemplateEngine::new()?);

    let app = api::create_router(AppState { pages, templates });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
