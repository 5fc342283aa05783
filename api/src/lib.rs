mod error;
mod flash;
mod posts;
mod tags;
mod users;

use axum::{
    routing::{get, post},
    Router,
};
use blogly_service::sea_orm::{Database, DatabaseConnection};
use migration::{Migrator, MigratorTrait};
use tera::Tera;
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub templates: Tera,
    pub conn: DatabaseConnection,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(posts::landing))
        .route("/users", get(users::index))
        .route("/users/new", get(users::new).post(users::create))
        .route("/users/{id}", get(users::show))
        .route("/users/{id}/edit", get(users::edit).post(users::update))
        .route("/users/{id}/delete", post(users::delete))
        .route("/users/{id}/posts/new", get(posts::new).post(posts::create))
        .route("/posts/{id}", get(posts::show))
        .route("/posts/{id}/edit", get(posts::edit).post(posts::update))
        .route("/posts/{id}/delete", post(posts::delete))
        .route("/tags", get(tags::index))
        .route("/tags/new", get(tags::new).post(tags::create))
        .route("/tags/{id}", get(tags::show))
        .route("/tags/{id}/edit", get(tags::edit).post(tags::update))
        .route("/tags/{id}/delete", post(tags::delete))
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

#[tokio::main]
async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL is not set in .env file"))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_owned());
    let server_url = format!("{host}:{port}");

    let conn = Database::connect(&db_url).await?;
    Migrator::up(&conn, None).await?;

    let templates = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))?;

    let app = router(AppState { templates, conn });

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    tracing::info!("listening on http://{server_url}");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn main() {
    let result = start();

    if let Some(err) = result.err() {
        println!("Error: {err}");
    }
}
