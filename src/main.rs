use axum::{debug_handler, response::{IntoResponse, Redirect, Response}, routing::get, Router};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, Session, SessionManagerLayer};
use tracing_subscriber::EnvFilter;
use xeless::{admin, auth, client, dashboard, rooms, session::USER_ID, AppResult, AppState, Origin};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(30)));

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(dotenv::var("DATABASE_URL").unwrap_or("sqlite:xeless.db?mode=rwc".to_owned()).as_str())
        .await.unwrap();
    sqlx::raw_sql(include_str!("../schema.sql"))
        .execute(&db_pool)
        .await.unwrap();

    let origin = dotenv::var("PUBLIC_ORIGIN").unwrap_or("http://localhost:8080".to_owned());
    let secret_path = dotenv::var("CLIENT_SECRET_PATH").unwrap_or("client_secret.json".to_owned());
    let clients = auth::Clients::load(&secret_path, &origin);

    let app_state = AppState {
        db_pool,
        clients,
        origin: Origin(origin),
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard::dashboard))

        .merge(auth::router())
        .nest("/room", rooms::router())
        .nest("/client", client::router())
        .nest("/admin", admin::router())

        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http());

    let addr = dotenv::var("BIND_ADDR").unwrap_or("0.0.0.0:8080".to_owned());
    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

#[debug_handler]
async fn index(session: Session) -> AppResult<Response> {
    if session.get::<String>(USER_ID).await?.is_some() {
        Ok(Redirect::to("/dashboard").into_response())
    } else {
        Ok(Redirect::to("/login").into_response())
    }
}
