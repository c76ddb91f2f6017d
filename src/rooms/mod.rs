//! The room deep-link. Scanning a printed QR code lands here; the page is
//! only ever a check-in screen for staff, everyone else bounces.

mod checkin;

pub use checkin::record_cleaning;

use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Redirect, Response}, routing::{get, post}, Router};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{auth, export, include_res, res, roles::Action, store, AppError, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(room_page))
        .route("/{id}/clean", post(clean))
}

#[debug_handler]
async fn room_page(
    Path(room_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(principal) = auth::resolve(&session, &db_pool).await else {
        return Ok(Redirect::to(&format!("/login?return_url=/room/{room_id}")).into_response());
    };
    if !principal.role.allows(Action::CheckIn) {
        return Err(AppError::Unauthorized(principal.role));
    }

    let Some(room) = store::room(&db_pool, &room_id.to_string()).await? else {
        return Ok(res::sorry("room"));
    };

    let now = OffsetDateTime::now_utc();
    let body = include_res!(str, "/pages/rooms/room.html")
        .replace("{room_id}", &room.id)
        .replace("{room_number}", &room.room_number)
        .replace("{building}", room.building_name.as_deref().unwrap_or(""))
        .replace("{staff_email}", &principal.email)
        .replace("{now}", &format!("{} {}", export::date_string(now), export::time_string(now)));
    Ok(Html(body).into_response())
}

#[debug_handler]
async fn clean(
    Path(room_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(principal) = auth::resolve(&session, &db_pool).await else {
        return Err(AppError::Unauthenticated);
    };
    let Some(room) = store::room(&db_pool, &room_id.to_string()).await? else {
        return Ok(res::sorry("room"));
    };

    record_cleaning(&db_pool, &room.id, &principal).await?;

    let body = include_res!(str, "/pages/rooms/cleaned.html")
        .replace("{room_number}", &room.room_number)
        .replace("{building}", room.building_name.as_deref().unwrap_or(""));
    Ok(Html(body).into_response())
}
