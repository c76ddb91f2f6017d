use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{auth, include_res, res, roles::Action, store, AppError, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn page(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::ManageRooms).await?;

    let rooms = store::rooms_all(&db_pool).await?;
    let locations = store::locations_all(&db_pool).await?;

    let mut rows = String::new();
    for room in &rooms {
        rows += &include_res!(str, "/pages/admin/room_row.html")
            .replace("{building}", &res::escape(room.building_name.as_deref().unwrap_or("")))
            .replace("{room_number}", &res::escape(&room.room_number));
    }

    let mut location_options = String::new();
    for location in &locations {
        location_options += &format!(
            r#"<option value="{}">{}</option>"#,
            location.id,
            res::escape(&location.building_name),
        );
    }

    let body = include_res!(str, "/pages/admin/rooms.html")
        .replace("{rows}", &rows)
        .replace("{location_options}", &location_options);
    Ok(Html(body).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoomForm {
    room_number: String,
    location_id: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn add_room(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(RoomForm { room_number, location_id }): Form<RoomForm>,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::ManageRooms).await?;

    let room_number = room_number.trim();
    if room_number.is_empty() {
        return Err(AppError::Validation("a room needs a number"));
    }
    if store::locations_all(&db_pool).await?.iter().all(|l| l.id != location_id) {
        return Ok(res::sorry("building"));
    }

    let id = Uuid::now_v7().to_string();
    store::insert_room(&db_pool, &id, room_number, &location_id)
        .await
        .map_err(AppError::write)?;

    Ok(Redirect::to("/admin/rooms").into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationForm {
    building_name: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn add_location(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(LocationForm { building_name }): Form<LocationForm>,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::ManageRooms).await?;

    let building_name = building_name.trim();
    if building_name.is_empty() {
        return Err(AppError::Validation("a building needs a name"));
    }

    let id = Uuid::now_v7().to_string();
    store::insert_location(&db_pool, &id, building_name)
        .await
        .map_err(AppError::write)?;

    Ok(Redirect::to("/admin/rooms").into_response())
}
