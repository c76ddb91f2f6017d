//! Client-facing views: the cleaning history of the one room assigned to
//! the signed-in client, and the problem report form for it.

mod report;

pub use report::{clean_description, submit_report};

use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Response}, routing::get, Router};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{auth, export, include_res, res, roles::Action, store, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(history))
        .route("/report", get(report::report_page).post(report::submit))
}

#[debug_handler]
async fn history(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let principal = auth::require(&session, &db_pool, Action::ViewHistory).await?;

    let Some(room_id) = principal.assigned_room_id else {
        return Ok(Html(include_res!(str, "/pages/client/no_room.html")).into_response());
    };
    let Some(room) = store::room(&db_pool, &room_id).await? else {
        return Ok(res::sorry("room"));
    };

    let logs = store::cleaning_logs_for_room(&db_pool, &room_id).await?;
    let entries = if logs.is_empty() {
        include_res!(str, "/pages/client/no_history.html").to_owned()
    } else {
        let mut entries = String::new();
        for log in &logs {
            entries += &include_res!(str, "/pages/client/history_item.html")
                .replace("{date}", &export::date_string(log.timestamp))
                .replace("{time}", &export::time_string(log.timestamp))
                .replace("{staff}", log.staff_email.as_deref().unwrap_or(""));
        }
        entries
    };

    let body = include_res!(str, "/pages/client/history.html")
        .replace("{building}", room.building_name.as_deref().unwrap_or(""))
        .replace("{room_number}", &room.room_number)
        .replace("{entries}", &entries);
    Ok(Html(body).into_response())
}
