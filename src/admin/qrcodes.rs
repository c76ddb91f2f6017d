use axum::{debug_handler, extract::{Path, State}, http::header, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{auth, include_res, qr, res, roles::Action, store, AppResult, AppState, Origin};

#[debug_handler(state = AppState)]
pub(crate) async fn page(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::GenerateQrSheet).await?;

    let rooms = store::rooms_all(&db_pool).await?;

    let mut cells = String::new();
    for room in rooms.iter().take(qr::CELLS_PER_PAGE) {
        cells += &include_res!(str, "/pages/admin/qr_cell.html")
            .replace("{id}", &room.id)
            .replace("{building}", &res::escape(room.building_name.as_deref().unwrap_or("")))
            .replace("{room_number}", &res::escape(&room.room_number));
    }

    let more = rooms.len().saturating_sub(qr::CELLS_PER_PAGE);
    let body = include_res!(str, "/pages/admin/qr_codes.html")
        .replace("{count}", &rooms.len().to_string())
        .replace("{cells}", &cells)
        .replace("{more}", &more.to_string());
    Ok(Html(body).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn png(
    Path(room_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    State(Origin(origin)): State<Origin>,
    session: Session,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::GenerateQrSheet).await?;

    let Some(room) = store::room(&db_pool, &room_id).await? else {
        return Ok(res::sorry("room"));
    };

    let img = qr::encode(&qr::room_url(&origin, &room.id))?;
    let bytes = qr::png_bytes(&img)?;
    Ok(([(header::CONTENT_TYPE, "image/png".to_owned())], bytes).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn sheet_pdf(
    State(db_pool): State<SqlitePool>,
    State(Origin(origin)): State<Origin>,
    session: Session,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::GenerateQrSheet).await?;

    let rooms = store::rooms_all(&db_pool).await?;
    let bytes = qr::render_sheet(&rooms, &origin)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"xeless-qr-codes.pdf\"".to_owned(),
            ),
        ],
        bytes,
    )
        .into_response())
}
