use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{auth::{self, Principal}, include_res, res, roles::Action, store, AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub(crate) struct ReportForm {
    description: String,
}

/// Empty-after-trim descriptions never reach the store.
pub fn clean_description(raw: &str) -> Result<&str, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("a report needs a description"));
    }
    Ok(trimmed)
}

/// Insert one open problem report. The room comes from the caller, which is
/// trusted to have picked the client's assigned room; it is not re-checked
/// here.
pub async fn submit_report(
    db_pool: &SqlitePool,
    room_id: &str,
    client: &Principal,
    description: &str,
) -> Result<String, AppError> {
    let description = clean_description(description)?;
    let id = Uuid::now_v7().to_string();
    store::insert_report(db_pool, &id, room_id, &client.user_id, description, OffsetDateTime::now_utc())
        .await
        .map_err(AppError::write)?;
    Ok(id)
}

#[debug_handler(state = AppState)]
pub(crate) async fn report_page(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let principal = auth::require(&session, &db_pool, Action::SubmitReport).await?;

    let Some(room_id) = principal.assigned_room_id else {
        return Ok(Html(include_res!(str, "/pages/client/no_room.html")).into_response());
    };
    let Some(room) = store::room(&db_pool, &room_id).await? else {
        return Ok(res::sorry("room"));
    };

    let body = include_res!(str, "/pages/client/report.html")
        .replace("{building}", room.building_name.as_deref().unwrap_or(""))
        .replace("{room_number}", &room.room_number);
    Ok(Html(body).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn submit(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(ReportForm { description }): Form<ReportForm>,
) -> AppResult<Response> {
    let principal = auth::require(&session, &db_pool, Action::SubmitReport).await?;

    let Some(room_id) = principal.assigned_room_id.clone() else {
        return Ok(Html(include_res!(str, "/pages/client/no_room.html")).into_response());
    };

    submit_report(&db_pool, &room_id, &principal, &description).await?;

    Ok(Html(include_res!(str, "/pages/client/report_sent.html")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use crate::store::tests::{seed_room, test_pool};

    fn client() -> Principal {
        Principal {
            user_id: "u-client".to_owned(),
            email: "client@example.com".to_owned(),
            role: Role::Client,
            assigned_room_id: Some("room-1".to_owned()),
        }
    }

    #[test]
    fn description_must_survive_trimming() {
        assert!(matches!(clean_description("   \t\n "), Err(AppError::Validation(_))));
        assert!(matches!(clean_description(""), Err(AppError::Validation(_))));
        assert_eq!(clean_description("  sink leaks  ").unwrap(), "sink leaks");
    }

    #[tokio::test]
    async fn whitespace_report_writes_nothing() {
        let pool = test_pool().await;
        let room_id = seed_room(&pool).await;

        match submit_report(&pool, &room_id, &client(), "   ").await {
            Err(AppError::Validation(_)) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(store::problem_reports_all(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn report_lands_open_and_trimmed() {
        let pool = test_pool().await;
        let room_id = seed_room(&pool).await;

        submit_report(&pool, &room_id, &client(), "  sink leaks  ").await.unwrap();

        let reports = store::problem_reports_all(&pool).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, "open");
        assert_eq!(reports[0].description, "sink leaks");
    }
}
