use axum::{debug_handler, extract::{Path, Query, State}, http::header, response::{Html, IntoResponse, Redirect, Response}};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;

use crate::{auth, export::{self, TimeWindow}, include_res, res, roles::Action, store, AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub(crate) struct ReportsQuery {
    window: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn page(
    Query(ReportsQuery { window }): Query<ReportsQuery>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::ViewReports).await?;

    let window = TimeWindow::parse(window.as_deref().unwrap_or(""));
    let logs = store::cleaning_logs_all(&db_pool).await?;
    let reports = store::problem_reports_all(&db_pool).await?;

    let resolved = reports.iter().filter(|r| r.status == "resolved").count();

    // the window narrows the table only; totals stay totals
    let now = OffsetDateTime::now_utc();
    let mut log_rows = String::new();
    for log in logs.iter().filter(|l| window.contains(now, l.timestamp)) {
        let row = export::cleaning_row(log);
        log_rows += &include_res!(str, "/pages/admin/log_row.html")
            .replace("{date}", &row[0])
            .replace("{time}", &row[1])
            .replace("{building}", &res::escape(&row[2]))
            .replace("{room}", &res::escape(&row[3]))
            .replace("{staff}", &res::escape(&row[4]))
            .replace("{status}", &row[5]);
    }

    let mut report_items = String::new();
    for report in &reports {
        report_items += &include_res!(str, "/pages/admin/report_item.html")
            .replace("{id}", &report.id)
            .replace("{date}", &export::date_string(report.timestamp))
            .replace("{time}", &export::time_string(report.timestamp))
            .replace("{building}", &res::escape(report.building_name.as_deref().unwrap_or("")))
            .replace("{room}", &res::escape(report.room_number.as_deref().unwrap_or("")))
            .replace("{client}", &res::escape(report.client_email.as_deref().unwrap_or("")))
            .replace("{description}", &res::escape(&report.description))
            .replace("{status}", &report.status);
    }

    let body = include_res!(str, "/pages/admin/reports.html")
        .replace("{total_cleanings}", &logs.len().to_string())
        .replace("{total_reports}", &reports.len().to_string())
        .replace("{resolved}", &resolved.to_string())
        .replace("{window_options}", &window_options(window))
        .replace("{log_rows}", &log_rows)
        .replace("{report_items}", &report_items);
    Ok(Html(body).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn export_xlsx(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::ViewReports).await?;

    let logs = store::cleaning_logs_all(&db_pool).await?;
    let reports = store::problem_reports_all(&db_pool).await?;
    let bytes = export::build_workbook(&logs, &reports)?;

    let filename = format!(
        "xeless-reports-{}.xlsx",
        export::date_string(OffsetDateTime::now_utc())
    );
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_owned(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn resolve(
    Path(report_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::ViewReports).await?;

    let touched = store::resolve_report(&db_pool, &report_id)
        .await
        .map_err(AppError::write)?;
    if touched == 0 {
        return Ok(res::sorry("report"));
    }

    Ok(Redirect::to("/admin/reports").into_response())
}

fn window_options(current: TimeWindow) -> String {
    let mut options = String::new();
    for (window, label) in [
        (TimeWindow::All, "all"),
        (TimeWindow::Today, "today"),
        (TimeWindow::Week, "this week"),
        (TimeWindow::Month, "this month"),
    ] {
        let selected = if window == current { " selected" } else { "" };
        options += &format!(
            r#"<option value="{}"{selected}>{label}</option>"#,
            window.as_str()
        );
    }
    options
}
