use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{auth, include_res, roles::Role, AppResult};

#[debug_handler]
pub async fn dashboard(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(principal) = auth::resolve(&session, &db_pool).await else {
        return Ok(Redirect::to("/login").into_response());
    };

    let body = include_res!(str, "/pages/dashboard.html")
        .replace("{email}", &principal.email)
        .replace("{role}", role_label(principal.role))
        .replace("{panel}", panel(principal.role));
    Ok(Html(body).into_response())
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::Staff => "staff",
        Role::Client => "client",
        Role::Unknown => "no role yet",
    }
}

/// Closed dispatch: a role outside the three known ones gets the denied
/// panel, never some default dashboard.
pub(crate) fn panel(role: Role) -> &'static str {
    match role {
        Role::Admin => include_res!(str, "/pages/dashboard/admin.html"),
        Role::Staff => include_res!(str, "/pages/dashboard/staff.html"),
        Role::Client => include_res!(str, "/pages/dashboard/client.html"),
        Role::Unknown => include_res!(str, "/pages/dashboard/denied.html"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_gets_the_denied_panel() {
        let denied = panel(Role::Unknown);
        assert!(denied.contains("Access denied"));
        for role in [Role::Admin, Role::Staff, Role::Client] {
            assert_ne!(panel(role), denied);
            assert!(!panel(role).contains("Access denied"));
        }
    }
}
