use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{auth, include_res, res, roles::{Action, Role}, store, AppError, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn page(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::ManageUsers).await?;

    let users = store::users_all(&db_pool).await?;
    let rooms = store::rooms_all(&db_pool).await?;

    let mut rows = String::new();
    for user in &users {
        rows += &include_res!(str, "/pages/admin/user_row.html")
            .replace("{id}", &user.id)
            .replace("{email}", &res::escape(&user.email))
            .replace("{role_options}", &role_options(&user.role))
            .replace("{room_options}", &room_options(&rooms, user.assigned_room_id.as_deref()));
    }

    let body = include_res!(str, "/pages/admin/users.html").replace("{rows}", &rows);
    Ok(Html(body).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserForm {
    role: String,
    assigned_room_id: String,
}

/// Grant or revoke a role and (re)assign a room. `role` must be one of the
/// known three or blank; anything else is rejected before the store sees it.
#[debug_handler(state = AppState)]
pub(crate) async fn update(
    Path(user_id): Path<String>,
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(UserForm { role, assigned_room_id }): Form<UserForm>,
) -> AppResult<Response> {
    auth::require(&session, &db_pool, Action::ManageUsers).await?;

    if !role.is_empty() && Role::parse(&role) == Role::Unknown {
        return Err(AppError::Validation("unrecognized role"));
    }

    let assigned_room_id = match assigned_room_id.as_str() {
        "" => None,
        id => {
            if store::room(&db_pool, id).await?.is_none() {
                return Ok(res::sorry("room"));
            }
            Some(id)
        }
    };

    let touched = store::update_user(&db_pool, &user_id, &role, assigned_room_id)
        .await
        .map_err(AppError::write)?;
    if touched == 0 {
        return Ok(res::sorry("user"));
    }

    Ok(Redirect::to("/admin/users").into_response())
}

fn role_options(current: &str) -> String {
    let mut options = String::from(r#"<option value="">no role</option>"#);
    for role in [Role::Admin, Role::Staff, Role::Client] {
        let selected = if role.as_str() == current { " selected" } else { "" };
        options += &format!(r#"<option value="{0}"{selected}>{0}</option>"#, role.as_str());
    }
    options
}

fn room_options(rooms: &[store::RoomRow], current: Option<&str>) -> String {
    let mut options = String::from(r#"<option value="">no room</option>"#);
    for room in rooms {
        let selected = if Some(room.id.as_str()) == current { " selected" } else { "" };
        options += &format!(
            r#"<option value="{}"{selected}>{} {}</option>"#,
            room.id,
            res::escape(room.building_name.as_deref().unwrap_or("")),
            res::escape(&room.room_number),
        );
    }
    options
}
