//! Who is asking. A principal is only ever built from the session's user id
//! plus a fresh role read; anything that goes wrong on the way resolves to
//! "not signed in" rather than a guess.

use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{error::AppError, roles::{Action, Role}, session::USER_ID, store};

#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub assigned_room_id: Option<String>,
}

/// Fail closed: no session, no users row, or a failed read all come back
/// as `None` and the caller sends the visitor to the login page.
pub async fn resolve(session: &Session, db_pool: &SqlitePool) -> Option<Principal> {
    let user_id: String = match session.get(USER_ID).await {
        Ok(Some(id)) => id,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!("session read failed: {err}");
            return None;
        }
    };

    match store::user(db_pool, &user_id).await {
        Ok(Some(user)) => Some(Principal {
            user_id: user.id,
            email: user.email,
            role: Role::parse(&user.role),
            assigned_room_id: user.assigned_room_id,
        }),
        Ok(None) => None,
        Err(err) => {
            tracing::warn!("role lookup for {user_id} failed: {err}");
            None
        }
    }
}

/// Resolve and gate in one step. The role check happens here, at the point
/// of call, never off a cached principal.
pub async fn require(
    session: &Session,
    db_pool: &SqlitePool,
    action: Action,
) -> Result<Principal, AppError> {
    let principal = resolve(session, db_pool)
        .await
        .ok_or(AppError::Unauthenticated)?;
    if !principal.role.allows(action) {
        return Err(AppError::Unauthorized(principal.role));
    }
    Ok(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    use crate::store::tests::test_pool;

    fn empty_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn no_session_resolves_to_nobody() {
        let pool = test_pool().await;
        assert!(resolve(&empty_session(), &pool).await.is_none());
    }

    #[tokio::test]
    async fn session_pointing_at_no_row_fails_closed() {
        let pool = test_pool().await;
        let session = empty_session();
        session.insert(USER_ID, "ghost").await.unwrap();
        assert!(resolve(&session, &pool).await.is_none());
    }

    #[tokio::test]
    async fn resolves_role_from_store() {
        let pool = test_pool().await;
        store::insert_user(&pool, "u-1", "a@example.com", "staff").await.unwrap();
        let session = empty_session();
        session.insert(USER_ID, "u-1").await.unwrap();

        let principal = resolve(&session, &pool).await.unwrap();
        assert_eq!(principal.role, Role::Staff);
        assert_eq!(principal.email, "a@example.com");
    }

    #[tokio::test]
    async fn unrecognized_stored_role_is_unknown() {
        let pool = test_pool().await;
        store::insert_user(&pool, "u-1", "a@example.com", "janitor-in-chief").await.unwrap();
        let session = empty_session();
        session.insert(USER_ID, "u-1").await.unwrap();

        let principal = resolve(&session, &pool).await.unwrap();
        assert_eq!(principal.role, Role::Unknown);
        assert!(principal.role.actions().is_empty());
    }

    #[tokio::test]
    async fn require_gates_on_action() {
        let pool = test_pool().await;
        store::insert_user(&pool, "u-1", "a@example.com", "client").await.unwrap();
        let session = empty_session();
        session.insert(USER_ID, "u-1").await.unwrap();

        assert!(require(&session, &pool, Action::SubmitReport).await.is_ok());
        match require(&session, &pool, Action::CheckIn).await {
            Err(AppError::Unauthorized(Role::Client)) => {}
            other => panic!("expected Unauthorized, got {other:?}"),
        }

        match require(&empty_session(), &pool, Action::CheckIn).await {
            Err(AppError::Unauthenticated) => {}
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }
}
