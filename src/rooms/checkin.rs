use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{auth::Principal, error::AppError, roles::Role, store};

/// Append one immutable cleaning event for the room. The staff role is
/// re-checked right here, at the point of call; nothing cached upstream is
/// trusted. A rejected insert surfaces as a write failure and is not
/// retried.
pub async fn record_cleaning(
    db_pool: &SqlitePool,
    room_id: &str,
    staff: &Principal,
) -> Result<String, AppError> {
    if staff.role != Role::Staff {
        return Err(AppError::Unauthorized(staff.role));
    }

    let id = Uuid::now_v7().to_string();
    store::insert_cleaning(db_pool, &id, room_id, &staff.user_id, OffsetDateTime::now_utc())
        .await
        .map_err(AppError::write)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{seed_room, test_pool};

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: "u-1".to_owned(),
            email: "someone@example.com".to_owned(),
            role,
            assigned_room_id: None,
        }
    }

    #[tokio::test]
    async fn only_staff_may_check_in() {
        let pool = test_pool().await;
        let room_id = seed_room(&pool).await;

        for role in [Role::Admin, Role::Client, Role::Unknown] {
            match record_cleaning(&pool, &room_id, &principal(role)).await {
                Err(AppError::Unauthorized(r)) => assert_eq!(r, role),
                other => panic!("expected Unauthorized, got {other:?}"),
            }
        }
        assert!(store::cleaning_logs_all(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn check_in_is_immediately_visible() {
        let pool = test_pool().await;
        let room_id = seed_room(&pool).await;
        store::insert_user(&pool, "u-1", "someone@example.com", "staff").await.unwrap();

        let id = record_cleaning(&pool, &room_id, &principal(Role::Staff)).await.unwrap();

        let logs = store::cleaning_logs_for_room(&pool, &room_id).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, id);
        assert_eq!(logs[0].status, "cleaned");
        assert_eq!(logs[0].staff_email.as_deref(), Some("someone@example.com"));
    }
}
