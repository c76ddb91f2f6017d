//! Row types and queries against the backing store. Joined columns are
//! `Option` on purpose: a dangling foreign key shows up as `None` and the
//! formatting layer renders it blank instead of falling over.

use sqlx::SqlitePool;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub role: String,
    pub assigned_room_id: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoomRow {
    pub id: String,
    pub room_number: String,
    pub building_name: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationRow {
    pub id: String,
    pub building_name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CleaningLogRow {
    pub id: String,
    pub timestamp: OffsetDateTime,
    pub status: String,
    pub building_name: Option<String>,
    pub room_number: Option<String>,
    pub staff_email: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProblemReportRow {
    pub id: String,
    pub timestamp: OffsetDateTime,
    pub status: String,
    pub description: String,
    pub building_name: Option<String>,
    pub room_number: Option<String>,
    pub client_email: Option<String>,
}

pub async fn user(db_pool: &SqlitePool, id: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as("SELECT id,email,role,assigned_room_id FROM users WHERE id=?")
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

pub async fn users_all(db_pool: &SqlitePool) -> sqlx::Result<Vec<UserRow>> {
    sqlx::query_as("SELECT id,email,role,assigned_room_id FROM users ORDER BY email")
        .fetch_all(db_pool)
        .await
}

pub async fn room(db_pool: &SqlitePool, id: &str) -> sqlx::Result<Option<RoomRow>> {
    sqlx::query_as(
        "SELECT r.id,r.room_number,l.building_name \
         FROM rooms r LEFT JOIN locations l ON l.id=r.location_id \
         WHERE r.id=?",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await
}

pub async fn rooms_all(db_pool: &SqlitePool) -> sqlx::Result<Vec<RoomRow>> {
    sqlx::query_as(
        "SELECT r.id,r.room_number,l.building_name \
         FROM rooms r LEFT JOIN locations l ON l.id=r.location_id \
         ORDER BY l.building_name,r.room_number",
    )
    .fetch_all(db_pool)
    .await
}

pub async fn locations_all(db_pool: &SqlitePool) -> sqlx::Result<Vec<LocationRow>> {
    sqlx::query_as("SELECT id,building_name FROM locations ORDER BY building_name")
        .fetch_all(db_pool)
        .await
}

pub async fn cleaning_logs_all(db_pool: &SqlitePool) -> sqlx::Result<Vec<CleaningLogRow>> {
    sqlx::query_as(
        "SELECT cl.id,cl.timestamp,cl.status,l.building_name,r.room_number,u.email AS staff_email \
         FROM cleaning_logs cl \
         LEFT JOIN rooms r ON r.id=cl.room_id \
         LEFT JOIN locations l ON l.id=r.location_id \
         LEFT JOIN users u ON u.id=cl.staff_id \
         ORDER BY cl.timestamp DESC",
    )
    .fetch_all(db_pool)
    .await
}

pub async fn cleaning_logs_for_room(
    db_pool: &SqlitePool,
    room_id: &str,
) -> sqlx::Result<Vec<CleaningLogRow>> {
    sqlx::query_as(
        "SELECT cl.id,cl.timestamp,cl.status,l.building_name,r.room_number,u.email AS staff_email \
         FROM cleaning_logs cl \
         LEFT JOIN rooms r ON r.id=cl.room_id \
         LEFT JOIN locations l ON l.id=r.location_id \
         LEFT JOIN users u ON u.id=cl.staff_id \
         WHERE cl.room_id=? \
         ORDER BY cl.timestamp DESC",
    )
    .bind(room_id)
    .fetch_all(db_pool)
    .await
}

pub async fn problem_reports_all(db_pool: &SqlitePool) -> sqlx::Result<Vec<ProblemReportRow>> {
    sqlx::query_as(
        "SELECT pr.id,pr.timestamp,pr.status,pr.description,l.building_name,r.room_number,u.email AS client_email \
         FROM problem_reports pr \
         LEFT JOIN rooms r ON r.id=pr.room_id \
         LEFT JOIN locations l ON l.id=r.location_id \
         LEFT JOIN users u ON u.id=pr.client_id \
         ORDER BY pr.timestamp DESC",
    )
    .fetch_all(db_pool)
    .await
}

pub async fn insert_user(
    db_pool: &SqlitePool,
    id: &str,
    email: &str,
    role: &str,
) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO users (id,email,role) VALUES (?,?,?)")
        .bind(id)
        .bind(email)
        .bind(role)
        .execute(db_pool)
        .await?;
    Ok(())
}

pub async fn update_user(
    db_pool: &SqlitePool,
    id: &str,
    role: &str,
    assigned_room_id: Option<&str>,
) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE users SET role=?, assigned_room_id=? WHERE id=?")
        .bind(role)
        .bind(assigned_room_id)
        .bind(id)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_location(
    db_pool: &SqlitePool,
    id: &str,
    building_name: &str,
) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO locations (id,building_name) VALUES (?,?)")
        .bind(id)
        .bind(building_name)
        .execute(db_pool)
        .await?;
    Ok(())
}

pub async fn insert_room(
    db_pool: &SqlitePool,
    id: &str,
    room_number: &str,
    location_id: &str,
) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO rooms (id,room_number,location_id) VALUES (?,?,?)")
        .bind(id)
        .bind(room_number)
        .bind(location_id)
        .execute(db_pool)
        .await?;
    Ok(())
}

pub async fn insert_cleaning(
    db_pool: &SqlitePool,
    id: &str,
    room_id: &str,
    staff_id: &str,
    timestamp: OffsetDateTime,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO cleaning_logs (id,room_id,staff_id,status,timestamp) VALUES (?,?,?,'cleaned',?)",
    )
    .bind(id)
    .bind(room_id)
    .bind(staff_id)
    .bind(timestamp)
    .execute(db_pool)
    .await?;
    Ok(())
}

pub async fn insert_report(
    db_pool: &SqlitePool,
    id: &str,
    room_id: &str,
    client_id: &str,
    description: &str,
    timestamp: OffsetDateTime,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO problem_reports (id,room_id,client_id,description,status,timestamp) VALUES (?,?,?,?,'open',?)",
    )
    .bind(id)
    .bind(room_id)
    .bind(client_id)
    .bind(description)
    .bind(timestamp)
    .execute(db_pool)
    .await?;
    Ok(())
}

pub async fn resolve_report(db_pool: &SqlitePool, id: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE problem_reports SET status='resolved' WHERE id=?")
        .bind(id)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    // single connection, or every query sees a fresh :memory: database
    pub(crate) async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::raw_sql(include_str!("../schema.sql"))
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    pub(crate) async fn seed_room(db_pool: &SqlitePool) -> String {
        insert_location(db_pool, "loc-1", "North Hall").await.unwrap();
        insert_room(db_pool, "room-1", "204", "loc-1").await.unwrap();
        "room-1".to_owned()
    }

    #[tokio::test]
    async fn cleaning_log_joins_resolve() {
        let pool = test_pool().await;
        let room_id = seed_room(&pool).await;
        insert_user(&pool, "u-staff", "staff@example.com", "staff").await.unwrap();
        insert_cleaning(&pool, "cl-1", &room_id, "u-staff", OffsetDateTime::now_utc())
            .await
            .unwrap();

        let logs = cleaning_logs_all(&pool).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].building_name.as_deref(), Some("North Hall"));
        assert_eq!(logs[0].room_number.as_deref(), Some("204"));
        assert_eq!(logs[0].staff_email.as_deref(), Some("staff@example.com"));
        assert_eq!(logs[0].status, "cleaned");
    }

    #[tokio::test]
    async fn dangling_foreign_keys_come_back_as_none() {
        let pool = test_pool().await;
        insert_cleaning(&pool, "cl-1", "no-such-room", "no-such-user", OffsetDateTime::now_utc())
            .await
            .unwrap();

        let logs = cleaning_logs_all(&pool).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].building_name, None);
        assert_eq!(logs[0].room_number, None);
        assert_eq!(logs[0].staff_email, None);
    }

    #[tokio::test]
    async fn logs_come_back_newest_first() {
        let pool = test_pool().await;
        let room_id = seed_room(&pool).await;
        let now = OffsetDateTime::now_utc();
        insert_cleaning(&pool, "cl-old", &room_id, "u", now - time::Duration::hours(3))
            .await
            .unwrap();
        insert_cleaning(&pool, "cl-new", &room_id, "u", now).await.unwrap();

        let logs = cleaning_logs_for_room(&pool, &room_id).await.unwrap();
        assert_eq!(logs[0].id, "cl-new");
        assert_eq!(logs[1].id, "cl-old");
    }

    #[tokio::test]
    async fn resolve_report_flips_status() {
        let pool = test_pool().await;
        let room_id = seed_room(&pool).await;
        insert_report(&pool, "pr-1", &room_id, "u-client", "sink leaks", OffsetDateTime::now_utc())
            .await
            .unwrap();

        assert_eq!(resolve_report(&pool, "pr-1").await.unwrap(), 1);
        let reports = problem_reports_all(&pool).await.unwrap();
        assert_eq!(reports[0].status, "resolved");

        // unknown id touches nothing
        assert_eq!(resolve_report(&pool, "pr-nope").await.unwrap(), 0);
    }
}
