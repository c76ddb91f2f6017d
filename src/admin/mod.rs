//! Admin-only surface: user/room management, the report views and their
//! XLSX export, and QR sheet generation.

mod qrcodes;
mod reports;
mod rooms;
mod users;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::page))
        .route("/users/{id}", post(users::update))
        .route("/rooms", get(rooms::page).post(rooms::add_room))
        .route("/locations", post(rooms::add_location))
        .route("/reports", get(reports::page))
        .route("/reports/export.xlsx", get(reports::export_xlsx))
        .route("/reports/{id}/resolve", post(reports::resolve))
        .route("/qr-codes", get(qrcodes::page))
        .route("/qr-codes.pdf", get(qrcodes::sheet_pdf))
        .route("/qr-codes/{id}/png", get(qrcodes::png))
}
