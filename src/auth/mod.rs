mod clients;
mod lockin;
mod login;
mod logout;

pub mod identity;

pub use clients::Clients;
pub use identity::{require, resolve, Principal};

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login::login_page))
        .route("/login/{provider}", get(login::login))
        .route("/lockin/{provider}", get(lockin::lockin))
        .route("/logout", get(logout::logout))
}
