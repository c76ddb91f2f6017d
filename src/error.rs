use axum::{http::StatusCode, response::{Html, IntoResponse, Redirect, Response}};
use thiserror::Error;

use crate::{include_res, res, roles::Role};

pub type AppResult<T> = Result<T, AppError>;

/// Everything a handler can fail with. Each variant has exactly one
/// user-facing outcome, applied in `into_response`; nothing propagates
/// past the handler boundary unhandled.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not signed in")]
    Unauthenticated,
    #[error("{0:?} is not allowed to do that")]
    Unauthorized(Role),
    #[error("{0}")]
    Validation(&'static str),
    #[error("no such {0}")]
    NotFound(&'static str),
    #[error("store read failed")]
    Read(#[source] sqlx::Error),
    #[error("store write failed")]
    Write(#[source] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn write(err: sqlx::Error) -> Self {
        Self::Write(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated => Redirect::to("/login").into_response(),
            AppError::Unauthorized(role) => {
                tracing::debug!(?role, "turned away");
                Redirect::to("/dashboard").into_response()
            }
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(include_res!(str, "/pages/invalid.html").replace("{message}", msg)),
            )
                .into_response(),
            AppError::NotFound(what) => res::sorry(what),
            AppError::Read(err) => {
                tracing::error!("store read failed: {err}");
                res::oops()
            }
            AppError::Write(err) => {
                tracing::error!("store write failed: {err}");
                res::oops()
            }
            AppError::Other(err) => {
                tracing::error!("{err:#}");
                res::oops()
            }
        }
    }
}

// reads vastly outnumber writes, so `?` on a store call means a read;
// writes opt in with AppError::write
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Read(err)
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Other(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Other(anyhow::Error::msg(err.to_owned()))
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Other(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(serde_json::Error);
apperr_impl!(oauth2::url::ParseError);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(reqwest::Error);
apperr_impl!(qrcode::types::QrError);
apperr_impl!(printpdf::Error);
apperr_impl!(rust_xlsxwriter::XlsxError);
apperr_impl!(image::ImageError);

impl<E: core::error::Error + Send + Sync + 'static, R: oauth2::ErrorResponse + Send + Sync + 'static> From<oauth2::RequestTokenError<E, R>> for AppError {
    fn from(err: oauth2::RequestTokenError<E, R>) -> Self {
        Self::Other(anyhow::Error::from(err))
    }
}
