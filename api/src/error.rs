use std::sync::OnceLock;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use blogly_service::sea_orm::DbErr;
use tera::Tera;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
}

/// Error pages carry no request state, so they render from their own Tera
/// instance with the templates embedded at compile time.
fn error_templates() -> Option<&'static Tera> {
    static TEMPLATES: OnceLock<Option<Tera>> = OnceLock::new();

    TEMPLATES
        .get_or_init(|| {
            let mut tera = Tera::default();
            tera.add_raw_templates([
                (
                    "layout.html.tera",
                    include_str!("../templates/layout.html.tera"),
                ),
                (
                    "error.html.tera",
                    include_str!("../templates/error.html.tera"),
                ),
            ])
            .ok()
            .map(|_| tera)
        })
        .as_ref()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) | AppError::Db(DbErr::RecordNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Db(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut ctx = tera::Context::new();
        ctx.insert("status", &status.to_string());
        ctx.insert("message", &self.to_string());

        let body = error_templates()
            .and_then(|templates| templates.render("error.html.tera", &ctx).ok());

        match body {
            Some(body) => (status, Html(body)).into_response(),
            None => (status, self.to_string()).into_response(),
        }
    }
}
