use axum::{
    extract::{Form, Path, State},
    response::Html,
};
use blogly_service::{Mutation, Query};
use entity::user;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::error::AppError;
use crate::flash::{get_flash_cookie, post_response, FlashData, PostResponse};
use crate::AppState;

/// Form field names match the rendered templates, kebab-case.
#[derive(Deserialize)]
pub struct UserForm {
    #[serde(rename = "first-name")]
    first_name: String,
    #[serde(rename = "last-name")]
    last_name: Option<String>,
    #[serde(rename = "image-url")]
    image_url: Option<String>,
}

impl UserForm {
    /// Blank optional fields are dropped; a missing image falls back to the
    /// placeholder avatar.
    fn into_model(self) -> user::Model {
        let last_name = self.last_name.filter(|name| !name.trim().is_empty());
        let image_url = self
            .image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| user::DEFAULT_IMAGE_URL.to_owned());

        user::Model {
            id: 0,
            first_name: self.first_name,
            last_name,
            image_url,
        }
    }
}

pub async fn index(state: State<AppState>, cookies: Cookies) -> Result<Html<String>, AppError> {
    let users = Query::list_users(&state.conn).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("users", &users);

    if let Some(flash) = get_flash_cookie::<FlashData>(&cookies) {
        ctx.insert("flash", &flash);
    }

    let body = state.templates.render("users.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn new(state: State<AppState>) -> Result<Html<String>, AppError> {
    let ctx = tera::Context::new();
    let body = state.templates.render("user_new.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn create(
    state: State<AppState>,
    mut cookies: Cookies,
    form: Form<UserForm>,
) -> Result<PostResponse, AppError> {
    let user = Mutation::create_user(&state.conn, form.0.into_model()).await?;

    let data = FlashData::success(format!("User {} added", user.full_name()));

    Ok(post_response(&mut cookies, data, "/users"))
}

pub async fn show(
    state: State<AppState>,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let (user, posts) = Query::find_user_with_posts(&state.conn, id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let mut ctx = tera::Context::new();
    ctx.insert("full_name", &user.full_name());
    ctx.insert("user", &user);
    ctx.insert("posts", &posts);

    if let Some(flash) = get_flash_cookie::<FlashData>(&cookies) {
        ctx.insert("flash", &flash);
    }

    let body = state.templates.render("user_show.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn edit(
    state: State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let user = Query::find_user_by_id(&state.conn, id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let mut ctx = tera::Context::new();
    ctx.insert("user", &user);

    let body = state.templates.render("user_edit.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn update(
    state: State<AppState>,
    Path(id): Path<i32>,
    mut cookies: Cookies,
    form: Form<UserForm>,
) -> Result<PostResponse, AppError> {
    let user = Mutation::update_user_by_id(&state.conn, id, form.0.into_model()).await?;

    let data = FlashData::success(format!("User {} updated", user.full_name()));

    Ok(post_response(&mut cookies, data, "/users"))
}

pub async fn delete(
    state: State<AppState>,
    Path(id): Path<i32>,
    mut cookies: Cookies,
) -> Result<PostResponse, AppError> {
    Mutation::delete_user(&state.conn, id).await?;

    let data = FlashData::success("User deleted");

    Ok(post_response(&mut cookies, data, "/users"))
}
