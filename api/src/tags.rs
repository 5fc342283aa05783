use axum::{
    extract::{Form, Path, State},
    response::Html,
};
use blogly_service::{Mutation, Query};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::error::AppError;
use crate::flash::{get_flash_cookie, post_response, FlashData, PostResponse};
use crate::AppState;

#[derive(Deserialize)]
pub struct TagForm {
    name: String,
}

pub async fn index(state: State<AppState>, cookies: Cookies) -> Result<Html<String>, AppError> {
    let tags = Query::list_tags(&state.conn).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("tags", &tags);

    if let Some(flash) = get_flash_cookie::<FlashData>(&cookies) {
        ctx.insert("flash", &flash);
    }

    let body = state.templates.render("tags.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn new(state: State<AppState>) -> Result<Html<String>, AppError> {
    let ctx = tera::Context::new();
    let body = state.templates.render("tag_new.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn create(
    state: State<AppState>,
    mut cookies: Cookies,
    form: Form<TagForm>,
) -> Result<PostResponse, AppError> {
    let tag = Mutation::create_tag(&state.conn, form.0.name).await?;

    let data = FlashData::success(format!("Tag #{} added", tag.name));

    Ok(post_response(&mut cookies, data, "/tags"))
}

pub async fn show(
    state: State<AppState>,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let (tag, posts) = Query::find_tag_with_posts(&state.conn, id)
        .await?
        .ok_or(AppError::NotFound("tag"))?;

    let mut ctx = tera::Context::new();
    ctx.insert("tag", &tag);
    ctx.insert("posts", &posts);

    if let Some(flash) = get_flash_cookie::<FlashData>(&cookies) {
        ctx.insert("flash", &flash);
    }

    let body = state.templates.render("tag_show.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn edit(state: State<AppState>, Path(id): Path<i32>) -> Result<Html<String>, AppError> {
    let tag = Query::find_tag_by_id(&state.conn, id)
        .await?
        .ok_or(AppError::NotFound("tag"))?;

    let mut ctx = tera::Context::new();
    ctx.insert("tag", &tag);

    let body = state.templates.render("tag_edit.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn update(
    state: State<AppState>,
    Path(id): Path<i32>,
    mut cookies: Cookies,
    form: Form<TagForm>,
) -> Result<PostResponse, AppError> {
    let tag = Mutation::update_tag_by_id(&state.conn, id, form.0.name).await?;

    let data = FlashData::success(format!("Tag #{} updated", tag.name));

    Ok(post_response(&mut cookies, data, "/tags"))
}

pub async fn delete(
    state: State<AppState>,
    Path(id): Path<i32>,
    mut cookies: Cookies,
) -> Result<PostResponse, AppError> {
    Mutation::delete_tag(&state.conn, id).await?;

    let data = FlashData::success("Tag deleted");

    Ok(post_response(&mut cookies, data, "/tags"))
}
