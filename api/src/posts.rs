use axum::{
    extract::{Path, RawForm, State},
    response::Html,
};
use blogly_service::{Mutation, Query};
use entity::{post, user};
use serde::Serialize;
use tower_cookies::Cookies;

use crate::error::AppError;
use crate::flash::{get_flash_cookie, post_response, FlashData, PostResponse};
use crate::AppState;

#[derive(Serialize)]
struct PostWithAuthor {
    post: post::Model,
    author: Option<user::Model>,
}

/// Landing view: the five most recent posts.
pub async fn landing(state: State<AppState>, cookies: Cookies) -> Result<Html<String>, AppError> {
    let posts: Vec<PostWithAuthor> = Query::recent_posts(&state.conn)
        .await?
        .into_iter()
        .map(|(post, author)| PostWithAuthor { post, author })
        .collect();

    let mut ctx = tera::Context::new();
    ctx.insert("posts", &posts);

    if let Some(flash) = get_flash_cookie::<FlashData>(&cookies) {
        ctx.insert("flash", &flash);
    }

    let body = state.templates.render("index.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn new(
    state: State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let user = Query::find_user_by_id(&state.conn, user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    let tags = Query::list_tags(&state.conn).await?;

    let mut ctx = tera::Context::new();
    ctx.insert("user", &user);
    ctx.insert("tags", &tags);

    let body = state.templates.render("post_new.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn create(
    state: State<AppState>,
    Path(user_id): Path<i32>,
    mut cookies: Cookies,
    RawForm(bytes): RawForm,
) -> Result<PostResponse, AppError> {
    let (form, tag_ids) = parse_post_form(&bytes);

    let post = Mutation::create_post(&state.conn, user_id, form, tag_ids).await?;

    let data = FlashData::success(format!("Post \"{}\" added", post.title));

    Ok(post_response(&mut cookies, data, &format!("/users/{user_id}")))
}

pub async fn show(
    state: State<AppState>,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let (post, author, tags) = Query::find_post_detail(&state.conn, id)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    let mut ctx = tera::Context::new();
    ctx.insert("author_name", &author.full_name());
    ctx.insert("post", &post);
    ctx.insert("author", &author);
    ctx.insert("tags", &tags);

    if let Some(flash) = get_flash_cookie::<FlashData>(&cookies) {
        ctx.insert("flash", &flash);
    }

    let body = state.templates.render("post_show.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn edit(state: State<AppState>, Path(id): Path<i32>) -> Result<Html<String>, AppError> {
    let (post, _author, post_tags) = Query::find_post_detail(&state.conn, id)
        .await?
        .ok_or(AppError::NotFound("post"))?;
    let tags = Query::list_tags(&state.conn).await?;
    let tag_ids: Vec<i32> = post_tags.iter().map(|tag| tag.id).collect();

    let mut ctx = tera::Context::new();
    ctx.insert("post", &post);
    ctx.insert("tags", &tags);
    ctx.insert("tag_ids", &tag_ids);

    let body = state.templates.render("post_edit.html.tera", &ctx)?;

    Ok(Html(body))
}

pub async fn update(
    state: State<AppState>,
    Path(id): Path<i32>,
    mut cookies: Cookies,
    RawForm(bytes): RawForm,
) -> Result<PostResponse, AppError> {
    let (form, tag_ids) = parse_post_form(&bytes);

    let post = Mutation::update_post_by_id(&state.conn, id, form, tag_ids).await?;

    let data = FlashData::success(format!("Post \"{}\" updated", post.title));

    Ok(post_response(&mut cookies, data, &format!("/posts/{id}")))
}

/// Deleting a post routes back to the owning user's page.
pub async fn delete(
    state: State<AppState>,
    Path(id): Path<i32>,
    mut cookies: Cookies,
) -> Result<PostResponse, AppError> {
    let user_id = Mutation::delete_post(&state.conn, id).await?;

    let data = FlashData::success("Post deleted");

    Ok(post_response(&mut cookies, data, &format!("/users/{user_id}")))
}

/// The tag checkboxes repeat the `tags` key once per checked box, which
/// serde_urlencoded cannot collect into a Vec, so the body is parsed by hand.
fn parse_post_form(bytes: &[u8]) -> (post::Model, Vec<i32>) {
    let mut title = String::new();
    let mut content = String::new();
    let mut tag_ids = Vec::new();

    for (key, value) in url::form_urlencoded::parse(bytes) {
        match &*key {
            "title" => title = value.into_owned(),
            "content" => content = value.into_owned(),
            "tags" => {
                if let Ok(tag_id) = value.parse() {
                    tag_ids.push(tag_id);
                }
            }
            _ => {}
        }
    }

    let form = post::Model {
        id: 0,
        title,
        content,
        created_at: Default::default(),
        user_id: 0,
    };

    (form, tag_ids)
}
