use ::entity::{post, post::Entity as Post, tag, tag::Entity as Tag, user, user::Entity as User};
use sea_orm::*;

/// Number of posts shown on the landing page.
pub const RECENT_POSTS: u64 = 5;

pub struct Query;

impl Query {
    /// All users, ordered by last name then first name.
    pub async fn list_users(db: &DbConn) -> Result<Vec<user::Model>, DbErr> {
        User::find()
            .order_by_asc(user::Column::LastName)
            .order_by_asc(user::Column::FirstName)
            .all(db)
            .await
    }

    pub async fn find_user_by_id(db: &DbConn, id: i32) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id).one(db).await
    }

    /// A user together with their posts, newest first.
    pub async fn find_user_with_posts(
        db: &DbConn,
        id: i32,
    ) -> Result<Option<(user::Model, Vec<post::Model>)>, DbErr> {
        let Some(user) = User::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let posts = user
            .find_related(Post)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(db)
            .await?;

        Ok(Some((user, posts)))
    }

    /// The most recently created posts with their authors, newest first.
    pub async fn recent_posts(
        db: &DbConn,
    ) -> Result<Vec<(post::Model, Option<user::Model>)>, DbErr> {
        Post::find()
            .find_also_related(User)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(RECENT_POSTS)
            .all(db)
            .await
    }

    pub async fn find_post_by_id(db: &DbConn, id: i32) -> Result<Option<post::Model>, DbErr> {
        Post::find_by_id(id).one(db).await
    }

    /// A post together with its author and tags, for the detail page.
    pub async fn find_post_detail(
        db: &DbConn,
        id: i32,
    ) -> Result<Option<(post::Model, user::Model, Vec<tag::Model>)>, DbErr> {
        let Some(post) = Post::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let author = post
            .find_related(User)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("No author for post {id}")))?;

        let tags = post
            .find_related(Tag)
            .order_by_asc(tag::Column::Name)
            .all(db)
            .await?;

        Ok(Some((post, author, tags)))
    }

    pub async fn list_tags(db: &DbConn) -> Result<Vec<tag::Model>, DbErr> {
        Tag::find().order_by_asc(tag::Column::Name).all(db).await
    }

    pub async fn find_tag_by_id(db: &DbConn, id: i32) -> Result<Option<tag::Model>, DbErr> {
        Tag::find_by_id(id).one(db).await
    }

    /// A tag together with the posts carrying it, newest first.
    pub async fn find_tag_with_posts(
        db: &DbConn,
        id: i32,
    ) -> Result<Option<(tag::Model, Vec<post::Model>)>, DbErr> {
        let Some(tag) = Tag::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let posts = tag
            .find_related(Post)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(db)
            .await?;

        Ok(Some((tag, posts)))
    }
}
