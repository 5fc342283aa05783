use ::entity::{
    post, post::Entity as Post, post_tag, post_tag::Entity as PostTag, tag, tag::Entity as Tag,
    user, user::Entity as User,
};
use chrono::Utc;
use sea_orm::*;

pub struct Mutation;

impl Mutation {
    pub async fn create_user(db: &DbConn, form_data: user::Model) -> Result<user::Model, DbErr> {
        let res = User::insert(user::ActiveModel {
            first_name: Set(form_data.first_name.to_owned()),
            last_name: Set(form_data.last_name.to_owned()),
            image_url: Set(form_data.image_url.to_owned()),
            ..Default::default()
        })
        .exec(db)
        .await?;

        Ok(user::Model {
            id: res.last_insert_id,
            ..form_data
        })
    }

    pub async fn update_user_by_id(
        db: &DbConn,
        id: i32,
        form_data: user::Model,
    ) -> Result<user::Model, DbErr> {
        let user: user::ActiveModel = User::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("No user with id {id}")))?
            .into();

        user::ActiveModel {
            id: user.id,
            first_name: Set(form_data.first_name.to_owned()),
            last_name: Set(form_data.last_name.to_owned()),
            image_url: Set(form_data.image_url.to_owned()),
        }
        .update(db)
        .await
    }

    /// Deleting a user cascades to their posts and the posts' tag links.
    pub async fn delete_user(db: &DbConn, id: i32) -> Result<DeleteResult, DbErr> {
        let user: user::ActiveModel = User::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("No user with id {id}")))?
            .into();

        user.delete(db).await
    }

    /// Inserts the post and its tag links in one transaction.
    pub async fn create_post(
        db: &DbConn,
        user_id: i32,
        form_data: post::Model,
        tag_ids: Vec<i32>,
    ) -> Result<post::Model, DbErr> {
        let created_at = Utc::now();

        db.transaction::<_, post::Model, DbErr>(|txn| {
            Box::pin(async move {
                let res = Post::insert(post::ActiveModel {
                    title: Set(form_data.title.to_owned()),
                    content: Set(form_data.content.to_owned()),
                    created_at: Set(created_at),
                    user_id: Set(user_id),
                    ..Default::default()
                })
                .exec(txn)
                .await?;

                let post_id = res.last_insert_id;

                PostTag::insert_many(tag_ids.into_iter().map(|tag_id| post_tag::ActiveModel {
                    post_id: Set(post_id),
                    tag_id: Set(tag_id),
                }))
                .on_empty_do_nothing()
                .exec(txn)
                .await?;

                Ok(post::Model {
                    id: post_id,
                    created_at,
                    user_id,
                    ..form_data
                })
            })
        })
        .await
        .map_err(flatten_transaction_error)
    }

    /// Updates title and content and replaces the post's tag links.
    pub async fn update_post_by_id(
        db: &DbConn,
        id: i32,
        form_data: post::Model,
        tag_ids: Vec<i32>,
    ) -> Result<post::Model, DbErr> {
        db.transaction::<_, post::Model, DbErr>(|txn| {
            Box::pin(async move {
                let mut post: post::ActiveModel = Post::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| DbErr::RecordNotFound(format!("No post with id {id}")))?
                    .into();

                post.title = Set(form_data.title.to_owned());
                post.content = Set(form_data.content.to_owned());

                let post = post.update(txn).await?;

                PostTag::delete_many()
                    .filter(post_tag::Column::PostId.eq(id))
                    .exec(txn)
                    .await?;

                PostTag::insert_many(tag_ids.into_iter().map(|tag_id| post_tag::ActiveModel {
                    post_id: Set(id),
                    tag_id: Set(tag_id),
                }))
                .on_empty_do_nothing()
                .exec(txn)
                .await?;

                Ok(post)
            })
        })
        .await
        .map_err(flatten_transaction_error)
    }

    /// Deletes the post and returns the owning user's id, so callers can
    /// route back to the user's page. Tag links cascade.
    pub async fn delete_post(db: &DbConn, id: i32) -> Result<i32, DbErr> {
        let post = Post::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("No post with id {id}")))?;

        let user_id = post.user_id;
        post.delete(db).await?;

        Ok(user_id)
    }

    /// A duplicate name surfaces as the unique constraint violation.
    pub async fn create_tag(db: &DbConn, name: String) -> Result<tag::Model, DbErr> {
        let res = Tag::insert(tag::ActiveModel {
            name: Set(name.to_owned()),
            ..Default::default()
        })
        .exec(db)
        .await?;

        Ok(tag::Model {
            id: res.last_insert_id,
            name,
        })
    }

    pub async fn update_tag_by_id(db: &DbConn, id: i32, name: String) -> Result<tag::Model, DbErr> {
        let tag: tag::ActiveModel = Tag::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("No tag with id {id}")))?
            .into();

        tag::ActiveModel {
            id: tag.id,
            name: Set(name),
        }
        .update(db)
        .await
    }

    pub async fn delete_tag(db: &DbConn, id: i32) -> Result<DeleteResult, DbErr> {
        let tag: tag::ActiveModel = Tag::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("No tag with id {id}")))?
            .into();

        tag.delete(db).await
    }
}

fn flatten_transaction_error(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) => e,
        TransactionError::Transaction(e) => e,
    }
}
