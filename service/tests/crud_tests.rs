use blogly_service::{Mutation, Query, RECENT_POSTS};
use entity::{post, post_tag::Entity as PostTag, user};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DbConn, DbErr, EntityTrait, SqlErr};

async fn setup() -> DbConn {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn user_form(first_name: &str, last_name: Option<&str>) -> user::Model {
    user::Model {
        id: 0,
        first_name: first_name.to_owned(),
        last_name: last_name.map(ToOwned::to_owned),
        image_url: user::DEFAULT_IMAGE_URL.to_owned(),
    }
}

fn post_form(title: &str, content: &str) -> post::Model {
    post::Model {
        id: 0,
        title: title.to_owned(),
        content: content.to_owned(),
        created_at: Default::default(),
        user_id: 0,
    }
}

#[tokio::test]
async fn users_are_listed_in_name_order() {
    let db = &setup().await;

    Mutation::create_user(db, user_form("Noah", Some("Smith")))
        .await
        .unwrap();
    Mutation::create_user(db, user_form("Alice", Some("Brown")))
        .await
        .unwrap();
    Mutation::create_user(db, user_form("Ada", Some("Brown")))
        .await
        .unwrap();

    let users = Query::list_users(db).await.unwrap();
    let names: Vec<String> = users.iter().map(user::Model::full_name).collect();

    assert_eq!(names, ["Ada Brown", "Alice Brown", "Noah Smith"]);
}

#[tokio::test]
async fn edits_are_visible_on_re_read() {
    let db = &setup().await;

    let user = Mutation::create_user(db, user_form("Alice", Some("Smith")))
        .await
        .unwrap();
    let post = Mutation::create_post(db, user.id, post_form("Draft", "wip"), vec![])
        .await
        .unwrap();
    let tag = Mutation::create_tag(db, "rust".to_owned()).await.unwrap();

    Mutation::update_user_by_id(db, user.id, user_form("Alicia", Some("Smith")))
        .await
        .unwrap();
    Mutation::update_post_by_id(db, post.id, post_form("Published", "done"), vec![])
        .await
        .unwrap();
    Mutation::update_tag_by_id(db, tag.id, "rustlang".to_owned())
        .await
        .unwrap();

    let user = Query::find_user_by_id(db, user.id).await.unwrap().unwrap();
    assert_eq!(user.first_name, "Alicia");

    let post = Query::find_post_by_id(db, post.id).await.unwrap().unwrap();
    assert_eq!(post.title, "Published");
    assert_eq!(post.content, "done");

    let tag = Query::find_tag_by_id(db, tag.id).await.unwrap().unwrap();
    assert_eq!(tag.name, "rustlang");
}

#[tokio::test]
async fn deleting_a_user_removes_their_posts_and_tag_links() {
    let db = &setup().await;

    let user = Mutation::create_user(db, user_form("Alice", Some("Smith")))
        .await
        .unwrap();
    let tag = Mutation::create_tag(db, "rust".to_owned()).await.unwrap();
    let post = Mutation::create_post(db, user.id, post_form("Hello", "world"), vec![tag.id])
        .await
        .unwrap();

    Mutation::delete_user(db, user.id).await.unwrap();

    assert!(Query::find_user_by_id(db, user.id).await.unwrap().is_none());
    assert!(Query::find_post_by_id(db, post.id).await.unwrap().is_none());
    assert!(PostTag::find().all(db).await.unwrap().is_empty());

    // the tag itself survives
    assert!(Query::find_tag_by_id(db, tag.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_tag_removes_its_join_rows() {
    let db = &setup().await;

    let user = Mutation::create_user(db, user_form("Alice", Some("Smith")))
        .await
        .unwrap();
    let tag = Mutation::create_tag(db, "rust".to_owned()).await.unwrap();
    let post = Mutation::create_post(db, user.id, post_form("Hello", "world"), vec![tag.id])
        .await
        .unwrap();

    Mutation::delete_tag(db, tag.id).await.unwrap();

    assert!(Query::find_tag_by_id(db, tag.id).await.unwrap().is_none());
    assert!(PostTag::find().all(db).await.unwrap().is_empty());

    // the post itself survives, just untagged
    let (_, _, tags) = Query::find_post_detail(db, post.id).await.unwrap().unwrap();
    assert!(tags.is_empty());
}

#[tokio::test]
async fn deleting_a_post_leaves_the_user_intact() {
    let db = &setup().await;

    let user = Mutation::create_user(db, user_form("Alice", Some("Smith")))
        .await
        .unwrap();
    let post = Mutation::create_post(db, user.id, post_form("Hello", "world"), vec![])
        .await
        .unwrap();

    let owner_id = Mutation::delete_post(db, post.id).await.unwrap();
    assert_eq!(owner_id, user.id);

    let (user, posts) = Query::find_user_with_posts(db, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.first_name, "Alice");
    assert!(posts.is_empty());
}

#[tokio::test]
async fn landing_shows_at_most_five_posts_newest_first() {
    let db = &setup().await;

    let user = Mutation::create_user(db, user_form("Alice", Some("Smith")))
        .await
        .unwrap();
    for n in 1..=6 {
        Mutation::create_post(db, user.id, post_form(&format!("Post {n}"), "text"), vec![])
            .await
            .unwrap();
    }

    let recent = Query::recent_posts(db).await.unwrap();

    assert_eq!(recent.len(), RECENT_POSTS as usize);
    let titles: Vec<&str> = recent.iter().map(|(post, _)| post.title.as_str()).collect();
    assert_eq!(titles, ["Post 6", "Post 5", "Post 4", "Post 3", "Post 2"]);

    for (_, author) in &recent {
        assert_eq!(author.as_ref().unwrap().id, user.id);
    }
}

#[tokio::test]
async fn duplicate_tag_names_are_rejected() {
    let db = &setup().await;

    Mutation::create_tag(db, "rust".to_owned()).await.unwrap();
    let err = Mutation::create_tag(db, "rust".to_owned())
        .await
        .unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn editing_a_post_replaces_its_tags() {
    let db = &setup().await;

    let user = Mutation::create_user(db, user_form("Alice", Some("Smith")))
        .await
        .unwrap();
    let rust = Mutation::create_tag(db, "rust".to_owned()).await.unwrap();
    let web = Mutation::create_tag(db, "web".to_owned()).await.unwrap();
    let sql = Mutation::create_tag(db, "sql".to_owned()).await.unwrap();

    let post = Mutation::create_post(db, user.id, post_form("Hello", "world"), vec![rust.id])
        .await
        .unwrap();

    Mutation::update_post_by_id(db, post.id, post_form("Hello", "world"), vec![web.id, sql.id])
        .await
        .unwrap();

    let (_, _, tags) = Query::find_post_detail(db, post.id).await.unwrap().unwrap();
    let names: Vec<&str> = tags.iter().map(|tag| tag.name.as_str()).collect();

    assert_eq!(names, ["sql", "web"]);
}

#[tokio::test]
async fn missing_rows_surface_record_not_found() {
    let db = &setup().await;

    let err = Mutation::update_user_by_id(db, 42, user_form("Ghost", None))
        .await
        .unwrap_err();
    assert!(matches!(err, DbErr::RecordNotFound(_)));

    let err = Mutation::delete_post(db, 42).await.unwrap_err();
    assert!(matches!(err, DbErr::RecordNotFound(_)));

    let err = Mutation::delete_tag(db, 42).await.unwrap_err();
    assert!(matches!(err, DbErr::RecordNotFound(_)));
}
