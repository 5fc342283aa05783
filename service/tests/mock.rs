mod prepare;

use blogly_service::{Mutation, Query};
use entity::user;
use prepare::prepare_mock_db;

#[tokio::test]
async fn main() {
    let db = &prepare_mock_db();

    {
        let user = Query::find_user_by_id(db, 1).await.unwrap().unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.full_name(), "Alice Smith");
    }

    {
        let user = Mutation::create_user(
            db,
            user::Model {
                id: 0,
                first_name: "Dana".to_owned(),
                last_name: None,
                image_url: user::DEFAULT_IMAGE_URL.to_owned(),
            },
        )
        .await
        .unwrap();

        assert_eq!(user.id, 6);
        assert_eq!(user.full_name(), "Dana");
    }

    {
        let user = Mutation::update_user_by_id(
            db,
            1,
            user::Model {
                id: 1,
                first_name: "Alicia".to_owned(),
                last_name: Some("Smith".to_owned()),
                image_url: user::DEFAULT_IMAGE_URL.to_owned(),
            },
        )
        .await
        .unwrap();

        assert_eq!(user.first_name, "Alicia");
    }

    {
        let result = Mutation::delete_user(db, 5).await.unwrap();

        assert_eq!(result.rows_affected, 1);
    }
}
