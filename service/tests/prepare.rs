#[cfg(feature = "mock")]
use ::entity::user;
#[cfg(feature = "mock")]
use sea_orm::*;

#[cfg(feature = "mock")]
pub fn prepare_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            [mock_user(1, "Alice", Some("Smith"))],
            [mock_user(6, "Dana", None)],
            [mock_user(1, "Alice", Some("Smith"))],
            [mock_user(1, "Alicia", Some("Smith"))],
            [mock_user(5, "Eve", None)],
        ])
        .append_exec_results([
            MockExecResult {
                last_insert_id: 6,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 6,
                rows_affected: 1,
            },
        ])
        .into_connection()
}

#[cfg(feature = "mock")]
fn mock_user(id: i32, first_name: &str, last_name: Option<&str>) -> user::Model {
    user::Model {
        id,
        first_name: first_name.to_owned(),
        last_name: last_name.map(ToOwned::to_owned),
        image_url: user::DEFAULT_IMAGE_URL.to_owned(),
    }
}
