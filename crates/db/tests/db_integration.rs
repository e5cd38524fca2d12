//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `quill_test`)
//!   `TEST_DB_PASSWORD` (default: `quill_test`)
//!   `TEST_DB_NAME` (default: `quill_test`)

#![allow(clippy::unwrap_used)]

use quill_db::test_utils::{TestDatabase, TestDbConfig};

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = quill_db::migrate(db.connection()).await;
    assert!(result.is_ok(), "Migrations failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[test]
fn test_config_from_env() {
    // Test that default config is valid
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}

mod visibility_queries {
    //! Listing-query tests against a real database.

    use super::*;
    use chrono::{Duration, Utc};
    use quill_db::entities::{category, post, user};
    use quill_db::repositories::{CategoryRepository, PostRepository, UserRepository};
    use sea_orm::Set;
    use std::sync::Arc;

    fn user_model(id: &str, username: &str) -> user::ActiveModel {
        user::ActiveModel {
            id: Set(id.to_string()),
            username: Set(username.to_string()),
            username_lower: Set(username.to_lowercase()),
            email: Set(format!("{username}@example.com")),
            token: Set(None),
            first_name: Set(None),
            last_name: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
    }

    fn category_model(id: &str, slug: &str, is_published: bool) -> category::ActiveModel {
        category::ActiveModel {
            id: Set(id.to_string()),
            title: Set(slug.to_string()),
            slug: Set(slug.to_string()),
            description: Set(String::new()),
            is_published: Set(is_published),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
    }

    fn post_model(
        id: &str,
        author_id: &str,
        category_id: Option<&str>,
        hours_ago: i64,
        is_published: bool,
    ) -> post::ActiveModel {
        post::ActiveModel {
            id: Set(id.to_string()),
            author_id: Set(author_id.to_string()),
            category_id: Set(category_id.map(ToString::to_string)),
            title: Set(format!("Post {id}")),
            text: Set("Body".to_string()),
            location: Set(None),
            image_url: Set(None),
            pub_date: Set((Utc::now() - Duration::hours(hours_ago)).into()),
            is_published: Set(is_published),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL instance"]
    async fn test_listing_applies_visibility_rules() {
        let db = TestDatabase::create_unique().await.expect("create test db");
        quill_db::migrate(db.connection()).await.expect("migrate");

        let conn = Arc::new(
            sea_orm::Database::connect(db.config.database_url())
                .await
                .expect("connect to test db"),
        );
        let users = UserRepository::new(Arc::clone(&conn));
        let categories = CategoryRepository::new(Arc::clone(&conn));
        let posts = PostRepository::new(conn);

        users.create(user_model("alice", "alice")).await.expect("user");
        categories
            .create(category_model("cat-pub", "news", true))
            .await
            .expect("category");
        categories
            .create(category_model("cat-hidden", "drafts", false))
            .await
            .expect("category");

        // Live, future-dated, unpublished, hidden-category, uncategorized
        posts
            .create(post_model("p-live", "alice", Some("cat-pub"), 1, true))
            .await
            .expect("post");
        posts
            .create(post_model("p-future", "alice", Some("cat-pub"), -24, true))
            .await
            .expect("post");
        posts
            .create(post_model("p-draft", "alice", Some("cat-pub"), 1, false))
            .await
            .expect("post");
        posts
            .create(post_model("p-hidden-cat", "alice", Some("cat-hidden"), 1, true))
            .await
            .expect("post");
        posts
            .create(post_model("p-bare", "alice", None, 2, true))
            .await
            .expect("post");

        // Anonymous viewers see only live posts
        let anon = posts.list_visible(None, 10, 0).await.expect("list");
        let anon_ids: Vec<&str> = anon.iter().map(|(p, _)| p.id.as_str()).collect();
        assert_eq!(anon_ids, vec!["p-live", "p-bare"]);
        assert_eq!(posts.count_visible(None).await.expect("count"), 2);

        // The author additionally sees their hidden posts
        assert_eq!(posts.count_visible(Some("alice")).await.expect("count"), 5);

        // Category listings exclude hidden posts for non-owners
        let in_category = posts
            .list_visible_in_category("cat-pub", None, 10, 0)
            .await
            .expect("list");
        assert_eq!(in_category.len(), 1);
        assert_eq!(in_category[0].0.id, "p-live");

        // An unpublished category is not resolvable by slug
        let hidden = categories
            .find_published_by_slug("drafts")
            .await
            .expect("lookup");
        assert!(hidden.is_none());

        // Profile listing: live-only for others, full history for the owner
        assert_eq!(
            posts.count_by_author("alice", false).await.expect("count"),
            2
        );
        assert_eq!(
            posts.count_by_author("alice", true).await.expect("count"),
            5
        );

        db.drop_database().await.expect("drop test db");
    }
}
