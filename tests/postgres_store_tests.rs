// tests/postgres_store_tests.rs
//
// Run with a live database:
//   DATABASE_URL=postgres://... cargo test --test postgres_store_tests -- --ignored

use community::{
    error::AppError,
    models::{comment::NewComment, post::NewPost, user::NewUser},
    store::{CommunityStore, PgCommunityStore},
};
use sqlx::postgres::PgPoolOptions;

async fn store() -> PgCommunityStore {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    PgCommunityStore::new(pool)
}

async fn new_user(store: &PgCommunityStore) -> i64 {
    let tag = &uuid::Uuid::new_v4().to_string()[..8];
    store
        .insert_user(NewUser {
            email: format!("pg_{}@runner.test", tag),
            nickname: format!("pg_{}", tag),
            password_hash: "not-a-real-hash".to_string(),
            height: 170,
            weight: 60,
        })
        .await
        .unwrap()
        .id
}

async fn new_post(store: &PgCommunityStore, user_id: i64, urls: &[&str]) -> i64 {
    store
        .insert_post(NewPost {
            user_id,
            title: "pg post".to_string(),
            content: "pg content".to_string(),
            tag: true,
            image_urls: urls.iter().map(|u| u.to_string()).collect(),
            created_at: chrono::Utc::now(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn post_images_round_trip_in_order() {
    let store = store().await;
    let user_id = new_user(&store).await;
    let post_id = new_post(&store, user_id, &["u/3", "u/1", "u/2"]).await;

    let post = store.find_post(post_id).await.unwrap().unwrap();
    let urls: Vec<&str> = post.images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, ["u/3", "u/1", "u/2"]);
    assert_eq!(post.like_count, 0);
    assert_eq!(post.comment_count, 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_likes_count_exactly_once_each() {
    let store = store().await;
    let author = new_user(&store).await;
    let post_id = new_post(&store, author, &[]).await;

    let mut fans = Vec::new();
    for _ in 0..8 {
        fans.push(new_user(&store).await);
    }

    let handles: Vec<_> = fans
        .iter()
        .map(|&fan| {
            let store = store.clone();
            tokio::spawn(async move { store.insert_like(fan, post_id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let post = store.find_post(post_id).await.unwrap().unwrap();
    assert_eq!(post.like_count, 8);

    let duplicate = store.insert_like(fans[0], post_id).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert_eq!(store.find_post(post_id).await.unwrap().unwrap().like_count, 8);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn comment_insert_bumps_counter_and_rejects_missing_post() {
    let store = store().await;
    let user_id = new_user(&store).await;
    let post_id = new_post(&store, user_id, &[]).await;

    for i in 0..3 {
        store
            .insert_comment(NewComment {
                post_id,
                user_id,
                content: format!("comment {}", i),
                created_at: chrono::Utc::now(),
            })
            .await
            .unwrap();
    }

    assert_eq!(store.find_post(post_id).await.unwrap().unwrap().comment_count, 3);
    assert_eq!(store.comments_for_post(post_id).await.unwrap().len(), 3);

    let missing = store
        .insert_comment(NewComment {
            post_id: i64::MAX,
            user_id,
            content: "nobody home".to_string(),
            created_at: chrono::Utc::now(),
        })
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
