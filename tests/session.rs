use sleet::prelude::*;
use sleet::{ConfigError, Value};

mod common;

use common::{MockExecutor, RecordingSchema, blog_registry, blog_tables};

fn config(default_limit: Option<u64>) -> Config {
    Config {
        dataset: Some(common::DATASET.into()),
        default_limit,
        ..Config::default()
    }
}

#[tokio::test]
async fn find_all_reconstructs_executor_rows() {
    let registry = blog_registry();
    let options = FindOptions::new().include(Include::new("Post").attributes(["title"]));
    let (_, rows) = blog_tables().select(&registry, "User", &options);

    let db = Sleet::new(registry, MockExecutor::new().respond(rows));
    let users = db.find_all("User", &options).await.unwrap();

    assert_eq!(users.len(), 3);
    assert_eq!(users[0].many("posts").len(), 2);
    let statement = db.executor().last();
    assert!(statement.sql.contains("LEFT OUTER JOIN `blog.posts` AS `posts`"));
    assert!(!statement.sql.contains("LIMIT"));
}

#[tokio::test]
async fn default_limit_only_applies_to_plain_finds() {
    let db = Sleet::new(blog_registry(), MockExecutor::new()).with_config(config(Some(100)));

    db.find_all("User", &FindOptions::new()).await.unwrap();
    assert!(db.executor().last().sql.ends_with("LIMIT 100"));

    db.find_all("User", &FindOptions::new().limit(5)).await.unwrap();
    assert!(db.executor().last().sql.ends_with("LIMIT 5"));

    db.find_all("User", &FindOptions::new().include(Include::new("Post")))
        .await
        .unwrap();
    assert!(!db.executor().last().sql.contains("LIMIT"));
}

#[tokio::test]
async fn find_one_and_find_by_pk() {
    let registry = blog_registry();
    let rows = vec![
        Row::new()
            .with("users_id", 3)
            .with("users_name", "cid")
            .with("users_age", 41)
            .with("users_team_id", 2),
    ];
    let db = Sleet::new(registry, MockExecutor::new().respond(rows.clone()).respond(rows));

    let user = db.find_one("User", &FindOptions::new()).await.unwrap().unwrap();
    assert_eq!(user.value("name"), Some(&Value::from("cid")));
    assert!(db.executor().last().sql.ends_with("LIMIT 1"));

    let options = FindOptions::new().r#where(WhereOptions::new().op("age", Operator::Gt, 40));
    let user = db.find_by_pk("User", 3, &options).await.unwrap();
    assert!(user.is_some());
    let statement = db.executor().last();
    assert!(
        statement
            .sql
            .ends_with("WHERE (`users`.`id` = @param0) AND (`users`.`age` > @param1) LIMIT 1"),
        "{}",
        statement.sql
    );
    assert_eq!(statement.params.get("param0"), Some(&Value::Int64(3)));

    // Nothing queued: no rows
    assert!(db.find_by_pk("User", 9, &FindOptions::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn count_reads_count_column() {
    let executor = MockExecutor::new()
        .respond(vec![Row::new().with("count", 7)])
        .respond(vec![Row::new().with("count", "12")])
        .respond(vec![Row::new().with("total", 1)]);
    let db = Sleet::new(blog_registry(), executor);

    assert_eq!(db.count("User", &FindOptions::new()).await.unwrap(), 7);
    assert_eq!(db.count("User", &FindOptions::new()).await.unwrap(), 12);
    let err = db.count("User", &FindOptions::new()).await.unwrap_err();
    assert!(matches!(err, SleetError::Mapping(_)), "{err}");
}

#[tokio::test]
async fn writes_compile_to_dml() {
    let db = Sleet::new(blog_registry(), MockExecutor::new());

    db.create("User", Row::new().with("name", "dee").with("age", 19))
        .await
        .unwrap();
    db.bulk_create("Post", &[common::post(20, 4, "a"), common::post(21, 4, "b")])
        .await
        .unwrap();
    db.update(
        "User",
        &Row::new().with("age", 20),
        Some(&WhereOptions::new().eq("name", "dee")),
    )
    .await
    .unwrap();
    db.destroy("Post", None).await.unwrap();

    let sql: Vec<String> = db.executor().statements().into_iter().map(|s| s.sql).collect();
    assert_eq!(
        sql,
        [
            "INSERT INTO `blog.users` (`name`, `age`) VALUES (@param0, @param1)",
            "INSERT INTO `blog.posts` (`id`, `user_id`, `title`) VALUES (@param0, @param1, @param2), (@param3, @param4, @param5)",
            "UPDATE `blog.users` SET `age` = @param0 WHERE `name` = @param1",
            "DELETE FROM `blog.posts` WHERE TRUE",
        ]
    );
}

#[tokio::test]
async fn compile_errors_never_reach_the_executor() {
    let db = Sleet::new(blog_registry(), MockExecutor::new());
    let err = db
        .find_all("User", &FindOptions::new().include(Include::new("Nope")))
        .await
        .unwrap_err();
    assert!(matches!(err, SleetError::AssociationNotFound { .. }));
    assert!(!err.is_retryable());
    assert!(db.executor().statements().is_empty());
}

#[tokio::test]
async fn streaming_buffer_errors_are_retryable() {
    let executor = MockExecutor::new().fail(
        ExecutionError::new(
            "UPDATE or DELETE statement over table blog.users would affect rows in the streaming buffer, which is not supported",
        )
        .with_reason("invalidQuery"),
    );
    let db = Sleet::new(blog_registry(), executor);
    let err = db
        .update("User", &Row::new().with("age", 1), None)
        .await
        .unwrap_err();
    match &err {
        SleetError::EngineExecution {
            message,
            streaming_buffer,
        } => {
            assert!(*streaming_buffer);
            assert!(message.contains("streaming buffer"));
        }
        other => panic!("expected EngineExecution, got {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn other_engine_errors_pass_through() {
    let db = Sleet::new(
        blog_registry(),
        MockExecutor::new().fail(ExecutionError::new("Not found: Table blog.users")),
    );
    let err = db.find_all("User", &FindOptions::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: Table blog.users");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn sync_ensures_every_table_in_name_order() {
    let db = Sleet::new(blog_registry(), MockExecutor::new());
    let schema = RecordingSchema::default();
    db.sync(&schema).await.unwrap();
    assert_eq!(
        *schema.ensured.borrow(),
        [
            "blog.posts",
            "blog.profiles",
            "blog.roles",
            "blog.teams",
            "blog.users",
            "blog.user_roles",
        ]
    );
}

#[test]
fn config_errors_convert() {
    let err: SleetError = ConfigError::Invalid("dataset must be non-empty".into()).into();
    assert!(matches!(err, SleetError::Config(_)));
}
