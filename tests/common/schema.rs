//! Blog fixture schema shared by the integration tests.
//!
//! ```text
//! User ──belongsTo──> Team        (alias "team", users.team_id)
//! User ──hasOne─────> Profile     (alias "profile", profiles.user_id)
//! User ──hasMany────> Post        (posts.user_id)
//! User ──belongsToMany> Role      (through UserRole: user_id, role_id)
//! ```

use sleet::prelude::*;

use super::engine::Tables;

pub const DATASET: &str = "blog";

pub fn blog_registry() -> Registry {
    let mut registry = Registry::with_namespace(Namespace::new().dataset(DATASET));

    let entities = [
        Entity::builder("User")
            .table("users")
            .attribute("name", DataType::String)
            .attribute("age", DataType::Int64)
            .attribute("team_id", DataType::Int64)
            .build(),
        Entity::builder("Team")
            .table("teams")
            .attribute("name", DataType::String)
            .build(),
        Entity::builder("Profile")
            .table("profiles")
            .attribute("user_id", DataType::Int64)
            .attribute("bio", DataType::String)
            .build(),
        Entity::builder("Post")
            .table("posts")
            .attribute("user_id", DataType::Int64)
            .attribute("title", DataType::String)
            .attribute("tags", DataType::String)
            .build(),
        Entity::builder("Role")
            .table("roles")
            .attribute("name", DataType::String)
            .build(),
        Entity::builder("UserRole")
            .table("user_roles")
            .attribute("user_id", DataType::Int64)
            .attribute("role_id", DataType::Int64)
            .build(),
    ];
    for entity in entities {
        registry.define(entity).unwrap();
    }

    registry
        .associate("User", Association::belongs_to("Team", "team_id").with_alias("team"))
        .unwrap();
    registry
        .associate("User", Association::has_one("Profile", "user_id").with_alias("profile"))
        .unwrap();
    registry
        .associate("User", Association::has_many("Post", "user_id"))
        .unwrap();
    registry
        .associate(
            "User",
            Association::belongs_to_many("Role", "user_id")
                .through("UserRole")
                .other_key("role_id"),
        )
        .unwrap();
    registry
        .associate("Post", Association::belongs_to("User", "user_id").with_alias("author"))
        .unwrap();

    registry
}

pub fn user(id: i64, name: &str, age: i64, team: Option<i64>) -> Row {
    Row::new()
        .with("id", id)
        .with("name", name)
        .with("age", age)
        .with("team_id", team)
}

pub fn post(id: i64, user_id: i64, title: &str) -> Row {
    Row::new()
        .with("id", id)
        .with("user_id", user_id)
        .with("title", title)
}

/// Two teams, three users, posts for two of them, roles for one.
pub fn blog_tables() -> Tables {
    let mut tables = Tables::default();
    tables.insert("Team", Row::new().with("id", 1).with("name", "core"));
    tables.insert("Team", Row::new().with("id", 2).with("name", "infra"));

    tables.insert("User", user(1, "ann", 34, Some(1)));
    tables.insert("User", user(2, "bob", 27, None));
    tables.insert("User", user(3, "cid", 41, Some(2)));

    tables.insert(
        "Profile",
        Row::new().with("id", 1).with("user_id", 1).with("bio", "rustacean"),
    );

    tables.insert("Post", post(10, 1, "first"));
    tables.insert("Post", post(11, 1, "second"));
    tables.insert("Post", post(12, 3, "hello"));

    tables.insert("Role", Row::new().with("id", 100).with("name", "admin"));
    tables.insert("Role", Row::new().with("id", 101).with("name", "editor"));
    tables.insert("UserRole", Row::new().with("id", 1).with("user_id", 1).with("role_id", 100));
    tables.insert("UserRole", Row::new().with("id", 2).with("user_id", 1).with("role_id", 101));

    tables
}
