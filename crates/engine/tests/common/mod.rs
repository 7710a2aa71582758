#![allow(dead_code)]

use engine::{Engine, User};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn register(engine: &Engine, email: &str) -> User {
    engine
        .register("Alice", email, "correct horse")
        .await
        .unwrap()
}
