//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the real
//! `Migrator`. The pool holds exactly one connection so the database lives as
//! long as the pool does.

#![allow(dead_code)]

use rewards_core::auth::Actor;
use rewards_core::directory::{AdminDraft, CustomerDraft};
use rewards_db::entities::{admins, customers};
use rewards_db::migration::{Migrator, MigratorTrait};
use rewards_db::{AdminRepository, CustomerRepository};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

pub async fn create_admin(db: &DatabaseConnection, username: &str, role: &str) -> admins::Model {
    let draft = AdminDraft::validate(username, "password123", role).expect("valid admin");
    AdminRepository::new(db.clone())
        .create(&draft)
        .await
        .expect("Failed to create admin")
}

pub async fn superadmin(db: &DatabaseConnection) -> Actor {
    create_admin(db, "admin", "superadmin").await.actor()
}

pub async fn cashier(db: &DatabaseConnection) -> Actor {
    create_admin(db, "cashier", "cashier").await.actor()
}

pub async fn create_customer(db: &DatabaseConnection, phone: &str, name: &str) -> customers::Model {
    let draft = CustomerDraft::validate(phone, name, None).expect("valid customer");
    CustomerRepository::new(db.clone())
        .create(&draft)
        .await
        .expect("Failed to create customer")
}
