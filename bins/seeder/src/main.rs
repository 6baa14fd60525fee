//! Database seeder for rewards development and testing.
//!
//! Seeds the two starter admin accounts and a handful of demo customers
//! with some points on the ledger.
//!
//! Usage: cargo run --bin seeder (after `migrator up`)

use anyhow::Context;
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use rewards_core::auth::Actor;
use rewards_core::directory::{AdminDraft, CustomerDraft};
use rewards_core::ledger::PointsAction;
use rewards_db::{AdminRepository, CustomerRepository, LedgerRepository};
use rewards_shared::config::DatabaseConfig;
use rewards_shared::types::CustomerId;
use sea_orm::DatabaseConnection;

/// Starting points for the demo customers; the last one can redeem right away.
const DEMO_BALANCES: [i64; 5] = [0, 40, 120, 180, 260];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = rewards_db::connect(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
    })
    .await
    .context("Failed to connect to database")?;

    println!("Seeding admins...");
    let superadmin_password =
        std::env::var("SEED_SUPERADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let cashier_password =
        std::env::var("SEED_CASHIER_PASSWORD").unwrap_or_else(|_| "cashier123".to_string());
    let superadmin = seed_admin(&db, "admin", &superadmin_password, "superadmin").await?;
    seed_admin(&db, "cashier", &cashier_password, "cashier").await?;

    println!("Seeding demo customers...");
    seed_customers(&db, &superadmin).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Creates an admin unless the username is taken.
async fn seed_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Actor> {
    let repo = AdminRepository::new(db.clone());
    if let Some(existing) = repo.find_by_username(username).await? {
        println!("  Admin '{username}' already exists, skipping...");
        return Ok(existing.actor());
    }

    let draft = AdminDraft::validate(username, password, role)?;
    let admin = repo.create(&draft).await?;
    println!("  Created {role}: {username}");
    Ok(admin.actor())
}

/// Creates demo customers when the directory is empty.
async fn seed_customers(db: &DatabaseConnection, actor: &Actor) -> anyhow::Result<()> {
    let customers = CustomerRepository::new(db.clone());
    if customers.count().await? > 0 {
        println!("  Customers already exist, skipping...");
        return Ok(());
    }

    let ledger = LedgerRepository::new(db.clone());
    for starting in DEMO_BALANCES {
        let phone = (2_000_000_000_u64..9_999_999_999).fake::<u64>().to_string();
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();

        let draft = CustomerDraft::validate(&phone, &name, Some(&email))?;
        let customer = customers.create(&draft).await?;
        if starting > 0 {
            ledger
                .apply(
                    actor,
                    CustomerId::from_uuid(customer.id),
                    PointsAction::Add(starting),
                )
                .await?;
        }
        println!("  Created customer {name} ({phone}) with {starting} points");
    }

    Ok(())
}
