//! Database seeder for fenceledger development and testing.
//!
//! Seeds one account per role, a small material catalog, a supplier and a
//! buyer, and an opening purchase so the ledger and reports have data.
//! Running it twice is a no-op once the admin account exists.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use fenceledger_core::auth::{Principal, UserRole, hash_password};
use fenceledger_core::ledger::{CreateTransactionInput, LedgerService, TransactionType};
use fenceledger_core::material::{
    CreateMaterialInput, MaterialCategory, MaterialService, MaterialUnit,
};
use fenceledger_core::party::{CreatePartyInput, PartyItem, PartyService, PartyType};
use fenceledger_db::{SeaStore, UserRepository};
use fenceledger_shared::config::DatabaseConfig;
use fenceledger_shared::types::UserId;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, TransactionTrait};

/// Password shared by every seeded account.
const DEV_PASSWORD: &str = "fenceledger-dev";

const ADMIN_EMAIL: &str = "admin@fenceledger.dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = fenceledger_db::connect(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
    })
    .await
    .context("failed to connect to database")?;

    let users = UserRepository::new(db.clone());
    if users.find_by_email(ADMIN_EMAIL).await?.is_some() {
        println!("Seed data already present, skipping...");
        return Ok(());
    }

    println!("Seeding users...");
    let admin = seed_user(&users, "Admin", ADMIN_EMAIL, UserRole::Admin).await?;
    let store_boy = seed_user(&users, "Store", "store@fenceledger.dev", UserRole::StoreBoy).await?;
    seed_user(&users, "Final", "final@fenceledger.dev", UserRole::FinalBoy).await?;

    println!("Seeding materials, parties, and an opening purchase...");
    seed_ledger(&db, &store_boy, &admin).await?;

    println!("Seeding complete! Accounts use password '{DEV_PASSWORD}'.");
    Ok(())
}

async fn seed_user(
    users: &UserRepository,
    name: &str,
    email: &str,
    role: UserRole,
) -> anyhow::Result<Principal> {
    let hash = hash_password(DEV_PASSWORD)?;
    let user = users.create(name, email, &hash, role).await?;
    println!("  {email} ({role})");
    Ok(Principal::new(UserId::from_uuid(user.id), role))
}

async fn seed_ledger(
    db: &DatabaseConnection,
    store_boy: &Principal,
    admin: &Principal,
) -> anyhow::Result<()> {
    let txn = db.begin().await?;
    let store = SeaStore::new(&txn);

    let materials = MaterialService::new(&store);
    let wire = materials
        .create(
            store_boy,
            CreateMaterialInput {
                name: "GI Wire 12 gauge".to_string(),
                category: MaterialCategory::Raw,
                unit: MaterialUnit::Kg,
                quantity: None,
                unit_price: Some(dec!(72)),
                description: Some("Galvanised line wire".to_string()),
                low_stock_threshold: Some(dec!(100)),
            },
        )
        .await?;
    materials
        .create(
            store_boy,
            CreateMaterialInput {
                name: "Barbed Wire Coil".to_string(),
                category: MaterialCategory::SemiFinished,
                unit: MaterialUnit::Pcs,
                quantity: Some(dec!(40)),
                unit_price: Some(dec!(950)),
                description: None,
                low_stock_threshold: Some(dec!(10)),
            },
        )
        .await?;
    materials
        .create(
            admin,
            CreateMaterialInput {
                name: "Chain Link Panel 6ft".to_string(),
                category: MaterialCategory::Final,
                unit: MaterialUnit::Pcs,
                quantity: Some(dec!(25)),
                unit_price: Some(dec!(2400)),
                description: None,
                low_stock_threshold: Some(dec!(5)),
            },
        )
        .await?;

    let parties = PartyService::new(&store);
    let supplier = parties
        .create(
            store_boy,
            CreatePartyInput {
                name: "Shree Wire Industries".to_string(),
                party_type: PartyType::Supplier,
                contact: Some("+91 98200 00000".to_string()),
                items: vec![PartyItem {
                    item_name: "GI Wire 12 gauge".to_string(),
                    item_price: dec!(72),
                }],
            },
        )
        .await?;
    parties
        .create(
            admin,
            CreatePartyInput {
                name: "Green Acres Farms".to_string(),
                party_type: PartyType::Buyer,
                contact: None,
                items: vec![PartyItem {
                    item_name: "Chain Link Panel 6ft".to_string(),
                    item_price: dec!(2400),
                }],
            },
        )
        .await?;

    LedgerService::new(&store)
        .create(
            store_boy,
            CreateTransactionInput {
                transaction_type: TransactionType::Purchase,
                quantity: dec!(500),
                unit_price: dec!(72),
                material_id: Some(wire.id),
                party_id: Some(supplier.id),
                date: None,
                notes: Some("Opening stock".to_string()),
            },
        )
        .await?;

    txn.commit().await?;
    Ok(())
}
