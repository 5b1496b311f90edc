//! Database seeder for Branchbook development and testing.
//!
//! Seeds the system chart of accounts, a demo branch and its float accounts
//! for local development.
//!
//! Usage: cargo run --bin seeder

use branchbook_core::float::{FloatAccountKind, FloatError};
use branchbook_db::entities::branches;
use branchbook_db::repositories::{
    BranchError, CreateBranchInput, CreateFloatAccountInput, FloatAccountError,
};
use branchbook_db::{BranchRepository, FloatAccountRepository, GlAccountRepository};
use branchbook_shared::types::PageRequest;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Demo branch code (consistent for all seeds)
const DEMO_BRANCH_CODE: &str = "ACC-01";

/// Float accounts opened for the demo branch: kind, provider, opening balance in pesewas.
const DEMO_FLOATS: [(FloatAccountKind, &str, i64); 9] = [
    (FloatAccountKind::CashInTill, "", 500_000),
    (FloatAccountKind::Momo, "MTN", 2_000_000),
    (FloatAccountKind::Momo, "Telecel", 1_000_000),
    (FloatAccountKind::AgencyBanking, "GCB", 1_500_000),
    (FloatAccountKind::EZwich, "GCB", 0),
    (FloatAccountKind::Bank, "GCB", 5_000_000),
    (FloatAccountKind::Power, "ECG", 500_000),
    (FloatAccountKind::Power, "NEDCo", 200_000),
    (FloatAccountKind::Jumia, "", 0),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = branchbook_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding chart of accounts...");
    let accounts = GlAccountRepository::new(db.clone())
        .ensure_chart()
        .await
        .expect("Failed to seed chart of accounts");
    println!("  {} GL accounts present", accounts.len());

    println!("Seeding demo branch...");
    let branch = seed_branch(&db).await.expect("Failed to seed demo branch");

    println!("Seeding float accounts...");
    seed_float_accounts(&db, &branch)
        .await
        .expect("Failed to seed float accounts");

    println!("Seeding complete!");
}

/// Creates the demo branch, or returns it if it already exists.
async fn seed_branch(db: &DatabaseConnection) -> Result<branches::Model, BranchError> {
    let repo = BranchRepository::new(db.clone());
    let created = repo
        .create(CreateBranchInput {
            code: DEMO_BRANCH_CODE.to_string(),
            name: "Accra Central".to_string(),
            location: Some("Kwame Nkrumah Avenue, Accra".to_string()),
        })
        .await;

    match created {
        Ok(branch) => Ok(branch),
        Err(BranchError::DuplicateCode(_)) => {
            println!("  Demo branch already exists, skipping...");
            let (branches, _) = repo.list(&PageRequest::new(Some(1), Some(100))).await?;
            branches
                .into_iter()
                .find(|b| b.code == DEMO_BRANCH_CODE)
                .ok_or_else(|| BranchError::DuplicateCode(DEMO_BRANCH_CODE.to_string()))
        }
        Err(e) => Err(e),
    }
}

/// Opens the demo float accounts, skipping any that already exist.
async fn seed_float_accounts(
    db: &DatabaseConnection,
    branch: &branches::Model,
) -> Result<(), FloatAccountError> {
    let repo = FloatAccountRepository::new(db.clone());

    for (kind, provider, opening) in DEMO_FLOATS {
        let result = repo
            .create(CreateFloatAccountInput {
                branch_id: branch.id,
                kind,
                provider: provider.to_string(),
                opening_balance: Decimal::new(opening, 2),
                min_threshold: Decimal::new(opening / 10, 2),
                max_threshold: None,
            })
            .await;

        match result {
            Ok(account) => println!(
                "  Opened {} float {} with {}",
                account.kind, account.provider, account.current_balance
            ),
            Err(FloatAccountError::Float(FloatError::DuplicateAccount { .. })) => {
                println!("  {kind} float {provider} already exists, skipping...");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
