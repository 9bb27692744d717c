//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Email uniqueness is enforced by a `LOWER(email)` index, so these tests
//! cover collisions both through normalised domain values and through rows
//! written with mixed case straight into the table.

use chrono::{DateTime, TimeZone, Utc};
use pagination::PageLimits;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use tokio::runtime::Runtime;
use uuid::Uuid;

use salesdesk::domain::ports::{SaleRepository, UserPersistenceError, UserRepository};
use salesdesk::domain::{
    Email, ProductId, Role, Sale, SaleFields, SaleId, SaleStatus, User, UserId, UserName,
};
use salesdesk::outbound::persistence::{
    DbPool, DieselSaleRepository, DieselUserRepository, PoolConfig,
};

#[path = "support/pg_embed.rs"]
mod pg_embed;

// Each adapter suite uses a different subset of the database helpers.
#[allow(dead_code)]
#[path = "support/database.rs"]
mod database;

use database::{
    format_postgres_error, handle_cluster_setup_failure, migrate_schema, raw_client,
    reset_database,
};
use pg_embed::test_cluster;

const TEST_DB: &str = "diesel_user_repo_test";
const HASH: &str = "$2b$04$adaptersuitehash";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    database_url: String,
    users: DieselUserRepository,
    sales: DieselSaleRepository,
}

impl TestContext {
    fn execute(&self, statement: &str, params: &[&(dyn postgres::types::ToSql + Sync)]) {
        let mut client = raw_client(&self.database_url).expect("raw client");
        client
            .execute(statement, params)
            .map_err(|err| format_postgres_error(&err))
            .expect("raw statement");
    }

    fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.runtime.block_on(self.users.insert(user, HASH))
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    reset_database(&cluster, TEST_DB)?;
    let database_url = cluster.connection().database_url(TEST_DB);
    migrate_schema(&database_url)?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        database_url,
        users: DieselUserRepository::new(pool.clone()),
        sales: DieselSaleRepository::new(pool),
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn user(name: &str, email: &str, role: Role) -> User {
    User {
        id: UserId::random(),
        name: UserName::new(name).expect("fixture name"),
        email: Email::new(email).expect("fixture email"),
        role,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

#[rstest]
#[case::upper_case_domain("Ana@BANK.example")]
#[case::shouting("ANA@BANK.EXAMPLE")]
#[case::padded("  ana@Bank.Example ")]
fn email_differing_only_in_case_is_a_duplicate(
    repo_context: Option<TestContext>,
    #[case] second_email: &str,
) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: email_differing_only_in_case_is_a_duplicate skipped");
        return;
    };
    context
        .insert(&user("Ana Advisor", "ana@bank.example", Role::Advisor))
        .expect("first insert");

    let err = context
        .insert(&user("Ana Again", second_email, Role::Admin))
        .expect_err("case-insensitive collision");
    assert_eq!(
        err,
        UserPersistenceError::duplicate_email("ana@bank.example")
    );
}

#[rstest]
fn mixed_case_row_in_the_table_still_collides(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: mixed_case_row_in_the_table_still_collides skipped");
        return;
    };
    let legacy_id = Uuid::new_v4();
    context.execute(
        "INSERT INTO users (id, name, email, password_hash, role_id) \
         VALUES ($1, 'Ben Legacy', 'Ben@Bank.Example', $2, 2)",
        &[&legacy_id, &HASH],
    );

    let err = context
        .insert(&user("Ben Advisor", "ben@bank.example", Role::Advisor))
        .expect_err("index compares lower-cased emails");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
fn updating_onto_a_taken_email_is_a_duplicate(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: updating_onto_a_taken_email_is_a_duplicate skipped");
        return;
    };
    let ana = user("Ana Advisor", "ana@bank.example", Role::Advisor);
    let ben = user("Ben Advisor", "ben@bank.example", Role::Advisor);
    context.insert(&ana).expect("insert ana");
    context.insert(&ben).expect("insert ben");

    let renamed = User {
        email: Email::new("ANA@bank.example").expect("email"),
        ..ben
    };
    let err = context
        .runtime
        .block_on(context.users.update(&renamed))
        .expect_err("collision on update");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
fn missing_role_row_is_an_unknown_role(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: missing_role_row_is_an_unknown_role skipped");
        return;
    };
    context.execute("DELETE FROM roles WHERE id = 2", &[]);

    let err = context
        .insert(&user("Ana Advisor", "ana@bank.example", Role::Advisor))
        .expect_err("advisor role removed");
    assert_eq!(err, UserPersistenceError::unknown_role(2));
}

#[rstest]
fn users_owning_sales_cannot_be_deleted(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: users_owning_sales_cannot_be_deleted skipped");
        return;
    };
    let owner = user("Ana Advisor", "ana@bank.example", Role::Advisor);
    let idle = user("Ben Advisor", "ben@bank.example", Role::Advisor);
    context.insert(&owner).expect("insert owner");
    context.insert(&idle).expect("insert idle");
    let sale = Sale {
        id: SaleId::random(),
        fields: SaleFields {
            product_id: ProductId(1),
            requested_amount: dec!(5000),
            franchise_id: None,
            rate: Some(dec!(9.5)),
        },
        status: SaleStatus::Open,
        creator_user_id: owner.id,
        updater_user_id: owner.id,
        created_at: epoch(),
        updated_at: epoch(),
    };
    context
        .runtime
        .block_on(context.sales.insert(&sale))
        .expect("insert sale");

    let err = context
        .runtime
        .block_on(context.users.delete(&owner.id))
        .expect_err("owner still referenced");
    assert!(matches!(err, UserPersistenceError::InUse { .. }));

    let deleted = context
        .runtime
        .block_on(context.users.delete(&idle.id))
        .expect("delete idle user");
    let deleted_again = context
        .runtime
        .block_on(context.users.delete(&idle.id))
        .expect("delete twice");
    assert!(deleted);
    assert!(!deleted_again);
}

#[rstest]
fn credentials_and_listing_round_trip(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: credentials_and_listing_round_trip skipped");
        return;
    };
    let zoe = user("Zoe Admin", "zoe@bank.example", Role::Admin);
    let ana = user("Ana Advisor", "ana@bank.example", Role::Advisor);
    context.insert(&zoe).expect("insert zoe");
    context.insert(&ana).expect("insert ana");

    let stored = context
        .runtime
        .block_on(context.users.find_credentials_by_email(&ana.email))
        .expect("lookup")
        .expect("ana exists");
    assert_eq!(stored.user, ana);
    assert_eq!(stored.password_hash, HASH);

    let changed = context
        .runtime
        .block_on(context.users.set_password_hash(&ana.id, "$2b$04$rotated", epoch()))
        .expect("rotate hash");
    assert!(changed);
    let rotated = context
        .runtime
        .block_on(context.users.find_credentials_by_id(&ana.id))
        .expect("lookup by id")
        .expect("ana exists");
    assert_eq!(rotated.password_hash, "$2b$04$rotated");

    let page = PageLimits::default()
        .resolve(Some(1), Some(1))
        .expect("valid page");
    let listed = context
        .runtime
        .block_on(context.users.list(page))
        .expect("list users");
    assert_eq!(listed.pagination.total, 2);
    assert_eq!(listed.items, vec![ana]);
}
