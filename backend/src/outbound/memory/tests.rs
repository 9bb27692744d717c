//! Behaviour of the in-process store against the repository contracts.

use actix_rt::System;
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;

use super::*;
use crate::domain::sales::fixtures::{at, card_fields, credit_fields, sale};
use crate::domain::sales::scope::SaleFilter;
use crate::domain::test_support::{admin_user, advisor_user};
use crate::domain::{Caller, FranchiseId, ProductId, Role, SaleStatus};
use pagination::PageLimits;

const HASH: &str = "$2b$04$fixturehash";

#[fixture]
fn store() -> MemoryStore {
    MemoryStore::default()
}

fn seed_user(store: &MemoryStore, user: &User) {
    System::new().block_on(async {
        UserRepository::insert(store, user, HASH)
            .await
            .expect("insert user");
    });
}

fn scope_for(user: &User) -> ScopedSaleFilter {
    let caller = Caller::new(user.id, user.role);
    ScopedSaleFilter::for_caller(&caller, SaleFilter::default()).expect("valid filter")
}

#[rstest]
fn duplicate_email_is_rejected(store: MemoryStore) {
    let first = advisor_user("Ana");
    let mut second = advisor_user("Ana");
    second.id = UserId::random();
    seed_user(&store, &first);

    let err = System::new()
        .block_on(UserRepository::insert(&store, &second, HASH))
        .expect_err("duplicate email");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
fn unknown_role_is_rejected() {
    let store = MemoryStore::new(Catalog {
        roles: vec![Role::Admin.into()],
        ..Catalog::seeded()
    });
    let err = System::new()
        .block_on(UserRepository::insert(&store, &advisor_user("Bea"), HASH))
        .expect_err("advisor role missing");
    assert!(matches!(
        err,
        UserPersistenceError::UnknownRole { role_id: 2 }
    ));
}

#[rstest]
fn sale_with_unknown_creator_is_a_missing_reference(store: MemoryStore) {
    let ghost = advisor_user("Ghost");
    let record = sale(card_fields(dec!(100)), ghost.id, at(2024, 3, 1, 9));
    let err = System::new()
        .block_on(SaleRepository::insert(&store, &record))
        .expect_err("creator missing");
    assert!(matches!(err, SalePersistenceError::MissingReference { .. }));
}

#[rstest]
fn sale_with_unknown_franchise_is_a_missing_reference(store: MemoryStore) {
    let owner = advisor_user("Ana");
    seed_user(&store, &owner);
    let mut fields = card_fields(dec!(100));
    fields.franchise_id = Some(FranchiseId(99));
    let record = sale(fields, owner.id, at(2024, 3, 1, 9));
    let err = System::new()
        .block_on(SaleRepository::insert(&store, &record))
        .expect_err("franchise missing");
    assert!(matches!(err, SalePersistenceError::MissingReference { .. }));
}

#[rstest]
fn views_resolve_names_and_order_newest_first(store: MemoryStore) {
    let owner = advisor_user("Ana Lopez");
    seed_user(&store, &owner);
    let older = sale(card_fields(dec!(100)), owner.id, at(2024, 3, 1, 9));
    let newer = sale(
        credit_fields(dec!(2500.50), dec!(12.5)),
        owner.id,
        at(2024, 3, 2, 9),
    );

    let views = System::new().block_on(async {
        SaleRepository::insert(&store, &older).await.expect("older");
        SaleRepository::insert(&store, &newer).await.expect("newer");
        store.load_scoped(&scope_for(&owner)).await.expect("load")
    });

    let ids: Vec<_> = views.iter().map(|view| view.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert_eq!(views[0].product_name, "Consumer Credit");
    assert_eq!(views[1].franchise_name.as_deref(), Some("VISA"));
    assert!(views.iter().all(|view| view.creator_name == "Ana Lopez"));
}

#[rstest]
fn advisor_scope_hides_other_advisors_sales(store: MemoryStore) {
    let ana = advisor_user("Ana");
    let ben = advisor_user("Ben");
    let admin = admin_user("Root");
    for user in [&ana, &ben, &admin] {
        seed_user(&store, user);
    }
    let limits = PageLimits::default();
    let page = limits.resolve(None, None).expect("default page");

    let (for_ana, for_admin) = System::new().block_on(async {
        for owner in [&ana, &ben, &ben] {
            let record = sale(card_fields(dec!(10)), owner.id, at(2024, 3, 1, 9));
            SaleRepository::insert(&store, &record).await.expect("insert");
        }
        let for_ana = SaleRepository::list(&store, &scope_for(&ana), page)
            .await
            .expect("ana list");
        let for_admin = SaleRepository::list(&store, &scope_for(&admin), page)
            .await
            .expect("admin list");
        (for_ana, for_admin)
    });

    assert_eq!(for_ana.pagination.total, 1);
    assert!(for_ana.items.iter().all(|view| view.creator_user_id == ana.id));
    assert_eq!(for_admin.pagination.total, 3);
}

#[rstest]
fn list_pages_through_the_scoped_set(store: MemoryStore) {
    let owner = advisor_user("Ana");
    seed_user(&store, &owner);
    let page = PageLimits::default()
        .resolve(Some(2), Some(2))
        .expect("page two");

    let listed = System::new().block_on(async {
        for day in 1..=5 {
            let record = sale(card_fields(dec!(10)), owner.id, at(2024, 3, day, 9));
            SaleRepository::insert(&store, &record).await.expect("insert");
        }
        SaleRepository::list(&store, &scope_for(&owner), page)
            .await
            .expect("list")
    });

    assert_eq!(listed.pagination.total, 5);
    assert_eq!(listed.items.len(), 2);
    assert_eq!(listed.items[0].created_at, at(2024, 3, 3, 9));
}

#[rstest]
fn user_with_sales_cannot_be_deleted(store: MemoryStore) {
    let owner = advisor_user("Ana");
    seed_user(&store, &owner);
    let record = sale(card_fields(dec!(10)), owner.id, at(2024, 3, 1, 9));

    let err = System::new().block_on(async {
        SaleRepository::insert(&store, &record).await.expect("insert");
        UserRepository::delete(&store, &owner.id)
            .await
            .expect_err("still referenced")
    });
    assert!(matches!(err, UserPersistenceError::InUse { .. }));
}

#[rstest]
fn update_reports_missing_rows(store: MemoryStore) {
    let owner = advisor_user("Ana");
    let record = sale(card_fields(dec!(10)), owner.id, at(2024, 3, 1, 9));
    let (sale_updated, user_updated) = System::new().block_on(async {
        (
            SaleRepository::update(&store, &record).await.expect("sale"),
            UserRepository::update(&store, &owner).await.expect("user"),
        )
    });
    assert!(!sale_updated);
    assert!(!user_updated);
}

#[rstest]
fn update_replaces_status_and_fields(store: MemoryStore) {
    let owner = advisor_user("Ana");
    seed_user(&store, &owner);
    let mut record = sale(card_fields(dec!(10)), owner.id, at(2024, 3, 1, 9));

    let stored = System::new().block_on(async {
        SaleRepository::insert(&store, &record).await.expect("insert");
        record.status = SaleStatus::Finished;
        record.fields = credit_fields(dec!(99.99), dec!(0));
        assert!(SaleRepository::update(&store, &record).await.expect("update"));
        store.find_view(&record.id).await.expect("find")
    });

    let view = stored.expect("sale present");
    assert_eq!(view.status, SaleStatus::Finished);
    assert_eq!(view.product_id, ProductId(1));
    assert_eq!(view.franchise_id, None);
}

#[rstest]
fn credentials_are_found_by_normalised_email(store: MemoryStore) {
    let owner = advisor_user("Ana");
    seed_user(&store, &owner);
    let lookup = Email::new("  ANA@Bank.Example ").expect("valid email");

    let found = System::new()
        .block_on(store.find_credentials_by_email(&lookup))
        .expect("lookup");
    let stored = found.expect("user present");
    assert_eq!(stored.user.id, owner.id);
    assert_eq!(stored.password_hash, HASH);
}

#[rstest]
fn users_list_orders_by_name(store: MemoryStore) {
    for name in ["Zoe", "Ana", "Mia"] {
        seed_user(&store, &advisor_user(name));
    }
    let page = PageLimits::default().resolve(None, None).expect("page");
    let listed = System::new()
        .block_on(UserRepository::list(&store, page))
        .expect("list");
    let names: Vec<_> = listed
        .items
        .iter()
        .map(|user| user.name.to_string())
        .collect();
    assert_eq!(names, vec!["Ana", "Mia", "Zoe"]);
}
