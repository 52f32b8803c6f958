//! Finder behaviour against PostgreSQL
//!
//! These tests start a container and need Docker:
//!
//! ```bash
//! cargo test -p infra_db -- --ignored
//! ```

use core_kernel::{ClientId, DateRange, HouseId, PageRequest, Sort, StatusFilter};
use domain_care::{
    ClientRepository, HouseRepository, MealRecordRepository, MealType, NdisPlanRepository,
    NoteRepository, NoticeRepository, NoticeState, RepositoryError, UserRepository,
};
use infra_db::PgRecordStore;
use rust_decimal_macros::dec;
use test_utils::{
    assert_page_ids, create_isolated_test_database, insert_client, insert_house,
    insert_meal_record, insert_ndis_plan, insert_note, insert_notice, insert_user,
    TemporalFixtures as T, TestClientBuilder, TestDatabase, TestHouseBuilder,
    TestMealRecordBuilder, TestNdisPlanBuilder, TestNoteBuilder, TestNoticeBuilder,
    TestUserBuilder,
};

async fn database() -> TestDatabase {
    create_isolated_test_database()
        .await
        .expect("Failed to create test database")
}

#[tokio::test]
#[ignore = "requires docker"]
async fn or_search_keeps_its_parentheses() {
    let db = database().await;
    let pool = db.pool();
    for client in [
        TestClientBuilder::new(1).with_name("John Smith").in_house(1, "H1").build(),
        TestClientBuilder::new(2).with_name("Mary Jones").in_house(2, "H2").build(),
        TestClientBuilder::new(3).with_name("Peter Brown").in_house(3, "H3").build(),
        TestClientBuilder::new(4).with_name("Johnny Cash").in_house(3, "H3").deleted().build(),
    ] {
        insert_client(pool, &client).await.unwrap();
    }

    let clients = ClientRepository::new(PgRecordStore::new(pool.clone()));
    let page = clients
        .search_by_name_or_house_code("JOHN", "h2", StatusFilter::Active, &PageRequest::new(1, 20))
        .await
        .unwrap();
    assert_page_ids(&page, &[1, 2]);

    let count = clients
        .count_by_name_or_house_code("JOHN", "h2", StatusFilter::Active)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn like_wildcards_in_terms_match_literally() {
    let db = database().await;
    let pool = db.pool();
    insert_house(pool, &TestHouseBuilder::new(1).with_name("100% Care").build()).await.unwrap();
    insert_house(pool, &TestHouseBuilder::new(2).with_name("1000 Oaks").build()).await.unwrap();

    let houses = HouseRepository::new(PgRecordStore::new(pool.clone()));
    let page = houses
        .search("100%", StatusFilter::Active, &PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_page_ids(&page, &[1]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn pages_and_sorting_match_the_memory_store() {
    let db = database().await;
    let pool = db.pool();
    for id in 1..=25 {
        insert_house(pool, &TestHouseBuilder::new(id).build()).await.unwrap();
    }
    let houses = HouseRepository::new(PgRecordStore::new(pool.clone()));

    let second = houses
        .list(StatusFilter::Active, &PageRequest::new(2, 10))
        .await
        .unwrap();
    assert_page_ids(&second, &(11..=20).collect::<Vec<_>>());
    assert_eq!(second.total, 25);

    let beyond = houses
        .list(StatusFilter::Active, &PageRequest::new(4, 10))
        .await
        .unwrap();
    assert!(beyond.is_empty());
    assert_eq!(beyond.total, 25);

    let by_code = houses
        .list(
            StatusFilter::Active,
            &PageRequest::new(1, 3).sorted_by(Sort::desc("house_code")),
        )
        .await
        .unwrap();
    // text ordering: H9 > H8 > H7 > H25 ...
    assert_page_ids(&by_code, &[9, 8, 7]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn notice_board_window_and_membership() {
    let db = database().await;
    let pool = db.pool();
    for house in [TestHouseBuilder::new(1).build(), TestHouseBuilder::new(2).build()] {
        insert_house(pool, &house).await.unwrap();
    }
    for notice in [
        TestNoticeBuilder::new(1).posted_to(&[1, 2]).ending(Some(T::at(2024, 12, 31))).build(),
        TestNoticeBuilder::new(2).posted_to(&[1]).ending(Some(T::at(2024, 1, 1))).build(),
        TestNoticeBuilder::new(3).posted_to(&[1]).starting(Some(T::at(2024, 7, 1))).build(),
        TestNoticeBuilder::new(4).posted_to(&[2]).build(),
    ] {
        insert_notice(pool, &notice).await.unwrap();
    }

    let notices = NoticeRepository::new(PgRecordStore::new(pool.clone()));
    let page = notices
        .find_active_for_house(
            NoticeState::Active,
            HouseId::new(1),
            T::now(),
            StatusFilter::Active,
            &PageRequest::new(1, 10),
        )
        .await
        .unwrap();
    assert_page_ids(&page, &[1]);
    assert_eq!(page.items[0].house_ids, vec![HouseId::new(1), HouseId::new(2)]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn inclusive_date_range() {
    let db = database().await;
    let pool = db.pool();
    for (id, date) in [
        (1, T::day(2023, 12, 31)),
        (2, T::day(2024, 1, 1)),
        (3, T::day(2024, 1, 31)),
        (4, T::day(2024, 2, 1)),
    ] {
        insert_note(pool, &TestNoteBuilder::new(id).on(date).build()).await.unwrap();
    }

    let notes = NoteRepository::new(PgRecordStore::new(pool.clone()));
    let january = DateRange::new(T::day(2024, 1, 1), T::day(2024, 1, 31)).unwrap();
    let page = notes
        .list_for_client_between(ClientId::new(1), january, StatusFilter::Active, &PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_page_ids(&page, &[2, 3]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn exact_matches_report_ambiguity() {
    let db = database().await;
    let pool = db.pool();
    let date = T::day(2024, 5, 2);
    for id in 1..=2 {
        let meal = TestMealRecordBuilder::new(id).meal(MealType::Breakfast, date).build();
        insert_meal_record(pool, &meal).await.unwrap();
    }
    insert_user(pool, &TestUserBuilder::new(1).with_email("Alex@Care.example").build())
        .await
        .unwrap();

    let meals = MealRecordRepository::new(PgRecordStore::new(pool.clone()));
    let err = meals
        .find_by_client_meal_and_date(ClientId::new(1), MealType::Breakfast, date, StatusFilter::Active)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::AmbiguousResult { matches: 2, .. }));

    let users = UserRepository::new(PgRecordStore::new(pool.clone()));
    let user = users.find_by_email("alex@care.EXAMPLE", StatusFilter::Active).await.unwrap();
    assert!(user.is_some());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn plan_budgets_round_trip_as_decimals() {
    let db = database().await;
    let pool = db.pool();
    let plan = TestNdisPlanBuilder::new(1).with_budget(dec!(123456.78)).build();
    insert_ndis_plan(pool, &plan).await.unwrap();

    let plans = NdisPlanRepository::new(PgRecordStore::new(pool.clone()));
    let current = plans
        .find_current_for_client(ClientId::new(1), T::today(), StatusFilter::Active)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current, plan);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn closed_pool_is_unavailable() {
    let db = database().await;
    insert_house(db.pool(), &TestHouseBuilder::new(1).build()).await.unwrap();
    let houses = HouseRepository::new(PgRecordStore::new(db.pool().clone()));
    db.pool().close().await;

    let err = houses.count(StatusFilter::Active).await.unwrap_err();
    assert!(err.is_transient());
}
