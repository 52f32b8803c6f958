//! Finder behaviour over the in-memory store

use std::sync::Arc;

use chrono::Duration;
use core_kernel::{
    ClientId, DateRange, HouseId, PageRequest, RecordStatus, Sort, StatusFilter, UserId,
};
use domain_care::{
    ClientRepository, ContactRepository, DocumentCategory, DocumentRepository, HouseRepository,
    IncidentRepository, IncidentState, MealRecordRepository, MealType, MemoryStore,
    NdisPlanRepository, NoteRepository, NoticeRepository, NoticeState, RepositoryError,
    UserRepository, UserRole,
};
use test_utils::{
    assert_all_in_status, assert_insertion_order, assert_page_ids, assert_total, ids,
    TemporalFixtures as T, TestClientBuilder, TestContactBuilder, TestDocumentBuilder,
    TestHouseBuilder, TestIncidentBuilder, TestMealRecordBuilder, TestNdisPlanBuilder,
    TestNoteBuilder, TestNoticeBuilder, TestUserBuilder,
};

mod clients {
    use super::*;

    fn repository() -> ClientRepository<MemoryStore<domain_care::Client>> {
        ClientRepository::new(MemoryStore::with_rows(vec![
            TestClientBuilder::new(1).with_name("John Smith").in_house(1, "H1").build(),
            TestClientBuilder::new(2).with_name("Mary Jones").in_house(2, "H2").build(),
            TestClientBuilder::new(3).with_name("Peter Brown").in_house(3, "H3").build(),
            TestClientBuilder::new(4).with_name("Johnny Cash").in_house(3, "H3").deleted().build(),
        ]))
    }

    #[tokio::test]
    async fn name_matches_even_when_house_code_does_not() {
        let clients = repository();
        let page = clients
            .search_by_name_or_house_code("john", "H2", StatusFilter::Active, &PageRequest::new(1, 20))
            .await
            .unwrap();

        // John by name, Mary by house; the deleted Johnny is filtered out
        assert_page_ids(&page, &[1, 2]);
        assert_total(&page, 2);
    }

    #[tokio::test]
    async fn status_clause_applies_to_both_alternatives() {
        let clients = repository();
        let deleted = clients
            .search_by_name_or_house_code("john", "H2", StatusFilter::Deleted, &PageRequest::new(1, 20))
            .await
            .unwrap();
        assert_page_ids(&deleted, &[4]);

        let count = clients
            .count_by_name_or_house_code("john", "H2", StatusFilter::Any)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn count_agrees_with_the_list() {
        let clients = repository();
        for status in [StatusFilter::Active, StatusFilter::Deleted, StatusFilter::Any] {
            let page = clients
                .search_by_name_or_house_code("o", "H3", status, &PageRequest::unpaged())
                .await
                .unwrap();
            let count = clients
                .count_by_name_or_house_code("o", "H3", status)
                .await
                .unwrap();
            assert_eq!(page.len() as u64, count);
            assert_total(&page, count);
        }
    }

    #[tokio::test]
    async fn lookup_by_ndis_number_is_exact() {
        let clients = repository();
        let found = clients
            .find_by_ndis_number("430000002", StatusFilter::Active)
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id), Some(ClientId::new(2)));

        let missing = clients
            .find_by_ndis_number("43000000", StatusFilter::Active)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn deleted_clients_are_found_only_when_asked_for() {
        let clients = repository();
        let id = ClientId::new(4);
        assert!(clients.find_by_id(id, StatusFilter::Active).await.unwrap().is_none());

        let deleted = clients.find_by_id(id, StatusFilter::Deleted).await.unwrap().unwrap();
        assert_eq!(deleted.status, RecordStatus::Deleted);
    }

    #[tokio::test]
    async fn house_listing_and_count() {
        let clients = repository();
        let page = clients
            .list_by_house(HouseId::new(3), StatusFilter::Any, &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_page_ids(&page, &[3, 4]);
        assert_eq!(
            clients.count_by_house(HouseId::new(3), StatusFilter::Active).await.unwrap(),
            1
        );
        assert_eq!(clients.count(StatusFilter::Active).await.unwrap(), 3);
    }
}

mod pagination {
    use super::*;

    fn houses(n: i64) -> HouseRepository<MemoryStore<domain_care::House>> {
        HouseRepository::new(MemoryStore::with_rows(
            (1..=n).map(|id| TestHouseBuilder::new(id).build()).collect(),
        ))
    }

    #[tokio::test]
    async fn second_page_holds_items_eleven_to_twenty() {
        let page = houses(25)
            .list(StatusFilter::Active, &PageRequest::new(2, 10))
            .await
            .unwrap();

        assert_eq!(ids(&page.items), (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_a_total() {
        let page = houses(25)
            .list(StatusFilter::Active, &PageRequest::new(4, 10))
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 25);
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn default_order_is_insertion_order() {
        let page = houses(5)
            .list(StatusFilter::Active, &PageRequest::unpaged())
            .await
            .unwrap();
        assert_insertion_order(&page.items);
    }

    #[tokio::test]
    async fn sorting_by_a_whitelisted_field() {
        let repo = HouseRepository::new(MemoryStore::with_rows(vec![
            TestHouseBuilder::new(1).with_name("Banksia").build(),
            TestHouseBuilder::new(2).with_name("Acacia").build(),
            TestHouseBuilder::new(3).with_name("Callistemon").build(),
        ]));
        let request = PageRequest::new(1, 10).sorted_by(Sort::asc("NAME"));
        let page = repo.list(StatusFilter::Active, &request).await.unwrap();
        assert_page_ids(&page, &[2, 1, 3]);
    }

    #[tokio::test]
    async fn invalid_requests_never_reach_the_store() {
        let store = Arc::new(MemoryStore::with_rows(vec![TestHouseBuilder::new(1).build()]));
        let repo = HouseRepository::new(Arc::clone(&store));

        let zero = PageRequest::new(0, 10);
        let err = repo.list(StatusFilter::Active, &zero).await.unwrap_err();
        assert!(err.is_validation());

        let oversized = PageRequest::new(1, 501);
        assert!(repo.list(StatusFilter::Active, &oversized).await.unwrap_err().is_validation());

        let unknown_sort = PageRequest::new(1, 10).sorted_by(Sort::desc("address"));
        assert!(repo.list(StatusFilter::Active, &unknown_sort).await.unwrap_err().is_validation());

        let long_term = "x".repeat(101);
        assert!(repo
            .search(&long_term, StatusFilter::Active, &PageRequest::new(1, 10))
            .await
            .unwrap_err()
            .is_validation());

        assert_eq!(store.calls(), 0);
    }
}

mod soft_delete {
    use super::*;

    #[tokio::test]
    async fn status_filters_partition_the_rows() {
        let repo = NoteRepository::new(MemoryStore::with_rows(vec![
            TestNoteBuilder::new(1).build(),
            TestNoteBuilder::new(2).deleted().build(),
            TestNoteBuilder::new(3).build(),
            TestNoteBuilder::new(4).deleted().build(),
        ]));
        let client = ClientId::new(1);
        let all = PageRequest::unpaged();

        let active = repo.list_for_client(client, StatusFilter::Active, &all).await.unwrap();
        let deleted = repo.list_for_client(client, StatusFilter::Deleted, &all).await.unwrap();
        let any = repo.list_for_client(client, StatusFilter::Any, &all).await.unwrap();

        assert_page_ids(&active, &[1, 3]);
        assert_all_in_status(&active.items, RecordStatus::Active);
        assert_page_ids(&deleted, &[2, 4]);
        assert_all_in_status(&deleted.items, RecordStatus::Deleted);
        assert_eq!(any.total, active.total + deleted.total);
    }
}

mod ranges {
    use super::*;

    #[tokio::test]
    async fn note_range_includes_both_ends() {
        let repo = NoteRepository::new(MemoryStore::with_rows(vec![
            TestNoteBuilder::new(1).on(T::day(2023, 12, 31)).build(),
            TestNoteBuilder::new(2).on(T::day(2024, 1, 1)).build(),
            TestNoteBuilder::new(3).on(T::day(2024, 1, 15)).build(),
            TestNoteBuilder::new(4).on(T::day(2024, 1, 31)).build(),
            TestNoteBuilder::new(5).on(T::day(2024, 2, 1)).build(),
        ]));
        let january = DateRange::new(T::day(2024, 1, 1), T::day(2024, 1, 31)).unwrap();

        let page = repo
            .list_for_client_between(ClientId::new(1), january, StatusFilter::Active, &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_page_ids(&page, &[2, 3, 4]);

        let single = DateRange::single(T::day(2024, 1, 15));
        assert_eq!(
            repo.count_for_client_between(ClientId::new(1), single, StatusFilter::Active)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn incident_range_is_scoped_to_the_house() {
        let start = T::at(2024, 3, 1);
        let end = T::at(2024, 3, 31);
        let repo = IncidentRepository::new(MemoryStore::with_rows(vec![
            TestIncidentBuilder::new(1).in_house("H1").occurred_at(start).build(),
            TestIncidentBuilder::new(2).in_house("H1").occurred_at(end).build(),
            TestIncidentBuilder::new(3).in_house("H1").occurred_at(end + Duration::seconds(1)).build(),
            TestIncidentBuilder::new(4).in_house("H2").occurred_at(start).build(),
        ]));
        let march = DateRange::new(start, end).unwrap();

        let page = repo
            .list_for_house_between("H1", march, StatusFilter::Active, &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_page_ids(&page, &[1, 2]);
        assert_eq!(
            repo.count_for_house_between("H1", march, StatusFilter::Active).await.unwrap(),
            2
        );
    }

    #[test]
    fn inverted_range_is_rejected_before_querying() {
        let err: RepositoryError = DateRange::new(T::day(2024, 2, 1), T::day(2024, 1, 1))
            .unwrap_err()
            .into();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn documents_without_expiry_never_expire_in_range() {
        let repo = DocumentRepository::new(MemoryStore::with_rows(vec![
            TestDocumentBuilder::new(1).expiring(T::day(2024, 6, 30)).build(),
            TestDocumentBuilder::new(2).build(),
            TestDocumentBuilder::new(3).expiring(T::day(2024, 8, 1)).build(),
        ]));
        let range = DateRange::new(T::day(2024, 6, 1), T::day(2024, 6, 30)).unwrap();
        let page = repo
            .list_expiring_between(range, StatusFilter::Active, &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_page_ids(&page, &[1]);
    }
}

mod notices {
    use super::*;

    fn board() -> NoticeRepository<MemoryStore<domain_care::Notice>> {
        NoticeRepository::new(MemoryStore::with_rows(vec![
            // no start, ends at year end: showing
            TestNoticeBuilder::new(1)
                .posted_to(&[1, 2])
                .ending(Some(T::at(2024, 12, 31)))
                .build(),
            // ended on new year's day
            TestNoticeBuilder::new(2)
                .posted_to(&[1])
                .ending(Some(T::at(2024, 1, 1)))
                .build(),
            // not yet started
            TestNoticeBuilder::new(3)
                .posted_to(&[1])
                .starting(Some(T::at(2024, 7, 1)))
                .build(),
            // another house only
            TestNoticeBuilder::new(4).posted_to(&[2]).build(),
            // still a draft
            TestNoticeBuilder::new(5)
                .posted_to(&[1])
                .with_state(NoticeState::Draft)
                .build(),
            // started exactly now, open ended
            TestNoticeBuilder::new(6)
                .posted_to(&[1])
                .starting(Some(T::now()))
                .build(),
            // ends exactly now
            TestNoticeBuilder::new(7)
                .posted_to(&[1])
                .ending(Some(T::now()))
                .build(),
            TestNoticeBuilder::new(8).posted_to(&[1]).deleted().build(),
        ]))
    }

    #[tokio::test]
    async fn house_board_shows_notices_inside_their_window() {
        let notices = board();
        let page = notices
            .find_active_for_house(
                NoticeState::Active,
                HouseId::new(1),
                T::now(),
                StatusFilter::Active,
                &PageRequest::new(1, 20),
            )
            .await
            .unwrap();

        assert_page_ids(&page, &[1, 6]);
        assert_eq!(
            notices
                .count_active_for_house(NoticeState::Active, HouseId::new(1), T::now(), StatusFilter::Active)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn state_listing_ignores_windows() {
        let page = board()
            .list_by_state(NoticeState::Draft, StatusFilter::Active, &PageRequest::new(1, 20))
            .await
            .unwrap();
        assert_page_ids(&page, &[5]);
    }
}

mod exact_match {
    use super::*;

    #[tokio::test]
    async fn duplicate_meal_is_ambiguous() {
        let date = T::day(2024, 5, 2);
        let repo = MealRecordRepository::new(MemoryStore::with_rows(vec![
            TestMealRecordBuilder::new(1).meal(MealType::Lunch, date).build(),
            TestMealRecordBuilder::new(2).meal(MealType::Lunch, date).build(),
            TestMealRecordBuilder::new(3).meal(MealType::Lunch, date).build(),
            TestMealRecordBuilder::new(4).meal(MealType::Dinner, date).build(),
        ]));

        let err = repo
            .find_by_client_meal_and_date(ClientId::new(1), MealType::Lunch, date, StatusFilter::Active)
            .await
            .unwrap_err();
        match err {
            RepositoryError::AmbiguousResult { entity, matches } => {
                assert_eq!(entity, "MealRecord");
                assert_eq!(matches, 3);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }

        let dinner = repo
            .find_by_client_meal_and_date(ClientId::new(1), MealType::Dinner, date, StatusFilter::Active)
            .await
            .unwrap();
        assert_eq!(dinner.map(|m| m.id.value()), Some(4));
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let repo = UserRepository::new(MemoryStore::with_rows(vec![
            TestUserBuilder::new(1).with_email("Alex.Ng@care.example").build(),
            TestUserBuilder::new(2).with_email("sam@care.example").deleted().build(),
        ]));

        let found = repo.find_by_email("alex.ng@CARE.example", StatusFilter::Active).await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(UserId::new(1)));

        let hidden = repo.find_by_email("sam@care.example", StatusFilter::Active).await.unwrap();
        assert!(hidden.is_none());

        let blank = repo.find_by_email("  ", StatusFilter::Active).await.unwrap_err();
        assert!(blank.is_validation());
    }

    #[tokio::test]
    async fn overlapping_plans_are_reported() {
        let repo = NdisPlanRepository::new(MemoryStore::with_rows(vec![
            TestNdisPlanBuilder::new(1).running(T::day(2023, 1, 1), T::day(2024, 1, 1)).build(),
            TestNdisPlanBuilder::new(2).running(T::day(2024, 1, 1), T::day(2025, 1, 1)).build(),
            TestNdisPlanBuilder::new(3).running(T::day(2024, 5, 1), T::day(2024, 8, 1)).build(),
        ]));
        let client = ClientId::new(1);

        // the end date is exclusive, so new year's day belongs to plan 2 only
        let current = repo
            .find_current_for_client(client, T::day(2024, 1, 1), StatusFilter::Active)
            .await
            .unwrap();
        assert_eq!(current.map(|p| p.id.value()), Some(2));

        let err = repo
            .find_current_for_client(client, T::today(), StatusFilter::Active)
            .await
            .unwrap_err();
        assert!(err.is_ambiguous());
    }
}

mod misc {
    use super::*;

    #[tokio::test]
    async fn users_by_name_house_and_role() {
        let repo = UserRepository::new(MemoryStore::with_rows(vec![
            TestUserBuilder::new(1).named("Ava", "Stone").in_house(1, "H1").build(),
            TestUserBuilder::new(2).named("Ben", "Avery").in_house(2, "H2").build(),
            TestUserBuilder::new(3)
                .named("Cleo", "Marsh")
                .unassigned()
                .with_role(UserRole::Manager)
                .build(),
        ]));

        let page = repo
            .search_by_name_or_house_code("av", "H9", StatusFilter::Active, &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_page_ids(&page, &[1, 2]);

        let by_house = repo
            .list_by_house(HouseId::new(2), StatusFilter::Active, &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_page_ids(&by_house, &[2]);

        assert_eq!(repo.count_by_role(UserRole::Manager, StatusFilter::Active).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn incidents_by_state() {
        let repo = IncidentRepository::new(MemoryStore::with_rows(vec![
            TestIncidentBuilder::new(1).with_state(IncidentState::UnderReview).build(),
            TestIncidentBuilder::new(2).build(),
            TestIncidentBuilder::new(3).with_state(IncidentState::UnderReview).deleted().build(),
        ]));
        let page = repo
            .list_by_state(IncidentState::UnderReview, StatusFilter::Active, &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_page_ids(&page, &[1]);
        assert_eq!(
            repo.count_by_state(IncidentState::UnderReview, StatusFilter::Any).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn documents_filtered_by_optional_category() {
        let repo = DocumentRepository::new(MemoryStore::with_rows(vec![
            TestDocumentBuilder::new(1).with_category(DocumentCategory::CarePlan).build(),
            TestDocumentBuilder::new(2).with_category(DocumentCategory::Medical).build(),
            TestDocumentBuilder::new(3).for_client(2).build(),
        ]));
        let client = ClientId::new(1);
        assert_eq!(repo.count_for_client(client, None, StatusFilter::Active).await.unwrap(), 2);

        let plans = repo
            .list_for_client(client, Some(DocumentCategory::CarePlan), StatusFilter::Active, &PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_page_ids(&plans, &[1]);
    }

    #[tokio::test]
    async fn emergency_contacts_are_unpaged() {
        let repo = ContactRepository::new(MemoryStore::with_rows(
            (1..=30)
                .map(|id| {
                    let builder = TestContactBuilder::new(id);
                    let builder = if id % 2 == 0 { builder.emergency() } else { builder };
                    builder.build()
                })
                .collect(),
        ));
        let contacts = repo
            .list_emergency_for_client(ClientId::new(1), StatusFilter::Active)
            .await
            .unwrap();
        assert_eq!(contacts.len(), 15);
        assert_insertion_order(&contacts);
        assert_eq!(repo.count_for_client(ClientId::new(1), StatusFilter::Active).await.unwrap(), 30);
    }
}

mod count_twins {
    use super::*;

    #[tokio::test]
    async fn users_per_house() {
        let repo = UserRepository::new(MemoryStore::with_rows(vec![
            TestUserBuilder::new(1).in_house(1, "H1").build(),
            TestUserBuilder::new(2).in_house(2, "H2").build(),
            TestUserBuilder::new(3).in_house(1, "H1").build(),
            TestUserBuilder::new(4).in_house(1, "H1").deleted().build(),
        ]));
        let house = HouseId::new(1);

        let all = repo
            .list_by_house(house, StatusFilter::Active, &PageRequest::unpaged())
            .await
            .unwrap();
        assert_page_ids(&all, &[1, 3]);
        assert_eq!(repo.count_by_house(house, StatusFilter::Active).await.unwrap(), 2);
        assert_eq!(repo.count_by_house(house, StatusFilter::Any).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn documents_expiring_in_range() {
        let repo = DocumentRepository::new(MemoryStore::with_rows(vec![
            TestDocumentBuilder::new(1).expiring(T::day(2024, 6, 1)).build(),
            TestDocumentBuilder::new(2).expiring(T::day(2024, 6, 30)).build(),
            TestDocumentBuilder::new(3).build(),
            TestDocumentBuilder::new(4).expiring(T::day(2024, 7, 1)).build(),
        ]));
        let range = DateRange::new(T::day(2024, 6, 1), T::day(2024, 6, 30)).unwrap();

        let all = repo
            .list_expiring_between(range, StatusFilter::Active, &PageRequest::unpaged())
            .await
            .unwrap();
        let count = repo.count_expiring_between(range, StatusFilter::Active).await.unwrap();
        assert_eq!(count, all.len() as u64);
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn plans_per_client() {
        let repo = NdisPlanRepository::new(MemoryStore::with_rows(vec![
            TestNdisPlanBuilder::new(1).running(T::day(2023, 1, 1), T::day(2024, 1, 1)).build(),
            TestNdisPlanBuilder::new(2).running(T::day(2024, 1, 1), T::day(2025, 1, 1)).build(),
            TestNdisPlanBuilder::new(3).for_client(2).build(),
        ]));
        let client = ClientId::new(1);

        let all = repo
            .list_for_client(client, StatusFilter::Active, &PageRequest::unpaged())
            .await
            .unwrap();
        assert_page_ids(&all, &[1, 2]);
        assert_eq!(repo.count_for_client(client, StatusFilter::Active).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn notices_per_state() {
        let repo = NoticeRepository::new(MemoryStore::with_rows(vec![
            TestNoticeBuilder::new(1).build(),
            TestNoticeBuilder::new(2).with_state(NoticeState::Archived).build(),
            TestNoticeBuilder::new(3).build(),
            TestNoticeBuilder::new(4).deleted().build(),
        ]));

        let all = repo
            .list_by_state(NoticeState::Active, StatusFilter::Active, &PageRequest::unpaged())
            .await
            .unwrap();
        assert_page_ids(&all, &[1, 3]);
        assert_eq!(repo.count_by_state(NoticeState::Active, StatusFilter::Active).await.unwrap(), 2);
        assert_eq!(repo.count_by_state(NoticeState::Archived, StatusFilter::Active).await.unwrap(), 1);
    }
}

mod storage_failures {
    use super::*;

    #[tokio::test]
    async fn unavailable_storage_is_reported_once() {
        let store = Arc::new(MemoryStore::with_rows(vec![TestHouseBuilder::new(1).build()]));
        let repo = HouseRepository::new(Arc::clone(&store));
        store.set_offline(true);

        let err = repo
            .list(StatusFilter::Active, &PageRequest::new(1, 10))
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(store.calls(), 1);

        store.set_offline(false);
        assert_eq!(repo.count(StatusFilter::Active).await.unwrap(), 1);
    }
}
