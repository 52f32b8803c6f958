//! Properties shared by every paged finder

use proptest::prelude::*;

use core_kernel::{PageRequest, StatusFilter};
use domain_care::{Client, ClientRepository, MemoryStore};
use test_utils::{clients_strategy, ids, page_request_strategy, status_filter_strategy, term_strategy};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("test runtime")
        .block_on(future)
}

proptest! {
    #[test]
    fn count_matches_unpaged_list(
        rows in clients_strategy(30),
        name in term_strategy(),
        status in status_filter_strategy(),
    ) {
        let repo = ClientRepository::new(MemoryStore::with_rows(rows));
        let (page, count) = block_on(async {
            let page = repo
                .search_by_name_or_house_code(&name, "H2", status, &PageRequest::unpaged())
                .await
                .unwrap();
            let count = repo.count_by_name_or_house_code(&name, "H2", status).await.unwrap();
            (page, count)
        });
        prop_assert_eq!(page.len() as u64, count);
        prop_assert_eq!(page.total, count);
    }

    #[test]
    fn a_page_is_a_slice_of_the_full_result(
        rows in clients_strategy(30),
        request in page_request_strategy(),
    ) {
        let repo = ClientRepository::new(MemoryStore::<Client>::with_rows(rows));
        let (page, everything) = block_on(async {
            let page = repo
                .search_by_name_or_house_code("", "", StatusFilter::Any, &request)
                .await
                .unwrap();
            let mut unpaged = PageRequest::unpaged();
            unpaged.sort = request.sort.clone();
            let everything = repo
                .search_by_name_or_house_code("", "", StatusFilter::Any, &unpaged)
                .await
                .unwrap();
            (page, everything)
        });

        let size = request.size.unwrap_or(u32::MAX) as usize;
        let skip = request.offset() as usize;
        let expected: Vec<i64> = ids(&everything.items).into_iter().skip(skip).take(size).collect();
        prop_assert_eq!(ids(&page.items), expected);
        prop_assert_eq!(page.total, everything.total);
    }
}
