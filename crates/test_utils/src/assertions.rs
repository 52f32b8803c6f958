//! Custom Test Assertions
//!
//! Assertions over pages and lifecycle status that report the ids involved
//! instead of dumping whole records.

use std::fmt::Debug;

use core_kernel::{Page, Record, RecordStatus};

/// Ids of the records, in order
pub fn ids<R: Record>(records: &[R]) -> Vec<i64> {
    records.iter().map(Record::id).collect()
}

/// Asserts a page holds exactly `expected` ids, in order
pub fn assert_page_ids<R: Record>(page: &Page<R>, expected: &[i64]) {
    assert_eq!(
        ids(&page.items),
        expected,
        "page {} (size {:?}, total {}) returned unexpected rows",
        page.page,
        page.size,
        page.total
    );
}

/// Asserts the page's total agrees with an independent count
pub fn assert_total<R: Record>(page: &Page<R>, count: u64) {
    assert_eq!(
        page.total, count,
        "page total {} disagrees with count {}",
        page.total, count
    );
}

/// Asserts every record is in the given lifecycle status
pub fn assert_all_in_status<R: Record + Debug>(records: &[R], status: RecordStatus) {
    for record in records {
        assert_eq!(
            record.status(),
            status,
            "{} {} is {}, expected {}",
            R::ENTITY,
            record.id(),
            record.status(),
            status
        );
    }
}

/// Asserts ids are strictly increasing, i.e. insertion order
pub fn assert_insertion_order<R: Record>(records: &[R]) {
    let ids = ids(records);
    assert!(
        ids.windows(2).all(|w| w[0] < w[1]),
        "expected insertion order, got {:?}",
        ids
    );
}
