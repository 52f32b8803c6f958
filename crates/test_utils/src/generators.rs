//! Property-Based Test Generators
//!
//! Proptest strategies producing record sets with unique, increasing ids.
//! Names and codes are drawn from small alphabets so that searches in a
//! property test actually hit some rows.

use chrono::NaiveDate;
use proptest::prelude::*;

use core_kernel::{ClientId, HouseId, PageRequest, RecordStatus, StatusFilter};
use domain_care::Client;

use crate::fixtures::TemporalFixtures;

pub fn record_status_strategy() -> impl Strategy<Value = RecordStatus> {
    prop_oneof![
        3 => Just(RecordStatus::Active),
        1 => Just(RecordStatus::Deleted),
    ]
}

pub fn status_filter_strategy() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::Active),
        Just(StatusFilter::Deleted),
        Just(StatusFilter::Any),
    ]
}

/// Short lowercase fragments used both as names and as search terms
pub fn term_strategy() -> impl Strategy<Value = String> {
    "[abjo]{0,3}"
}

pub fn house_code_strategy() -> impl Strategy<Value = String> {
    (1u8..=4).prop_map(|n| format!("H{}", n))
}

pub fn birth_date_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
    proptest::option::of((0u32..20_000).prop_map(|days| {
        TemporalFixtures::day(1950, 1, 1) + chrono::Duration::days(i64::from(days))
    }))
}

/// A page request with a size, and sometimes a sort on the client name
pub fn page_request_strategy() -> impl Strategy<Value = PageRequest> {
    (1u32..6, 1u32..8, any::<bool>()).prop_map(|(page, size, sorted)| {
        let request = PageRequest::new(page, size);
        if sorted {
            request.sorted_by(core_kernel::Sort::desc("name"))
        } else {
            request
        }
    })
}

/// Up to `max` clients with ids `1..=n`
pub fn clients_strategy(max: usize) -> impl Strategy<Value = Vec<Client>> {
    prop::collection::vec(
        (
            "[A-Z][abjo]{1,5}",
            house_code_strategy(),
            birth_date_strategy(),
            record_status_strategy(),
        ),
        0..=max,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, house_code, date_of_birth, status))| {
                let id = i as i64 + 1;
                let house = house_code[1..].parse::<i64>().unwrap_or(1);
                Client {
                    id: ClientId::new(id),
                    name,
                    house_id: HouseId::new(house),
                    house_code,
                    date_of_birth,
                    ndis_number: Some(format!("43{:07}", id)),
                    status,
                    created_at: TemporalFixtures::created(),
                }
            })
            .collect()
    })
}
