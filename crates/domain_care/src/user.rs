//! Users - staff accounts, optionally rostered to a house

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{HouseId, Page, PageRequest, Predicate, Record, RecordStatus, StatusFilter, UserId, Value};

use crate::criteria::{lookup_key, search_term};
use crate::error::RepositoryError;
use crate::finder;
use crate::ports::RecordStore;

pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const EMAIL: &str = "email";
pub const ROLE: &str = "role";
pub const HOUSE_ID: &str = "house_id";
pub const HOUSE_CODE: &str = "house_code";
pub const CREATED_AT: &str = "created_at";

text_enum! {
    /// Access role of a staff account
    UserRole, "user role" {
        Admin => "admin",
        Manager => "manager",
        SupportWorker => "support_worker",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub house_id: Option<HouseId>,
    pub house_code: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Record for User {
    const ENTITY: &'static str = "User";
    const SORTABLE: &'static [&'static str] = &[FIRST_NAME, LAST_NAME, EMAIL, CREATED_AT];

    fn id(&self) -> i64 {
        self.id.value()
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn field(&self, column: &str) -> Value {
        match column {
            FIRST_NAME => self.first_name.clone().into(),
            LAST_NAME => self.last_name.clone().into(),
            EMAIL => self.email.clone().into(),
            ROLE => self.role.into(),
            HOUSE_ID => self.house_id.into(),
            HOUSE_CODE => self.house_code.clone().into(),
            CREATED_AT => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

/// Finder operations over staff accounts
#[derive(Debug, Clone)]
pub struct UserRepository<S> {
    store: S,
}

impl<S: RecordStore<User>> UserRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_id(
        &self,
        id: UserId,
        status: StatusFilter,
    ) -> Result<Option<User>, RepositoryError> {
        finder::by_id(&self.store, id.value(), status).await
    }

    /// Case-insensitive email lookup: `LOWER(email) = LOWER(?1)`
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousResult` if two accounts share the address.
    pub async fn find_by_email(
        &self,
        email: &str,
        status: StatusFilter,
    ) -> Result<Option<User>, RepositoryError> {
        let email = lookup_key("email", email)?;
        finder::unique(&self.store, Predicate::eq_ignore_case(EMAIL, email), status).await
    }

    /// `(first_name CONTAINS ?1 OR last_name CONTAINS ?1 OR house_code CONTAINS ?2) AND record_status = ?3`
    pub async fn search_by_name_or_house_code(
        &self,
        name: &str,
        house_code: &str,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<User>, RepositoryError> {
        let filter = name_or_house_code(name, house_code)?;
        finder::page(&self.store, filter, status, page).await
    }

    pub async fn count_by_name_or_house_code(
        &self,
        name: &str,
        house_code: &str,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        let filter = name_or_house_code(name, house_code)?;
        finder::count(&self.store, filter, status).await
    }

    pub async fn list_by_house(
        &self,
        house_id: HouseId,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<User>, RepositoryError> {
        finder::page(&self.store, Predicate::eq(HOUSE_ID, house_id), status, page).await
    }

    pub async fn count_by_house(
        &self,
        house_id: HouseId,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::eq(HOUSE_ID, house_id), status).await
    }

    pub async fn list_by_role(
        &self,
        role: UserRole,
        status: StatusFilter,
        page: &PageRequest,
    ) -> Result<Page<User>, RepositoryError> {
        finder::page(&self.store, Predicate::eq(ROLE, role), status, page).await
    }

    pub async fn count_by_role(
        &self,
        role: UserRole,
        status: StatusFilter,
    ) -> Result<u64, RepositoryError> {
        finder::count(&self.store, Predicate::eq(ROLE, role), status).await
    }
}

pub fn name_or_house_code(name: &str, house_code: &str) -> Result<Predicate, RepositoryError> {
    let name = search_term("name", name)?;
    Ok(Predicate::any(vec![
        Predicate::contains(FIRST_NAME, name.clone()),
        Predicate::contains(LAST_NAME, name),
        Predicate::contains(HOUSE_CODE, search_term("house_code", house_code)?),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("SUPPORT_WORKER".parse::<UserRole>().unwrap(), UserRole::SupportWorker);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("janitor".parse::<UserRole>().is_err());
    }
}
