//! Test Data Builders
//!
//! One builder per record type. Only the id is required; everything else
//! gets a default (names and contact details come from `fake`) so a test
//! states just the fields its scenario depends on.

use chrono::{DateTime, NaiveDate, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{
    ClientId, ContactId, DocumentId, HouseId, IncidentId, MealRecordId, NdisPlanId, NoteId,
    NoticeId, RecordStatus, UserId,
};
use domain_care::{
    Client, Contact, Document, DocumentCategory, House, Incident, IncidentCategory,
    IncidentState, MealRecord, MealType, NdisPlan, Note, NoteCategory, Notice, NoticeState,
    Severity, User, UserRole,
};

use crate::fixtures::{HouseFixtures, TemporalFixtures};

/// Builder for houses
pub struct TestHouseBuilder {
    house: House,
}

impl TestHouseBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            house: House {
                id: HouseId::new(id),
                house_code: format!("H{}", id),
                name: format!("{} House", StreetName().fake::<String>()),
                address: Some(StreetName().fake()),
                phone: Some(PhoneNumber().fake()),
                status: RecordStatus::Active,
                created_at: TemporalFixtures::created(),
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.house.house_code = code.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.house.name = name.into();
        self
    }

    pub fn deleted(mut self) -> Self {
        self.house.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> House {
        self.house
    }
}

/// Builder for clients
pub struct TestClientBuilder {
    client: Client,
}

impl TestClientBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            client: Client {
                id: ClientId::new(id),
                name: Name().fake(),
                house_id: HouseId::new(1),
                house_code: HouseFixtures::H1.to_string(),
                date_of_birth: Some(TemporalFixtures::day(1990, 3, 14)),
                ndis_number: Some(format!("43{:07}", id)),
                status: RecordStatus::Active,
                created_at: TemporalFixtures::created(),
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.client.name = name.into();
        self
    }

    /// Places the client in a house, keeping id and code consistent
    pub fn in_house(mut self, house_id: i64, house_code: impl Into<String>) -> Self {
        self.client.house_id = HouseId::new(house_id);
        self.client.house_code = house_code.into();
        self
    }

    pub fn with_ndis_number(mut self, number: Option<&str>) -> Self {
        self.client.ndis_number = number.map(str::to_string);
        self
    }

    pub fn with_date_of_birth(mut self, date: Option<NaiveDate>) -> Self {
        self.client.date_of_birth = date;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.client.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> Client {
        self.client
    }
}

/// Builder for staff accounts
pub struct TestUserBuilder {
    user: User,
}

impl TestUserBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            user: User {
                id: UserId::new(id),
                first_name: FirstName().fake(),
                last_name: LastName().fake(),
                email: format!("user{}.{}", id, SafeEmail().fake::<String>()),
                role: UserRole::SupportWorker,
                house_id: Some(HouseId::new(1)),
                house_code: Some(HouseFixtures::H1.to_string()),
                status: RecordStatus::Active,
                created_at: TemporalFixtures::created(),
            },
        }
    }

    pub fn named(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.user.first_name = first.into();
        self.user.last_name = last.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.user.email = email.into();
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.user.role = role;
        self
    }

    pub fn in_house(mut self, house_id: i64, house_code: impl Into<String>) -> Self {
        self.user.house_id = Some(HouseId::new(house_id));
        self.user.house_code = Some(house_code.into());
        self
    }

    /// Staff not assigned to any house
    pub fn unassigned(mut self) -> Self {
        self.user.house_id = None;
        self.user.house_code = None;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.user.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> User {
        self.user
    }
}

/// Builder for incident reports
pub struct TestIncidentBuilder {
    incident: Incident,
}

impl TestIncidentBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            incident: Incident {
                id: IncidentId::new(id),
                client_id: ClientId::new(1),
                house_code: HouseFixtures::H1.to_string(),
                category: IncidentCategory::Other,
                severity: Severity::Low,
                state: IncidentState::Reported,
                occurred_at: TemporalFixtures::now(),
                description: Sentence(3..8).fake(),
                reported_by: Some(UserId::new(1)),
                status: RecordStatus::Active,
                created_at: TemporalFixtures::created(),
            },
        }
    }

    pub fn for_client(mut self, client_id: i64) -> Self {
        self.incident.client_id = ClientId::new(client_id);
        self
    }

    pub fn in_house(mut self, house_code: impl Into<String>) -> Self {
        self.incident.house_code = house_code.into();
        self
    }

    pub fn occurred_at(mut self, at: DateTime<Utc>) -> Self {
        self.incident.occurred_at = at;
        self
    }

    pub fn with_state(mut self, state: IncidentState) -> Self {
        self.incident.state = state;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.incident.severity = severity;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.incident.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> Incident {
        self.incident
    }
}

/// Builder for progress notes
pub struct TestNoteBuilder {
    note: Note,
}

impl TestNoteBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            note: Note {
                id: NoteId::new(id),
                client_id: ClientId::new(1),
                author_id: Some(UserId::new(1)),
                note_date: TemporalFixtures::today(),
                category: NoteCategory::Daily,
                content: Sentence(4..12).fake(),
                status: RecordStatus::Active,
                created_at: TemporalFixtures::created(),
            },
        }
    }

    pub fn for_client(mut self, client_id: i64) -> Self {
        self.note.client_id = ClientId::new(client_id);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.note.note_date = date;
        self
    }

    pub fn with_category(mut self, category: NoteCategory) -> Self {
        self.note.category = category;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.note.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> Note {
        self.note
    }
}

/// Builder for client documents
pub struct TestDocumentBuilder {
    document: Document,
}

impl TestDocumentBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            document: Document {
                id: DocumentId::new(id),
                client_id: ClientId::new(1),
                category: DocumentCategory::Other,
                title: Sentence(2..4).fake(),
                file_name: format!("document-{}.pdf", id),
                expiry_date: None,
                uploaded_by: Some(UserId::new(1)),
                status: RecordStatus::Active,
                created_at: TemporalFixtures::created(),
            },
        }
    }

    pub fn for_client(mut self, client_id: i64) -> Self {
        self.document.client_id = ClientId::new(client_id);
        self
    }

    pub fn with_category(mut self, category: DocumentCategory) -> Self {
        self.document.category = category;
        self
    }

    pub fn expiring(mut self, date: NaiveDate) -> Self {
        self.document.expiry_date = Some(date);
        self
    }

    pub fn deleted(mut self) -> Self {
        self.document.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> Document {
        self.document
    }
}

/// Builder for client contacts
pub struct TestContactBuilder {
    contact: Contact,
}

impl TestContactBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            contact: Contact {
                id: ContactId::new(id),
                client_id: ClientId::new(1),
                name: Name().fake(),
                relationship: "Parent".to_string(),
                phone: Some(PhoneNumber().fake()),
                email: Some(SafeEmail().fake()),
                emergency: false,
                status: RecordStatus::Active,
            },
        }
    }

    pub fn for_client(mut self, client_id: i64) -> Self {
        self.contact.client_id = ClientId::new(client_id);
        self
    }

    pub fn emergency(mut self) -> Self {
        self.contact.emergency = true;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.contact.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> Contact {
        self.contact
    }
}

/// Builder for NDIS plans; defaults to calendar year 2024
pub struct TestNdisPlanBuilder {
    plan: NdisPlan,
}

impl TestNdisPlanBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            plan: NdisPlan {
                id: NdisPlanId::new(id),
                client_id: ClientId::new(1),
                plan_number: format!("PLAN-{:05}", id),
                start_date: TemporalFixtures::day(2024, 1, 1),
                end_date: TemporalFixtures::day(2025, 1, 1),
                total_budget: dec!(85000.00),
                status: RecordStatus::Active,
                created_at: TemporalFixtures::created(),
            },
        }
    }

    pub fn for_client(mut self, client_id: i64) -> Self {
        self.plan.client_id = ClientId::new(client_id);
        self
    }

    pub fn running(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.plan.start_date = start;
        self.plan.end_date = end;
        self
    }

    pub fn with_budget(mut self, budget: Decimal) -> Self {
        self.plan.total_budget = budget;
        self
    }

    pub fn with_plan_number(mut self, number: impl Into<String>) -> Self {
        self.plan.plan_number = number.into();
        self
    }

    pub fn deleted(mut self) -> Self {
        self.plan.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> NdisPlan {
        self.plan
    }
}

/// Builder for notices; defaults to an active notice with an open window
pub struct TestNoticeBuilder {
    notice: Notice,
}

impl TestNoticeBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            notice: Notice {
                id: NoticeId::new(id),
                title: Sentence(2..5).fake(),
                body: Sentence(6..14).fake(),
                state: NoticeState::Active,
                start_at: None,
                end_at: None,
                house_ids: Vec::new(),
                created_by: Some(UserId::new(1)),
                status: RecordStatus::Active,
                created_at: TemporalFixtures::created(),
            },
        }
    }

    pub fn posted_to(mut self, house_ids: &[i64]) -> Self {
        self.notice.house_ids = house_ids.iter().copied().map(HouseId::new).collect();
        self
    }

    pub fn starting(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.notice.start_at = at;
        self
    }

    pub fn ending(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.notice.end_at = at;
        self
    }

    pub fn with_state(mut self, state: NoticeState) -> Self {
        self.notice.state = state;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.notice.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> Notice {
        self.notice
    }
}

/// Builder for meal records
pub struct TestMealRecordBuilder {
    meal: MealRecord,
}

impl TestMealRecordBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            meal: MealRecord {
                id: MealRecordId::new(id),
                client_id: ClientId::new(1),
                meal_type: MealType::Lunch,
                meal_date: TemporalFixtures::today(),
                details: Some(Sentence(2..6).fake()),
                recorded_by: Some(UserId::new(1)),
                status: RecordStatus::Active,
                created_at: TemporalFixtures::created(),
            },
        }
    }

    pub fn for_client(mut self, client_id: i64) -> Self {
        self.meal.client_id = ClientId::new(client_id);
        self
    }

    pub fn meal(mut self, meal_type: MealType, date: NaiveDate) -> Self {
        self.meal.meal_type = meal_type;
        self.meal.meal_date = date;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.meal.status = RecordStatus::Deleted;
        self
    }

    pub fn build(self) -> MealRecord {
        self.meal
    }
}
