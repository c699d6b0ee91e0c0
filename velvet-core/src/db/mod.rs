use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

mod data;
pub use data::*;

mod pg;
pub use pg::*;

#[cfg(test)]
mod memory;
#[cfg(test)]
pub(crate) use memory::MemoryDatabase;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Helper trait to reduce boilerplate
pub trait DatabaseResult {
    /// Turns the Result into a conflict error if it's Ok()
    fn conflict_or_ok(self, resource: &'static str, field: &'static str, value: &str)
        -> Result<()>;
}

impl<T> DatabaseResult for Result<T> {
    fn conflict_or_ok(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<()> {
        match self {
            Ok(_) => Err(DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            }),
            Err(e) => match e {
                DatabaseError::NotFound {
                    resource: _,
                    identifier: _,
                } => Ok(()),
                e => Err(e),
            },
        }
    }
}

/// Represents a type that can fetch and persist velvet records
#[async_trait]
pub trait Database: Send + Sync {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData>;
    async fn user_by_email(&self, email: &str) -> Result<UserData>;
    async fn user_by_phone(&self, phone: &str) -> Result<UserData>;
    async fn create_user(&self, new_user: NewUser) -> Result<UserData>;
    async fn update_user_name(&self, user_id: PrimaryKey, name: &str) -> Result<UserData>;

    async fn club_by_id(&self, club_id: PrimaryKey) -> Result<ClubData>;
    async fn list_clubs(&self) -> Result<Vec<ClubData>>;
    async fn create_club(&self, new_club: NewClub) -> Result<ClubData>;
    async fn update_club(&self, updated_club: UpdatedClub) -> Result<ClubData>;
    async fn delete_club(&self, club_id: PrimaryKey) -> Result<()>;
    async fn set_club_credentials(
        &self,
        club_id: PrimaryKey,
        email: &str,
        password: &str,
    ) -> Result<ClubData>;

    async fn event_by_id(&self, event_id: PrimaryKey) -> Result<EventData>;
    async fn list_events(&self) -> Result<Vec<EventData>>;
    async fn events_by_club(&self, club_id: PrimaryKey) -> Result<Vec<EventData>>;
    /// `club` is the display name of the owning club, resolved by the caller
    async fn create_event(&self, new_event: NewEvent, club: &str) -> Result<EventData>;
    /// `club` is only passed when the owning club changed
    async fn update_event(&self, updated_event: UpdatedEvent, club: Option<&str>)
        -> Result<EventData>;
    async fn delete_event(&self, event_id: PrimaryKey) -> Result<()>;

    async fn bookings_for_event(&self, event_id: PrimaryKey) -> Result<Vec<BookingData>>;
    async fn create_booking(&self, new_booking: NewBooking) -> Result<BookingData>;
}

#[derive(Debug)]
pub struct NewUser {
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Already hashed by the caller
    pub password: Option<String>,
    pub name: String,
    pub admin: bool,
}

#[derive(Debug)]
pub struct NewClub {
    pub name: String,
    pub location: String,
    pub address: Option<String>,
    pub map_url: Option<String>,
    pub description: Option<String>,
    pub image_url: String,
}

#[derive(Debug, Default)]
pub struct UpdatedClub {
    pub id: PrimaryKey,
    pub name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub map_url: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug)]
pub struct NewEvent {
    pub club_id: PrimaryKey,
    pub title: String,
    pub location: String,
    pub description: String,
    pub rules: Option<String>,
    pub genre: String,
    pub image_url: String,
    pub video_url: Option<String>,
    pub gallery: Vec<String>,
    pub price: i32,
    pub price_label: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub guestlist_status: GuestlistStatus,
    pub guestlist_limit: Option<i32>,
    pub closing_threshold: Option<i32>,
    pub guestlist_close_time: Option<DateTime<Utc>>,
    pub guestlist_close_on_start: bool,
    pub featured: bool,
}

#[derive(Debug, Default)]
pub struct UpdatedEvent {
    pub id: PrimaryKey,
    pub club_id: Option<PrimaryKey>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub genre: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub price: Option<i32>,
    pub price_label: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub guestlist_status: Option<GuestlistStatus>,
    pub guestlist_limit: Option<i32>,
    pub closing_threshold: Option<i32>,
    pub guestlist_close_time: Option<DateTime<Utc>>,
    pub guestlist_close_on_start: Option<bool>,
    pub featured: Option<bool>,
}

#[derive(Debug)]
pub struct NewBooking {
    pub event_id: PrimaryKey,
    pub couples: i32,
    pub ladies: i32,
    pub stags: i32,
}
