use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The type used for primary keys in the database.
pub type PrimaryKey = i32;

/// A guest account. Accounts created through phone auth may carry no email
/// or password at all.
#[derive(Debug, Clone, FromRow)]
pub struct UserData {
    pub id: PrimaryKey,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Argon2 hash, never the plaintext
    pub password: Option<String>,
    pub name: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A club hosting events
#[derive(Debug, Clone, FromRow)]
pub struct ClubData {
    pub id: PrimaryKey,
    pub name: String,
    pub location: String,
    pub address: Option<String>,
    pub map_url: Option<String>,
    pub description: Option<String>,
    pub image_url: String,
    /// Portal login, present once credentials have been generated
    pub email: Option<String>,
    /// Hash of the portal password
    pub password: Option<String>,
}

/// An event on a club's calendar
#[derive(Debug, Clone)]
pub struct EventData {
    pub id: PrimaryKey,
    pub club_id: PrimaryKey,
    /// Display name of the owning club, captured when the event is created
    /// or moved. A later club rename does not rewrite it.
    pub club: String,
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

/// A single guestlist submission against an event
#[derive(Debug, Clone, FromRow)]
pub struct BookingData {
    pub id: PrimaryKey,
    pub event_id: PrimaryKey,
    pub couples: i32,
    pub ladies: i32,
    pub stags: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestlistStatus {
    #[default]
    Open,
    Closing,
    Closed,
}

impl GuestlistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "closing" => Some(Self::Closing),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}
