//! All schemas that are exposed from endpoints are defined here
//! along with the conversions from core data

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use velvet_core::{
    AnnotatedEvent, AuthenticatedUser, BookingData, ClubCredentials as CoreClubCredentials,
    ClubData, GuestlistStatus, StoredObject, UserData,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: i32,
    email: Option<String>,
    phone: Option<String>,
    name: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    token: String,
    user: User,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    id: i32,
    name: String,
    location: String,
    address: Option<String>,
    map_url: Option<String>,
    description: Option<String>,
    image_url: String,
    /// Portal login, if credentials have been generated. The hash never
    /// leaves the store.
    email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClubCredentials {
    email: String,
    /// Plaintext, shown exactly once
    password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: i32,
    club_id: i32,
    club: String,
    title: String,
    location: String,
    description: String,
    rules: Option<String>,
    genre: String,
    image_url: String,
    video_url: Option<String>,
    gallery: Vec<String>,
    price: i32,
    price_label: String,
    date: NaiveDate,
    start_time: String,
    end_time: String,
    #[schema(value_type = String)]
    guestlist_status: GuestlistStatus,
    guestlist_limit: Option<i32>,
    closing_threshold: Option<i32>,
    guestlist_close_time: Option<DateTime<Utc>>,
    guestlist_close_on_start: bool,
    featured: bool,
    total_guests: i32,
    spots_remaining: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    id: i32,
    event_id: i32,
    couples: i32,
    ladies: i32,
    stags: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    url: String,
    key: String,
    filename: String,
    mime_type: String,
    size: usize,
}

impl Upload {
    pub(crate) fn from_object(object: StoredObject, filename: String) -> Self {
        Self {
            url: object.url,
            key: object.key,
            filename,
            mime_type: object.mime_type,
            size: object.size,
        }
    }
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<User> for UserData {
    fn to_serialized(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            phone: self.phone.clone(),
            name: self.name.clone(),
            is_admin: self.admin,
            created_at: self.created_at,
        }
    }
}

impl ToSerialized<AuthResult> for AuthenticatedUser {
    fn to_serialized(&self) -> AuthResult {
        AuthResult {
            token: self.token.clone(),
            user: self.user.to_serialized(),
        }
    }
}

impl ToSerialized<Club> for ClubData {
    fn to_serialized(&self) -> Club {
        Club {
            id: self.id,
            name: self.name.clone(),
            location: self.location.clone(),
            address: self.address.clone(),
            map_url: self.map_url.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            email: self.email.clone(),
        }
    }
}

impl ToSerialized<ClubCredentials> for CoreClubCredentials {
    fn to_serialized(&self) -> ClubCredentials {
        ClubCredentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

impl ToSerialized<Event> for AnnotatedEvent {
    fn to_serialized(&self) -> Event {
        let event = &self.event;

        Event {
            id: event.id,
            club_id: event.club_id,
            club: event.club.clone(),
            title: event.title.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
            rules: event.rules.clone(),
            genre: event.genre.clone(),
            image_url: event.image_url.clone(),
            video_url: event.video_url.clone(),
            gallery: event.gallery.clone(),
            price: event.price,
            price_label: event.price_label.clone(),
            date: event.date,
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            guestlist_status: event.guestlist_status,
            guestlist_limit: event.guestlist_limit,
            closing_threshold: event.closing_threshold,
            guestlist_close_time: event.guestlist_close_time,
            guestlist_close_on_start: event.guestlist_close_on_start,
            featured: event.featured,
            total_guests: self.guestlist.total_guests,
            spots_remaining: self.guestlist.spots_remaining,
        }
    }
}

impl ToSerialized<Booking> for BookingData {
    fn to_serialized(&self) -> Booking {
        Booking {
            id: self.id,
            event_id: self.event_id,
            couples: self.couples,
            ladies: self.ladies,
            stags: self.stags,
        }
    }
}
