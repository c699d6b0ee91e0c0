use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, Error as SqlxError, FromRow, PgPool};

use crate::{
    BookingData, ClubData, Database, DatabaseError, DatabaseResult, EventData, GuestlistStatus,
    IntoDatabaseError, NewBooking, NewClub, NewEvent, NewUser, PrimaryKey, Result, UpdatedClub,
    UpdatedEvent, UserData,
};

const EVENT_COLUMNS: &str = "id, club_id, club, title, location, description, rules, genre, \
     image_url, video_url, gallery, price, price_label, date, start_time, end_time, \
     guestlist_status, guestlist_limit, closing_threshold, guestlist_close_time, \
     guestlist_close_on_start, featured";

/// A postgres database implementation for velvet
pub struct PgDatabase {
    pool: PgPool,
}

/// Raw event row. The guestlist status is stored as text and parsed into
/// [GuestlistStatus] when the row is converted.
#[derive(FromRow)]
struct EventRow {
    id: PrimaryKey,
    club_id: PrimaryKey,
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
    guestlist_status: String,
    guestlist_limit: Option<i32>,
    closing_threshold: Option<i32>,
    guestlist_close_time: Option<DateTime<Utc>>,
    guestlist_close_on_start: bool,
    featured: bool,
}

impl EventRow {
    fn into_data(self) -> Result<EventData> {
        let guestlist_status = GuestlistStatus::parse(&self.guestlist_status).ok_or_else(|| {
            DatabaseError::Internal(
                format!("unknown guestlist status {:?}", self.guestlist_status).into(),
            )
        })?;

        Ok(EventData {
            id: self.id,
            club_id: self.club_id,
            club: self.club,
            title: self.title,
            location: self.location,
            description: self.description,
            rules: self.rules,
            genre: self.genre,
            image_url: self.image_url,
            video_url: self.video_url,
            gallery: self.gallery,
            price: self.price,
            price_label: self.price_label,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            guestlist_status,
            guestlist_limit: self.guestlist_limit,
            closing_threshold: self.closing_threshold,
            guestlist_close_time: self.guestlist_close_time,
            guestlist_close_on_start: self.guestlist_close_on_start,
            featured: self.featured,
        })
    }
}

impl PgDatabase {
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        sqlx::query_as::<_, UserData>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("user", "id"))
    }

    async fn user_by_email(&self, email: &str) -> Result<UserData> {
        sqlx::query_as::<_, UserData>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("user", "email"))
    }

    async fn user_by_phone(&self, phone: &str) -> Result<UserData> {
        sqlx::query_as::<_, UserData>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("user", "phone"))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        if let Some(email) = &new_user.email {
            self.user_by_email(email)
                .await
                .conflict_or_ok("user", "email", email)?;
        }

        if let Some(phone) = &new_user.phone {
            self.user_by_phone(phone)
                .await
                .conflict_or_ok("user", "phone", phone)?;
        }

        sqlx::query_as::<_, UserData>(
            "INSERT INTO users (email, phone, password, name, admin)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&new_user.password)
        .bind(&new_user.name)
        .bind(new_user.admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn update_user_name(&self, user_id: PrimaryKey, name: &str) -> Result<UserData> {
        // Ensure user exists
        let _ = self.user_by_id(user_id).await?;

        sqlx::query("UPDATE users SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        self.user_by_id(user_id).await
    }

    async fn club_by_id(&self, club_id: PrimaryKey) -> Result<ClubData> {
        sqlx::query_as::<_, ClubData>("SELECT * FROM clubs WHERE id = $1")
            .bind(club_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("club", "id"))
    }

    async fn list_clubs(&self) -> Result<Vec<ClubData>> {
        sqlx::query_as::<_, ClubData>("SELECT * FROM clubs ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn create_club(&self, new_club: NewClub) -> Result<ClubData> {
        sqlx::query_as::<_, ClubData>(
            "INSERT INTO clubs (name, location, address, map_url, description, image_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&new_club.name)
        .bind(&new_club.location)
        .bind(&new_club.address)
        .bind(&new_club.map_url)
        .bind(&new_club.description)
        .bind(&new_club.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }

    async fn update_club(&self, updated_club: UpdatedClub) -> Result<ClubData> {
        let club = self.club_by_id(updated_club.id).await?;

        sqlx::query(
            "UPDATE clubs SET
                name = $1,
                location = $2,
                address = $3,
                map_url = $4,
                description = $5,
                image_url = $6
            WHERE id = $7",
        )
        .bind(updated_club.name.unwrap_or(club.name))
        .bind(updated_club.location.unwrap_or(club.location))
        .bind(updated_club.address.or(club.address))
        .bind(updated_club.map_url.or(club.map_url))
        .bind(updated_club.description.or(club.description))
        .bind(updated_club.image_url.unwrap_or(club.image_url))
        .bind(updated_club.id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.club_by_id(updated_club.id).await
    }

    async fn delete_club(&self, club_id: PrimaryKey) -> Result<()> {
        // Ensure club exists, a missing id is a distinguished not-found
        let _ = self.club_by_id(club_id).await?;

        sqlx::query("DELETE FROM clubs WHERE id = $1")
            .bind(club_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn set_club_credentials(
        &self,
        club_id: PrimaryKey,
        email: &str,
        password: &str,
    ) -> Result<ClubData> {
        // Ensure club exists
        let _ = self.club_by_id(club_id).await?;

        sqlx::query("UPDATE clubs SET email = $1, password = $2 WHERE id = $3")
            .bind(email)
            .bind(password)
            .bind(club_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        self.club_by_id(club_id).await
    }

    async fn event_by_id(&self, event_id: PrimaryKey) -> Result<EventData> {
        sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("event", "id"))?
        .into_data()
    }

    async fn list_events(&self) -> Result<Vec<EventData>> {
        sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?
        .into_iter()
        .map(EventRow::into_data)
        .collect()
    }

    async fn events_by_club(&self, club_id: PrimaryKey) -> Result<Vec<EventData>> {
        sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE club_id = $1 ORDER BY date"
        ))
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?
        .into_iter()
        .map(EventRow::into_data)
        .collect()
    }

    async fn create_event(&self, new_event: NewEvent, club: &str) -> Result<EventData> {
        sqlx::query_as::<_, EventRow>(&format!(
            "INSERT INTO events (
                club_id, club, title, location, description, rules, genre, image_url,
                video_url, gallery, price, price_label, date, start_time, end_time,
                guestlist_status, guestlist_limit, closing_threshold, guestlist_close_time,
                guestlist_close_on_start, featured
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21
            )
            RETURNING {EVENT_COLUMNS}"
        ))
        .bind(new_event.club_id)
        .bind(club)
        .bind(&new_event.title)
        .bind(&new_event.location)
        .bind(&new_event.description)
        .bind(&new_event.rules)
        .bind(&new_event.genre)
        .bind(&new_event.image_url)
        .bind(&new_event.video_url)
        .bind(&new_event.gallery)
        .bind(new_event.price)
        .bind(&new_event.price_label)
        .bind(new_event.date)
        .bind(&new_event.start_time)
        .bind(&new_event.end_time)
        .bind(new_event.guestlist_status.as_str())
        .bind(new_event.guestlist_limit)
        .bind(new_event.closing_threshold)
        .bind(new_event.guestlist_close_time)
        .bind(new_event.guestlist_close_on_start)
        .bind(new_event.featured)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?
        .into_data()
    }

    async fn update_event(
        &self,
        updated_event: UpdatedEvent,
        club: Option<&str>,
    ) -> Result<EventData> {
        let event = self.event_by_id(updated_event.id).await?;

        sqlx::query(
            "UPDATE events SET
                club_id = $1,
                club = $2,
                title = $3,
                location = $4,
                description = $5,
                rules = $6,
                genre = $7,
                image_url = $8,
                video_url = $9,
                gallery = $10,
                price = $11,
                price_label = $12,
                date = $13,
                start_time = $14,
                end_time = $15,
                guestlist_status = $16,
                guestlist_limit = $17,
                closing_threshold = $18,
                guestlist_close_time = $19,
                guestlist_close_on_start = $20,
                featured = $21
            WHERE id = $22",
        )
        .bind(updated_event.club_id.unwrap_or(event.club_id))
        .bind(club.map(str::to_string).unwrap_or(event.club))
        .bind(updated_event.title.unwrap_or(event.title))
        .bind(updated_event.location.unwrap_or(event.location))
        .bind(updated_event.description.unwrap_or(event.description))
        .bind(updated_event.rules.or(event.rules))
        .bind(updated_event.genre.unwrap_or(event.genre))
        .bind(updated_event.image_url.unwrap_or(event.image_url))
        .bind(updated_event.video_url.or(event.video_url))
        .bind(updated_event.gallery.unwrap_or(event.gallery))
        .bind(updated_event.price.unwrap_or(event.price))
        .bind(updated_event.price_label.unwrap_or(event.price_label))
        .bind(updated_event.date.unwrap_or(event.date))
        .bind(updated_event.start_time.unwrap_or(event.start_time))
        .bind(updated_event.end_time.unwrap_or(event.end_time))
        .bind(
            updated_event
                .guestlist_status
                .unwrap_or(event.guestlist_status)
                .as_str(),
        )
        .bind(updated_event.guestlist_limit.or(event.guestlist_limit))
        .bind(updated_event.closing_threshold.or(event.closing_threshold))
        .bind(
            updated_event
                .guestlist_close_time
                .or(event.guestlist_close_time),
        )
        .bind(
            updated_event
                .guestlist_close_on_start
                .unwrap_or(event.guestlist_close_on_start),
        )
        .bind(updated_event.featured.unwrap_or(event.featured))
        .bind(updated_event.id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.event_by_id(updated_event.id).await
    }

    async fn delete_event(&self, event_id: PrimaryKey) -> Result<()> {
        // Ensure event exists, a missing id is a distinguished not-found
        let _ = self.event_by_id(event_id).await?;

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn bookings_for_event(&self, event_id: PrimaryKey) -> Result<Vec<BookingData>> {
        sqlx::query_as::<_, BookingData>("SELECT * FROM bookings WHERE event_id = $1")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn create_booking(&self, new_booking: NewBooking) -> Result<BookingData> {
        // Ensure event exists
        let _ = self.event_by_id(new_booking.event_id).await?;

        sqlx::query_as::<_, BookingData>(
            "INSERT INTO bookings (event_id, couples, ladies, stags)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(new_booking.event_id)
        .bind(new_booking.couples)
        .bind(new_booking.ladies)
        .bind(new_booking.stags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier,
            },
            e => Self::any(e),
        }
    }
}
