//! In-memory [Database] used by tests that exercise service semantics
//! without a running postgres instance.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    BookingData, ClubData, Database, DatabaseError, DatabaseResult, EventData, NewBooking,
    NewClub, NewEvent, NewUser, PrimaryKey, Result, UpdatedClub, UpdatedEvent, UserData,
};

#[derive(Default)]
struct State {
    users: Vec<UserData>,
    clubs: Vec<ClubData>,
    events: Vec<EventData>,
    bookings: Vec<BookingData>,
    next_id: PrimaryKey,
}

impl State {
    fn assign_id(&mut self) -> PrimaryKey {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryDatabase {
    state: Mutex<State>,
}

fn not_found(resource: &'static str, identifier: &'static str) -> DatabaseError {
    DatabaseError::NotFound {
        resource,
        identifier,
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        let state = self.state.lock().unwrap();

        state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(not_found("user", "id"))
    }

    async fn user_by_email(&self, email: &str) -> Result<UserData> {
        let state = self.state.lock().unwrap();

        state
            .users
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned()
            .ok_or(not_found("user", "email"))
    }

    async fn user_by_phone(&self, phone: &str) -> Result<UserData> {
        let state = self.state.lock().unwrap();

        state
            .users
            .iter()
            .find(|u| u.phone.as_deref() == Some(phone))
            .cloned()
            .ok_or(not_found("user", "phone"))
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

        let mut state = self.state.lock().unwrap();
        let user = UserData {
            id: state.assign_id(),
            email: new_user.email,
            phone: new_user.phone,
            password: new_user.password,
            name: new_user.name,
            admin: new_user.admin,
            created_at: Utc::now(),
        };

        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_user_name(&self, user_id: PrimaryKey, name: &str) -> Result<UserData> {
        let mut state = self.state.lock().unwrap();

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(not_found("user", "id"))?;

        user.name = name.to_string();
        Ok(user.clone())
    }

    async fn club_by_id(&self, club_id: PrimaryKey) -> Result<ClubData> {
        let state = self.state.lock().unwrap();

        state
            .clubs
            .iter()
            .find(|c| c.id == club_id)
            .cloned()
            .ok_or(not_found("club", "id"))
    }

    async fn list_clubs(&self) -> Result<Vec<ClubData>> {
        Ok(self.state.lock().unwrap().clubs.clone())
    }

    async fn create_club(&self, new_club: NewClub) -> Result<ClubData> {
        let mut state = self.state.lock().unwrap();
        let club = ClubData {
            id: state.assign_id(),
            name: new_club.name,
            location: new_club.location,
            address: new_club.address,
            map_url: new_club.map_url,
            description: new_club.description,
            image_url: new_club.image_url,
            email: None,
            password: None,
        };

        state.clubs.push(club.clone());
        Ok(club)
    }

    async fn update_club(&self, updated_club: UpdatedClub) -> Result<ClubData> {
        let mut state = self.state.lock().unwrap();

        let club = state
            .clubs
            .iter_mut()
            .find(|c| c.id == updated_club.id)
            .ok_or(not_found("club", "id"))?;

        if let Some(name) = updated_club.name {
            club.name = name;
        }
        if let Some(location) = updated_club.location {
            club.location = location;
        }
        if updated_club.address.is_some() {
            club.address = updated_club.address;
        }
        if updated_club.map_url.is_some() {
            club.map_url = updated_club.map_url;
        }
        if updated_club.description.is_some() {
            club.description = updated_club.description;
        }
        if let Some(image_url) = updated_club.image_url {
            club.image_url = image_url;
        }

        Ok(club.clone())
    }

    async fn delete_club(&self, club_id: PrimaryKey) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        let index = state
            .clubs
            .iter()
            .position(|c| c.id == club_id)
            .ok_or(not_found("club", "id"))?;

        state.clubs.remove(index);
        Ok(())
    }

    async fn set_club_credentials(
        &self,
        club_id: PrimaryKey,
        email: &str,
        password: &str,
    ) -> Result<ClubData> {
        let mut state = self.state.lock().unwrap();

        let club = state
            .clubs
            .iter_mut()
            .find(|c| c.id == club_id)
            .ok_or(not_found("club", "id"))?;

        club.email = Some(email.to_string());
        club.password = Some(password.to_string());
        Ok(club.clone())
    }

    async fn event_by_id(&self, event_id: PrimaryKey) -> Result<EventData> {
        let state = self.state.lock().unwrap();

        state
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or(not_found("event", "id"))
    }

    async fn list_events(&self) -> Result<Vec<EventData>> {
        Ok(self.state.lock().unwrap().events.clone())
    }

    async fn events_by_club(&self, club_id: PrimaryKey) -> Result<Vec<EventData>> {
        let state = self.state.lock().unwrap();

        Ok(state
            .events
            .iter()
            .filter(|e| e.club_id == club_id)
            .cloned()
            .collect())
    }

    async fn create_event(&self, new_event: NewEvent, club: &str) -> Result<EventData> {
        let mut state = self.state.lock().unwrap();
        let event = EventData {
            id: state.assign_id(),
            club_id: new_event.club_id,
            club: club.to_string(),
            title: new_event.title,
            location: new_event.location,
            description: new_event.description,
            rules: new_event.rules,
            genre: new_event.genre,
            image_url: new_event.image_url,
            video_url: new_event.video_url,
            gallery: new_event.gallery,
            price: new_event.price,
            price_label: new_event.price_label,
            date: new_event.date,
            start_time: new_event.start_time,
            end_time: new_event.end_time,
            guestlist_status: new_event.guestlist_status,
            guestlist_limit: new_event.guestlist_limit,
            closing_threshold: new_event.closing_threshold,
            guestlist_close_time: new_event.guestlist_close_time,
            guestlist_close_on_start: new_event.guestlist_close_on_start,
            featured: new_event.featured,
        };

        state.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(
        &self,
        updated_event: UpdatedEvent,
        club: Option<&str>,
    ) -> Result<EventData> {
        let mut state = self.state.lock().unwrap();

        let event = state
            .events
            .iter_mut()
            .find(|e| e.id == updated_event.id)
            .ok_or(not_found("event", "id"))?;

        if let Some(club_id) = updated_event.club_id {
            event.club_id = club_id;
        }
        if let Some(club) = club {
            event.club = club.to_string();
        }
        if let Some(title) = updated_event.title {
            event.title = title;
        }
        if let Some(location) = updated_event.location {
            event.location = location;
        }
        if let Some(description) = updated_event.description {
            event.description = description;
        }
        if updated_event.rules.is_some() {
            event.rules = updated_event.rules;
        }
        if let Some(genre) = updated_event.genre {
            event.genre = genre;
        }
        if let Some(image_url) = updated_event.image_url {
            event.image_url = image_url;
        }
        if updated_event.video_url.is_some() {
            event.video_url = updated_event.video_url;
        }
        if let Some(gallery) = updated_event.gallery {
            event.gallery = gallery;
        }
        if let Some(price) = updated_event.price {
            event.price = price;
        }
        if let Some(price_label) = updated_event.price_label {
            event.price_label = price_label;
        }
        if let Some(date) = updated_event.date {
            event.date = date;
        }
        if let Some(start_time) = updated_event.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = updated_event.end_time {
            event.end_time = end_time;
        }
        if let Some(status) = updated_event.guestlist_status {
            event.guestlist_status = status;
        }
        if updated_event.guestlist_limit.is_some() {
            event.guestlist_limit = updated_event.guestlist_limit;
        }
        if updated_event.closing_threshold.is_some() {
            event.closing_threshold = updated_event.closing_threshold;
        }
        if updated_event.guestlist_close_time.is_some() {
            event.guestlist_close_time = updated_event.guestlist_close_time;
        }
        if let Some(close_on_start) = updated_event.guestlist_close_on_start {
            event.guestlist_close_on_start = close_on_start;
        }
        if let Some(featured) = updated_event.featured {
            event.featured = featured;
        }

        Ok(event.clone())
    }

    async fn delete_event(&self, event_id: PrimaryKey) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        let index = state
            .events
            .iter()
            .position(|e| e.id == event_id)
            .ok_or(not_found("event", "id"))?;

        state.events.remove(index);
        Ok(())
    }

    async fn bookings_for_event(&self, event_id: PrimaryKey) -> Result<Vec<BookingData>> {
        let state = self.state.lock().unwrap();

        Ok(state
            .bookings
            .iter()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn create_booking(&self, new_booking: NewBooking) -> Result<BookingData> {
        // Match postgres behavior, bookings require an existing event
        let _ = self.event_by_id(new_booking.event_id).await?;

        let mut state = self.state.lock().unwrap();
        let booking = BookingData {
            id: state.assign_id(),
            event_id: new_booking.event_id,
            couples: new_booking.couples,
            ladies: new_booking.ladies,
            stags: new_booking.stags,
        };

        state.bookings.push(booking.clone());
        Ok(booking)
    }
}
