use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::{
    BookingData, Database, DatabaseError, EventData, GuestlistSummary, NewBooking, NewEvent,
    PrimaryKey, UpdatedEvent,
};

/// Filter predicates for event listings. Predicates compose with logical
/// AND, an unset predicate matches everything.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Case-insensitive exact genre match. The special value "all" disables
    /// the predicate.
    pub genre: Option<String>,
    /// Only events from the start of the current local day onward,
    /// today inclusive
    pub upcoming: bool,
    pub featured: Option<bool>,
}

impl EventFilter {
    fn matches(&self, event: &EventData, today: NaiveDate) -> bool {
        if let Some(genre) = &self.genre {
            if !genre.eq_ignore_ascii_case("all") && !genre.eq_ignore_ascii_case(&event.genre) {
                return false;
            }
        }

        if self.upcoming && event.date < today {
            return false;
        }

        if let Some(featured) = self.featured {
            if event.featured != featured {
                return false;
            }
        }

        true
    }
}

/// An event along with its derived guestlist metrics
#[derive(Debug, Clone)]
pub struct AnnotatedEvent {
    pub event: EventData,
    pub guestlist: GuestlistSummary,
}

pub struct EventService<Db> {
    db: Arc<Db>,
}

impl<Db> EventService<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Lists events matching the filter, each annotated with its guestlist
    /// metrics
    pub async fn list(&self, filter: EventFilter) -> Result<Vec<AnnotatedEvent>, DatabaseError> {
        let today = Local::now().date_naive();
        let events = self.db.list_events().await?;

        let mut annotated = Vec::new();

        for event in events.into_iter().filter(|e| filter.matches(e, today)) {
            annotated.push(self.annotate(event).await?);
        }

        Ok(annotated)
    }

    pub async fn by_id(&self, event_id: PrimaryKey) -> Result<AnnotatedEvent, DatabaseError> {
        let event = self.db.event_by_id(event_id).await?;

        self.annotate(event).await
    }

    /// Lists a club's events, annotated. Fails if the club doesn't exist.
    pub async fn by_club(&self, club_id: PrimaryKey) -> Result<Vec<AnnotatedEvent>, DatabaseError> {
        let _ = self.db.club_by_id(club_id).await?;

        let events = self.db.events_by_club(club_id).await?;
        let mut annotated = Vec::new();

        for event in events {
            annotated.push(self.annotate(event).await?);
        }

        Ok(annotated)
    }

    /// Creates an event. The display name of the owning club is resolved
    /// here, clients never supply it.
    pub async fn create(&self, new_event: NewEvent) -> Result<AnnotatedEvent, DatabaseError> {
        let club = self.db.club_by_id(new_event.club_id).await?;
        let event = self.db.create_event(new_event, &club.name).await?;

        self.annotate(event).await
    }

    /// Applies a partial update. When the owning club changes, the display
    /// name is refreshed along with it.
    pub async fn update(&self, updated_event: UpdatedEvent) -> Result<AnnotatedEvent, DatabaseError> {
        let club = match updated_event.club_id {
            Some(club_id) => Some(self.db.club_by_id(club_id).await?.name),
            None => None,
        };

        let event = self
            .db
            .update_event(updated_event, club.as_deref())
            .await?;

        self.annotate(event).await
    }

    pub async fn delete(&self, event_id: PrimaryKey) -> Result<(), DatabaseError> {
        self.db.delete_event(event_id).await
    }

    /// Records a guestlist submission. Capacity is not enforced here,
    /// overbooking shows up as negative spots at read time.
    pub async fn book(&self, new_booking: NewBooking) -> Result<BookingData, DatabaseError> {
        self.db.create_booking(new_booking).await
    }

    async fn annotate(&self, event: EventData) -> Result<AnnotatedEvent, DatabaseError> {
        let bookings = self.db.bookings_for_event(event.id).await?;
        let guestlist = GuestlistSummary::new(event.guestlist_limit, &bookings);

        Ok(AnnotatedEvent { event, guestlist })
    }
}
