use crate::BookingData;

/// Derived guestlist metrics for a single event.
///
/// This is a read-time projection, recomputed on every read since bookings
/// can change between reads. Nothing here enforces capacity at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestlistSummary {
    pub total_guests: i32,
    /// None when the event has no guestlist limit. Goes negative when the
    /// event is overbooked, the value is reported as-is.
    pub spots_remaining: Option<i32>,
}

impl GuestlistSummary {
    pub fn new(guestlist_limit: Option<i32>, bookings: &[BookingData]) -> Self {
        let total_guests = total_guests(bookings);

        Self {
            total_guests,
            spots_remaining: guestlist_limit.map(|limit| limit - total_guests),
        }
    }
}

/// Every couple counts as two guests, ladies and stags as one each
pub fn total_guests(bookings: &[BookingData]) -> i32 {
    bookings
        .iter()
        .map(|b| b.couples * 2 + b.ladies + b.stags)
        .sum()
}
