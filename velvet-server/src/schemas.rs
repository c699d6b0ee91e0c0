use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;
use velvet_core::GuestlistStatus;

use crate::errors::ServerError;

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterSchema {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 64))]
    pub password: String,
    #[validate(length(min = 2, max = 128))]
    pub name: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginSchema {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 64))]
    pub password: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhoneAuthSchema {
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    #[validate(length(min = 2, max = 128))]
    pub name: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewClubSchema {
    #[validate(length(min = 2, max = 128))]
    pub name: String,
    #[validate(length(min = 2, max = 256))]
    pub location: String,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(url)]
    pub map_url: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateClubSchema {
    #[validate(length(min = 2, max = 128))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 256))]
    pub location: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(url)]
    pub map_url: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewEventSchema {
    pub club_id: i32,
    #[validate(length(min = 2, max = 256))]
    pub title: String,
    #[validate(length(min = 2, max = 256))]
    pub location: String,
    #[validate(length(min = 2, max = 4096))]
    pub description: String,
    #[validate(length(max = 4096))]
    pub rules: Option<String>,
    #[validate(length(min = 2, max = 64))]
    pub genre: String,
    #[validate(url)]
    pub image_url: String,
    #[validate(url)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[validate(range(min = 0))]
    pub price: i32,
    #[validate(length(min = 1, max = 64))]
    pub price_label: String,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 32))]
    pub start_time: String,
    #[validate(length(min = 1, max = 32))]
    pub end_time: String,
    #[serde(default)]
    #[schema(value_type = String)]
    pub guestlist_status: GuestlistStatus,
    #[validate(range(min = 1))]
    pub guestlist_limit: Option<i32>,
    #[validate(range(min = 0))]
    pub closing_threshold: Option<i32>,
    pub guestlist_close_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub guestlist_close_on_start: bool,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEventSchema {
    pub club_id: Option<i32>,
    #[validate(length(min = 2, max = 256))]
    pub title: Option<String>,
    #[validate(length(min = 2, max = 256))]
    pub location: Option<String>,
    #[validate(length(min = 2, max = 4096))]
    pub description: Option<String>,
    #[validate(length(max = 4096))]
    pub rules: Option<String>,
    #[validate(length(min = 2, max = 64))]
    pub genre: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
    pub gallery: Option<Vec<String>>,
    #[validate(range(min = 0))]
    pub price: Option<i32>,
    #[validate(length(min = 1, max = 64))]
    pub price_label: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 32))]
    pub start_time: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub end_time: Option<String>,
    #[schema(value_type = Option<String>)]
    pub guestlist_status: Option<GuestlistStatus>,
    #[validate(range(min = 1))]
    pub guestlist_limit: Option<i32>,
    #[validate(range(min = 0))]
    pub closing_threshold: Option<i32>,
    pub guestlist_close_time: Option<DateTime<Utc>>,
    pub guestlist_close_on_start: Option<bool>,
    pub featured: Option<bool>,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewBookingSchema {
    #[validate(range(min = 0))]
    pub couples: i32,
    #[validate(range(min = 0))]
    pub ladies: i32,
    #[validate(range(min = 0))]
    pub stags: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    /// Case-insensitive genre filter, "all" disables it
    pub genre: Option<String>,
    /// Only events from today onward
    pub upcoming: Option<bool>,
    pub featured: Option<bool>,
}

pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extracted_json: Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;

        extracted_json
            .0
            .validate()
            .map_err(ServerError::Validation)?;

        Ok(Self(extracted_json.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrations_need_a_real_email_and_a_long_password() {
        let valid: RegisterSchema = serde_json::from_value(serde_json::json!({
            "email": "guest@example.com",
            "password": "longenough",
            "name": "Guest",
        }))
        .expect("payload parses");

        assert!(valid.validate().is_ok());

        let bad_email: RegisterSchema = serde_json::from_value(serde_json::json!({
            "email": "not-an-email",
            "password": "longenough",
            "name": "Guest",
        }))
        .expect("payload parses");

        let violations = bad_email.validate().expect_err("validation fails");
        assert!(violations.field_errors().contains_key("email"));

        let short_password: RegisterSchema = serde_json::from_value(serde_json::json!({
            "email": "guest@example.com",
            "password": "short",
            "name": "Guest",
        }))
        .expect("payload parses");

        assert!(short_password.validate().is_err());
    }

    #[test]
    fn event_image_urls_must_be_well_formed() {
        let event: NewEventSchema = serde_json::from_value(serde_json::json!({
            "clubId": 1,
            "title": "Saturday Social",
            "location": "Lower Parel",
            "description": "Weekly social",
            "genre": "house",
            "imageUrl": "not a url",
            "price": 500,
            "priceLabel": "per couple",
            "date": "2024-06-01",
            "startTime": "10 PM",
            "endTime": "3 AM",
        }))
        .expect("payload parses");

        let violations = event.validate().expect_err("validation fails");
        assert!(violations.field_errors().contains_key("image_url"));
    }

    #[test]
    fn unknown_guestlist_statuses_are_rejected_at_parse_time() {
        let result = serde_json::from_value::<NewEventSchema>(serde_json::json!({
            "clubId": 1,
            "title": "Saturday Social",
            "location": "Lower Parel",
            "description": "Weekly social",
            "genre": "house",
            "imageUrl": "https://cdn.example.com/social.jpg",
            "price": 500,
            "priceLabel": "per couple",
            "date": "2024-06-01",
            "startTime": "10 PM",
            "endTime": "3 AM",
            "guestlistStatus": "paused",
        }));

        assert!(result.is_err());
    }

    #[test]
    fn bookings_reject_negative_counts() {
        let booking: NewBookingSchema = serde_json::from_value(serde_json::json!({
            "couples": -1,
            "ladies": 0,
            "stags": 0,
        }))
        .expect("payload parses");

        assert!(booking.validate().is_err());
    }
}
