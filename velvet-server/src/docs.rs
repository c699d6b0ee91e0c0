use std::borrow::BorrowMut;

use axum::{response::IntoResponse, Json};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{auth, clubs, events, schemas, serialized, uploads};

#[derive(OpenApi)]
#[openapi(
    modifiers(&Security),
    info(
        description = "velvet-server exposes endpoints to browse clubs and events and to manage guestlists"
    ),
    paths(
        auth::register,
        auth::login,
        auth::phone_auth,
        auth::me,
        clubs::list_clubs,
        clubs::club,
        clubs::create_club,
        clubs::update_club,
        clubs::delete_club,
        clubs::club_events,
        clubs::create_credentials,
        events::list_events,
        events::event,
        events::create_event,
        events::update_event,
        events::delete_event,
        events::create_booking,
        uploads::upload,
    ),
    components(schemas(
        serialized::User,
        serialized::AuthResult,
        serialized::Club,
        serialized::ClubCredentials,
        serialized::Event,
        serialized::Booking,
        serialized::Upload,
        schemas::RegisterSchema,
        schemas::LoginSchema,
        schemas::PhoneAuthSchema,
        schemas::NewClubSchema,
        schemas::UpdateClubSchema,
        schemas::NewEventSchema,
        schemas::UpdateEventSchema,
        schemas::NewBookingSchema,
    ))
)]
pub struct ApiDoc;

struct Security;

impl Modify for Security {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.borrow_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("Bearer <token>")
                .build();

            components.add_security_scheme("BearerAuth", SecurityScheme::Http(scheme))
        }
    }
}

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
