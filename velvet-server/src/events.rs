use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json,
};
use log::info;
use velvet_core::{EventFilter, NewBooking, NewEvent, PrimaryKey, UpdatedEvent};

use crate::{
    auth::AdminSession,
    errors::ServerResult,
    schemas::{
        ListEventsQuery, NewBookingSchema, NewEventSchema, UpdateEventSchema, ValidatedJson,
    },
    serialized::{Booking, Event, ToSerialized},
    Router, ServerContext,
};

#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(ListEventsQuery),
    responses(
        (status = 200, body = Vec<Event>)
    )
)]
pub(crate) async fn list_events(
    State(context): State<ServerContext>,
    Query(query): Query<ListEventsQuery>,
) -> ServerResult<Json<Vec<Event>>> {
    let filter = EventFilter {
        genre: query.genre,
        upcoming: query.upcoming.unwrap_or(false),
        featured: query.featured,
    };

    let events = context.app.events.list(filter).await?;

    Ok(Json(events.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    responses(
        (status = 200, body = Event),
        (status = 404, description = "Event does not exist")
    )
)]
pub(crate) async fn event(
    State(context): State<ServerContext>,
    Path(event_id): Path<PrimaryKey>,
) -> ServerResult<Json<Event>> {
    let event = context.app.events.by_id(event_id).await?;

    Ok(Json(event.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = NewEventSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = Event),
        (status = 404, description = "Owning club does not exist")
    )
)]
pub(crate) async fn create_event(
    _admin: AdminSession,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewEventSchema>,
) -> ServerResult<(StatusCode, Json<Event>)> {
    let event = context
        .app
        .events
        .create(NewEvent {
            club_id: body.club_id,
            title: body.title,
            location: body.location,
            description: body.description,
            rules: body.rules,
            genre: body.genre,
            image_url: body.image_url,
            video_url: body.video_url,
            gallery: body.gallery,
            price: body.price,
            price_label: body.price_label,
            date: body.date,
            start_time: body.start_time,
            end_time: body.end_time,
            guestlist_status: body.guestlist_status,
            guestlist_limit: body.guestlist_limit,
            closing_threshold: body.closing_threshold,
            guestlist_close_time: body.guestlist_close_time,
            guestlist_close_on_start: body.guestlist_close_on_start,
            featured: body.featured,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(event.to_serialized())))
}

#[utoipa::path(
    put,
    path = "/events/{id}",
    tag = "events",
    request_body = UpdateEventSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Event),
        (status = 404, description = "Event does not exist")
    )
)]
pub(crate) async fn update_event(
    _admin: AdminSession,
    State(context): State<ServerContext>,
    Path(event_id): Path<PrimaryKey>,
    ValidatedJson(body): ValidatedJson<UpdateEventSchema>,
) -> ServerResult<Json<Event>> {
    let event = context
        .app
        .events
        .update(UpdatedEvent {
            id: event_id,
            club_id: body.club_id,
            title: body.title,
            location: body.location,
            description: body.description,
            rules: body.rules,
            genre: body.genre,
            image_url: body.image_url,
            video_url: body.video_url,
            gallery: body.gallery,
            price: body.price,
            price_label: body.price_label,
            date: body.date,
            start_time: body.start_time,
            end_time: body.end_time,
            guestlist_status: body.guestlist_status,
            guestlist_limit: body.guestlist_limit,
            closing_threshold: body.closing_threshold,
            guestlist_close_time: body.guestlist_close_time,
            guestlist_close_on_start: body.guestlist_close_on_start,
            featured: body.featured,
        })
        .await?;

    Ok(Json(event.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "events",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Event was deleted"),
        (status = 404, description = "Event does not exist")
    )
)]
pub(crate) async fn delete_event(
    admin: AdminSession,
    State(context): State<ServerContext>,
    Path(event_id): Path<PrimaryKey>,
) -> ServerResult<()> {
    context.app.events.delete(event_id).await?;

    info!("Event {} deleted by user {}", event_id, admin.0.user_id());

    Ok(())
}

#[utoipa::path(
    post,
    path = "/events/{id}/bookings",
    tag = "events",
    request_body = NewBookingSchema,
    responses(
        (status = 201, body = Booking),
        (status = 404, description = "Event does not exist")
    )
)]
pub(crate) async fn create_booking(
    State(context): State<ServerContext>,
    Path(event_id): Path<PrimaryKey>,
    ValidatedJson(body): ValidatedJson<NewBookingSchema>,
) -> ServerResult<(StatusCode, Json<Booking>)> {
    let booking = context
        .app
        .events
        .book(NewBooking {
            event_id,
            couples: body.couples,
            ladies: body.ladies,
            stags: body.stags,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(booking.to_serialized())))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_events))
        .route("/", post(create_event))
        .route("/:id", get(event))
        .route("/:id", put(update_event))
        .route("/:id", delete(delete_event))
        .route("/:id/bookings", post(create_booking))
}
