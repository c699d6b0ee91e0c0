use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json,
};
use log::info;
use velvet_core::{NewClub, PrimaryKey, UpdatedClub};

use crate::{
    auth::AdminSession,
    errors::ServerResult,
    schemas::{NewClubSchema, UpdateClubSchema, ValidatedJson},
    serialized::{Club, ClubCredentials, Event, ToSerialized},
    Router, ServerContext,
};

#[utoipa::path(
    get,
    path = "/clubs",
    tag = "clubs",
    responses(
        (status = 200, body = Vec<Club>)
    )
)]
pub(crate) async fn list_clubs(State(context): State<ServerContext>) -> ServerResult<Json<Vec<Club>>> {
    let clubs = context.app.clubs.list().await?;

    Ok(Json(clubs.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/clubs/{id}",
    tag = "clubs",
    responses(
        (status = 200, body = Club),
        (status = 404, description = "Club does not exist")
    )
)]
pub(crate) async fn club(
    State(context): State<ServerContext>,
    Path(club_id): Path<PrimaryKey>,
) -> ServerResult<Json<Club>> {
    let club = context.app.clubs.by_id(club_id).await?;

    Ok(Json(club.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/clubs",
    tag = "clubs",
    request_body = NewClubSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = Club)
    )
)]
pub(crate) async fn create_club(
    _admin: AdminSession,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewClubSchema>,
) -> ServerResult<(StatusCode, Json<Club>)> {
    let club = context
        .app
        .clubs
        .create(NewClub {
            name: body.name,
            location: body.location,
            address: body.address,
            map_url: body.map_url,
            description: body.description,
            image_url: body.image_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(club.to_serialized())))
}

#[utoipa::path(
    put,
    path = "/clubs/{id}",
    tag = "clubs",
    request_body = UpdateClubSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Club),
        (status = 404, description = "Club does not exist")
    )
)]
pub(crate) async fn update_club(
    _admin: AdminSession,
    State(context): State<ServerContext>,
    Path(club_id): Path<PrimaryKey>,
    ValidatedJson(body): ValidatedJson<UpdateClubSchema>,
) -> ServerResult<Json<Club>> {
    let club = context
        .app
        .clubs
        .update(UpdatedClub {
            id: club_id,
            name: body.name,
            location: body.location,
            address: body.address,
            map_url: body.map_url,
            description: body.description,
            image_url: body.image_url,
        })
        .await?;

    Ok(Json(club.to_serialized()))
}

#[utoipa::path(
    delete,
    path = "/clubs/{id}",
    tag = "clubs",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Club was deleted"),
        (status = 404, description = "Club does not exist")
    )
)]
pub(crate) async fn delete_club(
    admin: AdminSession,
    State(context): State<ServerContext>,
    Path(club_id): Path<PrimaryKey>,
) -> ServerResult<()> {
    context.app.clubs.delete(club_id).await?;

    info!("Club {} deleted by user {}", club_id, admin.0.user_id());

    Ok(())
}

#[utoipa::path(
    get,
    path = "/clubs/{id}/events",
    tag = "clubs",
    responses(
        (status = 200, body = Vec<Event>),
        (status = 404, description = "Club does not exist")
    )
)]
pub(crate) async fn club_events(
    State(context): State<ServerContext>,
    Path(club_id): Path<PrimaryKey>,
) -> ServerResult<Json<Vec<Event>>> {
    let events = context.app.events.by_club(club_id).await?;

    Ok(Json(events.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/clubs/{id}/credentials",
    tag = "clubs",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = ClubCredentials),
        (status = 404, description = "Club does not exist")
    )
)]
pub(crate) async fn create_credentials(
    _admin: AdminSession,
    State(context): State<ServerContext>,
    Path(club_id): Path<PrimaryKey>,
) -> ServerResult<Json<ClubCredentials>> {
    let credentials = context.app.clubs.generate_credentials(club_id).await?;

    Ok(Json(credentials.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_clubs))
        .route("/", post(create_club))
        .route("/:id", get(club))
        .route("/:id", put(update_club))
        .route("/:id", delete(delete_club))
        .route("/:id/events", get(club_events))
        .route("/:id/credentials", post(create_credentials))
}
