use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    routing::{get, post},
    Json,
};
use velvet_core::{Credentials, Identity, NewRegistration, PrimaryKey};

use crate::{
    errors::{ServerError, ServerResult},
    schemas::{LoginSchema, PhoneAuthSchema, RegisterSchema, ValidatedJson},
    serialized::{AuthResult, ToSerialized, User},
    Router, ServerContext,
};

/// An authenticated request identity, derived entirely from the bearer
/// token. Authorizing a request never touches the database.
#[derive(Debug, Clone, Copy)]
pub struct Session(Identity);

impl Session {
    pub fn user_id(&self) -> PrimaryKey {
        self.0.user_id
    }

    pub fn require_admin(&self) -> Result<(), ServerError> {
        if self.0.admin {
            Ok(())
        } else {
            Err(ServerError::Forbidden)
        }
    }
}

#[async_trait]
impl FromRequestParts<ServerContext> for Session {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerContext,
    ) -> Result<Self, Self::Rejection> {
        let context = ServerContext::from_ref(state);

        // A missing header, a malformed header, and a bad token are
        // indistinguishable to the caller
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|x| x.to_str().ok())
            .ok_or(ServerError::Unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ServerError::Unauthenticated)?;

        let identity = context
            .app
            .auth
            .verify_token(token)
            .map_err(|_| ServerError::Unauthenticated)?;

        Ok(Self(identity))
    }
}

/// A [Session] that is also an admin. Resolves after authentication, a
/// non-admin identity is rejected with a forbidden error.
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<ServerContext> for AdminSession {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerContext,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;

        session.require_admin()?;

        Ok(Self(session))
    }
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterSchema,
    responses(
        (status = 201, body = AuthResult),
        (status = 409, description = "Email or phone is already registered")
    )
)]
pub(crate) async fn register(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<RegisterSchema>,
) -> ServerResult<(StatusCode, Json<AuthResult>)> {
    let result = context
        .app
        .auth
        .register(NewRegistration {
            email: body.email,
            password: body.password,
            name: body.name,
            phone: body.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(result.to_serialized())))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginSchema,
    responses(
        (status = 200, body = AuthResult),
        (status = 401, description = "Invalid credentials")
    )
)]
pub(crate) async fn login(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<LoginSchema>,
) -> ServerResult<Json<AuthResult>> {
    let result = context
        .app
        .auth
        .login(Credentials {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(result.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/auth/phone-auth",
    tag = "auth",
    request_body = PhoneAuthSchema,
    responses(
        (status = 200, body = AuthResult)
    )
)]
pub(crate) async fn phone_auth(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<PhoneAuthSchema>,
) -> ServerResult<Json<AuthResult>> {
    let result = context.app.auth.phone_auth(&body.phone, &body.name).await?;

    Ok(Json(result.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = User),
        (status = 404, description = "The user behind the token no longer exists")
    )
)]
pub(crate) async fn me(
    session: Session,
    State(context): State<ServerContext>,
) -> ServerResult<Json<User>> {
    let user = context.app.auth.user_by_id(session.user_id()).await?;

    Ok(Json(user.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/phone-auth", post(phone_auth))
        .route("/me", get(me))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_identities_pass_the_admin_gate() {
        let session = Session(Identity {
            user_id: 1,
            admin: true,
        });

        assert!(session.require_admin().is_ok());
    }

    #[test]
    fn non_admin_identities_are_forbidden() {
        let session = Session(Identity {
            user_id: 1,
            admin: false,
        });

        assert!(matches!(
            session.require_admin(),
            Err(ServerError::Forbidden)
        ));
    }
}
