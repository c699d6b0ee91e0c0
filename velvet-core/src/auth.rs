use argon2::{
    password_hash::{Encoding, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::rngs::OsRng;
use std::sync::Arc;
use thiserror::Error;

use crate::{
    Database, DatabaseError, Identity, NewUser, PrimaryKey, TokenError, TokenService, UserData,
};

pub struct Auth<Db> {
    db: Arc<Db>,
    tokens: TokenService,
    argon: Argon2<'static>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password is incorrect. Deliberately covers unknown emails
    /// too, so callers can't probe which accounts exist.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Something else went wrong with the database
    #[error(transparent)]
    Db(DatabaseError),
    #[error("HashError: {0}")]
    HashError(String),
    #[error(transparent)]
    Token(TokenError),
}

/// A user along with a freshly issued session token
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user: UserData,
    pub token: String,
}

impl<Db> Auth<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>, tokens: TokenService) -> Self {
        Self {
            db: db.clone(),
            tokens,
            argon: Argon2::default(),
        }
    }

    /// Creates a regular account with email credentials
    pub async fn register(&self, new_user: NewRegistration) -> Result<AuthenticatedUser, AuthError> {
        let hashed_password = self.hash_password(&new_user.password)?;

        let user = self
            .db
            .create_user(NewUser {
                email: Some(new_user.email),
                phone: new_user.phone,
                password: Some(hashed_password),
                name: new_user.name,
                admin: false,
            })
            .await
            .map_err(AuthError::Db)?;

        self.with_token(user)
    }

    /// Logs in a user, returning them with a new session token
    pub async fn login(&self, credentials: Credentials) -> Result<AuthenticatedUser, AuthError> {
        let user = self
            .db
            .user_by_email(&credentials.email)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound {
                    resource: _,
                    identifier: _,
                } => AuthError::InvalidCredentials,
                err => AuthError::Db(err),
            })?;

        // Phone-auth accounts have no password to check against
        let stored = user
            .password
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        let stored_password = PasswordHash::parse(stored, Encoding::default())
            .map_err(|e| AuthError::HashError(e.to_string()))?;

        self.argon
            .verify_password(credentials.password.as_bytes(), &stored_password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        self.with_token(user)
    }

    /// Finds or creates an account by phone number. The number itself is
    /// verified upstream by the identity provider, velvet trusts it as-is.
    pub async fn phone_auth(&self, phone: &str, name: &str) -> Result<AuthenticatedUser, AuthError> {
        let user = match self.db.user_by_phone(phone).await {
            Ok(user) if user.name != name => self
                .db
                .update_user_name(user.id, name)
                .await
                .map_err(AuthError::Db)?,
            Ok(user) => user,
            Err(DatabaseError::NotFound {
                resource: _,
                identifier: _,
            }) => self
                .db
                .create_user(NewUser {
                    email: None,
                    phone: Some(phone.to_string()),
                    password: None,
                    name: name.to_string(),
                    admin: false,
                })
                .await
                .map_err(AuthError::Db)?,
            Err(e) => return Err(AuthError::Db(e)),
        };

        self.with_token(user)
    }

    /// Returns the user a verified token belongs to
    pub async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData, DatabaseError> {
        self.db.user_by_id(user_id).await
    }

    /// Verifies a bearer token. Stateless, no database roundtrip happens.
    pub fn verify_token(&self, token: &str) -> Result<Identity, TokenError> {
        self.tokens.verify(token)
    }

    pub(crate) fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Ok(self
            .argon
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    fn with_token(&self, user: UserData) -> Result<AuthenticatedUser, AuthError> {
        let token = self
            .tokens
            .issue(user.id, user.admin)
            .map_err(AuthError::Token)?;

        Ok(AuthenticatedUser { user, token })
    }
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct NewRegistration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryDatabase;

    fn auth() -> Auth<MemoryDatabase> {
        let db = Arc::new(MemoryDatabase::default());
        Auth::new(&db, TokenService::new("test-secret"))
    }

    fn registration(email: &str) -> NewRegistration {
        NewRegistration {
            email: email.to_string(),
            password: "hunter22hunter22".to_string(),
            name: "Guest".to_string(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn registered_users_can_log_in() {
        let auth = auth();

        auth.register(registration("a@b.c")).await.expect("registers");

        let result = auth
            .login(Credentials {
                email: "a@b.c".to_string(),
                password: "hunter22hunter22".to_string(),
            })
            .await
            .expect("logs in");

        assert_eq!(result.user.email.as_deref(), Some("a@b.c"));
        assert!(!result.token.is_empty());
    }

    #[tokio::test]
    async fn registering_the_same_email_twice_conflicts() {
        let auth = auth();

        auth.register(registration("a@b.c")).await.expect("registers");
        let second = auth.register(registration("a@b.c")).await;

        assert!(matches!(
            second,
            Err(AuthError::Db(DatabaseError::Conflict { .. }))
        ));
    }

    #[tokio::test]
    async fn wrong_passwords_and_unknown_emails_are_indistinguishable() {
        let auth = auth();

        auth.register(registration("a@b.c")).await.expect("registers");

        let wrong_password = auth
            .login(Credentials {
                email: "a@b.c".to_string(),
                password: "not-the-password".to_string(),
            })
            .await;

        let unknown_email = auth
            .login(Credentials {
                email: "nobody@b.c".to_string(),
                password: "hunter22hunter22".to_string(),
            })
            .await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn phone_auth_creates_then_reuses_the_account() {
        let auth = auth();

        let first = auth.phone_auth("+15550100", "Dana").await.expect("creates");
        let second = auth
            .phone_auth("+15550100", "Dana Q")
            .await
            .expect("finds existing");

        assert_eq!(first.user.id, second.user.id);
        // The name follows whatever the provider last reported
        assert_eq!(second.user.name, "Dana Q");
        assert!(second.user.password.is_none());
    }

    #[tokio::test]
    async fn issued_tokens_carry_the_user_identity() {
        let auth = auth();

        let result = auth.register(registration("a@b.c")).await.expect("registers");
        let identity = auth.verify_token(&result.token).expect("verifies");

        assert_eq!(identity.user_id, result.user.id);
        assert!(!identity.admin);
    }
}
