use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use std::sync::Arc;

use crate::{
    util::random_base36, AuthError, ClubData, Database, DatabaseError, NewClub, PrimaryKey,
    UpdatedClub,
};

/// Domain suffix of generated portal logins
const PORTAL_EMAIL_DOMAIN: &str = "clubs.velvet.app";

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new("[^a-z0-9]").expect("pattern compiles");
}

pub struct ClubService<Db> {
    db: Arc<Db>,
    argon: Argon2<'static>,
}

/// Portal credentials as handed to the admin. The plaintext password exists
/// only in this value, the store keeps the hash.
#[derive(Debug)]
pub struct ClubCredentials {
    pub email: String,
    pub password: String,
}

impl<Db> ClubService<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self {
            db: db.clone(),
            argon: Argon2::default(),
        }
    }

    pub async fn list(&self) -> Result<Vec<ClubData>, DatabaseError> {
        self.db.list_clubs().await
    }

    pub async fn by_id(&self, club_id: PrimaryKey) -> Result<ClubData, DatabaseError> {
        self.db.club_by_id(club_id).await
    }

    pub async fn create(&self, new_club: NewClub) -> Result<ClubData, DatabaseError> {
        self.db.create_club(new_club).await
    }

    pub async fn update(&self, updated_club: UpdatedClub) -> Result<ClubData, DatabaseError> {
        self.db.update_club(updated_club).await
    }

    pub async fn delete(&self, club_id: PrimaryKey) -> Result<(), DatabaseError> {
        self.db.delete_club(club_id).await
    }

    /// Generates portal credentials for a club and stores the password
    /// hash. Returns the plaintext exactly once, it cannot be retrieved
    /// again afterwards.
    pub async fn generate_credentials(
        &self,
        club_id: PrimaryKey,
    ) -> Result<ClubCredentials, AuthError> {
        let club = self.db.club_by_id(club_id).await.map_err(AuthError::Db)?;

        let email = portal_email(&club.name);
        let password = portal_password();

        let salt = SaltString::generate(&mut OsRng);
        let hashed_password = self
            .argon
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        self.db
            .set_club_credentials(club_id, &email, &hashed_password)
            .await
            .map_err(AuthError::Db)?;

        Ok(ClubCredentials { email, password })
    }
}

/// Derives the synthetic portal login from the club's display name
fn portal_email(name: &str) -> String {
    let lowercased = name.to_lowercase();
    let local_part = NON_ALPHANUMERIC.replace_all(&lowercased, "");

    format!("{local_part}@{PORTAL_EMAIL_DOMAIN}")
}

/// Two base-36 fragments, the second upper-cased
fn portal_password() -> String {
    let first = random_base36(6);
    let second = random_base36(6).to_uppercase();

    format!("{first}{second}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_emails_strip_everything_but_alphanumerics() {
        assert_eq!(
            portal_email("The Velvet Room #1!"),
            "thevelvetroom1@clubs.velvet.app"
        );
    }

    #[test]
    fn portal_passwords_have_a_lower_and_an_upper_half() {
        let password = portal_password();

        assert_eq!(password.len(), 12);

        let (first, second) = password.split_at(6);
        assert!(first.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert!(second.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn generated_credentials_store_only_the_hash() {
        let db = Arc::new(crate::MemoryDatabase::default());
        let clubs = ClubService::new(&db);

        let club = clubs
            .create(NewClub {
                name: "Neon Attic".to_string(),
                location: "Lower Parel".to_string(),
                address: None,
                map_url: None,
                description: None,
                image_url: "https://cdn.example.com/neon.jpg".to_string(),
            })
            .await
            .expect("club is created");

        let credentials = clubs
            .generate_credentials(club.id)
            .await
            .expect("credentials are generated");

        let stored = clubs.by_id(club.id).await.expect("club is fetched");

        assert_eq!(stored.email.as_deref(), Some("neonattic@clubs.velvet.app"));
        let hash = stored.password.expect("hash is stored");
        assert_ne!(hash, credentials.password);
        assert!(hash.starts_with("$argon2"));
    }
}
