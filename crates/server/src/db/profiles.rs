//! Profile repository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use userdir_core::{Email, ProfileId};

use super::RepositoryError;
use crate::models::Profile;

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Maximum page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Field a profile listing can be sorted by.
///
/// Kept as a closed enum: both backends honor exactly these fields, and the
/// SQL backend interpolates the corresponding column name into `ORDER BY`,
/// which must never come from raw caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Name,
    Email,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// The column name used by the SQL backend.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

/// Listing sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// The keyword used by the SQL backend.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Validated pagination and sorting parameters for a profile listing.
#[derive(Debug, Clone, Copy)]
pub struct ProfileListQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size, at most [`MAX_PAGE_SIZE`].
    pub limit: u32,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ProfileListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl ProfileListQuery {
    /// Number of records to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Data needed to insert a new profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: ProfileId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
}

/// Partial update: only present fields are replaced.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
}

/// Store of profile records.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert a new profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    async fn create(&self, profile: NewProfile) -> Result<Profile, RepositoryError>;

    /// List profiles with pagination and sorting. No total count is computed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list(&self, query: &ProfileListQuery) -> Result<Vec<Profile>, RepositoryError>;

    /// Fetch one profile, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError>;

    /// Replace the provided fields of a profile.
    ///
    /// Returns `None` if the profile does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    async fn update(
        &self,
        id: ProfileId,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, RepositoryError>;

    /// Delete a profile.
    ///
    /// Returns `true` if a record was deleted, `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    async fn delete(&self, id: ProfileId) -> Result<bool, RepositoryError>;
}

/// `PostgreSQL`-backed profile repository.
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw `user_profile` row.
#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = RepositoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: ProfileId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn create(&self, profile: NewProfile) -> Result<Profile, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r"
            INSERT INTO user_profile (id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, created_at, updated_at
            ",
        )
        .bind(profile.id.as_uuid())
        .bind(&profile.name)
        .bind(profile.email.as_str())
        .bind(profile.phone.as_deref())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list(&self, query: &ProfileListQuery) -> Result<Vec<Profile>, RepositoryError> {
        // The sort column comes from the SortField enum, never from raw input.
        let sql = format!(
            "SELECT id, name, email, phone, created_at, updated_at \
             FROM user_profile \
             ORDER BY {} {} \
             LIMIT $1 OFFSET $2",
            query.sort_by.column(),
            query.sort_order.sql()
        );

        let rows = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(i64::from(query.limit))
            .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r"
            SELECT id, name, email, phone, created_at, updated_at
            FROM user_profile
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(
        &self,
        id: ProfileId,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r"
            UPDATE user_profile
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, phone, created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(changes.name.as_deref())
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(changes.phone.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete(&self, id: ProfileId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM user_profile WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn offset_skips_previous_pages() {
        let query = ProfileListQuery {
            page: 2,
            limit: 10,
            ..ProfileListQuery::default()
        };
        assert_eq!(query.offset(), 10);

        let first = ProfileListQuery::default();
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn sort_field_parses_api_names() {
        assert_eq!("createdAt".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert!("password_hash".parse::<SortField>().is_err());
    }

    #[test]
    fn sort_field_columns_are_fixed() {
        assert_eq!(SortField::CreatedAt.column(), "created_at");
        assert_eq!(SortField::UpdatedAt.column(), "updated_at");
    }
}
