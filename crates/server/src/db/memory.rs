//! Volatile in-memory repositories.
//!
//! Back the `memory` store backend and double as the test store. State lives
//! behind `tokio::sync::RwLock`, so concurrent requests see consistent data;
//! nothing survives a restart.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use userdir_core::{ProfileId, Username};

use super::accounts::{AccountRepository, NewAccount};
use super::profiles::{
    NewProfile, ProfileChanges, ProfileListQuery, ProfileRepository, SortField, SortOrder,
};
use super::RepositoryError;
use crate::models::{Account, Profile};

/// In-memory account store.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountRepository {
    /// Create an empty account store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut accounts = self.accounts.write().await;

        // Uniqueness by linear scan, under the write lock.
        if accounts
            .iter()
            .any(|a| a.username == account.username || a.email == account.email)
        {
            return Err(RepositoryError::Conflict(
                "username or email already exists".to_owned(),
            ));
        }

        let now = Utc::now();
        let created = Account {
            id: account.id,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        accounts.push(created.clone());

        Ok(created)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, RepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| &a.username == username).cloned())
    }
}

/// In-memory profile store.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<Vec<Profile>>,
}

impl InMemoryProfileRepository {
    /// Create an empty profile store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Ordering of two profiles under a sort field, ascending.
fn compare(a: &Profile, b: &Profile, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Email => a.email.as_str().cmp(b.email.as_str()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn create(&self, profile: NewProfile) -> Result<Profile, RepositoryError> {
        let now = Utc::now();
        let created = Profile {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            created_at: now,
            updated_at: now,
        };

        self.profiles.write().await.push(created.clone());
        Ok(created)
    }

    async fn list(&self, query: &ProfileListQuery) -> Result<Vec<Profile>, RepositoryError> {
        let profiles = self.profiles.read().await;

        let mut page: Vec<Profile> = profiles.clone();
        page.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort_by);
            match query.sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        let skip = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(page.into_iter().skip(skip).take(take).collect())
    }

    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn update(
        &self,
        id: ProfileId,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, RepositoryError> {
        let mut profiles = self.profiles.write().await;

        let Some(profile) = profiles.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            profile.name = name;
        }
        if let Some(email) = changes.email {
            profile.email = email;
        }
        if let Some(phone) = changes.phone {
            profile.phone = Some(phone);
        }
        profile.updated_at = Utc::now();

        Ok(Some(profile.clone()))
    }

    async fn delete(&self, id: ProfileId) -> Result<bool, RepositoryError> {
        let mut profiles = self.profiles.write().await;
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        Ok(profiles.len() < before)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use userdir_core::{Email, UserId};

    use super::*;

    fn new_profile(name: &str, email: &str) -> NewProfile {
        NewProfile {
            id: ProfileId::generate(),
            name: name.to_owned(),
            email: Email::parse(email).unwrap(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryProfileRepository::new();
        let created = repo
            .create(NewProfile {
                phone: Some("555-0100".to_owned()),
                ..new_profile("Ada Lovelace", "ada@example.com")
            })
            .await
            .unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Ada Lovelace");
        assert_eq!(fetched.email.as_str(), "ada@example.com");
        assert_eq!(fetched.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn update_replaces_only_provided_fields() {
        let repo = InMemoryProfileRepository::new();
        let created = repo
            .create(new_profile("Ada Lovelace", "ada@example.com"))
            .await
            .unwrap();

        let updated = repo
            .update(
                created.id,
                ProfileChanges {
                    name: Some("Ada King".to_owned()),
                    ..ProfileChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Ada King");
        assert_eq!(updated.email.as_str(), "ada@example.com");
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn update_missing_profile_returns_none() {
        let repo = InMemoryProfileRepository::new();
        let result = repo
            .update(ProfileId::generate(), ProfileChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_record_existed() {
        let repo = InMemoryProfileRepository::new();
        let created = repo
            .create(new_profile("Ada Lovelace", "ada@example.com"))
            .await
            .unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pagination_returns_remainder_on_last_page() {
        let repo = InMemoryProfileRepository::new();
        for i in 0..15 {
            repo.create(new_profile(
                &format!("user-{i:02}"),
                &format!("user{i:02}@example.com"),
            ))
            .await
            .unwrap();
        }

        let page2 = repo
            .list(&ProfileListQuery {
                page: 2,
                limit: 10,
                ..ProfileListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page2.len(), 5);

        let page3 = repo
            .list(&ProfileListQuery {
                page: 3,
                limit: 10,
                ..ProfileListQuery::default()
            })
            .await
            .unwrap();
        assert!(page3.is_empty());
    }

    #[tokio::test]
    async fn sorts_by_name_descending() {
        let repo = InMemoryProfileRepository::new();
        for name in ["bob", "alice", "carol"] {
            repo.create(new_profile(name, &format!("{name}@example.com")))
                .await
                .unwrap();
        }

        let listed = repo
            .list(&ProfileListQuery {
                sort_by: SortField::Name,
                sort_order: SortOrder::Descending,
                ..ProfileListQuery::default()
            })
            .await
            .unwrap();

        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["carol", "bob", "alice"]);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let repo = InMemoryAccountRepository::new();
        let account = NewAccount {
            id: UserId::generate(),
            username: Username::parse("alice77").unwrap(),
            email: Email::parse("alice@example.com").unwrap(),
            password_hash: "hash".to_owned(),
        };

        repo.create(account.clone()).await.unwrap();

        let duplicate = NewAccount {
            id: UserId::generate(),
            email: Email::parse("other@example.com").unwrap(),
            ..account
        };
        let err = repo.create(duplicate).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
