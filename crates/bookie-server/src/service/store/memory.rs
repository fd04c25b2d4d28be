//! In-process identity store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bookie_postgres::types::Role;
use jiff::Timestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Identity, IdentityPatch, IdentityStore, NewIdentity, Page, PageRequest, normalize_email,
};
use crate::service::auth::{AuthError, AuthResult};
use crate::utility::tracing_targets::IDENTITY_STORE as TRACING_TARGET;

/// Identity store kept in memory behind a [`RwLock`].
///
/// Enforces the same uniqueness rules as the relational store. Contents are
/// lost when the process exits. Cheap to clone; clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    identities: Arc<RwLock<HashMap<Uuid, Identity>>>,
}

impl MemoryIdentityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_collision(
    identities: &HashMap<Uuid, Identity>,
    except: Option<Uuid>,
    email: &str,
    username: Option<&str>,
) -> AuthResult<()> {
    for existing in identities.values() {
        if Some(existing.id) == except {
            continue;
        }
        if existing.email == email {
            return Err(AuthError::AlreadyExists("email"));
        }
        if username.is_some() && existing.username.as_deref() == username {
            return Err(AuthError::AlreadyExists("username"));
        }
    }

    Ok(())
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Identity>> {
        let email = normalize_email(email);
        let identities = self.identities.read().await;
        Ok(identities.values().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Identity>> {
        Ok(self.identities.read().await.get(&id).cloned())
    }

    async fn insert(&self, new_identity: NewIdentity) -> AuthResult<Identity> {
        let NewIdentity {
            email,
            password_hash,
            role,
            profile,
        } = new_identity;

        let email = normalize_email(&email);
        let username = profile.username.map(|u| u.trim().to_owned());

        let mut identities = self.identities.write().await;
        check_collision(&identities, None, &email, username.as_deref())?;

        let now = Timestamp::now();
        let identity = Identity {
            id: Uuid::now_v7(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            other_names: profile.other_names,
            username,
            email,
            phone: profile.phone,
            date_of_birth: profile.date_of_birth,
            address: profile.address,
            city: profile.city,
            country: profile.country,
            role,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        identities.insert(identity.id, identity.clone());
        tracing::debug!(target: TRACING_TARGET, identity_id = %identity.id, "Identity created");
        Ok(identity)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> AuthResult<Option<Identity>> {
        let mut identities = self.identities.write().await;
        let Some(identity) = identities.get_mut(&id) else {
            return Ok(None);
        };

        identity.role = role;
        identity.updated_at = Timestamp::now();
        Ok(Some(identity.clone()))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: IdentityPatch,
    ) -> AuthResult<Option<Identity>> {
        let mut identities = self.identities.write().await;
        let Some(current) = identities.get(&id) else {
            return Ok(None);
        };

        let email = patch
            .email
            .as_deref()
            .map(normalize_email)
            .unwrap_or_else(|| current.email.clone());
        let username = match patch.profile.username.as_deref() {
            Some(username) => Some(username.trim().to_owned()),
            None => current.username.clone(),
        };
        check_collision(&identities, Some(id), &email, username.as_deref())?;

        let Some(identity) = identities.get_mut(&id) else {
            return Ok(None);
        };

        let profile = patch.profile;
        identity.email = email;
        identity.username = username;
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = profile.$field {
                    identity.$field = Some(value);
                })*
            };
        }
        apply!(
            first_name,
            last_name,
            other_names,
            phone,
            date_of_birth,
            address,
            city,
            country
        );
        identity.updated_at = Timestamp::now();

        Ok(Some(identity.clone()))
    }

    async fn list(&self, page: PageRequest) -> AuthResult<Page<Identity>> {
        let identities = self.identities.read().await;

        let mut items: Vec<&Identity> = identities.values().collect();
        items.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));

        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let items = items
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total: identities.len() as u64,
        })
    }

    async fn delete(&self, id: Uuid) -> AuthResult<bool> {
        Ok(self.identities.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::store::IdentityProfile;

    fn new_identity(email: &str, username: Option<&str>) -> NewIdentity {
        NewIdentity {
            email: email.into(),
            password_hash: "hash".into(),
            role: Role::User,
            profile: IdentityProfile {
                username: username.map(Into::into),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn insert_and_find() -> anyhow::Result<()> {
        let store = MemoryIdentityStore::new();
        let created = store.insert(new_identity(" Ada@Example.com", None)).await?;

        assert_eq!(created.email, "ada@example.com");
        assert_eq!(store.find_by_email("ADA@example.com").await?, Some(created.clone()));
        assert_eq!(store.find_by_id(created.id).await?, Some(created));
        assert_eq!(store.find_by_id(Uuid::now_v7()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_and_username() -> anyhow::Result<()> {
        let store = MemoryIdentityStore::new();
        store.insert(new_identity("a@b.com", Some("ada"))).await?;

        let result = store.insert(new_identity("A@B.com", None)).await;
        assert!(matches!(result, Err(AuthError::AlreadyExists("email"))));

        let result = store.insert(new_identity("c@d.com", Some("ada"))).await;
        assert!(matches!(result, Err(AuthError::AlreadyExists("username"))));

        assert_eq!(store.list(PageRequest { limit: 10, offset: 0 }).await?.total, 1);
        Ok(())
    }

    #[tokio::test]
    async fn patch_keeps_unset_fields() -> anyhow::Result<()> {
        let store = MemoryIdentityStore::new();
        let mut new = new_identity("a@b.com", None);
        new.profile.city = Some("Lagos".into());
        let created = store.insert(new).await?;

        let patch = IdentityPatch {
            profile: IdentityProfile {
                first_name: Some("Ada".into()),
                country: Some(String::new()),
                ..Default::default()
            },
            ..Default::default()
        };
        let updated = store.update_profile(created.id, patch).await?.unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Ada"));
        assert_eq!(updated.country.as_deref(), Some(""));
        assert_eq!(updated.city.as_deref(), Some("Lagos"));
        Ok(())
    }

    #[tokio::test]
    async fn patch_collision_excludes_self() -> anyhow::Result<()> {
        let store = MemoryIdentityStore::new();
        let first = store.insert(new_identity("a@b.com", Some("ada"))).await?;
        store.insert(new_identity("c@d.com", Some("grace"))).await?;

        let same = IdentityPatch {
            email: Some("a@b.com".into()),
            ..Default::default()
        };
        assert!(store.update_profile(first.id, same).await?.is_some());

        let taken = IdentityPatch {
            profile: IdentityProfile {
                username: Some("grace".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = store.update_profile(first.id, taken).await;
        assert!(matches!(result, Err(AuthError::AlreadyExists("username"))));
        Ok(())
    }

    #[tokio::test]
    async fn role_list_and_delete() -> anyhow::Result<()> {
        let store = MemoryIdentityStore::new();
        let first = store.insert(new_identity("a@b.com", None)).await?;
        let second = store.insert(new_identity("c@d.com", None)).await?;

        let promoted = store.update_role(second.id, Role::Admin).await?.unwrap();
        assert_eq!(promoted.role, Role::Admin);

        let page = store.list(PageRequest { limit: 1, offset: 1 }).await?;
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, second.id);

        assert!(store.delete(first.id).await?);
        assert!(!store.delete(first.id).await?);
        assert!(store.update_role(first.id, Role::Admin).await?.is_none());
        Ok(())
    }
}
