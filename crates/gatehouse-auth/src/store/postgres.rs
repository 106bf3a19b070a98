//! Store implementations backed by the Postgres repositories.

use async_trait::async_trait;

use gatehouse_core::result::AppResult;
use gatehouse_database::repositories::{IdentityRepository, SessionRepository};
use gatehouse_entity::identity::{Identity, NewIdentity, UserId};
use gatehouse_entity::session::Session;

use super::{IdentityStore, SessionStore};

#[async_trait]
impl SessionStore for SessionRepository {
    async fn insert(&self, session: &Session) -> AppResult<()> {
        SessionRepository::insert(self, session).await
    }

    async fn find_by_sid(&self, sid: &str) -> AppResult<Option<Session>> {
        SessionRepository::find_by_sid(self, sid).await
    }

    async fn delete_by_sid(&self, sid: &str) -> AppResult<bool> {
        SessionRepository::delete_by_sid(self, sid).await
    }
}

#[async_trait]
impl IdentityStore for IdentityRepository {
    async fn create(&self, data: &NewIdentity) -> AppResult<Identity> {
        IdentityRepository::create(self, data).await
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<Identity>> {
        IdentityRepository::find_by_login(self, login).await
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Identity>> {
        IdentityRepository::find_by_id(self, id).await
    }

    async fn update_role(&self, login: &str, role: &str) -> AppResult<bool> {
        IdentityRepository::update_role(self, login, role).await
    }
}
