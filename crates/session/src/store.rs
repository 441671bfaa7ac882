use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use lumiere_core::{DomainError, DomainResult, SessionId};

use crate::cart::Cart;
use crate::wishlist::Wishlist;

/// One shopper's cart and wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            cart: Cart::default(),
            wishlist: Wishlist::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Session storage abstraction.
///
/// `update` applies a mutation atomically: when the closure fails, the stored
/// session is left untouched.
pub trait SessionStore: Send + Sync {
    fn create(&self) -> Session;
    fn get(&self, id: SessionId) -> Option<Session>;
    fn update(
        &self,
        id: SessionId,
        f: &mut dyn FnMut(&mut Session) -> DomainResult<()>,
    ) -> DomainResult<Session>;
    fn remove(&self, id: SessionId) -> bool;
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn create(&self) -> Session {
        (**self).create()
    }

    fn get(&self, id: SessionId) -> Option<Session> {
        (**self).get(id)
    }

    fn update(
        &self,
        id: SessionId,
        f: &mut dyn FnMut(&mut Session) -> DomainResult<()>,
    ) -> DomainResult<Session> {
        (**self).update(id, f)
    }

    fn remove(&self, id: SessionId) -> bool {
        (**self).remove(id)
    }
}

/// Idle time after which an untouched session is dropped.
pub const DEFAULT_IDLE_TTL_SECS: i64 = 24 * 60 * 60;

/// In-memory session store (sessions are ephemeral).
///
/// Sessions idle for longer than `idle_ttl` (measured from `updated_at`) are
/// pruned whenever a new session is created.
#[derive(Debug)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<SessionId, Session>>,
    idle_ttl: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::seconds(DEFAULT_IDLE_TTL_SECS))
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop sessions idle for longer than the TTL as of `now`; returns how
    /// many were removed.
    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        match self.inner.write() {
            Ok(mut map) => prune(&mut map, now, self.idle_ttl),
            Err(_) => 0,
        }
    }
}

fn prune(map: &mut HashMap<SessionId, Session>, now: DateTime<Utc>, idle_ttl: Duration) -> usize {
    let before = map.len();
    map.retain(|_, s| now.signed_duration_since(s.updated_at) <= idle_ttl);
    before - map.len()
}

impl SessionStore for InMemorySessionStore {
    fn create(&self) -> Session {
        let now = Utc::now();
        let session = Session::new(SessionId::new(), now);
        if let Ok(mut map) = self.inner.write() {
            let pruned = prune(&mut map, now, self.idle_ttl);
            if pruned > 0 {
                tracing::debug!(pruned, remaining = map.len(), "idle sessions pruned");
            }
            map.insert(session.id, session.clone());
        }
        tracing::debug!(session_id = %session.id, "session created");
        session
    }

    fn get(&self, id: SessionId) -> Option<Session> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn update(
        &self,
        id: SessionId,
        f: &mut dyn FnMut(&mut Session) -> DomainResult<()>,
    ) -> DomainResult<Session> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("session store lock poisoned"))?;
        let stored = map
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("session {id}")))?;

        let mut draft = stored.clone();
        f(&mut draft)?;
        draft.updated_at = Utc::now();
        *stored = draft.clone();
        Ok(draft)
    }

    fn remove(&self, id: SessionId) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(&id).is_some(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_catalog::Product;
    use lumiere_core::ProductId;

    fn product(id: &str) -> Product {
        Product::new(ProductId::parse(id).unwrap(), "Night Cream", "Skincare", 650.0, 4.7)
    }

    #[test]
    fn create_then_get() {
        let store = InMemorySessionStore::new();
        let session = store.create();
        assert_eq!(store.get(session.id), Some(session.clone()));
        assert!(session.cart.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_persists_successful_mutations() {
        let store = InMemorySessionStore::new();
        let id = store.create().id;
        let cream = product("cream");

        let updated = store
            .update(id, &mut |s| {
                s.cart.add(&cream, 2, Utc::now())?;
                s.wishlist.toggle(cream.id.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(updated.cart.item_count(), 2);
        assert_eq!(store.get(id).unwrap(), updated);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[test]
    fn failed_update_leaves_session_untouched() {
        let store = InMemorySessionStore::new();
        let id = store.create().id;
        let cream = product("cream");
        let before = store.get(id).unwrap();

        let err = store
            .update(id, &mut |s| {
                s.wishlist.toggle(cream.id.clone());
                s.cart.add(&cream, 0, Utc::now())?;
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.get(id).unwrap(), before);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let store = Arc::new(InMemorySessionStore::new());
        let err = store.update(SessionId::new(), &mut |_| Ok(())).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(store.get(SessionId::new()).is_none());
    }

    #[test]
    fn remove_deletes_session() {
        let store = InMemorySessionStore::new();
        let id = store.create().id;
        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.is_empty());
    }

    #[test]
    fn creating_a_session_evicts_idle_ones() {
        let store = InMemorySessionStore::with_idle_ttl(Duration::zero());
        let stale = store.create().id;
        std::thread::sleep(std::time::Duration::from_millis(5));
        let fresh = store.create().id;

        assert!(store.get(stale).is_none());
        assert!(store.get(fresh).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn prune_idle_keeps_recent_sessions() {
        let store = InMemorySessionStore::with_idle_ttl(Duration::hours(1));
        let first = store.create();
        let second = store.create();

        assert_eq!(store.prune_idle(first.created_at + Duration::minutes(30)), 0);
        assert_eq!(store.len(), 2);

        assert_eq!(store.prune_idle(second.updated_at + Duration::hours(2)), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn default_ttl_is_one_day() {
        assert_eq!(InMemorySessionStore::new().idle_ttl(), Duration::hours(24));
    }

    #[test]
    fn session_snapshot_serializes() {
        let store = InMemorySessionStore::new();
        let id = store.create().id;
        let cream = product("cream");
        let session = store
            .update(id, &mut |s| s.cart.add(&cream, 1, Utc::now()).map(|_| ()))
            .unwrap();

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["cart"]["lines"][0]["product_id"], "cream");
        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }
}
