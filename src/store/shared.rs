//! Thread-safe handle to a store
//!
//! Every operation takes the lock for its whole duration, so a `get` that
//! generates and stores a value is never observed half done.

use parking_lot::Mutex;
use std::sync::Arc;

use super::{GetArgs, MockStore, SetArgs};
use crate::error::Result;
use crate::value::Value;

/// Cloneable, lock-guarded [`MockStore`]
#[derive(Clone)]
pub struct SharedMockStore {
    inner: Arc<Mutex<MockStore>>,
}

impl SharedMockStore {
    pub fn new(store: MockStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn get(&self, args: GetArgs) -> Result<Value> {
        self.inner.lock().get(args)
    }

    pub fn set(&self, args: SetArgs) -> Result<()> {
        self.inner.lock().set(args)
    }

    /// Run several operations under one lock
    pub fn with<T>(&self, op: impl FnOnce(&mut MockStore) -> T) -> T {
        let mut store = self.inner.lock();
        op(&mut store)
    }
}

impl From<MockStore> for SharedMockStore {
    fn from(store: MockStore) -> Self {
        Self::new(store)
    }
}

impl std::fmt::Debug for SharedMockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Some(store) => f.debug_tuple("SharedMockStore").field(&*store).finish(),
            None => f.write_str("SharedMockStore(<locked>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use std::thread;

    #[test]
    fn test_concurrent_reads_agree() {
        let schema = Schema::from_sdl("type User { id: ID! name: String! age: Int! } type Query { viewer: User! }").unwrap();
        let shared = SharedMockStore::new(MockStore::new(schema));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .get(GetArgs::new("Query").field("viewer"))
                        .unwrap()
                })
            })
            .collect();

        let viewers: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(viewers.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(shared.with(|store| store.entity_count("User")), 1);
    }

    #[test]
    fn test_set_through_handle() {
        let schema = Schema::from_sdl("type User { id: ID! name: String! }").unwrap();
        let shared: SharedMockStore = MockStore::new(schema).into();
        shared
            .set(SetArgs::new("User", "u1").field("name").value("Alexandre"))
            .unwrap();
        let name = shared
            .get(GetArgs::new("User").key("u1").field("name"))
            .unwrap();
        assert_eq!(name, Value::from("Alexandre"));
    }
}
