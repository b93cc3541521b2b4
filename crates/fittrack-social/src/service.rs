//! Friend-request workflow.
//!
//! Every mutation is computed on a copy, persisted, and only then committed
//! to memory, so the in-memory lists always match what the store holds.

use parking_lot::Mutex;

use crate::store::{FriendStore, FriendStoreError, FriendStoreResult};
use crate::types::{seed_friends, seed_requests, Friend, FriendRequest, NewFriendRequest, Person};

#[derive(Debug, Clone)]
struct Lists {
    friends: Vec<Friend>,
    requests: Vec<FriendRequest>,
}

pub struct FriendsService<S: FriendStore> {
    store: S,
    lists: Mutex<Lists>,
}

impl<S: FriendStore> FriendsService<S> {
    /// Load both lists from `store`, falling back to the seed lists for
    /// whichever one has never been stored.
    pub fn new(store: S) -> FriendStoreResult<Self> {
        let friends = store.load_friends()?.unwrap_or_else(seed_friends);
        let requests = store.load_requests()?.unwrap_or_else(seed_requests);
        tracing::debug!(
            "Loaded {} friends and {} pending requests",
            friends.len(),
            requests.len()
        );

        Ok(Self {
            store,
            lists: Mutex::new(Lists { friends, requests }),
        })
    }

    pub fn friends(&self) -> Vec<Friend> {
        self.lists.lock().friends.clone()
    }

    pub fn requests(&self) -> Vec<FriendRequest> {
        self.lists.lock().requests.clone()
    }

    /// Queue a new request. Returns the request with its assigned id.
    pub fn send_request(&self, target: NewFriendRequest) -> FriendStoreResult<FriendRequest> {
        let name = target.name.trim();
        if name.is_empty() {
            return Err(FriendStoreError::validation("name cannot be empty"));
        }

        self.mutate(|lists| {
            let request = Person::new(next_request_id(&lists.requests), name, target.avatar.trim());
            lists.requests.push(request.clone());
            tracing::info!("Sent friend request {} to {}", request.id, request.name);
            Ok(request)
        })
    }

    /// Accept a pending request: the person joins the friends list and the
    /// request is removed.
    pub fn accept_request(&self, request_id: &str) -> FriendStoreResult<Friend> {
        self.mutate(|lists| {
            let index = position(&lists.requests, request_id)?;
            let person = lists.requests.remove(index);
            lists.friends.push(person.clone());
            tracing::info!("Accepted friend request {} from {}", request_id, person.name);
            Ok(person)
        })
    }

    /// Decline a pending request: it is removed and nothing else changes.
    pub fn decline_request(&self, request_id: &str) -> FriendStoreResult<FriendRequest> {
        self.mutate(|lists| {
            let index = position(&lists.requests, request_id)?;
            let person = lists.requests.remove(index);
            tracing::info!("Declined friend request {} from {}", request_id, person.name);
            Ok(person)
        })
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut Lists) -> FriendStoreResult<T>) -> FriendStoreResult<T> {
        let mut lists = self.lists.lock();
        let mut next = lists.clone();
        let out = f(&mut next)?;
        self.store.save(&next.friends, &next.requests)?;
        *lists = next;
        Ok(out)
    }
}

fn position(requests: &[FriendRequest], request_id: &str) -> FriendStoreResult<usize> {
    requests
        .iter()
        .position(|r| r.id == request_id)
        .ok_or_else(|| FriendStoreError::not_found(request_id))
}

/// `r_<unix millis>`, bumped past any id already pending.
fn next_request_id(existing: &[FriendRequest]) -> String {
    let mut millis = chrono::Utc::now().timestamp_millis();
    loop {
        let id = format!("r_{}", millis);
        if !existing.iter().any(|r| r.id == id) {
            return id;
        }
        millis += 1;
    }
}
