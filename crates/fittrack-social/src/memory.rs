//! In-process friend store. Nothing survives the process.

use parking_lot::Mutex;

use crate::store::{FriendStore, FriendStoreResult};
use crate::types::Person;

#[derive(Debug, Default)]
struct Lists {
    friends: Option<Vec<Person>>,
    requests: Option<Vec<Person>>,
}

#[derive(Debug, Default)]
pub struct InMemoryFriendStore {
    lists: Mutex<Lists>,
}

impl InMemoryFriendStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FriendStore for InMemoryFriendStore {
    fn load_friends(&self) -> FriendStoreResult<Option<Vec<Person>>> {
        Ok(self.lists.lock().friends.clone())
    }

    fn load_requests(&self) -> FriendStoreResult<Option<Vec<Person>>> {
        Ok(self.lists.lock().requests.clone())
    }

    fn save(&self, friends: &[Person], requests: &[Person]) -> FriendStoreResult<()> {
        let mut lists = self.lists.lock();
        lists.friends = Some(friends.to_vec());
        lists.requests = Some(requests.to_vec());
        Ok(())
    }
}
