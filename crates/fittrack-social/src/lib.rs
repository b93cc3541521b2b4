//! Friends and friend requests for FitTrack.

pub mod json_store;
pub mod memory;
pub mod service;
pub mod store;
pub mod types;

pub use json_store::JsonFileFriendStore;
pub use memory::InMemoryFriendStore;
pub use service::FriendsService;
pub use store::{FriendStore, FriendStoreError, FriendStoreResult};
pub use types::{Friend, FriendRequest, NewFriendRequest, Person};
