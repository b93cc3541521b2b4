use serde::{Deserialize, Serialize};

/// A user shown in the friends views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: avatar.into(),
        }
    }
}

/// An accepted friend.
pub type Friend = Person;

/// A pending incoming friend request.
pub type FriendRequest = Person;

/// Details for a new outgoing request; the id is assigned on send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFriendRequest {
    pub name: String,
    pub avatar: String,
}

/// Friends present before anything has been stored.
pub fn seed_friends() -> Vec<Friend> {
    vec![
        Person::new("u_alice", "Alice Johnson", "https://i.pravatar.cc/150?img=10"),
        Person::new("u_ben", "Ben Kumar", "https://i.pravatar.cc/150?img=11"),
    ]
}

/// Pending requests present before anything has been stored.
pub fn seed_requests() -> Vec<FriendRequest> {
    vec![
        Person::new("r_olivia", "Olivia Ray", "https://i.pravatar.cc/150?img=20"),
        Person::new("r_marcus", "Marcus Lee", "https://i.pravatar.cc/150?img=21"),
    ]
}
