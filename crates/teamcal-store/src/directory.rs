//! User and room directory contract.
//!
//! The directory is only consulted to validate that invited user ids exist
//! and to resolve an invited group id to a display name; the scheduling
//! algorithms themselves never touch it.

use serde::{Deserialize, Serialize};

use teamcal_core::{RoomId, UserId};

/// A known user in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    /// The user's id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

/// A known room in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRoom {
    /// The room's id.
    pub id: RoomId,
    /// Display name.
    pub name: String,
}

/// Source of the known users and rooms.
pub trait Directory {
    /// Returns all known users.
    fn list_users(&self) -> Vec<DirectoryUser>;

    /// Returns all known rooms.
    fn list_rooms(&self) -> Vec<DirectoryRoom>;

    /// Returns true if a user with the given id exists.
    fn user_exists(&self, id: &UserId) -> bool {
        self.list_users().iter().any(|u| u.id == *id)
    }

    /// Resolves a room id to its display name.
    fn room_name(&self, id: &RoomId) -> Option<String> {
        self.list_rooms()
            .into_iter()
            .find(|r| r.id == *id)
            .map(|r| r.name)
    }
}

/// A directory backed by fixed lists.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: Vec<DirectoryUser>,
    rooms: Vec<DirectoryRoom>,
}

impl StaticDirectory {
    /// Creates a directory from fixed user and room lists.
    pub fn new(users: Vec<DirectoryUser>, rooms: Vec<DirectoryRoom>) -> Self {
        Self { users, rooms }
    }

    /// Creates a directory containing only the given user ids.
    ///
    /// Names and emails are derived from the id; handy in tests.
    pub fn with_user_ids<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<UserId>,
    {
        let users = ids
            .into_iter()
            .map(|id| {
                let id = id.into();
                DirectoryUser {
                    name: id.as_str().to_owned(),
                    email: format!("{id}@example.com"),
                    id,
                }
            })
            .collect();
        Self {
            users,
            rooms: Vec::new(),
        }
    }
}

impl Directory for StaticDirectory {
    fn list_users(&self) -> Vec<DirectoryUser> {
        self.users.clone()
    }

    fn list_rooms(&self) -> Vec<DirectoryRoom> {
        self.rooms.clone()
    }
}
