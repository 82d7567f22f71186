//! Contestant and Role data structures.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a contestant (used in queues, pairs and lookups).
pub type ContestantId = Uuid;

/// Which side of the partnership a contestant dances. Leads only battle leads, follows only follows.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Lead,
    Follow,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Lead, Role::Follow];

    /// Plural label ("leads" / "follows").
    pub fn plural(self) -> &'static str {
        match self {
            Role::Lead => "leads",
            Role::Follow => "follows",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Lead => write!(f, "lead"),
            Role::Follow => write!(f, "follow"),
        }
    }
}

/// A contestant in the battle. `points` counts round wins.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Contestant {
    pub id: ContestantId,
    pub name: String,
    pub points: u32,
}

impl Contestant {
    /// Create a new contestant with the given name and no points.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_points(name, 0)
    }

    /// Create a contestant carrying an existing point total (e.g. re-imported standings).
    pub fn with_points(name: impl Into<String>, points: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            points,
        }
    }

    /// Record a round win.
    pub fn add_point(&mut self) {
        self.points += 1;
    }
}

impl fmt::Display for Contestant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.points)
    }
}
