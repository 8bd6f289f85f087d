//! User identity model.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

string_id!(
    /// Opaque unique user identifier issued by the authentication provider.
    UserId
);

/// A project participant.
///
/// Users are immutable once fetched. Equality and hashing consider the id
/// only, so a renamed user is still the same participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::{User, UserId};
    use std::collections::HashSet;

    #[test]
    fn identity_ignores_display_name() {
        let before = User::new("u1", "Maria");
        let after = User::new("u1", "Maria S.");
        assert_eq!(before, after);

        let set: HashSet<User> = [before, after].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn blank_ids_are_detected() {
        assert!(UserId::new("  ").is_blank());
        assert!(!UserId::new("u1").is_blank());
    }
}
