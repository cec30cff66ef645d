//! Fixtures over an in-memory store for unit tests.

use gather_db::Database;
use uuid::Uuid;

pub(crate) struct Fixture {
    pub db: Database,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            db: Database::open_in_memory().unwrap(),
        }
    }

    pub fn user(&self, username: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.db.create_user(&id, username, username, "hash").unwrap();
        id
    }

    pub fn group(&self, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.db.create_group(&id, name).unwrap();
        id
    }

    /// A new user who belongs to `group`.
    pub fn member(&self, group: &str, username: &str) -> String {
        let id = self.user(username);
        self.join(group, &id);
        id
    }

    pub fn join(&self, group: &str, user: &str) {
        self.db.add_member(group, user).unwrap();
    }

    pub fn leave(&self, group: &str, user: &str) {
        assert!(self.db.remove_member(group, user).unwrap());
    }

    pub fn interest(&self, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.db.create_interest(&id, name, true, false, true).unwrap();
        id
    }

    pub fn likes(&self, user: &str, interests: &[&String]) {
        let ids: Vec<String> = interests.iter().map(|i| i.to_string()).collect();
        self.db.add_user_interests(user, &ids).unwrap();
    }
}
