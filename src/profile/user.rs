use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player profile as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub high_score: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            high_score: 0,
            created_at,
        }
    }

    /// Lookup key; names are unique ignoring case
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_serialized_field_names() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut user = User::new("Alice", created);
        user.high_score = 70;

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["highScore"], 70);
        assert_eq!(json["createdAt"], "2024-03-01T12:00:00Z");
        assert_eq!(user.key(), "alice");
    }
}
