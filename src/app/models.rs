use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl User {
    /// Sample record served by the demo endpoints.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            id: 1,
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
        }
    }

    #[must_use]
    pub fn directory() -> Vec<Self> {
        ["Alice", "Bob", "Charlie"]
            .iter()
            .zip(1u64..)
            .map(|(name, id)| Self {
                id,
                name: (*name).to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
            })
            .collect()
    }
}
