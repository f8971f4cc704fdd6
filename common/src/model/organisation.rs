use serde::{Deserialize, Serialize};

/// Root tenant scope. Owns card templates and forms; deleting it removes both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}
