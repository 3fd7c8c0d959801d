use serde::{Deserialize, Serialize};

/// Referent for person_id on attendance and leave rows. Account handling
/// lives outside this core; only existence matters here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
}
