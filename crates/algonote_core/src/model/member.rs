use crate::model::ids::MemberId;
use serde::{Deserialize, Serialize};

/// Registered user who can author notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub nickname: String,
}
