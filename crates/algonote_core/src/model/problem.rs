use crate::model::ids::ProblemId;
use serde::{Deserialize, Serialize};

/// Catalog problem a note can reference.
///
/// The id is the catalog number, supplied when the problem is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
}
