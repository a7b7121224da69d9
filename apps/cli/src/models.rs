use serde::{Deserialize, Serialize};

/// The cover-letter template. The application only ever works with the
/// first stored record, but the store itself imposes no cardinality limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub text: String,
}

/// One saved job-application question together with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
}

/// Personal info used to build generation prompts. All fields are free text;
/// `years_of_experience` is intentionally not a bounded integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub job_title: String,
    pub years_of_experience: String,
    pub skills: String,
}

/// A record that has been persisted. The id is assigned by the store on
/// insert and is immutable afterwards; payload types carry no id at all, so
/// an unsaved record cannot be updated or deleted by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: i64,
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(id: i64, record: T) -> Self {
        Self { id, record }
    }
}
