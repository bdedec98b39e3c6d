use serde::{Deserialize, Serialize};

/// Profile resolved through the identity-lookup collaborator.
///
/// Users are owned by an external account subsystem; the ledger only reads
/// the fields it needs to render contributors and to notify goal owners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    /// `None` when the user has not chosen to expose a username.
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub email: String,
}
