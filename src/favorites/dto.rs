use serde::{Deserialize, Serialize};

/// Body of `POST /favorites/:user_id/bulk`. Individual entries may be null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFavoritesRequest {
    #[serde(default)]
    pub event_ids: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub event_id: String,
    pub saved: bool,
}
