/// Row models shared by the managers
///
/// Column aliases in the queries match these field names; the structs
/// double as wire DTOs and serialize in camelCase.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User record. The password digest never leaves the manager layer; the
/// public projection is `users::UserResponse`.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Title listing / movie search row. The `bookmark_id` and `user_rating`
/// columns come from per-user joins and stay NULL for anonymous callers.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSummaryRow {
    pub title_id: String,
    pub primary_title: Option<String>,
    pub title_type: Option<String>,
    pub genres: Option<String>,
    pub average_rating: f64,
    pub num_votes: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<i16>,
}

/// Actor search / listing row. `frequency` is populated only by the
/// co-players lookup.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRow {
    pub name_id: String,
    pub primary_name: Option<String>,
    pub birth_year: Option<String>,
    pub death_year: Option<String>,
    pub primary_profession: Option<String>,
    pub weighted_rating: f64,
    pub total_votes: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<i32>,
}

/// Bookmark row joined with the title name
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRow {
    pub bookmark_id: i64,
    pub title_id: String,
    pub title_name: String,
    pub bookmarked_at: DateTime<Utc>,
}

/// Rating history row joined with the title name
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRow {
    pub rating_history_id: i64,
    pub title_id: String,
    pub title_name: String,
    pub rating: i16,
    pub rated_at: DateTime<Utc>,
}

/// Row from `exact_match_titles`
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactMatchRow {
    pub title_id: String,
    pub primary_title: Option<String>,
}

/// Row from `best_match_titles`
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMatchRow {
    pub title_id: String,
    pub primary_title: Option<String>,
    pub matched_count: i32,
    pub matched_words: Vec<String>,
}

/// Word/frequency pair from `person_words` and `keyword_word_list`
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordFrequencyRow {
    pub word: String,
    pub frequency: i64,
}

/// Flat actor entry for UI select widgets
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorDropdownRow {
    pub name_id: String,
    pub primary_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_row_hides_absent_user_columns() {
        let row = TitleSummaryRow {
            title_id: "tt0000001".to_string(),
            primary_title: Some("Carmencita".to_string()),
            title_type: Some("short".to_string()),
            genres: Some("Documentary,Short".to_string()),
            average_rating: 5.7,
            num_votes: 2132,
            bookmark_id: None,
            user_rating: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["titleId"], "tt0000001");
        assert!(json.get("bookmarkId").is_none());
        assert!(json.get("userRating").is_none());
    }

    #[test]
    fn title_row_exposes_user_overlay_when_present() {
        let row = TitleSummaryRow {
            title_id: "tt0000001".to_string(),
            primary_title: None,
            title_type: None,
            genres: None,
            average_rating: 0.0,
            num_votes: 0,
            bookmark_id: Some(7),
            user_rating: Some(9),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["bookmarkId"], 7);
        assert_eq!(json["userRating"], 9);
    }
}
