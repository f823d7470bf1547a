use serde::{Deserialize, Serialize};

use super::repo::Genre;

#[derive(Debug, Deserialize)]
pub struct GenreNameRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenreResponse {
    pub message: String,
    pub genre: Genre,
}

#[derive(Debug, Serialize)]
pub struct GenreItemResponse {
    pub genre: Genre,
}

#[derive(Debug, Serialize)]
pub struct GenreListResponse {
    pub genres: Vec<Genre>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn genre_serializes_with_camel_case_timestamps() {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: "Fiction".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(GenreItemResponse { genre }).unwrap();
        assert_eq!(json["genre"]["name"], "Fiction");
        assert!(json["genre"]["createdAt"].is_string());
        assert!(json["genre"]["updatedAt"].is_string());
        assert!(json["genre"].get("created_at").is_none());
    }

    #[test]
    fn name_request_tolerates_missing_field() {
        let req: GenreNameRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none());
    }
}
