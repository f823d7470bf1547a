use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::BookWithGenreRow;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Genre id the book belongs to.
    pub genre: Option<Uuid>,
    pub description: Option<String>,
    /// Base64 or data-URI encoded cover image.
    pub cover_file: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<Uuid>,
    pub description: Option<String>,
    pub cover_file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenreBrief {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub genre: GenreBrief,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<BookWithGenreRow> for BookView {
    fn from(r: BookWithGenreRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            author: r.author,
            description: r.description,
            cover_image: r.cover_image,
            genre: GenreBrief {
                id: r.genre_id,
                name: r.genre_name,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub message: String,
    pub book: BookView,
}

#[derive(Debug, Serialize)]
pub struct BookItemResponse {
    pub book: BookView,
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub books: Vec<BookView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> BookWithGenreRow {
        BookWithGenreRow {
            id: Uuid::new_v4(),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            description: "Sand.".into(),
            cover_image: "https://img.local/dune.jpg".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
            genre_id: Uuid::new_v4(),
            genre_name: "Sci-Fi".into(),
        }
    }

    #[test]
    fn book_view_nests_its_genre() {
        let row = sample_row();
        let genre_id = row.genre_id;
        let json = serde_json::to_value(BookView::from(row)).unwrap();
        assert_eq!(json["genre"]["name"], "Sci-Fi");
        assert_eq!(json["genre"]["id"], genre_id.to_string());
        assert_eq!(json["coverImage"], "https://img.local/dune.jpg");
        assert!(json.get("genre_id").is_none());
    }

    #[test]
    fn create_request_reads_camel_case_fields() {
        let req: CreateBookRequest = serde_json::from_str(
            r#"{"title":"T","author":"A","genre":"7f4df3a2-88a1-4f08-9b1c-4a5d0a3c9f6e","description":"D","coverFile":"aGk="}"#,
        )
        .unwrap();
        assert_eq!(req.title.as_deref(), Some("T"));
        assert!(req.genre.is_some());
        assert!(req.cover_file.is_some());
    }

    #[test]
    fn create_request_rejects_malformed_genre_id() {
        let result = serde_json::from_str::<CreateBookRequest>(r#"{"genre":"not-a-uuid"}"#);
        assert!(result.is_err());
    }
}
