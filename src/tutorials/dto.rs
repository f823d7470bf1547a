use serde::{Deserialize, Serialize};

use super::repo::Tutorial;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTutorialRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub youtube_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTutorialRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub youtube_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TutorialResponse {
    pub message: String,
    pub tutorial: Tutorial,
}

#[derive(Debug, Serialize)]
pub struct TutorialListResponse {
    pub tutorials: Vec<Tutorial>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn tutorial_serializes_camel_case() {
        let tutorial = Tutorial {
            id: Uuid::new_v4(),
            title: "Intro".into(),
            description: None,
            youtube_url: "https://youtu.be/abc".into(),
            is_active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&tutorial).unwrap();
        assert_eq!(json["youtubeUrl"], "https://youtu.be/abc");
        assert_eq!(json["isActive"], true);
        assert!(json.get("youtube_url").is_none());
    }

    #[test]
    fn update_request_reads_is_active_flag() {
        let req: UpdateTutorialRequest = serde_json::from_str(r#"{"isActive":false}"#).unwrap();
        assert_eq!(req.is_active, Some(false));
        assert!(req.title.is_none());
    }
}
