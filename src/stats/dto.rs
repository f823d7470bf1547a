use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub books: i64,
    pub users: i64,
    pub reviews: i64,
    pub genres: i64,
    pub tutorials: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: StatsData,
}
