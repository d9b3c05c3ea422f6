use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Media kind, tagged once when a catalog record is ingested.
///
/// TV records carry a `first_air_date` field; that check happens in
/// [`MediaItem::from_catalog`] and nowhere else.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

/// Detail screens the app can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    MovieDetail { movie_id: u64 },
    TvShowDetail { show_id: u64 },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub release_date: Option<String>,
    pub overview: String,
}

impl MediaItem {
    /// Builds an item from one raw catalog record, or `None` when the
    /// record has no usable id or title.
    ///
    /// Movie records carry `title` and `release_date`; TV records carry
    /// `name` and `first_air_date`. Either title field is accepted for
    /// either kind, matching the catalog's mixed trending feeds.
    pub fn from_catalog(raw: &Value) -> Option<Self> {
        let id = raw["id"].as_u64()?;
        let kind = if raw.get("first_air_date").is_some() {
            MediaKind::TvShow
        } else {
            MediaKind::Movie
        };
        let title = raw["title"]
            .as_str()
            .or_else(|| raw["name"].as_str())?
            .to_string();
        let release_date = raw["release_date"]
            .as_str()
            .or_else(|| raw["first_air_date"].as_str())
            .map(|s| s.to_string());
        Some(MediaItem {
            id,
            kind,
            title,
            backdrop_path: raw["backdrop_path"].as_str().map(|s| s.to_string()),
            vote_average: raw["vote_average"].as_f64().unwrap_or(0.0),
            release_date,
            overview: raw["overview"].as_str().unwrap_or("").to_string(),
        })
    }

    /// The detail screen for this item, decided by its kind tag alone.
    pub fn detail_route(&self) -> Route {
        match self.kind {
            MediaKind::Movie => Route::MovieDetail { movie_id: self.id },
            MediaKind::TvShow => Route::TvShowDetail { show_id: self.id },
        }
    }

    /// Rating as displayed on the banner, rounded to one decimal.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }
}
