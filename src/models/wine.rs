use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wine stored for a device.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Wine {
    pub id: Uuid,
    pub device_id: String,
    pub name: String,
    pub producer: Option<String>,
    pub varietal: Option<String>,
    pub vintage: Option<i32>,
    pub date_purchased: NaiveDate,
    pub best_drink_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub label_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /add_wine`: the scanned fields plus the user's edits.
///
/// Required fields default to empty so a missing key, or an empty date,
/// fails the required-field check rather than JSON decoding. The garde
/// rules only bound values that are present.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewWine {
    #[serde(default)]
    #[garde(length(max = 200))]
    pub device_id: String,

    #[serde(default)]
    #[garde(length(max = 300))]
    pub name: String,

    #[garde(skip)]
    pub producer: Option<String>,

    #[garde(skip)]
    pub varietal: Option<String>,

    #[garde(range(min = 1000, max = 9999))]
    pub vintage: Option<i32>,

    #[serde(default, deserialize_with = "empty_date_as_none")]
    #[garde(skip)]
    pub date_purchased: Option<NaiveDate>,

    #[serde(default, deserialize_with = "empty_date_as_none")]
    #[garde(skip)]
    pub best_drink_date: Option<NaiveDate>,

    #[garde(skip)]
    pub notes: Option<String>,

    #[garde(skip)]
    pub label_image_url: Option<String>,
}

impl NewWine {
    /// `device_id`, `name` and `date_purchased` are all present.
    pub fn has_required_fields(&self) -> bool {
        !self.device_id.is_empty() && !self.name.is_empty() && self.date_purchased.is_some()
    }
}

fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => date.parse::<NaiveDate>().map(Some).map_err(de::Error::custom),
    }
}

/// Query string of `GET /list_wines`.
#[derive(Debug, Deserialize)]
pub struct ListWinesParams {
    pub device_id: Option<String>,
}

/// `{ok, error?}` body returned by the wine handlers.
#[derive(Debug, Clone, Serialize)]
pub struct WineResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WineResponse {
    pub fn ok() -> Self {
        Self { ok: true, error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}
