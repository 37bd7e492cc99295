use chrono::NaiveDate;
use json::JsonValue;

use crate::error::SeedError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct GameRecord {
    pub name: String,
    pub genre_id: u32,
    pub price: f64,
    pub release_date: NaiveDate,
}

impl GameRecord {
    pub fn new(
        name: impl Into<String>,
        genre_id: u32,
        price: f64,
        release_date: NaiveDate,
    ) -> Result<Self, SeedError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(SeedError::Record("name must not be empty".to_string()));
        }

        if !price.is_finite() || price < 0.0 {
            return Err(SeedError::Record(format!(
                "{name}: price must be a non-negative number, got {price}"
            )));
        }

        Ok(Self {
            name,
            genre_id,
            price,
            release_date,
        })
    }

    /// Wire shape expected by the `/games` endpoint.
    pub fn to_json(&self) -> JsonValue {
        let mut data = JsonValue::new_object();
        data["name"] = self.name.as_str().into();
        data["genreId"] = self.genre_id.into();
        data["price"] = self.price.into();
        data["releaseDate"] = self.release_date.format(DATE_FORMAT).to_string().into();
        data
    }

    pub fn body(&self) -> String {
        self.to_json().dump()
    }
}

impl PartialEq<Self> for GameRecord {
    fn eq(&self, other: &Self) -> bool {
        other.name == self.name
            && other.genre_id == self.genre_id
            && other.price == self.price
            && other.release_date == self.release_date
    }
}

impl std::fmt::Display for GameRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
