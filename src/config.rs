use std::fs::read_to_string;
use std::path::Path;

use chrono::NaiveDate;
use yaml_rust2::{Yaml, YamlLoader};

use crate::error::SeedError;
use crate::game::{GameRecord, DATE_FORMAT};

pub const DEFAULT_ENDPOINT: &str = "http://13.51.114.181:5274/games";

/// Largest integer an `f64` holds without rounding.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// What the seeder does when a request never gets a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run; later records are not sent.
    #[default]
    Abort,
    /// Report the failure and move on to the next record.
    Continue,
}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub endpoint: String,
    pub records: Vec<GameRecord>,
    pub on_transport_failure: FailurePolicy,
}

impl SeedConfig {
    pub fn new(endpoint: impl Into<String>, records: Vec<GameRecord>) -> Self {
        Self {
            endpoint: endpoint.into(),
            records,
            on_transport_failure: FailurePolicy::default(),
        }
    }

    /// The catalog that ships with the binary.
    pub fn builtin() -> Result<Self, SeedError> {
        let games = [
            ("Tekken 7", 1, 29.99, "2017-06-02"),
            ("Street Fighter V", 1, 19.99, "2016-02-16"),
            ("Final Fantasy XIV", 2, 9.99, "2011-11-18"),
            ("The Witcher 3: Wild Hunt", 2, 39.99, "2015-05-18"),
        ];

        let records = games
            .into_iter()
            .map(|(name, genre_id, price, date)| {
                GameRecord::new(name, genre_id, price, parse_date(date)?)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(DEFAULT_ENDPOINT, records))
    }

    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let contents = read_to_string(path).map_err(|source| SeedError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&contents)
    }

    // endpoint: http://localhost:5274/games
    // continue_on_failure: false
    // games:
    //   - name: Tekken 7
    //     genreId: 1
    //     price: 29.99
    //     releaseDate: 2017-06-02
    pub fn from_yaml_str(source: &str) -> Result<Self, SeedError> {
        let docs = YamlLoader::load_from_str(source)?;
        let Some(doc) = docs.first() else {
            return Err(SeedError::Config("config file is empty".to_string()));
        };

        let endpoint = match &doc["endpoint"] {
            Yaml::BadValue => DEFAULT_ENDPOINT.to_string(),
            Yaml::String(url) => url.clone(),
            _ => return Err(SeedError::Config("`endpoint` must be a string".to_string())),
        };

        let on_transport_failure = match &doc["continue_on_failure"] {
            Yaml::BadValue | Yaml::Boolean(false) => FailurePolicy::Abort,
            Yaml::Boolean(true) => FailurePolicy::Continue,
            _ => {
                return Err(SeedError::Config(
                    "`continue_on_failure` must be true or false".to_string(),
                ))
            }
        };

        let Some(entries) = doc["games"].as_vec() else {
            return Err(SeedError::Config("`games` must be a list".to_string()));
        };

        let records = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| parse_game(i, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            endpoint,
            records,
            on_transport_failure,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_transport_failure = policy;
        self
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, SeedError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| SeedError::Record(format!("bad release date {date:?}: {e}")))
}

fn parse_game(index: usize, entry: &Yaml) -> Result<GameRecord, SeedError> {
    let missing = |key: &str| SeedError::Config(format!("games[{index}]: missing or invalid `{key}`"));

    let name = entry["name"].as_str().ok_or_else(|| missing("name"))?;

    let genre_id = entry["genreId"]
        .as_i64()
        .and_then(|id| u32::try_from(id).ok())
        .ok_or_else(|| missing("genreId"))?;

    // `10` parses as an integer, `9.99` as a real
    let price = match &entry["price"] {
        Yaml::Integer(p) if p.unsigned_abs() <= MAX_EXACT_INTEGER => *p as f64,
        Yaml::Integer(_) => return Err(missing("price")),
        other => other.as_f64().ok_or_else(|| missing("price"))?,
    };

    let date = entry["releaseDate"]
        .as_str()
        .ok_or_else(|| missing("releaseDate"))?;

    GameRecord::new(name, genre_id, price, parse_date(date)?)
}
