use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::config::{FailurePolicy, SeedConfig};
use crate::error::SeedError;
use crate::game::GameRecord;

/// Result of sending one record.
#[derive(Debug)]
pub enum Outcome {
    /// The endpoint answered. Any status counts, including 4xx and 5xx.
    Posted { name: String, status: StatusCode },
    /// No response was received.
    TransportFailure { name: String, cause: reqwest::Error },
}

impl Outcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Posted { name, .. } | Self::TransportFailure { name, .. } => name,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Posted { name, status } => {
                write!(f, "Posted {name} - Status: {}", status.as_u16())
            }
            Self::TransportFailure { name, cause } => write!(f, "Failed {name} - {cause}"),
        }
    }
}

pub struct Seeder {
    client: Client,
    config: SeedConfig,
}

impl Seeder {
    pub fn new(config: SeedConfig) -> Result<Self, SeedError> {
        // An unresponsive endpoint stalls the run rather than timing out.
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(SeedError::Client)?;

        Ok(Self { client, config })
    }

    pub const fn config(&self) -> &SeedConfig {
        &self.config
    }

    pub fn post(&self, record: &GameRecord) -> Result<StatusCode, reqwest::Error> {
        let body = record.body();
        log::debug!("POST {} {body}", self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        Ok(response.status())
    }

    /// Sends every record in declaration order, one request at a time.
    ///
    /// `report` sees each outcome as soon as it is known. Under
    /// [`FailurePolicy::Abort`] a transport failure is returned as an error
    /// instead, and none of the remaining records are sent.
    pub fn run(&self, mut report: impl FnMut(&Outcome)) -> Result<Vec<Outcome>, SeedError> {
        let mut outcomes = Vec::with_capacity(self.config.records.len());

        for record in &self.config.records {
            let outcome = match self.post(record) {
                Ok(status) => Outcome::Posted {
                    name: record.name.clone(),
                    status,
                },
                Err(source) => match self.config.on_transport_failure {
                    FailurePolicy::Abort => {
                        return Err(SeedError::Transport {
                            name: record.name.clone(),
                            source,
                        })
                    }
                    FailurePolicy::Continue => {
                        log::warn!("Request for {record} failed, continuing: {source}");
                        Outcome::TransportFailure {
                            name: record.name.clone(),
                            cause: source,
                        }
                    }
                },
            };

            report(&outcome);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::{Matcher, Server};
    use std::net::TcpListener;

    /// An address nothing is listening on.
    fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/games")
    }

    fn game(name: &str, genre_id: u32, price: f64) -> GameRecord {
        let date = NaiveDate::from_ymd_opt(2017, 6, 2).unwrap();
        GameRecord::new(name, genre_id, price, date).unwrap()
    }

    fn named(name: &str) -> Matcher {
        Matcher::PartialJsonString(format!(r#"{{"name":"{name}"}}"#))
    }

    #[test]
    fn posts_json_body_and_reports_status() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/games")
            .match_header("content-type", "application/json")
            .match_body(
                r#"{"name":"Tekken 7","genreId":1,"price":29.99,"releaseDate":"2017-06-02"}"#,
            )
            .with_status(201)
            .expect(1)
            .create();

        let config = SeedConfig::new(
            format!("{}/games", server.url()),
            vec![game("Tekken 7", 1, 29.99)],
        );

        let mut lines = Vec::new();
        let outcomes = Seeder::new(config)
            .unwrap()
            .run(|o| lines.push(o.to_string()))
            .unwrap();

        mock.assert();
        assert_eq!(lines, ["Posted Tekken 7 - Status: 201"]);
        assert_eq!(outcomes.len(), 1);
    }

    #[test]
    fn server_error_does_not_stop_the_run() {
        let mut server = Server::new();
        let mocks: Vec<_> = [("A", 201), ("B", 500), ("C", 201)]
            .into_iter()
            .map(|(name, status)| {
                server
                    .mock("POST", "/games")
                    .match_body(named(name))
                    .with_status(status)
                    .expect(1)
                    .create()
            })
            .collect();

        let config = SeedConfig::new(
            format!("{}/games", server.url()),
            vec![game("A", 1, 1.0), game("B", 1, 2.0), game("C", 2, 3.0)],
        );

        let mut lines = Vec::new();
        Seeder::new(config)
            .unwrap()
            .run(|o| lines.push(o.to_string()))
            .unwrap();

        for mock in &mocks {
            mock.assert();
        }
        assert_eq!(
            lines,
            [
                "Posted A - Status: 201",
                "Posted B - Status: 500",
                "Posted C - Status: 201"
            ]
        );
    }

    #[test]
    fn refused_connection_aborts_before_any_report() {
        let config = SeedConfig::new(refused_url(), vec![game("A", 1, 1.0), game("B", 1, 2.0)]);

        let mut reported = 0;
        let err = Seeder::new(config)
            .unwrap()
            .run(|_| reported += 1)
            .unwrap_err();

        assert_eq!(reported, 0);
        match err {
            SeedError::Transport { name, .. } => assert_eq!(name, "A"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fault_mid_run_skips_the_remaining_records() {
        let mut server = Server::new();
        let first = server
            .mock("POST", "/games")
            .match_body(named("A"))
            .with_status(201)
            .expect(1)
            .create();
        // The client follows the redirect into a closed port.
        let second = server
            .mock("POST", "/games")
            .match_body(named("B"))
            .with_status(307)
            .with_header("location", &refused_url())
            .expect(1)
            .create();
        let third = server
            .mock("POST", "/games")
            .match_body(named("C"))
            .with_status(201)
            .expect(0)
            .create();

        let config = SeedConfig::new(
            format!("{}/games", server.url()),
            vec![game("A", 1, 1.0), game("B", 1, 2.0), game("C", 2, 3.0)],
        );

        let mut lines = Vec::new();
        let err = Seeder::new(config)
            .unwrap()
            .run(|o| lines.push(o.to_string()))
            .unwrap_err();

        assert_eq!(lines, ["Posted A - Status: 201"]);
        match err {
            SeedError::Transport { name, .. } => assert_eq!(name, "B"),
            other => panic!("unexpected error: {other}"),
        }
        first.assert();
        second.assert();
        third.assert();
    }

    #[test]
    fn continue_policy_reports_failures_and_keeps_going() {
        let config = SeedConfig::new(refused_url(), vec![game("A", 1, 1.0), game("B", 1, 2.0)])
            .with_policy(FailurePolicy::Continue);

        let mut names = Vec::new();
        let outcomes = Seeder::new(config)
            .unwrap()
            .run(|o| names.push(o.name().to_string()))
            .unwrap();

        assert_eq!(names, ["A", "B"]);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, Outcome::TransportFailure { .. })));
        assert!(outcomes[0].to_string().starts_with("Failed A - "));
    }

    #[test]
    fn running_twice_posts_every_record_twice() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/games")
            .with_status(201)
            .expect(4)
            .create();

        let config = SeedConfig::new(
            format!("{}/games", server.url()),
            vec![game("A", 1, 1.0), game("B", 1, 2.0)],
        );
        let seeder = Seeder::new(config).unwrap();

        seeder.run(|_| {}).unwrap();
        seeder.run(|_| {}).unwrap();

        mock.assert();
    }
}
