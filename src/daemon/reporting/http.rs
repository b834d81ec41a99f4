use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::{CountReport, Leaderboard, ReportingClient, UploadError, UploadResult};

/// [ReportingClient] for the real service.
pub struct HttpReportingClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReportingClient {
    pub fn new(host: &str, timeout: Duration) -> Result<Self> {
        Self::with_base_url(format!("https://{host}"), timeout)
    }

    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn request(&self, report: &CountReport) -> reqwest::RequestBuilder {
        let mut query = vec![("count", report.count.to_string())];
        if report.only_follows {
            query.push(("only_follows", "1".into()));
        }

        self.client
            .get(format!("{}/count", self.base_url))
            .query(&query)
            .bearer_auth(&report.token)
    }
}

#[async_trait]
impl ReportingClient for HttpReportingClient {
    async fn upload(&self, report: CountReport) -> UploadResult {
        debug!("Uploading count {}", report.count);
        let response = self.request(&report).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_leaderboard(&body)
    }
}

/// The service answers with a JSON array of players in rank order.
pub fn parse_leaderboard(body: &[u8]) -> UploadResult {
    Ok(Leaderboard {
        players: serde_json::from_slice(body)?,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use reqwest::header::AUTHORIZATION;

    use crate::daemon::reporting::{test_leaderboard, CountReport, UploadError};

    use super::{parse_leaderboard, HttpReportingClient};

    fn report(only_follows: bool) -> CountReport {
        CountReport {
            count: 42,
            only_follows,
            token: "secret".into(),
        }
    }

    #[test]
    fn test_request_shape() -> Result<()> {
        let client = HttpReportingClient::new("keyrace.app", Duration::from_secs(5))?;

        let request = client.request(&report(false)).build()?;
        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().as_str(), "https://keyrace.app/count?count=42");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer secret");

        let request = client.request(&report(true)).build()?;
        assert_eq!(request.url().query(), Some("count=42&only_follows=1"));
        Ok(())
    }

    #[test]
    fn test_base_url_trailing_slash() -> Result<()> {
        let client =
            HttpReportingClient::with_base_url("http://localhost:8080/".into(), Duration::from_secs(1))?;

        let request = client.request(&report(false)).build()?;
        assert_eq!(request.url().as_str(), "http://localhost:8080/count?count=42");
        Ok(())
    }

    #[test]
    fn test_parse_leaderboard() -> Result<()> {
        let body = br#"[
            {"username": "octocat", "gravatar": "https://avatars.example/octocat.png", "score": 9000},
            {"username": "hubot", "gravatar": "https://avatars.example/hubot.png", "score": 120}
        ]"#;

        let leaderboard = parse_leaderboard(body)?;
        assert_eq!(leaderboard, test_leaderboard());
        assert_eq!(leaderboard.leader().map(|p| p.username.as_str()), Some("octocat"));
        assert_eq!(leaderboard.players[1].profile_url(), "https://github.com/hubot");
        Ok(())
    }

    #[test]
    fn test_parse_malformed_leaderboard() {
        assert!(matches!(
            parse_leaderboard(b"<html>oops</html>"),
            Err(UploadError::Malformed(_))
        ));
        assert!(matches!(
            parse_leaderboard(br#"[{"username": "no score"}]"#),
            Err(UploadError::Malformed(_))
        ));
        assert!(parse_leaderboard(b"[]").is_ok_and(|l| l.players.is_empty()));
    }
}
