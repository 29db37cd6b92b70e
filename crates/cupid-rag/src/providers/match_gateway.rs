//! Gateway to the external user-matching service

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::MatchingConfig;
use crate::error::{Error, Result};
use crate::types::{ExtractedSlots, UserId};

/// Opaque user summary returned by the match service
pub type MatchedUser = serde_json::Value;

/// Trait for looking up users that satisfy extracted filter criteria
#[async_trait]
pub trait MatchGateway: Send + Sync {
    /// Find users matching the criteria on behalf of `user_id`
    async fn find_matches(
        &self,
        criteria: &ExtractedSlots,
        user_id: Option<&UserId>,
    ) -> Result<Vec<MatchedUser>>;

    /// Get gateway name for logging
    fn name(&self) -> &str;
}

#[derive(Serialize)]
struct FindMatchesRequest<'a> {
    action: &'static str,
    id: Option<&'a UserId>,
    #[serde(rename = "minAge")]
    min_age: Option<i64>,
    #[serde(rename = "maxAge")]
    max_age: Option<i64>,
    location: Option<&'a str>,
}

/// HTTP implementation posting `find_matches` requests as JSON
pub struct HttpMatchGateway {
    client: Client,
    url: String,
    timeout_secs: u64,
}

impl HttpMatchGateway {
    pub fn new(config: &MatchingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl MatchGateway for HttpMatchGateway {
    async fn find_matches(
        &self,
        criteria: &ExtractedSlots,
        user_id: Option<&UserId>,
    ) -> Result<Vec<MatchedUser>> {
        let request = FindMatchesRequest {
            action: "find_matches",
            id: user_id,
            min_age: criteria.min_age,
            max_age: criteria.max_age,
            location: criteria.location.as_deref(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout {
                        operation: "match service",
                        secs: self.timeout_secs,
                    }
                } else {
                    Error::MatchService(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(Error::MatchStatus(response.status().as_u16()));
        }

        let users: Vec<MatchedUser> = response
            .json()
            .await
            .map_err(|e| Error::MatchService(format!("Invalid match response: {}", e)))?;

        Ok(users)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> HttpMatchGateway {
        HttpMatchGateway::new(&MatchingConfig {
            url: format!("{}/match_api.php", server.uri()),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_posts_criteria() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/match_api.php"))
            .and(body_json(serde_json::json!({
                "action": "find_matches",
                "id": "u1",
                "minAge": 18,
                "maxAge": null,
                "location": "Hà Nội"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "id": 7 }, { "id": 9 }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let criteria = ExtractedSlots {
            min_age: Some(18),
            max_age: None,
            location: Some("Hà Nội".to_string()),
        };
        let users = gateway_for(&server)
            .find_matches(&criteria, Some(&UserId::Text("u1".to_string())))
            .await
            .unwrap();
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = gateway_for(&server)
            .find_matches(&ExtractedSlots::default(), None)
            .await;
        assert!(matches!(result, Err(Error::MatchStatus(503))));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let gateway = HttpMatchGateway::new(&MatchingConfig {
            url: "http://127.0.0.1:1/match_api.php".to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let result = gateway.find_matches(&ExtractedSlots::default(), None).await;
        assert!(matches!(
            result,
            Err(Error::MatchService(_)) | Err(Error::Timeout { .. })
        ));
    }
}
