use super::ScaleClient;
use crate::error::Result;
use crate::model::{Strike, Warning};

impl ScaleClient {
    pub fn list_strikes(&self) -> Result<Vec<Strike>> {
        self.list_all("/strikes/", &[])
    }

    pub fn get_strike(&self, id: i64) -> Result<Strike> {
        self.get(&format!("/strikes/{}/", id))
    }

    pub fn validate_strike(&self, strike: &Strike) -> Result<Vec<Warning>> {
        self.validate("/strikes/validation/", strike)
    }

    pub fn create_strike(&self, strike: &Strike) -> Result<Strike> {
        self.post("/strikes/", strike)
    }

    pub fn update_strike(&self, id: i64, strike: &Strike) -> Result<Strike> {
        self.patch(&format!("/strikes/{}/", id), strike)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::with_client;
    use crate::model::Strike;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_strike() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/strikes/"))
            .and(body_partial_json(json!({"name": "landing", "configuration": {"workspace": "raw"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 5, "name": "landing", "configuration": {"workspace": "raw"}
            })))
            .mount(&server)
            .await;

        let strike = Strike {
            name: "landing".into(),
            configuration: json!({"workspace": "raw"}),
            ..Strike::default()
        };
        let created = with_client(server.uri(), move |client| {
            client.create_strike(&strike).unwrap()
        })
        .await;
        assert_eq!(created.id, Some(5));
    }
}
