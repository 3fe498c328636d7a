//! Outgoing HTTP with one `outgoing_http` span per call.

use serde::Serialize;
use tracing::{field::Empty, Instrument};

/// `reqwest` client whose calls are traced with method, url and status.
/// Error statuses are returned to the caller, not raised.
#[derive(Clone, Default)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// POST `body` as JSON.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> reqwest::Result<reqwest::Response> {
        let req = self.inner.post(url).json(body).build()?;
        self.send(req).await
    }

    async fn send(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::info_span!(
            "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            http.status_code = Empty,
            error = Empty,
        );
        let recorder = span.clone();

        let response = self.inner.execute(req).instrument(span).await?;
        let status = response.status();
        recorder.record("http.status_code", status.as_u16());
        if status.is_client_error() || status.is_server_error() {
            recorder.record("error", true);
        }
        Ok(response)
    }
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn post_json_sends_body() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/api/mail")
                .header("content-type", "application/json")
                .json_body(json!({"to": "jane@example.com"}));
            then.status(202);
        });

        let client = TracedClient::from(reqwest::Client::new());
        let url = format!("{}/api/mail", server.base_url());
        let resp = client
            .post_json(&url, &json!({"to": "jane@example.com"}))
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 202);
        m.assert();
    }

    #[tokio::test]
    #[traced_test]
    async fn error_status_is_returned_not_raised() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/broken");
            then.status(503);
        });

        let client = TracedClient::default();
        let resp = client
            .post_json(&format!("{}/broken", server.base_url()), &json!({}))
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 503);
    }

    #[tokio::test]
    async fn malformed_url_is_a_builder_error() {
        let client = TracedClient::default();
        let err = client.post_json("not a url", &json!({})).await.unwrap_err();
        assert!(err.is_builder());
    }
}
