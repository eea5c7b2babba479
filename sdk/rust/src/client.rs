use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// One tasting note to save.
#[derive(Debug, Clone, Serialize)]
pub struct SaveNote {
    pub customer_id: String,
    pub customer_email: String,
    pub event_handle: String,
    pub event_name: Option<String>,
    pub product_id: u64,
    pub handle: Option<String>,
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub nose: Option<String>,
    pub palate: Option<String>,
    pub note: Option<String>,
}

/// Result of a delete call.
#[derive(Debug, Deserialize)]
pub struct DeleteOutcome {
    pub ok: bool,
    pub removed: Option<usize>,
    pub empty: Option<bool>,
    #[serde(rename = "notFound")]
    pub not_found: Option<String>,
}

pub struct ProxyClient {
    client: Client,
    proxy_url: String,
    origin: String,
}

impl ProxyClient {
    pub fn new(proxy_url: &str, origin: &str) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.to_string(),
            origin: origin.to_string(),
        }
    }

    /// Save (upsert) a tasting note.
    pub async fn save(&self, note: &SaveNote) -> Result<(), Box<dyn std::error::Error>> {
        let body = json!({
            "shop": "sdk",
            "customer_id": note.customer_id,
            "customer_email": note.customer_email,
            "event_handle": note.event_handle,
            "event_name": note.event_name,
            "product": {
                "product_id": note.product_id,
                "handle": note.handle,
                "title": note.title,
                "rating": note.rating,
                "nose": note.nose,
                "palate": note.palate,
                "note": note.note,
            },
        });

        let resp = self
            .client
            .post(format!("{}/proxy/save", self.proxy_url))
            .header("Origin", &self.origin)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(format!("proxy returned status {}: {}", status, text).into());
        }
        Ok(())
    }

    /// Delete tasting notes matching a product within one event.
    pub async fn delete(
        &self,
        customer_id: &str,
        event_handle: &str,
        product_id: Option<u64>,
        handle: Option<&str>,
    ) -> Result<DeleteOutcome, Box<dyn std::error::Error>> {
        let body = json!({
            "shop": "sdk",
            "customer_id": customer_id,
            "event_handle": event_handle,
            "product": { "product_id": product_id, "handle": handle },
        });

        let resp = self
            .client
            .post(format!("{}/proxy/delete", self.proxy_url))
            .header("Origin", &self.origin)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(format!("proxy returned status {}: {}", status, text).into());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Hit the liveness probe.
    pub async fn probe(&self) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/proxy/test", self.proxy_url))
            .send()
            .await?;
        Ok(resp.json().await?)
    }
}
