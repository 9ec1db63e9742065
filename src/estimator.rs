//! Food recognition: estimates calories (and a name) for a food from its name
//! or a photo. The actual model runs in an external service.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::images::services::UploadItem;

#[derive(Debug, Clone, Default)]
pub struct EstimateRequest {
    pub food_name: Option<String>,
    pub image: Option<UploadItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    /// Name detected in the image, if the service recognized one.
    pub food_name: Option<String>,
    pub calories: u32,
}

#[async_trait]
pub trait CalorieEstimator: Send + Sync {
    /// `false` when no recognition service is configured.
    fn enabled(&self) -> bool {
        true
    }

    async fn estimate(&self, req: EstimateRequest) -> anyhow::Result<Estimate>;
}

/// Used when `ESTIMATOR_URL` is unset.
pub struct DisabledEstimator;

#[async_trait]
impl CalorieEstimator for DisabledEstimator {
    fn enabled(&self) -> bool {
        false
    }

    async fn estimate(&self, _req: EstimateRequest) -> anyhow::Result<Estimate> {
        anyhow::bail!("calorie estimation is not configured")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EstimateResponse {
    #[serde(default)]
    food_name: Option<String>,
    calories: f64,
}

/// Recognition service reached over HTTP.
///
/// Photos are posted as multipart (`image`, optional `foodName`); name-only
/// requests are posted as JSON `{ "foodName": ... }`. Both answer with
/// `{ "foodName"?: string, "calories": number }`.
#[derive(Clone)]
pub struct HttpEstimator {
    client: Client,
    url: String,
}

impl HttpEstimator {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("build estimator http client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CalorieEstimator for HttpEstimator {
    #[instrument(skip(self, req), fields(has_image = req.image.is_some()))]
    async fn estimate(&self, req: EstimateRequest) -> anyhow::Result<Estimate> {
        let request = match req.image {
            Some(image) => {
                let part = multipart::Part::bytes(image.body.to_vec())
                    .file_name("food")
                    .mime_str(&image.content_type)
                    .context("image content type")?;
                let mut form = multipart::Form::new().part("image", part);
                if let Some(name) = req.food_name {
                    form = form.text("foodName", name);
                }
                self.client.post(&self.url).multipart(form)
            }
            None => {
                let name = req
                    .food_name
                    .context("a food name or an image is required for an estimate")?;
                self.client.post(&self.url).json(&json!({ "foodName": name }))
            }
        };

        let body: EstimateResponse = request
            .send()
            .await
            .context("estimator request")?
            .error_for_status()
            .context("estimator status")?
            .json()
            .await
            .context("estimator response body")?;

        anyhow::ensure!(
            body.calories.is_finite() && body.calories >= 0.0,
            "estimator returned invalid calories: {}",
            body.calories
        );
        let calories = body.calories.round().min(f64::from(i32::MAX)) as u32;
        let food_name = body
            .food_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        debug!(calories, ?food_name, "estimate received");

        Ok(Estimate {
            food_name,
            calories,
        })
    }
}

pub fn from_config(url: Option<&str>) -> anyhow::Result<std::sync::Arc<dyn CalorieEstimator>> {
    Ok(match url {
        Some(url) => std::sync::Arc::new(HttpEstimator::new(url)?),
        None => std::sync::Arc::new(DisabledEstimator),
    })
}
