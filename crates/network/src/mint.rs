use async_trait::async_trait;
use derive_more::Debug;
use eyre::Result;
use primitives::inflation::EPOCHS_PER_YEAR;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::info;
use url::Url;

use crate::{error::NetworkError, http_retry::retry_op};

/// Chain whose mint module reports per-epoch instead of annual provisions.
pub const OSMOSIS_CHAIN_ID: &str = "osmosis-1";

const ANNUAL_PROVISIONS_PATH: &str = "cosmos/mint/v1beta1/annual_provisions";
const EPOCH_PROVISIONS_PATH: &str = "osmosis/mint/v1beta1/epoch_provisions";

/// Source of yearly token issuance for a chain.
#[async_trait]
pub trait ProvisionsSource: Send + Sync {
    /// Tokens issued per year on `chain_id`.
    async fn annual_provisions(&self, chain_id: &str) -> Result<f64>;
}

#[derive(Deserialize)]
struct AnnualProvisions {
    annual_provisions: String,
}

#[derive(Deserialize)]
struct EpochProvisions {
    epoch_provisions: String,
}

fn parse_decimal(field: &'static str, value: &str) -> Result<f64, NetworkError> {
    value.trim().parse().map_err(|_| NetworkError::InvalidDecimal { field, value: value.to_owned() })
}

/// REST client for the mint module of a Cosmos chain.
#[derive(Debug, Clone)]
pub struct MintClient {
    #[debug(skip)]
    http: Client,
    base: String,
}

impl MintClient {
    /// Create a new client for the REST endpoint at `url`.
    pub fn new(url: Url) -> Self {
        Self { http: Client::new(), base: url.as_str().trim_end_matches('/').to_owned() }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, NetworkError> {
        let query = format!("{}/{}", self.base, path);
        let query = query.as_str();
        retry_op(move || async move {
            let resp = self.http.get(query).send().await?;
            let status = resp.status();
            if status != reqwest::StatusCode::OK {
                return Err(NetworkError::UnexpectedStatus { url: query.to_owned(), status });
            }
            let text = resp.text().await?;
            serde_json::from_str(&text)
                .map_err(|source| NetworkError::Json { target: query.to_owned(), source })
        })
        .await
    }

    /// Annual provisions as reported by the standard mint module.
    pub async fn fetch_annual_provisions(&self) -> Result<f64, NetworkError> {
        let resp: AnnualProvisions = self.get(ANNUAL_PROVISIONS_PATH).await?;
        parse_decimal("annual_provisions", &resp.annual_provisions)
    }

    /// Epoch provisions annualized, assuming one epoch per day.
    pub async fn fetch_epoch_provisions_annualized(&self) -> Result<f64, NetworkError> {
        let resp: EpochProvisions = self.get(EPOCH_PROVISIONS_PATH).await?;
        Ok(parse_decimal("epoch_provisions", &resp.epoch_provisions)? * EPOCHS_PER_YEAR)
    }
}

#[async_trait]
impl ProvisionsSource for MintClient {
    async fn annual_provisions(&self, chain_id: &str) -> Result<f64> {
        let provisions = match chain_id {
            OSMOSIS_CHAIN_ID => self.fetch_epoch_provisions_annualized().await?,
            _ => self.fetch_annual_provisions().await?,
        };
        info!(chain_id, provisions, "fetched annual provisions");
        Ok(provisions)
    }
}
