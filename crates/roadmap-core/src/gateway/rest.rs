//! REST Gateway
//!
//! Talks to a hosted PostgREST-style table API (`/rest/v1/<table>`), the
//! interface exposed by Supabase projects.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{Direction, GatewayError, GatewayResult, PersistenceGateway, ReadQuery, RecordKey};
use crate::config::StoreConfig;

const REST_PREFIX: &str = "rest/v1";

pub struct RestGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestGateway {
    pub fn new(config: &StoreConfig) -> GatewayResult<Self> {
        let client = build_client(config)?;
        Ok(Self {
            client,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, collection: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PREFIX, collection)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(config: &StoreConfig) -> GatewayResult<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| GatewayError::Unavailable(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn build_client(_config: &StoreConfig) -> GatewayResult<Client> {
    Ok(Client::new())
}

/// PostgREST equality filter value
fn eq_filter(value: &str) -> String {
    format!("eq.{}", value)
}

fn order_param(field: &str, direction: Direction) -> String {
    match direction {
        Direction::Ascending => format!("{}.asc", field),
        Direction::Descending => format!("{}.desc", field),
    }
}

fn query_params(query: &ReadQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(
        query
            .filters
            .iter()
            .map(|(field, value)| (field.clone(), eq_filter(value))),
    );
    if let Some((field, direction)) = &query.order {
        params.push(("order".to_string(), order_param(field, *direction)));
    }
    params
}

fn key_params(key: &RecordKey) -> [(String, String); 1] {
    [(key.field.clone(), eq_filter(&key.value))]
}

/// Turn a non-success status into `GatewayError::Http` with the body text
async fn check(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GatewayError::Http {
        status: status.as_u16(),
        message,
    })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PersistenceGateway for RestGateway {
    async fn create(&self, collection: &str, record: Value) -> GatewayResult<Value> {
        let response = self
            .authorized(self.client.post(self.endpoint(collection)))
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await?;
        let rows: Vec<Value> = check(response).await?.json().await?;
        rows.into_iter().next().ok_or_else(|| {
            GatewayError::MalformedResponse("insert returned no rows".to_string())
        })
    }

    async fn read(&self, collection: &str, query: &ReadQuery) -> GatewayResult<Vec<Value>> {
        let response = self
            .authorized(self.client.get(self.endpoint(collection)))
            .query(&query_params(query))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update(&self, collection: &str, key: &RecordKey, patch: Value) -> GatewayResult<()> {
        let response = self
            .authorized(self.client.patch(self.endpoint(collection)))
            .query(&key_params(key))
            .json(&patch)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &RecordKey) -> GatewayResult<()> {
        let response = self
            .authorized(self.client.delete(self.endpoint(collection)))
            .query(&key_params(key))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let gw = RestGateway::new(&StoreConfig::new("https://abc.supabase.co/", "anon")).unwrap();
        assert_eq!(gw.endpoint("roadmap"), "https://abc.supabase.co/rest/v1/roadmap");
    }

    #[test]
    fn test_read_params() {
        let query = ReadQuery::all()
            .filter_eq("uid", "r1")
            .order_by("created_at", Direction::Descending);
        assert_eq!(
            query_params(&query),
            vec![
                ("select".to_string(), "*".to_string()),
                ("uid".to_string(), "eq.r1".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
        assert_eq!(query_params(&ReadQuery::all()).len(), 1);
    }

    #[test]
    fn test_key_params() {
        let [(field, value)] = key_params(&RecordKey::new("uid", "9f"));
        assert_eq!(field, "uid");
        assert_eq!(value, "eq.9f");
    }
}
