//! PostgREST half of [`SupabaseClient`].

use domain::{BackendError, Client, ClientId, NewClient, Select, TableBackend};
use reqwest::Method;

use super::{send_empty, send_json, SupabaseClient};

fn table_path(relation: &str) -> String {
    format!("rest/v1/{relation}")
}

fn select_params(query: &Select) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_string())];
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order", format!("{}.{direction}", order.column)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    params
}

fn id_filter(id: ClientId) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

impl TableBackend for SupabaseClient {
    async fn select(&self, relation: &str, query: Select) -> Result<Vec<Client>, BackendError> {
        let request = self
            .request(Method::GET, &table_path(relation))
            .query(&select_params(&query));
        send_json(request).await
    }

    async fn insert(&self, relation: &str, row: NewClient) -> Result<Client, BackendError> {
        let request = self
            .request(Method::POST, &table_path(relation))
            .header("Prefer", "return=representation")
            .json(&row);
        let rows: Vec<Client> = send_json(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::new(None, "insert returned no row"))
    }

    async fn update(&self, relation: &str, id: ClientId, patch: NewClient) -> Result<(), BackendError> {
        let request = self
            .request(Method::PATCH, &table_path(relation))
            .query(&id_filter(id))
            .header("Prefer", "return=minimal")
            .json(&patch);
        send_empty(request).await
    }

    async fn delete(&self, relation: &str, id: ClientId) -> Result<(), BackendError> {
        let request = self
            .request(Method::DELETE, &table_path(relation))
            .query(&id_filter(id));
        send_empty(request).await
    }

    async fn rpc(&self, procedure: &str) -> Result<(), BackendError> {
        let request = self
            .request(Method::POST, &format!("rest/v1/rpc/{procedure}"))
            .json(&serde_json::json!({}));
        send_empty(request).await
    }
}
