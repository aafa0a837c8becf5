// Dashboard collections and their CRUD calls.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::client::{ApiClient, ApiRequest, ApiResponse};
use crate::envelope::Envelope;
use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Leagues,
    Seasons,
    Divisions,
    Players,
    Admins,
    Sponsors,
    Matches,
    Disputes,
    Payments,
    Notifications,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Leagues,
        Resource::Seasons,
        Resource::Divisions,
        Resource::Players,
        Resource::Admins,
        Resource::Sponsors,
        Resource::Matches,
        Resource::Disputes,
        Resource::Payments,
        Resource::Notifications,
    ];

    /// Path segment of the collection.
    pub fn collection(&self) -> &'static str {
        match self {
            Resource::Leagues => "leagues",
            Resource::Seasons => "seasons",
            Resource::Divisions => "divisions",
            Resource::Players => "players",
            Resource::Admins => "admins",
            Resource::Sponsors => "sponsors",
            Resource::Matches => "matches",
            Resource::Disputes => "disputes",
            Resource::Payments => "payments",
            Resource::Notifications => "notifications",
        }
    }

    fn singular(&self) -> &'static str {
        match self {
            Resource::Leagues => "league",
            Resource::Seasons => "season",
            Resource::Divisions => "division",
            Resource::Players => "player",
            Resource::Admins => "admin",
            Resource::Sponsors => "sponsor",
            Resource::Matches => "match",
            Resource::Disputes => "dispute",
            Resource::Payments => "payment",
            Resource::Notifications => "notification",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for Resource {
    type Err = ClientError;

    fn from_str(raw: &str) -> Result<Self> {
        let name = raw.trim().to_ascii_lowercase();
        Resource::ALL
            .into_iter()
            .find(|resource| resource.collection() == name || resource.singular() == name)
            .ok_or_else(|| ClientError::InvalidRequest(format!("Unknown resource: {}", raw.trim())))
    }
}

/// Query of a collection listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

impl ApiClient {
    /// `<prefix>/<collection>` or `<prefix>/<collection>/<id>`.
    pub fn resource_path(&self, resource: Resource, id: Option<&str>) -> Result<String> {
        let collection = format!("{}/{}", self.api_prefix(), resource.collection());
        match id {
            None => Ok(collection),
            Some(id) => Ok(format!("{}/{}", collection, validate_id(resource, id)?)),
        }
    }

    pub async fn list(&self, resource: Resource, query: &ListQuery) -> Result<Envelope<Vec<Value>>> {
        let mut request = ApiRequest::get(self.resource_path(resource, None)?);
        for (key, value) in query.to_pairs() {
            request = request.query(key, value);
        }
        self.send(request).await?.into_envelope()
    }

    pub async fn fetch(&self, resource: Resource, id: &str) -> Result<Envelope<Value>> {
        let path = self.resource_path(resource, Some(id))?;
        record_envelope(self.get(&path).await?)
    }

    pub async fn create<B: Serialize + ?Sized>(
        &self,
        resource: Resource,
        body: &B,
    ) -> Result<Envelope<Value>> {
        let path = self.resource_path(resource, None)?;
        record_envelope(self.post(&path, body).await?)
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        resource: Resource,
        id: &str,
        body: &B,
    ) -> Result<Envelope<Value>> {
        let path = self.resource_path(resource, Some(id))?;
        record_envelope(self.put(&path, body).await?)
    }

    pub async fn remove(&self, resource: Resource, id: &str) -> Result<Envelope<Value>> {
        let path = self.resource_path(resource, Some(id))?;
        record_envelope(self.delete(&path).await?)
    }
}

fn validate_id(resource: Resource, id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ClientError::InvalidRequest(format!(
            "{} id must not be empty",
            resource.singular()
        )));
    }
    if id.contains(['/', '?', '#']) {
        return Err(ClientError::InvalidRequest(format!(
            "{} id contains a reserved character: {}",
            resource.singular(),
            id
        )));
    }
    Ok(id)
}

// Bodies that stayed non-objects (an empty 204, plain text) still count as a
// successful call.
fn record_envelope(response: ApiResponse) -> Result<Envelope<Value>> {
    if response.data.is_object() {
        response.into_envelope()
    } else {
        Ok(Envelope::new(response.into_data()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_for, spawn_backend};
    use serde_json::json;

    #[test]
    fn resource_names_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(resource.collection().parse::<Resource>().unwrap(), resource);
            assert_eq!(resource.to_string(), resource.collection());
        }
        assert_eq!(" Match ".parse::<Resource>().unwrap(), Resource::Matches);
        assert!(matches!(
            "teams".parse::<Resource>(),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn list_query_pairs_keep_order() {
        let query = ListQuery::new()
            .page(2)
            .limit(50)
            .search("ali")
            .filter("status", "active")
            .filter("seasonId", "s1");
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "50".to_string()),
                ("search".to_string(), "ali".to_string()),
                ("status".to_string(), "active".to_string()),
                ("seasonId".to_string(), "s1".to_string()),
            ]
        );
        assert!(ListQuery::new().to_pairs().is_empty());
    }

    #[tokio::test]
    async fn resource_path_rejects_bad_ids() {
        let client = client_for(spawn_backend().await);
        assert_eq!(
            client.resource_path(Resource::Players, Some(" p1 ")).unwrap(),
            "/api/players/p1"
        );
        assert!(client.resource_path(Resource::Players, Some("  ")).is_err());
        assert!(client.resource_path(Resource::Players, Some("p1/../admins")).is_err());
        assert!(client.fetch(Resource::Seasons, "s1?x=1").await.is_err());
    }

    #[tokio::test]
    async fn list_players_fills_inline_pagination() {
        let client = client_for(spawn_backend().await);
        let envelope = client
            .list(Resource::Players, &ListQuery::new().page(1))
            .await
            .expect("players should list");

        assert_eq!(envelope.data.len(), 2);
        let pagination = envelope.pagination.expect("pagination");
        assert_eq!((pagination.page, pagination.limit, pagination.total), (1, 2, 2));
    }

    #[tokio::test]
    async fn fetch_wraps_raw_record() {
        let client = client_for(spawn_backend().await);
        let envelope = client.fetch(Resource::Seasons, "s1").await.unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, json!({ "id": "s1", "name": "Spring 2026" }));
        assert!(envelope.pagination.is_none());
    }

    #[tokio::test]
    async fn create_update_and_remove() {
        let client = client_for(spawn_backend().await);

        let created = client
            .create(Resource::Leagues, &json!({ "name": "Deuce Ipoh" }))
            .await
            .unwrap();
        assert_eq!(created.message_text().as_deref(), Some("League created"));
        assert!(created.meta.get("status").is_none());

        let updated = client
            .update(Resource::Seasons, "s2", &json!({ "name": "Autumn" }))
            .await
            .unwrap();
        assert_eq!(updated.data, json!({ "id": "s2", "name": "Autumn" }));

        let removed = client.remove(Resource::Sponsors, "s1").await.unwrap();
        assert!(removed.success);
        assert_eq!(removed.data, Value::Null);
    }

    #[tokio::test]
    async fn missing_record_is_an_http_error() {
        let client = client_for(spawn_backend().await);
        let err = client.fetch(Resource::Disputes, "d1").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "Not found");
    }
}
