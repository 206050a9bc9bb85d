//! The `votes` and `users` collections of the hosted document store.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use votegate_store::{DescriptorStore, StoreError, VoteLedger};
use votegate_types::{BiometricDescriptor, Identity, VoteRecord};

use crate::document::{decode_descriptor, decode_vote, encode_descriptor, encode_vote};
use crate::{HttpClient, RemoteError};

const VOTES: &str = "votes";
const USERS: &str = "users";

/// Fetch `{collection}/{id}`; `None` on 404.
async fn fetch(client: &HttpClient, collection: &str, identity: &Identity) -> Result<Option<Value>, RemoteError> {
    let url = client.document_url(collection, identity.as_str())?;
    let request = client.request_url(Method::GET, url);
    let response = client.send(request).await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    HttpClient::json(response).await.map(Some)
}

/// Vote ledger backed by the `votes` collection.
///
/// `create_if_absent` is a create-only request
/// (`POST votes?documentId={identity}`): the server answers 409 when the
/// document exists, so the at-most-once check happens where the data lives.
pub struct RestVoteLedger {
    client: HttpClient,
}

impl RestVoteLedger {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VoteLedger for RestVoteLedger {
    async fn get(&self, identity: &Identity) -> Result<Option<VoteRecord>, StoreError> {
        let Some(doc) = fetch(&self.client, VOTES, identity).await? else {
            return Ok(None);
        };
        Ok(Some(decode_vote(identity, &doc)?))
    }

    async fn create_if_absent(&self, record: &VoteRecord) -> Result<bool, StoreError> {
        let request = self
            .client
            .request(Method::POST, VOTES)
            .query(&[("documentId", record.identity.as_str())])
            .json(&encode_vote(record));
        let response = self.client.send(request).await?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::CONFLICT => {
                tracing::debug!(identity = %record.identity, "vote document already exists");
                Ok(false)
            }
            _ => Err(HttpClient::status_error(response).await.into()),
        }
    }
}

/// Descriptor store backed by the `users` collection. Writes overwrite.
pub struct RestDescriptorStore {
    client: HttpClient,
}

impl RestDescriptorStore {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DescriptorStore for RestDescriptorStore {
    async fn put_descriptor(
        &self,
        identity: &Identity,
        descriptor: &BiometricDescriptor,
    ) -> Result<(), StoreError> {
        let url = self.client.document_url(USERS, identity.as_str())?;
        let request = self
            .client
            .request_url(Method::PATCH, url)
            .json(&encode_descriptor(descriptor));
        let response = self.client.send(request).await?;
        if !response.status().is_success() {
            return Err(HttpClient::status_error(response).await.into());
        }
        Ok(())
    }

    async fn get_descriptor(&self, identity: &Identity) -> Result<Option<BiometricDescriptor>, StoreError> {
        let Some(doc) = fetch(&self.client, USERS, identity).await? else {
            return Ok(None);
        };
        Ok(Some(decode_descriptor(&doc)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use votegate_types::{BoundingBox, Timestamp};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn uid() -> Identity {
        Identity::new("uid-1").unwrap()
    }

    #[tokio::test]
    async fn create_maps_success_and_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/votes"))
            .and(query_param("documentId", "uid-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/votes"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "error": { "code": 409, "message": "Document already exists" }
            })))
            .mount(&server)
            .await;

        let ledger = RestVoteLedger::new(HttpClient::new(server.uri()).unwrap());
        let record = VoteRecord::cast(uid(), Timestamp::from_millis(7));
        assert!(ledger.create_if_absent(&record).await.unwrap());
        assert!(!ledger.create_if_absent(&record).await.unwrap());
    }

    #[tokio::test]
    async fn get_missing_document_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/votes/uid-1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let ledger = RestVoteLedger::new(HttpClient::new(server.uri()).unwrap());
        assert_eq!(ledger.get(&uid()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_decodes_existing_vote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/votes/uid-1"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fields": {
                    "voted": { "booleanValue": true },
                    "timestamp": { "integerValue": "1700000000000" }
                }
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap().with_bearer("secret");
        let record = RestVoteLedger::new(client).get(&uid()).await.unwrap().unwrap();
        assert!(record.cast);
        assert_eq!(record.timestamp, Timestamp::from_millis(1_700_000_000_000));
    }

    #[tokio::test]
    async fn server_failure_is_unavailable_and_forbidden_is_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let ledger = RestVoteLedger::new(HttpClient::new(server.uri()).unwrap());
        let record = VoteRecord::cast(uid(), Timestamp::from_millis(7));
        assert!(matches!(
            ledger.create_if_absent(&record).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            ledger.create_if_absent(&record).await,
            Err(StoreError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn identity_with_reserved_characters_stays_in_its_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/votes/x%3Fy"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let ledger = RestVoteLedger::new(HttpClient::new(server.uri()).unwrap());
        assert_eq!(ledger.get(&Identity::new("x?y").unwrap()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn dot_identity_is_refused_without_a_request() {
        let ledger = RestVoteLedger::new(HttpClient::new("http://127.0.0.1:1").unwrap());
        let err = ledger.get(&Identity::new("..").unwrap()).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let client = HttpClient::new("http://127.0.0.1:1").unwrap();
        let err = RestVoteLedger::new(client).get(&uid()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn descriptor_is_patched_under_users() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/users/uid-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let store = RestDescriptorStore::new(HttpClient::new(server.uri()).unwrap());
        let descriptor = BiometricDescriptor::new(BoundingBox::new(1, 2, 3, 4));
        store.put_descriptor(&uid(), &descriptor).await.unwrap();
    }
}
