// src/bridge/codap.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument};
use url::Url;

use super::message::{data_context, items_of, Action, Command, Reply};
use super::HostBridge;
use crate::error::BridgeError;
use crate::schema::{DatasetDescriptor, IframeDescriptor, Record};

pub const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:8088/codap";

/// Speaks the CODAP plugin command protocol, one POST per command.
#[derive(Debug, Clone)]
pub struct CodapBridge {
    client: Client,
    endpoint: Url,
}

impl CodapBridge {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    async fn send<V: Serialize + Send + Sync>(
        &self,
        action: Action,
        resource: String,
        values: Option<V>,
    ) -> Result<Reply, BridgeError> {
        debug!(action = action.as_str(), %resource, "bridge request");
        let transport = |source: reqwest::Error| BridgeError::Transport {
            action: action.as_str(),
            resource: resource.clone(),
            source,
        };

        let cmd = Command {
            action,
            resource: resource.clone(),
            values,
        };
        let body = self
            .client
            .post(self.endpoint.clone())
            .json(&cmd)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .text()
            .await
            .map_err(transport)?;

        serde_json::from_str(&body).map_err(|source| BridgeError::Decode {
            action: action.as_str(),
            resource: resource.clone(),
            source,
        })
    }

    async fn send_ok<V: Serialize + Send + Sync>(
        &self,
        action: Action,
        resource: String,
        values: Option<V>,
    ) -> Result<Reply, BridgeError> {
        let reply = self.send(action, resource.clone(), values).await?;
        if reply.success {
            Ok(reply)
        } else {
            Err(BridgeError::Rejected {
                action: action.as_str(),
                resource,
                message: reply.error_message(),
            })
        }
    }
}

#[async_trait]
impl HostBridge for CodapBridge {
    #[instrument(level = "info", skip_all, fields(frame = %frame.name))]
    async fn init(&self, frame: &IframeDescriptor) -> Result<(), BridgeError> {
        self.send_ok(Action::Update, "interactiveFrame".to_string(), Some(frame))
            .await?;
        info!(title = %frame.title, version = %frame.version, "frame negotiated");
        Ok(())
    }

    #[instrument(level = "info", skip_all, fields(dataset = %dataset.name))]
    async fn init_data_set(&self, dataset: &DatasetDescriptor) -> Result<(), BridgeError> {
        let existing = self
            .send::<()>(Action::Get, data_context(&dataset.name), None)
            .await?;
        if existing.success {
            info!("dataset already present");
            return Ok(());
        }

        self.send_ok(Action::Create, "dataContext".to_string(), Some(dataset))
            .await?;
        info!("dataset created");
        Ok(())
    }

    #[instrument(level = "info", skip_all, fields(dataset = %dataset, records = records.len()))]
    async fn create_items(&self, records: &[Record], dataset: &str) -> Result<(), BridgeError> {
        self.send_ok(Action::Create, items_of(dataset), Some(records))
            .await?;
        debug!("items created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dead_url, init_test_logging, Stub};
    use serde_json::{json, Value};

    fn ok() -> (u16, String) {
        (200, json!({ "success": true }).to_string())
    }

    fn refused() -> (u16, String) {
        (200, json!({ "success": false }).to_string())
    }

    fn parse(bodies: &[String]) -> Vec<Value> {
        bodies
            .iter()
            .map(|b| serde_json::from_str(b).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn init_updates_the_interactive_frame() {
        init_test_logging();
        let mut stub = Stub::serve("/codap", vec![ok()]).await;
        let bridge = CodapBridge::new(Client::new(), stub.url.clone());

        bridge.init(IframeDescriptor::demographics()).await.unwrap();

        let sent = parse(&stub.received());
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["action"], "update");
        assert_eq!(sent[0]["resource"], "interactiveFrame");
        assert_eq!(sent[0]["values"]["dimensions"]["width"], 256);
        stub.finish().await;
    }

    #[tokio::test]
    async fn init_data_set_creates_only_when_missing() {
        let mut stub = Stub::serve("/codap", vec![refused(), ok()]).await;
        let bridge = CodapBridge::new(Client::new(), stub.url.clone());

        bridge
            .init_data_set(DatasetDescriptor::demographics())
            .await
            .unwrap();

        let sent = parse(&stub.received());
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0],
            json!({ "action": "get", "resource": "dataContext[demogg]" })
        );
        assert_eq!(sent[1]["action"], "create");
        assert_eq!(sent[1]["resource"], "dataContext");
        assert_eq!(sent[1]["values"]["collections"][0]["name"], "years");
        stub.finish().await;
    }

    #[tokio::test]
    async fn init_data_set_reuses_existing() {
        let mut stub = Stub::serve("/codap", vec![ok()]).await;
        let bridge = CodapBridge::new(Client::new(), stub.url.clone());

        bridge
            .init_data_set(DatasetDescriptor::demographics())
            .await
            .unwrap();

        assert_eq!(stub.received().len(), 1);
        stub.finish().await;
    }

    #[tokio::test]
    async fn create_items_posts_records_verbatim() {
        let mut stub = Stub::serve("/codap", vec![ok()]).await;
        let bridge = CodapBridge::new(Client::new(), stub.url.clone());
        let raw = json!([{ "country": "Brazil", "year": 1980, "age": 0, "females": 100, "males": 105, "total": 205 }]);
        let records: Vec<Record> = serde_json::from_value(raw.clone()).unwrap();

        bridge.create_items(&records, "demogg").await.unwrap();

        let sent = parse(&stub.received());
        assert_eq!(sent[0]["resource"], "dataContext[demogg].item");
        assert_eq!(sent[0]["values"], raw);
        stub.finish().await;
    }

    #[tokio::test]
    async fn rejection_carries_host_message() {
        let reply = json!({ "success": false, "values": { "error": "table locked" } }).to_string();
        let stub = Stub::serve("/codap", vec![(200, reply)]).await;
        let bridge = CodapBridge::new(Client::new(), stub.url.clone());

        let err = bridge.create_items(&[], "demogg").await.unwrap_err();
        match err {
            BridgeError::Rejected { message, .. } => assert_eq!(message, "table locked"),
            other => panic!("unexpected {other:?}"),
        }
        stub.finish().await;
    }

    #[tokio::test]
    async fn garbage_reply_is_a_decode_error() {
        let stub = Stub::serve("/codap", vec![(200, "ok!".to_string())]).await;
        let bridge = CodapBridge::new(Client::new(), stub.url.clone());
        let err = bridge.create_items(&[], "demogg").await.unwrap_err();
        assert!(matches!(err, BridgeError::Decode { .. }), "got {err:?}");
        stub.finish().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let bridge = CodapBridge::new(Client::new(), dead_url("/codap").await);
        let err = bridge.init(IframeDescriptor::demographics()).await.unwrap_err();
        assert!(matches!(err, BridgeError::Transport { .. }), "got {err:?}");
    }
}
