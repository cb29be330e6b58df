use serde_json::json;
use tracing::info;
use warden_core::{ApiClient, ApiError, ServerAction, ServerId};

use crate::error::{decode, unwrap_list, Result, ServerError};
use crate::types::ServerInfo;

/// Server listing and power control.
#[derive(Debug, Clone)]
pub struct Servers {
    client: ApiClient,
}

impl Servers {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<ServerInfo>> {
        let body = self
            .client
            .get(&self.client.endpoints().servers())
            .await?
            .expect_status(200)?;
        decode("server list", unwrap_list("server list", "servers", body)?)
    }

    pub async fn details(&self, server_id: &ServerId) -> Result<ServerInfo> {
        let body = self
            .client
            .get(&self.client.endpoints().server(server_id))
            .await?
            .expect_status(200)?;
        decode("server details", body)
    }

    /// Send a power action. `Invalid` never leaves the client.
    pub async fn power(&self, server_id: &ServerId, action: ServerAction) -> Result<()> {
        if !action.is_executable() {
            return Err(ServerError::InvalidAction(action));
        }
        let path = self.client.endpoints().server_power(server_id);
        let resp = self
            .client
            .post(&path, Some(&json!({ "action": action.value() })))
            .await?;
        match resp.status {
            200 | 202 | 204 => {
                info!(server_id = %server_id, action = %action, "Power action sent");
                Ok(())
            }
            status => Err(ApiError::UnrecognizedStatus { status }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServerStatus;
    use serde_json::Value;
    use std::sync::Arc;
    use warden_core::testing::{fake_client, FakeTransport};
    use warden_core::Method;

    const SERVERS: &str = "/api/v1/servers";

    #[tokio::test]
    async fn list_accepts_wrapped_and_bare_arrays() {
        let entry = json!({"serverId": "s1", "name": "Survival", "status": "online", "playersOnline": 3});
        let fake = Arc::new(FakeTransport::new().with(
            Method::Get,
            SERVERS,
            200,
            json!({ "servers": [entry.clone()] }),
        ));
        let servers = Servers::new(fake_client(&fake));
        let listed = servers.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, ServerStatus::Online);
        assert_eq!(listed[0].players_online, 3);

        fake.script(Method::Get, SERVERS, 200, json!([entry]));
        assert_eq!(servers.list().await.unwrap()[0].name, "Survival");
    }

    #[tokio::test]
    async fn details_reports_bad_payload() {
        let fake = Arc::new(FakeTransport::new().with(
            Method::Get,
            "/api/v1/servers/s1",
            200,
            json!({"name": 5}),
        ));
        let err = Servers::new(fake_client(&fake))
            .details(&ServerId::from("s1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::UnexpectedPayload { .. }));
    }

    #[tokio::test]
    async fn power_posts_action_value() {
        let fake = Arc::new(FakeTransport::new().with(
            Method::Post,
            "/api/v1/servers/s1/power",
            204,
            Value::Null,
        ));
        Servers::new(fake_client(&fake))
            .power(&ServerId::from("s1"), ServerAction::Restart)
            .await
            .unwrap();
        assert_eq!(fake.calls()[0].body, Some(json!({"action": 4})));
    }

    #[tokio::test]
    async fn invalid_action_is_not_sent() {
        let fake = Arc::new(FakeTransport::new());
        let err = Servers::new(fake_client(&fake))
            .power(&ServerId::from("s1"), ServerAction::Invalid)
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidAction(ServerAction::Invalid)));
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_server_is_not_found() {
        let fake = Arc::new(FakeTransport::new());
        let err = Servers::new(fake_client(&fake))
            .details(&ServerId::from("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Api(ApiError::NotFound { .. })));
    }
}
