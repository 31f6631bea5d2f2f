use async_trait::async_trait;
use anyhow::{Result, Context as AnyhowContext};
use redis::AsyncCommands;
use crate::store::{storage_key, GroupExpansionStore, GroupSet};

/// Each workflow's record is a Redis SET, so toggles are atomic server-side
/// (`SADD`/`SREM`) and concurrent writers cannot drop each other's groups.
pub struct RedisExpansionStore {
    client: redis::Client,
    namespace: String,
}

impl RedisExpansionStore {
    pub fn new(client: redis::Client) -> Self {
        Self::with_namespace(client, "taskgrid")
    }

    pub fn with_namespace(client: redis::Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    fn key(&self, workflow_id: &str) -> String {
        format!("{}:{}", self.namespace, storage_key(workflow_id))
    }
}

#[async_trait]
impl GroupExpansionStore for RedisExpansionStore {
    fn name(&self) -> &str {
        "redis"
    }

    async fn open_groups(&self, workflow_id: &str) -> Result<Option<GroupSet>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = self.key(workflow_id);

        let exists: bool = conn.exists(&key).await?;
        if !exists {
            return Ok(None);
        }

        let groups: GroupSet = conn
            .smembers(&key)
            .await
            .with_context(|| format!("Failed to read open groups from {}", key))?;
        Ok(Some(groups))
    }

    async fn set_open(&self, workflow_id: &str, group_id: &str, open: bool) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = self.key(workflow_id);

        if open {
            let _: () = conn.sadd(&key, group_id).await?;
        } else {
            let _: () = conn.srem(&key, group_id).await?;
        }
        Ok(())
    }

    async fn clear(&self, workflow_id: &str) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(self.key(workflow_id)).await?;
        Ok(())
    }
}
