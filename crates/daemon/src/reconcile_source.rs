// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production [`ReconcileSource`]: reads the share/volume/bridge/
//! container rows straight out of `swnas-storage`.

use async_trait::async_trait;
use swnas_core::OrchestrationError;
use swnas_reconciler::{BridgeSpec, ContainerSpec, ReconcileSource, ShareSpec, VolumeSpec};
use swnas_storage::{reconcile_state, DbPool};

pub struct DbReconcileSource {
    pool: DbPool,
}

impl DbReconcileSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReconcileSource for DbReconcileSource {
    async fn shares(&self) -> Result<Vec<ShareSpec>, OrchestrationError> {
        let rows = reconcile_state::list_shares(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|r| ShareSpec {
                name: r.name,
                path: r.path,
                owner: r.owner,
                group: r.group_name,
                mode: r.mode as u32,
                is_default: r.is_default,
            })
            .collect())
    }

    async fn volumes(&self) -> Result<Vec<VolumeSpec>, OrchestrationError> {
        let rows = reconcile_state::list_volumes(&self.pool).await?;
        Ok(rows.into_iter().map(|r| VolumeSpec { device: r.device, mount_target: r.mount_target }).collect())
    }

    async fn bridges(&self) -> Result<Vec<BridgeSpec>, OrchestrationError> {
        let rows = reconcile_state::list_bridges(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|r| BridgeSpec {
                name: r.name,
                members: r.members_csv.split(',').filter(|s| !s.is_empty()).map(str::to_string).collect(),
                ip_cidr: r.ip_cidr,
            })
            .collect())
    }

    async fn containers(&self) -> Result<Vec<ContainerSpec>, OrchestrationError> {
        let rows = reconcile_state::list_containers(&self.pool).await?;
        Ok(rows.into_iter().map(|r| ContainerSpec { name: r.name, autostart: r.autostart }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swnas_storage::open_pool;

    #[tokio::test]
    async fn empty_database_yields_empty_lists() {
        let pool = open_pool("sqlite::memory:").await.expect("open pool");
        let source = DbReconcileSource::new(pool);
        assert!(source.shares().await.expect("shares").is_empty());
        assert!(source.volumes().await.expect("volumes").is_empty());
        assert!(source.bridges().await.expect("bridges").is_empty());
        assert!(source.containers().await.expect("containers").is_empty());
    }

    #[tokio::test]
    async fn bridge_members_csv_splits_into_a_vec() {
        let pool = open_pool("sqlite::memory:").await.expect("open pool");
        sqlx::query("INSERT INTO bridge (name, members_csv, ip_cidr) VALUES ('br0', 'eth0,eth1', NULL)")
            .execute(&pool)
            .await
            .expect("seed");
        let source = DbReconcileSource::new(pool);
        let bridges = source.bridges().await.expect("bridges");
        assert_eq!(bridges.len(), 1);
        assert_eq!(bridges[0].members, vec!["eth0".to_string(), "eth1".to_string()]);
    }
}
