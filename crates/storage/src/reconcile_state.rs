// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only access to the share/volume/bridge/container rows the boot
//! reconciler walks on startup. Full CRUD over these entities (editing a
//! share's path, creating a ZFS-backed volume, ...) is the out-of-scope
//! tool-wrapper surface behind the HTTP layer; this module only exposes
//! the listing the reconciler needs to bring live OS state back into
//! agreement with what operators have already configured.

use sqlx::FromRow;

use crate::error::StorageError;
use crate::pool::DbPool;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ShareRow {
    pub name: String,
    pub path: String,
    pub owner: String,
    pub group_name: String,
    pub mode: i64,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct VolumeRow {
    pub device: String,
    pub mount_target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BridgeRow {
    pub name: String,
    pub members_csv: String,
    pub ip_cidr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ContainerRow {
    pub name: String,
    pub autostart: bool,
}

pub async fn list_shares(pool: &DbPool) -> Result<Vec<ShareRow>, StorageError> {
    let rows = sqlx::query_as(
        "SELECT name, path, owner, group_name, mode, is_default FROM share ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_volumes(pool: &DbPool) -> Result<Vec<VolumeRow>, StorageError> {
    let rows = sqlx::query_as("SELECT device, mount_target FROM volume ORDER BY mount_target")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_bridges(pool: &DbPool) -> Result<Vec<BridgeRow>, StorageError> {
    let rows = sqlx::query_as("SELECT name, members_csv, ip_cidr FROM bridge ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_containers(pool: &DbPool) -> Result<Vec<ContainerRow>, StorageError> {
    let rows = sqlx::query_as("SELECT name, autostart FROM container ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
