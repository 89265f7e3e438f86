// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The boot reconciler: six independently try-catchable steps that push
//! persisted state onto the live OS, idempotently.

use std::sync::Arc;

use swnas_shell::Executor;
use tracing::warn;

use crate::report::{ReconcileReport, StepName, StepOutcome};
use crate::source::{BridgeSpec, ReconcileSource, ShareSpec, VolumeSpec};

const SAMBA_CONFIG_PATH: &str = "/etc/samba/smb.conf";
const MANAGED_BEGIN: &str = "# STUMPFWORKS-MANAGED-BEGIN";
const MANAGED_END: &str = "# STUMPFWORKS-MANAGED-END";

pub struct BootReconciler<S: ReconcileSource> {
    executor: Arc<Executor>,
    source: S,
    samba_config_path: String,
}

impl<S: ReconcileSource> BootReconciler<S> {
    pub fn new(executor: Arc<Executor>, source: S) -> Self {
        Self { executor, source, samba_config_path: SAMBA_CONFIG_PATH.to_string() }
    }

    /// Override the on-disk samba config path; production always uses
    /// the real path, tests point this at a temp file.
    pub fn with_samba_config_path(mut self, path: impl Into<String>) -> Self {
        self.samba_config_path = path.into();
        self
    }

    /// Run every step in order. A failing step logs a warning and the
    /// next step still runs; nothing here ever deletes OS state.
    pub async fn run(&self) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        report.push(self.step(StepName::DefaultShares, Self::ensure_default_shares(&self.source)).await);
        report.push(self.step(StepName::SharePermissions, self.reapply_share_permissions()).await);
        report.push(self.step(StepName::SambaConfig, self.repair_samba_config()).await);
        report.push(self.step(StepName::PersistedVolumes, self.mount_persisted_volumes()).await);
        report.push(self.step(StepName::NetworkBridges, self.ensure_network_bridges()).await);
        report.push(self.step(StepName::LxcAutostart, self.start_autostart_containers()).await);

        report
    }

    /// Run `cmd args...` and turn both a spawn-level error and a non-zero
    /// exit code into the same `Err(String)`, since a step only cares
    /// that the action didn't take effect, not which layer rejected it.
    async fn exec_ok(&self, cmd: &str, args: &[String]) -> Result<swnas_shell::CommandResult, String> {
        let result = self.executor.execute(cmd, args).await.map_err(|e| e.to_string())?;
        if !result.success {
            return Err(format!("{cmd} exited {}: {}", result.exit_code, result.stderr.trim()));
        }
        Ok(result)
    }

    async fn step(
        &self,
        name: StepName,
        fut: impl std::future::Future<Output = Result<u32, String>>,
    ) -> StepOutcome {
        match fut.await {
            Ok(changed) => StepOutcome::ok(name, changed),
            Err(message) => {
                warn!(step = name.as_str(), error = %message, "reconcile step failed, continuing");
                StepOutcome::warn(name, message)
            }
        }
    }

    /// A share whose directory cannot be created (bad path, permission
    /// denied) is logged and skipped; every other default share in the
    /// list is still attempted.
    async fn ensure_default_shares(source: &S) -> Result<u32, String> {
        let shares = source.shares().await.map_err(|e| e.to_string())?;
        let mut created = 0;
        for share in shares.iter().filter(|s| s.is_default) {
            match ensure_one_default_share(share).await {
                Ok(changed) => created += changed,
                Err(e) => warn!(share = %share.name, path = %share.path, error = %e, "failed to ensure default share directory, continuing"),
            }
        }
        Ok(created)
    }

    /// Per-item failures (a single share's `chown`/`chmod` failing) are
    /// logged and skipped, not propagated: every remaining share in the
    /// list still gets its ownership reapplied.
    async fn reapply_share_permissions(&self) -> Result<u32, String> {
        let shares = self.source.shares().await.map_err(|e| e.to_string())?;
        let mut applied = 0;
        for share in &shares {
            match self.apply_ownership(share).await {
                Ok(()) => applied += 1,
                Err(e) => warn!(share = %share.name, error = %e, "failed to reapply share permissions, continuing"),
            }
        }
        Ok(applied)
    }

    async fn apply_ownership(&self, share: &ShareSpec) -> Result<(), String> {
        self.exec_ok("chown", &[format!("{}:{}", share.owner, share.group), share.path.clone()]).await?;
        self.exec_ok("chmod", &[format!("{:o}", share.mode), share.path.clone()]).await?;
        Ok(())
    }

    /// Validate the on-disk Samba config and rewrite only the managed
    /// block this product owns, bounded by marker comments so hand
    /// edits outside the block survive.
    async fn repair_samba_config(&self) -> Result<u32, String> {
        if !self.executor.command_exists("testparm") {
            return Err("testparm not available, skipping samba config repair".to_string());
        }

        let existing = tokio::fs::read_to_string(&self.samba_config_path).await.unwrap_or_default();
        let shares = self.source.shares().await.map_err(|e| e.to_string())?;
        let managed_block = render_managed_block(&shares);

        let rewritten = replace_managed_block(&existing, &managed_block);
        if rewritten != existing {
            tokio::fs::write(&self.samba_config_path, &rewritten).await.map_err(|e| e.to_string())?;
        }

        self.exec_ok("testparm", &["-s".to_string(), self.samba_config_path.clone()]).await?;

        Ok(shares.len() as u32)
    }

    /// A volume that fails to mount (device gone, target busy) is
    /// logged and skipped; the remaining volumes are still attempted in
    /// order.
    async fn mount_persisted_volumes(&self) -> Result<u32, String> {
        let volumes = self.source.volumes().await.map_err(|e| e.to_string())?;
        let mut mounted = 0;
        for volume in &volumes {
            match self.mount_one_volume(volume).await {
                Ok(changed) => mounted += changed,
                Err(e) => warn!(target = %volume.mount_target, error = %e, "failed to mount persisted volume, continuing"),
            }
        }
        Ok(mounted)
    }

    async fn mount_one_volume(&self, volume: &VolumeSpec) -> Result<u32, String> {
        if self.is_mounted(&volume.mount_target).await? {
            return Ok(0);
        }
        self.exec_ok("mount", &[volume.device.clone(), volume.mount_target.clone()]).await?;
        Ok(1)
    }

    async fn is_mounted(&self, target: &str) -> Result<bool, String> {
        let result = self
            .executor
            .execute("mountpoint", &["-q".to_string(), target.to_string()])
            .await
            .map_err(|e| e.to_string())?;
        Ok(result.success)
    }

    /// All bridges in the list are attempted in order even if one of
    /// them fails (e.g. `ip link add` erroring on a busy name): a
    /// failure logs a warning and processing moves on to the next
    /// bridge, matching the reconciler's partial-failure tolerance at
    /// the level of individual entities, not just whole steps.
    async fn ensure_network_bridges(&self) -> Result<u32, String> {
        let bridges = self.source.bridges().await.map_err(|e| e.to_string())?;
        let mut created = 0;
        for bridge in &bridges {
            match self.ensure_one_bridge(bridge).await {
                Ok(changed) => created += changed,
                Err(e) => warn!(bridge = %bridge.name, error = %e, "failed to restore network bridge, continuing"),
            }
        }
        Ok(created)
    }

    async fn ensure_one_bridge(&self, bridge: &BridgeSpec) -> Result<u32, String> {
        if self.bridge_exists(bridge).await? {
            return Ok(0);
        }
        self.create_bridge(bridge).await?;
        Ok(1)
    }

    async fn bridge_exists(&self, bridge: &BridgeSpec) -> Result<bool, String> {
        let result = self
            .executor
            .execute("ip", &["link".to_string(), "show".to_string(), bridge.name.clone()])
            .await
            .map_err(|e| e.to_string())?;
        Ok(result.success)
    }

    async fn create_bridge(&self, bridge: &BridgeSpec) -> Result<(), String> {
        self.exec_ok(
            "ip",
            &["link".to_string(), "add".to_string(), "name".to_string(), bridge.name.clone(), "type".to_string(), "bridge".to_string()],
        )
        .await?;

        for member in &bridge.members {
            self.exec_ok(
                "ip",
                &["link".to_string(), "set".to_string(), member.clone(), "master".to_string(), bridge.name.clone()],
            )
            .await?;
        }

        if let Some(cidr) = &bridge.ip_cidr {
            self.exec_ok("ip", &["addr".to_string(), "add".to_string(), cidr.clone(), "dev".to_string(), bridge.name.clone()]).await?;
        }

        self.exec_ok("ip", &["link".to_string(), "set".to_string(), bridge.name.clone(), "up".to_string()]).await?;
        Ok(())
    }

    /// A container that fails to start is logged and skipped; the rest
    /// of the autostart list still gets its chance.
    async fn start_autostart_containers(&self) -> Result<u32, String> {
        let containers = self.source.containers().await.map_err(|e| e.to_string())?;
        let mut started = 0;
        for container in containers.iter().filter(|c| c.autostart) {
            match self.start_one_container(&container.name).await {
                Ok(changed) => started += changed,
                Err(e) => warn!(container = %container.name, error = %e, "failed to start autostart container, continuing"),
            }
        }
        Ok(started)
    }

    async fn start_one_container(&self, name: &str) -> Result<u32, String> {
        if self.container_running(name).await? {
            return Ok(0);
        }
        self.exec_ok("lxc-start", &["-n".to_string(), name.to_string()]).await?;
        Ok(1)
    }

    async fn container_running(&self, name: &str) -> Result<bool, String> {
        let result = self
            .executor
            .execute("lxc-info", &["-n".to_string(), name.to_string(), "-s".to_string()])
            .await
            .map_err(|e| e.to_string())?;
        Ok(result.success && result.stdout.contains("RUNNING"))
    }
}

async fn ensure_one_default_share(share: &ShareSpec) -> Result<u32, String> {
    if tokio::fs::try_exists(&share.path).await.map_err(|e| e.to_string())? {
        return Ok(0);
    }
    tokio::fs::create_dir_all(&share.path).await.map_err(|e| e.to_string())?;
    Ok(1)
}

fn render_managed_block(shares: &[ShareSpec]) -> String {
    let mut body = String::new();
    for share in shares {
        body.push_str(&format!(
            "[{}]\n    path = {}\n    valid users = {}\n\n",
            share.name, share.path, share.owner
        ));
    }
    format!("{MANAGED_BEGIN}\n{body}{MANAGED_END}\n")
}

fn replace_managed_block(existing: &str, managed_block: &str) -> String {
    match (existing.find(MANAGED_BEGIN), existing.find(MANAGED_END)) {
        (Some(start), Some(end)) if end > start => {
            let end = end + MANAGED_END.len();
            format!("{}{}{}", &existing[..start], managed_block, &existing[end..])
        }
        _ => {
            if existing.is_empty() {
                managed_block.to_string()
            } else {
                format!("{existing}\n{managed_block}")
            }
        }
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
