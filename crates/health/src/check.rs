// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static component list and the survey that turns it into a
//! [`HealthReport`].

use swnas_shell::Executor;

use crate::report::{ComponentCheck, ComponentStatus, HealthCheckFailed, HealthReport};

/// One component this appliance depends on: a binary, optionally an
/// init-system service to probe for liveness.
#[derive(Debug, Clone, Copy)]
pub struct ComponentSpec {
    pub name: &'static str,
    pub command: &'static str,
    pub required: bool,
    pub version_flag: Option<&'static str>,
    pub service_name: Option<&'static str>,
}

/// The static survey list. Required components gate startup; optional
/// ones degrade their owning manager to disabled.
pub const COMPONENTS: &[ComponentSpec] = &[
    ComponentSpec { name: "database", command: "sqlite3", required: true, version_flag: Some("--version"), service_name: None },
    ComponentSpec { name: "systemd", command: "systemctl", required: true, version_flag: Some("--version"), service_name: None },
    ComponentSpec { name: "samba", command: "smbd", required: false, version_flag: Some("--version"), service_name: Some("smbd") },
    ComponentSpec { name: "nfs", command: "exportfs", required: false, version_flag: None, service_name: Some("nfs-server") },
    ComponentSpec { name: "zfs", command: "zpool", required: false, version_flag: Some("version"), service_name: None },
    ComponentSpec { name: "lvm", command: "lvs", required: false, version_flag: Some("--version"), service_name: None },
    ComponentSpec { name: "mdadm", command: "mdadm", required: false, version_flag: Some("--version"), service_name: None },
    ComponentSpec { name: "smartmontools", command: "smartctl", required: false, version_flag: Some("--version"), service_name: None },
    ComponentSpec { name: "iscsi", command: "iscsiadm", required: false, version_flag: Some("--version"), service_name: Some("iscsid") },
    ComponentSpec { name: "docker", command: "docker", required: false, version_flag: Some("--version"), service_name: Some("docker") },
    ComponentSpec { name: "lxc", command: "lxc-ls", required: false, version_flag: Some("--version"), service_name: None },
    ComponentSpec { name: "libvirt", command: "virsh", required: false, version_flag: Some("--version"), service_name: Some("libvirtd") },
    ComponentSpec { name: "openvpn", command: "openvpn", required: false, version_flag: Some("--version"), service_name: None },
    ComponentSpec { name: "nut", command: "upsc", required: false, version_flag: None, service_name: Some("nut-monitor") },
];

async fn probe_service(executor: &Executor, service: &str) -> ComponentStatus {
    match executor.execute("systemctl", &["is-active".to_string(), service.to_string()]).await {
        Ok(result) if result.stdout.trim() == "active" => ComponentStatus::Ok,
        Ok(_) => ComponentStatus::Warning,
        Err(_) => ComponentStatus::Warning,
    }
}

async fn check_one(executor: &Executor, spec: &ComponentSpec) -> ComponentCheck {
    let found = executor.command_exists(spec.command);

    if !found {
        return ComponentCheck {
            name: spec.name,
            required: spec.required,
            found: false,
            path: None,
            version: None,
            status: ComponentStatus::Missing,
            message: Some(format!("{} not found on PATH or admin directories", spec.command)),
        };
    }

    let version = if let Some(flag) = spec.version_flag {
        executor
            .execute(spec.command, &[flag.to_string()])
            .await
            .ok()
            .filter(|r| r.success)
            .map(|r| r.stdout.lines().next().unwrap_or_default().trim().to_string())
    } else {
        None
    };

    let status = if let Some(service) = spec.service_name {
        probe_service(executor, service).await
    } else {
        ComponentStatus::Ok
    };

    ComponentCheck {
        name: spec.name,
        required: spec.required,
        found: true,
        path: Some(spec.command.to_string()),
        version,
        status,
        message: None,
    }
}

/// Survey every component in [`COMPONENTS`], returning the aggregate
/// report. Returns `Err` only when a required component is missing or in
/// error, per the design's "startup aborts" rule; the caller still has
/// access to the full report via [`HealthCheckFailed::report`].
pub async fn run_health_check(executor: &Executor) -> Result<HealthReport, HealthCheckFailed> {
    let mut checks = Vec::with_capacity(COMPONENTS.len());
    for spec in COMPONENTS {
        checks.push(check_one(executor, spec).await);
    }

    let report = HealthReport::from_checks(checks);

    if report.has_fatal_failure() {
        let missing = report
            .checks
            .iter()
            .filter(|c| c.required && matches!(c.status, ComponentStatus::Missing | ComponentStatus::Error))
            .map(|c| c.name)
            .collect();
        return Err(HealthCheckFailed { missing, report });
    }

    Ok(report)
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
