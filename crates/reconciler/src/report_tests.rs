// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn report_with_no_warnings_reports_clean() {
    let mut report = ReconcileReport::default();
    report.push(StepOutcome::ok(StepName::DefaultShares, 2));
    assert!(!report.has_warnings());
}

#[test]
fn a_single_warning_flips_has_warnings() {
    let mut report = ReconcileReport::default();
    report.push(StepOutcome::ok(StepName::DefaultShares, 2));
    report.push(StepOutcome::warn(StepName::SambaConfig, "testparm not found"));
    assert!(report.has_warnings());
}

#[test]
fn json_export_includes_step_names() {
    let mut report = ReconcileReport::default();
    report.push(StepOutcome::ok(StepName::LxcAutostart, 1));
    let json = report.to_json();
    assert_eq!(json["steps"][0]["step"], "lxc_autostart");
}
