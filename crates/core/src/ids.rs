// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed entity identifiers.
//!
//! Each ID is a prefixed nanoid wrapped in a newtype so call sites cannot
//! accidentally pass a task id where an execution id is expected.

crate::define_id! {
    /// Identifies a persisted scheduled task definition.
    pub struct TaskId("tsk-");
}

crate::define_id! {
    /// Identifies a single fire (row) of a scheduled task.
    pub struct ExecutionId("exe-");
}

crate::define_id! {
    /// Identifies a single alert-log delivery attempt row.
    pub struct AlertLogId("alg-");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_round_trips_through_string() {
        let id = TaskId::new();
        let again = TaskId::from_string(id.as_str());
        assert_eq!(id, again);
        assert!(id.as_str().starts_with("tsk-"));
    }

    #[test]
    fn ids_of_different_kinds_have_distinct_prefixes() {
        assert_eq!(TaskId::PREFIX, "tsk-");
        assert_eq!(ExecutionId::PREFIX, "exe-");
        assert_eq!(AlertLogId::PREFIX, "alg-");
    }
}
