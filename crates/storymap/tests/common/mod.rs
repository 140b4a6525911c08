//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use storymap::domain::{WorkItem, WorkItemId};

pub const BASE: &str = "https://dev.azure.com/contoso/_apis/wit/workItems";
pub const SUCCESSOR: &str = "System.LinkTypes.Dependency-Forward";
pub const PREDECESSOR: &str = "System.LinkTypes.Dependency-Reverse";
pub const CHILD: &str = "System.LinkTypes.Hierarchy-Forward";
pub const PARENT: &str = "System.LinkTypes.Hierarchy-Reverse";

/// REST URL of a work item.
pub fn item_url(id: WorkItemId) -> String {
    format!("{BASE}/{id}")
}

/// A labelled relation to another work item.
pub fn relation(rel: &str, to: WorkItemId, name: &str) -> Value {
    json!({
        "rel": rel,
        "url": item_url(to),
        "attributes": { "isLocked": false, "name": name },
    })
}

/// A work item record as the REST API returns it.
pub fn work_item(
    id: WorkItemId,
    work_item_type: &str,
    state: &str,
    title: &str,
    relations: Vec<Value>,
) -> WorkItem {
    serde_json::from_value(json!({
        "id": id,
        "rev": 1,
        "url": item_url(id),
        "fields": {
            "System.WorkItemType": work_item_type,
            "System.State": state,
            "System.Title": title,
            "System.AreaPath": "Shop\\Checkout",
        },
        "relations": relations,
    }))
    .expect("valid work item fixture")
}

/// A user story in the `Active` state.
pub fn story(id: WorkItemId, relations: Vec<Value>) -> WorkItem {
    work_item(id, "User Story", "Active", &format!("Story {id}"), relations)
}

/// Run the `azsm` binary in `dir` without Azure environment variables.
pub fn run_azsm_in_dir(dir: &Path, args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_azsm"))
        .args(args)
        .current_dir(dir)
        .env_remove("AZURE_BASE_URL")
        .env_remove("AZURE_PERSONAL_ACCESS_TOKEN")
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute azsm binary");

    // The binary may exit before reading stdin; a broken pipe is fine then.
    if let Some(mut pipe) = child.stdin.take() {
        let _ = pipe.write_all(stdin);
    }

    child.wait_with_output().expect("Failed to wait for azsm")
}
