//! Test helpers shared by the prompt registry's unit tests.

use std::path::{Path, PathBuf};

use serde_json::Map;

use crate::prompts::models::{content_hash, LifecycleStatus, PromptArtifact};

pub fn artifact(task: &str, version: &str) -> PromptArtifact {
    let system_prompt = format!("You are the {task} assistant, v{version}.");
    let user_prompt_template = "Process this: {input_text}".to_string();
    PromptArtifact {
        task: task.to_string(),
        version: version.to_string(),
        status: LifecycleStatus::Active,
        content_hash: content_hash(&system_prompt, &user_prompt_template),
        system_prompt,
        user_prompt_template,
        created_at: "2026-02-04T10:00:00Z".to_string(),
        created_by: "test@example.com".to_string(),
        description: format!("{task} {version}"),
        validation: Map::new(),
        metadata: Map::new(),
    }
}

/// Writes a complete artifact file and returns its path.
pub fn write_prompt(
    dir: &Path,
    file_name: &str,
    task: &str,
    version: &str,
    status: &str,
) -> PathBuf {
    write_prompt_with_template(
        dir,
        file_name,
        task,
        version,
        status,
        "Process this: {input_text}",
    )
}

pub fn write_prompt_with_template(
    dir: &Path,
    file_name: &str,
    task: &str,
    version: &str,
    status: &str,
    template: &str,
) -> PathBuf {
    let yaml = format!(
        r#"version: "{version}"
created_at: "2026-02-04T10:00:00Z"
created_by: test@example.com
status: {status}
task: {task}
description: Test prompt {task} {version}
system_prompt: |
  You are a test assistant for {task} v{version}.
user_prompt_template: "{template}"
validation:
  max_tokens: 100
  temperature: 0.5
metadata:
  approved_by: manager@example.com
"#
    );
    let path = dir.join(file_name);
    std::fs::write(&path, yaml).unwrap();
    path
}
