use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(test.stdout(&output).contains("Created .vmdocrc.json"));

    let content = test.read_file(".vmdocrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["sourceRoot"], "./");
    assert_eq!(parsed["reset"], false);
    assert_eq!(parsed["overwrite"], false);
    assert!(parsed["classes"].as_array().is_some_and(Vec::is_empty));
    assert!(
        content.contains("\n  \"sourceRoot\""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".vmdocrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(test.stderr(&output), "Error: .vmdocrc.json already exists\n");
    assert_eq!(test.read_file(".vmdocrc.json")?, "{}");

    Ok(())
}
