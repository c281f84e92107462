use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["markers"]["methods"][0], "Localize");
    assert_eq!(parsed["markers"]["markupExtension"], "Loc");
    assert_eq!(parsed["targets"][0]["output"], "Localization.json");
    assert!(
        parsed.get("disassembler").is_none(),
        "Default config should not name a disassembler"
    );

    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.init_command())?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "✓ Created .locxrc.json\n");

    assert!(test.root().join(".locxrc.json").exists());
    let content = test.read_file(".locxrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".locxrc.json", "{}")?;

    let (code, stdout, stderr) = run(test.init_command())?;
    assert_eq!(code, 1);
    assert_eq!(stdout, "");
    assert!(stderr.contains("error: .locxrc.json already exists"));
    assert_eq!(test.read_file(".locxrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_loadable() -> Result<()> {
    let test = CliTest::with_file("About.cs", r#"Localize("About");"#)?;

    let (code, _, _) = run(test.init_command())?;
    assert_eq!(code, 0);

    let (code, _, _) = run(test.extract_command())?;
    assert_eq!(code, 0);
    assert_eq!(test.read_json("Localization.json")?[0]["text"], "About");

    Ok(())
}
