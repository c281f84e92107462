use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, run};

const ABOUT_CS: &str = r#"
public class AboutDialog
{
    public AboutDialog()
    {
        Title = Localize("About");
        Version.Text = Localize("Version {0}", "title");
        Close.Text = "Close".Localize();
        // Hidden.Text = Localize("Not shipped");
    }
}
"#;

const MAIN_XAML: &str = r#"<Window>
  <Button Content="{loc:Loc Save}" />
</Window>
"#;

#[test]
fn test_extract_writes_sorted_catalog() -> Result<()> {
    let test = CliTest::with_file("src/About.cs", ABOUT_CS)?;
    test.write_file("src/Main.xaml", MAIN_XAML)?;

    let (code, stdout, _) = run(test.extract_command())?;
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "✓ Wrote 4 strings to Localization.json (2 files scanned)\n"
    );

    let catalog = test.read_json("Localization.json")?;
    assert_eq!(
        catalog,
        json!([
            { "text": "About", "context": "", "translation": "About" },
            { "text": "Close", "context": "", "translation": "Close" },
            { "text": "Save", "context": "", "translation": "Save" },
            { "text": "Version {0}", "context": "title", "translation": "Version {0}" },
        ])
    );
    Ok(())
}

#[test]
fn test_extract_property_descriptors() -> Result<()> {
    let test = CliTest::with_file(
        "Sphere.cs",
        r#"
[LocalizedDescription("Shows the grid")]
public bool ShowGrid { get; set; }

var radius = Property(typeof(Sphere), "Radius", Category(Geometry, 2), "Distance from the center");
"#,
    )?;

    let (code, stdout, _) = run(test.extract_command())?;
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "✓ Wrote 3 strings to Localization.json (1 file scanned)\n"
    );

    let catalog = test.read_json("Localization.json")?;
    assert_eq!(
        catalog,
        json!([
            { "text": "Distance from the center", "context": "", "translation": "Distance from the center" },
            { "text": "Radius", "context": "", "translation": "Radius" },
            { "text": "Shows the grid", "context": "", "translation": "Shows the grid" },
        ])
    );
    Ok(())
}

#[test]
fn test_extract_keeps_translations() -> Result<()> {
    let test = CliTest::with_file("About.cs", r#"var a = Localize("About");"#)?;
    test.write_file(
        "Localization.json",
        r#"[
  { "text": "About", "context": "", "translation": "À propos" },
  { "text": "Gone", "context": "", "translation": "Parti" }
]"#,
    )?;

    let (code, _, stderr) = run(test.extract_command())?;
    assert_eq!(code, 0);
    assert!(stderr.contains("1 translated string is no longer in the source code: \"Gone\""));

    let catalog = test.read_json("Localization.json")?;
    assert_eq!(
        catalog,
        json!([
            { "text": "About", "context": "", "translation": "À propos" },
            { "text": "Gone", "context": "", "translation": "Parti" },
        ])
    );
    Ok(())
}

#[test]
fn test_extract_dry_run_does_not_write() -> Result<()> {
    let test = CliTest::with_file("About.cs", ABOUT_CS)?;

    let mut cmd = test.extract_command();
    cmd.arg("--dry-run");
    let (code, stdout, _) = run(cmd)?;

    assert_eq!(code, 0);
    assert!(stdout.starts_with("Localization.json (3 strings from 1 file, not written)\n"));
    assert!(stdout.contains("\"Version {0}\"  \"title\""));
    assert!(!test.root().join("Localization.json").exists());
    Ok(())
}

#[test]
fn test_extract_reports_unterminated_literal() -> Result<()> {
    let test = CliTest::with_file(
        "Broken.cs",
        "var ok = Localize(\"fine\");\nvar bad = Localize(\"open);\n",
    )?;

    let (code, _, stderr) = run(test.extract_command())?;
    assert_eq!(code, 0);
    assert!(stderr.contains("warning: line 2: unterminated string literal in call to Localize"));
    assert!(stderr.contains("--> Broken.cs"));

    let catalog = test.read_json("Localization.json")?;
    assert_eq!(
        catalog,
        json!([{ "text": "fine", "context": "", "translation": "fine" }])
    );
    Ok(())
}

#[test]
fn test_extract_pads_duplicate_placeholder_contexts() -> Result<()> {
    let test = CliTest::with_file(
        "Status.cs",
        r#"
var a = Localize("{0} files", "count");
var b = Localize("{0} folders", "count");
"#,
    )?;

    let (code, _, _) = run(test.extract_command())?;
    assert_eq!(code, 0);

    let catalog = test.read_json("Localization.json")?;
    assert_eq!(catalog[0]["context"], "count");
    assert_eq!(catalog[1]["context"], "count ");
    Ok(())
}

#[test]
fn test_extract_with_config_targets() -> Result<()> {
    let test = CliTest::with_file("app/About.cs", r#"Localize("App");"#)?;
    test.write_file("tools/Tool.cs", r#"Localize("Tool");"#)?;
    test.write_file(
        ".locxrc.json",
        r#"{
  "targets": [
    { "sources": ["app"], "output": "app/Strings.json" },
    { "sources": ["tools"], "output": "tools/Strings.json" }
  ]
}"#,
    )?;

    let mut cmd = test.extract_command();
    cmd.args(["--target", "tools/Strings.json"]);
    let (code, _, _) = run(cmd)?;

    assert_eq!(code, 0);
    assert!(!test.root().join("app/Strings.json").exists());
    let catalog = test.read_json("tools/Strings.json")?;
    assert_eq!(catalog[0]["text"], "Tool");
    Ok(())
}

#[test]
fn test_extract_unknown_target_is_error() -> Result<()> {
    let test = CliTest::with_file("About.cs", ABOUT_CS)?;

    let mut cmd = test.extract_command();
    cmd.args(["--target", "Missing.json"]);
    let (code, _, stderr) = run(cmd)?;

    assert_eq!(code, 2);
    assert!(stderr.contains("No target with output 'Missing.json'"));
    Ok(())
}

#[test]
fn test_extract_invalid_config_is_error() -> Result<()> {
    let test = CliTest::with_file(".locxrc.json", r#"{ "markers": { "methods": [] } }"#)?;

    let (code, _, stderr) = run(test.extract_command())?;
    assert_eq!(code, 2);
    assert!(stderr.starts_with("Error:"));
    Ok(())
}

#[test]
fn test_extract_writes_log_file() -> Result<()> {
    let test = CliTest::with_file("About.cs", ABOUT_CS)?;

    let mut cmd = test.extract_command();
    cmd.args(["--log", "extract.log"]);
    let (code, _, _) = run(cmd)?;

    assert_eq!(code, 0);
    let log = test.read_file("extract.log")?;
    assert!(log.contains("info: STARTING"));
    assert!(log.contains("info: Parsed 1 file(s), 3 unique string(s) to localize"));
    assert!(log.contains("info: FINISHED"));
    Ok(())
}
