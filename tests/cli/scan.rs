use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{CliTest, run};

#[test]
fn test_scan_source_file() -> Result<()> {
    let test = CliTest::with_file(
        "About.cs",
        r#"Title = Localize("About"); Version = Localize("Version {0}", "title");"#,
    )?;

    let mut cmd = test.scan_command();
    cmd.arg("About.cs");
    let (code, stdout, _) = run(cmd)?;

    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "\"About\"\n\
         \"Version {0}\"  \"title\"\n\
         ✓ Found 2 strings in About.cs\n"
    );
    Ok(())
}

#[test]
fn test_scan_markup_as_json() -> Result<()> {
    let test = CliTest::with_file(
        "Main.xaml",
        r#"<TextBlock Text="{loc:Loc 'Fish &amp; Chips'}" ToolTip="{loc:Loc Open\, please}" />"#,
    )?;

    let mut cmd = test.scan_command();
    cmd.args(["Main.xaml", "--json"]);
    let (code, stdout, _) = run(cmd)?;

    assert_eq!(code, 0);
    let records: Value = serde_json::from_str(&stdout)?;
    assert_eq!(
        records,
        json!([
            { "text": "Fish & Chips", "context": "" },
            { "text": "Open, please", "context": "" },
        ])
    );
    Ok(())
}

#[test]
fn test_scan_il_listing() -> Result<()> {
    let test = CliTest::with_file(
        "App.il",
        r#"    IL_0000:  ldstr      "Save"
    IL_0005:  ldstr      "menu item"
    IL_000a:  call       string Sce.Atf.Localizer::Localize(string,string)
    IL_000f:  ldstr      "About"
    IL_0014:  call       string Sce.Atf.Localizer::Localize(string)
"#,
    )?;

    let mut cmd = test.scan_command();
    cmd.args(["App.il", "--json"]);
    let (code, stdout, _) = run(cmd)?;

    assert_eq!(code, 0);
    let records: Value = serde_json::from_str(&stdout)?;
    assert_eq!(
        records,
        json!([
            { "text": "Save", "context": "menu item" },
            { "text": "About", "context": "" },
        ])
    );
    Ok(())
}

#[test]
fn test_scan_unknown_extension_needs_kind() -> Result<()> {
    let test = CliTest::with_file("notes.txt", r#"Localize("Hello")"#)?;

    let mut cmd = test.scan_command();
    cmd.arg("notes.txt");
    let (code, _, stderr) = run(cmd)?;
    assert_eq!(code, 2);
    assert!(stderr.contains("Cannot tell how to scan notes.txt; pass --kind"));

    let mut cmd = test.scan_command();
    cmd.args(["notes.txt", "--kind", "source"]);
    let (code, stdout, _) = run(cmd)?;
    assert_eq!(code, 0);
    assert!(stdout.starts_with("\"Hello\"\n"));
    Ok(())
}

#[test]
fn test_scan_missing_file_is_error() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.scan_command();
    cmd.arg("Missing.cs");
    let (code, _, stderr) = run(cmd)?;

    assert_eq!(code, 2);
    assert!(stderr.contains("Missing.cs"));
    Ok(())
}
