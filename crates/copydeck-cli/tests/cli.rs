//! End-to-end runs of the `copydeck` binary.

mod common;

use common::TestContext;
use copydeck_test_utils::word_markdown;
use predicates::prelude::*;

fn generate(ctx: &TestContext) {
    ctx.command()
        .args([
            "generate", "--name", "Spring", "-d", "Social Ad", "-m", "fr-FR", "-m", "en-US",
            "--lead", "en-US",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated Spring"));
}

#[test]
fn test_catalog_lists_by_category() {
    let ctx = TestContext::new();
    ctx.command()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Web"))
        .stdout(predicate::str::contains("Product Detail Page"));
}

#[test]
fn test_catalog_markets_json() {
    let ctx = TestContext::new();
    let output = ctx
        .command()
        .args(["catalog", "--markets", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let north_america = listing["North America"].as_array().unwrap();
    assert!(north_america.iter().any(|m| m["code"] == "en-US"));
}

#[test]
fn test_generate_writes_workbook_and_documents() {
    let ctx = TestContext::new();
    generate(&ctx);

    let copy = std::fs::read_to_string(
        ctx.join("Spring_Localization_Template/Copy Template.csv"),
    )
    .unwrap();
    assert!(copy.starts_with("Deliverable,Name,en-US,fr-FR"));
    assert!(copy.contains("[fr-FR translation needed]"));

    let doc = std::fs::read_to_string(ctx.join("Word_Documents/Marketing_Copy_fr-FR.md")).unwrap();
    assert!(doc.contains("# Social Ad"));
}

#[test]
fn test_unknown_deliverable_suggests_names() {
    let ctx = TestContext::new();
    ctx.command()
        .args(["generate", "-d", "Billboard", "-m", "en-US"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Deliverable not found: Billboard"))
        .stderr(predicate::str::contains("Social Ad"));
}

#[test]
fn test_strict_check_fails_on_fresh_template() {
    let ctx = TestContext::new();
    generate(&ctx);

    ctx.command()
        .args(["check", "Spring_Localization_Template", "--strict"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains("Contains placeholder text"));
}

#[test]
fn test_excel_to_word_round_trip() {
    let ctx = TestContext::new();
    generate(&ctx);

    ctx.command()
        .args(["excel-to-word", "Spring_Localization_Template", "-o", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marketing_Copy_en-US.md"));

    assert!(ctx.join("out/Word_Documents/Marketing_Copy_fr-FR.md").exists());
}

#[test]
fn test_word_to_excel_reports_failed_files() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.join("copy_en-US.md"),
        word_markdown(&[("Hero", &[("Headline", "Buy now"), ("Button", "Shop")])]),
    )
    .unwrap();
    std::fs::write(
        ctx.join("copy_fr-FR.md"),
        word_markdown(&[("Hero", &[("Headline", "Achetez")])]),
    )
    .unwrap();
    std::fs::write(ctx.join("copy_de-DE.md"), b"PK\x03\x04 not markdown").unwrap();

    ctx.command()
        .args(["word-to-excel", "copy_en-US.md", "copy_fr-FR.md", "copy_de-DE.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markets en-US, fr-FR"))
        .stdout(predicate::str::contains("Failed files (1)"))
        .stdout(predicate::str::contains("copy_de-DE.md"));
}

#[test]
fn test_word_to_excel_all_failing_exits_with_validation_error() {
    let ctx = TestContext::new();
    std::fs::write(ctx.join("copy_de-DE.md"), b"PK\x03\x04").unwrap();

    ctx.command()
        .args(["word-to-excel", "copy_de-DE.md"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("copy_de-DE.md"));
}

#[test]
fn test_qa_without_api_key_is_config_error() {
    let ctx = TestContext::new();
    generate(&ctx);

    ctx.command()
        .args(["qa", "Spring_Localization_Template"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_config_template_version_applies() {
    let ctx = TestContext::new().with_config("export:\n  template_version: \"2.1\"\n");
    generate(&ctx);

    let doc = std::fs::read_to_string(ctx.join("Word_Documents/Marketing_Copy_en-US.md")).unwrap();
    assert!(doc.contains("Template Version 2.1"));
}

#[test]
fn test_configured_lead_outside_selection_is_skipped() {
    let ctx = TestContext::new().with_config("export:\n  lead_market: en-US\n");
    std::fs::write(
        ctx.join("copy_fr-FR.md"),
        word_markdown(&[("Hero", &[("Headline", "Achetez")])]),
    )
    .unwrap();

    ctx.command()
        .args(["word-to-excel", "copy_fr-FR.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markets fr-FR"));
}

#[test]
fn test_configured_lead_orders_columns_when_selected() {
    let ctx = TestContext::new().with_config("export:\n  lead_market: fr-FR\n");
    ctx.command()
        .args(["generate", "--name", "Spring", "-d", "Social Ad", "-m", "en-US", "-m", "fr-FR"])
        .assert()
        .success();

    let copy = std::fs::read_to_string(
        ctx.join("Spring_Localization_Template/Copy Template.csv"),
    )
    .unwrap();
    assert!(copy.starts_with("Deliverable,Name,fr-FR,en-US"));
}

#[test]
fn test_explicit_lead_outside_selection_fails() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.join("copy_fr-FR.md"),
        word_markdown(&[("Hero", &[("Headline", "Achetez")])]),
    )
    .unwrap();

    ctx.command()
        .args(["word-to-excel", "copy_fr-FR.md", "--lead", "en-US"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("lead market 'en-US'"))
        .stderr(predicate::str::contains("--lead"));
}
