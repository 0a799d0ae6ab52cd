use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

const POST: &str = r#"<?php

namespace App\Models;

class Post
{
}
"#;

const POST_CONFIG: &str = r#"{
  "classes": [
    {
      "class": "App\\Models\\Post",
      "file": "app/Post.php",
      "properties": [{ "name": "title", "type": "string", "read": true, "write": true }],
      "methods": [{ "name": "publish", "return": "bool" }],
      "declaredProperties": [
        { "name": "table", "type": "string", "default": "'posts'", "visibility": "protected" }
      ]
    }
  ]
}"#;

const POST_GENERATED: &str = r#"<?php

namespace App\Models;

/**
 * Class \App\Models\Post
 *
 * @method bool publish()
 * @property string $title
 */
class Post
{
    /**
     * @var string
     */
    protected $table = 'posts';

}
"#;

fn post_project() -> Result<CliTest> {
    let test = CliTest::with_file(".vmdocrc.json", POST_CONFIG)?;
    test.write_file("app/Post.php", POST)?;
    Ok(test)
}

#[test]
fn test_dry_run_reports_pending_changes() -> Result<()> {
    let test = post_project()?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_snapshot!(test.stdout(&output), @r"
    Would update [ROOT]/app/Post.php (App\Models\Post)
    Would update 1 file(s) for 1 class(es).
    Run with --apply to write these changes.
    ");
    assert_eq!(test.read_file("app/Post.php")?, POST);

    Ok(())
}

#[test]
fn test_apply_writes_document() -> Result<()> {
    let test = post_project()?;

    let output = test.generate_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert_snapshot!(test.stdout(&output), @r"
    ✓ Written new doc block to [ROOT]/app/Post.php
    Updated 1 file(s) for 1 class(es)
    ");
    assert_eq!(test.read_file("app/Post.php")?, POST_GENERATED);

    Ok(())
}

#[test]
fn test_second_run_is_up_to_date() -> Result<()> {
    let test = post_project()?;
    test.generate_command().arg("--apply").output()?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(0));
    assert_snapshot!(test.stdout(&output), @"✓ Checked 1 class - everything up to date");
    assert_eq!(test.read_file("app/Post.php")?, POST_GENERATED);

    Ok(())
}

#[test]
fn test_verbose_prints_progress() -> Result<()> {
    let test = post_project()?;

    let output = test.generate_command().args(["--apply", "-v"]).output()?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.stderr(&output),
        "Loading class '\\App\\Models\\Post'\n"
    );

    Ok(())
}

#[test]
fn test_classes_sharing_a_file() -> Result<()> {
    let test = CliTest::with_file(
        ".vmdocrc.json",
        r#"{
  "classes": [
    { "class": "Shop\\Order", "file": "Shop.php", "properties": [{ "name": "total", "type": "int" }] },
    { "class": "Shop\\Item", "file": "Shop.php", "methods": [{ "name": "price", "return": "int" }] }
  ]
}"#,
    )?;
    test.write_file(
        "Shop.php",
        "<?php\nnamespace Shop;\n\nclass Order\n{\n}\n\nclass Item\n{\n}\n",
    )?;

    let output = test.generate_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(test.stdout(&output).contains("Updated 1 file(s) for 2 class(es)"));
    assert_eq!(
        test.read_file("Shop.php")?,
        "<?php\nnamespace Shop;\n\n/**\n * Class \\Shop\\Order\n *\n * @property-read int $total\n */\nclass Order\n{\n}\n\n/**\n * Class \\Shop\\Item\n *\n * @method int price()\n */\nclass Item\n{\n}\n"
    );

    Ok(())
}

#[test]
fn test_reset_flag_discards_existing_tags() -> Result<()> {
    let test = CliTest::with_file(
        ".vmdocrc.json",
        r#"{ "classes": [{ "class": "Post", "file": "Post.php" }] }"#,
    )?;
    test.write_file(
        "Post.php",
        "<?php\n/**\n * Post model\n *\n * @property int $legacy\n */\nclass Post\n{\n}\n",
    )?;

    let output = test.generate_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(test.read_file("Post.php")?.contains("@property int $legacy"));

    let output = test.generate_command().args(["--apply", "--reset"]).output()?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.read_file("Post.php")?,
        "<?php\n/**\n * Post model\n */\nclass Post\n{\n}\n"
    );

    Ok(())
}

#[test]
fn test_abstract_class_is_skipped() -> Result<()> {
    let test = CliTest::with_file(
        ".vmdocrc.json",
        r#"{ "classes": [{ "class": "Base", "file": "Base.php", "properties": [{ "name": "id" }] }] }"#,
    )?;
    let source = "<?php\nabstract class Base\n{\n}\n";
    test.write_file("Base.php", source)?;

    let output = test.generate_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert_snapshot!(test.stdout(&output), @r"
    ✓ Checked 1 class - everything up to date
    note: 1 class(es) skipped (abstract, interface, trait or enum)
    ");
    assert_eq!(test.read_file("Base.php")?, source);

    Ok(())
}

#[test]
fn test_unresolvable_class_is_an_error() -> Result<()> {
    let test = post_project()?;
    test.write_file(
        ".vmdocrc.json",
        r#"{ "classes": [
            { "class": "App\\Ghost", "file": "app/Ghost.php" },
            { "class": "App\\Models\\Post", "file": "app/Post.php" }
        ] }"#,
    )?;

    let output = test.generate_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(2));

    let stdout = test.stdout(&output);
    assert!(stdout.contains("error: App\\Ghost: Failed to read file: [ROOT]/app/Ghost.php"));
    assert!(stdout.contains("1 class(es) failed, 0 write(s) failed"));
    assert!(test.read_file("app/Post.php")?.contains("Class \\App\\Models\\Post"));

    Ok(())
}

#[test]
fn test_config_in_parent_directory() -> Result<()> {
    let test = post_project()?;
    test.write_file("app/nested/.keep", "")?;

    let output = test
        .generate_command()
        .arg("--apply")
        .current_dir(test.root().join("app/nested"))
        .output()?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("app/Post.php")?, POST_GENERATED);

    Ok(())
}

#[test]
fn test_missing_config_warns() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.stderr(&output),
        "warning: no .vmdocrc.json found, run vmdoc init to create one\n"
    );
    assert_snapshot!(test.stdout(&output), @"✓ Checked 0 classes - everything up to date");

    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let test = CliTest::with_file(".vmdocrc.json", "{ not json")?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(test.stderr(&output).starts_with("Error: Failed to parse config file"));

    Ok(())
}

#[test]
fn test_duplicate_class_is_rejected() -> Result<()> {
    let test = CliTest::with_file(
        ".vmdocrc.json",
        r#"{ "classes": [
            { "class": "Post", "file": "a.php" },
            { "class": "\\post", "file": "b.php" }
        ] }"#,
    )?;

    let output = test.generate_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(test.stderr(&output).contains("Duplicate class"));

    Ok(())
}
