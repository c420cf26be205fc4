use std::fs;
use std::path::Path;

use export_tree_lib::{IgnoreRules, RenderOptions, TreeRenderer};
use tempfile::TempDir;

fn render(root: &Path, options: RenderOptions) -> Result<String, Box<dyn std::error::Error>> {
    let mut renderer = TreeRenderer::new(options, Vec::new());
    renderer.render(root)?;
    Ok(String::from_utf8(renderer.into_inner())?)
}

fn plain_options() -> RenderOptions {
    RenderOptions {
        color: false,
        ..RenderOptions::default()
    }
}

#[test]
fn lists_exports_under_source_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::write(
        root.join("index.ts"),
        "export function foo() {}\nexport const bar = 1;\n",
    )?;

    let output = render(root, plain_options())?;
    assert_eq!(
        output,
        "└── index.ts\n        Exports:\n        ├── foo\n        └── bar\n"
    );
    Ok(())
}

#[test]
fn nested_entries_use_bar_continuation() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("src"))?;
    fs::write(root.join("src/lib.js"), "export const x = 1;\n")?;
    fs::write(root.join("README.md"), "# readme\n")?;

    let output = render(root, plain_options())?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 5);

    // sibling order follows the filesystem, so locate the directory line
    let src_index = lines
        .iter()
        .position(|line| line.ends_with("src"))
        .ok_or("missing src line")?;
    let src_is_last = lines[src_index].starts_with("└── ");
    let child_prefix = if src_is_last { "    " } else { "│   " };

    assert_eq!(lines[src_index + 1], format!("{child_prefix}└── lib.js"));
    assert_eq!(
        lines[src_index + 2],
        format!("{child_prefix}        Exports:")
    );
    assert_eq!(lines[src_index + 3], format!("{child_prefix}        └── x"));
    assert!(output.contains("README.md"));
    Ok(())
}

#[test]
fn depth_zero_lists_directory_but_not_contents() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("pkg"))?;
    fs::write(root.join("pkg/a.ts"), "export const a = 1;\n")?;
    fs::write(root.join("pkg/b.txt"), "b\n")?;

    let options = RenderOptions {
        max_depth: Some(0),
        ..plain_options()
    };
    let output = render(root, options)?;
    assert_eq!(output, "└── pkg\n");
    Ok(())
}

#[test]
fn depth_limit_is_inclusive_of_max() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("one/two/three"))?;
    fs::write(root.join("one/two/three/deep.ts"), "export const deep = 1;\n")?;

    let options = RenderOptions {
        max_depth: Some(1),
        ..plain_options()
    };
    let output = render(root, options)?;
    assert_eq!(output, "└── one\n    └── two\n");

    let unbounded = render(root, plain_options())?;
    assert!(unbounded.contains("three"));
    assert!(unbounded.contains("deep.ts"));
    assert!(unbounded.contains("└── deep"));
    Ok(())
}

#[test]
fn ignored_entries_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("node_modules/dep"))?;
    fs::create_dir(root.join("dist"))?;
    fs::write(root.join("main.js"), "export const main = 1;\n")?;

    let options = RenderOptions {
        ignore: IgnoreRules::with_defaults(["dist"])?,
        ..plain_options()
    };
    let output = render(root, options)?;
    assert!(!output.contains("node_modules"));
    assert!(!output.contains("dist"));
    assert!(output.starts_with("└── main.js\n"));
    Ok(())
}

#[test]
fn file_without_exports_has_no_label() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::write(root.join("quiet.ts"), "const hidden = 1;\n")?;
    fs::write(root.join("notes.txt"), "export const notCode = 1;\n")?;

    let output = render(root, plain_options())?;
    assert!(output.contains("quiet.ts"));
    assert!(output.contains("notes.txt"));
    assert!(!output.contains("Exports:"));
    Ok(())
}

#[test]
fn malformed_file_does_not_stop_traversal() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("a"))?;
    fs::write(root.join("a/broken.ts"), "export function broken( {\n")?;
    fs::create_dir(root.join("b"))?;
    fs::write(root.join("b/good.ts"), "export const good = 1;\n")?;

    let output = render(root, plain_options())?;
    assert!(output.contains("broken.ts"));
    assert!(!output.contains("broken\n"));
    assert!(output.contains("good.ts"));
    assert!(output.contains("└── good"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinks_are_listed_but_not_followed() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("real"))?;
    fs::write(root.join("real/inner.ts"), "export const inner = 1;\n")?;
    std::os::unix::fs::symlink(root.join("real"), root.join("link"))?;

    let output = render(root, plain_options())?;
    assert!(output.contains("link"));
    assert_eq!(output.matches("inner.ts").count(), 1);
    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_annotated() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let locked = root.join("locked");
    fs::create_dir(&locked)?;
    fs::write(locked.join("secret.ts"), "export const secret = 1;\n")?;
    fs::write(root.join("index.ts"), "export const visible = 1;\n")?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // root ignores permission bits
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let output = render(root, plain_options());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
    let output = output?;

    let locked_line = output
        .lines()
        .find(|line| line.contains("locked"))
        .ok_or("missing locked line")?;
    assert!(locked_line.contains("locked [Permission denied"));
    assert!(locked_line.ends_with(']'));
    assert!(!output.contains("secret"));
    assert!(output.contains("index.ts"));
    assert!(output.contains("Exports:"));
    assert!(output.contains("└── visible"));
    Ok(())
}

#[test]
fn color_mode_emits_ansi_escapes() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("index.js"), "export const x = 1;\n")?;

    let options = RenderOptions {
        color: true,
        ..RenderOptions::default()
    };
    let output = render(temp_dir.path(), options)?;
    assert!(output.contains("\x1b["));
    assert!(output.contains("index.js"));
    Ok(())
}

#[test]
fn missing_root_is_an_error() {
    let mut renderer = TreeRenderer::new(plain_options(), Vec::new());
    assert!(renderer.render(Path::new("/definitely/not/here")).is_err());
}
