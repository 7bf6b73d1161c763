use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn strata_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("strata"));
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

fn write_site(root: &Path) {
    let files = [
        (
            "templates/layouts/application.html.tera",
            "---\nyields: [title]\n---\n<title>{{ slots.title }}</title><body>{{ content }}</body>",
        ),
        (
            "templates/layouts/admin.html.tera",
            "---\nlayout: application\nforward: [title]\n---\n<aside>admin</aside>{{ content }}",
        ),
        (
            "templates/users/index.html.tera",
            "---\nslots:\n  title: Users\n---\n<p>{{ locals.user }}</p>",
        ),
    ];
    for (rel, contents) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, contents).expect("write");
    }
    fs::write(root.join("locals.json"), r#"{ "user": "ada" }"#).expect("write locals");
}

#[test]
fn render_with_explicit_layout_chain() {
    let site = TempDir::new().expect("site");
    write_site(site.path());

    strata_cmd(site.path())
        .args([
            "render",
            "users/index",
            "--dir",
            "templates",
            "--layout",
            "admin",
            "--locals",
            "locals.json",
        ])
        .assert()
        .success()
        .stdout("<title>Users</title><body><aside>admin</aside><p>ada</p></body>");
}

#[test]
fn render_uses_default_layout_from_config() {
    let site = TempDir::new().expect("site");
    write_site(site.path());
    fs::write(
        site.path().join("strata.yaml"),
        "default_layout: application\ntemplate_dir: templates\n",
    )
    .expect("write config");

    strata_cmd(site.path())
        .args(["render", "users/index", "--locals", "locals.json"])
        .assert()
        .success()
        .stdout("<title>Users</title><body><p>ada</p></body>");
}

#[test]
fn no_layout_renders_bare_view() {
    let site = TempDir::new().expect("site");
    write_site(site.path());
    fs::write(
        site.path().join("strata.yaml"),
        "default_layout: application\ntemplate_dir: templates\n",
    )
    .expect("write config");

    strata_cmd(site.path())
        .args(["render", "users/index", "--no-layout", "--locals", "locals.json"])
        .assert()
        .success()
        .stdout("<p>ada</p>");
}

#[test]
fn render_writes_output_file() {
    let site = TempDir::new().expect("site");
    write_site(site.path());

    strata_cmd(site.path())
        .args([
            "render",
            "users/index",
            "--dir",
            "templates",
            "--layout",
            "application",
            "--locals",
            "locals.json",
            "--output",
            "out.html",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(site.path().join("out.html")).expect("read output");
    assert_eq!(written, "<title>Users</title><body><p>ada</p></body>");
}

#[test]
fn missing_layout_fails_the_render() {
    let site = TempDir::new().expect("site");
    write_site(site.path());

    strata_cmd(site.path())
        .args([
            "render",
            "users/index",
            "--dir",
            "templates",
            "--layout",
            "nowhere",
            "--locals",
            "locals.json",
        ])
        .assert()
        .failure()
        .stderr(contains("render failed for 'users/index'"))
        .stderr(contains("layouts/nowhere"));
}

#[test]
fn missing_template_dir_is_reported() {
    let site = TempDir::new().expect("site");

    strata_cmd(site.path())
        .args(["render", "users/index"])
        .assert()
        .failure()
        .stderr(contains("no template directory"));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let site = TempDir::new().expect("site");
    write_site(site.path());

    strata_cmd(site.path())
        .args(["list", "--config", "absent.yaml"])
        .assert()
        .failure()
        .stderr(contains("config not found"));
}

#[test]
fn list_prints_sorted_template_names() {
    let site = TempDir::new().expect("site");
    write_site(site.path());

    strata_cmd(site.path())
        .args(["list", "--dir", "templates"])
        .assert()
        .success()
        .stdout("layouts/admin\nlayouts/application\nusers/index\n");
}
