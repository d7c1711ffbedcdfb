use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture_src() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/demo/src")
}

fn jxref_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jxref"))
}

fn run_into(dest: &Path) {
    let output = jxref_cmd()
        .arg(fixture_src())
        .arg("--dest")
        .arg(dest)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn read_page(dest: &Path, rel: &str) -> String {
    std::fs::read_to_string(dest.join(rel))
        .unwrap_or_else(|e| panic!("cannot read {rel}: {e}"))
}

#[test]
fn generates_a_page_per_source_file_plus_navigation() {
    let out = tempfile::tempdir().unwrap();
    run_into(out.path());

    for page in [
        "foo/Bar.html",
        "foo/Test.html",
        "foo/Use.html",
        "other/Thing.html",
        "Lone.html",
        "index.html",
        "overview-frame.html",
        "allclasses-frame.html",
        "overview-summary.html",
        "foo/package-summary.html",
        "foo/package-frame.html",
        "other/package-summary.html",
        "stylesheet.css",
    ] {
        assert!(out.path().join(page).exists(), "missing {page}");
    }
}

#[test]
fn package_info_files_are_not_rendered() {
    let out = tempfile::tempdir().unwrap();
    run_into(out.path());
    assert!(!out.path().join("foo/package-info.html").exists());
}

#[test]
fn same_package_references_are_hyperlinked() {
    let out = tempfile::tempdir().unwrap();
    run_into(out.path());

    let page = read_page(out.path(), "foo/Bar.html");
    // One on the declaration line, two on the INSTANCE line.
    assert_eq!(
        page.matches("href=\"../foo/Bar.html#Bar\"").count(),
        3,
        "every Bar occurrence must link"
    );
    assert!(page.contains("<strong class=\"jxr_keyword\">public</strong>"));
    assert!(page.contains("<em class=\"jxr_javadoccomment\">"));
    assert!(page.contains("<a href=\"https://example.com/docs\""));
    assert!(
        page.contains("<span class=\"jxr_string\">\"// not a comment\"</span>"),
        "string content must not become a comment"
    );
}

#[test]
fn imports_link_package_and_class() {
    let out = tempfile::tempdir().unwrap();
    run_into(out.path());

    let page = read_page(out.path(), "foo/Use.html");
    assert!(page.contains("<a href=\"../other/package-summary.html\">other</a>"));
    assert!(page.contains("<a href=\"../other/Thing.html\">Thing</a>"));
    assert!(
        page.contains("href=\"../other/Thing.html#Thing\""),
        "both the imported simple name and the qualified use must link"
    );
    assert!(
        page.contains("href=\"../foo/Bar.html#Bar\""),
        "same-package reference from a nested class must link"
    );
}

#[test]
fn every_line_is_anchored() {
    let out = tempfile::tempdir().unwrap();
    run_into(out.path());

    let page = read_page(out.path(), "foo/Test.html");
    let line_count = std::fs::read_to_string(fixture_src().join("foo/Test.java"))
        .unwrap()
        .lines()
        .count();
    for n in 1..=line_count {
        assert!(
            page.contains(&format!("name=\"L{n}\" href=\"#L{n}\"")),
            "missing anchor for line {n}"
        );
    }
}

#[test]
fn two_runs_produce_identical_output() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    run_into(first.path());
    run_into(second.path());

    let snapshot = |dest: &Path| -> Vec<(String, Vec<u8>)> {
        let mut pages = Vec::new();
        collect(dest, dest, &mut pages);
        pages.sort();
        pages
    };
    assert_eq!(snapshot(first.path()), snapshot(second.path()));
}

fn collect(root: &Path, dir: &Path, pages: &mut Vec<(String, Vec<u8>)>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, pages);
        } else {
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
            pages.push((rel, std::fs::read(&path).unwrap()));
        }
    }
}

#[test]
fn unsupported_encoding_fails_with_a_diagnostic() {
    let out = tempfile::tempdir().unwrap();
    let output = jxref_cmd()
        .arg(fixture_src())
        .arg("--dest")
        .arg(out.path())
        .arg("--input-encoding")
        .arg("ebcdic")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unsupported Encoding"),
        "stderr: {stderr}"
    );
}

#[test]
fn custom_titles_and_footer_reach_the_pages() {
    let out = tempfile::tempdir().unwrap();
    let output = jxref_cmd()
        .arg(fixture_src())
        .arg("--dest")
        .arg(out.path())
        .arg("--window-title")
        .arg("Demo Xref")
        .arg("--doc-title")
        .arg("Demo Sources")
        .arg("--bottom")
        .arg("Copyright {currentYear} Demo.")
        .output()
        .unwrap();
    assert!(output.status.success());

    let index = read_page(out.path(), "index.html");
    assert!(index.contains("<title>Demo Xref</title>"));

    let summary = read_page(out.path(), "overview-summary.html");
    assert!(summary.contains("Demo Sources"));
    assert!(
        summary.contains("Copyright 20") && !summary.contains("{currentYear}"),
        "footer year not expanded: {summary}"
    );

    let page = read_page(out.path(), "foo/Bar.html");
    assert!(page.contains("Copyright 20") && !page.contains("{currentYear}"));
}

#[test]
fn verbose_prints_one_line_per_file() {
    let out = tempfile::tempdir().unwrap();
    let output = jxref_cmd()
        .arg(fixture_src())
        .arg("--dest")
        .arg(out.path())
        .arg("--verbose")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Bar.java"));
    assert!(stderr.contains("Thing.java"));
}
