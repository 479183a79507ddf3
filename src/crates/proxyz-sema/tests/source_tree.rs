//! The filesystem module service on temporary source trees.

use std::fs;
use std::path::Path;

use proxyz_sema::{Engine, ModuleService, ResolveError, ServiceError, SourceTree};
use proxyz_frontend::Interner;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A module `example.com/app` with two packages, a vendored dependency,
/// a test file and a testdata directory.
fn app_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "go.mod", "module example.com/app\n\ngo 1.22\n");
    write(
        root,
        "a/a.go",
        "package a\n\nimport (\n\t\"example.com/app/b\"\n\t\"lib/x\"\n)\n\ntype A struct {\n\tb.B\n\tx.X\n}\n",
    );
    write(root, "a/a_test.go", "package a\n\nimport \"testing\"\n");
    write(root, "b/b.go", "package b\n\ntype B interface {\n\tM()\n}\n");
    write(root, "vendor/lib/x/x.go", "package x\n\ntype X int\n\nfunc (X) Value() int { return int(0) }\n");
    write(root, "b/testdata/bad.go", "package nope\n");
    dir
}

#[test]
fn local_pattern_discovers_go_mod() {
    let dir = app_tree();
    let mut interner = Interner::new();
    let mut tree = SourceTree::new(dir.path());
    let found = tree.load_pattern("./a", &mut interner).unwrap();
    assert_eq!(found.len(), 1);
    let a = &found[0];
    assert_eq!(a.identity, "example.com/app/a");
    assert_eq!(a.name, "a");
    assert_eq!(a.files.len(), 1, "test files are excluded");
    assert!(a.errors.is_empty(), "{:?}", a.errors);
    assert_eq!(
        a.dependencies.get("example.com/app/b").map(String::as_str),
        Some("example.com/app/b")
    );
    assert_eq!(
        a.dependencies.get("lib/x").map(String::as_str),
        Some("example.com/app/vendor/lib/x")
    );
    assert!(tree.roots().any(|(prefix, _)| prefix == "example.com/app"));
}

#[test]
fn recursive_pattern_skips_vendor_and_testdata() {
    let dir = app_tree();
    let mut interner = Interner::new();
    let mut tree = SourceTree::new(dir.path());
    let found = tree.load_pattern("./...", &mut interner).unwrap();
    let identities: Vec<_> = found.iter().map(|d| d.identity.as_str()).collect();
    assert_eq!(identities, ["example.com/app/a", "example.com/app/b"]);
}

#[test]
fn import_path_patterns_use_configured_roots() {
    let dir = app_tree();
    let mut interner = Interner::new();
    let mut tree = SourceTree::new("/").with_root("example.com/app", dir.path());
    let found = tree.load_pattern("example.com/app/b", &mut interner).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].identity, "example.com/app/b");

    let vendored = tree
        .load_module("example.com/app/vendor/lib/x", &mut interner)
        .unwrap();
    assert_eq!(vendored.name, "x");

    let err = tree.load_module("example.com/other", &mut interner).unwrap_err();
    assert!(matches!(err, ServiceError::UnknownModule { .. }));
}

#[test]
fn standard_library_imports_resolve() {
    let std_dir = tempfile::tempdir().unwrap();
    write(std_dir.path(), "io/io.go", "package io\n\ntype Closer interface {\n\tClose() error\n}\n");
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "go.mod", "module example.com/svc\n");
    write(
        dir.path(),
        "svc.go",
        "package svc\n\nimport \"io\"\n\ntype Conn struct {\n\tio.Closer\n}\n",
    );

    let tree = SourceTree::new(dir.path()).with_stdlib(std_dir.path());
    let mut engine = Engine::new(tree);
    let set = engine.build_method_set(".", "Conn").unwrap();
    assert_eq!(set.module.path, "example.com/svc");
    assert_eq!(set.names(), ["Close"]);
}

#[test]
fn directories_outside_any_module_get_underscore_identities() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "p/p.go", "package p\n\ntype T int\n");
    let mut interner = Interner::new();
    let mut tree = SourceTree::new(dir.path());
    let found = tree.load_pattern("./p", &mut interner).unwrap();
    assert!(found[0].identity.starts_with("_/"));
    assert!(found[0].identity.ends_with("/p"));
}

#[test]
fn mismatched_packages_and_missing_imports_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "go.mod", "module m\n");
    write(dir.path(), "a.go", "package m\n\nimport \"nowhere/pkg\"\n");
    write(dir.path(), "b.go", "package other\n");
    write(dir.path(), "gen.go", "//go:build ignore\n\npackage main\n");

    let mut interner = Interner::new();
    let mut tree = SourceTree::new(dir.path());
    let found = tree.load_pattern(".", &mut interner).unwrap();
    let errors = &found[0].errors;
    assert_eq!(errors.len(), 2, "{errors:?}");
    assert!(errors.iter().any(|e| e.contains("found packages m and other")));
    assert!(errors.iter().any(|e| e.contains("cannot find package \"nowhere/pkg\"")));

    let err = Engine::new(SourceTree::new(dir.path()))
        .build_method_set(".", "T")
        .unwrap_err();
    assert!(matches!(err, ResolveError::ModuleLoad { .. }));
}

#[test]
fn end_to_end_over_vendored_and_sibling_packages() {
    let dir = app_tree();
    let mut engine = Engine::new(SourceTree::new(dir.path()));
    let set = engine.build_method_set("./a", "A").unwrap();
    assert_eq!(set.module.path, "example.com/app/a");
    assert_eq!(set.names(), ["M", "Value"]);
}
