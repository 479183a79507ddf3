//! End-to-end method set resolution over in-memory packages.

use proxyz_sema::{Engine, InMemoryModules, MethodSet, ModuleRef, ResolveError};

const IO: &str = r#"package io

type Reader interface {
	Read(p []byte) (n int, err error)
}

type Writer interface {
	Write(p []byte) (n int, err error)
}

type Closer interface {
	Close() error
}

type ReadCloser interface {
	Reader
	Closer
}
"#;

fn modules(app: &str) -> InMemoryModules {
    InMemoryModules::new()
        .with_module("io", [("io.go", IO)])
        .with_module("example.com/app", [("app.go", app)])
}

fn build(app: &str, type_name: &str) -> MethodSet {
    Engine::new(modules(app))
        .build_method_set("example.com/app", type_name)
        .unwrap_or_else(|e| panic!("build failed: {e}"))
}

fn build_err(app: &str, type_name: &str) -> ResolveError {
    match Engine::new(modules(app)).build_method_set("example.com/app", type_name) {
        Ok(set) => panic!("expected an error, got {:?}", set.names()),
        Err(e) => e,
    }
}

fn lines(set: &MethodSet) -> Vec<String> {
    set.methods
        .iter()
        .map(|m| m.render_from(&set.module))
        .collect()
}

#[test]
fn struct_embedding_an_interface_promotes_its_methods() {
    let set = build("package app\nimport \"io\"\ntype S struct { io.Reader }\n", "S");
    assert!(!set.type_is_interface);
    assert_eq!(set.names(), ["Read"]);
    let read = &set.methods[0];
    assert_eq!(read.arg_names, ["p"]);
    assert_eq!(read.arg_types[0].format, "[]byte");
    let results: Vec<_> = read.result_types.iter().map(|t| t.render(&[])).collect();
    assert_eq!(results, ["int", "error"]);
    assert_eq!(set.module.path, "example.com/app");
    assert_eq!(set.type_name, "S");
}

#[test]
fn interface_embedding_flattens_in_order() {
    let set = Engine::new(modules("package app\n"))
        .build_method_set("io", "ReadCloser")
        .unwrap();
    assert!(set.type_is_interface);
    assert_eq!(set.names(), ["Read", "Close"]);
    assert_eq!(set.module.name, "io");
}

#[test]
fn alias_is_transparent() {
    let mut engine = Engine::new(modules(
        "package app\nimport \"io\"\ntype R = io.Reader\n",
    ));
    let alias = engine.build_method_set("example.com/app", "R").unwrap();
    let target = engine.build_method_set("io", "Reader").unwrap();
    assert_eq!(alias.methods, target.methods);
    assert_eq!(alias.type_is_interface, target.type_is_interface);
}

#[test]
fn defined_type_keeps_structure_but_not_direct_methods() {
    let app = r#"package app
import "io"
type Base struct { io.Reader }
func (Base) Direct() {}
func (*Base) PtrDirect() {}
type Derived Base
func (Derived) Own() {}
"#;
    assert_eq!(build(app, "Base").names(), ["Read", "Direct", "PtrDirect"]);
    let derived = build(app, "Derived");
    assert_eq!(derived.names(), ["Read", "Own"]);
    assert!(!derived.type_is_interface);
}

#[test]
fn defined_interface_type_is_terminal() {
    let set = build("package app\nimport \"io\"\ntype RC io.ReadCloser\n", "RC");
    assert!(set.type_is_interface);
    assert_eq!(set.names(), ["Read", "Close"]);
}

#[test]
fn direct_method_overrides_promoted_one_in_place() {
    let app = r#"package app
import "io"
type S struct {
	io.Reader
	io.Closer
}
func (S) Read(buf []byte) (int, error) { return 0, nil }
"#;
    let set = build(app, "S");
    assert_eq!(set.names(), ["Read", "Close"]);
    assert_eq!(set.methods[0].arg_names, ["buf"]);
    assert_eq!(lines(&set)[0], "Read(buf []byte) (int, error)");
}

#[test]
fn struct_embedding_promotes_transitively() {
    let set = build(
        "package app\ntype Base struct{}\nfunc (Base) B() {}\ntype Mid struct{ Base }\nfunc (Mid) M() {}\ntype Top struct{ *Mid }\n",
        "Top",
    );
    assert!(!set.type_is_interface);
    assert_eq!(set.names(), ["B", "M"]);
}

#[test]
fn cgo_sibling_file_does_not_block_embedding() {
    let modules = InMemoryModules::new()
        .with_module(
            "net",
            [
                ("net.go", "package net\ntype Conn interface{ Close() error }\n"),
                ("cgo_unix_cgo.go", "package net\nimport \"C\"\ntype _C_char = C.char\n"),
            ],
        )
        .with_module(
            "example.com/app",
            [("app.go", "package app\nimport \"net\"\ntype S struct{ net.Conn }\n")],
        );
    let set = Engine::new(modules)
        .build_method_set("example.com/app", "S")
        .unwrap_or_else(|e| panic!("build failed: {e}"));
    assert_eq!(set.names(), ["Close"]);
}

#[test]
fn unexported_methods_are_filtered() {
    let app = r#"package app
type I interface {
	Visible()
	hidden()
}
type S struct{}
func (S) private() {}
func (S) Public() {}
"#;
    assert_eq!(build(app, "I").names(), ["Visible"]);
    assert_eq!(build(app, "S").names(), ["Public"]);
}

#[test]
fn builtin_error_has_one_method() {
    for app in ["package app\ntype E = error\n", "package app\ntype E error\n"] {
        let set = build(app, "E");
        assert!(set.type_is_interface);
        assert_eq!(set.names(), ["Error"]);
        let error = &set.methods[0];
        assert!(error.arg_types.is_empty());
        assert_eq!(error.result_types.len(), 1);
        assert_eq!(error.result_types[0].format, "string");
    }
}

#[test]
fn alias_of_alias_across_modules_reaches_error() {
    let modules = InMemoryModules::new()
        .with_module("other", [("other.go", "package other\ntype Err = error\n")])
        .with_module(
            "example.com/app",
            [("app.go", "package app\nimport \"other\"\ntype E = other.Err\n")],
        );
    let set = Engine::new(modules)
        .build_method_set("example.com/app", "E")
        .unwrap();
    assert!(set.type_is_interface);
    assert_eq!(set.names(), ["Error"]);
    assert!(set.methods[0].arg_types.is_empty());
}

#[test]
fn embedded_builtin_error_in_interface() {
    let set = build("package app\ntype I interface {\n\terror\n\tClose() error\n}\n", "I");
    assert_eq!(set.names(), ["Error", "Close"]);
}

#[test]
fn unresolved_identifier_names_location() {
    let err = build_err(
        "package app\ntype S struct{}\nfunc (S) Do(x Missing) {}\n",
        "S",
    );
    let ResolveError::UnresolvedIdentifier { name, file, line, column, .. } = err else {
        panic!("expected unresolved identifier, got {err}");
    };
    assert_eq!(name, "Missing");
    assert_eq!(file, "app.go");
    assert_eq!((line, column), (3, 15));
}

#[test]
fn building_twice_is_idempotent() {
    let app = "package app\nimport \"io\"\ntype S struct { io.Reader }\nfunc (S) Close() error\n";
    let mut engine = Engine::new(modules(app));
    let first = engine.build_method_set("example.com/app", "S").unwrap();
    let requests = engine.service().requests();
    let second = engine.build_method_set("example.com/app", "S").unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.service().requests(), requests);
}

#[test]
fn each_module_is_requested_once() {
    let app = "package app\nimport \"io\"\ntype A struct { io.Reader }\ntype B struct { io.Writer }\n";
    let mut engine = Engine::new(modules(app));
    engine.build_method_set("example.com/app", "A").unwrap();
    engine.build_method_set("example.com/app", "B").unwrap();
    // the app pattern and the io identity
    assert_eq!(engine.service().requests(), 2);
    assert_eq!(engine.module_count(), 2);
}

#[test]
fn defined_type_cycle_is_reported() {
    let err = build_err("package app\ntype A B\ntype B A\n", "A");
    assert_eq!(
        err,
        ResolveError::TypeCycle {
            cycle: vec![
                "example.com/app.A".into(),
                "example.com/app.B".into(),
                "example.com/app.A".into(),
            ]
        }
    );
}

#[test]
fn interface_embedding_cycle_is_reported() {
    let err = build_err(
        "package app\ntype A interface{ B }\ntype B interface{ A }\n",
        "A",
    );
    assert!(matches!(err, ResolveError::TypeCycle { .. }));
}

#[test]
fn self_embedding_through_pointer_is_allowed() {
    let set = build("package app\ntype Node struct{ *Node }\nfunc (*Node) Next() {}\n", "Node");
    assert_eq!(set.names(), ["Next"]);

    let err = build_err("package app\ntype Bad struct{ Bad }\n", "Bad");
    assert!(matches!(err, ResolveError::TypeCycle { .. }));
}

#[test]
fn import_cycle_between_packages_terminates() {
    let modules = InMemoryModules::new()
        .with_module(
            "a",
            [("a.go", "package a\nimport \"b\"\ntype A struct{ b.B }\nfunc (A) N() {}\n")],
        )
        .with_module(
            "b",
            [("b.go", "package b\nimport \"a\"\ntype B struct{ *a.A }\nfunc (B) M() {}\n")],
        );
    let set = Engine::new(modules).build_method_set("a", "A").unwrap();
    assert_eq!(set.names(), ["M", "N"]);
}

#[test]
fn foreign_references_become_slots() {
    let app = r#"package app
import "io"
type Local int
type S struct{}
func (S) Copy(dst io.Writer, src Local) (written int64, err error) { return }
"#;
    let set = build(app, "S");
    let copy = &set.methods[0];
    assert_eq!(copy.arg_types[0].format, "%sWriter");
    assert_eq!(copy.arg_types[0].modules[0].path, "io");
    assert_eq!(copy.arg_types[1].format, "%sLocal");
    assert_eq!(copy.arg_types[1].modules, [set.module.clone()]);
    assert_eq!(copy.result_types.len(), 2);
    assert_eq!(lines(&set), ["Copy(dst io.Writer, src Local) (int64, error)"]);
}

#[test]
fn parameter_groups_and_variadics() {
    let app = r#"package app
type S struct{}
func (S) Swap(a, b int) {}
func (S) Log(format string, args ...any) {}
func (S) Anon(int, string) bool { return false }
"#;
    let set = build(app, "S");
    let swap = set.method("Swap").unwrap();
    assert_eq!(swap.arg_names, ["a", "b"]);
    assert_eq!(swap.arg_types.len(), 2);

    let log = set.method("Log").unwrap();
    assert!(log.is_variadic);
    assert_eq!(log.arg_types[1].format, "any");

    let anon = set.method("Anon").unwrap();
    assert!(anon.arg_names.is_empty());
    assert_eq!(anon.arg_types.len(), 2);
    assert_eq!(
        lines(&set),
        [
            "Swap(a int, b int)",
            "Log(format string, args ...any)",
            "Anon(int, string) bool"
        ]
    );
}

#[test]
fn dot_import_embedding() {
    let set = build("package app\nimport . \"io\"\ntype S struct{ Reader }\n", "S");
    assert_eq!(set.names(), ["Read"]);
}

#[test]
fn opaque_defined_types_keep_direct_methods() {
    let set = build("package app\ntype F func()\nfunc (f F) Call() {}\n", "F");
    assert!(!set.type_is_interface);
    assert_eq!(set.names(), ["Call"]);
}

#[test]
fn generic_types_are_rejected() {
    let app = r#"package app
type List[T any] struct{ items []T }
type L = List[int]
type S struct{ List[int] }
"#;
    for name in ["List", "L", "S"] {
        let err = build_err(app, name);
        assert!(
            matches!(err, ResolveError::GenericType { .. }),
            "{name}: {err}"
        );
    }
}

#[test]
fn missing_and_non_type_names() {
    let app = "package app\nfunc F() {}\nvar V int\n";
    assert!(matches!(
        build_err(app, "Nope"),
        ResolveError::TypeNotFound { .. }
    ));
    assert!(matches!(build_err(app, "F"), ResolveError::NotAType { .. }));
    assert!(matches!(build_err(app, "V"), ResolveError::NotAType { .. }));
}

#[test]
fn pattern_must_match_exactly_one_package() {
    let modules = InMemoryModules::new()
        .with_module("x/a", [("a.go", "package a\ntype T int\n")])
        .with_module("x/b", [("b.go", "package b\ntype T int\n")]);
    let mut engine = Engine::new(modules);
    assert!(matches!(
        engine.build_method_set("x/...", "T"),
        Err(ResolveError::ModuleLoad { .. })
    ));
    assert!(matches!(
        engine.build_method_set("y", "T"),
        Err(ResolveError::ModuleLoad { .. })
    ));
    assert!(engine.build_method_set("x/a", "T").is_ok());
}

#[test]
fn package_errors_fail_the_build() {
    let modules = InMemoryModules::new().with_module(
        "broken",
        [("a.go", "package broken\ntype T struct {\n")],
    );
    let err = Engine::new(modules)
        .build_method_set("broken", "T")
        .unwrap_err();
    assert!(matches!(err, ResolveError::ModuleLoad { reference, .. } if reference == "broken"));
}

#[test]
fn method_sets_serialize() {
    let set = build("package app\nimport \"io\"\ntype S struct { io.Reader }\n", "S");
    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(json["type_name"], "S");
    assert_eq!(json["type_is_interface"], false);
    assert_eq!(json["methods"][0]["name"], "Read");
    assert_eq!(json["methods"][0]["result_types"][1]["format"], "error");
    let module: ModuleRef = set.module.clone();
    assert_eq!(json["module"]["import_path"], module.import_path);
}
