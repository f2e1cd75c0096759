use serde_json::{Value, json};
use std::fs;
use trillium::Conn;
use trillium_testing::prelude::*;
use trillium_views::{Error, FunctionError, FunctionMap, MemoryFileSystem};
use trillium_views_minijinja::{MiniJinja, ViewsConnExt, ViewsHandler};

const COMPLEX: &str = "<!DOCTYPE html><html><head><title>Main</title></head><body><h2>Header</h2><h1>Hello, World!</h1><h2>Footer</h2></body></html>";

fn trim(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" <", "<")
        .replace("> ", ">")
}

fn views() -> MiniJinja {
    MiniJinja::new("tests/views", ".jinja")
}

fn hello() -> Value {
    json!({ "Title": "Hello, World!" })
}

fn is_admin(args: &[Value]) -> Result<Value, FunctionError> {
    Ok(json!(args.first().and_then(Value::as_str) == Some("admin")))
}

#[test]
fn render() {
    let views = views();
    views.load().unwrap();

    let mut out = vec![];
    views.render(&mut out, "index", hello(), None).unwrap();
    assert_eq!(
        trim(&String::from_utf8(out).unwrap()),
        "<h2>Header</h2><h1>Hello, World!</h1><h2>Footer</h2>"
    );

    let rendered = views.render_to_string("errors/404", hello(), None).unwrap();
    assert_eq!(trim(&rendered), "<h1>Hello, World!</h1>");
}

#[test]
fn layout() {
    let _ = env_logger::builder().is_test(true).try_init();
    let views = views().with_debug(true);
    views.load().unwrap();

    let rendered = views
        .render_to_string("index", hello(), Some("layouts/main"))
        .unwrap();
    assert_eq!(trim(&rendered), COMPLEX);
}

#[test]
fn empty_layout() {
    let views = views();
    assert_eq!(
        views.render_to_string("index", hello(), Some("")).unwrap(),
        views.render_to_string("index", hello(), None).unwrap()
    );
}

#[test]
fn file_system() {
    let mut files = MemoryFileSystem::new();
    for path in [
        "index.jinja",
        "partials/header.jinja",
        "partials/footer.jinja",
        "layouts/main.jinja",
    ] {
        files.insert(path, fs::read(format!("tests/views/{path}")).unwrap());
    }

    let views = MiniJinja::new_file_system(files, ".jinja").with_debug(true);
    views.load().unwrap();
    let rendered = views
        .render_to_string("index", hello(), Some("layouts/main"))
        .unwrap();
    assert_eq!(trim(&rendered), COMPLEX);
}

#[test]
fn extended_with_function() {
    let views = views().with_function("isAdmin", is_admin);

    let rendered = views
        .render_to_string("extended", json!({ "User": "admin" }), Some("layouts/main"))
        .unwrap();
    assert_eq!(
        trim(&rendered),
        "<!DOCTYPE html><html><head><title>Main</title></head><body><h2>Header</h2><h1>Hello, Admin!</h1><h2>Footer</h2></body></html>"
    );
}

#[test]
fn reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("should_reload.jinja");
    fs::write(&path, "<before>{{ word }}</before>\n").unwrap();

    let views = MiniJinja::new(dir.path(), ".jinja").with_reload(true);
    views.load().unwrap();

    let bindings = json!({ "word": "reload" });
    assert_eq!(
        trim(&views.render_to_string("should_reload", bindings.clone(), None).unwrap()),
        "<before>reload</before>"
    );

    fs::write(&path, "<after>{{ word }}</after>\n").unwrap();
    assert_eq!(
        trim(&views.render_to_string("should_reload", bindings, None).unwrap()),
        "<after>reload</after>"
    );
}

#[test]
fn add_function_map() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("func_map.jinja"),
        "<h2>{{ lower(Var1) }}</h2>\n<p>{{ upper(Var2) }}</p>",
    )
    .unwrap();

    let functions = FunctionMap::new()
        .with("lower", |args: &[Value]| {
            Ok(json!(args.first().and_then(Value::as_str).unwrap_or_default().to_lowercase()))
        })
        .with("upper", |args: &[Value]| {
            Ok(json!(args.first().and_then(Value::as_str).unwrap_or_default().to_uppercase()))
        });

    let views = MiniJinja::new(dir.path(), ".jinja");
    views.add_functions(functions);
    views.load().unwrap();

    let rendered = views
        .render_to_string("func_map", json!({ "Var1": "LOwEr", "Var2": "upPEr" }), None)
        .unwrap();
    assert_eq!(trim(&rendered), "<h2>lower</h2><p>UPPER</p>");

    let functions = views.functions();
    assert!(functions.contains("lower"));
    assert!(functions.contains("upper"));
}

#[test]
fn functions_added_after_load_need_a_reload() {
    let views = MiniJinja::new_file_system(
        MemoryFileSystem::new().with_file(
            "admin.jinja",
            "{% if isAdmin(User) %}admin{% endif %}",
        ),
        ".jinja",
    );
    views.load().unwrap();
    views.add_function("isAdmin", is_admin);
    assert!(views.render_to_string("admin", json!({ "User": "admin" }), None).is_err());

    views.load().unwrap();
    assert_eq!(
        views
            .render_to_string("admin", json!({ "User": "admin" }), None)
            .unwrap(),
        "admin"
    );
}

#[test]
fn delimiters() {
    let views = MiniJinja::new_file_system(
        MemoryFileSystem::new().with_file("page.jinja", "<p>[[ Title ]]</p>{% if Title %}!{% endif %}"),
        ".jinja",
    )
    .with_delims("[[", "]]");

    assert_eq!(
        views.render_to_string("page", hello(), None).unwrap(),
        "<p>Hello, World!</p>!"
    );
}

#[test]
fn empty_delimiters_keep_the_defaults() {
    let views = MiniJinja::new_file_system(
        MemoryFileSystem::new().with_file("page.jinja", "<p>{{ Title }}</p>"),
        ".jinja",
    )
    .with_delims("", "");

    assert_eq!(
        views.render_to_string("page", hello(), None).unwrap(),
        "<p>Hello, World!</p>"
    );
}

#[test]
fn html_extensions_escape_values_but_not_layout_content() {
    let views = MiniJinja::new_file_system(
        MemoryFileSystem::new()
            .with_file("page.html.jinja", "<p>{{ Title }}</p>")
            .with_file("layout.html.jinja", "<main>{{ embed }}</main>"),
        ".html.jinja",
    );

    assert_eq!(
        views
            .render_to_string("page", json!({ "Title": "<b>" }), Some("layout"))
            .unwrap(),
        "<main><p>&lt;b&gt;</p></main>"
    );
}

#[test]
fn content_failure_inside_layout_leaves_the_slot_empty() {
    let views = MiniJinja::new_file_system(
        MemoryFileSystem::new()
            .with_file("broken.jinja", "<p>{{ missing_function() }}</p>")
            .with_file("layout.jinja", "<main>{{ embed }}</main>"),
        ".jinja",
    );

    assert!(matches!(
        views.render_to_string("broken", hello(), None),
        Err(Error::Execute { .. })
    ));
    assert_eq!(
        views
            .render_to_string("broken", hello(), Some("layout"))
            .unwrap(),
        "<main></main>"
    );
}

#[test]
fn not_found() {
    let views = views();
    let error = views.render_to_string("missing", hello(), None).unwrap_err();
    assert!(error.is_not_found());
    assert!(matches!(
        views.render_to_string("index", hello(), Some("layouts/missing")),
        Err(Error::LayoutNotFound(_))
    ));
}

#[test]
fn invalid_templates_fail_to_load() {
    let views = MiniJinja::new_file_system(
        MemoryFileSystem::new().with_file("broken.jinja", "{% if Title %}never closed"),
        ".jinja",
    );
    assert!(matches!(
        views.load(),
        Err(Error::Register { name, .. }) if name == "broken"
    ));
}

#[test]
fn accepted_extensions() {
    for extension in [".html.jinja", ".jinja.html", ".html.j2", ".jinja", ".j2"] {
        MiniJinja::new("tests/views", extension);
    }
}

#[test]
#[should_panic(expected = "is not a valid minijinja views extension")]
fn unsupported_extension_is_fatal() {
    MiniJinja::new("tests/views", ".tmpl");
}

#[test]
fn environment_is_reachable() {
    let views = views();
    let rendered = views
        .with_templates(|set| {
            set.environment()
                .get_template("errors/404")
                .and_then(|template| template.render(hello()))
        })
        .unwrap()
        .unwrap();
    assert_eq!(trim(&rendered), "<h1>Hello, World!</h1>");
}

#[test]
fn conn_ext() {
    let handler = (ViewsHandler::new(views()), |conn: Conn| async move {
        conn.assign("Title", "Hello, World!")
            .render_with_layout("index", "layouts/main")
    });

    let mut conn = get("/").on(&handler);
    assert_status!(&conn, 200);
    let body = assert_body_contains!(&mut conn, "Hello, World!");
    assert_eq!(trim(&body), COMPLEX);
}
