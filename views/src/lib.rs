#![forbid(unsafe_code)]
#![warn(
    missing_copy_implementations,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

/*!
# directory-loaded views for trillium

This crate provides the engine-agnostic half of trillium's view
rendering: templates are discovered by extension in a directory or any
[`FileSystem`], handed to a wrapped template engine through the
[`TemplateSet`] trait, and rendered by name, optionally inside a layout
that receives the rendered page under a layout variable (`embed` by
default).

Engine crates such as `trillium-views-handlebars` and
`trillium-views-minijinja` provide the [`TemplateSet`] implementations.

```
use std::{collections::HashMap, io::Write};
use trillium_views::{BoxError, Bindings, MemoryFileSystem, SetOptions, TemplateSet, Views};

/// a set that renders its source verbatim
#[derive(Default)]
struct Verbatim(HashMap<String, String>);

impl TemplateSet for Verbatim {
    fn build(_: &SetOptions<'_>) -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn register(&mut self, name: &str, source: String) -> Result<(), BoxError> {
        self.0.insert(name.into(), source);
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    fn execute(&self, name: &str, _: &Bindings, out: &mut dyn Write) -> Result<(), BoxError> {
        out.write_all(self.0[name].as_bytes())?;
        Ok(())
    }
}

let views = Views::<Verbatim>::new_file_system(
    MemoryFileSystem::new().with_file("pages/about.txt", "about us"),
    ".txt",
);

assert_eq!(views.render_to_string("pages/about", (), None)?, "about us");
assert!(views.render_to_string("pages/missing", (), None).unwrap_err().is_not_found());
# Ok::<(), trillium_views::Error>(())
```
*/

mod bindings;
pub use bindings::Bindings;

mod error;
pub use error::{BoxError, Error, Result};

mod file_system;
pub use file_system::{Directory, FileSystem, MemoryFileSystem};

mod functions;
pub use functions::{FunctionError, FunctionMap, TemplateFunction};

mod template_set;
pub use template_set::{SetOptions, TemplateSet};

mod views;
pub use views::{DEFAULT_LAYOUT_VARIABLE, EngineConfig, Views};

mod view_engine;
pub use view_engine::ViewEngine;

mod views_handler;
pub use views_handler::ViewsHandler;

mod views_conn_ext;
pub use views_conn_ext::ViewsConnExt;

pub use serde_json::{Value, json};
