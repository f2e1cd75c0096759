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
Handlebars views for trillium, based on [the handlebars
crate](https://docs.rs/crate/handlebars). Templates are loaded from a
directory or any [`FileSystem`](trillium_views::FileSystem) by
extension, and can be wrapped in a layout that receives the page as
`{{{embed}}}`.

```
use trillium_views::{MemoryFileSystem, json};
use trillium_views_handlebars::Handlebars;

let views = Handlebars::new_file_system(
    MemoryFileSystem::new()
        .with_file("index.hbs", "<h1>{{Title}}</h1>")
        .with_file("layouts/main.hbs", "<body>{{{embed}}}</body>"),
    ".hbs",
);

let page = views.render_to_string(
    "index",
    json!({ "Title": "Hello, World!" }),
    Some("layouts/main"),
)?;
assert_eq!(page, "<body><h1>Hello, World!</h1></body>");
# Ok::<(), trillium_views::Error>(())
```
*/

pub use handlebars;
pub use trillium_views::{Bindings, ViewsConnExt, ViewsHandler};

mod handlebars_set;
pub use handlebars_set::HandlebarsSet;

/// Views rendered by handlebars. Any file extension is accepted.
pub type Handlebars = trillium_views::Views<HandlebarsSet>;
