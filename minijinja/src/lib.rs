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
# this crate provides minijinja views for trillium

See [the minijinja docs](https://docs.rs/minijinja) for more
information on the template language. Templates are loaded by
extension, which must be one of [`EXTENSIONS`]. Constructing views with
any other extension panics.

```
use trillium_views::{MemoryFileSystem, json};
use trillium_views_minijinja::MiniJinja;

let views = MiniJinja::new_file_system(
    MemoryFileSystem::new()
        .with_file("hello.html.j2", "<p>hello {{ name }}</p>")
        .with_file("layout.html.j2", "<main>{{ embed }}</main>"),
    ".html.j2",
);

assert_eq!(
    views.render_to_string("hello", json!({ "name": "<trillium>" }), Some("layout"))?,
    "<main><p>hello &lt;trillium&gt;</p></main>"
);
# Ok::<(), trillium_views::Error>(())
```
*/

pub use minijinja;
pub use trillium_views::{Bindings, ViewsConnExt, ViewsHandler};

mod minijinja_set;
pub use minijinja_set::{EXTENSIONS, MiniJinjaSet};

/// Views rendered by minijinja
pub type MiniJinja = trillium_views::Views<MiniJinjaSet>;
