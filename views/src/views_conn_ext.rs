use crate::{Bindings, ViewEngine, ViewsHandler};
use serde::Serialize;
use trillium::Conn;

/**
Extends trillium::Conn with view rendering. Everything here must run
downsequence of a [`ViewsHandler`] and will panic otherwise.
*/
pub trait ViewsConnExt {
    /// Binds a serializable value under `key` for the eventual render
    fn assign(self, key: impl Into<String>, value: impl Serialize) -> Self;

    /// Renders the named template with the accumulated bindings. Halts
    /// and sets a 200 status on success, and a 500 status with the
    /// error message on failure.
    fn render(self, template: &str) -> Self;

    /// Like [`ViewsConnExt::render`], wrapping the template in `layout`
    fn render_with_layout(self, template: &str, layout: &str) -> Self;

    /// the bindings accumulated so far
    fn bindings(&self) -> &Bindings;

    /// a mutable reference to the accumulated bindings
    fn bindings_mut(&mut self) -> &mut Bindings;

    /// the engine provided by the [`ViewsHandler`]
    fn view_engine(&self) -> &dyn ViewEngine;
}

impl ViewsConnExt for Conn {
    fn assign(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let key = key.into();
        if let Err(e) = self.bindings_mut().assign(key.as_str(), value) {
            log::error!("could not bind {key}: {e}");
        }
        self
    }

    fn render(self, template: &str) -> Self {
        render(self, template, None)
    }

    fn render_with_layout(self, template: &str, layout: &str) -> Self {
        render(self, template, Some(layout))
    }

    fn bindings(&self) -> &Bindings {
        self.state()
            .expect("bindings must be run after the views handler")
    }

    fn bindings_mut(&mut self) -> &mut Bindings {
        self.state_mut()
            .expect("bindings_mut must be run after the views handler")
    }

    fn view_engine(&self) -> &dyn ViewEngine {
        self.state::<ViewsHandler>()
            .expect("views must be rendered after the views handler")
            .engine()
    }
}

fn render(conn: Conn, template: &str, layout: Option<&str>) -> Conn {
    let mut body = vec![];
    let result = conn
        .view_engine()
        .render(&mut body, template, conn.bindings().clone(), layout);

    match result {
        Ok(()) => conn.ok(String::from_utf8_lossy(&body).into_owned()),
        Err(e) => {
            log::error!("{e}");
            conn.with_status(500).with_body(e.to_string())
        }
    }
}
