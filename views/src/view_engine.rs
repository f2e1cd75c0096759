use crate::{Bindings, FunctionMap, Result, TemplateSet, Views};
use std::io::Write;

/**
The uniform interface shared by every [`Views`], whatever template
engine it wraps. This is what [`ViewsHandler`](crate::ViewsHandler)
renders through.
*/
pub trait ViewEngine: Send + Sync + 'static {
    /// rebuilds the templates, see [`Views::load`]
    fn load(&self) -> Result<()>;

    /// renders a template by name, see [`Views::render`]
    fn render(
        &self,
        out: &mut dyn Write,
        template: &str,
        bindings: Bindings,
        layout: Option<&str>,
    ) -> Result<()>;

    /// a snapshot of the registered functions
    fn functions(&self) -> FunctionMap;
}

impl<S: TemplateSet> ViewEngine for Views<S> {
    fn load(&self) -> Result<()> {
        Views::load(self)
    }

    fn render(
        &self,
        out: &mut dyn Write,
        template: &str,
        bindings: Bindings,
        layout: Option<&str>,
    ) -> Result<()> {
        Views::render(self, out, template, bindings, layout)
    }

    fn functions(&self) -> FunctionMap {
        Views::functions(self)
    }
}
