use crate::{BoxError, Bindings, FunctionMap};
use serde_json::Value;
use std::io::Write;

/// Everything a [`TemplateSet`] needs to build itself for one load
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct SetOptions<'a> {
    /// the configured extension, including its leading dot
    pub extension: &'a str,

    /// the action delimiter pair, if one was configured. An empty
    /// string stands for the engine's default on that side.
    pub delimiters: Option<(&'a str, &'a str)>,

    /// whether the engine should run in its debug or development mode
    pub debug: bool,

    /// functions to register as globals
    pub functions: &'a FunctionMap,
}

/**
The capability a wrapped template engine provides to
[`Views`](crate::Views): register source text by name, resolve a name,
and execute a resolved template into a sink.

A fresh set is built for every load, so implementations never need to
forget templates.
*/
pub trait TemplateSet: Send + Sync + Sized + 'static {
    /// checks a template extension at construction time. An `Err`
    /// message aborts construction.
    fn accept_extension(_extension: &str) -> Result<(), String> {
        Ok(())
    }

    /// builds an empty set with every function in `options` registered
    fn build(options: &SetOptions<'_>) -> Result<Self, BoxError>;

    /// compiles or stores `source` under `name`
    fn register(&mut self, name: &str, source: String) -> Result<(), BoxError>;

    /// whether `name` resolves to a template
    fn contains(&self, name: &str) -> bool;

    /// executes the named template with `bindings`, writing to `out`
    fn execute(&self, name: &str, bindings: &Bindings, out: &mut dyn Write)
    -> Result<(), BoxError>;

    /// executes a layout with the already-rendered `content` bound under
    /// `variable`. Engines that escape string values should override
    /// this to mark the content as safe markup.
    fn execute_layout(
        &self,
        layout: &str,
        mut bindings: Bindings,
        variable: &str,
        content: String,
        out: &mut dyn Write,
    ) -> Result<(), BoxError> {
        bindings.insert(variable.to_string(), Value::String(content));
        self.execute(layout, &bindings, out)
    }
}
