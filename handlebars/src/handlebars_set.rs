use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason,
    ScopedJson,
};
use serde_json::Value;
use std::io::Write;
use trillium_views::{BoxError, Bindings, SetOptions, TemplateFunction, TemplateSet};

/**
A [`TemplateSet`] backed by a [`handlebars::Handlebars`] registry.

Every registered template is also available as a partial under its
name, so `{{> partials/header}}` includes `partials/header.hbs`.
Functions become helpers that return values, usable both directly
(`{{upper name}}`) and as subexpressions (`{{#if (isAdmin user)}}`).
Layouts should emit their content with a triple-stash (`{{{embed}}}`)
since it is already rendered markup.

Handlebars delimiters are fixed; a configured delimiter pair is logged
and otherwise ignored.
*/
#[derive(Debug)]
pub struct HandlebarsSet(Handlebars<'static>);

impl HandlebarsSet {
    /// the wrapped registry
    pub fn registry(&self) -> &Handlebars<'static> {
        &self.0
    }
}

impl TemplateSet for HandlebarsSet {
    fn build(options: &SetOptions<'_>) -> Result<Self, BoxError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_dev_mode(options.debug);

        match options.delimiters {
            None | Some(("" | "{{", "" | "}}")) => {}
            Some((left, right)) => {
                log::warn!("handlebars delimiters cannot be changed, ignoring {left} {right}")
            }
        }

        for (name, function) in options.functions {
            handlebars.register_helper(name, Box::new(FunctionHelper(function.clone())));
        }

        Ok(Self(handlebars))
    }

    fn register(&mut self, name: &str, source: String) -> Result<(), BoxError> {
        self.0.register_template_string(name, source)?;
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.0.has_template(name)
    }

    fn execute(
        &self,
        name: &str,
        bindings: &Bindings,
        out: &mut dyn Write,
    ) -> Result<(), BoxError> {
        self.0.render_to_write(name, bindings, out)?;
        Ok(())
    }
}

struct FunctionHelper(TemplateFunction);

impl HelperDef for FunctionHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        helper: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let args = helper
            .params()
            .iter()
            .map(|param| param.value().clone())
            .collect::<Vec<Value>>();

        let value = (self.0)(&args).map_err(|error| {
            RenderErrorReason::Other(format!("helper {}: {error}", helper.name()))
        })?;

        Ok(ScopedJson::Derived(value))
    }
}
