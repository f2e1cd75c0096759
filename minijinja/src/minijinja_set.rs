use minijinja::{
    AutoEscape, Environment, Error, ErrorKind,
    syntax::SyntaxConfig,
    value::{Rest, Value},
};
use std::io::Write;
use trillium_views::{BoxError, Bindings, SetOptions, TemplateFunction, TemplateSet};

/// The template extensions [`MiniJinjaSet`] accepts. Extensions that
/// mention html turn on html auto-escaping.
pub const EXTENSIONS: [&str; 5] = [".html.jinja", ".jinja.html", ".html.j2", ".jinja", ".j2"];

/**
A [`TemplateSet`] backed by a [`minijinja::Environment`].

Templates include one another by name (`{% include "partials/header" %}`),
functions are registered as globals (`{{ upper(name) }}`), and layouts
reach the rendered page as `{{ embed }}`, which is never escaped.
Configured delimiters replace the variable delimiters; an empty side
keeps the default.
*/
#[derive(Debug)]
pub struct MiniJinjaSet(Environment<'static>);

impl MiniJinjaSet {
    /// the wrapped environment
    pub fn environment(&self) -> &Environment<'static> {
        &self.0
    }
}

impl TemplateSet for MiniJinjaSet {
    fn accept_extension(extension: &str) -> Result<(), String> {
        if EXTENSIONS.contains(&extension) {
            Ok(())
        } else {
            Err(format!(
                "{extension} is not a valid minijinja views extension {EXTENSIONS:?}"
            ))
        }
    }

    fn build(options: &SetOptions<'_>) -> Result<Self, BoxError> {
        let mut env = Environment::new();
        env.set_debug(options.debug);

        let html = options.extension.contains(".html");
        env.set_auto_escape_callback(move |_| {
            if html {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });

        if let Some((left, right)) = options.delimiters {
            let left = if left.is_empty() { "{{" } else { left };
            let right = if right.is_empty() { "}}" } else { right };
            log::debug!("minijinja variable delimiters {left} {right}");
            env.set_syntax(
                SyntaxConfig::builder()
                    .variable_delimiters(left.to_string(), right.to_string())
                    .build()?,
            );
        }

        for (name, function) in options.functions {
            let function = function.clone();
            env.add_function(name.clone(), move |args: Rest<Value>| {
                call(&function, &args)
            });
        }

        Ok(Self(env))
    }

    fn register(&mut self, name: &str, source: String) -> Result<(), BoxError> {
        self.0.add_template_owned(name.to_string(), source)?;
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.0.get_template(name).is_ok()
    }

    fn execute(
        &self,
        name: &str,
        bindings: &Bindings,
        out: &mut dyn Write,
    ) -> Result<(), BoxError> {
        self.0
            .get_template(name)?
            .render_to_write(Value::from_serialize(bindings), out)?;
        Ok(())
    }

    fn execute_layout(
        &self,
        layout: &str,
        bindings: Bindings,
        variable: &str,
        content: String,
        out: &mut dyn Write,
    ) -> Result<(), BoxError> {
        let context = bindings
            .into_inner()
            .into_iter()
            .map(|(key, value)| (key, Value::from_serialize(&value)))
            .chain([(variable.to_string(), Value::from_safe_string(content))])
            .collect::<Value>();

        self.0
            .get_template(layout)?
            .render_to_write(context, out)?;
        Ok(())
    }
}

fn call(function: &TemplateFunction, args: &[Value]) -> Result<Value, Error> {
    let args = args
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;

    function(&args)
        .map(|value| Value::from_serialize(&value))
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))
}
