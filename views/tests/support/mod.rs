#![allow(dead_code)]

use serde_json::Value;
use std::{collections::HashMap, io::Write};
use trillium_views::{BoxError, Bindings, FunctionMap, SetOptions, TemplateSet, Views};

/**
A deliberately tiny engine: `{{Key}}` prints a binding, `{{fn Key}}`
calls a function with a binding, `{{> name}}` includes another template.
*/
#[derive(Debug, Default)]
pub struct Tiny {
    templates: HashMap<String, String>,
    functions: FunctionMap,
    left: String,
    right: String,
}

pub type TinyViews = Views<Tiny>;

impl TemplateSet for Tiny {
    fn accept_extension(extension: &str) -> Result<(), String> {
        if extension.starts_with('.') {
            Ok(())
        } else {
            Err(format!("{extension} must start with a dot"))
        }
    }

    fn build(options: &SetOptions<'_>) -> Result<Self, BoxError> {
        let (left, right) = options.delimiters.unwrap_or(("{{", "}}"));
        Ok(Self {
            templates: HashMap::new(),
            functions: options.functions.clone(),
            left: (if left.is_empty() { "{{" } else { left }).into(),
            right: (if right.is_empty() { "}}" } else { right }).into(),
        })
    }

    fn register(&mut self, name: &str, source: String) -> Result<(), BoxError> {
        if source.matches(&*self.left).count() != source.matches(&*self.right).count() {
            return Err(format!("unbalanced delimiters in {name}").into());
        }
        self.templates.insert(name.into(), source);
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn execute(&self, name: &str, bindings: &Bindings, out: &mut dyn Write) -> Result<(), BoxError> {
        let source = self
            .templates
            .get(name)
            .ok_or_else(|| format!("no template {name}"))?;

        let mut rest = source.as_str();
        while let Some(start) = rest.find(&*self.left) {
            out.write_all(rest[..start].as_bytes())?;
            let after = &rest[start + self.left.len()..];
            let end = after
                .find(&*self.right)
                .ok_or_else(|| format!("unclosed action in {name}"))?;
            self.action(after[..end].trim(), bindings, out)?;
            rest = &after[end + self.right.len()..];
        }
        out.write_all(rest.as_bytes())?;
        Ok(())
    }
}

impl Tiny {
    fn action(&self, action: &str, bindings: &Bindings, out: &mut dyn Write) -> Result<(), BoxError> {
        if let Some(partial) = action.strip_prefix('>') {
            return self.execute(partial.trim(), bindings, out);
        }

        let value = match action.split_once(' ') {
            Some((function, key)) => {
                let function = self
                    .functions
                    .get(function)
                    .ok_or_else(|| format!("unknown function {function}"))?;
                let arg = bindings.get(key).cloned().unwrap_or(Value::Null);
                function(&[arg])?
            }
            None => bindings.get(action).cloned().unwrap_or(Value::Null),
        };

        match value {
            Value::String(s) => out.write_all(s.as_bytes())?,
            Value::Null => {}
            other => write!(out, "{other}")?,
        }
        Ok(())
    }
}

/// collapses whitespace between tags so fixtures can be formatted freely
pub fn trim(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" <", "<")
        .replace("> ", ">")
}
