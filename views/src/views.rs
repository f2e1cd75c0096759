use crate::{
    Bindings, Directory, Error, FileSystem, FunctionError, FunctionMap, Result, SetOptions,
    TemplateSet,
};
use serde_json::Value;
use std::{
    fmt::{self, Debug, Formatter},
    io::Write,
    path::{Component, Path, PathBuf},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// The layout variable used unless [`Views::set_layout_variable`] says
/// otherwise
pub const DEFAULT_LAYOUT_VARIABLE: &str = "embed";

/**
The configuration a [`Views`] loads and renders with
*/
#[derive(Clone, Debug)]
pub struct EngineConfig {
    source: Arc<dyn FileSystem>,
    extension: String,
    delimiters: Option<(String, String)>,
    layout_variable: String,
    loaded: bool,
    reload: bool,
    verbose: bool,
    functions: FunctionMap,
}

impl EngineConfig {
    fn new(source: Arc<dyn FileSystem>, extension: String) -> Self {
        Self {
            source,
            extension,
            delimiters: None,
            layout_variable: DEFAULT_LAYOUT_VARIABLE.into(),
            loaded: false,
            reload: false,
            verbose: false,
            functions: FunctionMap::new(),
        }
    }

    /// the template source
    pub fn source(&self) -> &dyn FileSystem {
        &*self.source
    }

    /// the template file extension, including its leading dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// the configured action delimiters, if any
    pub fn delimiters(&self) -> Option<(&str, &str)> {
        self.delimiters
            .as_ref()
            .map(|(left, right)| (left.as_str(), right.as_str()))
    }

    /// the name that layouts use to reach the rendered content
    pub fn layout_variable(&self) -> &str {
        &self.layout_variable
    }

    /// whether the most recent load succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// whether every render reloads the templates first
    pub fn is_reload(&self) -> bool {
        self.reload
    }

    /// whether loads log every template they register
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// the functions registered into each load
    pub fn functions(&self) -> &FunctionMap {
        &self.functions
    }

    fn compile<S: TemplateSet>(&self) -> Result<S> {
        let options = SetOptions {
            extension: &self.extension,
            delimiters: self.delimiters(),
            debug: self.verbose,
            functions: &self.functions,
        };

        let mut templates = S::build(&options).map_err(Error::Build)?;

        for path in self.source.files()? {
            let Some(name) = template_name(&path, &self.extension) else {
                continue;
            };

            let source = String::from_utf8(self.source.read(&path)?)
                .map_err(|_| Error::NotUtf8(path.clone()))?;

            templates
                .register(&name, source)
                .map_err(|source| Error::Register {
                    name: name.clone(),
                    source,
                })?;

            if self.verbose {
                log::info!("views: parsed template: {name}");
            } else {
                log::debug!("registered template {name}");
            }
        }

        Ok(templates)
    }
}

/// `html/index.tmpl` with extension `.tmpl` is named `html/index`
fn template_name(path: &Path, extension: &str) -> Option<String> {
    let relative = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    if relative.len() <= extension.len() {
        return None;
    }

    relative.strip_suffix(extension).map(String::from)
}

struct State<S> {
    config: EngineConfig,
    templates: Option<Arc<S>>,
}

/**
A template engine adapter: templates are found by extension under a
directory or [`FileSystem`], compiled by the wrapped [`TemplateSet`],
and rendered by name, optionally inside a layout.

Views is cheap to clone and every clone shares configuration and
templates. Configuration may change at any time; it is picked up by the
next load.
*/
pub struct Views<S> {
    state: Arc<RwLock<State<S>>>,
}

impl<S> Clone for Views<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> Debug for Views<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Views")
            .field("config", &self.read().config)
            .field("template_set", &std::any::type_name::<S>())
            .finish()
    }
}

impl<S> Views<S> {
    fn read(&self) -> RwLockReadGuard<'_, State<S>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State<S>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: TemplateSet> Views<S> {
    /// Builds views that load every file ending in `extension` below the
    /// directory `root`. Nothing is read until the first load or render.
    ///
    /// # Panics
    ///
    /// Panics if the template set does not support `extension`.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self::new_file_system(Directory::new(root), extension)
    }

    /// Builds views that load every file ending in `extension` from
    /// `file_system`.
    ///
    /// # Panics
    ///
    /// Panics if the template set does not support `extension`.
    pub fn new_file_system(file_system: impl FileSystem, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        if let Err(message) = S::accept_extension(&extension) {
            panic!("{message}");
        }

        Self {
            state: Arc::new(RwLock::new(State {
                config: EngineConfig::new(Arc::new(file_system), extension),
                templates: None,
            })),
        }
    }

    /// registers a function that templates compiled by subsequent loads
    /// can call. It is legal to replace an earlier function.
    pub fn add_function<F>(&self, name: impl Into<String>, function: F) -> &Self
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.write().config.functions.insert(name, function);
        self
    }

    /// merges a batch of functions, see [`Views::add_function`]
    pub fn add_functions(&self, functions: FunctionMap) -> &Self {
        self.write().config.functions.merge(functions);
        self
    }

    /// when enabled, loads log every template they register and the
    /// wrapped engine runs in its debug mode
    pub fn set_debug(&self, enabled: bool) -> &Self {
        self.write().config.verbose = enabled;
        self
    }

    /// sets the action delimiters. An empty string stands for the
    /// engine's default on that side.
    pub fn set_delims(&self, left: impl Into<String>, right: impl Into<String>) -> &Self {
        self.write().config.delimiters = Some((left.into(), right.into()));
        self
    }

    /// sets the name under which layouts find the rendered content
    pub fn set_layout_variable(&self, name: impl Into<String>) -> &Self {
        self.write().config.layout_variable = name.into();
        self
    }

    /// when enabled, every render reloads the templates first. Useful in
    /// development to pick up edits without restarting.
    pub fn set_reload(&self, enabled: bool) -> &Self {
        self.write().config.reload = enabled;
        self
    }

    /// chainable form of [`Views::add_function`]
    pub fn with_function<F>(self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.add_function(name, function);
        self
    }

    /// chainable form of [`Views::add_functions`]
    pub fn with_functions(self, functions: FunctionMap) -> Self {
        self.add_functions(functions);
        self
    }

    /// chainable form of [`Views::set_debug`]
    pub fn with_debug(self, enabled: bool) -> Self {
        self.set_debug(enabled);
        self
    }

    /// chainable form of [`Views::set_delims`]
    pub fn with_delims(self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.set_delims(left, right);
        self
    }

    /// chainable form of [`Views::set_layout_variable`]
    pub fn with_layout_variable(self, name: impl Into<String>) -> Self {
        self.set_layout_variable(name);
        self
    }

    /// chainable form of [`Views::set_reload`]
    pub fn with_reload(self, enabled: bool) -> Self {
        self.set_reload(enabled);
        self
    }

    /// a snapshot of the registered functions
    pub fn functions(&self) -> FunctionMap {
        self.read().config.functions.clone()
    }

    /// a snapshot of the current configuration
    pub fn config(&self) -> EngineConfig {
        self.read().config.clone()
    }

    /// Builds a fresh template set from the current configuration,
    /// replacing the previous one. On failure the previous set stays in
    /// place but is no longer considered loaded.
    pub fn load(&self) -> Result<()> {
        self.load_templates().map(drop)
    }

    fn load_templates(&self) -> Result<(Arc<S>, String)> {
        let mut state = self.write();
        Self::compile_into(&mut state)
    }

    fn compile_into(state: &mut State<S>) -> Result<(Arc<S>, String)> {
        state.config.loaded = false;
        let templates = Arc::new(state.config.compile::<S>()?);
        state.templates = Some(Arc::clone(&templates));
        state.config.loaded = true;
        Ok((templates, state.config.layout_variable.clone()))
    }

    fn current(state: &State<S>) -> Option<(Arc<S>, String)> {
        match (state.config.loaded, state.config.reload, &state.templates) {
            (true, false, Some(templates)) => {
                Some((Arc::clone(templates), state.config.layout_variable.clone()))
            }
            _ => None,
        }
    }

    fn templates(&self) -> Result<(Arc<S>, String)> {
        if let Some(current) = Self::current(&self.read()) {
            return Ok(current);
        }

        let mut state = self.write();
        match Self::current(&state) {
            Some(current) => Ok(current),
            None => Self::compile_into(&mut state),
        }
    }

    /**
    Calls `f` with the underlying template set, loading it first the
    same way [`Views::render`] does. This is the way to reach
    engine-specific api on the wrapped set.
    */
    pub fn with_templates<T>(&self, f: impl FnOnce(&S) -> T) -> Result<T> {
        let (templates, _) = self.templates()?;
        Ok(f(&templates))
    }

    /**
    Renders the template registered as `template` into `out`, loading
    first if nothing has been loaded yet or reload is enabled.

    With a non-empty `layout`, the content template is rendered first
    and the layout is rendered with that output bound under the layout
    variable. A content template that fails inside a layout is logged
    and leaves the slot empty; the layout's own result is returned.
    */
    pub fn render(
        &self,
        out: &mut dyn Write,
        template: &str,
        bindings: impl Into<Bindings>,
        layout: Option<&str>,
    ) -> Result<()> {
        let (templates, layout_variable) = self.templates()?;

        if !templates.contains(template) {
            return Err(Error::NotFound(template.into()));
        }

        let bindings = bindings.into();

        let Some(layout) = layout.filter(|layout| !layout.is_empty()) else {
            return templates
                .execute(template, &bindings, out)
                .map_err(|source| Error::Execute {
                    name: template.into(),
                    source,
                });
        };

        if !templates.contains(layout) {
            return Err(Error::LayoutNotFound(layout.into()));
        }

        let mut content = vec![];
        if let Err(e) = templates.execute(template, &bindings, &mut content) {
            log::error!("template {template} failed inside layout {layout}: {e}");
            content.clear();
        }
        let content = String::from_utf8_lossy(&content).into_owned();

        templates
            .execute_layout(layout, bindings, &layout_variable, content, out)
            .map_err(|source| Error::Execute {
                name: layout.into(),
                source,
            })
    }

    /// renders into a String, see [`Views::render`]
    pub fn render_to_string(
        &self,
        template: &str,
        bindings: impl Into<Bindings>,
        layout: Option<&str>,
    ) -> Result<String> {
        let mut out = vec![];
        self.render(&mut out, template, bindings, layout)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
