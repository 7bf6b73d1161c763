//! Template registry: Tera-backed file templates plus programmatic ones.
//!
//! # Naming
//!
//! | File under the template dir          | Template name          |
//! |--------------------------------------|------------------------|
//! | `layouts/application.html.tera`      | `layouts/application`  |
//! | `layouts/Admin.tera`                 | `layouts/admin`        |
//! | `users/index.html.tera`              | `users/index`          |
//!
//! Lookups go through the same rule, so `Admin`, `admin.html` and `admin`
//! all find `layouts/admin`.
//!
//! # Front matter
//!
//! A file may open with a YAML block between `---` lines:
//!
//! ```text
//! ---
//! layout: outer          # wrap this template in layout "outer"
//! yields: [menu]         # named slots read here; unregistered ones bind to ""
//! slots:                 # slots registered for the outer layout (Tera source)
//!   title: "Admin | {{ slots.title }}"
//! forward: [menu]        # pass these received slots on to the outer layout
//! forward_all: false     # pass every received slot on
//! ---
//! <div>{{ content }}</div>
//! ```
//!
//! Tera templates see `content` (unqualified yield), `slots` (named yields)
//! and `locals` (render-wide host data).
//!
//! Tera rejects undefined variables, so reading `slots.x` when nothing
//! registered `x` fails the render. List `x` under `yields` to get `""`
//! instead, as programmatic templates do through `yield_slot`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tera::Tera;

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::template::{FnTemplate, Template, TemplateResolver};

const TEMPLATE_EXTENSION: &str = "tera";

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

/// Relative path → template name: `/` separators, lowercase, extensions dropped.
fn normalize_template_name(path: &Path) -> String {
    let name = path
        .to_string_lossy()
        .replace('\\', "/")
        .to_lowercase();
    let name = name.trim_start_matches("./").trim_start_matches('/');
    match name.rsplit_once('/') {
        Some((dir, file)) => format!("{}/{}", dir, strip_extensions(file)),
        None => strip_extensions(name).to_string(),
    }
}

fn strip_extensions(file: &str) -> &str {
    match file.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    }
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_template_dir(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    files.sort();
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some(TEMPLATE_EXTENSION) {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents.replace("\r\n", "\n")));
    }
    Ok(templates)
}

// ---------------------------------------------------------------------------
// Front matter
// ---------------------------------------------------------------------------

/// Composition directives declared at the top of a Tera template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontMatter {
    /// Outer layout wrapping this template's output.
    #[serde(default)]
    pub layout: Option<String>,
    /// Named slots this template reads.
    #[serde(default)]
    pub yields: Vec<String>,
    /// Slots registered for the outer layout; values are Tera source.
    #[serde(default)]
    pub slots: BTreeMap<String, String>,
    /// Received slots passed on to the outer layout.
    #[serde(default)]
    pub forward: Vec<String>,
    #[serde(default)]
    pub forward_all: bool,
}

/// Split `source` into its front matter YAML and body, if it has any.
fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn parse_template(name: &str, source: &str) -> Result<(FrontMatter, String), RenderError> {
    let Some((yaml, body)) = split_front_matter(source) else {
        return Ok((FrontMatter::default(), source.to_string()));
    };
    if yaml.trim().is_empty() {
        return Ok((FrontMatter::default(), body.to_string()));
    }
    let front = serde_yaml::from_str(yaml).map_err(|e| RenderError::FrontMatter {
        name: name.to_string(),
        source: e,
    })?;
    Ok((front, body.to_string()))
}

fn slot_template_name(template: &str, slot: &str) -> String {
    format!("{}#slot:{}", template, slot)
}

// ---------------------------------------------------------------------------
// TeraTemplate
// ---------------------------------------------------------------------------

/// A template compiled into the registry's shared Tera instance.
pub struct TeraTemplate {
    name: String,
    tera: Arc<Tera>,
    front: Arc<FrontMatter>,
}

impl TeraTemplate {
    pub fn front_matter(&self) -> &FrontMatter {
        &self.front
    }

    fn tera_context(&self, ctx: &RenderContext<'_>) -> tera::Context {
        let mut slots = ctx.bindings().slots.clone();
        for name in &self.front.yields {
            if !slots.contains(name) {
                slots.replace(name.as_str(), "");
            }
        }
        let mut tera_ctx = tera::Context::new();
        tera_ctx.insert("content", ctx.yield_content());
        tera_ctx.insert("slots", &slots);
        tera_ctx.insert("locals", ctx.locals());
        tera_ctx
    }

    fn render_body(&self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        if self.front.forward_all {
            ctx.forward_all_slots();
        } else {
            for name in &self.front.forward {
                ctx.forward_slot(name);
            }
        }

        let tera_ctx = self.tera_context(ctx);
        for slot in self.front.slots.keys() {
            let content = self.tera.render(&slot_template_name(&self.name, slot), &tera_ctx)?;
            ctx.content_for(slot.as_str(), &content);
        }

        let body = self.tera.render(&self.name, &tera_ctx)?;
        ctx.write(&body);
        Ok(())
    }
}

impl Template for TeraTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        match &self.front.layout {
            Some(layout) => ctx.inside_layout(layout, |ctx| self.render_body(ctx)),
            None => self.render_body(ctx),
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateRegistry
// ---------------------------------------------------------------------------

/// Name → template map used as the [`TemplateResolver`].
///
/// Programmatic templates registered with [`register`](Self::register) or
/// [`register_fn`](Self::register_fn) shadow Tera templates of the same name.
pub struct TemplateRegistry {
    tera: Tera,
    compiled: Arc<Tera>,
    front_matter: HashMap<String, Arc<FrontMatter>>,
    native: HashMap<String, Arc<dyn Template>>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        let tera = Tera::default();
        TemplateRegistry {
            compiled: Arc::new(tera.clone()),
            tera,
            front_matter: HashMap::new(),
            native: HashMap::new(),
        }
    }

    /// Build a registry from every `.tera` file under `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, RenderError> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Load every `.tera` file under `dir` (recursively).
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, RenderError> {
        if !dir.is_dir() {
            return Err(io_err(
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "template directory not found"),
            ));
        }
        let templates = load_template_dir(dir)?;
        let count = templates.len();
        self.add_raw_templates(templates)?;
        tracing::info!(dir = %dir.display(), count, "loaded templates");
        Ok(count)
    }

    /// Add a single Tera template from source.
    pub fn add_raw(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.add_raw_templates(vec![(name.to_string(), source.to_string())])
    }

    /// Add several Tera templates at once so they may reference each other.
    pub fn add_raw_templates(
        &mut self,
        templates: Vec<(String, String)>,
    ) -> Result<(), RenderError> {
        let mut items = Vec::with_capacity(templates.len());
        let mut parsed = Vec::with_capacity(templates.len());
        for (name, source) in templates {
            let name = normalize_template_name(Path::new(&name));
            let (front, body) = parse_template(&name, &source)?;
            for (slot, slot_source) in &front.slots {
                items.push((slot_template_name(&name, slot), slot_source.clone()));
            }
            items.push((name.clone(), body));
            parsed.push((name, front));
        }

        // Tera keeps the good half of a failed batch; commit only on success.
        let mut tera = self.tera.clone();
        tera.add_raw_templates(items)?;
        self.tera = tera;
        for (name, front) in parsed {
            self.front_matter.insert(name, Arc::new(front));
        }
        self.compiled = Arc::new(self.tera.clone());
        Ok(())
    }

    /// Register a programmatic template. The name is normalized like a file
    /// path, so it shadows the Tera template it would collide with.
    pub fn register(&mut self, name: &str, template: Arc<dyn Template>) {
        self.native
            .insert(normalize_template_name(Path::new(name)), template);
    }

    /// Register a closure as a template.
    pub fn register_fn<F>(&mut self, name: &str, body: F)
    where
        F: Fn(&mut RenderContext<'_>) -> Result<(), RenderError> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(FnTemplate::new(name, body)));
    }

    pub fn contains(&self, name: &str) -> bool {
        let key = normalize_template_name(Path::new(name));
        self.native.contains_key(&key) || self.front_matter.contains_key(&key)
    }

    /// All resolvable template names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .native
            .keys()
            .chain(self.front_matter.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl TemplateResolver for TemplateRegistry {
    fn resolve_path(&self, path: &str) -> Result<Arc<dyn Template>, RenderError> {
        let key = normalize_template_name(Path::new(path));
        if let Some(template) = self.native.get(&key) {
            return Ok(Arc::clone(template));
        }
        match self.front_matter.get(&key) {
            Some(front) => Ok(Arc::new(TeraTemplate {
                name: key,
                tera: Arc::clone(&self.compiled),
                front: Arc::clone(front),
            })),
            None => Err(RenderError::TemplateNotFound {
                name: path.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
