//! Compiled template cache.
//!
//! Templates are tera sources read by name from an [`AssetSource`]. A list
//! of fragment names compiles into one [`CompiledTemplate`]: fragments are
//! listed base layout first, and the last one is the entry that gets
//! rendered (it `extends` the ones before it).
//!
//! ## Caching
//!
//! Units are keyed by their fragment names joined with [`KEY_SEPARATOR`].
//! Hits take only a shared read lock. Compilation runs outside the lock, so
//! two concurrent misses on the same key may both compile; the first insert
//! wins and the loser adopts the stored unit, so a key never maps to more
//! than one unit and an entry is never replaced. Failures are never cached.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{CompileError, RenderError};

/// Joins fragment names into a cache key. Not allowed inside a name.
pub const KEY_SEPARATOR: char = '|';

/// Name the pipeline value is bound to inside templates.
pub const PIPELINE_NAME: &str = "pipe";

/// A read-only source of named template fragments.
pub trait AssetSource: Send + Sync {
    /// The fragment's source text, or `None` if there is no such fragment.
    fn read(&self, name: &str) -> Option<Cow<'static, str>>;
}

impl AssetSource for HashMap<&'static str, &'static str> {
    fn read(&self, name: &str) -> Option<Cow<'static, str>> {
        self.get(name).map(|body| Cow::Borrowed(*body))
    }
}

/// A render-ready template unit.
pub struct CompiledTemplate {
    key: String,
    entry: String,
    tera: Tera,
}

impl CompiledTemplate {
    /// The cache key this unit was compiled under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Render the entry fragment with `pipe` bound to [`PIPELINE_NAME`].
    pub fn render<T: Serialize + ?Sized>(&self, pipe: &T) -> Result<Vec<u8>, RenderError> {
        let mut context = Context::new();
        context
            .try_insert(PIPELINE_NAME, pipe)
            .map_err(|source| self.render_error(source))?;

        self.tera
            .render(&self.entry, &context)
            .map(String::into_bytes)
            .map_err(|source| self.render_error(source))
    }

    fn render_error(&self, source: tera::Error) -> RenderError {
        RenderError {
            entry: self.entry.clone(),
            source,
        }
    }
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("key", &self.key)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

/// Process-wide cache of compiled template units.
pub struct TemplateCache {
    source: Box<dyn AssetSource>,
    templates: RwLock<HashMap<String, Arc<CompiledTemplate>>>,
}

impl TemplateCache {
    /// Create an empty cache over an asset source.
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Build the cache key for a list of fragment names.
    pub fn key(names: &[&str]) -> Result<String, CompileError> {
        if names.is_empty() {
            return Err(CompileError::Empty);
        }
        if let Some(bad) = names.iter().find(|name| name.contains(KEY_SEPARATOR)) {
            return Err(CompileError::InvalidName(bad.to_string()));
        }
        let separator = KEY_SEPARATOR.to_string();
        Ok(names.join(separator.as_str()))
    }

    /// Return the cached unit for `names`, compiling it on first use.
    pub fn resolve(&self, names: &[&str]) -> Result<Arc<CompiledTemplate>, CompileError> {
        let key = Self::key(names)?;

        if let Some(cached) = self.templates.read().get(&key) {
            tracing::debug!(key = %key, "template cache hit");
            return Ok(Arc::clone(cached));
        }

        tracing::debug!(key = %key, "template cache miss, compiling");
        let compiled = Arc::new(self.compile(key.clone(), names)?);

        let mut templates = self.templates.write();
        let stored = templates.entry(key).or_insert(compiled);
        Ok(Arc::clone(stored))
    }

    /// Number of cached units.
    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn compile(&self, key: String, names: &[&str]) -> Result<CompiledTemplate, CompileError> {
        let mut sources = Vec::with_capacity(names.len());
        for name in names {
            let body = self
                .source
                .read(name)
                .ok_or_else(|| CompileError::MissingFragment(name.to_string()))?;
            sources.push((*name, body));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(sources)
            .map_err(|source| CompileError::Template {
                key: key.clone(),
                source,
            })?;

        // `key` already rejected an empty list.
        let entry = names.last().map(|name| name.to_string()).unwrap_or_default();

        Ok(CompiledTemplate { key, entry, tera })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const BASE: &str = "{% block main %}{% endblock main %}\n";
    const MAIN: &str =
        "{% extends \"base.html\" %}{% block main %} pipeline={{ pipe }} {% endblock main %}";

    fn mock_source() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("base.html", BASE),
            ("main.html", MAIN),
            ("field.html", "{{ pipe.missing }}"),
            ("orphan.html", "{% extends \"nowhere.html\" %}"),
            ("broken.html", "{% if %}"),
        ])
    }

    /// Source that counts reads, to prove hits do not recompile.
    struct CountingSource {
        inner: HashMap<&'static str, &'static str>,
        reads: Arc<AtomicUsize>,
    }

    impl AssetSource for CountingSource {
        fn read(&self, name: &str) -> Option<Cow<'static, str>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(name)
        }
    }

    #[test]
    fn key_joins_names() {
        assert_eq!(
            TemplateCache::key(&["html/_base.html", "html/index.html"]).unwrap(),
            "html/_base.html|html/index.html"
        );
    }

    #[test]
    fn key_rejects_separator_and_empty() {
        assert!(matches!(
            TemplateCache::key(&["a|b"]),
            Err(CompileError::InvalidName(name)) if name == "a|b"
        ));
        assert!(matches!(TemplateCache::key(&[]), Err(CompileError::Empty)));
    }

    #[test]
    fn resolve_and_render_two_fragments() {
        let cache = TemplateCache::new(mock_source());
        let template = cache.resolve(&["base.html", "main.html"]).unwrap();
        assert_eq!(template.key(), "base.html|main.html");

        let bytes = template.render("test").unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), " pipeline=test \n");
    }

    #[test]
    fn resolve_twice_hits_cache() {
        let reads = Arc::new(AtomicUsize::new(0));
        let cache = TemplateCache::new(CountingSource {
            inner: mock_source(),
            reads: Arc::clone(&reads),
        });

        let first = cache.resolve(&["base.html", "main.html"]).unwrap();
        let second = cache.resolve(&["base.html", "main.html"]).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(first.render("x").unwrap(), second.render("x").unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn resolve_distinguishes_fragment_order() {
        let cache = TemplateCache::new(mock_source());
        cache.resolve(&["base.html", "main.html"]).unwrap();
        cache.resolve(&["base.html"]).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn resolve_missing_fragment_not_cached() {
        let cache = TemplateCache::new(mock_source());
        let err = cache.resolve(&["base.html", "absent.html"]).unwrap_err();
        assert!(matches!(err, CompileError::MissingFragment(name) if name == "absent.html"));
        assert!(cache.is_empty());
    }

    #[test]
    fn resolve_malformed_fragment() {
        let cache = TemplateCache::new(mock_source());
        assert!(matches!(
            cache.resolve(&["broken.html"]),
            Err(CompileError::Template { .. })
        ));
        assert!(matches!(
            cache.resolve(&["orphan.html"]),
            Err(CompileError::Template { .. })
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_compile_is_retried() {
        let reads = Arc::new(AtomicUsize::new(0));
        let cache = TemplateCache::new(CountingSource {
            inner: mock_source(),
            reads: Arc::clone(&reads),
        });

        assert!(cache.resolve(&["broken.html"]).is_err());
        assert!(cache.resolve(&["broken.html"]).is_err());
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn render_missing_field_is_error() {
        let cache = TemplateCache::new(mock_source());
        let template = cache.resolve(&["field.html"]).unwrap();
        let err = template.render(&serde_json::json!({"present": 1})).unwrap_err();
        assert_eq!(err.entry, "field.html");
    }

    #[test]
    fn concurrent_misses_share_one_entry() {
        let cache = TemplateCache::new(mock_source());

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.resolve(&["base.html", "main.html"]).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let stored = cache.resolve(&["base.html", "main.html"]).unwrap();
        assert!(results.iter().all(|t| Arc::ptr_eq(t, &stored)));
        assert_eq!(cache.len(), 1);
    }
}
