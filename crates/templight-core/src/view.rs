//! The view controller: owns the current decorations and rebuilds them.
//!
//! ## States
//!
//! ```text
//!            doc or viewport changed
//!   Fresh ────────────────────────────► Stale
//!     ▲                                   │
//!     └──────── synchronous rebuild ──────┘
//! ```
//!
//! Every qualifying update rebuilds the whole document, not just the changed
//! range or the visible lines. Readers holding an older `Arc<Decorations>`
//! keep a valid snapshot; the new set replaces it in one assignment.

use std::sync::Arc;

use templight_buffer::TextBuffer;
use templight_syntax::{
    Grammar, LanguageRegistry, StyleTable, TemplateGrammar, TokenSpan, highlight,
};

use crate::builder::DecorationBuilder;
use crate::cache::FragmentCache;
use crate::config::{Config, DecorationConfig};
use crate::decoration::Decorations;
use crate::event::ViewUpdate;
use crate::scanner::Scanner;
use crate::CoreResult;

/// Whether the published decorations match the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Stale,
    Fresh,
}

/// Keeps one editor view's decorations in step with its document.
pub struct ViewController {
    scanner: Scanner,
    grammar: Box<dyn Grammar>,
    styles: StyleTable,
    decoration_config: DecorationConfig,
    cache: Option<FragmentCache>,
    state: ViewState,
    decorations: Arc<Decorations>,
}

impl ViewController {
    /// Creates a controller with an explicit grammar and builds the initial
    /// decorations for `document`.
    pub fn new(
        config: &Config,
        grammar: Box<dyn Grammar>,
        document: &TextBuffer,
    ) -> CoreResult<Self> {
        let scanner = Scanner::new(config.delimiters.compile()?);
        let cache = config.highlight.memoize_regions.then(FragmentCache::new);

        let mut controller = Self {
            scanner,
            grammar,
            styles: StyleTable::standard(),
            decoration_config: config.decorations.clone(),
            cache,
            state: ViewState::Stale,
            decorations: Arc::default(),
        };
        controller.rebuild(document);
        Ok(controller)
    }

    /// Creates a controller using the configured language, wrapped so the
    /// fragment markers are highlighted as meta tokens.
    pub fn from_config(config: &Config, document: &TextBuffer) -> CoreResult<Self> {
        let inner = LanguageRegistry::grammar(&config.highlight.language)?;
        let grammar = TemplateGrammar::new(inner, config.delimiters.compile()?);
        tracing::info!("Highlighting fragments with {}", grammar.name());
        Self::new(config, Box::new(grammar), document)
    }

    /// Handles a host update. Returns whether decorations were rebuilt.
    pub fn update(&mut self, document: &TextBuffer, update: ViewUpdate) -> bool {
        if !update.requires_rebuild() {
            return false;
        }
        self.state = ViewState::Stale;
        self.rebuild(document);
        true
    }

    /// Rebuilds all decorations for `document` and publishes them.
    pub fn rebuild(&mut self, document: &TextBuffer) {
        self.state = ViewState::Stale;
        let regions = self.scanner.scan(document);

        let grammar = self.grammar.as_ref();
        let styles = &self.styles;
        let mut cache = self.cache.as_mut();
        if let Some(cache) = cache.as_mut() {
            cache.begin();
        }

        let decorations = DecorationBuilder::new(&self.decoration_config).build(
            document,
            &regions,
            |fragment| {
                let compute = || {
                    highlight(fragment, grammar, styles)
                        .map(|spans| spans.collect::<Vec<TokenSpan>>())
                };
                match cache.as_mut() {
                    Some(cache) => cache.get_or_try_insert(fragment, compute),
                    None => compute(),
                }
            },
        );

        if let Some(cache) = self.cache.as_mut() {
            cache.finish();
        }

        tracing::debug!(
            regions = regions.len(),
            lines = decorations.lines.len(),
            marks = decorations.marks.len(),
            unhighlighted = decorations.unhighlighted.len(),
            "Rebuilt decorations"
        );
        self.decorations = Arc::new(decorations);
        self.state = ViewState::Fresh;
    }

    /// The most recently built decorations.
    pub fn decorations(&self) -> Arc<Decorations> {
        Arc::clone(&self.decorations)
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn grammar_name(&self) -> &str {
        self.grammar.name()
    }

    /// `(hits, misses)` of the fragment cache, when memoization is on.
    pub fn cache_stats(&self) -> Option<(u64, u64)> {
        self.cache.as_ref().map(FragmentCache::stats)
    }

    /// Tears the controller down. Nothing to flush; dropping releases it all.
    pub fn destroy(self) {}
}
