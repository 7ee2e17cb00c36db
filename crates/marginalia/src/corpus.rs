//! The corpus: every source, book and clipping of a session.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dedup::{IdentityResolver, SimilarPair, SimilarityScanner, DEFAULT_SIMILARITY_THRESHOLD};
use crate::error::{ClippingsError, Result};
use crate::input::{split_fragments, RecordParser, Source, Upload};
use crate::model::{Book, BookId, BookRegistry, Clipping, ClippingDraft, ClippingId, ClippingKind, SourceId};
use crate::output::{self, ExportFormat};

/// Configuration for a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Shortest shared run of body text, in characters, that marks two
    /// clippings as similar.
    pub similarity_threshold: usize,
    /// Remove a leading byte-order mark from uploads and fragments.
    pub strip_bom: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            strip_bom: true,
        }
    }
}

impl CorpusConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_similarity_threshold(mut self, threshold: usize) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_strip_bom(mut self, strip: bool) -> Self {
        self.strip_bom = strip;
        self
    }

    /// Reject settings the corpus cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.similarity_threshold == 0 {
            return Err(ClippingsError::Config(
                "similarity threshold must be at least 1 character".to_string(),
            ));
        }
        Ok(())
    }
}

/// A view over the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every live clipping, in ingestion order.
    All,
    /// Live clippings of one book.
    Book(BookId),
    /// Live clippings of one source.
    Source(SourceId),
    /// Marked clippings.
    Marked,
    /// Soft-deleted clippings.
    Deleted,
    /// Live clippings that duplicate an earlier one.
    Duplicates,
}

/// Counts of clippings by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub highlight: usize,
    pub bookmark: usize,
    pub note: usize,
}

impl KindCounts {
    fn add(&mut self, kind: ClippingKind) {
        match kind {
            ClippingKind::Highlight => self.highlight += 1,
            ClippingKind::Bookmark => self.bookmark += 1,
            ClippingKind::Note => self.note += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.highlight + self.bookmark + self.note
    }
}

/// Summary of the corpus contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub sources: usize,
    pub books: usize,
    /// All parsed clippings, deleted or not.
    pub clippings: usize,
    /// Clippings that are not soft-deleted.
    pub live: usize,
    pub marked: usize,
    pub deleted: usize,
    /// Clippings whose raw fragment repeats an earlier one.
    pub duplicates: usize,
    pub edited: usize,
    /// Clippings with at least one similarity link.
    pub similar: usize,
    /// Fragments that could not be parsed, across all sources.
    pub unparsed_fragments: usize,
    pub by_kind: KindCounts,
}

/// In-memory store of parsed clippings.
///
/// Clippings live in an arena indexed by id; books and sources hold ordered
/// id lists. All mutation goes through `&mut self`, so find-or-create and
/// duplicate linkage always run against a single owner.
#[derive(Debug, Clone)]
pub struct Corpus {
    config: CorpusConfig,
    parser: RecordParser,
    clippings: Vec<Clipping>,
    books: BookRegistry,
    sources: Vec<Source>,
    identity: IdentityResolver,
    live_count: usize,
}

impl Corpus {
    /// Create an empty corpus with default configuration.
    pub fn new() -> Self {
        Self {
            config: CorpusConfig::default(),
            parser: RecordParser::new(),
            clippings: Vec::new(),
            books: BookRegistry::new(),
            sources: Vec::new(),
            identity: IdentityResolver::new(),
            live_count: 0,
        }
    }

    /// Create an empty corpus with custom configuration.
    pub fn with_config(config: CorpusConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Clear every source, book and clipping and restart all id counters.
    pub fn reset(&mut self) {
        self.clippings.clear();
        self.books.clear();
        self.sources.clear();
        self.identity.clear();
        self.live_count = 0;
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Ingest the text of one upload.
    ///
    /// Fragments that do not parse are kept on the source as diagnostics and
    /// the remaining fragments are still ingested.
    pub fn ingest(&mut self, raw_text: &str, filename: &str) -> &Source {
        let source_id = SourceId(self.sources.len() as u64);
        let mut source = Source::new(source_id, filename, raw_text);

        let fragments = split_fragments(raw_text, self.config.strip_bom);
        source.fragment_count = fragments.len();

        for (index, fragment) in fragments.into_iter().enumerate() {
            match self.parser.parse(fragment, index) {
                Ok(draft) => {
                    let id = self.insert(draft, source_id);
                    source.clippings.push(id);
                    source.live_count += 1;
                }
                Err(err) => {
                    warn!(source = %filename, fragment = index, reason = err.reason.describe(), "skipping unparsable fragment");
                    source.unparsed.push(err);
                }
            }
        }

        debug!(
            source = %filename,
            fragments = source.fragment_count,
            parsed = source.clippings.len(),
            unparsed = source.unparsed.len(),
            "ingested source"
        );

        let index = source_id.index();
        self.sources.push(source);
        &self.sources[index]
    }

    /// Ingest a decoded upload.
    pub fn ingest_upload(&mut self, upload: &Upload) -> &Source {
        self.ingest(&upload.text, &upload.filename)
    }

    fn insert(&mut self, draft: ClippingDraft, source_id: SourceId) -> ClippingId {
        let id = ClippingId(self.clippings.len() as u64);
        let duplicate_of = self.identity.resolve(&draft.raw_fragment, id);
        let book_id = self.books.find_or_create(&draft.title, &draft.author);

        if let Some(book) = self.books.get_mut(book_id) {
            book.clippings.push(id);
            book.live_count += 1;
        }
        self.live_count += 1;

        self.clippings
            .push(Clipping::from_draft(id, draft, source_id, book_id, duplicate_of));
        id
    }

    // =========================================================================
    // Lookups and views
    // =========================================================================

    pub fn clipping(&self, id: ClippingId) -> Option<&Clipping> {
        self.clippings.get(id.index())
    }

    pub(crate) fn clipping_mut(&mut self, id: ClippingId) -> Result<&mut Clipping> {
        self.clippings
            .get_mut(id.index())
            .ok_or(ClippingsError::UnknownClipping(id))
    }

    /// Every clipping, deleted or not, in ingestion order.
    pub fn clippings(&self) -> &[Clipping] {
        &self.clippings
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn find_book(&self, title: &str, author: &str) -> Option<&Book> {
        self.books.find(title, author).and_then(|id| self.books.get(id))
    }

    /// Books in creation order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    /// Books ordered by title for display.
    pub fn list_books(&self) -> Vec<&Book> {
        self.books.list_sorted()
    }

    pub fn source(&self, id: SourceId) -> Option<&Source> {
        self.sources.get(id.index())
    }

    /// Sources in ingestion order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Clippings in a view, in collection order.
    ///
    /// Every scope except [`Scope::Deleted`] leaves soft-deleted clippings out.
    pub fn get_clippings(&self, scope: Scope) -> Result<Vec<&Clipping>> {
        self.collect(scope, scope == Scope::Deleted)
    }

    /// Clippings of a scope's underlying collection, optionally keeping
    /// deleted ones.
    fn collect(&self, scope: Scope, include_deleted: bool) -> Result<Vec<&Clipping>> {
        let selected: Vec<&Clipping> = match scope {
            Scope::All => self.clippings.iter().collect(),
            Scope::Book(id) => {
                let book = self.books.get(id).ok_or(ClippingsError::UnknownBook(id))?;
                self.resolve(&book.clippings)
            }
            Scope::Source(id) => {
                let source = self.source(id).ok_or(ClippingsError::UnknownSource(id))?;
                self.resolve(&source.clippings)
            }
            Scope::Marked => self.clippings.iter().filter(|c| c.marked).collect(),
            Scope::Deleted => self.clippings.iter().filter(|c| c.deleted).collect(),
            Scope::Duplicates => self.clippings.iter().filter(|c| c.is_duplicate()).collect(),
        };

        Ok(selected
            .into_iter()
            .filter(|c| include_deleted || !c.deleted)
            .collect())
    }

    fn resolve(&self, ids: &[ClippingId]) -> Vec<&Clipping> {
        ids.iter().filter_map(|id| self.clipping(*id)).collect()
    }

    /// Number of clippings that are not soft-deleted.
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn book_live_count(&self, id: BookId) -> Result<usize> {
        self.books
            .get(id)
            .map(|b| b.live_count)
            .ok_or(ClippingsError::UnknownBook(id))
    }

    pub fn source_live_count(&self, id: SourceId) -> Result<usize> {
        self.source(id)
            .map(|s| s.live_count)
            .ok_or(ClippingsError::UnknownSource(id))
    }

    /// Number of parsed clippings, deleted or not.
    pub fn len(&self) -> usize {
        self.clippings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clippings.is_empty()
    }

    pub(crate) fn adjust_live_counts(&mut self, book: BookId, source: SourceId, restored: bool) {
        let step = |count: &mut usize| {
            if restored {
                *count += 1;
            } else {
                *count = count.saturating_sub(1);
            }
        };

        step(&mut self.live_count);
        if let Some(book) = self.books.get_mut(book) {
            step(&mut book.live_count);
        }
        if let Some(source) = self.sources.get_mut(source.index()) {
            step(&mut source.live_count);
        }
    }

    /// Compute summary counts.
    pub fn summary(&self) -> CorpusSummary {
        let mut summary = CorpusSummary {
            sources: self.sources.len(),
            books: self.books.len(),
            clippings: self.clippings.len(),
            live: self.live_count,
            unparsed_fragments: self.sources.iter().map(|s| s.unparsed.len()).sum(),
            ..CorpusSummary::default()
        };

        for clipping in &self.clippings {
            summary.by_kind.add(clipping.kind);
            if clipping.marked {
                summary.marked += 1;
            }
            if clipping.deleted {
                summary.deleted += 1;
            }
            if clipping.is_duplicate() {
                summary.duplicates += 1;
            }
            if clipping.is_edited() {
                summary.edited += 1;
            }
            if !clipping.similar.is_empty() {
                summary.similar += 1;
            }
        }

        summary
    }

    // =========================================================================
    // Similarity
    // =========================================================================

    /// Link the live clippings of a scope that share a run of body text of at
    /// least the configured threshold. Returns the pairs found by this scan.
    pub fn scan_similar(&mut self, scope: Scope) -> Result<Vec<SimilarPair>> {
        self.scan_similar_with_threshold(scope, self.config.similarity_threshold)
    }

    /// Like [`scan_similar`](Self::scan_similar) with an explicit threshold.
    pub fn scan_similar_with_threshold(
        &mut self,
        scope: Scope,
        threshold: usize,
    ) -> Result<Vec<SimilarPair>> {
        let scanner = SimilarityScanner::new(threshold);
        let pairs = {
            let bodies: Vec<(ClippingId, &str)> = self
                .get_clippings(scope)?
                .into_iter()
                .map(|c| (c.id, c.text.as_str()))
                .collect();
            scanner.scan(&bodies)
        };

        for pair in &pairs {
            self.link_similar(pair.first, pair.second)?;
        }

        debug!(?scope, threshold, pairs = pairs.len(), "similarity scan finished");
        Ok(pairs)
    }

    fn link_similar(&mut self, a: ClippingId, b: ClippingId) -> Result<()> {
        if a == b {
            return Ok(());
        }
        self.clipping_mut(a)?.similar.insert(b);
        self.clipping_mut(b)?.similar.insert(a);
        Ok(())
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Reconstruct clippings-file text for a scope, in collection order.
    pub fn serialize(&self, scope: Scope, include_deleted: bool) -> Result<String> {
        let clippings = self.collect(scope, true)?;
        Ok(output::serialize(&clippings, include_deleted))
    }

    /// Render a scope in the requested format.
    pub fn export(&self, scope: Scope, format: ExportFormat, include_deleted: bool) -> Result<String> {
        let clippings = self.collect(scope, true)?;
        output::export(&clippings, format, include_deleted)
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new()
    }
}
