//! Content resolution for class locators.
//!
//! Given a [`ClassLocator`], the resolver produces readable text plus a
//! canonical locator that callers can reuse for later requests about the
//! same symbol. It first tries to upgrade a binary-archive locator to the
//! matching source archive, then serves from the bounded LRU cache, and on a
//! miss runs a fixed fallback search over the candidate file forms.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{CachedContent, ContentCache};
use crate::config::ContentConfig;
use crate::decompile::Decompiler;
use crate::error::ContentError;
use crate::locator::{ClassLocator, FileExtension};
use crate::scratch::ScratchSpace;
use crate::sources::SourceArchiveProvider;
use crate::translate::SourceTranslator;

pub struct ContentResolver {
    config: ContentConfig,
    sources: Arc<dyn SourceArchiveProvider>,
    decompiler: Arc<dyn Decompiler>,
    translator: Option<Arc<dyn SourceTranslator>>,
    scratch: ScratchSpace,
    cache: Mutex<ContentCache>,
    // Per-key guards so concurrent misses on the same key decompile once.
    // The cache mutex itself is only ever held for a get or a put.
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ContentResolver {
    pub fn new(
        config: ContentConfig,
        sources: Arc<dyn SourceArchiveProvider>,
        decompiler: Arc<dyn Decompiler>,
        translator: Option<Arc<dyn SourceTranslator>>,
        scratch: ScratchSpace,
    ) -> Self {
        let cache = Mutex::new(ContentCache::new(config.cache_capacity));
        Self {
            config,
            sources,
            decompiler,
            translator,
            scratch,
            cache,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Fetches the contents of a compiled class or source file, together
    /// with the canonical locator for the returned text (extension
    /// corrected, archive possibly upgraded to its source form).
    pub fn resolve(
        &self,
        locator: &ClassLocator,
    ) -> Result<(ClassLocator, String), ContentError> {
        let resolved = self.upgrade_to_source_archive(locator);
        let key = resolved.to_string();

        let slot = self
            .inflight
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = slot.lock();
        let outcome = self.lookup_or_compute(locator, &resolved, &key);
        drop(guard);

        let mut inflight = self.inflight.lock();
        // One reference in the map plus ours: nobody else is waiting.
        let idle = inflight
            .get(&key)
            .is_some_and(|slot| Arc::strong_count(slot) <= 2);
        if idle {
            inflight.remove(&key);
        }

        outcome
    }

    /// Number of entries currently cached.
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }

    fn lookup_or_compute(
        &self,
        original: &ClassLocator,
        resolved: &ClassLocator,
        key: &str,
    ) -> Result<(ClassLocator, String), ContentError> {
        if let Some(hit) = self.cache.lock().get(key) {
            debug!(locator = %resolved, "cache hit");
            return Ok((resolved.with_file_extension(hit.extension), hit.text));
        }

        info!(locator = %resolved, "finding contents");
        let Some((text, extension)) = self.probe_forms(resolved)? else {
            return Err(ContentError::NotFound(original.to_string()));
        };

        self.cache.lock().put(
            key.to_string(),
            CachedContent {
                text: text.clone(),
                extension,
            },
        );
        Ok((resolved.with_file_extension(extension), text))
    }

    /// Re-points a binary-archive locator at its matching source archive
    /// when one is known. Local files and source archives are already the
    /// best available form and stay unchanged.
    fn upgrade_to_source_archive(&self, locator: &ClassLocator) -> ClassLocator {
        if locator.is_local() || locator.is_source_archive() {
            return locator.clone();
        }
        match locator
            .archive_path()
            .and_then(|archive| self.sources.fetch_source_archive(archive))
        {
            Some(sources) => {
                debug!(locator = %locator, sources = %sources.display(), "upgrading to source archive");
                locator.with_source(true).with_archive_path(sources)
            }
            None => locator.clone(),
        }
    }

    /// Probes the candidate forms in a fixed order: the locator as given,
    /// then with the extension forced to class, java and kt. The symbol's
    /// home extension is not always known up front (an inner class may only
    /// exist in binary form), so the order is a deterministic search rather
    /// than a guess.
    fn probe_forms(
        &self,
        resolved: &ClassLocator,
    ) -> Result<Option<(String, FileExtension)>, ContentError> {
        let candidates = [
            resolved.clone(),
            resolved.with_file_extension(FileExtension::Class),
            resolved.with_file_extension(FileExtension::Java),
            resolved.with_file_extension(FileExtension::Kotlin),
        ];
        for candidate in &candidates {
            if let Some(found) = self.try_read(candidate)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// One probe. `Ok(None)` means "this form does not exist, try the next";
    /// any error aborts the whole resolution.
    fn try_read(
        &self,
        candidate: &ClassLocator,
    ) -> Result<Option<(String, FileExtension)>, ContentError> {
        match candidate.extension() {
            FileExtension::Class => {
                let Some(staged) = candidate.extract_to_scratch_file(&self.scratch)? else {
                    return Ok(None);
                };
                let decompiled = self.decompiler.decompile_class(&staged, &self.scratch)?;
                let text = std::fs::read_to_string(&decompiled)?;
                Ok(Some(self.finish_foreign(text)?))
            }
            FileExtension::Java => {
                let Some(text) = candidate.read_contents()? else {
                    return Ok(None);
                };
                if candidate.is_source_archive() {
                    // Original sources in a source archive are authoritative
                    // and returned verbatim, never translated.
                    Ok(Some((text, FileExtension::Java)))
                } else {
                    Ok(Some(self.finish_foreign(text)?))
                }
            }
            FileExtension::Kotlin => Ok(candidate
                .read_contents()?
                .map(|text| (text, FileExtension::Kotlin))),
        }
    }

    /// The translation gate: Java text becomes Kotlin only when the config
    /// flag is set and a translator is wired; otherwise it is returned in
    /// its foreign form.
    fn finish_foreign(&self, java_text: String) -> Result<(String, FileExtension), ContentError> {
        match &self.translator {
            Some(translator) if self.config.translate_to_kotlin => {
                let kotlin = translator.translate(&java_text)?;
                Ok((kotlin, FileExtension::Kotlin))
            }
            _ => Ok((java_text, FileExtension::Java)),
        }
    }
}
