//! # class-content
//!
//! Resolves readable source text for JVM classes that live outside the
//! editable workspace: inside compiled archives (JARs of `.class` files) or
//! bundled source archives (`-sources.jar`). Given a locator for such a
//! symbol, the resolver returns the text plus a canonical locator usable for
//! later requests, decompiling and caching along the way.
//!
//! ## Architecture
//!
//! - **locator**: archive/entry locators with a canonical string form
//! - **resolver**: orchestration of source-archive upgrade, cache and fallback search
//! - **cache**: bounded LRU store of resolved contents
//! - **sources**: lookup of matching source archives for binary archives
//! - **decompile**: CFR decompiler integration behind a pluggable trait
//! - **translate**: optional Java-to-Kotlin source translation
//! - **scratch**: session-scoped temporary files with guaranteed cleanup
//! - **config**: resolver options and CFR path resolution
//! - **error**: typed resolution errors

pub mod cache;
pub mod cli;
pub mod config;
pub mod decompile;
pub mod error;
pub mod locator;
pub mod resolver;
pub mod scratch;
pub mod sources;
pub mod translate;
