//! Blocklist of disallowed substrings for free-form parameters.
//!
//! [`FileBlocklist`] re-reads its file on every [`Blocklist::load`] so edits
//! take effect on the next request. [`CachedBlocklist`] trades that for a
//! bounded staleness window and must be chosen explicitly.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use aho_corasick::AhoCorasick;
use parking_lot::Mutex;
use tracing::debug;

use super::error::FilterError;
use crate::security_log;
use crate::telemetry::{self, SecurityEvent};

/// Source of the current blocklist.
pub trait Blocklist: Send + Sync {
    /// Produce the blocklist to apply to one request.
    fn load(&self) -> Result<Arc<BlockedSubstrings>, FilterError>;
}

/// Lowercased set of disallowed substrings with a compiled matcher.
#[derive(Debug, Clone)]
pub struct BlockedSubstrings {
    tokens: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl BlockedSubstrings {
    /// Parse comma-separated tokens.
    ///
    /// Tokens are lowercased but not trimmed, so `"foo, bar"` blocks `" bar"`.
    /// Empty tokens are dropped, and a single line terminator at the very
    /// end of the text is ignored.
    pub fn parse(csv: &str) -> Result<Self, FilterError> {
        let csv = csv
            .strip_suffix("\r\n")
            .or_else(|| csv.strip_suffix('\n'))
            .unwrap_or(csv);

        let tokens: BTreeSet<String> = csv
            .split(',')
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .collect();

        Self::from_tokens(tokens.into_iter().collect())
    }

    fn from_tokens(tokens: Vec<String>) -> Result<Self, FilterError> {
        let matcher = if tokens.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::new(&tokens)
                    .map_err(|e| FilterError::InvalidBlocklist(e.to_string()))?,
            )
        };
        Ok(Self { tokens, matcher })
    }

    /// An empty blocklist that blocks nothing.
    pub fn empty() -> Self {
        Self {
            tokens: Vec::new(),
            matcher: None,
        }
    }

    /// Return the first blocked token contained in `value`, ignoring case.
    pub fn find_in(&self, value: &str) -> Option<&str> {
        let matcher = self.matcher.as_ref()?;
        let lowered = value.to_lowercase();
        matcher
            .find(&lowered)
            .map(|m| self.tokens[m.pattern().as_usize()].as_str())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Blocklist read from a comma-separated file on every load.
#[derive(Debug, Clone)]
pub struct FileBlocklist {
    path: Option<PathBuf>,
}

impl FileBlocklist {
    /// `None` is accepted here and reported as a configuration error on
    /// first use, so a missing setting cannot silently disable the check.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl Blocklist for FileBlocklist {
    fn load(&self) -> Result<Arc<BlockedSubstrings>, FilterError> {
        let Some(path) = &self.path else {
            telemetry::record_blocklist_load(false);
            security_log!(
                SecurityEvent::BlocklistUnavailable,
                "Blocklist path not configured"
            );
            return Err(FilterError::Configuration(
                "blocklist file not set, cannot validate requests".into(),
            ));
        };

        let csv = std::fs::read_to_string(path).map_err(|source| {
            telemetry::record_blocklist_load(false);
            let path_str = path.display().to_string();
            security_log!(
                SecurityEvent::BlocklistUnavailable,
                "Blocklist file unreadable",
                "path" => path_str.as_str()
            );
            FilterError::Io {
                path: path.clone(),
                source,
            }
        })?;

        let blocked = BlockedSubstrings::parse(&csv)?;
        telemetry::record_blocklist_load(true);
        debug!(path = %path.display(), tokens = blocked.len(), "Loaded blocklist");
        Ok(Arc::new(blocked))
    }
}

/// Opt-in caching wrapper that reuses a loaded blocklist for `ttl`.
///
/// A zero `ttl` reloads on every call, matching the inner loader.
pub struct CachedBlocklist<B> {
    inner: B,
    ttl: Duration,
    slot: Mutex<Option<(Instant, Arc<BlockedSubstrings>)>>,
}

impl<B: Blocklist> CachedBlocklist<B> {
    pub fn new(inner: B, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Drop the cached entry so the next load hits the inner loader.
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<B: Blocklist> Blocklist for CachedBlocklist<B> {
    fn load(&self) -> Result<Arc<BlockedSubstrings>, FilterError> {
        if self.ttl.is_zero() {
            return self.inner.load();
        }

        let mut slot = self.slot.lock();
        if let Some((loaded_at, blocked)) = slot.as_ref() {
            if loaded_at.elapsed() < self.ttl {
                return Ok(Arc::clone(blocked));
            }
        }

        let blocked = self.inner.load()?;
        *slot = Some((Instant::now(), Arc::clone(&blocked)));
        Ok(blocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_commas_and_lowercases() {
        let blocked = BlockedSubstrings::parse("XYZZY,foo").unwrap();
        assert_eq!(blocked.tokens().collect::<Vec<_>>(), vec!["foo", "xyzzy"]);
    }

    #[test]
    fn test_parse_keeps_surrounding_whitespace() {
        let blocked = BlockedSubstrings::parse("foo, bar").unwrap();
        assert!(blocked.contains(" bar"));
        assert!(!blocked.contains("bar"));
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        let blocked = BlockedSubstrings::parse(",foo,,bar,").unwrap();
        assert_eq!(blocked.len(), 2);
        assert!(BlockedSubstrings::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_ignores_one_trailing_line_terminator() {
        let blocked = BlockedSubstrings::parse("foo,bar\n").unwrap();
        assert!(blocked.contains("bar"));

        let blocked = BlockedSubstrings::parse("foo,bar\r\n").unwrap();
        assert!(blocked.contains("bar"));
    }

    #[test]
    fn test_parse_deduplicates_case_variants() {
        let blocked = BlockedSubstrings::parse("Foo,FOO,foo").unwrap();
        assert_eq!(blocked.len(), 1);
    }

    #[test]
    fn test_find_in_is_case_insensitive() {
        let blocked = BlockedSubstrings::parse("xyzzy,foo").unwrap();
        assert_eq!(blocked.find_in("tell me XYZZY now"), Some("xyzzy"));
        assert_eq!(blocked.find_in("Foobar"), Some("foo"));
        assert_eq!(blocked.find_in("nothing here"), None);
    }

    #[test]
    fn test_empty_blocklist_matches_nothing() {
        let blocked = BlockedSubstrings::empty();
        assert_eq!(blocked.find_in("anything"), None);
        assert_eq!(blocked.find_in(""), None);
    }

    #[test]
    fn test_unconfigured_file_blocklist_is_configuration_error() {
        let err = FileBlocklist::new(None).load().unwrap_err();
        assert!(err.is_configuration());
    }
}
