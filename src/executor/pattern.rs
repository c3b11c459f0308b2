// Copyright 2025 Csvql Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Compiled pattern cache for LIKE expressions
//!
//! LIKE matching is anchored and case-insensitive: `%` matches any run of
//! characters, `_` matches exactly one. Simple shapes use direct string
//! operations; anything with `_` or interior `%` runs compiles to a cached
//! regex so per-row evaluation never recompiles.

use std::sync::{OnceLock, RwLock};

use regex::Regex;
use rustc_hash::FxHashMap;

/// Maximum number of patterns to cache
const MAX_CACHE_SIZE: usize = 1024;

/// Case-insensitive substring search without allocation
fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }

    let needle_bytes = needle.as_bytes();
    let haystack_bytes = haystack.as_bytes();

    'outer: for i in 0..=(haystack_bytes.len() - needle_bytes.len()) {
        for j in 0..needle_bytes.len() {
            if !haystack_bytes[i + j].eq_ignore_ascii_case(&needle_bytes[j]) {
                continue 'outer;
            }
        }
        return true;
    }
    false
}

/// Compiled pattern forms for fast matching
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// No wildcards: `'hello'`
    Exact(String),
    /// `'hello%'`
    Prefix(String),
    /// `'%hello'`
    Suffix(String),
    /// `'%hello%'`
    Contains(String),
    /// `'hello%world'`
    PrefixSuffix(String, String),
    /// Pattern with `_` or interior `%` runs
    Regex(Regex),
    /// `'%'`
    MatchAll,
}

impl CompiledPattern {
    /// Match the pattern against a string (case-insensitive, anchored)
    pub fn matches(&self, text: &str) -> bool {
        match self {
            CompiledPattern::MatchAll => true,
            CompiledPattern::Exact(s) => text.eq_ignore_ascii_case(s),
            CompiledPattern::Prefix(p) => {
                text.len() >= p.len() && text[..p.len()].eq_ignore_ascii_case(p)
            }
            CompiledPattern::Suffix(s) => {
                text.len() >= s.len() && text[text.len() - s.len()..].eq_ignore_ascii_case(s)
            }
            CompiledPattern::Contains(c) => contains_case_insensitive(text, c),
            CompiledPattern::PrefixSuffix(p, s) => {
                text.len() >= p.len() + s.len()
                    && text[..p.len()].eq_ignore_ascii_case(p)
                    && text[text.len() - s.len()..].eq_ignore_ascii_case(s)
            }
            CompiledPattern::Regex(re) => re.is_match(text),
        }
    }
}

/// Thread-safe cache of compiled LIKE patterns
pub struct PatternCache {
    cache: RwLock<FxHashMap<String, CompiledPattern>>,
}

impl PatternCache {
    /// Create a new pattern cache
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Get a compiled pattern, compiling and caching on miss
    pub fn get_or_compile(&self, pattern: &str) -> CompiledPattern {
        if let Ok(cache) = self.cache.read() {
            if let Some(compiled) = cache.get(pattern) {
                return compiled.clone();
            }
        }

        let compiled = compile_pattern(pattern);

        if let Ok(mut cache) = self.cache.write() {
            if cache.len() >= MAX_CACHE_SIZE {
                cache.clear();
            }
            cache.insert(pattern.to_string(), compiled.clone());
        }

        compiled
    }

    /// Number of cached patterns
    pub fn size(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Global pattern cache instance
static GLOBAL_CACHE: OnceLock<PatternCache> = OnceLock::new();

/// Get the global pattern cache
pub fn global_pattern_cache() -> &'static PatternCache {
    GLOBAL_CACHE.get_or_init(PatternCache::new)
}

/// Compile a LIKE pattern to an optimized CompiledPattern
fn compile_pattern(pattern: &str) -> CompiledPattern {
    if pattern == "%" {
        return CompiledPattern::MatchAll;
    }

    let has_percent = pattern.contains('%');
    let has_underscore = pattern.contains('_');

    if !has_percent && !has_underscore {
        return CompiledPattern::Exact(pattern.to_string());
    }

    if !has_underscore {
        let parts: Vec<&str> = pattern.split('%').collect();

        match parts.as_slice() {
            ["", suffix] if !suffix.is_empty() => {
                return CompiledPattern::Suffix(suffix.to_string());
            }
            [prefix, ""] if !prefix.is_empty() => {
                return CompiledPattern::Prefix(prefix.to_string());
            }
            ["", contains, ""] if !contains.is_empty() => {
                return CompiledPattern::Contains(contains.to_string());
            }
            [prefix, suffix] if !prefix.is_empty() && !suffix.is_empty() => {
                return CompiledPattern::PrefixSuffix(prefix.to_string(), suffix.to_string());
            }
            _ => {}
        }
    }

    let regex_pattern = like_to_regex(pattern);
    match Regex::new(&regex_pattern) {
        Ok(re) => CompiledPattern::Regex(re),
        Err(_) => CompiledPattern::Exact(pattern.to_string()),
    }
}

/// Convert a LIKE pattern to an anchored case-insensitive regex
fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() * 2 + 6);

    regex.push_str("(?i)^");

    for c in pattern.chars() {
        match c {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            '.' | '^' | '$' | '*' | '+' | '?' | '{' | '}' | '[' | ']' | '(' | ')' | '|' | '\\' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
    }

    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let pattern = compile_pattern("hello");
        assert!(pattern.matches("hello"));
        assert!(pattern.matches("Hello"));
        assert!(!pattern.matches("hello world"));
    }

    #[test]
    fn test_prefix_match() {
        let pattern = compile_pattern("hello%");
        assert!(pattern.matches("hello"));
        assert!(pattern.matches("HELLO world"));
        assert!(!pattern.matches("say hello"));
    }

    #[test]
    fn test_suffix_match() {
        let pattern = compile_pattern("%world");
        assert!(pattern.matches("world"));
        assert!(pattern.matches("hello World"));
        assert!(!pattern.matches("world hello"));
    }

    #[test]
    fn test_contains_match() {
        let pattern = compile_pattern("%ell%");
        assert!(pattern.matches("hello"));
        assert!(pattern.matches("YELL"));
        assert!(!pattern.matches("hallo"));
    }

    #[test]
    fn test_prefix_suffix_match() {
        let pattern = compile_pattern("hello%world");
        assert!(pattern.matches("helloworld"));
        assert!(pattern.matches("hello big world"));
        assert!(!pattern.matches("hello"));
    }

    #[test]
    fn test_match_all() {
        let pattern = compile_pattern("%");
        assert!(pattern.matches(""));
        assert!(pattern.matches("anything"));
    }

    #[test]
    fn test_underscore_single_char() {
        let pattern = compile_pattern("h_llo");
        assert!(pattern.matches("hello"));
        assert!(pattern.matches("hallo"));
        assert!(!pattern.matches("hllo"));
        assert!(!pattern.matches("heello"));
    }

    #[test]
    fn test_anchored() {
        // LIKE is a full match, not a substring search
        let pattern = compile_pattern("ell");
        assert!(!pattern.matches("hello"));
        assert!(pattern.matches("ell"));
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        let pattern = compile_pattern("a.b%");
        assert!(pattern.matches("a.b c"));
        assert!(!pattern.matches("axb c"));
    }

    #[test]
    fn test_global_cache() {
        let cache = global_pattern_cache();

        let p1 = cache.get_or_compile("test%");
        assert!(p1.matches("testing"));

        let p2 = cache.get_or_compile("test%");
        assert!(p2.matches("TESTED"));

        assert!(cache.size() >= 1);
    }
}
