/// Root-cause categorization for error-log text.
///
/// Fixed ordered rule list, first match wins. Order is the disambiguation
/// policy: a message containing both "timeout" and "jwt" is a
/// Dependency/DB Timeout because that rule is checked first.
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    DependencyTimeout,
    AuthToken,
    ThrottlingQuota,
    ResourceExhaustion,
    Unknown,
}

impl Category {
    /// Display label, also used as the lexical sort key in cluster ordering.
    pub fn label(&self) -> &'static str {
        match self {
            Category::DependencyTimeout => "Dependency/DB Timeout",
            Category::AuthToken => "Auth/Token",
            Category::ThrottlingQuota => "Throttling/Quota",
            Category::ResourceExhaustion => "Resource Exhaustion",
            Category::Unknown => "Unknown",
        }
    }
}

struct CategoryRule {
    matcher: AhoCorasick,
    category: Category,
    confidence: f64,
}

fn keyword_matcher(keywords: &[&str]) -> AhoCorasick {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(keywords)
        .expect("static keyword patterns")
}

// Evaluated in order; keep DependencyTimeout first (see module docs).
static RULES: Lazy<Vec<CategoryRule>> = Lazy::new(|| {
    vec![
        CategoryRule {
            matcher: keyword_matcher(&["timeout", "sql", "connection pool"]),
            category: Category::DependencyTimeout,
            confidence: 0.78,
        },
        CategoryRule {
            matcher: keyword_matcher(&["unauthorized", "jwt", "token"]),
            category: Category::AuthToken,
            confidence: 0.66,
        },
        CategoryRule {
            matcher: keyword_matcher(&["throttle", "rate limit", "429", "quota"]),
            category: Category::ThrottlingQuota,
            confidence: 0.70,
        },
        CategoryRule {
            matcher: keyword_matcher(&["outofmemory", "oom", "killed"]),
            category: Category::ResourceExhaustion,
            confidence: 0.75,
        },
    ]
});

/// Map a text blob to a `(category, confidence)` pair.
///
/// Pure and total: never fails, returns `(Unknown, 0.50)` when no rule
/// matches.
pub fn categorize(text: &str) -> (Category, f64) {
    for rule in RULES.iter() {
        if rule.matcher.is_match(text) {
            return (rule.category, rule.confidence);
        }
    }
    (Category::Unknown, 0.50)
}
