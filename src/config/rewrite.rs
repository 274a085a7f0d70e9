//! Hostname rewrite table
//!
//! Maps hostnames requested by clients to the hostnames that are actually
//! resolved. Built once from `--rewrite` and shared read-only afterwards.

use std::collections::HashMap;
use std::fmt;

/// Immutable hostname substitution table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteTable {
    rules: HashMap<String, String>,
}

impl RewriteTable {
    /// Parse a `host1:dest1,host2:dest2` rule list
    ///
    /// Each pair is split on its first `:`, so the replacement may itself
    /// contain colons. Pairs without a `:` are skipped. A later rule for the
    /// same source hostname replaces an earlier one.
    pub fn parse(rules: &str) -> Self {
        let rules = rules
            .split(',')
            .filter_map(|pair| pair.split_once(':'))
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();

        RewriteTable { rules }
    }

    /// Look up the replacement for `host` (exact match)
    pub fn lookup(&self, host: &str) -> Option<&str> {
        self.rules.get(host).map(String::as_str)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RewriteTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RewriteTable {
            rules: iter
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }
}

impl fmt::Display for RewriteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<_> = self.rules.iter().collect();
        rules.sort();

        write!(f, "[")?;
        for (i, (from, to)) in rules.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", from, to)?;
        }
        write!(f, "]")
    }
}
