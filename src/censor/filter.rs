//! Denylist predicate.
//!
//! A text is rejected when, after lowercasing, it contains any denylisted
//! term as a contiguous substring. Terms are not tokenized, so a term also
//! matches inside a longer word.

/// Terms rejected when no denylist is configured.
pub const DEFAULT_DENYLIST: [&str; 3] = ["qwerty", "йцукен", "zxvbnm"];

/// Outcome of a censorship check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// The first denylisted term found in the text.
    Rejected { term: String },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Fixed set of forbidden substrings, stored lowercased.
#[derive(Debug, Clone)]
pub struct Denylist {
    terms: Vec<String>,
}

impl Denylist {
    /// Build a denylist. Blank terms are dropped since they would match every text.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn check(&self, text: &str) -> Verdict {
        let haystack = text.to_lowercase();
        match self.terms.iter().find(|term| haystack.contains(term.as_str())) {
            Some(term) => Verdict::Rejected { term: term.clone() },
            None => Verdict::Accepted,
        }
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}
