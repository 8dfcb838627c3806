use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single lemma occurrence inside a document.
///
/// Corpus membership is not stored here: it follows from the collection
/// the document belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LemmaToken {
    lemma: Box<str>,
    document: Box<str>,
}

impl LemmaToken {
    pub fn new(lemma: &str, document: &str) -> Self {
        LemmaToken {
            lemma: lemma.into(),
            document: document.into(),
        }
    }

    #[inline]
    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    #[inline]
    pub fn document(&self) -> &str {
        &self.document
    }
}

/// TokenFrequency
/// Bag of lemma counts for one document (or a sum of documents).
///
/// Keeps:
/// - the occurrence count of each lemma, in first-seen order
/// - the total number of tokens counted
///
/// # Examples
/// ```
/// use grc_tfidf::TokenFrequency;
/// let mut freq = TokenFrequency::new();
/// freq.add_tokens(&["θεός", "ζεύς", "θεός"]);
/// assert_eq!(freq.token_count("θεός"), 2);
/// assert_eq!(freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u64>,
    total_token_count: u64,
}

/// Adding tokens
impl TokenFrequency {
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// Count one occurrence of `token`
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        // 既存キーなら String を作らない
        if let Some(count) = self.token_count.get_mut(token) {
            *count += 1;
        } else {
            self.token_count.insert(token.to_string(), 1);
        }
        self.total_token_count += 1;
        self
    }

    /// Count every token of the slice
    ///
    /// # Arguments
    /// * `tokens` - tokens to count, in document order
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }

    /// Add `n` occurrences of `token`
    /// `n == 0` is a no-op so that no zero-count entry is created
    #[inline]
    pub fn add_token_n(&mut self, token: &str, n: u64) -> &mut Self {
        if n == 0 {
            return self;
        }
        *self.token_count.entry(token.to_string()).or_insert(0) += n;
        self.total_token_count += n;
        self
    }

    /// Sum the counts of another frequency into this one
    pub fn add_tokens_from_freq(&mut self, other: &TokenFrequency) -> &mut Self {
        for (token, &count) in other.token_count.iter() {
            self.add_token_n(token, count);
        }
        self
    }

    /// Count the lemmas of a token stream
    pub fn from_tokens(tokens: &[LemmaToken]) -> Self {
        let mut freq = TokenFrequency::new();
        for token in tokens {
            freq.add_token(token.lemma());
        }
        freq
    }
}

impl<T> FromIterator<T> for TokenFrequency
where
    T: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut freq = TokenFrequency::new();
        for token in iter {
            freq.add_token(token.as_ref());
        }
        freq
    }
}

/// Reading statistics
impl TokenFrequency {
    /// Occurrence count of a token, 0 when absent
    #[inline]
    pub fn token_count(&self, token: &str) -> u64 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// Total number of tokens counted
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// Number of distinct tokens
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_token_count == 0
    }

    #[inline]
    pub fn contains_token(&self, token: &str) -> bool {
        self.token_count.contains_key(token)
    }

    /// Iterate `(token, count)` in first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.token_count.iter().map(|(token, &count)| (token.as_str(), count))
    }

    /// Distinct tokens, borrowed
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(|s| s.as_str()).collect()
    }

    #[inline]
    pub fn token_hashset_ref_str(&self) -> HashSet<&str> {
        self.token_count.keys().map(|s| s.as_str()).collect()
    }

    /// Highest count of any token, 0 when empty
    #[inline]
    pub fn most_frequent_token_count(&self) -> u64 {
        self.token_count.values().copied().max().unwrap_or(0)
    }

    /// Tokens sorted by count (desc), ties by token (asc)
    ///
    /// # Returns
    /// * `Vec<(&str, u64)>` - tokens and their counts
    pub fn sorted_frequency_vector(&self) -> Vec<(&str, u64)> {
        let mut list: Vec<(&str, u64)> = self.iter().collect();
        list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        list
    }

    /// Tokens sorted in dictionary order (asc)
    pub fn sorted_dict_order_vector(&self) -> Vec<(&str, u64)> {
        let mut list: Vec<(&str, u64)> = self.iter().collect();
        list.sort_by(|a, b| a.0.cmp(b.0));
        list
    }

    /// Distinct / total ratio
    /// 1.0 means every token is unique, 0.0 for an empty bag
    #[inline]
    pub fn unique_token_ratio(&self) -> f64 {
        if self.total_token_count == 0 {
            return 0.0;
        }
        self.token_count.len() as f64 / self.total_token_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_total_track_each_other() {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&["ζεύς", "θεός", "ζεύς", "ἀθάνατος"]);

        assert_eq!(freq.token_count("ζεύς"), 2);
        assert_eq!(freq.token_count("θεός"), 1);
        assert_eq!(freq.token_count("ἥρα"), 0);
        assert_eq!(freq.token_sum(), 4);
        assert_eq!(freq.token_num(), 3);
        assert_eq!(freq.most_frequent_token_count(), 2);
        assert_eq!(freq.iter().map(|(_, c)| c).sum::<u64>(), freq.token_sum());
    }

    #[test]
    fn first_seen_order_is_kept() {
        let freq: TokenFrequency = ["γῆ", "οὐρανός", "γῆ", "ἀήρ"].iter().collect();
        assert_eq!(freq.token_set_ref_str(), vec!["γῆ", "οὐρανός", "ἀήρ"]);
    }

    #[test]
    fn add_token_n_zero_creates_no_entry() {
        let mut freq = TokenFrequency::new();
        freq.add_token_n("νύξ", 0);
        assert!(!freq.contains_token("νύξ"));
        assert!(freq.is_empty());
    }

    #[test]
    fn merge_sums_counts() {
        let mut a: TokenFrequency = ["ζεύς", "θεός"].iter().collect();
        let b: TokenFrequency = ["ζεύς", "κρόνος"].iter().collect();
        a.add_tokens_from_freq(&b);

        assert_eq!(a.token_count("ζεύς"), 2);
        assert_eq!(a.token_count("κρόνος"), 1);
        assert_eq!(a.token_sum(), 4);
    }

    #[test]
    fn sorted_frequency_breaks_ties_by_token() {
        let freq: TokenFrequency = ["β", "α", "γ", "γ"].iter().collect();
        assert_eq!(freq.sorted_frequency_vector(), vec![("γ", 2), ("α", 1), ("β", 1)]);
        assert_eq!(freq.sorted_dict_order_vector(), vec![("α", 1), ("β", 1), ("γ", 2)]);
    }

    #[test]
    fn from_lemma_tokens() {
        let tokens = vec![
            LemmaToken::new("μοῖρα", "orphic/1.txt"),
            LemmaToken::new("μοῖρα", "orphic/1.txt"),
        ];
        let freq = TokenFrequency::from_tokens(&tokens);
        assert_eq!(freq.token_count("μοῖρα"), 2);
        assert_eq!(tokens[0].document(), "orphic/1.txt");
    }

    #[test]
    fn unique_ratio() {
        assert_eq!(TokenFrequency::new().unique_token_ratio(), 0.0);
        let freq: TokenFrequency = ["α", "α", "β", "γ"].iter().collect();
        assert_eq!(freq.unique_token_ratio(), 0.75);
    }

    #[test]
    fn serde_keeps_order() {
        let freq: TokenFrequency = ["ὕμνος", "ἄναξ", "ὕμνος"].iter().collect();
        let s = serde_json::to_string(&freq).unwrap();
        let de: TokenFrequency = serde_json::from_str(&s).unwrap();
        assert_eq!(de, freq);
        assert_eq!(de.token_set_ref_str(), vec!["ὕμνος", "ἄναξ"]);
    }
}
