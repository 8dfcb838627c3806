use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// column numbers, lacuna sizes, bracketed supplements, metrical signs and cruces
    static ref EDITORIAL_RGX: Regex = Regex::new(r"col\d+|±\d+|\[.*?\]|[⏑–†]").unwrap();
    static ref SPACES_RGX: Regex = Regex::new(r"[ \t]+").unwrap();
}

/// Punctuation stripped from token edges on top of ASCII punctuation.
/// `·` also stands for the ano teleia after NFC.
/// U+02BC, U+1FBD (koronis) and U+1FBF (psili) mark elision in some editions.
const EXTRA_PUNCTUATION: &[char] = &[
    '·', '«', '»', '⟦', '⟧', '…', '’', '‘', '“', '”', '—', '\u{02BC}', '\u{1FBD}', '\u{1FBF}',
];

/// Grave-accented vowels and their acute counterparts.
/// Targets are the tonos forms, which is what NFC yields for oxia.
const GRAVE_TO_ACUTE: &[(char, char)] = &[
    ('ὰ', 'ά'),
    ('ὲ', 'έ'),
    ('ὴ', 'ή'),
    ('ὶ', 'ί'),
    ('ὺ', 'ύ'),
    ('ὸ', 'ό'),
    ('ὼ', 'ώ'),
    ('ἂ', 'ἄ'),
    ('ἃ', 'ἅ'),
    ('ἒ', 'ἔ'),
    ('ἓ', 'ἕ'),
    ('ἢ', 'ἤ'),
    ('ἣ', 'ἥ'),
    ('ἲ', 'ἴ'),
    ('ἳ', 'ἵ'),
    ('ὂ', 'ὄ'),
    ('ὃ', 'ὅ'),
    ('ὒ', 'ὔ'),
    ('ὓ', 'ὕ'),
    ('ὢ', 'ὤ'),
    ('ὣ', 'ὥ'),
    ('ᾲ', 'ᾴ'),
    ('ῂ', 'ῄ'),
    ('ῲ', 'ῴ'),
    ('\u{1FD2}', '\u{0390}'),
    ('\u{1FE2}', '\u{03B0}'),
];

/// Text cleanup for Ancient Greek.
///
/// Stateless; one instance can be shared by every document of a run.
#[derive(Debug, Clone, Default)]
pub struct GreekNormalizer {
    /// keep letter case instead of folding to lowercase
    pub keep_case: bool,
}

impl GreekNormalizer {
    pub fn new() -> Self {
        GreekNormalizer { keep_case: false }
    }

    /// NFC composition, editorial marker removal and whitespace cleanup.
    /// Line structure is kept.
    pub fn clean(&self, text: &str) -> String {
        let composed: String = text.nfc().collect();
        let stripped = EDITORIAL_RGX.replace_all(&composed, "");
        let quoted = stripped.replace(['«', '»'], "'");
        quoted
            .lines()
            .map(|line| SPACES_RGX.replace_all(line.trim(), " ").into_owned())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Normalize one whitespace-delimited word.
    /// Returns `None` when nothing but punctuation is left.
    pub fn normalize_token(&self, token: &str) -> Option<String> {
        let trimmed = token.trim_matches(is_punctuation);
        if trimmed.is_empty() {
            return None;
        }
        if self.keep_case {
            Some(fold_grave(trimmed))
        } else {
            Some(fold_grave(&trimmed.to_lowercase()))
        }
    }

    /// Clean the text and split it into normalized word forms
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.clean(text)
            .split_whitespace()
            .filter_map(|t| self.normalize_token(t))
            .collect()
    }
}

#[inline]
fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || EXTRA_PUNCTUATION.contains(&c)
}

/// Replace grave accents with acute ones
pub fn fold_grave(word: &str) -> String {
    word.chars()
        .map(|c| {
            GRAVE_TO_ACUTE
                .iter()
                .find(|(grave, _)| *grave == c)
                .map_or(c, |(_, acute)| *acute)
        })
        .collect()
}
