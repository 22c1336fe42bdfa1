use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*|\p{N}+").expect("valid regex");
}

static STOPWORDS: &[&str] = &[
    "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","can't","cannot","could","couldn't",
    "did","didn't","do","does","doesn't","doing","don't","down","during",
    "each","few","for","from","further",
    "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
    "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
    "let's","me","more","most","mustn't","my","myself",
    "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
    "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
    "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
    "under","until","up","very",
    "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
    "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves",
];

/// Normalization steps applied to document bodies and query text.
/// Recorded in index metadata so queries are normalized the same way
/// the index was built.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalyzerOptions {
    pub case_folding: bool,
    pub remove_stopwords: bool,
    pub remove_numbers: bool,
    pub stem: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            case_folding: true,
            remove_stopwords: true,
            remove_numbers: true,
            stem: true,
        }
    }
}

/// Text normalizer owning its stemmer and stop-word set. Construct one
/// per indexing or query session and pass it where needed.
pub struct Analyzer {
    options: AnalyzerOptions,
    stemmer: Stemmer,
    stopwords: HashSet<&'static str>,
}

impl Analyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            options,
            stemmer: Stemmer::create(Algorithm::English),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    pub fn options(&self) -> AnalyzerOptions {
        self.options
    }

    // Stop words match case-insensitively whether or not case folding
    // is enabled.
    fn is_stopword(&self, token: &str) -> bool {
        if self.options.case_folding {
            self.stopwords.contains(token)
        } else {
            self.stopwords.contains(token.to_lowercase().as_str())
        }
    }

    /// Tokenize text into normalized terms: NFKC, then the enabled
    /// filters in order (case folding, stop words, numbers, stemming).
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>();
        let mut terms = Vec::new();
        for mat in WORD.find_iter(&normalized) {
            let token = if self.options.case_folding {
                mat.as_str().to_lowercase()
            } else {
                mat.as_str().to_string()
            };
            if self.options.remove_stopwords && self.is_stopword(&token) {
                continue;
            }
            if self.options.remove_numbers && token.chars().all(|c| c.is_numeric()) {
                continue;
            }
            if self.options.stem {
                terms.push(self.stemmer.stem(&token).to_string());
            } else {
                terms.push(token);
            }
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_analyze() {
        let analyzer = Analyzer::new(AnalyzerOptions::default());
        let terms = analyzer.analyze("Running, runner's run!");
        assert!(terms.iter().any(|t| t == "run"));
    }

    #[test]
    fn numbers_kept_when_filter_disabled() {
        let options = AnalyzerOptions {
            remove_numbers: false,
            stem: false,
            ..AnalyzerOptions::default()
        };
        let analyzer = Analyzer::new(options);
        let terms = analyzer.analyze("traded at 1986 prices");
        assert!(terms.contains(&"1986".to_string()));
    }
}
