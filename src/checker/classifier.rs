use super::delimiters::DelimiterSet;
use super::dictionary::Dictionary;
use super::tokenizer::{ends_with_sentence_mark, is_filtered, strip_punctuation, tokenize};
use crate::config::CheckSettings;
use std::sync::Arc;

/// Decides, token by token, which words of a chunk are unknown.
///
/// A classifier borrows the run's shared state and owns nothing mutable; the
/// only side effect of [`Classifier::classify`] is calling `emit`.
pub struct Classifier<'a> {
    dictionaries: &'a [Arc<Dictionary>],
    delimiters: &'a DelimiterSet,
    settings: CheckSettings,
}

impl<'a> Classifier<'a> {
    /// `dictionaries` are consulted in order; put the system dictionary first.
    pub fn new(
        dictionaries: &'a [Arc<Dictionary>],
        delimiters: &'a DelimiterSet,
        settings: CheckSettings,
    ) -> Self {
        Self {
            dictionaries,
            delimiters,
            settings,
        }
    }

    /// Check one chunk, handing every unresolved item to `emit`.
    ///
    /// With compound-word mode on, consecutive unknown words are joined
    /// (each followed by a space) and emitted as one item when a known word
    /// or the end of a sentence is reached.
    pub fn classify(&self, chunk: &str, mut emit: impl FnMut(String)) {
        let text = self.delimiters.replace_with_spaces(chunk);
        let mut pending = String::new();

        for token in tokenize(&text) {
            let closes_sentence = ends_with_sentence_mark(token);
            let word = strip_punctuation(token);
            let found = self.is_known(&word);

            if !self.settings.find_compound_words {
                if !found {
                    emit(word);
                }
                continue;
            }

            if !found {
                pending.push_str(&word);
                pending.push(' ');
                if closes_sentence {
                    flush(&mut pending, &mut emit);
                }
            } else {
                flush(&mut pending, &mut emit);
            }
        }

        flush(&mut pending, &mut emit);
    }

    /// Convenience wrapper collecting the emitted items.
    pub fn classify_to_vec(&self, chunk: &str) -> Vec<String> {
        let mut items = Vec::new();
        self.classify(chunk, |item| items.push(item));
        items
    }

    /// Whether a trimmed word counts as resolved.
    pub fn is_known(&self, word: &str) -> bool {
        if word.trim().is_empty() {
            return true;
        }
        if is_filtered(word, self.settings.ignore_uppercase) {
            return true;
        }
        if word.contains('-') {
            // Each part is strictly shorter than the whole, so this terminates
            return self.in_word_lists(word)
                || word.split('-').all(|part| self.is_known(part.trim()));
        }
        self.in_word_lists(word)
    }

    fn in_word_lists(&self, word: &str) -> bool {
        self.dictionaries.iter().any(|dict| dict.contains(word))
    }
}

fn flush(pending: &mut String, emit: &mut impl FnMut(String)) {
    if !pending.is_empty() {
        emit(std::mem::take(pending));
    }
}
