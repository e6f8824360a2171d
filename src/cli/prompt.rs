use crate::SpellChecker;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::Confirm;

/// Ask, item by item, whether to add reported words to the default custom
/// dictionary. Returns how many reported items were accepted.
pub fn offer_additions(checker: &SpellChecker, items: &[String], colored: bool) -> Result<usize> {
    accept_items(checker, items, |word| {
        let shown = if colored {
            word.yellow().bold().to_string()
        } else {
            word.to_string()
        };
        Confirm::new()
            .with_prompt(format!("Add {} to your dictionary?", shown))
            .default(false)
            .interact()
            .context("Failed to read answer")
    })
}

/// A compound item counts once, however many words it adds.
fn accept_items(
    checker: &SpellChecker,
    items: &[String],
    mut ask: impl FnMut(&str) -> Result<bool>,
) -> Result<usize> {
    let mut accepted = 0;

    for item in items {
        let word = item.trim();
        if word.is_empty() {
            continue;
        }

        if ask(word)? {
            checker
                .add_to_default_custom_dictionary(&words_of(word))
                .context("Failed to update the default dictionary")?;
            accepted += 1;
        }
    }

    Ok(accepted)
}

/// A compound item holds several words; each becomes its own dictionary line.
fn words_of(item: &str) -> String {
    item.split_whitespace().collect::<Vec<_>>().join("\n")
}
