// Timezone label localizer, (c) 2022 Georg Brandl.
// Licensed under the GNU AGPL, version 3 or later.

//! Finding the localized city name by translating back and forth.

use anyhow::{Context, Result};
use itertools::Itertools;
use crate::config::Settings;
use crate::translate::Translate;

fn strip_punct(word: &str) -> &str {
    word.trim_matches(|c: char| c.is_ascii_punctuation())
}

/// Translate the configured phrase into `target`, then translate each word
/// of the result back.  The first word that comes back as the city name is
/// the city name in the target language.
pub fn find_city<T: Translate + ?Sized>(tr: &T, settings: &Settings, target: &str)
                                        -> Result<Option<String>> {
    if target == settings.source_lang {
        return Ok(Some(settings.city.clone()));
    }

    let sentence = tr.translate(&settings.phrase, &settings.source_lang, target)
                     .context("translating phrase")?;
    log::debug!("{}: phrase is {:?}", target, sentence);

    for word in sentence.split(' ').map(strip_punct).filter(|w| !w.is_empty()).unique() {
        let back = tr.translate(word, target, &settings.source_lang)
                     .with_context(|| format!("translating back {:?}", word))?;
        if strip_punct(&back) == settings.city {
            return Ok(Some(word.into()));
        }
    }
    Ok(None)
}

/// Like `find_city`, but never fails: on any error, or if no word matches,
/// a diagnostic is logged and `None` is returned.
pub fn lookup_city<T: Translate + ?Sized>(tr: &T, settings: &Settings, target: &str) -> Option<String> {
    match find_city(tr, settings, target) {
        Ok(Some(word)) => Some(word),
        Ok(None) => {
            log::warn!("language not translated: {}", target);
            None
        }
        Err(e) => {
            log::warn!("language not translated: {}: {:#}", target, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap};
    use anyhow::bail;
    use super::*;

    /// Returns its input unchanged.
    struct Echo;

    impl Translate for Echo {
        fn translate(&self, phrase: &str, _: &str, _: &str) -> Result<String> {
            Ok(phrase.into())
        }
    }

    /// Looks up translations in a table, and counts requests.
    #[derive(Default)]
    struct Table {
        entries: HashMap<(&'static str, &'static str), &'static str>,
        requests: RefCell<Vec<String>>,
    }

    impl Table {
        fn with(mut self, to: &'static str, phrase: &'static str, result: &'static str) -> Self {
            self.entries.insert((to, phrase), result);
            self
        }
    }

    impl Translate for Table {
        fn translate(&self, phrase: &str, _: &str, to: &str) -> Result<String> {
            self.requests.borrow_mut().push(phrase.into());
            Ok(self.entries.iter()
                   .find(|((t, p), _)| *t == to && *p == phrase)
                   .map(|(_, r)| r.to_string())
                   .unwrap_or_default())
        }
    }

    struct Offline;

    impl Translate for Offline {
        fn translate(&self, _: &str, _: &str, _: &str) -> Result<String> {
            bail!("network unreachable")
        }
    }

    #[test]
    fn test_echo() {
        let settings = Settings::default();
        assert_eq!(find_city(&Echo, &settings, "de").unwrap().as_deref(), Some("Recife"));
    }

    #[test]
    fn test_table() {
        let settings = Settings::default();
        let tr = Table::default()
            .with("ru", "Vou a Recife", "Я еду в Ресифи.")
            .with("pt", "Я", "Eu")
            .with("pt", "еду", "estou indo")
            .with("pt", "в", "em")
            .with("pt", "Ресифи", "Recife");
        assert_eq!(lookup_city(&tr, &settings, "ru").as_deref(), Some("Ресифи"));
        assert_eq!(tr.requests.borrow().len(), 5);
    }

    #[test]
    fn test_no_match() {
        let settings = Settings::default();
        let tr = Table::default()
            .with("fi", "Vou a Recife", "Menen Recifeen Recifeen")
            .with("pt", "Menen", "Eu vou");
        assert_eq!(find_city(&tr, &settings, "fi").unwrap(), None);
        // repeated words are only translated once
        assert_eq!(tr.requests.borrow().len(), 3);
        assert_eq!(lookup_city(&tr, &settings, "fi"), None);
    }

    #[test]
    fn test_failure() {
        let settings = Settings::default();
        assert!(find_city(&Offline, &settings, "ja").is_err());
        assert_eq!(lookup_city(&Offline, &settings, "ja"), None);
        // same language needs no service
        assert_eq!(lookup_city(&Offline, &settings, "pt").as_deref(), Some("Recife"));
    }
}
