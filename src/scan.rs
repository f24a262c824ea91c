// Timezone label localizer, (c) 2022-2024 Georg Brandl.
// Licensed under the GNU AGPL, version 3 or later.

//! Walking the resource directory and patching each locale.

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::config::Settings;
use crate::patch::{self, Insertion};
use crate::roundtrip;
use crate::translate::Translate;

/// A `values*` resource directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleDir {
    pub path: PathBuf,
    pub name: String,
    pub lang: String,
    pub region: Option<String>,
}

impl LocaleDir {
    /// Derive language and region from a name like `values-pt-rBR`.
    pub fn new(path: PathBuf, name: &str, default_lang: &str) -> Self {
        let mut parts = name.split('-').skip(1);
        let lang = parts.next().filter(|s| !s.is_empty()).unwrap_or(default_lang);
        let region = parts.next()
            .and_then(|s| s.strip_prefix('r'))
            .filter(|s| s.len() == 2)
            .map(|s| s.to_ascii_uppercase());
        Self { path, name: name.into(), lang: lang.into(), region }
    }

    /// The language tag to use with the translation service.
    pub fn service_tag(&self) -> String {
        match (&*self.lang, &self.region) {
            ("zh", Some(region)) => format!("zh-{}", region),
            _ => self.lang.clone(),
        }
    }
}

/// List the locale directories below `root`, sorted by name.
pub fn scan(root: &Path, marker: &str, default_lang: &str) -> Result<Vec<LocaleDir>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("listing {}", root.display()))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.contains(marker) {
            continue;
        }
        // follows symlinks
        if !entry.path().is_dir() {
            log::debug!("ignoring non-directory {}", name);
            continue;
        }
        dirs.push(LocaleDir::new(entry.path(), &name, default_lang));
    }
    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(dirs)
}

/// Counters for a whole run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub dirs: usize,
    pub patched: usize,
    pub skipped: usize,
    pub missing: usize,
    pub untranslated: Vec<String>,
}

pub struct Runner<'a> {
    settings: &'a Settings,
    translator: &'a dyn Translate,
    force: bool,
}

impl<'a> Runner<'a> {
    pub fn new(settings: &'a Settings, translator: &'a dyn Translate, force: bool) -> Self {
        Self { settings, translator, force }
    }

    /// Process all locale directories below `root`.
    pub fn run(&self, root: &Path) -> Result<Summary> {
        let mut summary = Summary::default();
        for dir in scan(root, &self.settings.dir_marker, &self.settings.default_lang)? {
            summary.dirs += 1;
            self.process(&dir, &mut summary)
                .with_context(|| format!("processing {}", dir.name))?;
        }
        Ok(summary)
    }

    fn process(&self, dir: &LocaleDir, summary: &mut Summary) -> Result<()> {
        let settings = self.settings;
        let file = dir.path.join(&settings.file_name);
        if !file.is_file() {
            log::debug!("{}: no {}", dir.name, settings.file_name);
            summary.missing += 1;
            return Ok(());
        }

        // files from an earlier run have the zone, or a label for it
        let values = Insertion::item(&settings.values_marker, &settings.zone);
        let fallback = patch::item_line(&settings.city);
        if !self.force && patch::has_line(&file, &[values.line.as_str(), fallback.as_str()])? {
            log::info!("{}: already has {}, skipping", dir.name, settings.city);
            summary.skipped += 1;
            return Ok(());
        }

        let tag = dir.service_tag();
        let word = match roundtrip::lookup_city(self.translator, settings, &tag) {
            Some(word) => word,
            None => {
                summary.untranslated.push(tag);
                settings.city.clone()
            }
        };
        log::info!("{}: inserting {:?}", dir.name, word);

        let labels = Insertion::item(&settings.labels_marker, &word);
        if !self.force && patch::has_line(&file, &[labels.line.as_str()])? {
            log::info!("{}: already has {}, skipping", dir.name, word);
            summary.skipped += 1;
            return Ok(());
        }
        let inserted = patch::patch(&file, &[labels, values])?;
        if inserted == 0 {
            log::warn!("{}: no array long enough, nothing inserted", dir.name);
        } else {
            log::debug!("{}: {} items inserted", dir.name, inserted);
        }
        summary.patched += 1;

        let (first, second) = (patch::marker_name(&settings.labels_marker),
                               patch::marker_name(&settings.values_marker));
        match patch::array_sizes(&file, first, second) {
            Ok(Some((n, m))) if n != m =>
                log::warn!("{}: {} has {} items, {} has {}", dir.name, first, n, second, m),
            Ok(_) => (),
            Err(e) => log::warn!("{}: could not check arrays: {:#}", dir.name, e),
        }
        Ok(())
    }
}
