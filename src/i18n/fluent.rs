// SPDX-License-Identifier: MPL-2.0
use crate::app::config::Config;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use unic_langid::{langid, LanguageIdentifier};

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Locale used when nothing else matches, and for keys a locale lacks.
const FALLBACK_LOCALE: LanguageIdentifier = langid!("en-US");

pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    pub available_locales: Vec<LanguageIdentifier>,
    current_locale: LanguageIdentifier,
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("available_locales", &self.available_locales)
            .field("current_locale", &self.current_locale)
            .finish_non_exhaustive()
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(None, &Config::default())
    }
}

impl I18n {
    pub fn new(cli_lang: Option<String>, config: &Config) -> Self {
        let mut bundles = HashMap::new();
        let mut available_locales = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale) = filename
                .strip_suffix(".ftl")
                .and_then(|s| s.parse::<LanguageIdentifier>().ok())
            else {
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            let source = String::from_utf8_lossy(content.data.as_ref()).to_string();
            let resource = match FluentResource::try_new(source) {
                Ok(resource) => resource,
                Err((resource, errors)) => {
                    eprintln!("Errors while parsing {}: {:?}", filename, errors);
                    resource
                }
            };
            let mut bundle = FluentBundle::new(vec![locale.clone()]);
            // Unicode isolation marks render as boxes with some fonts.
            bundle.set_use_isolating(false);
            if let Err(errors) = bundle.add_resource(resource) {
                eprintln!("Errors while loading {}: {:?}", filename, errors);
            }
            bundles.insert(locale.clone(), bundle);
            available_locales.push(locale);
        }
        available_locales.sort_by_key(ToString::to_string);

        let current_locale = resolve_locale(
            cli_lang,
            config.general.language.as_deref(),
            sys_locale::get_locale(),
            &available_locales,
        )
        .unwrap_or(FALLBACK_LOCALE);

        Self {
            bundles,
            available_locales,
            current_locale,
        }
    }

    #[must_use]
    pub fn current_locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    pub fn set_locale(&mut self, locale: LanguageIdentifier) {
        if self.bundles.contains_key(&locale) {
            self.current_locale = locale;
        }
    }

    pub fn tr(&self, key: &str) -> String {
        self.format(key, None)
    }

    pub fn tr_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, *value);
        }
        self.format(key, Some(&fluent_args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs<'_>>) -> String {
        for locale in [&self.current_locale, &FALLBACK_LOCALE] {
            let Some(bundle) = self.bundles.get(locale) else {
                continue;
            };
            let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
                continue;
            };
            let mut errors = vec![];
            let value = bundle.format_pattern(pattern, args, &mut errors);
            if errors.is_empty() {
                return value.to_string();
            }
        }
        format!("MISSING: {}", key)
    }
}

/// Picks the first available locale among CLI, config and OS preferences.
fn resolve_locale(
    cli_lang: Option<String>,
    config_lang: Option<&str>,
    os_lang: Option<String>,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    let candidates = [cli_lang.as_deref(), config_lang, os_lang.as_deref()];
    candidates.into_iter().flatten().find_map(|tag| {
        let lang = tag.parse::<LanguageIdentifier>().ok()?;
        if available.contains(&lang) {
            return Some(lang);
        }
        // "bn-BD" falls back to a plain "bn" bundle
        available
            .iter()
            .find(|candidate| candidate.language == lang.language)
            .cloned()
    })
}
