//! # Localization Module
//!
//! User-facing messages in English and French, stored as Fluent resources
//! under `locales/` and compiled into the binary. The language is picked from
//! the Telegram user's language code, falling back to English.

use std::collections::HashMap;
use std::sync::LazyLock;

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use tracing::warn;
use unic_langid::LanguageIdentifier;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_LANGUAGE: &str = "en";

/// Bundled resources, by language
pub const RESOURCES: [(&str, &str); 2] = [
    ("en", include_str!("../locales/en/main.ftl")),
    ("fr", include_str!("../locales/fr/main.ftl")),
];

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(|| {
    LocalizationManager::new().unwrap_or_else(|e| {
        warn!(error = %e, "Falling back to an empty localization manager");
        LocalizationManager::empty()
    })
});

/// Localization manager for the bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Load every bundled language
    pub fn new() -> AppResult<Self> {
        let mut bundles = HashMap::new();
        for (language, source) in RESOURCES {
            bundles.insert(language.to_string(), Self::create_bundle(language, source)?);
        }
        Ok(Self { bundles })
    }

    fn empty() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    fn create_bundle(language: &str, source: &str) -> AppResult<FluentBundle<FluentResource>> {
        let locale: LanguageIdentifier = language
            .parse()
            .map_err(|e| AppError::Localization(format!("invalid locale '{language}': {e}")))?;

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            AppError::Localization(format!("{} syntax errors in '{language}' resource", errors.len()))
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Telegram renders the Unicode isolation marks literally
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            AppError::Localization(format!("{} duplicate messages in '{language}' resource", errors.len()))
        })?;

        Ok(bundle)
    }

    /// Supported language for a Telegram language code ("fr-CA" → "fr")
    pub fn resolve_language<'a>(&self, language_code: Option<&'a str>) -> &'a str {
        language_code
            .and_then(|code| code.split(['-', '_']).next())
            .filter(|primary| self.bundles.contains_key(&primary.to_lowercase()))
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Whether a language has a message for `key`
    pub fn has_message(&self, language: &str, key: &str) -> bool {
        self.bundles
            .get(language)
            .is_some_and(|bundle| bundle.has_message(key))
    }

    /// Localized message, falling back to English and then to the key itself
    pub fn get_message(&self, key: &str, language_code: Option<&str>, args: Option<&FluentArgs>) -> String {
        let language = self.resolve_language(language_code).to_lowercase();

        for candidate in [language.as_str(), DEFAULT_LANGUAGE] {
            let Some(bundle) = self.bundles.get(candidate) else {
                continue;
            };
            let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
                continue;
            };

            let mut errors = Vec::new();
            let value = bundle.format_pattern(pattern, args, &mut errors);
            if !errors.is_empty() {
                warn!(key, language = candidate, ?errors, "Errors while formatting message");
            }
            return value.into_owned();
        }

        warn!(key, "Missing translation");
        key.to_string()
    }
}

/// Global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Localized message for the user's language
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    get_localization_manager().get_message(key, language_code, None)
}

/// Localized message with string arguments
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let mut fluent_args = FluentArgs::new();
    for (name, value) in args {
        fluent_args.set(*name, FluentValue::from(*value));
    }
    get_localization_manager().get_message(key, language_code, Some(&fluent_args))
}
