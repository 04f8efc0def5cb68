//! Locale resolution: picks the active locale from the candidate sources.
//!
//! Precedence is fixed: explicit request parameter, persisted choice,
//! detected environment language, caller default. The environment language
//! is the only candidate that goes through tag matching, because it is the
//! only one that comes from outside the application's own vocabulary.

use crate::i18n::LocaleRegistry;
use reqwest::Url;
use tracing::debug;

/// Query parameter carrying a request-time locale override.
pub const LANG_QUERY_PARAM: &str = "lang";

const TRADITIONAL_CHINESE: &str = "zh-TW";
const SIMPLIFIED_CHINESE: &str = "zh-CN";
const TRADITIONAL_MARKERS: [&str; 3] = ["tw", "hk", "hant"];

/// Candidate locale sources, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleCandidates {
    /// Explicit request parameter (`?lang=`)
    pub request: Option<String>,
    /// Previously persisted choice
    pub persisted: Option<String>,
    /// Language tag reported by the host environment
    pub environment: Option<String>,
    /// Caller-supplied default
    pub default: Option<String>,
}

/// Resolve the locale code to activate.
///
/// Returns the first candidate that is a registered code (the environment
/// candidate after tag matching), or `fallback_code` verbatim. The result is
/// not guaranteed to be registered when `fallback_code` is not.
pub fn resolve(
    candidates: &LocaleCandidates,
    registry: &LocaleRegistry,
    fallback_code: &str,
) -> String {
    let exact = |candidate: &Option<String>| {
        candidate
            .as_deref()
            .filter(|code| registry.has(code))
            .map(str::to_string)
    };

    let resolved = exact(&candidates.request)
        .or_else(|| exact(&candidates.persisted))
        .or_else(|| {
            candidates
                .environment
                .as_deref()
                .and_then(|tag| match_language_tag(tag, registry))
        })
        .or_else(|| exact(&candidates.default));

    match resolved {
        Some(code) => {
            debug!("Resolved locale {} from {:?}", code, candidates);
            code
        }
        None => {
            debug!("No candidate matched, falling back to {}", fallback_code);
            fallback_code.to_string()
        }
    }
}

/// Match an environment language tag against the registry.
///
/// Tries an exact match, then the Chinese script special case, then the
/// first registered code sharing the primary subtag.
pub fn match_language_tag(tag: &str, registry: &LocaleRegistry) -> Option<String> {
    let tag = tag.trim().replace('_', "-");
    if tag.is_empty() {
        return None;
    }

    if registry.has(&tag) {
        return Some(tag);
    }

    let primary = primary_subtag(&tag);

    // Primary subtag alone cannot tell Traditional from Simplified script
    if primary.eq_ignore_ascii_case("zh") {
        let lowered = tag.to_ascii_lowercase();
        let code = if TRADITIONAL_MARKERS.iter().any(|m| lowered.contains(m)) {
            TRADITIONAL_CHINESE
        } else {
            SIMPLIFIED_CHINESE
        };
        if registry.has(code) {
            return Some(code.to_string());
        }
    }

    registry
        .all()
        .iter()
        .find(|locale| primary_subtag(&locale.code).eq_ignore_ascii_case(primary))
        .map(|locale| locale.code.clone())
}

fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Extract the `lang` query parameter from a page URL.
///
/// Accepts a full URL, a relative one (`/cashier?lang=fa`) or a bare query
/// string (`?lang=fa` / `lang=fa`).
pub fn query_locale(page_url: &str) -> Option<String> {
    let url = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => {
            let base = Url::parse("http://localhost/").ok()?;
            if page_url.contains('?') {
                base.join(page_url).ok()?
            } else {
                base.join(&format!("?{}", page_url)).ok()?
            }
        }
    };

    url.query_pairs()
        .find(|(key, _)| key == LANG_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Language tag reported by the operating system, if any.
pub fn detect_environment_language() -> Option<String> {
    sys_locale::get_locale().map(|tag| tag.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Direction, LocaleDescriptor};
    use proptest::prelude::*;

    fn candidates(
        request: Option<&str>,
        persisted: Option<&str>,
        environment: Option<&str>,
        default: Option<&str>,
    ) -> LocaleCandidates {
        LocaleCandidates {
            request: request.map(String::from),
            persisted: persisted.map(String::from),
            environment: environment.map(String::from),
            default: default.map(String::from),
        }
    }

    // ==================== resolve Tests ====================

    #[test]
    fn test_request_beats_everything() {
        let registry = LocaleRegistry::builtin();
        let c = candidates(Some("fa"), Some("ru"), Some("vi"), Some("en"));

        assert_eq!(resolve(&c, &registry, "zh-CN"), "fa");
    }

    #[test]
    fn test_persisted_beats_environment() {
        let registry = LocaleRegistry::builtin();
        let c = candidates(None, Some("ru"), Some("vi"), Some("en"));

        assert_eq!(resolve(&c, &registry, "zh-CN"), "ru");
    }

    #[test]
    fn test_unregistered_request_falls_through() {
        let registry = LocaleRegistry::builtin();
        let c = candidates(Some("klingon"), Some("ru"), None, None);

        assert_eq!(resolve(&c, &registry, "zh-CN"), "ru");
    }

    #[test]
    fn test_environment_traditional_chinese() {
        let registry = LocaleRegistry::builtin();
        let c = candidates(None, None, Some("zh-TW"), Some("zh-CN"));

        assert_eq!(resolve(&c, &registry, "zh-CN"), "zh-TW");
    }

    #[test]
    fn test_environment_simplified_chinese() {
        let registry = LocaleRegistry::builtin();
        let c = candidates(None, None, Some("zh-Hans"), Some("en"));

        assert_eq!(resolve(&c, &registry, "en"), "zh-CN");
    }

    #[test]
    fn test_environment_beats_default() {
        let registry = LocaleRegistry::builtin();
        let c = candidates(None, None, Some("ru-RU"), Some("en"));

        assert_eq!(resolve(&c, &registry, "zh-CN"), "ru");
    }

    #[test]
    fn test_fallback_returned_verbatim() {
        let registry = LocaleRegistry::builtin();
        let c = candidates(Some("xx"), None, Some("de-DE"), Some("yy"));

        assert_eq!(resolve(&c, &registry, "not-a-locale"), "not-a-locale");
    }

    #[test]
    fn test_all_empty_returns_fallback() {
        let registry = LocaleRegistry::builtin();

        assert_eq!(resolve(&LocaleCandidates::default(), &registry, "en"), "en");
    }

    // ==================== match_language_tag Tests ====================

    #[test]
    fn test_match_exact() {
        let registry = LocaleRegistry::builtin();
        assert_eq!(match_language_tag("vi", &registry), Some("vi".to_string()));
    }

    #[test]
    fn test_match_chinese_variants() {
        let registry = LocaleRegistry::builtin();

        assert_eq!(match_language_tag("zh-HK", &registry).as_deref(), Some("zh-TW"));
        assert_eq!(match_language_tag("zh-Hant", &registry).as_deref(), Some("zh-TW"));
        assert_eq!(match_language_tag("zh_HK", &registry).as_deref(), Some("zh-TW"));
        assert_eq!(match_language_tag("zh-SG", &registry).as_deref(), Some("zh-CN"));
        assert_eq!(match_language_tag("zh", &registry).as_deref(), Some("zh-CN"));
    }

    #[test]
    fn test_match_chinese_variants_ignore_case() {
        let registry = LocaleRegistry::builtin();

        assert_eq!(match_language_tag("zh-hk", &registry).as_deref(), Some("zh-TW"));
        assert_eq!(match_language_tag("zh-hant", &registry).as_deref(), Some("zh-TW"));
        assert_eq!(match_language_tag("ZH_tw", &registry).as_deref(), Some("zh-TW"));
        assert_eq!(match_language_tag("zh-hans", &registry).as_deref(), Some("zh-CN"));
    }

    #[test]
    fn test_match_primary_subtag() {
        let registry = LocaleRegistry::builtin();

        assert_eq!(match_language_tag("en-GB", &registry).as_deref(), Some("en"));
        assert_eq!(match_language_tag("FA-IR", &registry).as_deref(), Some("fa"));
    }

    #[test]
    fn test_match_primary_subtag_uses_registry_order() {
        let registry = LocaleRegistry::new(
            vec![
                LocaleDescriptor::new("pt-BR", "Português (Brasil)", Direction::Ltr),
                LocaleDescriptor::new("pt-PT", "Português", Direction::Ltr),
            ],
            "pt-PT",
        )
        .unwrap();

        assert_eq!(match_language_tag("pt-AO", &registry).as_deref(), Some("pt-BR"));
    }

    #[test]
    fn test_match_requires_full_primary_subtag() {
        // "m" is a prefix of "my" but not its primary subtag
        let registry = LocaleRegistry::builtin();
        assert_eq!(match_language_tag("m", &registry), None);
    }

    #[test]
    fn test_match_chinese_without_registered_chinese() {
        let registry = LocaleRegistry::new(
            vec![LocaleDescriptor::new("en", "English", Direction::Ltr)],
            "en",
        )
        .unwrap();

        assert_eq!(match_language_tag("zh-TW", &registry), None);
    }

    #[test]
    fn test_match_unknown_and_empty() {
        let registry = LocaleRegistry::builtin();

        assert_eq!(match_language_tag("de-DE", &registry), None);
        assert_eq!(match_language_tag("", &registry), None);
    }

    // ==================== query_locale Tests ====================

    #[test]
    fn test_query_locale_from_url() {
        assert_eq!(
            query_locale("https://pay.example.com/cashier?order=42&lang=fa").as_deref(),
            Some("fa")
        );
    }

    #[test]
    fn test_query_locale_from_bare_query() {
        assert_eq!(query_locale("?lang=zh-TW").as_deref(), Some("zh-TW"));
        assert_eq!(query_locale("lang=ru").as_deref(), Some("ru"));
    }

    #[test]
    fn test_query_locale_from_relative_url() {
        assert_eq!(query_locale("/cashier?lang=fa").as_deref(), Some("fa"));
        assert_eq!(
            query_locale("cashier/pay?order=7&lang=vi").as_deref(),
            Some("vi")
        );
        assert_eq!(query_locale("/cashier"), None);
    }

    #[test]
    fn test_query_locale_missing_or_empty() {
        assert_eq!(query_locale("https://pay.example.com/cashier?order=42"), None);
        assert_eq!(query_locale("https://pay.example.com/?lang="), None);
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_registered_default_resolves_to_itself(index in 0usize..7, fallback in "[a-z]{0,5}") {
            let registry = LocaleRegistry::builtin();
            let code = registry.all()[index].code.clone();
            let c = LocaleCandidates { default: Some(code.clone()), ..Default::default() };

            prop_assert_eq!(resolve(&c, &registry, &fallback), code);
        }

        #[test]
        fn prop_resolve_is_registered_or_fallback(
            request in proptest::option::of("[a-zA-Z-]{0,8}"),
            environment in proptest::option::of("[a-zA-Z_-]{0,8}"),
        ) {
            let registry = LocaleRegistry::builtin();
            let c = LocaleCandidates { request, environment, ..Default::default() };
            let resolved = resolve(&c, &registry, "__fallback__");

            prop_assert!(registry.has(&resolved) || resolved == "__fallback__");
        }
    }
}
