//! Include-directive expansion.
//!
//! Target configuration scripts may pull in other compiled configurations at
//! runtime through the cache, in one of two textual forms:
//!
//! ```text
//! require_once($configCache->checkConfig(Settings::get('app_config_dir').'/settings.yml'));
//! ConfigCache::instance()->import(Settings::get('app_config_dir').'/logging.yml', false);
//! ```
//!
//! At compile time these directives are expanded in place: the referenced
//! configuration is resolved through the [`CacheResolver`], and the entire
//! directive is replaced by a provenance comment plus the literal contents
//! of the resolved artifact. The expansion is textual macro substitution,
//! not a runtime call.
//!
//! The recognized directives form a fixed table dispatched in order,
//! deliberately not an open-ended rewrite hook, so the rule set stays
//! reviewable.

use std::fs;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cache::CacheResolver;
use crate::error::Result;
use crate::settings::CompileSettings;

/// `require`/`include` (optionally `_once`) wrapping a `checkConfig` call on
/// the global cache accessor or a `$configCache` local. The literal sub-path
/// follows the app-config directory lookup and lands in the `path` group.
static CHECK_CONFIG_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:require|include)(?:_once)?\(\s*(?:ConfigCache::instance\(\)|\$configCache)->checkConfig\([^_]+app_config_dir[^.]*\.'/(?P<path>[^']+)'\)\);",
    )
    .unwrap()
});

/// An `import` call with the same accessor shapes and an optional trailing
/// boolean argument.
static IMPORT_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:ConfigCache::instance\(\)|\$configCache)->import\(.+?app_config_dir.*?\.'/(?P<path>[^']+)'(?:,\s*(?:true|false))?\);",
    )
    .unwrap()
});

/// One recognized directive form.
struct Directive {
    name: &'static str,
    pattern: &'static Lazy<Regex>,
}

/// The directive table, applied in order over the whole fragment.
static DIRECTIVES: [Directive; 2] = [
    Directive {
        name: "check-config",
        pattern: &CHECK_CONFIG_DIRECTIVE,
    },
    Directive {
        name: "import",
        pattern: &IMPORT_DIRECTIVE,
    },
];

/// Expand every recognized include directive in `content`.
///
/// For each match, the sub-path is resolved against the app-config directory
/// name to form the logical name, the resolver is asked to (re)build that
/// configuration, and the directive text is replaced by
/// `// '<logical>' config file` followed by the artifact contents.
///
/// Fails if the resolver rejects a name or the resolved artifact cannot be
/// read. The replacement handler performs I/O, which is why this is a
/// scan-and-rebuild loop instead of a plain regex replacement.
pub(crate) fn expand_includes(
    content: &str,
    settings: &CompileSettings,
    cache: &dyn CacheResolver,
) -> Result<String> {
    let mut current = content.to_string();

    for directive in &DIRECTIVES {
        if !directive.pattern.is_match(&current) {
            continue;
        }

        let mut out = String::with_capacity(current.len());
        let mut last = 0;
        for caps in directive.pattern.captures_iter(&current) {
            let matched = caps.get(0).unwrap();
            let logical_name = format!("{}/{}", settings.config_dir_name, &caps["path"]);
            tracing::debug!(
                directive = directive.name,
                config = %logical_name,
                "Inlining nested configuration"
            );

            cache.check_config(&logical_name)?;
            let artifact = fs::read_to_string(cache.cache_path(&logical_name))?;

            out.push_str(&current[last..matched.start()]);
            out.push_str("// '");
            out.push_str(&logical_name);
            out.push_str("' config file\n");
            out.push_str(&artifact);
            last = matched.end();
        }
        out.push_str(&current[last..]);
        current = out;
    }

    Ok(current)
}
