//! Names derived from a delegate type name
//!
//! Type names may carry a module path (`Admin::UserDelegate`). The view path
//! keeps the module path as directories, the helpers facade only uses the
//! last segment.

use once_cell::sync::Lazy;
use regex::Regex;

const DELEGATE_SUFFIX: &str = "Delegate";
const HELPER_SUFFIX: &str = "Helper";
const MODULE_SEPARATOR: &str = "::";

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").unwrap());
static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

/// Lower-case, underscore separated form of a camel-cased name
///
/// `::` becomes `/`, acronyms stay together (`HTMLPage` -> `html_page`).
pub fn underscore(name: &str) -> String {
    let path = name.replace(MODULE_SEPARATOR, "/");
    let path = ACRONYM_BOUNDARY.replace_all(&path, "${1}_${2}");
    let path = WORD_BOUNDARY.replace_all(&path, "${1}_${2}");
    path.replace('-', "_").to_lowercase()
}

/// Upper camel-case form of an underscored name (`user_helper` -> `UserHelper`)
pub fn camelize(name: &str) -> String {
    name.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|word| !word.is_empty())
                .map(capitalize)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(MODULE_SEPARATOR)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn strip_delegate_suffix(name: &str) -> &str {
    name.strip_suffix(DELEGATE_SUFFIX).unwrap_or(name)
}

/// Directory holding the templates of a delegate type
pub fn view_path(type_name: &str) -> String {
    underscore(strip_delegate_suffix(type_name))
}

/// Locals key of the helpers facade
pub fn helpers_name(type_name: &str) -> String {
    let last = type_name
        .rsplit(MODULE_SEPARATOR)
        .next()
        .unwrap_or(type_name);
    underscore(&format!("{}{}", strip_delegate_suffix(last), HELPER_SUFFIX))
}

/// Display name of the helpers facade
pub fn helpers_struct_name(type_name: &str) -> String {
    camelize(&helpers_name(type_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("UserDelegate", "user_delegate")]
    #[case("HTMLPage", "html_page")]
    #[case("Admin::UserProfile", "admin/user_profile")]
    #[case("Version2Thing", "version2_thing")]
    #[case("already_snake", "already_snake")]
    fn test_underscore(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(underscore(input), expected);
    }

    #[rstest]
    #[case("user_helper", "UserHelper")]
    #[case("admin/user_helper", "Admin::UserHelper")]
    fn test_camelize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(camelize(input), expected);
    }

    #[rstest]
    #[case("UserDelegate", "user")]
    #[case("Admin::UserProfileDelegate", "admin/user_profile")]
    #[case("Dashboard", "dashboard")]
    fn test_view_path(#[case] type_name: &str, #[case] expected: &str) {
        assert_eq!(view_path(type_name), expected);
    }

    #[rstest]
    #[case("UserDelegate", "user_helper", "UserHelper")]
    #[case("Admin::UserDelegate", "user_helper", "UserHelper")]
    #[case("Report", "report_helper", "ReportHelper")]
    fn test_helpers_name(
        #[case] type_name: &str,
        #[case] expected: &str,
        #[case] struct_name: &str,
    ) {
        assert_eq!(helpers_name(type_name), expected);
        assert_eq!(helpers_struct_name(type_name), struct_name);
    }
}
