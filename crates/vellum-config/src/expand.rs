//! `${VAR}` and `${VAR:-default}` expansion in configuration strings.

use crate::ConfigError;

/// Unset variable reported by the lookup closure.
struct UnsetVar(String);

/// Expand environment variable references in `value`.
///
/// `${VAR}` fails when `VAR` is unset; `${VAR:-default}` falls back to
/// `default`. Bare `$VAR` and an unterminated `${` are left as written.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let end = start + len + 1;
        out.push_str(&rest[..start]);
        out.push_str(&expand_reference(&rest[start..end], field)?);
        rest = &rest[end..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Expand a single `${...}` reference.
fn expand_reference(reference: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(reference, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var_inside_url() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("VELLUM_TEST_KROKI_HOST", "kroki.internal");
        }
        let result = expand_env("https://${VELLUM_TEST_KROKI_HOST}:8000", "diagrams.kroki_url");
        assert_eq!(result.unwrap(), "https://kroki.internal:8000");
        unsafe {
            std::env::remove_var("VELLUM_TEST_KROKI_HOST");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("VELLUM_TEST_UNSET_URL");
        }
        let result = expand_env("${VELLUM_TEST_UNSET_URL:-https://kroki.io}", "diagrams.kroki_url");
        assert_eq!(result.unwrap(), "https://kroki.io");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("VELLUM_TEST_MISSING");
        }
        let err = expand_env("${VELLUM_TEST_MISSING}", "diagrams.kroki_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("VELLUM_TEST_MISSING"));
        assert!(message.contains("diagrams.kroki_url"));
    }

    #[test]
    fn test_bare_dollar_left_alone() {
        assert_eq!(expand_env("price$5", "field").unwrap(), "price$5");
        assert_eq!(expand_env("$HOME", "field").unwrap(), "$HOME");
        assert_eq!(expand_env("a${b", "field").unwrap(), "a${b");
    }

    #[test]
    fn test_bare_dollar_left_alone_next_to_braced_var() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("VELLUM_TEST_MIXED_HOST", "h");
            std::env::set_var("VELLUM_TEST_MIXED_OTHER", "X");
        }
        let result = expand_env(
            "https://${VELLUM_TEST_MIXED_HOST}/$VELLUM_TEST_MIXED_OTHER",
            "diagrams.kroki_url",
        );
        assert_eq!(result.unwrap(), "https://h/$VELLUM_TEST_MIXED_OTHER");
        unsafe {
            std::env::remove_var("VELLUM_TEST_MIXED_HOST");
            std::env::remove_var("VELLUM_TEST_MIXED_OTHER");
        }
    }
}
