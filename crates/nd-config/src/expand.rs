//! `${VAR}` / `${VAR:-default}` expansion for string config values.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Values without `${` are returned as-is. Numeric names (`$1`) are capture
/// references in rewrite replacements and are never looked up.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| -> Result<Option<String>, UnsetVar> {
        if name.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(None);
        }
        std::env::var(name).map(Some).map_err(|_| UnsetVar(name.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand every entry of a list field, reporting the failing index.
pub(crate) fn expand_env_all(values: &mut [String], field: &str) -> Result<(), ConfigError> {
    for (i, value) in values.iter_mut().enumerate() {
        *value = expand_env(value, &format!("{field}[{i}]"))?;
    }
    Ok(())
}

struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_uses_env_value() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("ND_EXPAND_TOKEN", "4294967295");
        }
        let result = expand_env("${ND_EXPAND_TOKEN}", "seed.nodes[0].token").unwrap();
        assert_eq!(result, "4294967295");
        unsafe {
            std::env::remove_var("ND_EXPAND_TOKEN");
        }
    }

    #[test]
    fn test_expand_falls_back_to_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("ND_EXPAND_UNSET_DC");
        }
        let result = expand_env("${ND_EXPAND_UNSET_DC:-local-dc}", "seed.nodes[0].dc").unwrap();
        assert_eq!(result, "local-dc");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("ND_EXPAND_MISSING");
        }
        let err = expand_env("${ND_EXPAND_MISSING}", "dev.host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("ND_EXPAND_MISSING"));
        assert!(err.to_string().contains("dev.host"));
    }

    #[test]
    fn test_capture_references_left_alone() {
        let rule = "^/REST/(.*)$ http://localhost:8080/REST/$1 [P]";
        assert_eq!(expand_env(rule, "dev.rewrites[0]").unwrap(), rule);
    }

    #[test]
    fn test_expand_all_reports_index() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("ND_EXPAND_LIST_MISSING");
        }
        let mut values = vec!["plain".to_owned(), "${ND_EXPAND_LIST_MISSING}".to_owned()];
        let err = expand_env_all(&mut values, "dev.rewrites").unwrap_err();
        assert!(err.to_string().contains("dev.rewrites[1]"));
    }
}
