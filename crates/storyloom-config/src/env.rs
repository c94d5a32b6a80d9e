use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// An optional fallback can be supplied as
/// `{{ env.VAR | default("fallback") }}`; it is used when the variable
/// is unset. Lines starting with `#` (TOML comments) pass through
/// unchanged. Expansion happens on the raw text before deserialization,
/// so config structs stay plain `String`/`SecretString`.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            output.push_str(&expand_line(line)?);
        }
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Group 1: the scoped key (e.g. `env.VAR_NAME`)
    // Group 2: optional fallback inside default("...")
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut result = String::with_capacity(line.len());
    let mut last_end = 0;

    for captures in placeholder().captures_iter(line) {
        let overall = captures.get(0).expect("match always has group 0");
        result.push_str(&line[last_end..overall.start()]);

        let key = captures.get(1).map_or("", |m| m.as_str());
        let var_name = key
            .strip_prefix("env.")
            .filter(|rest| !rest.contains('.'))
            .ok_or_else(|| format!("only variables scoped with 'env.' are supported: `{key}`"))?;

        match std::env::var(var_name) {
            Ok(value) => result.push_str(&value),
            Err(_) => match captures.get(2) {
                Some(fallback) => result.push_str(fallback.as_str()),
                None => return Err(format!("environment variable not found: `{var_name}`")),
            },
        }

        last_end = overall.end();
    }

    result.push_str(&line[last_end..]);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_plain_toml_through() {
        let input = "theme = \"dinosaur\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_set_variable() {
        temp_env::with_var("STORYLOOM_KEY", Some("abc123"), || {
            let result = expand_env("api_key = \"{{ env.STORYLOOM_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"abc123\"");
        });
    }

    #[test]
    fn expands_several_on_one_line() {
        let vars = [("A_VAR", Some("a")), ("B_VAR", Some("b"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("pair = \"{{ env.A_VAR }}:{{ env.B_VAR }}\"").unwrap();
            assert_eq!(result, "pair = \"a:b\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("STORYLOOM_ABSENT", || {
            let err = expand_env("key = \"{{ env.STORYLOOM_ABSENT }}\"").unwrap_err();
            assert!(err.contains("STORYLOOM_ABSENT"));
        });
    }

    #[test]
    fn fallback_covers_missing_variable() {
        temp_env::with_var_unset("STORYLOOM_ABSENT", || {
            let result =
                expand_env("lang = \"{{ env.STORYLOOM_ABSENT | default(\"zh\") }}\"").unwrap();
            assert_eq!(result, "lang = \"zh\"");
        });
    }

    #[test]
    fn fallback_ignored_when_variable_set() {
        temp_env::with_var("STORYLOOM_LANG", Some("en"), || {
            let result =
                expand_env("lang = \"{{ env.STORYLOOM_LANG | default(\"zh\") }}\"").unwrap();
            assert_eq!(result, "lang = \"en\"");
        });
    }

    #[test]
    fn rejects_other_scopes() {
        let err = expand_env("key = \"{{ secrets.KEY }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("STORYLOOM_ABSENT", || {
            let input = "  # key = \"{{ env.STORYLOOM_ABSENT }}\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
