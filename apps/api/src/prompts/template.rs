use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::prompts::error::MissingTemplateVariable;
use crate::prompts::models::PromptArtifact;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("Valid placeholder regex"));

/// Placeholder identifiers in order of first appearance, without duplicates.
///
/// `"Hello {name}, you are {age}. Bye {name}"` -> `["name", "age"]`
pub fn template_variables(template: &str) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let name = &caps[1];
        if !vars.iter().any(|v| v == name) {
            vars.push(name.to_string());
        }
    }
    vars
}

/// Substitutes every `{identifier}` in the artifact's user template.
///
/// Replacement is a single literal pass: substituted values are never scanned
/// for further placeholders. Unused variables are ignored. The system prompt
/// is not touched.
pub fn render(
    artifact: &PromptArtifact,
    variables: &HashMap<String, String>,
) -> Result<String, MissingTemplateVariable> {
    render_template(&artifact.user_prompt_template, variables)
}

pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, MissingTemplateVariable> {
    let required = template_variables(template);
    let missing = required
        .iter()
        .find(|v| !variables.contains_key(v.as_str()))
        .cloned();
    if let Some(missing) = missing {
        return Err(MissingTemplateVariable { missing, required });
    }

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        // Every identifier was checked above.
        variables.get(&caps[1]).cloned().unwrap_or_default()
    });
    Ok(rendered.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::fixtures::artifact;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes() {
        let prompt = artifact("test_task", "1.0.0");
        let rendered = render(&prompt, &vars(&[("input_text", "Hello world")])).unwrap();
        assert_eq!(rendered, "Process this: Hello world");
    }

    #[test]
    fn test_missing_variables_report_full_set() {
        let template = "Note: {input_text}\nAge: {patient_age}\nAgain: {input_text}";
        let err = render_template(template, &HashMap::new()).unwrap_err();

        assert_eq!(err.missing, "input_text");
        assert_eq!(err.required, vec!["input_text", "patient_age"]);
    }

    #[test]
    fn test_first_missing_in_template_order() {
        let template = "{a} {b} {c}";
        let err = render_template(template, &vars(&[("a", "1")])).unwrap_err();
        assert_eq!(err.missing, "b");
        assert_eq!(err.required, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extra_variables_ignored() {
        let rendered = render_template(
            "Summarize: {note_text}",
            &vars(&[("note_text", "abc"), ("unused", "x")]),
        )
        .unwrap();
        assert_eq!(rendered, "Summarize: abc");
    }

    #[test]
    fn test_no_recursive_expansion() {
        let rendered = render_template(
            "{a} and {b}",
            &vars(&[("a", "{b}"), ("b", "B")]),
        )
        .unwrap();
        assert_eq!(rendered, "{b} and B");
    }

    #[test]
    fn test_non_placeholder_braces_untouched() {
        let template = r#"Return JSON like {"summary": "..."} for {input}"#;
        let rendered = render_template(template, &vars(&[("input", "x")])).unwrap();
        assert_eq!(rendered, r#"Return JSON like {"summary": "..."} for x"#);
    }

    #[test]
    fn test_render_is_idempotent() {
        let prompt = artifact("test_task", "1.0.0");
        let v = vars(&[("input_text", "same input")]);
        assert_eq!(render(&prompt, &v).unwrap(), render(&prompt, &v).unwrap());
    }

    #[test]
    fn test_template_without_placeholders() {
        assert!(template_variables("plain text").is_empty());
        assert_eq!(
            render_template("plain text", &HashMap::new()).unwrap(),
            "plain text"
        );
    }
}
