//! Line-based prompts on stdin

use std::io::Write;

use authform_lib::FieldValue;
use authform_lib::view::{FieldKind, FieldLayout};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `question` and read one line. Fails once stdin is closed.
    pub async fn ask(&mut self, question: &str) -> Result<String, String> {
        print!("{} ", question);
        let _ = std::io::stdout().flush();

        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err("input closed".to_string()),
            Err(e) => Err(format!("failed to read input: {}", e)),
        }
    }

    /// Ask for a field's value.
    pub async fn field(&mut self, field: &FieldLayout) -> Result<FieldValue, String> {
        let question = match (&field.kind, &field.placeholder) {
            (FieldKind::Checkbox, _) => format!("{} [y/N]:", field.label),
            (FieldKind::Select(options), _) => {
                let labels: Vec<&str> = options.iter().map(|(_, label)| label.as_str()).collect();
                format!("{} ({}):", field.label, labels.join(", "))
            }
            (_, Some(placeholder)) => format!("{} ({}):", field.label, placeholder),
            (_, None) => format!("{}:", field.label),
        };

        let raw = self.ask(&question).await?;
        Ok(parse_field(field, &raw))
    }
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert typed input into a value for `field`.
///
/// Numbers that fail to parse stay text so the schema reports them.
pub fn parse_field(field: &FieldLayout, raw: &str) -> FieldValue {
    let trimmed = raw.trim();

    match &field.kind {
        FieldKind::Checkbox => {
            let checked = matches!(
                trimmed.to_ascii_lowercase().as_str(),
                "y" | "yes" | "true" | "x" | "1"
            );
            FieldValue::Bool(checked)
        }
        FieldKind::Number => trimmed
            .parse::<f64>()
            .map(FieldValue::Number)
            .unwrap_or_else(|_| FieldValue::text(trimmed)),
        FieldKind::Select(options) => {
            let by_index = trimmed
                .parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| options.get(i));
            let chosen = by_index.or_else(|| {
                options.iter().find(|(value, label)| {
                    value.eq_ignore_ascii_case(trimmed) || label.eq_ignore_ascii_case(trimmed)
                })
            });
            match chosen {
                Some((value, _)) => FieldValue::text(value.clone()),
                None => FieldValue::text(trimmed),
            }
        }
        FieldKind::Email => FieldValue::text(trimmed),
        FieldKind::Text | FieldKind::Password => FieldValue::text(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checkbox_and_number() {
        let terms = FieldLayout::checkbox("termsAccepted", "Terms");
        assert_eq!(parse_field(&terms, "Y"), FieldValue::Bool(true));
        assert_eq!(parse_field(&terms, ""), FieldValue::Bool(false));

        let age = FieldLayout::number("age", "Age");
        assert_eq!(parse_field(&age, " 42 "), FieldValue::Number(42.0));
        assert_eq!(parse_field(&age, "old"), FieldValue::text("old"));
    }

    #[test]
    fn test_parse_select() {
        let occupation = FieldLayout::select(
            "occupation",
            "Occupation",
            [("developer", "Developer"), ("designer", "Designer")],
        );
        assert_eq!(parse_field(&occupation, "2"), FieldValue::text("designer"));
        assert_eq!(parse_field(&occupation, "developer"), FieldValue::text("developer"));
        assert_eq!(parse_field(&occupation, "Designer"), FieldValue::text("designer"));
        assert_eq!(parse_field(&occupation, "pilot"), FieldValue::text("pilot"));
    }
}
