//! Output formatting for a classification result.

use std::path::Path;

use serde::Serialize;

use crate::interpret::Classification;

#[derive(Debug, Clone, Serialize)]
pub struct ImageReport<'a> {
    pub path: &'a Path,
    #[serde(flatten)]
    pub classification: Classification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {s}. Use 'text' or 'json'.")),
        }
    }
}

pub fn render(report: &ImageReport<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "{}: {} ({:.2}% confidence)",
            report.path.display(),
            report.classification.label,
            report.classification.confidence
        ),
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
    }
}

pub fn print_report(report: &ImageReport<'_>, format: OutputFormat) {
    println!("{}", render(report, format));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::Label;

    fn sample(path: &Path) -> ImageReport<'_> {
        ImageReport {
            path,
            classification: Classification {
                label: Label::Malignant,
                confidence: 82.5,
            },
        }
    }

    #[test]
    fn parses_output_format() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn text_names_label_and_confidence() {
        let text = render(&sample(Path::new("mole.png")), OutputFormat::Text);
        assert_eq!(text, "mole.png: Malignant (82.50% confidence)");
    }

    #[test]
    fn json_matches_predict_response_plus_path() {
        let json = render(&sample(Path::new("mole.png")), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"path": "mole.png", "prediction": "Malignant", "confidence": 82.5})
        );
    }
}
