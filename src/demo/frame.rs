// SPDX-License-Identifier: PMPL-1.0-or-later

//! One rendered state of the demo: timeline, source document, log panel
//! and JSON output, all derived from the active stage.

use super::rules::{DemoField, FieldState};
use super::DemoStep;
use crate::i18n::Translator;
use serde_json::Value;

pub const DOCUMENT_ID: &str = "extrato-exemplo-01";
pub const TRUST_SCORE: &str = "82.5%";
pub const ASSET1_COMPLIANCE: f64 = 98.7;
pub const ASSET2_COMPLIANCE: f64 = 15.2;
pub const ALLOCATION: &str = "15,7%";
const PLACEHOLDER: &str = "...";

/// How a span should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    /// Extracted value.
    Highlight,
    /// Identifier that passed validation.
    Verified,
    /// Identifier that failed validation.
    Struck,
    Key,
    Str,
    Number,
    True,
    False,
    Invalid,
    Placeholder,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineItem {
    pub step: DemoStep,
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoFrame {
    pub step: DemoStep,
    pub loading: bool,
    pub timeline: Vec<TimelineItem>,
    pub document_title: String,
    pub document: Vec<Vec<Span>>,
    pub log_title: String,
    pub logs: Vec<String>,
    pub json_title: String,
    pub json: Vec<Vec<Span>>,
}

enum Scalar {
    Str(String),
    Number(f64),
    Bool(bool),
}

fn quoted(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

/// Span for a dynamic JSON value: the real value once the field is shown,
/// the quoted placeholder before that.
fn json_value(field: DemoField, step: DemoStep, value: Scalar, placeholder: &str) -> Span {
    let state = field.state_at(step);
    if state == FieldState::Hidden {
        return Span::new(quoted(placeholder), Tone::Placeholder);
    }
    let (text, tone) = match value {
        Scalar::Str(text) => (quoted(&text), Tone::Str),
        Scalar::Number(number) => (number.to_string(), Tone::Number),
        Scalar::Bool(true) => ("true".to_string(), Tone::True),
        Scalar::Bool(false) => ("false".to_string(), Tone::False),
    };
    match state {
        FieldState::Invalid => Span::new(text, Tone::Invalid),
        _ => Span::new(text, tone),
    }
}

fn json_line(depth: usize, key: Option<&str>, value: Span, comma: bool) -> Vec<Span> {
    let mut spans = vec![Span::plain("  ".repeat(depth))];
    if let Some(key) = key {
        spans.push(Span::new(quoted(key), Tone::Key));
        spans.push(Span::new(": ", Tone::Punct));
    }
    spans.push(value);
    if comma {
        spans.push(Span::new(",", Tone::Punct));
    }
    spans
}

fn punct(text: &str) -> Span {
    Span::new(text, Tone::Punct)
}

impl DemoFrame {
    pub fn compose(step: DemoStep, translator: &Translator, loading: bool) -> Self {
        let timeline = DemoStep::ALL
            .iter()
            .map(|item| TimelineItem {
                step: *item,
                title: translator.t(item.title_key()),
                active: *item == step,
            })
            .collect();

        Self {
            step,
            loading,
            timeline,
            document_title: translator.t("veritasDemo.document.title"),
            document: Self::document_lines(step, translator),
            log_title: translator.t("veritasDemo.logs.title"),
            logs: translator.lines(step.log_key()),
            json_title: translator.t("veritasDemo.json.title"),
            json: Self::json_lines(step, translator),
        }
    }

    fn document_lines(step: DemoStep, t: &Translator) -> Vec<Vec<Span>> {
        let marked = |field: DemoField, key: &str, tone: Tone| {
            if field.state_at(step).is_shown() {
                Span::new(t.t(key), tone)
            } else {
                Span::plain(t.t(key))
            }
        };
        let label = |key: &str| Span::plain(format!("{} ", t.t(key)));

        let mut isin_line = vec![
            label("veritasDemo.document.isinLabel"),
            marked(
                DemoField::IsinHighlight,
                "veritasDemo.document.isinValue",
                Tone::Struck,
            ),
        ];
        if DemoField::IsinHighlight.state_at(step) == FieldState::Invalid {
            isin_line.push(Span::plain(" "));
            isin_line.push(Span::new(t.t("veritasDemo.document.invalid"), Tone::Invalid));
        }

        vec![
            vec![Span::plain(t.t("veritasDemo.document.greeting"))],
            Vec::new(),
            vec![
                label("veritasDemo.document.asset1Label"),
                marked(
                    DemoField::Asset1Highlight,
                    "veritasDemo.document.asset1Value",
                    Tone::Highlight,
                ),
            ],
            vec![
                label("veritasDemo.document.cnpjLabel"),
                marked(
                    DemoField::CnpjHighlight,
                    "veritasDemo.document.cnpjValue",
                    Tone::Verified,
                ),
            ],
            vec![label("veritasDemo.document.allocationLabel"), Span::plain(ALLOCATION)],
            Vec::new(),
            vec![
                label("veritasDemo.document.asset2Label"),
                marked(
                    DemoField::Asset2Highlight,
                    "veritasDemo.document.asset2Value",
                    Tone::Highlight,
                ),
            ],
            isin_line,
        ]
    }

    fn json_lines(step: DemoStep, t: &Translator) -> Vec<Vec<Span>> {
        let string = |key: &str| Span::new(quoted(&t.t(key)), Tone::Str);
        let asset = |name_key: &str,
                     id_type: &str,
                     id_key: &str,
                     valid: (DemoField, bool),
                     score: (DemoField, f64),
                     rationale: (DemoField, &str),
                     last: bool| {
            vec![
                json_line(2, None, punct("{"), false),
                json_line(3, Some("name"), string(name_key), true),
                json_line(3, Some("identifier"), punct("{"), false),
                json_line(4, Some("type"), Span::new(quoted(id_type), Tone::Str), true),
                json_line(4, Some("value"), string(id_key), true),
                json_line(
                    4,
                    Some("isValid"),
                    json_value(valid.0, step, Scalar::Bool(valid.1), PLACEHOLDER),
                    false,
                ),
                json_line(3, None, punct("}"), true),
                json_line(
                    3,
                    Some("complianceScore"),
                    json_value(score.0, step, Scalar::Number(score.1), PLACEHOLDER),
                    true,
                ),
                json_line(
                    3,
                    Some("rationale"),
                    json_value(rationale.0, step, Scalar::Str(t.t(rationale.1)), PLACEHOLDER),
                    false,
                ),
                json_line(2, None, punct("}"), !last),
            ]
        };

        let mut lines = vec![
            json_line(0, None, punct("{"), false),
            json_line(
                1,
                Some("documentId"),
                Span::new(quoted(DOCUMENT_ID), Tone::Str),
                true,
            ),
            json_line(
                1,
                Some("trustScore"),
                json_value(
                    DemoField::TrustScore,
                    step,
                    Scalar::Str(TRUST_SCORE.to_string()),
                    &t.t("veritasDemo.json.calculating"),
                ),
                true,
            ),
            json_line(1, Some("assets"), punct("["), false),
        ];
        lines.extend(asset(
            "veritasDemo.document.asset1Value",
            "CNPJ",
            "veritasDemo.document.cnpjValue",
            (DemoField::Asset1Valid, true),
            (DemoField::Asset1Compliance, ASSET1_COMPLIANCE),
            (DemoField::Asset1Rationale, "veritasDemo.json.rationale1"),
            false,
        ));
        lines.extend(asset(
            "veritasDemo.document.asset2Value",
            "ISIN",
            "veritasDemo.document.isinValue",
            (DemoField::Asset2Valid, false),
            (DemoField::Asset2Compliance, ASSET2_COMPLIANCE),
            (DemoField::Asset2Rationale, "veritasDemo.json.rationale2"),
            true,
        ));
        lines.push(json_line(1, None, punct("]"), false));
        lines.push(json_line(0, None, punct("}"), false));
        lines
    }

    /// The JSON panel as plain text.
    pub fn json_text(&self) -> String {
        self.json
            .iter()
            .map(|line| line.iter().map(|span| span.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every span in the document panel, flattened.
    pub fn document_spans(&self) -> impl Iterator<Item = &Span> {
        self.document.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{BundleSet, LocaleBundle};
    use crate::types::Language;

    fn translator() -> Translator {
        let en = LocaleBundle::from_json_str(
            Language::En,
            r#"{"veritasDemo": {
                "document": {"isinValue": "BR0000000000", "invalid": "(Invalid)",
                             "asset1Value": "Fund \"Alpha\""},
                "json": {"calculating": "Calculating..."},
                "logs": {"analysis": ["scoring assets", "done"]}
            }}"#,
        )
        .unwrap();
        Translator::with_bundles(BundleSet::from_bundles([en]), Language::En)
    }

    #[test]
    fn json_panel_is_valid_json_at_every_step() {
        let t = translator();
        for step in DemoStep::ALL {
            let frame = DemoFrame::compose(step, &t, false);
            let parsed: Value = serde_json::from_str(&frame.json_text()).unwrap();
            assert_eq!(parsed["documentId"], DOCUMENT_ID);
            assert_eq!(parsed["assets"].as_array().map(Vec::len), Some(2));
        }
    }

    #[test]
    fn placeholders_before_analysis() {
        let t = translator();
        let frame = DemoFrame::compose(DemoStep::Extraction, &t, false);
        let parsed: Value = serde_json::from_str(&frame.json_text()).unwrap();
        assert_eq!(parsed["trustScore"], "Calculating...");
        assert_eq!(parsed["assets"][0]["complianceScore"], "...");
        assert_eq!(parsed["assets"][0]["identifier"]["isValid"], "...");
        assert_eq!(parsed["assets"][0]["name"], "Fund \"Alpha\"");
    }

    #[test]
    fn analysis_reveals_scores() {
        let t = translator();
        let frame = DemoFrame::compose(DemoStep::Analysis, &t, true);
        let parsed: Value = serde_json::from_str(&frame.json_text()).unwrap();
        assert_eq!(parsed["trustScore"], TRUST_SCORE);
        assert_eq!(parsed["assets"][0]["complianceScore"], 98.7);
        assert_eq!(parsed["assets"][1]["complianceScore"], 15.2);
        assert_eq!(parsed["assets"][1]["identifier"]["isValid"], false);
        assert_eq!(frame.logs, vec!["scoring assets", "done"]);
        assert!(frame.loading);
    }

    #[test]
    fn isin_struck_from_validation() {
        let t = translator();
        let before = DemoFrame::compose(DemoStep::Extraction, &t, false);
        assert!(before.document_spans().all(|span| span.tone != Tone::Struck));

        let after = DemoFrame::compose(DemoStep::Validation, &t, false);
        assert!(after
            .document_spans()
            .any(|span| span.tone == Tone::Struck && span.text == "BR0000000000"));
        assert!(after
            .document_spans()
            .any(|span| span.tone == Tone::Invalid && span.text == "(Invalid)"));
        assert!(after
            .json
            .iter()
            .flatten()
            .any(|span| span.tone == Tone::Invalid && span.text == "false"));
    }

    #[test]
    fn timeline_marks_one_active_step() {
        let frame = DemoFrame::compose(DemoStep::Final, &translator(), false);
        let active: Vec<_> = frame.timeline.iter().filter(|item| item.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].step, DemoStep::Final);
        assert!(frame.logs.is_empty());
    }
}
