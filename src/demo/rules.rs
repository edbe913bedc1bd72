// SPDX-License-Identifier: PMPL-1.0-or-later

//! Reveal rules for the demo's dynamic fields.
//!
//! Each field is revealed from one stage onward and, for the fields the
//! script flags as failing validation, marked invalid from another stage
//! onward. Both thresholds are monotonic along the stage order: scrolling
//! back up hides what was revealed, scrolling down never un-flags a field.

use super::DemoStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DemoField {
    /// First asset name in the source document.
    Asset1Highlight,
    /// Second asset name in the source document.
    Asset2Highlight,
    /// CNPJ identifier of the first asset.
    CnpjHighlight,
    /// ISIN identifier of the second asset (fails validation).
    IsinHighlight,
    TrustScore,
    Asset1Valid,
    Asset1Compliance,
    Asset1Rationale,
    Asset2Valid,
    Asset2Compliance,
    Asset2Rationale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Hidden,
    Revealed,
    Invalid,
}

impl FieldState {
    pub fn is_shown(&self) -> bool {
        !matches!(self, FieldState::Hidden)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub reveal_from: DemoStep,
    pub invalid_from: Option<DemoStep>,
}

impl FieldRule {
    const fn shown_from(step: DemoStep) -> Self {
        Self {
            reveal_from: step,
            invalid_from: None,
        }
    }

    const fn invalid_from(step: DemoStep) -> Self {
        Self {
            reveal_from: step,
            invalid_from: Some(step),
        }
    }

    pub fn state_at(&self, step: DemoStep) -> FieldState {
        if step < self.reveal_from {
            return FieldState::Hidden;
        }
        match self.invalid_from {
            Some(from) if step >= from => FieldState::Invalid,
            _ => FieldState::Revealed,
        }
    }

    /// Stages at which the field is shown.
    pub fn reveal_set(&self) -> Vec<DemoStep> {
        DemoStep::ALL
            .iter()
            .copied()
            .filter(|step| self.state_at(*step).is_shown())
            .collect()
    }
}

impl DemoField {
    pub const ALL: [DemoField; 11] = [
        DemoField::Asset1Highlight,
        DemoField::Asset2Highlight,
        DemoField::CnpjHighlight,
        DemoField::IsinHighlight,
        DemoField::TrustScore,
        DemoField::Asset1Valid,
        DemoField::Asset1Compliance,
        DemoField::Asset1Rationale,
        DemoField::Asset2Valid,
        DemoField::Asset2Compliance,
        DemoField::Asset2Rationale,
    ];

    pub fn rule(&self) -> FieldRule {
        use DemoStep::*;
        match self {
            DemoField::Asset1Highlight | DemoField::Asset2Highlight => {
                FieldRule::shown_from(Extraction)
            }
            DemoField::CnpjHighlight | DemoField::Asset1Valid => FieldRule::shown_from(Validation),
            DemoField::IsinHighlight | DemoField::Asset2Valid => FieldRule::invalid_from(Validation),
            DemoField::TrustScore
            | DemoField::Asset1Compliance
            | DemoField::Asset1Rationale
            | DemoField::Asset2Compliance
            | DemoField::Asset2Rationale => FieldRule::shown_from(Analysis),
        }
    }

    pub fn state_at(&self, step: DemoStep) -> FieldState {
        self.rule().state_at(step)
    }
}
