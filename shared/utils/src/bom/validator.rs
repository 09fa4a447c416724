//! BOM Validator
//!
//! Reviews an imported tree and reports issues a user may want to fix before
//! the lines are used. The tree itself is never modified.

use execbom_models::{BomData, UNTITLED};
use serde::{Deserialize, Serialize};

/// Validation severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

/// Single validation issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub block_id: Option<String>,
    pub section_id: Option<String>,
    pub item_id: Option<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Validation result for a BOM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub issues: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
}

/// Summary statistics for validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_items: usize,
    pub empty_sections: usize,
    pub missing_modules: usize,
    pub missing_descriptions: usize,
    pub negative_quantities: usize,
}

/// BOM validator
pub struct BomValidator {
    flag_empty_sections: bool,
    flag_missing_module: bool,
}

impl Default for BomValidator {
    fn default() -> Self {
        Self {
            flag_empty_sections: true,
            flag_missing_module: true,
        }
    }
}

impl BomValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_sections_flagged(mut self, flag: bool) -> Self {
        self.flag_empty_sections = flag;
        self
    }

    pub fn with_missing_module_flagged(mut self, flag: bool) -> Self {
        self.flag_missing_module = flag;
        self
    }

    /// Validate an imported tree
    ///
    /// Headings always take their text from a filled cell, so the
    /// `"Untitled"` notes only fire when a sheet literally names a block or
    /// section "Untitled", or when a tree is built by hand.
    pub fn validate(&self, bom: &BomData) -> ValidationResult {
        let mut issues = Vec::new();
        let mut summary = ValidationSummary::default();

        for block in &bom.blocks {
            if block.title == UNTITLED {
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Info,
                    block_id: Some(block.id.clone()),
                    section_id: None,
                    item_id: None,
                    message: "Block has no title".to_string(),
                    suggestion: Some("Give the heading row a name".to_string()),
                });
            }

            for section in &block.sections {
                if section.label == UNTITLED {
                    issues.push(ValidationIssue {
                        severity: ValidationSeverity::Info,
                        block_id: Some(block.id.clone()),
                        section_id: Some(section.id.clone()),
                        item_id: None,
                        message: "Section has no label".to_string(),
                        suggestion: Some("Give the heading row a name".to_string()),
                    });
                }

                if section.is_empty() {
                    summary.empty_sections += 1;
                    if self.flag_empty_sections {
                        issues.push(ValidationIssue {
                            severity: ValidationSeverity::Warning,
                            block_id: Some(block.id.clone()),
                            section_id: Some(section.id.clone()),
                            item_id: None,
                            message: format!("Section '{}' has no items", section.label),
                            suggestion: Some("Remove the heading or add item rows below it".to_string()),
                        });
                    }
                }

                for item in &section.items {
                    summary.total_items += 1;
                    let issue = |severity, message: String, suggestion: &str| ValidationIssue {
                        severity,
                        block_id: Some(block.id.clone()),
                        section_id: Some(section.id.clone()),
                        item_id: Some(item.id.clone()),
                        message,
                        suggestion: Some(suggestion.to_string()),
                    };

                    if item.module.is_empty() {
                        summary.missing_modules += 1;
                        if self.flag_missing_module {
                            issues.push(issue(
                                ValidationSeverity::Warning,
                                format!("Item '{}' has no module", item.description),
                                "Fill in the first column",
                            ));
                        }
                    }

                    if item.description.is_empty() {
                        summary.missing_descriptions += 1;
                        issues.push(issue(
                            ValidationSeverity::Info,
                            format!("Item '{}' has no description", item.module),
                            "Fill in the second column",
                        ));
                    }

                    if item.qty < 0.0 {
                        summary.negative_quantities += 1;
                        issues.push(issue(
                            ValidationSeverity::Warning,
                            format!("Item '{}' has a negative quantity ({})", item.module, item.qty),
                            "Check the third column",
                        ));
                    }
                }
            }
        }

        if summary.total_items == 0 {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Error,
                block_id: None,
                section_id: None,
                item_id: None,
                message: "No item rows found".to_string(),
                suggestion: Some("Item rows need at least two filled cells".to_string()),
            });
        }

        let error_count = issues.iter().filter(|i| i.severity == ValidationSeverity::Error).count();
        let warning_count = issues.iter().filter(|i| i.severity == ValidationSeverity::Warning).count();

        ValidationResult {
            is_valid: error_count == 0,
            error_count,
            warning_count,
            issues,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::classifier::classify_rows;
    use crate::bom::ids::SequentialIds;

    #[test]
    fn test_clean_tree_is_valid() {
        let bom = classify_rows(vec![vec!["Frame"], vec!["F1", "Tube", "4"]], SequentialIds::default());
        let result = BomValidator::new().validate(&bom);

        assert!(result.is_valid);
        assert!(result.issues.is_empty());
        assert_eq!(result.summary.total_items, 1);
    }

    #[test]
    fn test_empty_tree_is_an_error() {
        let result = BomValidator::new().validate(&BomData::new());
        assert!(!result.is_valid);
        assert_eq!(result.error_count, 1);
    }

    #[test]
    fn test_item_and_section_warnings() {
        let bom = classify_rows(
            vec![
                vec!["Block"],
                vec!["Empty section"],
                vec!["Parts"],
                vec!["", "Washer", "2"],
                vec!["P2", "", "-3"],
            ],
            SequentialIds::default(),
        );
        let result = BomValidator::new().validate(&bom);

        assert!(result.is_valid);
        assert_eq!(result.summary.empty_sections, 1);
        assert_eq!(result.summary.missing_modules, 1);
        assert_eq!(result.summary.negative_quantities, 1);
        assert_eq!(result.warning_count, 3);
        // missing description
        assert_eq!(result.issues.iter().filter(|i| i.severity == ValidationSeverity::Info).count(), 1);
    }

    #[test]
    fn test_checks_can_be_switched_off() {
        let bom = classify_rows(
            vec![vec!["B"], vec!["Empty"], vec!["S"], vec!["", "Washer", "2"]],
            SequentialIds::default(),
        );
        assert_eq!(BomValidator::new().validate(&bom).warning_count, 2);

        let result = BomValidator::new()
            .with_empty_sections_flagged(false)
            .with_missing_module_flagged(false)
            .validate(&bom);

        assert_eq!(result.warning_count, 0);
        assert_eq!(result.summary.missing_modules, 1);
        assert_eq!(result.summary.empty_sections, 1);
    }
}
