//! Structural validation of a parsed configuration document.
//!
//! Validation collects every violation it can find rather than failing on
//! the first, so a rejected file can be reported in full. Each violation
//! names the page/frame/index at fault.

use thiserror::Error;

use crate::model::{
    CUSTOM_LED_START_PAGE, Configuration, FRAME_RGB_LEN, FrameSet, PAGE_COUNT, Page,
};

/// How many colors per frame are sampled for format checking.
const COLOR_SAMPLE: usize = 10;

/// A single structural violation in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("expected {expected} pages, got {found}")]
    PageCount { expected: u32, found: u32 },

    #[error("expected {expected} page entries, got {found}")]
    PageEntries { expected: usize, found: usize },

    #[error("missing product info key 'product_id'")]
    MissingProductId,

    #[error("page {page}: page index mismatch: expected {expected}, got {found}")]
    PageIndexMismatch {
        page: usize,
        expected: usize,
        found: u32,
    },

    #[error("page {page}: no valid frame data found")]
    NoValidFrameData { page: usize },

    #[error("page {page}: frame count mismatch: declared {declared}, found {found}")]
    FrameCountMismatch {
        page: usize,
        declared: u32,
        found: usize,
    },

    #[error("page {page}, frame {frame}: frame index mismatch: expected {expected}, got {found}")]
    FrameIndexMismatch {
        page: usize,
        frame: usize,
        expected: usize,
        found: u32,
    },

    #[error("page {page}, frame {frame}: expected {expected} RGB values, got {found}")]
    RgbLength {
        page: usize,
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("page {page}, frame {frame}: invalid RGB color at index {index}: '{value}'")]
    InvalidColor {
        page: usize,
        frame: usize,
        index: usize,
        value: String,
    },
}

/// Validate a complete configuration document.
///
/// Returns every violation found (empty means valid). When the page count
/// itself is wrong, per-page checks are skipped; there is no meaningful way
/// to pair pages with their expected indices.
pub fn validate_configuration(config: &Configuration) -> Vec<Violation> {
    let mut violations = Vec::new();

    if config.page_num != PAGE_COUNT as u32 {
        violations.push(Violation::PageCount {
            expected: PAGE_COUNT as u32,
            found: config.page_num,
        });
    }
    if config.page_count() != PAGE_COUNT {
        violations.push(Violation::PageEntries {
            expected: PAGE_COUNT,
            found: config.page_count(),
        });
    }
    if !violations.is_empty() {
        return violations;
    }

    if config.product_info.get("product_id").is_none() {
        violations.push(Violation::MissingProductId);
    }

    for (index, page) in config.page_data.iter().enumerate() {
        validate_page(page, index, &mut violations);
    }

    violations
}

/// Quick check that a document carries no violations.
pub fn is_valid_configuration(config: &Configuration) -> bool {
    validate_configuration(config).is_empty()
}

fn validate_page(page: &Page, index: usize, violations: &mut Vec<Violation>) {
    if page.page_index != index as u32 {
        violations.push(Violation::PageIndexMismatch {
            page: index,
            expected: index,
            found: page.page_index,
        });
    }

    // Custom LED pages must carry a usable animation; fixed-purpose pages
    // (0-4) are opaque to this tool.
    if index >= CUSTOM_LED_START_PAGE {
        match page.active_frames() {
            Some(set) => validate_frame_set(set, index, violations),
            None => violations.push(Violation::NoValidFrameData { page: index }),
        }
    }
}

fn validate_frame_set(set: &FrameSet, page: usize, violations: &mut Vec<Violation>) {
    if set.frame_num as usize != set.frame_data.len() {
        violations.push(Violation::FrameCountMismatch {
            page,
            declared: set.frame_num,
            found: set.frame_data.len(),
        });
    }

    for (frame_pos, frame) in set.frame_data.iter().enumerate() {
        if frame.frame_index != frame_pos as u32 {
            violations.push(Violation::FrameIndexMismatch {
                page,
                frame: frame_pos,
                expected: frame_pos,
                found: frame.frame_index,
            });
        }

        if frame.frame_rgb.len() != FRAME_RGB_LEN {
            violations.push(Violation::RgbLength {
                page,
                frame: frame_pos,
                expected: FRAME_RGB_LEN,
                found: frame.frame_rgb.len(),
            });
        }

        // Sample the first few colors; one report per frame is enough.
        for (i, color) in frame.frame_rgb.iter().take(COLOR_SAMPLE).enumerate() {
            if !is_rgb_color(color) {
                violations.push(Violation::InvalidColor {
                    page,
                    frame: frame_pos,
                    index: i,
                    value: color.clone(),
                });
                break;
            }
        }
    }
}

/// Validate a standalone RGB list (e.g., a single frame's colors), returning
/// human-readable problems.
pub fn validate_rgb_values(values: &[String]) -> Vec<String> {
    if values.len() != FRAME_RGB_LEN {
        return vec![format!(
            "expected {FRAME_RGB_LEN} RGB values, got {}",
            values.len()
        )];
    }
    values
        .iter()
        .enumerate()
        .filter(|(_, color)| !is_rgb_color(color))
        .map(|(i, color)| format!("invalid RGB color at index {i}: '{color}'"))
        .collect()
}

/// Whether `s` is a `#RRGGBB` hex literal.
pub fn is_rgb_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    #[test]
    fn well_formed_document_passes() {
        let config = fixtures::configuration([2, 0, 3]);
        assert!(validate_configuration(&config).is_empty());
        assert!(is_valid_configuration(&config));
    }

    #[test]
    fn wrong_page_num_is_reported() {
        let mut config = fixtures::configuration([1, 1, 1]);
        config.page_num = 7;
        let violations = validate_configuration(&config);
        assert_eq!(
            violations,
            vec![Violation::PageCount {
                expected: 8,
                found: 7
            }]
        );
    }

    #[test]
    fn truncated_rgb_list_names_page_and_frame() {
        let mut config = fixtures::configuration([2, 1, 1]);
        config.page_data[5].frames.as_mut().unwrap().frame_data[1]
            .frame_rgb
            .truncate(199);

        let violations = validate_configuration(&config);
        assert!(violations.contains(&Violation::RgbLength {
            page: 5,
            frame: 1,
            expected: 200,
            found: 199,
        }));
    }

    #[test]
    fn page_index_mismatch_is_reported() {
        let mut config = fixtures::configuration([1, 1, 1]);
        config.page_data[2].page_index = 4;
        let violations = validate_configuration(&config);
        assert!(violations.contains(&Violation::PageIndexMismatch {
            page: 2,
            expected: 2,
            found: 4,
        }));
    }

    #[test]
    fn declared_frame_num_must_match() {
        let mut config = fixtures::configuration([2, 1, 1]);
        config.page_data[6].frames.as_mut().unwrap().frame_num = 5;
        let violations = validate_configuration(&config);
        assert!(violations.contains(&Violation::FrameCountMismatch {
            page: 6,
            declared: 5,
            found: 1,
        }));
    }

    #[test]
    fn frame_index_gaps_are_reported() {
        let mut config = fixtures::configuration([2, 1, 1]);
        config.page_data[5].frames.as_mut().unwrap().frame_data[1].frame_index = 7;
        let violations = validate_configuration(&config);
        assert!(violations.contains(&Violation::FrameIndexMismatch {
            page: 5,
            frame: 1,
            expected: 1,
            found: 7,
        }));
    }

    #[test]
    fn malformed_colors_are_sampled_once_per_frame() {
        let mut config = fixtures::configuration([1, 1, 1]);
        let frame = &mut config.page_data[7].frames.as_mut().unwrap().frame_data[0];
        frame.frame_rgb[0] = "red".to_string();
        frame.frame_rgb[1] = "blue".to_string();

        let violations = validate_configuration(&config);
        let color_reports: Vec<_> = violations
            .iter()
            .filter(|v| matches!(v, Violation::InvalidColor { .. }))
            .collect();
        assert_eq!(color_reports.len(), 1);
        assert_eq!(
            color_reports[0],
            &Violation::InvalidColor {
                page: 7,
                frame: 0,
                index: 0,
                value: "red".to_string(),
            }
        );
    }

    #[test]
    fn missing_product_id_is_reported() {
        let mut config = fixtures::configuration([1, 1, 1]);
        config.product_info = serde_json::json!({});
        let violations = validate_configuration(&config);
        assert!(violations.contains(&Violation::MissingProductId));
    }

    #[test]
    fn rgb_value_helper_checks_length_first() {
        let short = vec!["#000000".to_string(); 3];
        let errors = validate_rgb_values(&short);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("expected 200"));

        let mut full = vec!["#000000".to_string(); 200];
        full[42] = "nope".to_string();
        let errors = validate_rgb_values(&full);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("index 42"));
    }

    #[test]
    fn hex_color_predicate() {
        assert!(is_rgb_color("#000000"));
        assert!(is_rgb_color("#aAbBcC"));
        assert!(!is_rgb_color("#00000"));
        assert!(!is_rgb_color("000000"));
        assert!(!is_rgb_color("#GGGGGG"));
        assert!(!is_rgb_color(""));
    }
}
