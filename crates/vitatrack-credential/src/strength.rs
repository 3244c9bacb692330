//! Password strength scoring.
//!
//! Deterministic scoring over five boolean criteria plus a deny-list of
//! common substrings. The report serializes as camelCase JSON so the HTTP
//! layer can return it to the registration form verbatim.

use serde::Serialize;

/// Minimum acceptable password length.
pub const MIN_LENGTH: usize = 8;

/// Substrings that mark a password as predictable regardless of its
/// character mix. Matched case-insensitively.
const COMMON_PATTERNS: &[&str] = &[
    "password", "12345678", "123456", "qwerty", "abc123", "letmein", "admin", "welcome",
    "iloveyou", "dragon",
];

/// The five boolean criteria plus the deny-list flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthCriteria {
    /// Password is at least [`MIN_LENGTH`] characters.
    pub min_length: bool,
    /// Contains an uppercase letter.
    pub has_uppercase: bool,
    /// Contains a lowercase letter.
    pub has_lowercase: bool,
    /// Contains a digit.
    pub has_number: bool,
    /// Contains a non-alphanumeric character.
    pub has_special_char: bool,
    /// No deny-listed substring matched.
    pub no_common_patterns: bool,
}

/// Coarse strength bucket derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    /// Score below 3.
    Weak,
    /// Score exactly 3.
    Medium,
    /// Score 4 or above.
    Strong,
}

impl Strength {
    /// Returns the strength as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full strength evaluation result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthReport {
    /// Whether the password is acceptable (score at least 3).
    pub is_valid: bool,
    /// Coarse bucket for display.
    pub strength: Strength,
    /// Count of satisfied criteria, minus one if a common pattern matched.
    pub score: u8,
    /// Human-readable hints for every unmet criterion.
    pub suggestions: Vec<String>,
    /// The individual criterion flags.
    pub criteria: StrengthCriteria,
}

/// Scores a password.
///
/// `score` is the number of satisfied criteria (out of five), reduced by
/// one (saturating at zero) when a deny-listed substring matches. The same
/// password always produces the same report.
#[must_use]
pub fn evaluate_strength(password: &str) -> StrengthReport {
    let lowered = password.to_lowercase();
    let criteria = StrengthCriteria {
        min_length: password.chars().count() >= MIN_LENGTH,
        has_uppercase: password.chars().any(char::is_uppercase),
        has_lowercase: password.chars().any(char::is_lowercase),
        has_number: password.chars().any(|c| c.is_ascii_digit()),
        has_special_char: password.chars().any(|c| !c.is_alphanumeric()),
        no_common_patterns: !COMMON_PATTERNS
            .iter()
            .any(|pattern| lowered.contains(pattern)),
    };

    let satisfied = [
        criteria.min_length,
        criteria.has_uppercase,
        criteria.has_lowercase,
        criteria.has_number,
        criteria.has_special_char,
    ]
    .iter()
    .filter(|met| **met)
    .count() as u8;

    let score = if criteria.no_common_patterns {
        satisfied
    } else {
        satisfied.saturating_sub(1)
    };

    let strength = match score {
        0..=2 => Strength::Weak,
        3 => Strength::Medium,
        _ => Strength::Strong,
    };

    let mut suggestions = Vec::new();
    if !criteria.min_length {
        suggestions.push(format!("Use at least {MIN_LENGTH} characters"));
    }
    if !criteria.has_uppercase {
        suggestions.push("Add an uppercase letter".to_string());
    }
    if !criteria.has_lowercase {
        suggestions.push("Add a lowercase letter".to_string());
    }
    if !criteria.has_number {
        suggestions.push("Add a number".to_string());
    }
    if !criteria.has_special_char {
        suggestions.push("Add a special character".to_string());
    }
    if !criteria.no_common_patterns {
        suggestions.push("Avoid common words and sequences".to_string());
    }

    StrengthReport {
        is_valid: score >= 3,
        strength,
        score,
        suggestions,
        criteria,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_only_is_weak() {
        let report = evaluate_strength("abcdefgh");
        assert_eq!(report.score, 2);
        assert_eq!(report.strength, Strength::Weak);
        assert!(!report.is_valid);
        assert!(report.criteria.min_length);
        assert!(report.criteria.has_lowercase);
        assert!(!report.criteria.has_uppercase);
        assert!(!report.criteria.has_number);
        assert!(!report.criteria.has_special_char);
    }

    #[test]
    fn test_all_criteria_is_strong() {
        let report = evaluate_strength("Abcdef1!");
        assert_eq!(report.score, 5);
        assert_eq!(report.strength, Strength::Strong);
        assert!(report.is_valid);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_common_pattern_deducts_one() {
        // Satisfies all five criteria but contains "password".
        let report = evaluate_strength("Password1!");
        assert!(!report.criteria.no_common_patterns);
        assert_eq!(report.score, 4);
        assert!(
            report
                .suggestions
                .iter()
                .any(|s| s.contains("common words"))
        );
    }

    #[test]
    fn test_common_pattern_is_case_insensitive() {
        let report = evaluate_strength("PASSWORD1!");
        assert!(!report.criteria.no_common_patterns);
    }

    #[test]
    fn test_bare_common_password_is_weak() {
        // min_length + lowercase = 2, minus the deny-list deduction.
        let report = evaluate_strength("password");
        assert_eq!(report.score, 1);
        assert_eq!(report.strength, Strength::Weak);
        assert!(!report.is_valid);
    }

    #[test]
    fn test_score_saturates_at_zero() {
        let report = evaluate_strength("123456");
        // has_number only, minus one for the deny-list match.
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_medium_boundary() {
        // Exactly three criteria: length, lowercase, number.
        let report = evaluate_strength("abcdef12");
        assert_eq!(report.score, 3);
        assert_eq!(report.strength, Strength::Medium);
        assert!(report.is_valid);
    }

    #[test]
    fn test_suggestions_name_unmet_criteria() {
        let report = evaluate_strength("abc");
        let joined = report.suggestions.join("; ");
        assert!(joined.contains("at least 8"));
        assert!(joined.contains("uppercase"));
        assert!(joined.contains("number"));
        assert!(joined.contains("special"));
        assert!(!joined.contains("lowercase letter"), "lowercase is met");
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = evaluate_strength("Abcdef1!");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["strength"], "strong");
        assert_eq!(json["criteria"]["noCommonPatterns"], true);
        assert_eq!(json["criteria"]["hasSpecialChar"], true);
        assert_eq!(json["criteria"]["minLength"], true);
    }
}
