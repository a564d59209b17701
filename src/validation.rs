//! Boundary checks for user-supplied input. Every failure is a
//! [`SyncError::Validation`] and is never retried.

use crate::{
    error::{Result, SyncError},
    model::{ProblemRecord, SolutionRecord},
    paths::slugify,
    taxonomy::Placement,
};

const MAX_PROBLEM_NUMBER: u32 = 9999;
const MIN_CODE_LEN: usize = 10;

/// Accepts `1..=9999` written with digits only and returns the trimmed input.
pub fn problem_number(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SyncError::validation("Problem number is required"));
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SyncError::validation(format!(
            "Problem number must contain only digits, got `{}`",
            trimmed
        )));
    }
    match trimmed.parse::<u32>() {
        Ok(n) if (1..=MAX_PROBLEM_NUMBER).contains(&n) => Ok(trimmed),
        _ => Err(SyncError::validation(format!(
            "Problem number must be between 1 and {}",
            MAX_PROBLEM_NUMBER
        ))),
    }
}

/// Checks the `O(...)` shape only; the expression inside is not evaluated.
pub fn is_big_o(raw: &str) -> bool {
    let s = raw.trim();
    s.len() > 3 && s.starts_with("O(") && s.ends_with(')') && !s[2..s.len() - 1].trim().is_empty()
}

impl ProblemRecord {
    /// Checks the fields that end up in repository paths and the commit message.
    pub fn validate(&self) -> Result<()> {
        problem_number(&self.frontend_id)?;
        if self.frontend_id.trim() != self.frontend_id {
            return Err(SyncError::validation(
                "Problem number must not contain surrounding whitespace",
            ));
        }
        if slugify(&self.title).is_empty() {
            return Err(SyncError::validation(
                "Problem title must contain at least one letter or digit",
            ));
        }
        Ok(())
    }
}

impl SolutionRecord {
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(SyncError::validation("Solution code is required"));
        }
        if self.code.chars().count() < MIN_CODE_LEN {
            return Err(SyncError::validation(format!(
                "Solution code must be at least {} characters",
                MIN_CODE_LEN
            )));
        }
        if self.approach.trim().is_empty() {
            return Err(SyncError::validation("Approach explanation is required"));
        }
        for (label, value) in [
            ("Time", &self.time_complexity),
            ("Space", &self.space_complexity),
        ] {
            if !is_big_o(value) {
                return Err(SyncError::validation(format!(
                    "{} complexity must use Big-O notation like O(n), got `{}`",
                    label, value
                )));
            }
        }
        Placement::new(self.category, self.subcategory).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorCategory,
        model::{Difficulty, Language, ManualProblem},
        taxonomy::{Category, Subcategory},
    };

    fn solution() -> SolutionRecord {
        SolutionRecord {
            code: "function twoSum() { return []; }".into(),
            language: Language::TypeScript,
            category: Category::Arrays,
            subcategory: Subcategory::TwoPointers,
            approach: "Walk inwards from both ends.".into(),
            time_complexity: "O(n)".into(),
            space_complexity: " O(1) ".into(),
        }
    }

    #[test]
    fn problem_number_should_work() {
        assert_eq!(problem_number(" 42 ").unwrap(), "42");
        assert_eq!(problem_number("9999").unwrap(), "9999");
    }

    #[test]
    fn problem_number_should_fail() {
        for bad in ["", "0", "10000", "12a", "-3", "1.5"] {
            let err = problem_number(bad).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Validation, "{}", bad);
        }
    }

    fn manual(frontend_id: &str, title: &str) -> ProblemRecord {
        ProblemRecord::from(ManualProblem {
            frontend_id: frontend_id.into(),
            title: title.into(),
            description: "Count things.".into(),
            difficulty: Difficulty::Easy,
            topic_tags: vec![],
            examples: vec![],
            constraints: String::new(),
        })
    }

    #[test]
    fn problem_record_validate_should_work() {
        assert!(manual("11", "Container With Most Water").validate().is_ok());
    }

    #[test]
    fn problem_record_validate_should_fail() {
        for (id, title) in [
            ("../../etc", "Escape"),
            ("0", "Zero"),
            (" 7", "Padded"),
            ("11", "!!!"),
            ("11", ""),
        ] {
            let err = manual(id, title).validate().unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Validation, "{:?}", (id, title));
        }
    }

    #[test]
    fn big_o_should_work() {
        assert!(is_big_o("O(n log n)"));
        assert!(is_big_o("  O(1)"));
        assert!(!is_big_o("O()"));
        assert!(!is_big_o("n^2"));
        assert!(!is_big_o("O(n"));
    }

    #[test]
    fn solution_validate_should_work() {
        assert!(solution().validate().is_ok());
    }

    #[test]
    fn solution_validate_should_fail() {
        let mut short = solution();
        short.code = "x = 1".into();
        assert!(short.validate().is_err());

        let mut no_approach = solution();
        no_approach.approach = "   ".into();
        assert!(no_approach.validate().is_err());

        let mut bad_time = solution();
        bad_time.time_complexity = "linear".into();
        let err = bad_time.validate().unwrap_err();
        assert!(err.to_string().starts_with("Time complexity"));

        let mut wrong_bucket = solution();
        wrong_bucket.subcategory = Subcategory::Bfs;
        assert!(wrong_bucket.validate().is_err());
    }
}
