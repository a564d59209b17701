use serde::Serialize;

use crate::model::{Language, ProblemRecord, SolutionRecord};

pub const README_FILE: &str = "README.md";
const SOLUTION_STEM: &str = "solution";

/// Lowercases `title` and collapses every run of non-alphanumerics into one hyphen.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// File extension for a language tag, `txt` when the tag is unknown.
pub fn extension_for(language: &str) -> &'static str {
    language
        .parse::<Language>()
        .map(Language::extension)
        .unwrap_or("txt")
}

/// `<number>-<slug>`
pub fn folder_name(problem_number: &str, title: &str) -> String {
    format!("{}-{}", problem_number, slugify(title))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind<'a> {
    Readme,
    /// Solution file for the given language tag.
    Solution(&'a str),
}

pub fn derive_path(
    category: &str,
    subcategory: &str,
    problem_number: &str,
    title: &str,
    kind: FileKind<'_>,
) -> String {
    let file = match kind {
        FileKind::Readme => README_FILE.to_string(),
        FileKind::Solution(language) => {
            format!("{}.{}", SOLUTION_STEM, extension_for(language))
        }
    };
    format!(
        "{}/{}/{}/{}",
        category,
        subcategory,
        folder_name(problem_number, title),
        file
    )
}

/// Repository locations of the two generated files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemPaths {
    pub folder: String,
    pub readme: String,
    pub solution: String,
}

impl ProblemPaths {
    pub fn new(problem: &ProblemRecord, solution: &SolutionRecord) -> Self {
        let category = solution.category.to_string();
        let subcategory = solution.subcategory.to_string();
        let language = solution.language.to_string();
        let number = problem.frontend_id.as_str();
        Self {
            folder: format!(
                "{}/{}/{}",
                category,
                subcategory,
                folder_name(number, &problem.title)
            ),
            readme: derive_path(
                &category,
                &subcategory,
                number,
                &problem.title,
                FileKind::Readme,
            ),
            solution: derive_path(
                &category,
                &subcategory,
                number,
                &problem.title,
                FileKind::Solution(&language),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_should_work() {
        assert_eq!(slugify("Container With Most Water"), "container-with-most-water");
        assert_eq!(slugify("  A++ B!!"), "a-b");
        assert_eq!(slugify("Pow(x, n)"), "pow-x-n");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn derive_path_should_work() {
        let readme = derive_path(
            "arrays",
            "two-pointers",
            "11",
            "Container With Most Water",
            FileKind::Readme,
        );
        insta::assert_snapshot!(readme, @"arrays/two-pointers/11-container-with-most-water/README.md");

        let solution = derive_path(
            "arrays",
            "two-pointers",
            "11",
            "Container With Most Water",
            FileKind::Solution("python"),
        );
        insta::assert_snapshot!(solution, @"arrays/two-pointers/11-container-with-most-water/solution.py");
    }

    #[test]
    fn unknown_language_should_fall_back_to_txt() {
        assert_eq!(extension_for("cobol"), "txt");
        assert_eq!(extension_for("go"), "go");
        let path = derive_path("math", "other", "7", "Reverse Integer", FileKind::Solution("rust"));
        assert!(path.ends_with("/7-reverse-integer/solution.txt"));
    }
}
