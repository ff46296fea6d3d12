//! Budgeted top-K candidate selection.

use crate::domain::{CandidateFile, SelectedFile, SelectionBudget};
use crate::select::scorer::{score, NameClass};

/// Rank candidates and return the bounded subset to submit downstream.
///
/// Candidates arrive in discovery order (path-lexicographic from the
/// collector); that order is the tie-break, so identical input always yields
/// byte-identical output. Files one point below the cutoff are fully
/// excluded, with no re-scoring or backfill after the cut, to keep the downstream
/// request size bounded.
pub fn select(candidates: &[CandidateFile], budget: &SelectionBudget) -> Vec<SelectedFile> {
    let mut scored: Vec<(usize, &CandidateFile, i64)> = candidates
        .iter()
        .enumerate()
        // Empty and whitespace-only files are never worth a review slot,
        // whatever their score.
        .filter(|(_, file)| !file.content.trim().is_empty())
        .map(|(index, file)| (index, file, score(&file.candidate)))
        .collect();

    // Stable sort: score descending, then discovery order, then path as a
    // last deterministic fallback.
    scored.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then(a.0.cmp(&b.0))
            .then_with(|| a.1.candidate.relative_path.cmp(&b.1.candidate.relative_path))
    });

    scored
        .into_iter()
        .take(budget.max_files)
        .map(|(_, file, file_score)| truncate(file, file_score, budget))
        .collect()
}

/// Keep the first N lines, never the tail; entrypoint-class files get the
/// wider cap.
fn truncate(file: &CandidateFile, file_score: i64, budget: &SelectionBudget) -> SelectedFile {
    let cap = match NameClass::of(&file.candidate.relative_path) {
        NameClass::Entrypoint => budget.max_lines_high_priority,
        _ => budget.max_lines_normal,
    };

    let total_lines = file.content.lines().count();
    let (content, truncated) = if total_lines > cap {
        let mut kept: String = file
            .content
            .lines()
            .take(cap)
            .collect::<Vec<_>>()
            .join("\n");
        kept.push('\n');
        (kept, true)
    } else {
        (file.content.clone(), false)
    };

    SelectedFile {
        relative_path: file.candidate.relative_path.clone(),
        content,
        truncated,
        score: file_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candidate, SizeCategory};

    fn file(path: &str, depth: usize, content: &str) -> CandidateFile {
        let line_count = content.lines().count();
        CandidateFile {
            candidate: Candidate {
                relative_path: path.to_string(),
                depth,
                line_count,
                function_count: 0,
                class_count: 0,
                import_count: 0,
                size_category: SizeCategory::from_line_count(line_count),
            },
            content: content.to_string(),
        }
    }

    #[test]
    fn test_selection_is_bounded_by_max_files() {
        let candidates: Vec<CandidateFile> =
            (0..10).map(|i| file(&format!("f{i}.py"), 1, "x = 1\n")).collect();
        let budget = SelectionBudget { max_files: 3, ..Default::default() };

        let selected = select(&candidates, &budget);
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn test_underflow_returns_all_without_padding() {
        let candidates = vec![file("a.py", 1, "x = 1\n"), file("b.py", 1, "y = 2\n")];
        let budget = SelectionBudget { max_files: 50, ..Default::default() };

        let selected = select(&candidates, &budget);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_empty_and_whitespace_files_are_never_selected() {
        let candidates = vec![
            file("main.py", 1, ""),
            file("app.py", 1, "   \n\t\n  "),
            file("notes.py", 4, "x = 1\n"),
        ];

        let selected = select(&candidates, &SelectionBudget::default());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].relative_path, "notes.py");
    }

    #[test]
    fn test_higher_score_ranks_first() {
        let candidates = vec![
            file("deep/nested/helper.py", 3, "x = 1\n"),
            file("main.py", 1, "x = 1\n"),
        ];

        let selected = select(&candidates, &SelectionBudget::default());
        assert_eq!(selected[0].relative_path, "main.py");
        assert!(selected[0].score > selected[1].score);
    }

    #[test]
    fn test_ties_keep_discovery_order_not_alphabetical() {
        // Identical attributes, discovered as [b.py, a.py].
        let candidates = vec![file("b.py", 1, "x = 1\n"), file("a.py", 1, "y = 2\n")];

        let selected = select(&candidates, &SelectionBudget::default());
        assert_eq!(selected[0].relative_path, "b.py");
        assert_eq!(selected[1].relative_path, "a.py");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let candidates = vec![
            file("src/main.py", 2, &"line\n".repeat(80)),
            file("src/models/user_model.py", 3, &"line\n".repeat(60)),
            file("src/utils/helper.py", 3, &"line\n".repeat(60)),
        ];
        let budget = SelectionBudget::default();

        let first = select(&candidates, &budget);
        let second = select(&candidates, &budget);
        assert_eq!(first, second);
    }

    #[test]
    fn test_truncation_keeps_head_and_flags() {
        let content: String = (1..=30).map(|i| format!("line {i}\n")).collect();
        let candidates = vec![file("notes.py", 1, &content)];
        let budget = SelectionBudget {
            max_files: 50,
            max_lines_high_priority: 20,
            max_lines_normal: 10,
        };

        let selected = select(&candidates, &budget);
        assert!(selected[0].truncated);
        assert_eq!(selected[0].content.lines().count(), 10);
        assert!(selected[0].content.starts_with("line 1\n"));
        assert!(!selected[0].content.contains("line 11"));
    }

    #[test]
    fn test_entrypoint_files_get_wider_line_cap() {
        let content: String = (1..=30).map(|i| format!("line {i}\n")).collect();
        let candidates = vec![file("main.py", 1, &content), file("notes.py", 1, &content)];
        let budget = SelectionBudget {
            max_files: 50,
            max_lines_high_priority: 25,
            max_lines_normal: 10,
        };

        let selected = select(&candidates, &budget);
        let main = selected.iter().find(|f| f.relative_path == "main.py").unwrap();
        let notes = selected.iter().find(|f| f.relative_path == "notes.py").unwrap();
        assert_eq!(main.content.lines().count(), 25);
        assert_eq!(notes.content.lines().count(), 10);
    }

    #[test]
    fn test_short_files_are_not_flagged_truncated() {
        let candidates = vec![file("a.py", 1, "one\ntwo\n")];
        let selected = select(&candidates, &SelectionBudget::default());
        assert!(!selected[0].truncated);
        assert_eq!(selected[0].content, "one\ntwo\n");
    }

    #[test]
    fn test_empty_candidate_list_is_valid() {
        let selected = select(&[], &SelectionBudget::default());
        assert!(selected.is_empty());
    }

    #[test]
    fn test_file_below_cutoff_is_fully_excluded() {
        let candidates = vec![
            file("main.py", 1, "x\n"),
            file("app.py", 1, "x\n"),
            file("deep/a/b/helper.py", 4, "x\n"),
        ];
        let budget = SelectionBudget { max_files: 2, ..Default::default() };

        let selected = select(&candidates, &budget);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|f| f.relative_path != "deep/a/b/helper.py"));
    }
}
