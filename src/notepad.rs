use crate::expression::{EvaluationResult, evaluate};
use crate::numeric::format_number;

/// The part of a line that gets evaluated: everything after the last `=`,
/// or the whole line when there is none, filtered to digits, `.`, `%` and
/// the four operators.
pub fn line_expression(line: &str) -> String {
    let tail = match line.rfind('=') {
        Some(pos) => &line[pos + 1..],
        None => line,
    };
    tail.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '%' | '+' | '-' | '*' | '/'))
        .collect()
}

/// Evaluates one notepad line.
///
/// # Examples
/// ```
/// use blockcalc::expression::EvaluationResult;
/// use blockcalc::notepad::solve_line;
///
/// assert_eq!(solve_line("Tax: 135*0.07"), EvaluationResult::Number(9.45));
/// assert_eq!(solve_line("total = 12+8"), EvaluationResult::Number(20.0));
/// assert_eq!(solve_line("buy milk"), EvaluationResult::NoResult);
/// ```
pub fn solve_line(line: &str) -> EvaluationResult {
    evaluate(&line_expression(line))
}

/// Renders a line with its answer appended.
///
/// A line that is not arithmetic comes back unchanged.
///
/// # Arguments
/// * `line` - The source line as the user wrote it
/// * `error_label` - Appended in place of a value when the line errors
pub fn render_line(line: &str, error_label: &str) -> String {
    match solve_line(line) {
        EvaluationResult::Number(v) => format!("{} = {}", line.trim_end(), format_number(v)),
        EvaluationResult::ErrorMarker => format!("{} = {}", line.trim_end(), error_label),
        EvaluationResult::NoResult => line.to_string(),
    }
}

/// Solves every line of a note.
pub fn solve_document(text: &str) -> Vec<EvaluationResult> {
    text.lines().map(solve_line).collect()
}

/// Renders every line of a note, keeping line order.
pub fn render_document(text: &str, error_label: &str) -> String {
    text.lines()
        .map(|line| render_line(line, error_label))
        .collect::<Vec<_>>()
        .join("\n")
}
