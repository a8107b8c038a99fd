use crate::numeric::{format_number, round_to_precision};
use log::trace;
use serde::{Deserialize, Serialize};

/// Letter substituted by [`evaluate_with_substitution`].
pub const DEFAULT_VARIABLE: char = 'x';

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`.
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }
}

/// One lexical unit of an arithmetic expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    /// A numeric literal; `is_percent` is set when a `%` directly followed it.
    Number { value: f64, is_percent: bool },
    Operator(Operator),
}

/// Outcome of evaluating an expression.
///
/// `ErrorMarker` and `NoResult` are kept apart on purpose: the first is a real
/// answer that must be shown ("Error"), the second means the text was not
/// arithmetic at all and callers leave it alone.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub enum EvaluationResult {
    Number(f64),
    /// Division by zero or a non-finite outcome.
    ErrorMarker,
    /// The input could not be parsed.
    NoResult,
}

impl EvaluationResult {
    pub fn value(&self) -> Option<f64> {
        match self {
            EvaluationResult::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EvaluationResult::ErrorMarker)
    }

    /// Text shown for this result, `None` when there is nothing to show.
    ///
    /// # Arguments
    /// * `error_label` - What to print for an `ErrorMarker` (e.g. `"Error"`)
    ///
    /// # Examples
    /// ```
    /// use blockcalc::expression::EvaluationResult;
    ///
    /// assert_eq!(EvaluationResult::Number(9.45).display("Error"), Some("9.45".to_string()));
    /// assert_eq!(EvaluationResult::ErrorMarker.display("[Error]"), Some("[Error]".to_string()));
    /// assert_eq!(EvaluationResult::NoResult.display("Error"), None);
    /// ```
    pub fn display(&self, error_label: &str) -> Option<String> {
        match self {
            EvaluationResult::Number(v) => Some(format_number(*v)),
            EvaluationResult::ErrorMarker => Some(error_label.to_string()),
            EvaluationResult::NoResult => None,
        }
    }
}

/// An operand during reduction.
#[derive(Clone, Copy, Debug)]
struct Term {
    value: f64,
    is_percent: bool,
}

impl Term {
    fn plain(value: f64) -> Self {
        Term {
            value,
            is_percent: false,
        }
    }

    fn resolved(&self) -> f64 {
        if self.is_percent {
            self.value / 100.0
        } else {
            self.value
        }
    }
}

/// Splits an expression into numbers and operators.
///
/// The scan is deliberately permissive: every character that is not a digit,
/// `.`, `%` or one of `+ - * /` is skipped, so annotated text such as
/// `"Tax: 135*0.07 ="` still tokenizes. Skipped characters do not end a
/// numeral, so `"1 000"` reads as `1000`.
///
/// # Returns
/// * `Option<Vec<Token>>` - The tokens, or `None` if a numeral is malformed
///   (e.g. `1.2.3`, a lone `.`) or does not fit in a finite float
///
/// # Examples
/// ```
/// use blockcalc::expression::{tokenize, Operator, Token};
///
/// let tokens = tokenize("100+8%").unwrap();
/// assert_eq!(tokens, vec![
///     Token::Number { value: 100.0, is_percent: false },
///     Token::Operator(Operator::Add),
///     Token::Number { value: 8.0, is_percent: true },
/// ]);
/// assert!(tokenize("1.2.3").is_none());
/// ```
pub fn tokenize(input: &str) -> Option<Vec<Token>> {
    tokenize_with(input, None)
}

fn tokenize_with(input: &str, variable: Option<(char, f64)>) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut numeral = String::new();
    // Set right after a substituted variable so a `%` can still mark it.
    let mut after_variable = false;

    for c in input.chars() {
        match c {
            '0'..='9' | '.' => {
                after_variable = false;
                numeral.push(c);
            }
            '%' => {
                if !numeral.is_empty() {
                    tokens.push(parse_numeral(&numeral, true)?);
                    numeral.clear();
                } else if after_variable {
                    if let Some(Token::Number { is_percent, .. }) = tokens.last_mut() {
                        *is_percent = true;
                    }
                }
                after_variable = false;
            }
            _ => {
                if let Some(op) = Operator::from_symbol(c) {
                    after_variable = false;
                    if !numeral.is_empty() {
                        tokens.push(parse_numeral(&numeral, false)?);
                        numeral.clear();
                    }
                    tokens.push(Token::Operator(op));
                } else if let Some((name, value)) = variable {
                    if c == name {
                        if !numeral.is_empty() {
                            tokens.push(parse_numeral(&numeral, false)?);
                            numeral.clear();
                        }
                        tokens.push(Token::Number {
                            value,
                            is_percent: false,
                        });
                        after_variable = true;
                    }
                }
            }
        }
    }

    if !numeral.is_empty() {
        tokens.push(parse_numeral(&numeral, false)?);
    }

    Some(tokens)
}

fn parse_numeral(numeral: &str, is_percent: bool) -> Option<Token> {
    let value = numeral.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(Token::Number { value, is_percent })
}

/// Applies one binary operator to two plain numbers.
///
/// This is the arithmetic core shared with the block graph. Returns `None`
/// when dividing by zero; any other outcome (including infinities) is
/// returned as-is for the caller to judge.
pub fn apply_operator(lhs: f64, op: Operator, rhs: f64) -> Option<f64> {
    match op {
        Operator::Add => Some(lhs + rhs),
        Operator::Subtract => Some(lhs - rhs),
        Operator::Multiply => Some(lhs * rhs),
        Operator::Divide => {
            if rhs == 0.0 {
                None
            } else {
                Some(lhs / rhs)
            }
        }
    }
}

// A percent right operand of + or - is taken as a share of the left operand
// ("price + 8%"); everywhere else a percent operand simply means value / 100.
fn combine(lhs: Term, op: Operator, rhs: Term) -> Option<f64> {
    let base = lhs.resolved();
    let rhs_value = match op {
        Operator::Add | Operator::Subtract if rhs.is_percent => base * (rhs.value / 100.0),
        _ => rhs.resolved(),
    };
    apply_operator(base, op, rhs_value)
}

/// Evaluates a restricted arithmetic expression.
///
/// Supports `+ - * /` with `*` and `/` evaluated first, each precedence level
/// reduced left to right, and a `%` suffix on numbers. There are no
/// parentheses, functions or unary minus.
///
/// # Arguments
/// * `input` - Expression text; characters outside the arithmetic alphabet are ignored
///
/// # Returns
/// * `EvaluationResult::Number` - The result rounded to 10 decimal places
/// * `EvaluationResult::ErrorMarker` - Division by zero or a non-finite result
/// * `EvaluationResult::NoResult` - The input is not a well-formed expression
///
/// # Examples
/// ```
/// use blockcalc::expression::{evaluate, EvaluationResult};
///
/// assert_eq!(evaluate("2+3*4"), EvaluationResult::Number(14.0));
/// assert_eq!(evaluate("100+8%"), EvaluationResult::Number(108.0));
/// assert_eq!(evaluate("10/0"), EvaluationResult::ErrorMarker);
/// assert_eq!(evaluate("abc"), EvaluationResult::NoResult);
/// ```
pub fn evaluate(input: &str) -> EvaluationResult {
    match tokenize(input) {
        Some(tokens) => reduce(&tokens),
        None => EvaluationResult::NoResult,
    }
}

/// Evaluates `expr` with every occurrence of `x` replaced by `value`.
///
/// A number written directly against the variable multiplies it, so `2x`
/// reads as `2*x` and `x2` as `x*2`. This is what the function grapher
/// calls once per sample point.
///
/// # Examples
/// ```
/// use blockcalc::expression::{evaluate_with_substitution, EvaluationResult};
///
/// assert_eq!(evaluate_with_substitution("2x+1", 3.0), EvaluationResult::Number(7.0));
/// assert_eq!(evaluate_with_substitution("x*x", -2.0), EvaluationResult::Number(4.0));
/// ```
pub fn evaluate_with_substitution(expr: &str, value: f64) -> EvaluationResult {
    evaluate_with_variable(expr, DEFAULT_VARIABLE, value)
}

/// Like [`evaluate_with_substitution`] but with a caller-chosen variable letter.
///
/// The value is substituted as an operand token rather than as text, so
/// negative sample points stay representable in a grammar without unary minus.
pub fn evaluate_with_variable(expr: &str, variable: char, value: f64) -> EvaluationResult {
    let expanded = insert_implicit_multiplication(expr, variable);
    trace!("substituted {}={} into {:?}", variable, value, expanded);
    match tokenize_with(&expanded, Some((variable, value))) {
        Some(tokens) => reduce(&tokens),
        None => EvaluationResult::NoResult,
    }
}

fn insert_implicit_multiplication(expr: &str, variable: char) -> String {
    let mut out = String::with_capacity(expr.len() + 4);
    // Last character that was not whitespace.
    let mut previous: Option<char> = None;

    for c in expr.chars() {
        if let Some(prev) = previous {
            let prev_is_operand = prev.is_ascii_digit() || prev == '.' || prev == '%' || prev == variable;
            let adjacent = (c == variable && prev_is_operand)
                || ((c.is_ascii_digit() || c == '.') && prev == variable);
            if adjacent {
                out.push('*');
            }
        }
        out.push(c);
        if !c.is_whitespace() {
            previous = Some(c);
        }
    }

    out
}

fn reduce(tokens: &[Token]) -> EvaluationResult {
    let mut numbers: Vec<Term> = Vec::with_capacity(tokens.len() / 2 + 1);
    let mut operators: Vec<Operator> = Vec::with_capacity(tokens.len() / 2);

    match tokens.first() {
        Some(Token::Number { .. }) => {}
        _ => return EvaluationResult::NoResult,
    }

    for token in tokens {
        match *token {
            Token::Number { value, is_percent } => numbers.push(Term { value, is_percent }),
            Token::Operator(op) => operators.push(op),
        }
    }

    if tokens.len() == 1 {
        return EvaluationResult::Number(numbers[0].resolved());
    }

    if operators.len() + 1 != numbers.len() {
        return EvaluationResult::NoResult;
    }

    for multiplicative in [true, false] {
        while let Some(i) = operators
            .iter()
            .position(|op| op.is_multiplicative() == multiplicative)
        {
            let combined = match combine(numbers[i], operators[i], numbers[i + 1]) {
                Some(v) => v,
                None => return EvaluationResult::ErrorMarker,
            };
            numbers[i] = Term::plain(combined);
            numbers.remove(i + 1);
            operators.remove(i);
        }
    }

    let result = numbers[0].resolved();
    if !result.is_finite() {
        return EvaluationResult::ErrorMarker;
    }
    EvaluationResult::Number(round_to_precision(result))
}
