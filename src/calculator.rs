use crate::expression::{EvaluationResult, Operator, evaluate};
use crate::numeric::format_number;
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalculatorState {
    /// Digits typed go into the display buffer.
    Entering,
    /// An operator was chosen; the next digit starts a fresh entry.
    PendingOperator,
    /// `=` was pressed; the display holds the final value.
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Decimal,
    Percent,
    Operator(Operator),
    Equals,
    Clear,
    Backspace,
}

impl Key {
    /// Keyboard mapping: digits, `.`, `%`, `+ - * /`, `=`, `c` to clear, `<` to delete.
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            '0'..='9' => Some(Key::Digit(c)),
            '.' => Some(Key::Decimal),
            '%' => Some(Key::Percent),
            '=' => Some(Key::Equals),
            'c' | 'C' => Some(Key::Clear),
            '<' => Some(Key::Backspace),
            _ => Operator::from_symbol(c).map(Key::Operator),
        }
    }
}

/// The keypad calculator.
///
/// Holds at most one pending operation. Whenever `=` or a further operator is
/// pressed the pending value, operator and display are joined into a single
/// expression and handed to [`evaluate`], so the keypad follows the same
/// percent rules as everything else (`100 + 8 % =` gives `108`).
#[derive(Clone, Debug)]
pub struct Calculator {
    display: String,
    pending: Option<(String, Operator)>,
    state: CalculatorState,
    showing_error: bool,
    error_label: String,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new("Error")
    }
}

impl Calculator {
    pub fn new(error_label: &str) -> Self {
        Calculator {
            display: "0".to_string(),
            pending: None,
            state: CalculatorState::Entering,
            showing_error: false,
            error_label: error_label.to_string(),
        }
    }

    pub fn display(&self) -> &str {
        if self.showing_error {
            &self.error_label
        } else {
            &self.display
        }
    }

    pub fn state(&self) -> CalculatorState {
        self.state
    }

    pub fn is_error(&self) -> bool {
        self.showing_error
    }

    pub fn pending(&self) -> Option<(&str, Operator)> {
        self.pending.as_ref().map(|(value, op)| (value.as_str(), *op))
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(d) => self.press_digit(d),
            Key::Decimal => self.press_decimal(),
            Key::Percent => self.press_percent(),
            Key::Operator(op) => self.press_operator(op),
            Key::Equals => self.press_equals(),
            Key::Clear => self.clear(),
            Key::Backspace => self.backspace(),
        }
    }

    /// Feeds every recognised key in `keys`, ignoring anything else.
    pub fn press_all(&mut self, keys: &str) {
        for key in keys.chars().filter_map(Key::from_char) {
            self.press(key);
        }
    }

    fn start_entry(&mut self, text: &str) {
        self.display = text.to_string();
        self.showing_error = false;
        self.state = CalculatorState::Entering;
    }

    fn press_digit(&mut self, digit: char) {
        if self.showing_error || self.state != CalculatorState::Entering {
            self.start_entry(&digit.to_string());
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else if !self.display.ends_with('%') {
            self.display.push(digit);
        }
    }

    fn press_decimal(&mut self) {
        if self.showing_error || self.state != CalculatorState::Entering {
            self.start_entry("0.");
        } else if !self.display.contains('.') && !self.display.ends_with('%') {
            self.display.push('.');
        }
    }

    fn press_percent(&mut self) {
        if !self.showing_error
            && self.state == CalculatorState::Entering
            && !self.display.ends_with('%')
        {
            self.display.push('%');
        }
    }

    fn press_operator(&mut self, op: Operator) {
        if self.showing_error {
            return;
        }

        if self.state == CalculatorState::PendingOperator {
            if let Some(pending) = self.pending.as_mut() {
                pending.1 = op;
                return;
            }
        }

        if self.state == CalculatorState::Entering && self.pending.is_some() {
            match self.run_pending() {
                EvaluationResult::ErrorMarker => {
                    self.show_error();
                    return;
                }
                EvaluationResult::Number(v) => self.display = format_number(v),
                EvaluationResult::NoResult => {}
            }
        }

        self.pending = Some((self.display.clone(), op));
        self.state = CalculatorState::PendingOperator;
    }

    fn press_equals(&mut self) {
        if self.showing_error {
            return;
        }

        let result = if self.pending.is_some() {
            self.run_pending()
        } else {
            evaluate(&self.display)
        };
        self.pending = None;

        match result {
            EvaluationResult::Number(v) => self.display = format_number(v),
            EvaluationResult::ErrorMarker => {
                self.show_error();
                return;
            }
            EvaluationResult::NoResult => {}
        }
        self.state = CalculatorState::Result;
    }

    fn run_pending(&self) -> EvaluationResult {
        let Some((value, op)) = &self.pending else {
            return EvaluationResult::NoResult;
        };
        // The grammar has no unary minus; 0-a reads the same under both passes.
        let lhs = if value.starts_with('-') {
            format!("0{}", value)
        } else {
            value.clone()
        };
        let expression = format!("{}{}{}", lhs, op.symbol(), self.display);
        let result = evaluate(&expression);
        debug!("keypad {:?} -> {:?}", expression, result);
        result
    }

    fn show_error(&mut self) {
        self.showing_error = true;
        self.pending = None;
        self.display = "0".to_string();
        self.state = CalculatorState::Result;
    }

    pub fn clear(&mut self) {
        self.display = "0".to_string();
        self.pending = None;
        self.showing_error = false;
        self.state = CalculatorState::Entering;
    }

    fn backspace(&mut self) {
        if self.showing_error || self.state != CalculatorState::Entering {
            return;
        }
        self.display.pop();
        if self.display.is_empty() || self.display == "-" {
            self.display = "0".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(keys: &str) -> Calculator {
        let mut calc = Calculator::default();
        calc.press_all(keys);
        calc
    }

    #[test]
    fn simple_sum() {
        let calc = run("12+8=");
        assert_eq!(calc.display(), "20");
        assert_eq!(calc.state(), CalculatorState::Result);
    }

    #[test]
    fn chained_operators_evaluate_as_they_go() {
        let calc = run("2+3*");
        assert_eq!(calc.display(), "5");
        assert_eq!(calc.state(), CalculatorState::PendingOperator);
        assert_eq!(calc.pending(), Some(("5", Operator::Multiply)));
        let mut calc = calc;
        calc.press_all("4=");
        assert_eq!(calc.display(), "20");
    }

    #[test]
    fn operator_replaces_pending_operator() {
        let calc = run("9+-3=");
        assert_eq!(calc.display(), "6");
    }

    #[test]
    fn percent_key() {
        assert_eq!(run("100+8%=").display(), "108");
        assert_eq!(run("100-8%=").display(), "92");
        assert_eq!(run("50%=").display(), "0.5");
    }

    #[test]
    fn negative_result_can_be_chained() {
        let calc = run("3-5=*2=");
        assert_eq!(calc.display(), "-4");
        assert_eq!(run("3-5=+10=").display(), "8");
    }

    #[test]
    fn divide_by_zero_then_digit_recovers() {
        let mut calc = run("7/0=");
        assert!(calc.is_error());
        assert_eq!(calc.display(), "Error");
        calc.press_all("+");
        assert!(calc.is_error());
        calc.press_all("4");
        assert!(!calc.is_error());
        assert_eq!(calc.display(), "4");
        assert_eq!(calc.state(), CalculatorState::Entering);
    }

    #[test]
    fn digit_after_result_starts_fresh() {
        let mut calc = run("2*3=");
        assert_eq!(calc.display(), "6");
        calc.press_all("7");
        assert_eq!(calc.display(), "7");
        assert_eq!(calc.pending(), None);
    }

    #[test]
    fn operator_after_result_uses_result() {
        let calc = run("2*3=+1=");
        assert_eq!(calc.display(), "7");
    }

    #[test]
    fn decimal_entry() {
        assert_eq!(run("0.1+0.2=").display(), "0.3");
        assert_eq!(run("1..5").display(), "1.5");
        assert_eq!(run("+.5").display(), "0.5");
    }

    #[test]
    fn backspace_and_clear() {
        assert_eq!(run("123<").display(), "12");
        assert_eq!(run("1<").display(), "0");
        let calc = run("5+3c");
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.pending(), None);
    }
}
