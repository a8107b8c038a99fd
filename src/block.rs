use crate::expression::Operator;
use crate::numeric::format_number;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref REFERENCE_REGEX: Regex = Regex::new(r"^#(\d+)$").unwrap();
    static ref LITERAL_PREFIX_REGEX: Regex = Regex::new(r"^-?(\d+\.?\d*|\.\d+)").unwrap();
}

/// Parsed meaning of one operand slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Literal { value: f64, is_percent: bool },
    /// `#k`: the result of the k-th block (1-based) in current list order.
    Reference(usize),
    Invalid,
}

impl Operand {
    /// Reads slot text once into its operand shape.
    ///
    /// `#k` is a back-reference. Anything else is reduced to digits, `.`,
    /// `-` and `%` and its leading number is taken, so `"$12.50"` reads as
    /// `12.5`. A trailing `%` on the raw text marks a percentage.
    ///
    /// # Examples
    /// ```
    /// use blockcalc::block::Operand;
    ///
    /// assert_eq!(Operand::parse("#2"), Operand::Reference(2));
    /// assert_eq!(Operand::parse("8%"), Operand::Literal { value: 8.0, is_percent: true });
    /// assert_eq!(Operand::parse("abc"), Operand::Invalid);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Some(captures) = REFERENCE_REGEX.captures(trimmed) {
            return match captures[1].parse::<usize>() {
                Ok(k) => Operand::Reference(k),
                Err(_) => Operand::Invalid,
            };
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '%'))
            .collect();

        match LITERAL_PREFIX_REGEX
            .find(&cleaned)
            .and_then(|m| m.as_str().parse::<f64>().ok())
        {
            Some(value) if value.is_finite() => Operand::Literal {
                value,
                is_percent: raw.ends_with('%'),
            },
            _ => Operand::Invalid,
        }
    }
}

/// An operand slot: the text the user typed plus its parsed form.
///
/// Serialized as the raw text alone; the parsed form is rebuilt on load.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(from = "String", into = "String")]
pub struct Slot {
    raw: String,
    operand: Operand,
}

impl Slot {
    pub fn new(raw: &str) -> Self {
        Slot {
            raw: raw.to_string(),
            operand: Operand::parse(raw),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    pub fn set(&mut self, raw: &str) {
        self.raw = raw.to_string();
        self.operand = Operand::parse(raw);
    }
}

impl From<String> for Slot {
    fn from(raw: String) -> Self {
        let operand = Operand::parse(&raw);
        Slot { raw, operand }
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.raw
    }
}

/// Reads an operator field; blank or unrecognised text means `+`.
pub fn parse_operator(raw: &str) -> Operator {
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Operator::from_symbol(c).unwrap_or(Operator::Add),
        _ => Operator::Add,
    }
}

/// Result of one block after recomputation.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub enum BlockResult {
    Value(f64),
    /// Division by zero or a non-finite outcome.
    Error,
    /// An operand could not be resolved; shown as `?`.
    Unresolved,
}

impl BlockResult {
    pub fn value(&self) -> Option<f64> {
        match self {
            BlockResult::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn display(&self, error_label: &str, unresolved_label: &str) -> String {
        match self {
            BlockResult::Value(v) => format_number(*v),
            BlockResult::Error => error_label.to_string(),
            BlockResult::Unresolved => unresolved_label.to_string(),
        }
    }
}

/// One computation step of a diagram: `left operator right`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DiagramBlock {
    /// Stable identity for the UI. Not used to resolve references.
    pub id: u32,
    pub left: Slot,
    pub operator: Operator,
    pub right: Slot,
}

impl DiagramBlock {
    pub fn create(id: u32, left: &str, operator: &str, right: &str) -> Self {
        DiagramBlock {
            id,
            left: Slot::new(left),
            operator: parse_operator(operator),
            right: Slot::new(right),
        }
    }

    pub fn set_left(&mut self, raw: &str) {
        self.left.set(raw);
    }

    pub fn set_right(&mut self, raw: &str) {
        self.right.set(raw);
    }

    pub fn set_operator(&mut self, raw: &str) {
        self.operator = parse_operator(raw);
    }

    /// Positions (1-based) this block refers to, left slot first.
    pub fn references(&self) -> Vec<usize> {
        [&self.left, &self.right]
            .iter()
            .filter_map(|slot| match slot.operand() {
                Operand::Reference(k) => Some(*k),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literals() {
        assert_eq!(
            Operand::parse(" 12.5 "),
            Operand::Literal {
                value: 12.5,
                is_percent: false
            }
        );
        assert_eq!(
            Operand::parse("-3"),
            Operand::Literal {
                value: -3.0,
                is_percent: false
            }
        );
        assert_eq!(
            Operand::parse("$12.50"),
            Operand::Literal {
                value: 12.5,
                is_percent: false
            }
        );
        assert_eq!(
            Operand::parse(".5"),
            Operand::Literal {
                value: 0.5,
                is_percent: false
            }
        );
    }

    #[test]
    fn parse_takes_leading_number_only() {
        assert_eq!(
            Operand::parse("12-3"),
            Operand::Literal {
                value: 12.0,
                is_percent: false
            }
        );
    }

    #[test]
    fn percent_flag_needs_trailing_percent_on_raw_text() {
        assert_eq!(
            Operand::parse(" 8%"),
            Operand::Literal {
                value: 8.0,
                is_percent: true
            }
        );
        assert_eq!(
            Operand::parse("8% "),
            Operand::Literal {
                value: 8.0,
                is_percent: false
            }
        );
        assert_eq!(
            Operand::parse("8%x"),
            Operand::Literal {
                value: 8.0,
                is_percent: false
            }
        );
    }

    #[test]
    fn parse_invalid() {
        assert_eq!(Operand::parse(""), Operand::Invalid);
        assert_eq!(Operand::parse("--5"), Operand::Invalid);
        assert_eq!(Operand::parse("#"), Operand::Invalid);
        assert_eq!(Operand::parse("#a"), Operand::Invalid);
    }

    #[test]
    fn parse_references() {
        assert_eq!(Operand::parse("#1"), Operand::Reference(1));
        assert_eq!(Operand::parse(" #12 "), Operand::Reference(12));
        assert_eq!(Operand::parse("#0"), Operand::Reference(0));
    }

    #[test]
    fn operator_defaults_to_add() {
        assert_eq!(parse_operator(""), Operator::Add);
        assert_eq!(parse_operator("  "), Operator::Add);
        assert_eq!(parse_operator("x"), Operator::Add);
        assert_eq!(parse_operator("**"), Operator::Add);
        assert_eq!(parse_operator(" / "), Operator::Divide);
        assert_eq!(parse_operator("-"), Operator::Subtract);
    }

    #[test]
    fn slot_serializes_as_raw_text() {
        let slot = Slot::new("#3");
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "\"#3\"");
        let back: Slot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.operand(), &Operand::Reference(3));
    }

    #[test]
    fn block_references() {
        let block = DiagramBlock::create(7, "#1", "+", "#2");
        assert_eq!(block.references(), vec![1, 2]);
        let block = DiagramBlock::create(8, "5", "*", "20");
        assert!(block.references().is_empty());
    }
}
