use blockcalc::expression::{EvaluationResult, evaluate, evaluate_with_substitution};

// Helper function to check an expression evaluates to a number
fn assert_number(expr: &str, expected: f64) {
    let result = evaluate(expr);
    assert_eq!(
        result,
        EvaluationResult::Number(expected),
        "Expression {:?} should evaluate to {}",
        expr,
        expected
    );
    println!("✓ {:?} = {}", expr, expected);
}

fn assert_no_result(expr: &str) {
    assert_eq!(evaluate(expr), EvaluationResult::NoResult, "{:?}", expr);
    println!("✓ {:?} is not an expression", expr);
}

#[test]
fn test_basic_arithmetic() {
    assert_number("12+8", 20.0);
    assert_number("45*3", 135.0);
    assert_number("135*0.07", 9.45);
    assert_number("7-10", -3.0);
    assert_number("42", 42.0);
}

#[test]
fn test_no_result() {
    assert_no_result("");
    assert_no_result("abc");
    assert_no_result("   ");
    assert_no_result("1.2.3");
    assert_no_result("*5");
}

#[test]
fn test_error_marker() {
    assert_eq!(evaluate("10/0"), EvaluationResult::ErrorMarker);
    assert_eq!(evaluate("0/0"), EvaluationResult::ErrorMarker);
    println!("✓ Division by zero gives the error marker");
}

#[test]
fn test_percentages() {
    assert_number("100+8%", 108.0);
    assert_number("100-8%", 92.0);
    assert_number("50%", 0.5);
    assert_number("80*25%", 20.0);
    assert_number("19.99+7.5%", 21.48925);
}

#[test]
fn test_precedence() {
    assert_number("2+3*4", 14.0);
    assert_number("2*3+4", 10.0);
    assert_number("20/4/5", 1.0);
    assert_number("10-4-3", 3.0);
    assert_number("1+2*3-4/2", 5.0);
}

#[test]
fn test_annotated_text() {
    assert_number("Tax: 135*0.07 =", 9.45);
    assert_number("3 apples * 4 boxes", 12.0);
}

#[test]
fn test_rounding() {
    assert_number("0.1+0.2", 0.3);
    assert_number("1/3", 0.3333333333);
}

#[test]
fn test_idempotence() {
    for expr in ["2+3*4", "100+8%", "10/0", "abc", "1/3"] {
        assert_eq!(evaluate(expr), evaluate(expr));
    }
    println!("✓ Re-evaluating gives identical results");
}

#[test]
fn test_substitution() {
    assert_eq!(
        evaluate_with_substitution("2x", 3.0),
        EvaluationResult::Number(6.0)
    );
    assert_eq!(
        evaluate_with_substitution("x2+1", 3.0),
        EvaluationResult::Number(7.0)
    );
    assert_eq!(
        evaluate_with_substitution("y = x*x - 4", 3.0),
        EvaluationResult::Number(5.0)
    );
    assert_eq!(
        evaluate_with_substitution("2x+1", -3.0),
        EvaluationResult::Number(-5.0)
    );
    assert_eq!(
        evaluate_with_substitution("1/x", 0.0),
        EvaluationResult::ErrorMarker
    );
    println!("✓ Variable substitution works");
}

#[test]
fn test_substitution_keeps_percent_suffix() {
    assert_eq!(
        evaluate_with_substitution("x%", 50.0),
        EvaluationResult::Number(0.5)
    );
    assert_eq!(evaluate_with_substitution("x%", 50.0), evaluate("50%"));
    assert_eq!(
        evaluate_with_substitution("200+x%", 10.0),
        EvaluationResult::Number(220.0)
    );
    assert_eq!(evaluate_with_substitution("200+x%", 10.0), evaluate("200+10%"));
    assert_eq!(
        evaluate_with_substitution("200-x %", 10.0),
        EvaluationResult::Number(180.0)
    );
    println!("✓ A % after the variable marks it as a percentage");
}
