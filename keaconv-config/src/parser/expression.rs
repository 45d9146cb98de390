//! Binary expressions
//!
//! Precedence climbing over the operands produced by `parse_primary`.
//! Levels, loosest first:
//!
//! | Strength | Operators                 |
//! |----------|---------------------------|
//! | 1        | `&` `\|` `^`              |
//! | 2        | `and` `or`                |
//! | 3        | `=` `!=` `~=` `~~`        |
//! | 4        | `+` `-`                   |
//! | 5        | `*` `/` `%`               |
//!
//! All operators are left associative.

use crate::parser::context::{
    classify, is_boolean_expression, is_data_expression, is_numeric_expression, Context,
};
use crate::parser::keyword::Keyword;
use crate::parser::lexer::Token;
use crate::parser::parser::{tagged, ParseError, ParseResult, Parser};
use keaconv_core::{Element, Map};

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    RegexMatch,
    IregexMatch,
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    BinaryAnd,
    BinaryOr,
    BinaryXor,
}

impl BinaryOp {
    /// Key of the produced node
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Equal => "equal",
            BinaryOp::NotEqual => "not-equal",
            BinaryOp::RegexMatch => "regex-match",
            BinaryOp::IregexMatch => "iregex-match",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Remainder => "remainder",
            BinaryOp::BinaryAnd => "binary-and",
            BinaryOp::BinaryOr => "binary-or",
            BinaryOp::BinaryXor => "binary-xor",
        }
    }

    /// Binding strength, higher binds tighter
    pub fn strength(self) -> u8 {
        match self {
            BinaryOp::BinaryAnd | BinaryOp::BinaryOr | BinaryOp::BinaryXor => 1,
            BinaryOp::And | BinaryOp::Or => 2,
            BinaryOp::Equal | BinaryOp::NotEqual | BinaryOp::RegexMatch | BinaryOp::IregexMatch => 3,
            BinaryOp::Add | BinaryOp::Subtract => 4,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Remainder => 5,
        }
    }

    /// Context used for the right operand when the left one says nothing
    pub fn operand_context(self) -> Context {
        match self {
            BinaryOp::Equal | BinaryOp::NotEqual | BinaryOp::RegexMatch | BinaryOp::IregexMatch => {
                Context::Data
            }
            BinaryOp::And | BinaryOp::Or => Context::Boolean,
            _ => Context::Numeric,
        }
    }
}

/// `element` can stand where an expression of `expected` type is needed
fn satisfies(expected: Context, element: &Element) -> bool {
    if classify(element) == Context::Any {
        return true;
    }
    match expected {
        Context::Any => true,
        Context::Boolean => is_boolean_expression(element),
        Context::Data => is_data_expression(element),
        Context::Numeric => is_numeric_expression(element),
        Context::DataOrNumeric => is_data_expression(element) || is_numeric_expression(element),
    }
}

impl Parser {
    /// Parse a full expression. `Ok(None)` when the current token cannot
    /// start one.
    pub(crate) fn parse_expression(&mut self, context: Context) -> ParseResult<Option<Element>> {
        match self.parse_primary(context)? {
            Some(lhs) => self.parse_binary(lhs, 0).map(Some),
            None => Ok(None),
        }
    }

    /// An expression must follow
    pub(crate) fn expect_expression(&mut self, context: Context) -> ParseResult<Element> {
        match self.parse_expression(context)? {
            Some(expression) => Ok(expression),
            None => Err(self.syntax("expression expected")),
        }
    }

    /// An expression of type `expected` must follow. Variable references
    /// and function calls are accepted everywhere.
    pub(crate) fn require_expression(&mut self, expected: Context) -> ParseResult<Element> {
        let position = self.position();
        match self.parse_typed_expression(expected)? {
            Some(expression) => Ok(expression),
            None => Err(ParseError::NotAnExpression {
                position,
                expected: expected.to_string(),
            }),
        }
    }

    /// Like [`Parser::parse_expression`], rejecting results of the wrong
    /// type
    pub(crate) fn parse_typed_expression(
        &mut self,
        expected: Context,
    ) -> ParseResult<Option<Element>> {
        let position = self.position();
        let Some(expression) = self.parse_expression(expected)? else {
            return Ok(None);
        };
        if !satisfies(expected, &expression) {
            return Err(ParseError::NotAnExpression {
                position,
                expected: expected.to_string(),
            });
        }
        Ok(Some(expression))
    }

    pub(crate) fn parse_boolean_expression(&mut self) -> ParseResult<Option<Element>> {
        self.parse_typed_expression(Context::Boolean)
    }

    pub(crate) fn parse_data_expression(&mut self) -> ParseResult<Option<Element>> {
        self.parse_typed_expression(Context::Data)
    }

    pub(crate) fn parse_numeric_expression(&mut self) -> ParseResult<Option<Element>> {
        self.parse_typed_expression(Context::Numeric)
    }

    /// Operator at the current token and the number of tokens it spans
    fn peek_operator(&self) -> ParseResult<Option<(BinaryOp, usize)>> {
        let op = match self.peek() {
            Token::Equal => (BinaryOp::Equal, 1),
            Token::Bang => {
                if !matches!(self.stream.peek_nth(1), Token::Equal) {
                    return Err(self.syntax("! in boolean context without ="));
                }
                (BinaryOp::NotEqual, 2)
            }
            Token::Tilde => match self.stream.peek_nth(1) {
                Token::Tilde => (BinaryOp::IregexMatch, 2),
                Token::Equal => (BinaryOp::RegexMatch, 2),
                _ => return Err(self.syntax("expecting ~= or ~~ operator")),
            },
            Token::Keyword(Keyword::And) => (BinaryOp::And, 1),
            Token::Keyword(Keyword::Or) => (BinaryOp::Or, 1),
            Token::Plus => (BinaryOp::Add, 1),
            Token::Minus => (BinaryOp::Subtract, 1),
            Token::Asterisk => (BinaryOp::Multiply, 1),
            Token::Slash => (BinaryOp::Divide, 1),
            Token::Percent => (BinaryOp::Remainder, 1),
            Token::Ampersand => (BinaryOp::BinaryAnd, 1),
            Token::Pipe => (BinaryOp::BinaryOr, 1),
            Token::Caret => (BinaryOp::BinaryXor, 1),
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    /// Absorb every following operator stronger than `floor` into `lhs`
    fn parse_binary(&mut self, mut lhs: Element, floor: u8) -> ParseResult<Element> {
        while let Some((op, width)) = self.peek_operator()? {
            if op.strength() <= floor {
                break;
            }
            let position = self.position();
            for _ in 0..width {
                self.stream.skip();
            }

            let context = match classify(&lhs) {
                Context::Any => op.operand_context(),
                context => context,
            };
            let Some(rhs) = self.parse_primary(context)? else {
                return Err(self.syntax("expecting right-hand side"));
            };
            let rhs = self.parse_binary(rhs, op.strength())?;
            lhs = combine(op, lhs, rhs, position)?;
        }
        Ok(lhs)
    }
}

/// Check operand types and build `{op: {left, right}}`
fn combine(op: BinaryOp, lhs: Element, rhs: Element, position: usize) -> ParseResult<Element> {
    let left = classify(&lhs);
    let right = classify(&rhs);
    let incompatible = |message: &str| ParseError::IncompatibleOperandTypes {
        position,
        message: message.to_string(),
    };

    if left != Context::Any && right != Context::Any && left != right {
        return Err(incompatible("illegal expression relating different types"));
    }
    match op {
        BinaryOp::Equal | BinaryOp::NotEqual => {
            if !matches!(right, Context::Data | Context::Numeric | Context::Any) {
                return Err(incompatible("expecting data/numeric expression"));
            }
        }
        BinaryOp::RegexMatch | BinaryOp::IregexMatch => {
            if right != Context::Data {
                return Err(incompatible("expecting data expression"));
            }
        }
        BinaryOp::And | BinaryOp::Or => {
            if !matches!(right, Context::Boolean | Context::Any) {
                return Err(incompatible("expecting boolean expressions"));
            }
        }
        _ => {
            if !matches!(right, Context::Numeric | Context::Any) {
                return Err(incompatible("expecting numeric expressions"));
            }
        }
    }

    let mut operands = Map::new();
    operands.set("left", lhs);
    operands.set("right", rhs);
    Ok(tagged(op.name(), Element::map(operands).skipped()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parser::testing::parser;

    fn expression(source: &str, context: Context) -> Element {
        parser(source).parse_expression(context).unwrap().unwrap()
    }

    fn operands(element: &Element, op: &str) -> (Element, Element) {
        let node = element.as_map().unwrap().get(op).unwrap();
        assert!(node.skip);
        let map = node.as_map().unwrap();
        (map.get("left").unwrap().clone(), map.get("right").unwrap().clone())
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let e = expression("1 + 2 * 3", Context::Numeric);
        let (left, right) = operands(&e, "add");
        assert_eq!(left.as_integer(), Some(1));
        let (l, r) = operands(&right, "multiply");
        assert_eq!(l.as_integer(), Some(2));
        assert_eq!(r.as_integer(), Some(3));
    }

    #[test]
    fn test_left_associative() {
        let e = expression("10 - 2 - 3", Context::Numeric);
        let (left, right) = operands(&e, "subtract");
        assert_eq!(right.as_integer(), Some(3));
        let (l, r) = operands(&left, "subtract");
        assert_eq!(l.as_integer(), Some(10));
        assert_eq!(r.as_integer(), Some(2));
    }

    #[test]
    fn test_comparisons_bind_tighter_than_and() {
        let e = expression(r#"a = "x" and b != "y""#, Context::Boolean);
        let (left, right) = operands(&e, "and");
        assert!(left.as_map().unwrap().contains("equal"));
        assert!(right.as_map().unwrap().contains("not-equal"));
        assert_eq!(classify(&e), Context::Boolean);
    }

    #[test]
    fn test_bitwise_operators_are_loosest() {
        let e = expression("1 & 2 | 3", Context::Numeric);
        let (left, right) = operands(&e, "binary-or");
        assert_eq!(right.as_integer(), Some(3));
        operands(&left, "binary-and");

        let e = expression("1 | 2 + 3", Context::Numeric);
        let (left, right) = operands(&e, "binary-or");
        assert_eq!(left.as_integer(), Some(1));
        operands(&right, "add");
    }

    #[test]
    fn test_regex_operators() {
        let e = expression(r#"option host-name ~~ "^foo""#, Context::Boolean);
        operands(&e, "iregex-match");
        let e = expression(r#"option host-name ~= "^foo""#, Context::Boolean);
        operands(&e, "regex-match");

        let mut p = parser(r#"option host-name ~ "x""#);
        assert!(p.parse_expression(Context::Boolean).is_err());
    }

    #[test]
    fn test_bang_needs_equal() {
        let mut p = parser(r#"a ! "x""#);
        let err = p.parse_expression(Context::Boolean).unwrap_err();
        assert!(err.to_string().contains("! in boolean context without ="));
    }

    #[test]
    fn test_incompatible_operands() {
        let mut p = parser(r#"extract-int(option host-name, 8) + "a""#);
        assert!(matches!(
            p.parse_expression(Context::Numeric),
            Err(ParseError::IncompatibleOperandTypes { .. })
        ));

        let mut p = parser(r#"known and "a""#);
        assert!(matches!(
            p.parse_expression(Context::Boolean),
            Err(ParseError::IncompatibleOperandTypes { .. })
        ));
    }

    #[test]
    fn test_any_operands_are_accepted() {
        let e = expression("a + b", Context::Numeric);
        operands(&e, "add");
        let e = expression("x and known", Context::Boolean);
        operands(&e, "and");
    }

    #[test]
    fn test_missing_right_hand_side() {
        let mut p = parser("1 + ;");
        assert!(p.parse_expression(Context::Numeric).is_err());
    }

    #[test]
    fn test_binary_nodes_are_not_counted() {
        let mut p = parser("1 + 2");
        p.parse_expression(Context::Numeric).unwrap();
        assert_eq!(p.session.issues(), 0);
    }

    #[test]
    fn test_typed_expressions() {
        let mut p = parser(r#""x";"#);
        assert!(matches!(
            p.require_expression(Context::Boolean),
            Err(ParseError::NotAnExpression { .. })
        ));

        let mut p = parser("my-var");
        assert!(p.parse_boolean_expression().unwrap().is_some());

        let mut p = parser(";");
        assert!(p.parse_data_expression().unwrap().is_none());

        let mut p = parser("lease-time");
        assert!(p.parse_numeric_expression().unwrap().is_some());
    }
}
