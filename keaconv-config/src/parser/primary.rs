//! Expressions without binary operators
//!
//! Every non-literal form is kept in the tree and marked skipped.

use crate::parser::context::{classify, is_boolean_expression, Context};
use crate::parser::keyword::Keyword;
use crate::parser::lexer::Token;
use crate::parser::numeric::parse_integer;
use crate::parser::parser::{tagged, ParseError, ParseResult, Parser};
use keaconv_core::{Element, Map};

/// Symbolic constants replaced by their value
const CONSTANTS: &[(Keyword, &str, i64)] = &[
    (Keyword::Formerr, "FORMERR", 1),
    (Keyword::Noerror, "ISC_R_SUCCESS", 0),
    (Keyword::Notauth, "DHCP_R_NOTAUTH", 393237),
    (Keyword::Notimp, "ISC_R_NOTIMPLEMENTED", 27),
    (Keyword::Notzone, "DHCP_R_NOTZONE", 393238),
    (Keyword::Nxdomain, "DHCP_R_NXDOMAIN", 393231),
    (Keyword::Nxrrset, "DHCP_R_NXRRSET", 393236),
    (Keyword::Refused, "DHCP_R_REFUSED", 393233),
    (Keyword::Servfail, "DHCP_R_SERVFAIL", 393230),
    (Keyword::Yxdomain, "DHCP_R_YXDOMAIN", 393234),
    (Keyword::Yxrrset, "DHCP_R_YXRRSET", 393235),
    (Keyword::Booting, "S_INIT", 2),
    (Keyword::Reboot, "S_REBOOTING", 1),
    (Keyword::Select, "S_SELECTING", 3),
    (Keyword::Request, "S_REQUESTING", 4),
    (Keyword::Bound, "S_BOUND", 5),
    (Keyword::Renew, "S_RENEWING", 6),
    (Keyword::Rebind, "S_REBINDING", 7),
];

/// Operand-less value sources
fn leaf_tag(keyword: Keyword) -> Option<&'static str> {
    let tag = match keyword {
        Keyword::Static => "static",
        Keyword::Known => "known",
        Keyword::Hardware => "hardware",
        Keyword::LeasedAddress => "leased-address",
        Keyword::ClientState => "client-state",
        Keyword::Filename => "filename",
        Keyword::ServerName => "server-name",
        Keyword::LeaseTime => "lease-time",
        Keyword::Null => "null",
        Keyword::HostDeclName => "host-decl-name",
        _ => return None,
    };
    Some(tag)
}

impl Parser {
    /// Parse one operand. `Ok(None)` when the current token cannot start
    /// an expression; nothing is consumed in that case.
    pub(crate) fn parse_primary(&mut self, context: Context) -> ParseResult<Option<Element>> {
        let element = match self.peek() {
            Token::Keyword(keyword) => {
                let keyword = *keyword;
                return self.parse_keyword_primary(keyword, context);
            }
            Token::String(_) => Element::string(self.stream.next().text),
            Token::ParenOpen => {
                self.stream.skip();
                let inner = self.expect_expression(context)?;
                self.close_paren()?;
                inner
            }
            Token::Number(_) if matches!(context, Context::Numeric | Context::DataOrNumeric) => {
                let position = self.position();
                let lexed = self.stream.next();
                let value =
                    parse_integer(&lexed.text).map_err(|e| ParseError::number(e, position))?;
                Element::integer(value)
            }
            Token::Number(_) | Token::NumberOrName(_) => Element::string(self.parse_cshl()?),
            Token::Name(_) => self.parse_reference()?,
            _ => return Ok(None),
        };
        Ok(Some(element))
    }

    fn parse_keyword_primary(
        &mut self,
        keyword: Keyword,
        context: Context,
    ) -> ParseResult<Option<Element>> {
        if let Some(tag) = leaf_tag(keyword) {
            self.stream.skip();
            let mut leaf = Element::null();
            self.session.flag(&mut leaf);
            return Ok(Some(tagged(tag, leaf)));
        }
        if let Some((_, name, value)) = CONSTANTS.iter().find(|(k, _, _)| *k == keyword) {
            self.stream.skip();
            let constant =
                Element::integer(*value).with_comment(format!("/// constant {}({})", name, value));
            return Ok(Some(constant));
        }

        let element = match keyword {
            Keyword::Check => {
                self.stream.skip();
                let mut name = Element::string(self.expect_string()?);
                self.session.flag(&mut name);
                tagged("check", name)
            }
            Keyword::Not => {
                self.stream.skip();
                let Some(mut operand) = self.parse_primary(Context::Boolean)? else {
                    return Err(self.syntax("expression expected"));
                };
                if !is_boolean_expression(&operand) && classify(&operand) != Context::Any {
                    return Err(self.syntax("boolean expression expected"));
                }
                self.session.flag_once(&mut operand);
                tagged("not", operand)
            }
            Keyword::Exists | Keyword::Option | Keyword::ConfigOption => {
                self.stream.skip();
                let option = self.parse_option_name(false)?;
                let mut reference = Map::new();
                reference.set("universe", option.space.as_str());
                reference.set("name", option.name.as_str());
                let mut reference = Element::map(reference);
                self.session.flag(&mut reference);
                let tag = match keyword {
                    Keyword::Exists => "exists",
                    Keyword::Option => "option",
                    _ => "config-option",
                };
                tagged(tag, reference)
            }
            Keyword::Substring => self.parse_builtin(
                "substring",
                &[
                    ("expression", Context::Data),
                    ("offset", Context::Numeric),
                    ("length", Context::Numeric),
                ],
            )?,
            Keyword::Suffix => self.parse_builtin(
                "suffix",
                &[("expression", Context::Data), ("length", Context::Numeric)],
            )?,
            Keyword::BinaryToAscii => self.parse_builtin(
                "binary-to-ascii",
                &[
                    ("base", Context::Numeric),
                    ("width", Context::Numeric),
                    ("separator", Context::Data),
                    ("buffer", Context::Data),
                ],
            )?,
            Keyword::Reverse => self.parse_builtin(
                "reverse",
                &[("width", Context::Numeric), ("buffer", Context::Data)],
            )?,
            Keyword::Packet => self.parse_builtin(
                "packet",
                &[("offset", Context::Numeric), ("length", Context::Numeric)],
            )?,
            Keyword::V6relay => self.parse_builtin(
                "v6relay",
                &[("relay", Context::Numeric), ("relay-option", Context::Data)],
            )?,
            Keyword::Lcase | Keyword::Ucase => {
                self.stream.skip();
                self.open_paren()?;
                let mut operand = self.require_expression(Context::Data)?;
                self.close_paren()?;
                self.session.flag_once(&mut operand);
                let tag = if keyword == Keyword::Lcase {
                    "lowercase"
                } else {
                    "uppercase"
                };
                tagged(tag, operand)
            }
            Keyword::Concat => {
                self.stream.skip();
                self.parse_concat()?
            }
            Keyword::PickFirstValue => {
                self.stream.skip();
                self.open_paren()?;
                let mut values = vec![self.require_expression(Context::Data)?];
                while self.eat(&Token::Comma) {
                    values.push(self.require_expression(Context::Data)?);
                }
                self.close_paren()?;
                let mut values = Element::list(values);
                self.session.flag(&mut values);
                tagged("pick-first-value", values)
            }
            Keyword::ExtractInt | Keyword::EncodeInt => {
                self.stream.skip();
                self.parse_integer_conversion(keyword == Keyword::ExtractInt)?
            }
            Keyword::Defined => {
                self.stream.skip();
                self.open_paren()?;
                let name = match self.peek() {
                    Token::Name(_) | Token::NumberOrName(_) => self.stream.next().text,
                    _ => {
                        let text = self.stream.text().to_string();
                        return Err(self.syntax(format!("{} can't be a variable name", text)));
                    }
                };
                self.close_paren()?;
                let mut name = Element::string(name);
                self.session.flag(&mut name);
                tagged("variable-exists", name)
            }
            Keyword::Gethostname => {
                self.stream.skip();
                self.open_paren()?;
                self.close_paren()?;
                let mut leaf = Element::null();
                self.session.flag(&mut leaf);
                tagged("gethostname", leaf)
            }
            Keyword::Gethostbyname => {
                self.stream.skip();
                self.open_paren()?;
                if !matches!(self.peek(), Token::String(_)) {
                    return Err(self.syntax("Expecting quoted literal: \"foo.example.com\""));
                }
                let mut host = Element::string(self.stream.next().text);
                self.session.flag(&mut host);
                self.close_paren()?;
                tagged("gethostbyname", host)
            }
            _ => {
                tracing::trace!("{} does not start an expression in {} context", keyword.as_str(), context);
                return Ok(None);
            }
        };
        Ok(Some(element))
    }

    /// Fixed arity built-in: `(arg, arg, ...)` with one context per
    /// named argument
    fn parse_builtin(&mut self, tag: &str, args: &[(&str, Context)]) -> ParseResult<Element> {
        self.stream.skip();
        self.open_paren()?;
        let mut node = Map::new();
        for (i, (name, context)) in args.iter().enumerate() {
            if i > 0 {
                self.comma()?;
            }
            let arg = self.require_expression(*context)?;
            node.set(*name, arg);
        }
        self.close_paren()?;

        let mut node = Element::map(node);
        self.session.flag(&mut node);
        Ok(tagged(tag, node))
    }

    /// `concat(a, b, c)` folds to the right: `concat(a, concat(b, c))`
    fn parse_concat(&mut self) -> ParseResult<Element> {
        self.open_paren()?;
        let mut operands = vec![self.require_expression(Context::Data)?];
        self.comma()?;
        operands.push(self.require_expression(Context::Data)?);
        while self.eat(&Token::Comma) {
            operands.push(self.require_expression(Context::Data)?);
        }
        self.close_paren()?;

        let mut right = operands.pop().unwrap_or_else(Element::null);
        while let Some(left) = operands.pop() {
            let mut pair = Map::new();
            pair.set("left", left);
            pair.set("right", right);
            if operands.is_empty() {
                let mut pair = Element::map(pair);
                self.session.flag(&mut pair);
                right = tagged("concat", pair);
            } else {
                right = tagged("concat", pair);
            }
        }
        Ok(right)
    }

    /// `extract-int(data, WIDTH)` and `encode-int(numeric, WIDTH)`
    fn parse_integer_conversion(&mut self, extract: bool) -> ParseResult<Element> {
        self.open_paren()?;
        let mut operand = if extract {
            self.require_expression(Context::Data)?
        } else {
            self.require_expression(Context::Numeric)?
        };
        self.session.flag(&mut operand);
        self.comma()?;

        let width = self.expect_number()?;
        let prefix = if extract { "extract-int" } else { "encode-int" };
        let tag = match width.text.as_str() {
            "8" | "16" | "32" => format!("{}{}", prefix, width.text),
            other => {
                return Err(ParseError::InvalidSyntax {
                    position: width.span.start,
                    message: format!("unsupported integer size {}", other),
                })
            }
        };
        self.close_paren()?;
        Ok(tagged(&tag, operand))
    }

    /// Variable reference, or function call when followed by `(`
    fn parse_reference(&mut self) -> ParseResult<Element> {
        let name = self.stream.next().text;
        if !self.eat(&Token::ParenOpen) {
            let mut reference = Element::string(name);
            self.session.flag(&mut reference);
            return Ok(tagged("variable-reference", reference));
        }

        let mut arguments = Vec::new();
        loop {
            arguments.push(self.expect_expression(Context::Any)?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.close_paren()?;

        let mut call = Map::new();
        call.set("name", name);
        call.set("arguments", Element::list(arguments));
        let mut call = Element::map(call);
        self.session.flag(&mut call);
        Ok(tagged("funcall", call))
    }

    // ========================================
    // Punctuation helpers
    // ========================================

    pub(crate) fn open_paren(&mut self) -> ParseResult<()> {
        self.expect(Token::ParenOpen).map(|_| ())
    }

    pub(crate) fn close_paren(&mut self) -> ParseResult<()> {
        self.expect(Token::ParenClose).map(|_| ())
    }

    pub(crate) fn comma(&mut self) -> ParseResult<()> {
        self.expect(Token::Comma).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::context::Context;
    use crate::parser::parser::testing::parser;
    use crate::parser::parser::ParseError;
    use keaconv_core::Element;

    fn primary(source: &str, context: Context) -> Element {
        parser(source).parse_primary(context).unwrap().unwrap()
    }

    fn inner<'a>(element: &'a Element, tag: &str) -> &'a Element {
        element.as_map().unwrap().get(tag).unwrap()
    }

    #[test]
    fn test_literals() {
        let s = primary(r#""hello""#, Context::Data);
        assert_eq!(s.as_str(), Some("hello"));
        assert!(!s.skip);

        assert_eq!(primary("42", Context::Numeric).as_integer(), Some(42));
        assert_eq!(primary("1:2:ab", Context::Data).as_str(), Some("01:02:ab"));
        assert_eq!(primary("ff", Context::Numeric).as_str(), Some("ff"));
    }

    #[test]
    fn test_not_an_expression() {
        let mut p = parser("; x");
        assert!(p.parse_primary(Context::Any).unwrap().is_none());
        let mut p = parser("subnet");
        assert!(p.parse_primary(Context::Any).unwrap().is_none());
    }

    #[test]
    fn test_substring() {
        let mut p = parser(r#"substring(option host-name, 0, 3)"#);
        let e = p.parse_primary(Context::Data).unwrap().unwrap();
        let node = inner(&e, "substring");
        assert!(node.skip);
        let map = node.as_map().unwrap();
        assert_eq!(map.get("offset").unwrap().as_integer(), Some(0));
        assert_eq!(map.get("length").unwrap().as_integer(), Some(3));
        let option = inner(map.get("expression").unwrap(), "option");
        assert_eq!(option.as_map().unwrap().get("universe").unwrap().as_str(), Some("dhcp"));
        assert_eq!(p.session.issues(), 2);
    }

    #[test]
    fn test_concat_folds_right() {
        let mut p = parser(r#"concat("a", "b", "c")"#);
        let e = p.parse_primary(Context::Data).unwrap().unwrap();
        let outer = inner(&e, "concat");
        assert!(outer.skip);
        let outer = outer.as_map().unwrap();
        assert_eq!(outer.get("left").unwrap().as_str(), Some("a"));
        let chained = inner(outer.get("right").unwrap(), "concat");
        assert!(!chained.skip);
        let chained = chained.as_map().unwrap();
        assert_eq!(chained.get("left").unwrap().as_str(), Some("b"));
        assert_eq!(chained.get("right").unwrap().as_str(), Some("c"));
        assert_eq!(p.session.issues(), 1);
    }

    #[test]
    fn test_concat_needs_two_operands() {
        let mut p = parser(r#"concat("a")"#);
        assert!(p.parse_primary(Context::Data).is_err());
    }

    #[test]
    fn test_pick_first_value_is_a_list() {
        let e = primary(r#"pick-first-value(option host-name, "x")"#, Context::Data);
        let values = inner(&e, "pick-first-value");
        assert!(values.skip);
        assert_eq!(values.as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_extract_and_encode_int() {
        let e = primary("extract-int(option dhcp-client-identifier, 16)", Context::Numeric);
        assert!(inner(&e, "extract-int16").skip);

        let e = primary("encode-int(lease-time, 32)", Context::Data);
        assert!(e.as_map().unwrap().contains("encode-int32"));

        let mut p = parser(r#"extract-int("x", 12)"#);
        let err = p.parse_primary(Context::Numeric).unwrap_err();
        assert!(err.to_string().contains("unsupported integer size 12"));
    }

    #[test]
    fn test_not_requires_boolean() {
        let e = primary("not known", Context::Boolean);
        assert!(inner(&e, "not").skip);

        let mut p = parser(r#"not "x""#);
        assert!(p.parse_primary(Context::Boolean).is_err());
    }

    #[test]
    fn test_constants_carry_comment() {
        let e = primary("nxdomain", Context::Numeric);
        assert_eq!(e.as_integer(), Some(393231));
        assert_eq!(e.comments, vec!["/// constant DHCP_R_NXDOMAIN(393231)".to_string()]);
        assert!(!e.skip);
    }

    #[test]
    fn test_variable_and_funcall() {
        let e = primary("my-var", Context::Any);
        assert_eq!(inner(&e, "variable-reference").as_str(), Some("my-var"));

        let e = primary(r#"my-func(1, "a")"#, Context::Any);
        let call = inner(&e, "funcall").as_map().unwrap();
        assert_eq!(call.get("name").unwrap().as_str(), Some("my-func"));
        assert_eq!(call.get("arguments").unwrap().as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_host_lookups() {
        let e = primary("gethostname()", Context::Data);
        assert!(inner(&e, "gethostname").is_null());

        let e = primary(r#"gethostbyname("www.example.com")"#, Context::Data);
        assert_eq!(inner(&e, "gethostbyname").as_str(), Some("www.example.com"));

        let mut p = parser("gethostbyname(www)");
        assert!(matches!(
            p.parse_primary(Context::Data),
            Err(ParseError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn test_defined_and_v6relay() {
        let e = primary("defined(my-var)", Context::Boolean);
        assert_eq!(inner(&e, "variable-exists").as_str(), Some("my-var"));

        let e = primary("v6relay(1, option dhcp6.interface-id)", Context::Data);
        let relay = inner(&e, "v6relay").as_map().unwrap();
        assert_eq!(relay.get("relay").unwrap().as_integer(), Some(1));
        assert!(relay.contains("relay-option"));
    }

    #[test]
    fn test_parenthesized() {
        let e = primary("(1 + 2)", Context::Numeric);
        assert!(e.as_map().unwrap().contains("add"));
        let mut p = parser("(1 + 2");
        assert!(p.parse_primary(Context::Numeric).is_err());
    }
}
