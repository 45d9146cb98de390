//! Literal data: numeric aggregates, addresses, host names, hardware
//! addresses and base64 secrets

use crate::parser::keyword::Keyword;
use crate::parser::lexer::Token;
use crate::parser::numeric::convert;
use crate::parser::parser::{ParseError, ParseResult, Parser};
use keaconv_core::Element;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Longest accepted hardware address, in bytes
const HARDWARE_ADDR_LEN: usize = 16;

/// Bytes of a parsed numeric aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub bytes: Vec<u8>,
    /// Number of elements parsed
    pub count: usize,
}

/// Lowercase hex bytes joined by `:`
pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn is_base64_text(text: &str) -> bool {
    text.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}

impl Parser {
    /// Parse `max` numbers separated by `separator`, or as many as are
    /// present when `max` is zero. At least one number is always read.
    pub(crate) fn parse_numeric_aggregate(
        &mut self,
        separator: &Token,
        base: u32,
        width: u32,
        max: usize,
    ) -> ParseResult<Aggregate> {
        let mut bytes = Vec::new();
        let mut count = 0;

        loop {
            if count > 0 {
                if !self.stream.check(separator) {
                    if max == 0 {
                        break;
                    }
                    return Err(ParseError::TooFewElements {
                        position: self.position(),
                    });
                }
                self.stream.skip();
            }

            let position = self.position();
            match self.peek() {
                Token::Eof => return Err(self.unexpected("numeric value")),
                Token::Number(_) => {}
                Token::NumberOrName(_) if base == 16 => {}
                _ => return Err(self.unexpected("numeric value")),
            }
            let lexed = self.stream.next();
            let value =
                convert(&lexed.text, base, width).map_err(|e| ParseError::number(e, position))?;
            bytes.extend(value);
            count += 1;

            if count == max {
                break;
            }
        }

        Ok(Aggregate { bytes, count })
    }

    /// Colon separated hex bytes, as `aa:bb:cc`
    pub(crate) fn parse_cshl(&mut self) -> ParseResult<String> {
        let mut bytes = Vec::new();
        loop {
            let position = self.position();
            match self.peek() {
                Token::Number(_) | Token::NumberOrName(_) => {}
                _ => return Err(self.unexpected("hexadecimal number")),
            }
            let lexed = self.stream.next();
            let value = convert(&lexed.text, 16, 8).map_err(|e| ParseError::number(e, position))?;
            bytes.extend(value);

            if !self.eat(&Token::Colon) {
                break;
            }
        }
        Ok(hex_string(&bytes))
    }

    /// Dotted host name. Empty when the current token cannot start one.
    pub(crate) fn parse_host_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            let token = self.peek();
            if !token.is_identifier() && !matches!(token, Token::Number(_)) {
                break;
            }
            name.push_str(&self.stream.next().text);
            if !self.eat(&Token::Dot) {
                break;
            }
            name.push('.');
        }
        name
    }

    pub(crate) fn parse_ip_addr(&mut self) -> ParseResult<String> {
        let aggregate = self.parse_numeric_aggregate(&Token::Dot, 10, 8, 4)?;
        Ok(format_ipv4(&aggregate.bytes))
    }

    /// IPv4 literal or resolvable host name, printed as an address.
    ///
    /// With `check_multi`, a name resolving to several addresses queues a
    /// comment for the next element.
    pub(crate) fn parse_ip_addr_or_hostname(&mut self, check_multi: bool) -> ParseResult<String> {
        if matches!(self.peek(), Token::Number(_)) {
            // all-digit host names exist: look for NUMBER DOT NUMBER
            self.stream.save_state();
            self.stream.skip();
            let literal = self.eat(&Token::Dot) && matches!(self.peek(), Token::Number(_));
            self.stream.restore_state();
            if literal {
                return self.parse_ip_addr();
            }
        }

        let position = self.position();
        let name = self.parse_host_name();
        if name.is_empty() {
            return Err(self.unexpected("IP address or hostname"));
        }

        let addrs = self.session.resolve(&name);
        let Some(first) = addrs.first() else {
            return Err(ParseError::HostUnknown { position, name });
        };
        if check_multi && addrs.len() > 1 {
            self.session
                .comment(format!("/// {} resolves into multiple addresses", name));
        }
        Ok(first.to_string())
    }

    /// IPv6 address in canonical text form. The address is gathered from
    /// adjacent hex names, numbers, dots and colons.
    pub(crate) fn parse_ip6_addr_txt(&mut self) -> ParseResult<String> {
        let position = self.position();
        let mut text = String::new();
        let mut first = true;
        loop {
            let accepted = match self.peek() {
                Token::Name(s) | Token::NumberOrName(s) => s.bytes().all(|b| b.is_ascii_hexdigit()),
                Token::Number(_) | Token::Dot | Token::Colon => true,
                Token::Keyword(Keyword::Add) => true,
                _ => false,
            };
            if !accepted || (!first && !self.stream.is_adjacent()) {
                break;
            }
            text.push_str(&self.stream.next().text);
            first = false;
        }

        text.parse::<Ipv6Addr>()
            .map(|addr| addr.to_string())
            .map_err(|_| ParseError::InvalidSyntax {
                position,
                message: format!("Invalid IPv6 address: {}", text),
            })
    }

    /// `TYPE aa:bb:...;` after the `hardware` keyword
    pub(crate) fn parse_hardware_param(&mut self) -> ParseResult<Element> {
        let kind = self.stream.next();
        let ethernet = kind.token.is_keyword(Keyword::Ethernet);

        if matches!(self.peek(), Token::Semicolon) {
            return Err(self.syntax("empty hardware address"));
        }
        let position = self.position();
        let aggregate = self.parse_numeric_aggregate(&Token::Colon, 16, 8, 0)?;
        if aggregate.count > HARDWARE_ADDR_LEN {
            return Err(ParseError::InvalidSyntax {
                position,
                message: "hardware address too long".to_string(),
            });
        }
        self.expect_semi()?;

        let address = hex_string(&aggregate.bytes);
        let text = if ethernet {
            address
        } else {
            format!("{} {}", kind.text, address)
        };
        let mut hardware = Element::string(text);
        self.session.take_comments(&mut hardware);
        if !ethernet || aggregate.count != 6 {
            self.session.flag(&mut hardware);
        }
        Ok(hardware)
    }

    /// Base64 text that may span several tokens (`+` and `/` are
    /// punctuation for the lexer)
    pub(crate) fn parse_base64(&mut self) -> String {
        let mut text = String::new();
        loop {
            text.push_str(&self.stream.next().text);
            if self.stream.is_eof() || !is_base64_text(self.stream.text()) {
                break;
            }
        }
        text
    }
}

fn format_ipv4(bytes: &[u8]) -> String {
    match <[u8; 4]>::try_from(bytes) {
        Ok(octets) => Ipv4Addr::from(octets).to_string(),
        Err(_) => hex_string(bytes),
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::lexer::Token;
    use crate::parser::parser::testing::parser;
    use crate::parser::parser::ParseError;

    #[test]
    fn test_fixed_count_aggregate() {
        let mut p = parser("192.168.1.10;");
        let aggregate = p.parse_numeric_aggregate(&Token::Dot, 10, 8, 4).unwrap();
        assert_eq!(aggregate.bytes, vec![192, 168, 1, 10]);
        assert_eq!(aggregate.count, 4);
        assert_eq!(p.peek(), &Token::Semicolon);
    }

    #[test]
    fn test_open_aggregate() {
        let mut p = parser("aa:bb:cc;");
        let aggregate = p.parse_numeric_aggregate(&Token::Colon, 16, 8, 0).unwrap();
        assert_eq!(aggregate.bytes, vec![0xaa, 0xbb, 0xcc]);
        assert_eq!(aggregate.count, 3);
    }

    #[test]
    fn test_aggregate_too_few() {
        let mut p = parser("10.0.1;");
        assert!(matches!(
            p.parse_numeric_aggregate(&Token::Dot, 10, 8, 4),
            Err(ParseError::TooFewElements { .. })
        ));
    }

    #[test]
    fn test_aggregate_eof_and_overflow() {
        let mut p = parser("10.");
        assert!(matches!(
            p.parse_numeric_aggregate(&Token::Dot, 10, 8, 4),
            Err(ParseError::UnexpectedEof { .. })
        ));
        let mut p = parser("10.300.0.1");
        assert!(matches!(
            p.parse_numeric_aggregate(&Token::Dot, 10, 8, 4),
            Err(ParseError::Overflow { .. })
        ));
    }

    #[test]
    fn test_cshl() {
        let mut p = parser("1:A:ff");
        assert_eq!(p.parse_cshl().unwrap(), "01:0a:ff");
    }

    #[test]
    fn test_host_name() {
        let mut p = parser("ns1.example.com;");
        assert_eq!(p.parse_host_name(), "ns1.example.com");
        assert_eq!(p.parse_host_name(), "");
    }

    #[test]
    fn test_ip_or_hostname() {
        let mut p = parser("10.0.0.1 ns1.example.com multi.example.com unknown.example.com");
        assert_eq!(p.parse_ip_addr_or_hostname(false).unwrap(), "10.0.0.1");
        assert_eq!(p.parse_ip_addr_or_hostname(false).unwrap(), "192.0.2.53");
        assert_eq!(p.parse_ip_addr_or_hostname(true).unwrap(), "192.0.2.1");
        let mut element = keaconv_core::Element::null();
        p.session.take_comments(&mut element);
        assert_eq!(
            element.comments,
            vec!["/// multi.example.com resolves into multiple addresses".to_string()]
        );
        assert!(matches!(
            p.parse_ip_addr_or_hostname(false),
            Err(ParseError::HostUnknown { .. })
        ));
    }

    #[test]
    fn test_ip6_gathering_stops_at_whitespace() {
        let mut p = parser("2001:DB8:0::1 ;");
        assert_eq!(p.parse_ip6_addr_txt().unwrap(), "2001:db8::1");
        assert_eq!(p.peek(), &Token::Semicolon);

        let mut p = parser("::ffff:192.0.2.1 x");
        assert_eq!(p.parse_ip6_addr_txt().unwrap(), "::ffff:192.0.2.1");
    }

    #[test]
    fn test_hardware() {
        let mut p = parser("ethernet 0:1:2:3:4:5;");
        let hw = p.parse_hardware_param().unwrap();
        assert_eq!(hw.as_str(), Some("00:01:02:03:04:05"));
        assert!(!hw.skip);

        let mut p = parser("token-ring 0:1:2;");
        let hw = p.parse_hardware_param().unwrap();
        assert_eq!(hw.as_str(), Some("token-ring 00:01:02"));
        assert!(hw.skip);
        assert_eq!(p.session.issues(), 1);
    }

    #[test]
    fn test_hardware_errors() {
        let mut p = parser("ethernet ;");
        assert!(p.parse_hardware_param().is_err());
        let mut p = parser("ethernet 1:2:3:4:5:6:7:8:9:a:b:c:d:e:f:10:11;");
        assert!(p.parse_hardware_param().is_err());
    }

    #[test]
    fn test_base64_spans_tokens() {
        let mut p = parser("dGVz+dA/x== ;");
        assert_eq!(p.parse_base64(), "dGVz+dA/x==");
        assert_eq!(p.peek(), &Token::Semicolon);
    }
}
