//! Server parameters
//!
//! Statements like `default-lease-time 600;` are options of the `server`
//! space. Most of them land in a skipped `config` list. A few have a Kea
//! counterpart whose legal location depends on the enclosing declaration,
//! and are moved up the declaration stack accordingly:
//!
//! | Code | Kea name           | Legal frames                        |
//! |------|--------------------|-------------------------------------|
//! | 1    | valid-lifetime     | root, shared-network, subnet, group |
//! | 53   | preferred-lifetime | root, shared-network, subnet, group |
//! | 15   | boot-file-name     | host, class, group                  |
//! | 16   | server-hostname    | host, class, group                  |
//! | 17   | next-server        | root, host, class, group            |
//!
//! Parameter blocks are always transparent.

use crate::parser::keyword::Keyword;
use crate::parser::lexer::Token;
use crate::parser::numeric::{convert, decode};
use crate::parser::options::OptionVariant;
use crate::parser::parser::{ParseError, ParseResult, Parser, StatementOutcome};
use crate::parser::scope::FrameKind;
use keaconv_core::{Element, Map, OptionDescriptor, OptionStatus, Value};

impl Parser {
    /// Server parameter after its name
    pub(crate) fn parse_config_statement(
        &mut self,
        result: Option<&mut Map>,
        option: OptionDescriptor,
        variant: OptionVariant,
    ) -> ParseResult<StatementOutcome> {
        let position = self.position();
        let mut config = Element::null();
        self.session.take_comments(&mut config);
        let mut map = Map::new();
        map.set("name", option.name.as_str());
        map.set("code", i64::from(option.code));
        if option.status == OptionStatus::Unknown {
            self.session.flag(&mut config);
        }
        if variant != OptionVariant::Supersede {
            config.add_comment("/// Kea does not support option data set variants");
        }

        let value = if matches!(self.peek(), Token::Equal) {
            let start = self.position();
            self.stream.skip();
            match self.parse_data_expression()? {
                Some(expression) => expression,
                None => return Ok(self.resynchronize(start, "expecting a data expression.")),
            }
        } else {
            self.parse_config_data(&option)?
        };
        self.expect_semi()?;

        if let Some(result) = result {
            map.set("value", value);
            config.value = Value::Map(map);
            config.set_skip();
            result.set("config", config);
            return Ok(StatementOutcome::Parsed);
        }

        if option.status != OptionStatus::Special {
            map.set("value", value);
            config.value = Value::Map(map);
            self.push_config(config);
            return Ok(StatementOutcome::Parsed);
        }

        let mut value = value;
        let mut comments = std::mem::take(&mut config.comments);
        comments.append(&mut value.comments);
        value.comments = comments;

        let v4 = self.session.is_v4();
        let family_only = |message: &str| ParseError::InvalidSyntax {
            position,
            message: message.to_string(),
        };
        match option.code {
            1 => self.place_lifetime("valid-lifetime", value),
            53 => {
                if v4 {
                    return Err(family_only("preferred-lifetime is DHCPv6 only"));
                }
                self.place_lifetime("preferred-lifetime", value);
            }
            15 | 16 => {
                let key = if option.code == 15 {
                    "boot-file-name"
                } else {
                    "server-hostname"
                };
                if !v4 {
                    return Err(family_only(&format!("{} is DHCPv4 only", key)));
                }
                self.place_host_scoped(key, value);
            }
            17 => {
                if !v4 {
                    return Err(family_only("next-server is DHCPv4 only"));
                }
                self.place_next_server(value);
            }
            18 => {
                return Err(family_only(
                    "authoritative is a statement, here it is used as a config option",
                ))
            }
            82 | 85 => {
                if !v4 {
                    let kea = if option.code == 82 {
                        "match-client-id"
                    } else {
                        "echo-client-id"
                    };
                    return Err(family_only(&format!("{} is DHCPv4 only", kea)));
                }
                map.set("value", value);
                config.value = Value::Map(map);
                self.push_config(config);
            }
            23 | 30 | 35 | 39 | 88 | 89 => {
                map.set("value", value);
                config.value = Value::Map(map);
                self.push_config(config);
            }
            code => {
                return Err(ParseError::Internal {
                    position,
                    message: format!("unsupported config option {} ({})", option.name, code),
                })
            }
        }
        Ok(StatementOutcome::Parsed)
    }

    /// Single value of a server parameter, read by format letter
    pub(crate) fn parse_config_data(&mut self, option: &OptionDescriptor) -> ParseResult<Element> {
        match self.peek() {
            Token::Eof => return Err(self.unexpected("config value")),
            Token::Semicolon => return Err(self.syntax("empty config option")),
            Token::Comma => return Err(self.syntax("multiple value config option")),
            _ => {}
        }

        let position = self.position();
        let value = match option.format_letter() {
            Some('U') | Some('N') => Element::string(self.expect_identifier("identifier")?),
            Some('X') => match self.peek() {
                Token::Number(_) | Token::NumberOrName(_) => Element::string(self.parse_cshl()?),
                Token::String(_) => Element::string(self.stream.next().text),
                _ => return Err(self.unexpected("string or hexadecimal data")),
            },
            Some('d') => {
                let name = self.parse_host_name();
                if name.is_empty() {
                    return Err(self.syntax("not a valid domain name."));
                }
                Element::string(name)
            }
            Some('t') => Element::string(self.stream.next().text),
            Some('I') => Element::string(self.parse_ip_addr_or_hostname(false)?),
            Some('6') => Element::string(self.parse_ip6_addr_txt()?),
            Some('T') if self.eat_keyword(Keyword::Infinite) => Element::integer(-1),
            Some('T') | Some('L') => self.parse_config_number(32)?,
            Some('S') => self.parse_config_number(16)?,
            Some('B') => self.parse_config_number(8)?,
            Some('f') => {
                if !self.peek().is_identifier() {
                    return Err(self.unexpected("boolean"));
                }
                let word = self.stream.next().text.to_ascii_lowercase();
                match word.as_str() {
                    "true" | "on" => Element::boolean(true),
                    "false" | "off" => Element::boolean(false),
                    "ignore" => Element::null().skipped(),
                    _ => {
                        return Err(ParseError::InvalidSyntax {
                            position,
                            message: "expecting boolean.".to_string(),
                        })
                    }
                }
            }
            other => {
                return Err(ParseError::Internal {
                    position,
                    message: format!(
                        "Bad format '{}' in parse_config_data.",
                        other.unwrap_or(' ')
                    ),
                })
            }
        };
        Ok(value)
    }

    /// Unsigned number of `width` bits, base inferred
    fn parse_config_number(&mut self, width: u32) -> ParseResult<Element> {
        if !matches!(self.peek(), Token::Number(_) | Token::NumberOrName(_)) {
            return Err(self.unexpected("number"));
        }
        let position = self.position();
        let lexed = self.stream.next();
        let bytes = convert(&lexed.text, 0, width).map_err(|e| ParseError::number(e, position))?;
        Ok(Element::integer(decode(&bytes, false)))
    }

    /// Append to the skipped `config` list of the innermost declaration
    fn push_config(&mut self, config: Element) {
        let index = self
            .stack
            .innermost(|kind| matches!(kind, FrameKind::Parameter | FrameKind::Pool));
        let frame = self.stack.map_mut(index);
        if !frame.contains("config") {
            frame.set("config", Element::list(Vec::new()).skipped());
        }
        frame.push("config", config);
    }

    fn place_lifetime(&mut self, key: &str, mut value: Element) {
        let mut index = 0;
        let mut from_pool = false;
        for i in (0..=self.stack.top()).rev() {
            match self.stack.kind(i) {
                FrameKind::Parameter => {}
                FrameKind::Pool => from_pool = true,
                FrameKind::Root
                | FrameKind::SharedNetwork
                | FrameKind::Subnet
                | FrameKind::Group => {
                    index = i;
                    break;
                }
                FrameKind::Host | FrameKind::Class => {
                    value.add_comment(format!("/// {} in unsupported scope", key));
                    self.session.flag(&mut value);
                    index = i;
                    break;
                }
            }
        }
        if from_pool {
            value.add_comment(format!("/// {} moved from an internal pool scope", key));
        }
        self.stack.map_mut(index).set(key, value);
    }

    fn place_host_scoped(&mut self, key: &str, mut value: Element) {
        let mut index = 0;
        for i in (0..=self.stack.top()).rev() {
            match self.stack.kind(i) {
                FrameKind::Host | FrameKind::Class | FrameKind::Group => {
                    index = i;
                    break;
                }
                FrameKind::Root => {
                    value.add_comment(format!("/// {} was defined in an unsupported scope", key));
                    self.session.flag(&mut value);
                    break;
                }
                _ => {}
            }
        }
        self.stack.map_mut(index).set(key, value);
    }

    fn place_next_server(&mut self, mut value: Element) {
        let mut index = 0;
        let mut moved = false;
        for i in (0..=self.stack.top()).rev() {
            match self.stack.kind(i) {
                FrameKind::Parameter => {}
                FrameKind::Root | FrameKind::Host | FrameKind::Class | FrameKind::Group => {
                    index = i;
                    break;
                }
                _ => moved = true,
            }
        }
        if moved {
            value.add_comment("/// next-server moved from an internal unsupported scope");
        }
        self.stack.map_mut(index).set("next-server", value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parser::testing::{parser, parser_v6};

    fn config(p: &mut Parser, frames: &[FrameKind]) -> ParseResult<StatementOutcome> {
        for kind in frames {
            p.stack.push(*kind, Map::new());
        }
        let option = p.parse_option_name(false)?;
        p.parse_config_statement(None, option, OptionVariant::Supersede)
    }

    fn server(source: &str) -> Parser {
        parser(&format!("server.{}", source))
    }

    #[test]
    fn test_lifetime_in_subnet() {
        let mut p = server("default-lease-time 600;");
        config(&mut p, &[FrameKind::Subnet]).unwrap();
        let value = p.stack.map(1).get("valid-lifetime").unwrap();
        assert_eq!(value.as_integer(), Some(600));
        assert!(value.comments.is_empty());
    }

    #[test]
    fn test_lifetime_moves_out_of_pool() {
        let mut p = server("default-lease-time 600;");
        config(&mut p, &[FrameKind::Subnet, FrameKind::Pool, FrameKind::Parameter]).unwrap();
        assert!(!p.stack.map(2).contains("valid-lifetime"));
        let value = p.stack.map(1).get("valid-lifetime").unwrap();
        assert_eq!(
            value.comments,
            vec!["/// valid-lifetime moved from an internal pool scope".to_string()]
        );
        assert!(!value.skip);
    }

    #[test]
    fn test_lifetime_in_host_is_unsupported() {
        let mut p = server("default-lease-time infinite;");
        config(&mut p, &[FrameKind::Group, FrameKind::Host]).unwrap();
        let value = p.stack.map(2).get("valid-lifetime").unwrap();
        assert_eq!(value.as_integer(), Some(-1));
        assert!(value.skip);
        assert_eq!(value.comments, vec!["/// valid-lifetime in unsupported scope".to_string()]);
        assert_eq!(p.session.issues(), 1);
    }

    #[test]
    fn test_preferred_lifetime_is_v6_only() {
        let mut p = server("preferred-lifetime 300;");
        assert!(config(&mut p, &[]).is_err());

        let mut p = parser_v6("server.preferred-lifetime 300;");
        config(&mut p, &[FrameKind::SharedNetwork]).unwrap();
        assert_eq!(
            p.stack.map(1).get("preferred-lifetime").and_then(Element::as_integer),
            Some(300)
        );
    }

    #[test]
    fn test_boot_file_name() {
        let mut p = server(r#"filename "pxelinux.0";"#);
        config(&mut p, &[FrameKind::Group, FrameKind::Host]).unwrap();
        let value = p.stack.map(2).get("boot-file-name").unwrap();
        assert_eq!(value.as_str(), Some("pxelinux.0"));
        assert!(!value.skip);

        let mut p = server(r#"server-name "boot";"#);
        config(&mut p, &[FrameKind::Subnet]).unwrap();
        let value = p.stack.map(0).get("server-hostname").unwrap();
        assert!(value.skip);
        assert_eq!(
            value.comments,
            vec!["/// server-hostname was defined in an unsupported scope".to_string()]
        );
    }

    #[test]
    fn test_next_server() {
        let mut p = server("next-server 10.0.0.5;");
        config(&mut p, &[FrameKind::SharedNetwork, FrameKind::Subnet]).unwrap();
        let value = p.stack.map(0).get("next-server").unwrap();
        assert_eq!(value.as_str(), Some("10.0.0.5"));
        assert_eq!(
            value.comments,
            vec!["/// next-server moved from an internal unsupported scope".to_string()]
        );

        let mut p = server("next-server 10.0.0.5;");
        config(&mut p, &[FrameKind::Class]).unwrap();
        assert!(p.stack.map(1).get("next-server").unwrap().comments.is_empty());
    }

    #[test]
    fn test_authoritative_parameter_is_fatal() {
        let mut p = server("authoritative true;");
        let err = config(&mut p, &[]).unwrap_err();
        assert!(err.to_string().contains("authoritative is a statement"));
    }

    #[test]
    fn test_plain_parameters_go_to_config_list() {
        let mut p = server("max-lease-time 7200;");
        config(&mut p, &[FrameKind::Subnet, FrameKind::Pool]).unwrap();
        let list = p.stack.map(1).get("config").unwrap();
        assert!(list.skip);
        let entry = &list.as_list().unwrap()[0];
        let entry = entry.as_map().unwrap();
        assert_eq!(entry.get("name").unwrap().as_str(), Some("max-lease-time"));
        assert_eq!(entry.get("value").unwrap().as_integer(), Some(7200));
    }

    #[test]
    fn test_unknown_parameters_are_flagged() {
        let mut p = server("ping-check on;");
        config(&mut p, &[]).unwrap();
        let entry = &p.stack.map(0).get("config").unwrap().as_list().unwrap()[0];
        assert!(entry.skip);
        assert_eq!(entry.as_map().unwrap().get("value").unwrap().as_bool(), Some(true));
        assert_eq!(p.session.issues(), 1);
    }

    #[test]
    fn test_placeholders_are_consumed() {
        let mut p = server("ddns-update-style none; x");
        config(&mut p, &[]).unwrap();
        assert!(p.stack.map(0).contains("config"));
        assert!(p.peek().is_identifier());

        let mut p = parser_v6("server.echo-client-id true;");
        assert!(config(&mut p, &[]).is_err());
    }

    #[test]
    fn test_config_data_formats() {
        let mut p = server("min-secs 0x10;");
        config(&mut p, &[]).unwrap();
        let entry = &p.stack.map(0).get("config").unwrap().as_list().unwrap()[0];
        assert_eq!(entry.as_map().unwrap().get("value").unwrap().as_integer(), Some(16));

        let mut p = server("min-secs 300;");
        assert!(matches!(config(&mut p, &[]), Err(ParseError::Overflow { .. })));

        let mut p = server("one-lease-per-client ignore;");
        config(&mut p, &[]).unwrap();
        let entry = &p.stack.map(0).get("config").unwrap().as_list().unwrap()[0];
        assert!(entry.as_map().unwrap().get("value").unwrap().skip);

        let mut p = server("omapi-key my-key.example;");
        config(&mut p, &[]).unwrap();
    }

    #[test]
    fn test_empty_and_multiple_values() {
        let mut p = server("max-lease-time ;");
        let err = config(&mut p, &[]).unwrap_err();
        assert!(err.to_string().contains("empty config option"));

        let mut p = server("max-lease-time , 1;");
        let err = config(&mut p, &[]).unwrap_err();
        assert!(err.to_string().contains("multiple value config option"));
    }

    #[test]
    fn test_inside_statement_result() {
        let mut p = server("max-lease-time 60;");
        let option = p.parse_option_name(false).unwrap();
        let mut result = Map::new();
        p.parse_config_statement(Some(&mut result), option, OptionVariant::Default)
            .unwrap();
        let entry = result.get("config").unwrap();
        assert!(entry.skip);
        assert!(entry
            .comments
            .contains(&"/// Kea does not support option data set variants".to_string()));
    }

    #[test]
    fn test_comments_move_to_value() {
        let mut p = server("default-lease-time 60;");
        p.session.comment("/// from source");
        config(&mut p, &[]).unwrap();
        let value = p.stack.map(0).get("valid-lifetime").unwrap();
        assert_eq!(value.comments, vec!["/// from source".to_string()]);
    }
}
