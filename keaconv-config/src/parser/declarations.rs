//! Declarations
//!
//! Top level driver: subnets, shared networks, pools, hosts, groups and
//! classes open frames on the declaration stack; everything else is a
//! parameter, an option or an executable statement of the current frame.

use crate::parser::context::Context;
use crate::parser::keyword::Keyword;
use crate::parser::lexer::Token;
use crate::parser::options::OptionVariant;
use crate::parser::parser::{ParseError, ParseResult, Parser, StatementOutcome, Translation};
use crate::parser::scope::FrameKind;
use keaconv_core::{Element, Map, Value};
use std::net::Ipv4Addr;

/// Lists moved from a closed group into its parent
const SPLICED: &[&str] = &[
    "subnet4",
    "subnet6",
    "shared-networks",
    "reservations",
    "option-data",
];

impl Parser {
    /// Translate the whole source
    pub fn parse_document(mut self) -> ParseResult<Translation> {
        tracing::info!(
            "Translating {} configuration",
            self.session.family.root_key()
        );

        while !self.stream.is_eof() {
            self.parse_declaration()?;
        }

        let issues = self.session.issues();
        let root_key = self.session.family.root_key();
        let mut document = Map::new();
        document.set(root_key, Element::map(self.stack.into_root()));
        tracing::info!("Translation done with {} unsupported constructs", issues);

        Ok(Translation {
            root: Element::map(document),
            issues,
            diagnostics: self.session.into_diagnostics(),
        })
    }

    /// One declaration, parameter or statement of the current frame
    fn parse_declaration(&mut self) -> ParseResult<()> {
        let keyword = match self.peek() {
            Token::Keyword(keyword) => Some(*keyword),
            _ => None,
        };

        match keyword {
            Some(Keyword::Subnet) => self.parse_subnet(),
            Some(Keyword::Subnet6) => self.parse_subnet6(),
            Some(Keyword::SharedNetwork) => self.parse_shared_network(),
            Some(Keyword::Pool) | Some(Keyword::Pool6) => self.parse_pool(),
            Some(Keyword::Range) => self.parse_range(),
            Some(Keyword::Range6) => self.parse_range6(),
            Some(Keyword::Host) => self.parse_host(),
            Some(Keyword::Hardware) => {
                self.stream.skip();
                let hardware = self.parse_hardware_param()?;
                self.current_frame().set("hw-address", hardware);
                Ok(())
            }
            Some(Keyword::FixedAddress) => self.parse_fixed_address(),
            Some(Keyword::FixedAddress6) => self.parse_fixed_address6(),
            Some(Keyword::Group) => self.parse_group(),
            Some(Keyword::Class) => self.parse_class(),
            Some(Keyword::Authoritative) => {
                self.stream.skip();
                self.expect_semi()?;
                self.current_frame().set("authoritative", true);
                Ok(())
            }
            Some(Keyword::Not) if self.stream.peek_nth(1).is_keyword(Keyword::Authoritative) => {
                self.stream.skip();
                self.stream.skip();
                self.expect_semi()?;
                self.current_frame().set("authoritative", false);
                Ok(())
            }
            Some(Keyword::Option) | Some(Keyword::Supersede) => {
                self.stream.skip();
                self.parse_option_declaration(keyword == Some(Keyword::Option))
            }
            Some(Keyword::Key) => {
                self.stream.skip();
                let key = self.parse_key()?;
                self.stack.root_map().push("tsig-keys", key);
                Ok(())
            }
            _ => self.parse_parameter_or_statement(),
        }
    }

    /// Frame receiving parameters: the innermost that is not a parameter
    /// block
    fn current_index(&self) -> usize {
        self.stack.innermost(|kind| kind == FrameKind::Parameter)
    }

    fn current_frame(&mut self) -> &mut Map {
        let index = self.current_index();
        self.stack.map_mut(index)
    }

    /// `{ declarations }` in a new frame of `kind`, returning its map
    fn parse_declaration_block(&mut self, kind: FrameKind, map: Map) -> ParseResult<Map> {
        self.expect(Token::BraceOpen)?;
        self.stack.push(kind, map);
        loop {
            match self.peek() {
                Token::BraceClose => break,
                Token::Eof => return Err(self.unexpected("'}'")),
                _ => self.parse_declaration()?,
            }
        }
        let position = self.position();
        self.stream.skip();
        self.stack
            .pop()
            .map(|frame| frame.map)
            .ok_or_else(|| ParseError::Internal {
                position,
                message: format!("unbalanced {} declaration", kind.as_str()),
            })
    }

    // ========================================
    // Parameters, options and statements
    // ========================================

    fn parse_option_declaration(&mut self, allow_definitions: bool) -> ParseResult<()> {
        if allow_definitions && self.peek_keyword(Keyword::Space) {
            return self.parse_option_space_decl();
        }
        let definition = allow_definitions
            && (self.stream.peek_nth(1).is_keyword(Keyword::Code)
                || (matches!(self.stream.peek_nth(1), Token::Dot)
                    && self.stream.peek_nth(3).is_keyword(Keyword::Code)));
        if definition {
            let option = self.parse_option_name(true)?;
            return self.parse_option_code_definition(option);
        }
        let option = self.parse_option_name(false)?;
        self.parse_option_statement(None, option, OptionVariant::Supersede)?;
        Ok(())
    }

    fn parse_parameter_or_statement(&mut self) -> ParseResult<()> {
        if self.peek().is_identifier() {
            let parameter = self
                .session
                .registry
                .lookup_by_name("server", self.stream.text())
                .cloned();
            if let Some(parameter) = parameter {
                self.stream.skip();
                self.parse_config_statement(None, parameter, OptionVariant::Supersede)?;
                return Ok(());
            }
            if self.stream.text() == "subclass" {
                let position = self.position();
                self.resynchronize(position, "subclass declarations are not supported");
                return Ok(());
            }
        }

        let mut statement = Element::null();
        self.session.take_comments(&mut statement);
        let mut result = Map::new();
        match self.parse_executable_statement(&mut result, Context::Any)? {
            StatementOutcome::Parsed => {
                self.session.take_comments(&mut statement);
                statement.value = Value::Map(result);
                self.current_frame().push("statements", statement);
                Ok(())
            }
            StatementOutcome::Malformed => Ok(()),
            StatementOutcome::NotAStatement => Err(self.unexpected("declaration or statement")),
        }
    }

    // ========================================
    // Subnets and shared networks
    // ========================================

    fn subnet_key(&self) -> &'static str {
        if self.session.is_v4() {
            "subnet4"
        } else {
            "subnet6"
        }
    }

    /// `subnet A netmask M { ... }`
    fn parse_subnet(&mut self) -> ParseResult<()> {
        let position = self.position();
        self.stream.skip();
        if !self.session.is_v4() {
            return Err(ParseError::InvalidSyntax {
                position,
                message: "subnet declarations are DHCPv4 only, use subnet6".to_string(),
            });
        }
        let address = self.parse_ip_addr()?;
        self.expect_keyword(Keyword::Netmask)?;
        let mask_position = self.position();
        let mask = self.parse_ip_addr()?;
        let length = prefix_length(&mask).ok_or_else(|| ParseError::InvalidSyntax {
            position: mask_position,
            message: format!("{} is not a valid netmask", mask),
        })?;

        let mut map = Map::new();
        map.set("subnet", format!("{}/{}", address, length));
        self.close_subnet(position, map)
    }

    /// `subnet6 P/len { ... }`
    fn parse_subnet6(&mut self) -> ParseResult<()> {
        let position = self.position();
        self.stream.skip();
        if self.session.is_v4() {
            return Err(ParseError::InvalidSyntax {
                position,
                message: "subnet6 declarations are DHCPv6 only".to_string(),
            });
        }
        let prefix = self.parse_ip6_prefix()?;
        let mut map = Map::new();
        map.set("subnet", prefix);
        self.close_subnet(position, map)
    }

    fn close_subnet(&mut self, position: usize, map: Map) -> ParseResult<()> {
        let mut subnet = Element::null();
        self.session.take_comments(&mut subnet);

        let parent = self.current_index();
        if !matches!(
            self.stack.kind(parent),
            FrameKind::Root | FrameKind::SharedNetwork | FrameKind::Group
        ) {
            return Err(ParseError::InvalidSyntax {
                position,
                message: format!(
                    "subnet declaration inside a {} declaration",
                    self.stack.kind(parent).as_str()
                ),
            });
        }

        let map = self.parse_declaration_block(FrameKind::Subnet, map)?;
        subnet.value = Value::Map(map);
        let key = self.subnet_key();
        self.stack.map_mut(parent).push(key, subnet);
        Ok(())
    }

    /// `A/len` with an IPv6 address
    fn parse_ip6_prefix(&mut self) -> ParseResult<String> {
        let address = self.parse_ip6_addr_txt()?;
        self.expect(Token::Slash)?;
        let position = self.position();
        let length = self.expect_number()?;
        match length.text.parse::<u8>() {
            Ok(length) if length <= 128 => Ok(format!("{}/{}", address, length)),
            _ => Err(ParseError::InvalidSyntax {
                position,
                message: format!("bad prefix length {}", length.text),
            }),
        }
    }

    /// `shared-network NAME { ... }`
    fn parse_shared_network(&mut self) -> ParseResult<()> {
        let position = self.position();
        self.stream.skip();
        let name = match self.peek() {
            Token::String(_) => self.stream.next().text,
            _ => self.expect_identifier("shared network name")?,
        };

        let mut network = Element::null();
        self.session.take_comments(&mut network);
        let parent = self.current_index();
        if !matches!(self.stack.kind(parent), FrameKind::Root | FrameKind::Group) {
            return Err(ParseError::InvalidSyntax {
                position,
                message: "shared-network declarations must be global".to_string(),
            });
        }

        let mut map = Map::new();
        map.set("name", name);
        let map = self.parse_declaration_block(FrameKind::SharedNetwork, map)?;
        network.value = Value::Map(map);
        self.stack.map_mut(parent).push("shared-networks", network);
        Ok(())
    }

    // ========================================
    // Pools and ranges
    // ========================================

    /// `pool { ... }` or `pool6 { ... }`. Each range of the pool becomes
    /// its own Kea pool.
    fn parse_pool(&mut self) -> ParseResult<()> {
        let position = self.position();
        let v6 = self.peek_keyword(Keyword::Pool6);
        self.stream.skip();
        if v6 == self.session.is_v4() {
            let message = if v6 {
                "pool6 declarations are DHCPv6 only"
            } else {
                "pool declarations are DHCPv4 only, use pool6"
            };
            return Err(ParseError::InvalidSyntax {
                position,
                message: message.to_string(),
            });
        }

        let mut comments = Element::null();
        self.session.take_comments(&mut comments);
        let parent = self.current_index();
        let mut pool = self.parse_declaration_block(FrameKind::Pool, Map::new())?;

        let ranges = match pool.remove("pool").map(|ranges| ranges.value) {
            Some(Value::List(ranges)) => ranges,
            Some(value) => vec![Element::new(value)],
            None => Vec::new(),
        };
        let mut entries = Vec::new();
        if ranges.is_empty() {
            let mut entry = Element::map(pool).with_comment("/// pool without range");
            self.session.flag(&mut entry);
            entries.push(entry);
        } else {
            for range in ranges {
                let mut map = Map::new();
                map.set("pool", range);
                for (key, value) in pool.iter() {
                    map.set(key, value.clone());
                }
                entries.push(Element::map(map));
            }
        }

        let outside_subnet = self.stack.kind(parent) != FrameKind::Subnet;
        for (i, mut entry) in entries.into_iter().enumerate() {
            if i == 0 {
                let mut merged = std::mem::take(&mut comments.comments);
                merged.append(&mut entry.comments);
                entry.comments = merged;
            }
            if outside_subnet {
                entry.add_comment("/// pool declared outside of a subnet");
                self.session.flag_once(&mut entry);
            }
            self.stack.map_mut(parent).push("pools", entry);
        }
        Ok(())
    }

    /// `range [dynamic-bootp] A [B];`
    fn parse_range(&mut self) -> ParseResult<()> {
        let position = self.position();
        self.stream.skip();
        if !self.session.is_v4() {
            return Err(ParseError::InvalidSyntax {
                position,
                message: "range declarations are DHCPv4 only, use range6".to_string(),
            });
        }
        let mut range = Element::null();
        if self.peek().is_identifier() && self.stream.text() == "dynamic-bootp" {
            self.stream.skip();
            range.add_comment("/// dynamic-bootp is not supported");
            self.session.flag(&mut range);
        }
        let low = self.parse_ip_addr()?;
        let high = if matches!(self.peek(), Token::Semicolon) {
            low.clone()
        } else {
            self.parse_ip_addr()?
        };
        self.expect_semi()?;
        range.value = Value::String(format!("{} - {}", low, high));
        self.place_range(position, range)
    }

    /// `range6 A B;` or `range6 P/len;`
    fn parse_range6(&mut self) -> ParseResult<()> {
        let position = self.position();
        self.stream.skip();
        if self.session.is_v4() {
            return Err(ParseError::InvalidSyntax {
                position,
                message: "range6 declarations are DHCPv6 only".to_string(),
            });
        }
        let low = self.parse_ip6_addr_txt()?;
        let text = if self.eat(&Token::Slash) {
            let length = self.expect_number()?;
            format!("{}/{}", low, length.text)
        } else {
            let high = self.parse_ip6_addr_txt()?;
            format!("{} - {}", low, high)
        };
        self.expect_semi()?;
        self.place_range(position, Element::string(text))
    }

    /// Ranges belong to the enclosing pool, or make a pool of their own
    /// directly inside a subnet
    fn place_range(&mut self, position: usize, mut range: Element) -> ParseResult<()> {
        self.session.take_comments(&mut range);
        let index = self.current_index();
        match self.stack.kind(index) {
            FrameKind::Pool => self.stack.map_mut(index).push("pool", range),
            FrameKind::Subnet => {
                let mut pool = Map::new();
                pool.set("pool", range);
                self.stack.map_mut(index).push("pools", Element::map(pool));
            }
            kind => {
                return Err(ParseError::InvalidSyntax {
                    position,
                    message: format!("range declaration inside a {} declaration", kind.as_str()),
                })
            }
        }
        Ok(())
    }

    // ========================================
    // Hosts
    // ========================================

    /// `host NAME { ... }`
    fn parse_host(&mut self) -> ParseResult<()> {
        self.stream.skip();
        let name = match self.peek() {
            Token::String(_) => self.stream.next().text,
            _ => self.parse_host_name(),
        };
        if name.is_empty() {
            return Err(self.unexpected("host name"));
        }

        let mut host = Element::null();
        self.session.take_comments(&mut host);
        let parent = self.current_index();
        let mut map = Map::new();
        map.set("hostname", name);
        let map = self.parse_declaration_block(FrameKind::Host, map)?;
        host.value = Value::Map(map);

        if !matches!(
            self.stack.kind(parent),
            FrameKind::Root | FrameKind::Subnet | FrameKind::Group
        ) {
            host.add_comment(format!(
                "/// host declared in a {} declaration",
                self.stack.kind(parent).as_str()
            ));
            self.session.flag(&mut host);
        }
        self.stack.map_mut(parent).push("reservations", host);
        Ok(())
    }

    /// `fixed-address A [, B ...];`
    fn parse_fixed_address(&mut self) -> ParseResult<()> {
        self.stream.skip();
        let mut addresses = Vec::new();
        loop {
            addresses.push(self.parse_ip_addr_or_hostname(true)?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect_semi()?;

        let mut address = Element::string(addresses.remove(0));
        self.session.take_comments(&mut address);
        if !addresses.is_empty() {
            address.add_comment(format!(
                "/// extra fixed addresses dropped: {}",
                addresses.join(", ")
            ));
            self.session.flag(&mut address);
        }
        self.current_frame().set("ip-address", address);
        Ok(())
    }

    /// `fixed-address6 A [, B ...];`
    fn parse_fixed_address6(&mut self) -> ParseResult<()> {
        self.stream.skip();
        let mut addresses = Vec::new();
        loop {
            addresses.push(Element::string(self.parse_ip6_addr_txt()?));
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect_semi()?;
        let mut list = Element::list(addresses);
        self.session.take_comments(&mut list);
        self.current_frame().set("ip-addresses", list);
        Ok(())
    }

    // ========================================
    // Groups and classes
    // ========================================

    /// `group [NAME] { ... }`, members spliced into the parent
    fn parse_group(&mut self) -> ParseResult<()> {
        self.stream.skip();
        let mut map = Map::new();
        if matches!(self.peek(), Token::String(_)) || self.peek().is_identifier() {
            map.set("name", self.stream.next().text);
        }

        let mut group = Element::null();
        self.session.take_comments(&mut group);
        let parent = self.current_index();
        let mut map = self.parse_declaration_block(FrameKind::Group, map)?;

        for key in SPLICED {
            let Some(members) = map.remove(key) else {
                continue;
            };
            let members = match members.value {
                Value::List(members) => members,
                value => vec![Element::new(value)],
            };
            let target = self.stack.map_mut(parent);
            for member in members {
                target.push(key, member);
            }
        }

        if !map.is_empty() {
            group.value = Value::Map(map);
            self.session.flag(&mut group);
            self.stack.map_mut(parent).push("group", group);
        }
        Ok(())
    }

    /// `class "NAME" { ... }`, kept in the global class list
    fn parse_class(&mut self) -> ParseResult<()> {
        self.stream.skip();
        let name = match self.peek() {
            Token::String(_) => self.stream.next().text,
            _ => self.expect_identifier("class name")?,
        };

        let mut class = Element::null();
        self.session.take_comments(&mut class);
        self.expect(Token::BraceOpen)?;
        let mut map = Map::new();
        map.set("name", name);
        self.stack.push(FrameKind::Class, map);

        loop {
            match self.peek() {
                Token::BraceClose => break,
                Token::Eof => return Err(self.unexpected("'}'")),
                Token::Keyword(Keyword::Match) => self.parse_match()?,
                _ => self.parse_declaration()?,
            }
        }
        let position = self.position();
        self.stream.skip();
        let frame = self.stack.pop().ok_or_else(|| ParseError::Internal {
            position,
            message: "unbalanced class declaration".to_string(),
        })?;

        class.value = Value::Map(frame.map);
        self.stack.root_map().push("client-classes", class);
        Ok(())
    }

    /// `match if EXPR;` or `match EXPR;` inside a class
    fn parse_match(&mut self) -> ParseResult<()> {
        self.stream.skip();
        let position = self.position();
        if self.eat_keyword(Keyword::If) {
            let Some(test) = self.parse_boolean_expression()? else {
                self.resynchronize(position, "expecting boolean expression.");
                return Ok(());
            };
            self.expect_semi()?;
            self.current_frame().set("test", test);
            return Ok(());
        }

        let Some(mut submatch) = self.parse_data_expression()? else {
            self.resynchronize(position, "expecting data expression.");
            return Ok(());
        };
        self.expect_semi()?;
        submatch.add_comment("/// subclass matching is not supported");
        self.session.flag_once(&mut submatch);
        self.current_frame().set("submatch", submatch);
        Ok(())
    }
}

/// Prefix length of a contiguous netmask
fn prefix_length(mask: &str) -> Option<u32> {
    let mask = u32::from(mask.parse::<Ipv4Addr>().ok()?);
    let length = mask.leading_ones();
    (mask.count_ones() == length).then_some(length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parser::testing::{parser_v6, session, translate};
    use keaconv_core::config::Family;

    fn dhcp4(source: &str) -> (Map, usize) {
        let translation = translate(source);
        let root = translation.root.as_map().unwrap();
        let map = root.get("Dhcp4").unwrap().as_map().unwrap().clone();
        (map, translation.issues)
    }

    fn dhcp6(source: &str) -> Map {
        let translation = parser_v6(source).parse_document().unwrap();
        let root = translation.root.as_map().unwrap();
        root.get("Dhcp6").unwrap().as_map().unwrap().clone()
    }

    fn list<'a>(map: &'a Map, key: &str) -> &'a [Element] {
        map.get(key).and_then(Element::as_list).unwrap()
    }

    #[test]
    fn test_prefix_length() {
        assert_eq!(prefix_length("255.255.255.0"), Some(24));
        assert_eq!(prefix_length("0.0.0.0"), Some(0));
        assert_eq!(prefix_length("255.0.255.0"), None);
    }

    #[test]
    fn test_subnet_with_pool() {
        let (root, issues) = dhcp4(
            r#"
            subnet 10.0.0.0 netmask 255.255.255.0 {
                option routers 10.0.0.1;
                pool {
                    default-lease-time 600;
                    range 10.0.0.10 10.0.0.20;
                }
            }
            "#,
        );
        assert_eq!(issues, 0);
        let subnet = list(&root, "subnet4")[0].as_map().unwrap();
        assert_eq!(subnet.get("subnet").unwrap().as_str(), Some("10.0.0.0/24"));
        assert_eq!(subnet.get("valid-lifetime").unwrap().as_integer(), Some(600));
        assert_eq!(list(subnet, "option-data").len(), 1);
        let pool = list(subnet, "pools")[0].as_map().unwrap();
        assert_eq!(pool.first_key(), Some("pool"));
        assert_eq!(pool.get("pool").unwrap().as_str(), Some("10.0.0.10 - 10.0.0.20"));
    }

    #[test]
    fn test_pool_with_two_ranges() {
        let (root, _) = dhcp4(
            r#"
            subnet 10.0.0.0 netmask 255.255.0.0 {
                pool {
                    range 10.0.1.1 10.0.1.9;
                    range 10.0.2.1;
                    option domain-name "pool.example";
                }
            }
            "#,
        );
        let subnet = list(&root, "subnet4")[0].as_map().unwrap();
        let pools = list(subnet, "pools");
        assert_eq!(pools.len(), 2);
        let second = pools[1].as_map().unwrap();
        assert_eq!(second.get("pool").unwrap().as_str(), Some("10.0.2.1 - 10.0.2.1"));
        assert!(!second.contains("option-data"));
        assert!(subnet.contains("option-data"));
    }

    #[test]
    fn test_range_in_subnet_creates_pool() {
        let (root, _) = dhcp4("subnet 192.0.2.0 netmask 255.255.255.128 { range 192.0.2.10 192.0.2.20; }");
        let subnet = list(&root, "subnet4")[0].as_map().unwrap();
        assert_eq!(subnet.get("subnet").unwrap().as_str(), Some("192.0.2.0/25"));
        assert_eq!(list(subnet, "pools").len(), 1);
    }

    #[test]
    fn test_bad_netmask() {
        let p = Parser::new(
            "subnet 10.0.0.0 netmask 255.0.255.0 { }",
            session(Family::V4),
        )
        .unwrap();
        assert!(p.parse_document().is_err());
    }

    #[test]
    fn test_shared_network() {
        let (root, _) = dhcp4(
            r#"
            shared-network "office" {
                subnet 10.1.0.0 netmask 255.255.0.0 { }
                subnet 10.2.0.0 netmask 255.255.0.0 { }
            }
            "#,
        );
        let network = list(&root, "shared-networks")[0].as_map().unwrap();
        assert_eq!(network.get("name").unwrap().as_str(), Some("office"));
        assert_eq!(list(network, "subnet4").len(), 2);
        assert!(!root.contains("subnet4"));
    }

    #[test]
    fn test_host() {
        let (root, issues) = dhcp4(
            r#"
            host printer {
                hardware ethernet 00:11:22:33:44:55;
                fixed-address 10.0.0.50;
                filename "boot.img";
            }
            "#,
        );
        assert_eq!(issues, 0);
        let host = list(&root, "reservations")[0].as_map().unwrap();
        assert_eq!(host.get("hostname").unwrap().as_str(), Some("printer"));
        assert_eq!(host.get("hw-address").unwrap().as_str(), Some("00:11:22:33:44:55"));
        assert_eq!(host.get("ip-address").unwrap().as_str(), Some("10.0.0.50"));
        assert_eq!(host.get("boot-file-name").unwrap().as_str(), Some("boot.img"));
    }

    #[test]
    fn test_host_with_several_addresses() {
        let (root, issues) = dhcp4("host h { fixed-address multi.example.com, 10.0.0.9; }");
        let host = list(&root, "reservations")[0].as_map().unwrap();
        let address = host.get("ip-address").unwrap();
        assert_eq!(address.as_str(), Some("192.0.2.1"));
        assert!(address.skip);
        assert_eq!(address.comments.len(), 2);
        assert_eq!(issues, 1);
    }

    #[test]
    fn test_group_is_spliced() {
        let (root, issues) = dhcp4(
            r#"
            group {
                default-lease-time 300;
                host a { fixed-address 10.0.0.1; }
                host b { fixed-address 10.0.0.2; }
            }
            "#,
        );
        assert_eq!(list(&root, "reservations").len(), 2);
        let group = &list(&root, "group")[0];
        assert!(group.skip);
        assert!(group.as_map().unwrap().contains("valid-lifetime"));
        assert_eq!(issues, 1);
    }

    #[test]
    fn test_class() {
        let (root, _) = dhcp4(
            r#"
            class "pxe" {
                match if substring(option vendor-class-identifier, 0, 9) = "PXEClient";
                next-server 10.0.0.2;
            }
            "#,
        );
        let class = list(&root, "client-classes")[0].as_map().unwrap();
        assert_eq!(class.get("name").unwrap().as_str(), Some("pxe"));
        assert!(class.get("test").unwrap().as_map().unwrap().contains("equal"));
        assert_eq!(class.get("next-server").unwrap().as_str(), Some("10.0.0.2"));
    }

    #[test]
    fn test_authoritative() {
        let (root, _) = dhcp4("authoritative;");
        assert_eq!(root.get("authoritative").unwrap().as_bool(), Some(true));
        let (root, _) = dhcp4("subnet 10.0.0.0 netmask 255.0.0.0 { not authoritative; }");
        let subnet = list(&root, "subnet4")[0].as_map().unwrap();
        assert_eq!(subnet.get("authoritative").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn test_options_and_definitions() {
        let (root, _) = dhcp4(
            r#"
            option space vendor code width 1 length width 1;
            option vendor.tftp code 1 = ip-address;
            option local-proxy code 252 = text;
            option domain-name "example.org";
            option local-proxy "http://proxy/";
            "#,
        );
        assert_eq!(list(&root, "option-def").len(), 2);
        let data = list(&root, "option-data");
        assert_eq!(data.len(), 2);
        let proxy = data[1].as_map().unwrap();
        assert_eq!(proxy.get("code").unwrap().as_integer(), Some(252));
    }

    #[test]
    fn test_keys_go_to_root() {
        let (root, _) = dhcp4(
            "subnet 10.0.0.0 netmask 255.0.0.0 { } key k { algorithm hmac-md5; secret YQ==; }",
        );
        assert_eq!(list(&root, "tsig-keys").len(), 1);
    }

    #[test]
    fn test_statements_are_collected() {
        let (root, issues) = dhcp4(
            r#"
            subnet 10.0.0.0 netmask 255.0.0.0 {
                if option host-name = "x" { break; }
                on commit { }
            }
            "#,
        );
        let subnet = list(&root, "subnet4")[0].as_map().unwrap();
        assert_eq!(list(subnet, "statements").len(), 2);
        // if, option reference, break, on
        assert_eq!(issues, 4);
    }

    #[test]
    fn test_malformed_statement_is_skipped() {
        let (root, issues) = dhcp4(
            r#"
            option domain-name = ;
            option domain-name "ok";
            "#,
        );
        assert_eq!(list(&root, "option-data").len(), 1);
        assert_eq!(issues, 1);
    }

    #[test]
    fn test_unknown_top_level_token() {
        let p = Parser::new("} ", session(Family::V4)).unwrap();
        assert!(p.parse_document().is_err());
    }

    #[test]
    fn test_subclass_is_skipped() {
        let (root, issues) = dhcp4(r#"subclass "pxe" 1:2:3 { option domain-name "x"; } authoritative;"#);
        assert_eq!(issues, 1);
        assert!(root.contains("authoritative"));
    }

    #[test]
    fn test_family_mismatch() {
        let p = Parser::new("subnet6 2001:db8::/64 { }", session(Family::V4)).unwrap();
        assert!(p.parse_document().is_err());
    }

    #[test]
    fn test_v6_document() {
        let root = dhcp6(
            r#"
            preferred-lifetime 3000;
            subnet6 2001:db8:1::/64 {
                range6 2001:db8:1::10 2001:db8:1::ff;
                pool6 { range6 2001:db8:1:0:1::/80; }
                host h { fixed-address6 2001:db8:1::5; }
            }
            "#,
        );
        assert_eq!(root.get("preferred-lifetime").unwrap().as_integer(), Some(3000));
        let subnet = list(&root, "subnet6")[0].as_map().unwrap();
        assert_eq!(subnet.get("subnet").unwrap().as_str(), Some("2001:db8:1::/64"));
        let pools = list(subnet, "pools");
        assert_eq!(pools[0].as_map().unwrap().get("pool").unwrap().as_str(), Some("2001:db8:1::10 - 2001:db8:1::ff"));
        assert_eq!(pools[1].as_map().unwrap().get("pool").unwrap().as_str(), Some("2001:db8:1:0:1::/80"));
        let host = list(subnet, "reservations")[0].as_map().unwrap();
        assert_eq!(list(host, "ip-addresses")[0].as_str(), Some("2001:db8:1::5"));
    }
}
