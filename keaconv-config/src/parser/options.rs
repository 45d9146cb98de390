//! Option names, option statements, option space declarations and option
//! code definitions

use crate::parser::keyword::Keyword;
use crate::parser::lexer::Token;
use crate::parser::numeric::leading_decimal;
use crate::parser::parser::{ParseError, ParseResult, Parser, StatementOutcome};
use crate::parser::scope::FrameKind;
use keaconv_core::{Element, Map, OptionDescriptor, OptionStatus, Space, Value};

/// How an option statement sets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionVariant {
    /// `option` and `supersede`
    Supersede,
    Default,
    Prepend,
    Append,
    Send,
}

/// Native option data, token texts joined
#[derive(Debug, Default)]
struct OptionData {
    data: String,
    /// Source spelling, commas without spaces
    saved: String,
    canonized: bool,
    ignore: bool,
}

impl Parser {
    /// Kea name of an ISC option space
    pub(crate) fn kea_space(&self, space: &str) -> String {
        self.session
            .registry
            .lookup_space(space)
            .map(|s| s.name.to_string())
            .unwrap_or_else(|| space.to_string())
    }

    /// `[space.]name`. With `allocate`, an unknown name creates a new
    /// descriptor without a code.
    pub(crate) fn parse_option_name(&mut self, allocate: bool) -> ParseResult<OptionDescriptor> {
        if !self.peek().is_identifier() {
            return Err(self.unexpected("identifier after option keyword"));
        }
        let first = self.stream.next();
        let (space, name, position) = if self.eat(&Token::Dot) {
            let position = self.position();
            let name = self.expect_identifier("identifier after '.'")?;
            let Some(space) = self.session.registry.lookup_space(&first.text) else {
                return Err(ParseError::UnknownSpace {
                    position: first.span.start,
                    name: first.text,
                });
            };
            (space.old.to_string(), name, position)
        } else {
            let space = self.session.family.default_space().to_string();
            (space, first.text, first.span.start)
        };

        if let Some(option) = self.session.registry.lookup_by_name(&space, &name) {
            return Ok(option.clone());
        }
        if space == "server" {
            return Err(ParseError::UnknownOption {
                position,
                message: format!("unknown server option {}", name),
            });
        }

        let unknown_prefix = name
            .get(..8)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("unknown-"));
        if unknown_prefix {
            let code = leading_decimal(&name[8..]);
            if code == 0 || (code == 255 && self.session.is_v4()) {
                return Err(ParseError::UnknownOption {
                    position,
                    message: format!("Option code {} is illegal in the {} space.", code, space),
                });
            }
            if let Some(option) = self.session.registry.lookup_by_code(&space, code) {
                let option = option.clone();
                let comment = format!("/// option {}.{} redefinition", self.kea_space(&space), name);
                self.session.comment(comment);
                return Ok(option);
            }
            let option = OptionDescriptor::new(&name, code, &space, "X", OptionStatus::Dynamic);
            tracing::debug!("Created option {}.{} with code {}", space, name, code);
            return Ok(self.session.registry.register(option).clone());
        }

        if allocate {
            let option = OptionDescriptor::new(&name, 0, &space, "", OptionStatus::Dynamic);
            tracing::debug!("Allocated option {}.{}", space, name);
            return Ok(self.session.registry.register(option).clone());
        }

        Err(ParseError::UnknownOption {
            position,
            message: format!("no option named {} in space {}", name, space),
        })
    }

    // ========================================
    // Option data
    // ========================================

    /// Option statement after its name. With `result` the entry is stored
    /// there under `option`, otherwise in the `option-data` list of the
    /// enclosing declaration.
    pub(crate) fn parse_option_statement(
        &mut self,
        result: Option<&mut Map>,
        option: OptionDescriptor,
        variant: OptionVariant,
    ) -> ParseResult<StatementOutcome> {
        if option.space == "server" {
            return self.parse_config_statement(result, option, variant);
        }

        let mut entry = Element::null();
        self.session.take_comments(&mut entry);
        let mut data = Map::new();
        data.set("space", self.kea_space(&option.space));
        data.set("name", option.name.as_str());
        data.set("code", i64::from(option.code));
        if option.status == OptionStatus::Unknown {
            self.session.flag(&mut entry);
        }
        if variant != OptionVariant::Supersede {
            entry.add_comment("/// Kea does not support option data set variants");
        }

        match self.peek() {
            Token::Semicolon => {}
            Token::Equal => {
                let position = self.position();
                self.stream.skip();
                let Some(mut expression) = self.parse_data_expression()? else {
                    return Ok(self.resynchronize(position, "expecting a data expression."));
                };
                data.set("csv-format", false);
                match expression.value {
                    Value::Boolean(b) => expression.value = Value::String(b.to_string()),
                    Value::Integer(i) => expression.value = Value::String(i.to_string()),
                    _ => {}
                }
                if matches!(expression.value, Value::String(_)) {
                    data.set("data", expression);
                } else {
                    self.session.flag(&mut entry);
                    data.set("expression", expression);
                }
            }
            _ => {
                let native = self.parse_option_data()?;
                if native.canonized {
                    entry.add_comment("/// canonized booleans to  lowercase true or false");
                }
                if native.ignore {
                    entry.add_comment("/// 'ignore' pseudo-boolean is used");
                    self.session.flag(&mut entry);
                }
                if native.canonized || native.ignore {
                    data.set("original-data", Element::string(native.saved).skipped());
                }
                data.set("data", native.data);
            }
        }
        self.expect_semi()?;

        entry.value = Value::Map(data);
        match result {
            Some(result) => {
                entry.set_skip();
                result.set("option", entry);
            }
            None => {
                let v4 = self.session.is_v4();
                let index = self.stack.innermost(|kind| {
                    kind == FrameKind::Parameter || (v4 && kind == FrameKind::Pool)
                });
                self.stack.map_mut(index).push("option-data", entry);
            }
        }
        Ok(StatementOutcome::Parsed)
    }

    /// Raw tokens up to the terminating `;`
    fn parse_option_data(&mut self) -> ParseResult<OptionData> {
        let mut native = OptionData::default();
        loop {
            match self.peek() {
                Token::Eof => return Err(self.unexpected("option data")),
                Token::Semicolon => break,
                Token::Comma => {
                    self.stream.skip();
                    native.data.push_str(", ");
                    native.saved.push(',');
                    continue;
                }
                _ => {}
            }

            let lexed = self.stream.next();
            native.saved.push_str(&lexed.text);
            if lexed.token.is_identifier() && lexed.text == "off" {
                native.canonized = true;
                native.data.push_str("false");
            } else if lexed.token.is_keyword(Keyword::On) {
                native.canonized = true;
                native.data.push_str("true");
            } else {
                if lexed.token.is_keyword(Keyword::Ignore) {
                    native.ignore = true;
                }
                native.data.push_str(&lexed.text);
            }
        }
        Ok(native)
    }

    // ========================================
    // Option spaces
    // ========================================

    /// `space NAME [code width N] [length width N] [hash size N];`
    pub(crate) fn parse_option_space_decl(&mut self) -> ParseResult<()> {
        self.expect_keyword(Keyword::Space)?;
        let name = self.expect_identifier("option space name")?;
        self.session.registry.register_space(Space::new(&name, &name));

        let supported: i64 = if self.session.is_v4() { 1 } else { 2 };
        let mut decl = Map::new();
        loop {
            let (key, what) = match self.peek() {
                Token::Semicolon => {
                    self.stream.skip();
                    break;
                }
                Token::Keyword(Keyword::Code) => ("code-width", "code"),
                Token::Keyword(Keyword::Length) => ("length-width", "length"),
                Token::Keyword(Keyword::Hash) => {
                    self.stream.skip();
                    self.expect_keyword(Keyword::Size)?;
                    self.expect_number()?;
                    continue;
                }
                _ => return Err(self.unexpected("width clause or ';'")),
            };
            self.stream.skip();
            if decl.is_empty() {
                self.session.issue();
                decl.set("name", name.as_str());
            }
            self.expect_keyword(Keyword::Width)?;
            let width = i64::from(leading_decimal(&self.expect_number()?.text));
            let mut value = Element::integer(width);
            if width != supported {
                value.add_comment(format!("/// only {} width {} is supported", what, supported));
            }
            decl.set(key, value);
        }

        tracing::debug!("Declared option space {}", name);
        if !decl.is_empty() {
            self.stack
                .root_map()
                .push("option-space", Element::map(decl).skipped());
        }
        Ok(())
    }

    // ========================================
    // Option definitions
    // ========================================

    /// `code N = TYPE;` after the option name
    pub(crate) fn parse_option_code_definition(
        &mut self,
        mut option: OptionDescriptor,
    ) -> ParseResult<()> {
        let mut def = Element::null();
        self.session.take_comments(&mut def);
        let mut map = Map::new();
        map.set("space", self.kea_space(&option.space));
        map.set("name", option.name.as_str());

        self.expect_keyword(Keyword::Code)?;
        let code = leading_decimal(&self.expect_number()?.text);
        map.set("code", i64::from(code));

        if option.code == 0 {
            let existing = self
                .session
                .registry
                .lookup_by_code(&option.space, code)
                .map(|o| o.status);
            match existing {
                Some(status) => option.status = status,
                None => {
                    let position = self.position();
                    self.session
                        .registry
                        .assign_code(&option.space, &option.name, code)
                        .map_err(|e| ParseError::Internal {
                            position,
                            message: e.to_string(),
                        })?;
                    option.code = code;
                }
            }
        }
        if matches!(option.status, OptionStatus::Known | OptionStatus::Unknown) {
            def.add_comment("/// Kea does not allow redefinition of options");
            self.session.flag(&mut def);
        }

        self.expect(Token::Equal)?;
        let mut saved = String::new();
        let mut datatype = String::new();
        let mut array = false;
        let mut record = false;
        let mut unsupported = false;
        let mut encapsulate: Option<String> = None;

        if self.eat_keyword(Keyword::Array) {
            self.expect_keyword(Keyword::Of)?;
            array = true;
            saved.push_str("array of");
        }
        if self.eat(&Token::BraceOpen) {
            record = true;
            saved.push('[');
            if array {
                def.add_comment("/// unsupported record inside an array");
                self.session.flag_once(&mut def);
                unsupported = true;
            }
        }

        loop {
            if !saved.is_empty() {
                saved.push(' ');
            }
            if encapsulate.is_some() {
                return Err(self.syntax("encapsulate must always be the last item."));
            }

            let mut last_in_record = false;
            let position = self.position();
            let ty = match self.peek() {
                Token::Keyword(Keyword::Array) => {
                    if array || !record {
                        return Err(self.syntax("no nested arrays."));
                    }
                    self.stream.skip();
                    self.expect_keyword(Keyword::Of)?;
                    if matches!(self.peek(), Token::BraceOpen) {
                        return Err(self.syntax("only uniform array inside record."));
                    }
                    def.add_comment("/// unsupported array inside a record");
                    self.session.flag_once(&mut def);
                    unsupported = true;
                    saved.push_str("array of");
                    continue;
                }
                Token::Keyword(Keyword::Boolean) => {
                    self.stream.skip();
                    "boolean".to_string()
                }
                Token::Keyword(Keyword::Integer)
                | Token::Keyword(Keyword::Signed)
                | Token::Keyword(Keyword::Unsigned) => self.parse_integer_type()?,
                Token::Keyword(Keyword::IpAddress) => {
                    self.stream.skip();
                    "ipv4-address".to_string()
                }
                Token::Keyword(Keyword::Ip6Address) => {
                    self.stream.skip();
                    "ipv6-address".to_string()
                }
                Token::Keyword(Keyword::DomainName) => {
                    self.stream.skip();
                    self.reject_array(array)?;
                    last_in_record = true;
                    "fqdn".to_string()
                }
                Token::Keyword(Keyword::DomainList) => {
                    self.stream.skip();
                    self.reject_array(array)?;
                    saved.push_str("list of ");
                    array = true;
                    last_in_record = true;
                    if self.eat_keyword(Keyword::Compressed) {
                        def.add_comment("/// unsupported compressed fqdn list");
                        self.session.flag_once(&mut def);
                        unsupported = true;
                        "compressed fqdn".to_string()
                    } else {
                        "fqdn".to_string()
                    }
                }
                Token::Keyword(Keyword::Text) | Token::Keyword(Keyword::String) => {
                    self.stream.skip();
                    self.reject_array(array)?;
                    last_in_record = true;
                    "string".to_string()
                }
                Token::Keyword(Keyword::Encapsulate) => {
                    self.stream.skip();
                    let space = self.expect_identifier("option space identifier")?;
                    saved.push_str("encapsulate ");
                    saved.push_str(&space);
                    encapsulate = Some(space);
                    String::new()
                }
                Token::Keyword(Keyword::Zerolen) => {
                    self.stream.skip();
                    if array {
                        return Err(self.syntax("array incompatible with zerolen."));
                    }
                    last_in_record = true;
                    "empty".to_string()
                }
                _ => {
                    let text = self.stream.text().to_string();
                    return Err(ParseError::InvalidSyntax {
                        position,
                        message: format!("unknown data type {}", text),
                    });
                }
            };
            saved.push_str(&ty);
            datatype.push_str(&ty);

            if !record {
                break;
            }
            if self.eat(&Token::Comma) {
                if last_in_record {
                    return Err(self.syntax(format!("{} must be at end of record.", ty)));
                }
                saved.push(',');
                datatype.push_str(", ");
                continue;
            }
            self.expect(Token::BraceClose)?;
            saved.push(']');
            break;
        }
        self.expect_semi()?;
        if encapsulate.is_some() && array {
            return Err(self.syntax("Arrays of encapsulations don't make sense."));
        }

        if array {
            map.set("array", true);
        }
        if record {
            map.set("record-types", datatype);
            map.set("type", "record");
        } else if datatype.is_empty() {
            map.set("type", "empty");
        } else {
            map.set("type", datatype);
        }
        if unsupported {
            map.set("definition", saved);
        }
        if let Some(space) = encapsulate {
            map.set("encapsulate", space);
        }

        tracing::debug!("Defined option {}.{} with code {}", option.space, option.name, code);
        def.value = Value::Map(map);
        self.stack.root_map().push("option-def", def);
        Ok(())
    }

    /// `[signed|unsigned] integer WIDTH`
    fn parse_integer_type(&mut self) -> ParseResult<String> {
        let signed = match self.stream.next().token {
            Token::Keyword(Keyword::Unsigned) => {
                self.expect_keyword(Keyword::Integer)?;
                false
            }
            Token::Keyword(Keyword::Signed) => {
                self.expect_keyword(Keyword::Integer)?;
                true
            }
            _ => true,
        };
        let width = self.expect_number()?;
        match width.text.as_str() {
            "8" | "16" | "32" => {
                let prefix = if signed { "int" } else { "uint" };
                Ok(format!("{}{}", prefix, width.text))
            }
            other => Err(ParseError::InvalidSyntax {
                position: width.span.start,
                message: format!("{} bit precision is not supported.", other),
            }),
        }
    }

    fn reject_array(&self, array: bool) -> ParseResult<()> {
        if array {
            Err(self.syntax("arrays of text strings not yet supported."))
        } else {
            Ok(())
        }
    }
}
