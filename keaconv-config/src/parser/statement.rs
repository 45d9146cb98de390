//! Executable statements
//!
//! Statements are parsed into a map holding one entry named after the
//! statement (`if`, `switch`, `on`, `eval`...). Kea has no statement
//! language, so almost everything produced here is flagged unsupported.

use crate::parser::context::{is_data_expression, Context};
use crate::parser::keyword::Keyword;
use crate::parser::lexer::Token;
use crate::parser::options::OptionVariant;
use crate::parser::parser::{ParseResult, Parser, StatementOutcome};
use keaconv_core::{Element, Map, Value};

/// Suffix of algorithm names given without a domain
const ALGORITHM_DOMAIN: &str = ".SIG-ALG.REG.INT.";

impl Parser {
    /// Statements up to the first token that does not start one
    pub(crate) fn parse_executable_statements(
        &mut self,
        case_context: Context,
    ) -> ParseResult<Vec<Element>> {
        let mut statements = Vec::new();
        loop {
            let mut statement = Element::null();
            self.session.take_comments(&mut statement);
            let mut result = Map::new();
            match self.parse_executable_statement(&mut result, case_context)? {
                StatementOutcome::NotAStatement => break,
                StatementOutcome::Malformed => continue,
                StatementOutcome::Parsed => {}
            }
            self.session.take_comments(&mut statement);
            statement.value = Value::Map(result);
            statements.push(statement);
        }
        Ok(statements)
    }

    /// One statement into `result`. `case_context` is the type of the
    /// enclosing switch, `Any` outside of one.
    pub(crate) fn parse_executable_statement(
        &mut self,
        result: &mut Map,
        case_context: Context,
    ) -> ParseResult<StatementOutcome> {
        let keyword = match self.peek() {
            Token::Keyword(keyword) => Some(*keyword),
            _ => None,
        };

        match keyword {
            Some(Keyword::DbTimeFormat) => {
                self.stream.skip();
                if !self.peek_keyword(Keyword::Default) && !self.peek_keyword(Keyword::Local) {
                    return Err(self.syntax("Expecting 'local' or 'default'."));
                }
                let mut format = Element::string(self.stream.next().text);
                self.expect_semi()?;
                self.session.flag(&mut format);
                result.set("db-time-format", format);
            }
            Some(Keyword::If) => {
                self.stream.skip();
                return self.parse_if_statement(result);
            }
            Some(Keyword::Add) => {
                self.stream.skip();
                let name = match self.peek() {
                    Token::String(_) => self.stream.next().text,
                    _ => return Err(self.syntax("expecting class name.")),
                };
                self.expect_semi()?;
                let mut class = Element::string(name);
                self.session.flag(&mut class);
                result.set("add-class", class);
            }
            Some(Keyword::Break) => {
                self.stream.skip();
                self.expect_semi()?;
                let mut statement = Element::null();
                self.session.flag(&mut statement);
                result.set("break", statement);
            }
            Some(Keyword::Send) => {
                self.stream.skip();
                return self.parse_option_variant(result, OptionVariant::Send);
            }
            Some(Keyword::Supersede) | Some(Keyword::Option) => {
                self.stream.skip();
                return self.parse_option_variant(result, OptionVariant::Supersede);
            }
            Some(Keyword::Prepend) => {
                self.stream.skip();
                return self.parse_option_variant(result, OptionVariant::Prepend);
            }
            Some(Keyword::Append) => {
                self.stream.skip();
                return self.parse_option_variant(result, OptionVariant::Append);
            }
            Some(Keyword::Default) => {
                self.stream.skip();
                if !self.eat(&Token::Colon) {
                    return self.parse_option_variant(result, OptionVariant::Default);
                }
                if case_context == Context::Any {
                    return Err(self.syntax("switch default statement in inappropriate scope."));
                }
                let mut statement = Element::null();
                self.session.flag(&mut statement);
                result.set("default", statement);
            }
            Some(verb @ (Keyword::Allow | Keyword::Deny | Keyword::Ignore)) => {
                self.stream.skip();
                let control = self.parse_allow_deny(verb)?;
                result.set("server-control", control);
            }
            Some(Keyword::On) => {
                self.stream.skip();
                return self.parse_on_statement(result);
            }
            Some(Keyword::Switch) => {
                self.stream.skip();
                return self.parse_switch_statement(result);
            }
            Some(Keyword::Case) => {
                self.stream.skip();
                if case_context == Context::Any {
                    return Err(self.syntax("case statement in inappropriate scope."));
                }
                let position = self.position();
                let Some(expression) = self.parse_typed_expression(case_context)? else {
                    let message = format!("expecting {} expression.", case_context);
                    return Ok(self.resynchronize(position, &message));
                };
                self.expect(Token::Colon)?;
                result.set("case", expression);
            }
            Some(Keyword::Define) | Some(Keyword::Set) => {
                self.stream.skip();
                let define = keyword == Some(Keyword::Define);
                return self.parse_define_statement(result, define, case_context);
            }
            Some(Keyword::Unset) => {
                self.stream.skip();
                let name = self.expect_variable_name()?;
                let mut statement = Map::new();
                statement.set("name", name);
                let mut statement = Element::map(statement);
                self.session.flag(&mut statement);
                result.set("unset", statement);
                self.expect_semi()?;
            }
            Some(Keyword::Eval) | Some(Keyword::Return) => {
                let position = self.position();
                self.stream.skip();
                let Some(expression) = self.parse_data_expression()? else {
                    return Ok(self.resynchronize(position, "expecting data expression."));
                };
                let key = if keyword == Some(Keyword::Eval) {
                    "eval"
                } else {
                    "return"
                };
                result.set(key, expression);
                self.expect_semi()?;
            }
            Some(Keyword::Execute) => return Err(self.syntax("ENABLE_EXECUTE is not portable")),
            Some(Keyword::Log) => {
                self.stream.skip();
                return self.parse_log_statement(result);
            }
            Some(Keyword::ParseVendorOption) => {
                self.stream.skip();
                self.expect_semi()?;
                let mut statement = Element::null();
                self.session.flag(&mut statement);
                result.set("parse-vendor-option", statement);
            }
            Some(Keyword::Zone) => {
                self.stream.skip();
                let zone = self.parse_zone()?;
                result.set("zone", zone);
            }
            Some(Keyword::Key) => {
                self.stream.skip();
                let key = self.parse_key()?;
                result.push("tsig-keys", key);
            }
            _ => return self.parse_fallback_statement(result),
        }
        Ok(StatementOutcome::Parsed)
    }

    /// Server parameter, or a function call evaluated for its effect
    fn parse_fallback_statement(&mut self, result: &mut Map) -> ParseResult<StatementOutcome> {
        if self.peek().is_identifier() {
            let parameter = self
                .session
                .registry
                .lookup_by_name("server", self.stream.text())
                .cloned();
            if let Some(parameter) = parameter {
                self.stream.skip();
                self.session.issue();
                return self.parse_config_statement(Some(result), parameter, OptionVariant::Supersede);
            }
        }

        if !matches!(self.peek(), Token::Name(_) | Token::NumberOrName(_)) {
            return Ok(StatementOutcome::NotAStatement);
        }
        let position = self.position();
        let Some(expression) = self.parse_data_expression()? else {
            return Ok(self.resynchronize(position, "expecting function call."));
        };
        result.set("eval", expression);
        self.expect_semi()?;
        Ok(StatementOutcome::Parsed)
    }

    fn parse_option_variant(
        &mut self,
        result: &mut Map,
        variant: OptionVariant,
    ) -> ParseResult<StatementOutcome> {
        let option = self.parse_option_name(false)?;
        self.parse_option_statement(Some(result), option, variant)
    }

    fn expect_variable_name(&mut self) -> ParseResult<String> {
        match self.peek() {
            Token::Name(_) | Token::NumberOrName(_) => Ok(self.stream.next().text),
            token => Err(self.syntax(format!("{} can't be a variable name", token))),
        }
    }

    /// Statement block between braces
    fn parse_block(&mut self, case_context: Context) -> ParseResult<Vec<Element>> {
        self.expect(Token::BraceOpen)?;
        let statements = self.parse_executable_statements(case_context)?;
        self.expect(Token::BraceClose)?;
        Ok(statements)
    }

    // ========================================
    // Control flow
    // ========================================

    fn parse_if_statement(&mut self, result: &mut Map) -> ParseResult<StatementOutcome> {
        let position = self.position();
        let Some(condition) = self.parse_boolean_expression()? else {
            return Ok(self.resynchronize(position, "boolean expression expected."));
        };

        let mut statement = Map::new();
        statement.set("condition", condition);
        statement.set("then", Element::list(self.parse_block(Context::Any)?));

        let chained = if self.eat_keyword(Keyword::Else) {
            if self.eat_keyword(Keyword::If) {
                true
            } else if matches!(self.peek(), Token::BraceOpen) {
                statement.set("else", Element::list(self.parse_block(Context::Any)?));
                false
            } else {
                return Err(self.unexpected("left brace or if"));
            }
        } else {
            self.eat_keyword(Keyword::Elsif)
        };
        if chained {
            let mut branch = Map::new();
            if self.parse_if_statement(&mut branch)? != StatementOutcome::Parsed {
                return Err(self.syntax("expecting conditional."));
            }
            statement.set("else", Element::map(branch));
        }

        let mut statement = Element::map(statement);
        self.session.flag(&mut statement);
        result.set("if", statement);
        Ok(StatementOutcome::Parsed)
    }

    fn parse_switch_statement(&mut self, result: &mut Map) -> ParseResult<StatementOutcome> {
        self.open_paren()?;
        let position = self.position();
        let Some(condition) = self.parse_typed_expression(Context::DataOrNumeric)? else {
            return Ok(self.resynchronize(position, "expecting data or numeric expression."));
        };
        self.close_paren()?;

        let case_context = if is_data_expression(&condition) {
            Context::Data
        } else {
            Context::Numeric
        };
        let body = self.parse_block(case_context)?;

        let mut statement = Map::new();
        statement.set("condition", condition);
        statement.set("body", Element::list(body));
        let mut statement = Element::map(statement);
        self.session.flag(&mut statement);
        result.set("switch", statement);
        Ok(StatementOutcome::Parsed)
    }

    fn parse_on_statement(&mut self, result: &mut Map) -> ParseResult<StatementOutcome> {
        let mut events = Vec::new();
        loop {
            let event = [
                Keyword::Expiry,
                Keyword::Commit,
                Keyword::Release,
                Keyword::Transmission,
            ]
            .into_iter()
            .any(|k| self.peek_keyword(k));
            if !event {
                return Err(self.unexpected("lease event type"));
            }
            events.push(self.stream.next().text);
            if !self.eat_keyword(Keyword::Or) {
                break;
            }
        }

        let mut statement = Map::new();
        statement.set("condition", events.join(" or "));
        if !self.eat(&Token::Semicolon) {
            statement.set("body", Element::list(self.parse_block(Context::Any)?));
        }
        let mut statement = Element::map(statement);
        self.session.flag(&mut statement);
        result.set("on", statement);
        Ok(StatementOutcome::Parsed)
    }

    // ========================================
    // Variables and functions
    // ========================================

    fn parse_define_statement(
        &mut self,
        result: &mut Map,
        define: bool,
        case_context: Context,
    ) -> ParseResult<StatementOutcome> {
        let name = self.expect_variable_name()?;
        let mut statement = Map::new();
        statement.set("name", name);

        if self.eat(&Token::ParenOpen) {
            let mut arguments = Vec::new();
            if !self.eat(&Token::ParenClose) {
                loop {
                    match self.peek() {
                        Token::Name(_) | Token::NumberOrName(_) => {
                            arguments.push(self.stream.next().text)
                        }
                        _ => return Err(self.unexpected("argument name")),
                    }
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                self.close_paren()?;
            }
            statement.set("arguments", arguments.join(", "));
            statement.set("function-body", Element::list(self.parse_block(case_context)?));
        } else {
            let keyword = if define { "define" } else { "set" };
            if !self.eat(&Token::Equal) {
                return Err(self.syntax(format!("expecting '=' in {} statement.", keyword)));
            }
            let position = self.position();
            let Some(value) = self.parse_expression(Context::Any)? else {
                return Ok(self.resynchronize(position, "expecting expression."));
            };
            statement.set("value", value);
            self.expect_semi()?;
        }

        let mut statement = Element::map(statement);
        self.session.flag(&mut statement);
        result.set(if define { "define" } else { "set" }, statement);
        Ok(StatementOutcome::Parsed)
    }

    fn parse_log_statement(&mut self, result: &mut Map) -> ParseResult<StatementOutcome> {
        self.open_paren()?;
        let priority = [Keyword::Fatal, Keyword::Error, Keyword::Debug, Keyword::Info]
            .into_iter()
            .any(|k| self.peek_keyword(k));
        let priority = if priority {
            let text = self.stream.next().text;
            self.comma()?;
            text
        } else {
            "DEBUG".to_string()
        };

        let position = self.position();
        let Some(message) = self.parse_data_expression()? else {
            return Ok(self.resynchronize(position, "expecting data expression."));
        };
        self.close_paren()?;
        self.expect_semi()?;

        let mut statement = Map::new();
        statement.set("priority", priority);
        statement.set("message", message);
        let mut statement = Element::map(statement);
        self.session.flag(&mut statement);
        result.set("log", statement);
        Ok(StatementOutcome::Parsed)
    }

    /// `allow`, `deny` or `ignore` followed by the permitted subject
    fn parse_allow_deny(&mut self, verb: Keyword) -> ParseResult<Element> {
        let mut words = Vec::new();
        loop {
            match self.peek() {
                Token::Semicolon => break,
                Token::Eof => return Err(self.unexpected("';'")),
                Token::String(s) => {
                    let word = format!("\"{}\"", s);
                    self.stream.skip();
                    words.push(word);
                }
                _ => words.push(self.stream.next().text),
            }
        }
        if words.is_empty() {
            return Err(self.syntax(format!("expecting {} subject", verb.as_str())));
        }
        self.expect_semi()?;

        let mut control = Map::new();
        control.set(verb.as_str(), words.join(" "));
        let mut control = Element::map(control);
        self.session.flag(&mut control);
        Ok(control)
    }

    // ========================================
    // DNS update zones and keys
    // ========================================

    fn parse_zone(&mut self) -> ParseResult<Element> {
        let mut name = self.parse_host_name();
        if name.is_empty() {
            return Err(self.syntax("expecting hostname."));
        }
        if !name.ends_with('.') {
            name.push('.');
        }
        let mut zone = Map::new();
        zone.set("name", name);

        self.expect(Token::BraceOpen)?;
        loop {
            let keyword = match self.peek() {
                Token::Keyword(
                    k @ (Keyword::Primary
                    | Keyword::Secondary
                    | Keyword::Primary6
                    | Keyword::Secondary6
                    | Keyword::Key),
                ) => *k,
                _ => break,
            };
            self.stream.skip();
            let key = keyword.as_str();

            if keyword == Keyword::Key {
                if zone.contains("key") {
                    return Err(self.syntax("Multiple key definitions"));
                }
                let name = match self.peek() {
                    Token::String(_) => self.stream.next().text,
                    _ => self.parse_host_name(),
                };
                if name.is_empty() {
                    return Err(self.syntax("expecting key name."));
                }
                zone.set("key", name);
                self.expect_semi()?;
                continue;
            }

            if zone.contains(key) {
                return Err(self.syntax(format!("more than one {}.", key)));
            }
            let v6 = matches!(keyword, Keyword::Primary6 | Keyword::Secondary6);
            let mut addresses = Vec::new();
            loop {
                let address = if v6 {
                    self.parse_ip6_addr_txt()?
                } else {
                    self.parse_ip_addr_or_hostname(false)?
                };
                addresses.push(Element::string(address));
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            self.expect_semi()?;
            zone.set(key, Element::list(addresses));
        }
        self.expect(Token::BraceClose)?;

        let mut zone = Element::map(zone);
        self.session.flag(&mut zone);
        Ok(zone)
    }

    /// `key NAME { algorithm ...; secret ...; }` after `key`
    pub(crate) fn parse_key(&mut self) -> ParseResult<Element> {
        let name = match self.peek() {
            Token::String(_) => self.stream.next().text,
            _ => self.parse_host_name(),
        };
        if name.is_empty() {
            return Err(self.syntax("expecting key name."));
        }
        let mut key = Map::new();
        key.set("name", name);

        self.expect(Token::BraceOpen)?;
        loop {
            if self.eat_keyword(Keyword::Algorithm) {
                if key.contains("algorithm") {
                    return Err(self.syntax("key: too many algorithms"));
                }
                let mut algorithm = self.parse_host_name();
                if algorithm.is_empty() {
                    return Err(self.syntax("expecting key algorithm name."));
                }
                self.expect_semi()?;
                if algorithm.contains('.') {
                    algorithm.push('.');
                } else {
                    algorithm.push_str(ALGORITHM_DOMAIN);
                }
                key.set("algorithm", algorithm);
            } else if self.eat_keyword(Keyword::Secret) {
                if key.contains("secret") {
                    return Err(self.syntax("key: too many secrets"));
                }
                let secret = match self.peek() {
                    Token::String(_) => self.stream.next().text,
                    Token::Semicolon | Token::Eof => return Err(self.unexpected("key secret")),
                    _ => self.parse_base64(),
                };
                key.set("secret", secret);
                self.expect_semi()?;
            } else {
                break;
            }
        }
        self.expect(Token::BraceClose)?;
        // BIND 8 syntax
        self.eat(&Token::Semicolon);

        let mut key = Element::map(key);
        self.session.flag(&mut key);
        Ok(key)
    }
}
