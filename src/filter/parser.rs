use super::error::FilterParseError;
use super::expr::Filter;
use super::lexer::{Token, TokenKind, tokenize};
use super::list::NonEmpty;
use super::set::{FilterRule, FilterRuleType, FilterSet};
use super::value::ValueFilter;
use log::{debug, trace};
use std::str::FromStr;

/// Deepest nesting of brackets and negations a parse accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse a filter expression. Blank input yields [`Filter::Any`].
pub fn parse_filter(input: &str) -> Result<Filter, FilterParseError> {
    let tokens = tokenize(input);
    trace!("filter expression {:?} tokenized into {} tokens", input, tokens.len());

    let mut parser = Parser::new(&tokens, input.len(), Mode::Filter);
    let filter = parser.filter()?;
    debug!("parsed filter expression {:?}", input);
    Ok(filter)
}

/// Like [`parse_filter`], treating a missing expression as blank.
pub fn parse_filter_optional(input: Option<&str>) -> Result<Filter, FilterParseError> {
    parse_filter(input.unwrap_or(""))
}

/// Parse a filter set expression made of `include` / `exclude` rules.
///
/// The first rule may leave out its keyword and is then an inclusion rule.
/// Blank input yields the empty set.
pub fn parse_filter_set(input: &str) -> Result<FilterSet, FilterParseError> {
    let tokens = tokenize(input);
    trace!("filter set {:?} tokenized into {} tokens", input, tokens.len());

    let mut parser = Parser::new(&tokens, input.len(), Mode::FilterSet);
    let set = parser.filter_set()?;
    debug!("parsed filter set {:?} into {} rules", input, set.len());
    Ok(set)
}

impl FromStr for Filter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_filter(s)
    }
}

impl FromStr for FilterSet {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_filter_set(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Filter,
    FilterSet,
}

struct Parser<'t> {
    tokens: &'t [Token],
    cursor: usize,
    input_len: usize,
    mode: Mode,
    depth: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token], input_len: usize, mode: Mode) -> Self {
        Self {
            tokens,
            cursor: 0,
            input_len,
            mode,
            depth: 0,
        }
    }

    fn filter(&mut self) -> Result<Filter, FilterParseError> {
        if self.tokens.is_empty() {
            return Ok(Filter::Any);
        }
        let filter = self.or_expr()?;
        if let Some(token) = self.peek()? {
            return Err(unexpected(token, "end of expression"));
        }
        Ok(filter)
    }

    fn filter_set(&mut self) -> Result<FilterSet, FilterParseError> {
        let mut rules = Vec::new();
        while let Some(token) = self.peek()? {
            let rule_type = match self.rule_keyword(self.cursor) {
                Some(rule_type) => {
                    self.cursor += 1;
                    rule_type
                }
                None if rules.is_empty() => FilterRuleType::Inclusion,
                None => return Err(unexpected(token, "'include' or 'exclude'")),
            };
            let filter = self.or_expr()?;
            rules.push(FilterRule::new(rule_type, filter));
        }
        Ok(FilterSet::new(rules))
    }

    fn or_expr(&mut self) -> Result<Filter, FilterParseError> {
        let mut children = NonEmpty::new(self.and_expr()?);
        while self.eat_or()? {
            children.push(self.and_expr()?);
        }
        Ok(Filter::any_of(children))
    }

    fn and_expr(&mut self) -> Result<Filter, FilterParseError> {
        let mut children = NonEmpty::new(self.not_expr()?);
        loop {
            if self.eat_and()? || self.starts_operand()? {
                children.push(self.not_expr()?);
            } else {
                break;
            }
        }
        Ok(Filter::all_of(children))
    }

    fn not_expr(&mut self) -> Result<Filter, FilterParseError> {
        match self.peek()? {
            Some(token) if token.kind == TokenKind::Not || is_symbol(token, "!") => {
                self.descend(token)?;
                let child = self.not_expr()?;
                self.depth -= 1;
                Ok(Filter::negate(child))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Filter, FilterParseError> {
        let Some(token) = self.peek()? else {
            return Err(self.end("filter expression"));
        };
        match token.kind {
            TokenKind::Star => {
                self.cursor += 1;
                Ok(Filter::Any)
            }
            TokenKind::LeftBracket => {
                self.descend(token)?;
                let filter = self.or_expr()?;
                self.expect(TokenKind::RightBracket, "')'")?;
                self.depth -= 1;
                Ok(filter)
            }
            TokenKind::UnquotedWord | TokenKind::QuotedWord => {
                self.cursor += 1;
                let key = token.text();
                self.expect(TokenKind::Colon, "':' after filter key")?;
                let value = self.value_list()?;
                Ok(Filter::for_key(key, value))
            }
            _ => Err(unexpected(token, "filter expression")),
        }
    }

    fn value_list(&mut self) -> Result<ValueFilter, FilterParseError> {
        let mut values = NonEmpty::new(self.value()?);
        while self
            .peek()?
            .is_some_and(|token| token.kind == TokenKind::Comma)
        {
            self.cursor += 1;
            values.push(self.value()?);
        }
        Ok(ValueFilter::any_of(values))
    }

    fn value(&mut self) -> Result<ValueFilter, FilterParseError> {
        let Some(token) = self.peek()? else {
            return Err(self.end("value"));
        };
        match token.kind {
            TokenKind::RegexWord => {
                self.cursor += 1;
                self.regex_value(token, token.text())
            }
            TokenKind::UnquotedWord if token.text() == "~" => {
                self.cursor += 1;
                match self.peek()? {
                    Some(next) if next.kind.is_word() => {
                        self.cursor += 1;
                        self.regex_value(next, next.text())
                    }
                    Some(next) => Err(unexpected(next, "value after '~'")),
                    None => Err(self.end("value after '~'")),
                }
            }
            TokenKind::UnquotedWord if token.text().starts_with('~') => {
                self.cursor += 1;
                self.regex_value(token, &token.text()[1..])
            }
            TokenKind::UnquotedWord | TokenKind::QuotedWord => {
                self.cursor += 1;
                Ok(ValueFilter::equality(token.text()))
            }
            _ => Err(unexpected(token, "value")),
        }
    }

    /// Compile `pattern`, picking up a trailing `i` modifier.
    fn regex_value(
        &mut self,
        token: &Token,
        pattern: &str,
    ) -> Result<ValueFilter, FilterParseError> {
        let ignore_case = self
            .peek()?
            .is_some_and(|next| next.kind == TokenKind::CaseInsensitiveModifier);
        if ignore_case {
            self.cursor += 1;
        }
        ValueFilter::regex(pattern, ignore_case).map_err(|source| FilterParseError::InvalidRegex {
            position: token.position,
            pattern: pattern.to_string(),
            source,
        })
    }

    /// Consume `token`, which opens one more level of nesting.
    fn descend(&mut self, token: &Token) -> Result<(), FilterParseError> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(FilterParseError::TooDeep {
                position: token.position,
            });
        }
        self.depth += 1;
        self.cursor += 1;
        Ok(())
    }

    /// Next token; a lexer error token surfaces as a parse failure.
    fn peek(&self) -> Result<Option<&'t Token>, FilterParseError> {
        match self.tokens.get(self.cursor) {
            Some(token) if token.kind == TokenKind::Error => Err(FilterParseError::Lexical {
                position: token.position,
                message: token.text().to_string(),
            }),
            other => Ok(other),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), FilterParseError> {
        match self.peek()? {
            Some(token) if token.kind == kind => {
                self.cursor += 1;
                Ok(())
            }
            Some(token) => Err(unexpected(token, expected)),
            None => Err(self.end(expected)),
        }
    }

    fn eat_or(&mut self) -> Result<bool, FilterParseError> {
        let found = self
            .peek()?
            .is_some_and(|token| token.kind == TokenKind::Or || is_symbol(token, "|"));
        if found {
            self.cursor += 1;
        }
        Ok(found)
    }

    fn eat_and(&mut self) -> Result<bool, FilterParseError> {
        let found = self
            .peek()?
            .is_some_and(|token| token.kind == TokenKind::And || is_symbol(token, "&"));
        if found {
            self.cursor += 1;
        }
        Ok(found)
    }

    /// Whether the next token begins another operand of an implicit `and`.
    fn starts_operand(&self) -> Result<bool, FilterParseError> {
        let Some(token) = self.peek()? else {
            return Ok(false);
        };
        Ok(match token.kind {
            TokenKind::Star | TokenKind::LeftBracket | TokenKind::Not | TokenKind::QuotedWord => {
                true
            }
            TokenKind::UnquotedWord => {
                !is_symbol(token, "|")
                    && !is_symbol(token, "&")
                    && self.rule_keyword(self.cursor).is_none()
            }
            _ => false,
        })
    }

    /// In a filter set, `include` / `exclude` not used as a key start a rule.
    fn rule_keyword(&self, index: usize) -> Option<FilterRuleType> {
        if self.mode != Mode::FilterSet {
            return None;
        }
        let token = self.tokens.get(index)?;
        let rule_type = if token.is_bare("include") {
            FilterRuleType::Inclusion
        } else if token.is_bare("exclude") {
            FilterRuleType::Exclusion
        } else {
            return None;
        };
        let used_as_key = self
            .tokens
            .get(index + 1)
            .is_some_and(|next| next.kind == TokenKind::Colon);
        (!used_as_key).then_some(rule_type)
    }

    fn end(&self, expected: &'static str) -> FilterParseError {
        FilterParseError::UnexpectedEnd {
            position: self.input_len,
            expected,
        }
    }
}

fn is_symbol(token: &Token, symbol: &str) -> bool {
    token.kind == TokenKind::UnquotedWord && token.text() == symbol
}

fn unexpected(token: &Token, expected: &'static str) -> FilterParseError {
    FilterParseError::UnexpectedToken {
        position: token.position,
        expected,
        found: token.to_string(),
    }
}
