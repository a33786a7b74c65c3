use super::lexer::{tokenize, Token, TokenKind};
use crate::config::ConfigError;
use crate::policy::{MAX_TTL, MIN_TTL};
use crate::zone::normalize_zone;
use crate::{DnsClass, NetworkTrie, Policy, QueryTypes, RecordType, Rule, RuleTable};
use ipnetwork::IpNetwork;
use std::net::IpAddr;
use std::sync::Arc;

pub const DIRECTIVE_NAME: &str = "intercept";

const RECORD_KEYWORD: &str = "record";
const NET_KEYWORD: &str = "net";
const WILDCARD: &str = "*";

#[derive(Debug)]
struct Word<'a> {
    text: &'a str,
    quoted: bool,
}

impl Word<'_> {
    fn is_keyword(&self, keyword: &str) -> bool {
        !self.quoted && self.text.eq_ignore_ascii_case(keyword)
    }

    fn is_wildcard(&self) -> bool {
        !self.quoted && self.text == WILDCARD
    }
}

/// Compiles directive text into a [`RuleTable`].
///
/// `server_zones` are used for `intercept` directives that name no zones;
/// when empty, such directives cover the root zone. The whole input is
/// validated before anything is returned, so an error never leaves a
/// partially built table behind.
pub fn parse_directives(input: &str, server_zones: &[String]) -> Result<RuleTable, ConfigError> {
    let tokens = tokenize(input)?;
    let mut cursor = 0;
    let mut rules = Vec::new();

    while cursor < tokens.len() {
        let token = &tokens[cursor];
        match &token.kind {
            TokenKind::Newline => cursor += 1,
            TokenKind::Word { text, quoted } if !quoted && text == DIRECTIVE_NAME => {
                let (rule, next) = parse_rule(&tokens, cursor + 1, token.line, server_zones)?;
                rules.push(rule);
                cursor = next;
            }
            TokenKind::Word { text, .. } => {
                return Err(directive_error(
                    token.line,
                    format!("unknown directive {:?}", text),
                ));
            }
            TokenKind::OpenBrace => {
                return Err(directive_error(token.line, "unexpected '{'"));
            }
            TokenKind::CloseBrace => {
                return Err(directive_error(token.line, "unexpected '}'"));
            }
        }
    }

    Ok(RuleTable::new(rules))
}

/// Parses zone arguments and the optional block, returning the index of the
/// first token after the directive.
fn parse_rule(
    tokens: &[Token],
    mut cursor: usize,
    line: usize,
    server_zones: &[String],
) -> Result<(Rule, usize), ConfigError> {
    let mut raw_zones: Vec<&str> = Vec::new();
    let mut has_block = false;

    while let Some(token) = tokens.get(cursor) {
        match &token.kind {
            TokenKind::Word { text, .. } => {
                raw_zones.push(text);
                cursor += 1;
            }
            TokenKind::OpenBrace => {
                has_block = true;
                cursor += 1;
                break;
            }
            TokenKind::Newline => break,
            TokenKind::CloseBrace => {
                return Err(directive_error(token.line, "unexpected '}'"));
            }
        }
    }

    let zones = resolve_zones(&raw_zones, server_zones, line)?;

    let mut policies = Vec::new();
    if has_block {
        let mut words: Vec<Word<'_>> = Vec::new();
        let mut words_line = line;
        let mut closed = false;

        while let Some(token) = tokens.get(cursor) {
            cursor += 1;
            match &token.kind {
                TokenKind::Word { text, quoted } => {
                    if words.is_empty() {
                        words_line = token.line;
                    }
                    words.push(Word {
                        text,
                        quoted: *quoted,
                    });
                }
                TokenKind::Newline | TokenKind::CloseBrace => {
                    if !words.is_empty() {
                        policies.push(parse_policy(&words, words_line)?);
                        words.clear();
                    }
                    if token.kind == TokenKind::CloseBrace {
                        closed = true;
                        break;
                    }
                }
                TokenKind::OpenBrace => {
                    return Err(directive_error(token.line, "nested blocks are not allowed"));
                }
            }
        }

        if !closed {
            return Err(directive_error(
                line,
                format!("{} block is missing its closing '}}'", DIRECTIVE_NAME),
            ));
        }
    }

    let rule = Rule::new(zones, policies).map_err(|e| directive_error(line, e.to_string()))?;
    Ok((rule, cursor))
}

fn resolve_zones(
    raw_zones: &[&str],
    server_zones: &[String],
    line: usize,
) -> Result<Vec<Arc<str>>, ConfigError> {
    let sources: Vec<&str> = if !raw_zones.is_empty() {
        raw_zones.to_vec()
    } else if !server_zones.is_empty() {
        server_zones.iter().map(String::as_str).collect()
    } else {
        vec!["."]
    };

    sources
        .into_iter()
        .map(|zone| {
            normalize_zone(zone)
                .map_err(|e| directive_error(line, format!("invalid zone {:?}: {}", zone, e)))
        })
        .collect()
}

/// `record <ttl> <class> <type|*> <answer>+ [net (<cidr>|*)+]`
fn parse_policy(words: &[Word<'_>], line: usize) -> Result<Policy, ConfigError> {
    let mut iter = words.iter();

    match iter.next() {
        Some(word) if word.is_keyword(RECORD_KEYWORD) => {}
        Some(word) => {
            return Err(directive_error(
                line,
                format!("expected '{}', found {:?}", RECORD_KEYWORD, word.text),
            ));
        }
        None => return Err(directive_error(line, "empty policy line")),
    }

    let ttl_word = iter
        .next()
        .ok_or_else(|| directive_error(line, "missing ttl after 'record'"))?;
    let ttl = parse_ttl(ttl_word.text, line)?;

    let class_word = iter
        .next()
        .ok_or_else(|| directive_error(line, format!("missing query class after ttl {}", ttl)))?;
    let class: DnsClass = class_word.text.parse().map_err(|_| {
        directive_error(line, format!("invalid query class {:?}", class_word.text))
    })?;

    let type_word = iter
        .next()
        .ok_or_else(|| directive_error(line, format!("missing RR type after class {}", class)))?;
    let qtypes = if type_word.is_wildcard() {
        QueryTypes::Wildcard
    } else {
        let record_type: RecordType = type_word.text.parse().map_err(|_| {
            directive_error(line, format!("invalid RR type {:?}", type_word.text))
        })?;
        QueryTypes::single(record_type)
    };

    let rest: Vec<&Word<'_>> = iter.collect();
    if rest.is_empty() {
        return Err(directive_error(
            line,
            format!("no answers given for RR type {:?}", type_word.text),
        ));
    }

    let mut answers: Vec<Arc<str>> = Vec::new();
    let mut index = 0;
    while index < rest.len() {
        let word = rest[index];
        if word.is_keyword(NET_KEYWORD) {
            if answers.is_empty() {
                return Err(directive_error(line, format!("invalid answer {:?}", word.text)));
            }
            break;
        }
        if !word.quoted && word.text.parse::<RecordType>().is_ok() {
            return Err(directive_error(
                line,
                format!(
                    "multiple RR types not allowed, found {:?} and {:?}",
                    type_word.text, word.text
                ),
            ));
        }
        validate_answer(&qtypes, word.text, line)?;
        answers.push(Arc::from(word.text));
        index += 1;
    }

    let filter = if index < rest.len() {
        let net_word = rest[index];
        parse_networks(&rest[index + 1..], net_word.text, line)?
    } else {
        NetworkTrie::universal()
    };

    Policy::new(class, qtypes, answers, ttl, filter).map_err(|e| directive_error(line, e.to_string()))
}

fn parse_ttl(text: &str, line: usize) -> Result<u32, ConfigError> {
    let ttl: i64 = text
        .parse()
        .map_err(|_| directive_error(line, format!("invalid ttl {:?}", text)))?;
    if ttl < MIN_TTL as i64 || ttl > MAX_TTL as i64 {
        return Err(directive_error(
            line,
            format!(
                "ttl provided is invalid: {} is outside {}..={}",
                text, MIN_TTL, MAX_TTL
            ),
        ));
    }
    Ok(ttl as u32)
}

fn validate_answer(qtypes: &QueryTypes, answer: &str, line: usize) -> Result<(), ConfigError> {
    let QueryTypes::Exact(types) = qtypes else {
        return Ok(());
    };
    let valid = types.iter().all(|t| match t {
        RecordType::A => answer.parse::<std::net::Ipv4Addr>().is_ok(),
        RecordType::AAAA => answer.parse::<std::net::Ipv6Addr>().is_ok(),
        _ => true,
    });
    if valid {
        Ok(())
    } else {
        Err(directive_error(line, format!("invalid IP notation {:?}", answer)))
    }
}

fn parse_networks(words: &[&Word<'_>], keyword: &str, line: usize) -> Result<NetworkTrie, ConfigError> {
    if words.is_empty() {
        return Err(directive_error(
            line,
            format!("no token specified in {:?} section", keyword.to_ascii_lowercase()),
        ));
    }

    let mut filter = NetworkTrie::new();
    let mut universal = false;
    for word in words {
        if word.is_wildcard() {
            universal = true;
            continue;
        }
        let network = parse_cidr(word.text)
            .ok_or_else(|| directive_error(line, format!("illegal CIDR notation {:?}", word.text)))?;
        filter.insert_network(network);
    }

    Ok(if universal {
        NetworkTrie::universal()
    } else {
        filter
    })
}

/// Strict CIDR parsing; a bare address means a single host.
fn parse_cidr(text: &str) -> Option<IpNetwork> {
    let (addr, prefix) = match text.split_once('/') {
        Some((addr, prefix)) => (addr.parse::<IpAddr>().ok()?, Some(prefix)),
        None => (text.parse::<IpAddr>().ok()?, None),
    };
    let prefix = match prefix {
        Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => p.parse::<u8>().ok()?,
        Some(_) => return None,
        None if addr.is_ipv4() => 32,
        None => 128,
    };
    IpNetwork::new(addr, prefix).ok()
}

fn directive_error(line: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::Directive {
        line,
        message: message.into(),
    }
}
