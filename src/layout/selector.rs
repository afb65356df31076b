//! Selector strings for sibling references using logos
//!
//! A reference string is one of:
//! - a percentage (`30%`)
//! - a sibling pseudo-selector (`prev()`, `next()`)
//! - a flat selector: an optional type name or `*`, followed by an optional
//!   `#id` and any number of `.class` parts (`Button.primary#ok`)
//!
//! Combinators are not supported; a selector is matched against the
//! siblings of a widget only.

use std::fmt;

use logos::Logos;

use crate::error::{SelectorError, Span};

use super::types::SiblingDescriptor;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[token("*")]
    Star,
    #[token("prev()")]
    Prev,
    #[token("next()")]
    Next,

    #[regex(r"-?[0-9]+(\.[0-9]+)?%", |lex| {
        let s = lex.slice();
        s[..s.len() - 1].parse::<f64>().ok()
    })]
    Percent(f64),

    #[regex(r"#[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice()[1..].to_string())]
    Id(String),

    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice()[1..].to_string())]
    Class(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),
}

/// Lex a reference string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Result<Token, ()>, Span)> + '_ {
    Token::lexer(input).spanned()
}

/// Descriptive data of a widget that selectors match against
pub trait Selectable {
    fn type_name(&self) -> &str;
    fn widget_id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

/// A flat selector together with the text it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    type_name: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a flat selector; percentages and pseudo-selectors are rejected
    pub fn parse(text: &str) -> Result<Selector, SelectorError> {
        match parse_reference(text)? {
            Shorthand::Selector(selector) => Ok(selector),
            _ => Err(SelectorError::syntax(
                text,
                0..text.len(),
                "expected a selector",
            )),
        }
    }

    /// The selector text as written by the application
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this is the universal selector `*` without further parts
    pub fn is_universal(&self) -> bool {
        self.type_name.is_none() && self.id.is_none() && self.classes.is_empty()
    }

    pub fn matches<S: Selectable + ?Sized>(&self, widget: &S) -> bool {
        if let Some(type_name) = &self.type_name {
            if widget.type_name() != type_name {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if widget.widget_id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| widget.has_class(c))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A string given as a layout value, classified
#[derive(Debug, Clone, PartialEq)]
pub enum Shorthand {
    Percent(f64),
    Sibling(SiblingDescriptor),
    Selector(Selector),
}

/// Classify a string layout value
pub fn parse_reference(text: &str) -> Result<Shorthand, SelectorError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::syntax(text, 0..text.len(), "empty selector"));
    }
    let start = text.len() - text.trim_start().len();

    let mut tokens = Vec::new();
    for (tok, span) in lex(trimmed) {
        let span = span.start + start..span.end + start;
        match tok {
            Ok(tok) => tokens.push((tok, span)),
            Err(()) => {
                let message = if text[span.clone()].trim().is_empty() {
                    "combinators are not supported"
                } else {
                    "unexpected character"
                };
                return Err(SelectorError::syntax(text, span, message));
            }
        }
    }

    let standalone = |kind: &str, span: &Span| {
        SelectorError::syntax(text, span.clone(), format!("{} must stand alone", kind))
    };

    match tokens.as_slice() {
        [(Token::Percent(p), _)] => return Ok(Shorthand::Percent(*p)),
        [(Token::Prev, _)] => return Ok(Shorthand::Sibling(SiblingDescriptor::Prev)),
        [(Token::Next, _)] => return Ok(Shorthand::Sibling(SiblingDescriptor::Next)),
        _ => {}
    }

    let mut selector = Selector {
        source: trimmed.to_string(),
        type_name: None,
        id: None,
        classes: Vec::new(),
    };
    for (index, (tok, span)) in tokens.into_iter().enumerate() {
        match tok {
            Token::Star | Token::Ident(_) if index > 0 => {
                return Err(SelectorError::syntax(
                    text,
                    span,
                    "type selector must come first",
                ));
            }
            Token::Star => {}
            Token::Ident(name) => selector.type_name = Some(name),
            Token::Id(id) => {
                if selector.id.is_some() {
                    return Err(SelectorError::syntax(text, span, "duplicate id selector"));
                }
                selector.id = Some(id);
            }
            Token::Class(class) => selector.classes.push(class),
            Token::Percent(_) => return Err(standalone("percentage", &span)),
            Token::Prev => return Err(standalone("prev()", &span)),
            Token::Next => return Err(standalone("next()", &span)),
        }
    }
    Ok(Shorthand::Selector(selector))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake {
        type_name: &'static str,
        id: Option<&'static str>,
        classes: Vec<&'static str>,
    }

    impl Selectable for Fake {
        fn type_name(&self) -> &str {
            self.type_name
        }
        fn widget_id(&self) -> Option<&str> {
            self.id
        }
        fn has_class(&self, class: &str) -> bool {
            self.classes.contains(&class)
        }
    }

    fn button() -> Fake {
        Fake {
            type_name: "Button",
            id: Some("ok"),
            classes: vec!["primary", "wide"],
        }
    }

    #[test]
    fn test_lex_tokens() {
        let tokens: Vec<_> = lex("Button#ok.primary").map(|(t, _)| t.unwrap()).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("Button".to_string()),
                Token::Id("ok".to_string()),
                Token::Class("primary".to_string()),
            ]
        );
    }

    #[test]
    fn test_lex_pseudo_and_percent() {
        let tokens: Vec<_> = lex("prev()").map(|(t, _)| t.unwrap()).collect();
        assert_eq!(tokens, vec![Token::Prev]);
        let tokens: Vec<_> = lex("12.5%").map(|(t, _)| t.unwrap()).collect();
        assert_eq!(tokens, vec![Token::Percent(12.5)]);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_reference("30%").unwrap(), Shorthand::Percent(30.0));
        assert_eq!(parse_reference("-5%").unwrap(), Shorthand::Percent(-5.0));
    }

    #[test]
    fn test_parse_siblings() {
        assert_eq!(
            parse_reference("prev()").unwrap(),
            Shorthand::Sibling(SiblingDescriptor::Prev)
        );
        assert_eq!(
            parse_reference("next()").unwrap(),
            Shorthand::Sibling(SiblingDescriptor::Next)
        );
    }

    #[test]
    fn test_match_id_class_type() {
        let b = button();
        assert!(Selector::parse("#ok").unwrap().matches(&b));
        assert!(Selector::parse(".primary").unwrap().matches(&b));
        assert!(Selector::parse("Button").unwrap().matches(&b));
        assert!(Selector::parse("*").unwrap().matches(&b));
        assert!(Selector::parse("Button.primary.wide#ok").unwrap().matches(&b));
        assert!(!Selector::parse("#cancel").unwrap().matches(&b));
        assert!(!Selector::parse(".secondary").unwrap().matches(&b));
        assert!(!Selector::parse("Label").unwrap().matches(&b));
        assert!(!Selector::parse("Button.secondary").unwrap().matches(&b));
    }

    #[test]
    fn test_universal() {
        assert!(Selector::parse("*").unwrap().is_universal());
        assert!(!Selector::parse("*.foo").unwrap().is_universal());
    }

    #[test]
    fn test_selector_keeps_source() {
        let s = Selector::parse("  .foo").unwrap();
        assert_eq!(s.as_str(), ".foo");
        assert_eq!(s.to_string(), ".foo");
    }

    #[test]
    fn test_reject_combinator() {
        let err = parse_reference("Composite .foo").unwrap_err();
        assert!(err.to_string().contains("combinators are not supported"));
    }

    #[test]
    fn test_reject_misplaced_parts() {
        assert!(parse_reference(".foo Button").is_err());
        assert!(parse_reference(".foo*").is_err());
        assert!(parse_reference("#a#b").is_err());
        assert!(parse_reference("prev().foo").is_err());
        assert!(parse_reference("30%.foo").is_err());
        assert!(parse_reference("").is_err());
        assert!(parse_reference("30").is_err());
    }

    #[test]
    fn test_parse_rejects_non_selectors() {
        assert!(Selector::parse("prev()").is_err());
        assert!(Selector::parse("50%").is_err());
    }
}
