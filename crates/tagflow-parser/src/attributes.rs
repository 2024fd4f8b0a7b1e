//! Attribute collection for a single tag.
//!
//! The parser reads every `name='value'` pair of a tag into an
//! [`AttributeBag`] without looking at the names. Checking which attributes
//! are allowed or required happens afterwards, in [`crate::rules`].

use indexmap::IndexMap;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::{Location, Span},
    tokens::Token,
};

/// A `name='value'` pair with the positions of both halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
    name_span: Span,
    name_location: Location,
    value_span: Span,
    value_location: Location,
}

impl Attribute {
    /// Builds an attribute from its name token and string literal token.
    pub fn new(name: Token, value: Token) -> Self {
        Self {
            name_span: name.span(),
            name_location: name.location(),
            value_span: value.span(),
            value_location: value.location(),
            name: name.into_text(),
            value: value.into_text(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn name_span(&self) -> Span {
        self.name_span
    }

    pub fn name_location(&self) -> Location {
        self.name_location
    }

    pub fn value_span(&self) -> Span {
        self.value_span
    }

    pub fn value_location(&self) -> Location {
        self.value_location
    }

    /// Source range from the start of the name to the end of the value.
    pub fn span(&self) -> Span {
        self.name_span.union(self.value_span)
    }

    /// An error pointing at the value of this attribute.
    pub fn invalid_value(&self, code: ErrorCode, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(message)
            .with_code(code)
            .at(self.value_location)
            .with_label(self.value_span, code.description())
    }
}

/// The attributes of one tag in source order.
///
/// The first occurrence of a name is kept; later occurrences are recorded
/// as duplicates and reported by [`AttributeBag::check_allowed`].
#[derive(Debug, Clone, Default)]
pub struct AttributeBag {
    attributes: IndexMap<String, Attribute>,
    duplicates: Vec<Attribute>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attribute: Attribute) {
        if self.attributes.contains_key(attribute.name()) {
            self.duplicates.push(attribute);
        } else {
            self.attributes
                .insert(attribute.name().to_string(), attribute);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(Attribute::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn duplicates(&self) -> &[Attribute] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Rejects duplicated attributes (`E205`) and attributes not in
    /// `allowed` (`E201`).
    pub fn check_allowed(&self, tag: &Token, allowed: &[&str]) -> Result<(), Diagnostic> {
        if let Some(duplicate) = self.duplicates.first() {
            let message = format!(
                "duplicate attribute `{}` on `{}`",
                duplicate.name(),
                tag.text()
            );
            let mut diagnostic = Diagnostic::error(message)
                .with_code(ErrorCode::E205)
                .at(duplicate.name_location())
                .with_label(duplicate.name_span(), "duplicate here");
            if let Some(first) = self.get(duplicate.name()) {
                diagnostic =
                    diagnostic.with_secondary_label(first.span(), "first given here");
            }
            return Err(diagnostic);
        }

        if let Some(unknown) = self.iter().find(|attr| !allowed.contains(&attr.name())) {
            let help = if allowed.is_empty() {
                format!("`{}` takes no attributes", tag.text())
            } else {
                format!("allowed attributes: {}", allowed.join(", "))
            };
            return Err(Diagnostic::error(format!(
                "attribute `{}` is not allowed on `{}`",
                unknown.name(),
                tag.text()
            ))
            .with_code(ErrorCode::E201)
            .at(unknown.name_location())
            .with_label(unknown.name_span(), ErrorCode::E201.description())
            .with_help(help));
        }

        Ok(())
    }

    /// Returns the attribute `name` or a missing-attribute error (`E200`)
    /// located at the tag name.
    pub fn require(&self, tag: &Token, name: &str) -> Result<&Attribute, Diagnostic> {
        self.get(name).ok_or_else(|| {
            Diagnostic::error(format!(
                "missing required attribute `{name}` on `{}`",
                tag.text()
            ))
            .with_code(ErrorCode::E200)
            .at(tag.location())
            .with_label(tag.span(), format!("`{name}` is missing"))
            .with_help(format!("add `{name}='...'` to the tag"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    fn token(kind: TokenKind, text: &str, start: usize, col: usize) -> Token {
        Token::new(
            kind,
            text,
            Span::new(start..start + text.len()),
            Location::new(1, col),
        )
    }

    fn attribute(name: &str, value: &str, start: usize) -> Attribute {
        let value_start = start + name.len() + 1;
        Attribute::new(
            token(TokenKind::Identifier, name, start, start + 1),
            token(TokenKind::StringLiteral, value, value_start, value_start + 1),
        )
    }

    fn task_tag() -> Token {
        token(TokenKind::EventType, "task", 1, 2)
    }

    #[test]
    fn test_insert_keeps_source_order() {
        let mut bag = AttributeBag::new();
        bag.insert(attribute("name", "Review", 6));
        bag.insert(attribute("id", "a", 20));

        let names: Vec<_> = bag.iter().map(Attribute::name).collect();
        assert_eq!(names, vec!["name", "id"]);
        assert_eq!(bag.value("id"), Some("a"));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut bag = AttributeBag::new();
        bag.insert(attribute("id", "a", 6));
        bag.insert(attribute("id", "b", 13));

        assert_eq!(bag.value("id"), Some("a"));
        assert_eq!(bag.duplicates().len(), 1);

        let err = bag.check_allowed(&task_tag(), &["id"]).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E205));
        assert_eq!(err.location(), Location::new(1, 14));
        assert_eq!(err.labels().len(), 2);
        assert_eq!(err.labels()[1].span(), Span::new(6..10));
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let mut bag = AttributeBag::new();
        bag.insert(attribute("id", "a", 6));
        bag.insert(attribute("color", "red", 13));

        let err = bag.check_allowed(&task_tag(), &["id", "name"]).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E201));
        assert_eq!(err.message(), "attribute `color` is not allowed on `task`");
        assert_eq!(err.help(), Some("allowed attributes: id, name"));
    }

    #[test]
    fn test_require() {
        let mut bag = AttributeBag::new();
        bag.insert(attribute("name", "Review", 6));

        assert_eq!(bag.require(&task_tag(), "name").unwrap().value(), "Review");

        let err = bag.require(&task_tag(), "id").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E200));
        assert_eq!(err.location(), Location::new(1, 2));
    }

    #[test]
    fn test_invalid_value_points_at_value() {
        let attr = attribute("row", "middle", 6);
        let err = attr.invalid_value(ErrorCode::E202, "unknown row `middle`");
        assert_eq!(err.location(), attr.value_location());
        assert_eq!(err.primary_span(), Some(attr.value_span()));
    }
}
