//! Column spec strings
//!
//! A spec string is a compact description of one column, e.g.
//! `integer,on:users,onDelete:cascade` or `decimal:8 2,nullable`. Tokens are
//! separated by the token delimiter; a token is either a bare modifier or a
//! `key:value` pair whose values are separated by whitespace. Bracketed lists
//! (`enum:[draft,published]`) are kept whole.

use crate::constants::{
    DEFAULT_REFERENCE, FOREIGN, FOREIGN_ON, FOREIGN_ON_DELETE, FOREIGN_ON_UPDATE,
    FOREIGN_REFERENCES, MORPHS, NULLABLE_MORPHS, UNSIGNED,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Delimiters used to read and write spec strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecSyntax {
    pub token_delimiter: char,
    pub value_separator: char,
}

impl Default for SpecSyntax {
    fn default() -> Self {
        Self {
            token_delimiter: ',',
            value_separator: ':',
        }
    }
}

/// One parsed unit of a spec string: a schema-builder method and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecToken {
    pub method: String,
    pub args: Vec<String>,
}

impl SpecToken {
    pub fn bare(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(method: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// Canonical text of the token, used for set comparison
    fn canonical(&self) -> String {
        if self.args.is_empty() {
            self.method.clone()
        } else {
            format!("{}:{}", self.method, self.args.join(" "))
        }
    }
}

/// A parsed column spec, tokens kept in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSpec {
    tokens: Vec<SpecToken>,
}

impl ColumnSpec {
    pub fn parse(raw: &str, syntax: &SpecSyntax) -> Self {
        let tokens = split_top_level(raw, |c| c == syntax.token_delimiter)
            .into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| parse_token(t, syntax.value_separator))
            .collect();

        Self { tokens }
    }

    pub fn from_tokens(tokens: Vec<SpecToken>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[SpecToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, method: &str) -> Option<&SpecToken> {
        self.tokens.iter().find(|t| t.method == method)
    }

    pub fn has(&self, method: &str) -> bool {
        self.get(method).is_some()
    }

    /// The first token's method, e.g. `string` for `string:100,nullable`
    pub fn builder(&self) -> Option<&str> {
        self.tokens.first().map(|t| t.method.as_str())
    }

    pub fn has_foreign(&self) -> bool {
        self.has(FOREIGN_ON)
    }

    pub fn is_morph(&self) -> bool {
        self.has(MORPHS) || self.has(NULLABLE_MORPHS)
    }

    /// Append the implicit `references:id` to a foreign key without one
    pub fn normalized(mut self) -> Self {
        if self.has_foreign() && !self.has(FOREIGN_REFERENCES) {
            self.tokens.push(SpecToken::with_args(
                FOREIGN_REFERENCES,
                vec![DEFAULT_REFERENCE.to_string()],
            ));
        }
        self
    }

    /// Flattened token set, after default-reference normalization
    pub fn flatten(&self) -> BTreeSet<String> {
        self.clone()
            .normalized()
            .tokens
            .iter()
            .map(SpecToken::canonical)
            .collect()
    }

    /// True if either side has a token the other lacks
    pub fn differs_from(&self, other: &ColumnSpec) -> bool {
        self.flatten() != other.flatten()
    }

    /// Split into the column builder part and the foreign key part.
    ///
    /// The foreign part is ordered `foreign`, `references`, `on`, then the
    /// optional `onDelete`/`onUpdate` actions. A column carrying a foreign key
    /// is marked unsigned.
    pub fn split_foreign(&self) -> (ColumnSpec, Option<ColumnSpec>) {
        if !self.has_foreign() {
            return (self.clone(), None);
        }

        let args_of = |method: &str| {
            self.get(method)
                .map(|t| t.args.clone())
                .unwrap_or_default()
        };

        let mut references = args_of(FOREIGN_REFERENCES);
        if references.is_empty() {
            references.push(DEFAULT_REFERENCE.to_string());
        }

        let mut foreign = vec![
            SpecToken::with_args(FOREIGN, args_of(FOREIGN)),
            SpecToken::with_args(FOREIGN_REFERENCES, references),
            SpecToken::with_args(FOREIGN_ON, args_of(FOREIGN_ON)),
        ];
        for action in [FOREIGN_ON_DELETE, FOREIGN_ON_UPDATE] {
            if let Some(token) = self.get(action) {
                foreign.push(token.clone());
            }
        }

        let mut column: Vec<SpecToken> = self
            .tokens
            .iter()
            .filter(|t| !is_foreign_method(&t.method))
            .cloned()
            .collect();

        let already_unsigned = column.iter().any(|t| {
            t.method == UNSIGNED || t.method.starts_with("unsigned") || t.method == "foreignId"
        });
        if !already_unsigned {
            column.push(SpecToken::bare(UNSIGNED));
        }

        (
            ColumnSpec::from_tokens(column),
            Some(ColumnSpec::from_tokens(foreign)),
        )
    }

    /// The foreign key part only, if any
    pub fn foreign_part(&self) -> Option<ColumnSpec> {
        self.split_foreign().1
    }
}

fn is_foreign_method(method: &str) -> bool {
    matches!(
        method,
        FOREIGN | FOREIGN_REFERENCES | FOREIGN_ON | FOREIGN_ON_DELETE | FOREIGN_ON_UPDATE
    )
}

fn parse_token(token: &str, value_separator: char) -> SpecToken {
    match token.split_once(value_separator) {
        Some((method, values)) => {
            let args = split_top_level(values, char::is_whitespace)
                .into_iter()
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            SpecToken::with_args(method.trim(), args)
        }
        None => SpecToken::bare(token),
    }
}

/// Split on `is_delimiter`, ignoring delimiters inside `[...]`
fn split_top_level(input: &str, is_delimiter: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if depth == 0 && is_delimiter(c) => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);

    parts
}
