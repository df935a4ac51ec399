pub mod template;

pub use template::{MigrationAction, StubContext, Stubs};

use crate::schema::{ColumnSpec, SpecToken};

/// Variable the generated migration binds the table blueprint to
pub const BLUEPRINT: &str = "$table";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    Safe,
    Destructive,
}

/// One line of generated migration code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStatement {
    pub safety: Safety,
    pub php: String,
}

impl RenderedStatement {
    pub fn new(php: String) -> Self {
        Self {
            php,
            safety: Safety::Safe,
        }
    }

    pub fn destructive(php: String) -> Self {
        Self {
            php,
            safety: Safety::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.safety == Safety::Destructive
    }
}

/// Single-quoted PHP string literal
pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Render a spec argument as a PHP literal.
///
/// Numbers and booleans are left bare, `[a,b]` becomes an array of qualified
/// elements, anything else is a string.
pub fn qualify(param: &str) -> String {
    let param = param.trim();

    if is_numeric(param) {
        return param.to_string();
    }
    if param.eq_ignore_ascii_case("true") || param.eq_ignore_ascii_case("false") {
        return param.to_ascii_lowercase();
    }
    if let Some(inner) = param.strip_prefix('[').and_then(|p| p.strip_suffix(']')) {
        let elements: Vec<String> = inner
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(qualify)
            .collect();
        return format!("[{}]", elements.join(", "));
    }

    escape_string(param)
}

fn is_numeric(param: &str) -> bool {
    !param.is_empty()
        && param
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        && param.parse::<f64>().is_ok()
}

/// `method(arg, arg)` with every argument qualified
pub fn render_call<'a>(method: &str, args: impl IntoIterator<Item = &'a str>) -> String {
    let args: Vec<String> = args.into_iter().map(qualify).collect();
    format!("{}({})", method, args.join(", "))
}

/// Chain tokens onto the blueprint: the first call receives the column name
/// as its leading argument unless the method is named after the column
/// (`timestamps`, `softDeletes`, `rememberToken`).
pub fn render_chain(column: &str, tokens: &[SpecToken]) -> String {
    let mut chain = String::from(BLUEPRINT);

    for (i, token) in tokens.iter().enumerate() {
        chain.push_str("->");
        let args = token.args.iter().map(String::as_str);
        if i == 0 && token.method != column {
            chain.push_str(&render_call(&token.method, std::iter::once(column).chain(args)));
        } else {
            chain.push_str(&render_call(&token.method, args));
        }
    }

    if tokens.is_empty() {
        chain.push_str(&format!("->{}()", column));
    }

    chain
}

/// `$table->method('arg');`
pub fn render_method<'a>(method: &str, args: impl IntoIterator<Item = &'a str>) -> String {
    format!("{}->{};", BLUEPRINT, render_call(method, args))
}

/// Render a column to its builder statement and, when it carries a foreign
/// key, the separate `foreign(...)` statement.
pub fn render_column(column: &str, spec: &ColumnSpec) -> (String, Option<String>) {
    let (column_part, foreign_part) = spec.split_foreign();
    let statement = format!("{};", render_chain(column, column_part.tokens()));
    let foreign = foreign_part.map(|fk| format!("{};", render_chain(column, fk.tokens())));
    (statement, foreign)
}
