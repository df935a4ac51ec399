//! Migration stubs and their rendering

use crate::error::{Result, SmoothError};
use handlebars::Handlebars;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CREATE_STUB: &str = include_str!("stubs/create.stub");
const UPDATE_STUB: &str = include_str!("stubs/update.stub");

/// Indentation of statements inside the generated blueprint closure
pub const BODY_INDENT: &str = "            ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationAction {
    Create,
    Update,
}

impl MigrationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationAction::Create => "create",
            MigrationAction::Update => "update",
        }
    }

    fn embedded_stub(&self) -> &'static str {
        match self {
            MigrationAction::Create => CREATE_STUB,
            MigrationAction::Update => UPDATE_STUB,
        }
    }
}

impl FromStr for MigrationAction {
    type Err = SmoothError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(MigrationAction::Create),
            "update" => Ok(MigrationAction::Update),
            other => Err(SmoothError::UnsupportedAction(other.to_string())),
        }
    }
}

impl fmt::Display for MigrationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values substituted into a stub
#[derive(Debug, Clone, Default, Serialize)]
pub struct StubContext {
    pub class: String,
    pub table: String,
    pub up: String,
    pub down: String,
    pub rename_up: String,
    pub rename_down: String,
}

/// Source of migration stubs: the embedded ones, or `{action}.stub` files
/// from a directory.
#[derive(Debug, Clone, Default)]
pub struct Stubs {
    dir: Option<PathBuf>,
}

impl Stubs {
    pub fn embedded() -> Self {
        Self { dir: None }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn stub_path(dir: &Path, action: MigrationAction) -> PathBuf {
        dir.join(format!("{}.stub", action.as_str()))
    }

    pub fn load(&self, action: MigrationAction) -> Result<Cow<'static, str>> {
        match &self.dir {
            None => Ok(Cow::Borrowed(action.embedded_stub())),
            Some(dir) => {
                let path = Self::stub_path(dir, action);
                if !path.is_file() {
                    return Err(SmoothError::TemplateNotFound(path));
                }
                Ok(Cow::Owned(std::fs::read_to_string(&path)?))
            }
        }
    }

    pub fn render(&self, action: MigrationAction, context: &StubContext) -> Result<String> {
        let stub = self.load(action)?;

        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        Ok(handlebars.render_template(&stub, context)?)
    }
}
