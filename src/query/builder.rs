//! Backend-neutral SQL text builder.
//!
//! Values never enter the SQL text: every [`SqlBuilder::push_bind`] appends a `?`
//! placeholder and records the value, and both MySQL and SQLite accept `?`.

use crate::error_handling::SourceError;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

/// SQL text plus its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl BuiltQuery {
    /// A statement without parameters.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

#[derive(Debug, Default)]
pub struct SqlBuilder {
    sql: String,
    params: Vec<SqlParam>,
}

impl SqlBuilder {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            sql: initial.into(),
            params: Vec::new(),
        }
    }

    pub fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    pub fn push_bind(&mut self, param: impl Into<SqlParam>) -> &mut Self {
        self.sql.push('?');
        self.params.push(param.into());
        self
    }

    /// Appends `(?, ?, ...)` with one placeholder per value.
    ///
    /// An empty list renders as `(NULL)`, which matches nothing.
    pub fn push_bind_list<I, P>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<SqlParam>,
    {
        self.sql.push('(');
        let mut first = true;
        for value in values {
            if !first {
                self.sql.push_str(", ");
            }
            first = false;
            self.push_bind(value);
        }
        if first {
            self.sql.push_str("NULL");
        }
        self.sql.push(')');
        self
    }

    pub fn build(self) -> BuiltQuery {
        BuiltQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Checks that a user-supplied table name is a plain identifier and returns it
/// quoted with backticks (accepted by MySQL and SQLite).
pub fn quote_identifier(name: &str) -> Result<String, SourceError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        Ok(format!("`{name}`"))
    } else {
        Err(SourceError::InvalidIdentifier(name.to_string()))
    }
}
