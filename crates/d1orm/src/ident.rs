//! Identifier checks for table and column names.
//!
//! Values are always bound, but table and column names are spliced into the SQL text,
//! so every name that reaches a builder through a data mapping or a WHERE column is
//! checked here first.
//!
//! Accepted forms:
//! - bare: `[A-Za-z_][A-Za-z0-9_$]*`
//! - dotted: `main.users`, `u.id`
//! - double-quoted parts: `"Display Name"`, with `""` as an escaped quote

use crate::error::{OrmError, OrmResult};

/// What kind of name is being checked; only used to word error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentKind {
    Table,
    Column,
}

impl IdentKind {
    fn as_str(self) -> &'static str {
        match self {
            IdentKind::Table => "table",
            IdentKind::Column => "column",
        }
    }
}

/// Check that `name` is a plain (optionally dotted or quoted) SQLite identifier.
pub fn check_ident(name: &str, kind: IdentKind) -> OrmResult<()> {
    let fail = |reason: &str| {
        Err(OrmError::validation(format!(
            "invalid {} name {:?}: {}",
            kind.as_str(),
            name,
            reason
        )))
    };

    if name.is_empty() {
        return fail("empty");
    }
    if name.contains('\0') {
        return fail("contains NUL");
    }

    let mut chars = name.chars().peekable();
    loop {
        if chars.peek() == Some(&'"') {
            chars.next();
            let mut len = 0usize;
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        len += 1;
                    }
                    Some('"') => break,
                    Some(_) => len += 1,
                    None => return fail("unclosed quote"),
                }
            }
            if len == 0 {
                return fail("empty quoted segment");
            }
        } else {
            match chars.next() {
                Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
                Some(c) => return fail(&format!("unexpected character '{c}'")),
                None => return fail("empty segment"),
            }
            while let Some(&c) = chars.peek() {
                if c == '_' || c == '$' || c.is_ascii_alphanumeric() {
                    chars.next();
                } else {
                    break;
                }
            }
        }

        match chars.next() {
            None => return Ok(()),
            Some('.') => continue,
            Some(c) => return fail(&format!("unexpected character '{c}'")),
        }
    }
}
