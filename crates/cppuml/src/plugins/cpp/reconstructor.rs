//! Type spelling reconstruction
//!
//! Some front-ends collapse a type they cannot resolve into a fixed
//! sentinel spelling (libclang reports `int` for invalid and some dependent
//! types). When that happens the declaration's raw tokens still carry the
//! written type, so it is recovered lexically: everything before the
//! declared name, minus storage and attribute noise. The result is a
//! diagram label, not compilable C++.

use tracing::{trace, warn};

use crate::core::{strip_scope, Cursor};

/// Spelling reported for types the front-end could not resolve
pub const DEFAULT_SENTINEL: &str = "int";

const STORAGE_NOISE: &[&str] = &["static", "constexpr", "consteval", "constinit"];
const CALLABLE_NOISE: &[&str] = &["virtual", "explicit", "inline", "friend"];

/// Whether a declaration is a variable or a callable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationRole {
    /// Fields, variables and parameters; bounded by `=`
    Variable,
    /// Methods and functions; bounded by `(`
    Callable,
}

impl DeclarationRole {
    fn bound_token(self) -> &'static str {
        match self {
            DeclarationRole::Variable => "=",
            DeclarationRole::Callable => "(",
        }
    }
}

/// Recovers type spellings from raw tokens
#[derive(Debug, Clone)]
pub struct TypeReconstructor {
    sentinel: String,
}

impl TypeReconstructor {
    pub fn new() -> Self {
        Self::with_sentinel(DEFAULT_SENTINEL)
    }

    pub fn with_sentinel(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Best-effort type of a variable, parameter, or the return type of a callable
    pub fn reconstruct<C: Cursor>(&self, cursor: &C) -> String {
        let role = if cursor.kind().is_callable() {
            DeclarationRole::Callable
        } else {
            DeclarationRole::Variable
        };
        self.reconstruct_spelling(cursor.type_spelling(), cursor.spelling(), cursor.tokens(), role)
    }

    /// Reconstruct from the individual node facts
    pub fn reconstruct_spelling(
        &self,
        reported: &str,
        name: &str,
        tokens: &[String],
        role: DeclarationRole,
    ) -> String {
        let filtered = filter_tokens(tokens, role);

        if reported != self.sentinel || filtered.first() == Some(&self.sentinel.as_str()) {
            return strip_scope(reported);
        }

        match name_index(&filtered, name, role) {
            Some(index) if index > 0 => {
                let spelling = strip_scope(&join_tokens(&filtered[..index]));
                trace!(name, reported, spelling = %spelling, "Reconstructed type from tokens");
                spelling
            }
            _ => {
                warn!(
                    name,
                    role = ?role,
                    "Could not locate the declared name; keeping the unresolved type"
                );
                self.sentinel.clone()
            }
        }
    }
}

impl Default for TypeReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop storage/qualifier keywords and `[[...]]` attributes
fn filter_tokens(tokens: &[String], role: DeclarationRole) -> Vec<&str> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut attribute_depth = 0i32;
    let mut iter = tokens.iter().map(String::as_str).peekable();

    while let Some(token) = iter.next() {
        if attribute_depth > 0 {
            if !token.starts_with('"') {
                for c in token.chars() {
                    match c {
                        '[' => attribute_depth += 1,
                        ']' => attribute_depth -= 1,
                        _ => {}
                    }
                }
            }
            continue;
        }

        if token == "[[" {
            attribute_depth = 2;
            continue;
        }
        if token == "[" && iter.peek() == Some(&"[") {
            iter.next();
            attribute_depth = 2;
            continue;
        }

        if STORAGE_NOISE.contains(&token) {
            continue;
        }
        if role == DeclarationRole::Callable && CALLABLE_NOISE.contains(&token) {
            continue;
        }

        out.push(token);
    }

    out
}

/// Index of the declared name's token, searched after any template
/// argument list that closes before the bound
fn name_index(tokens: &[&str], name: &str, role: DeclarationRole) -> Option<usize> {
    let bound = tokens
        .iter()
        .position(|t| *t == role.bound_token())
        .unwrap_or(tokens.len());
    let start = tokens[..bound]
        .iter()
        .rposition(|t| *t == ">")
        .map_or(0, |i| i + 1);

    // `operator==` is lexed as `operator` `==`
    let target = if name.starts_with("operator") {
        "operator"
    } else {
        name
    };
    let found = tokens[start..bound]
        .iter()
        .position(|t| *t == target)
        .map(|i| i + start);

    match role {
        DeclarationRole::Variable => found,
        DeclarationRole::Callable => found.or_else(|| bound.checked_sub(1)),
    }
}

/// Concatenate tokens, separating two words by one space
fn join_tokens(tokens: &[&str]) -> String {
    let mut out = String::new();
    for token in tokens {
        let between_words = matches!(
            (out.chars().last(), token.chars().next()),
            (Some(a), Some(b)) if a.is_alphanumeric() && b.is_alphanumeric()
        );
        if between_words {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}
