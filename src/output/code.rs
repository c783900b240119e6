// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Generated program fragments in OpenSCAD call syntax

use crate::geometry::{Transform3D, Vec2, Vec3};
use std::fmt::{self, Write as _};

/// Parameter value of a module call
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Number(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
    Vector(Vec<Param>),
    Undef,
}

/// Fixed 6-decimal formatting, negative zero printed as zero
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "undef".to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.6}")
}

/// Quote a string, escaping backslash, newline and double quote
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Number(v) => f.write_str(&format_number(*v)),
            Param::Integer(v) => write!(f, "{v}"),
            Param::Bool(v) => write!(f, "{v}"),
            Param::Text(s) => f.write_str(&quote(s)),
            Param::Vector(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Param::Undef => f.write_str("undef"),
        }
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Number(v)
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Integer(v)
    }
}

impl From<usize> for Param {
    fn from(v: usize) -> Self {
        Param::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl From<Vec2> for Param {
    fn from(v: Vec2) -> Self {
        Param::Vector(vec![v.x.into(), v.y.into()])
    }
}

impl From<Vec3> for Param {
    fn from(v: Vec3) -> Self {
        Param::Vector(vec![v.x.into(), v.y.into(), v.z.into()])
    }
}

impl<const N: usize> From<[f64; N]> for Param {
    fn from(v: [f64; N]) -> Self {
        Param::Vector(v.iter().map(|x| Param::Number(*x)).collect())
    }
}

impl From<Transform3D> for Param {
    fn from(t: Transform3D) -> Self {
        Param::Vector(t.rows().into_iter().map(Param::from).collect())
    }
}

impl<T: Into<Param>> From<Vec<T>> for Param {
    fn from(items: Vec<T>) -> Self {
        Param::Vector(items.into_iter().map(Into::into).collect())
    }
}

/// A module call with optional children, or nothing at all
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CodeFragment {
    #[default]
    Empty,
    Call(Call),
}

/// `name(params) body`, optionally prefixed by a modifier character
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub modifier: Option<char>,
    pub name: String,
    pub params: Vec<(Option<String>, Param)>,
    pub children: Vec<CodeFragment>,
}

impl CodeFragment {
    pub fn call(name: impl Into<String>) -> Self {
        CodeFragment::Call(Call {
            modifier: None,
            name: name.into(),
            params: Vec::new(),
            children: Vec::new(),
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CodeFragment::Empty)
    }

    /// Named parameter; ignored on an empty fragment
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Param>) -> Self {
        if let CodeFragment::Call(call) = &mut self {
            call.params.push((Some(name.into()), value.into()));
        }
        self
    }

    pub fn positional(mut self, value: impl Into<Param>) -> Self {
        if let CodeFragment::Call(call) = &mut self {
            call.params.push((None, value.into()));
        }
        self
    }

    pub fn child(self, child: CodeFragment) -> Self {
        self.children([child])
    }

    /// Append children, dropping empty ones
    pub fn children(mut self, children: impl IntoIterator<Item = CodeFragment>) -> Self {
        if let CodeFragment::Call(call) = &mut self {
            call.children
                .extend(children.into_iter().filter(|c| !c.is_empty()));
        }
        self
    }

    /// Prefix the outermost call with a modifier character (`#`, `%`, `*`, `!`)
    pub fn with_modifier(mut self, modifier: char) -> Self {
        if let CodeFragment::Call(call) = &mut self {
            call.modifier = Some(modifier);
        }
        self
    }

    /// Wrap in a new call taking this fragment as its only child
    pub fn wrapped(self, parent: CodeFragment) -> Self {
        if self.is_empty() {
            return self;
        }
        parent.child(self)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, 0, true);
        out
    }

    fn write_to(&self, out: &mut String, indent: usize, leading: bool) {
        let CodeFragment::Call(call) = self else {
            return;
        };
        if leading {
            out.push_str(&"  ".repeat(indent));
        }
        if let Some(modifier) = call.modifier {
            out.push(modifier);
        }
        out.push_str(&call.name);
        out.push('(');
        for (i, (name, value)) in call.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if let Some(name) = name {
                out.push_str(name);
                out.push('=');
            }
            let _ = write!(out, "{value}");
        }
        out.push(')');

        match call.children.as_slice() {
            [] => out.push(';'),
            [only] => {
                out.push(' ');
                only.write_to(out, indent, false);
            }
            children => {
                out.push_str(" {\n");
                for child in children {
                    child.write_to(out, indent + 1, true);
                    out.push('\n');
                }
                out.push_str(&"  ".repeat(indent));
                out.push('}');
            }
        }
    }
}

impl fmt::Display for CodeFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
