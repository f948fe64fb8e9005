//! Compact alignment codes.
//!
//! One character per axis: `-` anchors the minimum, `*` the center and `+`
//! the maximum, so `"**-"` centers a part in x and y and stands it on z = 0.

use grid_types::{Align, Align2, Align3};

use crate::error::BuildError;

/// Any of the accepted ways to spell an N-axis alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignInput<'a, const N: usize> {
    /// One character per axis, e.g. `"*+"`.
    Shorthand(&'a str),
    /// The same anchor on every axis.
    Uniform(Align),
    Explicit([Align; N]),
}

impl<'a, const N: usize> From<&'a str> for AlignInput<'a, N> {
    fn from(s: &'a str) -> Self {
        AlignInput::Shorthand(s)
    }
}

impl<const N: usize> From<Align> for AlignInput<'_, N> {
    fn from(a: Align) -> Self {
        AlignInput::Uniform(a)
    }
}

impl<const N: usize> From<[Align; N]> for AlignInput<'_, N> {
    fn from(a: [Align; N]) -> Self {
        AlignInput::Explicit(a)
    }
}

impl<const N: usize> AlignInput<'_, N> {
    pub fn resolve(&self) -> Result<[Align; N], BuildError> {
        match self {
            AlignInput::Shorthand(s) => {
                if s.chars().count() != N {
                    return Err(BuildError::InvalidAlign {
                        input: s.to_string(),
                        expected: N,
                    });
                }
                let mut out = [Align::Center; N];
                for (slot, c) in out.iter_mut().zip(s.chars()) {
                    *slot = char_to_align(c)?;
                }
                Ok(out)
            }
            AlignInput::Uniform(a) => Ok([*a; N]),
            AlignInput::Explicit(a) => Ok(*a),
        }
    }
}

pub fn char_to_align(c: char) -> Result<Align, BuildError> {
    match c {
        '-' => Ok(Align::Min),
        '*' => Ok(Align::Center),
        '+' => Ok(Align::Max),
        other => Err(BuildError::InvalidShorthand { ch: other }),
    }
}

/// Planar alignment; `None` keeps the native origin.
pub fn align2(input: Option<AlignInput<'_, 2>>) -> Result<Option<Align2>, BuildError> {
    input.map(|i| i.resolve()).transpose()
}

/// Spatial alignment; `None` keeps the native origin.
pub fn align3(input: Option<AlignInput<'_, 3>>) -> Result<Option<Align3>, BuildError> {
    input.map(|i| i.resolve()).transpose()
}

pub fn vec2(v: f64) -> [f64; 2] {
    [v, v]
}

pub fn vec3(v: f64) -> [f64; 3] {
    [v, v, v]
}
