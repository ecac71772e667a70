//! Legal lengths of a field.

use std::fmt;

use crate::errors::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Free,
    Fixed(usize),
    Range(usize, usize),
    Set(Vec<usize>),
}

/// Which byte lengths a field may take, plus an optional preferred length
/// for encoders that have to pick one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthConstraints {
    shape: Shape,
    suggested: Option<usize>,
}

impl Default for LengthConstraints {
    fn default() -> Self {
        Self::free()
    }
}

fn zero_length() -> KlvError {
    KlvError::new(ERR_CONSTRAINT, "length constraints cannot include zero")
}

fn excludes_all() -> KlvError {
    KlvError::new(ERR_CONSTRAINT, "length constraints cannot exclude all lengths")
}

impl LengthConstraints {
    /// Any length is allowed.
    pub const fn free() -> Self {
        Self {
            shape: Shape::Free,
            suggested: None,
        }
    }

    pub fn fixed(length: usize) -> Result<Self, KlvError> {
        if length == 0 {
            return Err(zero_length());
        }
        Ok(Self {
            shape: Shape::Fixed(length),
            suggested: None,
        })
    }

    /// Inclusive range `[minimum, maximum]`.
    pub fn range(minimum: usize, maximum: usize) -> Result<Self, KlvError> {
        if minimum == 0 {
            return Err(zero_length());
        }
        if minimum >= maximum {
            return Err(excludes_all());
        }
        Ok(Self {
            shape: Shape::Range(minimum, maximum),
            suggested: None,
        })
    }

    pub fn set(allowed: &[usize]) -> Result<Self, KlvError> {
        if allowed.is_empty() {
            return Err(excludes_all());
        }
        if allowed.contains(&0) {
            return Err(zero_length());
        }
        let mut allowed = allowed.to_vec();
        allowed.sort_unstable();
        allowed.dedup();
        Ok(Self {
            shape: Shape::Set(allowed),
            suggested: None,
        })
    }

    /// Same constraints with a preferred length.
    pub fn with_suggested(mut self, suggested: usize) -> Result<Self, KlvError> {
        self.set_suggested(suggested)?;
        Ok(self)
    }

    pub fn set_suggested(&mut self, suggested: usize) -> Result<(), KlvError> {
        if !self.do_allow(suggested) {
            return Err(KlvError::new(
                ERR_CONSTRAINT,
                format!("suggested length {suggested} violates {}", self.description()),
            ));
        }
        self.suggested = Some(suggested);
        Ok(())
    }

    pub fn do_allow(&self, length: usize) -> bool {
        match &self.shape {
            Shape::Free => true,
            Shape::Fixed(fixed) => length == *fixed,
            Shape::Range(min, max) => (*min..=*max).contains(&length),
            Shape::Set(allowed) => allowed.binary_search(&length).is_ok(),
        }
    }

    pub fn is_free(&self) -> bool {
        self.shape == Shape::Free
    }

    /// The single legal length, if there is exactly one.
    pub fn fixed_length(&self) -> Option<usize> {
        match self.shape {
            Shape::Fixed(fixed) => Some(fixed),
            _ => None,
        }
    }

    pub fn fixed_or(&self, backup: usize) -> usize {
        self.fixed_length().unwrap_or(backup)
    }

    /// The explicit suggestion if set, otherwise the fixed length, the
    /// range minimum, or the smallest set member.  `None` for free
    /// constraints with no suggestion.
    pub fn suggested(&self) -> Option<usize> {
        if self.suggested.is_some() {
            return self.suggested;
        }
        match &self.shape {
            Shape::Free => None,
            Shape::Fixed(fixed) => Some(*fixed),
            Shape::Range(min, _) => Some(*min),
            Shape::Set(allowed) => allowed.first().copied(),
        }
    }

    pub fn suggested_or(&self, backup: usize) -> usize {
        self.suggested().unwrap_or(backup)
    }

    /// Smallest legal length not below `natural`, or `natural` itself when
    /// nothing larger is allowed.
    pub fn fit(&self, natural: usize) -> usize {
        match &self.shape {
            Shape::Free => natural,
            Shape::Fixed(fixed) => *fixed,
            Shape::Range(min, _) => natural.max(*min),
            Shape::Set(allowed) => allowed
                .iter()
                .copied()
                .find(|&length| length >= natural)
                .unwrap_or(natural),
        }
    }

    pub fn description(&self) -> String {
        match &self.shape {
            Shape::Free => "length unconstrained".to_string(),
            Shape::Fixed(fixed) => format!("length must be {fixed}"),
            Shape::Range(min, max) => format!("length in [{min},{max}]"),
            Shape::Set(allowed) => {
                let members: Vec<String> = allowed.iter().map(usize::to_string).collect();
                format!("length in {{{}}}", members.join(","))
            }
        }
    }
}

impl fmt::Display for LengthConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
