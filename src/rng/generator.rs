use super::*;
use crate::Error;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

/// Which generator backs a [`Source`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RngKind {
    #[default]
    Mersenne,
    Linear,
    Xorshift,
}

impl RngKind {
    pub const fn all() -> [Self; 3] {
        [Self::Mersenne, Self::Linear, Self::Xorshift]
    }
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mersenne => "mersenne",
            Self::Linear => "lcg",
            Self::Xorshift => "xorshift",
        }
    }
}

impl FromStr for RngKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mersenne" | "mt" | "mt19937" | "mersenne-twister" => Ok(Self::Mersenne),
            "lcg" | "linear" => Ok(Self::Linear),
            "xorshift" | "xorshift32" => Ok(Self::Xorshift),
            _ => Err(Error::UnknownGenerator(s.to_string())),
        }
    }
}

impl TryFrom<String> for RngKind {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RngKind> for String {
    fn from(kind: RngKind) -> Self {
        kind.name().to_string()
    }
}

impl Display for RngKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed set of generators, dispatched by exhaustive match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generator {
    Mersenne(Mersenne),
    Linear(Linear),
    Xorshift(Xorshift),
}

impl Generator {
    pub fn kind(&self) -> RngKind {
        match self {
            Self::Mersenne(_) => RngKind::Mersenne,
            Self::Linear(_) => RngKind::Linear,
            Self::Xorshift(_) => RngKind::Xorshift,
        }
    }
    pub fn next_u32(&mut self) -> u32 {
        match self {
            Self::Mersenne(g) => g.next_u32(),
            Self::Linear(g) => g.next_u32(),
            Self::Xorshift(g) => g.next_u32(),
        }
    }
}

impl From<(RngKind, u32)> for Generator {
    fn from((kind, seed): (RngKind, u32)) -> Self {
        match kind {
            RngKind::Mersenne => Self::Mersenne(Mersenne::new(seed)),
            RngKind::Linear => Self::Linear(Linear::new(seed)),
            RngKind::Xorshift => Self::Xorshift(Xorshift::new(seed)),
        }
    }
}
