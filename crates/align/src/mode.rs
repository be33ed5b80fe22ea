use std::fmt;
use std::str::FromStr;

/// MAFFT alignment strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlignmentMode {
    /// Iterative refinement with local pairwise alignment. Most accurate.
    LInsI,
    /// Progressive method, two tree-building cycles. Fast.
    FftNs2,
    /// Let MAFFT pick a strategy from the input size.
    #[default]
    Auto,
}

impl AlignmentMode {
    pub const ALL: [AlignmentMode; 3] = [
        AlignmentMode::LInsI,
        AlignmentMode::FftNs2,
        AlignmentMode::Auto,
    ];

    /// Label as MAFFT's documentation spells it.
    pub fn label(self) -> &'static str {
        match self {
            AlignmentMode::LInsI => "L-INS-i",
            AlignmentMode::FftNs2 => "FFT-NS-2",
            AlignmentMode::Auto => "auto",
        }
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown alignment mode `{0}` (expected L-INS-i, FFT-NS-2 or auto)")]
pub struct ParseModeError(pub String);

impl FromStr for AlignmentMode {
    type Err = ParseModeError;

    /// Case-insensitive; `-` may be omitted (`linsi`, `fftns2`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "linsi" => Ok(AlignmentMode::LInsI),
            "fftns2" => Ok(AlignmentMode::FftNs2),
            "auto" => Ok(AlignmentMode::Auto),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
