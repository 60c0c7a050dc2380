use std::{fmt, str::FromStr};

use crate::ParseError;

/// Highest supported quality level. Higher levels are clamped to it.
pub const MAX_LEVEL: u32 = 18;

/// Selects how the interpolated BC1 colors are computed.
///
/// Hardware vendors do not agree on the exact rounding of the two derived BC1 colors. The encoder
/// must know which decoder it is targeting to compute an exact reconstruction error.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub enum Bc1ApproxMode {
    /// Exact thirds and halves of the expanded 8-bit endpoints, rounded down.
    #[default]
    Ideal,
    /// Approximation of NVIDIA hardware, which blends the 5-bit channels directly.
    Nvidia,
    /// Approximation of AMD hardware.
    Amd,
    /// Exact thirds and halves of the expanded 8-bit endpoints, rounded to nearest.
    IdealRound4,
}

impl Bc1ApproxMode {
    /// All approximation modes.
    pub const ALL: [Bc1ApproxMode; 4] = [
        Bc1ApproxMode::Ideal,
        Bc1ApproxMode::Nvidia,
        Bc1ApproxMode::Amd,
        Bc1ApproxMode::IdealRound4,
    ];

    /// The name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Bc1ApproxMode::Ideal => "ideal",
            Bc1ApproxMode::Nvidia => "nvidia",
            Bc1ApproxMode::Amd => "amd",
            Bc1ApproxMode::IdealRound4 => "ideal_round4",
        }
    }
}

impl fmt::Display for Bc1ApproxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bc1ApproxMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bc1ApproxMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownApproxMode(s.to_string()))
    }
}

/// Per-channel weights of the squared color error used to score BC1 candidates.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct ErrorWeights {
    pub(crate) red: u32,
    pub(crate) green: u32,
    pub(crate) blue: u32,
}

impl ErrorWeights {
    /// Plain squared euclidean distance.
    pub const UNIFORM: Self = Self::new(1, 1, 1);

    /// Creates new weights. All weights must be non-zero.
    pub const fn new(red: u32, green: u32, blue: u32) -> Self {
        assert!(red > 0 && green > 0 && blue > 0, "error weights must be non-zero");
        Self { red, green, blue }
    }

    pub(crate) const fn as_array(self) -> [u32; 3] {
        [self.red, self.green, self.blue]
    }
}

impl Default for ErrorWeights {
    fn default() -> Self {
        Self::UNIFORM
    }
}

/// Search effort of one quality level.
///
/// Every field grows monotonically with the level, so a higher level always explores a superset
/// of what a lower level explores.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LevelSettings {
    pub(crate) refine_steps: u32,
    pub(crate) perturb: bool,
    pub(crate) bounding_box: bool,
    pub(crate) luma_extremes: bool,
    pub(crate) inset: bool,
    pub(crate) farthest_pair: bool,
    pub(crate) box_diagonals: bool,
}

#[rustfmt::skip]
const LEVELS: [LevelSettings; MAX_LEVEL as usize + 1] = [
    LevelSettings::row(0,  false, false, false, false, false, false),
    LevelSettings::row(1,  false, true,  false, false, false, false),
    LevelSettings::row(2,  false, true,  false, false, false, false),
    LevelSettings::row(2,  false, true,  true,  false, false, false),
    LevelSettings::row(3,  false, true,  true,  false, false, false),
    LevelSettings::row(3,  true,  true,  true,  false, false, false),
    LevelSettings::row(4,  true,  true,  true,  true,  false, false),
    LevelSettings::row(5,  true,  true,  true,  true,  false, false),
    LevelSettings::row(6,  true,  true,  true,  true,  true,  false),
    LevelSettings::row(6,  true,  true,  true,  true,  true,  false),
    LevelSettings::row(8,  true,  true,  true,  true,  true,  false),
    LevelSettings::row(8,  true,  true,  true,  true,  true,  true),
    LevelSettings::row(10, true,  true,  true,  true,  true,  true),
    LevelSettings::row(12, true,  true,  true,  true,  true,  true),
    LevelSettings::row(14, true,  true,  true,  true,  true,  true),
    LevelSettings::row(16, true,  true,  true,  true,  true,  true),
    LevelSettings::row(20, true,  true,  true,  true,  true,  true),
    LevelSettings::row(24, true,  true,  true,  true,  true,  true),
    LevelSettings::row(32, true,  true,  true,  true,  true,  true),
];

impl LevelSettings {
    const fn row(
        refine_steps: u32,
        perturb: bool,
        bounding_box: bool,
        luma_extremes: bool,
        inset: bool,
        farthest_pair: bool,
        box_diagonals: bool,
    ) -> Self {
        Self {
            refine_steps,
            perturb,
            bounding_box,
            luma_extremes,
            inset,
            farthest_pair,
            box_diagonals,
        }
    }

    /// Settings of the given level. Levels above [`MAX_LEVEL`] are clamped.
    pub const fn for_level(level: u32) -> Self {
        let level = if level > MAX_LEVEL { MAX_LEVEL } else { level };
        LEVELS[level as usize]
    }

    /// Very fast settings. No refinement.
    pub const fn very_fast() -> Self {
        Self::for_level(0)
    }

    /// Fast settings.
    pub const fn fast() -> Self {
        Self::for_level(4)
    }

    /// Basic settings.
    pub const fn basic() -> Self {
        Self::for_level(10)
    }

    /// Slow settings.
    pub const fn slow() -> Self {
        Self::for_level(14)
    }

    /// Very slow settings.
    pub const fn very_slow() -> Self {
        Self::for_level(MAX_LEVEL)
    }

    /// Maximal number of accepted refinement steps per candidate.
    pub const fn refine_steps(&self) -> u32 {
        self.refine_steps
    }
}

/// Settings used by [`compress_rgba8`](crate::encode::compress_rgba8).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CompressionSettings {
    /// Quality level, clamped to [`MAX_LEVEL`].
    pub level: u32,
    /// Allows the BC1 3-color mode with a transparent entry.
    pub allow_3color: bool,
    /// Encodes black BC1 pixels as transparent. Only has an effect together with `allow_3color`.
    pub black_is_transparent: bool,
}
