use serde::{Deserialize, Serialize};

/// A cell position (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn from_index(idx: usize) -> Self {
        Self {
            row: idx / 9,
            col: idx % 9,
        }
    }

    pub fn index(&self) -> usize {
        self.row * 9 + self.col
    }
}

/// Named chain pattern a step was recognised as
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technique {
    // Single digit
    XChain,
    GroupedXChain,
    FishyCycle,
    GroupedFishyCycle,

    // Bivalue cells
    XyChain,
    XyXChain,
    GroupedXyXChain,
    RemotePair,
    GroupedXyWing,

    // Irregular wings
    WWing,
    GroupedWWing,
    MWing,
    GroupedMWing,
    SplitWing,
    GroupedSplitWing,
    HybridWing,
    GroupedHybridWing,
    LocalWing,
    GroupedLocalWing,
    PurpleCow,
    GroupedPurpleCow,

    // Loops and generic chains
    DiscontinuousNiceLoop,
    GroupedDiscontinuousNiceLoop,
    ContinuousNiceLoop,
    GroupedContinuousNiceLoop,
    AlternatingInferenceChain,
    GroupedAlternatingInferenceChain,
    NodeCollision,
}

impl Technique {
    /// Uses at least one multi-cell node.
    pub fn is_grouped(&self) -> bool {
        matches!(
            self,
            Technique::GroupedXChain
                | Technique::GroupedFishyCycle
                | Technique::GroupedXyXChain
                | Technique::GroupedXyWing
                | Technique::GroupedWWing
                | Technique::GroupedMWing
                | Technique::GroupedSplitWing
                | Technique::GroupedHybridWing
                | Technique::GroupedLocalWing
                | Technique::GroupedPurpleCow
                | Technique::GroupedDiscontinuousNiceLoop
                | Technique::GroupedContinuousNiceLoop
                | Technique::GroupedAlternatingInferenceChain
        )
    }

    /// Short six-node wing shapes.
    pub fn is_irregular_wing(&self) -> bool {
        matches!(
            self,
            Technique::WWing
                | Technique::MWing
                | Technique::SplitWing
                | Technique::HybridWing
                | Technique::LocalWing
                | Technique::PurpleCow
        )
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Technique::XChain => write!(f, "X-Chain"),
            Technique::GroupedXChain => write!(f, "Grouped X-Chain"),
            Technique::FishyCycle => write!(f, "Fishy Cycle"),
            Technique::GroupedFishyCycle => write!(f, "Grouped Fishy Cycle"),
            Technique::XyChain => write!(f, "XY-Chain"),
            Technique::XyXChain => write!(f, "XY-X-Chain"),
            Technique::GroupedXyXChain => write!(f, "Grouped XY-X-Chain"),
            Technique::RemotePair => write!(f, "Remote Pair"),
            Technique::GroupedXyWing => write!(f, "Grouped XY-Wing"),
            Technique::WWing => write!(f, "W-Wing"),
            Technique::GroupedWWing => write!(f, "Grouped W-Wing"),
            Technique::MWing => write!(f, "M-Wing"),
            Technique::GroupedMWing => write!(f, "Grouped M-Wing"),
            Technique::SplitWing => write!(f, "Split Wing"),
            Technique::GroupedSplitWing => write!(f, "Grouped Split Wing"),
            Technique::HybridWing => write!(f, "Hybrid Wing"),
            Technique::GroupedHybridWing => write!(f, "Grouped Hybrid Wing"),
            Technique::LocalWing => write!(f, "Local Wing"),
            Technique::GroupedLocalWing => write!(f, "Grouped Local Wing"),
            Technique::PurpleCow => write!(f, "Purple Cow"),
            Technique::GroupedPurpleCow => write!(f, "Grouped Purple Cow"),
            Technique::DiscontinuousNiceLoop => write!(f, "Discontinuous Nice Loop"),
            Technique::GroupedDiscontinuousNiceLoop => {
                write!(f, "Grouped Discontinuous Nice Loop")
            }
            Technique::ContinuousNiceLoop => write!(f, "Continuous Nice Loop"),
            Technique::GroupedContinuousNiceLoop => write!(f, "Grouped Continuous Nice Loop"),
            Technique::AlternatingInferenceChain => write!(f, "AIC"),
            Technique::GroupedAlternatingInferenceChain => write!(f, "Grouped AIC"),
            Technique::NodeCollision => write!(f, "Node Collision"),
        }
    }
}

/// Type of hint provided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintType {
    /// Place this value in this cell
    SetValue { pos: Position, value: u8 },
    /// Remove these candidates from this cell
    EliminateCandidates { pos: Position, values: Vec<u8> },
}

/// A hint for the player. Values are 1-9.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hint {
    /// The technique used to find this hint
    pub technique: Technique,
    /// One entry per affected cell
    pub actions: Vec<HintType>,
    /// Explanation of the hint
    pub explanation: String,
    /// Cells the chain runs through
    pub involved_cells: Vec<Position>,
    /// Chain notation, e.g. `5r1c1 == 5r1c4 -- 5r3c4 == 5r3c1`
    pub chain: String,
}
