//! Conclusions, chain steps and Step -> Hint conversion.
//!
//! The search returns `ChainStep`s. This module names them and converts
//! them to `Hint` with human-readable explanation strings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::chain::AlternatingInferenceChain;
use super::types::{Hint, HintType, Position, Technique};
use crate::cells::CellSet;

/// Whether a conclusion places or removes a digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConclusionKind {
    Assignment,
    Elimination,
}

/// A derived `(kind, cell, digit)` triple. Digits are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Conclusion {
    pub kind: ConclusionKind,
    pub cell: u8,
    pub digit: u8,
}

impl Conclusion {
    pub fn assignment(cell: usize, digit: u8) -> Self {
        Conclusion {
            kind: ConclusionKind::Assignment,
            cell: cell as u8,
            digit,
        }
    }

    pub fn elimination(cell: usize, digit: u8) -> Self {
        Conclusion {
            kind: ConclusionKind::Elimination,
            cell: cell as u8,
            digit,
        }
    }

    /// Candidate index `cell * 9 + digit`.
    #[inline]
    pub fn candidate(&self) -> usize {
        self.cell as usize * 9 + self.digit as usize
    }

    #[inline]
    pub fn is_elimination(&self) -> bool {
        self.kind == ConclusionKind::Elimination
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.kind {
            ConclusionKind::Assignment => "=",
            ConclusionKind::Elimination => "<>",
        };
        write!(
            f,
            "{}{}{}",
            CellSet::single(self.cell as usize),
            op,
            self.digit + 1
        )
    }
}

/// A classified chain together with what it proves.
#[derive(Debug, Clone)]
pub struct ChainStep {
    pub technique: Technique,
    pub chain: AlternatingInferenceChain,
    pub conclusions: Vec<Conclusion>,
}

impl ChainStep {
    /// Name the chain from its shape and conclusion count.
    pub fn new(chain: AlternatingInferenceChain, conclusions: Vec<Conclusion>) -> Self {
        let technique = classify(&chain, conclusions.len());
        ChainStep {
            technique,
            chain,
            conclusions,
        }
    }

    /// Convert this step into a public Hint.
    pub fn to_hint(&self) -> Hint {
        let mut per_cell: BTreeMap<u8, (Option<u8>, Vec<u8>)> = BTreeMap::new();
        for c in &self.conclusions {
            let entry = per_cell.entry(c.cell).or_default();
            match c.kind {
                ConclusionKind::Assignment => entry.0 = Some(c.digit + 1),
                ConclusionKind::Elimination => entry.1.push(c.digit + 1),
            }
        }

        let mut actions = Vec::new();
        for (cell, (value, mut values)) in per_cell {
            let pos = Position::from_index(cell as usize);
            if let Some(value) = value {
                actions.push(HintType::SetValue { pos, value });
            }
            if !values.is_empty() {
                values.sort_unstable();
                values.dedup();
                actions.push(HintType::EliminateCandidates { pos, values });
            }
        }

        let mut involved = CellSet::empty();
        for node in self.chain.real_chain_nodes() {
            involved = involved | node.cells();
        }

        Hint {
            technique: self.technique,
            actions,
            explanation: self.render_explanation(),
            involved_cells: involved.iter().map(Position::from_index).collect(),
            chain: self.chain.to_string(),
        }
    }

    fn render_explanation(&self) -> String {
        let length = self.chain.len();
        let conclusions = self
            .conclusions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let technique = self.technique;
        match technique {
            Technique::ContinuousNiceLoop
            | Technique::GroupedContinuousNiceLoop
            | Technique::FishyCycle
            | Technique::GroupedFishyCycle => format!(
                "{}: loop of {} nodes, every weak link is strong, so {}.",
                technique, length, conclusions
            ),
            Technique::NodeCollision => format!(
                "{}: both ends of the chain claim the same cells, so {}.",
                technique, conclusions
            ),
            t if t.is_irregular_wing() => {
                format!("{}: the wing {} gives {}.", technique, self.chain, conclusions)
            }
            _ if self.chain.is_strong() => format!(
                "{}: the chain returns to its starting node, so {}.",
                technique, conclusions
            ),
            _ => format!(
                "{}: chain of length {}, one end must be true, so {}.",
                technique, length, conclusions
            ),
        }
    }
}

impl PartialEq for ChainStep {
    fn eq(&self, other: &Self) -> bool {
        self.chain == other.chain
    }
}

impl fmt::Display for ChainStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} =>", self.technique, self.chain)?;
        for (i, c) in self.conclusions.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", sep, c)?;
        }
        Ok(())
    }
}

/// Technique naming, in priority order.
pub fn classify(chain: &AlternatingInferenceChain, conclusion_count: usize) -> Technique {
    let grouped = chain.is_grouped();
    let pick = |plain: Technique, grouped_variant: Technique| {
        if grouped {
            grouped_variant
        } else {
            plain
        }
    };

    if chain.is_continuous_nice_loop() {
        return if chain.is_x_chain() {
            pick(Technique::FishyCycle, Technique::GroupedFishyCycle)
        } else {
            pick(
                Technique::ContinuousNiceLoop,
                Technique::GroupedContinuousNiceLoop,
            )
        };
    }
    if chain.is_x_chain() {
        return pick(Technique::XChain, Technique::GroupedXChain);
    }
    if grouped && chain.len() == 3 {
        return Technique::GroupedXyWing;
    }
    if chain.is_w_wing() {
        return pick(Technique::WWing, Technique::GroupedWWing);
    }
    if chain.is_m_wing() {
        return pick(Technique::MWing, Technique::GroupedMWing);
    }
    if chain.is_split_wing() {
        return pick(Technique::SplitWing, Technique::GroupedSplitWing);
    }
    if chain.is_hybrid_wing() {
        return pick(Technique::HybridWing, Technique::GroupedHybridWing);
    }
    if chain.is_local_wing() {
        return pick(Technique::LocalWing, Technique::GroupedLocalWing);
    }
    if chain.is_irregular_wing() {
        return pick(Technique::PurpleCow, Technique::GroupedPurpleCow);
    }
    if !grouped && chain.is_remote_pair() {
        return Technique::RemotePair;
    }
    if chain.has_node_collision() {
        return Technique::NodeCollision;
    }

    let real = chain.real_chain_nodes();
    let same_digit_ends = match (real.first(), real.last()) {
        (Some(a), Some(b)) => a.digit() == b.digit(),
        _ => false,
    };
    if same_digit_ends {
        return if chain.is_xy_chain() {
            Technique::XyChain
        } else {
            pick(
                Technique::AlternatingInferenceChain,
                Technique::GroupedAlternatingInferenceChain,
            )
        };
    }

    match conclusion_count {
        1 => pick(
            Technique::DiscontinuousNiceLoop,
            Technique::GroupedDiscontinuousNiceLoop,
        ),
        2 => pick(Technique::XyXChain, Technique::GroupedXyXChain),
        _ => pick(
            Technique::AlternatingInferenceChain,
            Technique::GroupedAlternatingInferenceChain,
        ),
    }
}
