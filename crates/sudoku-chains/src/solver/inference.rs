//! Strong and weak inferences between chain nodes.

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use crate::ChainError;

/// Polarity in the AIC bipartite graph: candidate is ON (true) or OFF (false).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    On,
    Off,
}

impl Polarity {
    #[inline]
    pub fn is_on(self) -> bool {
        self == Polarity::On
    }

    #[inline]
    pub fn flip(self) -> Polarity {
        match self {
            Polarity::On => Polarity::Off,
            Polarity::Off => Polarity::On,
        }
    }
}

impl From<bool> for Polarity {
    fn from(on: bool) -> Self {
        if on {
            Polarity::On
        } else {
            Polarity::Off
        }
    }
}

/// Link type between two nodes.
///
/// Community terminology: `Weak` represents a "weak inference" (NAND
/// relationship), while `Strong` is a structural link (XOR-like: at least one
/// end holds). `Line` only connects nodes for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    Strong,
    /// Weak inference (NAND): at most one of the connected nodes is true.
    Weak,
    Line,
}

/// The inference between two adjacent nodes of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Inference {
    /// If the first node is false, the second is true.
    Strong,
    /// If the first node is true, the second is false.
    Weak,
}

impl Inference {
    /// Inference leaving position `i` of a chain that starts with a strong one.
    #[inline]
    pub fn at_position(i: usize) -> Inference {
        if i & 1 == 0 {
            Inference::Strong
        } else {
            Inference::Weak
        }
    }

    /// Separator used when rendering a chain.
    pub fn glyph(self) -> &'static str {
        match self {
            Inference::Strong => " == ",
            Inference::Weak => " -- ",
        }
    }

    #[inline]
    pub fn is_strong(self) -> bool {
        self == Inference::Strong
    }

    #[inline]
    pub fn is_weak(self) -> bool {
        self == Inference::Weak
    }
}

impl From<Inference> for LinkType {
    fn from(inference: Inference) -> Self {
        match inference {
            Inference::Strong => LinkType::Strong,
            Inference::Weak => LinkType::Weak,
        }
    }
}

/// A relation between two arena nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub start: NodeId,
    pub end: NodeId,
    pub link_type: LinkType,
}

impl Link {
    /// Build a link, rejecting a node linked to itself.
    pub fn new(start: NodeId, end: NodeId, link_type: LinkType) -> Result<Self, ChainError> {
        if start == end {
            return Err(ChainError::SelfLink);
        }
        Ok(Link {
            start,
            end,
            link_type,
        })
    }

    #[inline]
    pub fn is_strong(&self) -> bool {
        self.link_type == LinkType::Strong
    }

    #[inline]
    pub fn is_weak(&self) -> bool {
        self.link_type == LinkType::Weak
    }

    /// The same link walked the other way.
    pub fn reversed(&self) -> Link {
        Link {
            start: self.end,
            end: self.start,
            link_type: self.link_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_alternate() {
        assert_eq!(Inference::at_position(0), Inference::Strong);
        assert_eq!(Inference::at_position(1), Inference::Weak);
        assert_eq!(Inference::at_position(6), Inference::Strong);
        assert_eq!(Inference::Strong.glyph(), " == ");
        assert_eq!(Inference::Weak.glyph(), " -- ");
    }

    #[test]
    fn test_self_link_rejected() {
        let a = NodeId(3);
        assert_eq!(Link::new(a, a, LinkType::Weak), Err(ChainError::SelfLink));

        let link = Link::new(a, NodeId(4), LinkType::Strong).unwrap();
        assert!(link.is_strong());
        assert!(!link.is_weak());
        assert_eq!(link.reversed().start, NodeId(4));
    }

    #[test]
    fn test_polarity() {
        assert_eq!(Polarity::from(true), Polarity::On);
        assert_eq!(Polarity::On.flip(), Polarity::Off);
        assert!(!Polarity::Off.is_on());
    }
}
