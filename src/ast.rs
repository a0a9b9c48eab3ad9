//! AST node types for ECMAScript regular expressions.
//!
//! Nodes live in an owned arena indexed by [`NodeId`]; parent links and
//! cross-references (backreference resolution) are plain ids, so the tree
//! needs no interior mutability. `start`/`end` are offsets into the scalar
//! sequence of the pattern source (UTF-16 code units in legacy mode, code
//! points in unicode mode), and the raw text of any node can be recovered by
//! slicing that sequence.

use crate::reader::scalars_to_string;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub start: usize,
    pub end: usize,
    pub kind: NodeKind,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Pattern {
        alternatives: Vec<NodeId>,
    },
    Alternative {
        elements: Vec<NodeId>,
    },
    /// A non-capturing group, `(?:...)`.
    Group {
        alternatives: Vec<NodeId>,
    },
    CapturingGroup {
        name: Option<String>,
        alternatives: Vec<NodeId>,
        /// Backreference nodes that resolve to this group.
        references: Vec<NodeId>,
    },
    Quantifier {
        min: u64,
        /// `None` means unbounded (`*`, `+`, `{n,}`).
        max: Option<u64>,
        greedy: bool,
        element: NodeId,
    },
    Assertion(AssertionKind),
    CharacterSet(CharacterSetKind),
    Character {
        value: u32,
    },
    CharacterClass {
        negate: bool,
        elements: Vec<NodeId>,
    },
    CharacterClassRange {
        min: NodeId,
        max: NodeId,
    },
    Backreference {
        target: BackreferenceRef,
        resolved: Option<NodeId>,
    },
}

#[derive(Clone, Debug)]
pub enum AssertionKind {
    Edge(EdgeAssertionKind),
    WordBoundary {
        negate: bool,
    },
    Lookaround {
        kind: LookaroundKind,
        negate: bool,
        alternatives: Vec<NodeId>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeAssertionKind {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookaroundKind {
    Lookahead,
    Lookbehind,
}

#[derive(Clone, Debug)]
pub enum CharacterSetKind {
    /// `.`
    Any,
    /// `\d \D \s \S \w \W`
    Escape {
        kind: EscapeCharacterSetKind,
        negate: bool,
    },
    /// `\p{...}` / `\P{...}`
    Property {
        key: String,
        value: Option<String>,
        negate: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeCharacterSetKind {
    Digit,
    Space,
    Word,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackreferenceRef {
    /// 1-based capture index.
    Index(u32),
    Name(String),
}

impl Node {
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Pattern { .. } => "Pattern",
            NodeKind::Alternative { .. } => "Alternative",
            NodeKind::Group { .. } => "Group",
            NodeKind::CapturingGroup { .. } => "CapturingGroup",
            NodeKind::Quantifier { .. } => "Quantifier",
            NodeKind::Assertion(_) => "Assertion",
            NodeKind::CharacterSet(_) => "CharacterSet",
            NodeKind::Character { .. } => "Character",
            NodeKind::CharacterClass { .. } => "CharacterClass",
            NodeKind::CharacterClassRange { .. } => "CharacterClassRange",
            NodeKind::Backreference { .. } => "Backreference",
        }
    }
}

/// A parsed pattern: the node arena, its root, and the scalar sequence the
/// node offsets index into.
#[derive(Clone, Debug)]
pub struct PatternAst {
    nodes: Vec<Node>,
    root: NodeId,
    scalars: Vec<u32>,
}

impl PatternAst {
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId, scalars: Vec<u32>) -> Self {
        PatternAst {
            nodes,
            root,
            scalars,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The source text covered by a node.
    pub fn raw(&self, id: NodeId) -> String {
        let node = self.node(id);
        scalars_to_string(&self.scalars[node.start..node.end])
    }

    /// The whole pattern text.
    pub fn source(&self) -> String {
        scalars_to_string(&self.scalars)
    }
}

/// The flag set of a literal, with its span in the flag source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flags {
    pub start: usize,
    pub end: usize,
    pub raw: String,
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub unicode: bool,
    pub sticky: bool,
    pub dot_all: bool,
}

/// A full literal, `/pattern/flags`.
#[derive(Clone, Debug)]
pub struct RegExpLiteral {
    pub pattern: PatternAst,
    pub flags: Flags,
    pub raw: String,
}
