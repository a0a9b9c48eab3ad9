//! Event-driven AST construction on top of the validator.
//!
//! [`AstBuilder`] implements [`ParseEvents`]: enter events push a container
//! onto an explicit open stack, leave events seal its span and pop it, and
//! leaf events append to whatever is open. Because the validator re-walks
//! the pattern for named-group validation, the builder resets itself on
//! every pattern-enter event and the finished tree always comes from the
//! last pass.
//!
//! Builder desynchronization (a quantifier event with nothing to wrap, a
//! malformed range triple, an unresolvable backreference) is a bug in the
//! engine, not a property of the input, and panics.

use crate::ast::{
    AssertionKind, BackreferenceRef, CharacterSetKind, EdgeAssertionKind, EscapeCharacterSetKind,
    Flags, LookaroundKind, Node, NodeId, NodeKind, PatternAst, RegExpLiteral,
};
use crate::validator::{Options, ParseEvents, RegExpSyntaxError, RegExpValidator};

fn desync(detail: &str) -> ! {
    panic!("regexp tree builder out of sync: {detail}");
}

#[derive(Debug, Default)]
pub struct AstBuilder {
    nodes: Vec<Node>,
    open: Vec<NodeId>,
    scalars: Vec<u32>,
    root: Option<NodeId>,
    flags: Option<Flags>,
    backreferences: Vec<NodeId>,
    capturing_groups: Vec<NodeId>,
}

impl AstBuilder {
    pub fn new() -> Self {
        AstBuilder::default()
    }

    fn current(&self) -> NodeId {
        match self.open.last() {
            Some(&id) => id,
            None => desync("no open container"),
        }
    }

    fn new_node(&mut self, parent: Option<NodeId>, start: usize, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent,
            start,
            end: start,
            kind,
        });
        id
    }

    /// Creates a node, appends it to the open container, and returns it.
    fn append_new(&mut self, start: usize, kind: NodeKind) -> NodeId {
        let parent = self.current();
        let id = self.new_node(Some(parent), start, kind);
        self.append_element(id);
        id
    }

    fn append_element(&mut self, element: NodeId) {
        let container = self.current();
        match &mut self.nodes[container.index()].kind {
            NodeKind::Alternative { elements } | NodeKind::CharacterClass { elements, .. } => {
                elements.push(element);
            }
            _ => desync("element outside an alternative or class"),
        }
    }

    /// Seals the span of the open container and pops it.
    fn seal(&mut self, end: usize) -> NodeId {
        let id = match self.open.pop() {
            Some(id) => id,
            None => desync("leave event with no open container"),
        };
        self.nodes[id.index()].end = end;
        id
    }

    fn resolve_backreferences(&mut self) {
        for i in 0..self.backreferences.len() {
            let bref = self.backreferences[i];
            let target = match &self.nodes[bref.index()].kind {
                NodeKind::Backreference { target, .. } => target.clone(),
                _ => desync("non-backreference in the reference list"),
            };
            let group = match &target {
                BackreferenceRef::Index(n) => match self.capturing_groups.get(*n as usize - 1) {
                    Some(&g) => g,
                    None => desync("backreference to a missing group index"),
                },
                BackreferenceRef::Name(name) => {
                    let found = self.capturing_groups.iter().copied().find(|&g| {
                        matches!(
                            &self.nodes[g.index()].kind,
                            NodeKind::CapturingGroup { name: Some(n), .. } if n == name
                        )
                    });
                    match found {
                        Some(g) => g,
                        None => desync("backreference to a missing group name"),
                    }
                }
            };
            match &mut self.nodes[bref.index()].kind {
                NodeKind::Backreference { resolved, .. } => *resolved = Some(group),
                _ => unreachable!(),
            }
            match &mut self.nodes[group.index()].kind {
                NodeKind::CapturingGroup { references, .. } => references.push(bref),
                _ => desync("backreference resolved to a non-group"),
            }
        }
    }

    fn take_flags(&mut self) -> Flags {
        match self.flags.take() {
            Some(flags) => flags,
            None => desync("no flags event received"),
        }
    }

    pub fn finish_pattern(mut self) -> PatternAst {
        let root = match self.root {
            Some(root) => root,
            None => desync("no pattern event received"),
        };
        let scalars = std::mem::take(&mut self.scalars);
        PatternAst::new(std::mem::take(&mut self.nodes), root, scalars)
    }

    pub fn finish_flags(mut self) -> Flags {
        self.take_flags()
    }

    pub fn finish_literal(mut self, source: &str) -> RegExpLiteral {
        let flags = self.take_flags();
        RegExpLiteral {
            pattern: self.finish_pattern(),
            flags,
            raw: source.to_string(),
        }
    }
}

impl ParseEvents for AstBuilder {
    fn on_pattern_source(&mut self, source: &str, unicode_mode: bool) {
        self.scalars = if unicode_mode {
            source.chars().map(u32::from).collect()
        } else {
            source.encode_utf16().map(u32::from).collect()
        };
    }

    fn on_flags(
        &mut self,
        start: usize,
        end: usize,
        raw: &str,
        global: bool,
        ignore_case: bool,
        multiline: bool,
        unicode: bool,
        sticky: bool,
        dot_all: bool,
    ) {
        self.flags = Some(Flags {
            start,
            end,
            raw: raw.to_string(),
            global,
            ignore_case,
            multiline,
            unicode,
            sticky,
            dot_all,
        });
    }

    fn on_pattern_enter(&mut self, start: usize) {
        // A second validation pass rebuilds the tree from scratch.
        self.nodes.clear();
        self.open.clear();
        self.root = None;
        self.backreferences.clear();
        self.capturing_groups.clear();

        let id = self.new_node(
            None,
            start,
            NodeKind::Pattern {
                alternatives: Vec::new(),
            },
        );
        self.open.push(id);
    }

    fn on_pattern_leave(&mut self, _start: usize, end: usize) {
        let id = self.seal(end);
        if !self.open.is_empty() {
            desync("pattern left with containers still open");
        }
        self.root = Some(id);
        self.resolve_backreferences();
    }

    fn on_alternative_enter(&mut self, start: usize, _index: usize) {
        let parent = self.current();
        let id = self.new_node(
            Some(parent),
            start,
            NodeKind::Alternative {
                elements: Vec::new(),
            },
        );
        match &mut self.nodes[parent.index()].kind {
            NodeKind::Pattern { alternatives }
            | NodeKind::Group { alternatives }
            | NodeKind::CapturingGroup { alternatives, .. }
            | NodeKind::Assertion(AssertionKind::Lookaround { alternatives, .. }) => {
                alternatives.push(id);
            }
            _ => desync("alternative outside a container"),
        }
        self.open.push(id);
    }

    fn on_alternative_leave(&mut self, _start: usize, end: usize, _index: usize) {
        self.seal(end);
    }

    fn on_group_enter(&mut self, start: usize) {
        let id = self.append_new(
            start,
            NodeKind::Group {
                alternatives: Vec::new(),
            },
        );
        self.open.push(id);
    }

    fn on_group_leave(&mut self, _start: usize, end: usize) {
        self.seal(end);
    }

    fn on_capturing_group_enter(&mut self, start: usize, name: Option<&str>) {
        let id = self.append_new(
            start,
            NodeKind::CapturingGroup {
                name: name.map(str::to_string),
                alternatives: Vec::new(),
                references: Vec::new(),
            },
        );
        self.capturing_groups.push(id);
        self.open.push(id);
    }

    fn on_capturing_group_leave(&mut self, _start: usize, end: usize, _name: Option<&str>) {
        self.seal(end);
    }

    fn on_quantifier(
        &mut self,
        _start: usize,
        end: usize,
        min: u64,
        max: Option<u64>,
        greedy: bool,
    ) {
        let alternative = self.current();
        let element = match &mut self.nodes[alternative.index()].kind {
            NodeKind::Alternative { elements } => match elements.pop() {
                Some(el) => el,
                None => desync("quantifier with no preceding element"),
            },
            _ => desync("quantifier outside an alternative"),
        };
        match &self.nodes[element.index()].kind {
            NodeKind::Quantifier { .. } => desync("quantifier applied to a quantifier"),
            NodeKind::Assertion(kind)
                if !matches!(
                    kind,
                    AssertionKind::Lookaround {
                        kind: LookaroundKind::Lookahead,
                        ..
                    }
                ) =>
            {
                desync("quantifier applied to an unquantifiable assertion")
            }
            _ => {}
        }

        let start = self.nodes[element.index()].start;
        let id = self.new_node(
            Some(alternative),
            start,
            NodeKind::Quantifier {
                min,
                max,
                greedy,
                element,
            },
        );
        self.nodes[id.index()].end = end;
        self.nodes[element.index()].parent = Some(id);
        self.append_element(id);
    }

    fn on_lookaround_assertion_enter(&mut self, start: usize, kind: LookaroundKind, negate: bool) {
        let id = self.append_new(
            start,
            NodeKind::Assertion(AssertionKind::Lookaround {
                kind,
                negate,
                alternatives: Vec::new(),
            }),
        );
        self.open.push(id);
    }

    fn on_lookaround_assertion_leave(
        &mut self,
        _start: usize,
        end: usize,
        _kind: LookaroundKind,
        _negate: bool,
    ) {
        self.seal(end);
    }

    fn on_edge_assertion(&mut self, start: usize, end: usize, kind: EdgeAssertionKind) {
        let id = self.append_new(start, NodeKind::Assertion(AssertionKind::Edge(kind)));
        self.nodes[id.index()].end = end;
    }

    fn on_word_boundary_assertion(&mut self, start: usize, end: usize, negate: bool) {
        let id = self.append_new(
            start,
            NodeKind::Assertion(AssertionKind::WordBoundary { negate }),
        );
        self.nodes[id.index()].end = end;
    }

    fn on_any_character_set(&mut self, start: usize, end: usize) {
        let id = self.append_new(start, NodeKind::CharacterSet(CharacterSetKind::Any));
        self.nodes[id.index()].end = end;
    }

    fn on_escape_character_set(
        &mut self,
        start: usize,
        end: usize,
        kind: EscapeCharacterSetKind,
        negate: bool,
    ) {
        let id = self.append_new(
            start,
            NodeKind::CharacterSet(CharacterSetKind::Escape { kind, negate }),
        );
        self.nodes[id.index()].end = end;
    }

    fn on_unicode_property_character_set(
        &mut self,
        start: usize,
        end: usize,
        key: &str,
        value: Option<&str>,
        negate: bool,
    ) {
        let id = self.append_new(
            start,
            NodeKind::CharacterSet(CharacterSetKind::Property {
                key: key.to_string(),
                value: value.map(str::to_string),
                negate,
            }),
        );
        self.nodes[id.index()].end = end;
    }

    fn on_character(&mut self, start: usize, end: usize, value: u32) {
        let id = self.append_new(start, NodeKind::Character { value });
        self.nodes[id.index()].end = end;
    }

    fn on_backreference(&mut self, start: usize, end: usize, target: &BackreferenceRef) {
        let id = self.append_new(
            start,
            NodeKind::Backreference {
                target: target.clone(),
                resolved: None,
            },
        );
        self.nodes[id.index()].end = end;
        self.backreferences.push(id);
    }

    fn on_character_class_enter(&mut self, start: usize, negate: bool) {
        let id = self.append_new(
            start,
            NodeKind::CharacterClass {
                negate,
                elements: Vec::new(),
            },
        );
        self.open.push(id);
    }

    fn on_character_class_leave(&mut self, _start: usize, end: usize) {
        self.seal(end);
    }

    fn on_character_class_range(&mut self, start: usize, end: usize) {
        // The last three elements are min, a literal hyphen, and max; the
        // hyphen's slot is reused for the range node.
        let class = self.current();
        let (max, hyphen, min) = match &mut self.nodes[class.index()].kind {
            NodeKind::CharacterClass { elements, .. } => {
                match (elements.pop(), elements.pop(), elements.pop()) {
                    (Some(a), Some(b), Some(c)) => (a, b, c),
                    _ => desync("class range without three trailing elements"),
                }
            }
            _ => desync("class range outside a character class"),
        };
        if !matches!(self.nodes[min.index()].kind, NodeKind::Character { .. })
            || !matches!(
                self.nodes[hyphen.index()].kind,
                NodeKind::Character { value: 0x2d }
            )
            || !matches!(self.nodes[max.index()].kind, NodeKind::Character { .. })
        {
            desync("class range endpoints are not characters");
        }

        self.nodes[hyphen.index()] = Node {
            parent: Some(class),
            start,
            end,
            kind: NodeKind::CharacterClassRange { min, max },
        };
        self.nodes[min.index()].parent = Some(hyphen);
        self.nodes[max.index()].parent = Some(hyphen);
        self.append_element(hyphen);
    }
}

/// Parses patterns, flag strings, and whole literals into [`PatternAst`]
/// trees by running the validator over an [`AstBuilder`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RegExpParser {
    options: Options,
}

impl RegExpParser {
    pub fn new(options: Options) -> Self {
        RegExpParser { options }
    }

    pub fn parse_literal(&self, source: &str) -> Result<RegExpLiteral, RegExpSyntaxError> {
        let mut builder = AstBuilder::new();
        RegExpValidator::new(self.options, &mut builder).validate_literal(source)?;
        Ok(builder.finish_literal(source))
    }

    pub fn parse_pattern(
        &self,
        source: &str,
        u_flag: bool,
    ) -> Result<PatternAst, RegExpSyntaxError> {
        let mut builder = AstBuilder::new();
        RegExpValidator::new(self.options, &mut builder).validate_pattern(source, u_flag)?;
        Ok(builder.finish_pattern())
    }

    pub fn parse_flags(&self, source: &str) -> Result<Flags, RegExpSyntaxError> {
        let mut builder = AstBuilder::new();
        RegExpValidator::new(self.options, &mut builder).validate_flags(source)?;
        Ok(builder.finish_flags())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str, u_flag: bool) -> PatternAst {
        RegExpParser::new(Options::default())
            .parse_pattern(source, u_flag)
            .unwrap()
    }

    /// Elements of the pattern's first alternative.
    fn elements(ast: &PatternAst) -> Vec<NodeId> {
        let NodeKind::Pattern { alternatives } = &ast.node(ast.root()).kind else {
            panic!("root is not a pattern");
        };
        let NodeKind::Alternative { elements } = &ast.node(alternatives[0]).kind else {
            panic!("missing alternative");
        };
        elements.clone()
    }

    fn char_value(ast: &PatternAst, id: NodeId) -> u32 {
        match ast.node(id).kind {
            NodeKind::Character { value } => value,
            _ => panic!("not a character: {}", ast.node(id).type_name()),
        }
    }

    #[test]
    fn characters_and_spans() {
        let ast = parse("abc", false);
        let root = ast.node(ast.root());
        assert_eq!((root.start, root.end), (0, 3));
        assert_eq!(root.parent, None);
        assert_eq!(ast.raw(ast.root()), "abc");

        let els = elements(&ast);
        assert_eq!(els.len(), 3);
        assert_eq!(char_value(&ast, els[0]), u32::from('a'));
        assert_eq!(char_value(&ast, els[2]), u32::from('c'));
        assert_eq!(ast.node(els[1]).start, 1);
        assert_eq!(ast.node(els[1]).end, 2);
    }

    #[test]
    fn alternatives_are_always_materialized() {
        let ast = parse("a|b|", false);
        let NodeKind::Pattern { alternatives } = &ast.node(ast.root()).kind else {
            panic!("root is not a pattern");
        };
        assert_eq!(alternatives.len(), 3);
        assert_eq!(ast.raw(alternatives[0]), "a");
        assert_eq!(ast.raw(alternatives[1]), "b");
        assert_eq!(ast.raw(alternatives[2]), "");
        let last = ast.node(alternatives[2]);
        assert_eq!((last.start, last.end), (4, 4));
        assert_eq!(last.parent, Some(ast.root()));
    }

    #[test]
    fn quantifier_wraps_the_preceding_element() {
        let ast = parse("ab+?", false);
        let els = elements(&ast);
        assert_eq!(els.len(), 2);
        let NodeKind::Quantifier {
            min,
            max,
            greedy,
            element,
        } = ast.node(els[1]).kind
        else {
            panic!("expected a quantifier");
        };
        assert_eq!((min, max, greedy), (1, None, false));
        assert_eq!(char_value(&ast, element), u32::from('b'));
        // Span covers the element, and the element is reparented.
        assert_eq!((ast.node(els[1]).start, ast.node(els[1]).end), (1, 4));
        assert_eq!(ast.node(element).parent, Some(els[1]));
        assert_eq!(ast.raw(els[1]), "b+?");
    }

    #[test]
    fn braced_quantifiers() {
        let ast = parse("x{2,4}y{3}z{5,}", false);
        let els = elements(&ast);
        let bounds: Vec<(u64, Option<u64>)> = els
            .iter()
            .map(|&id| match ast.node(id).kind {
                NodeKind::Quantifier { min, max, .. } => (min, max),
                _ => panic!("expected quantifiers"),
            })
            .collect();
        assert_eq!(bounds, vec![(2, Some(4)), (3, Some(3)), (5, None)]);
    }

    #[test]
    fn groups() {
        let ast = parse("(?:ab)(c)", false);
        let els = elements(&ast);
        assert!(matches!(ast.node(els[0]).kind, NodeKind::Group { .. }));
        assert_eq!(ast.raw(els[0]), "(?:ab)");
        let NodeKind::CapturingGroup {
            name,
            alternatives,
            references,
        } = &ast.node(els[1]).kind
        else {
            panic!("expected a capturing group");
        };
        assert_eq!(name.as_deref(), None);
        assert_eq!(alternatives.len(), 1);
        assert!(references.is_empty());
        assert_eq!(ast.raw(els[1]), "(c)");
    }

    #[test]
    fn numeric_backreference_resolution() {
        let ast = parse(r"(a)\1", false);
        let els = elements(&ast);
        let NodeKind::Backreference { target, resolved } = &ast.node(els[1]).kind else {
            panic!("expected a backreference");
        };
        assert_eq!(*target, BackreferenceRef::Index(1));
        assert_eq!(*resolved, Some(els[0]));
        let NodeKind::CapturingGroup { references, .. } = &ast.node(els[0]).kind else {
            panic!("expected a capturing group");
        };
        assert_eq!(references, &vec![els[1]]);
    }

    #[test]
    fn named_backreference_resolution_survives_the_second_pass() {
        let ast = parse(r"(?<x>a)\k<x>", false);
        let els = elements(&ast);
        let NodeKind::Backreference { target, resolved } = &ast.node(els[1]).kind else {
            panic!("expected a backreference");
        };
        assert_eq!(*target, BackreferenceRef::Name("x".to_string()));
        assert_eq!(*resolved, Some(els[0]));
        assert_eq!(ast.raw(els[1]), r"\k<x>");
    }

    #[test]
    fn lookaround_assertions() {
        let ast = parse("(?<=a)(?!b)", false);
        let els = elements(&ast);
        let NodeKind::Assertion(AssertionKind::Lookaround { kind, negate, .. }) =
            &ast.node(els[0]).kind
        else {
            panic!("expected a lookaround");
        };
        assert_eq!((*kind, *negate), (LookaroundKind::Lookbehind, false));
        let NodeKind::Assertion(AssertionKind::Lookaround { kind, negate, .. }) =
            &ast.node(els[1]).kind
        else {
            panic!("expected a lookaround");
        };
        assert_eq!((*kind, *negate), (LookaroundKind::Lookahead, true));
    }

    #[test]
    fn quantified_lookahead_in_the_extended_grammar() {
        let ast = parse("(?=a)*", false);
        let els = elements(&ast);
        let NodeKind::Quantifier { element, .. } = ast.node(els[0]).kind else {
            panic!("expected a quantifier");
        };
        assert!(matches!(
            ast.node(element).kind,
            NodeKind::Assertion(AssertionKind::Lookaround {
                kind: LookaroundKind::Lookahead,
                ..
            })
        ));
    }

    #[test]
    fn edge_and_word_boundary_assertions() {
        let ast = parse(r"^a\b$", false);
        let els = elements(&ast);
        assert!(matches!(
            ast.node(els[0]).kind,
            NodeKind::Assertion(AssertionKind::Edge(EdgeAssertionKind::Start))
        ));
        assert!(matches!(
            ast.node(els[2]).kind,
            NodeKind::Assertion(AssertionKind::WordBoundary { negate: false })
        ));
        assert!(matches!(
            ast.node(els[3]).kind,
            NodeKind::Assertion(AssertionKind::Edge(EdgeAssertionKind::End))
        ));
    }

    #[test]
    fn character_class_with_range() {
        let ast = parse("[a-cx]", false);
        let els = elements(&ast);
        let NodeKind::CharacterClass { negate, elements } = &ast.node(els[0]).kind else {
            panic!("expected a class");
        };
        assert!(!negate);
        assert_eq!(elements.len(), 2);
        let NodeKind::CharacterClassRange { min, max } = ast.node(elements[0]).kind else {
            panic!("expected a range");
        };
        assert_eq!(char_value(&ast, min), u32::from('a'));
        assert_eq!(char_value(&ast, max), u32::from('c'));
        assert_eq!(ast.raw(elements[0]), "a-c");
        assert_eq!(ast.node(min).parent, Some(elements[0]));
        assert_eq!(char_value(&ast, elements[1]), u32::from('x'));
    }

    #[test]
    fn class_escape_endpoint_stays_flat() {
        let ast = parse(r"[\d-x]", false);
        let els = elements(&ast);
        let NodeKind::CharacterClass { elements, .. } = &ast.node(els[0]).kind else {
            panic!("expected a class");
        };
        assert_eq!(elements.len(), 3);
        assert!(matches!(
            ast.node(elements[0]).kind,
            NodeKind::CharacterSet(CharacterSetKind::Escape {
                kind: EscapeCharacterSetKind::Digit,
                negate: false,
            })
        ));
        assert_eq!(char_value(&ast, elements[1]), u32::from('-'));
        assert_eq!(char_value(&ast, elements[2]), u32::from('x'));
    }

    #[test]
    fn character_sets() {
        let ast = parse(r".\D", false);
        let els = elements(&ast);
        assert!(matches!(
            ast.node(els[0]).kind,
            NodeKind::CharacterSet(CharacterSetKind::Any)
        ));
        assert!(matches!(
            ast.node(els[1]).kind,
            NodeKind::CharacterSet(CharacterSetKind::Escape {
                kind: EscapeCharacterSetKind::Digit,
                negate: true,
            })
        ));
    }

    #[test]
    fn property_character_sets() {
        let ast = parse(r"\P{Letter}\p{Alphabetic}\p{Script=Greek}", true);
        let els = elements(&ast);
        let NodeKind::CharacterSet(CharacterSetKind::Property { key, value, negate }) =
            &ast.node(els[0]).kind
        else {
            panic!("expected a property set");
        };
        assert_eq!(
            (key.as_str(), value.as_deref(), *negate),
            ("General_Category", Some("Letter"), true)
        );
        let NodeKind::CharacterSet(CharacterSetKind::Property { key, value, negate }) =
            &ast.node(els[1]).kind
        else {
            panic!("expected a property set");
        };
        assert_eq!(
            (key.as_str(), value.as_deref(), *negate),
            ("Alphabetic", None, false)
        );
        let NodeKind::CharacterSet(CharacterSetKind::Property { key, value, .. }) =
            &ast.node(els[2]).kind
        else {
            panic!("expected a property set");
        };
        assert_eq!((key.as_str(), value.as_deref()), ("Script", Some("Greek")));
    }

    #[test]
    fn surrogate_escape_pair_composes_in_unicode_mode() {
        let ast = parse(r"\ud83d\ude00", true);
        let els = elements(&ast);
        assert_eq!(els.len(), 1);
        assert_eq!(char_value(&ast, els[0]), 0x1f600);
        assert_eq!((ast.node(els[0]).start, ast.node(els[0]).end), (0, 12));
    }

    #[test]
    fn astral_character_splits_in_legacy_mode() {
        let ast = parse("\u{1f600}", false);
        let els = elements(&ast);
        assert_eq!(els.len(), 2);
        assert_eq!(char_value(&ast, els[0]), 0xd83d);
        assert_eq!(char_value(&ast, els[1]), 0xde00);

        let ast = parse("\u{1f600}", true);
        assert_eq!(elements(&ast).len(), 1);
    }

    #[test]
    fn raw_round_trips() {
        let source = r"(?:a|b)*[c-e]x{2,3}";
        let ast = parse(source, true);
        assert_eq!(ast.raw(ast.root()), source);
        assert_eq!(ast.source(), source);
        for &el in &elements(&ast) {
            let node = ast.node(el);
            assert_eq!(ast.raw(el).chars().count(), node.end - node.start);
        }
    }

    #[test]
    fn parse_flags_builds_a_flags_node() {
        let flags = RegExpParser::new(Options::default())
            .parse_flags("gimuy")
            .unwrap();
        assert_eq!((flags.start, flags.end), (0, 5));
        assert_eq!(flags.raw, "gimuy");
        assert!(flags.global && flags.ignore_case && flags.multiline);
        assert!(flags.unicode && flags.sticky);
        assert!(!flags.dot_all);
    }

    #[test]
    fn parse_literal_couples_pattern_and_flags() {
        let literal = RegExpParser::new(Options::default())
            .parse_literal("/a|b/gi")
            .unwrap();
        assert_eq!(literal.raw, "/a|b/gi");
        assert!(literal.flags.global && literal.flags.ignore_case);
        assert!(!literal.flags.unicode);
        assert_eq!(literal.pattern.source(), "a|b");
        assert_eq!(literal.pattern.raw(literal.pattern.root()), "a|b");
    }

    #[test]
    fn parse_errors_propagate() {
        let parser = RegExpParser::new(Options::default());
        assert!(parser.parse_pattern("a**", false).is_err());
        assert!(parser.parse_literal("/a/xx").is_err());
        assert!(parser.parse_flags("gg").is_err());
    }

    #[test]
    fn repeated_parses_are_identical() {
        let source = r"(?<x>a|b)*[c-e]\k<x>\d";
        let parser = RegExpParser::new(Options::default());
        let first = parser.parse_pattern(source, true).unwrap();
        let second = parser.parse_pattern(source, true).unwrap();
        assert_eq!(first.root(), second.root());
        assert_eq!(
            format!("{:?}", first.nodes()),
            format!("{:?}", second.nodes())
        );

        // A fresh parser, and the two-pass walk without `u`, agree too.
        let third = RegExpParser::new(Options::default())
            .parse_pattern(source, true)
            .unwrap();
        assert_eq!(
            format!("{:?}", first.nodes()),
            format!("{:?}", third.nodes())
        );
        let lenient_a = parser.parse_pattern(source, false).unwrap();
        let lenient_b = parser.parse_pattern(source, false).unwrap();
        assert_eq!(
            format!("{:?}", lenient_a.nodes()),
            format!("{:?}", lenient_b.nodes())
        );

        // A reused validator carries no state between runs either.
        let mut sink = ();
        let mut validator = RegExpValidator::new(Options::default(), &mut sink);
        assert!(validator.validate_pattern(source, true).is_ok());
        assert!(validator.validate_pattern(source, true).is_ok());
    }

    #[test]
    fn nested_group_parents() {
        let ast = parse("((a))", false);
        let els = elements(&ast);
        let NodeKind::CapturingGroup { alternatives, .. } = &ast.node(els[0]).kind else {
            panic!("expected a capturing group");
        };
        let NodeKind::Alternative { elements: inner } = &ast.node(alternatives[0]).kind else {
            panic!("expected an alternative");
        };
        let inner_group = inner[0];
        assert!(matches!(
            ast.node(inner_group).kind,
            NodeKind::CapturingGroup { .. }
        ));
        assert_eq!(ast.node(inner_group).parent, Some(alternatives[0]));
        assert_eq!(ast.raw(inner_group), "(a)");
    }

    #[test]
    fn descending_range_kept_in_tooling_mode() {
        let options = Options {
            disable_character_class_range_check: true,
            ..Options::default()
        };
        let ast = RegExpParser::new(options)
            .parse_pattern("[z-a]", false)
            .unwrap();
        let els = elements(&ast);
        let NodeKind::CharacterClass { elements, .. } = &ast.node(els[0]).kind else {
            panic!("expected a class");
        };
        let NodeKind::CharacterClassRange { min, max } = ast.node(elements[0]).kind else {
            panic!("expected a range");
        };
        assert_eq!(char_value(&ast, min), u32::from('z'));
        assert_eq!(char_value(&ast, max), u32::from('a'));
    }
}
