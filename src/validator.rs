//! Recursive-descent validator for ECMAScript regular expression syntax.
//!
//! The grammar engine walks a scalar stream with single-token lookahead and
//! backtracks via `rewind`; every `eat_*`/`consume_*` production either
//! consumes what it matched or leaves the cursor where it found it. Syntax
//! events are reported through the [`ParseEvents`] sink, so the same engine
//! drives both bare validation (`()` as the sink) and tree building.
//!
//! The engine recognizes the strict ES2018 pattern grammar when the `u` flag
//! or the `strict` option is set, and the Annex B extended grammar otherwise
//! (extended atoms, legacy octal escapes, identity escapes, unbalanced
//! braces). Named groups, lookbehind, the `s` flag, and property escapes are
//! gated on `EcmaVersion::Es2018`.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::ast::{BackreferenceRef, EdgeAssertionKind, EscapeCharacterSetKind, LookaroundKind};
use crate::reader::{Reader, scalars_to_string};
use crate::unicode::{
    is_decimal_digit, is_hex_digit, is_id_continue, is_id_start, is_latin_letter,
    is_line_terminator, is_octal_digit, is_syntax_character, is_valid_lone_unicode_property,
    is_valid_unicode, is_valid_unicode_property,
};

const fn cp(ch: char) -> u32 {
    ch as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EcmaVersion {
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
}

impl EcmaVersion {
    pub fn from_number(n: u16) -> Option<Self> {
        match n {
            5 => Some(EcmaVersion::Es5),
            2015 => Some(EcmaVersion::Es2015),
            2016 => Some(EcmaVersion::Es2016),
            2017 => Some(EcmaVersion::Es2017),
            2018 => Some(EcmaVersion::Es2018),
            _ => None,
        }
    }

    pub fn number(self) -> u16 {
        match self {
            EcmaVersion::Es5 => 5,
            EcmaVersion::Es2015 => 2015,
            EcmaVersion::Es2016 => 2016,
            EcmaVersion::Es2017 => 2017,
            EcmaVersion::Es2018 => 2018,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Reject Annex B extensions even without the `u` flag.
    pub strict: bool,
    pub ecma_version: EcmaVersion,
    /// Tooling mode: keep descending class ranges (`[z-a]`) instead of
    /// raising `Range out of order in character class`.
    pub disable_character_class_range_check: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            strict: false,
            ecma_version: EcmaVersion::Es2018,
            disable_character_class_range_check: false,
        }
    }
}

/// A positioned syntax error. `index` is an offset into the scalar sequence
/// that was being validated (pattern, flags, or literal).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegExpSyntaxError {
    pub source: String,
    pub index: usize,
    pub message: String,
}

impl fmt::Display for RegExpSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source.starts_with('/') {
            write!(
                f,
                "Invalid regular expression: {}: {}",
                self.source, self.message
            )
        } else {
            write!(
                f,
                "Invalid regular expression: /{}/: {}",
                self.source, self.message
            )
        }
    }
}

impl std::error::Error for RegExpSyntaxError {}

/// Syntax events emitted by the validator, in source order. Enter/leave
/// pairs bracket container constructs; all offsets are scalar indices.
///
/// Every method has a no-op default, and `()` implements the trait, so a
/// plain validation run carries no tree-building cost.
#[allow(unused_variables)]
pub trait ParseEvents {
    /// The pattern text and unicode mode of the run about to start. Fires
    /// once per `validate_pattern` call, before any other pattern event.
    fn on_pattern_source(&mut self, source: &str, unicode_mode: bool) {}
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
    }
    fn on_pattern_enter(&mut self, start: usize) {}
    fn on_pattern_leave(&mut self, start: usize, end: usize) {}
    fn on_alternative_enter(&mut self, start: usize, index: usize) {}
    fn on_alternative_leave(&mut self, start: usize, end: usize, index: usize) {}
    fn on_group_enter(&mut self, start: usize) {}
    fn on_group_leave(&mut self, start: usize, end: usize) {}
    fn on_capturing_group_enter(&mut self, start: usize, name: Option<&str>) {}
    fn on_capturing_group_leave(&mut self, start: usize, end: usize, name: Option<&str>) {}
    fn on_quantifier(&mut self, start: usize, end: usize, min: u64, max: Option<u64>, greedy: bool) {
    }
    fn on_lookaround_assertion_enter(&mut self, start: usize, kind: LookaroundKind, negate: bool) {}
    fn on_lookaround_assertion_leave(
        &mut self,
        start: usize,
        end: usize,
        kind: LookaroundKind,
        negate: bool,
    ) {
    }
    fn on_edge_assertion(&mut self, start: usize, end: usize, kind: EdgeAssertionKind) {}
    fn on_word_boundary_assertion(&mut self, start: usize, end: usize, negate: bool) {}
    fn on_any_character_set(&mut self, start: usize, end: usize) {}
    fn on_escape_character_set(
        &mut self,
        start: usize,
        end: usize,
        kind: EscapeCharacterSetKind,
        negate: bool,
    ) {
    }
    fn on_unicode_property_character_set(
        &mut self,
        start: usize,
        end: usize,
        key: &str,
        value: Option<&str>,
        negate: bool,
    ) {
    }
    fn on_character(&mut self, start: usize, end: usize, value: u32) {}
    fn on_backreference(&mut self, start: usize, end: usize, target: &BackreferenceRef) {}
    fn on_character_class_enter(&mut self, start: usize, negate: bool) {}
    fn on_character_class_leave(&mut self, start: usize, end: usize) {}
    fn on_character_class_range(&mut self, start: usize, end: usize) {}
}

impl ParseEvents for () {}

/// A class atom as seen by the range logic: a single character with a known
/// value, or a multi-character set (`\d`, `\p{...}`), which cannot bound a
/// range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClassAtom {
    Char(u32),
    Set,
}

type Result<T> = std::result::Result<T, RegExpSyntaxError>;

pub struct RegExpValidator<'s, S: ParseEvents> {
    strict: bool,
    ecma_version: EcmaVersion,
    disable_range_check: bool,
    sink: &'s mut S,
    reader: Reader,
    source_text: String,
    u_flag: bool,
    n_flag: bool,
    last_assertion_is_quantifiable: bool,
    num_capturing_parens: u32,
    max_backreference: u32,
    group_names: FxHashSet<String>,
    backreference_names: FxHashSet<String>,
}

impl<'s, S: ParseEvents> RegExpValidator<'s, S> {
    pub fn new(options: Options, sink: &'s mut S) -> Self {
        RegExpValidator {
            strict: options.strict,
            ecma_version: options.ecma_version,
            disable_range_check: options.disable_character_class_range_check,
            sink,
            reader: Reader::new(),
            source_text: String::new(),
            u_flag: false,
            n_flag: false,
            last_assertion_is_quantifiable: false,
            num_capturing_parens: 0,
            max_backreference: 0,
            group_names: FxHashSet::default(),
            backreference_names: FxHashSet::default(),
        }
    }

    /// Validates a whole literal, `/pattern/flags`.
    pub fn validate_literal(&mut self, source: &str) -> Result<()> {
        self.u_flag = false;
        self.n_flag = false;
        self.reset(source);
        if self.reader.eat(cp('/')) && self.eat_regexp_body()? && self.reader.eat(cp('/')) {
            let body_end = self.reader.index();
            let pattern = scalars_to_string(&self.reader.scalars()[1..body_end - 1]);
            let flags = scalars_to_string(&self.reader.scalars()[body_end..]);
            self.validate_flags(&flags)?;
            self.validate_pattern(&pattern, flags.contains('u'))
        } else {
            let message = match self.reader.curr().and_then(char::from_u32) {
                Some(ch) => format!("Unexpected character '{ch}'"),
                None => "Unterminated regular expression".to_string(),
            };
            Err(self.error(message))
        }
    }

    /// Validates a flag string. Errors carry the offset of the bad flag.
    pub fn validate_flags(&mut self, source: &str) -> Result<()> {
        let mut existing = FxHashSet::default();
        let mut global = false;
        let mut ignore_case = false;
        let mut multiline = false;
        let mut unicode = false;
        let mut sticky = false;
        let mut dot_all = false;

        let mut count = 0;
        for (index, flag) in source.chars().enumerate() {
            count = index + 1;
            if !existing.insert(flag) {
                return Err(RegExpSyntaxError {
                    source: source.to_string(),
                    index,
                    message: format!("Duplicated flag '{flag}'"),
                });
            }
            let valid = match flag {
                'g' => {
                    global = true;
                    true
                }
                'i' => {
                    ignore_case = true;
                    true
                }
                'm' => {
                    multiline = true;
                    true
                }
                'u' if self.ecma_version >= EcmaVersion::Es2015 => {
                    unicode = true;
                    true
                }
                'y' if self.ecma_version >= EcmaVersion::Es2015 => {
                    sticky = true;
                    true
                }
                's' if self.ecma_version >= EcmaVersion::Es2018 => {
                    dot_all = true;
                    true
                }
                _ => false,
            };
            if !valid {
                return Err(RegExpSyntaxError {
                    source: source.to_string(),
                    index,
                    message: format!("Invalid flag '{flag}'"),
                });
            }
        }
        self.sink.on_flags(
            0,
            count,
            source,
            global,
            ignore_case,
            multiline,
            unicode,
            sticky,
            dot_all,
        );
        Ok(())
    }

    /// Validates a bare pattern. `u_flag` selects the unicode grammar and
    /// code-point scanning (from ES2015 up).
    ///
    /// Named-group validation is two-pass: `\k<name>` only becomes a
    /// GroupName backreference once a named group exists somewhere in the
    /// pattern, so if the first pass ran without the `n` flag and saw a
    /// group name, the whole pattern is re-walked with it set.
    pub fn validate_pattern(&mut self, source: &str, u_flag: bool) -> Result<()> {
        self.u_flag = u_flag && self.ecma_version >= EcmaVersion::Es2015;
        self.n_flag = self.u_flag && self.ecma_version >= EcmaVersion::Es2018;
        self.reset(source);
        self.sink.on_pattern_source(source, self.u_flag);
        self.consume_pattern()?;

        if !self.n_flag
            && self.ecma_version >= EcmaVersion::Es2018
            && !self.group_names.is_empty()
        {
            self.n_flag = true;
            self.reader.rewind(0);
            self.consume_pattern()?;
        }
        Ok(())
    }

    fn reset(&mut self, source: &str) {
        self.source_text = source.to_string();
        self.reader.reset(source, self.u_flag);
    }

    fn error(&self, message: impl Into<String>) -> RegExpSyntaxError {
        self.error_at(self.reader.index(), message)
    }

    fn error_at(&self, index: usize, message: impl Into<String>) -> RegExpSyntaxError {
        RegExpSyntaxError {
            source: self.source_text.clone(),
            index,
            message: message.into(),
        }
    }

    /// RegularExpressionBody in a literal: everything up to the closing `/`,
    /// tracking classes and escapes. A leading `*` is rejected so the text
    /// cannot be confused with a comment.
    fn eat_regexp_body(&mut self) -> Result<bool> {
        let start = self.reader.index();
        let mut in_class = false;
        let mut escaped = false;
        loop {
            let Some(c) = self.reader.curr() else {
                let kind = if in_class {
                    "character class"
                } else {
                    "regular expression"
                };
                return Err(self.error(format!("Unterminated {kind}")));
            };
            if is_line_terminator(c) {
                let kind = if in_class {
                    "character class"
                } else {
                    "regular expression"
                };
                return Err(self.error(format!("Unterminated {kind}")));
            }
            if escaped {
                escaped = false;
            } else if c == cp('\\') {
                escaped = true;
            } else if c == cp('[') {
                in_class = true;
            } else if c == cp(']') {
                in_class = false;
            } else if (c == cp('/') && !in_class) || (c == cp('*') && self.reader.index() == start)
            {
                break;
            }
            self.reader.advance();
        }
        Ok(self.reader.index() != start)
    }

    /// Pattern :: Disjunction
    fn consume_pattern(&mut self) -> Result<()> {
        let start = self.reader.index();
        self.num_capturing_parens = self.count_capturing_parens();
        self.last_assertion_is_quantifiable = false;
        self.max_backreference = 0;
        self.group_names.clear();
        self.backreference_names.clear();

        self.sink.on_pattern_enter(start);
        self.consume_disjunction()?;

        if let Some(c) = self.reader.curr() {
            if c == cp(')') {
                return Err(self.error("Unmatched ')'"));
            }
            if c == cp(']') || c == cp('}') {
                return Err(self.error("Lone quantifier brackets"));
            }
            let ch = char::from_u32(c).unwrap_or('\u{fffd}');
            return Err(self.error(format!("Unexpected character '{ch}'")));
        }
        // Numeric forward references are resolved against the final count.
        if self.max_backreference > self.num_capturing_parens {
            return Err(self.error("Invalid escape"));
        }
        for name in &self.backreference_names {
            if !self.group_names.contains(name) {
                return Err(self.error("Invalid named capture referenced"));
            }
        }
        self.sink.on_pattern_leave(start, self.reader.index());
        Ok(())
    }

    /// Pre-scan for the total capturing-group count, so numeric
    /// backreferences can be checked against groups that open later.
    fn count_capturing_parens(&self) -> u32 {
        let mut count = 0;
        let mut in_class = false;
        let mut escaped = false;
        let mut i = self.reader.index();
        while let Some(c) = self.reader.at(i) {
            if escaped {
                escaped = false;
            } else if c == cp('\\') {
                escaped = true;
            } else if c == cp('[') {
                in_class = true;
            } else if c == cp(']') {
                in_class = false;
            } else if c == cp('(') && !in_class {
                let named = self.reader.at(i + 1) == Some(cp('?'))
                    && self.reader.at(i + 2) == Some(cp('<'))
                    && self.reader.at(i + 3) != Some(cp('='))
                    && self.reader.at(i + 3) != Some(cp('!'));
                if self.reader.at(i + 1) != Some(cp('?')) || named {
                    count += 1;
                }
            }
            i += 1;
        }
        count
    }

    /// Disjunction :: Alternative (`|` Alternative)*
    fn consume_disjunction(&mut self) -> Result<()> {
        let mut i = 0;
        loop {
            let start = self.reader.index();
            self.sink.on_alternative_enter(start, i);
            self.consume_alternative()?;
            self.sink.on_alternative_leave(start, self.reader.index(), i);
            i += 1;
            if !self.reader.eat(cp('|')) {
                break;
            }
        }
        let probe_start = self.reader.index();
        if self.consume_quantifier(true)? {
            return Err(self.error_at(probe_start, "Nothing to repeat"));
        }
        if self.reader.eat(cp('{')) {
            return Err(self.error_at(probe_start, "Lone quantifier brackets"));
        }
        Ok(())
    }

    fn consume_alternative(&mut self) -> Result<()> {
        while self.reader.curr().is_some() && self.consume_term()? {}
        Ok(())
    }

    /// Term :: Assertion | Atom | Atom Quantifier
    /// (Annex B additionally allows a quantifier after a lookahead.)
    fn consume_term(&mut self) -> Result<bool> {
        if self.u_flag || self.strict {
            if self.consume_assertion()? {
                return Ok(true);
            }
            if self.consume_atom()? {
                self.consume_quantifier(false)?;
                return Ok(true);
            }
            return Ok(false);
        }

        if self.consume_assertion()? {
            if self.last_assertion_is_quantifiable {
                self.consume_quantifier(false)?;
            }
            return Ok(true);
        }
        if self.consume_extended_atom()? {
            self.consume_quantifier(false)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Assertion :: `^` | `$` | `\b` | `\B` | lookaround group
    fn consume_assertion(&mut self) -> Result<bool> {
        let start = self.reader.index();
        self.last_assertion_is_quantifiable = false;

        if self.reader.eat(cp('^')) {
            self.sink
                .on_edge_assertion(start, self.reader.index(), EdgeAssertionKind::Start);
            return Ok(true);
        }
        if self.reader.eat(cp('$')) {
            self.sink
                .on_edge_assertion(start, self.reader.index(), EdgeAssertionKind::End);
            return Ok(true);
        }
        if self.reader.eat2(cp('\\'), cp('B')) {
            self.sink
                .on_word_boundary_assertion(start, self.reader.index(), true);
            return Ok(true);
        }
        if self.reader.eat2(cp('\\'), cp('b')) {
            self.sink
                .on_word_boundary_assertion(start, self.reader.index(), false);
            return Ok(true);
        }

        // Lookahead / lookbehind.
        if self.reader.eat2(cp('('), cp('?')) {
            let lookbehind =
                self.ecma_version >= EcmaVersion::Es2018 && self.reader.eat(cp('<'));
            let negate = if self.reader.eat(cp('=')) {
                Some(false)
            } else if self.reader.eat(cp('!')) {
                Some(true)
            } else {
                None
            };
            if let Some(negate) = negate {
                let kind = if lookbehind {
                    LookaroundKind::Lookbehind
                } else {
                    LookaroundKind::Lookahead
                };
                self.sink.on_lookaround_assertion_enter(start, kind, negate);
                self.consume_disjunction()?;
                if !self.reader.eat(cp(')')) {
                    return Err(self.error("Unterminated group"));
                }
                self.last_assertion_is_quantifiable = !lookbehind && !self.strict;
                self.sink
                    .on_lookaround_assertion_leave(start, self.reader.index(), kind, negate);
                return Ok(true);
            }
            self.reader.rewind(start);
        }

        Ok(false)
    }

    /// Quantifier :: QuantifierPrefix `?`?
    ///
    /// `no_consume` is the probe mode used at the end of a disjunction to
    /// detect a dangling quantifier; it suppresses events and range errors.
    fn consume_quantifier(&mut self, no_consume: bool) -> Result<bool> {
        let start = self.reader.index();
        let min: u64;
        let max: Option<u64>;

        if self.reader.eat(cp('*')) {
            min = 0;
            max = None;
        } else if self.reader.eat(cp('+')) {
            min = 1;
            max = None;
        } else if self.reader.eat(cp('?')) {
            min = 0;
            max = Some(1);
        } else if let Some((lo, hi)) = self.eat_braced_quantifier(no_consume)? {
            min = lo;
            max = hi;
        } else {
            return Ok(false);
        }

        let greedy = !self.reader.eat(cp('?'));
        if !no_consume {
            self.sink
                .on_quantifier(start, self.reader.index(), min, max, greedy);
        }
        Ok(true)
    }

    /// `{n}` | `{n,}` | `{n,m}`. `None` means no braced quantifier here;
    /// a malformed one raises in the strict grammar and backtracks in the
    /// extended grammar.
    fn eat_braced_quantifier(&mut self, no_error: bool) -> Result<Option<(u64, Option<u64>)>> {
        let start = self.reader.index();
        if self.reader.eat(cp('{')) {
            if let Some(min) = self.eat_decimal_digits() {
                let mut max = Some(min);
                if self.reader.eat(cp(',')) {
                    max = self.eat_decimal_digits();
                }
                if self.reader.eat(cp('}')) {
                    if !no_error && max.is_some_and(|m| m < min) {
                        return Err(self.error("numbers out of order in {} quantifier"));
                    }
                    return Ok(Some((min, max)));
                }
            }
            if !no_error && (self.u_flag || self.strict) {
                return Err(self.error("Incomplete quantifier"));
            }
            self.reader.rewind(start);
        }
        Ok(None)
    }

    /// Atom (strict grammar).
    fn consume_atom(&mut self) -> Result<bool> {
        Ok(self.consume_pattern_character()
            || self.consume_dot()
            || self.consume_reverse_solidus_atom_escape()?
            || self.consume_character_class()?
            || self.consume_uncapturing_group()?
            || self.consume_capturing_group()?)
    }

    /// ExtendedAtom (Annex B grammar).
    fn consume_extended_atom(&mut self) -> Result<bool> {
        Ok(self.consume_dot()
            || self.consume_reverse_solidus_atom_escape()?
            || self.consume_reverse_solidus_followed_by_c()
            || self.consume_character_class()?
            || self.consume_uncapturing_group()?
            || self.consume_capturing_group()?
            || self.consume_invalid_braced_quantifier()?
            || self.consume_extended_pattern_character())
    }

    fn consume_dot(&mut self) -> bool {
        let start = self.reader.index();
        if self.reader.eat(cp('.')) {
            self.sink.on_any_character_set(start, self.reader.index());
            return true;
        }
        false
    }

    fn consume_reverse_solidus_atom_escape(&mut self) -> Result<bool> {
        let start = self.reader.index();
        if self.reader.eat(cp('\\')) {
            if self.consume_atom_escape(start)? {
                return Ok(true);
            }
            self.reader.rewind(start);
        }
        Ok(false)
    }

    /// Annex B: `\` [lookahead = `c`] is a literal backslash.
    fn consume_reverse_solidus_followed_by_c(&mut self) -> bool {
        let start = self.reader.index();
        if self.reader.curr() == Some(cp('\\')) && self.reader.next() == Some(cp('c')) {
            self.reader.advance();
            self.sink.on_character(start, self.reader.index(), cp('\\'));
            return true;
        }
        false
    }

    fn consume_uncapturing_group(&mut self) -> Result<bool> {
        let start = self.reader.index();
        if self.reader.eat2(cp('('), cp('?')) {
            if self.reader.eat(cp(':')) {
                self.sink.on_group_enter(start);
                self.consume_disjunction()?;
                if !self.reader.eat(cp(')')) {
                    return Err(self.error("Unterminated group"));
                }
                self.sink.on_group_leave(start, self.reader.index());
                return Ok(true);
            }
            self.reader.rewind(start);
        }
        Ok(false)
    }

    fn consume_capturing_group(&mut self) -> Result<bool> {
        let start = self.reader.index();
        if !self.reader.eat(cp('(')) {
            return Ok(false);
        }

        let name = if self.ecma_version >= EcmaVersion::Es2018 {
            self.consume_group_specifier()?
        } else {
            if self.reader.curr() == Some(cp('?')) {
                return Err(self.error("Invalid group"));
            }
            None
        };

        self.sink.on_capturing_group_enter(start, name.as_deref());
        self.consume_disjunction()?;
        if !self.reader.eat(cp(')')) {
            return Err(self.error("Unterminated group"));
        }
        self.sink
            .on_capturing_group_leave(start, self.reader.index(), name.as_deref());
        Ok(true)
    }

    /// GroupSpecifier :: `?` GroupName, or empty.
    fn consume_group_specifier(&mut self) -> Result<Option<String>> {
        if self.reader.eat(cp('?')) {
            if let Some(name) = self.eat_group_name()? {
                if self.group_names.insert(name.clone()) {
                    return Ok(Some(name));
                }
                return Err(self.error("Duplicate capture group name"));
            }
            return Err(self.error("Invalid group"));
        }
        Ok(None)
    }

    /// A braced quantifier with nothing to repeat, e.g. `{2}` at the start
    /// of an alternative.
    fn consume_invalid_braced_quantifier(&mut self) -> Result<bool> {
        let start = self.reader.index();
        if self.eat_braced_quantifier(true)?.is_some() {
            return Err(self.error_at(start, "Nothing to repeat"));
        }
        Ok(false)
    }

    /// PatternCharacter :: SourceCharacter but not SyntaxCharacter
    fn consume_pattern_character(&mut self) -> bool {
        let start = self.reader.index();
        if let Some(c) = self.reader.curr()
            && !is_syntax_character(c)
        {
            self.reader.advance();
            self.sink.on_character(start, self.reader.index(), c);
            return true;
        }
        false
    }

    /// ExtendedPatternCharacter :: SourceCharacter but not one of
    /// `^ $ \ . * + ? ( ) [ |`
    fn consume_extended_pattern_character(&mut self) -> bool {
        let start = self.reader.index();
        if let Some(c) = self.reader.curr()
            && !matches!(
                char::from_u32(c),
                Some('^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | '|')
            )
        {
            self.reader.advance();
            self.sink.on_character(start, self.reader.index(), c);
            return true;
        }
        false
    }

    /// AtomEscape, with `start` at the already-consumed `\`.
    fn consume_atom_escape(&mut self, start: usize) -> Result<bool> {
        if self.consume_backreference(start)?
            || self.consume_character_class_escape(start)?
            || self.consume_character_escape(start)?
            || (self.n_flag && self.consume_k_group_name(start)?)
        {
            return Ok(true);
        }
        if self.u_flag || self.strict {
            return Err(self.error("Invalid escape"));
        }
        Ok(false)
    }

    /// DecimalEscape as a backreference. In the extended grammar a number
    /// above the pattern's capture count backtracks into an octal escape
    /// instead.
    fn consume_backreference(&mut self, start: usize) -> Result<bool> {
        let digit_start = self.reader.index();
        if let Some(n) = self.eat_decimal_escape() {
            if self.u_flag || self.strict || n <= self.num_capturing_parens {
                if n > self.max_backreference {
                    self.max_backreference = n;
                }
                self.sink.on_backreference(
                    start,
                    self.reader.index(),
                    &BackreferenceRef::Index(n),
                );
                return Ok(true);
            }
            self.reader.rewind(digit_start);
        }
        Ok(false)
    }

    /// `k` GroupName, active only when the pattern has named groups.
    fn consume_k_group_name(&mut self, start: usize) -> Result<bool> {
        if self.reader.eat(cp('k')) {
            if let Some(name) = self.eat_group_name()? {
                self.backreference_names.insert(name.clone());
                self.sink.on_backreference(
                    start,
                    self.reader.index(),
                    &BackreferenceRef::Name(name),
                );
                return Ok(true);
            }
            return Err(self.error("Invalid named reference"));
        }
        Ok(false)
    }

    /// CharacterClassEscape :: `d D s S w W` | `p{...}` | `P{...}`
    fn consume_character_class_escape(&mut self, start: usize) -> Result<bool> {
        if self.reader.eat(cp('d')) {
            self.sink.on_escape_character_set(
                start,
                self.reader.index(),
                EscapeCharacterSetKind::Digit,
                false,
            );
            return Ok(true);
        }
        if self.reader.eat(cp('D')) {
            self.sink.on_escape_character_set(
                start,
                self.reader.index(),
                EscapeCharacterSetKind::Digit,
                true,
            );
            return Ok(true);
        }
        if self.reader.eat(cp('s')) {
            self.sink.on_escape_character_set(
                start,
                self.reader.index(),
                EscapeCharacterSetKind::Space,
                false,
            );
            return Ok(true);
        }
        if self.reader.eat(cp('S')) {
            self.sink.on_escape_character_set(
                start,
                self.reader.index(),
                EscapeCharacterSetKind::Space,
                true,
            );
            return Ok(true);
        }
        if self.reader.eat(cp('w')) {
            self.sink.on_escape_character_set(
                start,
                self.reader.index(),
                EscapeCharacterSetKind::Word,
                false,
            );
            return Ok(true);
        }
        if self.reader.eat(cp('W')) {
            self.sink.on_escape_character_set(
                start,
                self.reader.index(),
                EscapeCharacterSetKind::Word,
                true,
            );
            return Ok(true);
        }

        if self.u_flag && self.ecma_version >= EcmaVersion::Es2018 {
            let negate = if self.reader.eat(cp('p')) {
                false
            } else if self.reader.eat(cp('P')) {
                true
            } else {
                return Ok(false);
            };
            if self.reader.eat(cp('{'))
                && let Some((key, value)) = self.eat_unicode_property_value_expression()?
                && self.reader.eat(cp('}'))
            {
                self.sink.on_unicode_property_character_set(
                    start,
                    self.reader.index(),
                    &key,
                    value.as_deref(),
                    negate,
                );
                return Ok(true);
            }
            return Err(self.error("Invalid property name"));
        }

        Ok(false)
    }

    /// CharacterEscape wrapped into a character event. `start` is the `\`.
    fn consume_character_escape(&mut self, start: usize) -> Result<bool> {
        if let Some(value) = self.eat_character_escape()? {
            self.sink.on_character(start, self.reader.index(), value);
            return Ok(true);
        }
        Ok(false)
    }

    /// CharacterEscape value, without emitting an event; shared between the
    /// atom and class grammars.
    fn eat_character_escape(&mut self) -> Result<Option<u32>> {
        if let Some(v) = self.eat_control_escape() {
            return Ok(Some(v));
        }
        if let Some(v) = self.eat_c_control_letter() {
            return Ok(Some(v));
        }
        if let Some(v) = self.eat_zero() {
            return Ok(Some(v));
        }
        if let Some(v) = self.eat_hex_escape_sequence()? {
            return Ok(Some(v));
        }
        if let Some(v) = self.eat_regexp_unicode_escape_sequence()? {
            return Ok(Some(v));
        }
        if !self.u_flag
            && !self.strict
            && let Some(v) = self.eat_legacy_octal_escape_sequence()
        {
            return Ok(Some(v));
        }
        Ok(self.eat_identity_escape())
    }

    /// ControlEscape :: one of `f n r t v`
    fn eat_control_escape(&mut self) -> Option<u32> {
        if self.reader.eat(cp('f')) {
            return Some(0x0c);
        }
        if self.reader.eat(cp('n')) {
            return Some(0x0a);
        }
        if self.reader.eat(cp('r')) {
            return Some(0x0d);
        }
        if self.reader.eat(cp('t')) {
            return Some(0x09);
        }
        if self.reader.eat(cp('v')) {
            return Some(0x0b);
        }
        None
    }

    /// `c` ControlLetter
    fn eat_c_control_letter(&mut self) -> Option<u32> {
        let start = self.reader.index();
        if self.reader.eat(cp('c')) {
            if let Some(v) = self.eat_control_letter() {
                return Some(v);
            }
            self.reader.rewind(start);
        }
        None
    }

    fn eat_control_letter(&mut self) -> Option<u32> {
        if let Some(c) = self.reader.curr()
            && is_latin_letter(c)
        {
            self.reader.advance();
            return Some(c % 0x20);
        }
        None
    }

    /// `0` [lookahead not a digit]
    fn eat_zero(&mut self) -> Option<u32> {
        if self.reader.curr() == Some(cp('0')) && !self.reader.next().is_some_and(is_decimal_digit)
        {
            self.reader.advance();
            return Some(0);
        }
        None
    }

    /// `x` HexDigit HexDigit
    fn eat_hex_escape_sequence(&mut self) -> Result<Option<u32>> {
        let start = self.reader.index();
        if self.reader.eat(cp('x')) {
            if let Some(v) = self.eat_fixed_hex_digits(2) {
                return Ok(Some(v));
            }
            if self.u_flag {
                return Err(self.error("Invalid escape"));
            }
            self.reader.rewind(start);
        }
        Ok(None)
    }

    /// `u` Hex4Digits (with surrogate pair composition in unicode mode) or
    /// `u{ CodePoint }` in unicode mode.
    fn eat_regexp_unicode_escape_sequence(&mut self) -> Result<Option<u32>> {
        let start = self.reader.index();
        if self.reader.eat(cp('u')) {
            if let Some(lead) = self.eat_fixed_hex_digits(4) {
                if self.u_flag && (0xd800..=0xdbff).contains(&lead) {
                    let lead_end = self.reader.index();
                    if self.reader.eat(cp('\\'))
                        && self.reader.eat(cp('u'))
                        && let Some(trail) = self.eat_fixed_hex_digits(4)
                        && (0xdc00..=0xdfff).contains(&trail)
                    {
                        return Ok(Some(
                            (lead - 0xd800) * 0x400 + (trail - 0xdc00) + 0x10000,
                        ));
                    }
                    self.reader.rewind(lead_end);
                }
                return Ok(Some(lead));
            }
            if self.u_flag
                && self.reader.eat(cp('{'))
                && let Some(value) = self.eat_hex_digits()
                && self.reader.eat(cp('}'))
                && is_valid_unicode(value)
            {
                return Ok(Some(value as u32));
            }
            if self.u_flag || self.strict {
                return Err(self.error("Invalid unicode escape"));
            }
            self.reader.rewind(start);
        }
        Ok(None)
    }

    /// Annex B LegacyOctalEscapeSequence (one to three octal digits, value
    /// capped below 0x100).
    fn eat_legacy_octal_escape_sequence(&mut self) -> Option<u32> {
        if let Some(d1) = self.reader.curr().filter(|&c| is_octal_digit(c)) {
            let n1 = d1 - 0x30;
            self.reader.advance();
            if let Some(d2) = self.reader.curr().filter(|&c| is_octal_digit(c)) {
                let n2 = d2 - 0x30;
                self.reader.advance();
                if n1 <= 3
                    && let Some(d3) = self.reader.curr().filter(|&c| is_octal_digit(c))
                {
                    self.reader.advance();
                    return Some(n1 * 64 + n2 * 8 + (d3 - 0x30));
                }
                return Some(n1 * 8 + n2);
            }
            return Some(n1);
        }
        None
    }

    /// IdentityEscape. The unicode grammar only admits syntax characters and
    /// `/`; the loose grammar admits anything that cannot start another
    /// escape production.
    fn eat_identity_escape(&mut self) -> Option<u32> {
        if self.u_flag {
            if let Some(c) = self.reader.curr()
                && is_syntax_character(c)
            {
                self.reader.advance();
                return Some(c);
            }
            if self.reader.eat(cp('/')) {
                return Some(cp('/'));
            }
            return None;
        }

        if let Some(c) = self.reader.curr()
            && self.is_valid_identity_escape(c)
        {
            self.reader.advance();
            return Some(c);
        }
        None
    }

    fn is_valid_identity_escape(&self, c: u32) -> bool {
        if self.strict {
            !is_id_continue(c)
        } else {
            c != cp('c') && (!self.n_flag || c != cp('k'))
        }
    }

    /// DecimalEscape :: NonZeroDigit DecimalDigits?
    fn eat_decimal_escape(&mut self) -> Option<u32> {
        let first = self.reader.curr()?;
        if !(0x31..=0x39).contains(&first) {
            return None;
        }
        let mut value = first - 0x30;
        self.reader.advance();
        while let Some(c) = self.reader.curr().filter(|&c| is_decimal_digit(c)) {
            value = value.saturating_mul(10).saturating_add(c - 0x30);
            self.reader.advance();
        }
        Some(value)
    }

    /// CharacterClass :: `[` `^`? ClassRanges `]`
    fn consume_character_class(&mut self) -> Result<bool> {
        let start = self.reader.index();
        if !self.reader.eat(cp('[')) {
            return Ok(false);
        }
        let negate = self.reader.eat(cp('^'));
        self.sink.on_character_class_enter(start, negate);
        self.consume_class_ranges()?;
        if !self.reader.eat(cp(']')) {
            return Err(self.error("Unterminated character class"));
        }
        self.sink
            .on_character_class_leave(start, self.reader.index());
        Ok(true)
    }

    /// ClassRanges. A `-` between two single-character atoms forms a range;
    /// a `-` next to a class escape stays a literal hyphen in the extended
    /// grammar and is an error in the strict one.
    fn consume_class_ranges(&mut self) -> Result<()> {
        loop {
            let range_start = self.reader.index();
            let Some(left) = self.consume_class_atom()? else {
                break;
            };

            let hyphen_start = self.reader.index();
            if !self.reader.eat(cp('-')) {
                continue;
            }
            self.sink
                .on_character(hyphen_start, self.reader.index(), cp('-'));

            let Some(right) = self.consume_class_atom()? else {
                continue;
            };

            match (left, right) {
                (ClassAtom::Char(lo), ClassAtom::Char(hi)) => {
                    if !self.disable_range_check && lo > hi {
                        return Err(self.error("Range out of order in character class"));
                    }
                    self.sink
                        .on_character_class_range(range_start, self.reader.index());
                }
                _ => {
                    if self.u_flag || self.strict {
                        return Err(self.error("Invalid character class"));
                    }
                }
            }
        }
        Ok(())
    }

    /// ClassAtom. `None` at `]` or end of input.
    fn consume_class_atom(&mut self) -> Result<Option<ClassAtom>> {
        let start = self.reader.index();
        let Some(c) = self.reader.curr() else {
            return Ok(None);
        };

        if c != cp('\\') && c != cp(']') {
            self.reader.advance();
            self.sink.on_character(start, self.reader.index(), c);
            return Ok(Some(ClassAtom::Char(c)));
        }

        if c == cp('\\') {
            self.reader.advance();
            if let Some(atom) = self.consume_class_escape(start)? {
                return Ok(Some(atom));
            }
            if !self.strict && !self.u_flag && self.reader.curr() == Some(cp('c')) {
                // Annex B: `\` [lookahead = c] is a literal backslash.
                self.sink.on_character(start, self.reader.index(), cp('\\'));
                return Ok(Some(ClassAtom::Char(cp('\\'))));
            }
            if self.u_flag || self.strict {
                return Err(self.error("Invalid escape"));
            }
            self.reader.rewind(start);
        }
        Ok(None)
    }

    /// ClassEscape, with `start` at the already-consumed `\`.
    fn consume_class_escape(&mut self, start: usize) -> Result<Option<ClassAtom>> {
        // `\b` is backspace inside a class.
        if self.reader.eat(cp('b')) {
            self.sink.on_character(start, self.reader.index(), 0x08);
            return Ok(Some(ClassAtom::Char(0x08)));
        }
        if self.u_flag && self.reader.eat(cp('-')) {
            self.sink.on_character(start, self.reader.index(), cp('-'));
            return Ok(Some(ClassAtom::Char(cp('-'))));
        }
        // Annex B: `c` ClassControlLetter (a digit or `_` after `\c`).
        if !self.strict
            && !self.u_flag
            && self.reader.curr() == Some(cp('c'))
            && let Some(k) = self.reader.next()
            && (is_decimal_digit(k) || k == cp('_'))
        {
            self.reader.advance();
            self.reader.advance();
            let value = k % 0x20;
            self.sink.on_character(start, self.reader.index(), value);
            return Ok(Some(ClassAtom::Char(value)));
        }
        if self.consume_character_class_escape(start)? {
            return Ok(Some(ClassAtom::Set));
        }
        if let Some(value) = self.eat_character_escape()? {
            self.sink.on_character(start, self.reader.index(), value);
            return Ok(Some(ClassAtom::Char(value)));
        }
        Ok(None)
    }

    /// GroupName :: `<` RegExpIdentifierName `>`
    fn eat_group_name(&mut self) -> Result<Option<String>> {
        if self.reader.eat(cp('<')) {
            if let Some(name) = self.eat_regexp_identifier_name()?
                && self.reader.eat(cp('>'))
            {
                return Ok(Some(name));
            }
            return Err(self.error("Invalid capture group name"));
        }
        Ok(None)
    }

    fn eat_regexp_identifier_name(&mut self) -> Result<Option<String>> {
        if let Some(first) = self.eat_regexp_identifier_start()? {
            let mut name = String::new();
            name.push(char::from_u32(first).unwrap_or('\u{fffd}'));
            while let Some(part) = self.eat_regexp_identifier_part()? {
                name.push(char::from_u32(part).unwrap_or('\u{fffd}'));
            }
            return Ok(Some(name));
        }
        Ok(None)
    }

    fn eat_regexp_identifier_start(&mut self) -> Result<Option<u32>> {
        let start = self.reader.index();
        let Some(first) = self.reader.curr() else {
            return Ok(None);
        };
        self.reader.advance();

        let mut c = first;
        if first == cp('\\')
            && let Some(esc) = self.eat_regexp_unicode_escape_sequence()?
        {
            c = esc;
        }
        if is_regexp_identifier_start(c) {
            return Ok(Some(c));
        }
        self.reader.rewind(start);
        Ok(None)
    }

    fn eat_regexp_identifier_part(&mut self) -> Result<Option<u32>> {
        let start = self.reader.index();
        let Some(first) = self.reader.curr() else {
            return Ok(None);
        };
        self.reader.advance();

        let mut c = first;
        if first == cp('\\')
            && let Some(esc) = self.eat_regexp_unicode_escape_sequence()?
        {
            c = esc;
        }
        if is_regexp_identifier_part(c) {
            return Ok(Some(c));
        }
        self.reader.rewind(start);
        Ok(None)
    }

    /// UnicodePropertyValueExpression :: Name `=` Value | LoneNameOrValue
    fn eat_unicode_property_value_expression(
        &mut self,
    ) -> Result<Option<(String, Option<String>)>> {
        let start = self.reader.index();

        if let Some(name) = self.eat_unicode_property_name()
            && self.reader.eat(cp('='))
        {
            if let Some(value) = self.eat_unicode_property_value() {
                if is_valid_unicode_property(&name, &value) {
                    return Ok(Some((name, Some(value))));
                }
                return Err(self.error("Invalid property name"));
            }
        }
        self.reader.rewind(start);

        if let Some(name_or_value) = self.eat_unicode_property_value() {
            if is_valid_unicode_property("General_Category", &name_or_value) {
                return Ok(Some(("General_Category".to_string(), Some(name_or_value))));
            }
            if is_valid_lone_unicode_property(&name_or_value) {
                return Ok(Some((name_or_value, None)));
            }
            return Err(self.error("Invalid property name"));
        }
        Ok(None)
    }

    fn eat_unicode_property_name(&mut self) -> Option<String> {
        let mut name = String::new();
        while let Some(c) = self.reader.curr().filter(|&c| {
            is_latin_letter(c) || c == cp('_')
        }) {
            name.push(char::from_u32(c).unwrap_or('\u{fffd}'));
            self.reader.advance();
        }
        if name.is_empty() { None } else { Some(name) }
    }

    fn eat_unicode_property_value(&mut self) -> Option<String> {
        let mut value = String::new();
        while let Some(c) = self.reader.curr().filter(|&c| {
            is_latin_letter(c) || is_decimal_digit(c) || c == cp('_')
        }) {
            value.push(char::from_u32(c).unwrap_or('\u{fffd}'));
            self.reader.advance();
        }
        if value.is_empty() { None } else { Some(value) }
    }

    /// DecimalDigits, saturating on overflow (quantifier bounds have no
    /// upper limit in the grammar).
    fn eat_decimal_digits(&mut self) -> Option<u64> {
        let mut value: u64 = 0;
        let mut any = false;
        while let Some(c) = self.reader.curr().filter(|&c| is_decimal_digit(c)) {
            any = true;
            value = value
                .saturating_mul(10)
                .saturating_add(u64::from(c - 0x30));
            self.reader.advance();
        }
        if any { Some(value) } else { None }
    }

    fn eat_hex_digits(&mut self) -> Option<u64> {
        let mut value: u64 = 0;
        let mut any = false;
        while let Some(c) = self.reader.curr().filter(|&c| is_hex_digit(c)) {
            any = true;
            value = value
                .saturating_mul(16)
                .saturating_add(u64::from(crate::unicode::hex_digit_value(c)));
            self.reader.advance();
        }
        if any { Some(value) } else { None }
    }

    /// Exactly `length` hex digits, or nothing.
    fn eat_fixed_hex_digits(&mut self, length: usize) -> Option<u32> {
        let start = self.reader.index();
        let mut value: u32 = 0;
        for _ in 0..length {
            let Some(c) = self.reader.curr().filter(|&c| is_hex_digit(c)) else {
                self.reader.rewind(start);
                return None;
            };
            value = value * 16 + crate::unicode::hex_digit_value(c);
            self.reader.advance();
        }
        Some(value)
    }
}

/// RegExpIdentifierStart: ID_Start plus `$` and `_`.
fn is_regexp_identifier_start(c: u32) -> bool {
    is_id_start(c) || c == cp('$') || c == cp('_')
}

/// RegExpIdentifierPart: ID_Continue plus `$`, ZWNJ, and ZWJ.
fn is_regexp_identifier_part(c: u32) -> bool {
    is_id_continue(c) || c == cp('$') || c == 0x200c || c == 0x200d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(source: &str, u_flag: bool) -> Result<()> {
        validate_with(Options::default(), source, u_flag)
    }

    fn validate_with(options: Options, source: &str, u_flag: bool) -> Result<()> {
        let mut sink = ();
        RegExpValidator::new(options, &mut sink).validate_pattern(source, u_flag)
    }

    fn fail(source: &str, u_flag: bool) -> RegExpSyntaxError {
        validate(source, u_flag).unwrap_err()
    }

    fn fail_with(options: Options, source: &str, u_flag: bool) -> RegExpSyntaxError {
        validate_with(options, source, u_flag).unwrap_err()
    }

    fn strict() -> Options {
        Options {
            strict: true,
            ..Options::default()
        }
    }

    fn version(v: EcmaVersion) -> Options {
        Options {
            ecma_version: v,
            ..Options::default()
        }
    }

    #[test]
    fn accepts_basic_patterns() {
        for source in [
            "",
            "abc",
            "a|b|c",
            "^ab$",
            r"\b\B",
            "a*b+?c??",
            "a{1,2}b{3}c{4,}",
            "(a)(?:b)",
            r"(a)\1",
            "[abc]",
            "[a-z0-9]",
            "[]",
            "[^a]",
            r"\d\D\s\S\w\W",
            r"\n\t\v\f\r\0",
            r"\x41A",
            r"(?=a)b(?!c)",
            "a.c",
        ] {
            assert!(validate(source, false).is_ok(), "{source}");
            assert!(validate(source, true).is_ok(), "{source}");
        }
    }

    #[test]
    fn accepts_annex_b_only_patterns() {
        for source in [
            "a{", "a{1", "a{1,", "{1", "}", "]", r"\077", r"\8", r"\c1", r"\p{x}", "(?=a)*",
            "[\\d-a]", "[a-\\d]", r"[\c1]",
        ] {
            assert!(validate(source, false).is_ok(), "{source}");
            assert!(validate(source, true).is_err(), "{source}");
        }
    }

    #[test]
    fn dangling_quantifier_reports_quantifier_start() {
        let e = fail("a**", false);
        assert_eq!(e.message, "Nothing to repeat");
        assert_eq!(e.index, 2);

        let e = fail("*", false);
        assert_eq!(e.message, "Nothing to repeat");
        assert_eq!(e.index, 0);

        let e = fail("{2}", false);
        assert_eq!(e.message, "Nothing to repeat");
        assert_eq!(e.index, 0);

        let e = fail_with(strict(), "(?=a)*", false);
        assert_eq!(e.message, "Nothing to repeat");
        assert_eq!(e.index, 5);
    }

    #[test]
    fn quantified_lookahead_is_annex_b_only() {
        assert!(validate("(?=a)*", false).is_ok());
        assert!(validate_with(strict(), "(?=a)b", false).is_ok());
        assert!(validate("(?=a)*", true).is_err());
    }

    #[test]
    fn braced_quantifier_errors() {
        let e = fail("a{2,1}", false);
        assert_eq!(e.message, "numbers out of order in {} quantifier");
        let e = fail_with(strict(), "a{1", false);
        assert_eq!(e.message, "Incomplete quantifier");
        let e = fail_with(strict(), "{", false);
        assert_eq!(e.message, "Lone quantifier brackets");
        assert_eq!(e.index, 0);
        let e = fail_with(strict(), "}", false);
        assert_eq!(e.message, "Lone quantifier brackets");
    }

    #[test]
    fn unterminated_constructs() {
        let e = fail("(a", false);
        assert_eq!(e.message, "Unterminated group");
        let e = fail("(?:a", false);
        assert_eq!(e.message, "Unterminated group");
        let e = fail("[a", false);
        assert_eq!(e.message, "Unterminated character class");
        let e = fail(")", false);
        assert_eq!(e.message, "Unmatched ')'");
        assert_eq!(e.index, 0);
        let e = fail("a)", false);
        assert_eq!(e.index, 1);
    }

    #[test]
    fn numeric_backreferences() {
        // Forward references resolve against the whole pattern.
        assert!(validate(r"\1(a)", false).is_ok());
        assert!(validate(r"\1(a)", true).is_ok());
        // Out of range: an octal escape in the extended grammar, an error in
        // the unicode one.
        assert!(validate(r"\2(a)", false).is_ok());
        let e = fail(r"\2(a)", true);
        assert_eq!(e.message, "Invalid escape");
        let e = fail(r"\1", true);
        assert_eq!(e.message, "Invalid escape");
        assert_eq!(e.index, 2);
    }

    #[test]
    fn named_groups() {
        assert!(validate("(?<name>a)", false).is_ok());
        assert!(validate(r"(?<year>\d{4})-\k<year>", false).is_ok());
        assert!(validate(r"(?<year>\d{4})-\k<year>", true).is_ok());
        assert!(validate("(?<$var>a)", false).is_ok());
        assert!(validate(r"(?<abc>a)", false).is_ok());

        let e = fail("(?<n>a)(?<n>b)", false);
        assert_eq!(e.message, "Duplicate capture group name");
        assert_eq!(e.index, 12);

        let e = fail(r"(?<a>)\k<x>", false);
        assert_eq!(e.message, "Invalid named capture referenced");

        let e = fail("(?<1>a)", false);
        assert_eq!(e.message, "Invalid capture group name");

        let e = fail("(?i)", false);
        assert_eq!(e.message, "Invalid group");
    }

    #[test]
    fn group_names_accept_id_start_only_code_points() {
        // U+309B and U+0E33 are ID_Start but not XID_Start; group names use
        // the ID classes.
        assert!(validate("(?<\u{309b}>x)", false).is_ok());
        assert!(validate("(?<\u{309b}>x)", true).is_ok());
        assert!(validate("(?<a\u{e33}>x)", false).is_ok());
    }

    #[test]
    fn failed_class_escape_with_named_groups_is_an_error() {
        // `\k` stops being an identity escape once a named group exists, and
        // a class has no named-reference production to fall back to.
        assert!(validate(r"[\k]", false).is_ok());
        let e = fail(r"(?<a>)[\k]", false);
        assert_eq!(e.message, "Unterminated character class");
        let e = fail(r"(?<a>)[\k]", true);
        assert_eq!(e.message, "Invalid escape");
    }

    #[test]
    fn k_escape_without_named_groups_is_legacy() {
        // No named group anywhere, so `\k` stays an identity escape.
        assert!(validate(r"\k<x>", false).is_ok());
        // With `u` the GroupName grammar is always live, so the reference
        // dangles instead.
        let e = fail(r"\k<x>", true);
        assert_eq!(e.message, "Invalid named capture referenced");
    }

    #[test]
    fn named_groups_need_es2018() {
        let e = fail_with(version(EcmaVersion::Es2017), "(?<n>a)", false);
        assert_eq!(e.message, "Invalid group");
        assert_eq!(e.index, 1);
    }

    #[test]
    fn lookbehind_needs_es2018() {
        assert!(validate("(?<=a)b", false).is_ok());
        assert!(validate("(?<!a)b", true).is_ok());
        let e = fail_with(version(EcmaVersion::Es2017), "(?<=a)b", false);
        assert_eq!(e.message, "Invalid group");
        assert_eq!(e.index, 1);
    }

    #[test]
    fn character_class_ranges() {
        let e = fail("[b-a]", false);
        assert_eq!(e.message, "Range out of order in character class");
        assert_eq!(e.index, 4);

        let e = fail(r"[a-\d]", true);
        assert_eq!(e.message, "Invalid character class");
        assert!(validate(r"[a-\d]", false).is_ok());

        let relaxed = Options {
            disable_character_class_range_check: true,
            ..Options::default()
        };
        assert!(validate_with(relaxed, "[b-a]", false).is_ok());
    }

    #[test]
    fn class_escapes() {
        assert!(validate(r"[\b]", false).is_ok());
        assert!(validate(r"[\-]", true).is_ok());
        assert!(validate(r"[\c5]", false).is_ok());
        assert!(validate(r"[\c]", false).is_ok());
        let e = fail(r"[\c]", true);
        assert_eq!(e.message, "Invalid escape");
    }

    #[test]
    fn unicode_escapes() {
        assert!(validate(r"\u{1F600}", true).is_ok());
        assert!(validate(r"😀", true).is_ok());
        let e = fail(r"\u{110000}", true);
        assert_eq!(e.message, "Invalid unicode escape");
        let e = fail(r"\u{}", true);
        assert_eq!(e.message, "Invalid unicode escape");
        let e = fail_with(strict(), r"\u{41}", false);
        assert_eq!(e.message, "Invalid unicode escape");
    }

    #[test]
    fn property_escapes() {
        for source in [
            r"\p{General_Category=Letter}",
            r"\p{gc=Lu}",
            r"\p{Script=Greek}",
            r"\p{Script_Extensions=Hira}",
            r"\p{sc=Latn}",
            r"\p{Letter}",
            r"\p{Nd}",
            r"\p{Alphabetic}",
            r"\P{White_Space}",
            r"[\p{Script=Cyrillic}]",
        ] {
            assert!(validate(source, true).is_ok(), "{source}");
        }
        for source in [
            r"\p{Bogus}",
            r"\p{Script=Letter}",
            r"\p{General_Category=Greek}",
            r"\p{}",
            r"\p{gc=}",
            r"\p",
        ] {
            let e = fail(source, true);
            assert!(
                e.message == "Invalid property name" || e.message == "Invalid escape",
                "{source}: {}",
                e.message
            );
        }
    }

    #[test]
    fn property_escapes_need_es2018() {
        let e = fail_with(version(EcmaVersion::Es2017), r"\p{Letter}", true);
        assert_eq!(e.message, "Invalid escape");
    }

    #[test]
    fn flag_validation() {
        let mut sink = ();
        let mut v = RegExpValidator::new(Options::default(), &mut sink);
        assert!(v.validate_flags("gimsuy").is_ok());
        assert!(v.validate_flags("").is_ok());

        let e = v.validate_flags("gg").unwrap_err();
        assert_eq!(e.message, "Duplicated flag 'g'");
        assert_eq!(e.index, 1);

        let e = v.validate_flags("gz").unwrap_err();
        assert_eq!(e.message, "Invalid flag 'z'");
        assert_eq!(e.index, 1);
    }

    #[test]
    fn flag_version_gates() {
        let mut sink = ();
        let mut v5 = RegExpValidator::new(version(EcmaVersion::Es5), &mut sink);
        assert_eq!(
            v5.validate_flags("u").unwrap_err().message,
            "Invalid flag 'u'"
        );
        assert_eq!(
            v5.validate_flags("y").unwrap_err().message,
            "Invalid flag 'y'"
        );

        let mut sink = ();
        let mut v17 = RegExpValidator::new(version(EcmaVersion::Es2017), &mut sink);
        assert!(v17.validate_flags("uy").is_ok());
        assert_eq!(
            v17.validate_flags("s").unwrap_err().message,
            "Invalid flag 's'"
        );
    }

    #[test]
    fn literal_validation() {
        let mut sink = ();
        let mut v = RegExpValidator::new(Options::default(), &mut sink);
        assert!(v.validate_literal("/abc/gi").is_ok());
        assert!(v.validate_literal("/[/]/").is_ok());
        assert!(v.validate_literal(r"/a\/b/").is_ok());

        let e = v.validate_literal("/a").unwrap_err();
        assert_eq!(e.message, "Unterminated regular expression");
        let e = v.validate_literal("/[a/").unwrap_err();
        assert_eq!(e.message, "Unterminated character class");
        let e = v.validate_literal("//").unwrap_err();
        assert_eq!(e.message, "Unexpected character '/'");
        let e = v.validate_literal("/a/xx").unwrap_err();
        assert_eq!(e.message, "Invalid flag 'x'");
        let e = v.validate_literal("/a/uu").unwrap_err();
        assert_eq!(e.message, "Duplicated flag 'u'");
    }

    #[test]
    fn error_display_wraps_in_slashes() {
        let e = fail("a**", false);
        assert_eq!(
            e.to_string(),
            "Invalid regular expression: /a**/: Nothing to repeat"
        );
    }

    #[test]
    fn legacy_scanning_splits_astral_quantifier_target() {
        // Without `u`, the quantifier applies to the trailing surrogate; the
        // pattern is still valid either way.
        assert!(validate("\u{1f600}*", false).is_ok());
        assert!(validate("\u{1f600}*", true).is_ok());
    }

    #[test]
    fn ecma_version_numbers() {
        assert_eq!(EcmaVersion::from_number(2018), Some(EcmaVersion::Es2018));
        assert_eq!(EcmaVersion::from_number(2019), None);
        assert_eq!(EcmaVersion::Es5.number(), 5);
        assert!(EcmaVersion::Es2015 < EcmaVersion::Es2018);
    }
}
