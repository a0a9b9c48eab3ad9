//! Validator and AST builder for ECMAScript regular expression syntax.
//!
//! The crate checks pattern, flag, and literal sources against the RegExp
//! grammar of a chosen ECMAScript version, honoring the Annex B extended
//! grammar unless strict mode or the `u` flag disables it, and can build a
//! full syntax tree from the same walk.
//!
//! ```
//! use esregex::{parse_pattern, validate_literal, Options};
//!
//! let options = Options::default();
//! assert!(validate_literal("/a|b/gi", options).is_ok());
//! assert!(validate_literal("/a**/", options).is_err());
//!
//! let ast = parse_pattern(r"(?<year>\d{4})", true, options).unwrap();
//! assert_eq!(ast.raw(ast.root()), r"(?<year>\d{4})");
//! ```

pub mod ast;
pub mod parser;
pub mod reader;
pub mod unicode;
pub mod validator;

pub use ast::{
    AssertionKind, BackreferenceRef, CharacterSetKind, EdgeAssertionKind, EscapeCharacterSetKind,
    Flags, LookaroundKind, Node, NodeId, NodeKind, PatternAst, RegExpLiteral,
};
pub use parser::{AstBuilder, RegExpParser};
pub use validator::{EcmaVersion, Options, ParseEvents, RegExpSyntaxError, RegExpValidator};

/// Validates a whole `/pattern/flags` literal.
pub fn validate_literal(source: &str, options: Options) -> Result<(), RegExpSyntaxError> {
    RegExpValidator::new(options, &mut ()).validate_literal(source)
}

/// Validates a bare pattern under the given unicode mode.
pub fn validate_pattern(source: &str, u_flag: bool, options: Options) -> Result<(), RegExpSyntaxError> {
    RegExpValidator::new(options, &mut ()).validate_pattern(source, u_flag)
}

/// Validates a flag string.
pub fn validate_flags(source: &str, options: Options) -> Result<(), RegExpSyntaxError> {
    RegExpValidator::new(options, &mut ()).validate_flags(source)
}

/// Parses a whole `/pattern/flags` literal into an AST.
pub fn parse_literal(source: &str, options: Options) -> Result<RegExpLiteral, RegExpSyntaxError> {
    RegExpParser::new(options).parse_literal(source)
}

/// Parses a bare pattern into an AST under the given unicode mode.
pub fn parse_pattern(
    source: &str,
    u_flag: bool,
    options: Options,
) -> Result<PatternAst, RegExpSyntaxError> {
    RegExpParser::new(options).parse_pattern(source, u_flag)
}

/// Parses a flag string.
pub fn parse_flags(source: &str, options: Options) -> Result<Flags, RegExpSyntaxError> {
    RegExpParser::new(options).parse_flags(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_functions_agree_with_the_parser() {
        let options = Options::default();
        assert!(validate_pattern("a|b", false, options).is_ok());
        assert!(parse_pattern("a|b", false, options).is_ok());
        assert!(validate_pattern("a**", false, options).is_err());
        assert!(parse_pattern("a**", false, options).is_err());
    }

    #[test]
    fn strict_option_threads_through() {
        let strict = Options {
            strict: true,
            ..Options::default()
        };
        assert!(validate_pattern(r"\077", false, Options::default()).is_ok());
        assert!(validate_pattern(r"\077", false, strict).is_err());
    }

    #[test]
    fn literal_and_flags_entry_points() {
        let options = Options::default();
        assert!(validate_literal("/[/]/", options).is_ok());
        assert!(validate_flags("gimsuy", options).is_ok());
        let flags = parse_flags("sy", options).unwrap();
        assert!(flags.dot_all && flags.sticky && !flags.global);
        let literal = parse_literal("/x/u", options).unwrap();
        assert!(literal.flags.unicode);
    }
}
