use clap::Parser;
use esregex::{
    AssertionKind, CharacterSetKind, EcmaVersion, NodeId, NodeKind, Options, PatternAst,
    RegExpParser,
};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write as _};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "esregex",
    version,
    about = "ECMAScript regular expression syntax checker"
)]
struct Cli {
    /// Pattern to parse (reads a REPL from stdin if omitted)
    input: Option<String>,

    /// Treat the input as a whole /pattern/flags literal
    #[arg(short, long)]
    literal: bool,

    /// Flags to apply to a bare pattern, e.g. "gu"
    #[arg(short, long, default_value = "")]
    flags: String,

    /// ECMAScript version: 5, or 2015 through 2018
    #[arg(long, default_value_t = 2018)]
    ecma_version: u16,

    /// Reject Annex B extensions even without the u flag
    #[arg(long)]
    strict: bool,

    /// Validate only, without printing the tree
    #[arg(long)]
    check: bool,
}

fn child_ids(ast: &PatternAst, id: NodeId) -> Vec<NodeId> {
    match &ast.node(id).kind {
        NodeKind::Pattern { alternatives }
        | NodeKind::Group { alternatives }
        | NodeKind::CapturingGroup { alternatives, .. }
        | NodeKind::Assertion(AssertionKind::Lookaround { alternatives, .. }) => {
            alternatives.clone()
        }
        NodeKind::Alternative { elements } | NodeKind::CharacterClass { elements, .. } => {
            elements.clone()
        }
        NodeKind::Quantifier { element, .. } => vec![*element],
        NodeKind::CharacterClassRange { min, max } => vec![*min, *max],
        _ => Vec::new(),
    }
}

fn describe(ast: &PatternAst, id: NodeId) -> String {
    let node = ast.node(id);
    let mut out = String::new();
    match &node.kind {
        NodeKind::CapturingGroup { name: Some(n), .. } => {
            let _ = write!(out, " name={n}");
        }
        NodeKind::Quantifier {
            min, max, greedy, ..
        } => {
            let _ = match max {
                Some(max) => write!(out, " {{{min},{max}}}"),
                None => write!(out, " {{{min},}}"),
            };
            if !greedy {
                out.push_str(" lazy");
            }
        }
        NodeKind::Assertion(AssertionKind::Lookaround { kind, negate, .. }) => {
            let _ = write!(out, " {kind:?}");
            if *negate {
                out.push_str(" negated");
            }
        }
        NodeKind::Assertion(kind) => {
            let _ = write!(out, " {kind:?}");
        }
        NodeKind::CharacterSet(CharacterSetKind::Property { key, value, negate }) => {
            let _ = match value {
                Some(value) => write!(out, " {key}={value}"),
                None => write!(out, " {key}"),
            };
            if *negate {
                out.push_str(" negated");
            }
        }
        NodeKind::Character { value } => {
            let _ = write!(out, " U+{value:04X}");
        }
        NodeKind::CharacterClass { negate: true, .. } => out.push_str(" negated"),
        NodeKind::Backreference { target, .. } => {
            let _ = write!(out, " {target:?}");
        }
        _ => {}
    }
    out
}

fn dump(ast: &PatternAst, id: NodeId, depth: usize) {
    let node = ast.node(id);
    println!(
        "{}{} [{}..{}]{} {:?}",
        "  ".repeat(depth),
        node.type_name(),
        node.start,
        node.end,
        describe(ast, id),
        ast.raw(id),
    );
    for child in child_ids(ast, id) {
        dump(ast, child, depth + 1);
    }
}

fn run_input(input: &str, cli: &Cli, options: Options) -> ExitCode {
    let parser = RegExpParser::new(options);
    let pattern = if cli.literal {
        match parser.parse_literal(input) {
            Ok(literal) => {
                if !cli.check {
                    println!("flags: {}", literal.flags.raw);
                }
                literal.pattern
            }
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(1);
            }
        }
    } else {
        if let Err(e) = esregex::validate_flags(&cli.flags, options) {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
        match parser.parse_pattern(input, cli.flags.contains('u')) {
            Ok(pattern) => pattern,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(1);
            }
        }
    };

    if !cli.check {
        dump(&pattern, pattern.root(), 0);
    }
    ExitCode::SUCCESS
}

fn run_repl(cli: &Cli, options: Options) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("esregex v{}", env!("CARGO_PKG_VERSION"));
    println!("Type regular expression patterns. Press Ctrl-D to exit.");

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\n', '\r']);
                if !trimmed.is_empty() {
                    run_input(trimmed, cli, options);
                }
            }
            Err(e) => {
                eprintln!("Read error: {e}");
                return ExitCode::from(1);
            }
        }
    }

    println!();
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(ecma_version) = EcmaVersion::from_number(cli.ecma_version) else {
        eprintln!("Unsupported ECMAScript version: {}", cli.ecma_version);
        return ExitCode::from(2);
    };
    let options = Options {
        strict: cli.strict,
        ecma_version,
        ..Options::default()
    };

    if let Some(input) = &cli.input {
        return run_input(input, &cli, options);
    }

    run_repl(&cli, options)
}
