// This file is part of qsh, an extended POSIX shell.
// Copyright (C) 2026 The qsh developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command-line interface of qsh.
//!
//! The shell front-end is a work in progress; this binary exposes it as a
//! token and syntax-tree dumper so that the lexer can be exercised against
//! real input: a file, an inline `-c` string, or standard input.

use clap::Parser as _;
use clap::ValueEnum;
use qsh_syntax::arena::Arena;
use qsh_syntax::dialect::Dialect;
use qsh_syntax::input::file_input;
use qsh_syntax::input::memory_input;
use qsh_syntax::input::stdin_input;
use qsh_syntax::parser::Parser;
use qsh_syntax::parser::Token;
use qsh_syntax::source::InputCursor;
use qsh_syntax::source::TextInput;
use qsh_syntax::syntax::WordPartKind;
use qsh_syntax::parser::lex::WordContext;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum DialectName {
    Posix,
    Bash,
    SecureBash,
    Qsh,
}

impl From<DialectName> for Dialect {
    fn from(name: DialectName) -> Dialect {
        match name {
            DialectName::Posix => Dialect::POSIX,
            DialectName::Bash => Dialect::BASH,
            DialectName::SecureBash => Dialect::SECURE_BASH,
            DialectName::Qsh => Dialect::QSH,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum DumpMode {
    /// One line per token.
    Tokens,
    /// One block per simple command, word parts included.
    Commands,
}

/// Shell language front-end dumper.
#[derive(clap::Parser, Debug)]
#[command(name = "qsh", version, about)]
struct Args {
    /// Read commands from this string instead of a file.
    #[arg(short, long, value_name = "COMMAND", conflicts_with = "script")]
    command: Option<String>,

    /// Shell dialect to parse with.
    #[arg(long, value_enum, default_value_t = DialectName::Qsh)]
    dialect: DialectName,

    /// What to print for each piece of input.
    #[arg(long, value_enum, default_value_t = DumpMode::Commands)]
    dump: DumpMode,

    /// Script file to read; standard input when absent.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let dialect = Dialect::from(args.dialect);
    let input = match open_input(&args, dialect) {
        Ok(input) => input,
        Err(error) => {
            eprintln!("qsh: {error}");
            return ExitCode::from(2);
        }
    };
    debug!(name = input.name(), ?dialect, "parsing input");

    let arena = Arena::new();
    let parser = Parser::new(input, &arena);
    let result = match args.dump {
        DumpMode::Tokens => dump_tokens(&parser),
        DumpMode::Commands => dump_commands(&parser),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("qsh: {error}");
            ExitCode::from(2)
        }
    }
}

fn open_input(args: &Args, dialect: Dialect) -> std::io::Result<Rc<TextInput>> {
    if let Some(command) = &args.command {
        return Ok(memory_input("command", dialect, command.as_bytes().to_vec()));
    }
    match &args.script {
        Some(path) => file_input(path, dialect),
        None => Ok(stdin_input(dialect)),
    }
}

fn dump_tokens(parser: &Parser) -> qsh_syntax::parser::Result<()> {
    let mut at = parser.cursor();
    let context = WordContext::default();
    let mut consecutive_ends = 0;
    loop {
        let location = at.location();
        let token = parser.parse_token(&mut at, &context)?;
        if matches!(token, Token::EndOfInput(_)) {
            consecutive_ends += 1;
        } else {
            consecutive_ends = 0;
        }
        match token {
            Token::EndOfInput(_) => {
                println!("{location} end-of-input");
                // A retrying input may yield more bytes past an EOF, but two
                // in a row means the source is gone.
                if !parser.input().retries_after_eof() || consecutive_ends >= 2 {
                    return Ok(());
                }
            }
            Token::Word(word) => {
                println!("{location} word {:?}", word.span.raw_text());
                for part in &word.parts {
                    println!("    {} {:?}", part.span, part.kind);
                }
            }
            Token::Blank(blank) => println!("{location} blank {:?}", blank.span.raw_text()),
            Token::Comment(comment) => {
                println!("{location} comment {:?}", comment.span.raw_text())
            }
            Token::Newline(_) => println!("{location} newline"),
            Token::Metacharacter { byte, .. } => {
                println!("{location} metacharacter {:?}", byte as char)
            }
        }
    }
}

fn dump_commands(parser: &Parser) -> qsh_syntax::parser::Result<()> {
    let mut at = parser.cursor();
    let context = WordContext::default();
    let mut consecutive_ends = 0;
    loop {
        if let Some(command) = parser.parse_simple_command(&mut at)? {
            consecutive_ends = 0;
            println!("command {}", command.span);
            for part in &command.parts {
                let word = part.word;
                let role = if word.reserved_word().is_some() {
                    "reserved"
                } else if word.is_assignment() {
                    "assignment"
                } else {
                    "word"
                };
                println!("  {role} {:?}", word.span.raw_text());
                for word_part in &word.parts {
                    if !matches!(word_part.kind, WordPartKind::Text(_)) {
                        println!("    {} {:?}", word_part.span, word_part.kind);
                    }
                }
            }
        }
        // Consume the delimiter that stopped the command.
        if let Token::EndOfInput(_) = parser.parse_token(&mut at, &context)? {
            consecutive_ends += 1;
            if !parser.input().retries_after_eof() || consecutive_ends >= 2 {
                return Ok(());
            }
        }
    }
}
