use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use log::info;

use crate::textify::{TokenStreamOptions, write_tokens};
use crate::{Expression, Lexer, Parser, request};

/// Source name for input read from stdin.
pub const STDIN_SOURCE: &str = "<stdin>";

#[derive(ClapParser)]
#[command(name = "sexpr-eval")]
#[command(about = "A CLI for tokenizing, parsing and evaluating symbolic expressions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Eval { output, .. }
            | Commands::Tokens { output, .. }
            | Commands::Parse { output, .. } => {
                let writer = get_writer(output)
                    .with_context(|| format!("Failed to create output file: {output}"))?;
                self.run_with_io(io::stdin(), writer)
            }
            Commands::Request { input, output, .. } => {
                let reader = get_reader(input)
                    .with_context(|| format!("Failed to open input file: {input}"))?;
                let writer = get_writer(output)
                    .with_context(|| format!("Failed to create output file: {output}"))?;
                self.run_with_io(reader, writer)
            }
        }
    }

    /// Run CLI with provided readers and writers for testing
    ///
    /// The reader stands in for stdin: it is read when `-` is given as a
    /// file, or when no sources are given at all.
    pub fn run_with_io<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<()> {
        match &self.command {
            Commands::Eval {
                files,
                exprs,
                verbose,
                ..
            } => {
                let lexer = load_sources(files, exprs, reader)?;
                self.run_eval(lexer, writer, *verbose)
            }
            Commands::Tokens {
                files,
                exprs,
                verbose,
                ..
            } => {
                let lexer = load_sources(files, exprs, reader)?;
                self.run_tokens(lexer, writer, *verbose)
            }
            Commands::Parse {
                files,
                exprs,
                to,
                verbose,
                ..
            } => {
                let lexer = load_sources(files, exprs, reader)?;
                self.run_parse(lexer, writer, to, *verbose)
            }
            Commands::Request { verbose, .. } => self.run_request(reader, writer, *verbose),
        }
    }

    fn run_eval<W: Write>(&self, lexer: Lexer, writer: W, verbose: bool) -> Result<()> {
        let expr = parse_input(lexer)?;
        let result = expr.eval();
        write_text_output(writer, &format!("{result}\n"))?;

        if verbose {
            eprintln!("Successfully evaluated {expr}");
        }

        Ok(())
    }

    fn run_tokens<W: Write>(&self, mut lexer: Lexer, writer: W, verbose: bool) -> Result<()> {
        let names = source_names(&lexer);
        let mut text = String::new();
        let result = write_tokens(&mut lexer, &mut text, &TokenStreamOptions::default());

        // Tokens read before a failure are still written.
        write_text_output(writer, &text)?;
        let count = result.with_context(|| format!("Failed to tokenize {names}"))?;

        info!("Successfully read {names}!");
        if verbose {
            eprintln!("Successfully read {count} tokens from {names}");
        }

        Ok(())
    }

    fn run_parse<W: Write>(
        &self,
        lexer: Lexer,
        writer: W,
        to: &Format,
        verbose: bool,
    ) -> Result<()> {
        let expr = parse_input(lexer)?;
        to.write_expression(writer, &expr).with_context(|| {
            format!(
                "Failed to write output as {} format",
                format!("{to:?}").to_lowercase()
            )
        })?;

        if verbose {
            eprintln!("Successfully parsed expression");
        }

        Ok(())
    }

    fn run_request<R: Read, W: Write>(&self, reader: R, writer: W, verbose: bool) -> Result<()> {
        let body = read_text_input(reader)?;
        let response = request::handle_json(&body);
        write_text_output(writer, &format!("{response}\n"))?;

        if verbose {
            eprintln!("Successfully handled request");
        }

        Ok(())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse one expression from the given sources and print its value
    ///
    /// All sources are read as one continuous input, files first and then
    /// inline expressions, in the order given.
    Eval {
        /// Source files (use - for stdin; stdin is read if no sources are given)
        files: Vec<String>,
        /// Inline expression source (repeatable)
        #[arg(short = 'e', long = "expr")]
        exprs: Vec<String>,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the token stream of the given sources, checking bracket balance
    Tokens {
        /// Source files (use - for stdin; stdin is read if no sources are given)
        files: Vec<String>,
        /// Inline expression source (repeatable)
        #[arg(short = 'e', long = "expr")]
        exprs: Vec<String>,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Parse one expression and print its tree
    ///
    /// Output formats:
    ///   text - Canonical expression text
    ///   json - JSON serialized tree
    ///   yaml - YAML serialized tree
    Parse {
        /// Source files (use - for stdin; stdin is read if no sources are given)
        files: Vec<String>,
        /// Inline expression source (repeatable)
        #[arg(short = 'e', long = "expr")]
        exprs: Vec<String>,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Output format: text, json, yaml
        #[arg(short = 't', long, default_value = "text")]
        to: Format,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Answer a JSON request {"expr": "..."} with {"result": ...} or {"error": ...}
    Request {
        /// Input file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,
        /// Output file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, Debug)]
pub enum Format {
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "yaml" => Ok(Format::Yaml),
            _ => Err(format!(
                "Invalid format: '{s}'. Supported formats: text, json, yaml"
            )),
        }
    }
}

impl Format {
    pub fn write_expression<W: Write>(&self, writer: W, expr: &Expression) -> Result<()> {
        let text = match self {
            Format::Text => format!("{expr}\n"),
            Format::Json => {
                let mut json = serde_json::to_string_pretty(expr)?;
                json.push('\n');
                json
            }
            Format::Yaml => serde_yaml::to_string(expr)?,
        };
        write_text_output(writer, &text)
    }
}

/// Load files and inline expressions, in that order, into one lexer.
fn load_sources<R: Read>(files: &[String], exprs: &[String], reader: R) -> Result<Lexer> {
    let mut lexer = Lexer::new();
    let mut stdin = Some(reader);

    for path in files {
        if path == "-" {
            // Stdin can only be read once; later `-`s are empty.
            let text = match stdin.take() {
                Some(reader) => read_text_input(reader)?,
                None => String::new(),
            };
            lexer.add_named(STDIN_SOURCE, &text);
        } else {
            lexer.add_file(path)?;
        }
    }
    for (i, expr) in exprs.iter().enumerate() {
        lexer.add_named(format!("<expr{}>", i + 1), expr);
    }

    if files.is_empty() && exprs.is_empty() {
        if let Some(reader) = stdin.take() {
            lexer.add_named(STDIN_SOURCE, &read_text_input(reader)?);
        }
    }

    Ok(lexer)
}

fn parse_input(lexer: Lexer) -> Result<Expression> {
    let names = source_names(&lexer);
    let mut parser = Parser::new(lexer);
    let expr = parser
        .parse_all()
        .with_context(|| format!("Failed to parse {names}"))?;
    Ok(expr)
}

fn source_names(lexer: &Lexer) -> String {
    lexer
        .sources()
        .sources()
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read text input from reader
fn read_text_input<R: Read>(mut reader: R) -> Result<String> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Write text output to writer
fn write_text_output<W: Write>(mut writer: W, content: &str) -> Result<()> {
    writer.write_all(content.as_bytes())?;
    Ok(())
}

/// Helper function to get reader from file path (or stdin if "-")
fn get_reader(path: &str) -> Result<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(fs::File::open(path)?))
    }
}

/// Helper function to get writer from file path (or stdout if "-")
fn get_writer(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(fs::File::create(path)?))
    }
}
