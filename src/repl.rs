//! Interactive SQL playground REPL.
//!
//! Statements end at the end of the line; a trailing `\` continues the
//! statement on the next line. Lines starting with `.` are REPL commands.

use crate::config::OutputFormat;
use crate::playground::Playground;
use crate::render::render_error;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow;

const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "ORDER", "BY", "ASC", "DESC", "LIKE", "INSERT", "UPDATE", "DELETE",
];

const COMMANDS: &[&str] = &[
    ".help", ".exit", ".quit", ".tables", ".schema", ".format", ".strict", ".clear",
];

/// Tab completion helper
struct PlaygroundHelper {
    completions: Vec<String>,
}

impl PlaygroundHelper {
    fn new(playground: &Playground) -> Self {
        let mut completions: Vec<String> = KEYWORDS.iter().map(|k| k.to_string()).collect();
        completions.extend(COMMANDS.iter().map(|c| c.to_string()));
        for table in playground.dataset().tables() {
            completions.push(table.name().to_string());
            for column in table.columns() {
                if !completions.contains(column) {
                    completions.push(column.clone());
                }
            }
        }
        Self { completions }
    }

    fn candidates<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.completions.iter().filter(move |c| {
            c.len() >= word.len()
                && c.is_char_boundary(word.len())
                && c[..word.len()].eq_ignore_ascii_case(word)
        })
    }
}

/// Byte offset where the word under the cursor begins.
fn word_start(line: &str) -> usize {
    line.char_indices()
        .rev()
        .find(|&(_, c)| c.is_whitespace() || c == ',' || c == '(')
        .map_or(0, |(i, c)| i + c.len_utf8())
}

impl Completer for PlaygroundHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let start = word_start(&line[..pos]);
        let word = &line[start..pos];

        let matches: Vec<Pair> = self
            .candidates(word)
            .map(|c| Pair {
                display: c.clone(),
                replacement: c.clone(),
            })
            .collect();

        Ok((start, matches))
    }
}

impl Hinter for PlaygroundHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }

        let word = &line[word_start(line)..];
        if word.is_empty() {
            return None;
        }

        self.candidates(word)
            .find(|c| c.len() > word.len())
            .map(|c| c[word.len()..].to_string())
    }
}

impl Highlighter for PlaygroundHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.truecolor(100, 100, 100).to_string())
    }
}

impl Validator for PlaygroundHelper {}

impl Helper for PlaygroundHelper {}

fn print_banner() {
    println!(
        "{}",
        r#"
   ___  ___  _      ___ _
  / __|/ _ \| |    | _ \ |__ _ _  _
  \__ \ (_) | |__  |  _/ / _` | || |
  |___/\__\_\____| |_| |_\__,_|\_, |
                               |__/
"#
        .cyan()
    );
    println!(
        "  {} {}",
        "SQL Playground".white().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
    println!(
        "  Type {} for help, {} to quit\n",
        ".help".yellow(),
        ".exit".yellow()
    );
}

fn print_help() {
    println!("\n{}", "Commands:".white().bold());
    println!("  {}            Show this help", ".help".yellow());
    println!("  {}            Exit the REPL", ".exit".yellow());
    println!("  {}          List tables", ".tables".yellow());
    println!("  {} <table>  Show the columns of a table", ".schema".yellow());
    println!("  {} <fmt>    Output format: table or json", ".format".yellow());
    println!("  {} on|off   Report unknown columns as errors", ".strict".yellow());
    println!("  {}           Clear the screen", ".clear".yellow());

    println!("\n{}", "Grammar:".white().bold());
    println!(
        "  {}",
        "SELECT <cols|*> FROM <table> [WHERE <col> =|>|<|LIKE <value>] [ORDER BY <col> [ASC|DESC]]"
            .cyan()
    );
    println!(
        "  {}",
        "INSERT / UPDATE / DELETE are accepted but never change the data".dimmed()
    );

    println!("\n{}", "Examples:".white().bold());
    println!("  {}", "SELECT * FROM COUNTRIES".green());
    println!(
        "  {}",
        "SELECT COUNTRY, POP FROM COUNTRIES WHERE POP > 300000000".green()
    );
    println!(
        "  {}",
        "SELECT NAME FROM PERSONS WHERE COUNTRY LIKE 'U%' ORDER BY NAME DESC".green()
    );
    println!();
}

fn print_tables(playground: &Playground) {
    for table in playground.dataset().tables() {
        println!(
            "  {} {}",
            table.name().cyan(),
            format!("({} rows)", table.len()).dimmed()
        );
    }
}

fn print_schema(playground: &Playground, name: &str) {
    match playground.dataset().get(name) {
        Some(table) => {
            println!("  {}", table.name().cyan().bold());
            for column in table.columns() {
                println!("    {}", column);
            }
        }
        None => println!("  {} {}", "Unknown table:".red(), name),
    }
}

/// Handle a dot-command. Returns false when the REPL should stop.
fn handle_command(playground: &mut Playground, input: &str) -> bool {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or_default();

    match parts[0] {
        ".exit" | ".quit" | ".q" => {
            println!("{}", "Goodbye!".dimmed());
            return false;
        }
        ".help" | ".h" | ".?" => print_help(),
        ".clear" => {
            print!("\x1B[2J\x1B[1;1H");
            print_banner();
        }
        ".tables" => print_tables(playground),
        ".schema" => {
            if arg.is_empty() {
                println!("  {}", "Usage: .schema <table>".yellow());
            } else {
                print_schema(playground, arg);
            }
        }
        ".format" => match arg.parse::<OutputFormat>() {
            Ok(format) => {
                playground.set_format(format);
                println!("  {} {}", "Output format:".dimmed(), format.to_string().cyan());
            }
            Err(_) => println!("  {}", "Usage: .format table|json".yellow()),
        },
        ".strict" => match arg.to_ascii_lowercase().as_str() {
            "on" => {
                playground.set_strict(true);
                println!("  {}", "Strict mode on".dimmed());
            }
            "off" => {
                playground.set_strict(false);
                println!("  {}", "Strict mode off".dimmed());
            }
            _ => println!("  {}", "Usage: .strict on|off".yellow()),
        },
        other => {
            println!("  {} {}", "Unknown command:".red(), other);
            println!("  Type {} for help", ".help".yellow());
        }
    }
    true
}

fn execute(playground: &Playground, sql: &str) {
    match playground.run_query(sql) {
        Ok(result) => {
            let rendered = playground.render_result(&result);
            if result.statement.is_simulated() {
                println!("{}", rendered.yellow());
            } else {
                println!("{}", rendered);
            }
        }
        Err(err) => println!("{}", render_error(&err).red().bold()),
    }
}

/// Run the interactive loop until `.exit` or end of input.
pub fn run(playground: &mut Playground) -> anyhow::Result<()> {
    print_banner();

    let helper = PlaygroundHelper::new(playground);
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    let history_file = playground.config().history_path();
    let _ = rl.load_history(&history_file);

    let mut multiline_buffer = String::new();
    let mut in_multiline = false;

    loop {
        let prompt = if in_multiline {
            format!("{} ", "...".dimmed())
        } else {
            format!("{}{} ", "sql".cyan(), ">".white())
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if let Some(head) = line.strip_suffix('\\') {
                    multiline_buffer.push_str(head);
                    multiline_buffer.push('\n');
                    in_multiline = true;
                    continue;
                }

                let input = if in_multiline {
                    multiline_buffer.push_str(line);
                    in_multiline = false;
                    std::mem::take(&mut multiline_buffer)
                } else {
                    line.to_string()
                };

                if input.trim().is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&input);

                if input.starts_with('.') {
                    if !handle_command(playground, &input) {
                        break;
                    }
                    continue;
                }

                execute(playground, &input);
            }
            Err(ReadlineError::Interrupted) => {
                if in_multiline {
                    println!("{}", "Cancelled".dimmed());
                    multiline_buffer.clear();
                    in_multiline = false;
                } else {
                    println!("{}", "Type .exit to quit".dimmed());
                }
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".dimmed());
                break;
            }
            Err(err) => {
                println!("{} {:?}", "Error:".red(), err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(&history_file) {
        tracing::warn!(path = %history_file.display(), "Could not save history: {}", err);
    }
    Ok(())
}
