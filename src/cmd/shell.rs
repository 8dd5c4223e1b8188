/*!
`shell.rs`

Interactive / scripted front end over a `CommandTree`.

Built-ins (a top-level tree command with the same name takes precedence):
  help [path...]   usage listing, or detailed help for a command path
  usage            usage listing
  exit | quit      leave the loop

Everything else goes to `CommandTree::execute_words`. Action output is drained
after every command, failed or not. In the REPL an error is
reported and the loop continues; in script mode the first error aborts with
the offending line number.
*/

use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cmdtree::CommandTree;
use cmdtree::format::{Role, StyleOptions, color};
use serde::Serialize;

use super::demo::SharedState;

/// Output format for `help` / `usage`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Format {
    #[default]
    Text,
    Json,
    Yaml,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Format::Text => "text",
            Format::Json => "json",
            Format::Yaml => "yaml",
        };
        f.write_str(s)
    }
}

/// What the caller should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell {
    tree: CommandTree,
    state: SharedState,
    format: Format,
    style: StyleOptions,
    prompt: String,
}

impl Shell {
    pub fn new(tree: CommandTree, state: SharedState) -> Self {
        Self {
            tree,
            state,
            format: Format::Text,
            style: StyleOptions::plain(),
            prompt: "> ".to_string(),
        }
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Handle one line, writing any output to `out`.
    pub fn run_line(&self, line: &str, out: &mut dyn Write) -> Result<Flow> {
        let words = self.tree.split(line)?;
        let Some((first, rest)) = words.split_first() else {
            return Ok(Flow::Continue);
        };

        if self.tree.get(first).is_some() {
            self.dispatch(&words, out)?;
            return Ok(Flow::Continue);
        }

        match first.as_str() {
            "exit" | "quit" => return Ok(Flow::Exit),
            "usage" => self.emit(&self.tree.usage(), |u| u.render(&self.style), out)?,
            "help" if rest.is_empty() => {
                self.emit(&self.tree.usage(), |u| u.render(&self.style), out)?
            }
            "help" => {
                let help = self.tree.help(rest)?;
                self.emit(&help, |h| h.render(&self.style), out)?
            }
            _ => self.dispatch(&words, out)?,
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&self, words: &[String], out: &mut dyn Write) -> Result<()> {
        let result = self.tree.execute_words(words);
        self.flush_output(out)?;
        result?;
        Ok(())
    }

    fn emit<T: Serialize>(
        &self,
        doc: &T,
        text: impl Fn(&T) -> String,
        out: &mut dyn Write,
    ) -> Result<()> {
        let rendered = match self.format {
            Format::Text => text(doc),
            Format::Json => serde_json::to_string_pretty(doc).context("failed to encode JSON")?,
            Format::Yaml => serde_yaml::to_string(doc).context("failed to encode YAML")?,
        };
        writeln!(out, "{}", rendered.trim_end())?;
        Ok(())
    }

    fn flush_output(&self, out: &mut dyn Write) -> Result<()> {
        let lines = {
            let mut st = self
                .state
                .lock()
                .map_err(|_| anyhow::anyhow!("demo state poisoned"))?;
            std::mem::take(&mut st.output)
        };
        for l in lines {
            writeln!(out, "{l}")?;
        }
        Ok(())
    }

    /// Read-eval loop over `input` until EOF or `exit`.
    pub fn repl(&self, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
        loop {
            write!(out, "{}", self.prompt)?;
            out.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }
            match self.run_line(line.trim_end(), out) {
                Ok(Flow::Exit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) => {
                    tracing::debug!(error = ?e, "command failed");
                    writeln!(out, "{}", color(Role::Error, format!("error: {e}"), &self.style))?;
                }
            }
        }
    }

    /// Execute each non-blank, non-comment line of a file.
    pub fn run_script(&self, path: &Path, out: &mut dyn Write) -> Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script: {}", path.display()))?;
        self.run_lines(&raw, out)
            .with_context(|| format!("script {} failed", path.display()))
    }

    fn run_lines(&self, raw: &str, out: &mut dyn Write) -> Result<()> {
        for (idx, line) in raw.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            tracing::debug!(line = idx + 1, "script line");
            let flow = self
                .run_line(trimmed, out)
                .with_context(|| format!("line {}: {trimmed}", idx + 1))?;
            if flow == Flow::Exit {
                break;
            }
        }
        Ok(())
    }
}
