//! Usage and help documents.
//!
//! Both are plain data (`Serialize`) with a `Display` impl producing the text
//! layout; hosts can re-render them with their own [`StyleOptions`] or emit
//! them as JSON / YAML.

use std::fmt;

use serde::Serialize;

use crate::command::Command;
use crate::format::{Role, StyleOptions, TableOpts, color, table};

/// One row of a name / description listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    pub description: String,
}

impl Entry {
    fn of(cmd: &Command) -> Self {
        Self {
            name: cmd.name().to_string(),
            description: cmd.get_description().to_string(),
        }
    }
}

/// Flat listing of top-level commands, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub commands: Vec<Entry>,
}

impl Usage {
    pub(crate) fn from_commands<'a>(commands: impl Iterator<Item = &'a Command>) -> Self {
        Self {
            commands: commands.map(Entry::of).collect(),
        }
    }

    pub fn render(&self, style: &StyleOptions) -> String {
        let rows: Vec<Vec<String>> = self
            .commands
            .iter()
            .map(|e| vec![e.name.clone(), e.description.clone()])
            .collect();
        table(&["Command", "Description"], &rows, TableOpts::default(), style)
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&StyleOptions::plain()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterHelp {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub default: String,
    pub description: String,
}

/// Detailed help for one resolved command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Help {
    /// Full path, root first.
    pub path: Vec<String>,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub usage: String,
    pub parameters: Vec<ParameterHelp>,
    pub subcommands: Vec<Entry>,
}

impl Help {
    pub(crate) fn of(cmd: &Command, path: Vec<String>) -> Self {
        let parameters: Vec<ParameterHelp> = cmd
            .get_parameters()
            .map(|vars| {
                vars.iter()
                    .map(|p| ParameterHelp {
                        name: p.label().to_string(),
                        kind: p.describe_type(),
                        default: p.describe_default(),
                        description: p.describe_description(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            path,
            name: cmd.name().to_string(),
            description: cmd.get_description().to_string(),
            usage: cmd.get_usage().to_string(),
            parameters,
            subcommands: cmd.subcommands().map(Entry::of).collect(),
        }
    }

    pub fn render(&self, style: &StyleOptions) -> String {
        let nested = TableOpts {
            indent: 6,
            ..TableOpts::default()
        };
        let mut out = color(Role::Heading, &self.name, style);
        out.push_str(&format!("\n   {}", self.description));
        if !self.usage.is_empty() {
            out.push_str(&format!("\n   {}", self.usage));
        }

        out.push_str("\n\n");
        if self.parameters.is_empty() {
            out.push_str("      <no named parameters>");
        } else {
            let rows: Vec<Vec<String>> = self
                .parameters
                .iter()
                .map(|p| {
                    vec![
                        p.name.clone(),
                        p.kind.clone(),
                        p.default.clone(),
                        p.description.clone(),
                    ]
                })
                .collect();
            out.push_str(&table(
                &["Parameter", "Type", "Default", "Description"],
                &rows,
                nested.clone(),
                style,
            ));
        }

        out.push_str("\n\n");
        if self.subcommands.is_empty() {
            out.push_str("      <no subcommands>");
        } else {
            let rows: Vec<Vec<String>> = self
                .subcommands
                .iter()
                .map(|e| vec![e.name.clone(), e.description.clone()])
                .collect();
            out.push_str(&table(&["Subcommand", "Description"], &rows, nested, style));
        }
        out
    }
}

impl fmt::Display for Help {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&StyleOptions::plain()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::Variables;

    #[test]
    fn help_lists_parameters_and_markers() {
        let cmd = Command::new("greet")
            .description("Say hello")
            .usage("greet [name NAME] [words...]")
            .parameters(Variables::new().string("name", "anon", "who").unwrap());
        let text = Help::of(&cmd, vec!["greet".into()]).to_string();
        assert!(text.starts_with("greet\n   Say hello\n   greet [name NAME]"));
        assert!(text.contains("Parameter"));
        assert!(text.contains("anon"));
        assert!(text.contains("string"));
        assert!(text.ends_with("<no subcommands>"));
    }

    #[test]
    fn help_without_parameters() {
        let cmd = Command::new("server")
            .description("Manage the server")
            .subcommand(Command::new("start").description("Start it"))
            .unwrap();
        let help = Help::of(&cmd, vec!["server".into()]);
        let text = help.to_string();
        assert!(text.contains("<no named parameters>"));
        assert!(text.contains("Subcommand"));
        assert!(text.contains("Start it"));
        assert!(!text.contains("<no subcommands>"));
    }

    #[test]
    fn help_serializes() {
        let cmd = Command::new("greet")
            .parameters(Variables::new().integer("times", 1, "").unwrap());
        let v = serde_json::to_value(Help::of(&cmd, vec!["greet".into()])).unwrap();
        assert_eq!(v["parameters"][0]["type"], "integer");
        assert_eq!(v["parameters"][0]["default"], "1");
        assert!(v.get("usage").is_none());
    }

    #[test]
    fn usage_table() {
        let a = Command::new("b").description("second");
        let b = Command::new("a").description("first");
        let usage = Usage::from_commands([&a, &b].into_iter());
        let text = usage.to_string();
        assert!(text.starts_with("   Command"));
        assert!(text.contains("second"));
    }
}
