/*!
Command nodes.

A [`Command`] is a named unit of the dispatch tree. It may carry:
  - a [`Variables`] set (named parameters parsed right after the path)
  - an [`Action`] (absent -> pure menu node)
  - child commands (absent/empty -> leaf)

Commands are assembled with a small builder:

```text
Command::new("start")
    .description("Start the server")
    .parameters(Variables::new().integer("port", 8080, "listen port")?)
    .action(|inv| { ...; Ok(()) })
```
*/

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::vars::{Matches, Variables};

/// What an action sees when it is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Matched command names, root first.
    pub path: Vec<String>,
    /// Parsed named parameters (defaults included).
    pub params: Matches,
    /// Positional words left after parameter parsing.
    pub args: Vec<String>,
}

impl Invocation {
    /// Name of the invoked command (last path element).
    pub fn command(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }
}

/// Callable attached to a command.
pub type Action = Arc<dyn Fn(&Invocation) -> anyhow::Result<()> + Send + Sync>;

pub type CommandMap = BTreeMap<String, Command>;

#[derive(Default)]
pub struct Command {
    name: String,
    description: String,
    usage: String,
    parameters: Option<Variables>,
    action: Option<Action>,
    subcommands: CommandMap,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Extended free-text help shown under the description.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn parameters(mut self, parameters: Variables) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Invocation) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Builder form of [`Command::add`].
    pub fn subcommand(mut self, child: Command) -> Result<Self> {
        self.add(child)?;
        Ok(self)
    }

    /// Insert `child` under its own name. An existing child with that name is
    /// left untouched and `DuplicateCommand` is returned.
    pub fn add(&mut self, child: Command) -> Result<()> {
        insert_unique(&mut self.subcommands, child)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_usage(&self) -> &str {
        &self.usage
    }

    pub fn get_parameters(&self) -> Option<&Variables> {
        self.parameters.as_ref()
    }

    pub fn get_action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn subcommand_ref(&self, name: &str) -> Option<&Command> {
        self.subcommands.get(name)
    }

    pub fn subcommand_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.subcommands.get_mut(name)
    }

    /// Children in name order.
    pub fn subcommands(&self) -> impl Iterator<Item = &Command> {
        self.subcommands.values()
    }

    pub(crate) fn children(&self) -> &CommandMap {
        &self.subcommands
    }

    pub fn is_leaf(&self) -> bool {
        self.subcommands.is_empty()
    }

    /// No action: invoking it only makes sense to reach a subcommand.
    pub fn is_menu(&self) -> bool {
        self.action.is_none()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .field("parameters", &self.parameters)
            .field("action", &self.action.as_ref().map(|_| "<fn>"))
            .field("subcommands", &self.subcommands)
            .finish()
    }
}

pub(crate) fn insert_unique(map: &mut CommandMap, command: Command) -> Result<()> {
    if map.contains_key(command.name()) {
        return Err(Error::DuplicateCommand {
            name: command.name,
        });
    }
    map.insert(command.name.clone(), command);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_child_rejected_and_original_kept() {
        let mut parent = Command::new("server");
        parent
            .add(Command::new("start").description("first"))
            .unwrap();
        let err = parent
            .add(Command::new("start").description("second"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateCommand { ref name } if name == "start"));
        assert_eq!(
            parent.subcommand_ref("start").unwrap().get_description(),
            "first"
        );
        assert_eq!(parent.subcommands().count(), 1);
    }

    #[test]
    fn leaf_and_menu_flags() {
        let menu = Command::new("config")
            .subcommand(Command::new("get").action(|_| Ok(())))
            .unwrap();
        assert!(menu.is_menu());
        assert!(!menu.is_leaf());

        let get = menu.subcommand_ref("get").unwrap();
        assert!(get.is_leaf());
        assert!(!get.is_menu());
    }

    #[test]
    fn invocation_command_name() {
        let inv = Invocation {
            path: vec!["server".into(), "start".into()],
            params: Matches::default(),
            args: vec![],
        };
        assert_eq!(inv.command(), "start");
    }

    #[test]
    fn debug_hides_closure() {
        let c = Command::new("x").action(|_| Ok(()));
        assert!(format!("{c:?}").contains("<fn>"));
    }
}
