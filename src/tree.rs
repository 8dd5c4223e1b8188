/*!
The command tree: registration, resolution and dispatch.

Pipeline for one line:

```text
line --split--> words --find_command(lenient)--> (command, rest)
     --Variables::parse (greedy prefix)--> (params, args)
     --action(Invocation)--> Ok / Err
```

Resolution walks words through nested command maps. In strict mode (help
lookups, `add_under`) the first unknown word fails with `NoSuchCommand`; in
lenient mode (dispatch) it simply ends the walk and the unknown word becomes
the start of the parameter / positional tail.
*/

use std::sync::Arc;

use crate::command::{Action, Command, CommandMap, Invocation, insert_unique};
use crate::error::{Error, Result, SyntaxError};
use crate::help::{Help, Usage};
use crate::split::{Splitter, default_splitter};
use crate::vars::Matches;

/// Outcome of walking words through the tree.
#[derive(Debug)]
pub struct Resolved<'t, 'w> {
    /// Deepest matched command.
    pub command: &'t Command,
    /// Names of every matched command, root first.
    pub path: Vec<String>,
    /// Words that were not consumed by the walk.
    pub rest: &'w [String],
}

pub struct CommandTree {
    commands: CommandMap,
    splitter: Splitter,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTree")
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl CommandTree {
    /// Empty tree using shell-style line splitting.
    pub fn new() -> Self {
        Self {
            commands: CommandMap::new(),
            splitter: default_splitter(),
        }
    }

    /// Replace the line tokenizer used by [`CommandTree::execute`].
    pub fn with_splitter<F, E>(mut self, splitter: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Vec<String>, E> + Send + Sync + 'static,
        E: Into<SyntaxError>,
    {
        let wrapped: Splitter = Arc::new(
            move |line: &str| -> std::result::Result<Vec<String>, SyntaxError> {
                splitter(line).map_err(Into::into)
            },
        );
        self.splitter = wrapped;
        self
    }

    /// Register a top-level command.
    pub fn add(&mut self, command: Command) -> Result<()> {
        tracing::debug!(command = %command.name(), "registering top-level command");
        insert_unique(&mut self.commands, command)
    }

    /// Register `command` below the command found at `path` (strict walk).
    pub fn add_under<S: AsRef<str>>(&mut self, path: &[S], command: Command) -> Result<()> {
        let Some((first, tail)) = path.split_first() else {
            return self.add(command);
        };
        let first = first.as_ref();
        let mut cursor = self
            .commands
            .get_mut(first)
            .ok_or_else(|| Error::no_such_command(first))?;
        for word in tail {
            let word = word.as_ref();
            cursor = cursor
                .subcommand_mut(word)
                .ok_or_else(|| Error::no_such_command(word))?;
        }
        tracing::debug!(
            parent = %cursor.name(),
            command = %command.name(),
            "registering subcommand"
        );
        cursor.add(command)
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Top-level commands in name order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Tokenize with the configured splitter.
    pub fn split(&self, line: &str) -> Result<Vec<String>> {
        (self.splitter)(line).map_err(Error::Syntax)
    }

    /// Walk `words` down the tree.
    ///
    /// Stops when words run out or a leaf is reached. An unknown word fails
    /// immediately when `strict`, otherwise it ends the walk. Fails with
    /// `NoSuchCommand` naming the first word when nothing matched at all
    /// (an empty `words` reports an empty name).
    pub fn find_command<'t, 'w>(
        &'t self,
        words: &'w [String],
        strict: bool,
    ) -> Result<Resolved<'t, 'w>> {
        let mut cursor: Option<&Command> = None;
        let mut menu = &self.commands;
        let mut path = Vec::new();
        let mut rest = words;

        while let Some((word, tail)) = rest.split_first() {
            if menu.is_empty() {
                break;
            }
            let Some(cmd) = menu.get(word) else {
                if strict {
                    return Err(Error::no_such_command(word.as_str()));
                }
                break;
            };
            cursor = Some(cmd);
            menu = cmd.children();
            path.push(cmd.name().to_string());
            rest = tail;
        }

        let Some(command) = cursor else {
            let first = words.first().map(String::as_str).unwrap_or("");
            return Err(Error::no_such_command(first));
        };

        tracing::debug!(
            path = %path.join(" "),
            remaining = rest.len(),
            strict,
            "resolved command"
        );
        Ok(Resolved {
            command,
            path,
            rest,
        })
    }

    /// Split `line` and dispatch it. A blank line does nothing.
    pub fn execute(&self, line: &str) -> Result<()> {
        let words = self.split(line)?;
        if words.is_empty() {
            return Ok(());
        }
        self.execute_words(&words)
    }

    /// Resolve (lenient), parse named parameters, then run the action.
    pub fn execute_words<S: AsRef<str>>(&self, words: &[S]) -> Result<()> {
        let words = owned(words);
        let Some((invocation, action)) = self.dispatch(&words)? else {
            return Ok(());
        };
        tracing::debug!(
            command = %invocation.command(),
            args = invocation.args.len(),
            "invoking action"
        );
        action(&invocation).map_err(Error::Action)
    }

    /// Resolve and parse without running anything.
    ///
    /// Returns `None` for a command without an action invoked with no
    /// leftover words (a successful no-op).
    pub fn prepare<S: AsRef<str>>(&self, words: &[S]) -> Result<Option<Invocation>> {
        let words = owned(words);
        Ok(self.dispatch(&words)?.map(|(invocation, _)| invocation))
    }

    fn dispatch(&self, words: &[String]) -> Result<Option<(Invocation, &Action)>> {
        let resolved = self.find_command(words, false)?;
        let command = resolved.command;

        let (params, args) = match command.get_parameters() {
            Some(vars) => vars.parse(resolved.rest)?,
            None => (Matches::default(), resolved.rest),
        };

        let Some(action) = command.get_action() else {
            // Leftovers on an action-less command look like a missing subcommand.
            if let Some(first) = args.first() {
                return Err(Error::no_such_command(first.as_str()));
            }
            return Ok(None);
        };

        let invocation = Invocation {
            path: resolved.path,
            params,
            args: args.to_vec(),
        };
        Ok(Some((invocation, action)))
    }

    /// Flat listing of the top-level commands.
    pub fn usage(&self) -> Usage {
        Usage::from_commands(self.commands.values())
    }

    /// Detailed help for the command at `words` (strict walk).
    pub fn help<S: AsRef<str>>(&self, words: &[S]) -> Result<Help> {
        let words = owned(words);
        let resolved = self.find_command(&words, true)?;
        Ok(Help::of(resolved.command, resolved.path))
    }
}

fn owned<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    words.iter().map(|w| w.as_ref().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::Variables;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<Invocation>>>;

    fn recorder(log: &Log) -> impl Fn(&Invocation) -> anyhow::Result<()> + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |inv: &Invocation| {
            log.lock().unwrap().push(inv.clone());
            Ok(())
        }
    }

    fn greet_tree(log: &Log) -> CommandTree {
        let mut tree = CommandTree::new();
        tree.add(
            Command::new("greet")
                .description("Say hello")
                .parameters(Variables::new().string("name", "anon", "who").unwrap())
                .action(recorder(log)),
        )
        .unwrap();
        tree
    }

    fn server_tree(log: &Log) -> CommandTree {
        let mut tree = CommandTree::new();
        let server = Command::new("server")
            .description("Manage the server")
            .subcommand(
                Command::new("start")
                    .description("Start it")
                    .parameters(Variables::new().integer("port", 8080, "").unwrap())
                    .action(recorder(log)),
            )
            .unwrap()
            .subcommand(Command::new("stop").action(recorder(log)))
            .unwrap();
        tree.add(server).unwrap();
        tree
    }

    fn last(log: &Log) -> Invocation {
        log.lock().unwrap().last().cloned().unwrap()
    }

    #[test]
    fn duplicate_top_level_rejected() {
        let log = Log::default();
        let mut tree = server_tree(&log);
        let err = tree.add(Command::new("server").description("other")).unwrap_err();
        assert!(matches!(err, Error::DuplicateCommand { ref name } if name == "server"));
        let kept = tree.get("server").unwrap();
        assert_eq!(kept.get_description(), "Manage the server");
        assert_eq!(kept.subcommands().count(), 2);
    }

    #[test]
    fn unknown_first_word() {
        let log = Log::default();
        let tree = greet_tree(&log);
        let err = tree.execute_words(&["frobnicate", "greet"]).unwrap_err();
        assert_eq!(err.unknown_word(), Some("frobnicate"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn parameter_then_positional() {
        let log = Log::default();
        let tree = greet_tree(&log);
        tree.execute("greet name Alice hello").unwrap();
        let inv = last(&log);
        assert_eq!(inv.params.get_str("name"), Some("Alice"));
        assert_eq!(inv.args, ["hello"]);
        assert_eq!(inv.path, ["greet"]);
    }

    #[test]
    fn parameter_after_positional_is_positional() {
        let log = Log::default();
        let tree = greet_tree(&log);
        tree.execute("greet hello name Alice").unwrap();
        let inv = last(&log);
        assert_eq!(inv.params.get_str("name"), Some("anon"));
        assert!(!inv.params.is_explicit("name"));
        assert_eq!(inv.args, ["hello", "name", "Alice"]);
    }

    #[test]
    fn defaults_restored_between_calls() {
        let log = Log::default();
        let tree = greet_tree(&log);
        tree.execute("greet name Alice").unwrap();
        tree.execute("greet").unwrap();
        assert_eq!(last(&log).params.get_str("name"), Some("anon"));
    }

    #[test]
    fn missing_value() {
        let log = Log::default();
        let tree = greet_tree(&log);
        let err = tree.execute("greet name").unwrap_err();
        assert!(matches!(err, Error::MissingValue { ref label } if label == "name"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn nested_dispatch() {
        let log = Log::default();
        let tree = server_tree(&log);
        tree.execute("server start port 9000 --dry-run").unwrap();
        let inv = last(&log);
        assert_eq!(inv.path, ["server", "start"]);
        assert_eq!(inv.params.get_i64("port"), Some(9000));
        assert_eq!(inv.args, ["--dry-run"]);
    }

    #[test]
    fn leaf_stops_walk_even_if_word_matches_elsewhere() {
        let log = Log::default();
        let tree = server_tree(&log);
        tree.execute_words(&["server", "stop", "server"]).unwrap();
        assert_eq!(last(&log).args, ["server"]);
    }

    #[test]
    fn menu_without_leftovers_is_noop() {
        let log = Log::default();
        let tree = server_tree(&log);
        tree.execute("server").unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn menu_with_leftovers_fails() {
        let log = Log::default();
        let tree = server_tree(&log);
        let err = tree.execute("server restart now").unwrap_err();
        assert_eq!(err.unknown_word(), Some("restart"));
    }

    #[test]
    fn menu_leaf_without_action() {
        let mut tree = CommandTree::new();
        tree.add(
            Command::new("noop")
                .parameters(Variables::new().string("mode", "a", "").unwrap()),
        )
        .unwrap();
        tree.execute("noop mode b").unwrap();
        let err = tree.execute("noop mode b extra").unwrap_err();
        assert_eq!(err.unknown_word(), Some("extra"));
    }

    #[test]
    fn strict_help_paths() {
        let log = Log::default();
        let tree = server_tree(&log);
        let help = tree.help(&["server", "start"]).unwrap();
        assert_eq!(help.name, "start");
        assert_eq!(help.path, ["server", "start"]);

        let err = tree.help(&["server", "restart"]).unwrap_err();
        assert_eq!(err.unknown_word(), Some("restart"));

        let err = tree.help(&["start"]).unwrap_err();
        assert_eq!(err.unknown_word(), Some("start"));
    }

    #[test]
    fn lenient_walk_keeps_rest() {
        let log = Log::default();
        let tree = server_tree(&log);
        let words: Vec<String> = ["server", "bogus", "x"].iter().map(|s| s.to_string()).collect();
        let r = tree.find_command(&words, false).unwrap();
        assert_eq!(r.command.name(), "server");
        assert_eq!(r.rest, &words[1..]);
        assert!(tree.find_command(&words, true).is_err());
    }

    #[test]
    fn empty_words() {
        let tree = CommandTree::new();
        assert!(tree.is_empty());
        let err = tree.execute_words::<&str>(&[]).unwrap_err();
        assert_eq!(err.unknown_word(), Some(""));
        tree.execute("   ").unwrap();
    }

    #[test]
    fn syntax_error_passes_through() {
        let log = Log::default();
        let tree = greet_tree(&log);
        let err = tree.execute(r#"greet name "Alice"#).unwrap_err();
        assert!(matches!(err, Error::Syntax(_)));
    }

    #[test]
    fn custom_splitter() {
        let log = Log::default();
        let tree = greet_tree(&log).with_splitter(|line: &str| {
            Ok::<_, std::io::Error>(line.split(',').map(|s| s.trim().to_string()).collect())
        });
        tree.execute("greet, name, Bob Smith").unwrap();
        assert_eq!(last(&log).params.get_str("name"), Some("Bob Smith"));
    }

    #[test]
    fn action_error_passes_through() {
        let mut tree = CommandTree::new();
        tree.add(Command::new("fail").action(|_| anyhow::bail!("boom")))
            .unwrap();
        let err = tree.execute("fail").unwrap_err();
        assert!(matches!(err, Error::Action(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn add_under_existing_parent() {
        let log = Log::default();
        let mut tree = server_tree(&log);
        tree.add_under(&["server"], Command::new("status").action(recorder(&log)))
            .unwrap();
        tree.execute("server status").unwrap();
        assert_eq!(last(&log).path, ["server", "status"]);

        let err = tree
            .add_under(&["server"], Command::new("status"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateCommand { .. }));
        let err = tree.add_under(&["nope"], Command::new("x")).unwrap_err();
        assert_eq!(err.unknown_word(), Some("nope"));
    }

    #[test]
    fn usage_sorted() {
        let log = Log::default();
        let mut tree = server_tree(&log);
        tree.add(Command::new("alpha").description("first")).unwrap();
        let names: Vec<String> = tree.usage().commands.into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["alpha", "server"]);
    }

    #[test]
    fn tree_is_shareable_across_threads() {
        let log = Log::default();
        let tree = Arc::new(greet_tree(&log));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let tree = Arc::clone(&tree);
                std::thread::spawn(move || {
                    let name = format!("u{i}");
                    tree.execute_words(&["greet", "name", name.as_str()])
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }
        assert_eq!(log.lock().unwrap().len(), 4);
    }
}
