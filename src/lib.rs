/*!
cmdtree - hierarchical command dispatcher.

Resolves a line of words through a tree of named commands and subcommands,
parses the named parameters that immediately follow the command path, and
hands the remaining positional words to the command's action.

```
use cmdtree::{Command, CommandTree, Variables};

# fn main() -> cmdtree::Result<()> {
let mut tree = CommandTree::new();
tree.add(
    Command::new("greet")
        .description("Say hello")
        .parameters(Variables::new().string("name", "anon", "who to greet")?)
        .action(|inv| {
            println!("hello {} {:?}", inv.params.get_str("name").unwrap_or(""), inv.args);
            Ok(())
        }),
)?;
tree.execute("greet name Alice and friends")?;
# Ok(())
# }
```

Modules:
  - command : Command nodes, Invocation, Action
  - tree    : CommandTree (add / find_command / execute / usage / help)
  - vars    : Variables (declared parameters) + Matches (parsed values)
  - param   : Parameter trait + built-in string / integer / boolean / choice kinds
  - help    : Usage / Help documents (Display + Serialize)
  - format  : text table rendering
  - split   : line tokenizer (shell-words by default)
  - error   : Error / Result
*/

pub mod command;
pub mod error;
pub mod format;
pub mod help;
pub mod param;
pub mod split;
pub mod tree;
pub mod vars;

pub use command::{Action, Command, Invocation};
pub use error::{Error, Result};
pub use help::{Help, Usage};
pub use param::{BooleanParam, ChoiceParam, IntegerParam, Parameter, StringParam, Value};
pub use split::{Splitter, shell_split};
pub use tree::{CommandTree, Resolved};
pub use vars::{Matches, Variables};
