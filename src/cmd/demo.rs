/*!
Demo command tree served by the `cmdtree` binary.

  greet   [name NAME] [shout BOOL] [words...]
  echo    [words...]
  server  start [port N] [bind ADDR] [tls BOOL] | stop | status
  config  get KEY | set KEY VALUE | list

State shared by the actions lives in `DemoState` behind `Arc<Mutex<_>>` so the
tree itself stays `Send + Sync`.
*/

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow, bail};
use cmdtree::{Command, CommandTree, Invocation, Variables};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub port: i64,
    pub bind: String,
    pub tls: bool,
}

#[derive(Debug, Default)]
pub struct DemoState {
    pub server: Option<ServerInfo>,
    pub config: BTreeMap<String, String>,
    /// Lines produced by actions, drained by the shell after each command.
    pub output: Vec<String>,
}

pub type SharedState = Arc<Mutex<DemoState>>;

fn lock(state: &SharedState) -> Result<MutexGuard<'_, DemoState>> {
    state.lock().map_err(|_| anyhow!("demo state poisoned"))
}

/// Build the demo tree along with a handle on its state.
pub fn build() -> cmdtree::Result<(CommandTree, SharedState)> {
    let state = SharedState::default();
    let mut tree = CommandTree::new();

    tree.add(greet(&state)?)?;
    tree.add(echo(&state))?;
    tree.add(server(&state)?)?;
    tree.add(config(&state)?)?;

    Ok((tree, state))
}

fn greet(state: &SharedState) -> cmdtree::Result<Command> {
    let st = Arc::clone(state);
    Ok(Command::new("greet")
        .description("Greet someone")
        .usage("greet [name NAME] [shout BOOL] [words...]")
        .parameters(
            Variables::new()
                .string("name", "anon", "Who to greet")?
                .boolean("shout", false, "Upper-case the greeting")?,
        )
        .action(move |inv: &Invocation| {
            let name = inv.params.get_str("name").unwrap_or("anon");
            let mut line = format!("Hello, {name}!");
            if !inv.args.is_empty() {
                line.push(' ');
                line.push_str(&inv.args.join(" "));
            }
            if inv.params.get_bool("shout").unwrap_or(false) {
                line = line.to_uppercase();
            }
            lock(&st)?.output.push(line);
            Ok(())
        }))
}

fn echo(state: &SharedState) -> Command {
    let st = Arc::clone(state);
    Command::new("echo")
        .description("Print the arguments")
        .action(move |inv: &Invocation| {
            lock(&st)?.output.push(inv.args.join(" "));
            Ok(())
        })
}

fn server(state: &SharedState) -> cmdtree::Result<Command> {
    let start_st = Arc::clone(state);
    let start = Command::new("start")
        .description("Start the server")
        .parameters(
            Variables::new()
                .integer("port", 8080, "Listen port")?
                .string("bind", "127.0.0.1", "Bind address")?
                .boolean("tls", false, "Serve over TLS")?,
        )
        .action(move |inv: &Invocation| {
            if let Some(extra) = inv.args.first() {
                bail!("unexpected argument '{extra}'");
            }
            let port = inv.params.get_i64("port").unwrap_or(8080);
            if !(1..=65535).contains(&port) {
                bail!("port out of range: {port}");
            }
            let info = ServerInfo {
                port,
                bind: inv.params.get_str("bind").unwrap_or("127.0.0.1").to_string(),
                tls: inv.params.get_bool("tls").unwrap_or(false),
            };
            let mut st = lock(&start_st)?;
            if st.server.is_some() {
                bail!("server already running");
            }
            st.output
                .push(format!("server listening on {}:{}", info.bind, info.port));
            st.server = Some(info);
            Ok(())
        });

    let stop_st = Arc::clone(state);
    let stop = Command::new("stop")
        .description("Stop the server")
        .action(move |_: &Invocation| {
            let mut st = lock(&stop_st)?;
            if st.server.take().is_none() {
                bail!("server is not running");
            }
            st.output.push("server stopped".into());
            Ok(())
        });

    let status_st = Arc::clone(state);
    let status = Command::new("status")
        .description("Show server status")
        .action(move |_: &Invocation| {
            let mut st = lock(&status_st)?;
            let line = match &st.server {
                Some(s) => format!(
                    "running on {}:{} (tls={})",
                    s.bind, s.port, s.tls
                ),
                None => "stopped".to_string(),
            };
            st.output.push(line);
            Ok(())
        });

    Command::new("server")
        .description("Manage the server")
        .subcommand(start)?
        .subcommand(stop)?
        .subcommand(status)
}

fn config(state: &SharedState) -> cmdtree::Result<Command> {
    let get_st = Arc::clone(state);
    let get = Command::new("get")
        .description("Read a configuration key")
        .usage("config get KEY")
        .action(move |inv: &Invocation| {
            let [key] = inv.args.as_slice() else {
                bail!("usage: config get KEY");
            };
            let mut st = lock(&get_st)?;
            let value = st
                .config
                .get(key)
                .cloned()
                .ok_or_else(|| anyhow!("no such key '{key}'"))?;
            st.output.push(value);
            Ok(())
        });

    let set_st = Arc::clone(state);
    let set = Command::new("set")
        .description("Write a configuration key")
        .usage("config set KEY VALUE")
        .action(move |inv: &Invocation| {
            let [key, value] = inv.args.as_slice() else {
                bail!("usage: config set KEY VALUE");
            };
            lock(&set_st)?.config.insert(key.clone(), value.clone());
            Ok(())
        });

    let list_st = Arc::clone(state);
    let list = Command::new("list")
        .description("List configuration keys")
        .action(move |_: &Invocation| {
            let mut st = lock(&list_st)?;
            let lines: Vec<String> = st
                .config
                .iter()
                .map(|(k, v)| format!("{k} = {v}"))
                .collect();
            st.output.extend(lines);
            Ok(())
        });

    Command::new("config")
        .description("Inspect and change configuration")
        .subcommand(get)?
        .subcommand(set)?
        .subcommand(list)
}
