/*!
Host-side pieces of the `cmdtree` binary.

  src/cmd/
    mod.rs    (this file)
    demo.rs   (demo command tree + shared action state)
    shell.rs  (REPL / script / one-shot front end, help & usage output)

The library under `src/lib.rs` knows nothing about stdin, prompts or output
formats; everything interactive lives here.
*/

pub mod demo;
pub mod shell;

pub use shell::{Format, Shell};
