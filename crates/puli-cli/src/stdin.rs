// crates/puli-cli/src/stdin.rs - Reading documents piped on stdin
//
// `--snapshot -` reads the manager snapshot from stdin so that another tool
// can feed the CLI directly:
//
// ```bash
// manager-dump --json | puli bind --snapshot -
// ```

use anyhow::Result;
use std::io::{self, IsTerminal, Read};

/// Read all of stdin, refusing to block on an interactive terminal
pub fn read_document() -> Result<String> {
    if io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No piped input detected. `--snapshot -` expects the snapshot on stdin.\n\nExample:\n  cat snapshot.json | puli bind --snapshot -"
        ));
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    if buffer.trim().is_empty() {
        return Err(anyhow::anyhow!("Empty input provided"));
    }

    Ok(buffer)
}
