//! Hand-off to the database client once the picker has closed.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};

use crate::config::ClientConfig;
use crate::pgpass::{Connection, WILDCARD};

/// A fully resolved client invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCommand {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, OsString)>,
}

impl ClientCommand {
    /// Build `<program> [args] -h host -p port -U user -d database`.
    ///
    /// Wildcard fields are left out so the client falls back to its own
    /// defaults. The secret never goes on the command line; the client reads
    /// it from the credentials file named by `PGPASSFILE`.
    pub fn for_connection(
        conn: &Connection,
        client: &ClientConfig,
        pgpass_path: Option<&Path>,
    ) -> Result<Self> {
        let mut parts = shlex::split(&client.command)
            .ok_or_else(|| anyhow!("Invalid client command: {}", client.command))?;
        if parts.is_empty() {
            bail!("Client command is empty");
        }
        let program = parts.remove(0);

        let mut args = parts;
        args.extend(client.args.iter().cloned());

        let flags = [
            ("-h", &conn.host),
            ("-p", &conn.port),
            ("-U", &conn.username),
            ("-d", &conn.database),
        ];
        for (flag, value) in flags {
            if value != WILDCARD {
                args.push(flag.to_string());
                args.push(value.clone());
            }
        }

        let envs = pgpass_path
            .map(|p| vec![("PGPASSFILE".to_string(), p.as_os_str().to_os_string())])
            .unwrap_or_default();

        Ok(Self {
            program,
            args,
            envs,
        })
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        command
    }

    /// Shell-quoted form for logs and error messages.
    pub fn display(&self) -> String {
        let words =
            std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shlex::try_join(words).unwrap_or_else(|_| self.program.clone())
    }
}

/// Run the client. On Unix the current process is replaced and this only
/// returns on failure; elsewhere it returns the client's exit code.
pub fn launch(cmd: &ClientCommand) -> Result<i32> {
    run(cmd.to_command()).with_context(|| format!("Failed to run {}", cmd.display()))
}

#[cfg(unix)]
fn run(mut command: Command) -> Result<i32> {
    use std::os::unix::process::CommandExt;

    Err(command.exec().into())
}

#[cfg(not(unix))]
fn run(mut command: Command) -> Result<i32> {
    let status = command.status()?;
    Ok(status.code().unwrap_or(1))
}
