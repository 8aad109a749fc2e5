// On-box CLI client
//
// When the tool runs on the device itself (Junos event/op scripts host,
// or any shell on the routing engine), the management daemon is reachable
// through the `cli` binary. Operational commands are piped to
// `| display json`, which yields the same document shape as the REST API,
// so both clients share `crate::models`. Configuration goes through the
// CLI's NETCONF mode, one RPC at a time, so a failed load never reaches
// `commit-configuration`.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Command;
use tracing::debug;

use crate::error::Error;
use crate::models::{self, LldpNeighborEntry, PhysicalInterfaceEntry};
use crate::netconf;
use crate::rest::xnm;

/// Default location of the Junos CLI on the routing engine.
pub const DEFAULT_CLI_PATH: &str = "/usr/sbin/cli";

/// Arguments that put `cli` into NETCONF-over-stdio mode.
pub const NETCONF_ARGS: [&str; 3] = ["xml-mode", "netconf", "need-trailer"];

/// Runs operational and configuration commands through the local `cli`.
#[derive(Debug, Clone)]
pub struct LocalCli {
    program: PathBuf,
}

impl Default for LocalCli {
    fn default() -> Self {
        Self::new(DEFAULT_CLI_PATH)
    }
}

impl LocalCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the `cli` binary this client runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Current LLDP neighbor table.
    pub async fn lldp_neighbors(&self) -> Result<Vec<LldpNeighborEntry>, Error> {
        let body = self
            .run("show lldp neighbors | display json", "show lldp neighbors")
            .await?;
        models::parse_lldp_neighbors(&body)
    }

    /// Physical interfaces with their configured descriptions.
    pub async fn interface_descriptions(&self) -> Result<Vec<PhysicalInterfaceEntry>, Error> {
        let body = self
            .run(
                "show interfaces descriptions | display json",
                "show interfaces descriptions",
            )
            .await?;
        models::parse_interface_descriptions(&body)
    }

    /// Load the new descriptions into a private database and commit them.
    ///
    /// The commit is only sent once the load came back clean; on any
    /// failure the private database is closed with nothing committed.
    pub async fn load_descriptions(
        &self,
        changes: &BTreeMap<String, String>,
        comment: &str,
    ) -> Result<(), Error> {
        debug!(program = %self.program.display(), "loading {} descriptions", changes.len());

        let mut child = Command::new(&self.program)
            .args(NETCONF_ARGS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(self.spawn_error(io::Error::other("stdio not captured")));
        };
        let mut session = netconf::Session::new(self.program.display().to_string(), stdout, stdin);

        session.hello().await?;
        let result = commit_transaction(&mut session, changes, comment).await;
        if let Err(err) = session.close().await {
            debug!("closing NETCONF session: {err}");
        }
        drop(session);
        if let Err(err) = child.wait().await {
            debug!("waiting for {}: {err}", self.program.display());
        }

        result
    }

    async fn run(&self, command: &str, rpc: &str) -> Result<String, Error> {
        debug!(program = %self.program.display(), "{}", command);

        let output = Command::new(&self.program)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| self.spawn_error(source))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let mut problems = error_lines(&stdout);
        problems.extend(error_lines(&String::from_utf8_lossy(&output.stderr)));

        if !problems.is_empty() {
            return Err(Error::rpc(rpc, problems.join("; ")));
        }
        if !output.status.success() {
            return Err(Error::rpc(
                rpc,
                format!("{} exited with {}", self.program.display(), output.status),
            ));
        }
        Ok(stdout)
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        Error::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

/// `open → load → commit`, stopping at the first RPC that fails.
pub async fn commit_transaction<R, W>(
    session: &mut netconf::Session<R, W>,
    changes: &BTreeMap<String, String>,
    comment: &str,
) -> Result<(), Error>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    session.rpc("open-configuration", xnm::OPEN_PRIVATE).await.map_err(commit_error)?;
    session
        .rpc("load-configuration", &xnm::load_interfaces(changes))
        .await
        .map_err(commit_error)?;
    session
        .rpc("commit-configuration", &xnm::commit(comment))
        .await
        .map_err(commit_error)?;
    debug!("configuration committed");
    Ok(())
}

fn commit_error(err: Error) -> Error {
    match err {
        Error::Rpc { rpc, message } => Error::Commit {
            message: format!("{rpc}: {message}"),
        },
        other => other,
    }
}

fn error_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("error:") || line.contains("syntax error"))
        .map(String::from)
        .collect()
}
