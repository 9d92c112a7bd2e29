use std::{io, time::Duration};

use tokio::process::{Child, Command};

use crate::resolve::CommandLine;

/// Build the tokio command for a resolved invocation.
///
/// The child inherits the environment, reads nothing and gets its own process
/// group on unix so a kill reaches everything the build tool spawned.
pub(crate) fn cmd_program(cmd: &CommandLine) -> Command {
    use std::process::Stdio;

    let mut command = Command::new(&cmd.program);
    command
        .args(cmd.args())
        .current_dir(&cmd.workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    command.process_group(0);

    command
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// SIGTERM the process group, give it `grace` to exit, then SIGKILL.
        pub(crate) async fn kill_graceful(child: &mut Child, grace: Duration) -> io::Result<()> {
            let Some(pid) = child.id() else {
                return Ok(());
            };

            signal_group(pid, libc::SIGTERM);
            if tokio::time::timeout(grace, child.wait()).await.is_ok() {
                signal_group(pid, libc::SIGKILL);
                return Ok(());
            }
            signal_group(pid, libc::SIGKILL);
            child.kill().await
        }

        /// SIGKILL what is left of the group after its leader was reaped.
        pub(crate) fn kill_group(pid: Option<u32>) {
            if let Some(pid) = pid {
                signal_group(pid, libc::SIGKILL);
            }
        }

        fn signal_group(pid: u32, signal: libc::c_int) {
            // The group id equals the leader pid because of `process_group(0)`.
            unsafe {
                libc::kill(-(pid as libc::pid_t), signal);
            }
        }

        pub(crate) fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        }
    } else {
        pub(crate) async fn kill_graceful(child: &mut Child, _grace: Duration) -> io::Result<()> {
            child.kill().await
        }

        pub(crate) fn kill_group(_pid: Option<u32>) {}

        pub(crate) fn exit_signal(_status: &std::process::ExitStatus) -> Option<i32> {
            None
        }
    }
}
