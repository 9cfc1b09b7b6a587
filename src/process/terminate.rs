//! Child termination and exit status mapping.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::Child;
use tokio::time;

/// Ask a child to stop (SIGTERM on Unix).
///
/// A child that already exited is not an error.
pub fn request_stop(child: &Child) -> io::Result<()> {
    let Some(pid) = child.id() else {
        return Ok(());
    };

    #[cfg(unix)]
    {
        use nix::errno::Errno;
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(errno) => Err(io::Error::from(errno)),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "graceful stop is only supported on Unix",
        ))
    }
}

/// Stop a child: SIGTERM, wait up to `grace`, then SIGKILL.
pub async fn terminate(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    if let Some(status) = child.try_wait()? {
        return Ok(status);
    }

    if let Err(e) = request_stop(child) {
        tracing::warn!(pid = ?child.id(), error = %e, "Graceful stop failed, killing");
        child.kill().await?;
        return child.wait().await;
    }

    match time::timeout(grace, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
            tracing::warn!(
                pid = ?child.id(),
                grace_secs = grace.as_secs_f64(),
                "Child ignored SIGTERM, killing"
            );
            child.kill().await?;
            child.wait().await
        }
    }
}

/// Shell-style exit code: the child's code, or `128 + signal` when it was
/// killed by a signal.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
