// ABOUTME: Host TTY raw-mode handling and SIGWINCH forwarding for interactive exec/attach
// The only genuine concurrency outside the two polling loops: a signal-handling
// thread runs alongside the blocking child while the host terminal is in raw mode

use std::io::{self, IsTerminal};
use std::process::Command;

use nix::sys::signal::{self, Signal};
use nix::sys::termios::{self, SetArg};
use nix::unistd::Pid;
use signal_hook::consts::SIGWINCH;
use signal_hook::iterator::Signals;
use tracing::warn;

/// RAII guard that puts the controlling terminal into raw mode and restores the
/// original termios settings on drop, on every exit path including early returns.
pub struct RawTerminalGuard {
    original: Option<termios::Termios>,
}

impl RawTerminalGuard {
    /// No-ops (and restores nothing) when stdin isn't a TTY, so callers can use this
    /// unconditionally without checking first.
    pub fn new() -> io::Result<Self> {
        if !is_stdin_tty() {
            return Ok(Self { original: None });
        }

        let stdin = io::stdin();
        let original =
            termios::tcgetattr(&stdin).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(&stdin, SetArg::TCSANOW, &raw)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        Ok(Self {
            original: Some(original),
        })
    }
}

impl Drop for RawTerminalGuard {
    fn drop(&mut self) {
        if let Some(original) = &self.original {
            let stdin = io::stdin();
            if let Err(e) = termios::tcsetattr(&stdin, SetArg::TCSANOW, original) {
                warn!("failed to restore terminal state: {e}");
            }
        }
    }
}

pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

/// Spawns `command` with stdio inherited from the host process, puts the host
/// terminal into raw mode for the duration, forwards `SIGWINCH` to the child so it
/// re-queries the (shared) terminal's window size, and returns the child's exit code.
/// Terminal state is always restored, including when the child is killed or the
/// signal-forwarding thread fails to start.
pub fn run_interactive(mut command: Command) -> io::Result<i32> {
    let _raw_guard = RawTerminalGuard::new()?;

    let mut child = command.spawn()?;
    let child_pid = Pid::from_raw(child.id() as i32);

    let winch_thread = Signals::new([SIGWINCH]).ok().map(|mut signals| {
        std::thread::spawn(move || {
            for sig in signals.forever() {
                debug_assert_eq!(sig, SIGWINCH);
                if signal::kill(child_pid, Signal::SIGWINCH).is_err() {
                    break;
                }
            }
        })
    });

    let status = child.wait()?;

    // Detached: the signals iterator thread exits on its own once the handle
    // backing it is dropped at the end of this function.
    drop(winch_thread);

    Ok(status.code().unwrap_or(-1))
}
