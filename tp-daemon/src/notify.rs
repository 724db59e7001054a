//! systemd service notifications
//!
//! Minimal sd_notify: readiness and watchdog datagrams over the socket
//! systemd advertises in `NOTIFY_SOCKET`. Best-effort by design - when
//! the variable is unset (not running under systemd) every call is a
//! no-op, and send failures are only worth a debug line.

use std::os::unix::net::UnixDatagram;

use tracing::debug;

/// Tell the service manager initialization is complete
pub fn ready() {
    send("READY=1");
}

/// Pet the service watchdog
pub fn watchdog() {
    send("WATCHDOG=1");
}

fn send(state: &str) {
    let Ok(socket_path) = std::env::var("NOTIFY_SOCKET") else {
        return;
    };
    if let Err(err) = try_send(&socket_path, state) {
        debug!("sd_notify {state} failed: {err}");
    }
}

fn try_send(socket_path: &str, state: &str) -> std::io::Result<()> {
    let socket = UnixDatagram::unbound()?;

    // systemd advertises abstract-namespace sockets with a leading '@'.
    if let Some(name) = socket_path.strip_prefix('@') {
        use std::os::linux::net::SocketAddrExt;
        let addr = std::os::unix::net::SocketAddr::from_abstract_name(name.as_bytes())?;
        socket.send_to_addr(state.as_bytes(), &addr)?;
    } else {
        socket.send_to(state.as_bytes(), socket_path)?;
    }
    Ok(())
}
