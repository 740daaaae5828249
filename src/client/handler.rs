use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::auth::AuthService;
use crate::client::ClientRegistry;
use crate::protocol::responses::{self, format_response};
use crate::protocol::{CommandStatus, handle_command, parse_command};

/// Handles one client session using Tokio async runtime.
///
/// - Greets the client, then reads command lines of at most `max_line_length`
///   bytes with a `BufReader`.
/// - Dispatches commands to the session's own `AuthService`.
/// - Removes the client from `clients` when the session ends.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    auth: AuthService,
    clients: Arc<Mutex<ClientRegistry>>,
    max_line_length: usize,
) {
    if let Err(e) = run_session(stream, client_addr, auth, max_line_length).await {
        error!("Session with {} failed: {}", client_addr, e);
    }

    let mut clients_guard = clients.lock().await;
    if let Some(duration) = clients_guard.remove(&client_addr) {
        info!(
            "Client {} disconnected after {:.1}s ({} clients remain)",
            client_addr,
            duration.as_secs_f64(),
            clients_guard.len()
        );
    }
    if clients_guard.is_empty() {
        debug!("No clients connected");
    }
}

async fn run_session(
    stream: TcpStream,
    client_addr: SocketAddr,
    mut auth: AuthService,
    max_line_length: usize,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::with_capacity(max_line_length);
    let limit = max_line_length as u64 + 1;

    write_half
        .write_all(
            format_response(responses::READY, "Student records auth service ready").as_bytes(),
        )
        .await?;
    write_half.flush().await?;

    loop {
        buf.clear();
        // Never buffer more than one byte past the limit
        if (&mut reader).take(limit).read_until(b'\n', &mut buf).await? == 0 {
            // Client closed the connection
            info!("Connection closed by client {}", client_addr);
            return Ok(());
        }

        // Enforce command length limit
        if buf.len() > max_line_length {
            warn!("Client {} sent an oversized line", client_addr);
            write_half
                .write_all(format_response(responses::UNKNOWN_COMMAND, "Command too long").as_bytes())
                .await?;
            if !buf.ends_with(b"\n") && !discard_rest_of_line(&mut reader).await? {
                info!("Connection closed by client {}", client_addr);
                return Ok(());
            }
            continue;
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            warn!("Client {} sent a non UTF-8 line", client_addr);
            write_half
                .write_all(format_response(responses::SYNTAX_ERROR, "Invalid UTF-8").as_bytes())
                .await?;
            continue;
        };

        let command = parse_command(line.trim_end_matches(['\r', '\n']));
        info!("Received from {}: {}", client_addr, command.name());

        let result = handle_command(&mut auth, &command);
        if let CommandStatus::Failure(reason) = &result.status {
            debug!("{} from {} failed: {}", command.name(), client_addr, reason);
        }

        if let Some(msg) = result.message {
            write_half.write_all(msg.as_bytes()).await?;
        }

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested to quit", client_addr);
            write_half.shutdown().await?;
            return Ok(());
        }
    }
}

/// Skips input up to and including the next newline.
///
/// Returns `false` if the client closed the connection first.
async fn discard_rest_of_line<R>(reader: &mut R) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (found, used) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(false);
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(pos) => (true, pos + 1),
                None => (false, available.len()),
            }
        };
        reader.consume(used);
        if found {
            return Ok(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn discard_stops_after_newline() {
        let mut reader = BufReader::with_capacity(4, &b"xxxxxxxxxx\r\nNOOP\r\n"[..]);
        assert!(discard_rest_of_line(&mut reader).await.unwrap());

        let mut rest = String::new();
        reader.read_to_string(&mut rest).await.unwrap();
        assert_eq!(rest, "NOOP\r\n");
    }

    #[tokio::test]
    async fn discard_reports_eof() {
        let mut reader = BufReader::new(&b"no newline here"[..]);
        assert!(!discard_rest_of_line(&mut reader).await.unwrap());
    }
}
