use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::auth::AuthService;
use crate::client::{ClientRegistry, handle_client};
use crate::config::ServiceConfig;
use crate::error::ServerError;
use crate::protocol::responses::{self, format_response};
use crate::storage::CredentialStore;

/// Accepts control connections and runs one auth session per client.
///
/// All sessions share the same credential store; each gets its own
/// `SessionFlag` through a fresh `AuthService`.
pub struct Server {
    client_registry: Arc<Mutex<ClientRegistry>>,
    store: Arc<dyn CredentialStore>,
    listener: TcpListener,
    config: Arc<ServiceConfig>,
}

impl Server {
    pub async fn bind(
        config: ServiceConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ServerError> {
        let socket = config.server.listen_socket();

        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };

        Ok(Self {
            client_registry: Arc::new(Mutex::new(ClientRegistry::new(
                config.server.max_clients,
            ))),
            store,
            listener,
            config: Arc::new(config),
        })
    }

    /// Address actually bound, useful when the configured port is 0
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn start(&self) {
        info!(
            "Starting student records auth service on {} (max {} clients)",
            self.config.server.listen_socket(),
            self.config.server.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    if let Err(e) = self.admit(stream, addr).await {
                        warn!("Failed to admit client {}: {}", addr, e);
                    }
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }

    /// Registers the client and spawns its session, or turns it away when full.
    async fn admit(&self, mut stream: TcpStream, addr: SocketAddr) -> Result<(), ServerError> {
        let mut clients = self.client_registry.lock().await;

        if !clients.try_insert(addr) {
            let max = clients.max_clients();
            drop(clients);
            stream
                .write_all(
                    format_response(
                        responses::SERVICE_UNAVAILABLE,
                        "Too many connections. Try again later.",
                    )
                    .as_bytes(),
                )
                .await?;
            return Err(ServerError::TooManyClients(max));
        }

        info!(
            "Accepted client {} ({}/{} clients)",
            addr,
            clients.len(),
            clients.max_clients()
        );
        drop(clients);

        let auth = AuthService::new(Arc::clone(&self.store), self.config.auth.clone());
        let client_registry = Arc::clone(&self.client_registry);
        let max_line_length = self.config.server.max_line_length;

        // Spawn a task for each client so accept loop doesn't block
        tokio::spawn(async move {
            handle_client(stream, addr, auth, client_registry, max_line_length).await;
        });

        Ok(())
    }
}
