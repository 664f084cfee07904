//! Client event loop multiplexing the UDP socket and the keyboard

use crate::error::ClientError;
use crate::rendering::Renderer;
use crate::session::{Action, Phase, Session, SessionController};
use crate::signal::CancellationSignal;
use log::{debug, info};
use shared::{
    decode, encode_key, InboundMessage, KeyIntent, KeyScanner, OutboundMessage, MAX_DATAGRAM_SIZE,
};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Binds an ephemeral local socket in the same address family as the server.
pub async fn bind_socket(server_addr: SocketAddr) -> Result<UdpSocket, ClientError> {
    let local: SocketAddr = if server_addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    UdpSocket::bind(local).await.map_err(ClientError::Bind)
}

pub struct Client<R: Renderer> {
    socket: UdpSocket,
    server_addr: SocketAddr,
    controller: SessionController,
    renderer: R,
    cancel: CancellationSignal,
    scanner: KeyScanner,
}

impl<R: Renderer> Client<R> {
    pub fn new(
        socket: UdpSocket,
        server_addr: SocketAddr,
        renderer: R,
        cancel: CancellationSignal,
    ) -> Self {
        Client {
            socket,
            server_addr,
            controller: SessionController::new(),
            renderer,
            cancel,
            scanner: KeyScanner::new(),
        }
    }

    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Runs the session to completion.
    ///
    /// Each wakeup handles the socket first and the keyboard second, so a QUIT
    /// from the server always lands before further keys are forwarded. The loop
    /// ends once the cancellation signal is set, by the server, a quit key or an
    /// interrupt, and the QUIT notice is then sent exactly once.
    pub async fn run(&mut self, mut keys: mpsc::Receiver<Vec<u8>>) -> Result<(), ClientError> {
        let actions = self.controller.start();
        self.perform(actions).await?;
        info!("Sent INIT message to {}", self.server_addr);

        let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];
        let mut keyboard_open = true;

        while !self.cancel.is_cancelled() {
            let mut datagram = None;
            let mut key_chunk = None;

            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                received = self.socket.recv_from(&mut buffer) => {
                    datagram = Some(received.map_err(ClientError::Receive)?);
                }

                chunk = keys.recv(), if keyboard_open => key_chunk = Some(chunk),
            }

            if let Some((len, from)) = datagram {
                self.handle_datagram(&buffer[..len], from).await?;

                if key_chunk.is_none() && keyboard_open {
                    key_chunk = match keys.try_recv() {
                        Ok(chunk) => Some(Some(chunk)),
                        Err(TryRecvError::Empty) => None,
                        Err(TryRecvError::Disconnected) => Some(None),
                    };
                }
            }

            match key_chunk {
                Some(Some(bytes)) => self.handle_keys(&bytes).await?,
                Some(None) => {
                    keyboard_open = false;
                    if self.scanner.has_pending() {
                        let dropped = self.scanner.finish();
                        debug!("Dropped {} bytes of an incomplete key sequence", dropped);
                    }
                    info!("Keyboard input closed");
                }
                None => {}
            }
        }

        self.shutdown().await
    }

    async fn handle_datagram(&mut self, bytes: &[u8], from: SocketAddr) -> Result<(), ClientError> {
        let message = decode(bytes);

        if from != self.server_addr {
            if !self.adopts_peer(&message) {
                info!("Ignoring {} bytes from unexpected peer {}", bytes.len(), from);
                return Ok(());
            }
            info!("Server {} answered from {}, talking to it there", self.server_addr, from);
            self.server_addr = from;
        }

        let actions = self.controller.on_inbound(message);
        self.perform(actions).await
    }

    /// A server may reply from another socket than the one it was reached on.
    /// The first valid INIT fixes the peer; anything else from elsewhere is dropped.
    fn adopts_peer(&self, message: &InboundMessage) -> bool {
        self.controller.phase() == Phase::AwaitingInit
            && matches!(message, InboundMessage::Init { .. })
    }

    async fn handle_keys(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        self.scanner.push(bytes);

        while let Some(unit) = self.scanner.next_unit() {
            match encode_key(unit) {
                KeyIntent::Send(message) => {
                    let actions = self.controller.on_key(message);
                    self.perform(actions).await?;
                }
                KeyIntent::Cancel => {
                    info!("Quit requested from keyboard");
                    self.cancel.cancel();
                    break;
                }
                KeyIntent::Ignore => debug!("Ignoring key {:?}", unit),
            }
        }

        Ok(())
    }

    async fn perform(&mut self, actions: Vec<Action>) -> Result<(), ClientError> {
        for action in actions {
            match action {
                Action::Send(message) => self.send(&message).await?,
                Action::DrawBorder { height, width } => self
                    .renderer
                    .draw_border(height, width)
                    .map_err(ClientError::Terminal)?,
                Action::DrawPositions {
                    height,
                    width,
                    dots,
                } => self
                    .renderer
                    .draw_positions(height, width, &dots)
                    .map_err(ClientError::Terminal)?,
                Action::Cancel => {
                    self.cancel.cancel();
                }
            }
        }
        Ok(())
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), ClientError> {
        self.socket
            .send_to(&message.encode(), self.server_addr)
            .await
            .map_err(ClientError::Send)?;
        debug!("Sent {:?}", message);
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), ClientError> {
        if let Some(notice) = self.controller.shutdown() {
            self.send(&notice).await?;
            info!("Sent QUIT message");
        }

        self.controller.close();
        Ok(())
    }
}
