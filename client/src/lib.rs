//! # dotgrid Client Library
//!
//! Terminal client for a UDP position-broadcast service. The client announces
//! itself with `INIT`, receives an identity and arena size, then draws every
//! participant's position on each server broadcast while relaying keystrokes
//! back to the server.
//!
//! ## Architecture Overview
//!
//! Everything runs on a single thread. One event loop owns the socket, the
//! session state and the renderer; nothing is shared and nothing is locked.
//!
//! ### Session Controller (`session`)
//! The connection lifecycle as an explicit state machine:
//! - `Start → AwaitingInit` when the join request goes out
//! - `AwaitingInit → Active` on a well-formed `INIT:<user>|<h>|<w>`
//! - `→ Terminating` on a server `QUIT` or local cancellation
//! - `Terminating → Closed` once the `QUIT` notice has been sent
//!
//! Transitions return [`session::Action`]s rather than doing I/O, which keeps the
//! state machine testable without sockets or a terminal.
//!
//! ### Event Loop (`network`)
//! Waits on the socket, the keyboard and the cancellation signal at once.
//! When both inputs are ready in the same wakeup the datagram is handled
//! first, so a server `QUIT` always wins over a pending keypress.
//!
//! ### Cancellation (`signal`)
//! A set-once flag. Ctrl-C, the `q` key and a server `QUIT` all end up here,
//! and setting it wakes the event loop out of its wait.
//!
//! ### Input (`input`)
//! Forwards raw keyboard bytes to the event loop. Escape sequences are
//! reassembled and mapped to messages by the shared codec.
//!
//! ### Rendering (`rendering`)
//! Draws the arena border and participant dots with crossterm, and restores
//! the terminal when the client exits.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::input::spawn_keyboard_reader;
//! use client::network::{bind_socket, Client};
//! use client::rendering::{TerminalGuard, TerminalRenderer};
//! use client::signal::CancellationSignal;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = "127.0.0.1:4000".parse()?;
//! let socket = bind_socket(server).await?;
//!
//! let cancel = CancellationSignal::new();
//! cancel.listen_for_interrupt();
//!
//! let _terminal = TerminalGuard::enter()?;
//! let renderer = TerminalRenderer::new(std::io::stdout(), 80, 24);
//! let (keys, _) = spawn_keyboard_reader(tokio::io::stdin());
//!
//! let mut client = Client::new(socket, server, renderer, cancel);
//! client.run(keys).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod input;
pub mod logging;
pub mod network;
pub mod rendering;
pub mod session;
pub mod signal;

pub use error::ClientError;
