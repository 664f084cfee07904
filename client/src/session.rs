//! Session state machine
//!
//! The controller never touches the socket or the terminal. Every transition
//! returns the side effects it needs as [`Action`]s, which the event loop
//! carries out in order.

use log::{debug, info, warn};
use shared::{InboundMessage, OutboundMessage, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    AwaitingInit,
    Active,
    Terminating,
    Closed,
}

/// Identity and arena assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub phase: Phase,
    pub username: String,
    pub window_height: i32,
    pub window_width: i32,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Start,
            username: String::new(),
            window_height: 0,
            window_width: 0,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// A participant marker to draw inside the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dot {
    pub x: i32,
    pub y: i32,
    /// The participant is this client.
    pub own: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(OutboundMessage),
    DrawBorder {
        height: i32,
        width: i32,
    },
    /// Clear the arena interior, then draw every dot.
    DrawPositions {
        height: i32,
        width: i32,
        dots: Vec<Dot>,
    },
    /// Set the cancellation signal so the event loop winds down.
    Cancel,
}

pub struct SessionController {
    session: Session,
    quit_sent: bool,
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            quit_sent: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Announces the client to the server.
    pub fn start(&mut self) -> Vec<Action> {
        if self.session.phase != Phase::Start {
            warn!("Session already started ({:?})", self.session.phase);
            return Vec::new();
        }

        self.session.phase = Phase::AwaitingInit;
        vec![Action::Send(OutboundMessage::InitRequest)]
    }

    pub fn on_inbound(&mut self, message: InboundMessage) -> Vec<Action> {
        let phase = self.session.phase;
        if phase == Phase::Closed {
            debug!("Session closed, dropping {:?}", message);
            return Vec::new();
        }

        match message {
            InboundMessage::Malformed => Vec::new(),

            InboundMessage::Quit => match phase {
                Phase::Terminating => Vec::new(),
                _ => {
                    info!("Server ended the session");
                    self.session.phase = Phase::Terminating;
                    vec![Action::Cancel]
                }
            },

            InboundMessage::Init {
                username,
                height,
                width,
            } => match phase {
                Phase::AwaitingInit | Phase::Active => {
                    info!(
                        "Joined as {} in a {}x{} arena",
                        username, width, height
                    );
                    self.session = Session {
                        phase: Phase::Active,
                        username,
                        window_height: height,
                        window_width: width,
                    };
                    vec![Action::DrawBorder { height, width }]
                }
                _ => {
                    warn!("Unexpected INIT while {:?}", phase);
                    Vec::new()
                }
            },

            InboundMessage::PositionBatch { entries } => match phase {
                Phase::Active => vec![Action::DrawPositions {
                    height: self.session.window_height,
                    width: self.session.window_width,
                    dots: self.dots(&entries),
                }],
                _ => {
                    debug!("Ignoring {} positions while {:?}", entries.len(), phase);
                    Vec::new()
                }
            },
        }
    }

    /// Forwards a keypress intent. Only an active session talks to the server.
    pub fn on_key(&mut self, message: OutboundMessage) -> Vec<Action> {
        if self.session.phase != Phase::Active {
            debug!("Dropping {:?} while {:?}", message, self.session.phase);
            return Vec::new();
        }
        vec![Action::Send(message)]
    }

    /// The QUIT notice to send on the way out, at most once per session.
    pub fn shutdown(&mut self) -> Option<OutboundMessage> {
        if self.session.phase == Phase::Closed || self.quit_sent {
            return None;
        }

        self.session.phase = Phase::Terminating;
        self.quit_sent = true;
        Some(OutboundMessage::QuitNotice)
    }

    pub fn close(&mut self) {
        self.session.phase = Phase::Closed;
    }

    fn dots(&self, entries: &[Position]) -> Vec<Dot> {
        entries
            .iter()
            .map(|entry| Dot {
                x: entry.x,
                y: entry.y,
                own: entry.username == self.session.username,
            })
            .collect()
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{decode, Key};

    fn active(username: &str, height: i32, width: i32) -> SessionController {
        let mut controller = SessionController::new();
        controller.start();
        controller.on_inbound(InboundMessage::Init {
            username: username.to_string(),
            height,
            width,
        });
        controller
    }

    #[test]
    fn test_new_session() {
        let controller = SessionController::new();
        assert_eq!(controller.phase(), Phase::Start);
        assert_eq!(controller.session().username, "");
        assert_eq!(controller.session().window_height, 0);
        assert_eq!(controller.session().window_width, 0);
    }

    #[test]
    fn test_start_sends_init_request() {
        let mut controller = SessionController::new();
        assert_eq!(
            controller.start(),
            vec![Action::Send(OutboundMessage::InitRequest)]
        );
        assert_eq!(controller.phase(), Phase::AwaitingInit);
        assert!(controller.start().is_empty());
    }

    #[test]
    fn test_init_activates_session() {
        let mut controller = SessionController::new();
        controller.start();

        let actions = controller.on_inbound(decode(b"INIT:alice|24|80"));

        assert_eq!(
            actions,
            vec![Action::DrawBorder {
                height: 24,
                width: 80
            }]
        );
        let session = controller.session();
        assert_eq!(session.phase, Phase::Active);
        assert_eq!(session.username, "alice");
        assert_eq!(session.window_height, 24);
        assert_eq!(session.window_width, 80);
    }

    #[test]
    fn test_malformed_init_leaves_session_untouched() {
        let malformed = [
            "INIT:alice",
            "INIT:alice|24",
            "INIT:alice|x|80",
            "INIT:alice|24|80z",
            "INIT:alice|99999999999|80",
        ];

        for raw in malformed {
            let mut controller = SessionController::new();
            controller.start();
            let before = controller.session().clone();

            assert!(controller.on_inbound(decode(raw.as_bytes())).is_empty());
            assert_eq!(controller.session(), &before, "state changed for {}", raw);
        }

        let mut controller = active("bob", 10, 20);
        let before = controller.session().clone();
        controller.on_inbound(decode(b"INIT:mallory|1|"));
        assert_eq!(controller.session(), &before);
    }

    #[test]
    fn test_position_batch_marks_own_dot() {
        let mut controller = active("alice", 24, 80);

        let actions = controller.on_inbound(decode(b"(alice, 3, 4)(bob, 10, 2)"));

        assert_eq!(
            actions,
            vec![Action::DrawPositions {
                height: 24,
                width: 80,
                dots: vec![
                    Dot {
                        x: 3,
                        y: 4,
                        own: true
                    },
                    Dot {
                        x: 10,
                        y: 2,
                        own: false
                    },
                ],
            }]
        );
        assert_eq!(controller.phase(), Phase::Active);
    }

    #[test]
    fn test_empty_batch_still_clears() {
        let mut controller = active("alice", 5, 5);
        assert_eq!(
            controller.on_inbound(decode(b"")),
            vec![Action::DrawPositions {
                height: 5,
                width: 5,
                dots: vec![]
            }]
        );
    }

    #[test]
    fn test_positions_ignored_before_init() {
        let mut controller = SessionController::new();
        controller.start();
        assert!(controller
            .on_inbound(decode(b"(alice, 3, 4)"))
            .is_empty());
    }

    #[test]
    fn test_quit_from_server() {
        let mut awaiting = SessionController::new();
        awaiting.start();
        assert_eq!(awaiting.on_inbound(InboundMessage::Quit), vec![Action::Cancel]);
        assert_eq!(awaiting.phase(), Phase::Terminating);

        let mut controller = active("alice", 24, 80);
        assert_eq!(
            controller.on_inbound(InboundMessage::Quit),
            vec![Action::Cancel]
        );
        assert_eq!(controller.phase(), Phase::Terminating);

        assert!(controller.on_inbound(InboundMessage::Quit).is_empty());
        assert_eq!(controller.shutdown(), Some(OutboundMessage::QuitNotice));
        assert_eq!(controller.shutdown(), None);
    }

    #[test]
    fn test_local_cancellation_sends_single_notice() {
        let mut controller = active("alice", 24, 80);

        assert_eq!(controller.shutdown(), Some(OutboundMessage::QuitNotice));
        assert_eq!(controller.phase(), Phase::Terminating);
        assert!(controller.on_inbound(InboundMessage::Quit).is_empty());
        assert_eq!(controller.shutdown(), None);

        controller.close();
        assert_eq!(controller.phase(), Phase::Closed);
    }

    #[test]
    fn test_closed_is_terminal() {
        let mut controller = active("alice", 24, 80);
        controller.shutdown();
        controller.close();

        assert!(controller.on_inbound(InboundMessage::Quit).is_empty());
        assert!(controller.on_inbound(decode(b"INIT:bob|1|1")).is_empty());
        assert!(controller
            .on_key(OutboundMessage::KeyPress(Key::Up))
            .is_empty());
        assert_eq!(controller.shutdown(), None);
        assert_eq!(controller.phase(), Phase::Closed);
    }

    #[test]
    fn test_keys_only_sent_while_active() {
        let mut controller = SessionController::new();
        controller.start();
        assert!(controller
            .on_key(OutboundMessage::KeyPress(Key::Char('a')))
            .is_empty());

        controller.on_inbound(decode(b"INIT:alice|24|80"));
        assert_eq!(
            controller.on_key(OutboundMessage::KeyPress(Key::Char('a'))),
            vec![Action::Send(OutboundMessage::KeyPress(Key::Char('a')))]
        );

        controller.on_inbound(InboundMessage::Quit);
        assert!(controller
            .on_key(OutboundMessage::KeyPress(Key::Left))
            .is_empty());
    }

    #[test]
    fn test_repeated_init_reassigns_identity() {
        let mut controller = active("alice", 24, 80);
        let actions = controller.on_inbound(decode(b"INIT:alice2|30|100"));

        assert_eq!(
            actions,
            vec![Action::DrawBorder {
                height: 30,
                width: 100
            }]
        );
        assert_eq!(controller.session().username, "alice2");
        assert_eq!(controller.session().window_width, 100);
    }
}
