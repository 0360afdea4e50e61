// Application state management
// Transcript, input, role configuration, session and UI state, driven by a reducer

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::api_client::{ChatError, ChatRequest};
use crate::auth::SessionOutcome;
use crate::state::message::Message;

/// Viewports narrower than this hide the sidebar unless toggled open
pub const NARROW_VIEWPORT_WIDTH: f32 = 768.0;
/// Maximum length of the role display name, in characters
pub const MAX_ROLE_NAME_CHARS: usize = 20;
/// Maximum length of the role prompt, in characters
pub const MAX_ROLE_PROMPT_CHARS: usize = 100;
/// Maximum length of a chat message, in characters
pub const MAX_INPUT_CHARS: usize = 2000;

/// Role display name shown until the user edits it
pub const DEFAULT_ROLE_NAME: &str = "プログラミングの先生";
/// Role prompt sent until the user edits it
pub const DEFAULT_ROLE_PROMPT: &str =
    "あなたはプログラミングの先生です。生徒からの質問に答えてください。";
/// First assistant message shown on an empty transcript
pub const GREETING: &str = "こんにちは私はプログラミングの先生です。気軽に質問してください。";
/// Shown in place of a reply whenever a chat request fails
pub const FALLBACK_REPLY: &str = "エラーが起こりました。";
/// User id used when the session token carries none
pub const DEFAULT_USER_ID: &str = "user1";

/// Client-generated identifier of a chat request
pub type RequestId = u64;

/// Role configuration sent with every chat request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    /// Display name shown in the chat header
    pub name: String,
    /// System-role prompt sent as `role`
    pub prompt: String,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ROLE_NAME.to_string(),
            prompt: DEFAULT_ROLE_PROMPT.to_string(),
        }
    }
}

/// Authentication status as seen by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// Session lookup has not completed yet
    Pending,
    /// A usable token is stored
    Authenticated,
    /// The session was invalidated (expired token or explicit sign-out)
    SignedOut,
    /// Session lookup failed; requests go out without a valid token
    Unauthenticated(String),
}

/// UI-specific state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether the sidebar was toggled open
    pub sidebar_visible: bool,
    /// Last known viewport width in logical pixels
    pub viewport_width: f32,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_visible: false,
            viewport_width: 1000.0,
        }
    }
}

impl UiState {
    /// Whether the viewport is in the narrow (overlay sidebar) layout
    pub fn is_narrow(&self) -> bool {
        self.viewport_width < NARROW_VIEWPORT_WIDTH
    }

    /// Whether the sidebar should be drawn this frame
    pub fn sidebar_shown(&self) -> bool {
        self.sidebar_visible || !self.is_narrow()
    }
}

/// Everything that can change the state
#[derive(Debug)]
pub enum Action {
    /// The message input was edited
    InputChanged(String),
    /// The role display name was edited
    RoleNameChanged(String),
    /// The role prompt was edited
    RolePromptChanged(String),
    /// The user submitted the current input
    Submit {
        /// Submission time
        at: DateTime<Utc>,
    },
    /// A chat request finished
    ReplyReceived {
        /// Request the reply belongs to
        request_id: RequestId,
        /// Reply text or the reason there is none
        result: Result<String, ChatError>,
        /// Completion time
        at: DateTime<Utc>,
    },
    /// Startup greeting timer fired
    Greet {
        /// Timer completion time
        at: DateTime<Utc>,
    },
    /// Session initialization finished
    SessionResolved(SessionOutcome),
    /// The user pressed the sign-out button
    SignOutRequested,
    /// The sidebar toggle was pressed
    ToggleSidebar,
    /// The viewport changed size
    ViewportResized(f32),
    /// A click landed outside the sidebar and its toggle
    ClickedOutsideSidebar,
}

/// Side effects requested by the reducer, executed by the app shell
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// POST a chat request to the proxy
    SendChat {
        /// Identifier to report the reply under
        request_id: RequestId,
        /// Bearer token, if a session is stored
        token: Option<String>,
        /// Request body
        request: ChatRequest,
    },
    /// Sign out of the identity provider
    SignOut,
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current contents of the message input
    pub input: String,
    /// Role configuration
    pub role: RoleConfig,
    /// UI state preferences
    pub ui_state: UiState,
    /// Authentication status
    pub auth: AuthStatus,
    transcript: Vec<Message>,
    token: Option<String>,
    user_id: String,
    in_flight: HashSet<RequestId>,
    next_request_id: RequestId,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            input: String::new(),
            role: RoleConfig::default(),
            ui_state: UiState::default(),
            auth: AuthStatus::Pending,
            transcript: Vec::new(),
            token: None,
            user_id: DEFAULT_USER_ID.to_string(),
            in_flight: HashSet::new(),
            next_request_id: 1,
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

impl AppState {
    /// Create a new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in the order they were appended
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Whether a submit would go out now
    /// Nothing is sent before the session lookup (and its expiry check) has finished
    pub fn can_send(&self) -> bool {
        !matches!(self.auth, AuthStatus::Pending | AuthStatus::SignedOut)
    }

    /// Whether any chat request is still in flight
    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Number of chat requests still in flight
    #[allow(dead_code)] // Only the loading flag is rendered for now
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Stored bearer token, if any
    #[allow(dead_code)] // Tokens travel inside SendChat commands; kept for inspection
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Id used to tag the user's messages
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Apply an action and return the side effects it requests
    ///
    /// Performs no I/O and reads no clock; timestamps come with the action.
    pub fn dispatch(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::InputChanged(text) => {
                self.input = truncate_chars(&text, MAX_INPUT_CHARS);
                Vec::new()
            }
            Action::RoleNameChanged(name) => {
                self.role.name = truncate_chars(&name, MAX_ROLE_NAME_CHARS);
                Vec::new()
            }
            Action::RolePromptChanged(prompt) => {
                self.role.prompt = truncate_chars(&prompt, MAX_ROLE_PROMPT_CHARS);
                Vec::new()
            }
            Action::Submit { at } => self.submit(at),
            Action::ReplyReceived {
                request_id,
                result,
                at,
            } => {
                self.receive_reply(request_id, result, at);
                Vec::new()
            }
            Action::Greet { at } => {
                if self.transcript.is_empty() {
                    self.transcript.push(Message::assistant(GREETING, at));
                }
                Vec::new()
            }
            Action::SessionResolved(outcome) => {
                self.resolve_session(outcome);
                Vec::new()
            }
            Action::SignOutRequested => {
                self.token = None;
                self.auth = AuthStatus::SignedOut;
                vec![Command::SignOut]
            }
            Action::ToggleSidebar => {
                self.ui_state.sidebar_visible = !self.ui_state.sidebar_visible;
                Vec::new()
            }
            Action::ViewportResized(width) => {
                self.ui_state.viewport_width = width;
                Vec::new()
            }
            Action::ClickedOutsideSidebar => {
                if self.ui_state.sidebar_visible && self.ui_state.is_narrow() {
                    self.ui_state.sidebar_visible = false;
                }
                Vec::new()
            }
        }
    }

    fn submit(&mut self, at: DateTime<Utc>) -> Vec<Command> {
        if self.input.trim().is_empty() || !self.can_send() {
            return Vec::new();
        }

        let text = std::mem::take(&mut self.input);
        self.transcript
            .push(Message::user(self.user_id.clone(), text.clone(), at));

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight.insert(request_id);

        tracing::debug!(request_id, in_flight = self.in_flight.len(), "Chat request queued");

        vec![Command::SendChat {
            request_id,
            token: self.token.clone(),
            request: ChatRequest {
                role: self.role.prompt.clone(),
                message: text,
            },
        }]
    }

    fn receive_reply(
        &mut self,
        request_id: RequestId,
        result: Result<String, ChatError>,
        at: DateTime<Utc>,
    ) {
        if !self.in_flight.remove(&request_id) {
            tracing::warn!(request_id, "Ignoring reply for unknown chat request");
            return;
        }

        let content = match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(request_id, error = %e, "Error calling the chat proxy");
                FALLBACK_REPLY.to_string()
            }
        };
        self.transcript.push(Message::assistant(content, at));
    }

    fn resolve_session(&mut self, outcome: SessionOutcome) {
        match outcome {
            SessionOutcome::Authenticated(session) => {
                if let Some(user_id) = session.user_id {
                    self.user_id = user_id;
                }
                self.token = Some(session.token);
                self.auth = AuthStatus::Authenticated;
            }
            SessionOutcome::SignedOut => {
                self.token = None;
                self.auth = AuthStatus::SignedOut;
            }
            SessionOutcome::Unauthenticated(e) => {
                self.token = None;
                self.auth = AuthStatus::Unauthenticated(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Session, SessionError};
    use crate::state::message::Sender;

    fn authenticated_state() -> AppState {
        let mut state = AppState::new();
        state.dispatch(Action::SessionResolved(SessionOutcome::Authenticated(
            Session {
                token: "jwt".to_string(),
                user_id: Some("alice".to_string()),
            },
        )));
        state
    }

    fn submit(state: &mut AppState, text: &str) -> Vec<Command> {
        state.dispatch(Action::InputChanged(text.to_string()));
        state.dispatch(Action::Submit { at: Utc::now() })
    }

    fn request_id_of(commands: &[Command]) -> RequestId {
        match commands {
            [Command::SendChat { request_id, .. }] => *request_id,
            other => panic!("expected a single SendChat, got {:?}", other),
        }
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.transcript().is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.auth, AuthStatus::Pending);
        assert_eq!(state.role, RoleConfig::default());
    }

    #[test]
    fn test_submit_appends_user_message_and_requests_chat() {
        let mut state = authenticated_state();
        let commands = submit(&mut state, "What is ownership?");

        assert_eq!(state.transcript().len(), 1);
        let message = &state.transcript()[0];
        assert_eq!(message.sender, Sender::User("alice".to_string()));
        assert_eq!(message.content, "What is ownership?");
        assert!(state.input.is_empty());
        assert!(state.is_loading());

        match &commands[..] {
            [Command::SendChat { token, request, .. }] => {
                assert_eq!(token.as_deref(), Some("jwt"));
                assert_eq!(request.role, DEFAULT_ROLE_PROMPT);
                assert_eq!(request.message, "What is ownership?");
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut state = authenticated_state();
        for input in ["", "   ", "\n\t "] {
            let commands = submit(&mut state, input);
            assert!(commands.is_empty());
            assert!(state.transcript().is_empty());
            assert!(!state.is_loading());
            assert_eq!(state.input, input);
        }
    }

    #[test]
    fn test_successful_reply_appends_assistant_message() {
        let mut state = authenticated_state();
        let id = request_id_of(&submit(&mut state, "hi"));

        state.dispatch(Action::ReplyReceived {
            request_id: id,
            result: Ok("Hello".to_string()),
            at: Utc::now(),
        });

        let last = state.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(last.content, "Hello");
        assert_eq!(state.transcript().len(), 2);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_failed_reply_appends_fallback_and_clears_loading() {
        let mut state = authenticated_state();
        let id = request_id_of(&submit(&mut state, "hi"));

        state.dispatch(Action::ReplyReceived {
            request_id: id,
            result: Err(ChatError::Status {
                status: 503,
                message: Some("upstream detail".to_string()),
            }),
            at: Utc::now(),
        });

        let last = state.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(last.content, FALLBACK_REPLY);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_overlapping_sends_are_tracked_independently() {
        let mut state = authenticated_state();
        let first = request_id_of(&submit(&mut state, "one"));
        let second = request_id_of(&submit(&mut state, "two"));
        assert_ne!(first, second);
        assert_eq!(state.in_flight_count(), 2);

        state.dispatch(Action::ReplyReceived {
            request_id: second,
            result: Ok("reply two".to_string()),
            at: Utc::now(),
        });
        assert!(state.is_loading());

        state.dispatch(Action::ReplyReceived {
            request_id: first,
            result: Ok("reply one".to_string()),
            at: Utc::now(),
        });
        assert!(!state.is_loading());

        let contents: Vec<_> = state.transcript().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "reply two", "reply one"]);
    }

    #[test]
    fn test_unknown_reply_is_ignored() {
        let mut state = authenticated_state();
        state.dispatch(Action::ReplyReceived {
            request_id: 42,
            result: Ok("stray".to_string()),
            at: Utc::now(),
        });
        assert!(state.transcript().is_empty());
    }

    #[test]
    fn test_greeting_only_on_empty_transcript() {
        let mut state = AppState::new();
        state.dispatch(Action::Greet { at: Utc::now() });
        assert_eq!(state.transcript().len(), 1);
        assert_eq!(state.transcript()[0].content, GREETING);

        state.dispatch(Action::Greet { at: Utc::now() });
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn test_role_fields_are_truncated() {
        let mut state = AppState::new();
        state.dispatch(Action::RoleNameChanged("n".repeat(30)));
        state.dispatch(Action::RolePromptChanged("あ".repeat(150)));
        assert_eq!(state.role.name.chars().count(), MAX_ROLE_NAME_CHARS);
        assert_eq!(state.role.prompt.chars().count(), MAX_ROLE_PROMPT_CHARS);
    }

    #[test]
    fn test_edited_role_prompt_is_sent() {
        let mut state = authenticated_state();
        state.dispatch(Action::RolePromptChanged("You are a pirate.".to_string()));
        match &submit(&mut state, "ahoy")[..] {
            [Command::SendChat { request, .. }] => assert_eq!(request.role, "You are a pirate."),
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_input_is_truncated() {
        let mut state = AppState::new();
        state.dispatch(Action::InputChanged("x".repeat(MAX_INPUT_CHARS + 10)));
        assert_eq!(state.input.chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_signed_out_session_blocks_sends() {
        let mut state = AppState::new();
        state.dispatch(Action::SessionResolved(SessionOutcome::SignedOut));
        assert_eq!(state.auth, AuthStatus::SignedOut);

        let commands = submit(&mut state, "hello");
        assert!(commands.is_empty());
        assert!(state.transcript().is_empty());
    }

    #[test]
    fn test_submit_waits_for_session_resolution() {
        let mut state = AppState::new();
        assert!(!state.can_send());

        let commands = submit(&mut state, "hi");
        assert!(commands.is_empty());
        assert!(state.transcript().is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.input, "hi");

        // An expired token resolved afterwards must not have been preceded by a request
        state.dispatch(Action::SessionResolved(SessionOutcome::SignedOut));
        assert!(state.transcript().is_empty());
        assert!(submit(&mut state, "hi").is_empty());
    }

    #[test]
    fn test_unauthenticated_session_still_sends_without_token() {
        let mut state = AppState::new();
        state.dispatch(Action::SessionResolved(SessionOutcome::Unauthenticated(
            SessionError::NoSession,
        )));
        assert!(matches!(state.auth, AuthStatus::Unauthenticated(_)));

        match &submit(&mut state, "hello")[..] {
            [Command::SendChat { token, .. }] => assert!(token.is_none()),
            other => panic!("unexpected commands: {:?}", other),
        }
        assert_eq!(state.user_id(), DEFAULT_USER_ID);
    }

    #[test]
    fn test_sign_out_request() {
        let mut state = authenticated_state();
        let commands = state.dispatch(Action::SignOutRequested);
        assert_eq!(commands, vec![Command::SignOut]);
        assert!(state.token().is_none());
        assert_eq!(state.auth, AuthStatus::SignedOut);
    }

    #[test]
    fn test_sidebar_toggle_and_outside_click() {
        let mut state = AppState::new();
        state.dispatch(Action::ViewportResized(500.0));
        assert!(!state.ui_state.sidebar_shown());

        state.dispatch(Action::ToggleSidebar);
        assert!(state.ui_state.sidebar_shown());

        state.dispatch(Action::ClickedOutsideSidebar);
        assert!(!state.ui_state.sidebar_visible);
    }

    #[test]
    fn test_outside_click_keeps_sidebar_on_wide_viewport() {
        let mut state = AppState::new();
        state.dispatch(Action::ViewportResized(1200.0));
        state.dispatch(Action::ToggleSidebar);
        state.dispatch(Action::ClickedOutsideSidebar);
        assert!(state.ui_state.sidebar_visible);
        assert!(state.ui_state.sidebar_shown());
    }
}
