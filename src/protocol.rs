//! Wire protocol line formats
//!
//! The relay speaks UTF-8 text, one message per newline-terminated line.
//! Every line the server emits is built here so the session loop and the
//! relay actor never hand-format protocol text.
//!
//! Two kinds of server lines, distinguishable by prefix:
//! - roster updates: `USERS:<name1>,<name2>,...` (no timestamp)
//! - chat and system notices: timestamped by the broadcaster before delivery

/// Prefix of the roster control line
pub const ROSTER_PREFIX: &str = "USERS:";

/// Rejection notice for an empty or missing handshake name
pub const REJECTION_LINE: &str = "用户名不能为空。连接中断。";

/// Acceptance line, sent once to the newly registered client only
pub fn acceptance_line(name: &str) -> String {
    format!("用户名 {} 设置成功，您可以开始聊天了", name)
}

/// Join notice body, broadcast to all clients including the new one
pub fn join_notice(name: &str) -> String {
    format!("{} 加入了聊天室！", name)
}

/// Chat line body: sender name prefixed onto the verbatim message
pub fn chat_line(name: &str, body: &str) -> String {
    format!("{}: {}", name, body)
}

/// Departure notice body, broadcast after a client is deregistered
pub fn departure_notice(name: &str) -> String {
    format!("{} 离开了聊天室。", name)
}

/// Roster control line
///
/// Comma-separated display names; an empty roster yields `USERS:` with no
/// trailing separator.
pub fn roster_line(names: &[String]) -> String {
    format!("{}{}", ROSTER_PREFIX, names.join(","))
}
