//! Region chat to IRC.

use simbridge_proto::Reply;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::ReplySink;
use crate::region::ChatMessage;

/// Public chat channel; other channels carry script traffic.
const PUBLIC_CHANNEL: i32 = 0;

/// Forward region chat to the client as PRIVMSG lines on `channel` until the
/// view is dropped or a write fails.
pub(super) async fn relay_chat(
    mut chat_rx: mpsc::Receiver<ChatMessage>,
    sink: ReplySink,
    channel: String,
) {
    while let Some(chat) = chat_rx.recv().await {
        if chat.channel != PUBLIC_CHANNEL {
            trace!(channel = chat.channel, "Skipping non-public chat");
            continue;
        }
        let reply = Reply::privmsg(&chat.sender.name, channel.as_str(), chat.text);
        if let Err(e) = sink.send(&reply).await {
            debug!(error = %e, "Chat relay stopped");
            break;
        }
    }
}
