//! Playlist generation task.

use std::sync::Arc;

use weatherify_services::{PlaylistError, PlaylistLink, PlaylistRequester};
use weatherify_weather::Mood;

use super::{deliver, EventSender};

#[derive(Debug)]
pub enum PlaylistServiceMessage {
    GenerateDone(Result<PlaylistLink, PlaylistError>),
}

/// Request a playlist for `mood`. Sends `GenerateDone` when the request settles.
pub fn request_generate(tx: &EventSender, requester: Arc<PlaylistRequester>, mood: Mood) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = requester.generate(mood).await;
        deliver(&tx, PlaylistServiceMessage::GenerateDone(result));
    });
}
