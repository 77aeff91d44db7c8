//! Reply delivery: plain replies that can only ping the author, and red
//! error embeds.

use serenity::builder::{CreateAllowedMentions, CreateEmbed, CreateMessage};
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, UserId};
use serenity::model::Colour;

pub const NEGATIVE_REPLIES: &[&str] = &[
    "Noooooo!!",
    "Nope.",
    "I'm sorry Dave, I'm afraid I can't do that.",
    "I don't think so.",
    "Not gonna happen.",
    "Out of the question.",
    "Huh? No.",
    "Nah.",
    "Naw.",
    "Not likely.",
    "Not in a million years.",
    "Fat chance.",
    "Certainly not.",
    "NEGATORY.",
];

pub const ERROR_REPLIES: &[&str] = &[
    "Please don't do that.",
    "You have to stop.",
    "Do you mind?",
    "In the future, don't do that.",
    "That was a mistake.",
    "You blew it.",
    "You're bad at computers.",
    "Are you trying to kill me?",
    "Noooooo!!",
    "I can't believe you've done this",
];

/// Pick a reply title. `seed` is any per-invocation number (e.g. a message id).
pub fn pick(replies: &'static [&'static str], seed: u64) -> &'static str {
    replies[(seed % replies.len() as u64) as usize]
}

/// Mentions limited to `author`, so output can never ping anyone else.
pub fn author_only(author: UserId) -> CreateAllowedMentions {
    CreateAllowedMentions::new().users(vec![author])
}

pub fn error_embed(title: &str, description: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(description)
        .colour(Colour::RED)
}

/// Send `content` to `channel_id`, allowing only `author` to be mentioned.
pub async fn send_reply(
    http: &Http,
    channel_id: ChannelId,
    author: UserId,
    content: &str,
) -> Result<Message, serenity::Error> {
    let msg = CreateMessage::new()
        .content(content)
        .allowed_mentions(author_only(author));
    channel_id.send_message(http, msg).await
}

pub async fn send_error(
    http: &Http,
    channel_id: ChannelId,
    title: &str,
    description: &str,
) -> Result<Message, serenity::Error> {
    let msg = CreateMessage::new().embed(error_embed(title, description));
    channel_id.send_message(http, msg).await
}
