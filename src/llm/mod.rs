// AI tie-breaker: prompt construction and the chat-completions client.

pub mod client;
pub mod prompt;
