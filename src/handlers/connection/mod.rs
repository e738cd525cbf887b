//! Connection registration handlers (NICK, USER, PING, QUIT).

mod nick;
mod ping;
mod quit;
mod user;

pub use nick::NickHandler;
pub use ping::PingHandler;
pub use quit::QuitHandler;
pub use user::UserHandler;
