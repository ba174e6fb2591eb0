//! Built-in handlers that plugin module files bind to by key

pub mod bot;
pub mod info;
pub mod prefix;
pub mod starboard;

use std::sync::Arc;

use crate::domain::traits::{ChannelSender, ConfigStore};
use crate::infrastructure::plugins::HandlerCatalog;

/// Catalog of every built-in handler.
///
/// Commands: `ping`, `userinfo`, `prefix-view`, `prefix-set`,
/// `starboard-set`, `starboard-remove`. Events: `ready`, `guild-delete`,
/// `prefixed-message`, `starboard-react`.
pub fn builtin_catalog(
    store: Arc<dyn ConfigStore>,
    sender: Arc<dyn ChannelSender>,
    default_prefix: &str,
) -> Result<HandlerCatalog, regex_lite::Error> {
    Ok(HandlerCatalog::new()
        .command("ping", Arc::new(bot::Ping))
        .command("userinfo", Arc::new(info::UserInfo))
        .command("prefix-view", Arc::new(prefix::PrefixView::new(store.clone(), default_prefix)))
        .command("prefix-set", Arc::new(prefix::PrefixSet::new(store.clone())))
        .command("starboard-set", Arc::new(starboard::StarboardSet::new(store.clone())?))
        .command("starboard-remove", Arc::new(starboard::StarboardRemove::new(store.clone())))
        .event("ready", Arc::new(bot::Ready))
        .event("guild-delete", Arc::new(bot::GuildDelete::new(store.clone())))
        .event("prefixed-message", Arc::new(bot::PrefixedMessage::new(store.clone())))
        .event("starboard-react", Arc::new(starboard::StarboardReact::new(store, sender))))
}
