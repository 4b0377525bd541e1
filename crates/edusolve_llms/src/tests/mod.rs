mod chat_session;
mod provider_registry;
