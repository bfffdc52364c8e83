// TabStash services
// Services provide core functionality: sanitization, durable writes, archive
// codec, settings.

pub mod archive_codec;
pub mod name_sanitizer;
pub mod persistence_gateway;
pub mod settings_engine;
