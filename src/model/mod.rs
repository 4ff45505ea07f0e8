/// Compose request and its user-controlled parts.
pub mod request;
/// Designer-authored templates.
pub mod template;
