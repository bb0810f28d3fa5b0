//! Avatar lookup port: `avatar_url(email) -> URL`. The image service itself
//! is an external collaborator.

pub trait AvatarProvider: Send + Sync {
    /// URL of the avatar image for the given email address.
    fn avatar_url(&self, email: &str) -> String;
}
