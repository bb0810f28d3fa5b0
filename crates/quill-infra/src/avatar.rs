//! Gravatar avatar URLs.
//!
//! The image itself is served by Gravatar; all we derive locally is the MD5
//! hash of the normalized email address.

use quill_core::ports::AvatarProvider;

/// Gravatar URL builder.
pub struct Gravatar {
    size: u32,
    default: &'static str,
    rating: &'static str,
}

impl Default for Gravatar {
    fn default() -> Self {
        Self {
            size: 100,
            default: "retro",
            rating: "g",
        }
    }
}

impl AvatarProvider for Gravatar {
    fn avatar_url(&self, email: &str) -> String {
        // Gravatar hashes the trimmed, lowercased address.
        let digest = md5::compute(email.trim().to_lowercase());

        format!(
            "https://www.gravatar.com/avatar/{:x}?s={}&d={}&r={}",
            digest, self.size, self.default, self.rating
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_the_normalized_address() {
        let avatars = Gravatar::default();

        // Reference hash from the Gravatar documentation.
        let url = avatars.avatar_url(" MyEmailAddress@example.com ");

        assert!(url.starts_with(
            "https://www.gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346"
        ));
        assert!(url.contains("s=100"));
        assert!(url.contains("d=retro"));
    }

    #[test]
    fn same_address_same_url() {
        let avatars = Gravatar::default();

        assert_eq!(
            avatars.avatar_url("a@example.com"),
            avatars.avatar_url("A@EXAMPLE.COM")
        );
    }
}
