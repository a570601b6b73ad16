//! Raw-upload ceilings, checked before any decode work.

use crate::config::LimitsConfig;
use crate::error::ProcessError;
use crate::registry::Purpose;
use crate::types::RawImage;

/// Upload ceiling for a purpose.
pub fn input_limit(purpose: Purpose, limits: &LimitsConfig) -> u64 {
    match purpose {
        Purpose::Emoji => limits.max_emoji_input_bytes,
        Purpose::Avatar
        | Purpose::SpaceIcon
        | Purpose::SpaceBanner
        | Purpose::MessageAttachment
        | Purpose::Sticker => limits.max_input_bytes,
    }
}

/// Fail with [`ProcessError::FileTooLarge`] when the input exceeds its ceiling.
pub fn validate(raw: &RawImage, purpose: Purpose, limits: &LimitsConfig) -> Result<(), ProcessError> {
    let limit = input_limit(purpose, limits);
    if raw.size_bytes() > limit {
        tracing::debug!(%purpose, size_bytes = raw.size_bytes(), limit, "input over upload ceiling");
        return Err(ProcessError::FileTooLarge { limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const MB: usize = 1024 * 1024;

    fn raw(size: usize) -> RawImage {
        RawImage::new(vec![0u8; size], "image/jpeg")
    }

    #[test]
    fn emoji_has_smaller_ceiling() {
        let limits = LimitsConfig::default();
        assert_eq!(input_limit(Purpose::Emoji, &limits), 5 * MB as u64);
        for purpose in Purpose::ALL.into_iter().filter(|p| *p != Purpose::Emoji) {
            assert_eq!(input_limit(purpose, &limits), 25 * MB as u64, "{purpose}");
        }
    }

    #[test]
    fn at_limit_is_accepted() {
        let limits = LimitsConfig::default();
        assert!(validate(&raw(5 * MB), Purpose::Emoji, &limits).is_ok());
    }

    #[test]
    fn over_limit_is_rejected_with_limit() {
        let limits = LimitsConfig::default();
        let err = validate(&raw(5 * MB + 1), Purpose::Emoji, &limits).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileTooLarge);
        assert!(matches!(err, ProcessError::FileTooLarge { limit } if limit == 5 * MB as u64));
    }

    #[test]
    fn custom_limits_apply() {
        let limits = LimitsConfig {
            max_input_bytes: 10,
            max_emoji_input_bytes: 5,
        };
        assert!(validate(&raw(10), Purpose::Avatar, &limits).is_ok());
        assert!(validate(&raw(11), Purpose::Sticker, &limits).is_err());
        assert!(validate(&raw(6), Purpose::Emoji, &limits).is_err());
    }
}
