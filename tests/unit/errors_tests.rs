/*!
 * Tests for the crate's error types
 */

use subtrans::errors::{AppError, ProviderError, SubtitleError, TranslationError};

#[test]
fn test_from_status_withAuthCodes_shouldClassifyAsAuthentication() {
    assert!(matches!(
        ProviderError::from_status(401, "no key".to_string()),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(403, "forbidden".to_string()),
        ProviderError::AuthenticationError(_)
    ));
}

#[test]
fn test_from_status_withRateLimitCode_shouldClassifyAsRateLimit() {
    assert!(matches!(
        ProviderError::from_status(429, "slow down".to_string()),
        ProviderError::RateLimitExceeded(_)
    ));
}

#[test]
fn test_from_status_withOtherCodes_shouldKeepStatus() {
    match ProviderError::from_status(503, "unavailable".to_string()) {
        ProviderError::ApiError {
            status_code,
            message,
        } => {
            assert_eq!(status_code, 503);
            assert_eq!(message, "unavailable");
        }
        other => panic!("unexpected variant: {:?}", other),
    }
}

#[test]
fn test_error_display_shouldIncludeContext() {
    let err = SubtitleError::MalformedTimestamp {
        line: 12,
        found: "bad".to_string(),
    };
    let text = err.to_string();
    assert!(text.contains("12"));
    assert!(text.contains("bad"));

    let err = TranslationError::ShapeMismatch {
        expected: 5,
        actual: 3,
    };
    let text = err.to_string();
    assert!(text.contains('5'));
    assert!(text.contains('3'));
}

#[test]
fn test_translation_error_fromProviderError_shouldWrap() {
    let provider = ProviderError::RequestFailed("boom".to_string());
    let translation: TranslationError = provider.into();
    assert!(matches!(translation, TranslationError::Provider(_)));
}

#[test]
fn test_app_error_fromOtherErrors_shouldWrap() {
    let err: AppError = ProviderError::ConnectionError("offline".to_string()).into();
    assert!(matches!(err, AppError::Provider(_)));
    assert!(err.to_string().contains("Provider error"));

    let err: AppError = SubtitleError::EmptyDocument.into();
    assert!(matches!(err, AppError::Subtitle(_)));

    let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(err, AppError::File(_)));

    let err: AppError = anyhow::anyhow!("something else").into();
    assert!(matches!(err, AppError::Unknown(_)));
}
