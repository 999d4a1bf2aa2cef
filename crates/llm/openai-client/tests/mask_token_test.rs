//! Unit tests for [`openai_client::mask_token`].
//!
//! Keys of length ≤ 11 are fully masked as `***`; longer keys show first 7 and last 4 chars.

use openai_client::mask_token;

/// **Test: Short or empty tokens are fully masked.**
#[test]
fn mask_token_short_returns_all_star() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("sk-12345"), "***");
    assert_eq!(mask_token("sk-proj-12"), "***");
}

/// **Test: Long tokens show first 7 and last 4 characters.**
#[test]
fn mask_token_long_shows_head_and_tail() {
    assert_eq!(mask_token("sk-proj-abcdefghijklmnop"), "sk-proj***mnop");
    assert_eq!(mask_token("sk-proj-xyzw"), "sk-proj***xyzw");
}

/// **Test: Non-ASCII keys never panic on a char boundary.**
#[test]
fn mask_token_non_ascii_does_not_panic() {
    let masked = mask_token("ключ-ключ-ключ-ключ");
    assert!(masked.contains("***"));
}
