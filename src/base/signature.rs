use super::credential::Credential;

/// Signs the base64 encoded policy text itself, not the decoded JSON.
pub(crate) fn sign_post_policy(credential: &Credential, encoded_policy: &str) -> String {
    credential.sign(encoded_policy.as_bytes())
}
