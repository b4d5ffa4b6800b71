use super::{
    super::error::PolicyResult,
    base64,
    escape::unescape,
};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::fmt;

/// S3 账户凭证
///
/// Secret Key 只会以 UTF-8 字节形式参与签名
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_key: String,
    secret_key: String,
}

impl Credential {
    /// 创建 S3 账户凭证
    #[inline]
    pub fn new(ak: impl Into<String>, sk: impl Into<String>) -> Credential {
        Credential {
            access_key: ak.into(),
            secret_key: sk.into(),
        }
    }

    /// 使用经过反斜杠转义的 Secret Key 创建 S3 账户凭证
    ///
    /// 转义规则与 `unicode_escape` 编码一致，非转义字节按 Latin-1 解读
    pub fn from_escaped_secret(ak: impl Into<String>, escaped_sk: &[u8]) -> PolicyResult<Credential> {
        Ok(Credential::new(ak, unescape(escaped_sk)?))
    }

    /// 获取 Access Key
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// 对数据签名，返回标准 Base64 编码的 HMAC-SHA1 摘要
    pub fn sign(&self, data: &[u8]) -> String {
        self.base64_hmac_digest(data)
    }

    fn base64_hmac_digest(&self, data: &[u8]) -> String {
        let mut hmac = Hmac::<Sha1>::new_from_slice(self.secret_key.as_bytes())
            .expect("HMAC can take key of any size");
        hmac.update(data);
        base64::standard(&hmac.finalize().into_bytes())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key", &self.access_key)
            .finish()
    }
}
