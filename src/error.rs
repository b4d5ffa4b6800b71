use super::config::ConfigParseError;
use thiserror::Error;

/// 上传策略生成与签名错误
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PolicyError {
    /// 存储空间名称为空
    #[error("Bucket name must not be empty")]
    EmptyBucket,

    /// 存储空间名称无法作为虚拟主机域名使用
    #[error("Invalid bucket name: {0:?}")]
    InvalidBucket(String),

    /// Access Key 为空
    #[error("Access key must not be empty")]
    EmptyAccessKey,

    /// 未知的预定义 ACL
    #[error("Unknown canned ACL: {0:?}")]
    UnknownAcl(String),

    /// Content-Type 无法解析
    #[error("Invalid content type {content_type:?}: {source}")]
    InvalidContentType {
        /// 原始 Content-Type
        content_type: String,
        /// 解析错误
        #[source]
        source: mime::FromStrError,
    },

    /// 上传文件尺寸上限为 0
    #[error("Content max size must be greater than zero")]
    ZeroContentMaxSize,

    /// 策略有效期为 0
    #[error("Policy time frame must be greater than zero")]
    ZeroTimeFrame,

    /// 策略有效期过长
    #[error("Policy time frame is too large: {0} seconds")]
    TimeFrameOverflow(u64),

    /// 策略过期时间无法表示
    #[error("Policy expiration is out of range")]
    ExpirationOutOfRange,

    /// Secret Key 中的转义序列不合法
    #[error("Invalid escape sequence at byte {position}: {reason}")]
    InvalidEscape {
        /// 转义序列起始位置
        position: usize,
        /// 错误原因
        reason: &'static str,
    },

    /// 策略 JSON 序列化错误
    #[error("Serialize policy as json error: {0}")]
    JSONError(#[from] serde_json::Error),

    /// 配置文件错误
    #[error(transparent)]
    ConfigError(#[from] ConfigParseError),
}

/// 上传策略结果
pub type PolicyResult<T> = Result<T, PolicyError>;
