use super::{
    super::error::{PolicyError, PolicyResult},
    ConfigParseError,
};
use chrono::Duration as ChronoDuration;
use mime::Mime;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, time::Duration};
use tap::TapFallible;

/// 默认上传文件尺寸上限，20 MB
pub const DEFAULT_CONTENT_MAX_SIZE: u64 = 20 * 1024 * 1024;
/// 默认预定义 ACL
pub const DEFAULT_ACL: &str = "public-read";
/// 默认上传策略有效期，240 秒
pub const DEFAULT_TIME_FRAME: Duration = Duration::from_secs(240);
/// 默认 Content-Type
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// S3 支持的预定义 ACL 列表
pub const CANNED_ACLS: &[&str] = &[
    "private",
    "public-read",
    "public-read-write",
    "aws-exec-read",
    "authenticated-read",
    "bucket-owner-read",
    "bucket-owner-full-control",
    "log-delivery-write",
];

/// 上传策略配置信息
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PolicyConfig {
    bucket: String,

    #[serde(default)]
    key_prefix: String,

    #[serde(alias = "ak")]
    access_key: String,

    #[serde(alias = "sk")]
    secret_key: Option<String>,

    content_max_size: Option<u64>,
    acl: Option<String>,
    time_frame_s: Option<u64>,
    content_type: Option<String>,
}

impl PolicyConfig {
    /// 创建上传策略配置信息构建器
    pub fn builder(
        bucket: impl Into<String>,
        key_prefix: impl Into<String>,
        access_key: impl Into<String>,
    ) -> PolicyConfigBuilder {
        PolicyConfigBuilder::new(bucket, key_prefix, access_key)
    }

    /// 从 TOML 或 JSON 配置文件读取配置信息
    pub fn load(path: impl AsRef<Path>) -> PolicyResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(ConfigParseError::from)?;
        Self::parse(path, &bytes)
    }

    /// 解析配置信息，根据文件扩展名选择 TOML 或 JSON 格式
    pub fn parse(path: &Path, bytes: &[u8]) -> PolicyResult<Self> {
        let config: Self = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_slice(bytes).map_err(ConfigParseError::from)?,
            Some("json") => serde_json::from_slice(bytes).map_err(ConfigParseError::from)?,
            _ => return Err(ConfigParseError::UnsupportedExtension(path.to_owned()).into()),
        };
        config
            .validate()
            .tap_err(|err| log::warn!("Invalid policy config in {:?}: {}", path, err))?;
        Ok(config)
    }

    /// 校验配置信息
    pub fn validate(&self) -> PolicyResult<()> {
        validate_bucket(&self.bucket)?;
        if self.access_key.is_empty() {
            return Err(PolicyError::EmptyAccessKey);
        }
        if !CANNED_ACLS.contains(&self.acl()) {
            return Err(PolicyError::UnknownAcl(self.acl().to_owned()));
        }
        self.content_type()
            .parse::<Mime>()
            .map_err(|err| PolicyError::InvalidContentType {
                content_type: self.content_type().to_owned(),
                source: err,
            })?;
        if self.content_max_size() == 0 {
            return Err(PolicyError::ZeroContentMaxSize);
        }
        let time_frame = self.time_frame();
        if time_frame == Duration::from_secs(0) {
            return Err(PolicyError::ZeroTimeFrame);
        }
        ChronoDuration::from_std(time_frame)
            .map_err(|_| PolicyError::TimeFrameOverflow(time_frame.as_secs()))?;
        Ok(())
    }

    /// 获取存储空间名称
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// 获取存储空间上传地址
    #[inline]
    pub fn bucket_url(&self) -> String {
        format!("https://{}.s3.amazonaws.com", self.bucket)
    }

    /// 获取对象名称或对象名称前缀
    #[inline]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// 获取 Access Key
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// 获取配置文件中的 Secret Key
    #[inline]
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    /// 获取上传文件尺寸上限
    #[inline]
    pub fn content_max_size(&self) -> u64 {
        self.content_max_size.unwrap_or(DEFAULT_CONTENT_MAX_SIZE)
    }

    /// 获取预定义 ACL
    #[inline]
    pub fn acl(&self) -> &str {
        self.acl.as_deref().unwrap_or(DEFAULT_ACL)
    }

    /// 获取上传策略有效期
    #[inline]
    pub fn time_frame(&self) -> Duration {
        self.time_frame_s
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIME_FRAME)
    }

    /// 获取 Content-Type
    ///
    /// 该值仅出现在表单字段中，上传策略本身接受任意 Content-Type
    #[inline]
    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

impl fmt::Debug for PolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyConfig")
            .field("bucket", &self.bucket)
            .field("key_prefix", &self.key_prefix)
            .field("access_key", &self.access_key)
            .field("content_max_size", &self.content_max_size)
            .field("acl", &self.acl)
            .field("time_frame_s", &self.time_frame_s)
            .field("content_type", &self.content_type)
            .finish()
    }
}

fn validate_bucket(bucket: &str) -> PolicyResult<()> {
    if bucket.is_empty() {
        return Err(PolicyError::EmptyBucket);
    }
    let valid_chars = bucket
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'-');
    let valid_edges = bucket
        .bytes()
        .next()
        .into_iter()
        .chain(bucket.bytes().last())
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
    if !(3..=63).contains(&bucket.len()) || !valid_chars || !valid_edges {
        return Err(PolicyError::InvalidBucket(bucket.to_owned()));
    }
    Ok(())
}

/// 上传策略配置信息构建器
#[derive(Debug)]
pub struct PolicyConfigBuilder(PolicyConfig);

impl PolicyConfigBuilder {
    /// 创建上传策略配置信息构建器
    pub fn new(
        bucket: impl Into<String>,
        key_prefix: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        Self(PolicyConfig {
            bucket: bucket.into(),
            key_prefix: key_prefix.into(),
            access_key: access_key.into(),
            ..Default::default()
        })
    }

    /// 构建并校验上传策略配置信息
    #[inline]
    pub fn build(self) -> PolicyResult<PolicyConfig> {
        self.0.validate()?;
        Ok(self.0)
    }

    /// 配置 Secret Key
    #[inline]
    pub fn secret_key(mut self, secret_key: Option<String>) -> Self {
        self.0.secret_key = secret_key;
        self
    }

    /// 配置上传文件尺寸上限，默认为 20 MB
    #[inline]
    pub fn content_max_size(mut self, content_max_size: u64) -> Self {
        self.0.content_max_size = Some(content_max_size);
        self
    }

    /// 配置预定义 ACL，默认为 `public-read`
    #[inline]
    pub fn acl(mut self, acl: impl Into<String>) -> Self {
        self.0.acl = Some(acl.into());
        self
    }

    /// 配置上传策略有效期，默认为 240 秒，不足一秒的部分将被忽略
    #[inline]
    pub fn time_frame(mut self, time_frame: Duration) -> Self {
        self.0.time_frame_s = Some(time_frame.as_secs());
        self
    }

    /// 配置 Content-Type，默认为 `image/png`
    #[inline]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.0.content_type = Some(content_type.into());
        self
    }
}

impl From<PolicyConfig> for PolicyConfigBuilder {
    #[inline]
    fn from(config: PolicyConfig) -> Self {
        PolicyConfigBuilder(config)
    }
}
