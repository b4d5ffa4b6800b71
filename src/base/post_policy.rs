use super::{
    super::{
        config::PolicyConfig,
        error::{PolicyError, PolicyResult},
    },
    base64,
};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serialize, Serializer,
};
use std::{
    convert::TryFrom,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

pub(crate) const SUCCESS_ACTION_STATUS: &str = "201";
const EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

/// 上传策略中的单个条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// 表单字段必须与给定值完全一致，序列化为 `{"field": "value"}`
    Exact {
        /// 表单字段名称
        field: String,
        /// 期望值
        value: String,
    },

    /// 表单字段必须以给定前缀开头，序列化为 `["starts-with", "$field", "prefix"]`
    StartsWith {
        /// 表单字段名称，不包含 `$` 前缀
        field: String,
        /// 前缀，空字符串表示接受任意值
        prefix: String,
    },

    /// 上传文件尺寸范围，序列化为 `["content-length-range", min, max]`
    ContentLengthRange {
        /// 文件尺寸下限
        min: u64,
        /// 文件尺寸上限
        max: u64,
    },
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Condition::Exact { field, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(field, value)?;
                map.end()
            }
            Condition::StartsWith { field, prefix } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("starts-with")?;
                seq.serialize_element(&format!("${}", field))?;
                seq.serialize_element(prefix)?;
                seq.end()
            }
            Condition::ContentLengthRange { min, max } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("content-length-range")?;
                seq.serialize_element(min)?;
                seq.serialize_element(max)?;
                seq.end()
            }
        }
    }
}

/// S3 浏览器直传上传策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPolicy {
    expiration: String,
    conditions: Vec<Condition>,
}

impl PostPolicy {
    /// 根据配置信息和当前时间创建上传策略
    ///
    /// 条件的顺序固定：存储空间、对象名称前缀、ACL、上传成功状态码、Content-Type、文件尺寸范围。
    /// 配置信息会先经过校验，因此直接反序列化得到的配置同样会被拒绝
    pub fn new(config: &PolicyConfig, now: SystemTime) -> PolicyResult<Self> {
        config.validate()?;
        Ok(Self {
            expiration: format_expiration(now, config.time_frame())?,
            conditions: vec![
                Condition::Exact {
                    field: "bucket".into(),
                    value: config.bucket().into(),
                },
                Condition::StartsWith {
                    field: "key".into(),
                    prefix: config.key_prefix().into(),
                },
                Condition::Exact {
                    field: "acl".into(),
                    value: config.acl().into(),
                },
                Condition::Exact {
                    field: "success_action_status".into(),
                    value: SUCCESS_ACTION_STATUS.into(),
                },
                Condition::StartsWith {
                    field: "Content-Type".into(),
                    prefix: String::new(),
                },
                Condition::ContentLengthRange {
                    min: 0,
                    max: config.content_max_size(),
                },
            ],
        })
    }

    /// 获取上传策略过期时间
    #[inline]
    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// 获取上传策略条件列表
    #[inline]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// 序列化为紧凑 JSON，所有非 ASCII 字符都被转义为 `\uXXXX`
    pub fn to_json(&self) -> PolicyResult<String> {
        let json = serde_json::to_string(self)?;
        Ok(escape_non_ascii(&json))
    }

    /// 序列化并以标准 Base64 编码
    pub fn encode(&self) -> PolicyResult<String> {
        Ok(base64::standard(self.to_json()?.as_bytes()))
    }
}

pub(crate) fn format_expiration(now: SystemTime, time_frame: Duration) -> PolicyResult<String> {
    let time_frame = ChronoDuration::from_std(time_frame)
        .map_err(|_| PolicyError::TimeFrameOverflow(time_frame.as_secs()))?;
    to_date_time(now)
        .and_then(|now| now.checked_add_signed(time_frame))
        .map(|expiration| expiration.format(EXPIRATION_FORMAT).to_string())
        .ok_or(PolicyError::ExpirationOutOfRange)
}

fn to_date_time(time: SystemTime) -> Option<DateTime<Utc>> {
    let (secs, nanos) = match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => (i64::try_from(elapsed.as_secs()).ok()?, elapsed.subsec_nanos()),
        Err(err) => {
            let before = err.duration();
            let secs = i64::try_from(before.as_secs()).ok()?.checked_neg()?;
            match before.subsec_nanos() {
                0 => (secs, 0),
                nanos => (secs.checked_sub(1)?, 1_000_000_000 - nanos),
            }
        }
    };
    Utc.timestamp_opt(secs, nanos).single()
}

fn escape_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars().filter(|&c| c != '\n' && c != '\r') {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    escaped
}
