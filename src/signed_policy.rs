use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// 构造上传表单时需要的辅助信息，这些字段不参与签名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadExtra {
    pub(crate) bucket_url: String,
    pub(crate) key_prefix: String,
    pub(crate) expiration: String,
}

impl UploadExtra {
    /// 获取表单提交地址
    #[inline]
    pub fn bucket_url(&self) -> &str {
        &self.bucket_url
    }

    /// 获取对象名称前缀
    #[inline]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// 获取上传策略过期时间
    #[inline]
    pub fn expiration(&self) -> &str {
        &self.expiration
    }
}

/// 客户端需要随文件一同提交的表单字段
///
/// 序列化后的字段名即为 S3 表单字段名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub(crate) policy: String,
    pub(crate) signature: String,
    #[serde(rename = "AWSAccessKeyId")]
    pub(crate) access_key_id: String,
    pub(crate) acl: String,
    #[serde(rename = "Content-Type")]
    pub(crate) content_type: String,
    pub(crate) success_action_status: String,
    pub(crate) key: String,
}

impl FormFields {
    /// 获取 Base64 编码的上传策略
    #[inline]
    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// 获取上传策略签名
    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// 获取 Access Key
    #[inline]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// 获取预定义 ACL
    #[inline]
    pub fn acl(&self) -> &str {
        &self.acl
    }

    /// 获取 Content-Type
    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// 获取上传成功后返回的 HTTP 状态码，固定为 201
    #[inline]
    pub fn success_action_status(&self) -> &str {
        &self.success_action_status
    }

    /// 获取对象名称
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 按 S3 要求的顺序迭代表单字段名称和值，文件字段必须排在这些字段之后
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        vec![
            ("key", self.key.as_str()),
            ("acl", self.acl.as_str()),
            ("Content-Type", self.content_type.as_str()),
            ("success_action_status", self.success_action_status.as_str()),
            ("AWSAccessKeyId", self.access_key_id.as_str()),
            ("policy", self.policy.as_str()),
            ("signature", self.signature.as_str()),
        ]
        .into_iter()
    }
}

/// 签名后的上传策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPolicy {
    pub(crate) extra: UploadExtra,
    pub(crate) form_fields: FormFields,
}

impl SignedPolicy {
    /// 获取辅助信息
    #[inline]
    pub fn extra(&self) -> &UploadExtra {
        &self.extra
    }

    /// 获取表单字段
    #[inline]
    pub fn form_fields(&self) -> &FormFields {
        &self.form_fields
    }

    /// 生成可以直接上传文件到存储空间的 HTML 表单
    pub fn to_html_form(&self) -> String {
        let mut html = String::new();
        writeln!(
            html,
            r#"<form action="{}" method="post" enctype="multipart/form-data">"#,
            escape_html(self.extra.bucket_url())
        )
        .ok();
        for (name, value) in self.form_fields.iter() {
            writeln!(
                html,
                r#"  <input type="hidden" name="{}" value="{}" />"#,
                escape_html(name),
                escape_html(value)
            )
            .ok();
        }
        html.push_str("  <input type=\"file\" name=\"file\" />\n");
        html.push_str("  <input type=\"submit\" value=\"Upload\" />\n");
        html.push_str("</form>\n");
        html
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
