mod policy_config;

pub use policy_config::{
    PolicyConfig, PolicyConfigBuilder, CANNED_ACLS, DEFAULT_ACL, DEFAULT_CONTENT_MAX_SIZE,
    DEFAULT_CONTENT_TYPE, DEFAULT_TIME_FRAME,
};

use log::{info, warn};
use once_cell::sync::Lazy;
use std::{env, io::Error as IOError, path::PathBuf, sync::RwLock};
use tap::prelude::*;
use thiserror::Error;

/// 上传策略配置文件路径的环境变量名称
pub const S3_POST_POLICY_ENV: &str = "S3_POST_POLICY";

static POLICY_CONFIG: Lazy<RwLock<Option<PolicyConfig>>> = Lazy::new(|| RwLock::new(load_config()));

/// 上传策略配置文件解析错误
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigParseError {
    /// 配置文件读取错误
    #[error("Read config file error: {0}")]
    IOError(#[from] IOError),

    /// 配置文件 JSON 解析错误
    #[error("Parse config as json error: {0}")]
    JSONError(#[from] serde_json::Error),

    /// 配置文件 TOML 解析错误
    #[error("Parse config as toml error: {0}")]
    TOMLError(#[from] toml::de::Error),

    /// 配置文件扩展名既不是 .toml 也不是 .json
    #[error("Config file can only be given as .toml or .json file: {0:?}")]
    UnsupportedExtension(PathBuf),
}

/// 判断当前是否已经通过环境变量或手动设置启用上传策略配置
///
/// 如果当前没有设置 S3_POST_POLICY 环境变量，或加载配置文件出现错误，则返回 false
#[inline]
pub fn is_policy_config_enabled() -> bool {
    POLICY_CONFIG.read().unwrap().is_some()
}

/// 获取当前的上传策略配置信息
#[inline]
pub fn policy_config() -> Option<PolicyConfig> {
    POLICY_CONFIG.read().unwrap().to_owned()
}

/// 手动设置上传策略配置信息
#[inline]
pub fn set_policy_config(config: PolicyConfig) {
    let mut current = POLICY_CONFIG.write().unwrap();
    *current = Some(config);
    info!("S3_POST_POLICY config reloaded: {:?}", *current);
}

/// 从 S3_POST_POLICY 环境变量指定的配置文件中加载上传策略配置信息
pub fn load_config() -> Option<PolicyConfig> {
    env::var_os(S3_POST_POLICY_ENV)
        .tap_none(|| warn!("S3_POST_POLICY Env IS NOT ENABLED"))
        .and_then(|config_path| {
            PolicyConfig::load(&config_path)
                .tap_err(|err| {
                    log::error!(
                        "Policy config file ({:?}) cannot be loaded: {}",
                        config_path,
                        err
                    )
                })
                .ok()
                .tap_some(|config| info!("Policy config loaded from {:?}: {:?}", config_path, config))
        })
}
