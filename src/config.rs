/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 网关服务地址
    pub gateway_base_url: String,
    /// 每条回退之间的间隔（毫秒）
    pub rollback_delay_ms: u64,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 跳过回退确认（非交互环境使用，危险操作，默认关闭）
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_base_url: "http://127.0.0.1:5000".to_string(),
            rollback_delay_ms: 500,
            request_timeout_secs: 10,
            verbose_logging: false,
            assume_yes: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            gateway_base_url: std::env::var("GATEWAY_BASE_URL").unwrap_or(default.gateway_base_url),
            rollback_delay_ms: std::env::var("ROLLBACK_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.rollback_delay_ms),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            assume_yes: std::env::var("ASSUME_YES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.assume_yes),
        }
    }
}
