use serde::{Deserialize, Serialize};

use crate::algo::entity::AlgoTemplate;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 路由前缀，同时出现在 ping 的返回值中
    pub app_name: String,
    pub http: HttpConfig,
    pub rpc: RpcConfig,
    pub log: LogConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// 网关服务端监听地址，同时也是门面客户端的连接地址
    pub addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` 语法，`RUST_LOG` 存在时以其为准
    pub level: String,
    /// 设置后额外按天滚动写入该目录
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 追加或覆盖内置模板
    pub templates: Vec<AlgoTemplate>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "AlgoTrading".to_string(),
            http: HttpConfig::default(),
            rpc: RpcConfig::default(),
            log: LogConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:2014".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl HttpConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
