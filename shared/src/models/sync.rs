//! Sync Status Model
//!
//! Version counters for admin clients polling for catalog changes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 同步状态响应
///
/// 轮询客户端用它判断哪些资源需要重新拉取
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    /// 服务器实例 epoch (启动时生成的 UUID)
    /// 用于检测服务器重启
    pub epoch: String,
    /// 各资源类型的当前版本
    pub versions: HashMap<String, u64>,
    /// 服务器当前时间 (Unix 毫秒)
    pub server_time_ms: i64,
}
