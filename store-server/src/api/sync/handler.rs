//! Sync API Handlers

use axum::{Json, extract::State};
use shared::models::SyncStatus;

use crate::core::ServerState;

/// GET /api/sync/versions - 资源版本号
///
/// 后台客户端轮询这里判断哪些目录数据需要重新拉取。
/// epoch 变了说明服务器重启过, 全量刷新。
pub async fn get_versions(State(state): State<ServerState>) -> Json<SyncStatus> {
    Json(SyncStatus {
        epoch: state.epoch.clone(),
        versions: state.resource_versions.snapshot(),
        server_time_ms: shared::util::now_millis(),
    })
}
