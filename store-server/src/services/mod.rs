//! 服务层 - 后台服务
//!
//! # 服务列表
//!
//! - [`ImageCleanupService`] - 孤儿图片清理

pub mod image_cleanup;

pub use image_cleanup::ImageCleanupService;
