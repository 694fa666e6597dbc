//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`users`] - 账号管理接口 (仅管理员)
//! - [`upload`] - 图片上传与访问接口
//! - [`sync`] - 资源版本轮询接口
//! - [`categories`] - 分类接口
//! - [`products`] - 商品接口
//! - [`stores`] - 代购店铺接口
//! - [`orders`] - 配送订单接口
//! - [`pickup_orders`] - 代购单接口
//! - [`time_slots`] - 配送/自取时段接口
//! - [`delivery_settings`] - 配送设置接口
//! - [`promo_codes`] - 优惠码接口

pub mod auth;
pub mod health;
pub mod sync;
pub mod upload;
pub mod users;

// Catalog API
pub mod categories;
pub mod products;
pub mod stores;

// Order API
pub mod orders;
pub mod pickup_orders;

// Scheduling and promotion API
pub mod delivery_settings;
pub mod promo_codes;
pub mod time_slots;
