//! HTTP 接口层：路由、中间件、处理函数

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
