//! Admin API 服务模块
//!
//! 该模块包含管理 API 的所有端点，以及公开 API 共用的响应类型与帮助函数：
//! - 文章 CRUD
//! - 类别建议
//! - 图片上传

mod article_crud;
pub mod error_code;
mod helpers;
pub mod routes;
mod types;
mod upload;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    CookieBuilder, api_result, error_from_blog, error_response, json_response, success_response,
    success_with_message,
};

// 重新导出错误码
pub use error_code::ErrorCode;

// 重新导出文章端点
pub use article_crud::{
    create_article, delete_article, get_article, list_articles, list_genres, update_article,
};

pub use routes::admin_routes;
pub use upload::upload_image;
