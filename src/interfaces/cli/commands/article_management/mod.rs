//! Article management commands

mod delete;
mod list;
mod publish;

pub use delete::delete_article;
pub use list::list_articles;
pub use publish::set_published;
