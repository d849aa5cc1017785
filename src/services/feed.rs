//! 公开文章列表的过滤、搜索、排序与分页
//!
//! 全部是纯函数，输入是已经从存储层取出的文章列表。

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rand::seq::SliceRandom;

use crate::config::FeedConfig;
use crate::storage::Article;
use crate::utils::markdown::strip_markdown;

/// 列表查询参数
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub genre: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// 一页结果
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub items: Vec<Article>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// 类别及其文章数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// `None`、空串、`all` 表示不过滤
fn genre_filter(genre: Option<&str>) -> Option<&str> {
    match genre.map(str::trim) {
        None | Some("") => None,
        Some(g) if g.eq_ignore_ascii_case("all") => None,
        Some(g) => Some(g),
    }
}

/// 搜索词：按空白切分并小写化，空查询返回空列表
fn search_terms(search: Option<&str>) -> Vec<String> {
    search
        .map(|s| s.split_whitespace().map(str::to_lowercase).collect())
        .unwrap_or_default()
}

fn matches_terms(article: &Article, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let haystack = format!(
        "{}\n{}\n{}",
        article.title,
        article.genre,
        strip_markdown(&article.content)
    )
    .to_lowercase();
    terms.iter().all(|t| haystack.contains(t.as_str()))
}

/// updated_at 倒序，其次 created_at 倒序，最后按 id
pub fn feed_order(a: &Article, b: &Article) -> Ordering {
    b.updated_at
        .cmp(&a.updated_at)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// 过滤 + 搜索 + 排序
pub fn filter_articles(articles: Vec<Article>, query: &FeedQuery) -> Vec<Article> {
    let genre = genre_filter(query.genre.as_deref());
    let terms = search_terms(query.search.as_deref());

    let mut matched: Vec<Article> = articles
        .into_iter()
        .filter(|a| genre.is_none_or(|g| a.genre.trim() == g))
        .filter(|a| matches_terms(a, &terms))
        .collect();

    matched.sort_by(feed_order);
    matched
}

/// 完整流水线：过滤、排序、分页
pub fn build_page(articles: Vec<Article>, query: &FeedQuery, limits: &FeedConfig) -> FeedPage {
    let matched = filter_articles(articles, query);

    let max_page_size = limits.max_page_size.max(1);
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(limits.default_page_size)
        .clamp(1, max_page_size);

    let total = matched.len();
    let total_pages = total.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);

    let items = if start < total {
        matched.into_iter().skip(start).take(page_size).collect()
    } else {
        Vec::new()
    };

    FeedPage {
        items,
        page,
        page_size,
        total,
        total_pages,
    }
}

/// 类别统计，按名称排序，跳过空类别
pub fn genre_counts(articles: &[Article]) -> Vec<GenreCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for article in articles {
        let genre = article.genre.trim();
        if genre.is_empty() {
            continue;
        }
        *counts.entry(genre).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect()
}

/// 同类别的其他文章，随机挑选最多 `count` 篇
pub fn pick_related(candidates: Vec<Article>, current: &Article, count: usize) -> Vec<Article> {
    let mut same_genre: Vec<Article> = candidates
        .into_iter()
        .filter(|a| a.id != current.id && a.genre.trim() == current.genre.trim())
        .collect();

    same_genre.shuffle(&mut rand::rng());
    same_genre.truncate(count);
    same_genre
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn article(id: &str, genre: &str, title: &str, content: &str, age_hours: i64) -> Article {
        let base = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let ts = base - Duration::hours(age_hours);
        Article {
            id: id.to_string(),
            title: title.to_string(),
            genre: genre.to_string(),
            content: content.to_string(),
            created_at: ts,
            updated_at: ts,
            published: true,
            thumbnail_url: None,
            slug: Some(id.to_string()),
            like_count: 0,
        }
    }

    fn sample() -> Vec<Article> {
        vec![
            article("a", "Tech", "Async Rust", "Tokio **runtime** notes", 5),
            article("b", "Travel", "Kyoto in autumn", "Temples and [maple](https://x) leaves", 1),
            article("c", "Tech", "SQLite tips", "WAL mode and `busy_timeout`", 3),
            article("d", "Life", "Morning coffee", "Pour-over rituals", 2),
            article("e", " ", "Untitled", "no genre", 4),
        ]
    }

    #[test]
    fn test_default_query_orders_by_updated_at_desc() {
        let page = build_page(sample(), &FeedQuery::default(), &FeedConfig::default());
        let ids: Vec<&str> = page.items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c", "e", "a"]);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn test_genre_filter_all_and_exact() {
        let q = FeedQuery {
            genre: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_articles(sample(), &q).len(), 5);

        let q = FeedQuery {
            genre: Some("Tech".to_string()),
            ..Default::default()
        };
        let ids: Vec<String> = filter_articles(sample(), &q)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["c", "a"]);

        let q = FeedQuery {
            genre: Some("tech".to_string()),
            ..Default::default()
        };
        assert!(filter_articles(sample(), &q).is_empty());
    }

    #[test]
    fn test_search_matches_plaintext_and_all_terms() {
        let q = FeedQuery {
            search: Some("MAPLE".to_string()),
            ..Default::default()
        };
        let hits = filter_articles(sample(), &q);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");

        // markdown 链接地址不参与匹配
        let q = FeedQuery {
            search: Some("https".to_string()),
            ..Default::default()
        };
        assert!(filter_articles(sample(), &q).is_empty());

        let q = FeedQuery {
            search: Some("tech wal".to_string()),
            ..Default::default()
        };
        let hits = filter_articles(sample(), &q);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "c");

        let q = FeedQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_articles(sample(), &q).len(), 5);
    }

    #[test]
    fn test_pagination_edges() {
        let limits = FeedConfig::default();

        let q = FeedQuery {
            page: Some(0),
            page_size: Some(2),
            ..Default::default()
        };
        let page = build_page(sample(), &q, &limits);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 3);

        let q = FeedQuery {
            page: Some(3),
            page_size: Some(2),
            ..Default::default()
        };
        let page = build_page(sample(), &q, &limits);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "a");

        let q = FeedQuery {
            page: Some(9),
            page_size: Some(2),
            ..Default::default()
        };
        let page = build_page(sample(), &q, &limits);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);

        let q = FeedQuery {
            page_size: Some(0),
            ..Default::default()
        };
        assert_eq!(build_page(sample(), &q, &limits).page_size, 1);

        let q = FeedQuery {
            page_size: Some(500),
            ..Default::default()
        };
        assert_eq!(build_page(sample(), &q, &limits).page_size, 50);
    }

    #[test]
    fn test_empty_input() {
        let page = build_page(Vec::new(), &FeedQuery::default(), &FeedConfig::default());
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_ties_broken_by_created_at_then_id() {
        let mut x = article("x", "Tech", "X", "", 1);
        let mut y = article("y", "Tech", "Y", "", 1);
        let z = article("z", "Tech", "Z", "", 1);
        x.created_at -= Duration::hours(10);
        y.created_at -= Duration::hours(10);
        let ordered = filter_articles(vec![x, y, z], &FeedQuery::default());
        let ids: Vec<&str> = ordered.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "x", "y"]);
    }

    #[test]
    fn test_genre_counts_sorted_and_skip_blank() {
        let counts = genre_counts(&sample());
        assert_eq!(
            counts,
            vec![
                GenreCount {
                    genre: "Life".to_string(),
                    count: 1
                },
                GenreCount {
                    genre: "Tech".to_string(),
                    count: 2
                },
                GenreCount {
                    genre: "Travel".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_related_excludes_current_and_other_genres() {
        let mut articles = sample();
        articles.push(article("f", "Tech", "More", "", 6));
        articles.push(article("g", "Tech", "Even more", "", 7));
        articles.push(article("h", "Tech", "Last", "", 8));
        let current = articles[0].clone();

        let related = pick_related(articles, &current, 3);
        assert_eq!(related.len(), 3);
        assert!(related.iter().all(|a| a.genre == "Tech" && a.id != "a"));
    }

    #[test]
    fn test_related_with_no_peers() {
        let articles = sample();
        let current = articles[3].clone();
        assert!(pick_related(articles, &current, 3).is_empty());
    }
}
