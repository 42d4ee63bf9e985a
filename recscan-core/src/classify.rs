use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse bucket a resource link is filed under.
///
/// Declaration order is precedence order: when a link fits several
/// buckets, the earliest one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Twitter,
    Books,
    Wikipedia,
    Blogs,
    Youtube,
    Common,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Twitter,
        Category::Books,
        Category::Wikipedia,
        Category::Blogs,
        Category::Youtube,
        Category::Common,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Twitter => "Twitter",
            Category::Books => "Books",
            Category::Wikipedia => "Wikipedia",
            Category::Blogs => "Blogs",
            Category::Youtube => "Youtube",
            Category::Common => "Common",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "twitter" => Some(Category::Twitter),
            "books" | "book" => Some(Category::Books),
            "wikipedia" => Some(Category::Wikipedia),
            "blogs" | "blog" => Some(Category::Blogs),
            "youtube" => Some(Category::Youtube),
            "common" => Some(Category::Common),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File a resource under exactly one [`Category`]. Case-insensitive.
pub fn classify(link: &str, title: &str) -> Category {
    let link = link.to_lowercase();
    let title = title.to_lowercase();

    if link.contains("twitter.com") {
        Category::Twitter
    } else if link.contains("amazon") || link.contains("amzn.") {
        Category::Books
    } else if link.contains("wikipedia.org") {
        Category::Wikipedia
    } else if link.contains("blog") || title.contains("blog") {
        Category::Blogs
    } else if link.contains("youtube.com") {
        Category::Youtube
    } else {
        Category::Common
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_rule() {
        assert_eq!(classify("https://twitter.com/someone", "x"), Category::Twitter);
        assert_eq!(classify("https://www.amazon.com/dp/123", "x"), Category::Books);
        assert_eq!(classify("https://amzn.to/3abc", "x"), Category::Books);
        assert_eq!(classify("https://en.wikipedia.org/wiki/Rust", "x"), Category::Wikipedia);
        assert_eq!(classify("https://blog.rust-lang.org/", "x"), Category::Blogs);
        assert_eq!(classify("https://example.com/post", "My Blog"), Category::Blogs);
        assert_eq!(classify("https://www.youtube.com/watch?v=1", "x"), Category::Youtube);
        assert_eq!(classify("https://example.com", "x"), Category::Common);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(classify("https://twitter.com/amzn.to/x", ""), Category::Twitter);
        assert_eq!(classify("https://amazon.com/blog", ""), Category::Books);
        assert_eq!(classify("https://en.wikipedia.org/wiki/Blog", ""), Category::Wikipedia);
        assert_eq!(classify("https://youtube.com/c/blogger", ""), Category::Blogs);
        assert_eq!(classify("https://youtube.com/watch?v=1", "Vlog and blog"), Category::Blogs);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("HTTPS://TWITTER.COM/X", ""), Category::Twitter);
        assert_eq!(classify("https://example.com", "BLOG post"), Category::Blogs);
        assert_eq!(classify("https://Amzn.Eu/d/1", ""), Category::Books);
    }

    #[test]
    fn test_title_only_matters_for_blogs() {
        assert_eq!(classify("https://example.com", "twitter thread"), Category::Common);
        assert_eq!(classify("https://example.com", "amazon wishlist"), Category::Common);
        assert_eq!(classify("https://example.com", "youtube.com"), Category::Common);
    }

    #[test]
    fn test_amzn_needs_the_dot() {
        assert_eq!(classify("https://example.com/amzn", ""), Category::Common);
    }

    #[test]
    fn test_deterministic() {
        for (link, title) in [("https://x.com", "a"), ("", ""), ("blog", "")] {
            assert_eq!(classify(link, title), classify(link, title));
        }
    }

    #[test]
    fn test_from_str_round_trips_display() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
            assert_eq!(category.to_string(), category.as_str());
        }
        assert_eq!(Category::from_str("BLOG"), Some(Category::Blogs));
        assert_eq!(Category::from_str("podcasts"), None);
    }
}
